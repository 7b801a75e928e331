//! Report assembly and delimited-text rendering.

use serde::{Deserialize, Serialize};

use crate::types::{PostingRecord, SiftResult};

/// Output format for the assembled report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Tsv,
    Json,
}

impl std::str::FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "tsv" | "txt" => Ok(Self::Tsv),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown report format: {other}")),
        }
    }
}

/// Which optional columns the delimited report carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportColumns {
    pub date_posted: bool,
    pub header: bool,
}

impl Default for ReportColumns {
    fn default() -> Self {
        Self {
            date_posted: true,
            header: false,
        }
    }
}

/// Destination for finished report rows. Written once, at the end of a run.
pub trait ReportSink {
    fn write_rows(&mut self, rows: &[String]) -> SiftResult<()>;
}

impl ReportSink for Vec<String> {
    fn write_rows(&mut self, rows: &[String]) -> SiftResult<()> {
        self.extend_from_slice(rows);
        Ok(())
    }
}

/// Ordered collection of accepted postings.
#[derive(Debug, Clone, Default)]
pub struct ReportAssembler {
    records: Vec<PostingRecord>,
    columns: ReportColumns,
}

impl ReportAssembler {
    pub fn new(columns: ReportColumns) -> Self {
        Self {
            records: Vec::new(),
            columns,
        }
    }

    pub fn push(&mut self, record: PostingRecord) {
        self.records.push(record);
    }

    pub fn extend(&mut self, records: impl IntoIterator<Item = PostingRecord>) {
        self.records.extend(records);
    }

    pub fn records(&self) -> &[PostingRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Tab-separated rows in acceptance order, header first when enabled.
    pub fn rows(&self) -> Vec<String> {
        let header = self.columns.header.then(|| self.header_row());
        header
            .into_iter()
            .chain(self.records.iter().map(|r| self.row(r)))
            .collect()
    }

    pub fn render(&self, format: ReportFormat) -> SiftResult<Vec<String>> {
        match format {
            ReportFormat::Tsv => Ok(self.rows()),
            ReportFormat::Json => Ok(vec![serde_json::to_string_pretty(&self.records)?]),
        }
    }

    /// Render and hand the rows to `sink`.
    pub fn write_to(&self, sink: &mut dyn ReportSink, format: ReportFormat) -> SiftResult<usize> {
        let rows = self.render(format)?;
        sink.write_rows(&rows)?;
        Ok(self.records.len())
    }

    fn header_row(&self) -> String {
        let mut cols = vec![
            "experienceMet",
            "experienceRequiredYears",
            "company",
            "title",
            "location",
        ];
        if self.columns.date_posted {
            cols.push("datePosted");
        }
        cols.push("url");
        cols.join("\t")
    }

    fn row(&self, record: &PostingRecord) -> String {
        let detail = &record.detail;
        let mut fields = vec![
            if record.experience.minimum_met { "yes" } else { "no" }.to_string(),
            record.experience.minimum_years.to_string(),
            cell(detail.company.as_deref().unwrap_or_default()),
            cell(&detail.title),
            cell(detail.location.as_deref().unwrap_or_default()),
        ];
        if self.columns.date_posted {
            fields.push(
                detail
                    .date_posted
                    .map(|d| d.format("%Y-%m-%d").to_string())
                    .unwrap_or_default(),
            );
        }
        fields.push(cell(&detail.url));
        fields.join("\t")
    }
}

/// Keep a field on one line and inside its column.
fn cell(value: &str) -> String {
    value
        .split(['\t', '\n', '\r'])
        .filter(|part| !part.trim().is_empty())
        .map(str::trim)
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ExperienceAssessment, ExtractedDetail};
    use chrono::NaiveDate;

    fn record(title: &str, company: Option<&str>, years: Option<u32>) -> PostingRecord {
        PostingRecord {
            detail: ExtractedDetail {
                company: company.map(str::to_string),
                location: Some("Remote".into()),
                title: title.into(),
                url: format!("https://jobs.example/{}", title.len()),
                description: String::new(),
                date_posted: NaiveDate::from_ymd_opt(2024, 5, 2),
            },
            experience: match years {
                Some(y) => ExperienceAssessment {
                    minimum_met: false,
                    minimum_years: y,
                },
                None => ExperienceAssessment::default(),
            },
        }
    }

    #[test]
    fn rows_follow_column_order() {
        let mut report = ReportAssembler::default();
        report.push(record("UI Engineer", Some("Acme"), Some(3)));
        assert_eq!(
            report.rows(),
            vec!["no\t3\tAcme\tUI Engineer\tRemote\t2024-05-02\thttps://jobs.example/11"]
        );
    }

    #[test]
    fn missing_fields_render_empty() {
        let mut report = ReportAssembler::default();
        let mut r = record("Web Dev", None, None);
        r.detail.location = None;
        r.detail.date_posted = None;
        report.push(r);
        assert_eq!(report.rows(), vec!["yes\t0\t\tWeb Dev\t\t\thttps://jobs.example/7"]);
    }

    #[test]
    fn optional_columns_and_header() {
        let mut report = ReportAssembler::new(ReportColumns {
            date_posted: false,
            header: true,
        });
        report.push(record("Web Dev", Some("Acme"), None));
        let rows = report.rows();
        assert_eq!(rows.len(), 2);
        assert_eq!(
            rows[0],
            "experienceMet\texperienceRequiredYears\tcompany\ttitle\tlocation\turl"
        );
        assert_eq!(rows[1].split('\t').count(), 6);
    }

    #[test]
    fn embedded_separators_are_flattened() {
        let mut report = ReportAssembler::default();
        report.push(record("Front\tEnd\nDev", Some("Acme\n Inc"), None));
        let row = &report.rows()[0];
        assert_eq!(row.split('\t').count(), 7);
        assert!(row.contains("Front End Dev"));
        assert!(row.contains("Acme Inc"));
    }

    #[test]
    fn keeps_acceptance_order() {
        let mut report = ReportAssembler::default();
        report.extend(vec![
            record("A", Some("One"), None),
            record("B", Some("Two"), None),
        ]);
        report.push(record("C", Some("Three"), None));
        let titles: Vec<_> = report.records().iter().map(|r| r.detail.title.as_str()).collect();
        assert_eq!(titles, ["A", "B", "C"]);
    }

    #[test]
    fn json_render_flattens_record() {
        let mut report = ReportAssembler::default();
        report.push(record("UI Engineer", Some("Acme"), Some(2)));
        let out = report.render(ReportFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out[0]).unwrap();
        assert_eq!(value[0]["company"], "Acme");
        assert_eq!(value[0]["minimum_years"], 2);
        assert_eq!(value[0]["minimum_met"], false);
    }

    #[test]
    fn writes_into_sink() {
        let mut report = ReportAssembler::default();
        report.push(record("UI Engineer", Some("Acme"), None));
        let mut sink: Vec<String> = Vec::new();
        assert_eq!(report.write_to(&mut sink, ReportFormat::Tsv).unwrap(), 1);
        assert_eq!(sink.len(), 1);
    }

    #[test]
    fn parses_format_names() {
        assert_eq!("TSV".parse::<ReportFormat>().unwrap(), ReportFormat::Tsv);
        assert_eq!("json".parse::<ReportFormat>().unwrap(), ReportFormat::Json);
        assert!("xml".parse::<ReportFormat>().is_err());
    }
}
