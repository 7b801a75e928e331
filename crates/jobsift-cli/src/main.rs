//! jobsift — entry point.

use std::io::Read;
use std::path::PathBuf;

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;

use jobsift::{ExperienceFilter, ReportFormat, TitleFilter};
use jobsift_cli::config::AppConfig;

#[derive(Parser)]
#[command(
    name = "jobsift",
    about = "Walk a job-search site in Chromium and keep the postings worth reading",
    version
)]
struct Cli {
    /// Path to a JSON config file.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, default_value = "info", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Traverse the search results and write the report (default).
    Run {
        /// Search results URL to start from.
        #[arg(long)]
        url: Option<String>,

        /// Report file path.
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Report format (tsv, json).
        #[arg(long)]
        format: Option<ReportFormat>,

        /// Run Chromium without a window.
        #[arg(long)]
        headless: bool,

        /// Stop after this many result pages.
        #[arg(long)]
        max_pages: Option<usize>,
    },

    /// Show how the title filter treats a job title.
    Classify {
        /// Job title to check.
        title: String,
    },

    /// Show the experience assessment for a description.
    ///
    /// Reads the description from stdin when no text is given.
    Assess {
        text: Option<String>,
    },

    /// Generate shell completion scripts.
    ///
    /// Examples:
    ///   jobsift completions bash > ~/.local/share/bash-completion/completions/jobsift
    ///   jobsift completions zsh > ~/.zfunc/_jobsift
    Completions {
        /// Shell type (bash, zsh, fish, powershell, elvish).
        shell: Shell,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let command = cli.command.unwrap_or(Commands::Run {
        url: None,
        output: None,
        format: None,
        headless: false,
        max_pages: None,
    });

    match command {
        Commands::Run {
            url,
            output,
            format,
            headless,
            max_pages,
        } => {
            let mut config = load_or_exit(cli.config.as_deref());
            if let Some(url) = url {
                config.url = url;
            }
            if let Some(output) = output {
                config.output.path = output;
            }
            if let Some(format) = format {
                config.output.format = format;
            }
            if headless {
                config.browser.headless = true;
            }
            if max_pages.is_some() {
                config.sift.max_pages = max_pages;
            }

            match jobsift_cli::run(&config).await {
                Ok(summary) => {
                    if let Some(reason) = &summary.stats.aborted {
                        tracing::warn!("traversal stopped early: {reason}");
                    }
                    println!(
                        "{} postings written to {}",
                        summary.rows_written,
                        summary.output.display()
                    );
                }
                Err(e) => {
                    tracing::error!("{e:#}");
                    std::process::exit(1);
                }
            }
        }

        Commands::Classify { title } => {
            let config = load_or_exit(cli.config.as_deref());
            let filter = TitleFilter::from_keywords(&config.sift.keywords)?;
            let verdict = filter.verdict(&title);
            let out = serde_json::json!({
                "title": title,
                "accepted": verdict.is_accepted(),
                "verdict": verdict,
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }

        Commands::Assess { text } => {
            let text = match text {
                Some(text) => text,
                None => {
                    let mut buf = String::new();
                    std::io::stdin().read_to_string(&mut buf)?;
                    buf
                }
            };
            let (assessment, rule) = ExperienceFilter::new().explain(&text);
            let out = serde_json::json!({
                "minimum_met": assessment.minimum_met,
                "minimum_years": assessment.minimum_years,
                "rule": rule,
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }

        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "jobsift", &mut std::io::stdout());
        }
    }

    Ok(())
}

fn load_or_exit(explicit: Option<&std::path::Path>) -> AppConfig {
    match AppConfig::load(explicit) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("{e:#}");
            std::process::exit(1);
        }
    }
}
