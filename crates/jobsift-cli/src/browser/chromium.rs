//! [`PageController`] over a live Chromium tab, driven through chromiumoxide.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::js_protocol::runtime::EvaluateParams;
use chromiumoxide::error::CdpError;
use chromiumoxide::handler::viewport::Viewport as CdpViewport;
use chromiumoxide::page::Page;
use futures::StreamExt;
use serde_json::{json, Value};
use tokio::task::JoinHandle;

use jobsift::{scripts, PageController, SiftError, SiftResult};

use super::find_chromium;
use crate::config::BrowserSettings;

const POLL_INTERVAL_MS: u64 = 100;

/// A launched browser plus the task draining its CDP events.
pub struct ChromiumSession {
    browser: Browser,
    handler: JoinHandle<()>,
    settings: BrowserSettings,
}

impl ChromiumSession {
    /// Launch Chromium with the configured window and viewport.
    pub async fn launch(settings: &BrowserSettings) -> Result<Self> {
        let chrome_path = match &settings.chromium_path {
            Some(path) => path.clone(),
            None => find_chromium()
                .context("Chromium not found. Set JOBSIFT_CHROMIUM_PATH or install Chrome.")?,
        };
        tracing::debug!("Chromium: {}", chrome_path.display());

        let viewport = settings.viewport;
        let mut builder = BrowserConfig::builder()
            .chrome_executable(chrome_path)
            .window_size(viewport.width, viewport.height)
            .viewport(CdpViewport {
                width: viewport.width,
                height: viewport.height,
                ..CdpViewport::default()
            })
            .arg("--disable-gpu")
            .arg("--no-sandbox")
            .arg("--disable-dev-shm-usage")
            .arg("--disable-extensions");
        if !settings.headless {
            builder = builder.with_head();
        }
        if let Some(ms) = settings.navigation_timeout_ms {
            builder = builder.request_timeout(Duration::from_millis(ms));
        }
        let config = builder
            .build()
            .map_err(|e| anyhow::anyhow!("failed to build browser config: {e}"))?;

        let (browser, mut handler) = Browser::launch(config)
            .await
            .context("failed to launch Chromium")?;

        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    tracing::trace!("cdp handler: {e}");
                }
            }
        });

        Ok(Self {
            browser,
            handler,
            settings: settings.clone(),
        })
    }

    /// Open a blank tab to drive.
    pub async fn page(&self) -> Result<ChromiumPage> {
        let page = self
            .browser
            .new_page("about:blank")
            .await
            .context("failed to open a browser tab")?;
        Ok(ChromiumPage {
            page,
            timeout_ms: self.settings.navigation_timeout_ms,
        })
    }

    pub async fn close(mut self) -> Result<()> {
        self.browser.close().await.context("failed to close Chromium")?;
        let _ = self.browser.wait().await;
        self.handler.abort();
        Ok(())
    }
}

/// One browser tab.
pub struct ChromiumPage {
    page: Page,
    timeout_ms: Option<u64>,
}

impl ChromiumPage {
    async fn bounded<T, F>(&self, what: &str, fut: F) -> SiftResult<T>
    where
        F: std::future::Future<Output = SiftResult<T>>,
    {
        match self.timeout_ms {
            Some(ms) => tokio::time::timeout(Duration::from_millis(ms), fut)
                .await
                .map_err(|_| SiftError::Timeout {
                    what: what.to_string(),
                    ms,
                })?,
            None => fut.await,
        }
    }
}

fn browser_error(e: CdpError) -> SiftError {
    SiftError::Browser(e.to_string())
}

/// Call a function source with JSON-encoded positional arguments.
fn call_expression(script: &str, args: &[Value]) -> SiftResult<String> {
    let args = serde_json::to_string(&Value::Array(args.to_vec()))?;
    Ok(format!("({script})(...{args})"))
}

#[async_trait]
impl PageController for ChromiumPage {
    async fn navigate(&self, url: &str) -> SiftResult<()> {
        tracing::debug!(url, "navigate");
        self.bounded(url, async {
            self.page
                .goto(url)
                .await
                .map_err(|e| SiftError::Navigation(format!("{url}: {e}")))?;
            Ok(())
        })
        .await
    }

    async fn evaluate(&self, script: &str, args: &[Value]) -> SiftResult<Value> {
        let params = EvaluateParams::builder()
            .expression(call_expression(script, args)?)
            .return_by_value(true)
            .await_promise(true)
            .build()
            .map_err(SiftError::Browser)?;
        let result = self
            .page
            .evaluate_expression(params)
            .await
            .map_err(browser_error)?;
        Ok(result.value().cloned().unwrap_or(Value::Null))
    }

    async fn click(&self, selector: &str) -> SiftResult<()> {
        let element = self
            .page
            .find_element(selector)
            .await
            .map_err(|_| SiftError::MissingElement(selector.to_string()))?;
        element.click().await.map_err(browser_error)?;
        Ok(())
    }

    async fn wait_for_selector(&self, selector: &str, visible: bool) -> SiftResult<()> {
        self.bounded(selector, async {
            loop {
                let ready = self
                    .evaluate(scripts::ELEMENT_READY, &[json!(selector), json!(visible)])
                    .await?;
                if ready.as_bool().unwrap_or(false) {
                    return Ok(());
                }
                tokio::time::sleep(Duration::from_millis(POLL_INTERVAL_MS)).await;
            }
        })
        .await
    }

    async fn wait_for_navigation(&self) -> SiftResult<()> {
        self.bounded("navigation", async {
            self.page
                .wait_for_navigation()
                .await
                .map_err(|e| SiftError::Navigation(e.to_string()))?;
            Ok(())
        })
        .await
    }

    async fn wait(&self, ms: u64) -> SiftResult<()> {
        tokio::time::sleep(Duration::from_millis(ms)).await;
        Ok(())
    }
}
