//! Page controller abstraction over the browser driver.
//!
//! The pipeline never touches a live DOM. Every query is a JavaScript function
//! source (see [`crate::scripts`]) that the controller evaluates in the current
//! page with JSON arguments, returning JSON.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::types::SiftResult;

/// A single browser tab the pipeline can drive.
///
/// Implementations own the browser lifecycle; the pipeline only navigates,
/// queries, clicks and waits.
#[async_trait]
pub trait PageController: Send + Sync {
    /// Load a URL in the tab.
    async fn navigate(&self, url: &str) -> SiftResult<()>;

    /// Call a JavaScript function source with the given arguments and return
    /// its JSON-serializable result.
    async fn evaluate(&self, script: &str, args: &[Value]) -> SiftResult<Value>;

    /// Click the first element matching `selector`.
    async fn click(&self, selector: &str) -> SiftResult<()>;

    /// Wait until an element matching `selector` exists, and is visible when
    /// `visible` is set.
    async fn wait_for_selector(&self, selector: &str, visible: bool) -> SiftResult<()>;

    /// Wait for the in-flight navigation to finish.
    async fn wait_for_navigation(&self) -> SiftResult<()>;

    /// Suspend for `duration_ms` milliseconds.
    async fn wait(&self, duration_ms: u64) -> SiftResult<()>;
}

/// Evaluate a script and decode its result into `T`.
pub async fn evaluate_as<T: DeserializeOwned>(
    page: &dyn PageController,
    script: &str,
    args: &[Value],
) -> SiftResult<T> {
    let value = page.evaluate(script, args).await?;
    Ok(serde_json::from_value(value)?)
}
