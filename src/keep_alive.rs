// Background self-ping that keeps a sleeping host awake.

use std::time::Duration;

use reqwest::StatusCode;
use tokio::task::JoinHandle;

use crate::metrics;

/// Send one GET to `url` and record the outcome.
pub async fn ping_once(client: &reqwest::Client, url: &str) -> Result<StatusCode, reqwest::Error> {
    match client.get(url).send().await {
        Ok(resp) => {
            let status = resp.status();
            metrics::KEEPALIVE_PINGS_TOTAL
                .with_label_values(&["outbound", status.as_str()])
                .inc();
            tracing::debug!(%status, "self-ping answered");
            Ok(status)
        }
        Err(e) => {
            metrics::KEEPALIVE_PINGS_TOTAL
                .with_label_values(&["outbound", "error"])
                .inc();
            tracing::debug!("self-ping failed: {e}");
            Err(e)
        }
    }
}

/// Spawn a task that pings `url` immediately and then once per `interval`.
///
/// Failures are logged and the loop keeps going.
pub fn spawn_self_ping(url: String, interval: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let client = match reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
        {
            Ok(client) => client,
            Err(e) => {
                tracing::warn!("keep-alive disabled, could not build HTTP client: {e}");
                return;
            }
        };

        tracing::info!(%url, interval_secs = interval.as_secs(), "keep-alive started");
        loop {
            let _ = ping_once(&client, &url).await;
            tokio::time::sleep(interval).await;
        }
    })
}
