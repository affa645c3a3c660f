//! HTTP RPC sender implementation.

use std::{
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc, RwLock,
    },
    time::{Duration, Instant},
};

use backon::{DefaultSleeper, Sleeper};
use reqwest::{header, StatusCode};
use solana_rpc_client_api::{
    client_error, custom_error,
    error_object::RpcErrorObject,
    request::{RpcError, RpcResponseErrorData},
};

use super::{RpcSender, RpcTransportStats};

/// HTTP RPC sender implementation.
pub struct HttpRpcSender {
    client: Arc<reqwest::Client>,
    url: String,
    timeout: Duration,
    request_id: AtomicU64,
    stats: RwLock<RpcTransportStats>,
    // Use backon::DefaultSleeper for cross-platform sleep.
    sleeper: DefaultSleeper,
}

impl HttpRpcSender {
    /// Default timeout of a single request.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

    /// Create an HTTP RPC sender with default reqwest client.
    pub fn new(url: impl ToString) -> Self {
        Self::new_with_client(url, Default::default())
    }

    /// Create an HTTP RPC sender.
    pub fn new_with_client(url: impl ToString, client: reqwest::Client) -> Self {
        Self {
            client: Arc::new(client),
            url: url.to_string(),
            timeout: Self::DEFAULT_TIMEOUT,
            request_id: Default::default(),
            stats: Default::default(),
            sleeper: DefaultSleeper::default(),
        }
    }

    /// Set the timeout applied to every request.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Create default headers used by HTTP sender.
    pub fn default_headers() -> header::HeaderMap {
        header::HeaderMap::new()
    }
}

struct StatsUpdater<'a> {
    stats: &'a RwLock<RpcTransportStats>,
    request_start_time: Instant,
    rate_limited_time: Duration,
}

impl<'a> StatsUpdater<'a> {
    fn new(stats: &'a RwLock<RpcTransportStats>) -> Self {
        Self {
            stats,
            request_start_time: Instant::now(),
            rate_limited_time: Duration::default(),
        }
    }

    fn add_rate_limited_time(&mut self, duration: Duration) {
        self.rate_limited_time += duration;
    }
}

impl Drop for StatsUpdater<'_> {
    fn drop(&mut self) {
        let Ok(mut stats) = self.stats.write() else {
            return;
        };
        stats.request_count += 1;
        stats.elapsed_time += Instant::now().duration_since(self.request_start_time);
        stats.rate_limited_time += self.rate_limited_time;
    }
}

impl RpcSender for HttpRpcSender {
    async fn send(
        &self,
        request: super::RpcRequest,
        params: serde_json::Value,
    ) -> crate::Result<serde_json::Value> {
        let mut stats_updater = StatsUpdater::new(&self.stats);

        let request_id = self.request_id.fetch_add(1, Ordering::Relaxed);
        let request_json = request.build_request_json(request_id, params).to_string();

        let mut too_many_requests_retries = 5;
        loop {
            let response = {
                let client = self.client.clone();
                let request_json = request_json.clone();
                client
                    .post(&self.url)
                    .header(header::CONTENT_TYPE, "application/json")
                    .timeout(self.timeout)
                    .body(request_json)
                    .send()
                    .await
            }?;

            if !response.status().is_success() {
                if response.status() == StatusCode::TOO_MANY_REQUESTS
                    && too_many_requests_retries > 0
                {
                    let mut duration = Duration::from_millis(500);
                    if let Some(retry_after) = response.headers().get(header::RETRY_AFTER) {
                        if let Ok(retry_after) = retry_after.to_str() {
                            if let Ok(retry_after) = retry_after.parse::<u64>() {
                                if retry_after < 120 {
                                    duration = Duration::from_secs(retry_after);
                                }
                            }
                        }
                    }

                    too_many_requests_retries -= 1;
                    tracing::debug!(
                        "Too many requests: server responded with {:?}, {} retries left, pausing for {:?}",
                        response, too_many_requests_retries, duration
                    );

                    self.sleeper.sleep(duration).await;
                    stats_updater.add_rate_limited_time(duration);
                    continue;
                }
                let status = response.status();
                return Err(match response.error_for_status() {
                    Err(err) => err.into(),
                    Ok(_) => crate::Error::custom(format!("unexpected http status: {status}")),
                });
            }

            let mut json = response.json::<serde_json::Value>().await?;
            if json["error"].is_object() {
                return match serde_json::from_value::<RpcErrorObject>(json["error"].clone()) {
                    Ok(rpc_error_object) => {
                        let data = match rpc_error_object.code {
                            custom_error::JSON_RPC_SERVER_ERROR_NODE_UNHEALTHY => {
                                match serde_json::from_value::<custom_error::NodeUnhealthyErrorData>(
                                    json["error"]["data"].clone(),
                                ) {
                                    Ok(custom_error::NodeUnhealthyErrorData {
                                        num_slots_behind,
                                    }) => RpcResponseErrorData::NodeUnhealthy { num_slots_behind },
                                    Err(_err) => RpcResponseErrorData::Empty,
                                }
                            }
                            _ => RpcResponseErrorData::Empty,
                        };

                        Err(client_error::Error::from(RpcError::RpcResponseError {
                            code: rpc_error_object.code,
                            message: rpc_error_object.message,
                            data,
                        })
                        .into())
                    }
                    Err(err) => Err(client_error::Error::from(RpcError::RpcRequestError(format!(
                        "Failed to deserialize RPC error response: {} [{}]",
                        json["error"], err
                    )))
                    .into()),
                };
            }
            return Ok(json["result"].take());
        }
    }

    fn get_transport_stats(&self) -> RpcTransportStats {
        self.stats
            .read()
            .map(|stats| stats.clone())
            .unwrap_or_default()
    }

    fn url(&self) -> String {
        self.url.clone()
    }
}
