//! Weather backend: async city queries.
//! Each query is tagged with the sequence number the model issued for it.
//! Starting a query cancels the one still in flight.

use std::sync::Arc;

use citycast_weather::{QueryError, WeatherProvider, WeatherReport};
use parking_lot::Mutex;
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Messages sent from async operations back to the input loop
#[derive(Debug)]
pub enum WeatherServiceMessage {
    /// Result of a city query
    FetchDone {
        seq: u64,
        city: String,
        result: Result<WeatherReport, QueryError>,
    },
}

#[derive(Debug)]
pub struct WeatherService {
    provider: Arc<WeatherProvider>,
    runtime: Handle,
    tx: mpsc::UnboundedSender<WeatherServiceMessage>,
    inflight: Mutex<Option<CancellationToken>>,
}

impl WeatherService {
    /// Create a service spawning on `runtime`, plus the receiving end for its results.
    pub fn new(
        provider: WeatherProvider,
        runtime: Handle,
    ) -> (Self, mpsc::UnboundedReceiver<WeatherServiceMessage>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let service = Self {
            provider: Arc::new(provider),
            runtime,
            tx,
            inflight: Mutex::new(None),
        };
        (service, rx)
    }

    /// Request a query for `city` tagged with `seq`.
    ///
    /// Sends `FetchDone` on the channel when complete, unless a newer request
    /// cancelled this one first.
    pub fn request_fetch(&self, seq: u64, city: String) -> JoinHandle<()> {
        let token = CancellationToken::new();
        if let Some(previous) = self.inflight.lock().replace(token.clone()) {
            previous.cancel();
        }

        let provider = self.provider.clone();
        let tx = self.tx.clone();

        self.runtime.spawn(async move {
            let query_city = city.clone();
            tokio::select! {
                _ = token.cancelled() => {
                    tracing::debug!("Query #{} for {:?} cancelled", seq, city);
                }
                result = provider.query(&query_city) => {
                    if let Err(e) = &result {
                        tracing::warn!("Query #{} for {:?} failed: {}", seq, city, e);
                    }
                    if tx.send(WeatherServiceMessage::FetchDone { seq, city, result }).is_err() {
                        tracing::debug!("Query #{} finished after the receiver closed", seq);
                    }
                }
            }
        })
    }

    /// Cancel the in-flight query, if any.
    pub fn cancel_inflight(&self) {
        if let Some(token) = self.inflight.lock().take() {
            token.cancel();
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
    use super::*;
    use citycast_weather::ProviderSettings;

    fn unreachable_provider() -> WeatherProvider {
        WeatherProvider::new(ProviderSettings::new("k").with_base_url("http://127.0.0.1:1"))
            .unwrap()
    }

    #[tokio::test]
    async fn test_blank_city_reports_empty_city() {
        let (service, mut rx) = WeatherService::new(unreachable_provider(), Handle::current());

        service.request_fetch(1, "  ".to_string()).await.unwrap();

        match rx.recv().await {
            Some(WeatherServiceMessage::FetchDone { seq, result, .. }) => {
                assert_eq!(seq, 1);
                assert_eq!(result, Err(QueryError::EmptyCity));
            }
            None => panic!("channel closed"),
        }
    }

    #[tokio::test]
    async fn test_cancel_inflight_suppresses_result() {
        let (service, mut rx) = WeatherService::new(unreachable_provider(), Handle::current());

        let handle = service.request_fetch(1, "Paris".to_string());
        service.cancel_inflight();
        handle.await.unwrap();

        // Either the token won, or the query failed before cancellation; never a success.
        if let Ok(WeatherServiceMessage::FetchDone { result, .. }) = rx.try_recv() {
            assert!(result.is_err());
        }
    }
}
