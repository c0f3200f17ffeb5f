//! View state for the weather screen.
//!
//! The model owns the latest issued sequence number. A result is applied only
//! when it answers the most recent submission, so a slow, older query can
//! never overwrite a newer one.

use std::sync::Arc;

use citycast_weather::{QueryError, WeatherReport};

use crate::services::WeatherServiceMessage;

/// What the screen shows. Replaced wholesale on every transition.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum ViewState {
    #[default]
    Idle,
    Loading {
        seq: u64,
        city: String,
    },
    Ready {
        seq: u64,
        report: Arc<WeatherReport>,
    },
    Failed {
        seq: u64,
        city: String,
        error: QueryError,
    },
}

#[derive(Debug, Default)]
pub struct WeatherModel {
    latest_seq: u64,
    state: ViewState,
}

impl WeatherModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn latest_seq(&self) -> u64 {
        self.latest_seq
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, ViewState::Loading { .. })
    }

    /// The report on screen, if any.
    pub fn report(&self) -> Option<&WeatherReport> {
        match &self.state {
            ViewState::Ready { report, .. } => Some(report.as_ref()),
            _ => None,
        }
    }

    /// Start a query for `city`.
    ///
    /// Blank input is a no-op and returns `None`. Otherwise the returned
    /// sequence number must accompany the request so its result can be matched.
    pub fn submit(&mut self, city: &str) -> Option<u64> {
        let city = city.trim();
        if city.is_empty() {
            return None;
        }

        self.latest_seq += 1;
        self.state = ViewState::Loading {
            seq: self.latest_seq,
            city: city.to_string(),
        };
        tracing::debug!("Submitted query #{} for {:?}", self.latest_seq, city);
        Some(self.latest_seq)
    }

    /// Apply a service message. Returns false when the message was stale.
    pub fn apply(&mut self, message: WeatherServiceMessage) -> bool {
        match message {
            WeatherServiceMessage::FetchDone { seq, city, result } => {
                if seq != self.latest_seq {
                    tracing::debug!(
                        "Ignoring stale result #{} for {:?} (latest is #{})",
                        seq,
                        city,
                        self.latest_seq
                    );
                    return false;
                }

                self.state = match result {
                    Ok(report) => {
                        tracing::info!("Weather ready for {}", report.current.location_name);
                        ViewState::Ready {
                            seq,
                            report: Arc::new(report),
                        }
                    }
                    Err(error) => {
                        tracing::error!("Failed to fetch weather for {:?}: {}", city, error);
                        ViewState::Failed { seq, city, error }
                    }
                };
                true
            }
        }
    }
}
