use chrono::{DateTime, Utc};
use metrics_exporter_prometheus::PrometheusHandle;
use polls::error::AppError;
use polls::polls::{InMemoryPollRepository, PollFixture};
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::warn;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Build the store, seeded from `fixture` when one is given.
pub(crate) fn load_repository(fixture: Option<&Path>) -> Result<InMemoryPollRepository, AppError> {
    match fixture {
        Some(path) => Ok(PollFixture::from_path(path)?.into_repository()?),
        None => {
            warn!("no poll fixture configured; starting with an empty store");
            Ok(InMemoryPollRepository::new())
        }
    }
}

pub(crate) fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(raw.trim())
        .map(|value| value.with_timezone(&Utc))
        .map_err(|err| format!("failed to parse '{raw}' as an RFC 3339 timestamp ({err})"))
}
