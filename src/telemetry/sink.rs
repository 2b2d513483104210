use anyhow::{anyhow, Context};
use std::time::Duration;

use super::{connection_string::ConnectionString, envelope::Envelope};

/// Destination of telemetry envelopes.
pub trait TelemetrySink: Send + Sync {
    fn send(&self, envelopes: &[Envelope]) -> anyhow::Result<()>;
}

/// Ships envelopes to the ingestion endpoint of a connection string.
///
/// Uses a blocking HTTP client, so it must not be driven from within an async runtime.
pub struct IngestionSink {
    client: reqwest::blocking::Client,
    track_url: String,
}

impl IngestionSink {
    pub fn new(connection_string: &ConnectionString, timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(concat!("hazard_points/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .context("Building telemetry HTTP client")?;
        Ok(Self {
            client,
            track_url: connection_string.track_url(),
        })
    }
}

impl TelemetrySink for IngestionSink {
    fn send(&self, envelopes: &[Envelope]) -> anyhow::Result<()> {
        let response = self
            .client
            .post(&self.track_url)
            .json(envelopes)
            .send()
            .with_context(|| format!("Sending {} envelopes to {}", envelopes.len(), self.track_url))?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(anyhow!("Ingestion endpoint returned {}: {}", status, body));
        }
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use anyhow::anyhow;
    use std::sync::{Arc, Mutex};

    use super::TelemetrySink;
    use crate::telemetry::envelope::Envelope;

    /// Keeps every envelope in memory.
    #[derive(Default, Clone)]
    pub struct RecordingSink {
        pub envelopes: Arc<Mutex<Vec<Envelope>>>,
    }

    impl RecordingSink {
        pub fn recorded(&self) -> Vec<Envelope> {
            self.envelopes.lock().unwrap().clone()
        }
    }

    impl TelemetrySink for RecordingSink {
        fn send(&self, envelopes: &[Envelope]) -> anyhow::Result<()> {
            self.envelopes.lock().unwrap().extend_from_slice(envelopes);
            Ok(())
        }
    }

    /// Fails every send, as an unreachable backend would.
    pub struct FailingSink;

    impl TelemetrySink for FailingSink {
        fn send(&self, _envelopes: &[Envelope]) -> anyhow::Result<()> {
            Err(anyhow!("connection refused"))
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{collections::BTreeMap, time::Duration};

    use super::{IngestionSink, TelemetrySink};
    use crate::telemetry::{
        connection_string::ConnectionString,
        envelope::{EnvelopeContext, SEVERITY_INFORMATION},
    };

    #[test]
    fn test_ingestion_sink_reports_unreachable_endpoint() {
        // Port 9 (discard) on localhost is not expected to accept HTTP.
        let connection_string: ConnectionString =
            "InstrumentationKey=ikey;IngestionEndpoint=http://127.0.0.1:9".parse().unwrap();
        let sink = IngestionSink::new(&connection_string, Duration::from_secs(2)).unwrap();
        let context = EnvelopeContext {
            instrumentation_key: "ikey".to_string(),
            cloud_role: "test".to_string(),
        };

        let envelope = context.message("hello", SEVERITY_INFORMATION, BTreeMap::new());
        assert!(sink.send(&[envelope]).is_err());
    }
}
