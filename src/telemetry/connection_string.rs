use anyhow::anyhow;
use std::str::FromStr;

pub const DEFAULT_INGESTION_ENDPOINT: &str = "https://dc.services.visualstudio.com";

/// Parsed Application Insights connection string, e.g.
/// `InstrumentationKey=...;IngestionEndpoint=https://westeurope-5.in.applicationinsights.azure.com/`.
#[derive(Clone, PartialEq, Eq)]
pub struct ConnectionString {
    pub instrumentation_key: String,
    /// Base URL of the ingestion service, without trailing slash.
    pub ingestion_endpoint: String,
}

impl ConnectionString {
    pub fn track_url(&self) -> String {
        format!("{}/v2/track", self.ingestion_endpoint)
    }
}

impl FromStr for ConnectionString {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> anyhow::Result<Self> {
        let mut instrumentation_key = None;
        let mut ingestion_endpoint = None;
        for segment in value.split(';').map(str::trim).filter(|s| !s.is_empty()) {
            let (key, value) = segment
                .split_once('=')
                .ok_or_else(|| anyhow!("Connection string segment is not a Key=Value pair"))?;
            // Keys are case insensitive, unknown keys such as LiveEndpoint are ignored.
            match key.trim().to_ascii_lowercase().as_str() {
                "instrumentationkey" => instrumentation_key = Some(value.trim().to_string()),
                "ingestionendpoint" => {
                    ingestion_endpoint = Some(value.trim().trim_end_matches('/').to_string())
                }
                _ => {}
            }
        }
        let instrumentation_key = instrumentation_key
            .filter(|key| !key.is_empty())
            .ok_or_else(|| anyhow!("Connection string has no InstrumentationKey"))?;
        let ingestion_endpoint = ingestion_endpoint
            .filter(|endpoint| !endpoint.is_empty())
            .unwrap_or_else(|| DEFAULT_INGESTION_ENDPOINT.to_string());
        Ok(Self {
            instrumentation_key,
            ingestion_endpoint,
        })
    }
}

// The instrumentation key is a credential, keep it out of logs.
impl std::fmt::Debug for ConnectionString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionString")
            .field("instrumentation_key", &"<redacted>")
            .field("ingestion_endpoint", &self.ingestion_endpoint)
            .finish()
    }
}
