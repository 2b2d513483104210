//! Application Insights telemetry for a host web application.
//!
//! [`Telemetry::setup`] returns a context value which the host keeps and passes to the places that
//! record telemetry. A context built without a connection string, or whose setup failed, is
//! disabled: every operation on it is a local no-op and the host keeps running.
//!
//! ```no_run
//! use hazard_points::telemetry::{RequestInfo, Telemetry, TelemetryConfig};
//!
//! let telemetry = Telemetry::setup(&TelemetryConfig::from_env());
//! let request = RequestInfo::new("GET", "/collections").with_endpoint("collections");
//! let _body = telemetry.instrument(&request, || ("[]".to_string(), 200));
//! telemetry.log_user_interaction("list_collections", None);
//! ```
pub mod connection_string;
pub mod envelope;
pub mod logger;
pub mod sampler;
pub mod sink;
pub mod tracer;

use serde_json::Value;
use std::{collections::HashMap, env, fmt, sync::Arc, time::Duration};

use self::{
    connection_string::ConnectionString,
    envelope::EnvelopeContext,
    logger::InsightsLogger,
    sampler::ProbabilitySampler,
    sink::{IngestionSink, TelemetrySink},
};
pub use self::tracer::{before_request, RequestInfo, RequestSpan, RequestTracer};

pub const CONNECTION_STRING_ENV: &str = "APPLICATIONINSIGHTS_CONNECTION_STRING";
pub const DEFAULT_SAMPLING_RATE: f64 = 0.1;
pub const DEFAULT_CLOUD_ROLE: &str = "hazard_points";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, PartialEq)]
pub struct TelemetryConfig {
    /// Telemetry is disabled if this is `None`.
    pub connection_string: Option<String>,
    /// Fraction of requests whose spans are exported.
    pub sampling_rate: f64,
    pub cloud_role: String,
    pub timeout: Duration,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            connection_string: None,
            sampling_rate: DEFAULT_SAMPLING_RATE,
            cloud_role: DEFAULT_CLOUD_ROLE.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl TelemetryConfig {
    /// Default config with the connection string taken from the environment. An empty value counts
    /// as unset.
    pub fn from_env() -> Self {
        Self {
            connection_string: env::var(CONNECTION_STRING_ENV)
                .ok()
                .filter(|value| !value.trim().is_empty()),
            ..Default::default()
        }
    }
}

struct EnabledTelemetry {
    tracer: RequestTracer,
    logger: InsightsLogger,
}

/// Handle to the configured telemetry. Cheap to clone.
#[derive(Clone, Default)]
pub struct Telemetry {
    enabled: Option<Arc<EnabledTelemetry>>,
}

impl Telemetry {
    pub fn disabled() -> Self {
        Self { enabled: None }
    }

    /// Set up telemetry shipping to the ingestion endpoint of the configured connection string.
    ///
    /// Never fails: a missing connection string or a setup error yields a disabled context.
    pub fn setup(config: &TelemetryConfig) -> Self {
        let connection_string = match config.connection_string.as_deref() {
            Some(connection_string) => connection_string,
            None => {
                log::info!(
                    "Application Insights not configured - {} not set",
                    CONNECTION_STRING_ENV
                );
                return Self::disabled();
            }
        };

        log::info!("Setting up Application Insights");
        match Self::try_setup(connection_string, config) {
            Ok(telemetry) => {
                log::info!("Application Insights configured successfully");
                telemetry
            }
            Err(err) => {
                log::error!("Failed to setup Application Insights: {:?}", err);
                Self::disabled()
            }
        }
    }

    fn try_setup(connection_string: &str, config: &TelemetryConfig) -> anyhow::Result<Self> {
        let connection_string: ConnectionString = connection_string.parse()?;
        log::debug!("Using {:?}", connection_string);
        let sink = IngestionSink::new(&connection_string, config.timeout)?;
        Self::with_sink(Arc::new(sink), &connection_string.instrumentation_key, config)
    }

    /// Enabled telemetry shipping to a caller provided sink. The connection string of `config` is
    /// not used.
    pub fn with_sink(
        sink: Arc<dyn TelemetrySink>,
        instrumentation_key: &str,
        config: &TelemetryConfig,
    ) -> anyhow::Result<Self> {
        let sampler = ProbabilitySampler::new(config.sampling_rate)?;
        let context = EnvelopeContext {
            instrumentation_key: instrumentation_key.to_string(),
            cloud_role: config.cloud_role.clone(),
        };
        Ok(Self {
            enabled: Some(Arc::new(EnabledTelemetry {
                tracer: RequestTracer::new(sampler, sink.clone(), context.clone()),
                logger: InsightsLogger::new(sink, context),
            })),
        })
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.is_some()
    }

    pub fn tracer(&self) -> Option<&RequestTracer> {
        self.enabled.as_ref().map(|enabled| &enabled.tracer)
    }

    /// Handle a request within a span: start it, annotate it, run `handler` and export the span
    /// with the status code the handler returned.
    pub fn instrument<R>(&self, request: &RequestInfo, handler: impl FnOnce() -> (R, u16)) -> R {
        let mut span = self.tracer().map(|tracer| tracer.start_span(request));
        before_request(span.as_mut(), request);
        let (response, status_code) = handler();
        if let (Some(tracer), Some(span)) = (self.tracer(), span) {
            tracer.finish_span(span, status_code);
        }
        response
    }

    /// Record a user action with optional details of any JSON type. A no-op apart from a local
    /// notice if telemetry is disabled.
    pub fn log_user_interaction(&self, action: &str, details: Option<&HashMap<String, Value>>) {
        match &self.enabled {
            Some(enabled) => enabled.logger.user_interaction(action, details),
            None => log::info!("Telemetry not initialized, skipping interaction log"),
        }
    }
}

impl fmt::Debug for Telemetry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Telemetry")
            .field("enabled", &self.is_enabled())
            .finish()
    }
}
