use std::{collections::BTreeMap, sync::Arc, time::Instant};

use uuid::Uuid;

use super::{
    envelope::{request_data, EnvelopeContext},
    sampler::ProbabilitySampler,
    sink::TelemetrySink,
};

pub const USER_AGENT_ATTRIBUTE: &str = "user_agent";
pub const REFERRER_ATTRIBUTE: &str = "referrer";
pub const API_ENDPOINT_ATTRIBUTE: &str = "api_endpoint";

/// The parts of an inbound request the shim looks at, extracted by the host application.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestInfo {
    pub method: String,
    pub url: String,
    /// Name of the handler the host routed the request to.
    pub endpoint: Option<String>,
    pub user_agent: Option<String>,
    pub referrer: Option<String>,
}

impl RequestInfo {
    pub fn new(method: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            url: url.into(),
            ..Default::default()
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    pub fn with_referrer(mut self, referrer: impl Into<String>) -> Self {
        self.referrer = Some(referrer.into());
        self
    }
}

/// Span covering the handling of one request.
#[derive(Debug)]
pub struct RequestSpan {
    trace_id: Uuid,
    span_id: String,
    name: String,
    url: String,
    sampled: bool,
    started: Instant,
    attributes: BTreeMap<String, String>,
}

impl RequestSpan {
    pub fn trace_id(&self) -> &Uuid {
        &self.trace_id
    }

    pub fn is_sampled(&self) -> bool {
        self.sampled
    }

    pub fn attributes(&self) -> &BTreeMap<String, String> {
        &self.attributes
    }

    pub fn add_attribute(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.attributes.insert(key.into(), value.into());
    }
}

/// Annotate the active request span with request metadata.
///
/// Does nothing if there is no active span, e.g. because telemetry is disabled.
pub fn before_request(span: Option<&mut RequestSpan>, request: &RequestInfo) {
    if let Some(span) = span {
        span.add_attribute(
            USER_AGENT_ATTRIBUTE,
            request.user_agent.as_deref().unwrap_or(""),
        );
        span.add_attribute(REFERRER_ATTRIBUTE, request.referrer.as_deref().unwrap_or(""));
        span.add_attribute(
            API_ENDPOINT_ATTRIBUTE,
            request.endpoint.as_deref().unwrap_or("unknown"),
        );
    }
}

/// Creates request spans and exports the sampled ones.
pub struct RequestTracer {
    sampler: ProbabilitySampler,
    sink: Arc<dyn TelemetrySink>,
    context: EnvelopeContext,
}

impl RequestTracer {
    pub fn new(
        sampler: ProbabilitySampler,
        sink: Arc<dyn TelemetrySink>,
        context: EnvelopeContext,
    ) -> Self {
        Self {
            sampler,
            sink,
            context,
        }
    }

    pub fn sampler(&self) -> &ProbabilitySampler {
        &self.sampler
    }

    pub fn start_span(&self, request: &RequestInfo) -> RequestSpan {
        let trace_id = Uuid::new_v4();
        let span_id = Uuid::new_v4().simple().to_string()[..16].to_string();
        RequestSpan {
            sampled: self.sampler.should_sample(&trace_id),
            trace_id,
            span_id,
            name: format!("{} {}", request.method, request.url),
            url: request.url.clone(),
            started: Instant::now(),
            attributes: BTreeMap::new(),
        }
    }

    /// End the span and export it if it was sampled. Export failures are logged, not returned.
    pub fn finish_span(&self, span: RequestSpan, status_code: u16) {
        if !span.sampled {
            return;
        }
        let operation_id = span.trace_id.simple().to_string();
        let envelope = self.context.request(
            &operation_id,
            request_data(
                span.span_id,
                span.name,
                span.url,
                span.started.elapsed(),
                status_code,
                span.attributes,
            ),
        );
        if let Err(err) = self.sink.send(&[envelope]) {
            log::warn!("Could not export request span: {:?}", err);
        }
    }
}
