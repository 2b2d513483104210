use serde_json::Value;
use std::{
    collections::{BTreeMap, HashMap},
    sync::Arc,
};

use super::{
    envelope::{EnvelopeContext, SEVERITY_INFORMATION},
    sink::TelemetrySink,
};

pub const LOG_TARGET: &str = "hazard_insights";
pub const ACTION_DIMENSION: &str = "action";

/// Forwards log records to the telemetry sink, in addition to logging them locally.
pub struct InsightsLogger {
    sink: Arc<dyn TelemetrySink>,
    context: EnvelopeContext,
}

impl InsightsLogger {
    pub fn new(sink: Arc<dyn TelemetrySink>, context: EnvelopeContext) -> Self {
        Self { sink, context }
    }

    pub fn info(&self, message: &str, custom_dimensions: BTreeMap<String, String>) {
        log::info!(target: LOG_TARGET, "{}", message);
        let envelope = self
            .context
            .message(message, SEVERITY_INFORMATION, custom_dimensions);
        if let Err(err) = self.sink.send(&[envelope]) {
            log::warn!(target: LOG_TARGET, "Could not forward log record: {:?}", err);
        }
    }

    pub fn user_interaction(&self, action: &str, details: Option<&HashMap<String, Value>>) {
        self.info(
            &format!("User interaction: {}", action),
            user_interaction_dimensions(action, details),
        );
    }
}

/// `{action, ...details}`, a detail named `action` replaces the action itself.
///
/// Custom dimensions are strings on the wire: string details are taken as they are, any other value
/// is rendered as JSON, e.g. `42`, `true` or `[1,2]`.
pub fn user_interaction_dimensions(
    action: &str,
    details: Option<&HashMap<String, Value>>,
) -> BTreeMap<String, String> {
    let mut dimensions = BTreeMap::from([(ACTION_DIMENSION.to_string(), action.to_string())]);
    if let Some(details) = details {
        dimensions.extend(
            details
                .iter()
                .map(|(key, value)| (key.clone(), dimension_value(value))),
        );
    }
    dimensions
}

fn dimension_value(value: &Value) -> String {
    match value {
        Value::String(value) => value.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use serde_json::{json, Value};
    use std::collections::{BTreeMap, HashMap};

    use super::user_interaction_dimensions;

    #[test]
    fn test_dimensions_without_details() {
        assert_eq!(
            BTreeMap::from([("action".to_string(), "open_map".to_string())]),
            user_interaction_dimensions("open_map", None)
        );
    }

    #[test]
    fn test_dimensions_with_details() {
        let details = HashMap::from([
            ("layer".to_string(), json!("norway-points-layer")),
            ("action".to_string(), json!("overridden")),
        ]);
        let dimensions = user_interaction_dimensions("click_point", Some(&details));
        assert_eq!(2, dimensions.len());
        assert_eq!("overridden", dimensions["action"]);
        assert_eq!("norway-points-layer", dimensions["layer"]);
    }

    #[rstest]
    #[case(json!(42), "42")]
    #[case(json!(2.5), "2.5")]
    #[case(json!(true), "true")]
    #[case(json!(null), "null")]
    #[case(json!([10.75, 59.91]), "[10.75,59.91]")]
    #[case(json!({"zoom": 7}), "{\"zoom\":7}")]
    #[case(json!("plain text"), "plain text")]
    fn test_dimensions_with_non_string_details(#[case] value: Value, #[case] expected: &str) {
        let details = HashMap::from([("detail".to_string(), value)]);
        let dimensions = user_interaction_dimensions("zoom_map", Some(&details));
        assert_eq!(expected, dimensions["detail"]);
    }
}
