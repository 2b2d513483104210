use chrono::{DateTime, Utc};
use serde::Serialize;
use std::{collections::BTreeMap, time::Duration};

pub const MESSAGE_ENVELOPE_NAME: &str = "Microsoft.ApplicationInsights.Message";
pub const REQUEST_ENVELOPE_NAME: &str = "Microsoft.ApplicationInsights.Request";

/// Severity level of an Information trace.
pub const SEVERITY_INFORMATION: u8 = 1;

const DATA_VERSION: u8 = 2;

/// Unit of telemetry accepted by the ingestion endpoint.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Envelope {
    pub name: String,
    pub time: DateTime<Utc>,
    #[serde(rename = "iKey")]
    pub instrumentation_key: String,
    pub tags: BTreeMap<String, String>,
    pub data: Data,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(tag = "baseType", content = "baseData")]
pub enum Data {
    #[serde(rename = "MessageData")]
    Message(MessageData),
    #[serde(rename = "RequestData")]
    Request(RequestData),
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MessageData {
    pub ver: u8,
    pub message: String,
    pub severity_level: u8,
    pub properties: BTreeMap<String, String>,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RequestData {
    pub ver: u8,
    pub id: String,
    pub name: String,
    pub duration: String,
    pub response_code: String,
    pub success: bool,
    pub url: String,
    pub properties: BTreeMap<String, String>,
}

/// Fields shared by all envelopes sent by one telemetry setup.
#[derive(Debug, Clone)]
pub struct EnvelopeContext {
    pub instrumentation_key: String,
    pub cloud_role: String,
}

impl EnvelopeContext {
    pub fn message(
        &self,
        message: impl Into<String>,
        severity_level: u8,
        properties: BTreeMap<String, String>,
    ) -> Envelope {
        self.envelope(
            MESSAGE_ENVELOPE_NAME,
            None,
            Data::Message(MessageData {
                ver: DATA_VERSION,
                message: message.into(),
                severity_level,
                properties,
            }),
        )
    }

    pub fn request(&self, operation_id: &str, request: RequestData) -> Envelope {
        self.envelope(REQUEST_ENVELOPE_NAME, Some(operation_id), Data::Request(request))
    }

    fn envelope(&self, name: &str, operation_id: Option<&str>, data: Data) -> Envelope {
        let mut tags = BTreeMap::new();
        tags.insert("ai.cloud.role".to_string(), self.cloud_role.clone());
        if let Some(operation_id) = operation_id {
            tags.insert("ai.operation.id".to_string(), operation_id.to_string());
        }
        Envelope {
            name: name.to_string(),
            time: Utc::now(),
            instrumentation_key: self.instrumentation_key.clone(),
            tags,
            data,
        }
    }
}

pub fn request_data(
    id: String,
    name: String,
    url: String,
    duration: Duration,
    status_code: u16,
    properties: BTreeMap<String, String>,
) -> RequestData {
    RequestData {
        ver: DATA_VERSION,
        id,
        name,
        duration: format_duration(duration),
        response_code: status_code.to_string(),
        success: status_code < 400,
        url,
        properties,
    }
}

/// Format a duration as `d.hh:mm:ss.ffffff`, the timespan format of the ingestion schema.
pub fn format_duration(duration: Duration) -> String {
    let total_seconds = duration.as_secs();
    let days = total_seconds / 86_400;
    let hours = (total_seconds / 3_600) % 24;
    let minutes = (total_seconds / 60) % 60;
    let seconds = total_seconds % 60;
    format!(
        "{}.{:02}:{:02}:{:02}.{:06}",
        days,
        hours,
        minutes,
        seconds,
        duration.subsec_micros()
    )
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use serde_json::json;
    use std::{collections::BTreeMap, time::Duration};

    use super::{format_duration, request_data, EnvelopeContext, SEVERITY_INFORMATION};

    fn context() -> EnvelopeContext {
        EnvelopeContext {
            instrumentation_key: "ikey".to_string(),
            cloud_role: "hazard_points".to_string(),
        }
    }

    #[rstest]
    #[case(Duration::ZERO, "0.00:00:00.000000")]
    #[case(Duration::from_millis(1500), "0.00:00:01.500000")]
    #[case(Duration::from_micros(123), "0.00:00:00.000123")]
    #[case(Duration::from_secs(86_400 + 3_600 + 60 + 1), "1.01:01:01.000000")]
    #[case(Duration::from_secs(59 * 60 + 59), "0.00:59:59.000000")]
    fn test_format_duration(#[case] duration: Duration, #[case] expected: &str) {
        assert_eq!(expected, format_duration(duration));
    }

    #[test]
    fn test_message_envelope_json() {
        let properties = BTreeMap::from([("action".to_string(), "zoom".to_string())]);
        let envelope = context().message("User interaction: zoom", SEVERITY_INFORMATION, properties);

        let value = serde_json::to_value(&envelope).unwrap();
        assert_eq!("Microsoft.ApplicationInsights.Message", value["name"]);
        assert_eq!("ikey", value["iKey"]);
        assert_eq!("hazard_points", value["tags"]["ai.cloud.role"]);
        assert_eq!(
            json!({
                "baseType": "MessageData",
                "baseData": {
                    "ver": 2,
                    "message": "User interaction: zoom",
                    "severityLevel": 1,
                    "properties": {"action": "zoom"},
                },
            }),
            value["data"]
        );
        assert!(value["time"].is_string());
    }

    #[rstest]
    #[case(200, true)]
    #[case(302, true)]
    #[case(404, false)]
    #[case(500, false)]
    fn test_request_envelope_json(#[case] status_code: u16, #[case] success: bool) {
        let request = request_data(
            "0123456789abcdef".to_string(),
            "GET /collections".to_string(),
            "http://localhost:5000/collections".to_string(),
            Duration::from_millis(20),
            status_code,
            BTreeMap::new(),
        );
        let envelope = context().request("trace", request);

        let value = serde_json::to_value(&envelope).unwrap();
        assert_eq!("Microsoft.ApplicationInsights.Request", value["name"]);
        assert_eq!("trace", value["tags"]["ai.operation.id"]);
        assert_eq!("RequestData", value["data"]["baseType"]);
        let base_data = &value["data"]["baseData"];
        assert_eq!(status_code.to_string(), base_data["responseCode"]);
        assert_eq!(success, base_data["success"]);
        assert_eq!("0.00:00:00.020000", base_data["duration"]);
        assert_eq!("GET /collections", base_data["name"]);
    }
}
