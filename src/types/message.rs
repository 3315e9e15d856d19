//! Inbound text message

use serde::{Deserialize, Serialize};

/// A text received from a member, as handed over by the delivery layer
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct TextMessage {
    /// Raw message body
    #[serde(default)]
    pub body: String,

    /// Sender phone number
    #[serde(rename = "phone-number", alias = "phone", default)]
    pub phone: String,

    /// Delivery id; identical across redeliveries of the same message
    #[serde(rename = "requestId", alias = "request_id", default)]
    pub request_id: String,
}

impl TextMessage {
    pub fn new(
        body: impl Into<String>,
        phone: impl Into<String>,
        request_id: impl Into<String>,
    ) -> Self {
        Self {
            body: body.into(),
            phone: phone.into(),
            request_id: request_id.into(),
        }
    }

    /// Body trimmed and lowercased, for keyword matching
    pub fn keyword(&self) -> String {
        self.body.trim().to_lowercase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_webhook_shape() {
        let msg: TextMessage = serde_json::from_str(
            r#"{"body": "Pray", "phone-number": "+11234567890", "requestId": "abc"}"#,
        )
        .unwrap();
        assert_eq!(msg.phone, "+11234567890");
        assert_eq!(msg.request_id, "abc");
        assert_eq!(msg.keyword(), "pray");
    }

    #[test]
    fn test_parse_short_phone_alias() {
        let msg: TextMessage =
            serde_json::from_str(r#"{"body": " HELP ", "phone": "555", "requestId": "1"}"#)
                .unwrap();
        assert_eq!(msg.phone, "555");
        assert_eq!(msg.keyword(), "help");
    }
}
