use chrono::NaiveDateTime;
use std::fmt;

const PREVIEW_CHARS: usize = 40;

/// Inbound message as received from the broker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MQTTMessage {
    topic: String,
    content: String,
    timestamp: NaiveDateTime,
}

impl fmt::Display for MQTTMessage {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let preview: String = self.content.chars().take(PREVIEW_CHARS).collect();
        write!(f, "{} - {}: {}", self.timestamp, self.topic, preview)
    }
}

impl MQTTMessage {
    pub fn from_topic(topic: String, content: String) -> Self {
        MQTTMessage {
            topic,
            content,
            timestamp: chrono::Local::now().naive_local(),
        }
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn timestamp(&self) -> NaiveDateTime {
        self.timestamp
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_truncates_long_content() {
        let content = "x".repeat(100);
        let message = MQTTMessage::from_topic("zigbee2mqtt/styrbar".to_string(), content);
        let rendered = message.to_string();
        assert!(rendered.ends_with(&"x".repeat(PREVIEW_CHARS)));
        assert!(!rendered.contains(&"x".repeat(PREVIEW_CHARS + 1)));
    }

    #[test]
    fn test_display_short_content() {
        let message =
            MQTTMessage::from_topic("zigbee2mqtt/styrbar".to_string(), r#"{"action":"on"}"#.to_string());
        assert!(message.to_string().ends_with(r#"zigbee2mqtt/styrbar: {"action":"on"}"#));
    }
}
