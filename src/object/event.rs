use serde::{Deserialize, Serialize};

/// Category of a game event; the payload is interpreted by the event pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    SwitchStage,
    ShowGuiMessage,
    ShowGuiEffect,
    ToggleDoor,
    TimeDelay,
    CastExplosion,
    Custom,
}

/// Opaque event fired by interacting with or destroying an object.
/// The core only stores events and hands them out in order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub kind: EventKind,
    #[serde(default)]
    pub payload: serde_json::Value,
}

impl Event {
    pub fn new(kind: EventKind) -> Self {
        Self {
            kind,
            payload: serde_json::Value::Null,
        }
    }

    pub fn with_payload(kind: EventKind, payload: serde_json::Value) -> Self {
        Self { kind, payload }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_payload_defaults_to_null() {
        let event: Event = serde_json::from_str(r#"{ "kind": "ToggleDoor" }"#).unwrap();
        assert_eq!(event, Event::new(EventKind::ToggleDoor));

        let message = Event::with_payload(
            EventKind::ShowGuiMessage,
            serde_json::json!({ "text": "The door is locked." }),
        );
        assert_eq!(message.payload["text"], "The door is locked.");
    }
}
