//! NIP-01 relay wire messages

use crate::error::{Error, Result};
use crate::event::Event;
use serde_json::Value;

/// Messages sent to a relay
#[derive(Debug, Clone, Copy)]
pub enum ClientMessage<'a> {
    /// `["EVENT", <event>]`
    Event(&'a Event),
}

impl ClientMessage<'_> {
    /// Encode as a JSON text frame
    pub fn to_json(&self) -> Result<String> {
        match self {
            Self::Event(event) => Ok(serde_json::to_string(&("EVENT", event))?),
        }
    }
}

/// Messages received from a relay that matter to publishing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelayMessage {
    /// `["OK", <event id>, <accepted>, <message>]`
    Ok {
        event_id: String,
        accepted: bool,
        message: String,
    },
    /// `["NOTICE", <message>]`
    Notice(String),
    /// `["AUTH", <challenge>]`
    Auth(String),
    /// `["CLOSED", <subscription id>, <message>]`
    Closed {
        subscription_id: String,
        message: String,
    },
    /// Any other well-formed frame (`EVENT`, `EOSE`, ...)
    Other(String),
}

impl RelayMessage {
    /// Parse a JSON text frame
    pub fn from_json(text: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(text)?;
        let items = value
            .as_array()
            .ok_or_else(|| Error::Relay("relay message is not an array".to_string()))?;
        let label = items
            .first()
            .and_then(Value::as_str)
            .ok_or_else(|| Error::Relay("relay message has no label".to_string()))?;

        let text_at = |index: usize| -> Result<String> {
            items
                .get(index)
                .and_then(Value::as_str)
                .map(str::to_string)
                .ok_or_else(|| Error::Relay(format!("{} message missing field {}", label, index)))
        };

        match label {
            "OK" => {
                let accepted = items
                    .get(2)
                    .and_then(Value::as_bool)
                    .ok_or_else(|| Error::Relay("OK message missing status".to_string()))?;
                Ok(Self::Ok {
                    event_id: text_at(1)?,
                    accepted,
                    // The message field is required by NIP-01 but some relays omit it.
                    message: text_at(3).unwrap_or_default(),
                })
            }
            "NOTICE" => Ok(Self::Notice(text_at(1)?)),
            "AUTH" => Ok(Self::Auth(text_at(1)?)),
            "CLOSED" => Ok(Self::Closed {
                subscription_id: text_at(1)?,
                message: text_at(2).unwrap_or_default(),
            }),
            other => Ok(Self::Other(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{Kind, Tags};

    #[test]
    fn test_event_frame() {
        let event = Event {
            id: "ab".repeat(32),
            pubkey: "cd".repeat(32),
            created_at: 1_700_000_000,
            kind: Kind::TEXT_NOTE,
            tags: Tags::from_rows([["t", "gm"]]),
            content: "gm".to_string(),
            sig: "ef".repeat(64),
        };
        let json = ClientMessage::Event(&event).to_json().unwrap();
        let value: Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value[0], "EVENT");
        assert_eq!(value[1]["kind"], 1);
        assert_eq!(value[1]["tags"][0][1], "gm");
    }

    #[test]
    fn test_parse_ok() {
        let msg = RelayMessage::from_json(r#"["OK","abc",true,""]"#).unwrap();
        assert_eq!(
            msg,
            RelayMessage::Ok {
                event_id: "abc".to_string(),
                accepted: true,
                message: String::new()
            }
        );

        let msg = RelayMessage::from_json(r#"["OK","abc",false,"blocked: not a member"]"#).unwrap();
        assert!(matches!(msg, RelayMessage::Ok { accepted: false, ref message, .. } if message == "blocked: not a member"));
    }

    #[test]
    fn test_parse_ok_without_message() {
        let msg = RelayMessage::from_json(r#"["OK","abc",true]"#).unwrap();
        assert!(matches!(msg, RelayMessage::Ok { accepted: true, .. }));
    }

    #[test]
    fn test_parse_other_frames() {
        assert_eq!(
            RelayMessage::from_json(r#"["NOTICE","slow down"]"#).unwrap(),
            RelayMessage::Notice("slow down".to_string())
        );
        assert_eq!(
            RelayMessage::from_json(r#"["AUTH","challenge-1"]"#).unwrap(),
            RelayMessage::Auth("challenge-1".to_string())
        );
        assert_eq!(
            RelayMessage::from_json(r#"["EOSE","sub"]"#).unwrap(),
            RelayMessage::Other("EOSE".to_string())
        );
    }

    #[test]
    fn test_parse_malformed() {
        assert!(RelayMessage::from_json("{}").is_err());
        assert!(RelayMessage::from_json("[]").is_err());
        assert!(RelayMessage::from_json(r#"["OK","abc"]"#).is_err());
        assert!(RelayMessage::from_json("not json").is_err());
    }
}
