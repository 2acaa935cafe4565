//! Wire protocol: inbound event envelopes and outbound responses.
//!
//! Inbound decoding is two-phase: first the envelope is parsed just far
//! enough to read `event`, then the full payload is decoded into the
//! matching typed variant. Unrecognised events are dropped rather than
//! erroring loudly, matching the rest of this protocol's silent-drop policy.

use serde::{Deserialize, Serialize};

use crate::error::MessageError;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BoardData {
    pub elements: String,
    pub app_state: String,
}

#[derive(Debug, Deserialize)]
struct Envelope {
    event: String,
}

#[derive(Debug, Deserialize)]
pub struct ConnectRequest {
    pub board_id: String,
    pub jwt: String,
}

#[derive(Debug, Deserialize)]
pub struct SetLeaderRequest {
    pub board_id: String,
    pub jwt: String,
}

#[derive(Debug, Deserialize)]
pub struct NewDataRequest {
    pub board_id: String,
    pub jwt: String,
    pub data: BoardData,
}

#[derive(Debug)]
pub enum InboundMessage {
    Connect(ConnectRequest),
    SetLeader(SetLeaderRequest),
    NewData(NewDataRequest),
}

/// Parse a raw text frame into a typed inbound message, or a [`MessageError`]
/// describing why it was rejected. The caller drops the frame silently on
/// any `Err`.
pub fn parse_inbound(raw: &str) -> Result<InboundMessage, MessageError> {
    let envelope: Envelope = serde_json::from_str(raw).map_err(|_| MessageError::Malformed)?;

    match envelope.event.as_str() {
        "connect" => serde_json::from_str(raw)
            .map(InboundMessage::Connect)
            .map_err(|_| MessageError::Malformed),
        "setLeader" => serde_json::from_str(raw)
            .map(InboundMessage::SetLeader)
            .map_err(|_| MessageError::Malformed),
        "newData" => serde_json::from_str(raw)
            .map(InboundMessage::NewData)
            .map_err(|_| MessageError::Malformed),
        other => Err(MessageError::UnknownEvent(other.to_string())),
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(tag = "event")]
pub enum OutboundMessage {
    #[serde(rename = "userConnected")]
    UserConnected {
        board_id: String,
        user_ids: Vec<String>,
        leader_id: String,
    },
    #[serde(rename = "userDisconnected")]
    UserDisconnected {
        board_id: String,
        user_ids: Vec<String>,
        leader_id: String,
    },
    #[serde(rename = "setLeader")]
    SetLeader { board_id: String, user_id: String },
    #[serde(rename = "newData")]
    NewData { board_id: String, data: BoardData },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_connect_request() {
        let raw = r#"{"event":"connect","board_id":"B","jwt":"J1"}"#;
        match parse_inbound(raw).unwrap() {
            InboundMessage::Connect(req) => {
                assert_eq!(req.board_id, "B");
                assert_eq!(req.jwt, "J1");
            }
            other => panic!("unexpected variant: {other:?}"),
        }
    }

    #[test]
    fn parses_new_data_request() {
        let raw = r#"{"event":"newData","board_id":"B","jwt":"J1","data":{"elements":"E","app_state":"A"}}"#;
        match parse_inbound(raw).unwrap() {
            InboundMessage::NewData(req) => {
                assert_eq!(req.data.elements, "E");
                assert_eq!(req.data.app_state, "A");
            }
            other => panic!("unexpected variant: {other:?}"),
        }
    }

    #[test]
    fn unknown_event_is_rejected() {
        let raw = r#"{"event":"doSomethingElse"}"#;
        assert_eq!(
            parse_inbound(raw).unwrap_err(),
            MessageError::UnknownEvent("doSomethingElse".to_string())
        );
    }

    #[test]
    fn malformed_json_is_rejected() {
        assert_eq!(parse_inbound("not json").unwrap_err(), MessageError::Malformed);
    }

    #[test]
    fn missing_event_field_is_rejected() {
        assert_eq!(
            parse_inbound(r#"{"board_id":"B"}"#).unwrap_err(),
            MessageError::Malformed
        );
    }

    #[test]
    fn outbound_serializes_with_camel_case_event_tag() {
        let msg = OutboundMessage::UserConnected {
            board_id: "B".to_string(),
            user_ids: vec!["U1".to_string()],
            leader_id: "0".to_string(),
        };
        let json = serde_json::to_string(&msg).unwrap();
        assert!(json.contains("\"event\":\"userConnected\""));
        assert!(json.contains("\"leader_id\":\"0\""));
    }
}
