use crate::error::SyncError;
use crate::net::messages::{ClientMessage, ServerMessage};

pub fn encode_client(msg: &ClientMessage) -> Result<String, serde_json::Error> {
    serde_json::to_string(msg)
}

pub fn decode_server(text: &str) -> Result<ServerMessage, SyncError> {
    Ok(serde_json::from_str(text)?)
}

/// What the server reads back from us
#[cfg(test)]
fn decode_client(text: &str) -> Result<ClientMessage, SyncError> {
    Ok(serde_json::from_str(text)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::net::messages::{SnakeRef, SnakeState, WirePoint, WireSegment};
    use crate::sim::{Direction, RemoteSnake};

    #[test]
    fn test_decode_update() {
        let text = r#"{"type":"update","id":"p7","alive":true,
            "vectors":[{"position":{"x":4,"y":9},"length":2,"direction":4},
                       {"position":{"x":2,"y":9},"length":3,"direction":1}]}"#;
        let ServerMessage::Update(state) = decode_server(text).expect("decode") else {
            panic!("expected update");
        };
        assert_eq!(state.id, "p7");
        assert!(state.alive);
        assert_eq!(
            state.vectors[0],
            WireSegment {
                position: WirePoint { x: 4, y: 9 },
                length: 2,
                direction: Direction::Right,
            }
        );
        assert_eq!(state.vectors[1].direction, Direction::Up);
    }

    #[test]
    fn test_decode_howdy_and_delete() {
        assert_eq!(
            decode_server(r#"{"type":"howdy","id":"me"}"#).ok(),
            Some(ServerMessage::Howdy { id: "me".into() })
        );
        // delete carries the full snake shape; only the id matters
        assert_eq!(
            decode_server(r#"{"type":"delete","id":"x","vectors":[],"alive":false}"#).ok(),
            Some(ServerMessage::Delete(SnakeRef { id: "x".into() }))
        );
    }

    #[test]
    fn test_encode_hey() {
        assert_eq!(
            encode_client(&ClientMessage::Hey).ok().as_deref(),
            Some(r#"{"type":"hey"}"#)
        );
    }

    #[test]
    fn test_bad_direction_is_decode_error() {
        let text = r#"{"type":"update","id":"a","alive":true,
            "vectors":[{"position":{"x":0,"y":0},"length":1,"direction":9}]}"#;
        assert!(matches!(decode_server(text), Err(SyncError::Decode(_))));
    }

    #[test]
    fn test_missing_id_rejected_on_merge() {
        let text = r#"{"type":"update","alive":true,
            "vectors":[{"position":{"x":0,"y":0},"length":1,"direction":2}]}"#;
        let ServerMessage::Update(state) = decode_server(text).expect("decode") else {
            panic!("expected update");
        };
        assert!(matches!(RemoteSnake::try_from(state), Err(SyncError::MissingId)));
    }

    #[test]
    fn test_client_update_survives_server_side_decode() {
        let state = SnakeState {
            id: "me".into(),
            vectors: vec![WireSegment {
                position: WirePoint { x: 1, y: 2 },
                length: 3,
                direction: Direction::Left,
            }],
            alive: false,
        };
        let text = encode_client(&ClientMessage::Update(state.clone())).expect("encode");
        assert!(text.contains(r#""direction":3"#));
        assert_eq!(decode_client(&text).ok(), Some(ClientMessage::Update(state)));
    }
}
