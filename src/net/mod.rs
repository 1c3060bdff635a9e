//! Wire protocol shared with the game server
//!
//! Only message shapes and their JSON encoding live here; the socket is
//! someone else's job.

pub mod codec;
pub mod messages;

pub use codec::{decode_server, encode_client};
pub use messages::{ClientMessage, ServerMessage, SnakeRef, SnakeState, WirePoint, WireSegment};
