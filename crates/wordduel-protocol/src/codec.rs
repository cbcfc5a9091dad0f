//! Codec trait and the JSON implementation.
//!
//! The gateway only needs something that implements [`Codec`]; the
//! browser client speaks JSON, so [`JsonCodec`] is the one in use.

use serde::{Serialize, de::DeserializeOwned};

use crate::ProtocolError;

/// Encodes events to frame bytes and decodes frame bytes to events.
///
/// `Send + Sync + 'static` because a single codec value is shared by every
/// connection task for the life of the server.
pub trait Codec: Send + Sync + 'static {
    /// Serializes a value into bytes.
    ///
    /// # Errors
    /// Returns `ProtocolError::Encode` if serialization fails.
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, ProtocolError>;

    /// Deserializes bytes back into a value.
    ///
    /// # Errors
    /// Returns `ProtocolError::Decode` if the bytes are malformed or don't
    /// match the expected type.
    fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, ProtocolError>;
}

/// A [`Codec`] backed by `serde_json`.
///
/// ```rust
/// use wordduel_protocol::{ClientEvent, Codec, JsonCodec};
///
/// let event: ClientEvent = JsonCodec
///     .decode(br#"{"event":"guess","data":{"guess":"crane"}}"#)
///     .unwrap();
/// assert!(matches!(event, ClientEvent::Guess(p) if p.guess == "crane"));
/// ```
#[cfg(feature = "json")]
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

#[cfg(feature = "json")]
impl Codec for JsonCodec {
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, ProtocolError> {
        serde_json::to_vec(value).map_err(ProtocolError::Encode)
    }

    fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, ProtocolError> {
        serde_json::from_slice(data).map_err(ProtocolError::Decode)
    }
}
