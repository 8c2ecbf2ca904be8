#![forbid(unsafe_code)]

//! Popstate payloads as delivered by a JS host.
//!
//! Hosts hand over `event.state` serialized with `JSON.stringify`. Anything
//! that is not a persisted [`State`] (`null`, a third-party object, broken
//! JSON) decodes to "no state", which the navigator reports as `UPDATE`.

use snav_backend::PopState;
use snav_core::State;

/// Wrap a raw JSON payload as a [`PopState`]. Malformed JSON becomes an
/// absent payload.
#[must_use]
pub fn popstate_from_json(json: &str) -> PopState {
    match serde_json::from_str::<serde_json::Value>(json) {
        Ok(value) => PopState::new(Some(value)),
        Err(_err) => {
            #[cfg(feature = "tracing")]
            tracing::trace!(error = %_err, "malformed popstate payload");
            PopState::new(None)
        }
    }
}

/// Decode a popstate payload into the persisted [`State`], if it is one.
#[must_use]
pub fn decode_popstate(json: &str) -> Option<State> {
    popstate_from_json(json).state()
}

/// Serialize a state the way it is persisted in native history.
pub fn encode_state(state: &State) -> Result<String, serde_json::Error> {
    serde_json::to_string(state)
}
