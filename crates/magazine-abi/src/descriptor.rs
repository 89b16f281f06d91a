//! `EventDescriptor` — a parsed, named event signature.
//!
//! Built once from a human-readable ABI fragment such as
//! `"event Transfer(address indexed from, address indexed to, uint256 value)"`
//! and immutable afterwards. The topic0 hash (keccak256 of the canonical
//! signature) is the lookup key for decoding.

use alloy_json_abi::Event;
use alloy_primitives::B256;

use magazine_core::MagazineError;

/// A parsed event signature plus its precomputed topic0 hash.
#[derive(Debug, Clone)]
pub struct EventDescriptor {
    name: String,
    signature: String,
    topic0: B256,
    event: Event,
}

impl EventDescriptor {
    /// Parse a human-readable `event …` ABI fragment.
    pub fn parse(fragment: &str) -> Result<Self, MagazineError> {
        if !is_event_fragment(fragment) {
            return Err(MagazineError::InvalidAbi {
                fragment: fragment.to_string(),
                reason: "not an event declaration".into(),
            });
        }
        let event = Event::parse(fragment.trim()).map_err(|e| MagazineError::InvalidAbi {
            fragment: fragment.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self {
            name: event.name.clone(),
            signature: event.signature(),
            topic0: event.selector(),
            event,
        })
    }

    /// The event name, e.g. `"Transfer"`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The canonical signature, e.g. `"Transfer(address,address,uint256)"`.
    pub fn signature(&self) -> &str {
        &self.signature
    }

    /// keccak256 of the canonical signature — the log's topics[0] value.
    pub fn topic0(&self) -> B256 {
        self.topic0
    }

    pub(crate) fn event(&self) -> &Event {
        &self.event
    }
}

/// Returns `true` if the fragment declares an event (leading `event`
/// keyword followed by whitespace).
pub fn is_event_fragment(fragment: &str) -> bool {
    fragment
        .trim_start()
        .strip_prefix("event")
        .is_some_and(|rest| rest.starts_with(char::is_whitespace))
}
