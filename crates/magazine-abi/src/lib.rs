//! magazine-abi — event ABI parsing and raw-log decoding.

pub mod decoder;
pub mod descriptor;
pub mod normalize;

pub use decoder::LogDecoder;
pub use descriptor::{is_event_fragment, EventDescriptor};
