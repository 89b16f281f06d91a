//! `LogDecoder` — maps raw logs to decoded events via a topic0-keyed table.
//!
//! The table is built once from the configured ABI fragment list and is
//! immutable afterwards. Fragments that do not declare an event are skipped
//! (an ABI list usually also carries function declarations); two fragments
//! hashing to the same topic0 are a configuration error, not a silent
//! overwrite.

use alloy_dyn_abi::EventExt;
use alloy_primitives::B256;
use std::collections::HashMap;

use magazine_core::{DecodedEvent, MagazineError, RawLog};

use crate::descriptor::{is_event_fragment, EventDescriptor};
use crate::normalize::normalize;

/// Decoder table keyed by event signature hash (topics[0]).
#[derive(Debug, Clone, Default)]
pub struct LogDecoder {
    table: HashMap<B256, EventDescriptor>,
}

impl LogDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a decoder from a list of ABI fragments, skipping non-event
    /// declarations.
    pub fn from_fragments<S: AsRef<str>>(fragments: &[S]) -> Result<Self, MagazineError> {
        let mut decoder = Self::new();
        for fragment in fragments {
            let fragment = fragment.as_ref();
            if !is_event_fragment(fragment) {
                continue;
            }
            decoder.register(EventDescriptor::parse(fragment)?)?;
        }
        Ok(decoder)
    }

    /// Add a descriptor to the table. Fails on a duplicate signature.
    pub fn register(&mut self, descriptor: EventDescriptor) -> Result<(), MagazineError> {
        let topic0 = descriptor.topic0();
        if self.table.contains_key(&topic0) {
            return Err(MagazineError::DuplicateSignature {
                signature: descriptor.signature().to_string(),
            });
        }
        self.table.insert(topic0, descriptor);
        Ok(())
    }

    /// Number of registered event signatures.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Look up the descriptor for a signature hash.
    pub fn descriptor_for(&self, topic0: &B256) -> Option<&EventDescriptor> {
        self.table.get(topic0)
    }

    /// Decode a raw log into a named, typed event.
    ///
    /// Fails with `UnknownSignature` when topics[0] is missing or has no
    /// registered descriptor, and with `Decode` when the payload does not
    /// match the descriptor's schema. Both are per-log errors.
    pub fn decode(&self, log: &RawLog) -> Result<DecodedEvent, MagazineError> {
        let sig = log
            .signature_topic()
            .ok_or_else(|| MagazineError::UnknownSignature {
                topic0: "(no topics)".into(),
            })?;
        let topic0: B256 = sig.parse().map_err(|_| MagazineError::UnknownSignature {
            topic0: sig.to_string(),
        })?;
        let descriptor =
            self.table
                .get(&topic0)
                .ok_or_else(|| MagazineError::UnknownSignature {
                    topic0: sig.to_string(),
                })?;

        let decode_err = |reason: String| MagazineError::Decode {
            name: descriptor.name().to_string(),
            reason,
        };

        let topics: Vec<B256> = log
            .topics
            .iter()
            .map(|t| t.parse::<B256>())
            .collect::<Result<_, _>>()
            .map_err(|e| decode_err(format!("invalid topic hex: {e}")))?;

        let data_hex = log.data.strip_prefix("0x").unwrap_or(&log.data);
        let data =
            hex::decode(data_hex).map_err(|e| decode_err(format!("invalid data hex: {e}")))?;

        let event = descriptor.event();
        let decoded = event
            .decode_log_parts(topics, &data, true)
            .map_err(|e| decode_err(e.to_string()))?;

        // Re-interleave indexed and body values back into declaration order.
        let mut indexed = decoded.indexed.into_iter();
        let mut body = decoded.body.into_iter();
        let mut args = Vec::with_capacity(event.inputs.len());
        for (i, param) in event.inputs.iter().enumerate() {
            let value = if param.indexed {
                indexed.next()
            } else {
                body.next()
            }
            .ok_or_else(|| decode_err(format!("missing value for parameter {i}")))?;
            let name = if param.name.is_empty() {
                i.to_string()
            } else {
                param.name.clone()
            };
            args.push((name, normalize(value)));
        }

        Ok(DecodedEvent {
            name: descriptor.name().to_string(),
            args,
            block_number: log.block_number,
            tx_hash: log.tx_hash.clone(),
            log_index: log.log_index,
        })
    }
}
