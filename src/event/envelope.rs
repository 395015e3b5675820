//! Routing envelope.
//!
//! Only the `type` field of a record is parsed. Every other field is skipped
//! by the deserializer without being materialized.

use serde::Deserialize;
use std::borrow::Cow;

use crate::error::ProtocolError;

use super::Category;

#[derive(Deserialize)]
struct Envelope<'a> {
    #[serde(rename = "type", borrow)]
    kind: Option<Cow<'a, str>>,
}

/// Extracts the category tag from one JSON record.
///
/// Trailing whitespace (including the line terminator) is accepted.
pub fn sniff(line: &[u8]) -> Result<Category, ProtocolError> {
    let envelope: Envelope<'_> =
        serde_json::from_slice(line).map_err(|e| ProtocolError::MalformedRecord {
            reason: e.to_string(),
        })?;

    let Some(kind) = envelope.kind else {
        return Err(ProtocolError::MalformedRecord {
            reason: "missing 'type' field".to_string(),
        });
    };

    kind.parse()
}
