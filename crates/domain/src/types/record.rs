//! Datastore rows

use crate::constants::BYTE_ORDER_MARK;

/// One datastore row: an insertion-ordered map of field name to JSON value.
pub type Record = serde_json::Map<String, serde_json::Value>;

/// Strip the stray byte-order mark some datasets prepend to their first
/// field name.
#[must_use]
pub fn strip_bom(field: &str) -> &str {
    field.strip_prefix(BYTE_ORDER_MARK).unwrap_or(field)
}
