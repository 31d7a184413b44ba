//! Shared helpers for reading SQLite row columns as strings.

use rusqlite::types::ValueRef;

/// Render a column value as a String regardless of its storage class.
///
/// NULL renders as `"null"`; blobs render as lowercase hex.
pub(crate) fn get_column_as_string(row: &rusqlite::Row<'_>, idx: usize) -> String {
    match row.get_ref(idx) {
        Ok(ValueRef::Null) | Err(_) => "null".to_string(),
        Ok(ValueRef::Integer(n)) => n.to_string(),
        Ok(ValueRef::Real(f)) => f.to_string(),
        Ok(ValueRef::Text(t)) => String::from_utf8_lossy(t).into_owned(),
        Ok(ValueRef::Blob(b)) => b.iter().map(|byte| format!("{byte:02x}")).collect(),
    }
}
