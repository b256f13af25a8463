use crate::value::Table;

/// Canonicalize raw keys so they line up with field names.
///
/// - Entries whose value is null are dropped, so the default/optional policy
///   applies instead of a null slipping through.
/// - `-` and `.` in keys become `_` (`some-field` and `some.field` both map to
///   `some_field`).
///
/// Returns a new table; nested tables are left untouched (each nested record
/// normalizes its own data when it is loaded).
pub fn normalize(raw: &Table) -> Table {
    raw.iter()
        .filter(|(_, value)| !value.is_null())
        .map(|(key, value)| (normalize_key(key), value.clone()))
        .collect()
}

fn normalize_key(key: &str) -> String {
    key.replace(['-', '.'], "_")
}
