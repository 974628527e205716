/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// A row as returned by a regional backend. Campaign rows carry no shared
/// primary key across regions, so they are kept as free-form JSON objects.
pub type Row = serde_json::Map<String, serde_json::Value>;

/// Amounts are whole Korean won.
pub type Won = i64;
