/// Catalog image identifiers are unsigned integers assigned by the remote API.
pub type ImageId = u64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
