/// Unix-second timestamp conversion
use chrono::{DateTime, Utc};

pub(crate) fn to_unix(dt: DateTime<Utc>) -> i64 {
    dt.timestamp()
}

pub(crate) fn from_unix(secs: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(secs, 0).unwrap_or_default()
}

pub(crate) fn now() -> i64 {
    Utc::now().timestamp()
}
