use chrono::{LocalResult, NaiveDateTime, TimeZone};

use crate::error::{NotifierError, Result};

/// Milliseconds since 1970-01-01T00:00:00Z for a wall-clock time in `tz`.
///
/// A time repeated by a DST fall-back resolves to the later (standard time)
/// instant. A time skipped by a spring-forward gap is an error.
pub fn local_to_epoch_millis<Tz: TimeZone>(local: NaiveDateTime, tz: &Tz) -> Result<i64> {
    match tz.from_local_datetime(&local) {
        LocalResult::Single(instant) => Ok(instant.timestamp_millis()),
        LocalResult::Ambiguous(_, standard) => Ok(standard.timestamp_millis()),
        LocalResult::None => Err(NotifierError::NonexistentLocalTime(local)),
    }
}
