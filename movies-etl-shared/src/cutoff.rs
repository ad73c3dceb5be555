//! The temporal boundary used to select recently changed rows.

use std::fmt;

use chrono::{DateTime, Utc};

/// Rows whose driving table was modified strictly after this boundary are extracted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ChangeCutoff {
    /// Start of the store's current calendar day, evaluated when the query runs.
    ///
    /// Two runs on the same day see the same rows again, and a day with no
    /// run is never picked up once the day rolls over. Use `Since` with a
    /// tracked high-water mark for real incremental resumption.
    #[default]
    StartOfCurrentDay,
    /// An explicit instant, typically the high-water mark of a previous run.
    Since(DateTime<Utc>),
}

impl ChangeCutoff {
    /// The explicit instant, or `None` when the store decides.
    pub fn instant(&self) -> Option<DateTime<Utc>> {
        match self {
            ChangeCutoff::StartOfCurrentDay => None,
            ChangeCutoff::Since(at) => Some(*at),
        }
    }
}

impl fmt::Display for ChangeCutoff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChangeCutoff::StartOfCurrentDay => f.write_str("start-of-day"),
            ChangeCutoff::Since(at) => write!(f, "{}", at.to_rfc3339()),
        }
    }
}
