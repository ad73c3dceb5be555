//! Logical entity kinds whose change timestamps drive a pipeline pass.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// An entity whose `modified` column selects which movies are re-indexed.
///
/// Every kind still produces movie documents: a changed person or genre
/// re-indexes the movies it is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Movie,
    Person,
    Genre,
}

impl EntityKind {
    /// All kinds in the order a run processes them.
    pub const ALL: [EntityKind; 3] = [EntityKind::Movie, EntityKind::Person, EntityKind::Genre];

    /// The relational table holding this entity's change timestamp.
    pub fn table_name(&self) -> &'static str {
        match self {
            EntityKind::Movie => "movie_movie",
            EntityKind::Person => "movie_person",
            EntityKind::Genre => "movie_genre",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Movie => "movie",
            EntityKind::Person => "person",
            EntityKind::Genre => "genre",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string names no known entity kind.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown entity kind: {0}")]
pub struct UnknownEntityKind(pub String);

impl FromStr for EntityKind {
    type Err = UnknownEntityKind;

    /// Accepts the short name (`person`) or the table name (`movie_person`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        EntityKind::ALL
            .into_iter()
            .find(|kind| normalized == kind.as_str() || normalized == kind.table_name())
            .ok_or_else(|| UnknownEntityKind(s.to_string()))
    }
}
