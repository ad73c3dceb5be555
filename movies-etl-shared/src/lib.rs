//! # Movies ETL Shared
//!
//! Types shared by every stage of the movies ETL: the wide relational row the
//! extractor produces, the canonical document the loader indexes, and the
//! small vocabulary (entity kinds, cutoffs, wire formats) that ties them together.

mod cutoff;
mod document;
mod entity;
mod formats;
mod source_row;

pub use cutoff::ChangeCutoff;
pub use document::MovieDocument;
pub use entity::{EntityKind, UnknownEntityKind};
pub use formats::{format_date, format_instant, DATE_FORMAT, INSTANT_FORMAT};
pub use source_row::SourceRow;

/// Upper bound on the number of rows a single extraction query may return.
pub const MAX_BATCH_SIZE: usize = 100;
