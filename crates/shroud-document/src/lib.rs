//! Host document access for shroud
//!
//! [`Document`] is the contract the engine drives: text extraction,
//! structural search, range replacement, headers, hyperlinks and change
//! tracking. [`MemoryDocument`] is an in-process host used by the CLI and
//! by tests.

pub mod document;
pub mod error;
pub mod memory;
pub mod search;
pub mod snapshot;

pub use document::{BodyTarget, Document, Hyperlink, HyperlinkId, InsertLocation, RangeId, SearchOptions};
pub use error::{DocumentError, Result};
pub use memory::{HostQuirks, MemoryDocument, Revision, RevisionKind};
pub use snapshot::{DocumentSnapshot, HyperlinkSpec};
