//! Host document trait

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::Result;

/// Which text body an operation addresses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BodyTarget {
    /// The main document body
    Main,
    /// Primary header of the section at this index
    PrimaryHeader(usize),
}

/// Handle to a structural range returned by [`Document::search`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RangeId(pub(crate) u64);

impl fmt::Display for RangeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "range#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HyperlinkId(pub(crate) u64);

impl fmt::Display for HyperlinkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "link#{}", self.0)
    }
}

/// Match leniency for a single search call
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchOptions {
    pub match_case: bool,
    pub match_whole_word: bool,
    pub ignore_punct: bool,
    pub ignore_space: bool,
}

impl SearchOptions {
    /// Case-insensitive substring match
    pub fn literal() -> Self {
        Self::default()
    }

    /// Case-insensitive, punctuation- and whitespace-insensitive match
    pub fn lenient() -> Self {
        Self {
            ignore_punct: true,
            ignore_space: true,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertLocation {
    Start,
    End,
}

/// A hyperlink wrapper and the text it currently displays
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hyperlink {
    pub id: HyperlinkId,
    pub address: String,
    pub text: String,
}

/// A rich-text document owned by a host editor.
///
/// Every call is a round trip to the host: the caller awaits each one
/// before issuing the next, which serializes all access to the document.
#[async_trait]
pub trait Document: Send + Sync {
    /// Plain-text extraction of a body at call time
    async fn text(&self, target: BodyTarget) -> Result<String>;

    /// Ranges currently matching `query`.
    ///
    /// Returned ranges stay valid across later replacements in the same body.
    async fn search(
        &self,
        target: BodyTarget,
        query: &str,
        options: SearchOptions,
    ) -> Result<Vec<RangeId>>;

    /// Replace a range's content with literal text
    async fn replace(&self, range: RangeId, text: &str) -> Result<()>;

    async fn insert_paragraph(
        &self,
        target: BodyTarget,
        text: &str,
        location: InsertLocation,
    ) -> Result<()>;

    async fn section_count(&self) -> Result<usize>;

    /// Record subsequent edits as tracked changes
    async fn set_change_tracking(&self, enabled: bool) -> Result<()>;

    async fn hyperlinks(&self, target: BodyTarget) -> Result<Vec<Hyperlink>>;

    /// Drop a hyperlink wrapper, keeping its text
    async fn remove_hyperlink(&self, id: HyperlinkId) -> Result<()>;
}
