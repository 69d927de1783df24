//! Run summary - the terminal artifact of one redaction run

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{RedactionCounts, Result, RunOptions};

/// Where the confidentiality banner ended up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum BannerPlacement {
    /// Primary header of the first section
    Header,
    /// Visible paragraph at the start of the body
    BodyFallback,
    #[default]
    None,
}

/// Result of one run, returned to the caller.
///
/// The caller owns it; nothing in the engine keeps a copy between runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub tracking_requested: bool,
    pub tracking_enabled: bool,
    pub header_requested: bool,
    pub header_inserted: bool,
    pub banner_placement: BannerPlacement,
    pub total_replacements: usize,
    pub counts: RedactionCounts,
    /// Reported as "unique sensitive strings found".
    ///
    /// Historically this equals `total_replacements`, so a token that occurs
    /// three times counts three times. Use `distinct_tokens` for the number of
    /// different values.
    pub unique_found: usize,
    pub distinct_tokens: usize,
    pub mailto_links_removed: usize,
    pub notes: Vec<String>,
}

impl RunSummary {
    pub fn builder(options: RunOptions) -> SummaryBuilder {
        SummaryBuilder::new(options)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

fn yes_no(value: bool) -> &'static str {
    if value { "yes" } else { "no" }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Redaction summary")?;
        writeln!(
            f,
            "  Track changes: requested {}, enabled {}",
            yes_no(self.tracking_requested),
            yes_no(self.tracking_enabled)
        )?;

        let placement = match self.banner_placement {
            BannerPlacement::Header => "header",
            BannerPlacement::BodyFallback => "body",
            BannerPlacement::None => "none",
        };
        writeln!(
            f,
            "  Confidential header: requested {}, inserted {} (banner: {})",
            yes_no(self.header_requested),
            yes_no(self.header_inserted),
            placement
        )?;

        writeln!(f, "  Total replacements: {}", self.total_replacements)?;
        writeln!(f, "  Unique sensitive strings found: {}", self.unique_found)?;
        for (category, count) in self.counts.iter() {
            writeln!(f, "    {}: {}", category.label(), count)?;
        }
        if self.mailto_links_removed > 0 {
            writeln!(f, "  Email links removed: {}", self.mailto_links_removed)?;
        }

        if !self.notes.is_empty() {
            writeln!(f, "  Notes:")?;
            for note in &self.notes {
                writeln!(f, "    - {}", note)?;
            }
        }

        Ok(())
    }
}

/// Collects outcomes from each stage of a run into a [`RunSummary`]
#[derive(Debug, Clone)]
pub struct SummaryBuilder {
    options: RunOptions,
    tracking_enabled: bool,
    header_inserted: bool,
    banner_placement: BannerPlacement,
    counts: RedactionCounts,
    unique_found: usize,
    distinct_tokens: usize,
    mailto_links_removed: usize,
    notes: Vec<String>,
}

impl SummaryBuilder {
    pub fn new(options: RunOptions) -> Self {
        Self {
            options,
            tracking_enabled: false,
            header_inserted: false,
            banner_placement: BannerPlacement::None,
            counts: RedactionCounts::default(),
            unique_found: 0,
            distinct_tokens: 0,
            mailto_links_removed: 0,
            notes: Vec::new(),
        }
    }

    pub fn tracking(mut self, enabled: bool) -> Self {
        self.tracking_enabled = enabled;
        self
    }

    pub fn header(mut self, inserted: bool, placement: BannerPlacement) -> Self {
        self.header_inserted = inserted;
        self.banner_placement = placement;
        self
    }

    pub fn redactions(
        mut self,
        counts: RedactionCounts,
        unique_found: usize,
        distinct_tokens: usize,
    ) -> Self {
        self.counts = counts;
        self.unique_found = unique_found;
        self.distinct_tokens = distinct_tokens;
        self
    }

    pub fn mailto_links_removed(mut self, removed: usize) -> Self {
        self.mailto_links_removed = removed;
        self
    }

    pub fn notes<I, S>(mut self, notes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.notes.extend(notes.into_iter().map(Into::into));
        self
    }

    pub fn build(self) -> RunSummary {
        RunSummary {
            tracking_requested: self.options.enable_tracking,
            tracking_enabled: self.tracking_enabled,
            header_requested: self.options.insert_header,
            header_inserted: self.header_inserted,
            banner_placement: self.banner_placement,
            total_replacements: self.counts.total(),
            counts: self.counts,
            unique_found: self.unique_found,
            distinct_tokens: self.distinct_tokens,
            mailto_links_removed: self.mailto_links_removed,
            notes: self.notes,
        }
    }
}
