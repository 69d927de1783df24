//! Redaction engine for shroud
//!
//! A run is strictly sequential: change tracking first, then every
//! category's classify-then-replace step, then the confidentiality banner.
//! Each step awaits the host before the next one starts.

pub mod error;
pub mod header;
pub mod orchestrator;
pub mod replacer;

pub use error::{Result, RunError};
pub use header::{HeaderOutcome, TrackingOutcome, apply_tracking, ensure_confidential_header};
pub use orchestrator::{RedactionOrchestrator, RedactionReport};
pub use replacer::{ReplaceOutcome, replace_tokens};

use shroud_core::{HostCapabilities, RunOptions, RunSummary};
use shroud_document::Document;
use shroud_security::{Classifier, ClassifierOptions};
use tracing::info;

pub const DEFAULT_BANNER: &str = "CONFIDENTIAL - Contains redacted information";

/// Settings that stay fixed across runs
#[derive(Debug, Clone)]
pub struct RunSettings {
    pub banner: String,
    pub classifier: ClassifierOptions,
}

impl Default for RunSettings {
    fn default() -> Self {
        Self {
            banner: DEFAULT_BANNER.to_string(),
            classifier: ClassifierOptions::default(),
        }
    }
}

/// Entry point for a redaction run.
///
/// Holds no state between runs; each [`Redactor::run`] returns its own
/// [`RunSummary`] to the caller.
pub struct Redactor {
    orchestrator: RedactionOrchestrator,
    banner: String,
}

impl Redactor {
    pub fn new(settings: RunSettings) -> Self {
        Self {
            orchestrator: RedactionOrchestrator::new(Classifier::new(settings.classifier)),
            banner: settings.banner,
        }
    }

    pub async fn run(
        &self,
        doc: &dyn Document,
        options: RunOptions,
        capabilities: HostCapabilities,
    ) -> Result<RunSummary> {
        info!(
            insert_header = options.insert_header,
            enable_tracking = options.enable_tracking,
            "Starting redaction run"
        );

        let tracking = apply_tracking(doc, capabilities, options.enable_tracking).await?;
        let report = self.orchestrator.run(doc, capabilities).await?;

        let header = if options.insert_header {
            ensure_confidential_header(doc, capabilities, &self.banner).await?
        } else {
            HeaderOutcome::default()
        };

        let summary = RunSummary::builder(options)
            .tracking(tracking.enabled)
            .header(header.inserted, header.placement)
            .redactions(report.counts, report.unique_found, report.distinct_tokens)
            .mailto_links_removed(report.mailto_links_removed)
            .notes(tracking.note)
            .notes(report.notes)
            .notes(header.notes)
            .build();

        info!(
            total = summary.total_replacements,
            notes = summary.notes.len(),
            "Redaction run finished"
        );

        Ok(summary)
    }
}

impl Default for Redactor {
    fn default() -> Self {
        Self::new(RunSettings::default())
    }
}
