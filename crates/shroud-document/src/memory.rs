//! In-process host document
//!
//! Models the behaviours of a real editor host that the engine has to cope
//! with: an extraction view that drops invisible formatting glyphs, live
//! ranges that survive neighbouring edits, capability-gated features, and
//! tracked changes.

use std::collections::HashMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use shroud_core::HostCapabilities;
use tokio::sync::Mutex;

use crate::document::{
    BodyTarget, Document, Hyperlink, HyperlinkId, InsertLocation, RangeId, SearchOptions,
};
use crate::search::{find_matches, is_invisible_glyph, is_special_glyph};
use crate::snapshot::{DocumentSnapshot, HyperlinkSpec};
use crate::{DocumentError, Result};

/// Host-specific search behaviour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostQuirks {
    /// Whether literal search can match a query containing a non-breaking
    /// space or a non-ASCII dash. Some hosts only find those glyphs through
    /// escape codes, so a literal query carrying them finds nothing.
    pub literal_special_glyphs: bool,
}

impl Default for HostQuirks {
    fn default() -> Self {
        Self {
            literal_special_glyphs: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RevisionKind {
    Replace,
    Insert,
}

/// An edit recorded while change tracking is on
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Revision {
    pub kind: RevisionKind,
    pub target: BodyTarget,
    pub original: String,
    pub inserted: String,
}

#[derive(Debug, Clone, Copy)]
struct Span {
    target: BodyTarget,
    start: usize,
    end: usize,
}

impl Span {
    /// Follow an edit that replaced `start..end` of the same body with `len` bytes
    fn shift(&mut self, start: usize, end: usize, len: usize) {
        let removed = end - start;

        if self.start >= end {
            self.start = self.start - removed + len;
            self.end = self.end - removed + len;
        } else if self.end > start {
            self.start = self.start.min(start);
            self.end = if self.end >= end {
                self.end - removed + len
            } else {
                start + len
            };
        }
    }
}

#[derive(Debug, Clone)]
struct Link {
    id: HyperlinkId,
    address: String,
    span: Span,
}

#[derive(Debug, Default)]
struct Inner {
    body: String,
    headers: Vec<String>,
    ranges: HashMap<RangeId, Span>,
    links: Vec<Link>,
    next_id: u64,
    tracking: bool,
    revisions: Vec<Revision>,
}

impl Inner {
    fn store(&self, target: BodyTarget) -> Result<&String> {
        match target {
            BodyTarget::Main => Ok(&self.body),
            BodyTarget::PrimaryHeader(index) => self
                .headers
                .get(index)
                .ok_or(DocumentError::NoSuchSection(index)),
        }
    }

    fn store_mut(&mut self, target: BodyTarget) -> Result<&mut String> {
        match target {
            BodyTarget::Main => Ok(&mut self.body),
            BodyTarget::PrimaryHeader(index) => self
                .headers
                .get_mut(index)
                .ok_or(DocumentError::NoSuchSection(index)),
        }
    }

    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    /// Splice `text` over `start..end` and move every tracked span in that body
    fn edit(&mut self, target: BodyTarget, start: usize, end: usize, text: &str) -> Result<String> {
        let store = self.store_mut(target)?;
        let original = store[start..end].to_string();
        store.replace_range(start..end, text);

        for span in self.ranges.values_mut().filter(|s| s.target == target) {
            span.shift(start, end, text.len());
        }
        for link in self.links.iter_mut().filter(|l| l.span.target == target) {
            link.span.shift(start, end, text.len());
        }

        Ok(original)
    }

    fn record(&mut self, kind: RevisionKind, target: BodyTarget, original: String, inserted: &str) {
        if self.tracking {
            self.revisions.push(Revision {
                kind,
                target,
                original,
                inserted: inserted.to_string(),
            });
        }
    }
}

fn extraction(text: &str) -> String {
    text.chars().filter(|c| !is_invisible_glyph(*c)).collect()
}

/// A document held entirely in memory
pub struct MemoryDocument {
    inner: Mutex<Inner>,
    capabilities: HostCapabilities,
    quirks: HostQuirks,
}

impl MemoryDocument {
    /// Document with one section whose primary header is empty
    pub fn new(body: impl Into<String>) -> Self {
        Self {
            inner: Mutex::new(Inner {
                body: body.into(),
                headers: vec![String::new()],
                ..Inner::default()
            }),
            capabilities: HostCapabilities::full(),
            quirks: HostQuirks::default(),
        }
    }

    /// Replace the section headers; one entry per section
    pub fn with_headers(mut self, headers: Vec<String>) -> Self {
        self.inner.get_mut().headers = headers;
        self
    }

    pub fn with_capabilities(mut self, capabilities: HostCapabilities) -> Self {
        self.capabilities = capabilities;
        self
    }

    pub fn with_quirks(mut self, quirks: HostQuirks) -> Self {
        self.quirks = quirks;
        self
    }

    /// Wrap the first unlinked occurrence of `text` in the body with a hyperlink
    pub fn with_hyperlink(mut self, text: &str, address: impl Into<String>) -> Self {
        let inner = self.inner.get_mut();
        let taken: Vec<(usize, usize)> = inner
            .links
            .iter()
            .map(|l| (l.span.start, l.span.end))
            .collect();

        let found = inner
            .body
            .match_indices(text)
            .map(|(start, m)| (start, start + m.len()))
            .find(|candidate| !taken.contains(candidate));

        match found {
            Some((start, end)) => {
                let id = HyperlinkId(inner.next_id());
                inner.links.push(Link {
                    id,
                    address: address.into(),
                    span: Span {
                        target: BodyTarget::Main,
                        start,
                        end,
                    },
                });
            }
            None => tracing::warn!("Hyperlink text not found in body, link dropped"),
        }

        self
    }

    /// Capabilities this host would report to a capability probe
    pub fn capabilities(&self) -> HostCapabilities {
        self.capabilities
    }

    pub fn from_snapshot(snapshot: DocumentSnapshot) -> Self {
        let mut doc = Self::new(snapshot.body).with_headers(snapshot.headers);
        {
            let inner = doc.inner.get_mut();
            inner.tracking = snapshot.track_changes;
            inner.revisions = snapshot.revisions;
        }
        for link in snapshot.hyperlinks {
            doc = doc.with_hyperlink(&link.text, link.address);
        }
        doc
    }

    /// Current state, internal text verbatim
    pub async fn to_snapshot(&self) -> DocumentSnapshot {
        let inner = self.inner.lock().await;

        DocumentSnapshot {
            body: inner.body.clone(),
            headers: inner.headers.clone(),
            hyperlinks: inner
                .links
                .iter()
                .filter(|l| l.span.target == BodyTarget::Main)
                .map(|l| HyperlinkSpec {
                    text: inner.body[l.span.start..l.span.end].to_string(),
                    address: l.address.clone(),
                })
                .collect(),
            track_changes: inner.tracking,
            revisions: inner.revisions.clone(),
        }
    }

    pub async fn is_tracking(&self) -> bool {
        self.inner.lock().await.tracking
    }

    pub async fn revisions(&self) -> Vec<Revision> {
        self.inner.lock().await.revisions.clone()
    }

    /// Search results not yet consumed by a replace
    pub async fn tracked_ranges(&self) -> usize {
        self.inner.lock().await.ranges.len()
    }

    fn check_headers(&self, target: BodyTarget) -> Result<()> {
        if matches!(target, BodyTarget::PrimaryHeader(_)) && !self.capabilities.headers {
            return Err(DocumentError::Unsupported("section headers".to_string()));
        }
        Ok(())
    }

    fn check_hyperlinks(&self) -> Result<()> {
        if !self.capabilities.hyperlinks {
            return Err(DocumentError::Unsupported("hyperlink API".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl Document for MemoryDocument {
    async fn text(&self, target: BodyTarget) -> Result<String> {
        self.check_headers(target)?;
        let inner = self.inner.lock().await;
        Ok(extraction(inner.store(target)?))
    }

    async fn search(
        &self,
        target: BodyTarget,
        query: &str,
        options: SearchOptions,
    ) -> Result<Vec<RangeId>> {
        self.check_headers(target)?;

        let literal = !options.ignore_punct && !options.ignore_space;
        if literal && !self.quirks.literal_special_glyphs && query.chars().any(is_special_glyph) {
            return Ok(Vec::new());
        }

        let mut inner = self.inner.lock().await;
        let matches = find_matches(inner.store(target)?, query, options);

        let mut ids = Vec::with_capacity(matches.len());
        for (start, end) in matches {
            let id = RangeId(inner.next_id());
            inner.ranges.insert(id, Span { target, start, end });
            ids.push(id);
        }

        Ok(ids)
    }

    async fn replace(&self, range: RangeId, text: &str) -> Result<()> {
        let mut inner = self.inner.lock().await;
        let span = *inner
            .ranges
            .get(&range)
            .ok_or(DocumentError::UnknownRange(range))?;
        self.check_headers(span.target)?;

        let original = inner.edit(span.target, span.start, span.end, text)?;
        inner.ranges.remove(&range);
        inner.record(RevisionKind::Replace, span.target, original, text);
        Ok(())
    }

    async fn insert_paragraph(
        &self,
        target: BodyTarget,
        text: &str,
        location: InsertLocation,
    ) -> Result<()> {
        self.check_headers(target)?;
        let mut inner = self.inner.lock().await;
        let store = inner.store(target)?;

        let (at, paragraph) = match location {
            InsertLocation::Start if store.is_empty() => (0, text.to_string()),
            InsertLocation::Start => (0, format!("{}\n", text)),
            InsertLocation::End if store.is_empty() || store.ends_with('\n') => {
                (store.len(), text.to_string())
            }
            InsertLocation::End => (store.len(), format!("\n{}", text)),
        };

        inner.edit(target, at, at, &paragraph)?;
        inner.record(RevisionKind::Insert, target, String::new(), text);
        Ok(())
    }

    async fn section_count(&self) -> Result<usize> {
        Ok(self.inner.lock().await.headers.len())
    }

    async fn set_change_tracking(&self, enabled: bool) -> Result<()> {
        if !self.capabilities.change_tracking {
            return Err(DocumentError::Unsupported("change tracking".to_string()));
        }
        self.inner.lock().await.tracking = enabled;
        Ok(())
    }

    async fn hyperlinks(&self, target: BodyTarget) -> Result<Vec<Hyperlink>> {
        self.check_hyperlinks()?;
        self.check_headers(target)?;
        let inner = self.inner.lock().await;
        let store = inner.store(target)?;

        Ok(inner
            .links
            .iter()
            .filter(|l| l.span.target == target)
            .map(|l| Hyperlink {
                id: l.id,
                address: l.address.clone(),
                text: extraction(&store[l.span.start..l.span.end]),
            })
            .collect())
    }

    async fn remove_hyperlink(&self, id: HyperlinkId) -> Result<()> {
        self.check_hyperlinks()?;
        let mut inner = self.inner.lock().await;
        let before = inner.links.len();
        inner.links.retain(|l| l.id != id);

        if inner.links.len() == before {
            return Err(DocumentError::UnknownHyperlink(id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_text_drops_invisible_glyphs() {
        let doc = MemoryDocument::new("EMP-1234\u{00AD}-5678");
        assert_eq!(doc.text(BodyTarget::Main).await.unwrap(), "EMP-1234-5678");
    }

    #[tokio::test]
    async fn test_ranges_survive_earlier_replacement() {
        let doc = MemoryDocument::new("a@b.co then a@b.co again");
        let ranges = doc
            .search(BodyTarget::Main, "a@b.co", SearchOptions::literal())
            .await
            .unwrap();
        assert_eq!(ranges.len(), 2);

        for range in ranges {
            doc.replace(range, "[REDACTED EMAIL]").await.unwrap();
        }

        assert_eq!(
            doc.text(BodyTarget::Main).await.unwrap(),
            "[REDACTED EMAIL] then [REDACTED EMAIL] again"
        );
    }

    #[tokio::test]
    async fn test_unknown_range() {
        let doc = MemoryDocument::new("text");
        let err = doc.replace(RangeId(99), "x").await.unwrap_err();
        assert!(matches!(err, DocumentError::UnknownRange(_)));
    }

    #[tokio::test]
    async fn test_literal_special_glyph_quirk() {
        let doc = MemoryDocument::new("(555)\u{00A0}445-6677").with_quirks(HostQuirks {
            literal_special_glyphs: false,
        });

        let literal = doc
            .search(BodyTarget::Main, "(555)\u{00A0}445-6677", SearchOptions::literal())
            .await
            .unwrap();
        assert!(literal.is_empty());

        let lenient = doc
            .search(BodyTarget::Main, "(555) 445-6677", SearchOptions::lenient())
            .await
            .unwrap();
        assert_eq!(lenient.len(), 1);
    }

    #[tokio::test]
    async fn test_hyperlink_follows_replacement() {
        let doc = MemoryDocument::new("Write to a@b.co today")
            .with_hyperlink("a@b.co", "mailto:a@b.co");

        let ranges = doc
            .search(BodyTarget::Main, "a@b.co", SearchOptions::literal())
            .await
            .unwrap();
        doc.replace(ranges[0], "[REDACTED EMAIL]").await.unwrap();

        let links = doc.hyperlinks(BodyTarget::Main).await.unwrap();
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].text, "[REDACTED EMAIL]");
        assert_eq!(links[0].address, "mailto:a@b.co");

        doc.remove_hyperlink(links[0].id).await.unwrap();
        assert!(doc.hyperlinks(BodyTarget::Main).await.unwrap().is_empty());
        assert_eq!(
            doc.text(BodyTarget::Main).await.unwrap(),
            "Write to [REDACTED EMAIL] today"
        );
    }

    #[tokio::test]
    async fn test_capability_gates() {
        let doc = MemoryDocument::new("body").with_capabilities(HostCapabilities::none());

        assert!(doc.set_change_tracking(true).await.unwrap_err().is_unsupported());
        assert!(doc.hyperlinks(BodyTarget::Main).await.unwrap_err().is_unsupported());
        assert!(
            doc.text(BodyTarget::PrimaryHeader(0))
                .await
                .unwrap_err()
                .is_unsupported()
        );
    }

    #[tokio::test]
    async fn test_tracking_records_revisions() {
        let doc = MemoryDocument::new("MRN-000123");
        doc.set_change_tracking(true).await.unwrap();

        let ranges = doc
            .search(BodyTarget::Main, "MRN-000123", SearchOptions::literal())
            .await
            .unwrap();
        doc.replace(ranges[0], "[REDACTED MRN]").await.unwrap();
        doc.insert_paragraph(BodyTarget::PrimaryHeader(0), "CONFIDENTIAL", InsertLocation::End)
            .await
            .unwrap();

        let revisions = doc.revisions().await;
        assert_eq!(revisions.len(), 2);
        assert_eq!(revisions[0].original, "MRN-000123");
        assert_eq!(revisions[1].kind, RevisionKind::Insert);
        assert_eq!(
            doc.text(BodyTarget::PrimaryHeader(0)).await.unwrap(),
            "CONFIDENTIAL"
        );
    }

    #[tokio::test]
    async fn test_insert_paragraph_at_start_shifts_ranges() {
        let doc = MemoryDocument::new("INS-87654321");
        let ranges = doc
            .search(BodyTarget::Main, "INS-87654321", SearchOptions::literal())
            .await
            .unwrap();

        doc.insert_paragraph(BodyTarget::Main, "CONFIDENTIAL", InsertLocation::Start)
            .await
            .unwrap();
        doc.replace(ranges[0], "[REDACTED INS]").await.unwrap();

        assert_eq!(
            doc.text(BodyTarget::Main).await.unwrap(),
            "CONFIDENTIAL\n[REDACTED INS]"
        );
    }

    #[tokio::test]
    async fn test_replace_consumes_range() {
        let body: Vec<String> = (0..200).map(|n| format!("MRN-{:06}", n)).collect();
        let doc = MemoryDocument::new(body.join(" "));

        for value in &body {
            let ranges = doc
                .search(BodyTarget::Main, value, SearchOptions::literal())
                .await
                .unwrap();
            assert_eq!(ranges.len(), 1);
            doc.replace(ranges[0], "[REDACTED MRN]").await.unwrap();
        }

        assert_eq!(doc.tracked_ranges().await, 0);
        let err = doc.replace(RangeId(1), "x").await.unwrap_err();
        assert!(matches!(err, DocumentError::UnknownRange(_)));
    }

    #[tokio::test]
    async fn test_missing_section() {
        let doc = MemoryDocument::new("body").with_headers(Vec::new());
        assert_eq!(doc.section_count().await.unwrap(), 0);
        let err = doc.text(BodyTarget::PrimaryHeader(0)).await.unwrap_err();
        assert!(matches!(err, DocumentError::NoSuchSection(0)));
    }
}
