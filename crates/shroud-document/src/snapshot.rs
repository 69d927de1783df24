//! Document snapshots on disk
//!
//! `.json` files carry the full document (body, section headers, hyperlinks,
//! tracked changes). Any other extension is read as a plain-text body with a
//! single empty section header.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::Result;
use crate::memory::Revision;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HyperlinkSpec {
    /// Display text, anchored at its first unlinked occurrence in the body
    pub text: String,
    pub address: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentSnapshot {
    pub body: String,

    /// Primary header text, one entry per section
    #[serde(default = "default_headers")]
    pub headers: Vec<String>,

    #[serde(default)]
    pub hyperlinks: Vec<HyperlinkSpec>,

    #[serde(default)]
    pub track_changes: bool,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub revisions: Vec<Revision>,
}

fn default_headers() -> Vec<String> {
    vec![String::new()]
}

fn is_json(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}

impl DocumentSnapshot {
    pub fn plain(body: impl Into<String>) -> Self {
        Self {
            body: body.into(),
            headers: default_headers(),
            ..Self::default()
        }
    }

    pub async fn load(path: &Path) -> Result<Self> {
        let content = tokio::fs::read_to_string(path).await?;

        if is_json(path) {
            Ok(serde_json::from_str(&content)?)
        } else {
            Ok(Self::plain(content))
        }
    }

    /// Write the snapshot. Plain-text output renders non-empty headers as
    /// leading lines followed by a blank line and the body.
    pub async fn save(&self, path: &Path) -> Result<()> {
        let content = if is_json(path) {
            serde_json::to_string_pretty(self)?
        } else {
            self.render_plain()
        };

        tokio::fs::write(path, content).await?;
        Ok(())
    }

    pub fn render_plain(&self) -> String {
        let headers: Vec<&str> = self
            .headers
            .iter()
            .map(|h| h.trim())
            .filter(|h| !h.is_empty())
            .collect();

        if headers.is_empty() {
            self.body.clone()
        } else {
            format!("{}\n\n{}", headers.join("\n"), self.body)
        }
    }
}
