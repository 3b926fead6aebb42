use crate::error::Result;
use crate::update::Updater;
use crate::version::Version;
use regex::Regex;
use std::sync::LazyLock;

static DOCUMENT_TITLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^#[ \t]+(news|changelog)[ \t]*\r?$").expect("title pattern is valid")
});

/// Inserts a release entry at the top of `NEWS.md`.
///
/// A leading `# NEWS` or `# Changelog` title stays on the first line; older
/// entries follow the new one untouched, so the file reads newest first.
#[derive(Debug, Clone)]
pub struct News {
    pub version: Version,
    pub changelog_entry: String,
}

impl News {
    pub fn new(version: Version, changelog_entry: impl Into<String>) -> Self {
        Self {
            version,
            changelog_entry: changelog_entry.into(),
        }
    }
}

impl Updater for News {
    fn name(&self) -> &'static str {
        "news"
    }

    fn update_content(&self, content: Option<&str>) -> Result<String> {
        let entry = self.changelog_entry.trim_end();
        let existing = content.unwrap_or_default();

        if existing.trim().is_empty() {
            if std::env::var(crate::VERBOSE_ENV).is_ok() {
                eprintln!("[VERBOSE] Starting new NEWS for {}", self.version);
            }
            return Ok(format!("{entry}\n"));
        }

        let newline = if existing.contains("\r\n") { "\r\n" } else { "\n" };
        let (title, previous) = match existing.split_once('\n') {
            Some((first, rest)) if DOCUMENT_TITLE.is_match(first) => (Some(first), rest),
            None if DOCUMENT_TITLE.is_match(existing) => (Some(existing), ""),
            _ => (None, existing),
        };
        // Blank lines under the title are re-emitted; older entries are kept as is.
        let previous = previous.trim_start_matches(['\n', '\r']);

        let mut updated = String::new();
        if let Some(title) = title {
            updated.push_str(title.trim_end());
            updated.push_str(newline);
            updated.push_str(newline);
        }
        for line in entry.lines() {
            updated.push_str(line);
            updated.push_str(newline);
        }
        if !previous.is_empty() {
            updated.push_str(newline);
            updated.push_str(previous);
        }

        Ok(updated)
    }
}
