//! Selection of qualified test paths.
//!
//! A plain pattern is split on `/` and matches when its segments are a prefix
//! of the path's segments, counted either from the root label or from just
//! below it. `reed solomon`, `unit/reed solomon` and
//! `reed solomon/encode` all select `unit/reed solomon/encode`.
//!
//! A pattern containing `*`, `?` or `[` is a glob matched against the whole
//! qualified path. Several patterns are OR-ed. A blank pattern is rejected
//! rather than treated as selecting everything.

use crate::error::{HarnessError, Result};
use crate::testing::suite::PATH_SEPARATOR;

#[derive(Debug, Clone)]
enum Pattern {
    Segments(Vec<String>),
    Glob(glob::Pattern),
}

impl Pattern {
    fn parse(raw: &str) -> Result<Self> {
        if raw.contains(['*', '?', '[']) {
            let trimmed = raw.trim_start_matches(PATH_SEPARATOR);
            return glob::Pattern::new(trimmed)
                .map(Self::Glob)
                .map_err(|err| HarnessError::InvalidArgument(format!("pattern '{raw}': {err}")));
        }
        let segments = split_segments(raw);
        if segments.is_empty() {
            return Err(HarnessError::InvalidArgument(format!(
                "pattern '{raw}' names no suite or test"
            )));
        }
        Ok(Self::Segments(segments))
    }

    fn matches(&self, path: &str) -> bool {
        match self {
            Self::Glob(pattern) => pattern.matches(path),
            Self::Segments(wanted) => {
                let segments: Vec<&str> = path.split(PATH_SEPARATOR).collect();
                starts_with(&segments, wanted)
                    || segments
                        .split_first()
                        .is_some_and(|(_, below_root)| starts_with(below_root, wanted))
            }
        }
    }
}

fn split_segments(raw: &str) -> Vec<String> {
    raw.split(PATH_SEPARATOR)
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .map(str::to_string)
        .collect()
}

fn starts_with(segments: &[&str], wanted: &[String]) -> bool {
    wanted.len() <= segments.len() && segments.iter().zip(wanted).all(|(have, want)| have == want)
}

/// Set of patterns restricting which cases execute.
#[derive(Debug, Clone, Default)]
pub struct Selection {
    raw: Vec<String>,
    patterns: Vec<Pattern>,
}

impl Selection {
    /// Selection that matches every case.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Parse command-line selection arguments.
    pub fn parse<S: AsRef<str>>(patterns: &[S]) -> Result<Self> {
        let raw: Vec<String> = patterns.iter().map(|p| p.as_ref().to_string()).collect();
        let patterns = raw
            .iter()
            .map(|pattern| Pattern::parse(pattern))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { raw, patterns })
    }

    /// True when no pattern was given.
    #[must_use]
    pub fn is_all(&self) -> bool {
        self.patterns.is_empty()
    }

    #[must_use]
    pub fn matches(&self, path: &str) -> bool {
        self.is_all() || self.patterns.iter().any(|pattern| pattern.matches(path))
    }

    /// The patterns as given, for messages.
    #[must_use]
    pub fn describe(&self) -> String {
        if self.raw.is_empty() {
            "<all>".to_string()
        } else {
            self.raw.join(", ")
        }
    }
}
