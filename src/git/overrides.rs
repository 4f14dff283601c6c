// ABOUTME: Loads user regexes that force matching paths to be treated as tracked

use regex::Regex;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use tracing::{debug, warn};

/// Ordered list of compiled patterns matched against root-relative paths
#[derive(Debug, Clone, Default)]
pub struct TrackedOverrides {
    patterns: Vec<Regex>,
}

impl TrackedOverrides {
    /// Load patterns from `file_name` inside `root`.
    ///
    /// A missing or unreadable file yields no patterns. Lines that fail to
    /// compile are dropped with a warning.
    pub fn load(root: &Path, file_name: &str) -> Self {
        let path = root.join(file_name);
        match fs::read_to_string(&path) {
            Ok(content) => Self::parse(&content, &path),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No tracked overrides file at {}", path.display());
                Self::default()
            }
            Err(e) => {
                warn!("Could not read {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    fn parse(content: &str, source: &Path) -> Self {
        let mut patterns = Vec::new();

        for line in content.lines() {
            if line.trim().is_empty() {
                continue;
            }
            match Regex::new(line) {
                Ok(regex) => {
                    debug!("Treating files matching regex '{}' as though they are tracked", line);
                    patterns.push(regex);
                }
                Err(e) => {
                    warn!("Could not compile {} in {}: {}", line, source.display(), e);
                }
            }
        }

        Self { patterns }
    }

    /// First pattern matching anywhere in `relative_path`, if any
    pub fn find_match(&self, relative_path: &str) -> Option<&Regex> {
        self.patterns.iter().find(|re| re.is_match(relative_path))
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn patterns(&self) -> impl Iterator<Item = &str> {
        self.patterns.iter().map(Regex::as_str)
    }
}
