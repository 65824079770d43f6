use crate::error::{FixError, Result};

/// Directory name that marks where project-relative fixture paths begin.
pub const DEFAULT_ANCHOR: &str = "test";

/// Token that introduces an absolute file URI in the log.
pub const URI_MARKER: &str = "file:///";

/// Turns absolute paths reported in a build log into fixture paths relative
/// to the project's test directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathResolver {
    anchor: String,
}

impl Default for PathResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl PathResolver {
    pub fn new() -> Self {
        Self {
            anchor: DEFAULT_ANCHOR.to_string(),
        }
    }

    /// Use a different anchor directory. The anchor is a single path segment,
    /// so it may not be empty or contain a separator.
    pub fn with_anchor<S: Into<String>>(mut self, anchor: S) -> Result<Self> {
        let anchor = anchor.into();
        let trimmed = anchor.trim();
        if trimmed.is_empty() || trimmed.contains(['/', '\\']) {
            return Err(FixError::InvalidAnchor(anchor));
        }
        self.anchor = trimmed.to_string();
        Ok(self)
    }

    pub fn anchor(&self) -> &str {
        &self.anchor
    }

    /// Resolve `full_path` to `./<suffix>`, where `<suffix>` is everything after
    /// the first `<anchor>/` segment. Returns `None` when the anchor segment is
    /// absent or nothing follows it.
    pub fn resolve(&self, full_path: &str) -> Option<String> {
        let needle = format!("{}/", self.anchor);
        let mut from = 0;
        while let Some(found) = full_path[from..].find(&needle) {
            let start = from + found;
            let at_boundary = start == 0 || full_path[..start].ends_with(['/', '\\']);
            if at_boundary {
                let suffix = full_path[start + needle.len()..].trim();
                if suffix.is_empty() {
                    return None;
                }
                return Some(format!("./{suffix}"));
            }
            from = start + needle.len();
        }
        None
    }

    /// Resolve the URI carried by a log line, if any.
    pub fn resolve_line(&self, line: &str) -> Option<String> {
        extract_uri(line).and_then(|uri| self.resolve(uri))
    }
}

/// Return the path following `file:///` on `line`, trimmed.
pub fn extract_uri(line: &str) -> Option<&str> {
    let start = line.find(URI_MARKER)? + URI_MARKER.len();
    let uri = line[start..].trim();
    if uri.is_empty() { None } else { Some(uri) }
}
