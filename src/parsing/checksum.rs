use std::collections::HashMap;
use std::path::Path;

use crate::parsing::ParseError;
use crate::utils::validation::{check_limit, normalize_md5, MAX_MANIFEST_ENTRIES};

/// MD5 checksums keyed by the path written in the manifest.
///
/// Keys are stored exactly as they appear (`GCF_1.fa.gz`, `./GCF_1.fa.gz`,
/// `/mirrordata/hubs/.../GCF_1.fa.gz` are all distinct). An empty map is a
/// valid value and means "no checksums known".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChecksumMap(HashMap<String, String>);

impl ChecksumMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: impl Into<String>, md5: impl Into<String>) {
        self.0.insert(path.into(), md5.into());
    }

    #[must_use]
    pub fn get(&self, path: &str) -> Option<&str> {
        self.0.get(path).map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Find an entry whose key ends with `suffix`
    #[must_use]
    pub fn find_by_suffix(&self, suffix: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(key, _)| key.ends_with(suffix))
            .map(|(_, md5)| md5.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl FromIterator<(String, String)> for ChecksumMap {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Parse an `md5sum`-style manifest file
///
/// # Errors
///
/// Returns `ParseError::Io` if the file cannot be read, or
/// `ParseError::TooManyEntries` if the manifest exceeds the entry limit.
pub fn parse_manifest_file(path: &Path) -> Result<ChecksumMap, ParseError> {
    let content = std::fs::read_to_string(path)?;
    parse_manifest(&content)
}

/// Parse manifest text with lines of `<md5><whitespace><path>`.
///
/// The path is the rest of the line after the first run of whitespace, so
/// it may itself contain spaces. Blank lines, lines without a path, and
/// lines whose hash is not hexadecimal are skipped. Full 32-digit MD5s are
/// normalized to lowercase; other hex digests are kept as written.
///
/// # Errors
///
/// Returns `ParseError::TooManyEntries` if the manifest exceeds the entry limit.
pub fn parse_manifest(text: &str) -> Result<ChecksumMap, ParseError> {
    let mut map = ChecksumMap::new();

    for (i, line) in text.lines().enumerate() {
        let Some((hash, rest)) = line.trim().split_once(char::is_whitespace) else {
            continue;
        };
        let path = rest.trim_start();
        if path.is_empty() {
            continue;
        }

        let md5 = match normalize_md5(hash) {
            Some(md5) => md5,
            None if hash.chars().all(|c| c.is_ascii_hexdigit()) => hash.to_string(),
            None => {
                tracing::debug!(line = i + 1, "Skipping manifest line with invalid hash");
                continue;
            }
        };

        if check_limit(map.len(), MAX_MANIFEST_ENTRIES, "manifest entries").is_some() {
            return Err(ParseError::TooManyEntries(map.len()));
        }

        map.insert(path, md5);
    }

    Ok(map)
}
