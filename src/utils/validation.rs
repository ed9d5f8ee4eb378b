//! Centralized validation and helper functions.

use std::io::Read;
use std::path::Path;

/// Maximum number of entries accepted from a single checksum manifest (DOS protection)
pub const MAX_MANIFEST_ENTRIES: usize = 1_000_000;

/// Maximum number of read runs accepted from a single search response (DOS protection)
pub const MAX_READ_RUNS: usize = 500_000;

/// Validate that a string is a valid MD5 checksum (32 hex characters).
///
/// # Examples
///
/// ```
/// use assembly_config::utils::validation::is_valid_md5;
///
/// assert!(is_valid_md5("6aef897c3d6ff0c78aff06ac189178dd"));
/// assert!(!is_valid_md5("not-an-md5"));
/// assert!(!is_valid_md5("6aef897c3d6ff0c78aff06ac189178d")); // 31 chars
/// ```
#[must_use]
pub fn is_valid_md5(s: &str) -> bool {
    s.len() == 32 && s.chars().all(|c| c.is_ascii_hexdigit())
}

/// Normalize an MD5 string to lowercase.
/// Returns None if the input is not a valid MD5.
#[must_use]
pub fn normalize_md5(s: &str) -> Option<String> {
    if is_valid_md5(s) {
        Some(s.to_lowercase())
    } else {
        None
    }
}

/// Compute the MD5 of a local file as a lowercase hex string.
///
/// The file is streamed in fixed-size chunks so large FASTA/bigBed files
/// are never held in memory.
///
/// # Errors
///
/// Returns an I/O error if the file cannot be opened or read.
pub fn md5_of_file(path: &Path) -> std::io::Result<String> {
    let mut file = std::fs::File::open(path)?;
    let mut context = md5::Context::new();
    let mut buffer = [0u8; 64 * 1024];

    loop {
        let n = file.read(&mut buffer)?;
        if n == 0 {
            break;
        }
        context.consume(&buffer[..n]);
    }

    Ok(format!("{:x}", context.compute()))
}

/// Check if adding another item would exceed `limit`.
///
/// Call this with the current count BEFORE adding a new item.
/// Returns an error message if adding would exceed the limit, None if safe to add.
///
/// # Example
/// ```ignore
/// if check_limit(entries.len(), MAX_MANIFEST_ENTRIES, "manifest entries").is_some() {
///     break;
/// }
/// entries.push(entry); // Safe to add
/// ```
#[must_use]
pub fn check_limit(count: usize, limit: usize, what: &str) -> Option<String> {
    if count >= limit {
        Some(format!(
            "Too many {what}: adding another would exceed maximum of {limit}"
        ))
    } else {
        None
    }
}
