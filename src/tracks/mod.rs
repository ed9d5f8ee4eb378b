//! Track hierarchy resolution for an assembly.
//!
//! The genome browser reports an assembly's tracks as one flat JSON object
//! keyed by track name. This module turns that payload into a tree of
//! [`TrackNode`]s with resolved download URLs, and attaches MD5 checksums
//! from the assembly's `md5sum.txt` manifest when one can be found.
//!
//! - [`resolver`]: Pure payload-to-tree transformation and checksum lookup
//! - [`client`]: Fetching the payload and the checksum manifest
//!
//! Checksum acquisition never fails the resolution: any problem degrades
//! to an empty [`ChecksumMap`] and a warning.
//!
//! [`TrackNode`]: crate::core::track::TrackNode
//! [`ChecksumMap`]: crate::parsing::checksum::ChecksumMap

use thiserror::Error;

use crate::http::FetchError;
use crate::parsing::ParseError;

pub mod client;
pub mod resolver;

#[derive(Error, Debug)]
pub enum TrackError {
    #[error(transparent)]
    Payload(#[from] ParseError),

    #[error("bigDataUrl not in expected format: {0:?}")]
    BigDataUrl(String),

    #[error("Received {code} {reason} status from tracks API")]
    Status { code: u16, reason: String },

    #[error("Tracks API request failed: {0}")]
    Fetch(FetchError),
}

impl From<FetchError> for TrackError {
    fn from(err: FetchError) -> Self {
        match err {
            FetchError::Status { code, reason } => Self::Status { code, reason },
            other => Self::Fetch(other),
        }
    }
}
