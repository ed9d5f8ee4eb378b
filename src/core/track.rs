use serde::{Deserialize, Serialize};

/// A track with a directly downloadable data file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackLeaf {
    /// Resolved download URL of the data file
    pub big_data_url: String,

    /// Display/selection group the track belongs to
    pub group_id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub long_label: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short_label: Option<String>,

    /// Track type as reported by the catalog (e.g., `bigBed 12`)
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub track_type: Option<String>,

    /// MD5 of the data file, when the assembly's manifest lists it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub md5_hash: Option<String>,
}

/// A grouping track that embeds child tracks instead of pointing at data
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackComposite {
    pub group_id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub long_label: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short_label: Option<String>,

    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub track_type: Option<String>,

    /// Child tracks in payload order
    pub tracks: Vec<TrackNode>,
}

/// Node of a resolved track tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TrackNode {
    Leaf(TrackLeaf),
    Composite(TrackComposite),
}

impl TrackNode {
    #[must_use]
    pub fn group_id(&self) -> &str {
        match self {
            Self::Leaf(leaf) => &leaf.group_id,
            Self::Composite(composite) => &composite.group_id,
        }
    }

    #[must_use]
    pub fn short_label(&self) -> Option<&str> {
        match self {
            Self::Leaf(leaf) => leaf.short_label.as_deref(),
            Self::Composite(composite) => composite.short_label.as_deref(),
        }
    }

    #[must_use]
    pub fn long_label(&self) -> Option<&str> {
        match self {
            Self::Leaf(leaf) => leaf.long_label.as_deref(),
            Self::Composite(composite) => composite.long_label.as_deref(),
        }
    }

    #[must_use]
    pub fn is_composite(&self) -> bool {
        matches!(self, Self::Composite(_))
    }

    /// Iterate over every leaf in this subtree, depth first
    pub fn leaves(&self) -> Box<dyn Iterator<Item = &TrackLeaf> + '_> {
        match self {
            Self::Leaf(leaf) => Box::new(std::iter::once(leaf)),
            Self::Composite(composite) => {
                Box::new(composite.tracks.iter().flat_map(TrackNode::leaves))
            }
        }
    }
}

/// Root tracks sharing a `group_id`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackGroup {
    pub group_id: String,
    pub tracks: Vec<TrackNode>,
}

/// Resolved tracks of one assembly, as handed to the workflow configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackCatalog {
    pub assembly: String,

    /// When the track list was resolved (RFC 3339)
    pub resolved_at: String,

    /// False when checksum acquisition degraded to an empty manifest
    pub checksums_available: bool,

    pub tracks: Vec<TrackNode>,
}

impl TrackCatalog {
    /// Total number of leaf tracks in the tree
    #[must_use]
    pub fn leaf_count(&self) -> usize {
        self.tracks.iter().map(|t| t.leaves().count()).sum()
    }

    /// Number of leaves that carry a resolved checksum
    #[must_use]
    pub fn checksum_count(&self) -> usize {
        self.tracks
            .iter()
            .flat_map(TrackNode::leaves)
            .filter(|leaf| leaf.md5_hash.is_some())
            .count()
    }
}
