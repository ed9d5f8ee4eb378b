use serde_json::Value;

use crate::core::track::{TrackComposite, TrackGroup, TrackLeaf, TrackNode};
use crate::parsing::checksum::ChecksumMap;
use crate::parsing::track_list::{child_entries, tracks_container, TrackRecord};
use crate::tracks::TrackError;

/// Server-internal prefix every resolvable `bigDataUrl` starts with
const GBDB_PREFIX: &str = "/gbdb/genark/";

/// Turns a track-list payload into a resolved track tree for one assembly.
///
/// Resolution is a pure function of the payload, the assembly, the
/// checksum map and the download base: resolving the same payload twice
/// yields equal trees.
#[derive(Debug, Clone, Copy)]
pub struct TrackResolver<'a> {
    assembly: &'a str,
    checksums: &'a ChecksumMap,
    download_base: &'a str,
}

impl<'a> TrackResolver<'a> {
    #[must_use]
    pub fn new(assembly: &'a str, checksums: &'a ChecksumMap, download_base: &'a str) -> Self {
        Self {
            assembly,
            checksums,
            download_base: download_base.trim_end_matches('/'),
        }
    }

    /// Build the root track nodes, in payload order.
    ///
    /// Records that fail the schema, lack a `group`, or are leaves without a
    /// `bigDataUrl` are dropped; their siblings are unaffected.
    ///
    /// # Errors
    ///
    /// Returns `TrackError::Payload` if the payload has no track object for
    /// the assembly, or `TrackError::BigDataUrl` if any kept leaf (top-level
    /// or child) has a `bigDataUrl` outside the expected prefix.
    pub fn resolve(&self, payload: &Value) -> Result<Vec<TrackNode>, TrackError> {
        let container = tracks_container(payload, self.assembly)?;

        let mut nodes = Vec::with_capacity(container.len());
        for (name, value) in container {
            if let Some(node) = self.build_node(name, value)? {
                nodes.push(node);
            }
        }
        Ok(nodes)
    }

    fn build_node(&self, name: &str, value: &Value) -> Result<Option<TrackNode>, TrackError> {
        let Some(record) = validated_record(name, value) else {
            return Ok(None);
        };

        if !record.is_composite() {
            return Ok(self.build_leaf(name, record)?.map(TrackNode::Leaf));
        }

        let Some(group_id) = record.group else {
            tracing::debug!(track = %name, "Dropping composite track without group");
            return Ok(None);
        };

        let mut tracks = Vec::new();
        for (child_name, child_value) in child_entries(value) {
            let Some(child) = validated_record(child_name, child_value) else {
                continue;
            };
            if let Some(leaf) = self.build_leaf(child_name, child)? {
                tracks.push(TrackNode::Leaf(leaf));
            }
        }

        Ok(Some(TrackNode::Composite(TrackComposite {
            group_id,
            long_label: record.long_label,
            short_label: record.short_label,
            track_type: record.track_type,
            tracks,
        })))
    }

    fn build_leaf(&self, name: &str, record: TrackRecord) -> Result<Option<TrackLeaf>, TrackError> {
        let Some(group_id) = record.group else {
            tracing::debug!(track = %name, "Dropping track without group");
            return Ok(None);
        };
        let Some(path) = record.big_data_url else {
            tracing::debug!(track = %name, "Dropping track without bigDataUrl");
            return Ok(None);
        };

        let big_data_url = full_big_data_url(&path, self.download_base)?;
        let md5_hash = checksum_for_path(&big_data_url, self.assembly, self.checksums)
            .map(str::to_string);

        Ok(Some(TrackLeaf {
            big_data_url,
            group_id,
            long_label: record.long_label,
            short_label: record.short_label,
            track_type: record.track_type,
            md5_hash,
        }))
    }
}

fn validated_record(name: &str, value: &Value) -> Option<TrackRecord> {
    match TrackRecord::from_value(value) {
        Ok(record) => Some(record),
        Err(e) => {
            tracing::debug!(track = %name, error = %e, "Dropping track that fails schema validation");
            None
        }
    }
}

/// Convert a server-internal `bigDataUrl` path into a public download URL.
///
/// `/gbdb/genark/<rest>` maps to `<download_base>/hubs/<rest>`.
///
/// # Errors
///
/// Returns `TrackError::BigDataUrl` for any path outside `/gbdb/genark/`.
pub fn full_big_data_url(path: &str, download_base: &str) -> Result<String, TrackError> {
    match path.strip_prefix(GBDB_PREFIX) {
        Some(rest) if !rest.contains('\n') => Ok(format!(
            "{}/hubs/{rest}",
            download_base.trim_end_matches('/')
        )),
        _ => Err(TrackError::BigDataUrl(path.to_string())),
    }
}

/// Look up the manifest checksum for a resolved download URL.
///
/// The path relative to the assembly directory (everything after the first
/// `<assembly>/`) is tried as is, then with a `./` prefix, then against
/// manifest keys that are absolute paths ending in `/<assembly>/<relative>`.
#[must_use]
pub fn checksum_for_path<'m>(
    url: &str,
    assembly: &str,
    checksums: &'m ChecksumMap,
) -> Option<&'m str> {
    if checksums.is_empty() {
        return None;
    }

    let marker = format!("{assembly}/");
    let start = url.find(&marker)? + marker.len();
    let relative = &url[start..];

    checksums
        .get(relative)
        .or_else(|| checksums.get(&format!("./{relative}")))
        .or_else(|| checksums.find_by_suffix(&format!("/{assembly}/{relative}")))
}

/// Group root nodes by `group_id`, groups and members in first-seen order
#[must_use]
pub fn group_tracks(nodes: &[TrackNode]) -> Vec<TrackGroup> {
    let mut groups: Vec<TrackGroup> = Vec::new();
    for node in nodes {
        match groups.iter_mut().find(|g| g.group_id == node.group_id()) {
            Some(group) => group.tracks.push(node.clone()),
            None => groups.push(TrackGroup {
                group_id: node.group_id().to_string(),
                tracks: vec![node.clone()],
            }),
        }
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const ASSEMBLY: &str = "GCF_045689255.1";
    const BASE: &str = "https://hgdownload.soe.ucsc.edu";
    const FA_URL: &str =
        "https://hgdownload.soe.ucsc.edu/hubs/GCF/045/689/255/GCF_045689255.1/GCF_045689255.1.fa.gz";

    fn checksums(entries: &[(&str, &str)]) -> ChecksumMap {
        entries
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    fn payload() -> Value {
        json!({
            ASSEMBLY: {
                "ncbiGene": {
                    "bigDataUrl": "/gbdb/genark/GCF/045/689/255/GCF_045689255.1/bbi/ncbiGene.bb",
                    "group": "genes",
                    "shortLabel": "NCBI Genes",
                    "longLabel": "NCBI RefSeq genes",
                    "type": "bigGenePred"
                },
                "noGroup": {
                    "bigDataUrl": "/gbdb/genark/GCF/045/689/255/GCF_045689255.1/bbi/x.bb"
                },
                "badSchema": {
                    "bigDataUrl": 12,
                    "group": "genes"
                },
                "notAnObject": "hello",
                "repeats": {
                    "compositeContainer": "TRUE",
                    "group": "varRep",
                    "shortLabel": "Repeats",
                    "visibility": "dense",
                    "rmsk": {
                        "parent": "repeats",
                        "bigDataUrl": "/gbdb/genark/GCF/045/689/255/GCF_045689255.1/bbi/rmsk.bb",
                        "group": "varRep",
                        "shortLabel": "RepeatMasker"
                    },
                    "orphanChild": {
                        "parent": "repeats on",
                        "bigDataUrl": "/gbdb/genark/GCF/045/689/255/GCF_045689255.1/bbi/simple.bb"
                    },
                    "noUrlChild": {
                        "parent": "repeats",
                        "group": "varRep"
                    }
                },
                "gc5": {
                    "bigDataUrl": "/gbdb/genark/GCF/045/689/255/GCF_045689255.1/bbi/gc5.bw",
                    "group": "map"
                }
            }
        })
    }

    #[test]
    fn test_resolve_tree() {
        let map = checksums(&[("bbi/ncbiGene.bb", "0123456789abcdef0123456789abcdef")]);
        let resolver = TrackResolver::new(ASSEMBLY, &map, BASE);
        let nodes = resolver.resolve(&payload()).unwrap();

        assert_eq!(nodes.len(), 3);

        let TrackNode::Leaf(gene) = &nodes[0] else {
            panic!("expected leaf");
        };
        assert_eq!(
            gene.big_data_url,
            "https://hgdownload.soe.ucsc.edu/hubs/GCF/045/689/255/GCF_045689255.1/bbi/ncbiGene.bb"
        );
        assert_eq!(gene.md5_hash.as_deref(), Some("0123456789abcdef0123456789abcdef"));
        assert_eq!(gene.track_type.as_deref(), Some("bigGenePred"));

        let TrackNode::Composite(repeats) = &nodes[1] else {
            panic!("expected composite");
        };
        assert_eq!(repeats.group_id, "varRep");
        assert_eq!(repeats.tracks.len(), 1);
        assert_eq!(repeats.tracks[0].short_label(), Some("RepeatMasker"));

        assert_eq!(nodes[2].group_id(), "map");
    }

    #[test]
    fn test_resolve_is_idempotent() {
        let map = ChecksumMap::new();
        let resolver = TrackResolver::new(ASSEMBLY, &map, BASE);
        let first = resolver.resolve(&payload()).unwrap();
        let second = resolver.resolve(&payload()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_composite_without_group_drops_children() {
        let payload = json!({
            ASSEMBLY: {
                "comp": {
                    "compositeContainer": "TRUE",
                    "child": {
                        "parent": "comp",
                        "group": "genes",
                        "bigDataUrl": "/gbdb/genark/a.bb"
                    }
                }
            }
        });
        let map = ChecksumMap::new();
        let nodes = TrackResolver::new(ASSEMBLY, &map, BASE)
            .resolve(&payload)
            .unwrap();
        assert!(nodes.is_empty());
    }

    #[test]
    fn test_bad_big_data_url_is_fatal() {
        let payload = json!({
            ASSEMBLY: {
                "t": { "bigDataUrl": "/gbdb/hg38/t.bb", "group": "genes" }
            }
        });
        let map = ChecksumMap::new();
        let err = TrackResolver::new(ASSEMBLY, &map, BASE)
            .resolve(&payload)
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "bigDataUrl not in expected format: \"/gbdb/hg38/t.bb\""
        );
    }

    #[test]
    fn test_payload_errors() {
        let map = ChecksumMap::new();
        let resolver = TrackResolver::new(ASSEMBLY, &map, BASE);

        let err = resolver.resolve(&json!("nope")).unwrap_err();
        assert_eq!(err.to_string(), "Tracks API response value is not an object");

        let err = resolver.resolve(&json!({"other": {}})).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Tracks API response does not contain an object under key \"GCF_045689255.1\""
        );
    }

    #[test]
    fn test_full_big_data_url() {
        assert_eq!(
            full_big_data_url("/gbdb/genark/GCA/000/a.bb", BASE).unwrap(),
            "https://hgdownload.soe.ucsc.edu/hubs/GCA/000/a.bb"
        );
        assert!(full_big_data_url("gbdb/genark/a.bb", BASE).is_err());
        assert!(full_big_data_url("https://example.org/a.bb", BASE).is_err());
    }

    #[test]
    fn test_checksum_empty_map() {
        assert_eq!(checksum_for_path(FA_URL, ASSEMBLY, &ChecksumMap::new()), None);
    }

    #[test]
    fn test_checksum_direct_match() {
        let map = checksums(&[("GCF_045689255.1.fa.gz", "84adf5fc228278369f6cc70e9d6080fe")]);
        assert_eq!(
            checksum_for_path(FA_URL, ASSEMBLY, &map),
            Some("84adf5fc228278369f6cc70e9d6080fe")
        );
    }

    #[test]
    fn test_checksum_dot_slash_prefix() {
        let map = checksums(&[("./GCF_045689255.1.fa.gz", "84adf5fc228278369f6cc70e9d6080fe")]);
        assert_eq!(
            checksum_for_path(FA_URL, ASSEMBLY, &map),
            Some("84adf5fc228278369f6cc70e9d6080fe")
        );
    }

    #[test]
    fn test_checksum_mirrordata_path() {
        let map = checksums(&[(
            "/mirrordata/hubs/GCF/045/689/255/GCF_045689255.1/GCF_045689255.1.fa.gz",
            "84adf5fc228278369f6cc70e9d6080fe",
        )]);
        assert_eq!(
            checksum_for_path(FA_URL, ASSEMBLY, &map),
            Some("84adf5fc228278369f6cc70e9d6080fe")
        );
    }

    #[test]
    fn test_checksum_nested_paths() {
        let map = checksums(&[("tracks/genes/refGene.bb", "abcdef1234567890")]);
        assert_eq!(
            checksum_for_path(
                "https://hgdownload.soe.ucsc.edu/hubs/GCF/045/689/255/GCF_045689255.1/tracks/genes/refGene.bb",
                ASSEMBLY,
                &map
            ),
            Some("abcdef1234567890")
        );

        let map = checksums(&[(
            "ixIxx/GCF_900681995.1_PVVCY_v1.ncbiRefSeq.ixx",
            "03a185d82fc672063b4c6a1fa18a6713",
        )]);
        assert_eq!(
            checksum_for_path(
                "https://hgdownload.soe.ucsc.edu/hubs/GCF/900/681/995/GCF_900681995.1/ixIxx/GCF_900681995.1_PVVCY_v1.ncbiRefSeq.ixx",
                "GCF_900681995.1",
                &map
            ),
            Some("03a185d82fc672063b4c6a1fa18a6713")
        );
    }

    #[test]
    fn test_checksum_unrelated_url() {
        let map = checksums(&[("GCF_045689255.1.fa.gz", "84adf5fc228278369f6cc70e9d6080fe")]);
        assert_eq!(
            checksum_for_path(
                "https://hgdownload.soe.ucsc.edu/hubs/some/other/path/file.fa.gz",
                ASSEMBLY,
                &map
            ),
            None
        );
    }

    #[test]
    fn test_group_tracks() {
        let map = ChecksumMap::new();
        let nodes = TrackResolver::new(ASSEMBLY, &map, BASE)
            .resolve(&json!({
                ASSEMBLY: {
                    "a": {"bigDataUrl": "/gbdb/genark/a.bb", "group": "genes"},
                    "b": {"bigDataUrl": "/gbdb/genark/b.bb", "group": "map"},
                    "c": {"bigDataUrl": "/gbdb/genark/c.bb", "group": "genes"}
                }
            }))
            .unwrap();

        let groups = group_tracks(&nodes);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].group_id, "genes");
        assert_eq!(groups[0].tracks.len(), 2);
        assert_eq!(groups[1].group_id, "map");
    }
}
