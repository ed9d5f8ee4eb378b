use serde::Deserialize;
use serde_json::{Map, Value};

use crate::parsing::ParseError;

/// One track record from the track-list payload, after schema validation.
///
/// All fields are optional strings; a record whose schema fields hold
/// anything but strings fails to deserialize and is dropped by the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackRecord {
    #[serde(default)]
    pub big_data_url: Option<String>,

    #[serde(default)]
    pub composite_container: Option<String>,

    #[serde(default)]
    pub group: Option<String>,

    #[serde(default)]
    pub long_label: Option<String>,

    #[serde(default)]
    pub short_label: Option<String>,

    #[serde(default, rename = "type")]
    pub track_type: Option<String>,
}

impl TrackRecord {
    /// Validate a raw payload value against the record schema
    ///
    /// # Errors
    ///
    /// Returns `ParseError::InvalidFormat` if the value is not an object, or
    /// `ParseError::Json` if a schema field holds a non-string value.
    pub fn from_value(value: &Value) -> Result<Self, ParseError> {
        if !value.is_object() {
            return Err(ParseError::InvalidFormat(
                "track record is not an object".to_string(),
            ));
        }
        Ok(Self::deserialize(value)?)
    }

    #[must_use]
    pub fn is_composite(&self) -> bool {
        self.composite_container.as_deref() == Some("TRUE")
    }
}

/// Whether a property value of a composite record is one of its child tracks.
///
/// Child tracks are embedded as object-valued properties that carry a
/// `parent` key; every other property is metadata.
#[must_use]
pub fn is_child_track(value: &Value) -> bool {
    value
        .as_object()
        .is_some_and(|object| object.contains_key("parent"))
}

/// Child tracks of a composite record as `(name, value)`, in payload order
pub fn child_entries(record: &Value) -> impl Iterator<Item = (&String, &Value)> {
    record
        .as_object()
        .into_iter()
        .flat_map(Map::iter)
        .filter(|(_, value)| is_child_track(value))
}

/// Extract the object holding the tracks of `assembly` from a payload
///
/// # Errors
///
/// Returns `ParseError::Payload` if the payload is not an object or does
/// not hold an object under the assembly key.
pub fn tracks_container<'a>(
    payload: &'a Value,
    assembly: &str,
) -> Result<&'a Map<String, Value>, ParseError> {
    let Some(root) = payload.as_object() else {
        return Err(ParseError::Payload(
            "Tracks API response value is not an object".to_string(),
        ));
    };

    root.get(assembly)
        .and_then(Value::as_object)
        .ok_or_else(|| {
            ParseError::Payload(format!(
                "Tracks API response does not contain an object under key {}",
                Value::String(assembly.to_string())
            ))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_record_schema() {
        let record = TrackRecord::from_value(&json!({
            "bigDataUrl": "/gbdb/genark/GCF/000/002/765/GCF_000002765.6/bbi/genes.bb",
            "group": "genes",
            "shortLabel": "Genes",
            "type": "bigBed 12",
            "visibility": "pack",
            "itemRgb": 1
        }))
        .unwrap();

        assert_eq!(record.group.as_deref(), Some("genes"));
        assert_eq!(record.track_type.as_deref(), Some("bigBed 12"));
        assert!(!record.is_composite());
    }

    #[test]
    fn test_record_rejects_non_string_field() {
        assert!(TrackRecord::from_value(&json!({"group": 5})).is_err());
        assert!(TrackRecord::from_value(&json!("genes")).is_err());
        assert!(TrackRecord::from_value(&json!(null)).is_err());
    }

    #[test]
    fn test_composite_flag_is_exact() {
        let record = TrackRecord::from_value(&json!({"compositeContainer": "TRUE"})).unwrap();
        assert!(record.is_composite());
        let record = TrackRecord::from_value(&json!({"compositeContainer": "true"})).unwrap();
        assert!(!record.is_composite());
    }

    #[test]
    fn test_child_entries() {
        let composite = json!({
            "compositeContainer": "TRUE",
            "group": "genes",
            "first": {"parent": "comp", "bigDataUrl": "/gbdb/genark/a.bb"},
            "settings": {"visibility": "dense"},
            "second": {"parent": "comp on", "bigDataUrl": "/gbdb/genark/b.bb"},
            "label": "text"
        });

        let children: Vec<(&String, &Value)> = child_entries(&composite).collect();
        assert_eq!(children.len(), 2);
        assert_eq!(children[0].0, "first");
        assert_eq!(children[0].1["bigDataUrl"], "/gbdb/genark/a.bb");
        assert_eq!(children[1].0, "second");
    }

    #[test]
    fn test_tracks_container_errors() {
        let err = tracks_container(&json!([1, 2]), "GCF_1").unwrap_err();
        assert_eq!(err.to_string(), "Tracks API response value is not an object");

        let err = tracks_container(&json!({"GCF_1": "x"}), "GCF_1").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Tracks API response does not contain an object under key \"GCF_1\""
        );

        let payload = json!({"GCF_1": {"t": {}}});
        assert_eq!(tracks_container(&payload, "GCF_1").unwrap().len(), 1);
    }
}
