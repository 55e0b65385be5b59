// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Annotation data structures.
//!
//! This module defines labeled bounding boxes in normalized center/size
//! form, the looser import record they are built from, and the per-image
//! records handed to the save sink.

use serde::{Deserialize, Serialize};

/// Unique identifier for an annotation.
pub type AnnotationId = String;

/// Generate a fresh client-side annotation id.
pub fn generate_id() -> AnnotationId {
    uuid::Uuid::new_v4().to_string()
}

/// Identifier as the backend or a session file may spell it.
///
/// The backend hands out numeric ids while client-side ids are text, so
/// both are accepted and normalized to text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawId {
    Number(i64),
    Text(String),
}

impl RawId {
    pub fn into_string(self) -> String {
        match self {
            RawId::Number(n) => n.to_string(),
            RawId::Text(s) => s,
        }
    }
}

/// Deserialize an id that may be written as a number or a string.
pub fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    RawId::deserialize(deserializer).map(RawId::into_string)
}

/// Normalized center/size box, all values in 0.0..=1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoxGeometry {
    pub x_center: f64,
    pub y_center: f64,
    pub width: f64,
    pub height: f64,
}

/// A labeled bounding box on one image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Annotation {
    pub id: AnnotationId,
    #[serde(flatten)]
    pub geometry: BoxGeometry,
    pub label: String,
}

impl Annotation {
    /// Create a new annotation with a freshly generated id.
    pub fn new(geometry: BoxGeometry, label: impl Into<String>) -> Self {
        Self {
            id: generate_id(),
            geometry,
            label: label.into(),
        }
    }
}

/// Annotation as supplied by the server or a session file; the id may be
/// missing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawAnnotation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RawId>,
    #[serde(flatten)]
    pub geometry: BoxGeometry,
    pub label: String,
}

impl RawAnnotation {
    /// Convert to an [`Annotation`], keeping the source id or synthesizing
    /// one when it is absent.
    pub fn into_annotation(self) -> Annotation {
        Annotation {
            id: self.id.map(RawId::into_string).unwrap_or_else(generate_id),
            geometry: self.geometry,
            label: self.label,
        }
    }
}

/// All annotations of one image, as handed to the save sink.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageAnnotations {
    pub image_id: String,
    pub annotations: Vec<Annotation>,
}

impl ImageAnnotations {
    pub fn new(image_id: impl Into<String>, annotations: Vec<Annotation>) -> Self {
        Self {
            image_id: image_id.into(),
            annotations,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_annotation_keeps_numeric_id() {
        let raw: RawAnnotation = serde_json::from_str(
            r#"{"id": 42, "label": "cat",
                "xCenter": 0.5, "yCenter": 0.4, "width": 0.2, "height": 0.1}"#,
        )
        .unwrap();

        let annotation = raw.into_annotation();
        assert_eq!(annotation.id, "42");
        assert_eq!(annotation.label, "cat");
        assert_eq!(annotation.geometry.y_center, 0.4);
    }

    #[test]
    fn test_raw_annotation_synthesizes_missing_id() {
        let raw: RawAnnotation = serde_json::from_str(
            r#"{"label": "dog", "xCenter": 0.1, "yCenter": 0.1, "width": 0.1, "height": 0.1}"#,
        )
        .unwrap();

        let first = raw.clone().into_annotation();
        let second = raw.into_annotation();
        assert!(!first.id.is_empty());
        assert_ne!(first.id, second.id);
    }

    #[test]
    fn test_annotation_serializes_camel_case() {
        let annotation = Annotation {
            id: "a1".to_string(),
            geometry: BoxGeometry {
                x_center: 0.5,
                y_center: 0.5,
                width: 0.2,
                height: 0.2,
            },
            label: "cat".to_string(),
        };

        let value = serde_json::to_value(&annotation).unwrap();
        assert_eq!(value["xCenter"], 0.5);
        assert_eq!(value["yCenter"], 0.5);
        assert_eq!(value["label"], "cat");
        assert_eq!(value["id"], "a1");
    }

    #[test]
    fn test_new_annotations_get_distinct_ids() {
        let geometry = BoxGeometry {
            x_center: 0.5,
            y_center: 0.5,
            width: 0.1,
            height: 0.1,
        };
        assert_ne!(Annotation::new(geometry, "a").id, Annotation::new(geometry, "a").id);
    }
}
