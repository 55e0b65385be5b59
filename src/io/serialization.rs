// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Session file import and snapshot export.
//!
//! Session files list the images of a session and any annotations already
//! persisted for them, in YAML or JSON. Saved snapshots are written back
//! in either format, chosen by file extension.

use crate::io::media;
use crate::models::annotation::ImageAnnotations;
use crate::models::session::ImageRef;
use crate::models::store::InitialAnnotations;
use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// On-disk description of an annotation session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionFile {
    pub images: Vec<ImageRef>,
    #[serde(default)]
    pub annotations: InitialAnnotations,
}

impl SessionFile {
    /// Make relative local previews relative to `base_dir`.
    pub fn resolve_previews(&mut self, base_dir: &Path) {
        for image in &mut self.images {
            if media::is_remote(&image.preview) || Path::new(&image.preview).is_absolute() {
                continue;
            }
            image.preview = base_dir.join(&image.preview).to_string_lossy().into_owned();
        }
    }
}

enum Format {
    Yaml,
    Json,
}

fn format_of(path: &Path) -> Result<Format> {
    match path.extension().and_then(|s| s.to_str()) {
        Some("yaml") | Some("yml") => Ok(Format::Yaml),
        Some("json") => Ok(Format::Json),
        other => bail!("Unsupported file extension: {:?}", other),
    }
}

/// Read a session file, resolving previews against its directory.
pub fn import_session(path: &Path) -> Result<SessionFile> {
    let text = std::fs::read_to_string(path)?;
    let mut session: SessionFile = match format_of(path)? {
        Format::Yaml => serde_yaml::from_str(&text)?,
        Format::Json => serde_json::from_str(&text)?,
    };

    if let Some(dir) = path.parent() {
        session.resolve_previews(dir);
    }
    Ok(session)
}

/// Write a save snapshot in the format named by the extension.
pub fn export_snapshot(snapshot: &[ImageAnnotations], path: &Path) -> Result<()> {
    let text = match format_of(path)? {
        Format::Yaml => serde_yaml::to_string(snapshot)?,
        Format::Json => serde_json::to_string_pretty(snapshot)?,
    };
    std::fs::write(path, text)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::annotation::{Annotation, BoxGeometry};

    fn read_snapshot(path: &Path) -> Vec<ImageAnnotations> {
        let text = std::fs::read_to_string(path).unwrap();
        match format_of(path).unwrap() {
            Format::Yaml => serde_yaml::from_str(&text).unwrap(),
            Format::Json => serde_json::from_str(&text).unwrap(),
        }
    }

    const SESSION_YAML: &str = r#"
images:
  - id: img1
    preview: photos/cat.jpg
  - id: 2
    preview: https://example.com/dog.png
annotations:
  img1:
    - id: a1
      xCenter: 0.5
      yCenter: 0.5
      width: 0.2
      height: 0.2
      label: cat
    - xCenter: 0.25
      yCenter: 0.25
      width: 0.1
      height: 0.1
      label: ear
"#;

    #[test]
    fn test_import_yaml_session_resolves_paths() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.yaml");
        std::fs::write(&path, SESSION_YAML).unwrap();

        let session = import_session(&path).unwrap();
        assert_eq!(session.images.len(), 2);
        assert_eq!(session.images[1].id, "2");
        assert_eq!(
            Path::new(&session.images[0].preview),
            dir.path().join("photos/cat.jpg")
        );
        assert_eq!(session.images[1].preview, "https://example.com/dog.png");

        let raw = &session.annotations["img1"];
        assert_eq!(raw.len(), 2);
        assert!(raw[1].id.is_none());
        assert_eq!(raw[1].label, "ear");
    }

    #[test]
    fn test_json_session_without_annotations() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, r#"{"images": [{"id": "a", "preview": "/abs/a.png"}]}"#).unwrap();

        let session = import_session(&path).unwrap();
        assert!(session.annotations.is_empty());
        assert_eq!(session.images[0].preview, "/abs/a.png");
    }

    #[test]
    fn test_snapshot_export_reads_back() {
        let dir = tempfile::tempdir().unwrap();
        let snapshot = vec![
            ImageAnnotations::new(
                "img1",
                vec![Annotation {
                    id: "a1".to_string(),
                    geometry: BoxGeometry {
                        x_center: 0.5,
                        y_center: 0.5,
                        width: 0.2,
                        height: 0.2,
                    },
                    label: "cat".to_string(),
                }],
            ),
            ImageAnnotations::new("img2", Vec::new()),
        ];

        for name in ["saved.json", "saved.yaml"] {
            let path = dir.path().join(name);
            export_snapshot(&snapshot, &path).unwrap();
            assert_eq!(read_snapshot(&path), snapshot);
        }

        let text = std::fs::read_to_string(dir.path().join("saved.json")).unwrap();
        assert!(text.contains("\"imageId\": \"img1\""));
        assert!(text.contains("\"xCenter\": 0.5"));
    }

    #[test]
    fn test_unsupported_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("saved.txt");
        assert!(export_snapshot(&[], &path).is_err());
        assert!(!path.exists());
    }
}
