// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Dataset backend client.
//!
//! Only two calls are made here: fetching a dataset version's images
//! with their persisted annotations, and submitting a full annotation
//! batch for a version tag. Image bytes go through [`super::media`].

use super::error::BackendError;
use crate::config::Credential;
use crate::models::annotation::{deserialize_id, Annotation, ImageAnnotations, RawAnnotation, RawId};
use crate::models::session::ImageRef;
use crate::models::store::InitialAnnotations;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// A dataset version as returned by the detail endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetDetail {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub images: Vec<DatasetImage>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetImage {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    #[serde(default)]
    pub annotations: Vec<RawAnnotation>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SaveRequest<'a> {
    dataset_id: i64,
    version_tag: &'a str,
    annotations: Vec<SaveImagePayload<'a>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SaveImagePayload<'a> {
    image_id: RawId,
    annotations: &'a [Annotation],
}

/// The backend keys assets by number; client-side ids pass through as text.
fn wire_image_id(id: &str) -> RawId {
    id.parse::<i64>()
        .map(RawId::Number)
        .unwrap_or_else(|_| RawId::Text(id.to_string()))
}

fn save_request<'a>(
    dataset_id: i64,
    version_tag: &'a str,
    snapshot: &'a [ImageAnnotations],
) -> SaveRequest<'a> {
    SaveRequest {
        dataset_id,
        version_tag,
        annotations: snapshot
            .iter()
            .map(|entry| SaveImagePayload {
                image_id: wire_image_id(&entry.image_id),
                annotations: &entry.annotations,
            })
            .collect(),
    }
}

#[derive(Clone)]
pub struct BackendClient {
    base: String,
    credential: Option<Credential>,
    agent: ureq::Agent,
}

impl BackendClient {
    pub fn new(base: &str, credential: Option<Credential>) -> Self {
        Self {
            base: base.trim_end_matches('/').to_string(),
            credential,
            agent: ureq::AgentBuilder::new().timeout(REQUEST_TIMEOUT).build(),
        }
    }

    pub fn asset_image_url(&self, image_id: &str) -> String {
        format!("{}/api/datasets/assets/{}/image", self.base, image_id)
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/api/datasets/{}", self.base, path)
    }

    fn authorize(&self, request: ureq::Request) -> ureq::Request {
        match self.credential {
            Some(ref credential) => request.set("Authorization", &credential.header_value()),
            None => request,
        }
    }

    /// Fetch a dataset version with its images and persisted annotations.
    pub fn fetch_dataset(
        &self,
        dataset_id: i64,
        version: &str,
    ) -> Result<DatasetDetail, BackendError> {
        let request = self
            .agent
            .get(&self.endpoint("detail"))
            .query("datasetId", &dataset_id.to_string())
            .query("version", version)
            .set("Accept", "application/json");

        let response = self.authorize(request).call()?;
        let content_type = response.content_type().to_string();
        if !content_type.contains("application/json") {
            return Err(BackendError::NotJson(content_type));
        }

        let detail: DatasetDetail = serde_json::from_reader(response.into_reader())?;
        log::info!(
            "Fetched dataset {} ({}) with {} images",
            detail.id,
            detail.version.as_deref().unwrap_or(version),
            detail.images.len()
        );
        Ok(detail)
    }

    /// Submit the full snapshot as the annotations of `version_tag`.
    pub fn save_annotations(
        &self,
        dataset_id: i64,
        version_tag: &str,
        snapshot: &[ImageAnnotations],
    ) -> Result<(), BackendError> {
        let body = serde_json::to_value(save_request(dataset_id, version_tag, snapshot))?;
        let request = self.agent.post(&self.endpoint("save"));
        self.authorize(request).send_json(body)?;
        log::info!("Saved annotations of dataset {} as version {}", dataset_id, version_tag);
        Ok(())
    }

    /// Split a dataset into session images and their initial annotations.
    pub fn session_parts(&self, detail: DatasetDetail) -> (Vec<ImageRef>, InitialAnnotations) {
        let mut images = Vec::with_capacity(detail.images.len());
        let mut initial = InitialAnnotations::new();
        for image in detail.images {
            images.push(ImageRef::new(image.id.clone(), self.asset_image_url(&image.id)));
            initial.insert(image.id, image.annotations);
        }
        (images, initial)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::annotation::BoxGeometry;

    const DETAIL_JSON: &str = r#"{
        "id": 10,
        "name": "pets",
        "version": "v1",
        "createdAt": "2025-01-01",
        "description": "",
        "images": [
            {"id": 19, "filename": "cat.jpg", "imageUrl": "/x", "annotations": [
                {"id": 7, "label": "cat",
                 "xCenter": 0.5, "yCenter": 0.5, "width": 0.2, "height": 0.2}
            ]},
            {"id": 20, "filename": "empty.jpg", "annotations": []}
        ]
    }"#;

    #[test]
    fn test_detail_maps_to_session_parts() {
        let client = BackendClient::new("http://localhost:8080/", None);
        let detail: DatasetDetail = serde_json::from_str(DETAIL_JSON).unwrap();
        assert_eq!(detail.id, "10");

        let (images, initial) = client.session_parts(detail);
        assert_eq!(images.len(), 2);
        assert_eq!(images[0].id, "19");
        assert_eq!(
            images[0].preview,
            "http://localhost:8080/api/datasets/assets/19/image"
        );
        assert_eq!(initial["19"][0].label, "cat");
        assert!(initial["20"].is_empty());
    }

    #[test]
    fn test_save_payload_shape() {
        let snapshot = vec![
            ImageAnnotations::new(
                "19",
                vec![Annotation {
                    id: "c0ffee".to_string(),
                    geometry: BoxGeometry {
                        x_center: 0.25,
                        y_center: 0.75,
                        width: 0.5,
                        height: 0.5,
                    },
                    label: "dog".to_string(),
                }],
            ),
            ImageAnnotations::new("local-2", Vec::new()),
        ];

        let body = serde_json::to_value(save_request(10, "v2", &snapshot)).unwrap();
        assert_eq!(body["datasetId"], 10);
        assert_eq!(body["versionTag"], "v2");
        assert_eq!(body["annotations"][0]["imageId"], 19);
        assert_eq!(body["annotations"][0]["annotations"][0]["yCenter"], 0.75);
        assert_eq!(body["annotations"][1]["imageId"], "local-2");
        assert_eq!(body["annotations"][1]["annotations"], serde_json::json!([]));
    }

    #[test]
    fn test_credential_is_kept() {
        let client = BackendClient::new("http://api", Credential::bearer("t0k"));
        assert_eq!(
            client.credential.as_ref().map(Credential::header_value),
            Some("Bearer t0k".to_string())
        );
        assert_eq!(client.endpoint("save"), "http://api/api/datasets/save");
    }
}
