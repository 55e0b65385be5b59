// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Per-image annotation store.
//!
//! The store is the session's source of truth until an explicit save. It
//! keeps one ordered list per image and remembers the session's image
//! order so snapshots come out in that order.

use super::annotation::{Annotation, ImageAnnotations, RawAnnotation};
use super::session::ImageRef;
use std::collections::HashMap;

/// Initial annotations keyed by image id, as persisted on the server.
pub type InitialAnnotations = HashMap<String, Vec<RawAnnotation>>;

#[derive(Debug, Clone, Default)]
pub struct AnnotationStore {
    order: Vec<String>,
    by_image: HashMap<String, Vec<Annotation>>,
}

impl AnnotationStore {
    /// Seed one list per image from the initial snapshot.
    pub fn initialize(images: &[ImageRef], mut initial: InitialAnnotations) -> Self {
        let mut order = Vec::with_capacity(images.len());
        let mut by_image = HashMap::with_capacity(images.len());

        for image in images {
            let seeded: Vec<Annotation> = initial
                .remove(&image.id)
                .unwrap_or_default()
                .into_iter()
                .map(RawAnnotation::into_annotation)
                .collect();
            order.push(image.id.clone());
            by_image.insert(image.id.clone(), seeded);
        }

        for image_id in initial.keys() {
            log::debug!("Ignoring initial annotations for unknown image {}", image_id);
        }

        Self { order, by_image }
    }

    /// Append an annotation to an image's list.
    ///
    /// Returns false (and leaves the store untouched) for an unknown image.
    pub fn add(&mut self, image_id: &str, annotation: Annotation) -> bool {
        match self.by_image.get_mut(image_id) {
            Some(list) => {
                list.push(annotation);
                true
            }
            None => {
                log::warn!("Cannot add annotation to unknown image {}", image_id);
                false
            }
        }
    }

    /// Remove an annotation by id; absent entries are a no-op.
    pub fn remove(&mut self, image_id: &str, annotation_id: &str) -> Option<Annotation> {
        let list = self.by_image.get_mut(image_id)?;
        let idx = list.iter().position(|a| a.id == annotation_id)?;
        Some(list.remove(idx))
    }

    pub fn annotations(&self, image_id: &str) -> &[Annotation] {
        self.by_image
            .get(image_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn count(&self, image_id: &str) -> usize {
        self.annotations(image_id).len()
    }

    pub fn total_count(&self) -> usize {
        self.by_image.values().map(Vec::len).sum()
    }

    /// Full per-image mapping in session image order, empty lists included.
    pub fn snapshot(&self) -> Vec<ImageAnnotations> {
        self.order
            .iter()
            .map(|id| ImageAnnotations::new(id.clone(), self.annotations(id).to_vec()))
            .collect()
    }
}
