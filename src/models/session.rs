// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Annotation session state.
//!
//! A session spans a fixed, ordered list of images. It owns the
//! annotation store, the draw gesture, the selection and the measured
//! container size, and it navigates between images.

use super::annotation::{deserialize_id, Annotation, ImageAnnotations};
use super::store::{AnnotationStore, InitialAnnotations};
use crate::interaction::{CommitOutcome, DrawMachine, Transition};
use crate::util::geometry::{ContainerSize, PixelPoint};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt::Display;
use thiserror::Error;

/// An image taking part in the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRef {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    /// URL or local path the pixels are fetched from.
    pub preview: String,
}

impl ImageRef {
    pub fn new(id: impl Into<String>, preview: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            preview: preview.into(),
        }
    }
}

/// Load state of the active image's pixels.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ImageStatus {
    #[default]
    Loading,
    Ready,
    Failed(String),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("an annotation session needs at least one image")]
    NoImages,

    #[error("image {0} appears more than once in the session")]
    DuplicateImage(String),
}

#[derive(Debug, Clone)]
pub struct Session {
    images: Vec<ImageRef>,
    store: AnnotationStore,
    current_index: usize,
    selected: Option<String>,
    draw: DrawMachine,
    container: ContainerSize,
    image_status: ImageStatus,
}

impl Session {
    /// Open a session over `images`, seeded from server-persisted state.
    pub fn new(images: Vec<ImageRef>, initial: InitialAnnotations) -> Result<Self, SessionError> {
        if images.is_empty() {
            return Err(SessionError::NoImages);
        }
        let mut seen = HashSet::with_capacity(images.len());
        if let Some(image) = images.iter().find(|image| !seen.insert(image.id.as_str())) {
            return Err(SessionError::DuplicateImage(image.id.clone()));
        }

        let store = AnnotationStore::initialize(&images, initial);
        log::info!(
            "Opened session with {} images and {} annotations",
            images.len(),
            store.total_count()
        );

        Ok(Self {
            images,
            store,
            current_index: 0,
            selected: None,
            draw: DrawMachine::new(),
            container: ContainerSize::default(),
            image_status: ImageStatus::Loading,
        })
    }

    /// Swap in a new image set. The store is re-seeded only when the
    /// ordered image ids differ, so unsaved edits survive a refresh of the
    /// same set. Returns true when the session was re-initialized.
    ///
    /// A kept session whose active preview moved goes back to loading.
    pub fn replace_images(
        &mut self,
        images: Vec<ImageRef>,
        initial: InitialAnnotations,
    ) -> Result<bool, SessionError> {
        let same_ids = images.len() == self.images.len()
            && images.iter().zip(&self.images).all(|(a, b)| a.id == b.id);
        if same_ids {
            let preview_moved = images[self.current_index].preview != self.current_image().preview;
            self.images = images;
            if preview_moved {
                self.draw.cancel();
                self.image_status = ImageStatus::Loading;
            }
            return Ok(false);
        }

        *self = Self::new(images, initial)?;
        Ok(true)
    }

    // --- Navigation ---

    pub fn current_image(&self) -> &ImageRef {
        &self.images[self.current_index]
    }

    /// 1-based position of the active image.
    pub fn position(&self) -> usize {
        self.current_index + 1
    }

    pub fn image_count(&self) -> usize {
        self.images.len()
    }

    pub fn has_next(&self) -> bool {
        self.current_index + 1 < self.images.len()
    }

    pub fn has_prev(&self) -> bool {
        self.current_index > 0
    }

    /// Fraction of images already passed, for the progress bar.
    pub fn progress(&self) -> f32 {
        self.current_index as f32 / self.images.len() as f32
    }

    pub fn next(&mut self) -> bool {
        if !self.has_next() {
            return false;
        }
        self.current_index += 1;
        self.reset_transient();
        true
    }

    pub fn prev(&mut self) -> bool {
        if !self.has_prev() {
            return false;
        }
        self.current_index -= 1;
        self.reset_transient();
        true
    }

    /// Selection, draft and image state are scoped to a single image.
    fn reset_transient(&mut self) {
        self.selected = None;
        self.draw.cancel();
        self.image_status = ImageStatus::Loading;
        log::debug!(
            "Switched to image {} ({}/{})",
            self.current_image().id,
            self.position(),
            self.image_count()
        );
    }

    // --- Image loading ---

    pub fn image_status(&self) -> &ImageStatus {
        &self.image_status
    }

    pub fn image_loaded(&mut self) {
        self.image_status = ImageStatus::Ready;
    }

    pub fn image_failed(&mut self, message: impl Into<String>) {
        self.draw.cancel();
        self.image_status = ImageStatus::Failed(message.into());
    }

    /// Apply a finished background load.
    ///
    /// Results for any image other than the active one are dropped and
    /// leave the session untouched. Returns the loaded value only when it
    /// was accepted for the active image.
    pub fn finish_load<T, E: Display>(
        &mut self,
        image_id: &str,
        result: Result<T, E>,
    ) -> Option<T> {
        if image_id != self.current_image().id {
            log::debug!("Ignoring stale load result for image {}", image_id);
            return None;
        }
        match result {
            Ok(value) => {
                self.image_loaded();
                Some(value)
            }
            Err(e) => {
                log::error!("Failed to load image {}: {}", image_id, e);
                self.image_failed(e.to_string());
                None
            }
        }
    }

    pub fn is_image_ready(&self) -> bool {
        self.image_status == ImageStatus::Ready
    }

    // --- Container ---

    pub fn container(&self) -> ContainerSize {
        self.container
    }

    /// Record the latest container measurement; must precede rendering.
    pub fn remeasure(&mut self, size: ContainerSize) {
        if size != self.container {
            log::trace!("Container resized to {:.0}x{:.0}", size.width, size.height);
            self.container = size;
        }
    }

    // --- Annotations ---

    pub fn current_annotations(&self) -> &[Annotation] {
        self.store.annotations(&self.current_image().id)
    }

    pub fn current_count(&self) -> usize {
        self.store.count(&self.current_image().id)
    }

    pub fn total_count(&self) -> usize {
        self.store.total_count()
    }

    pub fn remove_annotation(&mut self, annotation_id: &str) -> Option<Annotation> {
        let image_id = self.current_image().id.clone();
        let removed = self.store.remove(&image_id, annotation_id);
        self.selected = None;
        if let Some(ref annotation) = removed {
            log::info!(
                "Removed annotation '{}' from image {}, total: {}",
                annotation.label,
                image_id,
                self.store.total_count()
            );
        }
        removed
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// Focus an annotation of the current image; unknown ids clear focus.
    pub fn select(&mut self, annotation_id: Option<&str>) {
        self.selected = annotation_id
            .filter(|id| self.current_annotations().iter().any(|a| a.id == *id))
            .map(str::to_string);
    }

    // --- Drawing ---

    pub fn draw_state(&self) -> &DrawMachine {
        &self.draw
    }

    pub fn pointer_down(&mut self, at: PixelPoint) {
        if !self.is_image_ready() {
            return;
        }
        if self.draw.pointer_down(at) {
            self.selected = None;
        }
    }

    pub fn pointer_move(&mut self, at: PixelPoint) {
        self.draw.pointer_move(at);
    }

    pub fn pointer_up(&mut self) -> Transition {
        self.draw.pointer_up()
    }

    pub fn label_mut(&mut self) -> Option<&mut String> {
        self.draw.label_mut()
    }

    /// Commit the pending draft to the current image.
    pub fn confirm_label(&mut self) -> Option<&Annotation> {
        match self.draw.confirm(self.container) {
            CommitOutcome::Committed(annotation) => {
                let image_id = self.current_image().id.clone();
                log::info!(
                    "Added annotation '{}' to image {}",
                    annotation.label,
                    image_id
                );
                if self.store.add(&image_id, annotation) {
                    self.store.annotations(&image_id).last()
                } else {
                    None
                }
            }
            CommitOutcome::Cancelled => {
                log::debug!("Label was blank, draft cancelled");
                None
            }
            CommitOutcome::Unmeasured | CommitOutcome::NotPending => None,
        }
    }

    pub fn cancel_label(&mut self) {
        self.draw.cancel();
    }

    // --- Save ---

    pub fn snapshot(&self) -> Vec<ImageAnnotations> {
        self.store.snapshot()
    }

    /// Hand the full snapshot to the caller's save handler.
    pub fn save<F>(&self, on_save: F)
    where
        F: FnOnce(Vec<ImageAnnotations>),
    {
        let snapshot = self.snapshot();
        log::info!(
            "Saving {} annotations across {} images",
            self.total_count(),
            snapshot.len()
        );
        on_save(snapshot);
    }
}
