// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Background image loading.
//!
//! One load runs at a time on a worker thread and reports back over a
//! channel tagged with the image id. Starting a new load drops the old
//! receiver, so a superseded worker's result has nowhere to go.

use super::error::ImageLoadError;
use super::media::{self, LoadedImage};
use crate::config::Credential;
use crate::models::session::ImageRef;
use std::sync::mpsc::{channel, Receiver, TryRecvError};

/// Finished load, tagged with the image it is for.
pub type LoadResult = (String, Result<LoadedImage, ImageLoadError>);

#[derive(Default)]
pub struct PreviewLoader {
    receiver: Option<Receiver<LoadResult>>,
    loading_for: Option<String>,
}

impl PreviewLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_busy(&self) -> bool {
        self.receiver.is_some()
    }

    pub fn is_loading(&self, image_id: &str) -> bool {
        self.loading_for.as_deref() == Some(image_id)
    }

    /// Fetch and decode `image` on a worker thread.
    pub fn start(&mut self, image: ImageRef, credential: Option<Credential>) {
        log::debug!("Loading image {} from {}", image.id, image.preview);
        let image_id = image.id.clone();
        self.spawn(image_id, move || {
            media::load_preview(&image.preview, credential.as_ref())
        });
    }

    fn spawn<F>(&mut self, image_id: String, load: F)
    where
        F: FnOnce() -> Result<LoadedImage, ImageLoadError> + Send + 'static,
    {
        let (sender, receiver) = channel();
        self.receiver = Some(receiver);
        self.loading_for = Some(image_id.clone());

        std::thread::spawn(move || {
            let _ = sender.send((image_id, load()));
        });
    }

    /// Abandon the current load, if any.
    pub fn cancel(&mut self) {
        self.receiver = None;
        self.loading_for = None;
    }

    /// Take the finished result without blocking.
    ///
    /// A worker that died without sending is reported as
    /// [`ImageLoadError::WorkerStopped`] for the image it was loading.
    pub fn poll(&mut self) -> Option<LoadResult> {
        let received = self.receiver.as_ref()?.try_recv();
        match received {
            Ok(result) => {
                self.cancel();
                Some(result)
            }
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                let image_id = self.loading_for.take().unwrap_or_default();
                self.cancel();
                Some((image_id, Err(ImageLoadError::WorkerStopped)))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn tiny() -> LoadedImage {
        LoadedImage {
            width: 1,
            height: 1,
            pixels: vec![0, 0, 0, 255],
        }
    }

    fn wait(loader: &mut PreviewLoader) -> LoadResult {
        for _ in 0..500 {
            if let Some(result) = loader.poll() {
                return result;
            }
            std::thread::sleep(Duration::from_millis(10));
        }
        panic!("loader never finished");
    }

    #[test]
    fn test_result_is_tagged_and_clears_busy() {
        let mut loader = PreviewLoader::new();
        loader.spawn("a".to_string(), || Ok(tiny()));
        assert!(loader.is_loading("a"));

        let (image_id, result) = wait(&mut loader);
        assert_eq!(image_id, "a");
        assert_eq!(result.unwrap().width, 1);
        assert!(!loader.is_busy());
        assert!(!loader.is_loading("a"));
    }

    #[test]
    fn test_superseded_load_never_arrives() {
        let mut loader = PreviewLoader::new();
        loader.spawn("a".to_string(), || {
            std::thread::sleep(Duration::from_millis(50));
            Ok(tiny())
        });
        loader.spawn("b".to_string(), || Ok(tiny()));

        let (image_id, _) = wait(&mut loader);
        assert_eq!(image_id, "b");
        std::thread::sleep(Duration::from_millis(100));
        assert!(loader.poll().is_none());
    }

    #[test]
    fn test_dead_worker_reports_failure() {
        let mut loader = PreviewLoader::new();
        loader.spawn("a".to_string(), || panic!("decoder crashed"));

        let (image_id, result) = wait(&mut loader);
        assert_eq!(image_id, "a");
        assert!(matches!(result, Err(ImageLoadError::WorkerStopped)));
        assert!(!loader.is_busy());
    }

    #[test]
    fn test_missing_local_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let image = ImageRef::new("a", dir.path().join("gone.png").to_string_lossy());
        let mut loader = PreviewLoader::new();
        loader.start(image, None);

        let (_, result) = wait(&mut loader);
        assert!(matches!(result, Err(ImageLoadError::Io(_))));
    }
}
