// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Error types for the I/O boundary.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ImageLoadError {
    #[error("image request failed ({0})")]
    Status(u16),

    #[error("server answered with {0} instead of image data")]
    UnexpectedContentType(String),

    #[error("image request failed: {0}")]
    Transport(String),

    #[error("image loader stopped before finishing")]
    WorkerStopped,

    #[error("could not read image: {0}")]
    Io(#[from] std::io::Error),

    #[error("could not decode image: {0}")]
    Decode(#[from] image::ImageError),
}

impl From<ureq::Error> for ImageLoadError {
    fn from(error: ureq::Error) -> Self {
        match error {
            ureq::Error::Status(code, _) => ImageLoadError::Status(code),
            ureq::Error::Transport(transport) => ImageLoadError::Transport(transport.to_string()),
        }
    }
}

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("login required, check the access token")]
    Unauthorized,

    #[error("server error ({status}): {body}")]
    Status { status: u16, body: String },

    #[error("expected JSON from the server but got {0}")]
    NotJson(String),

    #[error("request failed: {0}")]
    Transport(String),

    #[error("could not read response: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<ureq::Error> for BackendError {
    fn from(error: ureq::Error) -> Self {
        match error {
            ureq::Error::Status(401, _) => BackendError::Unauthorized,
            ureq::Error::Status(status, response) => BackendError::Status {
                status,
                body: response.into_string().unwrap_or_default(),
            },
            ureq::Error::Transport(transport) => BackendError::Transport(transport.to_string()),
        }
    }
}
