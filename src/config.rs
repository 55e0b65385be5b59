// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Command line configuration.
//!
//! Everything the editor needs from its environment (where the session
//! comes from, where saves go, the bearer credential) is parsed here and
//! passed down explicitly.

use clap::{Parser, ValueEnum};
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

pub const DEFAULT_API_BASE: &str = "http://localhost:8080";

/// Log level setting for the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// Convert to log crate's LevelFilter.
    pub fn to_level_filter(self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "annobox",
    version,
    about = "Draw and label bounding boxes on dataset images"
)]
pub struct Config {
    /// Session file (JSON or YAML) listing images and their annotations
    #[arg(long, conflicts_with = "dataset", required_unless_present = "dataset")]
    pub session: Option<PathBuf>,

    /// Dataset id to open from the backend
    #[arg(long)]
    pub dataset: Option<i64>,

    /// Dataset version tag to open and save to
    #[arg(long = "dataset-version", default_value = "v0")]
    pub dataset_version: String,

    /// Backend base URL
    #[arg(long, default_value = DEFAULT_API_BASE)]
    pub api_base: String,

    /// Bearer token sent with backend and image requests
    #[arg(long, env = "ANNOBOX_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Write saved annotations to this file (JSON or YAML) instead of the backend
    #[arg(long)]
    pub output: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("either --session or --dataset is required")]
    MissingSource,
}

/// Where the session's images and initial annotations come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionSource {
    File(PathBuf),
    Dataset { dataset_id: i64, version: String },
}

/// Where the save snapshot is handed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveTarget {
    File(PathBuf),
    Backend { dataset_id: i64, version_tag: String },
}

impl Config {
    pub fn source(&self) -> Result<SessionSource, ConfigError> {
        match (&self.session, self.dataset) {
            (Some(path), _) => Ok(SessionSource::File(path.clone())),
            (None, Some(dataset_id)) => Ok(SessionSource::Dataset {
                dataset_id,
                version: self.dataset_version.clone(),
            }),
            (None, None) => Err(ConfigError::MissingSource),
        }
    }

    pub fn save_target(&self) -> Result<SaveTarget, ConfigError> {
        if let Some(ref output) = self.output {
            return Ok(SaveTarget::File(output.clone()));
        }
        match self.source()? {
            SessionSource::File(path) => {
                Ok(SaveTarget::File(path.with_extension("annotations.json")))
            }
            SessionSource::Dataset {
                dataset_id,
                version,
            } => Ok(SaveTarget::Backend {
                dataset_id,
                version_tag: version,
            }),
        }
    }

    pub fn credential(&self) -> Option<Credential> {
        self.token.as_deref().and_then(Credential::bearer)
    }
}

/// Bearer token; kept out of debug output.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Wrap a token, ignoring blank ones.
    pub fn bearer(token: &str) -> Option<Self> {
        let token = token.trim();
        (!token.is_empty()).then(|| Self(token.to_string()))
    }

    pub fn header_value(&self) -> String {
        format!("Bearer {}", self.0)
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}
