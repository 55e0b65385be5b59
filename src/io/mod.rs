// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! I/O operations: backend calls, image loading and session files.

pub mod backend;
pub mod error;
pub mod loader;
pub mod media;
pub mod serialization;
