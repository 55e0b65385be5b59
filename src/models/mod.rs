// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Data model for annotation sessions.

pub mod annotation;
pub mod session;
pub mod store;
