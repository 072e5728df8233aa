/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

//! S3 helper client
//!
//! Thin, explicitly-typed wrappers around the single-shot Amazon S3 operations
//! (bucket lifecycle, object CRUD, tagging, ACLs) plus a chunked uploader that
//! splits large objects into fixed-size parts and transfers them concurrently
//! through the multipart upload API.

#![warn(
    missing_debug_implementations,
    missing_docs,
    rustdoc::missing_crate_level_docs,
    unreachable_pub,
    rust_2018_idioms
)]

pub(crate) const MEBIBYTE: u64 = 1024 * 1024;

pub(crate) const DEFAULT_CONCURRENCY: usize = 8;

/// Error types emitted by `s3-kit`
pub mod error;

/// Common types used by `s3-kit`
pub mod types;

/// Client configuration
pub mod config;

/// Types and helpers for I/O
pub mod io;

/// The `s3-kit` client
pub mod client;

/// Client operations
pub mod operation;

pub use client::Client;
pub use config::Config;
