/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

/// The target part size for a chunked upload.
#[derive(Debug, Clone, Default)]
pub enum PartSize {
    /// Let the client pick a sensible part size.
    #[default]
    Auto,

    /// Explicit target part size in bytes.
    ///
    /// Treated as a suggestion: an individual request may use a larger part
    /// size when the service's part count cap requires it.
    Target(u64),
}

/// Number of concurrent part transfers for a single upload.
#[derive(Debug, Clone, Default)]
pub enum ConcurrencySetting {
    /// Let the client pick a sensible concurrency level.
    #[default]
    Auto,

    /// Explicit worker count.
    Explicit(usize),
}

/// Policy for what happens to an open multipart upload session when the upload fails.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub enum FailedUploadPolicy {
    /// Abort the session, discarding any parts already transferred.
    #[default]
    Abort,

    /// Leave the session (and transferred parts) in place. Use this when a
    /// bucket lifecycle rule reclaims incomplete multipart uploads instead.
    Retain,
}

/// Details of an aborted upload.
#[derive(Debug, Clone, Default)]
#[non_exhaustive]
pub struct AbortedUpload {
    /// The ID of the upload session that was discarded, if one was open.
    pub upload_id: Option<String>,
}

/// Summary of a bucket returned by `ListBuckets`.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct BucketSummary {
    /// The bucket name
    pub name: String,
    /// When the bucket was created
    pub creation_date: Option<aws_smithy_types::DateTime>,
}

/// Summary of an object returned by `ListObjectsV2`.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct ObjectSummary {
    /// The object key
    pub key: String,
    /// The object size in bytes
    pub size: Option<i64>,
    /// The entity tag of the object
    pub e_tag: Option<String>,
}
