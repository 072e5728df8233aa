/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::sync::Arc;

use aws_sdk_s3::types::{ObjectCannedAcl, Tag};

use crate::error;
use crate::io::AggregatedBytes;
use crate::types::{BucketSummary, ConcurrencySetting, ObjectSummary, PartSize};
use crate::{Config, DEFAULT_CONCURRENCY, MEBIBYTE};

/// S3 helper client.
///
/// Wraps an explicitly constructed [`aws_sdk_s3::Client`] (no process-wide
/// singleton). Single-shot operations map 1:1 to service calls; uploads go
/// through the chunked uploader which switches to the multipart upload API for
/// bodies over the configured threshold.
#[derive(Debug, Clone)]
pub struct Client {
    pub(crate) handle: Arc<Handle>,
}

/// Whatever is needed to carry out operations, e.g. resolved settings, config, env details, etc
#[derive(Debug)]
pub(crate) struct Handle {
    pub(crate) config: crate::Config,
}

impl Handle {
    /// Get the concrete number of part transfer workers to use based on the concurrency setting.
    pub(crate) fn num_workers(&self) -> usize {
        match self.config.concurrency() {
            ConcurrencySetting::Auto => DEFAULT_CONCURRENCY,
            ConcurrencySetting::Explicit(concurrency) => *concurrency,
        }
    }

    /// Get the concrete minimum upload size in bytes to use to determine whether multipart uploads
    /// are enabled for a given request.
    pub(crate) fn mpu_threshold_bytes(&self) -> u64 {
        match self.config.multipart_threshold() {
            PartSize::Auto => 16 * MEBIBYTE,
            PartSize::Target(explicit) => *explicit,
        }
    }

    /// Get the concrete target part size to use for uploads
    pub(crate) fn upload_part_size_bytes(&self) -> u64 {
        match self.config.part_size() {
            PartSize::Auto => 8 * MEBIBYTE,
            PartSize::Target(explicit) => *explicit,
        }
    }
}

impl Client {
    /// Creates a new client from a config.
    pub fn new(config: Config) -> Client {
        let handle = Arc::new(Handle { config });
        Client { handle }
    }

    /// Returns the client's configuration
    pub fn config(&self) -> &Config {
        &self.handle.config
    }

    /// Upload a single object to S3.
    ///
    /// Bodies over the configured multipart threshold are split into parts and
    /// transferred concurrently through the multipart upload API; smaller
    /// bodies are sent as a single `PutObject` request.
    ///
    /// Constructs a fluent builder for the
    /// [`Upload`](crate::operation::upload::builders::UploadFluentBuilder) operation.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use std::path::Path;
    /// use s3_kit::error::Error;
    /// use s3_kit::io::ByteSource;
    ///
    /// async fn upload_file(client: &s3_kit::Client, path: impl AsRef<Path>) -> Result<(), Error> {
    ///     let body = ByteSource::from_path(path)?;
    ///     let handle = client.upload()
    ///         .bucket("my-bucket")
    ///         .key("my-key")
    ///         .body(body)
    ///         .send()
    ///         .await?;
    ///
    ///     // send() returns once transfers are in flight.
    ///     // Call `join()` on the returned handle to drive the upload to completion.
    ///     let response = handle.join().await?;
    ///     let _ = response;
    ///     Ok(())
    /// }
    /// ```
    pub fn upload(&self) -> crate::operation::upload::builders::UploadFluentBuilder {
        crate::operation::upload::builders::UploadFluentBuilder::new(self.handle.clone())
    }

    /// List all buckets owned by the caller.
    pub async fn list_buckets(&self) -> Result<Vec<BucketSummary>, error::Error> {
        crate::operation::bucket::list_buckets(&self.handle).await
    }

    /// Create a bucket with the given name.
    pub async fn create_bucket(&self, bucket: &str) -> Result<(), error::Error> {
        crate::operation::bucket::create_bucket(&self.handle, bucket).await
    }

    /// Delete the bucket with the given name. The bucket must be empty.
    pub async fn delete_bucket(&self, bucket: &str) -> Result<(), error::Error> {
        crate::operation::bucket::delete_bucket(&self.handle, bucket).await
    }

    /// List objects in a bucket, optionally restricted to a key prefix.
    ///
    /// Paginates through the full result set. `page_size` caps how many keys
    /// the service returns per page; it does not limit the overall listing.
    pub async fn list_objects(
        &self,
        bucket: &str,
        prefix: Option<&str>,
        page_size: Option<i32>,
    ) -> Result<Vec<ObjectSummary>, error::Error> {
        crate::operation::object::list_objects(&self.handle, bucket, prefix, page_size).await
    }

    /// Download an object into memory.
    pub async fn get_object(
        &self,
        bucket: &str,
        key: &str,
    ) -> Result<AggregatedBytes, error::Error> {
        crate::operation::object::get_object(&self.handle, bucket, key).await
    }

    /// Copy an object. `source` is the `{source-bucket}/{source-key}` form the
    /// service expects for the copy source.
    pub async fn copy_object(
        &self,
        bucket: &str,
        source: &str,
        dest_key: &str,
    ) -> Result<(), error::Error> {
        crate::operation::object::copy_object(&self.handle, bucket, source, dest_key).await
    }

    /// Delete an object.
    pub async fn delete_object(&self, bucket: &str, key: &str) -> Result<(), error::Error> {
        crate::operation::object::delete_object(&self.handle, bucket, key).await
    }

    /// Get the tag set of an object.
    pub async fn get_object_tagging(
        &self,
        bucket: &str,
        key: &str,
    ) -> Result<Vec<Tag>, error::Error> {
        crate::operation::tagging::get_object_tagging(&self.handle, bucket, key).await
    }

    /// Replace the tag set of an object.
    pub async fn put_object_tagging(
        &self,
        bucket: &str,
        key: &str,
        tags: Vec<Tag>,
    ) -> Result<(), error::Error> {
        crate::operation::tagging::put_object_tagging(&self.handle, bucket, key, tags).await
    }

    /// Get the access control list of an object.
    pub async fn get_object_acl(
        &self,
        bucket: &str,
        key: &str,
    ) -> Result<crate::operation::acl::ObjectAcl, error::Error> {
        crate::operation::acl::get_object_acl(&self.handle, bucket, key).await
    }

    /// Apply a canned ACL to an object.
    pub async fn put_object_acl(
        &self,
        bucket: &str,
        key: &str,
        acl: ObjectCannedAcl,
    ) -> Result<(), error::Error> {
        crate::operation::acl::put_object_acl(&self.handle, bucket, key, acl).await
    }
}
