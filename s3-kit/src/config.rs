/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use crate::types::{ConcurrencySetting, FailedUploadPolicy, PartSize};
use crate::MEBIBYTE;
use std::cmp;

/// Minimum upload part size in bytes
const MIN_MULTIPART_PART_SIZE_BYTES: u64 = 5 * MEBIBYTE;

/// Configuration for a [`Client`](crate::client::Client)
#[derive(Debug, Clone)]
pub struct Config {
    multipart_threshold: PartSize,
    target_part_size: PartSize,
    concurrency: ConcurrencySetting,
    failed_upload_policy: FailedUploadPolicy,
    client: aws_sdk_s3::client::Client,
}

impl Config {
    /// Create a new `Config` builder
    pub fn builder() -> Builder {
        Builder::default()
    }

    /// Returns a reference to the multipart upload threshold part size
    pub fn multipart_threshold(&self) -> &PartSize {
        &self.multipart_threshold
    }

    /// Returns a reference to the target part size to use for chunked uploads
    pub fn part_size(&self) -> &PartSize {
        &self.target_part_size
    }

    /// Returns the concurrency setting to use for individual upload requests.
    pub fn concurrency(&self) -> &ConcurrencySetting {
        &self.concurrency
    }

    /// Returns the policy applied to the upload session when a chunked upload fails.
    pub fn failed_upload_policy(&self) -> &FailedUploadPolicy {
        &self.failed_upload_policy
    }

    /// The Amazon S3 client instance that will be used to send requests to S3.
    pub fn client(&self) -> &aws_sdk_s3::Client {
        &self.client
    }
}

/// Fluent style builder for [Config]
#[derive(Debug, Clone, Default)]
pub struct Builder {
    multipart_threshold_part_size: PartSize,
    target_part_size: PartSize,
    concurrency: ConcurrencySetting,
    failed_upload_policy: FailedUploadPolicy,
    client: Option<aws_sdk_s3::Client>,
}

impl Builder {
    /// Smallest body size that takes the chunked (multipart) upload path.
    ///
    /// Values under the 5 MiB service minimum are rounded up to it.
    /// Default is [PartSize::Auto].
    pub fn multipart_threshold(self, threshold: PartSize) -> Self {
        let threshold = match threshold {
            PartSize::Target(part_size) => {
                PartSize::Target(cmp::max(part_size, MIN_MULTIPART_PART_SIZE_BYTES))
            }
            tps => tps,
        };

        self.set_multipart_threshold(threshold)
    }

    /// Target size of each part of a chunked upload. Values under the 5 MiB
    /// service minimum are rounded up to it.
    ///
    /// Bodies under [`multipart_threshold`] skip chunking entirely and go out
    /// as one `PutObject` request. The effective part size grows past this
    /// setting when honoring it would exceed the 10,000 part cap.
    ///
    /// Default is [PartSize::Auto].
    ///
    /// [`multipart_threshold`]: method@Self::multipart_threshold
    pub fn part_size(self, part_size: PartSize) -> Self {
        let part_size = match part_size {
            PartSize::Target(size) => {
                PartSize::Target(cmp::max(size, MIN_MULTIPART_PART_SIZE_BYTES))
            }
            tps => tps,
        };

        self.set_target_part_size(part_size)
    }

    /// Set the multipart threshold without the minimum-size clamp. Test-scale
    /// values go through here.
    pub(crate) fn set_multipart_threshold(mut self, threshold: PartSize) -> Self {
        self.multipart_threshold_part_size = threshold;
        self
    }

    /// Set the target part size without the minimum-size clamp.
    pub(crate) fn set_target_part_size(mut self, part_size: PartSize) -> Self {
        self.target_part_size = part_size;
        self
    }

    /// Maximum number of part transfers in flight for a single upload.
    ///
    /// At least one worker is always used; an explicit zero is rounded up.
    /// Default is [ConcurrencySetting::Auto].
    pub fn concurrency(mut self, concurrency: ConcurrencySetting) -> Self {
        self.concurrency = match concurrency {
            ConcurrencySetting::Explicit(concurrency) => {
                ConcurrencySetting::Explicit(cmp::max(concurrency, 1))
            }
            auto => auto,
        };
        self
    }

    /// Set the policy applied to the upload session when a chunked upload fails.
    ///
    /// Default is [FailedUploadPolicy::Abort].
    pub fn failed_upload_policy(mut self, policy: FailedUploadPolicy) -> Self {
        self.failed_upload_policy = policy;
        self
    }

    /// Set an explicit S3 client to use.
    pub fn client(mut self, client: aws_sdk_s3::Client) -> Self {
        self.client = Some(client);
        self
    }

    /// Consumes the builder and constructs a [`Config`](crate::config::Config)
    ///
    /// # Panics
    ///
    /// Panics if no S3 client was provided with [`client`](Self::client). The
    /// client to use is always an explicit input; there is no ambient default.
    pub fn build(self) -> Config {
        Config {
            multipart_threshold: self.multipart_threshold_part_size,
            target_part_size: self.target_part_size,
            concurrency: self.concurrency,
            failed_upload_policy: self.failed_upload_policy,
            client: self.client.expect("client set"),
        }
    }
}
