/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::sync::Arc;

use aws_sdk_s3::types::ObjectCannedAcl;

use crate::error;
use crate::io::ByteSource;

use super::{UploadHandle, UploadInputBuilder};

/// Fluent builder for constructing a single object upload
#[derive(Debug)]
pub struct UploadFluentBuilder {
    handle: Arc<crate::client::Handle>,
    inner: UploadInputBuilder,
}

impl UploadFluentBuilder {
    pub(crate) fn new(handle: Arc<crate::client::Handle>) -> Self {
        Self {
            handle,
            inner: Default::default(),
        }
    }

    /// The bucket name to which the upload is being made.
    pub fn bucket(mut self, bucket: impl Into<String>) -> Self {
        self.inner = self.inner.bucket(bucket);
        self
    }

    /// Object key for which the upload is being made.
    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.inner = self.inner.key(key);
        self
    }

    /// Object data.
    pub fn body(mut self, body: ByteSource) -> Self {
        self.inner = self.inner.body(body);
        self
    }

    /// A standard MIME type describing the format of the contents.
    pub fn content_type(mut self, content_type: impl Into<String>) -> Self {
        self.inner = self.inner.content_type(content_type);
        self
    }

    /// Add a single metadata key/value pair to store with the object.
    pub fn metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.inner = self.inner.metadata(key, value);
        self
    }

    /// The tag-set for the object, encoded as URL query parameters.
    pub fn tagging(mut self, tagging: impl Into<String>) -> Self {
        self.inner = self.inner.tagging(tagging);
        self
    }

    /// The canned ACL to apply to the object.
    pub fn acl(mut self, acl: ObjectCannedAcl) -> Self {
        self.inner = self.inner.acl(acl);
        self
    }

    /// Initiate the upload.
    ///
    /// For bodies over the multipart threshold this opens the upload session
    /// and starts part transfer workers before returning; call
    /// [`join`](UploadHandle::join) on the returned handle to wait for the
    /// object to be committed.
    pub async fn send(self) -> Result<UploadHandle, error::Error> {
        let input = self.inner.build()?;
        crate::operation::upload::Upload::orchestrate(self.handle, input).await
    }
}

impl UploadInputBuilder {
    /// Initiate an upload for a single object with this input using the given client.
    pub async fn send_with(self, client: &crate::Client) -> Result<UploadHandle, error::Error> {
        let mut fluent_builder = client.upload();
        fluent_builder.inner = self;
        fluent_builder.send().await
    }
}
