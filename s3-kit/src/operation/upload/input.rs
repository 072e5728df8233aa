/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::collections::HashMap;
use std::fmt;

use aws_sdk_s3::types::ObjectCannedAcl;

use crate::error;
use crate::io::ByteSource;

/// Input for an upload request.
#[non_exhaustive]
pub struct UploadInput {
    /// The bucket name to which the upload is being made.
    pub(crate) bucket: Option<String>,

    /// Object key for which the upload is being made.
    pub(crate) key: Option<String>,

    /// Object data.
    pub(crate) body: ByteSource,

    /// A standard MIME type describing the format of the contents.
    pub(crate) content_type: Option<String>,

    /// A map of metadata to store with the object.
    pub(crate) metadata: Option<HashMap<String, String>>,

    /// The tag-set for the object, encoded as URL query parameters.
    pub(crate) tagging: Option<String>,

    /// The canned ACL to apply to the object.
    pub(crate) acl: Option<ObjectCannedAcl>,
}

impl UploadInput {
    /// Create a new builder for `UploadInput`
    pub fn builder() -> UploadInputBuilder {
        UploadInputBuilder::default()
    }

    /// The bucket name to which the upload is being made.
    pub fn bucket(&self) -> Option<&str> {
        self.bucket.as_deref()
    }

    /// Object key for which the upload is being made.
    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    /// Split the body out of the input, replacing it with an empty source.
    pub(crate) fn take_body(&mut self) -> ByteSource {
        std::mem::take(&mut self.body)
    }
}

impl fmt::Debug for UploadInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UploadInput")
            .field("bucket", &self.bucket)
            .field("key", &self.key)
            .field("body", &self.body)
            .field("content_type", &self.content_type)
            .field("metadata", &self.metadata)
            .field("tagging", &self.tagging)
            .field("acl", &self.acl)
            .finish()
    }
}

/// Builder for [`UploadInput`].
#[derive(Debug, Default)]
pub struct UploadInputBuilder {
    bucket: Option<String>,
    key: Option<String>,
    body: ByteSource,
    content_type: Option<String>,
    metadata: Option<HashMap<String, String>>,
    tagging: Option<String>,
    acl: Option<ObjectCannedAcl>,
}

impl UploadInputBuilder {
    /// The bucket name to which the upload is being made.
    pub fn bucket(mut self, bucket: impl Into<String>) -> Self {
        self.bucket = Some(bucket.into());
        self
    }

    /// Object key for which the upload is being made.
    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    /// Object data.
    pub fn body(mut self, body: ByteSource) -> Self {
        self.body = body;
        self
    }

    /// A standard MIME type describing the format of the contents.
    pub fn content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Add a single metadata key/value pair to store with the object.
    pub fn metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata
            .get_or_insert_with(HashMap::new)
            .insert(key.into(), value.into());
        self
    }

    /// The tag-set for the object, encoded as URL query parameters
    /// (e.g. `stage=test&team=storage`).
    pub fn tagging(mut self, tagging: impl Into<String>) -> Self {
        self.tagging = Some(tagging.into());
        self
    }

    /// The canned ACL to apply to the object.
    pub fn acl(mut self, acl: ObjectCannedAcl) -> Self {
        self.acl = Some(acl);
        self
    }

    /// Consume the builder and construct an [`UploadInput`].
    pub fn build(self) -> Result<UploadInput, crate::error::Error> {
        if self.bucket.is_none() {
            return Err(error::invalid_input("bucket is required"));
        }
        if self.key.is_none() {
            return Err(error::invalid_input("key is required"));
        }

        Ok(UploadInput {
            bucket: self.bucket,
            key: self.key,
            body: self.body,
            content_type: self.content_type,
            metadata: self.metadata,
            tagging: self.tagging,
            acl: self.acl,
        })
    }
}
