/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use aws_sdk_s3::operation::create_multipart_upload::CreateMultipartUploadOutput;
use aws_sdk_s3::operation::put_object::PutObjectOutput;

/// Output of an upload request.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct UploadOutput {
    upload_id: Option<String>,
    e_tag: Option<String>,
    expiration: Option<String>,
    version_id: Option<String>,
}

impl UploadOutput {
    /// Create a new builder for `UploadOutput`
    pub(crate) fn builder() -> UploadOutputBuilder {
        UploadOutputBuilder::default()
    }

    /// The ID of the multipart upload session used, if the upload was chunked.
    pub fn upload_id(&self) -> Option<&str> {
        self.upload_id.as_deref()
    }

    /// Entity tag of the uploaded object.
    pub fn e_tag(&self) -> Option<&str> {
        self.e_tag.as_deref()
    }

    /// If the object expiration is configured, this will contain the
    /// expiration date and rule ID, URL-encoded.
    pub fn expiration(&self) -> Option<&str> {
        self.expiration.as_deref()
    }

    /// Version ID of the newly created object, if versioning is enabled for the bucket.
    pub fn version_id(&self) -> Option<&str> {
        self.version_id.as_deref()
    }
}

/// Builder for [`UploadOutput`].
#[derive(Debug, Clone, Default)]
pub(crate) struct UploadOutputBuilder {
    pub(crate) upload_id: Option<String>,
    pub(crate) e_tag: Option<String>,
    pub(crate) expiration: Option<String>,
    pub(crate) version_id: Option<String>,
}

impl UploadOutputBuilder {
    pub(crate) fn set_e_tag(mut self, e_tag: Option<String>) -> Self {
        self.e_tag = e_tag;
        self
    }

    pub(crate) fn set_expiration(mut self, expiration: Option<String>) -> Self {
        self.expiration = expiration;
        self
    }

    pub(crate) fn set_version_id(mut self, version_id: Option<String>) -> Self {
        self.version_id = version_id;
        self
    }

    pub(crate) fn build(self) -> UploadOutput {
        UploadOutput {
            upload_id: self.upload_id,
            e_tag: self.e_tag,
            expiration: self.expiration,
            version_id: self.version_id,
        }
    }
}

impl From<CreateMultipartUploadOutput> for UploadOutputBuilder {
    fn from(value: CreateMultipartUploadOutput) -> Self {
        UploadOutputBuilder {
            upload_id: value.upload_id,
            ..Default::default()
        }
    }
}

impl From<PutObjectOutput> for UploadOutputBuilder {
    fn from(value: PutObjectOutput) -> Self {
        UploadOutputBuilder {
            e_tag: value.e_tag,
            expiration: value.expiration,
            version_id: value.version_id,
            ..Default::default()
        }
    }
}
