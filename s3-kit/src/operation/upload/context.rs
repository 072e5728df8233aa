/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::ops::Deref;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::operation::upload::UploadInput;

/// Internal context used to drive a single upload operation
#[derive(Debug, Clone)]
pub(crate) struct UploadContext {
    /// reference to client handle used to do actual work
    pub(crate) handle: Arc<crate::client::Handle>,
    /// the multipart upload session ID, set once the session is open
    pub(crate) upload_id: Option<String>,
    /// the original request (NOTE: the body will have been taken for processing, only the other fields remain)
    pub(crate) request: Arc<UploadInput>,
    /// set when a worker hits a fatal error; remaining workers stop pulling new parts
    cancelled: Arc<AtomicBool>,
}

impl UploadContext {
    pub(crate) fn new(handle: Arc<crate::client::Handle>, request: UploadInput) -> Self {
        Self {
            handle,
            upload_id: None,
            request: Arc::new(request),
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    /// The S3 client to use for service operations
    pub(crate) fn client(&self) -> &aws_sdk_s3::Client {
        self.handle.config.client()
    }

    /// The original request (sans the body as it will have been taken for processing)
    pub(crate) fn request(&self) -> &UploadInput {
        self.request.deref()
    }

    /// Set the upload session ID once the session is open
    pub(crate) fn set_upload_id(&mut self, upload_id: String) {
        self.upload_id = Some(upload_id)
    }

    /// Stop workers from admitting new part transfers. In-flight transfers
    /// are left to settle on their own.
    pub(crate) fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub(crate) fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}
