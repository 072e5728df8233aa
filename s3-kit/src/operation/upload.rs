/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

/// Operation builders
pub mod builders;
mod input;
mod output;

mod context;
mod handle;
mod service;

use std::cmp;
use std::sync::Arc;

use aws_sdk_s3::primitives::ByteStream;

use crate::error;
use crate::io::ByteSource;
use context::UploadContext;
pub use handle::UploadHandle;
/// Request type for uploads to Amazon S3
pub use input::{UploadInput, UploadInputBuilder};
/// Response type for uploads to Amazon S3
pub use output::UploadOutput;
pub(crate) use output::UploadOutputBuilder;
use service::distribute_work;

/// Maximum number of parts that a single S3 multipart upload supports
const MAX_PARTS: u64 = 10_000;

/// Operation struct for single object upload
#[derive(Clone, Default, Debug)]
pub(crate) struct Upload;

impl Upload {
    /// Execute a single `Upload` operation
    pub(crate) async fn orchestrate(
        handle: Arc<crate::client::Handle>,
        mut input: UploadInput,
    ) -> Result<UploadHandle, error::Error> {
        let min_mpu_threshold = handle.mpu_threshold_bytes();

        let source = input.take_body();
        set_content_type_from_path(&mut input, &source);
        let ctx = UploadContext::new(handle, input);

        // the service caps a multipart upload at 10K parts, which requires
        // knowing the upper bound on the content length up front
        let content_length = source
            .size_hint()
            .upper()
            .ok_or_else(crate::io::error::Error::upper_bound_size_hint_required)?;

        let handle = if content_length < min_mpu_threshold {
            tracing::trace!("upload content size hint ({content_length}) less than min part size threshold ({min_mpu_threshold}); sending as single PutObject request");
            start_put_object(ctx, source, content_length).await?
        } else {
            start_chunked_upload(ctx, source, content_length).await?
        };

        Ok(handle)
    }
}

/// Guess a content type from the source's file extension when the request
/// doesn't set one explicitly.
fn set_content_type_from_path(input: &mut UploadInput, source: &ByteSource) {
    if input.content_type.is_none() {
        if let Some(path) = source.path() {
            input.content_type = mime_guess::from_path(path)
                .first()
                .map(|mime| mime.to_string());
        }
    }
}

/// Single-shot path: the whole object in one `PutObject` request, no upload session.
async fn start_put_object(
    ctx: UploadContext,
    source: ByteSource,
    content_length: u64,
) -> Result<UploadHandle, error::Error> {
    let byte_stream = source.into_byte_stream().await?;
    let content_length: i64 = content_length
        .try_into()
        .map_err(|_| error::invalid_input(format!("content_length:{content_length} is invalid")))?;

    Ok(UploadHandle::new_put_object(
        ctx.clone(),
        tokio::spawn(put_object(ctx, byte_stream, content_length)),
    ))
}

async fn put_object(
    ctx: UploadContext,
    body: ByteStream,
    content_length: i64,
) -> Result<UploadOutput, error::Error> {
    let resp = ctx
        .client()
        .put_object()
        .set_bucket(ctx.request.bucket.clone())
        .set_key(ctx.request.key.clone())
        .content_length(content_length)
        .set_content_type(ctx.request.content_type.clone())
        .set_metadata(ctx.request.metadata.clone())
        .set_tagging(ctx.request.tagging.clone())
        .set_acl(ctx.request.acl.clone())
        .body(body)
        .send()
        .await?;

    let builder: UploadOutputBuilder = resp.into();
    Ok(builder.build())
}

/// Chunked path: open a session, partition the source, and fan the parts out
/// to a bounded pool of transfer workers.
async fn start_chunked_upload(
    mut ctx: UploadContext,
    source: ByteSource,
    content_length: u64,
) -> Result<UploadHandle, error::Error> {
    let part_size = cmp::max(
        ctx.handle.upload_part_size_bytes(),
        content_length.div_ceil(MAX_PARTS),
    );
    let expected_parts = content_length.div_ceil(part_size);
    tracing::trace!(
        "chunked upload with part size {part_size} bytes across {expected_parts} parts"
    );

    let response = open_session(&ctx).await?;
    let upload_id = response.upload_id.clone().ok_or_else(|| {
        error::Error::new(
            error::ErrorKind::SessionOpenFailed,
            "service returned no upload id",
        )
    })?;
    tracing::trace!("upload session open with upload id: {upload_id:?}");
    ctx.set_upload_id(upload_id);

    let part_tasks = distribute_work(&ctx, source, part_size);
    Ok(UploadHandle::new_chunked(
        ctx,
        part_tasks,
        expected_parts,
        response,
    ))
}

/// Open a new upload session by invoking `CreateMultipartUpload`.
///
/// Failure here is fatal to the job; no session exists yet so there is
/// nothing to clean up.
async fn open_session(ctx: &UploadContext) -> Result<UploadOutputBuilder, error::Error> {
    let req = ctx.request();
    let resp = ctx
        .client()
        .create_multipart_upload()
        .set_bucket(req.bucket.clone())
        .set_key(req.key.clone())
        .set_content_type(req.content_type.clone())
        .set_metadata(req.metadata.clone())
        .set_tagging(req.tagging.clone())
        .set_acl(req.acl.clone())
        .send()
        .await
        .map_err(error::from_kind(error::ErrorKind::SessionOpenFailed))?;

    Ok(resp.into())
}
