/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::types::{CompletedMultipartUpload, CompletedPart};
use tokio::task::{self, JoinHandle};
use tracing::Instrument;

use crate::error;
use crate::operation::upload::context::UploadContext;
use crate::operation::upload::{UploadOutput, UploadOutputBuilder};
use crate::types::{AbortedUpload, FailedUploadPolicy};

#[derive(Debug)]
pub(crate) enum UploadType {
    /// Chunked upload through the multipart upload API
    Chunked {
        /// Part transfer worker tasks spawned for this upload
        part_tasks: task::JoinSet<Result<Vec<CompletedPart>, error::Error>>,
        /// Number of parts the partition plan produced; the completion
        /// manifest must account for every one of them
        expected_parts: u64,
        /// The response that will eventually be yielded to the caller
        response: UploadOutputBuilder,
    },
    /// Single-shot `PutObject` upload; no session to manage
    PutObject {
        put_object_task: JoinHandle<Result<UploadOutput, error::Error>>,
    },
}

/// Handle for an in-flight upload.
///
/// Transfers are already running when the handle is returned. Call
/// [`join`](Self::join) to drive the upload to completion, or
/// [`abort`](Self::abort) to cancel it and discard the upload session.
///
/// For chunked uploads the handle owns the server-side session: every exit
/// path through `join` either commits the session or aborts it (subject to
/// [`FailedUploadPolicy`]), so a session is never knowingly left dangling.
#[derive(Debug)]
#[non_exhaustive]
pub struct UploadHandle {
    pub(crate) upload_type: UploadType,
    /// The context used to drive an upload to completion
    pub(crate) ctx: UploadContext,
}

impl UploadHandle {
    /// Create a new handle for a chunked (multipart) upload
    pub(crate) fn new_chunked(
        ctx: UploadContext,
        part_tasks: task::JoinSet<Result<Vec<CompletedPart>, error::Error>>,
        expected_parts: u64,
        response: UploadOutputBuilder,
    ) -> Self {
        Self {
            upload_type: UploadType::Chunked {
                part_tasks,
                expected_parts,
                response,
            },
            ctx,
        }
    }

    /// Create a new handle for a single-shot `PutObject` upload
    pub(crate) fn new_put_object(
        ctx: UploadContext,
        put_object_task: JoinHandle<Result<UploadOutput, error::Error>>,
    ) -> Self {
        Self {
            upload_type: UploadType::PutObject { put_object_task },
            ctx,
        }
    }

    /// Consume the handle and wait for the upload to complete.
    ///
    /// Either the whole object is committed and visible at the destination,
    /// or the upload failed and nothing is observable at the destination.
    #[tracing::instrument(skip_all, level = "debug", name = "join-upload")]
    pub async fn join(self) -> Result<UploadOutput, error::Error> {
        complete_upload(self).await
    }

    /// Abort the upload.
    ///
    /// Stops workers from admitting new part transfers, waits for in-flight
    /// transfers to settle, and discards the upload session. Single-shot
    /// uploads have no session; the request task is simply cancelled.
    #[tracing::instrument(skip_all, level = "debug", name = "abort-upload")]
    pub async fn abort(self) -> Result<AbortedUpload, error::Error> {
        match self.upload_type {
            UploadType::PutObject { put_object_task } => {
                put_object_task.abort();
                // the request may have finished before it could be cancelled
                let _ = put_object_task.await;
                Ok(AbortedUpload::default())
            }
            UploadType::Chunked { mut part_tasks, .. } => {
                self.ctx.cancel();
                while (part_tasks.join_next().await).is_some() {}

                match self.ctx.handle.config.failed_upload_policy() {
                    FailedUploadPolicy::Abort => abort_session(&self.ctx).await,
                    FailedUploadPolicy::Retain => Ok(AbortedUpload::default()),
                }
            }
        }
    }
}

/// Issue `AbortMultipartUpload` for the session owned by this upload.
async fn abort_session(ctx: &UploadContext) -> Result<AbortedUpload, error::Error> {
    let upload_id = ctx.upload_id.clone().expect("upload session open");
    ctx.client()
        .abort_multipart_upload()
        .set_bucket(ctx.request.bucket.clone())
        .set_key(ctx.request.key.clone())
        .upload_id(upload_id.clone())
        .send()
        .instrument(tracing::debug_span!("send-abort-multipart-upload"))
        .await
        .map_err(error::from_kind(error::ErrorKind::AbortFailed))?;

    Ok(AbortedUpload {
        upload_id: Some(upload_id),
    })
}

/// Best-effort session cleanup on the failure path.
///
/// Abort failure is logged and swallowed so it never masks the error that
/// caused the upload to fail; the orphaned session is the caller's (or a
/// bucket lifecycle rule's) to reclaim.
async fn abort_session_on_failure(ctx: &UploadContext) {
    if let FailedUploadPolicy::Retain = ctx.handle.config.failed_upload_policy() {
        tracing::debug!("upload failed; retaining upload session per policy");
        return;
    }
    if let Err(err) = abort_session(ctx).await {
        tracing::error!(
            "failed to abort upload session: {}",
            DisplayErrorContext(&err)
        );
    }
}

async fn complete_upload(handle: UploadHandle) -> Result<UploadOutput, error::Error> {
    let ctx = handle.ctx;
    match handle.upload_type {
        UploadType::PutObject { put_object_task } => put_object_task.await?,
        UploadType::Chunked {
            mut part_tasks,
            expected_parts,
            response,
        } => {
            let mut all_parts = Vec::with_capacity(expected_parts as usize);
            let mut first_error: Option<error::Error> = None;

            // Wait for every worker to settle regardless of errors; transfers
            // already in flight are never force-killed.
            while let Some(join_result) = part_tasks.join_next().await {
                match join_result {
                    Ok(Ok(completed)) => all_parts.extend(completed),
                    Ok(Err(err)) => {
                        first_error.get_or_insert(err);
                    }
                    Err(join_err) => {
                        first_error.get_or_insert(join_err.into());
                    }
                }
            }

            if let Some(err) = first_error {
                tracing::error!("chunked upload failed, aborting");
                abort_session_on_failure(&ctx).await;
                return Err(err);
            }

            // the completion manifest must be in ascending sequence order
            all_parts.sort_by_key(|p| p.part_number.expect("part number set"));

            if let Err(err) = validate_manifest(&all_parts, expected_parts) {
                abort_session_on_failure(&ctx).await;
                return Err(err);
            }

            tracing::trace!("completing multipart upload");

            let complete_resp = ctx
                .client()
                .complete_multipart_upload()
                .set_bucket(ctx.request.bucket.clone())
                .set_key(ctx.request.key.clone())
                .set_upload_id(ctx.upload_id.clone())
                .multipart_upload(
                    CompletedMultipartUpload::builder()
                        .set_parts(Some(all_parts))
                        .build(),
                )
                .send()
                .instrument(tracing::debug_span!("send-complete-multipart-upload"))
                .await;

            let complete_resp = match complete_resp {
                Ok(resp) => resp,
                Err(err) => {
                    // the object was not created; clean up the session rather
                    // than leave it dangling
                    tracing::error!("failed to finalize chunked upload, aborting");
                    abort_session_on_failure(&ctx).await;
                    return Err(error::Error::new(error::ErrorKind::FinalizeFailed, err));
                }
            };

            tracing::trace!("upload completed successfully");

            Ok(response
                .set_e_tag(complete_resp.e_tag)
                .set_expiration(complete_resp.expiration)
                .set_version_id(complete_resp.version_id)
                .build())
        }
    }
}

/// Verify the completion manifest covers every part of the partition plan:
/// exactly `expected_parts` entries numbered 1..=n with no gaps or duplicates.
///
/// `parts` must already be sorted by part number.
fn validate_manifest(
    parts: &[CompletedPart],
    expected_parts: u64,
) -> Result<(), error::Error> {
    if parts.len() as u64 != expected_parts {
        return Err(error::Error::new(
            error::ErrorKind::PartTransferFailed,
            format!(
                "incomplete upload manifest: expected {} parts, have {}",
                expected_parts,
                parts.len()
            ),
        ));
    }

    for (idx, part) in parts.iter().enumerate() {
        let part_number = part.part_number.expect("part number set");
        if part_number != idx as i32 + 1 {
            return Err(error::Error::new(
                error::ErrorKind::PartTransferFailed,
                format!("upload manifest has a gap or duplicate at part {part_number}"),
            ));
        }
    }

    Ok(())
}
