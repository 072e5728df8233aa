/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::sync::Arc;

use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::CompletedPart;
use bytes::Buf;
use tokio::task;
use tower::{service_fn, Service, ServiceBuilder, ServiceExt};
use tracing::Instrument;

use crate::error;
use crate::io::part_reader::{Builder as PartReaderBuilder, PartReader};
use crate::io::{ByteSource, Part};
use crate::operation::upload::UploadContext;

/// Request/input type for our "upload_part" service.
#[derive(Debug, Clone)]
pub(super) struct UploadPartRequest {
    pub(super) ctx: UploadContext,
    pub(super) part: Part,
}

/// handler (service fn) for a single part
async fn upload_part_handler(request: UploadPartRequest) -> Result<CompletedPart, error::Error> {
    let ctx = request.ctx;
    let part = request.part;
    let part_number = part.num as i32;

    let resp = ctx
        .client()
        .upload_part()
        .set_bucket(ctx.request.bucket.clone())
        .set_key(ctx.request.key.clone())
        .set_upload_id(ctx.upload_id.clone())
        .part_number(part_number)
        .content_length(part.data.remaining() as i64)
        .body(ByteStream::from(part.data))
        .send()
        .await
        .map_err(error::from_kind(error::ErrorKind::PartTransferFailed))?;

    tracing::trace!("completed upload of part number {}", part_number);
    let completed = CompletedPart::builder()
        .part_number(part_number)
        .set_e_tag(resp.e_tag.clone())
        .build();

    Ok(completed)
}

/// Create a new tower::Service for uploading individual parts of an object to S3
pub(super) fn upload_part_service(
    ctx: &UploadContext,
) -> impl Service<UploadPartRequest, Response = CompletedPart, Error = error::Error, Future: Send>
       + Clone
       + Send {
    let svc = service_fn(upload_part_handler);
    ServiceBuilder::new()
        .concurrency_limit(ctx.handle.num_workers())
        .service(svc)
}

/// Spawn the bounded pool of part transfer workers for an upload.
///
/// Exactly `num_workers` tasks are spawned; each repeatedly pulls the next
/// part off the shared reader and transfers it. A worker that hits a fatal
/// error cancels the context so its peers stop admitting new parts, and the
/// error is surfaced when the tasks are joined.
pub(super) fn distribute_work(
    ctx: &UploadContext,
    source: ByteSource,
    part_size: u64,
) -> task::JoinSet<Result<Vec<CompletedPart>, error::Error>> {
    let part_reader = Arc::new(
        PartReaderBuilder::new()
            .source(source)
            .part_size(part_size.try_into().expect("valid part size"))
            .build(),
    );
    let svc = upload_part_service(ctx);
    let n_workers = ctx.handle.num_workers();
    let mut tasks = task::JoinSet::new();
    for i in 0..n_workers {
        let worker = upload_parts(part_reader.clone(), ctx.clone(), svc.clone())
            .instrument(tracing::debug_span!("upload-parts", worker = i));
        tasks.spawn(worker);
    }
    tracing::trace!("work distributed for uploading parts");
    tasks
}

/// Worker loop: pull parts off the shared reader and transfer them one at a
/// time until the source is exhausted or the upload is cancelled.
async fn upload_parts(
    part_reader: Arc<PartReader>,
    ctx: UploadContext,
    svc: impl Service<UploadPartRequest, Response = CompletedPart, Error = error::Error, Future: Send>
        + Clone
        + Send
        + 'static,
) -> Result<Vec<CompletedPart>, error::Error> {
    let mut completed = Vec::new();
    while !ctx.is_cancelled() {
        let part = match part_reader.next_part().await {
            Ok(Some(part)) => part,
            Ok(None) => break,
            Err(err) => {
                ctx.cancel();
                return Err(err.into());
            }
        };

        let req = UploadPartRequest {
            ctx: ctx.clone(),
            part,
        };
        match svc.clone().oneshot(req).await {
            Ok(part) => completed.push(part),
            Err(err) => {
                ctx.cancel();
                return Err(err);
            }
        }
    }
    Ok(completed)
}
