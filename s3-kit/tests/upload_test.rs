/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::task::{Context, Poll};

use aws_sdk_s3::operation::abort_multipart_upload::{
    AbortMultipartUploadError, AbortMultipartUploadOutput,
};
use aws_sdk_s3::operation::complete_multipart_upload::{
    CompleteMultipartUploadError, CompleteMultipartUploadOutput,
};
use aws_sdk_s3::operation::create_multipart_upload::CreateMultipartUploadOutput;
use aws_sdk_s3::operation::put_object::PutObjectOutput;
use aws_sdk_s3::operation::upload_part::{UploadPartError, UploadPartOutput};
use aws_smithy_mocks_experimental::{mock, mock_client, RuleMode};
use aws_smithy_types::error::ErrorMetadata;
use bytes::Bytes;
use s3_kit::error::ErrorKind;
use s3_kit::io::{ByteSource, Part, PartStream, SizeHint, StreamContext};
use s3_kit::types::{ConcurrencySetting, FailedUploadPolicy, PartSize};

const MEBIBYTE: usize = 1024 * 1024;
const UPLOAD_ID: &str = "test-upload-id";

fn test_body(len: usize) -> Bytes {
    let mut data = Vec::with_capacity(len);
    for i in 0..len {
        data.push((i % 251) as u8);
    }
    Bytes::from(data)
}

fn test_client(
    s3_client: aws_sdk_s3::Client,
    concurrency: usize,
    policy: FailedUploadPolicy,
) -> s3_kit::Client {
    let config = s3_kit::Config::builder()
        .multipart_threshold(PartSize::Target(5 * MEBIBYTE as u64))
        .part_size(PartSize::Target(5 * MEBIBYTE as u64))
        .concurrency(ConcurrencySetting::Explicit(concurrency))
        .failed_upload_policy(policy)
        .client(s3_client)
        .build();
    s3_kit::Client::new(config)
}

/// 12 MiB body with 5 MiB parts and concurrency 10: three parts (5, 5, 2 MiB),
/// one finalize call whose manifest is complete and in ascending order.
#[tokio::test]
async fn test_three_part_upload_ascending_manifest() {
    let create_mpu = mock!(aws_sdk_s3::Client::create_multipart_upload).then_output(|| {
        CreateMultipartUploadOutput::builder()
            .upload_id(UPLOAD_ID)
            .build()
    });

    let upload_part = mock!(aws_sdk_s3::Client::upload_part)
        .match_requests(|r| r.upload_id.as_deref() == Some(UPLOAD_ID))
        .then_output(|| UploadPartOutput::builder().e_tag("part-e-tag").build());

    let complete_calls = Arc::new(AtomicUsize::new(0));
    let calls = complete_calls.clone();
    let complete_mpu = mock!(aws_sdk_s3::Client::complete_multipart_upload)
        .match_requests(|r| {
            let parts = r
                .multipart_upload
                .as_ref()
                .and_then(|mpu| mpu.parts.as_ref())
                .expect("manifest present");
            let part_numbers: Vec<i32> = parts.iter().map(|p| p.part_number.unwrap()).collect();
            part_numbers == vec![1, 2, 3]
        })
        .then_output(move || {
            calls.fetch_add(1, Ordering::SeqCst);
            CompleteMultipartUploadOutput::builder()
                .e_tag("final-e-tag")
                .build()
        });

    let client = mock_client!(
        aws_sdk_s3,
        RuleMode::MatchAny,
        &[&create_mpu, &upload_part, &complete_mpu]
    );
    let client = test_client(client, 10, FailedUploadPolicy::Abort);

    let handle = client
        .upload()
        .bucket("test-bucket")
        .key("test-key")
        .body(ByteSource::from(test_body(12 * MEBIBYTE)))
        .send()
        .await
        .unwrap();

    let resp = handle.join().await.unwrap();
    assert_eq!(Some(UPLOAD_ID), resp.upload_id());
    assert_eq!(Some("final-e-tag"), resp.e_tag());
    assert_eq!(1, complete_calls.load(Ordering::SeqCst));
}

/// A part that fails permanently must prevent finalize entirely and abort the
/// session exactly once; the job reports the part failure.
#[tokio::test]
async fn test_failed_part_aborts_session() {
    let create_mpu = mock!(aws_sdk_s3::Client::create_multipart_upload).then_output(|| {
        CreateMultipartUploadOutput::builder()
            .upload_id(UPLOAD_ID)
            .build()
    });

    let upload_ok = mock!(aws_sdk_s3::Client::upload_part)
        .match_requests(|r| r.part_number != Some(2))
        .then_output(|| UploadPartOutput::builder().e_tag("part-e-tag").build());

    let upload_part_2 = mock!(aws_sdk_s3::Client::upload_part)
        .match_requests(|r| r.part_number == Some(2))
        .then_error(|| {
            UploadPartError::generic(ErrorMetadata::builder().code("InternalError").build())
        });

    let complete_calls = Arc::new(AtomicUsize::new(0));
    let calls = complete_calls.clone();
    let complete_mpu = mock!(aws_sdk_s3::Client::complete_multipart_upload).then_output(move || {
        calls.fetch_add(1, Ordering::SeqCst);
        CompleteMultipartUploadOutput::builder().build()
    });

    let abort_calls = Arc::new(AtomicUsize::new(0));
    let calls = abort_calls.clone();
    let abort_mpu = mock!(aws_sdk_s3::Client::abort_multipart_upload)
        .match_requests(|r| r.upload_id.as_deref() == Some(UPLOAD_ID))
        .then_output(move || {
            calls.fetch_add(1, Ordering::SeqCst);
            AbortMultipartUploadOutput::builder().build()
        });

    let client = mock_client!(
        aws_sdk_s3,
        RuleMode::MatchAny,
        &[&create_mpu, &upload_ok, &upload_part_2, &complete_mpu, &abort_mpu]
    );
    let client = test_client(client, 10, FailedUploadPolicy::Abort);

    let handle = client
        .upload()
        .bucket("test-bucket")
        .key("test-key")
        .body(ByteSource::from(test_body(12 * MEBIBYTE)))
        .send()
        .await
        .unwrap();

    let err = handle.join().await.unwrap_err();
    assert_eq!(&ErrorKind::PartTransferFailed, err.kind());
    assert_eq!(0, complete_calls.load(Ordering::SeqCst));
    assert_eq!(1, abort_calls.load(Ordering::SeqCst));
}

/// A body below the part size takes the single-shot path: one direct object
/// write and no upload session. Sequential rule mode fails the test if any
/// multipart call is attempted.
#[tokio::test]
async fn test_small_body_single_shot() {
    let put_object = mock!(aws_sdk_s3::Client::put_object)
        .match_requests(|r| r.content_length == Some(4 * MEBIBYTE as i64))
        .then_output(|| PutObjectOutput::builder().e_tag("small-e-tag").build());

    let client = mock_client!(aws_sdk_s3, RuleMode::Sequential, &[&put_object]);
    let client = test_client(client, 10, FailedUploadPolicy::Abort);

    let handle = client
        .upload()
        .bucket("test-bucket")
        .key("test-key")
        .body(ByteSource::from(test_body(4 * MEBIBYTE)))
        .send()
        .await
        .unwrap();

    let resp = handle.join().await.unwrap();
    assert_eq!(None, resp.upload_id());
    assert_eq!(Some("small-e-tag"), resp.e_tag());
}

/// Finalize failure leaves no object behind; the session is aborted as a
/// best-effort cleanup and the finalize error is the one reported.
#[tokio::test]
async fn test_finalize_failure_aborts_session() {
    let create_mpu = mock!(aws_sdk_s3::Client::create_multipart_upload).then_output(|| {
        CreateMultipartUploadOutput::builder()
            .upload_id(UPLOAD_ID)
            .build()
    });

    let upload_part = mock!(aws_sdk_s3::Client::upload_part)
        .then_output(|| UploadPartOutput::builder().e_tag("part-e-tag").build());

    let complete_mpu = mock!(aws_sdk_s3::Client::complete_multipart_upload).then_error(|| {
        CompleteMultipartUploadError::generic(
            ErrorMetadata::builder().code("InternalError").build(),
        )
    });

    let abort_calls = Arc::new(AtomicUsize::new(0));
    let calls = abort_calls.clone();
    let abort_mpu = mock!(aws_sdk_s3::Client::abort_multipart_upload).then_output(move || {
        calls.fetch_add(1, Ordering::SeqCst);
        AbortMultipartUploadOutput::builder().build()
    });

    let client = mock_client!(
        aws_sdk_s3,
        RuleMode::MatchAny,
        &[&create_mpu, &upload_part, &complete_mpu, &abort_mpu]
    );
    let client = test_client(client, 4, FailedUploadPolicy::Abort);

    let handle = client
        .upload()
        .bucket("test-bucket")
        .key("test-key")
        .body(ByteSource::from(test_body(12 * MEBIBYTE)))
        .send()
        .await
        .unwrap();

    let err = handle.join().await.unwrap_err();
    assert_eq!(&ErrorKind::FinalizeFailed, err.kind());
    assert_eq!(1, abort_calls.load(Ordering::SeqCst));
}

/// With the `Retain` policy the failed session is deliberately left for a
/// bucket lifecycle rule to reclaim; no abort call is made.
#[tokio::test]
async fn test_retain_policy_skips_abort() {
    let create_mpu = mock!(aws_sdk_s3::Client::create_multipart_upload).then_output(|| {
        CreateMultipartUploadOutput::builder()
            .upload_id(UPLOAD_ID)
            .build()
    });

    let upload_part = mock!(aws_sdk_s3::Client::upload_part).then_error(|| {
        UploadPartError::generic(ErrorMetadata::builder().code("InternalError").build())
    });

    let abort_calls = Arc::new(AtomicUsize::new(0));
    let calls = abort_calls.clone();
    let abort_mpu = mock!(aws_sdk_s3::Client::abort_multipart_upload).then_output(move || {
        calls.fetch_add(1, Ordering::SeqCst);
        AbortMultipartUploadOutput::builder().build()
    });

    let client = mock_client!(
        aws_sdk_s3,
        RuleMode::MatchAny,
        &[&create_mpu, &upload_part, &abort_mpu]
    );
    let client = test_client(client, 2, FailedUploadPolicy::Retain);

    let handle = client
        .upload()
        .bucket("test-bucket")
        .key("test-key")
        .body(ByteSource::from(test_body(12 * MEBIBYTE)))
        .send()
        .await
        .unwrap();

    let err = handle.join().await.unwrap_err();
    assert_eq!(&ErrorKind::PartTransferFailed, err.kind());
    assert_eq!(0, abort_calls.load(Ordering::SeqCst));
}

/// When cleanup itself fails the caller still sees the part failure, not the
/// abort failure; the session is left orphaned and the abort error is only
/// logged.
#[tokio::test]
async fn test_abort_failure_does_not_mask_part_error() {
    let create_mpu = mock!(aws_sdk_s3::Client::create_multipart_upload).then_output(|| {
        CreateMultipartUploadOutput::builder()
            .upload_id(UPLOAD_ID)
            .build()
    });

    let upload_ok = mock!(aws_sdk_s3::Client::upload_part)
        .match_requests(|r| r.part_number != Some(2))
        .then_output(|| UploadPartOutput::builder().e_tag("part-e-tag").build());

    let upload_part_2 = mock!(aws_sdk_s3::Client::upload_part)
        .match_requests(|r| r.part_number == Some(2))
        .then_error(|| {
            UploadPartError::generic(ErrorMetadata::builder().code("InternalError").build())
        });

    let complete_calls = Arc::new(AtomicUsize::new(0));
    let calls = complete_calls.clone();
    let complete_mpu = mock!(aws_sdk_s3::Client::complete_multipart_upload).then_output(move || {
        calls.fetch_add(1, Ordering::SeqCst);
        CompleteMultipartUploadOutput::builder().build()
    });

    let abort_calls = Arc::new(AtomicUsize::new(0));
    let calls = abort_calls.clone();
    let abort_mpu = mock!(aws_sdk_s3::Client::abort_multipart_upload).then_error(move || {
        calls.fetch_add(1, Ordering::SeqCst);
        AbortMultipartUploadError::generic(ErrorMetadata::builder().code("InternalError").build())
    });

    let client = mock_client!(
        aws_sdk_s3,
        RuleMode::MatchAny,
        &[&create_mpu, &upload_ok, &upload_part_2, &complete_mpu, &abort_mpu]
    );
    let client = test_client(client, 10, FailedUploadPolicy::Abort);

    let handle = client
        .upload()
        .bucket("test-bucket")
        .key("test-key")
        .body(ByteSource::from(test_body(12 * MEBIBYTE)))
        .send()
        .await
        .unwrap();

    let err = handle.join().await.unwrap_err();
    assert_eq!(&ErrorKind::PartTransferFailed, err.kind());
    assert_eq!(1, abort_calls.load(Ordering::SeqCst));
    assert_eq!(0, complete_calls.load(Ordering::SeqCst));
}

/// A caller-provided stream whose chunks are canned in advance and which
/// fails with an I/O error at a fixed index.
#[derive(Debug)]
struct FlakyStream {
    chunks: Vec<Bytes>,
    fail_index: usize,
    idx: usize,
}

impl PartStream for FlakyStream {
    fn poll_part(
        mut self: Pin<&mut Self>,
        _stream_cx: &StreamContext,
        _cx: &mut Context<'_>,
    ) -> Poll<Option<std::io::Result<Part>>> {
        if self.idx == self.fail_index {
            return Poll::Ready(Some(Err(std::io::Error::other("stream source failed"))));
        }
        if self.idx >= self.chunks.len() {
            return Poll::Ready(None);
        }
        let part = Part::new(self.idx as u64 + 1, self.chunks[self.idx].clone());
        self.idx += 1;
        Poll::Ready(Some(Ok(part)))
    }

    fn size_hint(&self) -> SizeHint {
        let total: u64 = self.chunks.iter().map(|c| c.len() as u64).sum();
        SizeHint::default().with_lower(total).with_upper(Some(total))
    }
}

/// A read error from the byte source cancels the upload, aborts the session
/// exactly once, and surfaces as an I/O failure; finalize is never attempted.
#[tokio::test]
async fn test_source_read_failure_aborts_session() {
    let create_mpu = mock!(aws_sdk_s3::Client::create_multipart_upload).then_output(|| {
        CreateMultipartUploadOutput::builder()
            .upload_id(UPLOAD_ID)
            .build()
    });

    let upload_part = mock!(aws_sdk_s3::Client::upload_part)
        .then_output(|| UploadPartOutput::builder().e_tag("part-e-tag").build());

    let complete_calls = Arc::new(AtomicUsize::new(0));
    let calls = complete_calls.clone();
    let complete_mpu = mock!(aws_sdk_s3::Client::complete_multipart_upload).then_output(move || {
        calls.fetch_add(1, Ordering::SeqCst);
        CompleteMultipartUploadOutput::builder().build()
    });

    let abort_calls = Arc::new(AtomicUsize::new(0));
    let calls = abort_calls.clone();
    let abort_mpu = mock!(aws_sdk_s3::Client::abort_multipart_upload)
        .match_requests(|r| r.upload_id.as_deref() == Some(UPLOAD_ID))
        .then_output(move || {
            calls.fetch_add(1, Ordering::SeqCst);
            AbortMultipartUploadOutput::builder().build()
        });

    let client = mock_client!(
        aws_sdk_s3,
        RuleMode::MatchAny,
        &[&create_mpu, &upload_part, &complete_mpu, &abort_mpu]
    );
    let client = test_client(client, 2, FailedUploadPolicy::Abort);

    let stream = FlakyStream {
        chunks: vec![test_body(5 * MEBIBYTE), test_body(5 * MEBIBYTE)],
        fail_index: 1,
        idx: 0,
    };

    let handle = client
        .upload()
        .bucket("test-bucket")
        .key("test-key")
        .body(ByteSource::from_part_stream(stream))
        .send()
        .await
        .unwrap();

    let err = handle.join().await.unwrap_err();
    assert_eq!(&ErrorKind::IOError, err.kind());
    assert_eq!(1, abort_calls.load(Ordering::SeqCst));
    assert_eq!(0, complete_calls.load(Ordering::SeqCst));
}

/// Uploading from a file reconstructs the exact original bytes across the
/// partition boundary.
#[tokio::test]
async fn test_file_source_upload() {
    use std::io::Write;

    let mut tmp = tempfile::NamedTempFile::new().unwrap();
    let body = test_body(6 * MEBIBYTE);
    tmp.write_all(&body).unwrap();

    let create_mpu = mock!(aws_sdk_s3::Client::create_multipart_upload).then_output(|| {
        CreateMultipartUploadOutput::builder()
            .upload_id(UPLOAD_ID)
            .build()
    });

    // 6 MiB at 5 MiB part size: parts of 5 MiB and 1 MiB
    let upload_part = mock!(aws_sdk_s3::Client::upload_part)
        .match_requests(|r| {
            matches!(
                (r.part_number, r.content_length),
                (Some(1), Some(len)) if len == 5 * MEBIBYTE as i64
            ) || matches!(
                (r.part_number, r.content_length),
                (Some(2), Some(len)) if len == MEBIBYTE as i64
            )
        })
        .then_output(|| UploadPartOutput::builder().e_tag("part-e-tag").build());

    let complete_mpu = mock!(aws_sdk_s3::Client::complete_multipart_upload)
        .then_output(|| CompleteMultipartUploadOutput::builder().e_tag("file-e-tag").build());

    let client = mock_client!(
        aws_sdk_s3,
        RuleMode::MatchAny,
        &[&create_mpu, &upload_part, &complete_mpu]
    );
    let client = test_client(client, 4, FailedUploadPolicy::Abort);

    let handle = client
        .upload()
        .bucket("test-bucket")
        .key("test-key")
        .body(ByteSource::from_path(tmp.path()).unwrap())
        .send()
        .await
        .unwrap();

    let resp = handle.join().await.unwrap();
    assert_eq!(Some("file-e-tag"), resp.e_tag());
}
