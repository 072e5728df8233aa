/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use crate::client::Handle;
use crate::error;
use crate::io::AggregatedBytes;
use crate::types::ObjectSummary;

/// List objects in a bucket, paginating through the full result set.
pub(crate) async fn list_objects(
    handle: &Handle,
    bucket: &str,
    prefix: Option<&str>,
    page_size: Option<i32>,
) -> Result<Vec<ObjectSummary>, error::Error> {
    let mut paginator = handle
        .config
        .client()
        .list_objects_v2()
        .bucket(bucket)
        .set_prefix(prefix.map(str::to_owned))
        .into_paginator();
    if let Some(page_size) = page_size {
        paginator = paginator.page_size(page_size);
    }
    let mut paginator = paginator.send();

    let mut objects = Vec::new();
    while let Some(page) = paginator.next().await {
        let page = page?;
        for obj in page.contents.unwrap_or_default() {
            if let Some(key) = obj.key {
                objects.push(ObjectSummary {
                    key,
                    size: obj.size,
                    e_tag: obj.e_tag,
                });
            }
        }
        tracing::trace!("processed list page, {} objects so far", objects.len());
    }

    tracing::debug!("listed {} objects in bucket {bucket}", objects.len());
    Ok(objects)
}

/// Download an object into memory.
pub(crate) async fn get_object(
    handle: &Handle,
    bucket: &str,
    key: &str,
) -> Result<AggregatedBytes, error::Error> {
    let resp = handle
        .config
        .client()
        .get_object()
        .bucket(bucket)
        .key(key)
        .send()
        .await?;

    let data = resp
        .body
        .collect()
        .await
        .map_err(error::from_kind(error::ErrorKind::IOError))?;

    tracing::debug!("downloaded object {bucket}/{key}");
    Ok(data)
}

/// Copy an object. `source` takes the `{source-bucket}/{source-key}` form the
/// service expects for the copy source.
pub(crate) async fn copy_object(
    handle: &Handle,
    bucket: &str,
    source: &str,
    dest_key: &str,
) -> Result<(), error::Error> {
    handle
        .config
        .client()
        .copy_object()
        .bucket(bucket)
        .copy_source(source)
        .key(dest_key)
        .send()
        .await?;

    tracing::debug!("copied {source} to {bucket}/{dest_key}");
    Ok(())
}

/// Delete an object.
pub(crate) async fn delete_object(
    handle: &Handle,
    bucket: &str,
    key: &str,
) -> Result<(), error::Error> {
    handle
        .config
        .client()
        .delete_object()
        .bucket(bucket)
        .key(key)
        .send()
        .await?;

    tracing::debug!("deleted object {bucket}/{key}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use aws_sdk_s3::operation::copy_object::CopyObjectOutput;
    use aws_sdk_s3::operation::delete_object::DeleteObjectOutput;
    use aws_sdk_s3::operation::get_object::GetObjectOutput;
    use aws_sdk_s3::operation::list_objects_v2::ListObjectsV2Output;
    use aws_sdk_s3::primitives::ByteStream;
    use aws_sdk_s3::types::Object;
    use aws_smithy_mocks_experimental::{mock, mock_client, RuleMode};

    fn test_client(client: aws_sdk_s3::Client) -> crate::Client {
        crate::Client::new(crate::Config::builder().client(client).build())
    }

    #[tokio::test]
    async fn test_list_objects_paginates() {
        let page_1 = mock!(aws_sdk_s3::Client::list_objects_v2)
            .match_requests(|r| r.continuation_token().is_none() && r.max_keys() == Some(2))
            .then_output(|| {
                ListObjectsV2Output::builder()
                    .contents(Object::builder().key("a.txt").size(1).build())
                    .contents(Object::builder().key("b.txt").size(2).build())
                    .is_truncated(true)
                    .next_continuation_token("page-2")
                    .build()
            });
        let page_2 = mock!(aws_sdk_s3::Client::list_objects_v2)
            .match_requests(|r| r.continuation_token() == Some("page-2"))
            .then_output(|| {
                ListObjectsV2Output::builder()
                    .contents(Object::builder().key("c.txt").size(3).build())
                    .build()
            });

        let client = test_client(mock_client!(
            aws_sdk_s3,
            RuleMode::Sequential,
            &[&page_1, &page_2]
        ));

        let objects = client
            .list_objects("test-bucket", None, Some(2))
            .await
            .unwrap();
        let keys = objects.iter().map(|o| o.key.as_str()).collect::<Vec<_>>();
        assert_eq!(vec!["a.txt", "b.txt", "c.txt"], keys);
    }

    #[tokio::test]
    async fn test_get_object() {
        let get = mock!(aws_sdk_s3::Client::get_object)
            .match_requests(|r| r.key() == Some("my-key"))
            .then_output(|| {
                GetObjectOutput::builder()
                    .body(ByteStream::from_static(b"object contents"))
                    .build()
            });

        let client = test_client(mock_client!(aws_sdk_s3, RuleMode::Sequential, &[&get]));
        let data = client.get_object("test-bucket", "my-key").await.unwrap();
        assert_eq!(b"object contents", data.into_bytes().as_ref());
    }

    #[tokio::test]
    async fn test_copy_object() {
        let copy = mock!(aws_sdk_s3::Client::copy_object)
            .match_requests(|r| {
                r.copy_source() == Some("src-bucket/src-key") && r.key() == Some("dest-key")
            })
            .then_output(|| CopyObjectOutput::builder().build());

        let client = test_client(mock_client!(aws_sdk_s3, RuleMode::Sequential, &[&copy]));
        client
            .copy_object("test-bucket", "src-bucket/src-key", "dest-key")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_delete_object() {
        let delete = mock!(aws_sdk_s3::Client::delete_object)
            .match_requests(|r| r.key() == Some("gone"))
            .then_output(|| DeleteObjectOutput::builder().build());

        let client = test_client(mock_client!(aws_sdk_s3, RuleMode::Sequential, &[&delete]));
        client.delete_object("test-bucket", "gone").await.unwrap();
    }
}
