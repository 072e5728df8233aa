/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use crate::client::Handle;
use crate::error;
use crate::types::BucketSummary;

/// List all buckets owned by the caller.
pub(crate) async fn list_buckets(handle: &Handle) -> Result<Vec<BucketSummary>, error::Error> {
    let resp = handle.config.client().list_buckets().send().await?;

    let buckets = resp
        .buckets
        .unwrap_or_default()
        .into_iter()
        .filter_map(|b| {
            b.name.map(|name| BucketSummary {
                name,
                creation_date: b.creation_date,
            })
        })
        .collect::<Vec<_>>();

    tracing::debug!("listed {} buckets", buckets.len());
    Ok(buckets)
}

/// Create a bucket with the given name.
pub(crate) async fn create_bucket(handle: &Handle, bucket: &str) -> Result<(), error::Error> {
    handle
        .config
        .client()
        .create_bucket()
        .bucket(bucket)
        .send()
        .await?;

    tracing::debug!("created bucket {bucket}");
    Ok(())
}

/// Delete the bucket with the given name.
pub(crate) async fn delete_bucket(handle: &Handle, bucket: &str) -> Result<(), error::Error> {
    handle
        .config
        .client()
        .delete_bucket()
        .bucket(bucket)
        .send()
        .await?;

    tracing::debug!("deleted bucket {bucket}");
    Ok(())
}
