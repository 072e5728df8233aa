/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use aws_sdk_s3::types::{Tag, Tagging};

use crate::client::Handle;
use crate::error;

/// Get the tag set of an object.
pub(crate) async fn get_object_tagging(
    handle: &Handle,
    bucket: &str,
    key: &str,
) -> Result<Vec<Tag>, error::Error> {
    let resp = handle
        .config
        .client()
        .get_object_tagging()
        .bucket(bucket)
        .key(key)
        .send()
        .await?;

    tracing::debug!("object {bucket}/{key} has {} tags", resp.tag_set.len());
    Ok(resp.tag_set)
}

/// Replace the tag set of an object.
///
/// This overwrites any existing tags. To append, fetch the current set with
/// [`get_object_tagging`] and put back the merged result.
pub(crate) async fn put_object_tagging(
    handle: &Handle,
    bucket: &str,
    key: &str,
    tags: Vec<Tag>,
) -> Result<(), error::Error> {
    let tagging = Tagging::builder()
        .set_tag_set(Some(tags))
        .build()
        .map_err(error::invalid_input)?;

    handle
        .config
        .client()
        .put_object_tagging()
        .bucket(bucket)
        .key(key)
        .tagging(tagging)
        .send()
        .await?;

    tracing::debug!("tag set applied to object {bucket}/{key}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use aws_sdk_s3::operation::get_object_tagging::GetObjectTaggingOutput;
    use aws_sdk_s3::operation::put_object_tagging::PutObjectTaggingOutput;
    use aws_sdk_s3::types::Tag;
    use aws_smithy_mocks_experimental::{mock, mock_client, RuleMode};

    fn tag(key: &str, value: &str) -> Tag {
        Tag::builder().key(key).value(value).build().unwrap()
    }

    fn test_client(client: aws_sdk_s3::Client) -> crate::Client {
        crate::Client::new(crate::Config::builder().client(client).build())
    }

    #[tokio::test]
    async fn test_get_object_tagging() {
        let get = mock!(aws_sdk_s3::Client::get_object_tagging).then_output(|| {
            GetObjectTaggingOutput::builder()
                .tag_set(tag("stage", "test"))
                .build()
                .unwrap()
        });

        let client = test_client(mock_client!(aws_sdk_s3, RuleMode::Sequential, &[&get]));
        let tags = client
            .get_object_tagging("test-bucket", "my-key")
            .await
            .unwrap();
        assert_eq!(1, tags.len());
        assert_eq!("stage", tags[0].key());
        assert_eq!("test", tags[0].value());
    }

    #[tokio::test]
    async fn test_put_object_tagging_replaces_tag_set() {
        let put = mock!(aws_sdk_s3::Client::put_object_tagging)
            .match_requests(|r| {
                r.tagging()
                    .map(|t| t.tag_set().len() == 2)
                    .unwrap_or_default()
            })
            .then_output(|| PutObjectTaggingOutput::builder().build());

        let client = test_client(mock_client!(aws_sdk_s3, RuleMode::Sequential, &[&put]));
        client
            .put_object_tagging(
                "test-bucket",
                "my-key",
                vec![tag("stage", "test"), tag("team", "storage")],
            )
            .await
            .unwrap();
    }
}
