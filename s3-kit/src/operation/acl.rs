/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use aws_sdk_s3::types::{Grant, ObjectCannedAcl, Owner};

use crate::client::Handle;
use crate::error;

/// Access control list of an object: the owner plus the grants in effect.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct ObjectAcl {
    /// The bucket owner
    pub owner: Option<Owner>,
    /// The grants in effect on the object
    pub grants: Vec<Grant>,
}

/// Get the access control list of an object.
pub(crate) async fn get_object_acl(
    handle: &Handle,
    bucket: &str,
    key: &str,
) -> Result<ObjectAcl, error::Error> {
    let resp = handle
        .config
        .client()
        .get_object_acl()
        .bucket(bucket)
        .key(key)
        .send()
        .await?;

    let acl = ObjectAcl {
        owner: resp.owner,
        grants: resp.grants.unwrap_or_default(),
    };

    for grant in &acl.grants {
        let display_name = grant
            .grantee()
            .and_then(|g| g.display_name())
            .unwrap_or("None");
        tracing::debug!(
            "grantee: {display_name}, permission: {:?}",
            grant.permission()
        );
    }

    Ok(acl)
}

/// Apply a canned ACL to an object.
pub(crate) async fn put_object_acl(
    handle: &Handle,
    bucket: &str,
    key: &str,
    acl: ObjectCannedAcl,
) -> Result<(), error::Error> {
    handle
        .config
        .client()
        .put_object_acl()
        .bucket(bucket)
        .key(key)
        .acl(acl)
        .send()
        .await?;

    tracing::debug!("ACL updated on object {bucket}/{key}");
    Ok(())
}
