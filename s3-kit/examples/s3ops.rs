/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

//! Demo driver exercising every operation the client supports, one explicit
//! subcommand per operation.
//!
//! ```text
//! AWS_PROFILE=dev cargo run --example s3ops -- upload ./big-file.bin my-bucket my-key
//! ```

use std::path::PathBuf;

use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::types::{ObjectCannedAcl, Tag};
use clap::{Parser, Subcommand};
use s3_kit::error::BoxError;
use s3_kit::io::ByteSource;
use s3_kit::types::{ConcurrencySetting, PartSize};
use tokio::io::AsyncWriteExt;

#[derive(Debug, Parser)]
#[command(name = "s3ops")]
#[command(about = "Runs a single S3 operation against your configured AWS account.")]
struct Args {
    #[command(subcommand)]
    op: Operation,

    /// Number of concurrent part transfers for uploads.
    #[arg(long, default_value_t = 8)]
    concurrency: usize,

    /// Part size in bytes for chunked uploads.
    #[arg(long, default_value_t = 8388608)]
    part_size: u64,
}

/// The operation to run.
#[derive(Debug, Subcommand)]
enum Operation {
    /// List all buckets owned by the caller
    ListBuckets,
    /// Create a bucket
    CreateBucket { bucket: String },
    /// Delete an empty bucket
    DeleteBucket { bucket: String },
    /// List objects in a bucket
    ListObjects {
        bucket: String,
        #[arg(long)]
        prefix: Option<String>,
        /// Maximum number of keys per page
        #[arg(long)]
        page_size: Option<i32>,
    },
    /// Upload a local file (chunked when over the multipart threshold)
    Upload {
        source: PathBuf,
        bucket: String,
        key: String,
    },
    /// Download an object to a local file
    Download {
        bucket: String,
        key: String,
        dest: PathBuf,
    },
    /// Copy an object ({source-bucket}/{source-key} form for the source)
    Copy {
        bucket: String,
        source: String,
        dest_key: String,
    },
    /// Delete an object
    DeleteObject { bucket: String, key: String },
    /// Print the tag set of an object
    GetTags { bucket: String, key: String },
    /// Append a tag to an object's existing tag set
    AddTag {
        bucket: String,
        key: String,
        tag_key: String,
        tag_value: String,
    },
    /// Print the access control list of an object
    GetAcl { bucket: String, key: String },
    /// Apply a canned ACL to an object (e.g. private, public-read)
    SetAcl {
        bucket: String,
        key: String,
        canned_acl: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let sdk_config = aws_config::from_env().load().await;
    let s3_client = aws_sdk_s3::Client::new(&sdk_config);

    let config = s3_kit::Config::builder()
        .concurrency(ConcurrencySetting::Explicit(args.concurrency))
        .part_size(PartSize::Target(args.part_size))
        .client(s3_client)
        .build();
    let client = s3_kit::Client::new(config);

    let result = run(&client, args.op).await;
    if let Err(ref err) = result {
        tracing::error!("operation failed: {}", DisplayErrorContext(err.as_ref()));
    }
    result
}

async fn run(client: &s3_kit::Client, op: Operation) -> Result<(), BoxError> {
    match op {
        Operation::ListBuckets => {
            for bucket in client.list_buckets().await? {
                println!("{:?}\t{}", bucket.creation_date, bucket.name);
            }
        }
        Operation::CreateBucket { bucket } => {
            client.create_bucket(&bucket).await?;
            println!("bucket created");
        }
        Operation::DeleteBucket { bucket } => {
            client.delete_bucket(&bucket).await?;
            println!("bucket deleted");
        }
        Operation::ListObjects {
            bucket,
            prefix,
            page_size,
        } => {
            for obj in client
                .list_objects(&bucket, prefix.as_deref(), page_size)
                .await?
            {
                println!("{}\t{:?}", obj.key, obj.size);
            }
        }
        Operation::Upload {
            source,
            bucket,
            key,
        } => {
            let body = ByteSource::from_path(&source)?;
            let handle = client
                .upload()
                .bucket(bucket)
                .key(key)
                .body(body)
                .send()
                .await?;
            let resp = handle.join().await?;
            println!("uploaded, e_tag: {:?}", resp.e_tag());
        }
        Operation::Download { bucket, key, dest } => {
            let data = client.get_object(&bucket, &key).await?;
            let mut file = tokio::fs::File::create(&dest).await?;
            file.write_all(&data.into_bytes()).await?;
            file.flush().await?;
            println!("downloaded to {}", dest.display());
        }
        Operation::Copy {
            bucket,
            source,
            dest_key,
        } => {
            client.copy_object(&bucket, &source, &dest_key).await?;
            println!("object copied");
        }
        Operation::DeleteObject { bucket, key } => {
            client.delete_object(&bucket, &key).await?;
            println!("object deleted");
        }
        Operation::GetTags { bucket, key } => {
            for tag in client.get_object_tagging(&bucket, &key).await? {
                println!("{}={}", tag.key(), tag.value());
            }
        }
        Operation::AddTag {
            bucket,
            key,
            tag_key,
            tag_value,
        } => {
            let mut tags = client.get_object_tagging(&bucket, &key).await?;
            tags.push(Tag::builder().key(tag_key).value(tag_value).build()?);
            client.put_object_tagging(&bucket, &key, tags).await?;
            println!("tag set updated");
        }
        Operation::GetAcl { bucket, key } => {
            let acl = client.get_object_acl(&bucket, &key).await?;
            for grant in &acl.grants {
                let grantee = grant
                    .grantee()
                    .and_then(|g| g.display_name())
                    .unwrap_or("None");
                println!("grantee: {grantee}, permission: {:?}", grant.permission());
            }
            if let Some(owner) = acl.owner.as_ref().and_then(|o| o.display_name()) {
                println!("owner: {owner}");
            }
        }
        Operation::SetAcl {
            bucket,
            key,
            canned_acl,
        } => {
            let acl = ObjectCannedAcl::from(canned_acl.as_str());
            client.put_object_acl(&bucket, &key, acl).await?;
            println!("object ACL updated");
        }
    }
    Ok(())
}
