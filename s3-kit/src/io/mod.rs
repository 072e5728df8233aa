/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

/// Error types related to I/O abstractions
pub mod error;

pub(crate) mod part_reader;
mod path_body;
mod size_hint;
mod source;

// re-exports
pub use self::path_body::PathBodyBuilder;
pub use self::size_hint::SizeHint;
pub use self::source::ByteSource;
pub use self::source::Part;
pub use self::source::PartStream;
pub use self::source::StreamContext;

/// Non-contiguous binary data as collected off the wire.
pub use aws_smithy_types::byte_stream::AggregatedBytes;
