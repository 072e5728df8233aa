/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

/// Types for the chunked object upload operation
pub mod upload;

/// Bucket lifecycle operations
pub mod bucket;

/// Single-shot object operations
pub mod object;

/// Object tagging operations
pub mod tagging;

/// Object access control list operations
pub mod acl;
