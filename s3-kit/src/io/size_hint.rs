/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

/// Bounds on the remaining length of a byte source.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct SizeHint {
    lower: u64,
    upper: Option<u64>,
}

impl SizeHint {
    /// Create a `SizeHint` with an exact known size.
    pub fn exact(size: u64) -> Self {
        Self {
            lower: size,
            upper: Some(size),
        }
    }

    /// The lower bound on the number of bytes remaining.
    pub fn lower(&self) -> u64 {
        self.lower
    }

    /// The upper bound on the number of bytes remaining, if known.
    pub fn upper(&self) -> Option<u64> {
        self.upper
    }

    /// Set the lower bound
    pub fn with_lower(mut self, lower: u64) -> Self {
        self.lower = lower;
        self
    }

    /// Set the upper bound
    pub fn with_upper(mut self, upper: Option<u64>) -> Self {
        self.upper = upper;
        self
    }
}
