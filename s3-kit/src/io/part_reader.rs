/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::cmp;
use std::path::Path;
use std::sync::Mutex;

use bytes::{Buf, Bytes, BytesMut};

use crate::io::error::Error;
use crate::io::path_body::PathBody;
use crate::io::source::{BoxStream, ByteSource, Part, RawByteSource, StreamContext};

/// Builder for creating a `PartReader`
#[derive(Debug)]
pub(crate) struct Builder {
    source: Option<RawByteSource>,
    part_size: usize,
}

impl Builder {
    pub(crate) fn new() -> Self {
        Self {
            source: None,
            part_size: 5 * crate::MEBIBYTE as usize,
        }
    }

    /// Set the byte source to read from.
    pub(crate) fn source(mut self, source: ByteSource) -> Self {
        self.source = Some(source.inner);
        self
    }

    /// Set the target part size that should be used when reading data.
    ///
    /// All parts except for possibly the last one will be of this size.
    pub(crate) fn part_size(mut self, part_size: usize) -> Self {
        self.part_size = part_size;
        self
    }

    pub(crate) fn build(self) -> PartReader {
        let source = self.source.expect("byte source set");
        PartReader::new(source, self.part_size)
    }
}

/// Cursor over the unclaimed remainder of a byte source.
#[derive(Debug)]
struct Cursor {
    offset: u64,
    next_part_number: u64,
    remaining: u64,
}

/// A claim on one part: where it starts, its sequence number, and its length.
#[derive(Debug, Clone, Copy)]
struct Claim {
    offset: u64,
    part_number: u64,
    len: usize,
}

/// Splits a byte source into an ordered sequence of fixed-size parts.
///
/// The reader is shared by all transfer workers. Buffer and file sources hand
/// out claims from a mutex-guarded cursor, so each `next_part` call produces a
/// fully independent, already-buffered part; workers never contend on a
/// sequential read position while a transfer is in flight.
#[derive(Debug)]
pub(crate) struct PartReader {
    source: Source,
    stream_cx: StreamContext,
}

#[derive(Debug)]
enum Source {
    Buf {
        data: Bytes,
        cursor: Mutex<Cursor>, // std Mutex, never held across await
    },
    File {
        body: PathBody,
        cursor: Mutex<Cursor>,
    },
    /// Caller-provided streams produce parts themselves; the reader only
    /// serializes access to the stream.
    Stream(tokio::sync::Mutex<BoxStream>),
}

impl PartReader {
    fn new(raw: RawByteSource, part_size: usize) -> Self {
        let source = match raw {
            RawByteSource::Buf(data) => {
                let len = data.remaining() as u64;
                Source::Buf {
                    data,
                    cursor: Mutex::new(Cursor {
                        offset: 0,
                        next_part_number: 1,
                        remaining: len,
                    }),
                }
            }
            RawByteSource::Fs(body) => {
                let cursor = Mutex::new(Cursor {
                    offset: body.offset,
                    next_part_number: 1,
                    remaining: body.length,
                });
                Source::File { body, cursor }
            }
            RawByteSource::Dyn(stream) => Source::Stream(tokio::sync::Mutex::new(stream)),
        };

        Self {
            source,
            stream_cx: StreamContext { part_size },
        }
    }

    /// Pull the next part, or `None` once the source is exhausted.
    pub(crate) async fn next_part(&self) -> Result<Option<Part>, Error> {
        let part_size = self.stream_cx.part_size();
        match &self.source {
            Source::Buf { data, cursor } => {
                let claim = match claim_next(cursor, part_size)? {
                    Some(claim) => claim,
                    None => return Ok(None),
                };
                let start = claim.offset as usize;
                let chunk = data.slice(start..start + claim.len);
                Ok(Some(Part::new(claim.part_number, chunk)))
            }
            Source::File { body, cursor } => {
                let claim = match claim_next(cursor, part_size)? {
                    Some(claim) => claim,
                    None => return Ok(None),
                };
                let path = body.path.clone();
                let chunk = tokio::task::spawn_blocking(move || {
                    read_chunk_at(&path, claim.offset, claim.len)
                })
                .await??;
                Ok(Some(Part::new(claim.part_number, chunk)))
            }
            Source::Stream(stream) => {
                let mut stream = stream.lock().await;
                match stream.next(&self.stream_cx).await {
                    Some(part) => part.map(Some).map_err(Error::from),
                    None => Ok(None),
                }
            }
        }
    }
}

/// Advance the cursor by up to `part_size` bytes and return the claimed range,
/// or `None` once the source is exhausted.
fn claim_next(cursor: &Mutex<Cursor>, part_size: usize) -> Result<Option<Claim>, Error> {
    let mut cursor = cursor.lock().map_err(|err| Error::other(err.to_string()))?;
    if cursor.remaining == 0 {
        return Ok(None);
    }

    let len = cmp::min(part_size as u64, cursor.remaining);
    let claim = Claim {
        offset: cursor.offset,
        part_number: cursor.next_part_number,
        len: len as usize,
    };
    cursor.offset += len;
    cursor.remaining -= len;
    cursor.next_part_number += 1;
    Ok(Some(claim))
}

/// Positioned read of `len` bytes at `offset`; independent of any other
/// reader's file position.
#[cfg(unix)]
fn read_chunk_at(path: &Path, offset: u64, len: usize) -> std::io::Result<Bytes> {
    use std::os::unix::fs::FileExt;

    let file = std::fs::File::open(path)?;
    let mut dst = BytesMut::zeroed(len);
    file.read_exact_at(&mut dst, offset)?;
    Ok(dst.freeze())
}

#[cfg(windows)]
fn read_chunk_at(path: &Path, offset: u64, len: usize) -> std::io::Result<Bytes> {
    use std::io::{Read, Seek, SeekFrom};

    let mut file = std::fs::File::open(path)?;
    file.seek(SeekFrom::Start(offset))?;
    let mut dst = BytesMut::zeroed(len);
    file.read_exact(&mut dst)?;
    Ok(dst.freeze())
}
