// SPDX-License-Identifier: Apache-2.0

//! Flat-buffer and byte-payload interop for [`Mat4x3`].
//!
//! Slice functions address the buffer absolutely (offset indexing, no cursor
//! to advance or restore), so a caller's buffer position is never mutated.
//! The byte codec produces the canonical little-endian payload used to move
//! matrices across process or wire boundaries.

use bytes::Bytes;
use thiserror::Error;

use crate::mat4x3::Mat4x3;

/// Number of scalars in a [`Mat4x3`].
pub const MAT4X3_SCALARS: usize = 12;

/// Byte length of the canonical [`encode`] payload.
pub const MAT4X3_PAYLOAD_BYTES: usize = MAT4X3_SCALARS * 8;

/// Raised when a slice cannot hold twelve scalars at the requested offset.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("buffer of length {len} cannot hold a 12-scalar matrix at offset {offset}")]
pub struct BufferError {
    /// Offset the caller asked for.
    pub offset: usize,
    /// Length of the buffer the caller supplied.
    pub len: usize,
}

fn check(len: usize, offset: usize) -> Result<(), BufferError> {
    match offset.checked_add(MAT4X3_SCALARS) {
        Some(end) if end <= len => Ok(()),
        _ => Err(BufferError { offset, len }),
    }
}

/// Writes the matrix into `dst` at `offset`, column-major.
pub fn store(mat: &Mat4x3, dst: &mut [f64], offset: usize) -> Result<(), BufferError> {
    check(dst.len(), offset)?;
    dst[offset..offset + MAT4X3_SCALARS].copy_from_slice(&mat.to_array());
    Ok(())
}

/// Writes the matrix into `dst` at `offset` in transposed (row-major)
/// layout: three rows of `[x, y, z, translation]`.
pub fn store_transposed(mat: &Mat4x3, dst: &mut [f64], offset: usize) -> Result<(), BufferError> {
    check(dst.len(), offset)?;
    let m = mat.to_array();
    dst[offset..offset + MAT4X3_SCALARS].copy_from_slice(&[
        m[0], m[3], m[6], m[9], // row 0
        m[1], m[4], m[7], m[10], // row 1
        m[2], m[5], m[8], m[11], // row 2
    ]);
    Ok(())
}

/// Writes the matrix into `dst` at `offset`, column-major, narrowed to
/// single precision.
#[allow(clippy::cast_possible_truncation)]
pub fn store_f32(mat: &Mat4x3, dst: &mut [f32], offset: usize) -> Result<(), BufferError> {
    check(dst.len(), offset)?;
    for (slot, value) in dst[offset..offset + MAT4X3_SCALARS]
        .iter_mut()
        .zip(mat.to_array())
    {
        *slot = value as f32;
    }
    Ok(())
}

/// Reads a matrix from `src` at `offset` (column-major), computing its
/// property flags by full inspection of the loaded values.
pub fn load(src: &[f64], offset: usize) -> Result<Mat4x3, BufferError> {
    check(src.len(), offset)?;
    let mut data = [0.0; MAT4X3_SCALARS];
    data.copy_from_slice(&src[offset..offset + MAT4X3_SCALARS]);
    Ok(Mat4x3::from(data))
}

/// Serialises a matrix into the canonical payload: twelve column-major
/// scalars as little-endian `f64` bytes, always 96 bytes.
pub fn encode(mat: &Mat4x3) -> Bytes {
    let mut buf = Vec::with_capacity(MAT4X3_PAYLOAD_BYTES);
    for value in mat.to_array() {
        buf.extend_from_slice(&value.to_le_bytes());
    }
    Bytes::from(buf)
}

/// Deserialises a canonical payload back into a matrix.
///
/// Returns `None` for any length other than 96 bytes. Property flags are
/// recomputed by inspection, never trusted from the wire.
pub fn decode(bytes: &Bytes) -> Option<Mat4x3> {
    if bytes.len() != MAT4X3_PAYLOAD_BYTES {
        return None;
    }
    let mut data = [0f64; MAT4X3_SCALARS];
    for (slot, chunk) in data.iter_mut().zip(bytes.chunks_exact(8)) {
        *slot = f64::from_le_bytes(chunk.try_into().ok()?);
    }
    Some(Mat4x3::from(data))
}
