// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Binary encoding primitives and the on-disk file envelope.
//!
//! Nothing fancy here, just the classics done right. Varint for integers that
//! are usually small. Delta encoding for doc ids because posting lists are
//! sorted and the gaps are small. Length-prefixed strings for terms and
//! document numbers.
//!
//! Every binary artifact in the index directory is wrapped in the same
//! envelope: 4 magic bytes, a format version byte, the payload, and a CRC32
//! footer over everything before it. The CRC catches truncation and bit rot
//! before a decoder can misread half a posting list into the scorer.
//!
//! # References
//!
//! - **Varint (LEB128)**: Little-endian base-128 variable-length integer
//!   encoding, popularized by Protocol Buffers.
//!   See: <https://protobuf.dev/programming-guides/encoding/>
//! - **Delta encoding for postings**: Zobel & Moffat (2006): "Inverted Files
//!   for Text Search Engines", ACM Computing Surveys.

use std::fs;
use std::io;
use std::path::Path;

use crate::error::{Error, Result};

/// Magic bytes identifying a quarry binary artifact.
pub const MAGIC: [u8; 4] = *b"QRYX";

/// Current envelope format version.
pub const VERSION: u8 = 1;

/// Varints longer than this are malformed (10 bytes covers a full u64).
const MAX_VARINT_BYTES: usize = 10;

/// CRC32 footer size in bytes.
const FOOTER_SIZE: usize = 4;

// ============================================================================
// VARINT ENCODING
// ============================================================================

/// Encode a varint to bytes: low 7 bits per byte, continuation bit on every
/// byte except the last.
pub fn encode_varint(mut value: u64, buf: &mut Vec<u8>) {
    while value >= 0x80 {
        buf.push((value as u8 & 0x7F) | 0x80);
        value >>= 7;
    }
    buf.push(value as u8);
}

/// Decode a varint from bytes, returning (value, bytes_consumed)
///
/// Fails when no terminating byte appears within `MAX_VARINT_BYTES` (a
/// sequence that long cannot come from `encode_varint`) or when the input
/// runs out first, which covers the empty slice.
pub fn decode_varint(bytes: &[u8]) -> io::Result<(u64, usize)> {
    let mut value: u64 = 0;
    for (i, &byte) in bytes.iter().take(MAX_VARINT_BYTES).enumerate() {
        value |= u64::from(byte & 0x7F) << (7 * i);
        if byte & 0x80 == 0 {
            return Ok((value, i + 1));
        }
    }

    if bytes.len() >= MAX_VARINT_BYTES {
        Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("varint longer than {} bytes", MAX_VARINT_BYTES),
        ))
    } else {
        Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            "varint ends before its final byte",
        ))
    }
}

// ============================================================================
// STRING AND FLOAT ENCODING
// ============================================================================

/// Encode a length-prefixed UTF-8 string.
pub fn encode_string(s: &str, buf: &mut Vec<u8>) {
    let bytes = s.as_bytes();
    encode_varint(bytes.len() as u64, buf);
    buf.extend_from_slice(bytes);
}

/// Decode a length-prefixed UTF-8 string, returning (string, bytes_consumed).
pub fn decode_string(bytes: &[u8]) -> io::Result<(String, usize)> {
    let (len, mut pos) = decode_varint(bytes)?;
    let len = len as usize;

    let end = pos.checked_add(len).ok_or_else(|| {
        io::Error::new(io::ErrorKind::InvalidData, "String length causes overflow")
    })?;
    if end > bytes.len() {
        return Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            format!("Truncated string (expected {} bytes)", len),
        ));
    }

    let s = String::from_utf8(bytes[pos..end].to_vec())
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, format!("Invalid UTF-8: {}", e)))?;
    pos = end;
    Ok((s, pos))
}

/// Encode an f64 as its 8-byte little-endian bit pattern.
pub fn encode_f64(value: f64, buf: &mut Vec<u8>) {
    buf.extend_from_slice(&value.to_le_bytes());
}

/// Decode an f64, returning (value, bytes_consumed).
pub fn decode_f64(bytes: &[u8]) -> io::Result<(f64, usize)> {
    if bytes.len() < 8 {
        return Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            "Truncated f64",
        ));
    }
    let mut raw = [0u8; 8];
    raw.copy_from_slice(&bytes[..8]);
    Ok((f64::from_le_bytes(raw), 8))
}

// ============================================================================
// POSTING LIST ENCODING
// ============================================================================

/// Encode a doc-id-sorted posting list with delta+varint doc ids.
///
/// Format: count, then per posting the doc-id delta from its predecessor
/// (the first doc id is stored raw) and the term frequency.
pub fn encode_dense_postings(postings: &[(u32, u32)], buf: &mut Vec<u8>) {
    encode_varint(postings.len() as u64, buf);

    let mut prev = 0u32;
    for &(docid, tf) in postings {
        encode_varint((docid - prev) as u64, buf);
        encode_varint(tf as u64, buf);
        prev = docid;
    }
}

/// Decode a delta+varint posting list, returning (postings, bytes_consumed).
pub fn decode_dense_postings(bytes: &[u8]) -> io::Result<(Vec<(u32, u32)>, usize)> {
    let (count, mut pos) = decode_varint(bytes)?;
    let count = count as usize;

    // A posting needs at least two bytes, so count cannot exceed what is left.
    if count > bytes.len().saturating_sub(pos) {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("Posting count {} exceeds available bytes", count),
        ));
    }

    let mut postings = Vec::with_capacity(count);
    let mut docid = 0u32;
    for _ in 0..count {
        let (delta, consumed) = decode_varint(&bytes[pos..])?;
        pos += consumed;
        let (tf, consumed) = decode_varint(&bytes[pos..])?;
        pos += consumed;

        docid += delta as u32;
        postings.push((docid, tf as u32));
    }

    Ok((postings, pos))
}

/// Encode a posting list keyed by document number strings.
pub fn encode_docno_postings(postings: &[(String, u32)], buf: &mut Vec<u8>) {
    encode_varint(postings.len() as u64, buf);
    for (docno, tf) in postings {
        encode_string(docno, buf);
        encode_varint(*tf as u64, buf);
    }
}

/// Decode a docno-keyed posting list, returning (postings, bytes_consumed).
pub fn decode_docno_postings(bytes: &[u8]) -> io::Result<(Vec<(String, u32)>, usize)> {
    let (count, mut pos) = decode_varint(bytes)?;
    let count = count as usize;

    if count > bytes.len().saturating_sub(pos) {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("Posting count {} exceeds available bytes", count),
        ));
    }

    let mut postings = Vec::with_capacity(count);
    for _ in 0..count {
        let (docno, consumed) = decode_string(&bytes[pos..])?;
        pos += consumed;
        let (tf, consumed) = decode_varint(&bytes[pos..])?;
        pos += consumed;
        postings.push((docno, tf as u32));
    }

    Ok((postings, pos))
}

// ============================================================================
// FILE ENVELOPE
// ============================================================================

/// Write `payload` to `path` wrapped in the magic/version/CRC32 envelope.
pub fn write_envelope(path: &Path, payload: &[u8]) -> Result<()> {
    let mut bytes = Vec::with_capacity(MAGIC.len() + 1 + payload.len() + FOOTER_SIZE);
    bytes.extend_from_slice(&MAGIC);
    bytes.push(VERSION);
    bytes.extend_from_slice(payload);

    let crc = crc32fast::hash(&bytes);
    bytes.extend_from_slice(&crc.to_le_bytes());

    fs::write(path, &bytes).map_err(|e| Error::io(path, e))
}

/// Read `path`, validate the envelope, and return the payload.
pub fn read_envelope(path: &Path) -> Result<Vec<u8>> {
    let bytes = fs::read(path).map_err(|e| Error::io(path, e))?;

    let min_size = MAGIC.len() + 1 + FOOTER_SIZE;
    if bytes.len() < min_size {
        return Err(Error::corrupt(
            path,
            format!(
                "file too small ({} bytes, minimum {})",
                bytes.len(),
                min_size
            ),
        ));
    }

    if bytes[..4] != MAGIC {
        return Err(Error::corrupt(path, "bad magic bytes"));
    }
    let version = bytes[4];
    if version != VERSION {
        return Err(Error::corrupt(
            path,
            format!(
                "unsupported format version {} (current: {})",
                version, VERSION
            ),
        ));
    }

    let content_len = bytes.len() - FOOTER_SIZE;
    let mut stored = [0u8; 4];
    stored.copy_from_slice(&bytes[content_len..]);
    let stored = u32::from_le_bytes(stored);
    let computed = crc32fast::hash(&bytes[..content_len]);
    if stored != computed {
        return Err(Error::corrupt(
            path,
            format!(
                "CRC32 mismatch (stored {:08x}, computed {:08x})",
                stored, computed
            ),
        ));
    }

    Ok(bytes[MAGIC.len() + 1..content_len].to_vec())
}

/// Convert a codec-layer error into a crate error naming the file.
pub fn codec_error(path: &Path, source: io::Error) -> Error {
    Error::corrupt(path, source.to_string())
}
