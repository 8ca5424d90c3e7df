//! SHA-256 fingerprints for generated artifacts.
//!
//! Digests identify *what was run*: the geometry and the input script are
//! hashed after generation so a results document can be tied back to the
//! exact bytes that produced it. They are not checked against any trusted
//! value.

use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::{Result, WorkflowError};

/// Read size for streaming file digests.
const CHUNK_SIZE: usize = 8192;

/// Hex-encoded SHA-256 of a file's bytes.
///
/// The file is streamed in fixed-size chunks, so memory use does not grow
/// with the artifact. Only content matters; timestamps and permissions are
/// ignored.
pub fn sha256_file(path: &Path) -> Result<String> {
    let mut file = File::open(path).map_err(|e| WorkflowError::io(path, e))?;
    let mut hasher = Sha256::new();
    let mut buf = [0u8; CHUNK_SIZE];

    loop {
        let n = file.read(&mut buf).map_err(|e| WorkflowError::io(path, e))?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }

    Ok(hex::encode(hasher.finalize()))
}

/// Hex-encoded SHA-256 of a string's UTF-8 bytes.
pub fn sha256_str(text: &str) -> String {
    hex::encode(Sha256::digest(text.as_bytes()))
}
