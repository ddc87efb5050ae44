//! Content fingerprints for files using BLAKE3

use crate::error::StorageError;
use blake3::Hasher;
use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

/// Chunk size for streaming full-file digests
pub const CHUNK_SIZE: usize = 16 * 1024;

/// Digest length in bytes
pub const FINGERPRINT_LEN: usize = 32;

/// Content fingerprint of a file (or of a bounded prefix of it)
///
/// Two files with equal fingerprints are treated as having the same content.
/// Rendered as 64 lowercase hex digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Fingerprint([u8; FINGERPRINT_LEN]);

impl Fingerprint {
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Fingerprint {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != FINGERPRINT_LEN * 2 {
            return Err(format!(
                "fingerprint must be {} hex digits, got {}",
                FINGERPRINT_LEN * 2,
                s.len()
            ));
        }
        let mut bytes = [0u8; FINGERPRINT_LEN];
        hex::decode_to_slice(s, &mut bytes).map_err(|e| format!("invalid fingerprint: {}", e))?;
        Ok(Self(bytes))
    }
}

/// Fingerprint a file on disk.
///
/// With `max_bytes > 0` only the first `max_bytes` bytes are digested, so two
/// files sharing that prefix get the same fingerprint. With `max_bytes == 0`
/// the whole file is streamed through the hasher in `CHUNK_SIZE` chunks.
pub fn fingerprint_file(path: &Path, max_bytes: u64) -> Result<Fingerprint, StorageError> {
    let file = File::open(path).map_err(|e| StorageError::io(path, e))?;
    let mut hasher = Hasher::new();

    if max_bytes > 0 {
        let mut prefix = Vec::new();
        file.take(max_bytes)
            .read_to_end(&mut prefix)
            .map_err(|e| StorageError::io(path, e))?;
        hasher.update(&prefix);
    } else {
        let mut reader = file;
        let mut buf = vec![0u8; CHUNK_SIZE];
        loop {
            let n = match reader.read(&mut buf) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(StorageError::io(path, e)),
            };
            hasher.update(&buf[..n]);
        }
    }

    Ok(Fingerprint(*hasher.finalize().as_bytes()))
}

/// Fingerprint in-memory content with the same digest as `fingerprint_file`
pub fn fingerprint_bytes(content: &[u8]) -> Fingerprint {
    let mut hasher = Hasher::new();
    hasher.update(content);
    Fingerprint(*hasher.finalize().as_bytes())
}
