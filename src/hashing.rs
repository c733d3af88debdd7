//! Huellas SHA-256 para identificar entradas en los reportes.

use sha2::{Digest, Sha256};

/// Hash SHA-256 en hexadecimal de los bytes dados.
pub fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}
