//! Blake2b digests used by the ledger: 224-bit for scripts and keys, 256-bit for transactions.

use blake2::digest::consts::{U28, U32};
use blake2::{Blake2b, Digest};

pub const HASH_224_LEN: usize = 28;
pub const HASH_256_LEN: usize = 32;

type Blake2b224 = Blake2b<U28>;
type Blake2b256 = Blake2b<U32>;

/// Hash the concatenation of `parts`.
pub fn blake2b_224(parts: &[&[u8]]) -> [u8; HASH_224_LEN] {
    let mut hasher = Blake2b224::new();
    for part in parts {
        hasher.update(part);
    }
    hasher.finalize().into()
}

pub fn blake2b_256(parts: &[&[u8]]) -> [u8; HASH_256_LEN] {
    let mut hasher = Blake2b256::new();
    for part in parts {
        hasher.update(part);
    }
    hasher.finalize().into()
}
