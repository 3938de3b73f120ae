//! BLAKE3 helpers for content-addressed keys.

/// Full 256-bit digest of a document; key of the embedding cache.
#[inline]
pub fn hash_document(text: &str) -> [u8; 32] {
    *blake3::hash(text.as_bytes()).as_bytes()
}

/// First 64 bits of the BLAKE3 digest of `data`.
///
/// Only used for bucketing (collisions merge buckets, nothing more).
#[inline]
pub fn hash_to_u64(data: &[u8]) -> u64 {
    let hash = blake3::hash(data);
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&hash.as_bytes()[..8]);
    u64::from_le_bytes(bytes)
}
