//! Content hashing utilities using blake3.
//!
//! # Usage
//!
//! ```ignore
//! use crate::utils::hash;
//!
//! let h = hash::compute("some content"); // -> [u8; 32]
//! let fp = hash::fingerprint("some content"); // -> "a1b2c3d4"
//! ```

/// Compute the 32-byte blake3 digest of byte data.
#[inline]
pub fn compute<T: AsRef<[u8]> + ?Sized>(data: &T) -> [u8; 32] {
    *blake3::hash(data.as_ref()).as_bytes()
}

/// Compute hash and return as 8-char hex fingerprint.
#[inline]
pub fn fingerprint<T: AsRef<[u8]> + ?Sized>(value: &T) -> String {
    short_hex(value, 8)
}

/// Hex prefix of the digest with the requested length (max 64).
pub fn short_hex<T: AsRef<[u8]> + ?Sized>(value: &T, len: usize) -> String {
    let mut encoded = hex::encode(compute(value));
    encoded.truncate(len.min(64));
    encoded
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fingerprint_is_stable() {
        assert_eq!(fingerprint("hello"), fingerprint("hello"));
        assert_ne!(fingerprint("hello"), fingerprint("hello!"));
        assert_eq!(fingerprint("hello").len(), 8);
    }

    #[test]
    fn test_short_hex_clamps() {
        assert_eq!(short_hex("x", 9).len(), 9);
        assert_eq!(short_hex("x", 100).len(), 64);
    }
}
