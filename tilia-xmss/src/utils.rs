//! Byte and digit helpers shared by the XMSS building blocks.

#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

/// Write `x` big-endian into `out`, left-padded with zeros.
///
/// RFC 8391 toByte(x, y). Lengths above 8 bytes only ever add padding;
/// shorter outputs keep the low-order bytes.
pub fn to_byte(x: u64, out: &mut [u8]) {
    out.fill(0);
    let mut val = x;
    for byte in out.iter_mut().rev() {
        *byte = (val & 0xFF) as u8;
        val >>= 8;
        if val == 0 {
            break;
        }
    }
}

/// Read a big-endian integer of at most 8 bytes.
#[must_use]
pub fn to_int(x: &[u8]) -> u64 {
    debug_assert!(x.len() <= 8);
    x.iter().fold(0u64, |acc, &b| (acc << 8) | u64::from(b))
}

/// XOR `mask` into `dst` element-wise.
pub fn xor_into(dst: &mut [u8], mask: &[u8]) {
    debug_assert_eq!(dst.len(), mask.len());
    for (d, m) in dst.iter_mut().zip(mask) {
        *d ^= m;
    }
}

/// Split `x` into `out_len` base-w digits, most significant bits first.
///
/// RFC 8391 base_w. `log_w` must divide 8.
#[must_use]
pub fn base_w(x: &[u8], log_w: u32, out_len: usize) -> Vec<u32> {
    debug_assert!(matches!(log_w, 1 | 2 | 4 | 8));

    let mask = (1u32 << log_w) - 1;
    let mut result = Vec::with_capacity(out_len);
    let mut bits: u32 = 0;
    let mut total: u32 = 0;
    let mut input = x.iter();

    for _ in 0..out_len {
        if bits == 0 {
            total = input.next().map_or(0, |&b| u32::from(b));
            bits = 8;
        }
        bits -= log_w;
        result.push((total >> bits) & mask);
    }
    result
}

/// WOTS+ checksum `sum(w - 1 - d)` over the message digits.
#[must_use]
pub fn checksum(digits: &[u32], w: u32) -> u32 {
    digits.iter().map(|&d| w - 1 - d).sum()
}
