//! SHA-1 (FIPS 180-4).
//!
//! The message schedule lives in a 16-word ring buffer indexed by `t & 15`
//! rather than the full 80-word expansion, with each round rewriting its own
//! slot with the rotated XOR recurrence before consuming it.

use core::convert::TryInto;

const H0: [u32; 5] = [0x67452301, 0xefcdab89, 0x98badcfe, 0x10325476, 0xc3d2e1f0];

fn compress(h: &mut [u32; 5], block: &[u8; 64]) {
    let mut w = [0u32; 16];
    for (t, word) in w.iter_mut().enumerate() {
        *word = u32::from_be_bytes(block[t * 4..t * 4 + 4].try_into().unwrap());
    }

    let (mut a, mut b, mut c, mut d, mut e) = (h[0], h[1], h[2], h[3], h[4]);

    for t in 0..80usize {
        let wt = w[t & 15];
        let wtr = w[t.wrapping_sub(3) & 15] ^ w[t.wrapping_sub(8) & 15] ^ w[t.wrapping_sub(14) & 15] ^ wt;
        w[t & 15] = wtr.rotate_left(1);

        let (f, k) = match t {
            0..=19 => ((b & c) ^ (!b & d), 0x5a827999u32),
            20..=39 => (b ^ c ^ d, 0x6ed9eba1),
            40..=59 => ((b & c) ^ (b & d) ^ (c & d), 0x8f1bbcdc),
            _ => (b ^ c ^ d, 0xca62c1d6),
        };
        let tmp = a
            .rotate_left(5)
            .wrapping_add(f)
            .wrapping_add(e)
            .wrapping_add(k)
            .wrapping_add(wt);

        e = d;
        d = c;
        c = b.rotate_left(30);
        b = a;
        a = tmp;
    }

    h[0] = h[0].wrapping_add(a);
    h[1] = h[1].wrapping_add(b);
    h[2] = h[2].wrapping_add(c);
    h[3] = h[3].wrapping_add(d);
    h[4] = h[4].wrapping_add(e);
}

/// Digests `message` into a 20-byte SHA-1 output.
///
/// The bit-length field is carried as a full 64-bit big-endian value; for
/// any message under 2^29 bytes its high bytes are zero regardless, so this
/// is bit-identical to a narrower 32-bit length field.
pub fn sha1(message: &[u8], digest_out: &mut [u8; 20]) {
    let mut h = H0;
    let bit_len = (message.len() as u64) * 8;

    let mut chunks = message.chunks_exact(64);
    for block in &mut chunks {
        compress(&mut h, block.try_into().unwrap());
    }
    let tail = chunks.remainder();

    let mut last = [0u8; 128];
    last[..tail.len()].copy_from_slice(tail);
    last[tail.len()] = 0x80;
    let total_len = if tail.len() + 1 <= 56 { 64 } else { 128 };
    last[total_len - 8..total_len].copy_from_slice(&bit_len.to_be_bytes());

    for block in last[..total_len].chunks_exact(64) {
        compress(&mut h, block.try_into().unwrap());
    }

    for (i, word) in h.iter().enumerate() {
        digest_out[i * 4..i * 4 + 4].copy_from_slice(&word.to_be_bytes());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn abc() {
        let mut digest = [0u8; 20];
        sha1(b"abc", &mut digest);
        assert_eq!(
            digest,
            [
                0xa9, 0x99, 0x3e, 0x36, 0x47, 0x06, 0x81, 0x6a, 0xba, 0x3e, 0x25, 0x71, 0x78, 0x50, 0xc2, 0x6c, 0x9c,
                0xd0, 0xd8, 0x9d
            ]
        );
    }

    #[test]
    fn two_block_message() {
        let msg = b"abcdbcdecdefdefgefghfghighijhijkijkljklmklmnlmnomnopnopq";
        let mut digest = [0u8; 20];
        sha1(msg, &mut digest);
        assert_eq!(
            digest,
            [
                0x84, 0x98, 0x3e, 0x44, 0x1c, 0x3b, 0xd2, 0x6e, 0xba, 0xae, 0x4a, 0xa1, 0xf9, 0x51, 0x29, 0xe5, 0xe5,
                0x46, 0x70, 0xf1
            ]
        );
    }

    #[test]
    fn empty_message_is_deterministic_and_length_sensitive() {
        let mut empty_digest = [0u8; 20];
        sha1(b"", &mut empty_digest);
        let mut single_byte_digest = [0u8; 20];
        sha1(b"\0", &mut single_byte_digest);
        assert_ne!(empty_digest, single_byte_digest);
    }
}
