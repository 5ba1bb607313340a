//! AES Matyas-Meyer-Oseas hash, as specified by the ZigBee specification
//! (05-3474-21 section B.6).
//!
//! Unlike every other construction in this crate, MMO re-keys AES on every
//! 16-byte block: the running hash state is the key for the next block's
//! compression step, so there is no amortized key schedule here.

use crate::aes128::Aes128;
use core::convert::TryInto;

/// H_j = E(H_{j-1}, M_j) xor M_j.
fn compress(state: &mut [u8; 16], block: &[u8; 16]) {
    let cipher = Aes128::new(state);
    let mut encrypted = *block;
    cipher.encrypt_block(&mut encrypted);
    for i in 0..16 {
        state[i] = encrypted[i] ^ block[i];
    }
}

/// Hashes `message` into `digest_out`.
///
/// Whether the final length field occupies bytes 14..16 ("short", for
/// messages under 8192 bytes) or bytes 10..14 ("long") is decided by the
/// original message length, not by how many padded blocks that produces.
pub fn mmo(message: &[u8], digest_out: &mut [u8; 16]) {
    let mut state = [0u8; 16];

    let mut chunks = message.chunks_exact(16);
    for block in &mut chunks {
        compress(&mut state, block.try_into().unwrap());
    }
    let tail = chunks.remainder();

    let mut p = [0u8; 16];
    p[..tail.len()].copy_from_slice(tail);
    let mut r = tail.len();
    p[r] = 0x80;
    r += 1;

    let short = message.len() < 8192;
    let overflowed = (short && r > 14) || (!short && r > 10);
    if overflowed {
        for b in p.iter_mut().skip(r) {
            *b = 0;
        }
        compress(&mut state, &p);
        p = [0u8; 16];
        r = 0;
    }

    let length = message.len() as u32;
    if short {
        for b in p[r..14].iter_mut() {
            *b = 0;
        }
        p[14] = (length >> 5) as u8;
        p[15] = (length << 3) as u8;
    } else {
        for b in p[r..10].iter_mut() {
            *b = 0;
        }
        p[10] = (length >> 21) as u8;
        p[11] = (length >> 13) as u8;
        p[12] = (length >> 5) as u8;
        p[13] = (length << 3) as u8;
        p[14] = 0;
        p[15] = 0;
    }
    compress(&mut state, &p);

    *digest_out = state;
}
