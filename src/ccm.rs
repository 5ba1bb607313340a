//! AES-CCM authenticated encryption (NIST SP 800-38C).
//!
//! `ccm_encrypt`/`ccm_decrypt` compose the CTR-mode payload cipher with a
//! CBC-MAC computed over a specifically-formatted message (nonce, lengths,
//! AD, payload). The nonce length N (7..=13 bytes) fixes the counter/length
//! field width L = 15 - N for the life of the call.

use crate::aes128::Aes128;
use aead::Error;

/// Builds counter block CTR_j ([CCM] A.3): flags byte `L - 1`, the nonce,
/// then a big-endian `counter`, zero-padded on the left to fill the
/// remaining `l = 15 - nonce.len()` bytes.
fn counter_block(l: usize, nonce: &[u8], counter: u32) -> [u8; 16] {
    let mut block = [0u8; 16];
    block[0] = (l - 1) as u8;
    block[1..1 + nonce.len()].copy_from_slice(nonce);

    let counter_be = counter.to_be_bytes();
    let take = l.min(4);
    block[16 - take..16].copy_from_slice(&counter_be[4 - take..4]);
    block
}

/// The CTR sub-algorithm ([CCM] 6.1): used both to encrypt the payload and
/// to decrypt the ciphertext, and again (with counter 0) to derive the
/// keystream block that masks the raw tag.
fn ccm_ctr(cipher: &Aes128, l: usize, nonce: &[u8], input: &[u8], output: &mut [u8]) {
    let mut counter = 0u32;
    for (chunk_in, chunk_out) in input.chunks(16).zip(output.chunks_mut(16)) {
        counter += 1;
        let mut keystream = counter_block(l, nonce, counter);
        cipher.encrypt_block(&mut keystream);
        for (o, (i, s)) in chunk_out.iter_mut().zip(chunk_in.iter().zip(keystream.iter())) {
            *o = i ^ s;
        }
    }
}

/// CBC-MAC over the formatted B0 block, the length-prefixed and zero-padded
/// AD, and the zero-padded payload ([CCM] A.2). Returns the raw tag `T`,
/// still XORed with S0 to become `U`.
fn ccm_mac(cipher: &Aes128, tag_len: usize, l: usize, nonce: &[u8], ad: &[u8], payload: &[u8]) -> [u8; 16] {
    let mut b0 = [0u8; 16];
    b0[0] = (((!ad.is_empty()) as u8) << 6) | (((tag_len as u8 - 2) / 2) << 3) | (l as u8 - 1);
    b0[1..1 + nonce.len()].copy_from_slice(nonce);
    let payload_len_be = (payload.len() as u32).to_be_bytes();
    let take = l.min(4);
    b0[16 - take..16].copy_from_slice(&payload_len_be[4 - take..4]);

    let mut x = b0;
    cipher.encrypt_block(&mut x);

    if !ad.is_empty() {
        let mut idx;
        if ad.len() < 0xff00 {
            x[0] ^= (ad.len() >> 8) as u8;
            x[1] ^= ad.len() as u8;
            idx = 2;
        } else {
            x[0] ^= 0xff;
            x[1] ^= 0xfe;
            x[2] ^= (ad.len() >> 24) as u8;
            x[3] ^= (ad.len() >> 16) as u8;
            x[4] ^= (ad.len() >> 8) as u8;
            x[5] ^= ad.len() as u8;
            idx = 6;
        }
        for &byte in ad {
            x[idx] ^= byte;
            idx += 1;
            if idx == 16 {
                idx = 0;
                cipher.encrypt_block(&mut x);
            }
        }
        if idx != 0 {
            cipher.encrypt_block(&mut x);
        }
    }

    let mut idx = 0;
    for &byte in payload {
        x[idx] ^= byte;
        idx += 1;
        if idx == 16 {
            idx = 0;
            cipher.encrypt_block(&mut x);
        }
    }
    if idx != 0 {
        cipher.encrypt_block(&mut x);
    }

    let mut s0 = counter_block(l, nonce, 0);
    cipher.encrypt_block(&mut s0);
    for i in 0..16 {
        x[i] ^= s0[i];
    }
    x
}

fn ct_eq(a: &[u8], b: &[u8]) -> bool {
    use subtle::ConstantTimeEq;
    a.ct_eq(b).unwrap_u8() == 1
}

/// Encrypts `payload` under `key`/`nonce`, writing `payload.len() + tag_len`
/// bytes (ciphertext followed by the tag) into `output`.
///
/// `nonce.len()` must be in `7..=13` and `tag_len` must be one of
/// `{4, 6, 8, 10, 12, 14, 16}`; both are caller-controlled preconditions,
/// checked with `debug_assert!` rather than returned as errors.
pub fn ccm_encrypt(key: &[u8; 16], nonce: &[u8], ad: &[u8], payload: &[u8], tag_len: usize, output: &mut [u8]) {
    debug_assert!((7..=13).contains(&nonce.len()));
    debug_assert!(matches!(tag_len, 4 | 6 | 8 | 10 | 12 | 14 | 16));
    debug_assert_eq!(output.len(), payload.len() + tag_len);

    let l = 15 - nonce.len();
    let cipher = Aes128::new(key);
    let (ciphertext, tag_out) = output.split_at_mut(payload.len());
    ccm_ctr(&cipher, l, nonce, payload, ciphertext);
    let tag = ccm_mac(&cipher, tag_len, l, nonce, ad, payload);
    tag_out.copy_from_slice(&tag[..tag_len]);
}

/// Decrypts `ciphertext` (payload followed by its `tag_len`-byte tag),
/// writing the tentative payload into `payload_out` regardless of whether
/// authentication succeeds. Callers MUST discard `payload_out` on
/// `Err(Error)`.
pub fn ccm_decrypt(key: &[u8; 16], nonce: &[u8], ad: &[u8], ciphertext: &[u8], tag_len: usize, payload_out: &mut [u8]) -> Result<(), Error> {
    debug_assert!((7..=13).contains(&nonce.len()));
    debug_assert!(matches!(tag_len, 4 | 6 | 8 | 10 | 12 | 14 | 16));
    debug_assert_eq!(payload_out.len(), ciphertext.len() - tag_len);

    let l = 15 - nonce.len();
    let cipher = Aes128::new(key);
    let payload_len = ciphertext.len() - tag_len;
    let (ct, received_tag) = ciphertext.split_at(payload_len);

    ccm_ctr(&cipher, l, nonce, ct, payload_out);
    let tag = ccm_mac(&cipher, tag_len, l, nonce, ad, payload_out);

    if ct_eq(&tag[..tag_len], received_tag) {
        Ok(())
    } else {
        Err(Error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_with_empty_ad_and_payload() {
        let key = [0u8; 16];
        let nonce = [1u8; 13];
        let mut out = [0u8; 4];
        ccm_encrypt(&key, &nonce, &[], &[], 4, &mut out);
        let mut payload = [0u8; 0];
        assert!(ccm_decrypt(&key, &nonce, &[], &out, 4, &mut payload).is_ok());
    }

    #[test]
    fn flipping_a_tag_bit_fails_decryption() {
        let key = [7u8; 16];
        let nonce = [2u8; 10];
        let payload = b"hello ccm";
        let mut out = [0u8; 9 + 8];
        ccm_encrypt(&key, &nonce, b"ad", payload, 8, &mut out);
        out[payload.len()] ^= 1;
        let mut recovered = [0u8; 9];
        assert!(ccm_decrypt(&key, &nonce, b"ad", &out, 8, &mut recovered).is_err());
    }

    // Every documented tag length packs into the B0 flags byte as
    // `(tag_len - 2) / 2`; round-tripping at each one catches an off-by-one
    // bit in that encoding.
    #[test]
    fn round_trips_at_every_documented_tag_length() {
        let key = [5u8; 16];
        let nonce = [3u8; 12];
        let payload = b"zigbee frame payload";

        for tag_len in [4usize, 6, 8, 10, 12, 14, 16] {
            let mut out = vec![0u8; payload.len() + tag_len];
            ccm_encrypt(&key, &nonce, b"ad", payload, tag_len, &mut out);
            let mut recovered = vec![0u8; payload.len()];
            ccm_decrypt(&key, &nonce, b"ad", &out, tag_len, &mut recovered)
                .unwrap_or_else(|_| panic!("tag_len {} failed to verify", tag_len));
            assert_eq!(recovered, payload, "tag_len {}", tag_len);
        }
    }
}
