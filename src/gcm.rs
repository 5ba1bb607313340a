//! AES-GCM authenticated encryption and GMAC (NIST SP 800-38D).

use crate::aes128::Aes128;
use crate::gf128::ghash;
use aead::Error;

/// GCTR ([GCM] 6.5): pre-counter `J0 = IV ‖ 0^31 ‖ 1`, then a 32-bit
/// big-endian counter incremented before each block is encrypted, so the
/// first data block uses counter value 2, `inc32(J0)`. `J0` itself is
/// reserved for masking the tag.
fn gctr(cipher: &Aes128, iv: &[u8; 12], input: &[u8], output: &mut [u8]) {
    let mut cb = [0u8; 16];
    cb[..12].copy_from_slice(iv);
    let mut counter = 1u32;

    for (chunk_in, chunk_out) in input.chunks(16).zip(output.chunks_mut(16)) {
        counter = counter.wrapping_add(1);
        cb[12..16].copy_from_slice(&counter.to_be_bytes());
        let mut keystream = cb;
        cipher.encrypt_block(&mut keystream);
        for (o, (i, s)) in chunk_out.iter_mut().zip(chunk_in.iter().zip(keystream.iter())) {
            *o = i ^ s;
        }
    }
}

/// Computes `T = MSBt(AES_K(J0) ^ GHASH_H(AAD, text))`, the authentication
/// tag shared by `gcm_tag`, `gcm_encrypt` (over the ciphertext) and
/// `gcm_decrypt` (over the received ciphertext, before decrypting it).
fn gcm_core(cipher: &Aes128, iv: &[u8; 12], aad: &[u8], text: &[u8]) -> [u8; 16] {
    let mut h = [0u8; 16];
    cipher.encrypt_block(&mut h);
    let s = ghash(&h, aad, text);

    let mut j0 = [0u8; 16];
    j0[..12].copy_from_slice(iv);
    j0[15] = 1;
    cipher.encrypt_block(&mut j0);

    let mut tag = [0u8; 16];
    for i in 0..16 {
        tag[i] = s[i] ^ j0[i];
    }
    tag
}

fn ct_eq(a: &[u8], b: &[u8]) -> bool {
    use subtle::ConstantTimeEq;
    a.ct_eq(b).unwrap_u8() == 1
}

/// GMAC: authenticates `aad` and `text` without encrypting anything,
/// writing up to 16 bytes of tag into `tag_out`.
pub fn gcm_tag(key: &[u8; 16], iv: &[u8; 12], aad: &[u8], text: &[u8], tag_out: &mut [u8]) {
    debug_assert!(tag_out.len() <= 16);
    let cipher = Aes128::new(key);
    let tag = gcm_core(&cipher, iv, aad, text);
    tag_out.copy_from_slice(&tag[..tag_out.len()]);
}

/// Encrypts `plaintext`, writing the ciphertext into `ciphertext_out` and
/// the full 16-byte tag into `tag_out`. Ciphertext is computed first, then
/// the tag is taken over it.
pub fn gcm_encrypt(key: &[u8; 16], iv: &[u8; 12], aad: &[u8], plaintext: &[u8], ciphertext_out: &mut [u8], tag_out: &mut [u8; 16]) {
    debug_assert_eq!(ciphertext_out.len(), plaintext.len());
    let cipher = Aes128::new(key);
    gctr(&cipher, iv, plaintext, ciphertext_out);
    *tag_out = gcm_core(&cipher, iv, aad, ciphertext_out);
}

/// Verifies `tag` over `ciphertext` before decrypting it into
/// `plaintext_out`; on `Err(Error)`, `plaintext_out` is left untouched.
pub fn gcm_decrypt(key: &[u8; 16], iv: &[u8; 12], aad: &[u8], ciphertext: &[u8], tag: &[u8], plaintext_out: &mut [u8]) -> Result<(), Error> {
    debug_assert_eq!(plaintext_out.len(), ciphertext.len());
    let cipher = Aes128::new(key);
    let expected = gcm_core(&cipher, iv, aad, ciphertext);

    if !ct_eq(&expected[..tag.len()], tag) {
        return Err(Error);
    }

    gctr(&cipher, iv, ciphertext, plaintext_out);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_empty_message() {
        let key = [0u8; 16];
        let iv = [0u8; 12];
        let mut ct = [0u8; 0];
        let mut tag = [0u8; 16];
        gcm_encrypt(&key, &iv, b"aad", &[], &mut ct, &mut tag);
        let mut pt = [0u8; 0];
        assert!(gcm_decrypt(&key, &iv, b"aad", &ct, &tag, &mut pt).is_ok());
    }

    #[test]
    fn flipping_a_ciphertext_bit_fails_decryption() {
        let key = [3u8; 16];
        let iv = [9u8; 12];
        let plaintext = b"attack at dawn!!";
        let mut ct = [0u8; 16];
        let mut tag = [0u8; 16];
        gcm_encrypt(&key, &iv, b"", plaintext, &mut ct, &mut tag);
        ct[0] ^= 0x01;
        let mut pt = [0u8; 16];
        assert!(gcm_decrypt(&key, &iv, b"", &ct, &tag, &mut pt).is_err());
    }
}
