//! Thin wrapper around the external AES-128 primitive.
//!
//! Everything above this module treats `Aes128` as an opaque single-block
//! encryptor keyed once per call (CCM, GCM, KW) or re-keyed per block (MMO).
//! The real key schedule and round function live in the `aes` crate; this
//! module only adapts its `GenericArray`-typed trait methods to the plain
//! `[u8; 16]` blocks the rest of the crate works with, and keeps a local
//! temporary around for call sites that need to encrypt a block in place.

use aead::generic_array::GenericArray;
use aes::block_cipher_trait::BlockCipher;
use aes::Aes128 as Aes128Impl;

pub(crate) struct Aes128 {
    inner: Aes128Impl,
}

impl Aes128 {
    /// Expands the key schedule once. Callers that encrypt many blocks
    /// under the same key (CCM, GCM, KW) construct this once per
    /// operation; MMO constructs a fresh one per 16-byte block, since its
    /// key *is* the running hash state.
    pub(crate) fn new(key: &[u8; 16]) -> Self {
        Self {
            inner: Aes128Impl::new(GenericArray::from_slice(key)),
        }
    }

    /// Encrypts `block` in place via a temporary `GenericArray`.
    pub(crate) fn encrypt_block(&self, block: &mut [u8; 16]) {
        let mut tmp = GenericArray::clone_from_slice(block);
        self.inner.encrypt_block(&mut tmp);
        block.copy_from_slice(tmp.as_slice());
    }
}
