//! Compact, `no_std`, allocation-free cryptographic primitives for
//! resource-constrained stacks (e.g. ZigBee): AES-CCM and AES-GCM/GMAC
//! authenticated encryption, AES Key Wrap ([RFC 3394][1]), the AES-MMO hash,
//! SHA-1, SHA-256, and a [RFC 4648][2] Base64 encoder, all built on a single
//! external AES-128 block-cipher primitive.
//!
//! [1]: https://tools.ietf.org/html/rfc3394
//! [2]: https://tools.ietf.org/html/rfc4648
//!
//! Every operation here is a free function over caller-supplied buffers;
//! nothing in this crate allocates. The only fallible operations are
//! [`ccm_decrypt`] and [`gcm_decrypt`], which fail closed on authentication
//! failure and otherwise trust their caller's buffer sizes, nonce lengths
//! and tag lengths; misuse of those is a programmer error, not a recoverable
//! one (see each module for its exact preconditions).

#![cfg_attr(not(test), no_std)]

mod aes128;
mod base64;
mod ccm;
mod gcm;
mod gf128;
mod kw;
mod mmo;
mod sha1;
mod sha256;

pub use aead::Error;
pub use base64::base64_encode;
pub use ccm::{ccm_decrypt, ccm_encrypt};
pub use gcm::{gcm_decrypt, gcm_encrypt, gcm_tag};
pub use kw::kw;
pub use mmo::mmo;
pub use sha1::sha1;
pub use sha256::sha256;
