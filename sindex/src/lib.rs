//! Secure index (SSE) core primitives
//!
//! This crate implements the cryptographic core of Goh's secure-index
//! construction (eprint 2003/216):
//! - `keys`: per-collection hash-key schedule derivation
//! - `prf`: the keyed pseudorandom function plus trapdoor and codeword layers
//! - `bloom`: the per-document Bloom filter the codewords are tested against
//! - `index`: index building with IND-CKA blinding
//! - `codec`: the on-disk format for filters and key material
//! - `filecrypt`: optional AES-256-GCM bulk document encryption

pub mod bloom;
pub mod codec;
pub mod error;
pub mod filecrypt;
pub mod index;
pub mod keys;
pub mod prf;

pub use error::{Error, Result};
