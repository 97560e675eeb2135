//! PRF primitives: trapdoor and codeword derivation.
//!
//! Both layers use the same keyed PRF. The trapdoor layer runs it over the
//! keyword under each schedule key; the codeword layer runs it over the
//! document identifier, keyed by the corresponding trapdoor tag. A trapdoor
//! is therefore document-independent (the sole object a client transmits),
//! while codewords are unique per (keyword, document) pair, which prevents
//! cross-document correlation of filter positions.

use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::error::{Error, Result};
use crate::keys::KeySchedule;

pub const TAG_LEN: usize = 32;

pub type Tag = [u8; TAG_LEN];

/// Capability over the keyed PRF. The only runtime polymorphism the scheme
/// needs: production uses [`HmacSha256`], tests may substitute a
/// deterministic double.
pub trait Prf {
    fn derive(&self, key: &[u8], message: &[u8]) -> Tag;
}

/// HMAC-SHA-256 over the raw message bytes. 16-byte schedule keys are used
/// as-is, and a 32-byte trapdoor tag is a valid key for the codeword layer.
#[derive(Debug, Clone, Copy, Default)]
pub struct HmacSha256;

impl Prf for HmacSha256 {
    fn derive(&self, key: &[u8], message: &[u8]) -> Tag {
        let mut mac = <Hmac<Sha256> as Mac>::new_from_slice(key)
            .expect("HMAC-SHA-256 accepts keys of any length");
        mac.update(message);
        mac.finalize().into_bytes().into()
    }
}

/// Derives the trapdoor `T_w[i] = PRF(K[i], w)` in schedule order.
pub fn derive_trapdoor<P: Prf>(prf: &P, schedule: &KeySchedule, keyword: &str) -> Result<Vec<Tag>> {
    if keyword.is_empty() {
        return Err(Error::Precondition("keyword must not be empty".into()));
    }
    if schedule.hash_count() == 0 {
        return Err(Error::Precondition("key schedule holds no keys".into()));
    }
    Ok(schedule
        .keys()
        .iter()
        .map(|key| prf.derive(key, keyword.as_bytes()))
        .collect())
}

/// Derives the codewords `C[i] = PRF(T[i], id(d))` in trapdoor order.
pub fn derive_codewords<P: Prf>(prf: &P, trapdoor: &[Tag], doc_id: &str) -> Vec<Tag> {
    trapdoor
        .iter()
        .map(|tag| prf.derive(tag, doc_id.as_bytes()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::KeySchedule;

    fn fixed_schedule() -> KeySchedule {
        KeySchedule::from_keys((0u8..7).map(|i| [i; 16]).collect())
    }

    // RFC 4231 test case 1.
    #[test]
    fn hmac_sha256_matches_rfc4231() {
        let tag = HmacSha256.derive(&[0x0b; 20], b"Hi There");
        assert_eq!(
            hex::encode(tag),
            "b0344c61d8db38535ca8afceaf0bf12b881dc200c9833da726e9376c2e32cff7"
        );
    }

    #[test]
    fn trapdoor_is_deterministic_and_ordered() {
        let schedule = fixed_schedule();
        let a = derive_trapdoor(&HmacSha256, &schedule, "alice").unwrap();
        let b = derive_trapdoor(&HmacSha256, &schedule, "alice").unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), schedule.hash_count());
        for (tag, key) in a.iter().zip(schedule.keys()) {
            assert_eq!(*tag, HmacSha256.derive(key, b"alice"));
        }
    }

    #[test]
    fn distinct_keys_yield_distinct_trapdoors() {
        let a = KeySchedule::generate(0.01).unwrap();
        let b = KeySchedule::generate(0.01).unwrap();
        let ta = derive_trapdoor(&HmacSha256, &a, "alice").unwrap();
        let tb = derive_trapdoor(&HmacSha256, &b, "alice").unwrap();
        assert_ne!(ta[0], tb[0]);
    }

    #[test]
    fn codewords_differ_per_document() {
        let schedule = fixed_schedule();
        let trapdoor = derive_trapdoor(&HmacSha256, &schedule, "alice").unwrap();
        let for_a = derive_codewords(&HmacSha256, &trapdoor, "a.txt");
        let for_b = derive_codewords(&HmacSha256, &trapdoor, "b.txt");
        assert_ne!(for_a, for_b);
    }

    #[test]
    fn empty_inputs_are_rejected() {
        let schedule = fixed_schedule();
        assert!(matches!(
            derive_trapdoor(&HmacSha256, &schedule, ""),
            Err(Error::Precondition(_))
        ));
        let empty = KeySchedule::from_keys(Vec::new());
        assert!(matches!(
            derive_trapdoor(&HmacSha256, &empty, "alice"),
            Err(Error::Precondition(_))
        ));
    }

    /// A PRF double usable wherever the capability trait is accepted.
    struct XorPrf;

    impl Prf for XorPrf {
        fn derive(&self, key: &[u8], message: &[u8]) -> Tag {
            let mut tag = [0u8; TAG_LEN];
            for (i, byte) in tag.iter_mut().enumerate() {
                *byte = key[i % key.len()] ^ message[i % message.len()];
            }
            tag
        }
    }

    #[test]
    fn prf_is_swappable_for_testing() {
        let schedule = fixed_schedule();
        let trapdoor = derive_trapdoor(&XorPrf, &schedule, "alice").unwrap();
        assert_eq!(trapdoor.len(), 7);
        assert_eq!(trapdoor[1][0], 1 ^ b'a');
    }
}
