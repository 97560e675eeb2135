//! Secure-index construction and the server-side membership test.
//!
//! The build path sizes a filter for the document's unique keywords, inserts
//! one codeword tuple per keyword, then blinds the filter so its population
//! count is governed by the document length `L` rather than the keyword
//! count `n`: for each of the `L - n` phantom keywords, `k` fresh random
//! tags are drawn and inserted exactly like a real codeword tuple. In total
//! `L * k` tags are inserted regardless of `n`.

use rand::{CryptoRng, RngCore};

use crate::bloom::BloomFilter;
use crate::error::{Error, Result};
use crate::keys::KeySchedule;
use crate::prf::{derive_codewords, derive_trapdoor, Prf, Tag, TAG_LEN};

pub const DEFAULT_FP_RATE: f64 = 0.01;
pub const DEFAULT_SCALING: f64 = 1.5;

/// Builds the secure index for one document.
///
/// `raw_len` is the byte length of the extracted lowercased text; it fixes
/// the phantom count. `keywords` is expected deduplicated, but duplicates
/// only re-set the same bits.
pub fn build_index<P: Prf, R: RngCore + CryptoRng>(
    prf: &P,
    rng: &mut R,
    schedule: &KeySchedule,
    doc_id: &str,
    keywords: &[String],
    raw_len: usize,
    scaling: f64,
) -> Result<BloomFilter> {
    if doc_id.is_empty() {
        return Err(Error::Precondition(
            "document identifier must not be empty".into(),
        ));
    }
    let hashes = schedule.hash_count();
    let mut filter = BloomFilter::with_capacity(keywords.len(), hashes, scaling)?;
    for keyword in keywords {
        let trapdoor = derive_trapdoor(prf, schedule, keyword)?;
        let codewords = derive_codewords(prf, &trapdoor, doc_id);
        filter.add(&codewords);
    }
    blind(
        &mut filter,
        rng,
        raw_len.saturating_sub(keywords.len()),
        hashes,
    )?;
    Ok(filter)
}

/// Inserts `phantoms` tuples of `hashes` fresh random tags each. An RNG
/// failure here is fatal: a partially blinded filter leaks the keyword
/// count.
pub fn blind<R: RngCore + CryptoRng>(
    filter: &mut BloomFilter,
    rng: &mut R,
    phantoms: usize,
    hashes: usize,
) -> Result<()> {
    let mut tags = vec![[0u8; TAG_LEN]; hashes];
    for _ in 0..phantoms {
        for tag in tags.iter_mut() {
            rng.try_fill_bytes(tag).map_err(Error::RngUnavailable)?;
        }
        filter.add(&tags);
    }
    Ok(())
}

/// Server-side test: derive the document's codewords from a received
/// trapdoor and probe the filter.
pub fn matches<P: Prf>(prf: &P, filter: &BloomFilter, trapdoor: &[Tag], doc_id: &str) -> bool {
    let codewords = derive_codewords(prf, trapdoor, doc_id);
    filter.contains(&codewords)
}
