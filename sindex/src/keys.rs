//! Hash-key schedule for a secure-index collection.
//!
//! A collection shares one ordered set of `k` independent 128-bit keys, where
//! `k = ceil(|log2 p|)` for a target false-positive rate `p`. Every document
//! index and every trapdoor is derived under this schedule; rotating it
//! invalidates all existing indexes.

use rand::rngs::OsRng;
use rand::RngCore;

use crate::error::{Error, Result};

pub const KEY_LEN: usize = 16;

pub type HashKey = [u8; KEY_LEN];

/// Ordered sequence of independent PRF keys. The order is part of the
/// schedule and is preserved by the codec across persistence round-trips.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeySchedule {
    keys: Vec<HashKey>,
}

impl KeySchedule {
    /// Draws `k = ceil(|log2 target_fp_rate|)` fresh keys from the OS
    /// entropy source.
    pub fn generate(target_fp_rate: f64) -> Result<Self> {
        let k = optimal_hash_count(target_fp_rate)?;
        let mut keys = Vec::with_capacity(k);
        for _ in 0..k {
            let mut key = [0u8; KEY_LEN];
            OsRng
                .try_fill_bytes(&mut key)
                .map_err(Error::RngUnavailable)?;
            keys.push(key);
        }
        Ok(Self { keys })
    }

    pub fn from_keys(keys: Vec<HashKey>) -> Self {
        Self { keys }
    }

    /// Number of hash functions `k`, one per key.
    pub fn hash_count(&self) -> usize {
        self.keys.len()
    }

    /// Keys in canonical schedule order.
    pub fn keys(&self) -> &[HashKey] {
        &self.keys
    }
}

/// Optimal Bloom filter hash count for a target false-positive rate:
/// `k = ceil(|log2 p|)`. The design default `p = 0.01` yields `k = 7`.
pub fn optimal_hash_count(target_fp_rate: f64) -> Result<usize> {
    if !(target_fp_rate > 0.0 && target_fp_rate < 1.0) {
        return Err(Error::Precondition(format!(
            "false-positive rate must be in (0, 1), got {target_fp_rate}"
        )));
    }
    Ok(target_fp_rate.log2().abs().ceil() as usize)
}
