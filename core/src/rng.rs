//! Run identifier generation.
//!
//! Identifiers are the first 8 hex digits of a v4 UUID whose random bytes
//! come from a PCG stream. Production seeds the stream from OS entropy;
//! tests seed it explicitly so identifiers are reproducible.

use crate::types::RunId;
use rand::{RngCore, SeedableRng};
use rand_pcg::Pcg64Mcg;
use uuid::Builder;

/// Hex digits kept from the UUID.
pub const RUN_ID_LEN: usize = 8;

pub struct IdGenerator {
    inner: Pcg64Mcg,
}

impl IdGenerator {
    pub fn seeded(seed: u64) -> Self {
        Self { inner: Pcg64Mcg::seed_from_u64(seed) }
    }

    pub fn from_entropy() -> Self {
        Self { inner: Pcg64Mcg::from_entropy() }
    }

    /// Draw a fresh short identifier, e.g. `"3f9c01ab"`.
    pub fn next_run_id(&mut self) -> RunId {
        let mut bytes = [0u8; 16];
        self.inner.fill_bytes(&mut bytes);
        let uuid = Builder::from_random_bytes(bytes).into_uuid();
        uuid.simple().to_string().chars().take(RUN_ID_LEN).collect()
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::from_entropy()
    }
}
