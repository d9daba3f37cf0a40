//! Random test payloads

use rand::{rngs::StdRng, Rng, SeedableRng};

/// Bytes a payload is drawn from: the 52 upper- and lower-case English letters
pub const PAYLOAD_ALPHABET: &[u8; 52] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Generates letter payloads, one independent uniform pick per byte.
///
/// Test traffic only; the generator is not meant to be unpredictable.
#[derive(Debug, Clone)]
pub struct PayloadGenerator {
    rng: StdRng,
}

impl PayloadGenerator {
    /// Generator seeded from OS entropy
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Deterministic generator, used by tests and benchmarks
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Overwrite every byte of `buf` with a fresh random letter
    pub fn fill(&mut self, buf: &mut [u8]) {
        for byte in buf.iter_mut() {
            *byte = PAYLOAD_ALPHABET[self.rng.gen_range(0..PAYLOAD_ALPHABET.len())];
        }
    }

    /// Allocate and fill a payload of `size` bytes
    pub fn generate(&mut self, size: usize) -> Vec<u8> {
        let mut payload = vec![0u8; size];
        self.fill(&mut payload);
        payload
    }
}

impl Default for PayloadGenerator {
    fn default() -> Self {
        Self::from_entropy()
    }
}
