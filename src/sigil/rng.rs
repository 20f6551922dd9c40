//! Seeded random stream for sigil generation
//!
//! All randomness in pattern generation must come through [`SigilRng`];
//! nothing in this module may touch an ambient/global RNG, or sigils stop
//! being reproducible across sessions.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

/// Shift-xor-add hash of a string key, folded to a non-negative seed.
///
/// Stable across platforms and process restarts; this is the only thing
/// standing between a domain name and its sigil, so its exact arithmetic
/// (wrapping i32, absolute value) is load-bearing.
pub fn hash_key(key: &str) -> u32 {
    let mut h: i32 = 0;
    for c in key.chars() {
        h = (h << 5).wrapping_sub(h).wrapping_add(c as i32) ^ (h >> 2);
    }
    h.unsigned_abs()
}

/// Deterministic `[0, 1)` stream seeded from a string key.
#[derive(Debug, Clone)]
pub struct SigilRng {
    inner: Pcg32,
}

impl SigilRng {
    /// Seed the stream from a category key plus optional instance key.
    pub fn from_keys(category: &str, instance: Option<&str>) -> Self {
        let combined = match instance {
            Some(id) if !id.is_empty() => format!("{category}:{id}"),
            _ => category.to_string(),
        };
        Self {
            inner: Pcg32::seed_from_u64(hash_key(&combined) as u64),
        }
    }

    /// Next value in `[0, 1)`.
    #[inline]
    pub fn unit(&mut self) -> f32 {
        self.inner.random::<f32>()
    }

    /// Next value in `[lo, hi)`.
    #[inline]
    pub fn range(&mut self, lo: f32, hi: f32) -> f32 {
        lo + self.unit() * (hi - lo)
    }

    /// Bernoulli draw.
    #[inline]
    pub fn chance(&mut self, p: f32) -> bool {
        self.unit() < p
    }

    /// Integer in `[0, n)`; returns 0 for n == 0.
    #[inline]
    pub fn index(&mut self, n: usize) -> usize {
        if n == 0 {
            return 0;
        }
        ((self.unit() * n as f32) as usize).min(n - 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_stable() {
        assert_eq!(hash_key("umbra"), hash_key("umbra"));
        assert_ne!(hash_key("umbra"), hash_key("verdant"));
        // Empty key must still produce a usable seed
        let _ = hash_key("");
    }

    #[test]
    fn test_stream_deterministic() {
        let mut a = SigilRng::from_keys("umbra", Some("denizen-7"));
        let mut b = SigilRng::from_keys("umbra", Some("denizen-7"));
        for _ in 0..64 {
            assert_eq!(a.unit().to_bits(), b.unit().to_bits());
        }
    }

    #[test]
    fn test_instance_key_diverges() {
        let mut a = SigilRng::from_keys("umbra", Some("denizen-7"));
        let mut b = SigilRng::from_keys("umbra", Some("denizen-8"));
        let same = (0..16).all(|_| a.unit().to_bits() == b.unit().to_bits());
        assert!(!same);
    }

    #[test]
    fn test_empty_instance_matches_category() {
        let mut a = SigilRng::from_keys("umbra", None);
        let mut b = SigilRng::from_keys("umbra", Some(""));
        for _ in 0..16 {
            assert_eq!(a.unit().to_bits(), b.unit().to_bits());
        }
    }

    #[test]
    fn test_unit_in_range() {
        let mut rng = SigilRng::from_keys("forge", None);
        for _ in 0..1000 {
            let v = rng.unit();
            assert!((0.0..1.0).contains(&v));
        }
    }
}
