//! Seeded pseudo-random stream for reproducible verification data.
//!
//! The hash and generator use only `u32` wrapping arithmetic, so the float
//! stream for a given seed is identical on every platform and matches the
//! mulberry32 sequence bit for bit.

/// Hash an identity string to a 32-bit seed.
///
/// Consumes UTF-16 code units so non-ASCII identities hash the same way the
/// browser build did.
pub fn hash_to_seed(text: &str) -> u32 {
    let len = text.encode_utf16().count() as u32;
    let mut hash = 1_779_033_703u32 ^ len;
    for unit in text.encode_utf16() {
        hash = (hash ^ u32::from(unit)).wrapping_mul(3_432_918_353);
        hash = hash.rotate_left(13);
    }
    hash ^ (hash >> 16)
}

/// mulberry32 generator.
#[derive(Debug, Clone)]
pub struct SeededRng {
    state: u32,
}

impl SeededRng {
    pub fn new(seed: u32) -> Self {
        Self { state: seed }
    }

    /// Seed from an identity string via [`hash_to_seed`].
    pub fn from_text(text: &str) -> Self {
        Self::new(hash_to_seed(text))
    }

    /// Next float in `[0, 1)`.
    pub fn next_f64(&mut self) -> f64 {
        self.state = self.state.wrapping_add(0x6D2B_79F5);
        let s = self.state;
        let mut t = (s ^ (s >> 15)).wrapping_mul(1 | s);
        t ^= t.wrapping_add((t ^ (t >> 7)).wrapping_mul(61 | t));
        f64::from(t ^ (t >> 14)) / 4_294_967_296.0
    }

    /// Integer in `[low, low + span)`, drawn as `floor(next * span + low)`.
    pub fn next_in(&mut self, low: u32, span: u32) -> u32 {
        (self.next_f64() * f64::from(span) + f64::from(low)).floor() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_stream() {
        let mut a = SeededRng::new(42);
        let mut b = SeededRng::new(42);
        for _ in 0..64 {
            assert_eq!(a.next_f64().to_bits(), b.next_f64().to_bits());
        }
    }

    #[test]
    fn test_different_seeds_diverge() {
        let mut a = SeededRng::new(1);
        let mut b = SeededRng::new(2);
        let xs: Vec<f64> = (0..8).map(|_| a.next_f64()).collect();
        let ys: Vec<f64> = (0..8).map(|_| b.next_f64()).collect();
        assert_ne!(xs, ys);
    }

    #[test]
    fn test_values_in_unit_interval() {
        let mut rng = SeededRng::from_text("prod_x:Acme Triage:ER Intake Triage");
        for _ in 0..10_000 {
            let v = rng.next_f64();
            assert!((0.0..1.0).contains(&v));
        }
    }

    #[test]
    fn test_mulberry32_reference_values() {
        // Seed 0 reference from the canonical mulberry32 implementation.
        let mut rng = SeededRng::new(0);
        let first = rng.next_f64();
        assert!((first - 0.266_429_208_684_712_65).abs() < 1e-15);
    }

    #[test]
    fn test_hash_is_stable_and_sensitive() {
        assert_eq!(hash_to_seed("prod_x"), hash_to_seed("prod_x"));
        assert_ne!(hash_to_seed("prod_x"), hash_to_seed("prod_y"));
        assert_ne!(hash_to_seed(""), hash_to_seed("a"));
    }

    #[test]
    fn test_hash_reference_values() {
        assert_eq!(hash_to_seed(""), 1_779_010_670);
        assert_eq!(
            hash_to_seed("prod_x:Acme Triage:ER Intake Triage"),
            3_402_954_292
        );
    }

    #[test]
    fn test_next_in_range() {
        let mut rng = SeededRng::new(7);
        for _ in 0..1000 {
            let v = rng.next_in(10, 90);
            assert!((10..100).contains(&v));
        }
    }
}
