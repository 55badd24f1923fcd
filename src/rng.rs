/// A simple, deterministic random number generator for spawns and particles.
#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u64,
}

impl SimpleRng {
    /// Creates a new `SimpleRng` with the given seed.
    pub fn new(seed: u32) -> Self {
        let mut state = seed as u64 + 0x9E3779B97F4A7C15;
        // Basic mixing
        state = (state ^ (state >> 30)).wrapping_mul(0xBF58476D1CE4E5B9);
        state = (state ^ (state >> 27)).wrapping_mul(0x94D049BB133111EB);
        state = state ^ (state >> 31);
        SimpleRng { state }
    }

    /// Generates the next random 32-bit unsigned integer.
    pub fn next(&mut self) -> u32 {
        self.state = self.state.wrapping_mul(6364136223846793005).wrapping_add(1);
        (self.state >> 32) as u32
    }

    /// Generates a random 32-bit unsigned integer in the range [min, max).
    pub fn range(&mut self, min: u32, max: u32) -> u32 {
        if min >= max { return min; }
        min + (self.next() % (max - min))
    }

    /// Uniform float in [0, 1).
    pub fn unit(&mut self) -> f32 {
        (self.next() >> 8) as f32 / (1u32 << 24) as f32
    }

    /// Uniform float in [min, max).
    pub fn range_f32(&mut self, min: f32, max: f32) -> f32 {
        if min >= max { return min; }
        min + (max - min) * self.unit()
    }

    /// Either -1.0 or 1.0.
    pub fn sign(&mut self) -> f32 {
        if self.next() & 1 == 0 { -1.0 } else { 1.0 }
    }

    /// Picks an element uniformly, `None` for an empty slice.
    pub fn pick<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        if items.is_empty() {
            return None;
        }
        let idx = self.range(0, items.len() as u32) as usize;
        items.get(idx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_sequence() {
        let mut a = SimpleRng::new(7);
        let mut b = SimpleRng::new(7);
        for _ in 0..32 {
            assert_eq!(a.next(), b.next());
        }
    }

    #[test]
    fn ranges_stay_in_bounds() {
        let mut rng = SimpleRng::new(42);
        for _ in 0..1000 {
            let v = rng.range(100, 2500);
            assert!((100..2500).contains(&v));
            let f = rng.range_f32(-1.5, 3.0);
            assert!((-1.5..3.0).contains(&f));
            let s = rng.sign();
            assert!(s == 1.0 || s == -1.0);
        }
        assert_eq!(rng.range(5, 5), 5);
    }

    #[test]
    fn pick_handles_empty() {
        let mut rng = SimpleRng::new(1);
        let empty: [u8; 0] = [];
        assert!(rng.pick(&empty).is_none());
        assert_eq!(rng.pick(&[9]), Some(&9));
    }
}
