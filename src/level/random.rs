//! Deterministic pseudo-random stream used for level layout.

/// A pseudo-random sequence whose only state is a call counter.
///
/// Each call advances the counter and hashes it through `sin`, keeping the fractional part.
/// Two sequences starting from the same counter produce identical values forever, which is
/// what makes the generated level reproducible without storing it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeededRandom {
    counter: u32,
}

impl SeededRandom {
    const SCALE: f64 = 127.1;
    const SHIFT: f64 = 311.7;
    const SPREAD: f64 = 43758.5453;

    pub fn new() -> Self {
        Self::default()
    }

    /// Starts the sequence as if `counter` values had already been drawn.
    pub fn with_counter(counter: u32) -> Self {
        Self { counter }
    }

    pub fn counter(&self) -> u32 {
        self.counter
    }

    /// Returns the next value in `[0, 1)`.
    pub fn next_unit(&mut self) -> f64 {
        self.counter = self.counter.wrapping_add(1);
        let x = (self.counter as f64 * Self::SCALE + Self::SHIFT).sin() * Self::SPREAD;
        x - x.floor()
    }

    /// Returns `min + floor(next * spread)`, an integer-valued draw in `[min, min + spread)`.
    pub fn next_floor(&mut self, min: f32, spread: f32) -> f32 {
        min + (self.next_unit() * spread as f64).floor() as f32
    }
}

impl Iterator for SeededRandom {
    type Item = f64;

    fn next(&mut self) -> Option<f64> {
        Some(self.next_unit())
    }
}
