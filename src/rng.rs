//! Seeded 32-bit generator and seed parsing.

/// Mulberry32-style generator.
///
/// The mixing steps write back into the state, so a given seed reproduces the
/// exact sequence the page has always produced for `?seed=`. All arithmetic is
/// wrapping `u32`, which matches 32-bit two's-complement semantics bit for bit.
#[derive(Debug, Clone)]
pub struct Mulberry32 {
    state: u32,
}

impl Mulberry32 {
    pub const fn new(seed: u32) -> Self {
        Self { state: seed }
    }

    /// Next value in `[0, 1)`.
    pub fn next_f64(&mut self) -> f64 {
        let mut s = self.state.wrapping_add(0x6D2B_79F5);
        s = (s ^ (s >> 15)).wrapping_mul(1 | s);
        s = s.wrapping_add((s ^ (s >> 7)).wrapping_mul(61 | s)) ^ s;
        self.state = s;
        f64::from(s ^ (s >> 14)) / 4_294_967_296.0
    }
}

impl Iterator for Mulberry32 {
    type Item = f64;

    fn next(&mut self) -> Option<f64> {
        Some(self.next_f64())
    }
}

/// Parse a `seed` query value.
///
/// Accepts leading whitespace, an optional `+` and a run of decimal digits;
/// anything after the digits is ignored. Values wrap modulo 2^32. Returns
/// `None` for empty, negative or non-numeric input.
pub fn parse_seed(raw: &str) -> Option<u32> {
    let s = raw.trim_start();
    let s = s.strip_prefix('+').unwrap_or(s);
    let digits = s.bytes().take_while(u8::is_ascii_digit);
    let mut seen = false;
    let mut value = 0u32;
    for d in digits {
        seen = true;
        value = value.wrapping_mul(10).wrapping_add(u32::from(d - b'0'));
    }
    seen.then_some(value)
}
