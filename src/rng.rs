//! 16-bit linear-feedback shift register.
//!
//! Each step shifts the register right by one bit and, when the bit that
//! fell out was set, folds the tap mask back in. With a non-zero seed the
//! register never reaches zero, so the stream never stalls.
//!
//! The sequence only has to be reproducible, not statistically strong:
//! callers reduce it with `%`, which is exact for 4-way choices and
//! slightly biased for anything that does not divide 2^16.

pub const DEFAULT_SEED: u16 = 0x0001;
pub const TAP_MASK: u16 = 0xB400;

/// Anything the carver can draw 16-bit values from.
pub trait RandomSource {
    fn next_u16(&mut self) -> u16;
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Lfsr16 {
    state: u16,
}

impl Lfsr16 {
    /// A zero seed is replaced with 1.
    pub fn new(seed: u16) -> Self {
        Self {
            state: if seed == 0 { 1 } else { seed },
        }
    }

    pub fn state(&self) -> u16 {
        self.state
    }
}

impl Default for Lfsr16 {
    fn default() -> Self {
        Self::new(DEFAULT_SEED)
    }
}

impl RandomSource for Lfsr16 {
    fn next_u16(&mut self) -> u16 {
        let lsb = self.state & 1;
        self.state >>= 1;
        if lsb == 1 {
            self.state ^= TAP_MASK;
        }
        self.state
    }
}

impl<R: RandomSource + ?Sized> RandomSource for &mut R {
    fn next_u16(&mut self) -> u16 {
        (**self).next_u16()
    }
}
