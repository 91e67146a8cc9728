//! Nonce sources for the record uniqueness attribute.

use rand::rngs::ThreadRng;
use rand::Rng;

/// Supplies uniqueness nonces for new records.
///
/// Values are expected in `[0, i64::MAX]` (a 63-bit magnitude); they are
/// written as decimal ASCII in the nonce attribute.
pub trait NonceSource {
    fn next_nonce(&mut self) -> i64;
}

/// Nonce source backed by any `rand` generator.
#[derive(Debug, Clone, Default)]
pub struct RandomNonce<R = ThreadRng> {
    rng: R,
}

impl RandomNonce<ThreadRng> {
    /// Nonce source over the calling thread's generator.
    pub fn thread_local() -> Self {
        Self {
            rng: rand::thread_rng(),
        }
    }
}

impl<R: Rng> RandomNonce<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> NonceSource for RandomNonce<R> {
    fn next_nonce(&mut self) -> i64 {
        self.rng.gen_range(0..=i64::MAX)
    }
}

impl<T: NonceSource + ?Sized> NonceSource for &mut T {
    fn next_nonce(&mut self) -> i64 {
        (**self).next_nonce()
    }
}
