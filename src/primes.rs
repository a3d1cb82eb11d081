//! Prime decomposition of transform lengths.
//!
//! VkFFT generates radix kernels for lengths whose prime factors are all at
//! most [`MAX_RADIX`]; other lengths go through Bluestein's algorithm, which
//! is slower and less accurate.

use alloc::vec::Vec;

/// Radices with native kernels.
pub const RADICES: [usize; 6] = [2, 3, 5, 7, 11, 13];

/// Largest native radix.
pub const MAX_RADIX: usize = 13;

/// Prime factors of `n` in ascending order, with multiplicity.
///
/// Empty for `n <= 1`.
pub fn prime_factors(mut n: usize) -> Vec<usize> {
    let mut factors = Vec::new();
    let mut p = 2;
    while p <= n / p {
        while n % p == 0 {
            factors.push(p);
            n /= p;
        }
        p += 1;
    }
    if n > 1 {
        factors.push(n);
    }
    factors
}

/// Largest prime factor of `n`, `1` for `n <= 1`.
pub fn largest_prime_factor(n: usize) -> usize {
    prime_factors(n).last().copied().unwrap_or(1)
}

/// Whether every prime factor of `n` is in `radices` (all of [`RADICES`]
/// when empty).
pub fn is_radix_size(n: usize, radices: &[usize]) -> bool {
    let allowed = if radices.is_empty() {
        &RADICES[..]
    } else {
        radices
    };
    n > 0 && prime_factors(n).iter().all(|p| allowed.contains(p))
}

/// Whether `n` needs Bluestein's algorithm.
pub fn is_bluestein_size(n: usize) -> bool {
    largest_prime_factor(n) > MAX_RADIX
}
