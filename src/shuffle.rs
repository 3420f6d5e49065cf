//! In-place Fisher-Yates shuffle.
use rand::Rng;

/// Uniformly permute `items` in place.
///
/// Walks `m` from the last position down to 1, swapping position `m` with a position drawn
/// uniformly from `0..=m`. Every element is visited once and each of the `n!` orderings is
/// equally likely. Slices of length 0 or 1 are left untouched.
pub fn fisher_yates<T, R>(items: &mut [T], rng: &mut R)
where
    R: Rng,
{
    for m in (1..items.len()).rev() {
        let r = rng.random_range(0..=m);
        items.swap(m, r);
    }
}
