// src/engine/kernel.rs
use super::interval::Interval;

/// Whether the decimal representation of `i` contains the digit 9
pub fn contains_nine(mut i: u64) -> bool {
    while i > 0 {
        if i % 10 == 9 {
            return true;
        }
        i /= 10;
    }
    false
}

/// Sum of `1 / i` over the integers of `interval` without a 9 digit.
///
/// Terms are added in ascending order; an empty interval sums to 0.0.
pub fn evaluate(interval: &Interval) -> f64 {
    let mut total = 0.0;
    for i in interval.iter() {
        if !contains_nine(i) {
            total += 1.0 / i as f64;
        }
    }
    total
}
