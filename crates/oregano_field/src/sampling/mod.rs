//! Blue-noise point sampling for plant and leaf placement.
//!
//! The field and every plant own an incremental [`PoissonDiskSampler`] that is
//! advanced one point at a time by timers instead of being filled up front.
use rand::Rng as RngCore;

pub mod poisson_disk;

pub use poisson_disk::PoissonDiskSampler;

/// Generate a random float in the range [0, 1].
///
/// `u32::MAX` rounds up to exactly `1.0` in `f32`; use [`rand_range`] for a
/// half-open draw.
#[inline]
pub(crate) fn rand01(rng: &mut dyn RngCore) -> f32 {
    (rng.next_u32() as f32) / ((u32::MAX as f32) + 1.0)
}

/// Generate a random double in the range [0, 1) from the top 53 bits of a `u64`.
#[inline]
pub(crate) fn rand01_f64(rng: &mut dyn RngCore) -> f64 {
    (rng.next_u64() >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
}

/// Uniform draw in `[min, max)`. Collapses to `min` for empty or inverted ranges.
#[inline]
pub(crate) fn rand_range(rng: &mut dyn RngCore, min: f32, max: f32) -> f32 {
    if max <= min {
        return min;
    }
    let v = min + rand01(rng) * (max - min);
    // f32 rounding can land exactly on `max` for wide ranges.
    if v >= max {
        next_down(max).max(min)
    } else {
        v
    }
}

/// Compute the next smaller representable float value.
///
/// Returns a value that is strictly less than the input, useful for
/// keeping bounds strictly inside a half-open range.
#[inline]
pub(crate) fn next_down(val: f32) -> f32 {
    if val.is_nan() {
        return f32::NAN;
    }

    if val == f32::NEG_INFINITY {
        return f32::NEG_INFINITY;
    }

    if val == f32::INFINITY {
        return f32::MAX;
    }

    if val == 0.0 {
        return -f32::MIN_POSITIVE;
    }

    let bits = val.to_bits();
    if val > 0.0 {
        f32::from_bits(bits.saturating_sub(1))
    } else {
        f32::from_bits(bits.saturating_add(1))
    }
}
