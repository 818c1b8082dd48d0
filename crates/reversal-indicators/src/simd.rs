//! SIMD-optimized per-step kernels.
//!
//! These use the `wide` crate for portable SIMD. Lane arithmetic is plain
//! IEEE-754, so results match the scalar tail loop bit for bit.

use wide::f64x4;

const LANES: usize = 4;

#[inline]
fn load(data: &[f64], idx: usize) -> f64x4 {
    f64x4::new([data[idx], data[idx + 1], data[idx + 2], data[idx + 3]])
}

/// Split consecutive price changes into gains and losses.
///
/// Returns two vectors of length `data.len() - 1` (empty for fewer than two
/// points); entry `i` describes the move from `data[i]` to `data[i + 1]`.
/// Both are non-negative.
pub fn gains_losses_simd(data: &[f64]) -> (Vec<f64>, Vec<f64>) {
    if data.len() < 2 {
        return (vec![], vec![]);
    }

    let steps = data.len() - 1;
    let mut gains = Vec::with_capacity(steps);
    let mut losses = Vec::with_capacity(steps);

    let chunks = steps / LANES;
    let zero = f64x4::splat(0.0);

    for i in 0..chunks {
        let idx = i * LANES;
        let diff = load(data, idx + 1) - load(data, idx);

        gains.extend(diff.max(zero).to_array());
        losses.extend((-diff).max(zero).to_array());
    }

    for i in (chunks * LANES)..steps {
        let change = data[i + 1] - data[i];
        gains.push(change.max(0.0));
        losses.push((-change).max(0.0));
    }

    (gains, losses)
}

/// Simple period returns `data[i + 1] / data[i] - 1`.
///
/// Returns a vector of length `data.len() - 1`. A zero denominator yields a
/// non-finite value; callers decide how to treat it.
pub fn pct_change_simd(data: &[f64]) -> Vec<f64> {
    if data.len() < 2 {
        return vec![];
    }

    let steps = data.len() - 1;
    let mut result = Vec::with_capacity(steps);

    let chunks = steps / LANES;
    let one = f64x4::splat(1.0);

    for i in 0..chunks {
        let idx = i * LANES;
        let ret = load(data, idx + 1) / load(data, idx) - one;
        result.extend(ret.to_array());
    }

    for i in (chunks * LANES)..steps {
        result.push(data[i + 1] / data[i] - 1.0);
    }

    result
}
