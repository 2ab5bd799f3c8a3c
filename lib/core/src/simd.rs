// SIMD kernels for the squared L2 distance used by the flat index.
// Falls back to a two-accumulator scalar loop when no vector unit applies.

#[cfg(target_arch = "x86_64")]
use std::arch::x86_64::*;

#[cfg(target_arch = "aarch64")]
use std::arch::aarch64::*;

#[cfg(target_arch = "x86_64")]
const MIN_DIM_SIZE_AVX: usize = 32;

#[cfg(target_arch = "aarch64")]
const MIN_DIM_SIZE_SIMD: usize = 16;

/// Squared Euclidean distance between two equal-length slices.
///
/// Returns `f32::INFINITY` when the lengths differ.
#[inline]
pub fn squared_l2_simd(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return f32::INFINITY;
    }

    #[cfg(target_arch = "x86_64")]
    {
        if is_x86_feature_detected!("avx2")
            && is_x86_feature_detected!("fma")
            && a.len() >= MIN_DIM_SIZE_AVX
        {
            return unsafe { squared_l2_avx2(a, b) };
        }
    }

    #[cfg(target_arch = "aarch64")]
    {
        if std::arch::is_aarch64_feature_detected!("neon") && a.len() >= MIN_DIM_SIZE_SIMD {
            return unsafe { squared_l2_neon(a, b) };
        }
    }

    squared_l2_scalar(a, b)
}

/// AVX2 kernel, 16 floats per iteration across two registers
#[cfg(target_arch = "x86_64")]
#[target_feature(enable = "avx2", enable = "fma")]
#[inline]
unsafe fn squared_l2_avx2(a: &[f32], b: &[f32]) -> f32 {
    let dim = a.len();
    let mut i = 0;

    let mut sum1 = _mm256_setzero_ps();
    let mut sum2 = _mm256_setzero_ps();

    while i + 15 < dim {
        let va1 = _mm256_loadu_ps(a.as_ptr().add(i));
        let vb1 = _mm256_loadu_ps(b.as_ptr().add(i));
        let va2 = _mm256_loadu_ps(a.as_ptr().add(i + 8));
        let vb2 = _mm256_loadu_ps(b.as_ptr().add(i + 8));

        let diff1 = _mm256_sub_ps(va1, vb1);
        let diff2 = _mm256_sub_ps(va2, vb2);

        sum1 = _mm256_fmadd_ps(diff1, diff1, sum1);
        sum2 = _mm256_fmadd_ps(diff2, diff2, sum2);

        i += 16;
    }

    let combined = _mm256_add_ps(sum1, sum2);

    // Horizontal sum of the 8 lanes
    let sum_high = _mm256_extractf128_ps(combined, 1);
    let sum_low = _mm256_castps256_ps128(combined);
    let mut sum_128 = _mm_add_ps(sum_high, sum_low);
    sum_128 = _mm_hadd_ps(sum_128, sum_128);
    sum_128 = _mm_hadd_ps(sum_128, sum_128);

    let mut sum_sq = _mm_cvtss_f32(sum_128);

    while i < dim {
        let diff = a[i] - b[i];
        sum_sq += diff * diff;
        i += 1;
    }

    sum_sq
}

/// NEON kernel, 4 floats per iteration
#[cfg(target_arch = "aarch64")]
#[target_feature(enable = "neon")]
#[inline]
unsafe fn squared_l2_neon(a: &[f32], b: &[f32]) -> f32 {
    let dim = a.len();
    let mut i = 0;
    let mut sum = vdupq_n_f32(0.0);

    while i + 3 < dim {
        let va = vld1q_f32(a.as_ptr().add(i));
        let vb = vld1q_f32(b.as_ptr().add(i));
        let diff = vsubq_f32(va, vb);
        sum = vfmaq_f32(sum, diff, diff);
        i += 4;
    }

    let mut sum_sq = vaddvq_f32(sum);

    while i < dim {
        let diff = a[i] - b[i];
        sum_sq += diff * diff;
        i += 1;
    }

    sum_sq
}

#[inline]
fn squared_l2_scalar(a: &[f32], b: &[f32]) -> f32 {
    let mut sum0 = 0.0f32;
    let mut sum1 = 0.0f32;
    let chunks = a.len() / 2;

    for i in 0..chunks {
        let d0 = a[i * 2] - b[i * 2];
        let d1 = a[i * 2 + 1] - b[i * 2 + 1];
        sum0 += d0 * d0;
        sum1 += d1 * d1;
    }

    if a.len() % 2 == 1 {
        let last = a.len() - 1;
        let d = a[last] - b[last];
        sum0 += d * d;
    }

    sum0 + sum1
}

/// Squared Euclidean norm
#[inline]
pub fn norm_squared(v: &[f32]) -> f32 {
    v.iter().map(|x| x * x).sum()
}
