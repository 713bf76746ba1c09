//! Explicit SIMD paths for DAXPY.
//!
//! Every path issues a separate multiply and add per lane (never a fused
//! multiply-add), so results are bit-identical to the scalar loop.

use std::fmt;

/// SIMD backend detected at runtime.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SimdBackend {
    /// AVX (256-bit, 4 lanes of f64)
    Avx,
    /// SSE2 (128-bit, 2 lanes of f64)
    Sse2,
    /// ARM NEON (128-bit, 2 lanes of f64)
    Neon,
    /// Unrolled scalar loop
    #[default]
    Scalar,
}

impl SimdBackend {
    pub fn lanes(&self) -> usize {
        match self {
            SimdBackend::Avx => 4,
            SimdBackend::Sse2 | SimdBackend::Neon => 2,
            SimdBackend::Scalar => 1,
        }
    }

    /// Whether this backend can run on the current machine.
    pub fn is_available(&self) -> bool {
        match self {
            #[cfg(target_arch = "x86_64")]
            SimdBackend::Avx => is_x86_feature_detected!("avx"),
            #[cfg(target_arch = "x86_64")]
            SimdBackend::Sse2 => true,
            #[cfg(target_arch = "aarch64")]
            SimdBackend::Neon => true,
            SimdBackend::Scalar => true,
            #[allow(unreachable_patterns)]
            _ => false,
        }
    }
}

impl fmt::Display for SimdBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimdBackend::Avx => write!(f, "AVX"),
            SimdBackend::Sse2 => write!(f, "SSE2"),
            SimdBackend::Neon => write!(f, "NEON"),
            SimdBackend::Scalar => write!(f, "Scalar"),
        }
    }
}

/// Detect the widest available backend.
#[cfg(target_arch = "x86_64")]
pub fn detect_simd_backend() -> SimdBackend {
    if is_x86_feature_detected!("avx") {
        SimdBackend::Avx
    } else {
        SimdBackend::Sse2
    }
}

/// Detect the widest available backend.
#[cfg(target_arch = "aarch64")]
pub fn detect_simd_backend() -> SimdBackend {
    SimdBackend::Neon
}

/// Detect the widest available backend.
#[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
pub fn detect_simd_backend() -> SimdBackend {
    SimdBackend::Scalar
}

/// `z = alpha * x + y` over equal-length slices using `backend`.
///
/// A backend that is not available on this machine falls back to the
/// unrolled scalar loop.
pub fn daxpy_slices(backend: SimdBackend, alpha: f64, x: &[f64], y: &[f64], z: &mut [f64]) {
    debug_assert!(x.len() == y.len() && y.len() == z.len());

    match backend {
        #[cfg(target_arch = "x86_64")]
        SimdBackend::Avx if is_x86_feature_detected!("avx") => {
            // SAFETY: AVX support is runtime-checked in the match guard.
            unsafe { daxpy_avx(alpha, x, y, z) }
        }
        #[cfg(target_arch = "x86_64")]
        SimdBackend::Sse2 => {
            // SAFETY: SSE2 is part of the x86_64 baseline.
            unsafe { daxpy_sse2(alpha, x, y, z) }
        }
        #[cfg(target_arch = "aarch64")]
        SimdBackend::Neon => {
            // SAFETY: NEON is part of the aarch64 baseline.
            unsafe { daxpy_neon(alpha, x, y, z) }
        }
        _ => daxpy_unrolled(alpha, x, y, z),
    }
}

/// Plain element-wise loop, also used for SIMD tails.
#[inline]
pub fn daxpy_scalar(alpha: f64, x: &[f64], y: &[f64], z: &mut [f64]) {
    for ((out, &xi), &yi) in z.iter_mut().zip(x).zip(y) {
        *out = alpha * xi + yi;
    }
}

fn daxpy_unrolled(alpha: f64, x: &[f64], y: &[f64], z: &mut [f64]) {
    let mut z_chunks = z.chunks_exact_mut(4);
    let mut x_chunks = x.chunks_exact(4);
    let mut y_chunks = y.chunks_exact(4);

    for ((zc, xc), yc) in (&mut z_chunks).zip(&mut x_chunks).zip(&mut y_chunks) {
        zc[0] = alpha * xc[0] + yc[0];
        zc[1] = alpha * xc[1] + yc[1];
        zc[2] = alpha * xc[2] + yc[2];
        zc[3] = alpha * xc[3] + yc[3];
    }

    daxpy_scalar(
        alpha,
        x_chunks.remainder(),
        y_chunks.remainder(),
        z_chunks.into_remainder(),
    );
}

#[cfg(target_arch = "x86_64")]
#[target_feature(enable = "avx")]
unsafe fn daxpy_avx(alpha: f64, x: &[f64], y: &[f64], z: &mut [f64]) {
    use std::arch::x86_64::{
        _mm256_add_pd, _mm256_loadu_pd, _mm256_mul_pd, _mm256_set1_pd, _mm256_storeu_pd,
    };

    let n = z.len().min(x.len()).min(y.len());
    let chunks = n / 4;

    // SAFETY: every offset + 4 is <= n, which bounds all three slices.
    unsafe {
        let a = _mm256_set1_pd(alpha);
        for i in 0..chunks {
            let offset = i * 4;
            let xv = _mm256_loadu_pd(x.as_ptr().add(offset));
            let yv = _mm256_loadu_pd(y.as_ptr().add(offset));
            let zv = _mm256_add_pd(_mm256_mul_pd(a, xv), yv);
            _mm256_storeu_pd(z.as_mut_ptr().add(offset), zv);
        }
    }

    let tail = chunks * 4;
    daxpy_scalar(alpha, &x[tail..n], &y[tail..n], &mut z[tail..n]);
}

#[cfg(target_arch = "x86_64")]
#[target_feature(enable = "sse2")]
unsafe fn daxpy_sse2(alpha: f64, x: &[f64], y: &[f64], z: &mut [f64]) {
    use std::arch::x86_64::{_mm_add_pd, _mm_loadu_pd, _mm_mul_pd, _mm_set1_pd, _mm_storeu_pd};

    let n = z.len().min(x.len()).min(y.len());
    let chunks = n / 2;

    // SAFETY: every offset + 2 is <= n, which bounds all three slices.
    unsafe {
        let a = _mm_set1_pd(alpha);
        for i in 0..chunks {
            let offset = i * 2;
            let xv = _mm_loadu_pd(x.as_ptr().add(offset));
            let yv = _mm_loadu_pd(y.as_ptr().add(offset));
            _mm_storeu_pd(z.as_mut_ptr().add(offset), _mm_add_pd(_mm_mul_pd(a, xv), yv));
        }
    }

    let tail = chunks * 2;
    daxpy_scalar(alpha, &x[tail..n], &y[tail..n], &mut z[tail..n]);
}

#[cfg(target_arch = "aarch64")]
#[target_feature(enable = "neon")]
unsafe fn daxpy_neon(alpha: f64, x: &[f64], y: &[f64], z: &mut [f64]) {
    use std::arch::aarch64::{vaddq_f64, vdupq_n_f64, vld1q_f64, vmulq_f64, vst1q_f64};

    let n = z.len().min(x.len()).min(y.len());
    let chunks = n / 2;

    // SAFETY: every offset + 2 is <= n, which bounds all three slices.
    unsafe {
        let a = vdupq_n_f64(alpha);
        for i in 0..chunks {
            let offset = i * 2;
            let xv = vld1q_f64(x.as_ptr().add(offset));
            let yv = vld1q_f64(y.as_ptr().add(offset));
            vst1q_f64(z.as_mut_ptr().add(offset), vaddq_f64(vmulq_f64(a, xv), yv));
        }
    }

    let tail = chunks * 2;
    daxpy_scalar(alpha, &x[tail..n], &y[tail..n], &mut z[tail..n]);
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_BACKENDS: [SimdBackend; 4] = [
        SimdBackend::Avx,
        SimdBackend::Sse2,
        SimdBackend::Neon,
        SimdBackend::Scalar,
    ];

    #[test]
    fn detected_backend_is_available() {
        let backend = detect_simd_backend();
        assert!(backend.is_available(), "{backend} detected but unavailable");
        assert!(backend.lanes() >= 1);
    }

    #[test]
    fn every_backend_is_bit_identical_to_scalar() {
        fastrand::seed(7);
        for len in [0usize, 1, 2, 3, 4, 5, 7, 8, 9, 31, 1023] {
            let x: Vec<f64> = (0..len).map(|_| fastrand::f64() * 200.0 - 100.0).collect();
            let y: Vec<f64> = (0..len).map(|_| fastrand::f64() * 200.0 - 100.0).collect();
            let alpha = fastrand::f64() * 10.0 - 5.0;

            let mut expected = vec![0.0; len];
            daxpy_scalar(alpha, &x, &y, &mut expected);

            for backend in ALL_BACKENDS {
                let mut actual = vec![f64::NAN; len];
                daxpy_slices(backend, alpha, &x, &y, &mut actual);
                assert_eq!(expected, actual, "backend {backend} len {len}");
            }
        }
    }

    #[test]
    fn unavailable_backend_falls_back() {
        let x = [1.0, 2.0, 3.0];
        let y = [11.0, 12.0, 13.0];
        for backend in ALL_BACKENDS {
            let mut z = [0.0; 3];
            daxpy_slices(backend, 2.0, &x, &y, &mut z);
            assert_eq!(z, [13.0, 16.0, 19.0], "backend {backend}");
        }
    }
}
