//! 8-lane f32 micro-kernels shared by the dense and sparse SIMD variants
//!
//! Each public entry point dispatches at runtime: an AVX2+FMA path on
//! x86_64 when the CPU supports it, otherwise a portable 8-lane fallback
//! that the compiler is free to autovectorize. Both paths handle a
//! partial tail block when the column count is not a multiple of the
//! lane width.

/// Lane width of the vectorized kernels (8 × f32 = 256 bits)
pub const LANES: usize = 8;

/// Check whether the vectorized x86_64 path is usable at runtime
#[inline]
pub fn simd_available() -> bool {
    #[cfg(target_arch = "x86_64")]
    {
        is_x86_feature_detected!("avx2") && is_x86_feature_detected!("fma")
    }
    #[cfg(not(target_arch = "x86_64"))]
    {
        false
    }
}

/// One GEMM row panel: for `j in [j0, j_end)` in blocks of 8,
/// `c_row[j] (+)= Σ_{k in [k0, k_end)} a_row[k] * b[k * n + j]`
///
/// `b` is row-major `K × n`. With `zero_init` the accumulator starts from
/// zero and the block is overwritten; without it the current contents of
/// `c_row` are folded in, which the combined tiled kernel relies on for
/// k-chunks past the first.
#[inline]
pub fn gemm_row_panel(
    a_row: &[f32],
    b: &[f32],
    n: usize,
    c_row: &mut [f32],
    j0: usize,
    j_end: usize,
    k0: usize,
    k_end: usize,
    zero_init: bool,
) {
    debug_assert!(j_end <= n && j_end <= c_row.len());
    debug_assert!(k_end <= a_row.len());

    #[cfg(target_arch = "x86_64")]
    {
        if simd_available() {
            unsafe { avx2::gemm_row_panel(a_row, b, n, c_row, j0, j_end, k0, k_end, zero_init) };
            return;
        }
    }

    gemm_row_panel_portable(a_row, b, n, c_row, j0, j_end, k0, k_end, zero_init);
}

/// One SpMM row: `c_row[j] += Σ_idx values[idx] * b[col_indices[idx] * n + j]`
///
/// Broadcasts each nonzero across the lane width and fuses multiply-add
/// against a contiguous row slice of `b`. `c_row` must be pre-zeroed by
/// the caller (sparse kernels zero-fill the whole output first).
#[inline]
pub fn spmm_row(values: &[f32], col_indices: &[usize], b: &[f32], n: usize, c_row: &mut [f32]) {
    debug_assert_eq!(values.len(), col_indices.len());
    debug_assert_eq!(c_row.len(), n);

    #[cfg(target_arch = "x86_64")]
    {
        if simd_available() {
            unsafe { avx2::spmm_row(values, col_indices, b, n, c_row) };
            return;
        }
    }

    spmm_row_portable(values, col_indices, b, n, c_row);
}

/// Scaled vector accumulation: `y[i] += alpha * x[i]`
#[inline]
pub fn axpy(alpha: f32, x: &[f32], y: &mut [f32]) {
    debug_assert_eq!(x.len(), y.len());

    #[cfg(target_arch = "x86_64")]
    {
        if simd_available() {
            unsafe { avx2::axpy(alpha, x, y) };
            return;
        }
    }

    axpy_portable(alpha, x, y);
}

// ---------------------------------------------------------------------------
// Portable fallback
// ---------------------------------------------------------------------------

/// Portable 8-lane accumulator
#[derive(Clone, Copy)]
struct F32x8([f32; LANES]);

impl F32x8 {
    #[inline]
    fn zero() -> Self {
        F32x8([0.0; LANES])
    }

    /// Loads up to 8 lanes, zero-padding past `src.len()`
    #[inline]
    fn load_partial(src: &[f32]) -> Self {
        let mut lanes = [0.0; LANES];
        lanes[..src.len()].copy_from_slice(src);
        F32x8(lanes)
    }

    /// `self + scalar * other`, lane by lane
    #[inline]
    fn fma(self, scalar: f32, other: Self) -> Self {
        let mut out = self.0;
        for (lane, &b) in out.iter_mut().zip(other.0.iter()) {
            *lane += scalar * b;
        }
        F32x8(out)
    }

    /// Stores the first `dst.len()` lanes
    #[inline]
    fn store_partial(self, dst: &mut [f32]) {
        let width = dst.len();
        dst.copy_from_slice(&self.0[..width]);
    }
}

fn gemm_row_panel_portable(
    a_row: &[f32],
    b: &[f32],
    n: usize,
    c_row: &mut [f32],
    j0: usize,
    j_end: usize,
    k0: usize,
    k_end: usize,
    zero_init: bool,
) {
    let mut j = j0;
    while j < j_end {
        let width = LANES.min(j_end - j);
        let mut acc = if zero_init {
            F32x8::zero()
        } else {
            F32x8::load_partial(&c_row[j..j + width])
        };

        for k in k0..k_end {
            let b_block = &b[k * n + j..k * n + j + width];
            acc = acc.fma(a_row[k], F32x8::load_partial(b_block));
        }

        acc.store_partial(&mut c_row[j..j + width]);
        j += LANES;
    }
}

fn spmm_row_portable(values: &[f32], col_indices: &[usize], b: &[f32], n: usize, c_row: &mut [f32]) {
    let mut j = 0;
    while j < n {
        let width = LANES.min(n - j);
        let mut acc = F32x8::load_partial(&c_row[j..j + width]);

        for (&val, &k) in values.iter().zip(col_indices.iter()) {
            let b_block = &b[k * n + j..k * n + j + width];
            acc = acc.fma(val, F32x8::load_partial(b_block));
        }

        acc.store_partial(&mut c_row[j..j + width]);
        j += LANES;
    }
}

fn axpy_portable(alpha: f32, x: &[f32], y: &mut [f32]) {
    for (yi, &xi) in y.iter_mut().zip(x.iter()) {
        *yi += alpha * xi;
    }
}

// ---------------------------------------------------------------------------
// AVX2 + FMA path
// ---------------------------------------------------------------------------

#[cfg(target_arch = "x86_64")]
mod avx2 {
    use super::LANES;
    use core::arch::x86_64::*;

    /// Loads a full or zero-padded partial 8-lane block
    ///
    /// # Safety
    /// Requires AVX2; `src.len() >= width` and `width <= LANES`.
    #[target_feature(enable = "avx2")]
    unsafe fn load_block(src: &[f32], width: usize) -> __m256 {
        if width == LANES {
            _mm256_loadu_ps(src.as_ptr())
        } else {
            let mut buf = [0.0f32; LANES];
            buf[..width].copy_from_slice(&src[..width]);
            _mm256_loadu_ps(buf.as_ptr())
        }
    }

    /// Stores the first `width` lanes of `acc`
    ///
    /// # Safety
    /// Requires AVX2; `dst.len() >= width`.
    #[target_feature(enable = "avx2")]
    unsafe fn store_block(acc: __m256, dst: &mut [f32], width: usize) {
        if width == LANES {
            _mm256_storeu_ps(dst.as_mut_ptr(), acc);
        } else {
            let mut buf = [0.0f32; LANES];
            _mm256_storeu_ps(buf.as_mut_ptr(), acc);
            dst[..width].copy_from_slice(&buf[..width]);
        }
    }

    /// # Safety
    /// Requires AVX2 and FMA support, checked by the caller.
    #[target_feature(enable = "avx2", enable = "fma")]
    pub unsafe fn gemm_row_panel(
        a_row: &[f32],
        b: &[f32],
        n: usize,
        c_row: &mut [f32],
        j0: usize,
        j_end: usize,
        k0: usize,
        k_end: usize,
        zero_init: bool,
    ) {
        let mut j = j0;
        while j < j_end {
            let width = LANES.min(j_end - j);
            let mut acc = if zero_init {
                _mm256_setzero_ps()
            } else {
                load_block(&c_row[j..], width)
            };

            for k in k0..k_end {
                let a_vec = _mm256_set1_ps(*a_row.get_unchecked(k));
                let b_vec = load_block(&b[k * n + j..], width);
                acc = _mm256_fmadd_ps(a_vec, b_vec, acc);
            }

            store_block(acc, &mut c_row[j..], width);
            j += LANES;
        }
    }

    /// # Safety
    /// Requires AVX2 and FMA support, checked by the caller.
    #[target_feature(enable = "avx2", enable = "fma")]
    pub unsafe fn spmm_row(
        values: &[f32],
        col_indices: &[usize],
        b: &[f32],
        n: usize,
        c_row: &mut [f32],
    ) {
        let mut j = 0;
        while j < n {
            let width = LANES.min(n - j);
            let mut acc = load_block(&c_row[j..], width);

            for (&val, &k) in values.iter().zip(col_indices.iter()) {
                let a_vec = _mm256_set1_ps(val);
                let b_vec = load_block(&b[k * n + j..], width);
                acc = _mm256_fmadd_ps(a_vec, b_vec, acc);
            }

            store_block(acc, &mut c_row[j..], width);
            j += LANES;
        }
    }

    /// # Safety
    /// Requires AVX2 and FMA support, checked by the caller.
    #[target_feature(enable = "avx2", enable = "fma")]
    pub unsafe fn axpy(alpha: f32, x: &[f32], y: &mut [f32]) {
        let len = y.len();
        let alpha_vec = _mm256_set1_ps(alpha);
        let mut i = 0;

        while i + LANES <= len {
            let x_vec = _mm256_loadu_ps(x.as_ptr().add(i));
            let y_vec = _mm256_loadu_ps(y.as_ptr().add(i));
            let sum = _mm256_fmadd_ps(alpha_vec, x_vec, y_vec);
            _mm256_storeu_ps(y.as_mut_ptr().add(i), sum);
            i += LANES;
        }

        for j in i..len {
            y[j] += alpha * x[j];
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gemm_row_panel_matches_scalar() {
        // K = 3, n = 11 (exercises the partial tail)
        let k = 3;
        let n = 11;
        let a_row: Vec<f32> = (0..k).map(|v| v as f32 + 0.5).collect();
        let b: Vec<f32> = (0..k * n).map(|v| (v % 7) as f32 * 0.25).collect();

        let mut c_simd = vec![0.0f32; n];
        gemm_row_panel(&a_row, &b, n, &mut c_simd, 0, n, 0, k, true);

        let mut c_ref = vec![0.0f32; n];
        for j in 0..n {
            for kk in 0..k {
                c_ref[j] += a_row[kk] * b[kk * n + j];
            }
        }

        for j in 0..n {
            assert!((c_simd[j] - c_ref[j]).abs() < 1e-5, "mismatch at {}", j);
        }
    }

    #[test]
    fn test_gemm_row_panel_accumulates_without_zero_init() {
        let a_row = [2.0f32];
        let b = [1.0f32, 1.0, 1.0, 1.0];
        let mut c_row = [10.0f32, 20.0, 30.0, 40.0];

        gemm_row_panel(&a_row, &b, 4, &mut c_row, 0, 4, 0, 1, false);

        assert_eq!(c_row, [12.0, 22.0, 32.0, 42.0]);
    }

    #[test]
    fn test_spmm_row_matches_scalar() {
        let n = 10;
        let values = [1.5f32, -2.0, 0.5];
        let cols = [0usize, 2, 3];
        let b: Vec<f32> = (0..4 * n).map(|v| v as f32 * 0.1).collect();

        let mut c_simd = vec![0.0f32; n];
        spmm_row(&values, &cols, &b, n, &mut c_simd);

        let mut c_ref = vec![0.0f32; n];
        for (&v, &k) in values.iter().zip(cols.iter()) {
            for j in 0..n {
                c_ref[j] += v * b[k * n + j];
            }
        }

        for j in 0..n {
            assert!((c_simd[j] - c_ref[j]).abs() < 1e-5, "mismatch at {}", j);
        }
    }

    #[test]
    fn test_axpy_with_tail() {
        let x: Vec<f32> = (0..13).map(|v| v as f32).collect();
        let mut y = vec![1.0f32; 13];

        axpy(0.5, &x, &mut y);

        for (i, &v) in y.iter().enumerate() {
            assert!((v - (1.0 + 0.5 * i as f32)).abs() < 1e-6);
        }
    }
}
