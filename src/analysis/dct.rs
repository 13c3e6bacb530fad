use std::f64::consts::PI;

use ndarray::{Array2, ArrayView2};

/// Luminance quantisation divisors for the low-frequency 4x4 corner.
pub const QUANTIZATION_4X4: [[f64; 4]; 4] = [
    [16.0, 10.0, 24.0, 51.0],
    [14.0, 16.0, 40.0, 69.0],
    [18.0, 37.0, 68.0, 103.0],
    [49.0, 78.0, 103.0, 120.0],
];

/// Largest block side that still gets quantised.
pub const QUANTIZED_MAX_BLOCK: usize = 4;

/// Type-II 2D DCT over `size x size` blocks.
///
/// The scale factors are `sqrt(1/n)` for frequency 0 and `sqrt(2/n)`
/// otherwise, where `n` is the `normalizer` given at construction. With
/// `normalizer == size` this is the orthonormal transform and [`inverse`]
/// undoes [`forward`]. Copy-move detection uses the larger image side
/// instead, which only rescales every coefficient.
///
/// [`forward`]: DctBasis::forward
/// [`inverse`]: DctBasis::inverse
#[derive(Debug, Clone)]
pub struct DctBasis {
    size: usize,
    normalizer: f64,
    /// `cosines[[k, i]] = cos((2i + 1) k pi / 2 size)`
    cosines: Array2<f64>,
}

impl DctBasis {
    pub fn new(size: usize, normalizer: usize) -> Self {
        let cosines = Array2::from_shape_fn((size, size), |(k, i)| {
            ((2.0 * i as f64 + 1.0) * k as f64 * PI / (2.0 * size as f64)).cos()
        });

        Self {
            size,
            normalizer: normalizer as f64,
            cosines,
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn alpha(&self, k: usize) -> f64 {
        if k == 0 {
            (1.0 / self.normalizer).sqrt()
        } else {
            (2.0 / self.normalizer).sqrt()
        }
    }

    /// Coefficient `(u, v)` of a block indexed `[y, x]`; `u` is the
    /// horizontal frequency, `v` the vertical one.
    pub fn coefficient(&self, block: ArrayView2<'_, f64>, u: usize, v: usize) -> f64 {
        let mut sum = 0.0;

        for x in 0..self.size {
            let cu = self.cosines[[u, x]];
            for y in 0..self.size {
                sum += cu * self.cosines[[v, y]] * block[[y, x]];
            }
        }

        sum * self.alpha(u) * self.alpha(v)
    }

    /// Full transform, indexed `[u, v]`.
    pub fn forward(&self, block: ArrayView2<'_, f64>) -> Array2<f64> {
        Array2::from_shape_fn((self.size, self.size), |(u, v)| self.coefficient(block, u, v))
    }

    /// Inverse transform back to a block indexed `[y, x]`.
    pub fn inverse(&self, coefficients: &Array2<f64>) -> Array2<f64> {
        Array2::from_shape_fn((self.size, self.size), |(y, x)| {
            let mut sum = 0.0;
            for u in 0..self.size {
                for v in 0..self.size {
                    sum += self.alpha(u)
                        * self.alpha(v)
                        * coefficients[[u, v]]
                        * self.cosines[[u, x]]
                        * self.cosines[[v, y]];
                }
            }
            sum
        })
    }
}

/// Divides coefficient `(u, v)` by the quantisation table for blocks of side
/// at most 4; larger blocks are returned unchanged.
pub fn quantize(coefficient: f64, u: usize, v: usize, block_size: usize) -> f64 {
    if block_size <= QUANTIZED_MAX_BLOCK {
        coefficient / QUANTIZATION_4X4[u][v]
    } else {
        coefficient
    }
}
