use crate::errors::FilterError;
use std::borrow::Cow;

/// Horizontal gradient (responds to intensity rising left to right).
pub const SOBEL_X: Kernel = Kernel::fixed3(&[-1, 0, 1, -2, 0, 2, -1, 0, 1]);

/// Vertical gradient (responds to intensity rising top to bottom).
pub const SOBEL_Y: Kernel = Kernel::fixed3(&[-1, -2, -1, 0, 0, 0, 1, 2, 1]);

/// Odd-sized square matrix of integer weights, stored row-major.
///
/// Kernels are never mutated after construction, so one instance can be read
/// by every worker at once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Kernel {
    size: usize,
    weights: Cow<'static, [i32]>,
}

impl Kernel {
    /// Build a kernel from row-major weights.
    pub fn new(size: usize, weights: Vec<i32>) -> Result<Self, FilterError> {
        if size.is_multiple_of(2) || weights.len() != size * size {
            return Err(FilterError::InvalidKernel {
                size,
                weights: weights.len(),
            });
        }
        Ok(Self {
            size,
            weights: Cow::Owned(weights),
        })
    }

    const fn fixed3(weights: &'static [i32; 9]) -> Self {
        Self {
            size: 3,
            weights: Cow::Borrowed(weights),
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Distance from the centre cell to the edge of the kernel.
    pub fn radius(&self) -> usize {
        self.size / 2
    }

    #[inline]
    pub fn weight(&self, kx: usize, ky: usize) -> i32 {
        self.weights[ky * self.size + kx]
    }

    /// Sum of the weights, or 1 for zero-sum kernels such as Sobel.
    pub fn divisor(&self) -> i32 {
        match self.weights.iter().sum::<i32>() {
            0 => 1,
            sum => sum,
        }
    }
}
