//! 1-D convolution for the encoder stem

use ndarray::{Array1, Array2, Array3};

/// 1-D convolution over `[channels, time]` input.
///
/// Weight is `[out_channels, in_channels, kernel]`. The stem uses kernel 3
/// with padding 1, stride 1 for the first conv and stride 2 for the second.
#[derive(Debug, Clone, PartialEq)]
pub struct Conv1d {
    pub weight: Array3<f32>,
    pub bias: Array1<f32>,
    pub stride: usize,
    pub padding: usize,
}

impl Conv1d {
    pub fn new(weight: Array3<f32>, bias: Array1<f32>, stride: usize, padding: usize) -> Self {
        debug_assert_eq!(weight.shape()[0], bias.len());
        Self { weight, bias, stride, padding }
    }

    pub fn in_channels(&self) -> usize {
        self.weight.shape()[1]
    }

    pub fn out_channels(&self) -> usize {
        self.weight.shape()[0]
    }

    pub fn kernel_size(&self) -> usize {
        self.weight.shape()[2]
    }

    /// Output length for an input of `len` samples.
    pub fn output_len(&self, len: usize) -> usize {
        (len + 2 * self.padding - self.kernel_size()) / self.stride + 1
    }

    /// Forward pass: `[in_channels, time]` to `[out_channels, time_out]`.
    pub fn forward(&self, x: &Array2<f32>) -> Array2<f32> {
        let (out_ch, in_ch, kernel) = (self.out_channels(), self.in_channels(), self.kernel_size());
        debug_assert_eq!(x.nrows(), in_ch);
        let t_in = x.ncols();
        let t_out = self.output_len(t_in);

        let mut out = Array2::zeros((out_ch, t_out));
        for o in 0..out_ch {
            for t in 0..t_out {
                let mut acc = self.bias[o];
                let start = (t * self.stride) as isize - self.padding as isize;
                for c in 0..in_ch {
                    for k in 0..kernel {
                        let src = start + k as isize;
                        if src >= 0 && (src as usize) < t_in {
                            acc += self.weight[[o, c, k]] * x[[c, src as usize]];
                        }
                    }
                }
                out[[o, t]] = acc;
            }
        }
        out
    }
}
