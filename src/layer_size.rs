//! Spatial size arithmetic shared by every convolutional component.

use serde::{Deserialize, Serialize};

/// Padding rule for convolutions and pooling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Padding {
    /// No padding; each convolution shrinks the input by `kernel - 1`.
    #[serde(rename = "VALID", alias = "valid")]
    Valid,
    /// Zero padding so that a stride-1 convolution keeps the input size.
    #[serde(rename = "SAME", alias = "same")]
    Same,
}

/// Padding policy used by the discriminator's convolution and pooling steps.
pub const PADDING_D: Padding = Padding::Valid;

impl Default for Padding {
    fn default() -> Self {
        PADDING_D
    }
}

/// Window and stride of the single pooling step after the convolutions.
pub const POOL_SIZE: i64 = 2;

/// Output size of a convolution along one spatial axis.
///
/// A `Valid` window that does not fit yields `0`. `stride` must be at least 1.
pub fn conv_out_size(input: i64, padding: Padding, kernel_size: i64, stride: i64) -> i64 {
    debug_assert!(stride >= 1, "stride must be >= 1, got {stride}");
    match padding {
        Padding::Valid => {
            if input < kernel_size {
                0
            } else {
                (input - kernel_size) / stride + 1
            }
        }
        Padding::Same => (input + stride - 1) / stride,
    }
}

/// Output size of the 2x2, stride-2 pooling step along one spatial axis.
pub fn pool_out_size(input: i64, padding: Padding) -> i64 {
    conv_out_size(input, padding, POOL_SIZE, POOL_SIZE)
}

/// Zero padding `(before, after)` that makes a `Same` convolution produce
/// `conv_out_size(input, Same, kernel_size, stride)` outputs.
pub fn same_padding(input: i64, kernel_size: i64, stride: i64) -> (i64, i64) {
    let out = conv_out_size(input, Padding::Same, kernel_size, stride);
    let total = ((out - 1) * stride + kernel_size - input).max(0);
    (total / 2, total - total / 2)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_shrinks_by_kernel_minus_one() {
        assert_eq!(conv_out_size(64, Padding::Valid, 3, 1), 62);
        assert_eq!(conv_out_size(64, Padding::Valid, 1, 1), 64);
        assert_eq!(conv_out_size(5, Padding::Valid, 5, 1), 1);
    }

    #[test]
    fn valid_window_larger_than_input_is_empty() {
        assert_eq!(conv_out_size(2, Padding::Valid, 3, 1), 0);
        assert_eq!(conv_out_size(2, Padding::Valid, 3, 2), 0);
    }

    #[test]
    fn same_preserves_size_at_stride_one() {
        for k in 1..8 {
            assert_eq!(conv_out_size(17, Padding::Same, k, 1), 17);
        }
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "stride must be >= 1")]
    fn zero_stride_is_rejected() {
        conv_out_size(8, Padding::Valid, 3, 0);
    }

    #[test]
    fn pooling_halves() {
        assert_eq!(pool_out_size(60, Padding::Valid), 30);
        assert_eq!(pool_out_size(61, Padding::Valid), 30);
        assert_eq!(pool_out_size(61, Padding::Same), 31);
        assert_eq!(pool_out_size(1, Padding::Valid), 0);
    }

    #[test]
    fn same_padding_splits_extra_after() {
        assert_eq!(same_padding(10, 3, 1), (1, 1));
        assert_eq!(same_padding(10, 4, 1), (1, 2));
        assert_eq!(same_padding(10, 1, 1), (0, 0));
    }

    #[test]
    fn padding_parses_tensorflow_names() {
        #[derive(Deserialize)]
        struct Wrap {
            padding: Padding,
        }
        let w: Wrap = toml::from_str("padding = \"SAME\"").unwrap();
        assert_eq!(w.padding, Padding::Same);
        let w: Wrap = toml::from_str("padding = \"valid\"").unwrap();
        assert_eq!(w.padding, Padding::Valid);
    }
}
