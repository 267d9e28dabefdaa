//! Forward pass of one discriminator scale.
//!
//! Inputs are NHWC frames. libtorch convolutions work on NCHW, so the
//! batch is permuted once on entry and back to NHWC before flattening,
//! which keeps the flattened order height, width, channel.

use tch::Tensor;

use crate::layer_size::{same_padding, Padding, POOL_SIZE};
use crate::params::ParameterStore;

pub const CLIP_MIN: f64 = 0.1;
pub const CLIP_MAX: f64 = 0.9;

/// Runs `input` (`[batch, height, width, channels]`) through the network and
/// returns `[batch, fc_out]` predictions clipped into `[CLIP_MIN, CLIP_MAX]`.
/// A prediction that turns into NaN after an f32 overflow is reported as 0.5.
///
/// Records autograd history when the parameters require gradients. Shapes
/// are not checked here; see [`crate::ScaleModel::predict`].
pub fn forward(input: &Tensor, params: &ParameterStore) -> Tensor {
    let padding = params.padding();
    let batch = input.size()[0];

    let mut xs = input.permute([0, 3, 1, 2]);
    for layer in params.conv_layers() {
        // [k, k, in, out] -> [out, in, k, k]
        let weight = layer.weight.permute([3, 2, 0, 1]);
        xs = conv2d(&xs, &weight, &layer.bias, padding).relu();
    }

    let xs = xs
        .max_pool2d(
            [POOL_SIZE, POOL_SIZE],
            [POOL_SIZE, POOL_SIZE],
            [0, 0],
            [1, 1],
            padding == Padding::Same,
        )
        .permute([0, 2, 3, 1]);
    let flat: i64 = xs.size()[1..].iter().product();
    let mut xs = xs.reshape([batch, flat]);

    let last = params.fc_layers().len() - 1;
    for (i, layer) in params.fc_layers().iter().enumerate() {
        xs = xs.matmul(&layer.weight) + &layer.bias;
        xs = if i == last { xs.sigmoid() } else { xs.relu() };
    }

    // Overflowed activations can reach here as NaN or +-inf.
    xs.nan_to_num(0.5, CLIP_MAX, CLIP_MIN).clamp(CLIP_MIN, CLIP_MAX)
}

/// [`forward`] without gradient tracking.
pub fn predict(input: &Tensor, params: &ParameterStore) -> Tensor {
    tch::no_grad(|| forward(input, params))
}

fn conv2d(xs: &Tensor, weight: &Tensor, bias: &Tensor, padding: Padding) -> Tensor {
    let xs = match padding {
        Padding::Valid => xs.shallow_clone(),
        Padding::Same => {
            let size = xs.size();
            let k = weight.size()[2];
            let (top, bottom) = same_padding(size[2], k, 1);
            let (left, right) = same_padding(size[3], k, 1);
            xs.constant_pad_nd([left, right, top, bottom])
        }
    };
    xs.conv2d(weight, Some(bias), [1, 1], [0, 0], [1, 1], 1)
}
