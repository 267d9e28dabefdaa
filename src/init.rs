//! Weight and bias initializers shared by the generator and discriminator networks.

use tch::nn::{self, Init};
use tch::Tensor;

pub const WEIGHT_STDDEV: f64 = 0.01;
pub const BIAS_INIT: f64 = 0.1;

/// Normal(0, `WEIGHT_STDDEV`) weights truncated at two standard deviations.
///
/// Samples outside the bound are redrawn until none remain.
pub fn weight(path: &nn::Path, name: &str, dims: &[i64]) -> Tensor {
    let w = path.var(name, dims, Init::Randn { mean: 0., stdev: WEIGHT_STDDEV });
    let bound = 2. * WEIGHT_STDDEV;
    tch::no_grad(|| {
        let mut view = w.shallow_clone();
        loop {
            let outside = view.abs().ge(bound);
            if outside.any().int64_value(&[]) == 0 {
                break;
            }
            let redraw = view.randn_like() * WEIGHT_STDDEV;
            let next = redraw.where_self(&outside, &view);
            view.copy_(&next);
        }
    });
    w
}

pub fn bias(path: &nn::Path, name: &str, dims: &[i64]) -> Tensor {
    path.var(name, dims, Init::Const(BIAS_INIT))
}
