use tch::{nn, Device, Tensor};

use crate::config::{positive, ConvLayerSpec};
use crate::error::{Result, ScaleModelError};
use crate::init;
use crate::layer_size::Padding;

/// Weight and bias of one layer.
#[derive(Debug)]
pub struct LayerParams {
    pub weight: Tensor,
    pub bias: Tensor,
}

/// Variables of one discriminator scale.
///
/// Convolution weights are laid out `[k, k, in, out]` and fully-connected
/// weights `[in, out]`. The variables live in a [`nn::VarStore`] so an
/// external optimizer can train them; the forward pass only reads them.
#[derive(Debug)]
pub struct ParameterStore {
    vs: nn::VarStore,
    padding: Padding,
    conv: Vec<LayerParams>,
    fc: Vec<LayerParams>,
}

impl ParameterStore {
    /// Allocates one weight/bias pair per layer, convolutions first, in index order.
    pub fn new(
        device: Device,
        conv_specs: &[ConvLayerSpec],
        fc_sizes: &[i64],
        padding: Padding,
    ) -> Result<ParameterStore> {
        if conv_specs.is_empty() {
            return Err(ScaleModelError::NoConvLayers);
        }
        if fc_sizes.len() < 2 {
            return Err(ScaleModelError::NoFcLayers);
        }
        for (i, spec) in conv_specs.iter().enumerate() {
            positive(&format!("conv_{i}.kernel_size"), spec.kernel_size)?;
            positive(&format!("conv_{i}.in_channels"), spec.in_channels)?;
            positive(&format!("conv_{i}.out_channels"), spec.out_channels)?;
        }
        for (i, &n) in fc_sizes.iter().enumerate() {
            positive(&format!("fc_sizes[{i}]"), n)?;
        }

        let vs = nn::VarStore::new(device);
        let root = vs.root();

        let conv_path = &root / "convolutions";
        let conv = conv_specs
            .iter()
            .enumerate()
            .map(|(i, spec)| {
                let p = &conv_path / format!("conv_{i}");
                LayerParams {
                    weight: init::weight(
                        &p,
                        "weight",
                        &[spec.kernel_size, spec.kernel_size, spec.in_channels, spec.out_channels],
                    ),
                    bias: init::bias(&p, "bias", &[spec.out_channels]),
                }
            })
            .collect();

        let fc_path = &root / "fully_connected";
        let fc = fc_sizes
            .windows(2)
            .enumerate()
            .map(|(i, dims)| {
                let p = &fc_path / format!("fc_{i}");
                LayerParams {
                    weight: init::weight(&p, "weight", &[dims[0], dims[1]]),
                    bias: init::bias(&p, "bias", &[dims[1]]),
                }
            })
            .collect();

        Ok(ParameterStore { vs, padding, conv, fc })
    }

    pub fn conv_layers(&self) -> &[LayerParams] {
        &self.conv
    }

    pub fn fc_layers(&self) -> &[LayerParams] {
        &self.fc
    }

    pub fn padding(&self) -> Padding {
        self.padding
    }

    pub fn device(&self) -> Device {
        self.vs.device()
    }

    pub fn var_store(&self) -> &nn::VarStore {
        &self.vs
    }

    /// Write access for the training side, e.g. to build an optimizer.
    pub fn var_store_mut(&mut self) -> &mut nn::VarStore {
        &mut self.vs
    }
}
