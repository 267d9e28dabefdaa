use log::{debug, trace};
use tch::{nn, Device, Kind, Tensor};

use crate::config::{positive, ConvLayerSpec, ScaleModelConfig};
use crate::error::{Result, ScaleModelError};
use crate::forward;
use crate::layer_size::{conv_out_size, pool_out_size};
use crate::params::ParameterStore;

/// One scale of the multi-scale frame discriminator.
///
/// Takes a batch of frames and predicts, per frame, how likely it is to be
/// real rather than generated, as a value in `[0.1, 0.9]`. All shapes are
/// derived and all parameters allocated when the model is built.
#[derive(Debug)]
pub struct ScaleModel {
    config: ScaleModelConfig,
    conv_specs: Vec<ConvLayerSpec>,
    pooled_dims: (i64, i64),
    fc_sizes: Vec<i64>,
    params: ParameterStore,
}

impl ScaleModel {
    pub fn build(config: ScaleModelConfig) -> Result<ScaleModel> {
        ScaleModel::build_on(config, Device::Cpu)
    }

    pub fn build_on(config: ScaleModelConfig, device: Device) -> Result<ScaleModel> {
        config.validate()?;
        let conv_specs = config.conv_specs();

        let mut height = config.height;
        let mut width = config.width;
        for (i, spec) in conv_specs.iter().enumerate() {
            height = conv_out_size(height, config.padding, spec.kernel_size, 1);
            width = conv_out_size(width, config.padding, spec.kernel_size, 1);
            positive(&format!("conv_{i} output height"), height)?;
            positive(&format!("conv_{i} output width"), width)?;
        }
        let pooled_dims = (
            pool_out_size(height, config.padding),
            pool_out_size(width, config.padding),
        );
        positive("pooled height", pooled_dims.0)?;
        positive("pooled width", pooled_dims.1)?;

        let out_channels = conv_specs.last().map_or(0, |spec| spec.out_channels);
        let flattened = pooled_dims
            .0
            .checked_mul(pooled_dims.1)
            .and_then(|n| n.checked_mul(out_channels))
            .ok_or_else(|| ScaleModelError::FlattenedSizeOverflow {
                height: pooled_dims.0,
                width: pooled_dims.1,
                channels: out_channels,
            })?;
        positive("flattened features", flattened)?;
        let fc_sizes: Vec<i64> = std::iter::once(flattened)
            .chain(config.fc_layer_sizes.iter().copied())
            .collect();

        let params = ParameterStore::new(device, &conv_specs, &fc_sizes, config.padding)?;
        debug!(
            "scale {}: {}x{} -> conv {}x{} -> pool {}x{}, fc sizes {:?}",
            config.scale_index, config.height, config.width, height, width, pooled_dims.0, pooled_dims.1, fc_sizes
        );

        Ok(ScaleModel {
            config,
            conv_specs,
            pooled_dims,
            fc_sizes,
            params,
        })
    }

    /// Predictions for a `[batch, height, width, channels]` batch of frames.
    ///
    /// Returns `[batch, 1]` for the usual `fc_layer_sizes` ending in 1. The
    /// input is moved to the model's device and converted to `f32`.
    pub fn predict(&self, frames: &Tensor) -> Result<Tensor> {
        let size = frames.size();
        if size.len() != 4 {
            return Err(ScaleModelError::RankMismatch(size));
        }
        let expected = [self.config.height, self.config.width, self.config.input_channels()];
        if size[1..] != expected {
            return Err(ScaleModelError::ShapeMismatch { expected, actual: size });
        }
        trace!("scale {}: predict on batch of {}", self.config.scale_index, size[0]);

        let frames = frames.to_device(self.params.device()).to_kind(Kind::Float);
        Ok(forward::predict(&frames, &self.params))
    }

    pub fn config(&self) -> &ScaleModelConfig {
        &self.config
    }

    pub fn scale_index(&self) -> usize {
        self.config.scale_index
    }

    pub fn conv_specs(&self) -> &[ConvLayerSpec] {
        &self.conv_specs
    }

    /// Spatial size after the convolution stack and the pooling step.
    pub fn pooled_dims(&self) -> (i64, i64) {
        self.pooled_dims
    }

    /// Fully-connected widths, starting with the flattened pooled features.
    pub fn derived_fc_sizes(&self) -> &[i64] {
        &self.fc_sizes
    }

    pub fn params(&self) -> &ParameterStore {
        &self.params
    }

    pub fn params_mut(&mut self) -> &mut ParameterStore {
        &mut self.params
    }
}

impl nn::Module for ScaleModel {
    fn forward(&self, xs: &Tensor) -> Tensor {
        forward::forward(xs, &self.params)
    }
}
