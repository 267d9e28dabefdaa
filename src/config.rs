use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, ScaleModelError};
use crate::layer_size::Padding;

/// Layout of one discriminator scale.
///
/// `conv_layer_fms[0]` is the channel count of the input frames and each
/// following entry is the output feature maps of one convolution, so
/// `kernel_sizes` holds one entry fewer. `fc_layer_sizes` lists the
/// fully-connected widths after the flattened convolution output and ends
/// with the prediction width (normally 1).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScaleModelConfig {
    pub scale_index: usize,
    pub height: i64,
    pub width: i64,
    pub conv_layer_fms: Vec<i64>,
    pub kernel_sizes: Vec<i64>,
    pub fc_layer_sizes: Vec<i64>,
    #[serde(default)]
    pub padding: Padding,
}

/// One convolution of the stack, resolved from the config.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConvLayerSpec {
    pub kernel_size: i64,
    pub in_channels: i64,
    pub out_channels: i64,
}

impl ScaleModelConfig {
    pub fn from_toml_str(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Checks the structural invariants and every user-supplied dimension.
    pub fn validate(&self) -> Result<()> {
        if self.conv_layer_fms.len() != self.kernel_sizes.len() + 1 {
            return Err(ScaleModelError::KernelCountMismatch {
                kernels: self.kernel_sizes.len(),
                fms: self.conv_layer_fms.len(),
            });
        }
        if self.kernel_sizes.is_empty() {
            return Err(ScaleModelError::NoConvLayers);
        }
        if self.fc_layer_sizes.is_empty() {
            return Err(ScaleModelError::NoFcLayers);
        }

        positive("height", self.height)?;
        positive("width", self.width)?;
        for (i, &fm) in self.conv_layer_fms.iter().enumerate() {
            positive(&format!("conv_layer_fms[{i}]"), fm)?;
        }
        for (i, &k) in self.kernel_sizes.iter().enumerate() {
            positive(&format!("kernel_sizes[{i}]"), k)?;
        }
        for (i, &n) in self.fc_layer_sizes.iter().enumerate() {
            positive(&format!("fc_layer_sizes[{i}]"), n)?;
        }
        Ok(())
    }

    /// Per-layer convolution shapes. Assumes [`Self::validate`] passed.
    pub fn conv_specs(&self) -> Vec<ConvLayerSpec> {
        self.kernel_sizes
            .iter()
            .zip(self.conv_layer_fms.windows(2))
            .map(|(&kernel_size, fms)| ConvLayerSpec {
                kernel_size,
                in_channels: fms[0],
                out_channels: fms[1],
            })
            .collect()
    }

    pub fn input_channels(&self) -> i64 {
        self.conv_layer_fms[0]
    }
}

pub(crate) fn positive(what: &str, value: i64) -> Result<()> {
    if value <= 0 {
        return Err(ScaleModelError::NonPositiveDimension {
            what: what.to_string(),
            value,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference() -> ScaleModelConfig {
        ScaleModelConfig {
            scale_index: 0,
            height: 64,
            width: 64,
            conv_layer_fms: vec![3, 8, 16],
            kernel_sizes: vec![3, 3],
            fc_layer_sizes: vec![1],
            padding: Padding::Valid,
        }
    }

    #[test]
    fn conv_specs_chain_feature_maps() {
        let specs = reference().conv_specs();
        assert_eq!(
            specs,
            vec![
                ConvLayerSpec { kernel_size: 3, in_channels: 3, out_channels: 8 },
                ConvLayerSpec { kernel_size: 3, in_channels: 8, out_channels: 16 },
            ]
        );
    }

    #[test]
    fn kernel_count_mismatch_is_rejected() {
        let mut cfg = reference();
        cfg.kernel_sizes.push(5);
        assert!(matches!(
            cfg.validate(),
            Err(ScaleModelError::KernelCountMismatch { kernels: 3, fms: 3 })
        ));
    }

    #[test]
    fn zero_kernel_is_rejected() {
        let mut cfg = reference();
        cfg.kernel_sizes[1] = 0;
        match cfg.validate() {
            Err(ScaleModelError::NonPositiveDimension { what, value }) => {
                assert_eq!(what, "kernel_sizes[1]");
                assert_eq!(value, 0);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn empty_fc_sizes_are_rejected() {
        let mut cfg = reference();
        cfg.fc_layer_sizes.clear();
        assert!(matches!(cfg.validate(), Err(ScaleModelError::NoFcLayers)));
    }

    #[test]
    fn parses_toml_with_default_padding() {
        let cfg = ScaleModelConfig::from_toml_str(
            r#"
            scale_index = 0
            height = 64
            width = 64
            conv_layer_fms = [3, 8, 16]
            kernel_sizes = [3, 3]
            fc_layer_sizes = [1]
            "#,
        )
        .unwrap();
        assert_eq!(cfg, reference());
    }
}
