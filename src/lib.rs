//! One scale of a multi-scale frame discriminator for adversarial video prediction.
//!
//! A [`ScaleModel`] runs a stack of convolutions, one 2x2 max pool and a
//! stack of fully-connected layers over NHWC frames, and returns per-frame
//! "real" scores clipped into `[0.1, 0.9]`.

pub mod config;
pub mod error;
pub mod forward;
pub mod init;
pub mod layer_size;
pub mod params;
pub mod scale_model;

pub use config::{ConvLayerSpec, ScaleModelConfig};
pub use error::{Result, ScaleModelError};
pub use layer_size::{conv_out_size, Padding, PADDING_D};
pub use params::{LayerParams, ParameterStore};
pub use scale_model::ScaleModel;
