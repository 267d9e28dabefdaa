//! Error types for scale model construction and evaluation

/// Errors raised while building or evaluating a [`crate::ScaleModel`].
#[derive(thiserror::Error, Debug)]
pub enum ScaleModelError {
    /// `kernel_sizes` must have exactly one entry fewer than `conv_layer_fms`
    #[error("len(kernel_sizes) must = len(conv_layer_fms) - 1: got {kernels} kernels for {fms} feature maps")]
    KernelCountMismatch { kernels: usize, fms: usize },

    #[error("at least one convolutional layer is required")]
    NoConvLayers,

    #[error("at least one fully-connected layer size is required")]
    NoFcLayers,

    /// A configured or derived dimension is zero or negative
    #[error("non-positive dimension for {what}: {value}")]
    NonPositiveDimension { what: String, value: i64 },

    /// Flattened post-pooling feature count does not fit in an i64
    #[error("flattened feature count {height} * {width} * {channels} overflows")]
    FlattenedSizeOverflow { height: i64, width: i64, channels: i64 },

    #[error("input must be a rank-4 [batch, height, width, channels] tensor, got shape {0:?}")]
    RankMismatch(Vec<i64>),

    /// Input frame dimensions do not match the configured ones
    #[error("input shape mismatch: expected [batch, height, width, channels] = [_, {}, {}, {}], got {actual:?}", .expected[0], .expected[1], .expected[2])]
    ShapeMismatch { expected: [i64; 3], actual: Vec<i64> },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Toml(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, ScaleModelError>;
