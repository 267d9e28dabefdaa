use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use log::info;
use rand::{thread_rng, Rng};
use tch::{Device, Kind, Tensor};

use d_scale_model::{Padding, ScaleModel, ScaleModelConfig};

#[derive(Parser, Debug)]
#[command(version, about = "Single-scale frame discriminator.", long_about = None)]
struct Args {
    /// TOML file with the scale layout. Defaults to a 64x64, two-conv scale.
    #[arg(short, long)]
    config: Option<PathBuf>,
    #[arg(long, default_value_t = 4, value_parser = clap::value_parser!(i64).range(1..))]
    batch_size: i64,
    #[arg(short, long)]
    seed: Option<i64>,
    /// Feed all-zero frames instead of uniform noise
    #[arg(short, long, default_value_t = false)]
    zeros: bool,
    #[arg(long, default_value_t = false)]
    cpu: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let device = if args.cpu { Device::Cpu } else { Device::cuda_if_available() };
    info!("Use Device: {device:?}");

    let seed = args.seed.unwrap_or_else(|| thread_rng().gen_range(0..i64::MAX));
    tch::manual_seed(seed);
    info!("Seed: {seed}");

    let config = match &args.config {
        Some(path) => {
            info!("Config: {}", path.display());
            ScaleModelConfig::load(path)?
        }
        None => default_config(),
    };

    let model = ScaleModel::build_on(config, device)?;
    let cfg = model.config();
    info!("Scale: {}", cfg.scale_index);
    info!("Input: {}x{}x{}", cfg.height, cfg.width, cfg.input_channels());
    info!("Padding: {:?}", cfg.padding);
    for (i, spec) in model.conv_specs().iter().enumerate() {
        info!(
            "Conv {}: {}x{} {} -> {}",
            i, spec.kernel_size, spec.kernel_size, spec.in_channels, spec.out_channels
        );
    }
    info!("Pooled: {:?}", model.pooled_dims());
    info!("FC sizes: {:?}", model.derived_fc_sizes());

    let shape = [args.batch_size, cfg.height, cfg.width, cfg.input_channels()];
    let frames = if args.zeros {
        Tensor::zeros(shape, (Kind::Float, device))
    } else {
        Tensor::rand(shape, (Kind::Float, device))
    };

    let preds = model.predict(&frames)?.to_device(Device::Cpu);
    for i in 0..args.batch_size {
        println!("{}: {:.6}", i, preds.double_value(&[i, 0]));
    }

    Ok(())
}

fn default_config() -> ScaleModelConfig {
    ScaleModelConfig {
        scale_index: 0,
        height: 64,
        width: 64,
        conv_layer_fms: vec![3, 8, 16],
        kernel_sizes: vec![3, 3],
        fc_layer_sizes: vec![1],
        padding: Padding::default(),
    }
}
