use anyhow::{Context, Result};
use clap::Parser;

use wavebank::config;
use wavebank::logging;
use wavebank::sound::kwb::{
    open_split, open_wavebank, parse_wavebank, CodecConfig, ContainerHandle, StreamDescriptor,
    StreamSetup,
};
use wavebank::Cli;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let options = config::load_config(cli.config.as_deref())?;
    let options = cli.merge_into_options(options)?;
    logging::init(options.log_level);

    let files = match &options.header_path {
        Some(header) => open_split(header, &cli.file),
        None => open_wavebank(&cli.file),
    }
    .with_context(|| format!("Failed to open {}", cli.file.display()))?;
    let container = files.container();

    let first = parse_wavebank(&container, options.subsong.unwrap_or(1))
        .with_context(|| format!("Failed to parse {}", cli.file.display()))?;
    println!("{}: {} subsongs", cli.file.display(), first.total_subsongs);

    if !options.list_all {
        return print_subsong(&container, &first);
    }

    for target in 1..=first.total_subsongs {
        let result = parse_wavebank(&container, target)
            .map_err(anyhow::Error::from)
            .and_then(|desc| print_subsong(&container, &desc));
        if let Err(err) = result {
            log::warn!("Subsong {}: {:#}", target, err);
        }
    }
    Ok(())
}

fn print_subsong(container: &ContainerHandle<'_>, desc: &StreamDescriptor) -> Result<()> {
    let setup = StreamSetup::resolve(desc, container.header, container.body)
        .with_context(|| format!("Failed to set up subsong {}", desc.target_subsong))?;

    println!("subsong {}/{}:", desc.target_subsong, desc.total_subsongs);
    println!("  codec:       {}", setup.codec.name());
    println!("  channels:    {}", setup.channels);
    println!("  sample rate: {}", setup.sample_rate);
    println!(
        "  samples:     {} ({:.3}s)",
        setup.num_samples,
        setup.num_samples as f64 / f64::from(setup.sample_rate.max(1))
    );
    println!("  offset:      0x{:x}", setup.stream_offset);
    println!("  size:        0x{:x}", setup.stream_size);
    println!("  byte order:  {:?}", desc.endian);
    match &setup.codec {
        CodecConfig::Pcm16 { interleave } => println!("  interleave:  0x{:x}", interleave),
        CodecConfig::MsAdpcm { frame_size } => println!("  frame size:  0x{:x}", frame_size),
        CodecConfig::NgcDsp { coefs, hist, .. } => {
            println!("  coefs:       {:?}", coefs);
            println!("  history:     {:?}", hist);
        }
        CodecConfig::Atrac9(cfg) => {
            println!("  config:      0x{:08x}", cfg.config_data);
            println!(
                "  superframe:  0x{:x} bytes, {} samples",
                cfg.superframe_bytes, cfg.superframe_samples
            );
        }
    }
    Ok(())
}
