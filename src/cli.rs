use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use crate::config::{parse_subsong, Options};

/// Inspect Koei Tecmo wave banks
#[derive(Parser, Debug, Default)]
#[command(name = "wavebank")]
#[command(version)]
#[command(about = "Print subsong layout and codec setup of KWB wave banks", long_about = None)]
pub struct Cli {
    /// Bank body (.wbd, .wb2) or fused bank (.sed)
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Subsong to inspect, starting at 1
    #[arg(short, long, value_name = "N")]
    pub subsong: Option<String>,

    /// Header file to use instead of the companion next to FILE
    #[arg(long, value_name = "FILE")]
    pub header: Option<PathBuf>,

    /// Print every subsong
    #[arg(short, long)]
    pub all: bool,

    /// Configuration file (key = value)
    #[arg(short, long, value_name = "CONFIG")]
    pub config: Option<PathBuf>,

    /// More logging (repeatable)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Merge CLI arguments into the options struct
    pub fn merge_into_options(&self, mut opts: Options) -> Result<Options> {
        if let Some(ref subsong) = self.subsong {
            opts.subsong = Some(parse_subsong(subsong)?);
        }

        if let Some(ref header) = self.header {
            opts.header_path = Some(header.clone());
        }

        if self.all {
            opts.list_all = true;
        }

        opts.log_level = opts.log_level.raised(self.verbose);

        Ok(opts)
    }
}
