//! # gdc
//!
//! Writes, reads and dumps container files.
//!
//! ```text
//! gdc write sample.gdc --channels 12
//! gdc read sample.gdc
//! gdc dump sample.gdc
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use guidata_demos::{dump, read_acquisition, sample_acquisition, write_acquisition};
use guidata_store::{Format, StoreError};

/// Container file demo tool.
#[derive(Parser, Debug)]
#[command(name = "gdc", about = "guidata container demo", version)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write a sample acquisition.
    Write {
        path: PathBuf,

        /// Number of channels to generate.
        #[arg(long, default_value = "6")]
        channels: usize,

        /// Payload encoding.
        #[arg(long, default_value = "bincode", value_enum)]
        format: CliFormat,
    },
    /// Read a sample acquisition back and summarize it.
    Read { path: PathBuf },
    /// Print the container tree of a file.
    Dump { path: PathBuf },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum CliFormat {
    Ron,
    Bincode,
    #[cfg(feature = "hdf5")]
    Hdf5,
}

impl From<CliFormat> for Format {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Ron => Format::Ron,
            CliFormat::Bincode => Format::Bincode,
            #[cfg(feature = "hdf5")]
            CliFormat::Hdf5 => Format::Hdf5,
        }
    }
}

fn run(args: Args) -> Result<(), StoreError> {
    match args.command {
        Command::Write {
            path,
            channels,
            format,
        } => {
            write_acquisition(&path, format.into(), &sample_acquisition(channels))?;
            println!("Wrote {channels} channels to {}", path.display());
        }
        Command::Read { path } => {
            let acquisition = read_acquisition(&path)?;
            println!("{}", acquisition.title);
            println!("  operator: {}", acquisition.operator.as_deref().unwrap_or("-"));
            println!("  tags: {}", acquisition.tags.join(", "));
            match &acquisition.channels {
                Some(channels) => {
                    for (idx, channel) in channels.iter().enumerate() {
                        match channel {
                            Some(c) => println!(
                                "  [{idx}] {} gain={} unit={} samples={}",
                                c.label,
                                c.gain,
                                c.unit.as_deref().unwrap_or("-"),
                                c.samples.len()
                            ),
                            None => println!("  [{idx}] (absent)"),
                        }
                    }
                }
                None => println!("  no channels"),
            }
        }
        Command::Dump { path } => print!("{}", dump(&path)?),
    }
    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    log::debug!("gdc {}", guidata_demos::VERSION);

    match run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
