use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use dominant::{Error, Palette};

#[derive(Parser)]
#[command(name = "dominant")]
#[command(about = "Print the dominant colors of an image as hex codes")]
struct Cli {
    /// Image file to scan (PNG, JPEG, GIF or BMP)
    image: PathBuf,

    /// Log more details to stderr (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbose: u8) -> anyhow::Result<()> {
    let default = match verbose {
        0 => "warn",
        1 => "dominant=debug",
        _ => "dominant=trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init()?;
    Ok(())
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    init_logging(cli.verbose)?;

    match Palette::from_path(&cli.image) {
        Ok(palette) => {
            println!("{}", palette);
            Ok(ExitCode::SUCCESS)
        }
        Err(error @ Error::MissingFile(_)) => {
            println!("{}", error);
            Ok(ExitCode::FAILURE)
        }
        Err(error) => {
            tracing::debug!(?error, "Palette extraction failed");
            println!("Error: {}", error);
            Ok(ExitCode::FAILURE)
        }
    }
}
