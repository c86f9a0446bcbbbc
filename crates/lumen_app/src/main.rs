use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use log::LevelFilter;
use lumen_logging::lumen_error;

mod platform;

/// Lumen - translation and background removal from the terminal
#[derive(Parser)]
#[command(name = "lumen_app")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the RON config file
    #[arg(long, global = true, default_value = platform::CONFIG_FILENAME)]
    config: PathBuf,

    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Translate text, loading the translator on first use
    Translate {
        /// Text to translate [default: "I love walking my dog."]
        #[arg(long)]
        text: Option<String>,
        /// Source language tag [default: eng_Latn]
        #[arg(long)]
        src: Option<String>,
        /// Target language tag [default: fra_Latn]
        #[arg(long)]
        tgt: Option<String>,
    },
    /// Remove image backgrounds and write images.zip
    RemoveBackground {
        /// PNG or JPEG files, processed in the given order
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// Output directory (defaults to the configured one)
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let config = platform::load_config(&cli.config);

    let level = match cli.verbose {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    lumen_logging::initialize(config.log_destination, level, &config.log_file);

    let result = match cli.command {
        Commands::Translate { text, src, tgt } => platform::run_translate(
            &config,
            platform::TranslateOptions {
                text,
                src_lang: src,
                tgt_lang: tgt,
            },
        ),
        Commands::RemoveBackground { files, out } => {
            platform::run_remove_background(&config, &files, out).map(|summary| {
                println!("{}", summary.archive_path.display());
            })
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            lumen_error!("{:#}", err);
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
