use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use nightconv::api::OutputFormat;
use nightconv::config::{DEFAULT_PITCH_SCALER, DEFAULT_TEMPO_SCALER};

#[derive(Parser, Debug)]
#[command(name = "nightconv", about = "Convert audio to nightcore with a nightconv server")]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Upload a file and wait for the converted result
    Convert {
        path: PathBuf,

        /// Output format (ogg or m4a)
        #[arg(long, default_value = "ogg", value_parser = parse_format)]
        format: OutputFormat,

        #[arg(long, default_value_t = DEFAULT_PITCH_SCALER)]
        pitch: f64,

        #[arg(long, default_value_t = DEFAULT_TEMPO_SCALER)]
        tempo: f64,

        /// Save the converted file into this directory
        #[arg(long)]
        download: Option<PathBuf>,
    },
    /// Show metadata for a stored file
    Info { file_id: String },
    /// List recently converted files
    Recents,
}

fn parse_format(s: &str) -> Result<OutputFormat, String> {
    s.parse().map_err(|e: nightconv::ConversionError| e.to_string())
}

/// Where a download lands inside `dir`. The name comes from the server, so
/// only its final component is kept; anything with `..` falls back to
/// `<file_id>.<format>`.
pub fn download_target(dir: &Path, filename: &str, file_id: &str, format: OutputFormat) -> PathBuf {
    let name = if filename.contains("..") || filename.contains('\\') {
        None
    } else {
        Path::new(filename)
            .file_name()
            .and_then(|n| n.to_str())
            .map(str::to_string)
    };

    dir.join(name.unwrap_or_else(|| format!("{}.{}", safe_stem(file_id), format)))
}

fn safe_stem(file_id: &str) -> String {
    let stem: String = file_id
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();
    if stem.is_empty() {
        "download".to_string()
    } else {
        stem
    }
}
