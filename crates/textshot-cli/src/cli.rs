//! CLI argument definitions using Clap v4
//!
//! The short flags keep their historical two-letter spelling (`-oD`, `-fC`,
//! ...). Clap only knows them as long flags, so argv goes through
//! [`normalize_args`] first.

use std::ffi::OsString;
use std::path::PathBuf;

use clap::{ArgAction, CommandFactory, Parser};
use textshot::fontdb::{DEFAULT_FONT_FILE, DEFAULT_FONT_URL};
use textshot::Color;

/// Render text from stdin to a PNG, optionally uploading it to S3
#[derive(Parser, Debug)]
#[command(name = "textshot")]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Output directory (default: current directory)
    #[arg(long = "oD", visible_alias = "output-dir", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Output file name without extension (default: 5 random hex characters)
    #[arg(long = "oF", visible_alias = "output-file", value_name = "NAME")]
    pub output_file: Option<String>,

    /// Upload the image to the bucket named by AWS_BUCKET_NAME
    #[arg(
        long = "uP",
        visible_alias = "upload",
        action = ArgAction::Set,
        num_args = 0..=1,
        require_equals = true,
        default_value_t = false,
        default_missing_value = "true"
    )]
    pub upload: bool,

    /// Text color as RRGGBB, `#` optional
    #[arg(
        long = "fC",
        visible_alias = "foreground",
        value_name = "HEX",
        default_value = "FFFFFF",
        value_parser = parse_color
    )]
    pub foreground: Color,

    /// Background color as RRGGBB, `#` optional
    #[arg(
        long = "bC",
        visible_alias = "background",
        value_name = "HEX",
        default_value = "181414",
        value_parser = parse_color
    )]
    pub background: Color,

    /// Where to download the font from when it is not cached
    #[arg(long, env = "TEXTSHOT_FONT_URL", default_value = DEFAULT_FONT_URL, value_name = "URL")]
    pub font_url: String,

    /// Font cache file [default: <temp dir>/LiberationMono-Regular.ttf]
    #[arg(long, env = "TEXTSHOT_FONT_CACHE", value_name = "PATH")]
    pub font_cache: Option<PathBuf>,

    /// Only log warnings and errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log every stage
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    /// Parses argv after rewriting single-dash long flags
    pub fn parse_normalized() -> Self {
        Self::parse_from(normalize_args(std::env::args_os()))
    }

    /// Resolved font cache path
    pub fn font_cache_path(&self) -> PathBuf {
        self.font_cache
            .clone()
            .unwrap_or_else(|| std::env::temp_dir().join(DEFAULT_FONT_FILE))
    }

    /// Default log filter for the chosen verbosity
    pub fn log_filter(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else if self.quiet {
            "warn"
        } else {
            "info"
        }
    }
}

fn parse_color(s: &str) -> Result<Color, String> {
    s.parse::<Color>().map_err(|e| e.to_string())
}

/// Rewrites `-oD dir` and `-oD=dir` to `--oD ...`
///
/// Only names clap knows as long flags (or their aliases) are touched,
/// and nothing after a bare `--`.
pub fn normalize_args<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let command = Args::command();
    let long_names: Vec<String> = command
        .get_arguments()
        .flat_map(|arg| {
            arg.get_long()
                .into_iter()
                .chain(arg.get_all_aliases().unwrap_or_default())
                .map(str::to_string)
                .collect::<Vec<_>>()
        })
        .collect();

    let mut passthrough = false;
    args.into_iter()
        .map(Into::into)
        .map(|arg: OsString| {
            if passthrough {
                return arg;
            }
            let Some(text) = arg.to_str() else {
                return arg;
            };
            if text == "--" {
                passthrough = true;
                return arg;
            }

            match text.strip_prefix('-') {
                Some(rest) if !rest.starts_with('-') => {
                    let name = rest.split_once('=').map_or(rest, |(name, _)| name);
                    if long_names.iter().any(|long| long == name) {
                        OsString::from(format!("-{text}"))
                    } else {
                        arg
                    }
                },
                _ => arg,
            }
        })
        .collect()
}
