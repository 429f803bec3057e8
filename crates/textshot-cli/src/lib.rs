//! Command-line interface for textshot
//!
//! The `textshot` binary reads stdin, renders it, writes a PNG and
//! optionally uploads it. Argument parsing lives in [`cli`]; [`execute`]
//! runs one invocation and is what `main.rs` calls.

pub mod cli;

use std::io::Read;

use anyhow::{Context, Result};
use textshot::export::{OsRngNames, OutputTarget};
use textshot::fontdb::{FontProvisioner, FontSource};
use textshot::upload::{ObjectStore, S3Store, UploadConfig};
use textshot::{input, Job, LayoutParams, Outcome, RenderParams};

pub use cli::{normalize_args, Args};

/// Sets up `env_logger`; `RUST_LOG` still overrides the default filter
pub fn init_logging(args: &Args) {
    let env = env_logger::Env::default().default_filter_or(args.log_filter());
    // A logger may already be installed when embedded in tests
    let _ = env_logger::Builder::from_env(env)
        .format_timestamp(None)
        .try_init();
}

/// Runs one invocation
///
/// `env` answers environment lookups for the upload settings. They are
/// checked before stdin is read, so a missing variable fails fast.
pub fn execute<R, E>(args: &Args, input: R, env: E) -> Result<Outcome>
where
    R: Read,
    E: Fn(&str) -> Option<String>,
{
    let store = if args.upload {
        let config = UploadConfig::from_lookup(env).context("upload requested")?;
        Some(S3Store::new(&config).context("upload requested")?)
    } else {
        None
    };

    let text = input::read_input(input).context("failed to read stdin")?;

    let fonts = FontProvisioner::new(FontSource {
        url: args.font_url.clone(),
        cache_path: args.font_cache_path(),
    });

    let job = Job {
        text,
        layout: LayoutParams::default(),
        colors: RenderParams {
            foreground: args.foreground,
            background: args.background,
        },
        output: OutputTarget::new(args.output_dir.clone(), args.output_file.clone()),
    };

    let outcome = textshot::run(
        &job,
        &fonts,
        &mut OsRngNames::default(),
        store.as_ref().map(|store| store as &dyn ObjectStore),
    )?;
    Ok(outcome)
}
