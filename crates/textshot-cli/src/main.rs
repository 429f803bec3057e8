//! textshot - pipe text in, get a PNG out

use std::process::ExitCode;

use textshot_cli::{execute, init_logging, Args};

fn main() -> ExitCode {
    let args = Args::parse_normalized();
    init_logging(&args);

    match execute(&args, std::io::stdin().lock(), |name| {
        std::env::var(name).ok()
    }) {
        Ok(outcome) => {
            log::debug!(
                "Done: {} ({}x{})",
                outcome.shot.path.display(),
                outcome.shot.width,
                outcome.shot.height
            );
            ExitCode::SUCCESS
        },
        Err(err) => {
            log::error!("{err:#}");
            ExitCode::FAILURE
        },
    }
}
