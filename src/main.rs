use std::process::ExitCode;

use gridkeeper::config::EditorConfig;
use gridkeeper::engine::EditorBuilder;
use tracing_subscriber::EnvFilter;

fn init_tracing(debug: bool) {
    let default = if debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}

fn main() -> ExitCode {
    let config = match EditorConfig::from_args(std::env::args().skip(1)) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("gridkeeper: {e}");
            eprintln!(
                "usage: gridkeeper [--data-dir DIR] [--assets DIR] [--start-map NAME] [--ups N] [--debug] [--no-persist]"
            );
            return ExitCode::from(2);
        }
    };
    init_tracing(config.debug);

    match EditorBuilder::new(config).run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "editor stopped");
            ExitCode::FAILURE
        }
    }
}
