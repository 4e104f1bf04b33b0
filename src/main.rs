//! Entry point of the `ts-catalog` command-line tool.

use std::io::{
    self,
    Write,
};
use std::path::Path;
use std::process::ExitCode;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use ts_catalog::cli::{
    self,
    Opts,
};

#[tokio::main]
async fn main() -> ExitCode {
    let opts = match Opts::parse_from_args(std::env::args().skip(1)) {
        Ok(opts) => opts,
        Err(e) => {
            report_error(&e);
            return ExitCode::from(2);
        }
    };

    // Flushes the log file on drop.
    let _guard = init_tracing(opts.log_file.as_deref());

    let mut stdout = io::stdout().lock();
    match cli::run(&opts.command, &mut stdout).await {
        Ok(status) => status.into(),
        Err(e) => {
            tracing::error!("{e}");
            report_error(&e);
            ExitCode::FAILURE
        }
    }
}

/// Log to `log_file` when given, to stderr otherwise.
fn init_tracing(log_file: Option<&Path>) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_env(cli::LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));

    let Some(log_file) = log_file else {
        tracing_subscriber::fmt().with_env_filter(filter).with_writer(io::stderr).init();
        return None;
    };

    let directory = log_file.parent().filter(|dir| !dir.as_os_str().is_empty()).unwrap_or(Path::new("."));
    let file_name = log_file.file_name().unwrap_or(log_file.as_os_str());
    let appender = tracing_appender::rolling::never(directory, file_name);
    let (writer, guard) = tracing_appender::non_blocking(appender);
    tracing_subscriber::fmt().with_env_filter(filter).with_ansi(false).with_writer(writer).init();
    Some(guard)
}

/// Print an error on stderr.
fn report_error(error: &cli::CliError) {
    let mut stderr = io::stderr().lock();
    // Nothing left to do when stderr is gone.
    let _ = writeln!(stderr, "ts-catalog: {error}");
}
