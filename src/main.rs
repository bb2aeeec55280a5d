use std::process;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;

use wpctl::app::App;
use wpctl::config::{Cli, Credentials, PASSWORD_VAR, USER_VAR};
use wpctl::gateway::ApiClient;

fn main() {
    let cli = Cli::parse();
    let _log_guard = init_logging(&cli);

    let credentials = match Credentials::from_env() {
        Ok(credentials) => credentials,
        Err(e) => {
            eprintln!("wpctl: {}", e);
            eprintln!("Set {} and {} before running.", USER_VAR, PASSWORD_VAR);
            process::exit(1);
        }
    };

    // SIGTERM/SIGHUP flip a flag observed by the key-poll loop, so the
    // terminal is restored before exit. Ctrl+C arrives as a key event in
    // raw mode and is handled there.
    let shutdown = Arc::new(AtomicBool::new(false));
    for signal in [signal_hook::consts::SIGTERM, signal_hook::consts::SIGHUP] {
        let _ = signal_hook::flag::register(signal, Arc::clone(&shutdown));
    }

    let rt = Arc::new(
        tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .worker_threads(2)
            .build()
            .expect("Failed to create tokio runtime"),
    );

    let gateway = ApiClient::new(&cli.api_url, credentials);
    let mut app = App::new(rt, Box::new(gateway), shutdown);

    match app.run() {
        Ok(()) => println!("Goodbye!"),
        Err(e) => {
            wpctl::app::restore_terminal();
            error!(error = %e, "fatal error");
            eprintln!("wpctl: {}", e);
            process::exit(1);
        }
    }
}

/// Log to a file; stdout belongs to the UI. The guard must outlive main so
/// buffered lines are flushed.
fn init_logging(cli: &Cli) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let path = cli.log_path();
    let dir = path.parent()?.to_path_buf();
    let file_name = path.file_name()?.to_os_string();

    let appender = tracing_appender::rolling::never(dir, file_name);
    let (writer, guard) = tracing_appender::non_blocking(appender);
    let filter =
        EnvFilter::try_from_env("WPCTL_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .init();
    Some(guard)
}
