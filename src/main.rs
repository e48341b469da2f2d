//! Pin an existing top-level window beneath the Windows desktop icons.
//!
//! Resolves a window by its exact title, attaches it to the desktop layer via
//! the WorkerW protocol, then blocks until Ctrl+C and restores the window on
//! the way out (unless `--no-detach` is given). Attachment failure leaves the
//! target window untouched as a normal foreground window, but this host exits
//! non-zero so scripts can tell nothing happened.

use anyhow::Result;
use clap::{ArgAction, Parser};

/// Command line interface definition.
#[derive(Parser, Debug)]
#[command(
    version,
    about = concat!(
        env!("CARGO_PKG_NAME"), " v", env!("CARGO_PKG_VERSION"),
        " - Re-parent a window beneath the desktop icons so it behaves as live wallpaper.",
    )
)]
struct Cli {
    /// Exact title of the top-level window to attach.
    #[arg(long = "title")]
    title: String,
    /// Leave the window attached on exit instead of restoring it.
    #[arg(long = "no-detach")]
    no_detach: bool,
    /// Increase verbosity (-v=debug, -vv=trace). Overrides RUST_LOG.
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    verbose: u8,
    /// Quiet mode: only warnings and errors. Overrides -v and RUST_LOG.
    #[arg(short = 'q', long = "quiet")]
    quiet: bool,
}

/// Configure the tracing subscriber according to -q / -v occurrences.
fn configure_logging(cli: &Cli) {
    use tracing::Level;
    let builder = tracing_subscriber::fmt::Subscriber::builder();
    if cli.quiet {
        builder.with_max_level(Level::WARN).init();
    } else if cli.verbose > 1 {
        builder.with_max_level(Level::TRACE).init();
    } else if cli.verbose == 1 {
        builder.with_max_level(Level::DEBUG).init();
    } else {
        builder
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_max_level(Level::INFO)
            .init();
    }
}

#[cfg(windows)]
fn main() -> Result<()> {
    use std::sync::mpsc;
    use tracing::info;
    use underlay::{DesktopAttachmentController, Win32WindowSystem, resolver};

    let cli = Cli::parse();
    configure_logging(&cli);
    info!(version = env!("CARGO_PKG_VERSION"), ?cli, "starting underlay");

    let sys = Win32WindowSystem;
    let window = resolver::resolve_by_title(&sys, &cli.title)?;
    let mut controller = DesktopAttachmentController::new(sys, window);

    controller.attach();
    if !controller.is_attached() {
        anyhow::bail!("desktop attachment unavailable; window left as-is");
    }
    info!(title = %cli.title, "attached; press Ctrl+C to exit");

    // Ctrl+C fires on a handler thread; hand the signal back to this one.
    let (tx, rx) = mpsc::channel();
    ctrlc::set_handler(move || {
        let _ = tx.send(());
    })?;
    let _ = rx.recv();

    if cli.no_detach {
        info!("exiting with window still attached");
    } else {
        controller.detach();
    }
    Ok(())
}

#[cfg(not(windows))]
fn main() -> Result<()> {
    let cli = Cli::parse();
    configure_logging(&cli);
    anyhow::bail!("underlay drives the Windows shell window hierarchy and only runs on Windows");
}
