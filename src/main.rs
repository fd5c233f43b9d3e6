//! Application entry point — interactive command loop.
//!
//! The recorder core is UI-agnostic; this binary is the thin collaborator
//! that drives it from stdin:
//!
//! ```text
//! > start        begin capturing from the microphone
//! > stop         end the capture (buffer is kept)
//! > save         write the buffer to a WAV file in the output directory
//! > state        print the current session state
//! > quit         exit
//! ```
//!
//! # Startup sequence
//!
//! 1. Initialise logging.
//! 2. Load [`RecorderConfig`] from disk (returns default on first run).
//! 3. Build the cpal backend and the [`RecorderSession`].
//! 4. Read commands line by line, draining session events between commands.

use std::io::{self, BufRead, Write};
use std::sync::mpsc;

use micrec::audio::{CpalBackend, RecorderSession, SessionEvent};
use micrec::config::RecorderConfig;

fn main() -> anyhow::Result<()> {
    // 1. Logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("micrec starting up");

    // 2. Configuration
    let config = RecorderConfig::load().unwrap_or_else(|e| {
        log::warn!("Failed to load config ({e}); using defaults");
        RecorderConfig::default()
    });
    log::info!("output directory: {}", config.output_dir.display());

    // 3. Session
    let (event_tx, event_rx) = mpsc::channel::<SessionEvent>();
    let backend = CpalBackend::new(config.input_device.clone());
    let mut session = RecorderSession::new(Box::new(backend), event_tx);

    // 4. Command loop
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    println!("micrec — commands: start, stop, save, state, quit");
    loop {
        // Surface worker-side failures before the next prompt.
        while let Ok(SessionEvent::CaptureInterrupted { message }) = event_rx.try_recv() {
            eprintln!("capture interrupted: {message}");
        }

        print!("> ");
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break; // EOF
        }

        match line.trim() {
            "start" => match session.start() {
                Ok(()) => println!("recording…"),
                Err(e) => eprintln!("error: {e}"),
            },
            "stop" => match session.stop() {
                Ok(()) => println!(
                    "stopped ({:.1}s captured)",
                    session.duration_secs()
                ),
                Err(e) => eprintln!("error: {e}"),
            },
            "save" => match session.save(&config.output_dir) {
                Ok(path) => println!("saved {}", path.display()),
                Err(e) => eprintln!("error: {e}"),
            },
            "state" => println!("{}", session.state().label()),
            "quit" | "exit" => break,
            "" => {}
            other => eprintln!("unknown command: {other}"),
        }
    }

    // An in-flight capture is stopped (not saved) on exit.
    if session.state().is_recording() {
        let _ = session.stop();
    }

    Ok(())
}
