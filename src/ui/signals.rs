use crate::error::{ConverterError, Result};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Cancellation flag shared by the converters of one run.
#[derive(Debug, Clone)]
pub struct GracefulShutdown {
    running: Arc<AtomicBool>,
    shutdown_message_shown: Arc<AtomicBool>,
}

impl GracefulShutdown {
    /// Installs the Ctrl+C handler. Can only succeed once per process.
    pub fn new() -> Result<Self> {
        let shutdown = Self::detached();
        let handle = shutdown.clone();

        ctrlc::set_handler(move || {
            handle.request_shutdown();

            if !handle.shutdown_message_shown.swap(true, Ordering::SeqCst) {
                eprintln!("\nStopping after the current container... (press Ctrl+C again to force exit)");
            } else {
                eprintln!("\nForce stopping...");
                std::process::exit(1);
            }
        })
        .map_err(|e| {
            ConverterError::Io(std::io::Error::new(
                std::io::ErrorKind::Other,
                format!("Failed to set signal handler: {}", e),
            ))
        })?;

        Ok(shutdown)
    }

    /// A flag with no signal handler attached, driven by `request_shutdown`.
    pub fn detached() -> Self {
        Self {
            running: Arc::new(AtomicBool::new(true)),
            shutdown_message_shown: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    pub fn check_shutdown(&self) -> Result<()> {
        if !self.is_running() {
            return Err(ConverterError::Cancelled);
        }
        Ok(())
    }

    pub fn request_shutdown(&self) {
        self.running.store(false, Ordering::SeqCst);
    }
}

impl Default for GracefulShutdown {
    fn default() -> Self {
        Self::detached()
    }
}
