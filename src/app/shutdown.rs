//! Graceful shutdown handling for the runners.

use anyhow::Result;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shared stop flag plus what to do on the way out.
#[derive(Clone)]
pub struct ShutdownManager {
    shutdown_requested: Arc<AtomicBool>,
    save_on_exit: bool,
}

impl Default for ShutdownManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ShutdownManager {
    pub fn new() -> Self {
        Self {
            shutdown_requested: Arc::new(AtomicBool::new(false)),
            save_on_exit: true,
        }
    }

    pub fn set_save_on_exit(&mut self, save: bool) {
        self.save_on_exit = save;
    }

    pub fn request_shutdown(&self) {
        self.shutdown_requested.store(true, Ordering::SeqCst);
        tracing::info!("Shutdown requested");
    }

    pub fn is_shutdown_requested(&self) -> bool {
        self.shutdown_requested.load(Ordering::SeqCst)
    }

    pub fn should_save_on_exit(&self) -> bool {
        self.save_on_exit
    }

    /// Flips the flag on Ctrl+C. Must be called inside a tokio runtime.
    pub fn listen_for_ctrl_c(&self) {
        let manager = self.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::info!("Ctrl+C received, initiating graceful shutdown...");
                manager.request_shutdown();
            }
        });
    }

    /// Saves the population when saving is enabled and a save path is set.
    pub fn cleanup(&self, app: &crate::app::App) -> Result<()> {
        tracing::info!("Performing shutdown cleanup...");
        if self.save_on_exit {
            app.save_state()?;
        }
        tracing::info!("Cleanup complete");
        Ok(())
    }
}
