//! FileActionController: play and delete for downloaded files.

use std::future::Future;
use std::path::PathBuf;
use std::process::Stdio;
use std::sync::Arc;

use anyhow::Context;
use dlqueue_proto::{platform, protocol::DOWNLOADS_PREFIX};
use tracing::{debug, info, warn};

use crate::api::ServerApi;
use crate::error::ClientError;

pub const DELETE_FALLBACK: &str = "Failed to delete file.";

/// Something that can play a URL. `load` sets the source, `play` starts it.
pub trait Player: Send {
    fn load(&mut self, source: &str);
    fn play(&mut self) -> anyhow::Result<()>;
    fn stop(&mut self);
}

/// Plays through an external program (mpv by default), one process at a
/// time. Starting a new source kills the previous process.
pub struct ProcessPlayer {
    command: String,
    args: Vec<String>,
    source: Option<String>,
    child: Option<tokio::process::Child>,
}

impl ProcessPlayer {
    pub fn new(command: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            command: command.into(),
            args,
            source: None,
            child: None,
        }
    }

    fn binary(&self) -> anyhow::Result<PathBuf> {
        platform::find_binary(&self.command)
            .with_context(|| format!("player '{}' not found", self.command))
    }
}

impl Player for ProcessPlayer {
    fn load(&mut self, source: &str) {
        self.source = Some(source.to_string());
    }

    fn play(&mut self) -> anyhow::Result<()> {
        let source = self.source.clone().context("nothing loaded")?;
        self.stop();

        let binary = self.binary()?;
        let child = tokio::process::Command::new(&binary)
            .args(&self.args)
            .arg(&source)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .with_context(|| format!("failed to start {}", binary.display()))?;
        info!("[player] started {:?} (pid {:?})", source, child.id());
        self.child = Some(child);
        Ok(())
    }

    fn stop(&mut self) {
        if let Some(mut child) = self.child.take() {
            if let Err(e) = child.start_kill() {
                debug!("[player] kill: {}", e);
            }
        }
    }
}

impl Drop for ProcessPlayer {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Server-relative playback path for a filename.
pub fn playback_path(filename: &str) -> String {
    format!("{}{}", DOWNLOADS_PREFIX, urlencoding::encode(filename))
}

pub struct FileActionController {
    api: Arc<dyn ServerApi>,
    player: Box<dyn Player>,
}

impl FileActionController {
    pub fn new(api: Arc<dyn ServerApi>, player: Box<dyn Player>) -> Self {
        Self { api, player }
    }

    /// Load and start `filename`. Returns the source URL handed to the player.
    pub fn play(&mut self, filename: &str) -> anyhow::Result<String> {
        let source = self.api.resolve(&playback_path(filename));
        self.player.load(&source);
        self.player.play()?;
        Ok(source)
    }

    pub fn stop(&mut self) {
        self.player.stop();
    }

    /// POST the delete. Only an explicit `success: true` counts.
    pub fn delete(
        &self,
        filename: &str,
    ) -> impl Future<Output = Result<(), ClientError>> + Send + 'static {
        let api = self.api.clone();
        let filename = filename.to_string();
        async move {
            let outcome = match api.delete_file(&filename).await {
                Ok(reply) if reply.success == Some(true) => Ok(()),
                Ok(reply) => Err(ClientError::Deletion(
                    reply.error_text().unwrap_or(DELETE_FALLBACK).to_string(),
                )),
                Err(ClientError::Server { message, .. }) => Err(ClientError::Deletion(
                    message.unwrap_or_else(|| DELETE_FALLBACK.to_string()),
                )),
                Err(other) => Err(other),
            };
            match &outcome {
                Ok(()) => info!("[files] deleted {}", filename),
                Err(e) => warn!("[files] delete {} failed: {}", filename, e),
            }
            outcome
        }
    }
}
