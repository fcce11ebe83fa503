//! Bounded log channel with a single background writer

use std::io;
use std::path::Path;

use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use super::{format_report, ErrorReporter};

/// Sending half. Cheap to clone; every clone feeds the same writer.
#[derive(Debug, Clone)]
pub struct LogChannel {
    sender: mpsc::Sender<String>,
}

/// Handle on the background writer task
#[derive(Debug)]
pub struct LogWorker {
    handle: JoinHandle<io::Result<()>>,
}

impl LogChannel {
    /// Open (or create) the log file and start the writer task.
    ///
    /// Must be called from within a Tokio runtime.
    pub async fn open(path: impl AsRef<Path>, capacity: usize) -> io::Result<(Self, LogWorker)> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .await?;

        let (sender, mut receiver) = mpsc::channel::<String>(capacity.max(1));

        let handle = tokio::spawn(async move {
            while let Some(line) = receiver.recv().await {
                file.write_all(line.as_bytes()).await?;
                file.write_all(b"\n").await?;
            }
            file.flush().await?;
            Ok(())
        });

        Ok((Self { sender }, LogWorker { handle }))
    }

    /// Queue a line. Returns false when it was dropped (queue full or closed).
    pub fn send(&self, message: impl Into<String>) -> bool {
        self.sender.try_send(message.into()).is_ok()
    }
}

impl ErrorReporter for LogChannel {
    fn report(&self, error: Option<&dyn std::error::Error>, message: &str) {
        if !self.send(format_report(error, message)) {
            tracing::debug!(dropped = message, "Log channel full, report dropped");
        }
    }
}

impl LogWorker {
    /// Wait for the writer to drain the queue and exit.
    ///
    /// The writer stops once every `LogChannel` clone has been dropped.
    pub async fn shutdown(self) -> io::Result<()> {
        match self.handle.await {
            Ok(result) => result,
            Err(join_err) => Err(io::Error::new(io::ErrorKind::Other, join_err)),
        }
    }
}
