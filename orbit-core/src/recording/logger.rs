use super::types::RecordedEvent;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tokio::sync::mpsc::{self, error::TrySendError};
use tracing::{debug, warn};

/// Events buffered between the request path and the writer task.
const QUEUE_CAPACITY: usize = 256;

/// Events written per batch.
const BATCH_SIZE: usize = 32;

/// Appends recorded events to a JSONL file from a background task.
///
/// Recording never blocks a request: when the queue is full the event is
/// dropped with a warning. Must be created inside a tokio runtime.
#[derive(Clone)]
pub struct RecordingLogger {
    queue: mpsc::Sender<RecordedEvent>,
}

impl RecordingLogger {
    pub fn new(path: PathBuf) -> Self {
        let (queue, events) = mpsc::channel(QUEUE_CAPACITY);

        tokio::spawn(async move {
            if let Err(e) = write_events(&path, events).await {
                warn!("Recording to {} stopped: {:#}", path.display(), e);
            }
        });

        Self { queue }
    }

    pub fn record(&self, event: RecordedEvent) {
        match self.queue.try_send(event) {
            Ok(()) => {}
            Err(TrySendError::Full(event)) => {
                warn!(
                    "Recording queue full; dropping {} event",
                    event.operation
                );
            }
            Err(TrySendError::Closed(_)) => {
                debug!("Recording writer has stopped; event not recorded");
            }
        }
    }
}

async fn write_events(path: &Path, mut events: mpsc::Receiver<RecordedEvent>) -> Result<()> {
    if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(dir)
            .await
            .with_context(|| format!("Failed to create {}", dir.display()))?;
    }

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .await
        .with_context(|| format!("Failed to open {}", path.display()))?;

    let mut batch = Vec::with_capacity(BATCH_SIZE);
    while events.recv_many(&mut batch, BATCH_SIZE).await > 0 {
        let mut lines = Vec::new();
        for event in batch.drain(..) {
            match serde_json::to_vec(&event) {
                Ok(line) => {
                    lines.extend_from_slice(&line);
                    lines.push(b'\n');
                }
                Err(e) => warn!("Skipping unserializable {} event: {}", event.operation, e),
            }
        }

        file.write_all(&lines)
            .await
            .context("Failed to append recorded events")?;
        file.flush().await.context("Failed to flush recording")?;
    }

    Ok(())
}
