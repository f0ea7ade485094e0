// Per-turn decision log
//
// Fire-and-forget JSONL writer so logging never delays a move. Each line holds
// the engine's board plus the plan that was chosen for it, which is what the
// replay tool reads back.

use log::error;
use serde::Serialize;
use std::sync::Arc;
use tokio::fs::{File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use crate::board::{Path, Point};
use crate::planner::{Plan, Strategy};
use crate::types::Board;

#[derive(Debug, Serialize)]
struct DebugLogEntry {
    turn: i32,
    you: String,
    chosen_move: String,
    strategy: Strategy,
    destination: Point,
    path: Path,
    board: Board,
    timestamp: String,
}

/// Shared handle to the log file; cheap to clone into spawned tasks
#[derive(Clone)]
pub struct DebugLogger {
    file: Arc<Mutex<Option<File>>>,
    enabled: bool,
}

impl DebugLogger {
    /// Opens (and truncates) the log file when `enabled`.
    /// Falls back to a disabled logger if the file cannot be created.
    pub async fn new(enabled: bool, log_file_path: &str) -> Self {
        if !enabled {
            return DebugLogger::disabled();
        }

        match OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(log_file_path)
            .await
        {
            Ok(file) => {
                log::info!("Debug logging enabled: {}", log_file_path);
                DebugLogger {
                    file: Arc::new(Mutex::new(Some(file))),
                    enabled: true,
                }
            }
            Err(e) => {
                error!("Failed to create debug log file '{}': {}", log_file_path, e);
                DebugLogger::disabled()
            }
        }
    }

    pub fn disabled() -> Self {
        DebugLogger {
            file: Arc::new(Mutex::new(None)),
            enabled: false,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Queues one turn for writing. Must be called from within a tokio runtime.
    pub fn log_move(&self, turn: i32, you: &str, board: Board, plan: &Plan) {
        if !self.enabled {
            return;
        }

        let entry = DebugLogEntry {
            turn,
            you: you.to_string(),
            chosen_move: plan.direction.as_str().to_string(),
            strategy: plan.strategy,
            destination: plan.destination,
            path: plan.path.clone(),
            board,
            timestamp: chrono::Utc::now().to_rfc3339(),
        };
        let file_handle = self.file.clone();

        tokio::spawn(async move {
            Self::write_entry(file_handle, entry).await;
        });
    }

    async fn write_entry(file_handle: Arc<Mutex<Option<File>>>, entry: DebugLogEntry) {
        let line = match serde_json::to_string(&entry) {
            Ok(json) => format!("{}\n", json),
            Err(e) => {
                error!("Failed to serialize debug log entry: {}", e);
                return;
            }
        };

        let mut file_guard = file_handle.lock().await;
        if let Some(file) = file_guard.as_mut() {
            if let Err(e) = file.write_all(line.as_bytes()).await {
                error!("Failed to write debug log entry: {}", e);
            } else if let Err(e) = file.flush().await {
                error!("Failed to flush debug log: {}", e);
            }
        }
    }
}
