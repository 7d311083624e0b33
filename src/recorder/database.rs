//! Owned SQLite storage handle.
//!
//! A dedicated worker thread owns the `rusqlite::Connection`; async callers
//! reach it through an mpsc command channel with oneshot replies. The handle
//! is opened once at process start and closed explicitly at shutdown, with
//! Drop covering early exits.

use std::{
    path::{Path, PathBuf},
    sync::{mpsc, Arc, Mutex},
    thread::{self, JoinHandle},
};

use anyhow::{anyhow, Context, Result};
use rusqlite::{params, Connection};
use tokio::sync::oneshot;
use tracing::{error, info};

use crate::session::SessionReport;

const CREATE_SESSIONS_TABLE: &str = "\
CREATE TABLE IF NOT EXISTS sessions (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    started_at TEXT NOT NULL,
    ended_at TEXT NOT NULL,
    duration_minutes INTEGER NOT NULL
)";

type DbTask = Box<dyn FnOnce(&mut Connection) + Send + 'static>;

enum DbCommand {
    Execute(DbTask),
    Shutdown,
}

struct DatabaseInner {
    sender: mpsc::Sender<DbCommand>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl DatabaseInner {
    fn shutdown(&self) {
        let mut guard = match self.worker.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        if let Some(handle) = guard.take() {
            if self.sender.send(DbCommand::Shutdown).is_err() {
                error!("Database worker already gone before shutdown request");
            }
            if let Err(join_err) = handle.join() {
                error!("Failed to join database worker: {join_err:?}");
            }
        }
    }
}

impl Drop for DatabaseInner {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Handle to the append-only session store.
#[derive(Clone)]
pub struct Database {
    inner: Arc<DatabaseInner>,
    db_path: Arc<PathBuf>,
}

impl Database {
    /// Open the store at `db_path`, creating the file and schema if needed.
    pub fn open(db_path: impl Into<PathBuf>) -> Result<Self> {
        let db_path = db_path.into();
        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).with_context(|| {
                    format!("failed to create database directory {}", parent.display())
                })?;
            }
        }

        let (command_tx, command_rx) = mpsc::channel::<DbCommand>();
        let (ready_tx, ready_rx) = mpsc::channel();
        let path_for_thread = db_path.clone();

        let worker = thread::Builder::new()
            .name("focusbrew-db".into())
            .spawn(move || {
                let mut conn = match Connection::open(&path_for_thread) {
                    Ok(connection) => connection,
                    Err(err) => {
                        let _ = ready_tx.send(Err(anyhow::Error::new(err)
                            .context("failed to open SQLite database")));
                        return;
                    }
                };

                if let Err(err) = conn.pragma_update(None, "journal_mode", "WAL") {
                    error!("Failed to enable WAL mode: {err}");
                }

                let init_result = conn
                    .execute(CREATE_SESSIONS_TABLE, [])
                    .map(|_| ())
                    .context("failed to create sessions table");
                if ready_tx.send(init_result).is_err() {
                    error!("Database opener dropped before ready signal");
                    return;
                }

                while let Ok(command) = command_rx.recv() {
                    match command {
                        DbCommand::Execute(task) => task(&mut conn),
                        DbCommand::Shutdown => break,
                    }
                }

                info!("Database worker shutting down");
            })
            .context("failed to spawn database worker thread")?;

        ready_rx
            .recv()
            .context("database worker exited before signaling readiness")??;

        info!("Session store ready at {}", db_path.display());

        Ok(Self {
            inner: Arc::new(DatabaseInner {
                sender: command_tx,
                worker: Mutex::new(Some(worker)),
            }),
            db_path: Arc::new(db_path),
        })
    }

    pub fn path(&self) -> &Path {
        self.db_path.as_path()
    }

    /// Run a closure on the worker thread's connection.
    pub async fn execute<F, T>(&self, task: F) -> Result<T>
    where
        F: FnOnce(&mut Connection) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let (reply_tx, reply_rx) = oneshot::channel();

        let command = DbCommand::Execute(Box::new(move |conn| {
            let result = task(conn);
            if reply_tx.send(result).is_err() {
                error!("Database caller dropped before receiving result");
            }
        }));

        self.inner
            .sender
            .send(command)
            .map_err(|err| anyhow!("failed to send command to database worker: {err}"))?;

        reply_rx
            .await
            .map_err(|_| anyhow!("database worker terminated unexpectedly"))?
    }

    /// Append one session row; returns the assigned rowid.
    pub async fn insert_session(&self, report: &SessionReport) -> Result<i64> {
        let record = report.clone();
        self.execute(move |conn| {
            conn.execute(
                "INSERT INTO sessions (started_at, ended_at, duration_minutes)
                 VALUES (?1, ?2, ?3)",
                params![record.started_at, record.ended_at, record.duration_minutes],
            )
            .context("failed to insert session")?;
            Ok(conn.last_insert_rowid())
        })
        .await
    }

    pub async fn session_count(&self) -> Result<i64> {
        self.execute(|conn| {
            let count = conn.query_row("SELECT COUNT(*) FROM sessions", [], |row| row.get(0))?;
            Ok(count)
        })
        .await
    }

    /// Stop the worker and close the connection. Safe to call exactly once
    /// at shutdown; later calls and Drop become no-ops.
    pub fn close(&self) {
        self.inner.shutdown();
    }
}
