//! Shared helpers for settings integration tests.

use std::io;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use tempfile::TempDir;
use tracing_subscriber::fmt::MakeWriter;

/// Full settings document covering every section.
pub const FULL_SETTINGS: &str = include_str!("../fixtures/settings.json");

/// Write `json` to `settings.json` inside `dir` and return the path.
pub fn write_settings(dir: &TempDir, json: &str) -> PathBuf {
    let path = dir.path().join("settings.json");
    std::fs::write(&path, json).unwrap();
    path
}

/// Path inside `dir` that is never created.
pub fn missing_settings(dir: &TempDir) -> PathBuf {
    dir.path().join("does-not-exist").join("settings.json")
}

/// In-memory sink for formatted log lines.
#[derive(Clone, Default)]
pub struct CapturedLogs {
    buf: Arc<Mutex<Vec<u8>>>,
}

impl CapturedLogs {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.buf.lock().unwrap()).into_owned()
    }
}

pub struct CapturedWriter {
    buf: Arc<Mutex<Vec<u8>>>,
}

impl io::Write for CapturedWriter {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        self.buf.lock().unwrap().extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for CapturedLogs {
    type Writer = CapturedWriter;

    fn make_writer(&'a self) -> Self::Writer {
        CapturedWriter {
            buf: self.buf.clone(),
        }
    }
}

/// Run `f` with a thread-local subscriber and return its result with the
/// captured log output.
pub fn with_captured_logs<T>(f: impl FnOnce() -> T) -> (T, String) {
    let logs = CapturedLogs::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(logs.clone())
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .finish();

    let out = tracing::subscriber::with_default(subscriber, f);
    (out, logs.contents())
}
