use super::*;
use anyhow::{format_err, Context};
use parking_lot::Mutex;
use std::{
    fs::{File, OpenOptions},
    io::Write,
    path::Path,
    sync::mpsc,
    thread,
};
use tracing::error;

/// Sink appending to a file
///
/// Lines are handed over to a dedicated writer thread, so `record` never
/// waits on the disk, and with a single writer lines can't interleave.
/// Dropping the sink drains everything still queued before returning.
pub struct FileSink {
    tx: Mutex<Option<mpsc::Sender<String>>>,
    writer: Option<thread::JoinHandle<()>>,
}

impl FileSink {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("Failed to open log file {}", path.display()))?;

        let (tx, rx) = mpsc::channel();
        let writer = thread::Builder::new()
            .name("diagnostic-log".into())
            .spawn(move || write_lines(file, rx))?;

        Ok(Self {
            tx: Mutex::new(Some(tx)),
            writer: Some(writer),
        })
    }

    pub fn open_shared(path: impl AsRef<Path>) -> Result<SharedSink> {
        Ok(Arc::new(Self::open(path)?))
    }
}

fn write_lines(mut file: File, rx: mpsc::Receiver<String>) {
    for line in rx {
        if let Err(e) = file.write_all(line.as_bytes()).and_then(|_| file.flush()) {
            error!(error = %e, "failed to write diagnostic log");
        }
    }
}

impl DiagnosticSink for FileSink {
    fn record(&self, event: &str) -> Result<()> {
        let line = format_line(Local::now(), event);
        self.tx
            .lock()
            .as_ref()
            .ok_or_else(|| format_err!("log file already closed"))?
            .send(line)
            .map_err(|_| format_err!("log writer thread is gone"))
    }
}

impl Drop for FileSink {
    fn drop(&mut self) {
        // closing the channel lets the writer finish the backlog and exit
        self.tx.lock().take();
        if let Some(writer) = self.writer.take() {
            if writer.join().is_err() {
                error!("diagnostic log writer panicked");
            }
        }
    }
}
