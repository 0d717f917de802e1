use super::*;
use parking_lot::Mutex;

/// Fake in-memory sink.
///
/// Useful for unit-tests.
#[derive(Default)]
pub struct InMemorySink {
    lines: Mutex<Vec<String>>,
}

impl InMemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn new_shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().clone()
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.lines.lock().iter().any(|line| line.contains(needle))
    }
}

impl DiagnosticSink for InMemorySink {
    fn record(&self, event: &str) -> Result<()> {
        self.lines.lock().push(format_line(Local::now(), event));
        Ok(())
    }
}
