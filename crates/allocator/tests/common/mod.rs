//! Shared helpers for integration tests
#![allow(dead_code)]

use std::io;
use std::sync::Arc;

use nebula_allocator::diagnostics::Operation;
use parking_lot::Mutex;
use tracing::Level;
use tracing_subscriber::fmt::MakeWriter;

/// In-memory sink for formatted events
#[derive(Clone, Default)]
struct CaptureBuffer(Arc<Mutex<Vec<u8>>>);

impl io::Write for CaptureBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for CaptureBuffer {
    type Writer = Self;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Diagnostic lines recorded while a closure ran
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    lines: Vec<String>,
}

impl Diagnostics {
    /// Every recorded line, trimmed
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Lines produced by the strategies, in emission order
    pub fn operations(&self) -> Vec<Operation> {
        self.lines
            .iter()
            .filter_map(|line| parse_operation(line))
            .collect()
    }

    /// Number of lines reporting `operation`
    pub fn count(&self, operation: Operation) -> usize {
        self.operations()
            .into_iter()
            .filter(|op| *op == operation)
            .count()
    }
}

fn parse_operation(line: &str) -> Option<Operation> {
    let (keyword, rest) = line.split_once(' ')?;
    if !rest.contains(" element(s) of size ") || !rest.contains(" at: ") {
        return None;
    }

    [
        Operation::Allocate,
        Operation::Deallocate,
        Operation::Construct,
        Operation::Destroy,
    ]
    .into_iter()
    .find(|op| op.as_str() == keyword)
}

/// Runs `f` with a thread-local subscriber that records every event
/// down to `TRACE`, returning its result together with the recorded lines
pub fn capture<R>(f: impl FnOnce() -> R) -> (R, Diagnostics) {
    let buffer = CaptureBuffer::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(buffer.clone())
        .with_max_level(Level::TRACE)
        .without_time()
        .with_level(false)
        .with_target(false)
        .finish();

    let result = tracing::subscriber::with_default(subscriber, f);

    let bytes = buffer.0.lock().clone();
    let lines = String::from_utf8_lossy(&bytes)
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_owned)
        .collect();

    (result, Diagnostics { lines })
}
