//! The dual-sink audit logger.
//!
//! One sink takes human-readable message lines, the other takes one
//! hash-chained JSON record per line. Each sink sits behind its own `Mutex`,
//! so concurrent callers never interleave bytes inside a line. Every line is
//! rendered in full before a single `write_all` and is flushed before the
//! call returns.
//!
//! Logging never fails the caller: a write that cannot be completed is
//! counted in `logging_errors` and reported through `tracing`, nothing more.
//!
//! Files opened by [`AuditLogger::open`] roll a failed append back to the
//! last complete line. For other destinations a failed write may leave a
//! fragment; the next line then starts with a newline so the fragment stays
//! on a line of its own, which `recover_tool_log` sets aside.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::Local;
use tracing::warn;

use docgate_contracts::{
    error::{DocgateError, DocgateResult},
    tool::ToolCallRecord,
};

use crate::{
    chain::{hash_record, recover_tool_log},
    event::{LogLevel, LoggedToolCall, LoggerStats},
    sink::AtomicLines,
};

/// An append-only destination for one sink.
pub type Destination = Box<dyn Write + Send>;

/// One destination plus whether its last write broke off mid-line.
struct LineSink {
    writer: Destination,
    torn: bool,
}

impl LineSink {
    fn new(writer: Destination) -> Self {
        Self { writer, torn: false }
    }

    fn append(&mut self, line: &[u8]) -> io::Result<()> {
        let result = if self.torn {
            let mut fresh = Vec::with_capacity(line.len() + 1);
            fresh.push(b'\n');
            fresh.extend_from_slice(line);
            write_line(&mut *self.writer, &fresh)
        } else {
            write_line(&mut *self.writer, line)
        };
        self.torn = result.is_err();
        result
    }
}

/// The structured sink plus the chain position of its next line.
struct ToolSink {
    sink: LineSink,
    sequence: u64,
    last_hash: String,
}

#[derive(Default)]
struct Counters {
    tool_calls_logged: AtomicU64,
    messages_logged: AtomicU64,
    logging_errors: AtomicU64,
    tool_errors: AtomicU64,
}

/// Records one document's agent run to a message stream and a structured
/// stream.
///
/// Instances never share state: each run creates its own logger over its own
/// pair of destinations, and the destinations are closed when it is dropped.
pub struct AuditLogger {
    messages: Mutex<LineSink>,
    tools: Mutex<ToolSink>,
    counters: Counters,
}

impl AuditLogger {
    /// Build a logger over two already-open, append-only destinations.
    ///
    /// The structured chain starts at genesis.
    pub fn new(messages: Destination, tools: Destination) -> Self {
        Self::with_chain(messages, tools, 0, LoggedToolCall::GENESIS_HASH.to_string())
    }

    fn with_chain(messages: Destination, tools: Destination, sequence: u64, last_hash: String) -> Self {
        Self {
            messages: Mutex::new(LineSink::new(messages)),
            tools: Mutex::new(ToolSink {
                sink: LineSink::new(tools),
                sequence,
                last_hash,
            }),
            counters: Counters::default(),
        }
    }

    /// Open (creating if needed) the two log files in append mode.
    ///
    /// If the tools file already holds records, the chain continues from its
    /// last record, so reopening a document's log keeps it verifiable. A
    /// partial trailing line left by an interrupted process is cut off first.
    ///
    /// # Errors
    ///
    /// `LogSetup` if either file cannot be opened, or if the existing tools
    /// file holds a line that is JSON but not a record.
    pub fn open(message_log: &Path, tools_log: &Path) -> DocgateResult<Self> {
        let messages = open_append(message_log)?;
        let messages_len = messages.metadata().map_err(setup_error(message_log))?.len();
        let (tools, tail) = open_tools_log(tools_log)?;

        let (sequence, last_hash) = match tail {
            Some(last) => (last.sequence + 1, last.this_hash),
            None => (0, LoggedToolCall::GENESIS_HASH.to_string()),
        };
        Ok(Self::with_chain(
            Box::new(AtomicLines::new(messages, messages_len)),
            Box::new(tools),
            sequence,
            last_hash,
        ))
    }

    /// Append `[timestamp] [LEVEL] text` to the message stream.
    ///
    /// Newlines inside `text` are escaped so every entry stays on one line.
    pub fn log_message(&self, text: &str, level: LogLevel) {
        let line = format!(
            "[{}] [{}] {}\n",
            Local::now().format("%Y-%m-%dT%H:%M:%S%.6f"),
            level,
            text.replace('\r', "\\r").replace('\n', "\\n"),
        );

        let mut sink = lock(&self.messages);
        match sink.append(line.as_bytes()) {
            Ok(()) => {
                self.counters.messages_logged.fetch_add(1, Ordering::Relaxed);
            }
            Err(e) => {
                self.counters.logging_errors.fetch_add(1, Ordering::Relaxed);
                warn!(error = %e, "message log write failed");
            }
        }
    }

    /// Append `record` to the structured stream as one chained JSON line.
    ///
    /// The chain only advances when the line was written and flushed.
    pub fn log_tool_call(&self, record: &ToolCallRecord) {
        let mut sink = lock(&self.tools);

        let sequence = sink.sequence;
        let prev_hash = sink.last_hash.clone();
        let rendered = hash_record(sequence, record, &prev_hash).and_then(|this_hash| {
            let line = LoggedToolCall {
                sequence,
                record: record.clone(),
                prev_hash,
                this_hash: this_hash.clone(),
            };
            serde_json::to_string(&line).map(|json| (json, this_hash))
        });

        let (mut json, this_hash) = match rendered {
            Ok(rendered) => rendered,
            Err(e) => {
                self.counters.logging_errors.fetch_add(1, Ordering::Relaxed);
                warn!(tool = %record.tool_name, error = %e, "tool record serialization failed");
                return;
            }
        };
        json.push('\n');

        match sink.sink.append(json.as_bytes()) {
            Ok(()) => {
                sink.sequence += 1;
                sink.last_hash = this_hash;
                self.counters.tool_calls_logged.fetch_add(1, Ordering::Relaxed);
                if record.error.is_some() {
                    self.counters.tool_errors.fetch_add(1, Ordering::Relaxed);
                }
            }
            Err(e) => {
                self.counters.logging_errors.fetch_add(1, Ordering::Relaxed);
                warn!(tool = %record.tool_name, sequence, error = %e, "tool log write failed");
            }
        }
    }

    /// Snapshot of the counters as of every completed log call.
    pub fn get_stats(&self) -> LoggerStats {
        LoggerStats {
            tool_calls_logged: self.counters.tool_calls_logged.load(Ordering::Relaxed),
            messages_logged: self.counters.messages_logged.load(Ordering::Relaxed),
            logging_errors: self.counters.logging_errors.load(Ordering::Relaxed),
            tool_errors: self.counters.tool_errors.load(Ordering::Relaxed),
        }
    }
}

fn setup_error(path: &Path) -> impl Fn(io::Error) -> DocgateError + '_ {
    move |e| DocgateError::LogSetup {
        path: path.display().to_string(),
        reason: e.to_string(),
    }
}

fn open_append(path: &Path) -> DocgateResult<fs::File> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(setup_error(path))?;
    }
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(setup_error(path))
}

/// Open the structured log for appending and find its last record.
fn open_tools_log(
    path: &Path,
) -> DocgateResult<(AtomicLines<fs::File>, Option<LoggedToolCall>)> {
    let existing = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == io::ErrorKind::NotFound => Vec::new(),
        Err(e) => return Err(setup_error(path)(e)),
    };
    let complete = existing
        .iter()
        .rposition(|&b| b == b'\n')
        .map_or(0, |idx| idx + 1);

    let file = open_append(path)?;
    if complete < existing.len() {
        file.set_len(complete as u64).map_err(setup_error(path))?;
        warn!(
            path = %path.display(),
            dropped_bytes = existing.len() - complete,
            "cut partial trailing line from tool log"
        );
    }

    let mut recovered =
        recover_tool_log(&existing[..complete]).map_err(|e| DocgateError::LogSetup {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
    Ok((AtomicLines::new(file, complete as u64), recovered.lines.pop()))
}

fn write_line<W: Write + ?Sized>(writer: &mut W, line: &[u8]) -> std::io::Result<()> {
    writer.write_all(line)?;
    writer.flush()
}

/// A poisoned sink is still usable: a line that broke off is marked torn and
/// the next line starts fresh, so a panic elsewhere cannot corrupt later lines.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
