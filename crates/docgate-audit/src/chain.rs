//! Hash-chain primitives and structured-log replay.
//!
//! Hash input layout (bytes, in order):
//!   1. sequence as 8-byte little-endian
//!   2. prev_hash as UTF-8 bytes (64 ASCII hex chars)
//!   3. compact JSON of the `ToolCallRecord`

use std::io::BufRead;

use sha2::{Digest, Sha256};

use docgate_contracts::{
    error::{DocgateError, DocgateResult},
    tool::ToolCallRecord,
};

use crate::event::LoggedToolCall;

/// Compute the hash of one structured line. Returns lowercase hex.
pub fn hash_record(
    sequence: u64,
    record: &ToolCallRecord,
    prev_hash: &str,
) -> Result<String, serde_json::Error> {
    let record_json = serde_json::to_vec(record)?;

    let mut hasher = Sha256::new();
    hasher.update(sequence.to_le_bytes());
    hasher.update(prev_hash.as_bytes());
    hasher.update(&record_json);

    Ok(hex::encode(hasher.finalize()))
}

/// Verify sequence numbering, prev-hash linkage and every line's hash.
///
/// An empty log is valid.
pub fn verify_chain(lines: &[LoggedToolCall]) -> bool {
    let mut expected_prev = LoggedToolCall::GENESIS_HASH.to_string();

    for (idx, line) in lines.iter().enumerate() {
        if line.sequence != idx as u64 || line.prev_hash != expected_prev {
            return false;
        }
        match hash_record(line.sequence, &line.record, &line.prev_hash) {
            Ok(recomputed) if recomputed == line.this_hash => {}
            _ => return false,
        }
        expected_prev = line.this_hash.clone();
    }

    true
}

/// Parse a structured log back into lines, in file order.
///
/// Blank lines are skipped. Unknown fields are ignored. A line that is not a
/// complete record fails the whole read with its 1-based line number.
pub fn read_tool_log<R: BufRead>(reader: R) -> DocgateResult<Vec<LoggedToolCall>> {
    let mut lines = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| DocgateError::Io {
            reason: e.to_string(),
        })?;
        if line.trim().is_empty() {
            continue;
        }
        let parsed = serde_json::from_str(&line).map_err(|e| DocgateError::MalformedLog {
            line: idx + 1,
            reason: e.to_string(),
        })?;
        lines.push(parsed);
    }
    Ok(lines)
}

/// A structured log read with torn lines set aside.
#[derive(Debug, Clone, Default)]
pub struct RecoveredToolLog {
    pub lines: Vec<LoggedToolCall>,
    /// 1-based line numbers of the fragments that were skipped.
    pub torn_lines: Vec<usize>,
}

/// Like [`read_tool_log`], but skips fragments left by interrupted writes.
///
/// A torn line is one that is not JSON at all. A line that is JSON but not a
/// record is still rejected, since no write failure produces one.
pub fn recover_tool_log<R: BufRead>(reader: R) -> DocgateResult<RecoveredToolLog> {
    let mut log = RecoveredToolLog::default();
    // Bytes, not `lines()`: a fragment may end inside a UTF-8 sequence.
    for (idx, line) in reader.split(b'\n').enumerate() {
        let line = line.map_err(|e| DocgateError::Io {
            reason: e.to_string(),
        })?;
        if line.iter().all(u8::is_ascii_whitespace) {
            continue;
        }
        let value: serde_json::Value = match serde_json::from_slice(&line) {
            Ok(value) => value,
            Err(_) => {
                log.torn_lines.push(idx + 1);
                continue;
            }
        };
        let parsed = serde_json::from_value(value).map_err(|e| DocgateError::MalformedLog {
            line: idx + 1,
            reason: e.to_string(),
        })?;
        log.lines.push(parsed);
    }
    Ok(log)
}
