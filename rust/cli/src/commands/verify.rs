//! Verify command handler module.
//!
//! Replays every JSONL match record from its seed and action list and checks:
//!
//! - the record parses and its match id has the `YYYYMMDD-NNNNNN` shape
//! - match ids are unique within the file
//! - every recorded action is accepted by the rules engine
//! - the replayed game satisfies the structural card invariants
//! - completed matches reproduce the recorded result exactly
//! - aborted matches carry no result
//!
//! Errors are collected with the shared `BatchValidationError` pattern so one
//! bad record does not hide the others.

use crate::error::{BatchValidationError, CliError};
use crate::io_utils::read_text;
use fivepiles_engine::logger::{MatchRecord, replay};
use std::collections::HashSet;
use std::io::Write;
use std::path::Path;

/// The `usize` context is the 1-based record number.
type VerifyError = BatchValidationError<usize>;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct VerifyCounts {
    records: usize,
    completed: usize,
    aborted: usize,
}

fn valid_match_id(s: &str) -> bool {
    let b = s.as_bytes();
    b.len() == 15
        && b[..8].iter().all(u8::is_ascii_digit)
        && b[8] == b'-'
        && b[9..].iter().all(u8::is_ascii_digit)
}

/// Handle the verify command.
///
/// Returns an error mapping to exit code `2` when any record fails.
pub fn handle_verify_command(
    input: &Path,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> Result<(), CliError> {
    let content = read_text(input)?;
    let mut errors: Vec<VerifyError> = Vec::new();
    let mut counts = VerifyCounts::default();
    let mut seen_ids = HashSet::new();

    for line in content.lines().filter(|l| !l.trim().is_empty()) {
        counts.records += 1;
        let index = counts.records;
        let mut fail = |message: String| {
            errors.push(VerifyError {
                item_context: index,
                message,
            })
        };

        let record: MatchRecord = match serde_json::from_str(line) {
            Ok(r) => r,
            Err(e) => {
                fail(format!("Invalid JSON record: {}", e));
                continue;
            }
        };

        if !valid_match_id(&record.match_id) {
            fail(format!("Malformed match_id '{}'", record.match_id));
        }
        if !seen_ids.insert(record.match_id.clone()) {
            fail(format!("Duplicate match_id '{}'", record.match_id));
        }

        let game = match replay(&record) {
            Ok(game) => game,
            Err(e) => {
                fail(format!("Replay rejected an action: {}", e));
                continue;
            }
        };
        if let Err(violation) = game.check_invariants() {
            fail(format!("Invariant violated after replay: {}", violation));
        }

        if record.aborted {
            counts.aborted += 1;
            if record.result.is_some() {
                fail("Aborted match carries a result".to_string());
            }
            continue;
        }

        match (game.result().ok(), record.result.as_ref()) {
            (Some(replayed), Some(recorded)) if replayed == recorded => counts.completed += 1,
            (Some(replayed), Some(recorded)) => fail(format!(
                "Recorded result differs from replay: recorded {}-{} ({:?}), replayed {}-{} ({:?})",
                recorded.player1_wins,
                recorded.player2_wins,
                recorded.winner,
                replayed.player1_wins,
                replayed.player2_wins,
                replayed.winner
            )),
            (Some(_), None) => fail("Missing result for a finished match".to_string()),
            (None, _) => fail(format!(
                "Match is incomplete: replay stops after {} actions",
                record.actions.len()
            )),
        }
    }

    if errors.is_empty() {
        writeln!(
            out,
            "Verify: OK (matches={}, completed={}, aborted={})",
            counts.records, counts.completed, counts.aborted
        )?;
        Ok(())
    } else {
        writeln!(out, "Verify: FAIL (matches={})", counts.records)?;
        writeln!(err, "Errors found:")?;
        for error in &errors {
            writeln!(err, "  Record {}", error)?;
        }
        let invalid: HashSet<usize> = errors.iter().map(|e| e.item_context).collect();
        writeln!(
            err,
            "Summary: {} error(s) in {} records ({} invalid)",
            errors.len(),
            counts.records,
            invalid.len()
        )?;
        Err(CliError::InvalidInput(format!(
            "{} validation errors found",
            errors.len()
        )))
    }
}
