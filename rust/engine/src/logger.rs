use std::fs::{create_dir_all, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::cards::Card;
use crate::errors::GameError;
use crate::game::{DrawSource, Game, Role};
use crate::scoring::MatchResult;

/// A single accepted move.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Action {
    Draw { source: DrawSource, card: Card },
    Play { card: Card, pile: usize },
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
pub struct ActionRecord {
    pub role: Role,
    pub action: Action,
}

/// Complete record of one match, stored one per line (JSONL).
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord {
    /// `YYYYMMDD-NNNNNN`
    pub match_id: String,
    pub seed: u64,
    pub actions: Vec<ActionRecord>,
    #[serde(default)]
    pub result: Option<MatchResult>,
    #[serde(default)]
    pub aborted: bool,
    /// RFC3339, filled in by [`MatchLogger::write`] when missing
    #[serde(default)]
    pub ts: Option<String>,
}

impl MatchRecord {
    /// Snapshot of a game's seed, history and outcome.
    pub fn from_game(match_id: impl Into<String>, game: &Game) -> Self {
        Self {
            match_id: match_id.into(),
            seed: game.seed(),
            actions: game.history().to_vec(),
            result: game.result().ok().cloned(),
            aborted: game.is_aborted(),
            ts: None,
        }
    }
}

pub fn format_match_id(yyyymmdd: &str, seq: u32) -> String {
    format!("{}-{:06}", yyyymmdd, seq)
}

pub struct MatchLogger {
    writer: Option<BufWriter<File>>,
    date: String,
    seq: u32,
}

impl MatchLogger {
    pub fn create<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                create_dir_all(parent)?;
            }
        }
        let f = File::create(path)?;
        Ok(Self {
            writer: Some(BufWriter::new(f)),
            date: Utc::now().format("%Y%m%d").to_string(),
            seq: 0,
        })
    }

    /// Logger that numbers matches but writes nothing.
    pub fn in_memory(date: &str) -> Self {
        Self {
            writer: None,
            date: date.to_string(),
            seq: 0,
        }
    }

    pub fn next_id(&mut self) -> String {
        self.seq += 1;
        format_match_id(&self.date, self.seq)
    }

    pub fn write(&mut self, record: &MatchRecord) -> std::io::Result<()> {
        let mut rec = record.clone();
        if rec.ts.is_none() {
            rec.ts = Some(Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true));
        }
        let line = serde_json::to_string(&rec).map_err(std::io::Error::other)?;
        if let Some(w) = &mut self.writer {
            w.write_all(line.as_bytes())?;
            w.write_all(b"\n")?;
            w.flush()?;
        }
        Ok(())
    }
}

/// Rebuilds a match from its seed and action list.
///
/// Seats are filled so that whoever acted first also joined first, which
/// reproduces both the deal and the opening turn. A record whose actions do
/// not apply cleanly surfaces the first rejection, and a recorded draw that
/// the seeded deck does not produce is [`GameError::ReplayMismatch`].
pub fn replay(record: &MatchRecord) -> Result<Game, GameError> {
    let first = record
        .actions
        .first()
        .map(|a| a.role)
        .unwrap_or(Role::Player1);
    let mut game = Game::new(Some(record.seed));
    for role in [first, first.opponent()] {
        game.join(role, role.to_string())?;
    }
    game.start()?;
    for (index, rec) in record.actions.iter().enumerate() {
        match rec.action {
            Action::Draw { source, card } => {
                let replayed = game.draw(rec.role, source)?;
                if replayed != card {
                    return Err(GameError::ReplayMismatch {
                        index,
                        recorded: card,
                        replayed,
                    });
                }
            }
            Action::Play { card, pile } => game.play(rec.role, card, pile)?,
        }
    }
    Ok(game)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn match_ids_are_zero_padded() {
        assert_eq!(format_match_id("20260101", 7), "20260101-000007");
        let mut logger = MatchLogger::in_memory("20261015");
        assert_eq!(logger.next_id(), "20261015-000001");
        assert_eq!(logger.next_id(), "20261015-000002");
    }

    #[test]
    fn action_serializes_with_type_tag() {
        let rec = ActionRecord {
            role: Role::Player2,
            action: Action::Play {
                card: "Td".parse().unwrap(),
                pile: 3,
            },
        };
        let json = serde_json::to_value(rec).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "role": "player2",
                "action": { "type": "play", "card": "Td", "pile": 3 }
            })
        );
    }

    #[test]
    fn replay_of_empty_record_is_freshly_started() {
        let record = MatchRecord {
            match_id: "x".into(),
            seed: 5,
            actions: vec![],
            result: None,
            aborted: false,
            ts: None,
        };
        let game = replay(&record).unwrap();
        assert_eq!(game.current_turn(), Some(Role::Player1));
        assert_eq!(game.deck_remaining(), 41);
    }
}
