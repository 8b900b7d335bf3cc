use crate::domain::participant::ParticipantId;
use crate::error::{Result, TontineError};
use serde::Deserialize;
use std::io::Read;

#[derive(Debug, Deserialize, PartialEq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Contribute,
    Claim,
    Advance,
}

/// One raw row of a simulation script.
#[derive(Debug, Deserialize, PartialEq, Clone)]
pub struct CommandRecord {
    pub action: Action,
    #[serde(default)]
    pub caller: Option<ParticipantId>,
    #[serde(default)]
    pub value: Option<u64>,
}

/// A validated script step.
#[derive(Debug, PartialEq, Clone)]
pub enum Command {
    Contribute { caller: ParticipantId, amount: u64 },
    Claim { caller: ParticipantId },
    Advance { seconds: u64 },
}

impl TryFrom<CommandRecord> for Command {
    type Error = TontineError;

    fn try_from(record: CommandRecord) -> Result<Self> {
        match (record.action, record.caller, record.value) {
            (Action::Contribute, Some(caller), Some(amount)) => {
                Ok(Command::Contribute { caller, amount })
            }
            (Action::Claim, Some(caller), _) => Ok(Command::Claim { caller }),
            (Action::Advance, _, Some(seconds)) => Ok(Command::Advance { seconds }),
            (Action::Contribute, _, _) => Err(TontineError::InvalidCommand(
                "contribute needs a caller and an amount".to_string(),
            )),
            (Action::Claim, None, _) => Err(TontineError::InvalidCommand(
                "claim needs a caller".to_string(),
            )),
            (Action::Advance, _, None) => Err(TontineError::InvalidCommand(
                "advance needs a number of seconds".to_string(),
            )),
        }
    }
}

/// Reads simulation commands from a CSV source with the header
/// `action, caller, value`.
///
/// Whitespace is trimmed and short records are accepted, so `claim` and
/// `advance` rows may omit the columns they do not use.
pub struct CommandReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> CommandReader<R> {
    /// Creates a new `CommandReader` from any `Read` source (e.g., File, Stdin).
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);
        Self { reader }
    }

    /// Returns an iterator that lazily reads and validates commands.
    pub fn commands(self) -> impl Iterator<Item = Result<Command>> {
        self.reader.into_deserialize().map(|result| {
            let record: CommandRecord = result.map_err(TontineError::from)?;
            Command::try_from(record)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reader_valid_stream() {
        let data = "action, caller, value\n\
                    contribute, alice, 1000\n\
                    advance, , 60\n\
                    claim, alice\n";
        let reader = CommandReader::new(data.as_bytes());
        let results: Vec<Result<Command>> = reader.commands().collect();

        assert_eq!(results.len(), 3);
        assert_eq!(
            results[0].as_ref().unwrap(),
            &Command::Contribute {
                caller: "alice".into(),
                amount: 1000
            }
        );
        assert_eq!(
            results[1].as_ref().unwrap(),
            &Command::Advance { seconds: 60 }
        );
        assert_eq!(
            results[2].as_ref().unwrap(),
            &Command::Claim {
                caller: "alice".into()
            }
        );
    }

    #[test]
    fn test_reader_unknown_action() {
        let data = "action, caller, value\nwithdraw, alice, 1";
        let reader = CommandReader::new(data.as_bytes());
        let results: Vec<Result<Command>> = reader.commands().collect();

        assert!(matches!(results[0], Err(TontineError::Csv(_))));
    }

    #[test]
    fn test_reader_missing_fields() {
        let data = "action, caller, value\ncontribute, alice, \nclaim, , \nadvance, bob, ";
        let reader = CommandReader::new(data.as_bytes());
        let results: Vec<Result<Command>> = reader.commands().collect();

        assert_eq!(results.len(), 3);
        for result in results {
            assert!(matches!(result, Err(TontineError::InvalidCommand(_))));
        }
    }

    #[test]
    fn test_reader_negative_amount() {
        let data = "action, caller, value\ncontribute, alice, -5";
        let reader = CommandReader::new(data.as_bytes());
        let results: Vec<Result<Command>> = reader.commands().collect();

        assert!(results[0].is_err());
    }
}
