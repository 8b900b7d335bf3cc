use crate::domain::participant::ParticipantId;
use crate::domain::tontine::Phase;
use crate::error::Result;
use serde::Serialize;
use std::io::Write;

/// Final state of a simulation run.
#[derive(Debug, Serialize, PartialEq, Clone)]
pub struct Summary {
    pub phase: Phase,
    pub balance: u64,
    pub participants: usize,
    pub winner: Option<ParticipantId>,
    pub payout: Option<u64>,
}

/// Writes run summaries as CSV with the header
/// `phase,balance,participants,winner,payout`.
pub struct SummaryWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> SummaryWriter<W> {
    pub fn new(sink: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(sink),
        }
    }

    pub fn write_summary(&mut self, summary: &Summary) -> Result<()> {
        self.writer.serialize(summary)?;
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(summary: &Summary) -> String {
        let mut buf = Vec::new();
        SummaryWriter::new(&mut buf).write_summary(summary).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_write_running_summary() {
        let out = render(&Summary {
            phase: Phase::Started,
            balance: 2000,
            participants: 2,
            winner: None,
            payout: None,
        });
        assert_eq!(
            out,
            "phase,balance,participants,winner,payout\nstarted,2000,2,,\n"
        );
    }

    #[test]
    fn test_write_closed_summary() {
        let out = render(&Summary {
            phase: Phase::Closed,
            balance: 0,
            participants: 0,
            winner: Some("alice".into()),
            payout: Some(2000),
        });
        assert!(out.ends_with("closed,0,0,alice,2000\n"));
    }
}
