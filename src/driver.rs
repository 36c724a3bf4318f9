use crate::action::Action;
use crate::board::Board;
use crate::protocol::{ProtocolError, Reader};
use crate::strategy::Strategy;
use std::io::{BufRead, Write};
use std::time::Instant;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchEnd {
    /// the referee closed the input
    InputClosed,
    /// the strategy asked to stop
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchSummary {
    pub turns: u32,
    pub my_score: i32,
    pub opp_score: i32,
    pub end: MatchEnd,
}

/// Reads the referee, asks the strategy, writes the answer. One turn at a time.
pub struct TurnDriver<R, W> {
    reader: Reader<R>,
    out: W,
    strategy: Box<dyn Strategy>,
}

impl<R: BufRead, W: Write> TurnDriver<R, W> {
    pub fn new(input: R, out: W, strategy: Box<dyn Strategy>, echo_input: bool) -> Self {
        TurnDriver { reader: Reader::new(input, echo_input), out, strategy }
    }

    pub fn run(&mut self) -> Result<MatchSummary, ProtocolError> {
        let roster = self.reader.read_roster()?;
        info!("{} creatures, strategy {}", roster.len(), self.strategy.id());
        let mut board = Board::new(&roster);

        while let Some(ib) = self.reader.read_turn()? {
            board.update(ib);
            let start = Instant::now();
            let commands = self.strategy.decide(&board);
            debug!("TIME {:?}", start.elapsed());

            for cmd in commands {
                if cmd.action == Action::Quit {
                    info!("quit at turn {}", board.turn);
                    self.out.flush()?;
                    return Ok(MatchSummary::of(&board, MatchEnd::Quit));
                }
                writeln!(self.out, "{}", cmd)?;
            }
            self.out.flush()?;
        }

        info!("input closed after {} turns", board.turn);
        Ok(MatchSummary::of(&board, MatchEnd::InputClosed))
    }

    pub fn into_output(self) -> W {
        self.out
    }
}

impl MatchSummary {
    fn of(board: &Board, end: MatchEnd) -> MatchSummary {
        MatchSummary {
            turns: board.turn,
            my_score: board.my_score,
            opp_score: board.opp_score,
            end,
        }
    }
}
