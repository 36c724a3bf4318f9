//! Line protocol spoken by the referee.
//!
//! Startup: the creature roster. Then, every turn, the whole visible state of
//! the match in a fixed order of counted sections.

use crate::board::RadarDir;
use crate::fish::{FishDetail, FishType};
use regex::Regex;
use std::io::{self, BufRead};
use std::str::FromStr;
use thiserror::Error;
use tracing::info;

const RADAR_ROW: &str = r"^(\d+)\s+(\d+)\s+(TL|TR|BL|BR)$";

#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("unexpected end of input while reading {0}")]
    Eof(&'static str),
    #[error("line {line}: cannot read a number from {text:?}")]
    BadNumber {
        line: usize,
        text: String,
        #[source]
        source: std::num::ParseIntError,
    },
    #[error("line {line}: expected {expected} fields, got {text:?}")]
    BadRow {
        line: usize,
        expected: usize,
        text: String,
    },
    #[error("line {line}: bad radar blip {text:?}")]
    BadRadar { line: usize, text: String },
    #[error("unknown fish type {0}")]
    UnknownFishType(i32),
    #[error(transparent)]
    Io(#[from] io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DroneRow {
    pub drone_id: i32,
    pub x: i32,
    pub y: i32,
    pub emergency: bool,
    pub battery: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisibleRow {
    pub fish_id: i32,
    pub x: i32,
    pub y: i32,
    pub vx: i32,
    pub vy: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RadarRow {
    pub drone_id: i32,
    pub fish_id: i32,
    pub dir: RadarDir,
}

/// Everything the referee sends for one turn, as received.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputBoard {
    pub my_score: i32,
    pub opp_score: i32,
    pub my_scans: Vec<i32>,
    pub opp_scans: Vec<i32>,
    pub my_drones: Vec<DroneRow>,
    pub opp_drones: Vec<DroneRow>,
    /// (drone_id, fish_id), both players mixed
    pub drone_scans: Vec<(i32, i32)>,
    pub visible_fishes: Vec<VisibleRow>,
    pub radars: Vec<RadarRow>,
}

pub struct Reader<R> {
    input: R,
    echo: bool,
    line_no: usize,
    radar_row: Regex,
}

impl<R: BufRead> Reader<R> {
    /// With `echo` every line read is logged, handy to replay a match offline.
    pub fn new(input: R, echo: bool) -> Reader<R> {
        Reader {
            input,
            echo,
            line_no: 0,
            radar_row: Regex::new(RADAR_ROW).expect("radar row pattern compiles"),
        }
    }

    fn try_next_line(&mut self) -> Result<Option<String>, ProtocolError> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        self.line_no += 1;
        let line = line.trim().to_string();
        if self.echo {
            info!(target: "input", "{}", line);
        }
        Ok(Some(line))
    }

    fn next_line(&mut self, what: &'static str) -> Result<String, ProtocolError> {
        self.try_next_line()?.ok_or(ProtocolError::Eof(what))
    }

    fn number<T>(&self, text: &str) -> Result<T, ProtocolError>
    where
        T: FromStr<Err = std::num::ParseIntError>,
    {
        text.parse::<T>().map_err(|source| ProtocolError::BadNumber {
            line: self.line_no,
            text: text.to_string(),
            source,
        })
    }

    fn count(&mut self, what: &'static str) -> Result<usize, ProtocolError> {
        let line = self.next_line(what)?;
        self.number(&line)
    }

    fn row(&mut self, what: &'static str, expected: usize) -> Result<Vec<i32>, ProtocolError> {
        let line = self.next_line(what)?;
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() != expected {
            return Err(ProtocolError::BadRow {
                line: self.line_no,
                expected,
                text: line.clone(),
            });
        }
        fields.iter().map(|f| self.number(f)).collect()
    }

    fn ids(&mut self, what: &'static str) -> Result<Vec<i32>, ProtocolError> {
        let n = self.count(what)?;
        (0..n).map(|_| self.row(what, 1).map(|r| r[0])).collect()
    }

    fn drones(&mut self, what: &'static str) -> Result<Vec<DroneRow>, ProtocolError> {
        let n = self.count(what)?;
        (0..n)
            .map(|_| {
                let r = self.row(what, 5)?;
                Ok(DroneRow {
                    drone_id: r[0],
                    x: r[1],
                    y: r[2],
                    emergency: r[3] == 1,
                    battery: r[4],
                })
            })
            .collect()
    }

    fn radar(&mut self) -> Result<RadarRow, ProtocolError> {
        let line = self.next_line("radar blips")?;
        let bad = || ProtocolError::BadRadar {
            line: self.line_no,
            text: line.clone(),
        };
        let caps = self.radar_row.captures(&line).ok_or_else(bad)?;
        let dir = match &caps[3] {
            "TL" => RadarDir::TL,
            "TR" => RadarDir::TR,
            "BL" => RadarDir::BL,
            "BR" => RadarDir::BR,
            _ => return Err(bad()),
        };
        Ok(RadarRow {
            drone_id: self.number(&caps[1])?,
            fish_id: self.number(&caps[2])?,
            dir,
        })
    }

    /// Startup section, sent once: `id color type` for every creature.
    pub fn read_roster(&mut self) -> Result<Vec<(i32, FishDetail)>, ProtocolError> {
        let n = self.count("creature count")?;
        (0..n)
            .map(|_| {
                let r = self.row("creature roster", 3)?;
                let fish_type = FishType::from_code(r[2])?;
                Ok((r[0], FishDetail { color: r[1], fish_type }))
            })
            .collect()
    }

    /// One turn, or `None` when the referee closed the stream between turns.
    pub fn read_turn(&mut self) -> Result<Option<InputBoard>, ProtocolError> {
        let my_score = match self.try_next_line()? {
            None => return Ok(None),
            Some(line) => self.number(&line)?,
        };
        let opp_score = {
            let line = self.next_line("foe score")?;
            self.number(&line)?
        };
        let my_scans = self.ids("my scans")?;
        let opp_scans = self.ids("foe scans")?;
        let my_drones = self.drones("my drones")?;
        let opp_drones = self.drones("foe drones")?;

        let n = self.count("drone scans")?;
        let drone_scans = (0..n)
            .map(|_| self.row("drone scans", 2).map(|r| (r[0], r[1])))
            .collect::<Result<Vec<_>, _>>()?;

        let n = self.count("visible creatures")?;
        let visible_fishes = (0..n)
            .map(|_| {
                let r = self.row("visible creatures", 5)?;
                Ok(VisibleRow {
                    fish_id: r[0],
                    x: r[1],
                    y: r[2],
                    vx: r[3],
                    vy: r[4],
                })
            })
            .collect::<Result<Vec<_>, ProtocolError>>()?;

        let n = self.count("radar blips")?;
        let radars = (0..n).map(|_| self.radar()).collect::<Result<Vec<_>, _>>()?;

        Ok(Some(InputBoard {
            my_score,
            opp_score,
            my_scans,
            opp_scans,
            my_drones,
            opp_drones,
            drone_scans,
            visible_fishes,
            radars,
        }))
    }
}
