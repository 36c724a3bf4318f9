//! Fall Challenge 2023 bot: drones scan fish in a 10000 x 10000 ocean and
//! surface to save the points before the opponent does.

pub mod action;
pub mod board;
pub mod config;
pub mod driver;
pub mod fish;
pub mod geometry;
pub mod protocol;
pub mod strategy;

pub use action::{Action, Command};
pub use board::{Board, Drone, RadarDir};
pub use config::BotConfig;
pub use driver::{MatchEnd, MatchSummary, TurnDriver};
pub use fish::{Fish, FishDetail, FishType};
pub use geometry::Point;
pub use protocol::{InputBoard, ProtocolError};
