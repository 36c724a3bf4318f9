pub mod layered;
pub mod nearest;

use crate::action::Command;
use crate::board::{Board, Drone};

pub const MAX_DRONE_SPEED: i32 = 600;
pub const LIGHT_UPDATED: i32 = 2000;
pub const MAX_BATTERY: i32 = 30;
/// battery drained by one turn of powerful light
pub const LIGHT_COST: i32 = 5;

pub fn light_allowed(battery: i32) -> bool {
    battery >= LIGHT_COST
}

/// Turns a board into orders for my drones.
pub trait Strategy {
    fn id(&self) -> &'static str;
    fn description(&self) -> &'static str;

    /// Exactly one command, whatever the board looks like.
    fn command_for(&mut self, board: &Board, drone: &Drone) -> Command;

    fn decide(&mut self, board: &Board) -> Vec<Command> {
        board.my_drones.iter().map(|d| self.command_for(board, d)).collect()
    }
}

pub fn strategy_ids() -> Vec<&'static str> {
    vec!["layered", "nearest"]
}

pub fn describe_strategies() -> Vec<(&'static str, &'static str)> {
    strategy_ids()
        .into_iter()
        .filter_map(|id| create_strategy(id).map(|s| (id, s.description())))
        .collect()
}

pub fn create_strategy(id: &str) -> Option<Box<dyn Strategy>> {
    match id {
        "layered" => Some(Box::new(layered::LayeredStrategy::new())),
        "nearest" => Some(Box::new(nearest::NearestStrategy::new())),
        _ => None,
    }
}
