//! Go for the closest fish in sight, decided again from scratch every turn.

use super::{light_allowed, Strategy, LIGHT_UPDATED, MAX_DRONE_SPEED};
use crate::action::Command;
use crate::board::{Board, Drone};
use crate::geometry::Point;
use tracing::debug;

#[derive(Debug, Default)]
pub struct NearestStrategy;

impl NearestStrategy {
    pub fn new() -> Self {
        Self
    }
}

impl Strategy for NearestStrategy {
    fn id(&self) -> &'static str {
        "nearest"
    }

    fn description(&self) -> &'static str {
        "Chase the nearest visible unscanned fish, no memory between turns."
    }

    fn command_for(&mut self, board: &Board, drone: &Drone) -> Command {
        let best = board
            .visible_fishes()
            .filter(|f| board.is_eligible(drone, f))
            .map(|f| (Point::dist(&drone.pos, &f.target_pos()), f))
            .min_by(|a, b| a.0.total_cmp(&b.0));

        match best {
            Some((dist, f)) => {
                // still out of reach after this turn's move: save the battery
                let light = light_allowed(drone.battery)
                    && dist - f64::from(MAX_DRONE_SPEED) < f64::from(LIGHT_UPDATED);
                debug!("drone {} chases {} at {:.0}", drone.drone_id, f.fish_id, dist);
                let p = f.target_pos().clamped();
                Command::move_to(p, light, format!("Chasing {}", f.fish_id))
            }
            None => Command::wait(false, "Nothing in sight"),
        }
    }
}
