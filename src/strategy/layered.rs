//! Layer by layer hunt.
//!
//! Every drone runs its own small state machine that survives between turns:
//! pick the best band that still has something to scan, dive to it, sweep it
//! following the radar until nothing is left, surface to save the scans, and
//! start again.
//!
//! One turn may cross several states (a drone reaching the surface picks its
//! next band right away), so [`LayeredStrategy::command_for`] steps the machine
//! until a state produces a command.

use super::{light_allowed, Strategy, MAX_BATTERY, MAX_DRONE_SPEED};
use crate::action::Command;
use crate::board::{Board, Drone};
use crate::fish::{Fish, FishType};
use crate::geometry::Point;
use std::collections::HashMap;
use tracing::{debug, warn};

/// how far inside a band edge the drone sweeps
pub const BAND_MARGIN: i32 = 800;
pub const SURFACE_Y: i32 = 450;
/// scans are saved above this depth
pub const SURFACE_DONE_Y: i32 = 500;
const MAX_TRANSITIONS: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DroneState {
    #[default]
    Idle,
    SeekingLayer,
    Scanning,
    Returning,
    /// only entered through [`LayeredStrategy::force_state`]
    Charging,
}

impl DroneState {
    pub fn can_become(self, next: DroneState) -> bool {
        use DroneState::*;
        matches!(
            (self, next),
            (Idle, SeekingLayer)
                | (SeekingLayer, Scanning)
                | (SeekingLayer, Idle)
                | (Scanning, Scanning)
                | (Scanning, Returning)
                | (Scanning, Idle)
                | (Returning, Idle)
                | (Charging, Scanning)
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DroneMemory {
    pub state: DroneState,
    pub target_id: Option<i32>,
    pub target_type: Option<FishType>,
    /// states crossed during the last turn, the starting one first
    pub trail: Vec<DroneState>,
}

enum Step {
    Emit(Command),
    Goto(DroneState),
}

#[derive(Debug, Default)]
pub struct LayeredStrategy {
    memory: HashMap<i32, DroneMemory>,
}

impl LayeredStrategy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn memory_of(&self, drone_id: i32) -> Option<&DroneMemory> {
        self.memory.get(&drone_id)
    }

    pub fn state_of(&self, drone_id: i32) -> DroneState {
        self.memory.get(&drone_id).map(|m| m.state).unwrap_or_default()
    }

    /// Outside override, e.g. to park a drone until its battery is full.
    pub fn force_state(&mut self, drone_id: i32, state: DroneState) {
        self.memory.entry(drone_id).or_default().state = state;
    }

    fn target<'a>(mem: &DroneMemory, board: &'a Board) -> Option<&'a Fish> {
        mem.target_id.and_then(|id| board.fish(id))
    }

    fn step(mem: &mut DroneMemory, board: &Board, drone: &Drone) -> Step {
        match mem.state {
            DroneState::Idle => Self::idle(mem, board, drone),
            DroneState::SeekingLayer => Self::seek_layer(mem, board, drone),
            DroneState::Scanning => Self::scan(mem, board, drone),
            DroneState::Returning => Self::surface(drone),
            DroneState::Charging => Self::charge(drone),
        }
    }

    fn idle(mem: &mut DroneMemory, board: &Board, drone: &Drone) -> Step {
        for fish_type in FishType::HUNT_ORDER {
            if let Some(f) = board.next_unscanned(drone, fish_type) {
                debug!(
                    "drone {} hunts {} ({} pts) in layer {}",
                    drone.drone_id,
                    f.fish_id,
                    f.value(),
                    fish_type.code()
                );
                mem.target_id = Some(f.fish_id);
                mem.target_type = Some(fish_type);
                return Step::Goto(DroneState::SeekingLayer);
            }
        }
        mem.target_id = None;
        mem.target_type = None;
        Step::Emit(Command::wait(false, "Unable to find a target!!!"))
    }

    // dive, light off: nothing to see above the band
    fn seek_layer(mem: &mut DroneMemory, board: &Board, drone: &Drone) -> Step {
        let Some(target) = Self::target(mem, board) else {
            return Step::Goto(DroneState::Idle);
        };
        let fish_type = target.fish_type();
        if drone.pos.y >= fish_type.min_y() {
            return Step::Goto(DroneState::Scanning);
        }
        let dx = match drone.radar_for(target.fish_id) {
            Some(dir) if dir.is_left() => -MAX_DRONE_SPEED,
            Some(_) => MAX_DRONE_SPEED,
            None => 0,
        };
        let p = Point::new(drone.pos.x, fish_type.min_y() + BAND_MARGIN)
            .shifted_x(dx)
            .clamped();
        debug!("drone {} in {:?} diving to {}", drone.drone_id, drone.where_i_am(), p);
        Step::Emit(Command::move_to(p, false, format!("Moving to layer {}", fish_type.code())))
    }

    fn scan(mem: &mut DroneMemory, board: &Board, drone: &Drone) -> Step {
        let Some(mut target) = Self::target(mem, board) else {
            return Step::Goto(DroneState::Idle);
        };
        let band = mem.target_type.unwrap_or_else(|| target.fish_type());

        if board.is_scanned_by_me(target.fish_id) {
            match board.next_unscanned(drone, band) {
                Some(next) => {
                    debug!(
                        "drone {} got {}, now after {}",
                        drone.drone_id, target.fish_id, next.fish_id
                    );
                    mem.target_id = Some(next.fish_id);
                    target = next;
                }
                None => return Step::Goto(DroneState::Returning),
            }
        }

        let p = match drone.radar_for(target.fish_id) {
            Some(dir) => {
                debug!("drone {} sweeps {} toward {}", drone.drone_id, target.fish_id, dir);
                let dx = if dir.is_left() { -MAX_DRONE_SPEED } else { MAX_DRONE_SPEED };
                let y = if dir.is_top() {
                    band.min_y() + BAND_MARGIN
                } else {
                    band.max_y() - BAND_MARGIN
                };
                Point::new(drone.pos.x, y).shifted_x(dx)
            }
            None if target.visible => target.target_pos(),
            None => Point::new(drone.pos.x, band.min_y() + BAND_MARGIN),
        };
        Step::Emit(Command::move_to(
            p.clamped(),
            light_allowed(drone.battery),
            format!("Scanning for {}", target.fish_id),
        ))
    }

    fn surface(drone: &Drone) -> Step {
        if drone.pos.y <= SURFACE_DONE_Y {
            return Step::Goto(DroneState::Idle);
        }
        Step::Emit(Command::move_to(Point::new(drone.pos.x, SURFACE_Y), false, "Surfacing!"))
    }

    fn charge(drone: &Drone) -> Step {
        if drone.battery <= MAX_BATTERY {
            return Step::Emit(Command::wait(false, "Charging"));
        }
        Step::Goto(DroneState::Scanning)
    }
}

impl Strategy for LayeredStrategy {
    fn id(&self) -> &'static str {
        "layered"
    }

    fn description(&self) -> &'static str {
        "Sticky per-drone state machine: dive to the best band, sweep it by radar, surface, repeat."
    }

    fn command_for(&mut self, board: &Board, drone: &Drone) -> Command {
        let mem = self.memory.entry(drone.drone_id).or_default();
        mem.trail.clear();
        mem.trail.push(mem.state);

        if drone.emergency {
            return Command::wait(false, "Emergency");
        }

        for _ in 0..MAX_TRANSITIONS {
            match Self::step(mem, board, drone) {
                Step::Emit(cmd) => return cmd,
                Step::Goto(next) => {
                    debug_assert!(mem.state.can_become(next), "{:?} -> {:?}", mem.state, next);
                    debug!("drone {} {:?} -> {:?}", drone.drone_id, mem.state, next);
                    mem.state = next;
                    mem.trail.push(next);
                }
            }
        }
        warn!("drone {} did not settle, trail {:?}", drone.drone_id, mem.trail);
        Command::wait(false, "Lost")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::Action;
    use crate::board::RadarDir;
    use crate::fish::FishDetail;
    use crate::protocol::{DroneRow, InputBoard, RadarRow, VisibleRow};

    fn roster() -> Vec<(i32, FishDetail)> {
        vec![
            (3, FishDetail { color: 0, fish_type: FishType::Deep }),
            (4, FishDetail { color: 1, fish_type: FishType::Deep }),
            (5, FishDetail { color: 0, fish_type: FishType::Shallow }),
        ]
    }

    struct Turn {
        x: i32,
        y: i32,
        battery: i32,
        drone_scans: Vec<i32>,
        radars: Vec<(i32, RadarDir)>,
        visible: Vec<VisibleRow>,
    }

    impl Turn {
        fn at(x: i32, y: i32) -> Turn {
            Turn {
                x,
                y,
                battery: 30,
                drone_scans: vec![],
                radars: vec![],
                visible: vec![],
            }
        }
    }

    fn play(s: &mut LayeredStrategy, b: &mut Board, t: Turn) -> Command {
        b.update(InputBoard {
            my_drones: vec![DroneRow {
                drone_id: 0,
                x: t.x,
                y: t.y,
                emergency: false,
                battery: t.battery,
            }],
            drone_scans: t.drone_scans.iter().map(|&f| (0, f)).collect(),
            visible_fishes: t.visible,
            radars: t
                .radars
                .iter()
                .map(|&(fish_id, dir)| RadarRow { drone_id: 0, fish_id, dir })
                .collect(),
            ..Default::default()
        });
        let mut cmds = s.decide(b);
        assert_eq!(cmds.len(), 1);
        cmds.remove(0)
    }

    #[test]
    fn idle_picks_the_deepest_band_and_dives() {
        let mut s = LayeredStrategy::new();
        let mut b = Board::new(&roster());
        let c = play(&mut s, &mut b, Turn::at(2000, 0));
        assert_eq!(c.action, Action::Move(Point::new(2000, 8300), false));
        let m = s.memory_of(0).unwrap();
        assert_eq!(m.state, DroneState::SeekingLayer);
        assert_eq!(m.target_id, Some(3));
        assert_eq!(m.target_type, Some(FishType::Deep));
        assert_eq!(m.trail, vec![DroneState::Idle, DroneState::SeekingLayer]);
    }

    #[test]
    fn dive_drifts_toward_the_radar() {
        let mut s = LayeredStrategy::new();
        let mut b = Board::new(&roster());
        let mut t = Turn::at(2000, 0);
        t.radars = vec![(3, RadarDir::BL)];
        let c = play(&mut s, &mut b, t);
        assert_eq!(c.target(), Some(Point::new(1400, 8300)));
        assert!(!c.light());
    }

    #[test]
    fn scanning_sweeps_the_band_edge_from_the_radar() {
        let mut s = LayeredStrategy::new();
        let mut b = Board::new(&roster());
        let mut t = Turn::at(2000, 7600);
        t.radars = vec![(3, RadarDir::TR)];
        let c = play(&mut s, &mut b, t);
        assert_eq!(c.action, Action::Move(Point::new(2600, 8300), true));
        assert_eq!(s.state_of(0), DroneState::Scanning);

        let mut t = Turn::at(2600, 8000);
        t.radars = vec![(3, RadarDir::BL)];
        let c = play(&mut s, &mut b, t);
        assert_eq!(c.action, Action::Move(Point::new(2000, 9200), true));
    }

    #[test]
    fn no_radar_visible_target_is_chased() {
        let mut s = LayeredStrategy::new();
        let mut b = Board::new(&roster());
        let mut t = Turn::at(2000, 8000);
        t.visible = vec![VisibleRow { fish_id: 3, x: 2500, y: 8500, vx: 100, vy: -100 }];
        let c = play(&mut s, &mut b, t);
        assert_eq!(c.target(), Some(Point::new(2600, 8400)));
    }

    #[test]
    fn extreme_coordinates_stay_on_the_map() {
        let mut s = LayeredStrategy::new();
        let mut b = Board::new(&roster());
        let mut t = Turn::at(2000, 8000);
        t.visible = vec![VisibleRow { fish_id: 3, x: 2147483000, y: 8000, vx: 1000, vy: 0 }];
        let c = play(&mut s, &mut b, t);
        assert_eq!(c.action, Action::Move(Point::new(9999, 8000), true));

        let mut t = Turn::at(i32::MAX - 100, 8000);
        t.radars = vec![(3, RadarDir::TR)];
        let c = play(&mut s, &mut b, t);
        assert_eq!(c.action, Action::Move(Point::new(9999, 8300), true));

        let mut s = LayeredStrategy::new();
        let mut t = Turn::at(i32::MAX - 100, 0);
        t.radars = vec![(3, RadarDir::BR)];
        let c = play(&mut s, &mut b, t);
        assert_eq!(c.action, Action::Move(Point::new(9999, 8300), false));
    }

    #[test]
    fn retargets_in_the_same_band_then_returns() {
        let mut s = LayeredStrategy::new();
        let mut b = Board::new(&roster());
        play(&mut s, &mut b, Turn::at(2000, 8000));
        assert_eq!(s.memory_of(0).unwrap().target_id, Some(3));

        let mut t = Turn::at(2000, 8000);
        t.drone_scans = vec![3];
        t.radars = vec![(4, RadarDir::BR)];
        let c = play(&mut s, &mut b, t);
        assert_eq!(s.memory_of(0).unwrap().target_id, Some(4));
        assert_eq!(c.message.as_deref(), Some("Scanning for 4"));

        // 5 is left, but in another band: surface first
        let mut t = Turn::at(2000, 8000);
        t.drone_scans = vec![4];
        let c = play(&mut s, &mut b, t);
        assert_eq!(c.action, Action::Move(Point::new(2000, SURFACE_Y), false));
        assert_eq!(s.state_of(0), DroneState::Returning);
    }

    #[test]
    fn surfacing_turn_already_plays_the_next_hunt() {
        let mut s = LayeredStrategy::new();
        let mut b = Board::new(&roster());
        play(&mut s, &mut b, Turn::at(2000, 8000));
        let mut t = Turn::at(2000, 8000);
        t.drone_scans = vec![3, 4];
        play(&mut s, &mut b, t);
        assert_eq!(s.state_of(0), DroneState::Returning);

        let c = play(&mut s, &mut b, Turn::at(2000, 3000));
        assert_eq!(c.target(), Some(Point::new(2000, SURFACE_Y)));

        // crossing the threshold: Idle picks the shallow fish and dives in the same turn
        let c = play(&mut s, &mut b, Turn::at(2000, 480));
        assert_eq!(c.action, Action::Move(Point::new(2000, 3300), false));
        let m = s.memory_of(0).unwrap();
        assert_eq!(
            m.trail,
            vec![DroneState::Returning, DroneState::Idle, DroneState::SeekingLayer]
        );
        assert_eq!(m.target_id, Some(5));
    }

    #[test]
    fn nothing_left_waits_in_idle() {
        let mut s = LayeredStrategy::new();
        let mut b = Board::new(&roster());
        let mut t = Turn::at(2000, 8000);
        t.drone_scans = vec![3, 4, 5];
        let c = play(&mut s, &mut b, t);
        assert_eq!(c.action, Action::Wait(false));
        assert_eq!(s.state_of(0), DroneState::Idle);
    }

    #[test]
    fn empty_battery_still_moves_in_the_dark() {
        let mut s = LayeredStrategy::new();
        let mut b = Board::new(&roster());
        let mut t = Turn::at(2000, 8000);
        t.battery = 0;
        t.radars = vec![(3, RadarDir::TL)];
        let c = play(&mut s, &mut b, t);
        assert_eq!(c.action, Action::Move(Point::new(1400, 8300), false));
    }

    #[test]
    fn stale_target_falls_back_to_idle() {
        let mut s = LayeredStrategy::new();
        let mut b = Board::new(&roster());
        play(&mut s, &mut b, Turn::at(2000, 8000));
        s.memory.get_mut(&0).unwrap().target_id = Some(99);
        let c = play(&mut s, &mut b, Turn::at(2000, 8000));
        let m = s.memory_of(0).unwrap();
        assert_eq!(m.trail[..2], [DroneState::Scanning, DroneState::Idle]);
        assert_eq!(m.target_id, Some(3));
        assert!(matches!(c.action, Action::Move(..)));
    }

    #[test]
    fn charging_waits_until_full() {
        let mut s = LayeredStrategy::new();
        let mut b = Board::new(&roster());
        s.force_state(0, DroneState::Charging);
        let c = play(&mut s, &mut b, Turn::at(2000, 8000));
        assert_eq!(c.action, Action::Wait(false));
        assert_eq!(s.state_of(0), DroneState::Charging);

        let mut t = Turn::at(2000, 8000);
        t.battery = MAX_BATTERY + 1;
        let c = play(&mut s, &mut b, t);
        assert!(matches!(c.action, Action::Move(..)));
        assert_eq!(s.memory_of(0).unwrap().trail[1], DroneState::Scanning);
    }

    #[test]
    fn emergency_keeps_the_plan() {
        let mut s = LayeredStrategy::new();
        let mut b = Board::new(&roster());
        play(&mut s, &mut b, Turn::at(2000, 8000));
        b.update(InputBoard {
            my_drones: vec![DroneRow {
                drone_id: 0,
                x: 2000,
                y: 8000,
                emergency: true,
                battery: 30,
            }],
            ..Default::default()
        });
        let c = s.decide(&b).remove(0);
        assert_eq!(c.action, Action::Wait(false));
        assert_eq!(s.state_of(0), DroneState::Scanning);
    }

    #[test]
    fn transition_table() {
        use DroneState::*;
        assert!(Idle.can_become(SeekingLayer));
        assert!(!Idle.can_become(Scanning));
        assert!(!Returning.can_become(Scanning));
        assert!(!Charging.can_become(Idle));
        assert!(Scanning.can_become(Returning));
    }
}
