use crate::fish::{Fish, FishDetail, FishType, Zone};
use crate::geometry::Point;
use crate::protocol::{DroneRow, InputBoard};
use itertools::Itertools;
use std::collections::{HashMap, HashSet};
use std::fmt;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RadarDir {
    TL, // creature is up-left of the drone
    TR, // up-right
    BR, // down-right
    BL, // down-left
}

impl RadarDir {
    pub fn is_left(self) -> bool {
        matches!(self, RadarDir::TL | RadarDir::BL)
    }

    pub fn is_top(self) -> bool {
        matches!(self, RadarDir::TL | RadarDir::TR)
    }
}

impl fmt::Display for RadarDir {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        fmt::Debug::fmt(self, fmt)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RadarBlip {
    pub fish_id: i32,
    pub dir: RadarDir,
}

#[derive(Debug, Clone)]
pub struct Drone {
    pub drone_id: i32,
    pub pos: Point,
    pub emergency: bool,
    pub battery: i32,
    /// every creature this drone ever reported as scanned
    pub scans: HashSet<i32>,
    /// this turn only
    pub radars: Vec<RadarBlip>,
}

impl Drone {
    fn from_row(row: &DroneRow, scans: HashSet<i32>) -> Drone {
        Drone {
            drone_id: row.drone_id,
            pos: Point::new(row.x, row.y),
            emergency: row.emergency,
            battery: row.battery,
            scans,
            radars: Vec::new(),
        }
    }

    pub fn where_i_am(&self) -> Zone {
        Zone::of_depth(self.pos.y)
    }

    pub fn radar_for(&self, fish_id: i32) -> Option<RadarDir> {
        self.radars.iter().find(|r| r.fish_id == fish_id).map(|r| r.dir)
    }

    pub fn has_scanned(&self, fish_id: i32) -> bool {
        self.scans.contains(&fish_id)
    }
}

/// The world model. The roster is fixed at startup; everything else is
/// overwritten by [`Board::update`] once per turn and read-only in between.
#[derive(Debug, Clone)]
pub struct Board {
    pub turn: u32,
    pub my_score: i32,
    pub opp_score: i32,

    pub my_scans: HashSet<i32>,
    pub opp_scans: HashSet<i32>,

    pub my_drones: Vec<Drone>,
    pub opp_drones: Vec<Drone>,

    fishes: Vec<Fish>,
    fish_idx: HashMap<i32, usize>,
}

impl Board {
    pub fn new(roster: &[(i32, FishDetail)]) -> Board {
        let fishes: Vec<Fish> = roster.iter().map(|(id, detail)| Fish::new(*id, *detail)).collect();
        let fish_idx = fishes.iter().enumerate().map(|(i, f)| (f.fish_id, i)).collect();
        Board {
            turn: 0,
            my_score: 0,
            opp_score: 0,
            my_scans: HashSet::new(),
            opp_scans: HashSet::new(),
            my_drones: Vec::new(),
            opp_drones: Vec::new(),
            fishes,
            fish_idx,
        }
    }

    /// Roster order, as announced at startup.
    pub fn fishes(&self) -> impl Iterator<Item = &Fish> {
        self.fishes.iter()
    }

    pub fn fish(&self, fish_id: i32) -> Option<&Fish> {
        self.fish_idx.get(&fish_id).map(|&i| &self.fishes[i])
    }

    fn fish_mut(&mut self, fish_id: i32) -> Option<&mut Fish> {
        self.fish_idx.get(&fish_id).map(|&i| &mut self.fishes[i])
    }

    pub fn visible_fishes(&self) -> impl Iterator<Item = &Fish> {
        self.fishes.iter().filter(|f| f.visible)
    }

    pub fn my_drone(&self, drone_id: i32) -> Option<&Drone> {
        self.my_drones.iter().find(|d| d.drone_id == drone_id)
    }

    /// Saved at the surface, or sitting in one of my drones.
    pub fn is_scanned_by_me(&self, fish_id: i32) -> bool {
        self.my_scans.contains(&fish_id) || self.my_drones.iter().any(|d| d.has_scanned(fish_id))
    }

    /// Worth sending `drone` after: a real fish nobody on my side has yet.
    pub fn is_eligible(&self, drone: &Drone, fish: &Fish) -> bool {
        !fish.fish_type().is_monster()
            && !drone.has_scanned(fish.fish_id)
            && !self.is_scanned_by_me(fish.fish_id)
    }

    /// First eligible fish of the band, roster order.
    pub fn next_unscanned(&self, drone: &Drone, fish_type: FishType) -> Option<&Fish> {
        self.fishes()
            .filter(|f| f.fish_type() == fish_type)
            .find(|f| self.is_eligible(drone, f))
    }

    pub fn update(&mut self, ib: InputBoard) {
        self.turn += 1;
        for f in self.fishes.iter_mut() {
            f.reset();
        }

        self.my_score = ib.my_score;
        self.opp_score = ib.opp_score;
        self.my_scans = ib.my_scans.into_iter().collect();
        self.opp_scans = ib.opp_scans.into_iter().collect();

        // my drones keep what they scanned, the foe's are rebuilt from scratch
        let mut prev: HashMap<i32, HashSet<i32>> =
            self.my_drones.drain(..).map(|d| (d.drone_id, d.scans)).collect();
        self.my_drones = ib
            .my_drones
            .iter()
            .map(|row| Drone::from_row(row, prev.remove(&row.drone_id).unwrap_or_default()))
            .collect();
        self.opp_drones = ib
            .opp_drones
            .iter()
            .map(|row| Drone::from_row(row, HashSet::new()))
            .collect();

        for (drone_id, fish_id) in ib.drone_scans {
            match self
                .my_drones
                .iter_mut()
                .chain(self.opp_drones.iter_mut())
                .find(|d| d.drone_id == drone_id)
            {
                Some(d) => {
                    d.scans.insert(fish_id);
                }
                None => debug!("scan {} for unknown drone {}", fish_id, drone_id),
            }
        }

        for f in self.fishes.iter_mut() {
            f.scanned_by_me = self.my_scans.contains(&f.fish_id);
            f.scanned_by_opp = self.opp_scans.contains(&f.fish_id);
        }

        for v in ib.visible_fishes {
            match self.fish_mut(v.fish_id) {
                Some(f) => {
                    f.visible = true;
                    f.pos = Point::new(v.x, v.y);
                    f.speed = Point::new(v.vx, v.vy);
                }
                None => warn!("visible fish {} is not in the roster", v.fish_id),
            }
        }

        for r in ib.radars {
            match self.my_drones.iter_mut().find(|d| d.drone_id == r.drone_id) {
                Some(d) => d.radars.push(RadarBlip { fish_id: r.fish_id, dir: r.dir }),
                None => debug!("radar blip for unknown drone {}", r.drone_id),
            }
        }

        debug!(
            "turn {} score {}/{} my scans [{}] visible [{}]",
            self.turn,
            self.my_score,
            self.opp_score,
            self.my_scans.iter().sorted().join(","),
            self.visible_fishes().map(|f| f.fish_id).join(",")
        );
    }
}
