use crate::geometry::Point;
use crate::protocol::ProtocolError;

/// Horizontal slices of the ocean. Fish of a given type never leave their zone.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Zone {
    Surface,
    Shallow,
    Middle,
    Deep,
    /// where monsters roam
    Abyss,
}

impl Zone {
    pub fn min_y(self) -> i32 {
        match self {
            Zone::Surface => 0,
            Zone::Shallow => 2500,
            Zone::Middle => 5000,
            Zone::Deep => 7500,
            Zone::Abyss => 2500,
        }
    }

    /// exclusive
    pub fn max_y(self) -> i32 {
        match self {
            Zone::Surface => 2500,
            Zone::Shallow => 5000,
            Zone::Middle => 7500,
            Zone::Deep | Zone::Abyss => 10000,
        }
    }

    pub fn of_depth(y: i32) -> Zone {
        if y < Zone::Shallow.min_y() {
            Zone::Surface
        } else if y < Zone::Middle.min_y() {
            Zone::Shallow
        } else if y < Zone::Deep.min_y() {
            Zone::Middle
        } else {
            Zone::Deep
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum FishType {
    Shallow,
    Middle,
    Deep,
    Monster,
}

impl FishType {
    /// Order in which the bands are worth hunting, best first.
    pub const HUNT_ORDER: [FishType; 3] = [FishType::Deep, FishType::Middle, FishType::Shallow];

    pub fn from_code(code: i32) -> Result<FishType, ProtocolError> {
        match code {
            0 => Ok(FishType::Shallow),
            1 => Ok(FishType::Middle),
            2 => Ok(FishType::Deep),
            -1 => Ok(FishType::Monster),
            other => Err(ProtocolError::UnknownFishType(other)),
        }
    }

    pub fn code(self) -> i32 {
        match self {
            FishType::Shallow => 0,
            FishType::Middle => 1,
            FishType::Deep => 2,
            FishType::Monster => -1,
        }
    }

    pub fn zone(self) -> Zone {
        match self {
            FishType::Shallow => Zone::Shallow,
            FishType::Middle => Zone::Middle,
            FishType::Deep => Zone::Deep,
            FishType::Monster => Zone::Abyss,
        }
    }

    pub fn points(self) -> i32 {
        match self {
            FishType::Shallow => 1,
            FishType::Middle => 2,
            FishType::Deep => 3,
            FishType::Monster => 0,
        }
    }

    pub fn min_y(self) -> i32 {
        self.zone().min_y()
    }

    pub fn max_y(self) -> i32 {
        self.zone().max_y()
    }

    pub fn is_monster(self) -> bool {
        self == FishType::Monster
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct FishDetail {
    pub color: i32,
    pub fish_type: FishType,
}

/// One entry of the roster. The detail never changes during a match, everything
/// else is rewritten every turn.
#[derive(Debug, Clone)]
pub struct Fish {
    pub fish_id: i32,
    pub detail: FishDetail,
    pub visible: bool,
    pub pos: Point,
    pub speed: Point,
    pub scanned_by_me: bool,
    pub scanned_by_opp: bool,
}

impl Fish {
    pub fn new(fish_id: i32, detail: FishDetail) -> Fish {
        Fish {
            fish_id,
            detail,
            visible: false,
            pos: Point::UNKNOWN,
            speed: Point::default(),
            scanned_by_me: false,
            scanned_by_opp: false,
        }
    }

    pub fn reset(&mut self) {
        self.visible = false;
        self.pos = Point::UNKNOWN;
        self.speed = Point::default();
        self.scanned_by_me = false;
        self.scanned_by_opp = false;
    }

    pub fn fish_type(&self) -> FishType {
        self.detail.fish_type
    }

    /// where the fish should be next turn
    pub fn target_pos(&self) -> Point {
        Point::add(self.pos, self.speed)
    }

    /// Nobody saved it yet: the first scan is worth double.
    pub fn value(&self) -> i32 {
        let points = self.detail.fish_type.points();
        if self.scanned_by_me || self.scanned_by_opp {
            points
        } else {
            points * 2
        }
    }
}
