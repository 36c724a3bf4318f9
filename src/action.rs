use crate::geometry::Point;
use std::fmt;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Action {
    Move(Point, bool),
    Wait(bool),
    /// stop playing, nothing is written
    Quit,
}

/// What a drone does this turn, plus a note shown next to it in the replay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    pub action: Action,
    pub message: Option<String>,
}

impl Command {
    pub fn move_to(p: Point, light: bool, message: impl Into<String>) -> Command {
        Command { action: Action::Move(p, light), message: Some(message.into()) }
    }

    pub fn wait(light: bool, message: impl Into<String>) -> Command {
        Command { action: Action::Wait(light), message: Some(message.into()) }
    }

    pub fn quit() -> Command {
        Command { action: Action::Quit, message: None }
    }

    pub fn light(&self) -> bool {
        match self.action {
            Action::Move(_, l) | Action::Wait(l) => l,
            Action::Quit => false,
        }
    }

    pub fn target(&self) -> Option<Point> {
        match self.action {
            Action::Move(p, _) => Some(p),
            _ => None,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Action::Move(p, l) => write!(fmt, "MOVE {} {} {}", p.x, p.y, *l as i32),
            Action::Wait(l) => write!(fmt, "WAIT {}", *l as i32),
            Action::Quit => fmt.write_str("QUIT"),
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        write!(fmt, "{}", self.action)?;
        if let Some(m) = &self.message {
            // the referee reads one line per drone
            let m = m.replace(['\n', '\r'], " ");
            if !m.is_empty() {
                write!(fmt, " {}", m)?;
            }
        }
        Ok(())
    }
}
