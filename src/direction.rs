// src/direction.rs
use serde::{Deserialize, Serialize};

use crate::sources::types::{Coordinate, Place};

/// Mornings (04:00 up to noon) head to work; everything else heads home.
const MORNING_HOURS: std::ops::Range<u32> = 4..12;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    ToWork,
    ToHome,
}

impl Direction {
    pub fn from_hour(hour: u32) -> Self {
        if MORNING_HOURS.contains(&hour) {
            Direction::ToWork
        } else {
            Direction::ToHome
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Direction::ToWork => "To Work",
            Direction::ToHome => "To Home",
        }
    }

    pub fn origin(self) -> Place {
        match self {
            Direction::ToWork => Place::Home,
            Direction::ToHome => Place::Work,
        }
    }

    pub fn destination(self) -> Place {
        match self {
            Direction::ToWork => Place::Work,
            Direction::ToHome => Place::Home,
        }
    }

    /// Events only matter on the way home.
    pub fn shows_events(self) -> bool {
        matches!(self, Direction::ToHome)
    }
}

/// What one run fetches and between which endpoints.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunPlan {
    pub direction: Direction,
    pub origin: Coordinate,
    pub destination: Coordinate,
    pub include_events: bool,
}

impl RunPlan {
    pub fn new(direction: Direction, home: Coordinate, work: Coordinate) -> Self {
        let (origin, destination) = match direction {
            Direction::ToWork => (home, work),
            Direction::ToHome => (work, home),
        };
        Self {
            direction,
            origin,
            destination,
            include_events: direction.shows_events(),
        }
    }

    pub fn for_hour(hour: u32, home: Coordinate, work: Coordinate) -> Self {
        Self::new(Direction::from_hour(hour), home, work)
    }

    pub fn origin_place(&self) -> Place {
        self.direction.origin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOME: Coordinate = Coordinate::new(39.97, -75.18);
    const WORK: Coordinate = Coordinate::new(39.68, -75.69);

    #[test]
    fn morning_plan_runs_home_to_work_without_events() {
        let plan = RunPlan::for_hour(7, HOME, WORK);
        assert_eq!(plan.direction, Direction::ToWork);
        assert_eq!(plan.origin, HOME);
        assert_eq!(plan.destination, WORK);
        assert_eq!(plan.origin_place(), Place::Home);
        assert!(!plan.include_events);
    }

    #[test]
    fn evening_plan_runs_work_to_home_with_events() {
        let plan = RunPlan::for_hour(17, HOME, WORK);
        assert_eq!(plan.direction, Direction::ToHome);
        assert_eq!(plan.origin, WORK);
        assert_eq!(plan.destination, HOME);
        assert_eq!(plan.origin_place(), Place::Work);
        assert!(plan.include_events);
    }
}
