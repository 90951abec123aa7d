// WHY: Page and duration estimates from line-type densities
// Page quantities are integer hundredths so cumulative offsets never drift

use serde::{Serialize, Serializer};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign};
use std::time::Duration;

/// Page quantity in hundredths of a screenplay page
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Pages(pub u64);

impl Pages {
    pub const ZERO: Pages = Pages(0);

    /// Round a fractional page count to the nearest hundredth
    pub fn from_fraction(pages: f64) -> Self {
        if pages.is_finite() && pages > 0.0 {
            Pages((pages * 100.0).round() as u64)
        } else {
            Pages::ZERO
        }
    }

    pub fn hundredths(self) -> u64 {
        self.0
    }

    pub fn as_f64(self) -> f64 {
        self.0 as f64 / 100.0
    }
}

impl Add for Pages {
    type Output = Pages;

    fn add(self, rhs: Pages) -> Pages {
        Pages(self.0 + rhs.0)
    }
}

impl AddAssign for Pages {
    fn add_assign(&mut self, rhs: Pages) {
        self.0 += rhs.0;
    }
}

impl Sum for Pages {
    fn sum<I: Iterator<Item = Pages>>(iter: I) -> Pages {
        iter.fold(Pages::ZERO, Add::add)
    }
}

impl fmt::Display for Pages {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.0 / 100, self.0 % 100)
    }
}

impl Serialize for Pages {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.as_f64())
    }
}

/// Serialize a duration as fractional minutes rounded to hundredths
pub fn serialize_minutes<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(round_hundredths(duration.as_secs_f64() / 60.0))
}

pub(crate) fn round_hundredths(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Densities and duration constants for page estimation
#[derive(Debug, Clone)]
pub struct PaginationRules {
    pub dialogue_lines_per_page: f64,
    pub action_lines_per_page: f64,
    pub minutes_per_page: f64,
    /// Floor applied to every scene duration
    pub min_scene_minutes: f64,
}

impl Default for PaginationRules {
    fn default() -> Self {
        Self {
            dialogue_lines_per_page: 45.0,
            action_lines_per_page: 58.0,
            minutes_per_page: 3.0,
            min_scene_minutes: 0.5,
        }
    }
}

impl PaginationRules {
    /// Page count for a scene tally, rounded to hundredths once
    pub fn estimate_pages(&self, tally: &LineTally) -> Pages {
        let dialogue = tally.dialogue as f64 / self.dialogue_lines_per_page;
        let action = tally.action as f64 / self.action_lines_per_page;
        Pages::from_fraction(dialogue + action)
    }

    /// Shooting time estimate: minutes per page with a per-scene floor
    pub fn estimate_duration(&self, pages: Pages) -> Duration {
        let minutes = (pages.as_f64() * self.minutes_per_page).max(self.min_scene_minutes);
        Duration::from_secs_f64(minutes * 60.0)
    }
}

/// Running dialogue/action line counts for one scene
///
/// A cue line switches dialogue on and is itself dialogue; a blank line
/// switches it off. Everything else counts as action.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineTally {
    pub dialogue: usize,
    pub action: usize,
    in_dialogue: bool,
}

impl LineTally {
    pub fn observe_blank(&mut self) {
        self.in_dialogue = false;
    }

    pub fn observe_cue(&mut self) {
        self.in_dialogue = true;
        self.dialogue += 1;
    }

    pub fn observe_line(&mut self) {
        if self.in_dialogue {
            self.dialogue += 1;
        } else {
            self.action += 1;
        }
    }

    pub fn total(&self) -> usize {
        self.dialogue + self.action
    }
}

/// Cumulative page position across finalized scenes
#[derive(Debug, Clone, Copy, Default)]
pub struct PageCursor {
    position: Pages,
}

impl PageCursor {
    /// Returns (start, end) for a scene of the given length and moves past it
    pub fn advance(&mut self, pages: Pages) -> (Pages, Pages) {
        let start = self.position;
        self.position += pages;
        (start, self.position)
    }

    pub fn position(&self) -> Pages {
        self.position
    }
}
