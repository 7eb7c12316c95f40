//! Selected-day tracking and the hourly projection for that day.

use crate::model::{ForecastDay, HourSample};

/// Only every n-th hourly sample is shown for a day.
pub const HOUR_STRIDE: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Prev,
    Next,
}

/// Index into a forecast's day list, kept within `[0, len - 1]`.
///
/// With no days (`len == 0`) the index stays at 0 and every move is a no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DayNavigator {
    selected: usize,
    len: usize,
}

impl DayNavigator {
    pub fn new(len: usize) -> Self {
        Self { selected: 0, len }
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns `false` when `index` is not a day of the forecast; the selection is then
    /// left alone. Selecting the current day is a no-op that still returns `true`.
    pub fn select(&mut self, index: usize) -> bool {
        if index >= self.len {
            return false;
        }
        self.selected = index;
        true
    }

    /// Move one day, stopping at either end. Returns whether the selection changed.
    pub fn step(&mut self, direction: Direction) -> bool {
        match direction {
            Direction::Prev if self.selected > 0 => {
                self.selected -= 1;
                true
            }
            Direction::Next if self.selected + 1 < self.len => {
                self.selected += 1;
                true
            }
            _ => false,
        }
    }

    pub fn can_step(&self, direction: Direction) -> bool {
        match direction {
            Direction::Prev => self.selected > 0,
            Direction::Next => self.selected + 1 < self.len,
        }
    }
}

/// Hourly rows displayed for a day, in chronological order.
pub fn visible_hours(day: &ForecastDay) -> impl Iterator<Item = &HourSample> {
    day.hours.iter().step_by(HOUR_STRIDE)
}
