//! Shift grid construction.
//!
//! Helpdesk runs Monday-Friday with hourly shifts 09:00-17:00; lab runs
//! Monday-Saturday in three four-hour blocks (08-12, 12-16, 16-20).

use chrono::{Datelike, Duration, NaiveDate};
use shared::{DomainError, DomainResult, ScheduleKind};

use crate::domain::timeslot::{
    shift_end_hour, HELPDESK_FIRST_HOUR, HELPDESK_LAST_HOUR, LAB_BLOCK_START_HOURS,
};

/// A shift cell of the grid before persistence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShiftSlot {
    pub date: NaiveDate,
    pub day_of_week: i32,
    pub start_hour: u32,
    pub end_hour: u32,
}

impl ShiftSlot {
    pub fn start_time(&self) -> chrono::NaiveDateTime {
        self.date
            .and_hms_opt(self.start_hour, 0, 0)
            .expect("grid hours are valid")
    }

    pub fn end_time(&self) -> chrono::NaiveDateTime {
        if self.end_hour <= 23 {
            self.date
                .and_hms_opt(self.end_hour, 0, 0)
                .expect("grid hours are valid")
        } else {
            // A block running past midnight lands on the next day.
            self.date
                .and_hms_opt(0, 0, 0)
                .expect("midnight is valid")
                + Duration::hours(self.end_hour as i64)
        }
    }

    pub fn duration_hours(&self) -> u32 {
        self.end_hour - self.start_hour
    }
}

/// Number of weekdays each kind operates, starting Monday.
fn active_weekdays(kind: ScheduleKind) -> i32 {
    match kind {
        ScheduleKind::Helpdesk => 5,
        ScheduleKind::Lab => 6,
    }
}

/// Canonical starting hours per day for a kind.
fn starting_hours(kind: ScheduleKind) -> Vec<u32> {
    match kind {
        ScheduleKind::Helpdesk => (HELPDESK_FIRST_HOUR..HELPDESK_LAST_HOUR).collect(),
        ScheduleKind::Lab => LAB_BLOCK_START_HOURS.to_vec(),
    }
}

/// Build the shift grid for every operating day in [start, end].
pub fn build_grid(
    kind: ScheduleKind,
    start_date: NaiveDate,
    end_date: NaiveDate,
) -> DomainResult<Vec<ShiftSlot>> {
    if start_date > end_date {
        return Err(DomainError::InvalidInput(
            "start_date must not be after end_date".to_string(),
        ));
    }

    let hours = starting_hours(kind);
    let last_day = active_weekdays(kind);

    let mut slots = Vec::new();
    let mut date = start_date;
    while date <= end_date {
        let day_of_week = date.weekday().num_days_from_monday() as i32;
        if day_of_week < last_day {
            for &start_hour in &hours {
                slots.push(ShiftSlot {
                    date,
                    day_of_week,
                    start_hour,
                    end_hour: shift_end_hour(kind, start_hour),
                });
            }
        }
        date = match date.succ_opt() {
            Some(next) => next,
            None => break,
        };
    }

    Ok(slots)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn monday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 10).unwrap()
    }

    #[test]
    fn test_helpdesk_week_has_forty_shifts() {
        let friday = monday() + Duration::days(4);
        let slots = build_grid(ScheduleKind::Helpdesk, monday(), friday).unwrap();

        assert_eq!(slots.len(), 40);
        assert!(slots.iter().all(|s| s.duration_hours() == 1));
        assert!(slots.iter().all(|s| (9..17).contains(&s.start_hour)));
    }

    #[test]
    fn test_helpdesk_skips_weekend() {
        let sunday = monday() + Duration::days(6);
        let slots = build_grid(ScheduleKind::Helpdesk, monday(), sunday).unwrap();

        // Saturday and Sunday contribute nothing.
        assert_eq!(slots.len(), 40);
    }

    #[test]
    fn test_lab_week_has_eighteen_blocks() {
        let sunday = monday() + Duration::days(6);
        let slots = build_grid(ScheduleKind::Lab, monday(), sunday).unwrap();

        // Six operating days, three blocks each; Sunday is skipped.
        assert_eq!(slots.len(), 18);
        assert!(slots.iter().all(|s| s.duration_hours() == 4));
    }

    #[test]
    fn test_rejects_inverted_range() {
        let result = build_grid(ScheduleKind::Helpdesk, monday(), monday() - Duration::days(1));
        assert!(result.is_err());
    }

    #[test]
    fn test_single_day_grid() {
        let slots = build_grid(ScheduleKind::Helpdesk, monday(), monday()).unwrap();
        assert_eq!(slots.len(), 8);
        assert_eq!(slots[0].start_hour, 9);
        assert_eq!(slots[7].start_hour, 16);
    }
}
