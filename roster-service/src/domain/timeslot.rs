//! Time-slot and day-label parsing.
//!
//! The single place where client-facing slot strings become hours. Accepts
//! 12-hour and 24-hour forms, ranges (the start is taken), and the three
//! fixed lab blocks. Anything else is a typed error; inputs are never
//! coerced silently.

use shared::{DomainError, DomainResult, ScheduleKind};

pub const ERROR_INVALID_DAY: &str = "Invalid day provided.";
pub const ERROR_INVALID_TIME: &str = "Invalid time slot provided.";

/// Lab shifts run in fixed four-hour blocks.
pub const LAB_BLOCK_START_HOURS: [u32; 3] = [8, 12, 16];
pub const LAB_BLOCK_DURATION_HOURS: u32 = 4;

/// Helpdesk shifts are hourly, 09:00-17:00.
pub const HELPDESK_FIRST_HOUR: u32 = 9;
pub const HELPDESK_LAST_HOUR: u32 = 17;

/// Parse a day label into an index, 0 = Monday .. 6 = Sunday.
///
/// Accepts full names and the abbreviations the scheduling views send
/// (MON, TUE, WED, THU/THUR, FRI, SAT, SUN), case-insensitively.
pub fn parse_day_label(label: &str) -> DomainResult<i32> {
    let normalized = label.trim().to_ascii_uppercase();

    let index = match normalized.as_str() {
        "MON" | "MONDAY" => 0,
        "TUE" | "TUESDAY" => 1,
        "WED" | "WEDNESDAY" => 2,
        "THU" | "THUR" | "THURSDAY" => 3,
        "FRI" | "FRIDAY" => 4,
        "SAT" | "SATURDAY" => 5,
        "SUN" | "SUNDAY" => 6,
        _ => return Err(DomainError::InvalidInput(ERROR_INVALID_DAY.to_string())),
    };

    Ok(index)
}

/// Parse a time slot into a starting hour (0..=23).
///
/// Lab blocks are matched before the generic grammar: "4 - 8" means the
/// 16:00 block on a lab schedule but 04:00 anywhere else.
pub fn parse_time_slot(slot: &str, kind: ScheduleKind) -> DomainResult<u32> {
    let trimmed = slot.trim();
    if trimmed.is_empty() {
        return Err(DomainError::InvalidInput(ERROR_INVALID_TIME.to_string()));
    }

    if kind == ScheduleKind::Lab {
        if let Some(hour) = match_lab_block(trimmed) {
            return Ok(hour);
        }
    }

    // Ranges contribute their start time.
    let head = trimmed.split('-').next().unwrap_or(trimmed).trim();

    parse_single_time(head)
        .ok_or_else(|| DomainError::InvalidInput(ERROR_INVALID_TIME.to_string()))
}

/// End hour for a shift starting at `start_hour`.
pub fn shift_end_hour(kind: ScheduleKind, start_hour: u32) -> u32 {
    match kind {
        ScheduleKind::Lab => start_hour + LAB_BLOCK_DURATION_HOURS,
        ScheduleKind::Helpdesk => start_hour + 1,
    }
}

fn match_lab_block(slot: &str) -> Option<u32> {
    let normalized = slot.to_ascii_lowercase();
    let normalized = normalized.split_whitespace().collect::<Vec<_>>().join(" ");

    match normalized.as_str() {
        "8:00 am - 12:00 pm" | "8am - 12pm" | "8 - 12" => Some(8),
        "12:00 pm - 4:00 pm" | "12pm - 4pm" | "12 - 4" => Some(12),
        "4:00 pm - 8:00 pm" | "4pm - 8pm" | "16 - 20" | "4 - 8" => Some(16),
        _ => None,
    }
}

fn parse_single_time(value: &str) -> Option<u32> {
    let lower = value.to_ascii_lowercase();

    let (body, meridiem) = if let Some(stripped) = lower.strip_suffix("pm") {
        (stripped.trim(), Some(true))
    } else if let Some(stripped) = lower.strip_suffix("am") {
        (stripped.trim(), Some(false))
    } else {
        (lower.as_str(), None)
    };

    let mut parts = body.split(':');
    let hour_part = parts.next()?.trim();
    if hour_part.is_empty() || !hour_part.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    for rest in parts {
        let rest = rest.trim();
        if rest.is_empty() || !rest.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }
    }
    let mut hour: u32 = hour_part.parse().ok()?;

    match meridiem {
        Some(true) if hour != 12 => hour += 12,
        Some(false) if hour == 12 => hour = 0,
        _ => {}
    }

    (hour <= 23).then_some(hour)
}
