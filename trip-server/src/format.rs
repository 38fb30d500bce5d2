//! Human-readable durations, distances and arrival times.
//!
//! Distances are always imperial, as the rendering side expects.

use chrono::{DateTime, TimeZone};

const FEET_PER_METER: f64 = 3.28084;
const METERS_PER_MILE: f64 = 1609.344;

/// Placeholder for values that cannot be shown.
const MISSING: &str = "—";

/// Format a duration as `"12 min"`, `"2 hr"` or `"1 hr 05 min"`.
///
/// Rounds to the nearest minute; negative durations show as zero.
pub fn format_duration(total_seconds: f64) -> String {
    if !total_seconds.is_finite() {
        return MISSING.to_string();
    }

    let total_minutes = (total_seconds / 60.0).round().max(0.0) as i64;
    if total_minutes < 60 {
        return format!("{total_minutes} min");
    }

    let hours = total_minutes / 60;
    let minutes = total_minutes % 60;
    if minutes == 0 {
        format!("{hours} hr")
    } else {
        format!("{hours} hr {minutes:02} min")
    }
}

/// Format a distance in feet (under a quarter mile, rounded to 5 ft) or
/// miles (one decimal below 100 mi, whole miles above).
pub fn format_distance_imperial(meters: f64) -> String {
    if !meters.is_finite() {
        return MISSING.to_string();
    }

    let meters = meters.abs();
    let miles = meters / METERS_PER_MILE;

    if miles < 0.25 {
        let feet = ((meters * FEET_PER_METER) / 5.0).round() * 5.0;
        return format!("{} ft", feet as i64);
    }

    if miles < 100.0 {
        format!("{miles:.1} mi")
    } else {
        format!("{miles:.0} mi")
    }
}

/// Format an arrival time as `HH:MM`, with a day suffix when it falls after
/// the day of `now`: `"00:15 (tomorrow)"`, `"09:00 (+2 days)"`.
pub fn format_arrival<Tz: TimeZone>(arrival: &DateTime<Tz>, now: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    let clock = arrival.format("%H:%M").to_string();
    let days = (arrival.date_naive() - now.date_naive()).num_days();

    match days {
        1 => format!("{clock} (tomorrow)"),
        d if d > 1 => format!("{clock} (+{d} days)"),
        _ => clock,
    }
}
