use chrono::{DateTime, Local, TimeZone, Timelike};

/// Parse a `YYYY-MM-DD` date string plus a `HH:MM` time string with an
/// optional space-separated AM/PM suffix into a local timestamp.
///
/// The no-suffix branch keeps the historical normalization: a bare hour of
/// 12 becomes 0 and hours below 12 get 12 added, so "09:00" without a
/// suffix means 21:00.
pub fn parse_date_time(date_str: &str, time_str: &str) -> Option<DateTime<Local>> {
    let mut date_parts = date_str.split('-');
    let year: i32 = date_parts.next()?.parse().ok()?;
    let month: u32 = date_parts.next()?.parse().ok()?;
    let day: u32 = date_parts.next()?.parse().ok()?;

    let mut tokens = time_str.split_whitespace();
    let clock = tokens.next()?;
    let suffix = tokens.next();

    let mut clock_parts = clock.split(':');
    let hours: u32 = clock_parts.next()?.parse().ok()?;
    let minutes: u32 = clock_parts.next()?.parse().ok()?;

    let hours = match suffix {
        Some(s) if s.eq_ignore_ascii_case("pm") => {
            if hours < 12 {
                hours + 12
            } else {
                hours
            }
        }
        Some(s) if s.eq_ignore_ascii_case("am") => {
            if hours == 12 {
                0
            } else {
                hours
            }
        }
        // Unrecognized suffix tokens pass the hour through unchanged.
        Some(_) => hours,
        None => {
            if hours == 12 {
                0
            } else if hours < 12 {
                hours + 12
            } else {
                hours
            }
        }
    };

    Local
        .with_ymd_and_hms(year, month, day, hours, minutes, 0)
        .earliest()
}

/// Human-readable countdown for `trigger_time - now`.
pub fn time_left(trigger_time: DateTime<Local>, now: DateTime<Local>) -> String {
    let diff = trigger_time.signed_duration_since(now).num_milliseconds();
    if diff <= 0 {
        return "Expired".to_string();
    }

    let minutes_left = diff / (1000 * 60);
    let days = minutes_left / 1440;
    let hours = (minutes_left % 1440) / 60;
    let minutes = minutes_left % 60;

    if days > 0 {
        format!(
            "{} day{}, {} hour{}, {} minute{} left",
            days,
            if days > 1 { "s" } else { "" },
            hours,
            if hours != 1 { "s" } else { "" },
            minutes,
            if minutes != 1 { "s" } else { "" },
        )
    } else if hours > 0 {
        format!(
            "{} hour{}, {} minute{} left",
            hours,
            if hours != 1 { "s" } else { "" },
            minutes,
            if minutes != 1 { "s" } else { "" },
        )
    } else {
        format!("{} minute{} left", minutes, if minutes != 1 { "s" } else { "" })
    }
}

/// Zero-padded `YYYY-MM-DD`.
pub fn format_date(t: DateTime<Local>) -> String {
    t.format("%Y-%m-%d").to_string()
}

/// 12-hour clock with AM/PM suffix, hour 0 shown as 12.
///
/// `include_seconds` is used only when repopulating the entry form from an
/// existing reminder; the seconds land after the suffix ("2:30 PM:05"),
/// matching the stored-blob era formatter.
pub fn format_time(t: DateTime<Local>, include_seconds: bool) -> String {
    let mut hours = t.hour();
    let minutes = t.minute();
    let suffix = if hours >= 12 { "PM" } else { "AM" };
    if hours > 12 {
        hours -= 12;
    }
    if hours == 0 {
        hours = 12;
    }

    if include_seconds {
        format!("{}:{:02} {}:{:02}", hours, minutes, suffix, t.second())
    } else {
        format!("{}:{:02} {}", hours, minutes, suffix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn local(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Local> {
        Local.with_ymd_and_hms(y, mo, d, h, mi, s).single().unwrap()
    }

    #[test]
    fn parses_pm_suffix() {
        let t = parse_date_time("2024-03-01", "2:30 PM").unwrap();
        assert_eq!(t, local(2024, 3, 1, 14, 30, 0));
    }

    #[test]
    fn parses_am_suffix() {
        let t = parse_date_time("2024-03-01", "2:30 AM").unwrap();
        assert_eq!(t, local(2024, 3, 1, 2, 30, 0));
    }

    #[test]
    fn suffix_is_case_insensitive() {
        let t = parse_date_time("2024-03-01", "7:05 pm").unwrap();
        assert_eq!(t, local(2024, 3, 1, 19, 5, 0));
    }

    #[test]
    fn twelve_am_is_midnight() {
        let t = parse_date_time("2024-03-01", "12:00 AM").unwrap();
        assert_eq!(t, local(2024, 3, 1, 0, 0, 0));
    }

    #[test]
    fn twelve_pm_stays_noon() {
        let t = parse_date_time("2024-03-01", "12:00 PM").unwrap();
        assert_eq!(t, local(2024, 3, 1, 12, 0, 0));
    }

    // Pins the legacy no-suffix normalization: bare "09:00" means 21:00.
    #[test]
    fn bare_morning_hour_shifts_to_evening() {
        let t = parse_date_time("2024-03-01", "09:00").unwrap();
        assert_eq!(t, local(2024, 3, 1, 21, 0, 0));
    }

    #[test]
    fn bare_twelve_becomes_midnight() {
        let t = parse_date_time("2024-03-01", "12:15").unwrap();
        assert_eq!(t, local(2024, 3, 1, 0, 15, 0));
    }

    #[test]
    fn bare_evening_hour_passes_through() {
        let t = parse_date_time("2024-03-01", "21:40").unwrap();
        assert_eq!(t, local(2024, 3, 1, 21, 40, 0));
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_date_time("2024-03-01", "").is_none());
        assert!(parse_date_time("march first", "2:30 PM").is_none());
        assert!(parse_date_time("2024-13-01", "2:30 PM").is_none());
        assert!(parse_date_time("2024-03-01", "25:00").is_none());
    }

    #[test]
    fn time_left_25_minutes() {
        let now = local(2024, 3, 1, 12, 0, 0);
        let trigger = now + Duration::milliseconds(1_500_000);
        assert_eq!(time_left(trigger, now), "25 minutes left");
    }

    #[test]
    fn time_left_expired_at_zero_and_negative() {
        let now = local(2024, 3, 1, 12, 0, 0);
        assert_eq!(time_left(now, now), "Expired");
        assert_eq!(time_left(now - Duration::seconds(5), now), "Expired");
    }

    #[test]
    fn time_left_singular_forms() {
        let now = local(2024, 3, 1, 12, 0, 0);
        let trigger = now + Duration::minutes(1);
        assert_eq!(time_left(trigger, now), "1 minute left");

        let trigger = now + Duration::minutes(61);
        assert_eq!(time_left(trigger, now), "1 hour, 1 minute left");
    }

    #[test]
    fn time_left_day_branch_pluralization() {
        let now = local(2024, 3, 1, 12, 0, 0);

        // 1 day, 1 hour, 0 minutes: days pluralize on > 1, the rest on != 1.
        let trigger = now + Duration::minutes(1500);
        assert_eq!(time_left(trigger, now), "1 day, 1 hour, 0 minutes left");

        let trigger = now + Duration::minutes(2 * 1440 + 125);
        assert_eq!(time_left(trigger, now), "2 days, 2 hours, 5 minutes left");
    }

    #[test]
    fn formats_date_zero_padded() {
        assert_eq!(format_date(local(2024, 3, 1, 0, 0, 0)), "2024-03-01");
    }

    #[test]
    fn formats_time_twelve_hour() {
        assert_eq!(format_time(local(2024, 3, 1, 0, 5, 0), false), "12:05 AM");
        assert_eq!(format_time(local(2024, 3, 1, 14, 30, 0), false), "2:30 PM");
        assert_eq!(format_time(local(2024, 3, 1, 12, 0, 0), false), "12:00 PM");
    }

    #[test]
    fn formats_time_with_trailing_seconds() {
        assert_eq!(format_time(local(2024, 3, 1, 14, 30, 7), true), "2:30 PM:07");
    }

    #[test]
    fn format_and_parse_agree_for_suffixed_times() {
        let t = local(2024, 3, 1, 14, 30, 0);
        let reparsed = parse_date_time(&format_date(t), &format_time(t, false)).unwrap();
        assert_eq!(reparsed, t);
    }
}
