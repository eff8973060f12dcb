use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Weekday};

use crate::models::DateOrder;

// ── Calendar names ────────────────────────────────────────────────────────────

/// Month names in calendar order, January first.
pub const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Weekdays in canonical order, Monday first.
pub const WEEKDAYS: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// English name of month `month` (1-12). Out-of-range values yield `""`.
pub fn month_name(month: u32) -> &'static str {
    month
        .checked_sub(1)
        .and_then(|i| MONTH_NAMES.get(i as usize))
        .copied()
        .unwrap_or("")
}

/// English name of `weekday`, e.g. `"Monday"`.
pub fn weekday_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

// ── Hour bands ────────────────────────────────────────────────────────────────

/// Label of the one-hour band starting at `hour`: `"13-14"`, `"23-00"`.
pub fn hour_band_label(hour: u32) -> String {
    format!("{:02}-{:02}", hour % 24, (hour + 1) % 24)
}

/// All 24 hour-band labels from `"00-01"` to `"23-00"`.
pub fn hour_band_labels() -> Vec<String> {
    (0..24).map(hour_band_label).collect()
}

// ── Header timestamp parsing ──────────────────────────────────────────────────

/// Parse a transcript date such as `01/02/23`, `1-2-2023` or `31.12.22`.
///
/// `order` decides whether the first field is the day or the month. Two-digit
/// years follow chrono's `%y` rule. Returns `None` for impossible dates.
pub fn parse_date(raw: &str, order: DateOrder) -> Option<NaiveDate> {
    let normalised: String = raw
        .trim()
        .chars()
        .map(|c| if c == '/' || c == '.' { '-' } else { c })
        .collect();

    let year_digits = normalised.rsplit('-').next()?.len();
    let year_fmt = match year_digits {
        2 => "%y",
        4 => "%Y",
        _ => return None,
    };
    let fmt = match order {
        DateOrder::DayFirst => format!("%d-%m-{}", year_fmt),
        DateOrder::MonthFirst => format!("%m-%d-{}", year_fmt),
    };

    NaiveDate::parse_from_str(&normalised, &fmt).ok()
}

/// Parse a transcript time in 24h (`23:05`, `23:05:10`) or 12h notation.
///
/// `meridiem` is the raw AM/PM marker if the header carried one; forms like
/// `a.m.` and `PM` are accepted.
pub fn parse_time(raw: &str, meridiem: Option<&str>) -> Option<NaiveTime> {
    let time = raw.trim();

    match meridiem {
        Some(marker) => {
            let marker: String = marker
                .chars()
                .filter(|c| c.is_ascii_alphabetic())
                .collect::<String>()
                .to_uppercase();
            let candidate = format!("{} {}", time, marker);
            const FMTS: &[&str] = &["%I:%M %p", "%I:%M:%S %p"];
            FMTS.iter()
                .find_map(|fmt| NaiveTime::parse_from_str(&candidate, fmt).ok())
        }
        None => {
            const FMTS: &[&str] = &["%H:%M", "%H:%M:%S"];
            FMTS.iter()
                .find_map(|fmt| NaiveTime::parse_from_str(time, fmt).ok())
        }
    }
}

/// Combine [`parse_date`] and [`parse_time`] into a naive local timestamp.
pub fn parse_header_timestamp(
    date: &str,
    time: &str,
    meridiem: Option<&str>,
    order: DateOrder,
) -> Option<NaiveDateTime> {
    let date = parse_date(date, order)?;
    let time = parse_time(time, meridiem)?;
    Some(date.and_time(time))
}
