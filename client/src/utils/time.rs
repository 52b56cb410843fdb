//! Time-period helpers for lock countdowns.

const MINUTE: u64 = 60;
const HOUR: u64 = 60 * MINUTE;
const DAY: u64 = 24 * HOUR;
const MONTH: u64 = 30 * DAY;
const YEAR: u64 = 365 * DAY;

/// A duration split into calendar-ish units, largest first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimePeriods {
    pub years: u64,
    pub months: u64,
    pub days: u64,
    pub hours: u64,
    pub minutes: u64,
    pub seconds: u64,
}

pub fn get_time_periods(secs: u64) -> TimePeriods {
    let mut rest = secs;
    let mut take = |unit: u64| {
        let n = rest / unit;
        rest %= unit;
        n
    };
    let years = take(YEAR);
    let months = take(MONTH);
    let days = take(DAY);
    let hours = take(HOUR);
    let minutes = take(MINUTE);
    TimePeriods {
        years,
        months,
        days,
        hours,
        minutes,
        seconds: rest,
    }
}

/// Render non-zero units, e.g. `"14 hrs 3 min 4 sec"`. `None` when every unit is zero.
pub fn format_time_period(periods: &TimePeriods) -> Option<String> {
    let units = [
        (periods.years, "yea"),
        (periods.months, "mon"),
        (periods.days, "day"),
        (periods.hours, "hrs"),
        (periods.minutes, "min"),
        (periods.seconds, "sec"),
    ];
    let parts: Vec<String> = units
        .iter()
        .filter(|(n, _)| *n > 0)
        .map(|(n, label)| format!("{} {}", n, label))
        .collect();
    if parts.is_empty() {
        None
    } else {
        Some(parts.join(" "))
    }
}

/// Seconds counted past the end of a lock that started at `last_action` and lasts `lock`.
///
/// Zero while the lock is still running, never negative.
pub fn time_lock_remaining(last_action: u64, lock: u64, now: u64) -> u64 {
    now.saturating_sub(last_action.saturating_add(lock))
}

/// Current unix time in seconds.
pub fn now_secs() -> u64 {
    u64::try_from(chrono::Utc::now().timestamp()).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_time_periods() {
        let p = get_time_periods(14 * HOUR + 3 * MINUTE + 4);
        assert_eq!(
            p,
            TimePeriods {
                hours: 14,
                minutes: 3,
                seconds: 4,
                ..TimePeriods::default()
            }
        );
        assert_eq!(get_time_periods(YEAR + 2 * DAY).days, 2);
        assert_eq!(get_time_periods(YEAR + 2 * DAY).years, 1);
    }

    #[test]
    fn test_format_time_period() {
        let p = get_time_periods(14 * HOUR + 3 * MINUTE + 4);
        assert_eq!(format_time_period(&p).as_deref(), Some("14 hrs 3 min 4 sec"));
        assert_eq!(format_time_period(&get_time_periods(3 * DAY)).as_deref(), Some("3 day"));
        assert_eq!(format_time_period(&get_time_periods(0)), None);
    }

    #[test]
    fn test_time_lock_remaining() {
        let (t, l) = (1_000, 500);
        assert_eq!(time_lock_remaining(t, l, t + l - 1), 0);
        assert_eq!(time_lock_remaining(t, l, t + l), 0);
        assert_eq!(time_lock_remaining(t, l, t + l + 5), 5);
        assert_eq!(time_lock_remaining(u64::MAX, l, 0), 0);
    }

    #[test]
    fn test_now_is_after_2020() {
        assert!(now_secs() > 1_577_836_800);
    }
}
