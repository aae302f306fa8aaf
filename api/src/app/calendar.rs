//! Local civil calendar helpers
//!
//! Offer deadlines and lease start dates are decided in the local calendar,
//! not in UTC, so an offer generated at 00:30 local time still counts from
//! the local day.

use chrono::{DateTime, Datelike, LocalResult, Months, NaiveDate, NaiveTime, TimeZone, Utc, Weekday};
use chrono_tz::Tz;

/// The local civil date at `now`
pub fn local_today(now: DateTime<Utc>, tz: Tz) -> NaiveDate {
    now.with_timezone(&tz).date_naive()
}

/// Step forward `days` business days, skipping Saturdays and Sundays
pub fn add_business_days(from: NaiveDate, days: u32) -> NaiveDate {
    let mut date = from;
    let mut remaining = days;

    while remaining > 0 {
        let Some(next) = date.succ_opt() else {
            break;
        };
        date = next;
        if !matches!(date.weekday(), Weekday::Sat | Weekday::Sun) {
            remaining -= 1;
        }
    }

    date
}

fn end_of_day() -> NaiveTime {
    NaiveTime::from_hms_opt(23, 59, 59).unwrap_or(NaiveTime::MIN)
}

/// Offer deadline: 23:59:59 local time, `business_days` business days after `now`
pub fn offer_expires_at(now: DateTime<Utc>, tz: Tz, business_days: u32) -> DateTime<Utc> {
    let deadline = add_business_days(local_today(now, tz), business_days).and_time(end_of_day());

    let local = match tz.from_local_datetime(&deadline) {
        LocalResult::Single(dt) => dt,
        LocalResult::Ambiguous(earliest, _) => earliest,
        // Only reachable if a zone ever skips the last second of a day
        LocalResult::None => tz.from_utc_datetime(&deadline),
    };

    local.with_timezone(&Utc)
}

/// Leases start on the later of the local today and the vacancy date
pub fn lease_start_date(now: DateTime<Utc>, tz: Tz, vacant_from: Option<NaiveDate>) -> NaiveDate {
    let today = local_today(now, tz);
    match vacant_from {
        Some(vacant_from) => today.max(vacant_from),
        None => today,
    }
}

/// First day of the credit-check window
pub fn credit_check_since(now: DateTime<Utc>, tz: Tz, months: u32) -> NaiveDate {
    let today = local_today(now, tz);
    today
        .checked_sub_months(Months::new(months))
        .unwrap_or(today)
}
