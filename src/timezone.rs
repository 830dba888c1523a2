use time::{Date, OffsetDateTime, UtcOffset};
use time_tz::{Offset, TimeZone};

/// Get the current UTC offset for a canonical timezone name such as "Asia/Manila".
pub fn get_local_offset(canonical_timezone: &str) -> Option<UtcOffset> {
    time_tz::timezones::get_by_name(canonical_timezone)
        .map(|tz| tz.get_offset_utc(&OffsetDateTime::now_utc()).to_utc())
}

/// Get today's date as seen from `canonical_timezone`.
pub fn get_local_date(canonical_timezone: &str) -> Option<Date> {
    let offset = get_local_offset(canonical_timezone)?;

    Some(OffsetDateTime::now_utc().to_offset(offset).date())
}
