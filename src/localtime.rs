//! UTC to wall-clock conversion for display.
//!
//! Timestamps are stored in UTC and only converted here, with the target
//! zone passed explicitly by the caller.

use time::{format_description::FormatItem, macros::format_description, OffsetDateTime};
use time_tz::{timezones, OffsetDateTimeExt, Tz};

pub const DEFAULT_ZONE: &str = "Europe/Oslo";

const DISPLAY_FORMAT: &[FormatItem<'static>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");

#[derive(Debug, thiserror::Error)]
#[error("unknown timezone: {0}")]
pub struct UnknownZone(pub String);

/// Looks up an IANA zone such as `Europe/Oslo`.
pub fn zone(name: &str) -> Result<&'static Tz, UnknownZone> {
    timezones::get_by_name(name).ok_or_else(|| UnknownZone(name.to_string()))
}

pub fn to_local(utc: OffsetDateTime, zone_id: &str) -> Result<OffsetDateTime, UnknownZone> {
    Ok(utc.to_timezone(zone(zone_id)?))
}

/// Converts and renders as `YYYY-MM-DD HH:MM:SS` local time.
pub fn format_local(utc: OffsetDateTime, zone_id: &str) -> anyhow::Result<String> {
    let local = to_local(utc, zone_id)?;
    Ok(local.format(DISPLAY_FORMAT)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::{datetime, offset};

    #[test]
    fn winter_time_is_one_hour_ahead() {
        let local = to_local(datetime!(2024-01-15 12:00 UTC), DEFAULT_ZONE).unwrap();
        assert_eq!(local.offset(), offset!(+1));
        assert_eq!(local.hour(), 13);
    }

    #[test]
    fn summer_time_is_two_hours_ahead() {
        let local = to_local(datetime!(2024-07-01 12:00 UTC), DEFAULT_ZONE).unwrap();
        assert_eq!(local.offset(), offset!(+2));
        assert_eq!(local.hour(), 14);
    }

    #[test]
    fn conversion_keeps_the_instant() {
        let utc = datetime!(2024-03-31 01:30 UTC);
        let local = to_local(utc, DEFAULT_ZONE).unwrap();
        assert_eq!(local, utc);
        assert_eq!(local.offset(), offset!(+2));
    }

    #[test]
    fn formats_local_wall_clock() {
        let s = format_local(datetime!(2024-10-27 00:59:59 UTC), DEFAULT_ZONE).unwrap();
        assert_eq!(s, "2024-10-27 02:59:59");
        let s = format_local(datetime!(2024-10-27 01:00:00 UTC), DEFAULT_ZONE).unwrap();
        assert_eq!(s, "2024-10-27 02:00:00");
    }

    #[test]
    fn unknown_zone_is_an_error() {
        let err = to_local(datetime!(2024-01-01 0:00 UTC), "Mars/Olympus").unwrap_err();
        assert!(err.to_string().contains("Mars/Olympus"));
    }
}
