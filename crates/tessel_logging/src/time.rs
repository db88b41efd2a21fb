use core::fmt::Display;
use ::time::{OffsetDateTime, UtcOffset};

/// Wall-clock time (UTC) at which a log entry was made
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct TimeStamp {
    pub year        : u16,
    pub month       : u8,
    /// Days since sunday
    pub day_of_week : u8,
    pub day         : u8,
    pub hour        : u8,
    pub minute      : u8,
    pub second      : u8,
    pub millisecond : u16,
}

impl TimeStamp {
    /// Create a timestamp from the number of milliseconds since the unix epoch
    ///
    /// Values the calendar can't represent are clamped to the epoch.
    pub fn from_unix_millis(millis: u64) -> Self {
        OffsetDateTime::from_unix_timestamp_nanos(i128::from(millis) * 1_000_000)
            .unwrap_or(OffsetDateTime::UNIX_EPOCH)
            .into()
    }
}

impl From<OffsetDateTime> for TimeStamp {
    fn from(date_time: OffsetDateTime) -> Self {
        let utc = date_time.to_offset(UtcOffset::UTC);
        Self {
            year: utc.year().clamp(0, u16::MAX as i32) as u16,
            month: utc.month().into(),
            day_of_week: utc.weekday().number_days_from_sunday(),
            day: utc.day(),
            hour: utc.hour(),
            minute: utc.minute(),
            second: utc.second(),
            millisecond: utc.millisecond(),
        }
    }
}

// TODO: customizable formatter
impl Display for TimeStamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!("{}-{:02}-{:02} {:02}:{:02}:{:02}.{:03}", self.year, self.month, self.day, self.hour, self.minute, self.second, self.millisecond))
    }
}

/// Get the current timestamp
pub fn get_timestamp() -> TimeStamp {
    OffsetDateTime::now_utc().into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn epoch() {
        let ts = TimeStamp::from_unix_millis(0);
        assert_eq!((ts.year, ts.month, ts.day), (1970, 1, 1));
        assert_eq!(ts.day_of_week, 4);
        assert_eq!(ts.to_string(), "1970-01-01 00:00:00.000");
    }

    #[test]
    fn leap_day() {
        // 2024-02-29 12:34:56.789 UTC
        let ts = TimeStamp::from_unix_millis(1_709_210_096_789);
        assert_eq!(ts.to_string(), "2024-02-29 12:34:56.789");
        assert_eq!(ts.day_of_week, 4);
    }

    #[test]
    fn offsets_are_converted_to_utc() {
        let local = OffsetDateTime::UNIX_EPOCH
            .to_offset(UtcOffset::from_hms(2, 0, 0).unwrap());
        let ts = TimeStamp::from(local);
        assert_eq!(ts.to_string(), "1970-01-01 00:00:00.000");
    }
}
