use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, NaiveTime, TimeDelta, Timelike, Utc};
use constants::sky::MINUTES_PER_DAY;

const UNIX_EPOCH_JULIAN_DATE: f64 = 2_440_587.5;
const J2000_JULIAN_DATE: f64 = 2_451_545.0;
const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// GMST at the J2000 epoch, in hours.
const GMST_AT_J2000_HOURS: f64 = 18.697_374_558;
/// Sidereal hours elapsed per solar day.
const GMST_HOURS_PER_DAY: f64 = 24.065_709_824_419_08;
/// Solar time per unit of sidereal time.
const SOLAR_PER_SIDEREAL: f64 = 24.0 / GMST_HOURS_PER_DAY;

/// Absolute observation instant. The core accepts any instant; only the
/// timeline UI restricts it to one day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ObservationTime(DateTime<Utc>);

impl ObservationTime {
    pub fn new(instant: DateTime<Utc>) -> Self {
        Self(instant)
    }

    pub fn from_unix_millis(millis: i64) -> Option<Self> {
        DateTime::<Utc>::from_timestamp_millis(millis).map(Self)
    }

    /// Parse an RFC 3339 / ISO 8601 instant, returning the offset it was written in.
    pub fn parse_rfc3339(text: &str) -> Result<(Self, FixedOffset), chrono::ParseError> {
        DateTime::parse_from_rfc3339(text).map(|dt| (Self(dt.with_timezone(&Utc)), *dt.offset()))
    }

    pub fn instant(&self) -> DateTime<Utc> {
        self.0
    }

    pub fn julian_date(&self) -> f64 {
        UNIX_EPOCH_JULIAN_DATE + self.0.timestamp_millis() as f64 / MILLIS_PER_DAY
    }

    /// Greenwich mean sidereal time in hours, [0, 24).
    pub fn gmst_hours(&self) -> f64 {
        let days = self.julian_date() - J2000_JULIAN_DATE;
        (GMST_AT_J2000_HOURS + GMST_HOURS_PER_DAY * days).rem_euclid(24.0)
    }

    /// Local sidereal time in hours for an east-positive longitude in degrees.
    pub fn local_sidereal_hours(&self, lng_degrees: f64) -> f64 {
        (self.gmst_hours() + lng_degrees / 15.0).rem_euclid(24.0)
    }

    /// The instant at which the sky has turned by `hours` of sidereal time.
    pub fn advanced_by_sidereal_hours(&self, hours: f64) -> Self {
        let millis = (hours * SOLAR_PER_SIDEREAL * 3_600_000.0).round() as i64;
        Self(self.0 + TimeDelta::milliseconds(millis))
    }
}

impl From<DateTime<Utc>> for ObservationTime {
    fn from(instant: DateTime<Utc>) -> Self {
        Self(instant)
    }
}

/// The observation slider: a local calendar date plus a minute of that day.
///
/// The date stays fixed while the minute moves; only explicit day steps change it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SkyTimeline {
    date: NaiveDate,
    offset: FixedOffset,
    minute_of_day: u16,
}

impl SkyTimeline {
    pub fn new(date: NaiveDate, offset: FixedOffset, minute_of_day: i64) -> Self {
        Self {
            date,
            offset,
            minute_of_day: clamp_minute(minute_of_day),
        }
    }

    /// Timeline positioned on the local date and minute of `instant`.
    pub fn at_instant(instant: DateTime<Utc>, offset: FixedOffset) -> Self {
        let local = instant.with_timezone(&offset);
        let minute = local.hour() as i64 * 60 + local.minute() as i64;
        Self::new(local.date_naive(), offset, minute)
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    pub fn utc_offset_minutes(&self) -> i32 {
        self.offset.local_minus_utc() / 60
    }

    pub fn minute_of_day(&self) -> u16 {
        self.minute_of_day
    }

    pub fn set_minute(&mut self, minute: i64) {
        self.minute_of_day = clamp_minute(minute);
    }

    /// Moves the slider, stopping at either end of the day.
    pub fn shift_minutes(&mut self, delta: i64) {
        self.set_minute(self.minute_of_day as i64 + delta);
    }

    /// Moves the date while keeping the minute. Returns false, leaving the date
    /// alone, when the step leaves chrono's calendar range.
    pub fn advance_days(&mut self, days: i64) -> bool {
        let Some(date) = TimeDelta::try_days(days)
            .and_then(|delta| self.date.checked_add_signed(delta))
        else {
            return false;
        };
        self.date = date;
        true
    }

    /// Re-reads the same instant in another zone, so the slider shows local wall-clock time.
    pub fn set_offset(&mut self, offset: FixedOffset) {
        *self = Self::at_instant(self.observation_time().instant(), offset);
    }

    pub fn observation_time(&self) -> ObservationTime {
        let local = self.date.and_time(NaiveTime::MIN)
            + TimeDelta::minutes(self.minute_of_day as i64)
            - TimeDelta::seconds(self.offset.local_minus_utc() as i64);
        ObservationTime(local.and_utc())
    }

    pub fn weekday_label(&self) -> String {
        format!("{} {}", self.date.weekday(), self.date.format("%Y-%m-%d"))
    }
}

fn clamp_minute(minute: i64) -> u16 {
    minute.clamp(0, MINUTES_PER_DAY as i64 - 1) as u16
}
