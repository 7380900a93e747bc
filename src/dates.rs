//! Calendar-day and instant newtypes plus lenient date parsing
use chrono::{DateTime, Datelike, NaiveDate, TimeZone, Utc};

/// A calendar date with the time of day deliberately dropped.
///
/// Campaigns are day-bounded business events; comparing raw timestamps would
/// make a campaign expire mid-day depending on the client clock.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Copy)]
pub struct CalendarDay(NaiveDate);

impl CalendarDay {
    pub fn today() -> Self {
        Self(Utc::now().date_naive())
    }
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Self {
        NaiveDate::from_ymd_opt(year, month, day)
            .expect("valid calendar date")
            .into()
    }
    pub fn to_naive_date(&self) -> NaiveDate {
        self.0
    }
}

impl From<NaiveDate> for CalendarDay {
    fn from(value: NaiveDate) -> Self {
        CalendarDay(value)
    }
}

impl std::fmt::Display for CalendarDay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

/// Parse a backend-supplied date string at day granularity.
///
/// Upstream data is not always well-formed, so this is lenient and total:
/// plain dates and RFC 3339 timestamps are accepted, anything else returns
/// `None` after logging a data-quality warning. Callers treat `None` as an
/// unconstrained window, so a bad date never hides a campaign.
pub fn parse_calendar_day(raw: &str) -> Option<CalendarDay> {
    let trimmed = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Some(CalendarDay(date));
    }
    if let Ok(instant) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(CalendarDay(instant.date_naive()));
    }
    tracing::warn!(value = raw, "unparseable calendar date, treating as unconstrained");
    None
}

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone)]
pub struct TimeStamp<T: TimeZone>(DateTime<T>);

impl TimeStamp<Utc> {
    pub fn new() -> Self {
        Self(Utc::now())
    }
    pub fn new_with(year: i32, month: u32, day: u32, hour: u32, min: u32, sec: u32) -> Self {
        Utc.with_ymd_and_hms(year, month, day, hour, min, sec)
            .unwrap()
            .into()
    }
    pub fn to_datetime_utc(&self) -> DateTime<Utc> {
        self.0
    }
}

impl Default for TimeStamp<Utc> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: TimeZone> From<DateTime<T>> for TimeStamp<T> {
    fn from(value: DateTime<T>) -> Self {
        TimeStamp(value)
    }
}

impl<C> minicbor::Encode<C> for CalendarDay {
    fn encode<W: minicbor::encode::Write>(
        &self,
        e: &mut minicbor::Encoder<W>,
        _: &mut C,
    ) -> Result<(), minicbor::encode::Error<W::Error>> {
        e.i32(self.0.num_days_from_ce())?.ok()
    }
}

impl<'b, C> minicbor::Decode<'b, C> for CalendarDay {
    fn decode(d: &mut minicbor::Decoder<'b>, _: &mut C) -> Result<Self, minicbor::decode::Error> {
        let days = d.i32()?;

        NaiveDate::from_num_days_from_ce_opt(days)
            .map(CalendarDay)
            .ok_or(minicbor::decode::Error::message(
                "day count out of calendar range",
            ))
    }
}

impl<C> minicbor::Encode<C> for TimeStamp<Utc> {
    fn encode<W: minicbor::encode::Write>(
        &self,
        e: &mut minicbor::Encoder<W>,
        _: &mut C,
    ) -> Result<(), minicbor::encode::Error<W::Error>> {
        if let Some(nsec) = self.0.timestamp_nanos_opt() {
            return e.i64(nsec)?.ok();
        }

        Err(minicbor::encode::Error::message(
            "failed to encode timestamp. timestamp_nanos_opt returned None",
        ))
    }
}

impl<'b, C> minicbor::Decode<'b, C> for TimeStamp<Utc> {
    fn decode(d: &mut minicbor::Decoder<'b>, _: &mut C) -> Result<Self, minicbor::decode::Error> {
        let nsecs = d.i64()?;

        Ok(TimeStamp(DateTime::from_timestamp_nanos(nsecs)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn calendar_day_cbor_roundtrip() {
        let original = CalendarDay::from_ymd(2025, 6, 1);

        let encoding = minicbor::to_vec(original).unwrap();
        let decoded: CalendarDay = minicbor::decode(&encoding).unwrap();

        assert_eq!(original, decoded);
    }

    #[test]
    fn timestamp_cbor_roundtrip() {
        let original = TimeStamp::new();

        let encoding = minicbor::to_vec(original.clone()).unwrap();
        let decoded: TimeStamp<Utc> = minicbor::decode(&encoding).unwrap();

        assert_eq!(original, decoded);
    }

    #[test]
    fn parses_plain_dates_and_rfc3339() {
        assert_eq!(
            parse_calendar_day("2025-01-01"),
            Some(CalendarDay::from_ymd(2025, 1, 1))
        );
        assert_eq!(
            parse_calendar_day("2025-01-01T18:30:00+05:30"),
            Some(CalendarDay::from_ymd(2025, 1, 1))
        );
    }

    #[test]
    fn garbage_dates_become_none() {
        assert_eq!(parse_calendar_day("not-a-date"), None);
        assert_eq!(parse_calendar_day(""), None);
        assert_eq!(parse_calendar_day("01/06/2025"), None);
    }
}
