use crate::params::ASCOMParam;
use serde::{Deserialize, Deserializer};
use std::fmt;
use std::marker::PhantomData;
use std::time::SystemTime;
use time::format_description::BorrowedFormatItem;
use time::format_description::well_known::Iso8601;
use time::macros::format_description;
use time::{OffsetDateTime, PrimitiveDateTime};

/// Wire format of a timestamp.
pub(crate) trait TimeFormat {
    fn parse(value: &str) -> Result<OffsetDateTime, time::error::Parse>;

    fn format(value: OffsetDateTime) -> Result<String, time::error::Format>;
}

/// ISO 8601 in UTC, e.g. `2024-03-01T20:10:05.123Z`.
///
/// Servers that omit the offset are assumed to send UTC.
#[derive(Debug)]
pub(crate) enum Iso8601Utc {}

impl TimeFormat for Iso8601Utc {
    fn parse(value: &str) -> Result<OffsetDateTime, time::error::Parse> {
        OffsetDateTime::parse(value, &Iso8601::DEFAULT).or_else(|err| {
            PrimitiveDateTime::parse(value, &Iso8601::DEFAULT)
                .map(PrimitiveDateTime::assume_utc)
                .map_err(|_| err)
        })
    }

    fn format(value: OffsetDateTime) -> Result<String, time::error::Format> {
        value
            .to_offset(time::UtcOffset::UTC)
            .format(&Iso8601::DEFAULT)
    }
}

/// FITS `DATE-OBS` form, `CCYY-MM-DDThh:mm:ss[.sss...]` in UTC without an offset.
#[derive(Debug)]
pub(crate) enum Fits {}

const FITS_FORMAT: &[BorrowedFormatItem<'_>] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second][optional [.[subsecond]]]");

impl TimeFormat for Fits {
    fn parse(value: &str) -> Result<OffsetDateTime, time::error::Parse> {
        PrimitiveDateTime::parse(value, FITS_FORMAT).map(PrimitiveDateTime::assume_utc)
    }

    fn format(value: OffsetDateTime) -> Result<String, time::error::Format> {
        value.to_offset(time::UtcOffset::UTC).format(
            format_description!("[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond digits:3]"),
        )
    }
}

/// A timestamp in the given wire format.
pub(crate) struct TimeRepr<F> {
    time: SystemTime,
    format: PhantomData<F>,
}

impl<F> fmt::Debug for TimeRepr<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.time.fmt(f)
    }
}

impl<F> From<SystemTime> for TimeRepr<F> {
    fn from(time: SystemTime) -> Self {
        Self {
            time,
            format: PhantomData,
        }
    }
}

impl<F> From<TimeRepr<F>> for SystemTime {
    fn from(repr: TimeRepr<F>) -> Self {
        repr.time
    }
}

impl<'de, F: TimeFormat> Deserialize<'de> for TimeRepr<F> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct Visitor<F>(PhantomData<F>);

        impl<F: TimeFormat> serde::de::Visitor<'_> for Visitor<F> {
            type Value = TimeRepr<F>;

            fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
                formatter.write_str("a date string")
            }

            fn visit_str<E: serde::de::Error>(self, value: &str) -> Result<Self::Value, E> {
                F::parse(value)
                    .map(|time| SystemTime::from(time).into())
                    .map_err(E::custom)
            }
        }

        deserializer.deserialize_str(Visitor(PhantomData))
    }
}

impl<F: TimeFormat> ASCOMParam for TimeRepr<F> {
    fn to_param(self) -> String {
        F::format(self.time.into()).unwrap_or_else(|err| {
            // only reachable for dates outside of the supported year range
            tracing::error!(%err, "Couldn't format timestamp");
            String::new()
        })
    }
}
