use time::{Date, PrimitiveDateTime, Time};

use crate::{
    decode::{DecodeError, FromValue},
    mysql::FieldType,
    value::{DateTimeValue, DateValue, TimeValue, Value},
};

fn date(d: DateValue) -> Result<Date, DecodeError> {
    let month = u8::try_from(d.month)
        .ok()
        .and_then(|m| time::Month::try_from(m).ok())
        .ok_or(DecodeError::Parse(FieldType::Date))?;
    let day = u8::try_from(d.day).map_err(|_| DecodeError::Parse(FieldType::Date))?;
    Date::from_calendar_date(d.year as i32, month, day)
        .map_err(|_| DecodeError::Parse(FieldType::Date))
}

fn time_of_day(hours: u32, minutes: u32, seconds: u32, micro: u32) -> Result<Time, DecodeError> {
    let h = u8::try_from(hours).map_err(|_| DecodeError::Parse(FieldType::Time))?;
    let m = u8::try_from(minutes).map_err(|_| DecodeError::Parse(FieldType::Time))?;
    let s = u8::try_from(seconds).map_err(|_| DecodeError::Parse(FieldType::Time))?;
    Time::from_hms_micro(h, m, s, micro).map_err(|_| DecodeError::Parse(FieldType::Time))
}

impl FromValue for Date {
    fn from_value(value: Value) -> Result<Self, DecodeError> {
        match value {
            Value::Date(d) => date(d),
            v => Err(v.shape_error("date")),
        }
    }
}

impl FromValue for Time {
    fn from_value(value: Value) -> Result<Self, DecodeError> {
        match value {
            Value::Time(TimeValue { hours, minutes, seconds }) => {
                time_of_day(hours, minutes, seconds, 0)
            },
            v => Err(v.shape_error("time")),
        }
    }
}

impl FromValue for PrimitiveDateTime {
    fn from_value(value: Value) -> Result<Self, DecodeError> {
        match value {
            Value::DateTime(dt) => {
                let DateTimeValue { year, month, day, hours, minutes, seconds, microseconds, .. } =
                    dt;
                Ok(PrimitiveDateTime::new(
                    date(DateValue { year, month, day })?,
                    time_of_day(hours, minutes, seconds, microseconds)?,
                ))
            },
            v => Err(v.shape_error("datetime")),
        }
    }
}
