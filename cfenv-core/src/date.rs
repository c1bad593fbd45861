use chrono::{DateTime, Utc};

/// Timestamp layout used by the platform, e.g. `2016-03-04 02:43:07 +0000`.
pub const DATE_PATTERN: &str = "%Y-%m-%d %H:%M:%S %z";

/// Character shape of [`DATE_PATTERN`]: `d` is a digit, `s` an offset sign.
/// chrono alone accepts short years, unpadded fields and `+00:00` offsets.
const DATE_SHAPE: &[u8] = b"dddd-dd-dd dd:dd:dd sdddd";

fn has_date_shape(text: &str) -> bool {
    text.len() == DATE_SHAPE.len()
        && text.bytes().zip(DATE_SHAPE).all(|(c, &shape)| match shape {
            b'd' => c.is_ascii_digit(),
            b's' => c == b'+' || c == b'-',
            literal => c == literal,
        })
}

/// Converts between the platform timestamp layout and `DateTime<Utc>`.
///
/// Parsing and formatting share one pattern, so a formatted value always
/// parses back to the same instant at second precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateCodec {
    pattern: &'static str,
}

impl Default for DateCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl DateCodec {
    pub const fn new() -> Self {
        Self {
            pattern: DATE_PATTERN,
        }
    }

    pub fn pattern(&self) -> &'static str {
        self.pattern
    }

    /// Parse `text`; other offsets are normalised to UTC. Text must match the
    /// layout exactly: zero-padded fields, four-digit year, `+HHMM` offset.
    pub fn parse(&self, text: Option<&str>) -> Option<DateTime<Utc>> {
        let text = text.filter(|t| has_date_shape(t))?;
        DateTime::parse_from_str(text, self.pattern)
            .ok()
            .map(|d| d.with_timezone(&Utc))
    }

    pub fn format(&self, date: Option<&DateTime<Utc>>) -> Option<String> {
        let date = date?;
        Some(date.format(self.pattern).to_string())
    }

    /// Epoch seconds (`started_at_timestamp`) to a date.
    pub fn from_timestamp(&self, secs: i64) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(secs, 0)
    }
}

/// Serde adapter writing `Option<DateTime<Utc>>` in the platform layout,
/// for use with `#[serde(with = "crate::date::platform_format")]`.
pub mod platform_format {
    use super::DateCodec;
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    pub fn serialize<S: Serializer>(
        date: &Option<DateTime<Utc>>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match DateCodec::new().format(date.as_ref()) {
            Some(text) => serializer.serialize_some(&text),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<DateTime<Utc>>, D::Error> {
        let Some(text) = Option::<String>::deserialize(deserializer)? else {
            return Ok(None);
        };
        DateCodec::new()
            .parse(Some(&text))
            .map(Some)
            .ok_or_else(|| D::Error::custom(format!("invalid platform timestamp: {text}")))
    }
}
