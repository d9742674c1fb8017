use chrono::{DateTime, FixedOffset, Locale, Utc};
use serde::{Deserialize, Serialize};

/// Separator between the distance phrase and the place name, e.g. "10km SE of Tokyo"
pub const PLACE_SEPARATOR: &str = " of ";

/// Offset shown when the place string carries no distance phrase
pub const DEFAULT_OFFSET: &str = "Near The";

/// `MMM dd, yyyy`
pub const DATE_FORMAT: &str = "%b %d, %Y";

/// `h:mm a`
pub const TIME_FORMAT: &str = "%-I:%M %p";

/// English (India), independent of the process locale
pub const DISPLAY_LOCALE: Locale = Locale::en_IN;

/// One earthquake as shown in the list.
///
/// Built once by the parser and never mutated. `date` and `time` always come
/// from the same timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EarthquakeRecord {
    magnitude: f64,
    offset: String,
    primary_location: String,
    date: String,
    time: String,
    url: String,
}

impl EarthquakeRecord {
    /// Build a record from already-decoded feature properties.
    ///
    /// `epoch_ms` is rendered in `zone`; pass `FixedOffset::east_opt(0)` for UTC.
    pub fn new(magnitude: f64, place: &str, epoch_ms: i64, url: String, zone: &FixedOffset) -> Self {
        let (offset, primary_location) = split_place(place);
        let (date, time) = format_timestamp(epoch_ms, zone);
        Self {
            magnitude,
            offset,
            primary_location,
            date,
            time,
            url,
        }
    }

    pub fn magnitude(&self) -> f64 {
        self.magnitude
    }

    pub fn offset(&self) -> &str {
        &self.offset
    }

    pub fn primary_location(&self) -> &str {
        &self.primary_location
    }

    pub fn date(&self) -> &str {
        &self.date
    }

    pub fn time(&self) -> &str {
        &self.time
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Magnitude with exactly one decimal place, e.g. "7.0"
    pub fn formatted_magnitude(&self) -> String {
        format!("{:.1}", self.magnitude)
    }

    pub fn magnitude_band(&self) -> MagnitudeBand {
        MagnitudeBand::from_magnitude(self.magnitude)
    }
}

/// Split a USGS place string into `(offset, primary_location)`.
///
/// "10km SE of Example City" becomes ("10km SE of", "Example City"). Without
/// the separator the offset is [`DEFAULT_OFFSET`] and the whole string is the
/// location.
pub fn split_place(place: &str) -> (String, String) {
    match place.find(PLACE_SEPARATOR) {
        Some(idx) => {
            // keep "of", drop the trailing space
            let split_at = idx + PLACE_SEPARATOR.len() - 1;
            (
                place[..split_at].to_string(),
                place[split_at + 1..].to_string(),
            )
        }
        None => (DEFAULT_OFFSET.to_string(), place.to_string()),
    }
}

/// Render an epoch-millisecond timestamp as `(date, time)`.
///
/// Month names and the AM/PM marker always come from [`DISPLAY_LOCALE`].
/// Out-of-range timestamps are rendered as the epoch.
pub fn format_timestamp(epoch_ms: i64, zone: &FixedOffset) -> (String, String) {
    let instant = DateTime::<Utc>::from_timestamp_millis(epoch_ms).unwrap_or_default();
    let local = instant.with_timezone(zone);
    (
        local.format_localized(DATE_FORMAT, DISPLAY_LOCALE).to_string(),
        local.format_localized(TIME_FORMAT, DISPLAY_LOCALE).to_string(),
    )
}

/// Colour bucket for the magnitude badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MagnitudeBand {
    One,
    Two,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
    Nine,
    TenPlus,
}

impl MagnitudeBand {
    /// Bucket by the integer part of the magnitude. 0 and 1 share the lowest
    /// band, and so does anything negative.
    pub fn from_magnitude(magnitude: f64) -> Self {
        match magnitude.trunc() as i64 {
            i64::MIN..=1 => MagnitudeBand::One,
            2 => MagnitudeBand::Two,
            3 => MagnitudeBand::Three,
            4 => MagnitudeBand::Four,
            5 => MagnitudeBand::Five,
            6 => MagnitudeBand::Six,
            7 => MagnitudeBand::Seven,
            8 => MagnitudeBand::Eight,
            9 => MagnitudeBand::Nine,
            _ => MagnitudeBand::TenPlus,
        }
    }

    /// Hex colour the list uses for this band
    pub fn color_hex(&self) -> &'static str {
        match self {
            MagnitudeBand::One => "#4A7BA7",
            MagnitudeBand::Two => "#04B4B3",
            MagnitudeBand::Three => "#10CAC9",
            MagnitudeBand::Four => "#F5A623",
            MagnitudeBand::Five => "#FF7D50",
            MagnitudeBand::Six => "#FC6644",
            MagnitudeBand::Seven => "#E75F40",
            MagnitudeBand::Eight => "#E13A20",
            MagnitudeBand::Nine => "#D93218",
            MagnitudeBand::TenPlus => "#C03823",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utc() -> FixedOffset {
        FixedOffset::east_opt(0).unwrap()
    }

    #[test]
    fn test_split_place_with_separator() {
        let (offset, location) = split_place("10km SE of Example City");
        assert_eq!(offset, "10km SE of");
        assert_eq!(location, "Example City");
        assert_eq!(format!("{} {}", offset, location), "10km SE of Example City");
    }

    #[test]
    fn test_split_place_uses_first_separator() {
        let (offset, location) = split_place("5km N of Isle of Man");
        assert_eq!(offset, "5km N of");
        assert_eq!(location, "Isle of Man");
    }

    #[test]
    fn test_split_place_without_separator() {
        assert_eq!(
            split_place("Example City"),
            ("Near The".to_string(), "Example City".to_string())
        );
        assert_eq!(split_place(""), ("Near The".to_string(), String::new()));
    }

    #[test]
    fn test_split_place_separator_at_end() {
        let (offset, location) = split_place("3km W of ");
        assert_eq!(offset, "3km W of");
        assert_eq!(location, "");
    }

    #[test]
    fn test_format_timestamp_epoch() {
        let (date, time) = format_timestamp(0, &utc());
        assert_eq!(date, "Jan 01, 1970");
        assert_eq!(time, "12:00 AM");
    }

    #[test]
    fn test_format_timestamp_afternoon() {
        // 2021-12-11T14:05:09.123Z
        let (date, time) = format_timestamp(1_639_231_509_123, &utc());
        assert_eq!(date, "Dec 11, 2021");
        assert_eq!(time, "2:05 PM");
    }

    #[test]
    fn test_format_timestamp_month_names_are_fixed() {
        // 2021-09-05T18:30:00Z
        let (date, time) = format_timestamp(1_630_866_600_000, &utc());
        assert_eq!(date, "Sep 05, 2021");
        assert_eq!(time, "6:30 PM");
    }

    #[test]
    fn test_format_timestamp_in_fixed_zone() {
        let ist = FixedOffset::east_opt(5 * 3600 + 30 * 60).unwrap();
        let (date, time) = format_timestamp(0, &ist);
        assert_eq!(date, "Jan 01, 1970");
        assert_eq!(time, "5:30 AM");
    }

    #[test]
    fn test_format_timestamp_out_of_range_falls_back_to_epoch() {
        assert_eq!(
            format_timestamp(i64::MAX, &utc()),
            format_timestamp(0, &utc())
        );
    }

    #[test]
    fn test_record_accessors() {
        let record = EarthquakeRecord::new(
            4.6,
            "88km N of Yelizovo, Russia",
            0,
            "https://example.org/eq".to_string(),
            &utc(),
        );
        assert_eq!(record.magnitude(), 4.6);
        assert_eq!(record.formatted_magnitude(), "4.6");
        assert_eq!(record.offset(), "88km N of");
        assert_eq!(record.primary_location(), "Yelizovo, Russia");
        assert_eq!(record.date(), "Jan 01, 1970");
        assert_eq!(record.time(), "12:00 AM");
        assert_eq!(record.url(), "https://example.org/eq");
        assert_eq!(record.magnitude_band(), MagnitudeBand::Four);
    }

    #[test]
    fn test_formatted_magnitude_pads_whole_numbers() {
        let record = EarthquakeRecord::new(7.0, "", 0, String::new(), &utc());
        assert_eq!(record.formatted_magnitude(), "7.0");
    }

    #[test]
    fn test_magnitude_bands() {
        assert_eq!(MagnitudeBand::from_magnitude(0.0), MagnitudeBand::One);
        assert_eq!(MagnitudeBand::from_magnitude(1.9), MagnitudeBand::One);
        assert_eq!(MagnitudeBand::from_magnitude(-1.2), MagnitudeBand::One);
        assert_eq!(MagnitudeBand::from_magnitude(2.0), MagnitudeBand::Two);
        assert_eq!(MagnitudeBand::from_magnitude(6.7), MagnitudeBand::Six);
        assert_eq!(MagnitudeBand::from_magnitude(9.99), MagnitudeBand::Nine);
        assert_eq!(MagnitudeBand::from_magnitude(10.0), MagnitudeBand::TenPlus);
        assert_eq!(MagnitudeBand::from_magnitude(12.3), MagnitudeBand::TenPlus);
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn prop_split_place_rejoins(
                offset in "[0-9]{1,3} ?km [NSEW]{1,3}",
                location in "[A-Za-z ,]{0,30}",
            ) {
                let place = format!("{offset} of {location}");
                let (head, tail) = split_place(&place);
                prop_assert_eq!(&head, &format!("{offset} of"));
                prop_assert_eq!(&tail, &location);
                prop_assert_eq!(format!("{head} {tail}"), place);
            }

            #[test]
            fn prop_split_place_without_separator_keeps_place(place in "[A-Za-z,]{0,30}") {
                let (head, tail) = split_place(&place);
                prop_assert_eq!(head.as_str(), DEFAULT_OFFSET);
                prop_assert_eq!(tail, place);
            }
        }
    }
}
