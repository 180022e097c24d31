use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Bucket size requested from the chart API via the `g` parameter.
#[derive(Copy, Clone, PartialEq, Eq, Serialize, Deserialize, Debug)]
pub enum Granularity {
    #[serde(rename = "s", alias = "second")]
    Second,
    #[serde(rename = "m", alias = "minute")]
    Minute,
    #[serde(rename = "h", alias = "hour")]
    Hour,
    #[serde(rename = "d", alias = "day")]
    Day,
}

impl Granularity {
    pub fn code(&self) -> &'static str {
        match self {
            Granularity::Second => "s",
            Granularity::Minute => "m",
            Granularity::Hour => "h",
            Granularity::Day => "d",
        }
    }

    /// Hourly buckets once the window spans an hour or more, minutes below that.
    pub fn for_window(time_window_seconds: u64) -> Self {
        if time_window_seconds >= 3600 {
            Granularity::Hour
        } else {
            Granularity::Minute
        }
    }
}

impl FromStr for Granularity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "s" | "second" => Ok(Granularity::Second),
            "m" | "minute" => Ok(Granularity::Minute),
            "h" | "hour" => Ok(Granularity::Hour),
            "d" | "day" => Ok(Granularity::Day),
            other => Err(format!("unknown granularity {:?}, expected s, m, h or d", other)),
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::{check, let_assert};

    #[test]
    fn parses_codes_and_words() {
        check!("h".parse::<Granularity>() == Ok(Granularity::Hour));
        check!("Minute".parse::<Granularity>() == Ok(Granularity::Minute));
        check!(" d ".parse::<Granularity>() == Ok(Granularity::Day));
        let_assert!(Err(_) = "week".parse::<Granularity>());
    }

    #[test]
    fn window_of_an_hour_uses_hourly_buckets() {
        check!(Granularity::for_window(30) == Granularity::Minute);
        check!(Granularity::for_window(3599) == Granularity::Minute);
        check!(Granularity::for_window(3600) == Granularity::Hour);
    }
}
