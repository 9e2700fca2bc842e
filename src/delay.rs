use std::str::FromStr;
use std::time::Duration;

use rand::Rng;

use crate::errors::MyAnimeError;

/// a closed range of whole seconds to wait between requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Delay {
    min_secs: u64,
    max_secs: u64,
}

impl Delay {
    /// waits nothing; handy for tests and local mirrors.
    pub const NONE: Delay = Delay::seconds(0, 0);

    pub const fn seconds(min_secs: u64, max_secs: u64) -> Self {
        if min_secs <= max_secs {
            Self { min_secs, max_secs }
        } else {
            Self {
                min_secs: max_secs,
                max_secs: min_secs,
            }
        }
    }

    /// picks a duration uniformly from the range.
    pub fn sample(&self) -> Duration {
        if self.min_secs == self.max_secs {
            return Duration::from_secs(self.min_secs);
        }

        Duration::from_secs(rand::thread_rng().gen_range(self.min_secs..=self.max_secs))
    }

    /// sleeps for a sampled duration and returns it.
    pub async fn wait(&self) -> Duration {
        let duration = self.sample();
        if !duration.is_zero() {
            tokio::time::sleep(duration).await;
        }
        duration
    }
}

impl FromStr for Delay {
    type Err = MyAnimeError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let parse = |raw: &str| {
            raw.trim()
                .parse::<u64>()
                .map_err(|_| MyAnimeError::InvalidDelay(format!("{s:?} is not a number of seconds")))
        };

        if let Some((min, max)) = s.split_once('-') {
            let (min, max) = (parse(min)?, parse(max)?);
            if min > max {
                return Err(MyAnimeError::InvalidDelay(
                    "minimum cannot be greater than maximum".into(),
                ));
            }
            Ok(Delay::seconds(min, max))
        } else {
            let value = parse(s)?;
            Ok(Delay::seconds(value, value))
        }
    }
}

impl std::fmt::Display for Delay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.min_secs == self.max_secs {
            write!(f, "{}", self.min_secs)
        } else {
            write!(f, "{}-{}", self.min_secs, self.max_secs)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_range_and_single_value() {
        assert_eq!("15-30".parse::<Delay>().expect("range"), Delay::seconds(15, 30));
        assert_eq!("2".parse::<Delay>().expect("single"), Delay::seconds(2, 2));
        assert!("30-15".parse::<Delay>().is_err());
        assert!("soon".parse::<Delay>().is_err());
    }

    #[test]
    fn sample_stays_within_bounds() {
        let delay = Delay::seconds(0, 2);
        for _ in 0..100 {
            let sampled = delay.sample();
            assert!(sampled <= Duration::from_secs(2));
        }
        assert_eq!(Delay::seconds(7, 7).sample(), Duration::from_secs(7));
    }

    #[test]
    fn display_round_trips_through_from_str() {
        for raw in ["0-2", "15-30", "5"] {
            let delay: Delay = raw.parse().expect("delay should parse");
            assert_eq!(delay.to_string(), raw);
        }
    }

    #[tokio::test]
    async fn none_does_not_sleep() {
        assert_eq!(Delay::NONE.wait().await, Duration::ZERO);
    }
}
