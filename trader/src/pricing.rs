use crate::error::Error;
use crate::oracle::MarketQuote;
use crate::Result;
use std::fmt;
use std::str::FromStr;

/// How a sell price is derived from the competing quotes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PricingPolicy {
    /// Floor of the mean quote, or the floor price when `mean - 1` would fall below it.
    #[default]
    Mean,
    /// One below the cheapest competitor, never below the floor price.
    Undercut,
}

impl PricingPolicy {
    pub fn price(&self, quote: &MarketQuote, floor: i64) -> Result<i64> {
        let prices = &quote.prices;
        if prices.is_empty() {
            return Err(Error::EmptyQuote(quote.item.clone()));
        }

        Ok(match self {
            PricingPolicy::Mean => {
                let mean = prices.iter().sum::<i64>().div_euclid(prices.len() as i64);
                if mean - 1 < floor {
                    floor
                } else {
                    mean
                }
            }
            PricingPolicy::Undercut => {
                let lowest = prices.iter().copied().min().unwrap_or(floor);
                (lowest - 1).max(floor)
            }
        })
    }
}

impl FromStr for PricingPolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "mean" => Ok(PricingPolicy::Mean),
            "undercut" => Ok(PricingPolicy::Undercut),
            other => Err(Error::Config(format!("unknown pricing policy: {other}"))),
        }
    }
}

impl fmt::Display for PricingPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PricingPolicy::Mean => f.write_str("mean"),
            PricingPolicy::Undercut => f.write_str("undercut"),
        }
    }
}

/// Parks prime parts whose ducat value is low relative to their platinum price
/// at a fixed placeholder price.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DucatFallback {
    pub min_ratio: f64,
    pub price: i64,
}

impl DucatFallback {
    pub fn apply(&self, price: i64, ducats: Option<i64>) -> i64 {
        match ducats {
            Some(ducats) if ducats > 0 && price > 0 => {
                if (ducats as f64 / price as f64) < self.min_ratio {
                    self.price
                } else {
                    price
                }
            }
            _ => price,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quote(prices: &[i64]) -> MarketQuote {
        MarketQuote {
            item: "mag_prime_systems".into(),
            prices: prices.to_vec(),
        }
    }

    #[test]
    fn mean_of_equal_quotes_at_the_floor_returns_floor() {
        assert_eq!(
            PricingPolicy::Mean.price(&quote(&[10, 10, 10, 10, 10]), 10).unwrap(),
            10
        );
    }

    #[test]
    fn mean_is_rounded_down() {
        assert_eq!(
            PricingPolicy::Mean.price(&quote(&[50, 52, 54, 56, 58]), 10).unwrap(),
            54
        );
        assert_eq!(PricingPolicy::Mean.price(&quote(&[12, 13, 15]), 10).unwrap(), 13);
    }

    #[test]
    fn mean_just_above_floor_is_clamped() {
        // mean 10, one below would be 9 < floor 10
        assert_eq!(PricingPolicy::Mean.price(&quote(&[9, 11]), 10).unwrap(), 10);
        // mean 11, 10 is not below the floor so the mean is kept
        assert_eq!(PricingPolicy::Mean.price(&quote(&[11, 11]), 10).unwrap(), 11);
    }

    #[test]
    fn undercut_goes_one_below_the_cheapest() {
        assert_eq!(
            PricingPolicy::Undercut.price(&quote(&[20, 25, 30]), 10).unwrap(),
            19
        );
        assert_eq!(PricingPolicy::Undercut.price(&quote(&[10, 40]), 10).unwrap(), 10);
        assert_eq!(PricingPolicy::Undercut.price(&quote(&[3]), 10).unwrap(), 10);
    }

    #[test]
    fn empty_quote_is_an_error() {
        for policy in [PricingPolicy::Mean, PricingPolicy::Undercut] {
            match policy.price(&quote(&[]), 10) {
                Err(Error::EmptyQuote(item)) => assert_eq!(item, "mag_prime_systems"),
                other => panic!("unexpected result: {other:?}"),
            }
        }
    }

    #[test]
    fn price_never_drops_below_floor() {
        let samples: [&[i64]; 6] = [&[1], &[1, 2, 3], &[10], &[11], &[0, 100], &[5, 5, 5, 5, 5]];
        for floor in [0, 1, 10, 50] {
            for prices in samples {
                for policy in [PricingPolicy::Mean, PricingPolicy::Undercut] {
                    assert!(policy.price(&quote(prices), floor).unwrap() >= floor);
                }
            }
        }
    }

    #[test]
    fn policy_parses_from_config_text() {
        assert_eq!("Mean".parse::<PricingPolicy>().unwrap(), PricingPolicy::Mean);
        assert_eq!(
            "undercut".parse::<PricingPolicy>().unwrap(),
            PricingPolicy::Undercut
        );
        assert!("cheapest".parse::<PricingPolicy>().is_err());
        assert_eq!(PricingPolicy::Undercut.to_string(), "undercut");
    }

    #[test]
    fn ducat_fallback_only_replaces_low_ratio_prices() {
        let fallback = DucatFallback {
            min_ratio: 2.0,
            price: 999,
        };
        // 45 ducats for 30p is 1.5 ducats per platinum
        assert_eq!(fallback.apply(30, Some(45)), 999);
        // 100 ducats for 20p is 5 ducats per platinum
        assert_eq!(fallback.apply(20, Some(100)), 20);
        assert_eq!(fallback.apply(20, None), 20);
        assert_eq!(fallback.apply(20, Some(0)), 20);
    }
}
