pub mod search;

pub use search::SearchParams;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Coarse price range used by the listing search filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PriceBucket {
    #[serde(rename = "<100K")]
    Under100K,
    #[serde(rename = "100K-1M")]
    HundredKToOneMillion,
    #[serde(rename = "1M-5M")]
    OneToFiveMillion,
    #[serde(rename = "5M-10M")]
    FiveToTenMillion,
    #[serde(rename = "10M+")]
    OverTenMillion,
}

impl PriceBucket {
    /// All buckets, cheapest first
    pub const ALL: [PriceBucket; 5] = [
        PriceBucket::Under100K,
        PriceBucket::HundredKToOneMillion,
        PriceBucket::OneToFiveMillion,
        PriceBucket::FiveToTenMillion,
        PriceBucket::OverTenMillion,
    ];

    /// Bucket a non-negative price. Upper bounds are inclusive except for
    /// the first bucket, whose bound (100K) belongs to the next one.
    pub fn of(price: f64) -> Self {
        if price < 100_000.0 {
            PriceBucket::Under100K
        } else if price <= 1_000_000.0 {
            PriceBucket::HundredKToOneMillion
        } else if price <= 5_000_000.0 {
            PriceBucket::OneToFiveMillion
        } else if price <= 10_000_000.0 {
            PriceBucket::FiveToTenMillion
        } else {
            PriceBucket::OverTenMillion
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PriceBucket::Under100K => "<100K",
            PriceBucket::HundredKToOneMillion => "100K-1M",
            PriceBucket::OneToFiveMillion => "1M-5M",
            PriceBucket::FiveToTenMillion => "5M-10M",
            PriceBucket::OverTenMillion => "10M+",
        }
    }
}

impl fmt::Display for PriceBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for PriceBucket {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        PriceBucket::ALL
            .into_iter()
            .find(|bucket| bucket.label().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| anyhow::anyhow!("Unknown price range: {}", s))
    }
}

/// Normalise a price as typed into the admin console ("₱1,000,000.00") to a
/// number. Anything that does not leave a positive number behind becomes 0.
pub fn parse_price(raw: &str) -> f64 {
    let mut cleaned = String::with_capacity(raw.len());
    let mut seen_dot = false;

    for c in raw.trim().chars() {
        match c {
            '0'..='9' => cleaned.push(c),
            '.' if !seen_dot => {
                seen_dot = true;
                cleaned.push(c);
            }
            // a second dot ends the number
            '.' => break,
            '-' if cleaned.is_empty() => cleaned.push(c),
            _ => {}
        }
    }

    match cleaned.parse::<f64>() {
        Ok(value) if value.is_finite() && value > 0.0 => value,
        _ => 0.0,
    }
}

/// Format a price for display: peso sign, thousands separators, no decimals
pub fn format_price(value: f64) -> String {
    let whole = value.max(0.0).round() as u64;
    let digits = whole.to_string();

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    format!("₱{}", grouped)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bucket_boundaries() {
        assert_eq!(PriceBucket::of(99_999.0).label(), "<100K");
        assert_eq!(PriceBucket::of(100_000.0).label(), "100K-1M");
        assert_eq!(PriceBucket::of(1_000_000.0).label(), "100K-1M");
        assert_eq!(PriceBucket::of(1_000_001.0).label(), "1M-5M");
        assert_eq!(PriceBucket::of(5_000_000.0).label(), "1M-5M");
        assert_eq!(PriceBucket::of(5_000_001.0).label(), "5M-10M");
        assert_eq!(PriceBucket::of(10_000_000.0).label(), "5M-10M");
        assert_eq!(PriceBucket::of(10_000_001.0).label(), "10M+");
    }

    #[test]
    fn test_zero_is_lowest_bucket() {
        assert_eq!(PriceBucket::of(0.0), PriceBucket::Under100K);
    }

    #[test]
    fn test_parse_price_strips_currency_and_commas() {
        assert_eq!(parse_price("₱1,000,000.00"), 1_000_000.0);
        assert_eq!(parse_price(" 2,500,000 "), 2_500_000.0);
        assert_eq!(parse_price("PHP 99,999.50"), 99_999.5);
        assert_eq!(
            PriceBucket::of(parse_price("₱1,000,000.00")),
            PriceBucket::HundredKToOneMillion
        );
    }

    #[test]
    fn test_parse_price_stops_at_second_dot() {
        assert_eq!(parse_price("1,000.50.25"), 1000.5);
        assert_eq!(parse_price("₱12.5.0"), 12.5);
    }

    #[test]
    fn test_parse_price_degrades_to_zero() {
        assert_eq!(parse_price("not-a-number"), 0.0);
        assert_eq!(parse_price(""), 0.0);
        assert_eq!(parse_price("-500"), 0.0);
        assert_eq!(PriceBucket::of(parse_price("not-a-number")), PriceBucket::Under100K);
    }

    #[test]
    fn test_label_round_trip_through_from_str() {
        for bucket in PriceBucket::ALL {
            assert_eq!(bucket.label().parse::<PriceBucket>().unwrap(), bucket);
        }
        assert!("1B+".parse::<PriceBucket>().is_err());
    }

    #[test]
    fn test_serde_uses_labels() {
        let json = serde_json::to_string(&PriceBucket::OverTenMillion).unwrap();
        assert_eq!(json, "\"10M+\"");
        let bucket: PriceBucket = serde_json::from_str("\"<100K\"").unwrap();
        assert_eq!(bucket, PriceBucket::Under100K);
    }

    #[test]
    fn test_format_price() {
        assert_eq!(format_price(0.0), "₱0");
        assert_eq!(format_price(999.0), "₱999");
        assert_eq!(format_price(1_000.0), "₱1,000");
        assert_eq!(format_price(4_850_000.0), "₱4,850,000");
        assert_eq!(format_price(123_456.6), "₱123,457");
    }
}
