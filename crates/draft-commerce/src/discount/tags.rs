//! Discount percentages encoded in product tags ("5%", "12.5% OFF").

use crate::error::CommerceError;
use crate::money::Money;
use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

static PERCENT_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+(?:\.\d+)?)%").expect("percent tag pattern is valid"));

/// A discount percentage in fixed point, hundredths of a percent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct DiscountPercent {
    hundredths: i64,
}

impl DiscountPercent {
    /// No discount.
    pub const ZERO: DiscountPercent = DiscountPercent { hundredths: 0 };

    /// From hundredths of a percent (`1250` is 12.5%).
    pub const fn from_hundredths(hundredths: i64) -> Self {
        Self { hundredths }
    }

    /// Parse the numeric part of a tag (`"12.5"`). Extra digits round half-up.
    pub fn parse(text: &str) -> Result<Self, CommerceError> {
        // Same two-fraction-digit fixed point as cents.
        Money::parse(text)
            .ok()
            .filter(|m| !m.is_negative())
            .map(|m| Self::from_hundredths(m.amount_cents))
            .ok_or_else(|| CommerceError::InvalidPercent(text.to_string()))
    }

    pub fn hundredths(&self) -> i64 {
        self.hundredths
    }

    pub fn is_zero(&self) -> bool {
        self.hundredths == 0
    }

    /// This percentage of `amount`, rounded half-up to the cent.
    pub fn of(&self, amount: Money) -> Result<Money, CommerceError> {
        amount
            .scale(self.hundredths, 100 * 100)
            .ok_or(CommerceError::Overflow)
    }
}

impl fmt::Display for DiscountPercent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let whole = self.hundredths / 100;
        let fraction = self.hundredths % 100;
        if fraction == 0 {
            write!(f, "{whole}%")
        } else if fraction % 10 == 0 {
            write!(f, "{whole}.{}%", fraction / 10)
        } else {
            write!(f, "{whole}.{fraction:02}%")
        }
    }
}

/// Split the platform's comma-separated tag string, trimming each tag.
pub fn split_tags(tags: &str) -> Vec<String> {
    tags.split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}

/// The first tag carrying a percentage wins; tags without one are skipped.
pub fn discount_percent_from_tags<S: AsRef<str>>(tags: &[S]) -> DiscountPercent {
    tags.iter()
        .find_map(|tag| {
            PERCENT_TAG
                .captures(tag.as_ref())
                .and_then(|caps| caps.get(1))
                .and_then(|m| DiscountPercent::parse(m.as_str()).ok())
        })
        .unwrap_or(DiscountPercent::ZERO)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_matching_tag_wins() {
        let tags = ["Clearance", "5% OFF", "10%"];
        assert_eq!(
            discount_percent_from_tags(&tags),
            DiscountPercent::from_hundredths(500)
        );
    }

    #[test]
    fn test_fractional_percent() {
        let tags = ["12.5% OFF"];
        assert_eq!(
            discount_percent_from_tags(&tags),
            DiscountPercent::from_hundredths(1250)
        );
    }

    #[test]
    fn test_no_match_defaults_to_zero() {
        let tags = ["Sale", "Bundle", "percent"];
        assert!(discount_percent_from_tags(&tags).is_zero());

        let empty: [&str; 0] = [];
        assert!(discount_percent_from_tags(&empty).is_zero());
    }

    #[test]
    fn test_split_tags() {
        assert_eq!(
            split_tags(" Sale , 5% OFF,,Bundle "),
            vec!["Sale".to_string(), "5% OFF".to_string(), "Bundle".to_string()]
        );
        assert!(split_tags("").is_empty());
    }

    #[test]
    fn test_percent_of_amount() {
        let percent = DiscountPercent::from_hundredths(1000);
        assert_eq!(percent.of(Money::new(10000)).unwrap(), Money::new(1000));

        let percent = DiscountPercent::from_hundredths(1250);
        assert_eq!(percent.of(Money::new(1999)).unwrap(), Money::new(250));
    }

    #[test]
    fn test_percent_display() {
        assert_eq!(DiscountPercent::from_hundredths(500).to_string(), "5%");
        assert_eq!(DiscountPercent::from_hundredths(1250).to_string(), "12.5%");
        assert_eq!(DiscountPercent::from_hundredths(1205).to_string(), "12.05%");
    }

    #[test]
    fn test_parse_rejects_negative() {
        assert!(DiscountPercent::parse("-5").is_err());
        assert!(DiscountPercent::parse("x").is_err());
    }
}
