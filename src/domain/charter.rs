use std::fmt;
use std::str::FromStr;

use crate::app::AppError;

/// Charter number assigned by the NCUA to a federally insured credit union.
///
/// Always a positive integer; zero and anything non-numeric are rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CharterNumber(u64);

impl CharterNumber {
    pub fn new(value: u64) -> Option<Self> {
        (value > 0).then_some(Self(value))
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl FromStr for CharterNumber {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        // u64::from_str accepts a leading "+"
        if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
            return Err(AppError::InvalidCharter(s.to_string()));
        }

        trimmed
            .parse::<u64>()
            .ok()
            .and_then(Self::new)
            .ok_or_else(|| AppError::InvalidCharter(s.to_string()))
    }
}

impl fmt::Display for CharterNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_positive_integer() {
        let charter: CharterNumber = "5536".parse().unwrap();
        assert_eq!(charter.get(), 5536);
    }

    #[test]
    fn test_parse_trims_whitespace() {
        let charter: CharterNumber = "  42\r\n".parse().unwrap();
        assert_eq!(charter.get(), 42);
    }

    #[test]
    fn test_parse_rejects_zero() {
        assert!(matches!(
            "0".parse::<CharterNumber>(),
            Err(AppError::InvalidCharter(_))
        ));
    }

    #[test]
    fn test_parse_rejects_non_numeric() {
        for bad in ["", "abc", "12a", "-3", "+3", "1.5", "1 2"] {
            assert!(bad.parse::<CharterNumber>().is_err(), "accepted {:?}", bad);
        }
    }

    #[test]
    fn test_parse_rejects_overflow() {
        assert!("99999999999999999999999".parse::<CharterNumber>().is_err());
    }

    #[test]
    fn test_ordering_is_numeric() {
        let small: CharterNumber = "9".parse().unwrap();
        let large: CharterNumber = "10".parse().unwrap();
        assert!(small < large);
    }
}
