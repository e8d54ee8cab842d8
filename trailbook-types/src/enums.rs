use serde::{Deserialize, Serialize};

/// Popularity tier of an attraction. Every attraction starts LOW and is
/// promoted to HIGH once its score passes the popularity limit; the
/// promotion is one-way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum Popularity {
    #[default]
    Low,
    High,
}

impl Popularity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Popularity::Low => "LOW",
            Popularity::High => "HIGH",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "LOW" => Some(Popularity::Low),
            "HIGH" => Some(Popularity::High),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!(Popularity::parse("low"), Some(Popularity::Low));
        assert_eq!(Popularity::parse("HIGH"), Some(Popularity::High));
        assert_eq!(Popularity::parse("medium"), None);
    }

    #[test]
    fn round_trips_through_as_str() {
        for tier in [Popularity::Low, Popularity::High] {
            assert_eq!(Popularity::parse(tier.as_str()), Some(tier));
        }
    }
}
