//! Ordering types: which field a list is sorted by, and in which direction.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::{FieldName, TypesError};

/// Sort direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Smallest value first.
    #[default]
    Ascending,
    /// Largest value first.
    Descending,
}

impl Direction {
    /// Comparison sign: `+1` for ascending, `-1` for descending.
    pub fn sign(self) -> i8 {
        match self {
            Self::Ascending => 1,
            Self::Descending => -1,
        }
    }

    /// Apply this direction to an ascending comparison result.
    pub fn apply(self, ordering: Ordering) -> Ordering {
        if self.sign() < 0 {
            ordering.reverse()
        } else {
            ordering
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ascending => f.write_str("asc"),
            Self::Descending => f.write_str("desc"),
        }
    }
}

impl FromStr for Direction {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Ok(Self::Ascending),
            "desc" | "descending" => Ok(Self::Descending),
            _ => Err(TypesError::InvalidDirection(s.to_string())),
        }
    }
}

/// The active ordering of a list: a sort key plus a direction.
///
/// The key must name a field carried by every item being compared. That is
/// checked when a page is ingested, not here.
///
/// Serializes as the `key:asc` / `key:desc` string form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct OrderSpec {
    /// Field the list is ordered by.
    pub key: FieldName,
    /// Direction of the ordering.
    pub direction: Direction,
}

impl OrderSpec {
    /// Create an order spec.
    pub fn new(key: impl Into<String>, direction: Direction) -> Self {
        Self {
            key: FieldName::new(key),
            direction,
        }
    }

    /// Ascending order on `key`.
    pub fn ascending(key: impl Into<String>) -> Self {
        Self::new(key, Direction::Ascending)
    }

    /// Descending order on `key`.
    pub fn descending(key: impl Into<String>) -> Self {
        Self::new(key, Direction::Descending)
    }
}

impl Default for OrderSpec {
    fn default() -> Self {
        OrderPreset::Newest.spec()
    }
}

/// Prints as `key:asc` or `key:desc`.
impl fmt::Display for OrderSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.key, self.direction)
    }
}

/// Parses `key`, `key:asc` or `key:desc`. A bare key sorts ascending.
///
/// Keys may contain colons: the last segment is only split off when it
/// names a direction, so `meta:score` is the key `meta:score`.
impl FromStr for OrderSpec {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (key, direction) = match s.rsplit_once(':') {
            Some((key, dir)) => match dir.trim().parse() {
                Ok(direction) => (key.trim(), direction),
                Err(_) if dir.trim().is_empty() => {
                    return Err(TypesError::InvalidDirection(String::new()))
                }
                Err(_) => (s, Direction::Ascending),
            },
            None => (s, Direction::Ascending),
        };
        if key.is_empty() {
            return Err(TypesError::EmptyOrderKey);
        }
        Ok(Self::new(key, direction))
    }
}

/// Named orderings offered by list views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrderPreset {
    /// Most recently created first.
    Newest,
    /// Least recently created first.
    Oldest,
    /// Highest rated first.
    Best,
    /// Lowest rated first.
    Worst,
}

impl OrderPreset {
    /// Creation timestamp field used by the time-based presets.
    pub const CREATED_AT: &'static str = "createdAt";
    /// Rating field used by the rating-based presets.
    pub const RATING: &'static str = "rating";

    /// All presets, in menu order.
    pub const ALL: [Self; 4] = [Self::Newest, Self::Oldest, Self::Best, Self::Worst];

    /// The order spec this preset stands for.
    pub fn spec(self) -> OrderSpec {
        match self {
            Self::Newest => OrderSpec::descending(Self::CREATED_AT),
            Self::Oldest => OrderSpec::ascending(Self::CREATED_AT),
            Self::Best => OrderSpec::descending(Self::RATING),
            Self::Worst => OrderSpec::ascending(Self::RATING),
        }
    }
}

impl fmt::Display for OrderPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Newest => "newest",
            Self::Oldest => "oldest",
            Self::Best => "best",
            Self::Worst => "worst",
        };
        f.write_str(name)
    }
}

impl FromStr for OrderPreset {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|preset| preset.to_string().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| TypesError::UnknownPreset(s.to_string()))
    }
}

impl TryFrom<String> for OrderSpec {
    type Error = TypesError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<OrderSpec> for String {
    fn from(spec: OrderSpec) -> Self {
        spec.to_string()
    }
}

impl From<OrderPreset> for OrderSpec {
    fn from(preset: OrderPreset) -> Self {
        preset.spec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direction_sign() {
        assert_eq!(Direction::Ascending.sign(), 1);
        assert_eq!(Direction::Descending.sign(), -1);
    }

    #[test]
    fn direction_apply_reverses_for_descending() {
        assert_eq!(Direction::Ascending.apply(Ordering::Less), Ordering::Less);
        assert_eq!(
            Direction::Descending.apply(Ordering::Less),
            Ordering::Greater
        );
        assert_eq!(Direction::Descending.apply(Ordering::Equal), Ordering::Equal);
    }

    #[test]
    fn order_spec_parses_suffixes() {
        assert_eq!(
            "createdAt:desc".parse::<OrderSpec>().unwrap(),
            OrderSpec::descending("createdAt")
        );
        assert_eq!(
            "calorie:asc".parse::<OrderSpec>().unwrap(),
            OrderSpec::ascending("calorie")
        );
        assert_eq!(
            "rating".parse::<OrderSpec>().unwrap(),
            OrderSpec::ascending("rating")
        );
    }

    #[test]
    fn order_spec_rejects_bad_input() {
        assert_eq!(
            ":desc".parse::<OrderSpec>(),
            Err(TypesError::EmptyOrderKey)
        );
        assert_eq!(
            "rating:".parse::<OrderSpec>(),
            Err(TypesError::InvalidDirection(String::new()))
        );
        assert_eq!("  ".parse::<OrderSpec>(), Err(TypesError::EmptyOrderKey));
    }

    #[test]
    fn order_key_may_contain_colons() {
        assert_eq!(
            "meta:score".parse::<OrderSpec>().unwrap(),
            OrderSpec::ascending("meta:score")
        );
        assert_eq!(
            "meta:score:desc".parse::<OrderSpec>().unwrap(),
            OrderSpec::descending("meta:score")
        );
        assert_eq!(
            "meta:score:DESC".parse::<OrderSpec>().unwrap(),
            OrderSpec::descending("meta:score")
        );
    }

    #[test]
    fn order_spec_display_roundtrips() {
        let spec = OrderSpec::descending("rating");
        assert_eq!(spec.to_string(), "rating:desc");
        assert_eq!(spec.to_string().parse::<OrderSpec>().unwrap(), spec);
    }

    #[test]
    fn order_spec_serializes_as_string() {
        let spec = OrderSpec::descending("createdAt");
        assert_eq!(
            serde_json::to_string(&spec).unwrap(),
            "\"createdAt:desc\""
        );
        let parsed: OrderSpec = serde_json::from_str("\"calorie\"").unwrap();
        assert_eq!(parsed, OrderSpec::ascending("calorie"));
        assert!(serde_json::from_str::<OrderSpec>("\":desc\"").is_err());
    }

    #[test]
    fn presets_map_to_specs() {
        assert_eq!(OrderPreset::Newest.spec(), OrderSpec::descending("createdAt"));
        assert_eq!(OrderPreset::Oldest.spec(), OrderSpec::ascending("createdAt"));
        assert_eq!(OrderPreset::Best.spec(), OrderSpec::descending("rating"));
        assert_eq!(OrderPreset::Worst.spec(), OrderSpec::ascending("rating"));
    }

    #[test]
    fn preset_parsing_is_case_insensitive() {
        assert_eq!("BEST".parse::<OrderPreset>().unwrap(), OrderPreset::Best);
        assert!(matches!(
            "loudest".parse::<OrderPreset>(),
            Err(TypesError::UnknownPreset(_))
        ));
    }

    #[test]
    fn default_order_is_newest_first() {
        assert_eq!(OrderSpec::default(), OrderPreset::Newest.spec());
    }
}
