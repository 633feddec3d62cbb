//! Condition code to icon lookup.
//!
//! The ranges mirror OpenWeather's condition groups. They belong to the
//! provider, so the table can be replaced from configuration.

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_FALLBACK_ICON: &str = "dunno";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum IconTableError {
    #[error("icon bucket {min}..={max} has min greater than max")]
    InvertedRange { min: i64, max: i64 },

    #[error("icon bucket {min}..={max} has an empty icon name")]
    EmptyIcon { min: i64, max: i64 },

    #[error("fallback icon name must not be empty")]
    EmptyFallback,
}

/// Inclusive range of condition codes sharing one icon.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IconBucket {
    pub min: i64,
    pub max: i64,
    pub icon: String,
}

impl IconBucket {
    pub fn new(min: i64, max: i64, icon: impl Into<String>) -> Self {
        Self { min, max, icon: icon.into() }
    }

    fn contains(&self, code: i64) -> bool {
        (self.min..=self.max).contains(&code)
    }
}

/// Ordered buckets, first match wins; anything unmatched gets the fallback.
///
/// Example TOML:
/// ```toml
/// [icons]
/// fallback = "dunno"
///
/// [[icons.buckets]]
/// min = 800
/// max = 800
/// icon = "sunny"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawIconTable")]
pub struct IconTable {
    fallback: String,
    buckets: Vec<IconBucket>,
}

#[derive(Deserialize)]
struct RawIconTable {
    #[serde(default)]
    buckets: Vec<IconBucket>,
    #[serde(default = "default_fallback")]
    fallback: String,
}

fn default_fallback() -> String {
    DEFAULT_FALLBACK_ICON.to_string()
}

impl TryFrom<RawIconTable> for IconTable {
    type Error = IconTableError;

    fn try_from(raw: RawIconTable) -> Result<Self, Self::Error> {
        IconTable::new(raw.buckets, raw.fallback)
    }
}

impl IconTable {
    pub fn new(buckets: Vec<IconBucket>, fallback: impl Into<String>) -> Result<Self, IconTableError> {
        let fallback = fallback.into();
        if fallback.trim().is_empty() {
            return Err(IconTableError::EmptyFallback);
        }

        for bucket in &buckets {
            if bucket.min > bucket.max {
                return Err(IconTableError::InvertedRange { min: bucket.min, max: bucket.max });
            }
            if bucket.icon.trim().is_empty() {
                return Err(IconTableError::EmptyIcon { min: bucket.min, max: bucket.max });
            }
        }

        Ok(Self { buckets, fallback })
    }

    /// Built-in table for OpenWeather condition codes.
    pub fn openweather() -> Self {
        let buckets = vec![
            IconBucket::new(0, 300, "tstorm1"),
            IconBucket::new(301, 500, "light_rain"),
            IconBucket::new(501, 600, "shower3"),
            IconBucket::new(601, 700, "snow4"),
            IconBucket::new(701, 771, "fog"),
            IconBucket::new(772, 799, "tstorm3"),
            IconBucket::new(800, 800, "sunny"),
            IconBucket::new(801, 804, "cloudy2"),
            IconBucket::new(900, 903, "tstorm3"),
            IconBucket::new(904, 904, "sunny"),
            IconBucket::new(905, 1000, "tstorm3"),
        ];

        Self { buckets, fallback: default_fallback() }
    }

    pub fn icon_for(&self, condition_code: i64) -> &str {
        self.buckets
            .iter()
            .find(|b| b.contains(condition_code))
            .map(|b| b.icon.as_str())
            .unwrap_or(&self.fallback)
    }

    pub fn buckets(&self) -> &[IconBucket] {
        &self.buckets
    }

    pub fn fallback(&self) -> &str {
        &self.fallback
    }
}

impl Default for IconTable {
    fn default() -> Self {
        Self::openweather()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn openweather_table_boundaries() {
        let table = IconTable::openweather();

        assert_eq!(table.icon_for(0), "tstorm1");
        assert_eq!(table.icon_for(300), "tstorm1");
        assert_eq!(table.icon_for(301), "light_rain");
        assert_eq!(table.icon_for(500), "light_rain");
        assert_eq!(table.icon_for(501), "shower3");
        assert_eq!(table.icon_for(601), "snow4");
        assert_eq!(table.icon_for(741), "fog");
        assert_eq!(table.icon_for(781), "tstorm3");
        assert_eq!(table.icon_for(800), "sunny");
        assert_eq!(table.icon_for(801), "cloudy2");
        assert_eq!(table.icon_for(804), "cloudy2");
        assert_eq!(table.icon_for(903), "tstorm3");
        assert_eq!(table.icon_for(904), "sunny");
        assert_eq!(table.icon_for(1000), "tstorm3");
    }

    #[test]
    fn unmatched_codes_use_fallback() {
        let table = IconTable::openweather();

        for code in [-1, -9999, 805, 899, 1001, i64::MAX, i64::MIN] {
            assert_eq!(table.icon_for(code), DEFAULT_FALLBACK_ICON, "code = {code}");
        }
    }

    #[test]
    fn lookup_is_total_and_never_empty() {
        let table = IconTable::openweather();
        for code in -50..=1100 {
            assert!(!table.icon_for(code).is_empty());
        }
    }

    #[test]
    fn first_matching_bucket_wins() {
        let table = IconTable::new(
            vec![IconBucket::new(0, 10, "first"), IconBucket::new(5, 20, "second")],
            "none",
        )
        .unwrap();

        assert_eq!(table.icon_for(7), "first");
        assert_eq!(table.icon_for(15), "second");
        assert_eq!(table.icon_for(21), "none");
    }

    #[test]
    fn rejects_invalid_tables() {
        let err = IconTable::new(vec![IconBucket::new(10, 1, "x")], "dunno").unwrap_err();
        assert_eq!(err, IconTableError::InvertedRange { min: 10, max: 1 });

        let err = IconTable::new(vec![IconBucket::new(1, 2, " ")], "dunno").unwrap_err();
        assert_eq!(err, IconTableError::EmptyIcon { min: 1, max: 2 });

        let err = IconTable::new(vec![], "").unwrap_err();
        assert_eq!(err, IconTableError::EmptyFallback);
    }

    #[test]
    fn deserialize_validates() {
        let ok: IconTable = toml::from_str(
            r#"
            [[buckets]]
            min = 800
            max = 800
            icon = "clear"
            "#,
        )
        .unwrap();
        assert_eq!(ok.icon_for(800), "clear");
        assert_eq!(ok.icon_for(801), DEFAULT_FALLBACK_ICON);

        let bad = toml::from_str::<IconTable>(
            r#"
            fallback = ""
            "#,
        );
        assert!(bad.is_err());
    }
}
