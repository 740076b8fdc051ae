use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::errors::{GenerationError, Result};
use crate::faker_rs::{Faker, LocaleKey};

/// Options for a fixture factory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FactoryOptions {
    /// Seed for reproducible fixtures; a random seed is drawn when absent.
    pub seed: Option<u64>,
    /// Locale used by text generators (`en_US` or `pt_BR`).
    pub locale: String,
    /// Reference date (`"YYYY-MM-DD"`) that generated dates precede.
    /// Seeded factories fall back to a fixed date, unseeded ones to now.
    pub base_date: Option<NaiveDate>,
}

impl Default for FactoryOptions {
    fn default() -> Self {
        Self {
            seed: None,
            locale: LocaleKey::default().as_str().to_string(),
            base_date: None,
        }
    }
}

impl FactoryOptions {
    /// Parses options from a TOML document; missing keys take their defaults.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let options: Self = toml::from_str(source)?;
        options.locale_key()?;
        Ok(options)
    }

    pub fn locale_key(&self) -> Result<LocaleKey> {
        LocaleKey::parse(&self.locale).ok_or_else(|| {
            GenerationError::InvalidOptions(format!("unsupported faker locale '{}'", self.locale))
        })
    }

    /// Value source configured by these options.
    pub fn faker(&self) -> Result<Faker> {
        let locale = self.locale_key()?;
        let faker = match self.seed {
            Some(seed) => Faker::seeded(seed),
            None => Faker::random(),
        };
        let faker = match self.base_date {
            Some(date) => faker.with_base_date(date.and_time(NaiveTime::MIN).and_utc()),
            None => faker,
        };
        Ok(faker.with_locale(locale))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_toml_with_defaults() {
        let options = FactoryOptions::from_toml_str("seed = 42").unwrap();
        assert_eq!(options.seed, Some(42));
        assert_eq!(options.locale, "en_US");

        let options = FactoryOptions::from_toml_str("locale = \"pt_BR\"").unwrap();
        assert_eq!(options.seed, None);
        assert_eq!(options.locale_key().unwrap(), LocaleKey::PtBr);
    }

    #[test]
    fn rejects_unknown_locales() {
        let err = FactoryOptions::from_toml_str("locale = \"xx_YY\"").unwrap_err();
        assert!(matches!(err, GenerationError::InvalidOptions(_)));
        assert!(matches!(
            FactoryOptions::from_toml_str("seed = \"abc\""),
            Err(GenerationError::Config(_))
        ));
    }

    #[test]
    fn seeded_options_build_reproducible_fakers() {
        let options = FactoryOptions {
            seed: Some(5),
            ..FactoryOptions::default()
        };
        let mut left = options.faker().unwrap();
        let mut right = options.faker().unwrap();
        assert_eq!(left.uuid(), right.uuid());
        assert_eq!(left.past_datetime(), right.past_datetime());
    }

    #[test]
    fn base_date_is_read_from_toml() {
        let options =
            FactoryOptions::from_toml_str("seed = 1\nbase_date = \"2023-03-15\"").unwrap();
        let expected = NaiveDate::from_ymd_opt(2023, 3, 15).unwrap();
        assert_eq!(options.base_date, Some(expected));

        let faker = options.faker().unwrap();
        assert_eq!(faker.base_date().date_naive(), expected);
    }
}
