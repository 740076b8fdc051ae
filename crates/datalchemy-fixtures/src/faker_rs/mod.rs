//! Random value source handed to field generators.
//!
//! Wraps a seedable ChaCha RNG together with a locale and exposes the handful
//! of `fake` generators fixtures commonly need.

pub mod locales;

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use fake::Fake;
use fake::faker::internet::raw::SafeEmail;
use fake::faker::lorem::raw::{Sentence, Word, Words};
use fake::faker::name::raw::{FirstName, LastName, Name};
use fake::locales::{EN, PT_BR};
use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use uuid::Uuid;

pub use locales::LocaleKey;

const LETTERS: &[u8] = b"abcdefghijklmnopqrstuvwxyz";
const WORD_ATTEMPTS: usize = 16;
const PAST_WINDOW_SECS: i64 = 365 * 24 * 60 * 60;

macro_rules! localized {
    ($faker:ident, $generator:ident $(, $arg:expr)*) => {
        match $faker.locale {
            LocaleKey::EnUs => $generator(EN $(, $arg)*).fake_with_rng(&mut $faker.rng),
            LocaleKey::PtBr => $generator(PT_BR $(, $arg)*).fake_with_rng(&mut $faker.rng),
        }
    };
}

/// Reference instant for seeded sources.
pub fn default_base_date() -> DateTime<Utc> {
    NaiveDate::from_ymd_opt(2024, 1, 1)
        .unwrap_or_default()
        .and_time(NaiveTime::MIN)
        .and_utc()
}

#[derive(Debug, Clone)]
pub struct Faker {
    rng: ChaCha8Rng,
    locale: LocaleKey,
    base_date: DateTime<Utc>,
}

impl Faker {
    /// Deterministic source for reproducible fixtures. Dates are drawn
    /// relative to [`default_base_date`].
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            locale: LocaleKey::default(),
            base_date: default_base_date(),
        }
    }

    /// Source seeded from the thread RNG, with dates relative to now.
    pub fn random() -> Self {
        Self::seeded(rand::random()).with_base_date(Utc::now())
    }

    pub fn with_locale(mut self, locale: LocaleKey) -> Self {
        self.locale = locale;
        self
    }

    pub fn with_base_date(mut self, base_date: DateTime<Utc>) -> Self {
        self.base_date = base_date;
        self
    }

    pub fn locale(&self) -> LocaleKey {
        self.locale
    }

    pub fn base_date(&self) -> DateTime<Utc> {
        self.base_date
    }

    /// Independent source derived from this one's stream.
    pub fn fork(&mut self) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(self.rng.next_u64()),
            locale: self.locale,
            base_date: self.base_date,
        }
    }

    pub fn rng(&mut self) -> &mut ChaCha8Rng {
        &mut self.rng
    }

    pub fn int(&mut self, min: i64, max: i64) -> i64 {
        if min >= max {
            return min;
        }
        self.rng.random_range(min..=max)
    }

    pub fn float(&mut self, min: f64, max: f64) -> f64 {
        if min >= max {
            return min;
        }
        self.rng.random_range(min..max)
    }

    pub fn boolean(&mut self) -> bool {
        self.rng.random_bool(0.5)
    }

    pub fn uuid(&mut self) -> Uuid {
        let bytes: [u8; 16] = self.rng.random();
        uuid::Builder::from_random_bytes(bytes).into_uuid()
    }

    /// Timestamp within the year before the base date.
    pub fn past_datetime(&mut self) -> DateTime<Utc> {
        let offset = self.rng.random_range(1..=PAST_WINDOW_SECS);
        self.base_date - Duration::seconds(offset)
    }

    pub fn word(&mut self) -> String {
        localized!(self, Word)
    }

    /// Lorem word whose length falls within `min..=max` characters.
    pub fn word_between(&mut self, min: usize, max: usize) -> String {
        for _ in 0..WORD_ATTEMPTS {
            let word = self.word();
            if (min..=max).contains(&word.chars().count()) {
                return word;
            }
        }
        let len = self.rng.random_range(min..=max.max(min));
        (0..len)
            .map(|_| LETTERS[self.rng.random_range(0..LETTERS.len())] as char)
            .collect()
    }

    /// Space separated lorem words, `min..=max` of them.
    pub fn words(&mut self, min: usize, max: usize) -> String {
        let upper = max.max(min) + 1;
        let words: Vec<String> = localized!(self, Words, min..upper);
        words.join(" ")
    }

    pub fn sentence(&mut self) -> String {
        localized!(self, Sentence, 3..8)
    }

    pub fn full_name(&mut self) -> String {
        localized!(self, Name)
    }

    pub fn first_name(&mut self) -> String {
        localized!(self, FirstName)
    }

    pub fn last_name(&mut self) -> String {
        localized!(self, LastName)
    }

    pub fn email(&mut self) -> String {
        localized!(self, SafeEmail)
    }

    pub fn url(&mut self) -> String {
        let host = self.word_between(3, 10).to_lowercase();
        let slug = self.uuid().simple().to_string();
        format!("https://{host}.example.com/{slug}")
    }

    /// Uniformly picks one of `items`.
    pub fn pick<T: Clone>(&mut self, items: &[T]) -> Option<T> {
        if items.is_empty() {
            return None;
        }
        let index = self.rng.random_range(0..items.len());
        items.get(index).cloned()
    }
}

impl Default for Faker {
    fn default() -> Self {
        Self::random()
    }
}
