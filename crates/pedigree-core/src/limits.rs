//! Field limits for horse and owner records

use chrono::{Months, NaiveDate};

/// Maximum length for horse names (255 chars)
pub const MAX_HORSE_NAME_LEN: usize = 255;

/// Maximum length for horse descriptions (4095 chars)
pub const MAX_DESCRIPTION_LEN: usize = 4095;

/// Maximum age of a horse in years, relative to validation time
pub const MAX_HORSE_AGE_YEARS: u32 = 100;

/// Maximum length for owner first and last names (100 chars)
pub const MAX_OWNER_NAME_LEN: usize = 100;

/// Maximum length for owner emails (255 chars)
pub const MAX_EMAIL_LEN: usize = 255;

/// Default number of generations for family tree queries
pub const DEFAULT_GENERATIONS: u32 = 3;

/// Default result limit for parent suggestions
pub const DEFAULT_SUGGESTION_LIMIT: usize = 5;

/// Earliest acceptable date of birth when validating on `today`
pub fn earliest_birth_date(today: NaiveDate) -> NaiveDate {
    today
        .checked_sub_months(Months::new(MAX_HORSE_AGE_YEARS * 12))
        .unwrap_or(NaiveDate::MIN)
}
