//! Search criteria and paging.

use std::collections::BTreeMap;

use jiff::civil::Date;
use rust_decimal::Decimal;

use crate::domain::games::{errors::GamesServiceError, records::Category};

/// Page size used when none (or an unusable one) is requested.
pub const DEFAULT_PAGE_SIZE: u32 = 5;

/// Largest page size a caller may request.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Flat key/value map of search filters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchCriteria {
    entries: BTreeMap<String, String>,
}

impl SearchCriteria {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(key.into(), value.into());
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }
}

impl<K, V> FromIterator<(K, V)> for SearchCriteria
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        }
    }
}

/// Zero-based page descriptor. A `size` of zero means unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pageable {
    pub number: u32,
    pub size: u32,
}

impl Default for Pageable {
    fn default() -> Self {
        Self {
            number: 0,
            size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl Pageable {
    /// An unbounded descriptor that returns every match.
    #[must_use]
    pub const fn unbounded() -> Self {
        Self { number: 0, size: 0 }
    }

    /// Build a descriptor from external query values.
    ///
    /// `page` is one-based; anything missing, non-numeric or below one falls
    /// back to the first page. `size` falls back to [`DEFAULT_PAGE_SIZE`]
    /// when missing, non-numeric or larger than [`MAX_PAGE_SIZE`].
    #[must_use]
    pub fn from_query(page: Option<&str>, size: Option<&str>) -> Self {
        let number = page
            .and_then(|page| page.trim().parse::<i64>().ok())
            .filter(|page| *page >= 1)
            .and_then(|page| u32::try_from(page - 1).ok())
            .unwrap_or(0);

        let size = size
            .and_then(|size| size.trim().parse::<u32>().ok())
            .filter(|size| *size <= MAX_PAGE_SIZE)
            .unwrap_or(DEFAULT_PAGE_SIZE);

        Self { number, size }
    }

    #[must_use]
    pub const fn is_unbounded(&self) -> bool {
        self.size == 0
    }

    #[must_use]
    pub fn offset(&self) -> i64 {
        i64::from(self.number) * i64::from(self.size)
    }

    /// Number of pages needed to hold `total` elements.
    #[must_use]
    pub fn total_pages(&self, total: u64) -> u64 {
        if self.is_unbounded() {
            return u64::from(total > 0);
        }

        total.div_ceil(u64::from(self.size))
    }
}

/// Keyword flags matched against the keyword blob.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum KeywordFlag {
    Action,
    ActionRpg,
    Strategy,
    Puzzle,
}

impl KeywordFlag {
    /// Substring the blob must contain.
    pub(crate) const fn pattern(self) -> &'static str {
        match self {
            Self::Action => "%ACTION%",
            Self::ActionRpg => "%ACTIONRPG%",
            Self::Strategy => "%STRATEGY%",
            Self::Puzzle => "%PUZZLE%",
        }
    }

    /// Longer overlapping keyword whose occurrence disqualifies a match.
    pub(crate) const fn excluded_pattern(self) -> Option<&'static str> {
        match self {
            Self::Action => Some("%ACTIONRPG%"),
            Self::ActionRpg | Self::Strategy | Self::Puzzle => None,
        }
    }
}

/// Columns of `game` that accept an equality filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Column {
    Id,
    Version,
    Ean,
    Category,
    Discount,
    Available,
    ReleaseDate,
    Homepage,
}

impl Column {
    pub(crate) const fn name(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Version => "version",
            Self::Ean => "ean",
            Self::Category => "category",
            Self::Discount => "discount",
            Self::Available => "available",
            Self::ReleaseDate => "release_date",
            Self::Homepage => "homepage",
        }
    }
}

/// A typed value bound into an equality predicate.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Value {
    Int(i64),
    Text(String),
    Category(Category),
    Decimal(Decimal),
    Bool(bool),
    Date(Date),
}

/// A single recognised search predicate.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Predicate {
    TitleContains(String),
    MinRating(i16),
    MaxPrice(Decimal),
    Keyword(KeywordFlag),
    Equals(Column, Value),
}

impl Predicate {
    /// Translate every criteria entry into a predicate.
    ///
    /// Keyword flags only produce a predicate when their value is `true`.
    pub(crate) fn parse_all(criteria: &SearchCriteria) -> Result<Vec<Self>, GamesServiceError> {
        let mut predicates = Vec::new();
        let mut violations = Vec::new();

        for (key, value) in criteria.iter() {
            match Self::parse(key, value) {
                Ok(Some(predicate)) => predicates.push(predicate),
                Ok(None) => {}
                Err(ParseError::UnknownKey) => return Err(GamesServiceError::NotFound),
                Err(ParseError::BadValue) => {
                    violations.push(format!("invalid value {value:?} for \"{key}\""));
                }
            }
        }

        if !violations.is_empty() {
            return Err(GamesServiceError::Invalid(violations));
        }

        Ok(predicates)
    }

    fn parse(key: &str, value: &str) -> Result<Option<Self>, ParseError> {
        let predicate = match key {
            "title" => Self::TitleContains(value.to_owned()),
            "rating" => Self::MinRating(parse_value(value)?),
            "price" => Self::MaxPrice(parse_value(value)?),
            "action" => return Ok(keyword(value, KeywordFlag::Action)),
            "actionrpg" => return Ok(keyword(value, KeywordFlag::ActionRpg)),
            "strategy" => return Ok(keyword(value, KeywordFlag::Strategy)),
            "puzzle" => return Ok(keyword(value, KeywordFlag::Puzzle)),
            "id" => Self::Equals(Column::Id, Value::Int(parse_value(value)?)),
            "version" => Self::Equals(Column::Version, Value::Int(parse_value(value)?)),
            "ean" => Self::Equals(Column::Ean, Value::Text(value.to_owned())),
            "category" => Self::Equals(Column::Category, Value::Category(parse_value(value)?)),
            "discount" => Self::Equals(Column::Discount, Value::Decimal(parse_value(value)?)),
            "available" => Self::Equals(Column::Available, Value::Bool(parse_value(value)?)),
            "release_date" => Self::Equals(Column::ReleaseDate, Value::Date(parse_value(value)?)),
            "homepage" => Self::Equals(Column::Homepage, Value::Text(value.to_owned())),
            _ => return Err(ParseError::UnknownKey),
        };

        Ok(Some(predicate))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParseError {
    UnknownKey,
    BadValue,
}

fn parse_value<T: std::str::FromStr>(value: &str) -> Result<T, ParseError> {
    value.trim().parse().map_err(|_parse| ParseError::BadValue)
}

fn keyword(value: &str, flag: KeywordFlag) -> Option<Predicate> {
    (value == "true").then_some(Predicate::Keyword(flag))
}
