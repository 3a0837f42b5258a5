//! Game Records

use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    str::FromStr,
};

use jiff::{Timestamp, civil::Date};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::ids::TypedId;

/// Game Id
pub type GameId = TypedId<GameRecord>;

/// Image Id
pub type ImageId = TypedId<ImageRecord>;

/// Game File Id
pub type GameFileId = TypedId<GameFileRecord>;

/// Kind of game, mirrored by the `category` enum type in Postgres.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "UPPERCASE")]
#[sqlx(type_name = "category", rename_all = "UPPERCASE")]
pub enum Category {
    Board,
    Card,
    Video,
}

impl Category {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Board => "BOARD",
            Self::Card => "CARD",
            Self::Video => "VIDEO",
        }
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

/// Error returned when a category name is not one of the known variants.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown category \"{0}\"")]
pub struct UnknownCategory(pub String);

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_uppercase().as_str() {
            "BOARD" => Ok(Self::Board),
            "CARD" => Ok(Self::Card),
            "VIDEO" => Ok(Self::Video),
            _ => Err(UnknownCategory(value.to_owned())),
        }
    }
}

/// Game Record
#[derive(Debug, Clone)]
pub struct GameRecord {
    pub id: GameId,
    pub version: i32,
    pub ean: String,
    pub rating: i16,
    pub category: Category,
    pub price: Decimal,
    pub discount: Decimal,
    pub available: bool,
    pub release_date: Option<Date>,
    pub homepage: Option<String>,
    pub keywords: SmallVec<[String; 4]>,
    pub title: TitleRecord,
    pub images: Vec<ImageRecord>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl GameRecord {
    /// The quoted version used as an entity tag.
    #[must_use]
    pub fn etag(&self) -> String {
        format!("\"{}\"", self.version)
    }
}

/// Title Record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TitleRecord {
    pub title: String,
    pub subtitle: Option<String>,
}

/// Image Record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRecord {
    pub id: ImageId,
    pub caption: String,
    pub content_type: String,
}

/// Game File Record
#[derive(Clone)]
pub struct GameFileRecord {
    pub id: GameFileId,
    pub game_id: GameId,
    pub filename: String,
    pub mimetype: Option<String>,
    pub data: Vec<u8>,
}

impl std::fmt::Debug for GameFileRecord {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("GameFileRecord")
            .field("id", &self.id)
            .field("game_id", &self.game_id)
            .field("filename", &self.filename)
            .field("mimetype", &self.mimetype)
            .field("size", &self.data.len())
            .finish()
    }
}

/// One page of search results.
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub content: Vec<T>,
    pub number: u32,
    pub size: u32,
    pub total_elements: u64,
    pub total_pages: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_parses_case_insensitively() {
        assert_eq!("board".parse::<Category>(), Ok(Category::Board));
        assert_eq!("VIDEO".parse::<Category>(), Ok(Category::Video));
    }

    #[test]
    fn category_rejects_unknown_names() {
        assert_eq!(
            "dice".parse::<Category>(),
            Err(UnknownCategory("dice".to_string()))
        );
    }
}
