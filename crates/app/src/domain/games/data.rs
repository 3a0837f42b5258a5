//! Games Data

use jiff::civil::Date;
use rust_decimal::Decimal;
use smallvec::SmallVec;

use crate::domain::games::records::Category;

/// New Game Data
#[derive(Debug, Clone, PartialEq)]
pub struct NewGame {
    pub ean: String,
    pub rating: i16,
    pub category: Category,
    pub price: Decimal,
    pub discount: Decimal,
    pub available: bool,
    pub release_date: Option<Date>,
    pub homepage: Option<String>,
    pub keywords: SmallVec<[String; 4]>,
    pub title: NewTitle,
    pub images: Vec<NewImage>,
}

/// New Title Data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTitle {
    pub title: String,
    pub subtitle: Option<String>,
}

/// New Image Data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewImage {
    pub caption: String,
    pub content_type: String,
}

/// Game Update Data
///
/// Replaces every scalar field of the stored game. Title and images are not
/// touched by updates.
#[derive(Debug, Clone, PartialEq)]
pub struct GameUpdate {
    pub ean: String,
    pub rating: i16,
    pub category: Category,
    pub price: Decimal,
    pub discount: Decimal,
    pub available: bool,
    pub release_date: Option<Date>,
    pub homepage: Option<String>,
    pub keywords: SmallVec<[String; 4]>,
}

/// Uploaded file for a game.
#[derive(Clone, PartialEq, Eq)]
pub struct NewGameFile {
    pub filename: String,
    pub mimetype: Option<String>,
    pub data: Vec<u8>,
}

impl std::fmt::Debug for NewGameFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewGameFile")
            .field("filename", &self.filename)
            .field("mimetype", &self.mimetype)
            .field("size", &self.data.len())
            .finish()
    }
}
