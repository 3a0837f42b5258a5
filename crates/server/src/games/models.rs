//! Game request and response bodies.

use std::{fmt::Display, str::FromStr};

use jiff::civil::Date;
use rust_decimal::Decimal;
use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};

use spiel_app::domain::games::{
    GamesServiceError,
    criteria::Pageable,
    data::{GameUpdate, NewGame, NewImage, NewTitle},
    records::{Category, GameRecord, ImageRecord, Page, TitleRecord},
};

/// Game Title
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub(crate) struct TitleDto {
    /// Display name, 1 to 40 characters
    pub title: String,

    /// Optional subtitle
    #[serde(default)]
    pub subtitle: Option<String>,
}

impl From<TitleRecord> for TitleDto {
    fn from(title: TitleRecord) -> Self {
        Self {
            title: title.title,
            subtitle: title.subtitle,
        }
    }
}

/// New Image
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub(crate) struct ImageRequest {
    pub caption: String,
    pub content_type: String,
}

/// Image
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub(crate) struct ImageResponse {
    pub id: i64,
    pub caption: String,
    pub content_type: String,
}

impl From<ImageRecord> for ImageResponse {
    fn from(image: ImageRecord) -> Self {
        Self {
            id: image.id.into_i64(),
            caption: image.caption,
            content_type: image.content_type,
        }
    }
}

/// Create Game Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct GameRequest {
    /// EAN-13 barcode
    pub ean: String,

    /// Rating from 0 to 5
    pub rating: i16,

    /// One of `BOARD`, `CARD` or `VIDEO`
    pub category: String,

    /// Decimal price, e.g. `"34.99"`
    pub price: String,

    /// Discount fraction between 0 and 1, e.g. `"0.100"`
    pub discount: String,

    pub available: bool,

    /// ISO-8601 date
    #[serde(default)]
    pub release_date: Option<String>,

    #[serde(default)]
    pub homepage: Option<String>,

    #[serde(default)]
    pub keywords: Vec<String>,

    pub title: TitleDto,

    #[serde(default)]
    pub images: Vec<ImageRequest>,
}

/// Update Game Request
///
/// Replaces every scalar field. Title and images are left untouched.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct GameUpdateRequest {
    pub ean: String,
    pub rating: i16,
    pub category: String,
    pub price: String,
    pub discount: String,
    pub available: bool,

    #[serde(default)]
    pub release_date: Option<String>,

    #[serde(default)]
    pub homepage: Option<String>,

    #[serde(default)]
    pub keywords: Vec<String>,
}

/// Fields that arrive as text and need parsing before validation.
struct ParsedScalars {
    category: Category,
    price: Decimal,
    discount: Decimal,
    release_date: Option<Date>,
}

fn parse_field<T>(name: &str, value: &str, errors: &mut Vec<String>) -> Option<T>
where
    T: FromStr,
    T::Err: Display,
{
    value
        .trim()
        .parse()
        .map_err(|error| errors.push(format!("{name}: {error}")))
        .ok()
}

fn parse_scalars(
    category: &str,
    price: &str,
    discount: &str,
    release_date: Option<&str>,
) -> Result<ParsedScalars, GamesServiceError> {
    let mut errors = Vec::new();

    let category = parse_field::<Category>("category", category, &mut errors);
    let price = parse_field::<Decimal>("price", price, &mut errors);
    let discount = parse_field::<Decimal>("discount", discount, &mut errors);
    let release_date =
        release_date.map(|date| parse_field::<Date>("release_date", date, &mut errors));

    match (category, price, discount, release_date) {
        (Some(category), Some(price), Some(discount), release_date) if errors.is_empty() => {
            Ok(ParsedScalars {
                category,
                price,
                discount,
                release_date: release_date.flatten(),
            })
        }
        _ => Err(GamesServiceError::Invalid(errors)),
    }
}

impl TryFrom<GameRequest> for NewGame {
    type Error = GamesServiceError;

    fn try_from(request: GameRequest) -> Result<Self, Self::Error> {
        let parsed = parse_scalars(
            &request.category,
            &request.price,
            &request.discount,
            request.release_date.as_deref(),
        )?;

        Ok(NewGame {
            ean: request.ean,
            rating: request.rating,
            category: parsed.category,
            price: parsed.price,
            discount: parsed.discount,
            available: request.available,
            release_date: parsed.release_date,
            homepage: request.homepage,
            keywords: request.keywords.into_iter().collect(),
            title: NewTitle {
                title: request.title.title,
                subtitle: request.title.subtitle,
            },
            images: request
                .images
                .into_iter()
                .map(|image| NewImage {
                    caption: image.caption,
                    content_type: image.content_type,
                })
                .collect(),
        })
    }
}

impl TryFrom<GameUpdateRequest> for GameUpdate {
    type Error = GamesServiceError;

    fn try_from(request: GameUpdateRequest) -> Result<Self, Self::Error> {
        let parsed = parse_scalars(
            &request.category,
            &request.price,
            &request.discount,
            request.release_date.as_deref(),
        )?;

        Ok(GameUpdate {
            ean: request.ean,
            rating: request.rating,
            category: parsed.category,
            price: parsed.price,
            discount: parsed.discount,
            available: request.available,
            release_date: parsed.release_date,
            homepage: request.homepage,
            keywords: request.keywords.into_iter().collect(),
        })
    }
}

/// Game
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct GameResponse {
    pub id: i64,
    pub version: i32,
    pub ean: String,
    pub rating: i16,
    pub category: String,
    pub price: String,
    pub discount: String,
    pub available: bool,
    pub release_date: Option<String>,
    pub homepage: Option<String>,
    pub keywords: Vec<String>,
    pub title: TitleDto,
    pub images: Vec<ImageResponse>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<GameRecord> for GameResponse {
    fn from(game: GameRecord) -> Self {
        Self {
            id: game.id.into_i64(),
            version: game.version,
            ean: game.ean,
            rating: game.rating,
            category: game.category.to_string(),
            price: game.price.to_string(),
            discount: game.discount.to_string(),
            available: game.available,
            release_date: game.release_date.map(|date| date.to_string()),
            homepage: game.homepage,
            keywords: game.keywords.into_vec(),
            title: game.title.into(),
            images: game.images.into_iter().map(Into::into).collect(),
            created_at: game.created_at.to_string(),
            updated_at: game.updated_at.to_string(),
        }
    }
}

/// Game Created Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct GameCreatedResponse {
    /// Identifier of the new game
    pub id: i64,
}

/// Page position of a search result
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct PageMetadata {
    pub size: u32,
    pub number: u32,
    pub total_elements: u64,
    pub total_pages: u64,
}

/// Search Result Page
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct PageResponse {
    pub content: Vec<GameResponse>,
    pub page: PageMetadata,
}

impl From<Page<GameRecord>> for PageResponse {
    fn from(page: Page<GameRecord>) -> Self {
        Self {
            content: page.content.into_iter().map(Into::into).collect(),
            page: PageMetadata {
                size: page.size,
                number: page.number,
                total_elements: page.total_elements,
                total_pages: page.total_pages,
            },
        }
    }
}

/// Split `page` and `size` from the remaining query parameters.
pub(crate) fn pageable_from_query<'a, I>(params: I) -> (Pageable, Vec<(&'a str, &'a str)>)
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let mut page = None;
    let mut size = None;
    let mut rest = Vec::new();

    for (key, value) in params {
        match key {
            "page" => page = Some(value),
            "size" => size = Some(value),
            _ => rest.push((key, value)),
        }
    }

    (Pageable::from_query(page, size), rest)
}
