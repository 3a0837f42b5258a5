//! GraphQL object and input types.

use std::str::FromStr;

use async_graphql::{Enum, ID, InputObject, Object, SimpleObject};
use jiff::civil::Date;
use rust_decimal::Decimal;

use spiel_app::{
    domain::games::{
        GamesServiceError,
        criteria::SearchCriteria,
        data::{GameUpdate, NewGame, NewImage, NewTitle},
        records::{Category, GameRecord},
    },
    identity::TokenSet,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Enum)]
#[graphql(name = "Category")]
pub(crate) enum CategoryType {
    Board,
    Card,
    Video,
}

impl From<Category> for CategoryType {
    fn from(category: Category) -> Self {
        match category {
            Category::Board => Self::Board,
            Category::Card => Self::Card,
            Category::Video => Self::Video,
        }
    }
}

impl From<CategoryType> for Category {
    fn from(category: CategoryType) -> Self {
        match category {
            CategoryType::Board => Self::Board,
            CategoryType::Card => Self::Card,
            CategoryType::Video => Self::Video,
        }
    }
}

/// A game in the catalog.
#[derive(Debug)]
pub(crate) struct Spiel(pub(crate) GameRecord);

#[Object]
impl Spiel {
    async fn id(&self) -> ID {
        ID(self.0.id.to_string())
    }

    /// Optimistic concurrency counter, passed back on update.
    async fn version(&self) -> i32 {
        self.0.version
    }

    async fn ean(&self) -> &str {
        &self.0.ean
    }

    async fn rating(&self) -> i16 {
        self.0.rating
    }

    async fn category(&self) -> CategoryType {
        self.0.category.into()
    }

    async fn price(&self) -> Decimal {
        self.0.price
    }

    async fn discount(&self) -> Decimal {
        self.0.discount
    }

    async fn available(&self) -> bool {
        self.0.available
    }

    /// ISO-8601 date
    async fn release_date(&self) -> Option<String> {
        self.0.release_date.map(|date| date.to_string())
    }

    async fn homepage(&self) -> Option<&str> {
        self.0.homepage.as_deref()
    }

    async fn keywords(&self) -> Vec<String> {
        self.0.keywords.to_vec()
    }

    async fn title(&self) -> Title {
        Title {
            title: self.0.title.title.clone(),
            subtitle: self.0.title.subtitle.clone(),
        }
    }

    async fn images(&self) -> Vec<Image> {
        self.0
            .images
            .iter()
            .map(|image| Image {
                id: ID(image.id.to_string()),
                caption: image.caption.clone(),
                content_type: image.content_type.clone(),
            })
            .collect()
    }
}

#[derive(Debug, SimpleObject)]
pub(crate) struct Title {
    title: String,
    subtitle: Option<String>,
}

#[derive(Debug, SimpleObject)]
pub(crate) struct Image {
    id: ID,
    caption: String,
    content_type: String,
}

#[derive(Debug, SimpleObject)]
pub(crate) struct CreatePayload {
    pub(crate) id: ID,
}

#[derive(Debug, SimpleObject)]
pub(crate) struct UpdatePayload {
    pub(crate) version: i32,
}

#[derive(SimpleObject)]
pub(crate) struct TokenPayload {
    access_token: String,
    expires_in: u64,
    refresh_token: String,
    refresh_expires_in: u64,
}

impl std::fmt::Debug for TokenPayload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenPayload")
            .field("expires_in", &self.expires_in)
            .finish_non_exhaustive()
    }
}

impl From<TokenSet> for TokenPayload {
    fn from(tokens: TokenSet) -> Self {
        Self {
            access_token: tokens.access_token,
            expires_in: tokens.expires_in,
            refresh_token: tokens.refresh_token,
            refresh_expires_in: tokens.refresh_expires_in,
        }
    }
}

#[derive(Debug, InputObject)]
pub(crate) struct TitleInput {
    title: String,
    subtitle: Option<String>,
}

#[derive(Debug, InputObject)]
pub(crate) struct ImageInput {
    caption: String,
    content_type: String,
}

#[derive(Debug, InputObject)]
pub(crate) struct SpielInput {
    ean: String,
    rating: i32,
    category: CategoryType,
    price: Decimal,
    discount: Decimal,
    available: bool,
    release_date: Option<String>,
    homepage: Option<String>,
    #[graphql(default)]
    keywords: Vec<String>,
    title: TitleInput,
    #[graphql(default)]
    images: Vec<ImageInput>,
}

#[derive(Debug, InputObject)]
pub(crate) struct SpielUpdateInput {
    pub(crate) id: ID,
    /// Version the change is based on.
    pub(crate) version: i32,
    ean: String,
    rating: i32,
    category: CategoryType,
    price: Decimal,
    discount: Decimal,
    available: bool,
    release_date: Option<String>,
    homepage: Option<String>,
    #[graphql(default)]
    keywords: Vec<String>,
}

/// Filters for `spiele`. Keyword flags only apply when `true`.
#[derive(Debug, Default, InputObject)]
pub(crate) struct SuchkriterienInput {
    title: Option<String>,
    ean: Option<String>,
    rating: Option<i32>,
    category: Option<CategoryType>,
    price: Option<Decimal>,
    available: Option<bool>,
    action: Option<bool>,
    actionrpg: Option<bool>,
    strategy: Option<bool>,
    puzzle: Option<bool>,
}

impl From<SuchkriterienInput> for SearchCriteria {
    fn from(input: SuchkriterienInput) -> Self {
        let mut criteria = SearchCriteria::new();

        if let Some(title) = input.title {
            criteria.insert("title", title);
        }
        if let Some(ean) = input.ean {
            criteria.insert("ean", ean);
        }
        if let Some(rating) = input.rating {
            criteria.insert("rating", rating.to_string());
        }
        if let Some(category) = input.category {
            criteria.insert("category", Category::from(category).as_str());
        }
        if let Some(price) = input.price {
            criteria.insert("price", price.to_string());
        }
        if let Some(available) = input.available {
            criteria.insert("available", available.to_string());
        }

        for (key, flag) in [
            ("action", input.action),
            ("actionrpg", input.actionrpg),
            ("strategy", input.strategy),
            ("puzzle", input.puzzle),
        ] {
            if flag == Some(true) {
                criteria.insert(key, "true");
            }
        }

        criteria
    }
}

/// Rating and release date need narrowing before the domain sees them.
fn narrow(
    rating: i32,
    release_date: Option<&str>,
) -> Result<(i16, Option<Date>), GamesServiceError> {
    let mut errors = Vec::new();

    let rating = i16::try_from(rating)
        .map_err(|_overflow| errors.push(format!("rating {rating} is out of range")))
        .ok();

    let release_date = match release_date.map(Date::from_str).transpose() {
        Ok(date) => date,
        Err(error) => {
            errors.push(format!("release_date: {error}"));
            None
        }
    };

    match rating {
        Some(rating) if errors.is_empty() => Ok((rating, release_date)),
        _ => Err(GamesServiceError::Invalid(errors)),
    }
}

impl TryFrom<SpielInput> for NewGame {
    type Error = GamesServiceError;

    fn try_from(input: SpielInput) -> Result<Self, Self::Error> {
        let (rating, release_date) = narrow(input.rating, input.release_date.as_deref())?;

        Ok(NewGame {
            ean: input.ean,
            rating,
            category: input.category.into(),
            price: input.price,
            discount: input.discount,
            available: input.available,
            release_date,
            homepage: input.homepage,
            keywords: input.keywords.into_iter().collect(),
            title: NewTitle {
                title: input.title.title,
                subtitle: input.title.subtitle,
            },
            images: input
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

impl TryFrom<SpielUpdateInput> for GameUpdate {
    type Error = GamesServiceError;

    fn try_from(input: SpielUpdateInput) -> Result<Self, Self::Error> {
        let (rating, release_date) = narrow(input.rating, input.release_date.as_deref())?;

        Ok(GameUpdate {
            ean: input.ean,
            rating,
            category: input.category.into(),
            price: input.price,
            discount: input.discount,
            available: input.available,
            release_date,
            homepage: input.homepage,
            keywords: input.keywords.into_iter().collect(),
        })
    }
}
