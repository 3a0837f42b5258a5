//! Validation rules shared by create and update.

use reqwest::Url;
use rust_decimal::Decimal;

use crate::domain::games::{
    data::{GameUpdate, NewGame, NewImage},
    errors::GamesServiceError,
};

/// Longest accepted title or subtitle.
pub const MAX_TITLE_CHARS: usize = 40;

/// Highest accepted rating.
pub const MAX_RATING: i16 = 5;

/// Prices are stored as `NUMERIC(8, 2)`.
const PRICE_SCALE: u32 = 2;
const PRICE_LIMIT: i64 = 1_000_000;

/// Discounts are stored as `NUMERIC(4, 3)`.
const DISCOUNT_SCALE: u32 = 3;

const MAX_CAPTION_CHARS: usize = 32;
const MAX_CONTENT_TYPE_CHARS: usize = 16;

/// Collects rule violations for a single payload.
#[derive(Debug, Default)]
struct Violations(Vec<String>);

impl Violations {
    fn check(&mut self, ok: bool, message: impl FnOnce() -> String) {
        if !ok {
            self.0.push(message());
        }
    }

    fn finish(self) -> Result<(), GamesServiceError> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(GamesServiceError::Invalid(self.0))
        }
    }
}

/// Validate a game before it is created.
///
/// # Errors
///
/// Returns [`GamesServiceError::Invalid`] listing every broken rule.
pub fn validate_new_game(game: &NewGame) -> Result<(), GamesServiceError> {
    let mut violations = Violations::default();

    check_scalars(
        &mut violations,
        Scalars {
            ean: &game.ean,
            rating: game.rating,
            price: game.price,
            discount: game.discount,
            homepage: game.homepage.as_deref(),
            keywords: &game.keywords,
        },
    );

    let title = game.title.title.trim();

    violations.check(!title.is_empty(), || "title must not be blank".to_string());
    violations.check(title.chars().count() <= MAX_TITLE_CHARS, || {
        format!("title must be at most {MAX_TITLE_CHARS} characters")
    });

    if let Some(subtitle) = &game.title.subtitle {
        violations.check(subtitle.chars().count() <= MAX_TITLE_CHARS, || {
            format!("subtitle must be at most {MAX_TITLE_CHARS} characters")
        });
    }

    for image in &game.images {
        check_image(&mut violations, image);
    }

    violations.finish()
}

/// Validate the replacement fields of an update.
///
/// # Errors
///
/// Returns [`GamesServiceError::Invalid`] listing every broken rule.
pub fn validate_update(update: &GameUpdate) -> Result<(), GamesServiceError> {
    let mut violations = Violations::default();

    check_scalars(
        &mut violations,
        Scalars {
            ean: &update.ean,
            rating: update.rating,
            price: update.price,
            discount: update.discount,
            homepage: update.homepage.as_deref(),
            keywords: &update.keywords,
        },
    );

    violations.finish()
}

/// Whether `ean` is a 13 digit EAN with a correct check digit.
#[must_use]
pub fn is_valid_ean(ean: &str) -> bool {
    let digits: Vec<u32> = ean.chars().filter_map(|c| c.to_digit(10)).collect();

    if digits.len() != 13 || ean.len() != 13 {
        return false;
    }

    let Some((check, payload)) = digits.split_last() else {
        return false;
    };

    let sum: u32 = payload
        .iter()
        .enumerate()
        .map(|(position, digit)| if position % 2 == 0 { *digit } else { digit * 3 })
        .sum();

    (10 - sum % 10) % 10 == *check
}

struct Scalars<'a> {
    ean: &'a str,
    rating: i16,
    price: Decimal,
    discount: Decimal,
    homepage: Option<&'a str>,
    keywords: &'a [String],
}

fn check_scalars(violations: &mut Violations, scalars: Scalars<'_>) {
    violations.check(is_valid_ean(scalars.ean), || {
        format!("ean {:?} is not a valid EAN-13", scalars.ean)
    });

    violations.check((0..=MAX_RATING).contains(&scalars.rating), || {
        format!("rating must be between 0 and {MAX_RATING}")
    });

    violations.check(scalars.price >= Decimal::ZERO, || {
        "price must not be negative".to_string()
    });
    violations.check(scalars.price < Decimal::from(PRICE_LIMIT), || {
        format!("price must be below {PRICE_LIMIT}")
    });
    violations.check(scalars.price.normalize().scale() <= PRICE_SCALE, || {
        format!("price must have at most {PRICE_SCALE} decimal places")
    });

    violations.check(
        scalars.discount >= Decimal::ZERO && scalars.discount <= Decimal::ONE,
        || "discount must be between 0 and 1".to_string(),
    );
    violations.check(scalars.discount.normalize().scale() <= DISCOUNT_SCALE, || {
        format!("discount must have at most {DISCOUNT_SCALE} decimal places")
    });

    if let Some(homepage) = scalars.homepage {
        violations.check(is_web_url(homepage), || {
            format!("homepage {homepage:?} is not an http(s) URL")
        });
    }

    for keyword in scalars.keywords {
        violations.check(!keyword.trim().is_empty(), || {
            "keywords must not be blank".to_string()
        });
        violations.check(!keyword.contains(','), || {
            format!("keyword {keyword:?} must not contain a comma")
        });
    }
}

fn check_image(violations: &mut Violations, image: &NewImage) {
    violations.check(
        !image.caption.trim().is_empty() && image.caption.chars().count() <= MAX_CAPTION_CHARS,
        || format!("image caption must be 1 to {MAX_CAPTION_CHARS} characters"),
    );

    violations.check(
        image.content_type.chars().count() <= MAX_CONTENT_TYPE_CHARS,
        || format!("image content type must be at most {MAX_CONTENT_TYPE_CHARS} characters"),
    );
}

fn is_web_url(value: &str) -> bool {
    Url::parse(value).is_ok_and(|url| matches!(url.scheme(), "http" | "https"))
}
