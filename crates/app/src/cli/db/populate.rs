use std::sync::Arc;

use clap::Args;
use jiff::civil::date;
use rust_decimal::Decimal;
use smallvec::SmallVec;
use spiel_app::{
    database::{self, Db},
    domain::games::{
        GamesService, GamesServiceError, PgGamesService,
        data::{NewGame, NewImage, NewTitle},
        records::Category,
    },
    mail::DisabledMailer,
};
use sqlx::query;

const TRUNCATE_SQL: &str = "TRUNCATE game_file, image, title, game RESTART IDENTITY";

#[derive(Debug, Args)]
pub(crate) struct PopulateArgs {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,

    /// Remove every game before loading the samples
    #[arg(long)]
    reset: bool,
}

pub(crate) async fn run(args: PopulateArgs) -> Result<(), String> {
    let pool = database::connect(&args.database_url)
        .await
        .map_err(|error| format!("failed to connect to database: {error}"))?;

    database::migrate(&pool)
        .await
        .map_err(|error| format!("failed to apply migrations: {error}"))?;

    if args.reset {
        query(TRUNCATE_SQL)
            .execute(&pool)
            .await
            .map_err(|error| format!("failed to reset catalog: {error}"))?;
    }

    let service = PgGamesService::new(Db::new(pool), Arc::new(DisabledMailer));

    for game in samples() {
        let ean = game.ean.clone();

        match service.create(game).await {
            Ok(id) => println!("created game {id} ({ean})"),
            Err(GamesServiceError::EanExists(_)) => println!("skipped {ean}, already present"),
            Err(error) => return Err(format!("failed to create {ean}: {error}")),
        }
    }

    Ok(())
}

fn keywords(names: &[&str]) -> SmallVec<[String; 4]> {
    names.iter().map(|name| (*name).to_string()).collect()
}

fn title(title: &str, subtitle: Option<&str>) -> NewTitle {
    NewTitle {
        title: title.to_string(),
        subtitle: subtitle.map(str::to_string),
    }
}

fn samples() -> Vec<NewGame> {
    vec![
        NewGame {
            ean: "4002051693602".to_string(),
            rating: 5,
            category: Category::Board,
            price: Decimal::new(3_499, 2),
            discount: Decimal::new(100, 3),
            available: true,
            release_date: Some(date(1995, 10, 1)),
            homepage: Some("https://www.catan.de".to_string()),
            keywords: keywords(&["strategy", "family"]),
            title: title("Catan", Some("Das Spiel")),
            images: vec![NewImage {
                caption: "Box".to_string(),
                content_type: "image/png".to_string(),
            }],
        },
        NewGame {
            ean: "4010168256108".to_string(),
            rating: 4,
            category: Category::Card,
            price: Decimal::new(1_299, 2),
            discount: Decimal::ZERO,
            available: true,
            release_date: Some(date(2015, 3, 1)),
            homepage: None,
            keywords: keywords(&["puzzle"]),
            title: title("Hanabi", None),
            images: Vec::new(),
        },
        NewGame {
            ean: "5030917285639".to_string(),
            rating: 5,
            category: Category::Video,
            price: Decimal::new(5_999, 2),
            discount: Decimal::new(250, 3),
            available: false,
            release_date: Some(date(2022, 2, 25)),
            homepage: Some("https://en.bandainamcoent.eu/elden-ring".to_string()),
            keywords: keywords(&["actionrpg"]),
            title: title("Elden Ring", None),
            images: Vec::new(),
        },
        NewGame {
            ean: "5030917112720".to_string(),
            rating: 4,
            category: Category::Video,
            price: Decimal::new(1_999, 2),
            discount: Decimal::ZERO,
            available: true,
            release_date: Some(date(2016, 5, 13)),
            homepage: None,
            keywords: keywords(&["action"]),
            title: title("Doom", None),
            images: Vec::new(),
        },
        NewGame {
            ean: "4005556267842".to_string(),
            rating: 3,
            category: Category::Board,
            price: Decimal::new(2_499, 2),
            discount: Decimal::new(50, 3),
            available: true,
            release_date: None,
            homepage: None,
            keywords: keywords(&["strategy"]),
            title: title("Carcassonne", Some("Grundspiel")),
            images: Vec::new(),
        },
    ]
}
