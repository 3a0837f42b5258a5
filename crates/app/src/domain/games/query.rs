//! Dynamic search queries.

use jiff_sqlx::Date as SqlxDate;
use sqlx::{Postgres, QueryBuilder};

use crate::domain::games::criteria::{Pageable, Predicate, Value};

const SELECT_GAMES_SQL: &str = include_str!("sql/select_games.sql");
const COUNT_GAMES_SQL: &str = include_str!("sql/count_games.sql");

/// Page of games matching `predicates`, ordered by id.
pub(crate) fn select_games(
    predicates: &[Predicate],
    pageable: Pageable,
) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::new(SELECT_GAMES_SQL.trim_end());

    push_predicates(&mut builder, predicates);

    builder.push(" ORDER BY g.id");

    if !pageable.is_unbounded() {
        builder
            .push(" LIMIT ")
            .push_bind(i64::from(pageable.size))
            .push(" OFFSET ")
            .push_bind(pageable.offset());
    }

    builder
}

/// Total number of games matching `predicates`.
pub(crate) fn count_games(predicates: &[Predicate]) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::new(COUNT_GAMES_SQL.trim_end());

    push_predicates(&mut builder, predicates);

    builder
}

fn push_predicates(builder: &mut QueryBuilder<'static, Postgres>, predicates: &[Predicate]) {
    for (index, predicate) in predicates.iter().enumerate() {
        builder.push(if index == 0 { " WHERE " } else { " AND " });

        match predicate {
            Predicate::TitleContains(title) => {
                builder
                    .push("t.title ILIKE '%' || ")
                    .push_bind(escape_like(title))
                    .push(" || '%' ESCAPE '\\'");
            }
            Predicate::MinRating(rating) => {
                builder.push("g.rating >= ").push_bind(*rating);
            }
            Predicate::MaxPrice(price) => {
                builder.push("g.price <= ").push_bind(*price);
            }
            Predicate::Keyword(flag) => {
                builder.push("g.keywords LIKE ").push_bind(flag.pattern());

                if let Some(excluded) = flag.excluded_pattern() {
                    builder.push(" AND g.keywords NOT LIKE ").push_bind(excluded);
                }
            }
            Predicate::Equals(column, value) => {
                builder.push("g.").push(column.name()).push(" = ");

                match value {
                    Value::Int(int) => builder.push_bind(*int),
                    Value::Text(text) => builder.push_bind(text.clone()),
                    Value::Category(category) => builder.push_bind(*category),
                    Value::Decimal(decimal) => builder.push_bind(*decimal),
                    Value::Bool(flag) => builder.push_bind(*flag),
                    Value::Date(date) => builder.push_bind(SqlxDate::from(*date)),
                };
            }
        }
    }
}

/// Escape `LIKE` wildcards so `value` only matches literally.
fn escape_like(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());

    for c in value.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }

    escaped
}
