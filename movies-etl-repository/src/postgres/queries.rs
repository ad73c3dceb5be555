//! SQL builders for the movie source.
//!
//! One wide query joins each movie to its category, genres and people,
//! aggregating related rows per movie. Only the change predicate differs
//! between entity kinds.

use movies_etl_shared::EntityKind;

/// Columns and aggregates shared by every entity kind.
///
/// Aggregates drop the NULLs produced by outer joins with no match, so a
/// movie without related rows gets `{}` rather than `{NULL}` or NULL.
const SELECT_MOVIES: &str = r#"
SELECT "movie_movie"."id",
       "movie_movie"."created"::timestamp AS "created",
       "movie_movie"."modified"::timestamp AS "modified",
       "movie_movie"."title",
       "movie_movie"."description",
       "movie_movie"."create_date",
       "movie_movie"."age_qualification"::int4 AS "age_qualification",
       "movie_movie"."rating"::float8 AS "rating",
       "movie_movie"."file",
       COALESCE(ARRAY_AGG(DISTINCT "movie_category"."title")
           FILTER (WHERE "movie_category"."title" IS NOT NULL), '{}') AS "categories",
       COALESCE(ARRAY_AGG(DISTINCT "movie_genre"."title")
           FILTER (WHERE "movie_genre"."title" IS NOT NULL), '{}') AS "genres",
       COALESCE(ARRAY_AGG(DISTINCT "movie_person"."full_name")
           FILTER (WHERE "movie_personmovie"."role" = 'actor'
                   AND "movie_person"."full_name" IS NOT NULL), '{}') AS "actors",
       COALESCE(ARRAY_AGG(DISTINCT "movie_person"."full_name")
           FILTER (WHERE "movie_personmovie"."role" = 'writer'
                   AND "movie_person"."full_name" IS NOT NULL), '{}') AS "writers",
       COALESCE(ARRAY_AGG(DISTINCT "movie_person"."full_name")
           FILTER (WHERE "movie_personmovie"."role" = 'director'
                   AND "movie_person"."full_name" IS NOT NULL), '{}') AS "directors""#;

/// Joins feeding the aggregates.
const FROM_MOVIES: &str = r#"
FROM "movie_movie"
LEFT OUTER JOIN "movie_category"
    ON ("movie_movie"."category_id" = "movie_category"."id")
LEFT OUTER JOIN "movie_movie_genres"
    ON ("movie_movie"."id" = "movie_movie_genres"."movie_id")
LEFT OUTER JOIN "movie_genre"
    ON ("movie_movie_genres"."genre_id" = "movie_genre"."id")
LEFT OUTER JOIN "movie_personmovie"
    ON ("movie_movie"."id" = "movie_personmovie"."movie_id")
LEFT OUTER JOIN "movie_person"
    ON ("movie_personmovie"."person_id" = "movie_person"."id")
"#;

/// The cutoff: `$1` when bound, otherwise the start of the store's current day.
const CUTOFF: &str = r#"COALESCE($1::timestamptz, CURRENT_DATE::timestamptz)"#;

/// Sub-select over the rows of a related table changed after the cutoff,
/// correlated with the outer movie. `None` for the movie table itself.
fn changed_related(kind: EntityKind, select: &str) -> Option<String> {
    let (link_table, link_column) = match kind {
        EntityKind::Movie => return None,
        EntityKind::Person => ("movie_personmovie", "person_id"),
        EntityKind::Genre => ("movie_movie_genres", "genre_id"),
    };
    let table = kind.table_name();

    Some(format!(
        r#"SELECT {select} FROM "{link_table}" AS "changed_link"
        JOIN "{table}" AS "changed" ON ("changed_link"."{link_column}" = "changed"."id")
        WHERE "changed_link"."movie_id" = "movie_movie"."id"
          AND "changed"."modified" > {CUTOFF}"#
    ))
}

/// Build the change predicate for `kind`.
///
/// Person and genre changes are matched through a sub-select so the joined
/// rows feeding the aggregates are not filtered; every actor of a movie is
/// listed even when only one of them changed.
fn change_predicate(kind: EntityKind) -> String {
    match changed_related(kind, "1") {
        Some(subquery) => format!("EXISTS (\n        {subquery})"),
        None => format!(r#""movie_movie"."modified" > {CUTOFF}"#),
    }
}

/// Build the `changed_at` column: the latest change of the driving table,
/// as `timestamptz`.
fn changed_at_column(kind: EntityKind) -> String {
    match changed_related(kind, r#"MAX("changed"."modified")"#) {
        Some(subquery) => format!("(\n        {subquery})::timestamptz"),
        None => r#""movie_movie"."modified"::timestamptz"#.to_string(),
    }
}

/// Build the query selecting movies changed through `kind`.
///
/// Parameters: `$1` cutoff (`timestamptz`, NULL for start of day), `$2`
/// keyset position (`uuid`, NULL for the first page), `$3` row limit.
pub fn changed_movies_query(kind: EntityKind) -> String {
    format!(
        r#"{SELECT_MOVIES},
       {changed_at} AS "changed_at"{FROM_MOVIES}WHERE {predicate}
  AND ($2::uuid IS NULL OR "movie_movie"."id" > $2::uuid)
GROUP BY "movie_movie"."id"
ORDER BY "movie_movie"."id"
LIMIT $3
"#,
        changed_at = changed_at_column(kind),
        predicate = change_predicate(kind)
    )
}
