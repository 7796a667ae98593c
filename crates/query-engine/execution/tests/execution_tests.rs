mod common;

use serde_json::json;
use similar_asserts::assert_eq;

use tests_common::fixtures;

mod basic {
    use super::*;
    use super::assert_eq;

    #[tokio::test]
    async fn select_ordered_page() {
        let database = fixtures::chinook().await.unwrap();
        let result = common::run_query(
            &database,
            json!({
                "table": "Artist",
                "table_relationships": [],
                "query": {
                    "fields": { "name": { "type": "column", "column": "Name" } },
                    "order_by": [{ "column": "Name", "direction": "desc" }],
                    "limit": 2,
                    "offset": 1
                }
            }),
        )
        .await
        .unwrap();
        assert_eq!(result, json!([{ "name": "Aerosmith" }, { "name": "Accept" }]));
    }

    #[tokio::test]
    async fn select_in_with_offset_only() {
        let database = fixtures::chinook().await.unwrap();
        let result = common::run_query(
            &database,
            json!({
                "table": "Artist",
                "table_relationships": [],
                "query": {
                    "fields": { "id": { "type": "column", "column": "ArtistId" } },
                    "where": {
                        "type": "binary_arr_op",
                        "operator": "in",
                        "column": { "path": [], "name": "ArtistId" },
                        "values": [1, 3, 4]
                    },
                    "order_by": [{ "column": "ArtistId", "ordering": "asc" }],
                    "offset": 1
                }
            }),
        )
        .await
        .unwrap();
        assert_eq!(result, json!([{ "id": 3 }, { "id": 4 }]));
    }

    #[tokio::test]
    async fn empty_in_matches_nothing() {
        let database = fixtures::chinook().await.unwrap();
        let result = common::run_query(
            &database,
            json!({
                "table": "Artist",
                "table_relationships": [],
                "query": {
                    "fields": { "id": { "type": "column", "column": "ArtistId" } },
                    "where": {
                        "type": "binary_arr_op",
                        "operator": "in",
                        "column": { "path": [], "name": "ArtistId" },
                        "values": []
                    }
                }
            }),
        )
        .await
        .unwrap();
        assert_eq!(result, json!([]));
    }

    #[tokio::test]
    async fn booleans_compare_against_stored_integers() {
        let database = fixtures::chinook().await.unwrap();
        let result = common::run_query(
            &database,
            json!({
                "table": "Quirks",
                "table_relationships": [],
                "query": {
                    "fields": { "id": { "type": "column", "column": "Id" } },
                    "where": {
                        "type": "binary_op",
                        "operator": "equal",
                        "column": { "path": [], "name": "Flag" },
                        "value": { "type": "scalar", "value": true }
                    }
                }
            }),
        )
        .await
        .unwrap();
        assert_eq!(result, json!([{ "id": 1 }]));
    }
}

mod escaping {
    use super::*;
    use super::assert_eq;

    #[tokio::test]
    async fn quoted_identifiers_and_values() {
        let database = fixtures::chinook().await.unwrap();
        let result = common::run_query(
            &database,
            json!({
                "table": "Quirks",
                "table_relationships": [],
                "query": {
                    "fields": { "it's": { "type": "column", "column": "Alb\"um" } },
                    "where": {
                        "type": "binary_op",
                        "operator": "equal",
                        "column": { "path": [], "name": "Alb\"um" },
                        "value": { "type": "scalar", "value": "it's" }
                    }
                }
            }),
        )
        .await
        .unwrap();
        assert_eq!(result, json!([{ "it's": "it's" }]));
    }

    #[tokio::test]
    async fn a_quote_in_a_value_is_data() {
        let database = fixtures::chinook().await.unwrap();
        let result = common::run_query(
            &database,
            json!({
                "table": "Artist",
                "table_relationships": [],
                "query": {
                    "fields": { "id": { "type": "column", "column": "ArtistId" } },
                    "where": {
                        "type": "binary_op",
                        "operator": "equal",
                        "column": { "path": [], "name": "Name" },
                        "value": { "type": "scalar", "value": "O'Brien" }
                    }
                }
            }),
        )
        .await
        .unwrap();
        assert_eq!(result, json!([{ "id": 4 }]));
    }
}

mod relationships {
    use super::*;
    use super::assert_eq;

    #[tokio::test]
    async fn array_relationship_without_rows_is_empty() {
        let database = fixtures::chinook().await.unwrap();
        let result = common::run_query(
            &database,
            json!({
                "table": "Artist",
                "table_relationships": common::chinook_relationships(),
                "query": {
                    "fields": {
                        "name": { "type": "column", "column": "Name" },
                        "albums": {
                            "type": "relationship",
                            "relationship": "Albums",
                            "query": {
                                "fields": { "title": { "type": "column", "column": "Title" } }
                            }
                        }
                    },
                    "where": {
                        "type": "binary_op",
                        "operator": "equal",
                        "column": { "path": [], "name": "ArtistId" },
                        "value": { "type": "scalar", "value": 4 }
                    }
                }
            }),
        )
        .await
        .unwrap();
        assert_eq!(result, json!([{ "name": "O'Brien", "albums": [] }]));
    }

    #[tokio::test]
    async fn object_relationship_is_null_without_a_match() {
        let database = fixtures::chinook().await.unwrap();
        let result = common::run_query(
            &database,
            json!({
                "table": "Track",
                "table_relationships": common::chinook_relationships(),
                "query": {
                    "fields": {
                        "name": { "type": "column", "column": "Name" },
                        "album": {
                            "type": "relationship",
                            "relationship": "Album",
                            "query": {
                                "fields": { "title": { "type": "column", "column": "Title" } }
                            }
                        }
                    },
                    "where": {
                        "type": "binary_arr_op",
                        "operator": "in",
                        "column": { "path": [], "name": "TrackId" },
                        "values": [6, 7]
                    },
                    "order_by": [{ "column": "TrackId", "direction": "asc" }]
                }
            }),
        )
        .await
        .unwrap();
        assert_eq!(
            result,
            json!([
                { "name": "Walk On Water", "album": { "rows": [{ "title": "Big Ones" }] } },
                { "name": "Hidden Track", "album": null }
            ])
        );
    }

    #[tokio::test]
    async fn nested_array_relationship_with_aggregates() {
        let database = fixtures::chinook().await.unwrap();
        let result = common::run_query(
            &database,
            json!({
                "table": "Artist",
                "table_relationships": common::chinook_relationships(),
                "query": {
                    "fields": {
                        "name": { "type": "column", "column": "Name" },
                        "albums": {
                            "type": "relationship",
                            "relationship": "Albums",
                            "query": {
                                "aggregates": { "count": { "type": "star_count" } },
                                "fields": { "title": { "type": "column", "column": "Title" } },
                                "order_by": [{ "column": "Title", "direction": "asc" }]
                            }
                        }
                    },
                    "where": {
                        "type": "binary_op",
                        "operator": "equal",
                        "column": { "path": [], "name": "ArtistId" },
                        "value": { "type": "scalar", "value": 2 }
                    }
                }
            }),
        )
        .await
        .unwrap();
        assert_eq!(
            result,
            json!([{
                "name": "Accept",
                "albums": {
                    "aggregates": { "count": 2 },
                    "rows": [{ "title": "Balls to the Wall" }, { "title": "Restless and Wild" }]
                }
            }])
        );
    }
}

mod filtering {
    use super::*;
    use super::assert_eq;

    fn albums_where(predicate: serde_json::Value) -> serde_json::Value {
        json!({
            "table": "Album",
            "table_relationships": common::chinook_relationships(),
            "query": {
                "fields": { "title": { "type": "column", "column": "Title" } },
                "where": predicate,
                "order_by": [{ "column": "AlbumId", "direction": "asc" }]
            }
        })
    }

    #[tokio::test]
    async fn path_filter_selects_the_same_rows_as_a_join() {
        let database = fixtures::chinook().await.unwrap();
        let through_path = common::run_query(
            &database,
            albums_where(json!({
                "type": "binary_op",
                "operator": "equal",
                "column": { "path": ["Artist"], "name": "Name" },
                "value": { "type": "scalar", "value": "AC/DC" }
            })),
        )
        .await
        .unwrap();
        let by_key = common::run_query(
            &database,
            albums_where(json!({
                "type": "binary_op",
                "operator": "equal",
                "column": { "path": [], "name": "ArtistId" },
                "value": { "type": "scalar", "value": 1 }
            })),
        )
        .await
        .unwrap();

        assert_eq!(
            through_path,
            json!([
                { "title": "For Those About To Rock We Salute You" },
                { "title": "Let There Be Rock" }
            ])
        );
        assert_eq!(through_path, by_key);
    }

    #[tokio::test]
    async fn compare_against_a_related_column() {
        let database = fixtures::chinook().await.unwrap();
        let result = common::run_query(
            &database,
            json!({
                "table": "Track",
                "table_relationships": common::chinook_relationships(),
                "query": {
                    "fields": { "name": { "type": "column", "column": "Name" } },
                    "where": {
                        "type": "binary_op",
                        "operator": "equal",
                        "column": { "path": [], "name": "Name" },
                        "value": {
                            "type": "column",
                            "column": { "path": ["Album"], "name": "Title" }
                        }
                    },
                    "order_by": [{ "column": "TrackId", "direction": "asc" }]
                }
            }),
        )
        .await
        .unwrap();
        assert_eq!(
            result,
            json!([{ "name": "Balls to the Wall" }, { "name": "Restless and Wild" }])
        );
    }

    #[tokio::test]
    async fn not_and_or_combine() {
        let database = fixtures::chinook().await.unwrap();
        let result = common::run_query(
            &database,
            json!({
                "table": "Track",
                "table_relationships": [],
                "query": {
                    "fields": { "id": { "type": "column", "column": "TrackId" } },
                    "where": {
                        "type": "and",
                        "expressions": [
                            {
                                "type": "or",
                                "expressions": [
                                    {
                                        "type": "binary_op",
                                        "operator": "greater_than",
                                        "column": { "path": [], "name": "Milliseconds" },
                                        "value": { "type": "scalar", "value": 340000 }
                                    },
                                    {
                                        "type": "unary_op",
                                        "operator": "is_null",
                                        "column": { "path": [], "name": "AlbumId" }
                                    }
                                ]
                            },
                            {
                                "type": "not",
                                "expression": {
                                    "type": "binary_op",
                                    "operator": "equal",
                                    "column": { "path": [], "name": "TrackId" },
                                    "value": { "type": "scalar", "value": 2 }
                                }
                            }
                        ]
                    },
                    "order_by": [{ "column": "TrackId", "direction": "asc" }]
                }
            }),
        )
        .await
        .unwrap();
        assert_eq!(result, json!([{ "id": 1 }, { "id": 7 }]));
    }

    #[tokio::test]
    async fn empty_and_keeps_every_row_and_empty_or_none() {
        let database = fixtures::chinook().await.unwrap();
        let request = |connective: &str| {
            json!({
                "table": "Artist",
                "table_relationships": [],
                "query": {
                    "fields": { "id": { "type": "column", "column": "ArtistId" } },
                    "where": { "type": connective, "expressions": [] },
                    "order_by": [{ "column": "ArtistId", "direction": "asc" }]
                }
            })
        };

        let everything = common::run_query(&database, request("and")).await.unwrap();
        assert_eq!(
            everything,
            json!([{ "id": 1 }, { "id": 2 }, { "id": 3 }, { "id": 4 }])
        );

        let nothing = common::run_query(&database, request("or")).await.unwrap();
        assert_eq!(nothing, json!([]));
    }
}

mod aggregates {
    use super::*;
    use super::assert_eq;

    #[tokio::test]
    async fn aggregates_without_rows() {
        let database = fixtures::chinook().await.unwrap();
        let result = common::run_query(
            &database,
            json!({
                "table": "Track",
                "table_relationships": [],
                "query": {
                    "aggregates": {
                        "count": { "type": "star_count" },
                        "total": {
                            "type": "single_column",
                            "column": "Milliseconds",
                            "function": "sum"
                        },
                        "albums": {
                            "type": "column_count",
                            "column": "AlbumId",
                            "distinct": true
                        }
                    },
                    "where": {
                        "type": "binary_op",
                        "operator": "less_than_or_equal",
                        "column": { "path": [], "name": "AlbumId" },
                        "value": { "type": "scalar", "value": 3 }
                    }
                }
            }),
        )
        .await
        .unwrap();
        assert_eq!(
            result,
            json!({ "aggregates": { "count": 4, "total": 1168951, "albums": 3 } })
        );
    }
}

mod explain {
    use super::*;
    use super::assert_eq;

    #[tokio::test]
    async fn explain_reports_the_plan() {
        let database = fixtures::chinook().await.unwrap();
        let (query, lines) = common::run_explain(
            &database,
            json!({
                "table": "Album",
                "table_relationships": [],
                "query": {
                    "fields": { "title": { "type": "column", "column": "Title" } },
                    "where": {
                        "type": "binary_op",
                        "operator": "equal",
                        "column": { "path": [], "name": "AlbumId" },
                        "value": { "type": "scalar", "value": 1 }
                    }
                }
            }),
        )
        .await
        .unwrap();
        assert!(query.contains("JSON_GROUP_ARRAY"), "{query}");
        assert!(!lines.is_empty());
        assert!(lines.iter().any(|line| line.contains("Album")), "{lines:?}");
    }
}

mod connections {
    use super::*;
    use super::assert_eq;
    use query_engine_execution::query;

    #[tokio::test]
    async fn health_check_succeeds() {
        let database = fixtures::chinook().await.unwrap();
        let pool = database.pool().await.unwrap();
        assert!(query::check_health(&pool).await.unwrap());
    }

    #[tokio::test]
    async fn concurrent_requests_keep_their_own_database() {
        let chinook = fixtures::chinook().await.unwrap();
        let other = fixtures::create_database(
            "other.sqlite",
            &[
                "CREATE TABLE Artist (ArtistId INTEGER PRIMARY KEY, Name TEXT)",
                "INSERT INTO Artist (ArtistId, Name) VALUES (1, 'Somebody Else')",
            ],
        )
        .await
        .unwrap();

        let request = json!({
            "table": "Artist",
            "table_relationships": [],
            "query": {
                "fields": { "name": { "type": "column", "column": "Name" } },
                "where": {
                    "type": "binary_op",
                    "operator": "equal",
                    "column": { "path": [], "name": "ArtistId" },
                    "value": { "type": "scalar", "value": 1 }
                }
            }
        });

        let (first, second) = tokio::join!(
            common::run_query(&chinook, request.clone()),
            common::run_query(&other, request),
        );
        assert_eq!(first.unwrap(), json!([{ "name": "AC/DC" }]));
        assert_eq!(second.unwrap(), json!([{ "name": "Somebody Else" }]));
    }
}

mod timeouts {
    use std::time::{Duration, Instant};

    use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

    use super::*;
    use super::assert_eq;
    use query_engine_execution::error::Error;
    use query_engine_execution::query;

    /// Every row of `Big` shares the same `k`, so each step along `Same` multiplies the work.
    async fn big() -> tests_common::fixtures::FixtureDatabase {
        fixtures::create_database(
            "big.sqlite",
            &[
                "CREATE TABLE Big (x INTEGER NOT NULL, k INTEGER NOT NULL)",
                "INSERT INTO Big (x, k)
                    WITH RECURSIVE n(x) AS (SELECT 1 UNION ALL SELECT x + 1 FROM n WHERE x < 3000)
                    SELECT x, 1 FROM n",
            ],
        )
        .await
        .unwrap()
    }

    fn big_request(path: &[&str]) -> serde_json::Value {
        json!({
            "table": "Big",
            "table_relationships": [{
                "source_table": "Big",
                "relationships": {
                    "Same": {
                        "target_table": "Big",
                        "relationship_type": "array",
                        "column_mapping": { "k": "k" }
                    }
                }
            }],
            "query": {
                "fields": { "x": { "type": "column", "column": "x" } },
                "where": {
                    "type": "binary_op",
                    "operator": "equal",
                    "column": { "path": path, "name": "x" },
                    "value": { "type": "scalar", "value": -1 }
                },
                "limit": 1
            }
        })
    }

    #[tokio::test]
    async fn a_timed_out_statement_releases_its_connection() {
        let database = big().await;
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .acquire_timeout(Duration::from_secs(5))
            .connect_with(SqliteConnectOptions::new().filename(&database.path))
            .await
            .unwrap();

        let started = Instant::now();
        let result = common::run_query_on(
            &pool,
            big_request(&["Same", "Same", "Same", "Same"]),
            Some(Duration::from_millis(200)),
        )
        .await
        .unwrap();
        assert!(matches!(result, Err(Error::Timeout(_))), "{result:?}");
        assert!(started.elapsed() < Duration::from_secs(5));

        let started = Instant::now();
        assert!(query::check_health(&pool).await.unwrap());
        let result = common::run_query_on(
            &pool,
            json!({
                "table": "Big",
                "table_relationships": [],
                "query": {
                    "fields": { "x": { "type": "column", "column": "x" } },
                    "order_by": [{ "column": "x", "direction": "asc" }],
                    "limit": 1
                }
            }),
            Some(Duration::from_secs(5)),
        )
        .await
        .unwrap()
        .unwrap();
        assert_eq!(result, json!([{ "x": 1 }]));
        assert!(started.elapsed() < Duration::from_secs(2));
    }
}
