use sqlparser::dialect::{DuckDbDialect, MsSqlDialect, MySqlDialect, PostgreSqlDialect};
use sqlparser::parser::Parser;
use translayer::prelude::*;

fn registry() -> Registry {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/translayer.toml");
    Settings::from_file(path)
        .unwrap()
        .build_registry()
        .unwrap()
}

fn assert_valid_sql(sql: &str, dialect: Dialect) {
    let parser_dialect: Box<dyn sqlparser::dialect::Dialect> = match dialect {
        Dialect::Postgres => Box::new(PostgreSqlDialect {}),
        Dialect::DuckDb => Box::new(DuckDbDialect {}),
        Dialect::MySql => Box::new(MySqlDialect {}),
        Dialect::TSql => Box::new(MsSqlDialect {}),
    };
    if let Err(e) = Parser::parse_sql(&*parser_dialect, sql) {
        panic!("Invalid SQL for {}: {}\nSQL: {}", dialect, e, sql);
    }
}

fn compile(model: &str, predicate: &str, options: CompileOptions) -> CompileOutput {
    let registry = registry();
    let model = registry.model(model).unwrap();
    compile_predicate(model, predicate, &options).unwrap()
}

#[test]
fn test_key_value_equality_end_to_end() {
    let output = compile("posts", "title = 'foo'", CompileOptions::new("en"));

    insta::assert_snapshot!(output.sql, @r#"
    SELECT
      "posts".*
    FROM "posts"
    INNER JOIN "string_translations" AS "post_title_en_string_translations" ON "post_title_en_string_translations"."translatable_id" = "posts"."id" AND "post_title_en_string_translations"."locale" = 'en' AND "post_title_en_string_translations"."key" = 'title' AND "post_title_en_string_translations"."translatable_type" = 'Post'
    WHERE "post_title_en_string_translations"."value" = 'foo'
    "#);
    assert_valid_sql(&output.sql, Dialect::Postgres);
}

#[test]
fn test_or_null_end_to_end() {
    let output = compile(
        "posts",
        "(title = 'foo') OR (title IS NULL)",
        CompileOptions::new("fr"),
    );

    assert_eq!(output.joins.len(), 1);
    assert_eq!(output.joins[0].kind, JoinKind::Outer);
    assert!(output.sql.contains(
        "LEFT OUTER JOIN \"string_translations\" AS \"post_title_fr_string_translations\""
    ));
    assert!(output.sql.ends_with(
        "WHERE (\"post_title_fr_string_translations\".\"value\" = 'foo') OR (\"post_title_fr_string_translations\".\"value\" IS NULL)"
    ));
    assert_valid_sql(&output.sql, Dialect::Postgres);
}

#[test]
fn test_null_on_left_end_to_end() {
    let output = compile("posts", "NULL = title", CompileOptions::new("en"));
    assert_eq!(output.joins[0].kind, JoinKind::Outer);
    assert!(output
        .sql
        .contains("LEFT OUTER JOIN \"string_translations\" AS \"post_title_en_string_translations\""));
    assert!(output
        .sql
        .ends_with("WHERE \"post_title_en_string_translations\".\"value\" IS NULL"));
    assert_valid_sql(&output.sql, Dialect::Postgres);

    let output = compile(
        "posts",
        "NULL = title",
        CompileOptions::new("en").inverted(true),
    );
    assert_eq!(output.joins[0].kind, JoinKind::Inner);
    assert!(output
        .sql
        .ends_with("WHERE \"post_title_en_string_translations\".\"value\" IS NOT NULL"));
    assert_valid_sql(&output.sql, Dialect::Postgres);
}

#[test]
fn test_null_on_left_of_table_attribute() {
    let output = compile(
        "posts",
        "NULL = content",
        CompileOptions::new("en").with_dialect(Dialect::MySql),
    );
    assert_eq!(output.joins[0].kind, JoinKind::Outer);
    assert!(output
        .sql
        .ends_with("WHERE `post_translations_en`.`content` IS NULL"));
    assert_valid_sql(&output.sql, Dialect::MySql);
}

#[test]
fn test_out_of_range_number_is_a_parse_error() {
    let registry = registry();
    let posts = registry.model("posts").unwrap();
    for predicate in ["title = 'x' AND views > 1e999", "views < -1e999"] {
        let result = compile_predicate(posts, predicate, &CompileOptions::new("en"));
        assert!(
            matches!(result, Err(CompileError::ParseError(_))),
            "{} should not compile",
            predicate
        );
    }
}

#[test]
fn test_mixed_backends_end_to_end() {
    let output = compile(
        "posts",
        "title = 'foo' AND summary IS NULL AND content LIKE '%rust%' AND views > 10",
        CompileOptions::new("pt-BR").with_dialect(Dialect::DuckDb),
    );

    let joins: Vec<_> = output
        .joins
        .iter()
        .map(|j| (j.backend, j.alias.as_str(), j.kind))
        .collect();
    assert_eq!(
        joins,
        vec![
            ("key_value", "post_title_pt_br_string_translations", JoinKind::Inner),
            ("key_value", "post_summary_pt_br_text_translations", JoinKind::Outer),
            ("table", "post_translations_pt_br", JoinKind::Outer),
        ]
    );
    assert!(output.sql.contains("\"locale\" = 'pt-BR'"));
    assert!(output.sql.contains("\"views\" > 10"));
    assert_valid_sql(&output.sql, Dialect::DuckDb);
}

#[test]
fn test_inverted_end_to_end() {
    let output = compile(
        "posts",
        "title IN ('a', 'b')",
        CompileOptions::new("en").inverted(true),
    );
    assert_eq!(output.joins[0].kind, JoinKind::Inner);
    assert!(output
        .sql
        .ends_with("WHERE \"post_title_en_string_translations\".\"value\" NOT IN ('a', 'b')"));
    assert_valid_sql(&output.sql, Dialect::Postgres);
}

#[test]
fn test_overridden_table_names_end_to_end() {
    let output = compile(
        "articles",
        "headline = 'x' OR body = 'y'",
        CompileOptions::new("en").with_dialect(Dialect::TSql),
    );
    assert!(output.sql.contains(
        "LEFT OUTER JOIN [article_i18n] AS [article_i18n_en] ON [article_i18n_en].[article_uuid] = [articles].[uuid]"
    ));
    assert_valid_sql(&output.sql, Dialect::TSql);
}

#[test]
fn test_every_dialect_produces_valid_sql() {
    let predicates = [
        "title = 'foo'",
        "title IS NULL OR subtitle = 'bar'",
        "NOT (content = 'x') AND title IN ('a', 'b')",
        "lower(title) = 'foo' AND views BETWEEN 1 AND 10",
    ];
    for dialect in Dialect::ALL {
        for predicate in predicates {
            for invert in [false, true] {
                let options = CompileOptions::new("en")
                    .with_dialect(dialect)
                    .inverted(invert);
                let output = compile("posts", predicate, options);
                assert_valid_sql(&output.sql, dialect);
            }
        }
    }
}

#[test]
fn test_plan_serializes_to_json() {
    let output = compile("posts", "content IS NULL", CompileOptions::new("en"));
    let json = serde_json::to_value(&output.joins).unwrap();
    assert_eq!(
        json,
        serde_json::json!([{
            "backend": "table",
            "attribute": null,
            "table": "post_translations",
            "alias": "post_translations_en",
            "kind": "outer"
        }])
    );
}

#[test]
fn test_unknown_model() {
    let registry = registry();
    assert!(matches!(
        registry.model("comments"),
        Err(ConfigError::UnknownModel(_))
    ));
}
