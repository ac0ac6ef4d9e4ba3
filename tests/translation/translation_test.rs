use translayer::prelude::*;

fn posts() -> KeyValueBackend {
    KeyValueBackend::new(
        ModelRef::new("posts"),
        KeyValueType::String,
        vec!["title".into(), "subtitle".into()],
    )
}

fn title(backend: &impl Backend) -> Expr {
    backend.build_node("title", &Locale::from("en")).unwrap()
}

fn apply(backend: &impl Backend, predicate: Expr, invert: bool) -> Query {
    backend
        .add_translations(
            backend.model().base_query(),
            predicate,
            &Locale::from("en"),
            invert,
        )
        .unwrap()
}

fn join_kinds(query: &Query) -> Vec<(&str, JoinType)> {
    query
        .joins
        .iter()
        .map(|j| (j.target(), j.join_type))
        .collect()
}

const TITLE_EN: &str = "post_title_en_string_translations";

#[test]
fn test_equality_adds_inner_join() {
    let backend = posts();
    let query = apply(&backend, title(&backend).eq("foo"), false);

    assert_eq!(join_kinds(&query), vec![(TITLE_EN, JoinType::Inner)]);
    assert!(query
        .to_sql(Dialect::Postgres)
        .ends_with("WHERE \"post_title_en_string_translations\".\"value\" = 'foo'"));
}

#[test]
fn test_null_equality_adds_outer_join() {
    let backend = posts();
    let query = apply(&backend, title(&backend).eq(lit_null()), false);

    assert_eq!(join_kinds(&query), vec![(TITLE_EN, JoinType::Left)]);
    assert!(query
        .to_sql(Dialect::Postgres)
        .ends_with("WHERE \"post_title_en_string_translations\".\"value\" IS NULL"));
}

#[test]
fn test_or_with_null_branch_is_outer() {
    let backend = posts();
    let predicate = title(&backend)
        .eq("foo")
        .paren()
        .or(title(&backend).eq(lit_null()).paren());
    let query = apply(&backend, predicate, false);

    assert_eq!(join_kinds(&query), vec![(TITLE_EN, JoinType::Left)]);
}

#[test]
fn test_or_single_branch_attribute_is_outer() {
    let backend = posts();
    let subtitle = backend.build_node("subtitle", &"en".into()).unwrap();
    let predicate = title(&backend).eq("foo").or(subtitle.eq("bar"));
    let query = apply(&backend, predicate, false);

    assert_eq!(
        join_kinds(&query),
        vec![
            ("post_subtitle_en_string_translations", JoinType::Left),
            (TITLE_EN, JoinType::Left),
        ]
    );
}

#[test]
fn test_inverted_equality_stays_inner() {
    let backend = posts();
    let query = apply(&backend, title(&backend).eq("foo"), true);

    assert_eq!(join_kinds(&query), vec![(TITLE_EN, JoinType::Inner)]);
    assert!(query
        .to_sql(Dialect::Postgres)
        .ends_with("WHERE \"post_title_en_string_translations\".\"value\" <> 'foo'"));
}

#[test]
fn test_inverted_null_comparison_upgrades_to_inner() {
    let backend = posts();
    let predicate = title(&backend)
        .eq("foo")
        .or(title(&backend).is_null());
    let query = apply(&backend, predicate, true);

    assert_eq!(join_kinds(&query), vec![(TITLE_EN, JoinType::Inner)]);
    assert!(query.to_sql(Dialect::Postgres).contains("WHERE NOT ("));
}

#[test]
fn test_untranslated_predicate_adds_no_joins() {
    let backend = posts();
    let base = backend.model().base_query();
    let query = apply(&backend, col("published").eq(true), false);

    assert!(query.joins.is_empty());
    assert_eq!(query, base.filter(col("published").eq(true)));

    let inverted = apply(&backend, col("published").eq(true), true);
    assert!(inverted.joins.is_empty());
    assert_eq!(
        inverted.where_clause,
        Some(col("published").ne(true))
    );
}

#[test]
fn test_rematerialization_is_idempotent() {
    let backend = posts();
    let locale = Locale::from("en");
    let predicate = title(&backend).eq("foo");

    let once = backend
        .apply_joins(backend.model().base_query(), &predicate, &locale, false)
        .unwrap();
    let twice = backend
        .apply_joins(once.clone(), &predicate, &locale, false)
        .unwrap();

    assert_eq!(once, twice);
    assert_eq!(twice.joins.len(), 1);
}

#[test]
fn test_outer_join_replaced_by_later_inner_requirement() {
    let backend = posts();
    let locale = Locale::from("en");

    let query = backend
        .apply_joins(
            backend.model().base_query(),
            &title(&backend).is_null(),
            &locale,
            false,
        )
        .unwrap();
    assert_eq!(join_kinds(&query), vec![(TITLE_EN, JoinType::Left)]);

    let query = backend
        .apply_joins(query, &title(&backend).eq("foo"), &locale, false)
        .unwrap();
    assert_eq!(join_kinds(&query), vec![(TITLE_EN, JoinType::Inner)]);

    // A weaker requirement afterwards never downgrades.
    let query = backend
        .apply_joins(query, &title(&backend).is_null(), &locale, false)
        .unwrap();
    assert_eq!(join_kinds(&query), vec![(TITLE_EN, JoinType::Inner)]);
}

#[test]
fn test_two_backends_of_same_shape_are_independent() {
    let model = ModelRef::new("posts");
    let strings = KeyValueBackend::new(model.clone(), KeyValueType::String, vec!["title".into()]);
    let texts = KeyValueBackend::new(model, KeyValueType::Text, vec!["summary".into()]);

    let predicate = strings
        .build_node("title", &"en".into())
        .unwrap()
        .eq("foo")
        .and(texts.build_node("summary", &"en".into()).unwrap().is_null());

    let query = strings
        .apply_joins(Query::new(), &predicate, &"en".into(), false)
        .unwrap();
    assert_eq!(join_kinds(&query), vec![(TITLE_EN, JoinType::Inner)]);

    let query = texts
        .apply_joins(query, &predicate, &"en".into(), false)
        .unwrap();
    assert_eq!(
        join_kinds(&query),
        vec![
            (TITLE_EN, JoinType::Inner),
            ("post_summary_en_text_translations", JoinType::Left),
        ]
    );
}

#[test]
fn test_table_backend_single_join() {
    let backend = TableBackend::new(
        ModelRef::new("posts"),
        vec!["title".into(), "content".into()],
    );
    let content = backend.build_node("content", &"en".into()).unwrap();
    let predicate = title(&backend).eq("foo").and(content.eq("bar"));
    let query = apply(&backend, predicate, false);

    assert_eq!(
        join_kinds(&query),
        vec![("post_translations_en", JoinType::Inner)]
    );
}

#[test]
fn test_table_backend_non_equality_reference_is_outer() {
    let backend = TableBackend::new(
        ModelRef::new("posts"),
        vec!["title".into(), "content".into()],
    );
    let content = backend.build_node("content", &"en".into()).unwrap();
    let predicate = title(&backend).eq("foo").and(content.like("%rust%"));
    let query = apply(&backend, predicate, false);

    assert_eq!(
        join_kinds(&query),
        vec![("post_translations_en", JoinType::Left)]
    );
}

#[test]
fn test_table_backend_or_is_outer() {
    let backend = TableBackend::new(ModelRef::new("posts"), vec!["title".into()]);
    let predicate = title(&backend).eq("foo").or(col("featured").eq(true));
    let query = apply(&backend, predicate, false);

    assert_eq!(
        join_kinds(&query),
        vec![("post_translations_en", JoinType::Left)]
    );
}

#[test]
fn test_case_over_translated_attribute_is_rejected() {
    let backend = posts();
    let predicate = Expr::Case {
        operand: None,
        when_clauses: vec![(title(&backend).eq("foo"), lit_int(1))],
        else_clause: Some(Box::new(lit_int(0))),
    }
    .eq(1);

    let err = backend
        .add_translations(Query::new(), predicate, &"en".into(), false)
        .unwrap_err();
    assert_eq!(
        err,
        TranslationError::UnsupportedNode {
            node: "CASE",
            attribute: "title".into()
        }
    );
}

#[test]
fn test_case_after_outer_condition_is_rejected_by_table_backend() {
    let backend = TableBackend::new(ModelRef::new("posts"), vec!["title".into()]);
    let case = Expr::Case {
        operand: None,
        when_clauses: vec![(title(&backend).eq("foo"), lit_int(1))],
        else_clause: Some(Box::new(lit_int(0))),
    };
    let predicate = title(&backend).is_null().and(case.eq(1));

    let err = backend
        .add_translations(Query::new(), predicate, &"en".into(), false)
        .unwrap_err();
    assert_eq!(
        err,
        TranslationError::UnsupportedNode {
            node: "CASE",
            attribute: "title".into()
        }
    );
}

#[test]
fn test_null_on_left_matches_null_on_right() {
    let backend = posts();
    let left = apply(&backend, lit_null().eq(title(&backend)), false);
    let right = apply(&backend, title(&backend).eq(lit_null()), false);

    assert_eq!(join_kinds(&left), vec![(TITLE_EN, JoinType::Left)]);
    assert_eq!(
        left.to_sql(Dialect::Postgres),
        right.to_sql(Dialect::Postgres)
    );
}

#[test]
fn test_case_without_translated_attribute_is_ignored() {
    let backend = posts();
    let predicate = Expr::Case {
        operand: None,
        when_clauses: vec![(col("views").gt(10), lit_str("hot"))],
        else_clause: None,
    }
    .eq("hot")
    .and(title(&backend).eq("foo"));

    let query = apply(&backend, predicate, false);
    assert_eq!(join_kinds(&query), vec![(TITLE_EN, JoinType::Inner)]);
}
