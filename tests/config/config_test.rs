use translayer::prelude::*;

const FIXTURE: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/translayer.toml");

#[test]
fn test_load_fixture() {
    let settings = Settings::from_file(FIXTURE).unwrap();
    assert_eq!(settings.models.len(), 2);

    let registry = settings.build_registry().unwrap();
    let names: Vec<_> = registry.models().map(|m| m.model().table.as_str()).collect();
    assert_eq!(names, vec!["articles", "posts"]);
}

#[test]
fn test_model_identity_from_config() {
    let registry = Settings::from_file(FIXTURE)
        .unwrap()
        .build_registry()
        .unwrap();

    let articles = registry.model("articles").unwrap();
    assert_eq!(articles.model().primary_key, "uuid");
    assert_eq!(articles.model().type_name, "Article");

    let posts = registry.model("posts").unwrap();
    let backends: Vec<_> = posts
        .backends()
        .map(|b| (b.name(), b.attributes().to_vec()))
        .collect();
    assert_eq!(
        backends,
        vec![
            ("key_value", vec!["title".to_string(), "subtitle".to_string()]),
            ("key_value", vec!["summary".to_string()]),
            ("table", vec!["content".to_string()]),
        ]
    );
}

#[test]
fn test_attribute_lookup_through_registry() {
    let registry = Settings::from_file(FIXTURE)
        .unwrap()
        .build_registry()
        .unwrap();
    let posts = registry.model("posts").unwrap();
    let fr = Locale::from("fr");

    assert!(posts.attribute("summary", &fr).is_ok());
    assert!(matches!(
        posts.attribute("views", &fr),
        Err(TranslationError::ForeignAttribute { .. })
    ));
}

#[test]
fn test_configuration_errors_are_eager() {
    let err = "[[models.posts.key_value]]\ntype = \"blob\"\nattributes = [\"title\"]\n"
        .parse::<Settings>()
        .unwrap()
        .build_registry()
        .unwrap_err();
    assert!(matches!(
        err,
        ConfigError::UnknownKeyValueType { ref model, ref type_name }
            if model == "posts" && type_name == "blob"
    ));
}

#[test]
fn test_missing_file() {
    let err = Settings::from_file("does/not/exist.toml").unwrap_err();
    assert!(err.to_string().starts_with("Config file not found"));
}
