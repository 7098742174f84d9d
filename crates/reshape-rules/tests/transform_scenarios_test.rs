//! Integration test: reshaping scenarios across all rule forms

use reshape_rules::{
    Converter, ConverterRef, DefaultTo, Error, ExplicitRule, PathRef, RawRule, RuleField, RuleSet,
    canonicalize, create_transformer, serialize,
};
use serde_json::{Value, json};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn add(n: i64) -> Converter {
    Converter::new(move |value, _| json!(value.as_i64().unwrap_or_default() + n))
}

#[test]
fn test_object_rules_map_source_to_destination() -> anyhow::Result<()> {
    init_tracing();
    let rules = RuleSet::new()
        .with(
            "mapped.a",
            ExplicitRule::new()
                .with_converter(Converter::identity())
                .with_source_path("a"),
        )
        .with(
            "C",
            ExplicitRule::new()
                .with_converter(Converter::identity())
                .with_source_path("b.c"),
        );

    let output = serialize(&rules, &json!({"a": 1, "b": {"c": 2}}))?;
    assert_eq!(output, json!({"mapped": {"a": 1}, "C": 2}));
    Ok(())
}

#[test]
fn test_converter_transforms_value() -> anyhow::Result<()> {
    let rules = RuleSet::new()
        .with("A", ExplicitRule::new().with_converter(add(1)).with_source_path("a"))
        .with(
            "hello.world",
            ExplicitRule::new()
                .with_converter(Converter::new(|value, _| {
                    json!(format!("Hello, {}!", value.as_str().unwrap_or_default()))
                }))
                .with_source_path("b"),
        );

    let output = serialize(&rules, &json!({"a": 41, "b": "world"}))?;
    assert_eq!(output, json!({"A": 42, "hello": {"world": "Hello, world!"}}));
    Ok(())
}

#[test]
fn test_default_applies_when_source_missing() -> anyhow::Result<()> {
    let rules = RuleSet::new().with(
        "a",
        ExplicitRule::new()
            .with_converter(Converter::identity())
            .with_default(DefaultTo::provider(|_| json!(1)))
            .with_source_path("a"),
    );

    assert_eq!(serialize(&rules, &json!({"b": 10}))?, json!({"a": 1}));
    assert_eq!(serialize(&rules, &json!({"a": null, "b": 10}))?, json!({"a": 1}));
    Ok(())
}

#[test]
fn test_boolean_rules_keep_and_drop() -> anyhow::Result<()> {
    let rules = RuleSet::new().with("a", true).with("b", false).with("c", true);
    let output = serialize(&rules, &json!({"a": 1, "b": 2, "c": 3}))?;
    assert_eq!(output, json!({"a": 1, "c": 3}));
    Ok(())
}

#[test]
fn test_non_callable_converter_fails_canonicalization() {
    let rules = RuleSet::new().with(
        "a",
        ExplicitRule {
            converter: Some(ConverterRef::Invalid(json!(3))),
            source_path: Some(PathRef::from("a")),
            ..ExplicitRule::default()
        },
    );

    let err = serialize(&rules, &json!({"a": 1})).unwrap_err();
    assert!(err.to_string().contains("converter must be a function"));
    assert!(matches!(
        err,
        Error::InvalidRule {
            field: RuleField::Converter,
            ..
        }
    ));
}

#[test]
fn test_string_rule_moves_value() -> anyhow::Result<()> {
    let rules = RuleSet::new().with("b.c", "a");
    assert_eq!(serialize(&rules, &json!({"a": 1}))?, json!({"b": {"c": 1}}));
    Ok(())
}

#[test]
fn test_function_rule_converts_in_place() -> anyhow::Result<()> {
    let rules = RuleSet::new().with(
        "a",
        Converter::new(|value, _| json!(value.as_f64().unwrap_or_default() * 10.0)),
    );
    assert_eq!(serialize(&rules, &json!({"a": 4.5}))?, json!({"a": 45.0}));
    Ok(())
}

#[test]
fn test_identity_default_matches_explicit_identity() -> anyhow::Result<()> {
    let source = json!({"a": {"nested": [1, 2]}});
    let implicit = RuleSet::new().with("b", ExplicitRule::new().with_source_path("a"));
    let explicit = RuleSet::new().with(
        "b",
        ExplicitRule::new()
            .with_source_path("a")
            .with_converter(Converter::identity()),
    );

    assert_eq!(serialize(&implicit, &source)?, serialize(&explicit, &source)?);
    assert_eq!(serialize(&implicit, &source)?, json!({"b": {"nested": [1, 2]}}));
    Ok(())
}

#[test]
fn test_missing_source_path_uses_key() -> anyhow::Result<()> {
    let rules = RuleSet::new().with("a", ExplicitRule::new().with_converter(add(1)));
    assert_eq!(serialize(&rules, &json!({"a": 1}))?, json!({"a": 2}));
    Ok(())
}

#[test]
fn test_deep_read_and_write() -> anyhow::Result<()> {
    let read = RuleSet::new().with("abc", "a.b.c");
    assert_eq!(
        serialize(&read, &json!({"a": {"b": {"c": 1}}}))?,
        json!({"abc": 1})
    );

    let write = RuleSet::new().with("a.b.c", "abc");
    assert_eq!(
        serialize(&write, &json!({"abc": 1}))?,
        json!({"a": {"b": {"c": 1}}})
    );

    let partial = RuleSet::new().with("A", "a").with("BC", "b.c");
    assert_eq!(
        serialize(&partial, &json!({"a": 1, "b": {"d": 2}}))?,
        json!({"A": 1})
    );
    Ok(())
}

#[test]
fn test_unsupported_rules_never_reach_output() -> anyhow::Result<()> {
    let rules = RuleSet::new()
        .with("n", RawRule::Unsupported(json!(3)))
        .with("a", true);

    let canonical = canonicalize(&rules)?;
    assert!(canonical.get("n").is_none());
    assert_eq!(
        serialize(&rules, &json!({"n": 1, "a": 2}))?,
        json!({"a": 2})
    );
    Ok(())
}

#[test]
fn test_source_is_not_mutated() -> anyhow::Result<()> {
    let source = json!({"a": {"b": 1}, "c": [1, 2, 3]});
    let snapshot = source.clone();
    let rules = RuleSet::new()
        .with("a.b", add(100))
        .with("c", true)
        .with("x.y", "a.b");

    let output = serialize(&rules, &source)?;
    assert_eq!(source, snapshot);
    assert_eq!(output, json!({"a": {"b": 101}, "c": [1, 2, 3], "x": {"y": 1}}));
    Ok(())
}

#[test]
fn test_batch_application() -> anyhow::Result<()> {
    let transformer = create_transformer(
        &RuleSet::new()
            .with("id", true)
            .with(
                "status",
                ExplicitRule::new().with_default(DefaultTo::value("active")),
            ),
    )?;

    let sources: Vec<Value> = (1..=3).map(|id| json!({"id": id})).collect();
    let outputs = transformer.apply_all(&sources)?;

    assert_eq!(outputs.len(), 3);
    for (id, output) in (1..=3).zip(&outputs) {
        assert_eq!(output, &json!({"id": id, "status": "active"}));
    }
    Ok(())
}

#[test]
fn test_batch_stops_on_first_conversion_error() {
    let rules = RuleSet::new().with("n", ExplicitRule::new().with_named_converter("to_number"));
    let transformer = create_transformer(&rules).unwrap();
    let sources = [json!({"n": "1"}), json!({"n": "two"}), json!({"n": "3"})];

    let err = transformer.apply_all(&sources).unwrap_err();
    assert!(matches!(err, Error::Conversion { ref key, .. } if key == "n"));
}

#[test]
fn test_write_past_array_end_replaces_array() -> anyhow::Result<()> {
    let source = json!({"arr": [1], "v": 2});

    let huge = RuleSet::new()
        .with("x", "arr")
        .with("x.18446744073709551615", "v");
    assert_eq!(
        serialize(&huge, &source)?,
        json!({"x": {"18446744073709551615": 2}})
    );

    let far = RuleSet::new().with("x", "arr").with("x.4000000000000", "v");
    assert_eq!(serialize(&far, &source)?, json!({"x": {"4000000000000": 2}}));

    let next = RuleSet::new().with("x", "arr").with("x.1", "v");
    assert_eq!(serialize(&next, &source)?, json!({"x": [1, 2]}));
    Ok(())
}
