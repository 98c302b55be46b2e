//! Route enumeration over a populated `App` and properties of translated paths.

use http::Method;
use serde_json::json;
use specgate::path::TranslateError;
use specgate::router::RouteEnumerator;
use specgate::{App, GateConfig, PathTranslator, SpecGate};
use std::collections::HashSet;

fn populated_app() -> App {
    let mut app = App::new();
    app.route(
        "/users/<int:id>",
        &[Method::GET, Method::PUT, Method::DELETE],
        "user",
        |_req| Ok(json!({})),
    )
    .unwrap();
    app.route("/users", &[Method::GET, Method::POST], "users", |_req| {
        Ok(json!([]))
    })
    .unwrap();
    app.route("/apidoc/swagger", &[Method::GET], "swagger", |_req| {
        Ok("<html/>")
    })
    .unwrap();
    app.route("/static/extra/<path:p>", &[Method::GET], "extra", |_req| {
        Ok("")
    })
    .unwrap();
    app
}

#[test]
fn test_documented_routes_are_sorted_and_filtered() {
    let app = populated_app();
    let routes = RouteEnumerator::default()
        .enumerate(&app, &PathTranslator::new())
        .unwrap();

    let pairs: Vec<(String, String)> = routes
        .iter()
        .map(|r| (r.rule.clone(), r.method.to_string()))
        .collect();
    assert_eq!(
        pairs,
        vec![
            ("/users".to_string(), "GET".to_string()),
            ("/users".to_string(), "POST".to_string()),
            ("/users/<int:id>".to_string(), "DELETE".to_string()),
            ("/users/<int:id>".to_string(), "GET".to_string()),
            ("/users/<int:id>".to_string(), "PUT".to_string()),
        ]
    );
    assert!(routes
        .iter()
        .all(|r| r.method != Method::HEAD && r.method != Method::OPTIONS));
}

#[test]
fn test_registered_document_route_is_not_enumerated() {
    let mut app = populated_app();
    let gate = SpecGate::default();
    gate.register(&mut app).unwrap();

    let specs = gate.route_specs(&app).unwrap();
    assert!(specs.iter().all(|s| !s.path_pattern.starts_with("/apidoc")));
    assert!(specs.iter().all(|s| !s.path_pattern.starts_with("/static")));
    assert_eq!(specs.len(), 5);
}

#[test]
fn test_custom_prefixes_follow_config() {
    let config = GateConfig {
        doc_path: "users".to_string(),
        ..GateConfig::default()
    };
    let routes = RouteEnumerator::from_config(&config)
        .enumerate(&populated_app(), &PathTranslator::new())
        .unwrap();
    let rules: HashSet<&str> = routes.iter().map(|r| r.rule.as_str()).collect();
    assert_eq!(rules, HashSet::from(["/apidoc/swagger"]));
}

#[test]
fn test_strict_translator_aborts_enumeration() {
    let mut app = App::new();
    app.route("/paint/<color:c>", &[Method::GET], "paint", |_req| Ok("ok"))
        .unwrap();

    let lenient = RouteEnumerator::default()
        .enumerate(&app, &PathTranslator::new())
        .unwrap();
    assert_eq!(lenient[0].path.normalized, "/paint/{c}");
    assert_eq!(lenient[0].path.parameters[0].schema, json!({ "type": "string" }));

    let err = RouteEnumerator::default()
        .enumerate(&app, &PathTranslator::new().strict(true))
        .unwrap_err();
    assert!(matches!(err, TranslateError::UnknownConverter { .. }));
}

#[test]
fn test_translation_properties_hold_for_rule_samples() {
    let translator = PathTranslator::new();
    let rules = [
        "/",
        "/plain/segments",
        "/a/<x>",
        "/a/<int:x>/b/<float:y>",
        "/files/<path:rest>",
        "/v/<any(one, two):choice>/<uuid:id>",
        "/s/<string(minLength=2, maxLength=8):slug>/<int(min=1, max=10):n>",
    ];

    for rule in rules {
        let spec = translator.translate(rule).unwrap();
        let placeholders = spec.normalized.matches('{').count();
        assert_eq!(placeholders, spec.parameters.len(), "{rule}");

        let names: HashSet<&str> = spec.parameters.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names.len(), spec.parameters.len(), "{rule}");
        assert!(spec.parameters.iter().all(|p| p.required), "{rule}");

        let again = translator.translate(rule).unwrap();
        assert_eq!(again, spec, "{rule}");
        assert!(!spec.normalized.contains('<'), "{rule}");
    }
}

#[test]
fn test_converter_schemas() {
    let spec = PathTranslator::new()
        .translate("/v/<any(one, two):choice>/<uuid:id>/<int(max=9):n>")
        .unwrap();
    assert_eq!(spec.normalized, "/v/{choice}/{id}/{n}");
    assert_eq!(
        spec.parameters[0].schema,
        json!({ "type": "array", "items": { "type": "string", "enum": ["one", "two"] } })
    );
    assert_eq!(
        spec.parameters[1].schema,
        json!({ "type": "string", "format": "uuid" })
    );
    assert_eq!(
        spec.parameters[2].schema,
        json!({ "type": "integer", "format": "int32", "maximum": 9 })
    );
}

#[test]
fn test_registered_converter_is_documented() {
    let gate = SpecGate::default().with_converter(
        "color",
        json!({ "type": "string", "enum": ["red", "green"] }),
    );
    let mut app = App::new();
    app.route("/paint/<color:c>", &[Method::GET], "paint", |_req| Ok("ok"))
        .unwrap();

    let specs = gate.route_specs(&app).unwrap();
    assert_eq!(specs[0].normalized_path, "/paint/{c}");
    assert_eq!(specs[0].parameters[0].schema["enum"], json!(["red", "green"]));
}
