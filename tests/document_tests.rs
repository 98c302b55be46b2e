//! The assembled OpenAPI document, served from the registered spec route.

use http::Method;
use serde_json::{json, Value};
use specgate::dispatcher::{handler, Endpoint};
use specgate::schema::{JsonSchemaModel, SchemaRef};
use specgate::spec::ResponseSchemas;
use specgate::{App, GateConfig, HttpRequest, SpecGate};
use std::sync::Arc;

fn model(name: &str, schema: Value) -> SchemaRef {
    Arc::new(JsonSchemaModel::new(name, schema).unwrap())
}

fn user() -> SchemaRef {
    model(
        "User",
        json!({
            "type": "object",
            "properties": { "id": { "type": "integer" }, "name": { "type": "string" } },
            "required": ["id"]
        }),
    )
}

fn user_service(gate: &SpecGate) -> App {
    let mut app = App::new();
    let get_user = gate.validate(
        Endpoint::new()
            .summary("Fetch a user")
            .tag("users")
            .responses(ResponseSchemas::new().with(200, user()).with_empty(404)),
        handler(|_req| Ok(json!({ "id": 1 }))),
    );
    app.add_url_rule(
        "/users/<int(min=1):user_id>",
        "get_user",
        &[Method::GET],
        Arc::new(get_user),
    )
    .unwrap();

    let search = model(
        "UserSearch",
        json!({
            "type": "object",
            "properties": {
                "q": { "type": "string", "description": "Free text" },
                "limit": { "type": "integer" }
            },
            "required": ["q"]
        }),
    );
    let list_users = gate.validate(
        Endpoint::new().query(search).tag("users"),
        handler(|_req| Ok(json!([]))),
    );
    app.add_url_rule("/users", "list_users", &[Method::GET], Arc::new(list_users))
        .unwrap();

    let create_user = gate.validate(
        Endpoint::new()
            .json(user())
            .responses(ResponseSchemas::new().with(201, user())),
        handler(|_req| Ok((201u16, json!({ "id": 2 })))),
    );
    app.add_url_rule("/users", "create_user", &[Method::POST], Arc::new(create_user))
        .unwrap();

    app.route("/health", &[Method::GET], "health", |_req| Ok("ok"))
        .unwrap();
    app
}

#[test]
fn test_document_is_served_from_spec_url() {
    let gate = SpecGate::default();
    let mut app = user_service(&gate);
    let document = gate.register(&mut app).unwrap();

    let resp = app.handle(HttpRequest::new(Method::GET, "/apidoc/openapi.json"));
    assert_eq!(resp.status, 200);
    assert_eq!(resp.body, *document);
    assert_eq!(resp.body["openapi"], "3.0.3");
    assert_eq!(resp.body["info"]["title"], "Service API");
}

#[test]
fn test_document_describes_paths_and_parameters() {
    let gate = SpecGate::default();
    let document = gate.build_document(&user_service(&gate)).unwrap();
    let paths = document["paths"].as_object().unwrap();

    let keys: Vec<&str> = paths.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["/health", "/users", "/users/{user_id}"]);

    let get_user = &document["paths"]["/users/{user_id}"]["get"];
    assert_eq!(get_user["operationId"], "get_get_user");
    assert_eq!(get_user["summary"], "Fetch a user");
    assert_eq!(get_user["tags"], json!(["users"]));
    assert_eq!(
        get_user["parameters"][0],
        json!({
            "name": "user_id",
            "in": "path",
            "required": true,
            "schema": { "type": "integer", "format": "int32", "minimum": 1 }
        })
    );
    assert_eq!(
        get_user["responses"]["200"]["content"]["application/json"]["schema"]["$ref"],
        "#/components/schemas/User"
    );
    assert_eq!(get_user["responses"]["404"], json!({ "description": "Not Found" }));
    assert!(get_user["responses"].get("422").is_none());

    let list_users = &document["paths"]["/users"]["get"];
    let q = list_users["parameters"]
        .as_array()
        .unwrap()
        .iter()
        .find(|p| p["name"] == "q")
        .unwrap();
    assert_eq!(q["in"], "query");
    assert_eq!(q["required"], true);
    assert_eq!(q["description"], "Free text");
    assert_eq!(
        list_users["responses"]["422"]["content"]["application/json"]["schema"]["$ref"],
        "#/components/schemas/ValidationError"
    );

    let health = &document["paths"]["/health"]["get"];
    assert_eq!(health["summary"], "health");
    assert_eq!(health["responses"], json!({ "200": { "description": "OK" } }));
}

#[test]
fn test_document_components_and_request_body() {
    let gate = SpecGate::default();
    let document = gate.build_document(&user_service(&gate)).unwrap();

    let create = &document["paths"]["/users"]["post"];
    assert_eq!(
        create["requestBody"]["content"]["application/json"]["schema"]["$ref"],
        "#/components/schemas/User"
    );
    assert_eq!(create["responses"]["201"]["description"], "Created");

    let schemas = document["components"]["schemas"].as_object().unwrap();
    let names: Vec<&str> = schemas.keys().map(String::as_str).collect();
    assert_eq!(names, vec!["User", "UserSearch", "ValidationError"]);
    assert_eq!(document["tags"], json!([{ "name": "users" }]));
}

#[test]
fn test_document_follows_config() {
    let gate = SpecGate::new(GateConfig {
        title: "Pets".to_string(),
        version: "2.1.0".to_string(),
        doc_path: "docs".to_string(),
        filename: "spec.json".to_string(),
        validation_error_code: 400,
        ..GateConfig::default()
    });
    let mut app = user_service(&gate);
    gate.register(&mut app).unwrap();

    let resp = app.handle(HttpRequest::new(Method::GET, "/docs/spec.json"));
    assert_eq!(resp.status, 200);
    assert_eq!(resp.body["info"], json!({ "title": "Pets", "version": "2.1.0" }));
    assert!(resp.body["paths"]["/users"]["get"]["responses"]
        .get("400")
        .is_some());
    assert!(resp.body["paths"].get("/docs/spec.json").is_none());
}

#[test]
fn test_document_is_deterministic() {
    let gate = SpecGate::default();
    let first = gate.build_document(&user_service(&gate)).unwrap();
    let second = gate.build_document(&user_service(&gate)).unwrap();
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[test]
fn test_builtin_static_route_stays_out_with_custom_static_path() {
    let gate = SpecGate::new(GateConfig {
        static_path: "/assets".to_string(),
        ..GateConfig::default()
    });
    let mut app = App::new();
    app.route("/ping", &[Method::GET], "ping", |_req| Ok("pong"))
        .unwrap();

    let document = gate.build_document(&app).unwrap();
    let keys: Vec<&str> = document["paths"]
        .as_object()
        .unwrap()
        .keys()
        .map(String::as_str)
        .collect();
    assert_eq!(keys, vec!["/ping"]);
}
