use super::build::extract_parameters;
use super::types::{ParameterLocation, RouteSpec};
use crate::config::GateConfig;
use crate::schema::SchemaRef;
use http::StatusCode;
use serde_json::{json, Map, Value};
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, warn};

/// Component name of the request validation error body.
pub const VALIDATION_ERROR_COMPONENT: &str = "ValidationError";

/// JSON Schema of the request validation error body: a list of field errors.
#[must_use]
pub fn validation_error_schema() -> Value {
    json!({
        "type": "array",
        "items": {
            "type": "object",
            "properties": {
                "loc": { "type": "array", "items": { "type": "string" } },
                "msg": { "type": "string" },
                "type": { "type": "string" }
            },
            "required": ["loc", "msg", "type"]
        }
    })
}

fn schema_ref(name: &str) -> Value {
    json!({ "$ref": format!("#/components/schemas/{name}") })
}

fn status_description(code: u16) -> &'static str {
    StatusCode::from_u16(code)
        .ok()
        .and_then(|s| s.canonical_reason())
        .unwrap_or("Response")
}

#[derive(Default)]
struct Components {
    schemas: BTreeMap<String, Value>,
}

impl Components {
    /// Register `model` and return a `$ref` to it.
    fn add(&mut self, model: &SchemaRef) -> Value {
        let name = model.name().to_string();
        let described = model.describe();
        match self.schemas.get(&name) {
            Some(existing) if *existing != described => {
                warn!(model = %name, "Two different models share a component name; keeping the first");
            }
            Some(_) => {}
            None => {
                self.schemas.insert(name.clone(), described);
            }
        }
        schema_ref(&name)
    }
}

/// Assemble the OpenAPI document for `routes`.
///
/// Paths and components are keyed in sorted order, so the same routes always give
/// the same document.
#[must_use]
pub fn build_document(config: &GateConfig, routes: &[RouteSpec]) -> Value {
    let mut components = Components::default();
    let mut paths: BTreeMap<String, Map<String, Value>> = BTreeMap::new();
    let mut tags: BTreeSet<String> = BTreeSet::new();
    let mut needs_validation_error = false;

    for route in routes {
        tags.extend(route.tags.iter().cloned());
        let mut operation = Map::new();
        operation.insert("operationId".to_string(), json!(route.operation_id()));
        operation.insert(
            "summary".to_string(),
            json!(route.summary.clone().unwrap_or_else(|| route.endpoint.clone())),
        );
        if let Some(description) = &route.description {
            operation.insert("description".to_string(), json!(description));
        }
        if !route.tags.is_empty() {
            operation.insert("tags".to_string(), json!(route.tags));
        }

        let mut parameters: Vec<Value> = route
            .parameters
            .iter()
            .filter_map(|p| serde_json::to_value(p).ok())
            .collect();
        for (model, location) in [
            (&route.query, ParameterLocation::Query),
            (&route.headers, ParameterLocation::Header),
            (&route.cookies, ParameterLocation::Cookie),
        ] {
            if let Some(model) = model {
                components.add(model);
                parameters.extend(
                    extract_parameters(model, location)
                        .iter()
                        .filter_map(|p| serde_json::to_value(p).ok()),
                );
            }
        }
        if !parameters.is_empty() {
            operation.insert("parameters".to_string(), Value::Array(parameters));
        }

        if let Some(body) = &route.body {
            let schema = body
                .model
                .as_ref()
                .map(|m| components.add(m))
                .unwrap_or_else(|| json!({}));
            let mut content = Map::new();
            content.insert(body.content_type.clone(), json!({ "schema": schema }));
            operation.insert("requestBody".to_string(), json!({ "content": content }));
        }

        let mut responses = Map::new();
        match &route.responses {
            Some(declared) if !declared.is_empty() => {
                for (code, model) in declared.iter() {
                    let mut response = Map::new();
                    response.insert("description".to_string(), json!(status_description(code)));
                    if let Some(model) = model {
                        response.insert(
                            "content".to_string(),
                            json!({ "application/json": { "schema": components.add(model) } }),
                        );
                    }
                    responses.insert(code.to_string(), Value::Object(response));
                }
            }
            _ => {
                responses.insert("200".to_string(), json!({ "description": "OK" }));
            }
        }
        let error_code = config.validation_error_code.to_string();
        if route.validates_request() && !responses.contains_key(&error_code) {
            needs_validation_error = true;
            responses.insert(
                error_code,
                json!({
                    "description": "Validation Error",
                    "content": {
                        "application/json": { "schema": schema_ref(VALIDATION_ERROR_COMPONENT) }
                    }
                }),
            );
        }
        operation.insert("responses".to_string(), Value::Object(responses));

        paths
            .entry(route.normalized_path.clone())
            .or_default()
            .insert(route.method.as_str().to_lowercase(), Value::Object(operation));
    }

    if needs_validation_error {
        components
            .schemas
            .entry(VALIDATION_ERROR_COMPONENT.to_string())
            .or_insert_with(validation_error_schema);
    }

    debug!(
        paths = paths.len(),
        components = components.schemas.len(),
        "Document assembled"
    );

    json!({
        "openapi": config.openapi_version,
        "info": { "title": config.title, "version": config.version },
        "tags": tags.into_iter().map(|name| json!({ "name": name })).collect::<Vec<_>>(),
        "paths": paths,
        "components": { "schemas": components.schemas },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::JsonSchemaModel;
    use crate::spec::{ParameterDescriptor, RequestBody, ResponseSchemas};
    use http::Method;
    use std::sync::Arc;

    fn model(name: &str, schema: Value) -> SchemaRef {
        Arc::new(JsonSchemaModel::new(name, schema).unwrap())
    }

    fn route(method: Method, path: &str, endpoint: &str) -> RouteSpec {
        RouteSpec {
            method,
            path_pattern: path.to_string(),
            endpoint: endpoint.to_string(),
            normalized_path: path.to_string(),
            parameters: Vec::new(),
            query: None,
            body: None,
            headers: None,
            cookies: None,
            responses: None,
            summary: None,
            description: None,
            tags: Vec::new(),
        }
    }

    #[test]
    fn test_plain_route_gets_default_response() {
        let doc = build_document(&GateConfig::default(), &[route(Method::GET, "/health", "health")]);
        assert_eq!(doc["openapi"], "3.0.3");
        assert_eq!(doc["info"]["title"], "Service API");
        let op = &doc["paths"]["/health"]["get"];
        assert_eq!(op["operationId"], "get_health");
        assert_eq!(op["summary"], "health");
        assert_eq!(op["responses"], json!({ "200": { "description": "OK" } }));
        assert!(op.get("parameters").is_none());
        assert_eq!(doc["components"]["schemas"], json!({}));
    }

    #[test]
    fn test_validated_route_references_components() {
        let mut r = route(Method::POST, "/users/{id}", "update_user");
        r.parameters = vec![ParameterDescriptor::path("id", json!({ "type": "integer", "format": "int32" }))];
        r.body = Some(RequestBody::json(model("UserIn", json!({ "type": "object" }))));
        r.responses = Some(
            ResponseSchemas::new()
                .with(200, model("UserOut", json!({ "type": "object" })))
                .with_empty(204),
        );
        r.tags = vec!["users".to_string()];

        let doc = build_document(&GateConfig::default(), &[r]);
        let op = &doc["paths"]["/users/{id}"]["post"];
        assert_eq!(op["parameters"][0]["in"], "path");
        assert_eq!(op["parameters"][0]["required"], true);
        assert_eq!(
            op["requestBody"]["content"]["application/json"]["schema"]["$ref"],
            "#/components/schemas/UserIn"
        );
        assert_eq!(
            op["responses"]["200"]["content"]["application/json"]["schema"]["$ref"],
            "#/components/schemas/UserOut"
        );
        assert_eq!(op["responses"]["204"], json!({ "description": "No Content" }));
        assert_eq!(
            op["responses"]["422"]["content"]["application/json"]["schema"]["$ref"],
            "#/components/schemas/ValidationError"
        );
        assert_eq!(doc["components"]["schemas"]["ValidationError"], validation_error_schema());
        assert_eq!(doc["tags"], json!([{ "name": "users" }]));
    }

    #[test]
    fn test_declared_error_status_is_not_overridden() {
        let mut r = route(Method::GET, "/items", "items");
        r.query = Some(model(
            "ItemQuery",
            json!({ "type": "object", "properties": { "q": { "type": "string" } } }),
        ));
        r.responses = Some(ResponseSchemas::new().with_empty(422));
        let doc = build_document(&GateConfig::default(), &[r]);
        let op = &doc["paths"]["/items"]["get"];
        assert_eq!(op["responses"]["422"], json!({ "description": "Unprocessable Entity" }));
        assert_eq!(op["parameters"][0]["name"], "q");
        assert_eq!(op["parameters"][0]["in"], "query");
        assert!(doc["components"]["schemas"].get("ValidationError").is_none());
    }

    #[test]
    fn test_methods_share_a_path_item() {
        let doc = build_document(
            &GateConfig::default(),
            &[
                route(Method::GET, "/pets", "pets"),
                route(Method::POST, "/pets", "pets"),
            ],
        );
        let item = doc["paths"]["/pets"].as_object().unwrap();
        assert_eq!(item.len(), 2);
        assert_eq!(item["post"]["operationId"], "post_pets");
    }
}
