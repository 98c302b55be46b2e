use super::types::{ParameterDescriptor, ParameterLocation, RouteSpec};
use crate::router::EnumeratedRoute;
use crate::schema::SchemaRef;
use serde_json::Value;

/// Build the [`RouteSpec`] for one enumerated route.
///
/// Models and documentation come from the handler's declared
/// [`Endpoint`](crate::dispatcher::Endpoint); handlers without one contribute only
/// their path parameters.
#[must_use]
pub fn build_route_spec(route: &EnumeratedRoute) -> RouteSpec {
    let endpoint = route.handler.endpoint();
    let request = endpoint.map(|e| &e.request);

    RouteSpec {
        method: route.method.clone(),
        path_pattern: route.rule.clone(),
        endpoint: route.endpoint.clone(),
        normalized_path: route.path.normalized.clone(),
        parameters: route.path.parameters.clone(),
        query: request.and_then(|r| r.query.clone()),
        body: request.and_then(|r| r.body.clone()),
        headers: request.and_then(|r| r.headers.clone()),
        cookies: request.and_then(|r| r.cookies.clone()),
        responses: endpoint.and_then(|e| e.responses.clone()),
        summary: endpoint.and_then(|e| e.summary.clone()),
        description: endpoint.and_then(|e| e.description.clone()),
        tags: endpoint.map(|e| e.tags.clone()).unwrap_or_default(),
    }
}

/// One parameter per property of `model`, required when listed in its `required`.
///
/// Property order follows the schema; models without `properties` yield nothing.
#[must_use]
pub fn extract_parameters(model: &SchemaRef, location: ParameterLocation) -> Vec<ParameterDescriptor> {
    let described = model.describe();
    let Some(properties) = described.get("properties").and_then(Value::as_object) else {
        return Vec::new();
    };
    let required: Vec<&str> = described
        .get("required")
        .and_then(Value::as_array)
        .map(|names| names.iter().filter_map(Value::as_str).collect())
        .unwrap_or_default();

    properties
        .iter()
        .map(|(name, schema)| {
            let mut schema = schema.clone();
            let description = schema
                .as_object_mut()
                .and_then(|obj| obj.remove("description"))
                .and_then(|d| d.as_str().map(str::to_string));
            ParameterDescriptor {
                name: name.clone(),
                location,
                required: required.contains(&name.as_str()),
                schema,
                description,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatcher::{handler, Endpoint, Pipeline, ValidatedHandler};
    use crate::path::PathTranslator;
    use crate::schema::JsonSchemaModel;
    use http::Method;
    use serde_json::json;
    use std::sync::Arc;

    fn paging() -> SchemaRef {
        Arc::new(
            JsonSchemaModel::new(
                "Paging",
                json!({
                    "type": "object",
                    "properties": {
                        "limit": { "type": "integer", "description": "Page size" },
                        "cursor": { "type": "string" }
                    },
                    "required": ["limit"]
                }),
            )
            .unwrap(),
        )
    }

    #[test]
    fn test_extract_parameters_follows_required() {
        let params = extract_parameters(&paging(), ParameterLocation::Query);
        assert_eq!(params.len(), 2);
        let limit = params.iter().find(|p| p.name == "limit").unwrap();
        assert!(limit.required);
        assert_eq!(limit.description.as_deref(), Some("Page size"));
        assert_eq!(limit.schema, json!({ "type": "integer" }));
        let cursor = params.iter().find(|p| p.name == "cursor").unwrap();
        assert!(!cursor.required);
        assert_eq!(cursor.location, ParameterLocation::Query);
    }

    #[test]
    fn test_route_spec_from_endpoint() {
        let validated = ValidatedHandler::new(
            Endpoint::new().query(paging()).summary("List users").tag("users"),
            Arc::new(handler(|_req| Ok(json!([])))),
            Arc::new(Pipeline::default()),
        );
        let route = EnumeratedRoute {
            rule: "/orgs/<int:org>/users".to_string(),
            method: Method::GET,
            endpoint: "list_users".to_string(),
            handler: Arc::new(validated),
            path: PathTranslator::new().translate("/orgs/<int:org>/users").unwrap(),
        };
        let spec = build_route_spec(&route);
        assert_eq!(spec.normalized_path, "/orgs/{org}/users");
        assert_eq!(spec.operation_id(), "get_list_users");
        assert_eq!(spec.parameters.len(), 1);
        assert!(spec.validates_request());
        assert_eq!(spec.summary.as_deref(), Some("List users"));
        assert_eq!(spec.tags, vec!["users"]);
    }

    #[test]
    fn test_route_spec_without_endpoint() {
        let route = EnumeratedRoute {
            rule: "/health".to_string(),
            method: Method::GET,
            endpoint: "health".to_string(),
            handler: Arc::new(handler(|_req| Ok("ok"))),
            path: PathTranslator::new().translate("/health").unwrap(),
        };
        let spec = build_route_spec(&route);
        assert!(!spec.validates_request());
        assert!(spec.responses.is_none());
        assert!(spec.tags.is_empty());
    }
}
