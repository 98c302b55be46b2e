//! YAML route manifest read by `specgate spec`.
//!
//! ```yaml
//! routes:
//!   - rule: /users/<int(min=1):id>
//!     endpoint: get_user
//!     methods: [GET]
//!     summary: Fetch one user
//!     tags: [users]
//!     query:
//!       name: UserQuery
//!       schema: { type: object, properties: { expand: { type: boolean } } }
//!     responses:
//!       200:
//!         name: User
//!         schema: { type: object, required: [id] }
//!       404: ~
//! ```

use crate::dispatcher::{handler, Endpoint};
use crate::gate::SpecGate;
use crate::router::App;
use crate::schema::{JsonSchemaModel, SchemaRef};
use crate::server::HandlerResponse;
use crate::spec::{RequestBody, ResponseSchemas};
use anyhow::{Context, Result};
use http::Method;
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RouteManifest {
    pub routes: Vec<ManifestRoute>,
}

/// A named JSON Schema.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ManifestModel {
    pub name: String,
    pub schema: Value,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ManifestBody {
    #[serde(default = "json_content_type")]
    pub content_type: String,
    #[serde(default)]
    pub model: Option<ManifestModel>,
}

fn json_content_type() -> String {
    "application/json".to_string()
}

fn default_methods() -> Vec<String> {
    vec!["GET".to_string()]
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ManifestRoute {
    pub rule: String,
    /// Defaults to the rule with every non-alphanumeric run replaced by `_`.
    #[serde(default)]
    pub endpoint: Option<String>,
    #[serde(default = "default_methods")]
    pub methods: Vec<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub query: Option<ManifestModel>,
    #[serde(default)]
    pub body: Option<ManifestBody>,
    #[serde(default)]
    pub headers: Option<ManifestModel>,
    #[serde(default)]
    pub cookies: Option<ManifestModel>,
    #[serde(default)]
    pub responses: BTreeMap<u16, Option<ManifestModel>>,
}

impl RouteManifest {
    pub fn from_yaml_str(text: &str) -> Result<Self> {
        let de = serde_yaml::Deserializer::from_str(text);
        serde_path_to_error::deserialize(de).map_err(|err| {
            let path = err.path().to_string();
            anyhow::Error::new(err.into_inner()).context(format!("invalid manifest at `{path}`"))
        })
    }

    pub fn from_yaml_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read manifest {}", path.display()))?;
        Self::from_yaml_str(&text).with_context(|| format!("in {}", path.display()))
    }

    /// Route table with one validated placeholder handler per manifest route.
    ///
    /// Placeholders answer `501`; the table exists to be enumerated.
    pub fn into_app(self, gate: &SpecGate) -> Result<App> {
        let mut app = App::new();
        for route in self.routes {
            let endpoint_name = route
                .endpoint
                .clone()
                .unwrap_or_else(|| endpoint_from_rule(&route.rule));
            let methods = route
                .methods
                .iter()
                .map(|m| {
                    Method::from_bytes(m.to_uppercase().as_bytes())
                        .with_context(|| format!("invalid method `{m}` for {}", route.rule))
                })
                .collect::<Result<Vec<_>>>()?;
            let endpoint = route.endpoint_spec()?;
            let placeholder = handler(|_req| Ok(HandlerResponse::error(501, "Not Implemented")));
            app.add_url_rule(
                &route.rule,
                &endpoint_name,
                &methods,
                Arc::new(gate.validate(endpoint, placeholder)),
            )
            .with_context(|| format!("failed to register {}", route.rule))?;
        }
        Ok(app)
    }
}

impl ManifestRoute {
    fn endpoint_spec(&self) -> Result<Endpoint> {
        let mut endpoint = Endpoint::new();
        if let Some(query) = &self.query {
            endpoint = endpoint.query(compile(query)?);
        }
        if let Some(body) = &self.body {
            let model = body.model.as_ref().map(compile).transpose()?;
            endpoint = endpoint.body(RequestBody::new(model, body.content_type.clone()));
        }
        if let Some(headers) = &self.headers {
            endpoint = endpoint.headers(compile(headers)?);
        }
        if let Some(cookies) = &self.cookies {
            endpoint = endpoint.cookies(compile(cookies)?);
        }
        if !self.responses.is_empty() {
            let mut responses = ResponseSchemas::new();
            for (code, model) in &self.responses {
                responses = match model {
                    Some(model) => responses.with(*code, compile(model)?),
                    None => responses.with_empty(*code),
                };
            }
            endpoint = endpoint.responses(responses);
        }
        if let Some(summary) = &self.summary {
            endpoint = endpoint.summary(summary.clone());
        }
        if let Some(description) = &self.description {
            endpoint = endpoint.description(description.clone());
        }
        for tag in &self.tags {
            endpoint = endpoint.tag(tag.clone());
        }
        Ok(endpoint)
    }
}

fn compile(model: &ManifestModel) -> Result<SchemaRef> {
    let compiled = JsonSchemaModel::new(model.name.clone(), model.schema.clone())?;
    Ok(Arc::new(compiled))
}

fn endpoint_from_rule(rule: &str) -> String {
    let mut name = String::with_capacity(rule.len());
    for c in rule.chars() {
        if c.is_ascii_alphanumeric() {
            name.push(c);
        } else if !name.is_empty() && !name.ends_with('_') {
            name.push('_');
        }
    }
    let trimmed = name.trim_end_matches('_');
    if trimmed.is_empty() {
        "root".to_string()
    } else {
        trimmed.to_string()
    }
}
