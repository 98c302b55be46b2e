use super::core::{App, Rule, STATIC_RULE};
use crate::config::GateConfig;
use crate::dispatcher::HandlerRef;
use crate::path::{PathSpec, PathTranslator, TranslateError};
use http::Method;
use tracing::debug;

/// One documented (rule, method, handler) triple with its translated path.
#[derive(Clone)]
pub struct EnumeratedRoute {
    pub rule: String,
    pub method: Method,
    pub endpoint: String,
    pub handler: HandlerRef,
    pub path: PathSpec,
}

impl std::fmt::Debug for EnumeratedRoute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EnumeratedRoute")
            .field("rule", &self.rule)
            .field("method", &self.method)
            .field("endpoint", &self.endpoint)
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

/// Walks a route table and yields the routes that belong in the document.
///
/// Rules under the documentation prefix or the static prefix are skipped, as is the
/// built-in static rule wherever the static prefix points. `HEAD` and `OPTIONS` are
/// never yielded.
#[derive(Debug, Clone)]
pub struct RouteEnumerator {
    doc_prefix: String,
    static_prefix: String,
}

impl RouteEnumerator {
    /// `doc_path` is the documentation mount without slashes (`apidoc`); `static_prefix`
    /// is a path prefix (`/static`).
    pub fn new(doc_path: &str, static_prefix: &str) -> Self {
        Self {
            doc_prefix: format!("/{}", doc_path.trim_matches('/')),
            static_prefix: static_prefix.to_string(),
        }
    }

    #[must_use]
    pub fn from_config(config: &GateConfig) -> Self {
        Self::new(&config.doc_path, &config.static_path)
    }

    /// Methods that are answered by the route table itself and never documented.
    #[must_use]
    pub fn bypass(method: &Method) -> bool {
        *method == Method::HEAD || *method == Method::OPTIONS
    }

    /// True when `rule` is mounted under the documentation or static prefix, or is the
    /// built-in static rule.
    #[must_use]
    pub fn is_excluded(&self, rule: &str) -> bool {
        rule == STATIC_RULE
            || rule.starts_with(&self.doc_prefix)
            || rule.starts_with(&self.static_prefix)
    }

    /// Documented rules with their documented methods, sorted by rule then method.
    pub fn find_routes<'a>(&self, app: &'a App) -> Vec<(&'a Rule, Method)> {
        let mut found: Vec<(&Rule, Method)> = app
            .rules()
            .iter()
            .filter(|rule| {
                let excluded = self.is_excluded(&rule.rule);
                if excluded {
                    debug!(rule = %rule.rule, "Rule excluded from document");
                }
                !excluded
            })
            .flat_map(|rule| {
                rule.methods
                    .iter()
                    .filter(|m| !Self::bypass(m))
                    .map(move |m| (rule, m.clone()))
            })
            .collect();
        found.sort_by(|(a, am), (b, bm)| {
            a.rule
                .cmp(&b.rule)
                .then_with(|| am.as_str().cmp(bm.as_str()))
        });
        found
    }

    /// Every documented route with its bound handler and translated path.
    ///
    /// Rules whose endpoint has no handler are skipped.
    pub fn enumerate(
        &self,
        app: &App,
        translator: &PathTranslator,
    ) -> Result<Vec<EnumeratedRoute>, TranslateError> {
        let mut routes = Vec::new();
        for (rule, method) in self.find_routes(app) {
            let Some(handler) = app.view_function(&rule.endpoint) else {
                debug!(rule = %rule.rule, endpoint = %rule.endpoint, "Rule has no handler");
                continue;
            };
            routes.push(EnumeratedRoute {
                rule: rule.rule.clone(),
                method,
                endpoint: rule.endpoint.clone(),
                handler: HandlerRef::clone(handler),
                path: translator.translate(&rule.rule)?,
            });
        }
        Ok(routes)
    }
}

impl Default for RouteEnumerator {
    fn default() -> Self {
        Self::from_config(&GateConfig::default())
    }
}
