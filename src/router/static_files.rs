use crate::dispatcher::Handler;
use crate::server::{HandlerResponse, HttpRequest};
use serde_json::Value;
use std::fs;
use std::path::{Component, Path, PathBuf};
use tracing::debug;

/// Endpoint name of the built-in static file rule.
pub const STATIC_ENDPOINT: &str = "static";

/// Serves files below a base directory for the built-in `/static/<path:filename>` rule.
///
/// Without a directory every request is answered with `404`.
#[derive(Debug, Clone, Default)]
pub struct StaticFiles {
    base_dir: Option<PathBuf>,
}

impl StaticFiles {
    pub fn new<P: Into<PathBuf>>(base: Option<P>) -> Self {
        Self {
            base_dir: base.map(Into::into),
        }
    }

    fn map_path(&self, url_path: &str) -> Option<PathBuf> {
        let mut pb = self.base_dir.clone()?;
        for comp in Path::new(url_path.trim_start_matches('/')).components() {
            match comp {
                Component::Normal(s) => pb.push(s),
                Component::CurDir => {}
                _ => return None,
            }
        }
        Some(pb)
    }

    fn content_type(path: &Path) -> &'static str {
        match path
            .extension()
            .and_then(|s| s.to_str())
            .unwrap_or("")
            .to_lowercase()
            .as_str()
        {
            "html" => "text/html",
            "css" => "text/css",
            "js" => "application/javascript",
            "json" => "application/json",
            "txt" => "text/plain",
            _ => "application/octet-stream",
        }
    }
}

impl Handler for StaticFiles {
    fn call(&self, req: &mut HttpRequest) -> anyhow::Result<HandlerResponse> {
        let filename = req.get_path_param("filename").unwrap_or_default();
        let Some(path) = self.map_path(filename).filter(|p| p.is_file()) else {
            debug!(filename = %filename, "Static file not found");
            return Ok(HandlerResponse::error(404, "Not Found"));
        };
        let bytes = fs::read(&path)?;
        let content_type = Self::content_type(&path);
        let body = if content_type == "application/json" {
            serde_json::from_slice(&bytes)?
        } else {
            Value::String(String::from_utf8_lossy(&bytes).into_owned())
        };
        let mut resp = HandlerResponse::json(200, body);
        resp.set_header("content-type", content_type.to_string());
        Ok(resp)
    }
}
