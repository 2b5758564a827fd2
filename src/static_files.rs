//! Files served from the documentation directory (`/docs`, `/openapi.yaml`).
//!
//! HTML files are rendered through `minijinja` when a context is given, so
//! the Swagger UI page can be pointed at the served OpenAPI document.

use minijinja::Environment;
use serde_json::Value as JsonValue;
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

#[derive(Debug, Clone)]
pub struct StaticFiles {
    base_dir: PathBuf,
}

impl StaticFiles {
    pub fn new<P: Into<PathBuf>>(base: P) -> Self {
        Self {
            base_dir: base.into(),
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Map a URL path under the base directory; `..` and absolute paths are refused
    fn map_path(&self, url_path: &str) -> Option<PathBuf> {
        let mut pb = self.base_dir.clone();
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
            "yaml" | "yml" => "text/yaml",
            "txt" => "text/plain",
            _ => "application/octet-stream",
        }
    }

    /// Read `url_path`, rendering HTML with `ctx` when one is given.
    ///
    /// Returns the bytes and their content type.
    pub fn load(
        &self,
        url_path: &str,
        ctx: Option<&JsonValue>,
    ) -> io::Result<(Vec<u8>, &'static str)> {
        let path = self
            .map_path(url_path)
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "invalid path"))?;
        if !path.is_file() {
            return Err(io::Error::new(io::ErrorKind::NotFound, "file not found"));
        }
        let content_type = Self::content_type(&path);
        match ctx {
            Some(ctx) if content_type == "text/html" => {
                let source = fs::read_to_string(&path)?;
                let rendered = render(&source, ctx).map_err(io::Error::other)?;
                Ok((rendered.into_bytes(), content_type))
            }
            _ => Ok((fs::read(&path)?, content_type)),
        }
    }
}

fn render(source: &str, ctx: &JsonValue) -> Result<String, minijinja::Error> {
    let mut env = Environment::new();
    env.add_template("page", source)?;
    env.get_template("page")?.render(ctx)
}
