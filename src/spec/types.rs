use http::Method;
use serde_json::Value;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParameterLocation {
    Path,
    Query,
    Header,
    Cookie,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParameterStyle {
    Matrix,
    Label,
    Form,
    Simple,
    SpaceDelimited,
    PipeDelimited,
    DeepObject,
}

impl From<oas3::spec::ParameterStyle> for ParameterStyle {
    fn from(style: oas3::spec::ParameterStyle) -> Self {
        use oas3::spec::ParameterStyle as PS;
        match style {
            PS::Matrix => ParameterStyle::Matrix,
            PS::Label => ParameterStyle::Label,
            PS::Form => ParameterStyle::Form,
            PS::Simple => ParameterStyle::Simple,
            PS::SpaceDelimited => ParameterStyle::SpaceDelimited,
            PS::PipeDelimited => ParameterStyle::PipeDelimited,
            PS::DeepObject => ParameterStyle::DeepObject,
        }
    }
}

impl std::fmt::Display for ParameterLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParameterLocation::Path => write!(f, "Path"),
            ParameterLocation::Query => write!(f, "Query"),
            ParameterLocation::Header => write!(f, "Header"),
            ParameterLocation::Cookie => write!(f, "Cookie"),
        }
    }
}

impl From<oas3::spec::ParameterIn> for ParameterLocation {
    fn from(loc: oas3::spec::ParameterIn) -> Self {
        match loc {
            oas3::spec::ParameterIn::Path => ParameterLocation::Path,
            oas3::spec::ParameterIn::Query => ParameterLocation::Query,
            oas3::spec::ParameterIn::Header => ParameterLocation::Header,
            oas3::spec::ParameterIn::Cookie => ParameterLocation::Cookie,
        }
    }
}

/// Everything the router and dispatcher need to know about one operation
#[derive(Debug, Clone)]
pub struct RouteMeta {
    pub method: Method,
    pub path_pattern: Arc<str>,
    pub handler_name: Arc<str>,
    pub parameters: Vec<ParameterMeta>,
    pub summary: Option<String>,
    /// Path prefix taken from the first `servers` entry, empty when absent
    pub base_path: String,
}

impl RouteMeta {
    /// Declared parameters in `location`
    pub fn parameters_in(&self, location: ParameterLocation) -> impl Iterator<Item = &ParameterMeta> {
        self.parameters.iter().filter(move |p| p.location == location)
    }
}

#[derive(Debug, Clone)]
pub struct ParameterMeta {
    pub name: String,
    pub location: ParameterLocation,
    pub required: bool,
    pub schema: Option<Value>,
    pub style: Option<ParameterStyle>,
    pub explode: Option<bool>,
}
