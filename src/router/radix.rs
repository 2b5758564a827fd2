//! Radix tree for route matching.
//!
//! Paths are split into segments; static segments match exactly, `{name}`
//! segments match any single segment. Static children are tried before
//! parameter children, so `/locale/{locale}` never shadows a static sibling.
//! Lookup cost grows with the number of segments, not the number of routes.

use http::Method;
use std::collections::HashMap;
use std::sync::Arc;

use super::core::ParamVec;
use crate::spec::RouteMeta;

#[derive(Clone)]
struct RadixNode {
    segment: Arc<str>,
    routes: HashMap<Method, Arc<RouteMeta>>,
    /// Set on parameter nodes (`{id}` -> `id`)
    param_name: Option<Arc<str>>,
    children: Vec<RadixNode>,
    /// Routes may name the parameter at one position differently, so each
    /// distinct name gets its own child
    param_children: Vec<RadixNode>,
}

impl RadixNode {
    fn new(segment: &str) -> Self {
        Self {
            segment: Arc::from(segment),
            routes: HashMap::new(),
            param_name: None,
            children: Vec::new(),
            param_children: Vec::new(),
        }
    }

    fn new_param(param_name: &str) -> Self {
        Self {
            param_name: Some(Arc::from(param_name)),
            ..Self::new("")
        }
    }

    fn insert(&mut self, segments: &[&str], method: Method, route: Arc<RouteMeta>) {
        let Some((segment, remaining)) = segments.split_first() else {
            self.routes.insert(method, route);
            return;
        };

        if let Some(param_name) = segment.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
            let existing = self
                .param_children
                .iter_mut()
                .find(|c| c.param_name.as_deref() == Some(param_name));
            match existing {
                Some(child) => child.insert(remaining, method, route),
                None => {
                    let mut child = RadixNode::new_param(param_name);
                    child.insert(remaining, method, route);
                    self.param_children.push(child);
                }
            }
            return;
        }

        match self.children.iter_mut().find(|c| &*c.segment == *segment) {
            Some(child) => child.insert(remaining, method, route),
            None => {
                let mut child = RadixNode::new(segment);
                child.insert(remaining, method, route);
                self.children.push(child);
            }
        }
    }

    fn search(
        &self,
        segments: &[&str],
        method: &Method,
        params: &mut ParamVec,
    ) -> Option<Arc<RouteMeta>> {
        let Some((segment, remaining)) = segments.split_first() else {
            return self.routes.get(method).cloned();
        };

        for child in &self.children {
            if &*child.segment == *segment {
                if let Some(route) = child.search(remaining, method, params) {
                    return Some(route);
                }
            }
        }

        for param_child in &self.param_children {
            if let Some(param_name) = &param_child.param_name {
                let value = urlencoding::decode(segment)
                    .map(|v| v.into_owned())
                    .unwrap_or_else(|_| (*segment).to_string());
                params.push((Arc::clone(param_name), value));
                if let Some(route) = param_child.search(remaining, method, params) {
                    return Some(route);
                }
                params.pop();
            }
        }

        None
    }

    fn collect(&self, out: &mut Vec<Arc<RouteMeta>>) {
        out.extend(self.routes.values().cloned());
        for child in self.children.iter().chain(&self.param_children) {
            child.collect(out);
        }
    }
}

/// Radix-tree router keyed by method at each terminal node
#[derive(Clone)]
pub struct RadixRouter {
    root: RadixNode,
}

impl RadixRouter {
    /// Build the tree; `base_path` is prepended to every pattern
    pub fn new(routes: Vec<RouteMeta>, base_path: &str) -> Self {
        let mut root = RadixNode::new("");
        for route in routes {
            let full_path = format!("{}{}", base_path, route.path_pattern);
            let segments = split_path(&full_path);
            let method = route.method.clone();
            root.insert(&segments, method, Arc::new(route));
        }
        Self { root }
    }

    /// Match `path`; path parameter values come back percent-decoded
    pub fn route(&self, method: &Method, path: &str) -> Option<(Arc<RouteMeta>, ParamVec)> {
        let segments = split_path(path);
        let mut params = ParamVec::new();
        let route = self.root.search(&segments, method, &mut params)?;
        Some((route, params))
    }

    /// Every registered route, in no particular order
    pub fn routes(&self) -> Vec<Arc<RouteMeta>> {
        let mut out = Vec::new();
        self.root.collect(&mut out);
        out
    }
}

fn split_path(path: &str) -> Vec<&str> {
    path.trim_start_matches('/')
        .split('/')
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_route_meta(method: Method, path: &str, handler: &str) -> RouteMeta {
        RouteMeta {
            method,
            path_pattern: Arc::from(path),
            handler_name: Arc::from(handler),
            parameters: Vec::new(),
            summary: None,
            base_path: String::new(),
        }
    }

    fn param<'a>(params: &'a ParamVec, name: &str) -> Option<&'a str> {
        params
            .iter()
            .find(|(k, _)| k.as_ref() == name)
            .map(|(_, v)| v.as_str())
    }

    #[test]
    fn test_radix_router_simple_route() {
        let router = RadixRouter::new(
            vec![create_route_meta(Method::GET, "/locales", "list_locales")],
            "",
        );
        let (route, params) = router.route(&Method::GET, "/locales").unwrap();
        assert_eq!(&*route.handler_name, "list_locales");
        assert!(params.is_empty());
    }

    #[test]
    fn test_radix_router_multiple_parameters() {
        let router = RadixRouter::new(
            vec![create_route_meta(Method::GET, "/api/{locale}/{path}", "get_api")],
            "",
        );
        let (route, params) = router.route(&Method::GET, "/api/fr/person.firstName").unwrap();
        assert_eq!(&*route.handler_name, "get_api");
        assert_eq!(param(&params, "locale"), Some("fr"));
        assert_eq!(param(&params, "path"), Some("person.firstName"));
    }

    #[test]
    fn test_radix_router_decodes_parameters() {
        let router = RadixRouter::new(
            vec![create_route_meta(Method::GET, "/fake/{locale}/{pattern}", "fake_pattern")],
            "",
        );
        let (_, params) = router
            .route(&Method::GET, "/fake/en/%7B%7Bperson.firstName%7D%7D%20x")
            .unwrap();
        assert_eq!(param(&params, "pattern"), Some("{{person.firstName}} x"));
    }

    #[test]
    fn test_radix_router_method_filtering() {
        let router = RadixRouter::new(
            vec![create_route_meta(Method::GET, "/locales", "list_locales")],
            "",
        );
        assert!(router.route(&Method::POST, "/locales").is_none());
        assert!(router.route(&Method::GET, "/locales/extra").is_none());
    }

    #[test]
    fn test_static_before_param() {
        let routes = vec![
            create_route_meta(Method::GET, "/locale/{locale}", "get_locale"),
            create_route_meta(Method::GET, "/locale/default", "default_locale"),
        ];
        let router = RadixRouter::new(routes, "");
        let (route, _) = router.route(&Method::GET, "/locale/default").unwrap();
        assert_eq!(&*route.handler_name, "default_locale");
        let (route, _) = router.route(&Method::GET, "/locale/ja").unwrap();
        assert_eq!(&*route.handler_name, "get_locale");
    }

    #[test]
    fn test_different_param_names_same_position() {
        let routes = vec![
            create_route_meta(Method::GET, "/template/{locale}/{count}", "generate_template"),
            create_route_meta(Method::GET, "/template/{lang}/preview", "preview"),
        ];
        let router = RadixRouter::new(routes, "");
        let (route, params) = router.route(&Method::GET, "/template/en/preview").unwrap();
        assert_eq!(&*route.handler_name, "generate_template");
        assert_eq!(param(&params, "count"), Some("preview"));
        let (_, params) = router.route(&Method::GET, "/template/en/3").unwrap();
        assert_eq!(param(&params, "locale"), Some("en"));
        assert!(param(&params, "lang").is_none());
    }

    #[test]
    fn test_base_path_prefix() {
        let router = RadixRouter::new(
            vec![create_route_meta(Method::GET, "/locales", "list_locales")],
            "/v1",
        );
        assert!(router.route(&Method::GET, "/v1/locales").is_some());
        assert!(router.route(&Method::GET, "/locales").is_none());
        assert_eq!(router.routes().len(), 1);
    }
}
