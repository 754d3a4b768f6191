//! Route resolver - composes an endpoint's route from controller and method metadata.

use crate::symbols::unquote;
use log::debug;

const CONTROLLER_PLACEHOLDER: &str = "[controller]";
const ACTION_PLACEHOLDER: &str = "[action]";

/// Compute the effective route of an endpoint.
///
/// * `controller_route` - the controller's `[Route]` template (quotes tolerated)
/// * `endpoint_route` - the method's own `[Route]` argument, raw as captured
/// * `verb_path` - the positional argument of the HTTP verb attribute, raw as captured
///
/// An explicit method route is returned verbatim. Otherwise the controller template is
/// expanded segment by segment (`[controller]` becomes the controller name without its
/// `Controller` suffix, `[action]` the method name), then the verb sub-path is appended.
/// A template that yields nothing produces an empty route.
pub fn resolve_route(
    controller_route: &str,
    endpoint_route: Option<&str>,
    verb_path: Option<&str>,
    controller_name: &str,
    method_name: &str,
) -> String {
    if let Some(route) = endpoint_route.filter(|r| !r.trim().is_empty()) {
        debug!("Using explicit route {} for {}", route, method_name);
        return route.to_string();
    }

    let template = unquote(controller_route);
    let resource = controller_name
        .strip_suffix("Controller")
        .filter(|s| !s.is_empty())
        .unwrap_or(controller_name);

    let mut route = String::new();
    for segment in template.split('/').map(str::trim).filter(|s| !s.is_empty()) {
        let expanded = segment
            .replace(CONTROLLER_PLACEHOLDER, resource)
            .replace(ACTION_PLACEHOLDER, method_name);
        route.push('/');
        route.push_str(&expanded);
    }

    let sub_path = verb_path.map(unquote).unwrap_or_default();
    let sub_path = sub_path.trim_matches('/');
    if !sub_path.is_empty() {
        route.push('/');
        route.push_str(sub_path);
    }

    route
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_controller_and_action_placeholders() {
        let route = resolve_route("[controller]/[action]", None, None, "OrdersController", "List");
        assert_eq!(route, "/Orders/List");
    }

    #[test]
    fn test_quoted_template() {
        let route = resolve_route("\"api/[controller]\"", None, None, "OrdersController", "List");
        assert_eq!(route, "/api/Orders");
    }

    #[test]
    fn test_explicit_route_is_verbatim() {
        let route = resolve_route(
            "[controller]/[action]",
            Some("\"api/orders/recent\""),
            Some("\"{id}\""),
            "OrdersController",
            "Recent",
        );
        assert_eq!(route, "\"api/orders/recent\"");
    }

    #[test]
    fn test_verb_sub_path_appended() {
        let route = resolve_route("api/[controller]", None, Some("\"{id}\""), "OrdersController", "Get");
        assert_eq!(route, "/api/Orders/{id}");
    }

    #[test]
    fn test_controller_without_suffix() {
        let route = resolve_route("[controller]", None, None, "Health", "Ping");
        assert_eq!(route, "/Health");
    }

    #[test]
    fn test_nothing_resolves_to_empty() {
        assert_eq!(resolve_route("", None, None, "OrdersController", "List"), "");
        assert_eq!(resolve_route("", Some("  "), Some("\"\""), "OrdersController", "List"), "");
    }

    #[test]
    fn test_only_verb_path() {
        assert_eq!(resolve_route("", None, Some("\"status\""), "OrdersController", "Status"), "/status");
    }
}
