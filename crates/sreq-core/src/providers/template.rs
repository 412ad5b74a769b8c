//! Key path templates
//!
//! Templates name their variables in braces, e.g.
//! `services/{service}/{env}/base_url`. Common names are `service`, `env`,
//! `region` and `project`, but any name works.

use std::collections::HashMap;

/// Substitute `{name}` placeholders with values from `vars`
///
/// Placeholders without a matching variable are left as they are.
/// Substitution is a single pass, so values are never re-expanded.
pub fn resolve_path(template: &str, vars: &HashMap<String, String>) -> String {
    if vars.is_empty() {
        return template.to_string();
    }

    let mut resolved = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        resolved.push_str(&rest[..open]);
        let candidate = &rest[open..];

        let Some(close) = candidate.find('}') else {
            resolved.push_str(candidate);
            return resolved;
        };

        let name = &candidate[1..close];
        if name.contains('{') {
            // Stray opening brace; emit it and rescan from the next one
            resolved.push('{');
            rest = &candidate[1..];
            continue;
        }

        match vars.get(name) {
            Some(value) => resolved.push_str(value),
            None => resolved.push_str(&candidate[..=close]),
        }
        rest = &candidate[close + 1..];
    }

    resolved.push_str(rest);
    resolved
}

/// Resolve a template with just `{service}` and `{env}`
pub fn resolve_path_simple(template: &str, service: &str, env: &str) -> String {
    let vars = HashMap::from([
        ("service".to_string(), service.to_string()),
        ("env".to_string(), env.to_string()),
    ]);
    resolve_path(template, &vars)
}
