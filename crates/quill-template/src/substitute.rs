//! `%name%` placeholder substitution

use std::collections::BTreeMap;

/// Token a variable is written as in a template
pub fn placeholder(name: &str) -> String {
    format!("%{}%", name)
}

/// Replace every `%name%` for each known variable; unknown tokens pass through
pub fn substitute(template: &str, variables: &BTreeMap<String, String>) -> String {
    let mut rendered = template.to_string();
    for (name, value) in variables {
        rendered = rendered.replace(&placeholder(name), value);
    }
    rendered
}
