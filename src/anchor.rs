//! Anchor generation, group/version/kind badges and fragment file names.

use crate::model::{Definition, Operation, ResourceCategory};
use crate::types::{Anchor, FragmentName};

/// Derive a URL-fragment-safe anchor from a composite display string.
///
/// Lowercases, keeps alphanumerics and dots, collapses every other run of
/// characters into a single hyphen and trims hyphens from both ends. Callers
/// pass the full "name version group" composite so identically named kinds
/// from different groups or versions stay distinct.
///
/// # Example
///
/// ```
/// use apiref::make_anchor;
///
/// assert_eq!(make_anchor("Pod v1 Core").as_str(), "pod-v1-core");
/// assert_eq!(make_anchor("Pod v1 Apps").as_str(), "pod-v1-apps");
/// assert_eq!(make_anchor("Write Operations").as_str(), "write-operations");
/// ```
pub fn make_anchor(composite: &str) -> Anchor {
    let mut result = String::with_capacity(composite.len());
    let mut last_was_hyphen = true; // skips leading separators

    for c in composite.chars() {
        if c.is_alphanumeric() || c == '.' {
            result.extend(c.to_lowercase());
            last_was_hyphen = false;
        } else if !last_was_hyphen {
            result.push('-');
            last_was_hyphen = true;
        }
    }

    if result.ends_with('-') {
        result.pop();
    }

    Anchor::new(result)
}

/// Render the kind/version/group badge used as a TOC and heading title.
///
/// Falls back to a plain label of the non-empty parts when any part is
/// missing.
pub fn gvk_badge(group: &str, version: &str, kind: &str) -> String {
    if group.is_empty() || version.is_empty() || kind.is_empty() {
        return [kind, version, group]
            .iter()
            .filter(|part| !part.is_empty())
            .map(|part| html_escape(part))
            .collect::<Vec<_>>()
            .join(" ");
    }

    format!(
        r#"<span class="gvk"><span class="k">{}</span> <span class="v">{}</span> <span class="g">{}</span></span>"#,
        html_escape(kind),
        html_escape(version),
        html_escape(group)
    )
}

pub(crate) fn html_escape(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#x27;"),
            _ => result.push(c),
        }
    }
    result
}

// Every naming function below carries its own prefix, so names from
// different entity categories cannot coincide.

/// Fragment file of a standalone definition.
pub fn definition_file_name(definition: &Definition) -> FragmentName {
    FragmentName::new(format!("_definition_{}.html", definition.anchor()))
}

/// Fragment file of a resource (concept) page.
pub fn concept_file_name(definition: &Definition) -> FragmentName {
    FragmentName::new(format!("_concept_{}.html", definition.anchor()))
}

/// Fragment file of a standalone operation.
pub fn operation_file_name(operation: &Operation) -> FragmentName {
    FragmentName::new(format!("_operation_{}.html", make_anchor(&operation.id)))
}

/// Fragment file of a resource category heading.
pub fn category_file_name(category: &ResourceCategory) -> FragmentName {
    FragmentName::new(format!("_category_{}.html", make_anchor(&category.include)))
}
