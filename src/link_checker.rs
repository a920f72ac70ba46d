//! In-page link checking for the assembled document
//!
//! Every `href="#..."` must point at an element `id` present in the page.
//! Fragments are rendered independently, so this is the one place a stale
//! cross-reference (or a nav entry whose fragment went missing) becomes
//! visible.

use regex::Regex;
use std::collections::{BTreeSet, HashSet};
use std::sync::LazyLock;

/// An in-page link whose target doesn't exist
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct BrokenAnchor {
    /// The href value, including the leading `#`
    pub href: String,
}

/// Regex to extract fragment-only href attributes
static FRAGMENT_HREF_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"href=["']#([^"']*)["']"#).unwrap());

/// Regex to extract element ids
static ID_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"\sid=["']([^"']+)["']"#).unwrap());

/// Find fragment links in `html` whose target is not an element id in the
/// same document. Each broken target is reported once, in sorted order.
pub fn check_anchors(html: &str) -> Vec<BrokenAnchor> {
    let ids: HashSet<&str> = ID_REGEX
        .captures_iter(html)
        .filter_map(|cap| cap.get(1))
        .map(|m| m.as_str())
        .collect();

    let mut broken = BTreeSet::new();
    for cap in FRAGMENT_HREF_REGEX.captures_iter(html) {
        let target = &cap[1];
        if target.is_empty() {
            // bare "#" links to the top of the page
            continue;
        }
        if ids.contains(target) {
            continue;
        }
        broken.insert(BrokenAnchor {
            href: format!("#{target}"),
        });
    }

    broken.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nav_link_without_target() {
        let html = r##"<nav><a href="#pod-v1-core">Pod</a></nav><main></main>"##;
        assert_eq!(check_anchors(html).len(), 1);
    }

    #[test]
    fn test_element_id_ok() {
        let html = r##"<div id="create-pod-v1-core"></div><a href="#create-pod-v1-core">Create</a>"##;
        assert!(check_anchors(html).is_empty());
    }

    #[test]
    fn test_reports_each_broken_target_once() {
        let html = r##"
            <a href="#missing">one</a>
            <a href='#missing'>two</a>
            <a href="#also-missing">three</a>
            <a href="#">top</a>
            <a href="https://example.com/#frag">external</a>
        "##;
        let broken = check_anchors(html);
        assert_eq!(
            broken,
            vec![
                BrokenAnchor {
                    href: "#also-missing".into()
                },
                BrokenAnchor {
                    href: "#missing".into()
                },
            ]
        );
    }
}
