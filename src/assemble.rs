//! Document assembly
//!
//! Walks the finished TOC depth-first and concatenates the fragment of every
//! node that has one. The walk order is the document order.
//!
//! A fragment that can't be read is logged and skipped: one missing section
//! shouldn't keep the rest of the reference from being generated.

use crate::toc::Toc;
use crate::types::FragmentName;
use camino::Utf8Path;
use std::fs;

/// Concatenated body plus a record of what went into it.
#[derive(Debug, Default, Clone)]
pub struct Assembly {
    pub content: String,
    pub collected: Vec<FragmentName>,
    pub missing: Vec<FragmentName>,
}

/// Concatenate all fragments referenced by `toc`, reading from `includes_dir`.
pub fn assemble(toc: &Toc, includes_dir: &Utf8Path) -> Assembly {
    let mut assembly = Assembly::default();

    for node in toc.walk() {
        let Some(file) = &node.file else {
            continue;
        };
        let path = includes_dir.join(file.as_str());
        match fs::read_to_string(&path) {
            Ok(fragment) => {
                assembly.content.push_str(&fragment);
                assembly.collected.push(file.clone());
                tracing::info!("collecting {file}: ok");
            }
            Err(e) => {
                tracing::warn!("collecting {file}: not found ({e})");
                assembly.missing.push(file.clone());
            }
        }
    }

    assembly
}

/// Release branch tag for a spec version: "v1.29.3" -> "release-1.29".
///
/// Takes everything before the last `.` and drops the leading character.
/// Returns `None` when the version has no `.` or nothing is left.
pub fn release_tag(spec_version: &str) -> Option<String> {
    let pos = spec_version.rfind('.')?;
    let mut chars = spec_version[..pos].chars();
    chars.next()?;
    let rest = chars.as_str();
    if rest.is_empty() {
        return None;
    }
    Some(format!("release-{rest}"))
}

/// Link to the OpenAPI document of the matching upstream release.
pub fn spec_link(spec_version: &str) -> Option<String> {
    release_tag(spec_version).map(|release| {
        format!(
            "https://github.com/kubernetes/kubernetes/blob/{release}/api/openapi-spec/swagger.json"
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::toc::{TocKind, TocNode};
    use crate::types::Anchor;

    fn node(level: u8, name: &str, kind: TocKind) -> TocNode {
        TocNode::new(level, name, Anchor::new(name), kind)
            .with_file(FragmentName::new(format!("{name}.html")))
    }

    #[test]
    fn test_release_tag() {
        assert_eq!(release_tag("v1.29.3").as_deref(), Some("release-1.29"));
        assert_eq!(release_tag("v1.30.0-alpha.1").as_deref(), Some("release-1.30.0-alpha"));
        assert_eq!(release_tag("v1"), None);
        assert_eq!(release_tag("v.1"), None);
        assert_eq!(release_tag(""), None);
    }

    #[test]
    fn test_spec_link() {
        assert_eq!(
            spec_link("v1.29.3").as_deref(),
            Some("https://github.com/kubernetes/kubernetes/blob/release-1.29/api/openapi-spec/swagger.json")
        );
    }

    #[test]
    fn test_assembles_in_toc_order_and_skips_structural_nodes() {
        let dir = tempfile::tempdir().unwrap();
        let includes = Utf8Path::from_path(dir.path()).unwrap();
        for name in ["b-section", "a-child", "c-grandchild", "z-section"] {
            fs::write(includes.join(format!("{name}.html")), format!("[{name}]")).unwrap();
        }

        let mut toc = Toc::new("Doc");
        toc.open_section(node(1, "b-section", TocKind::Section)).unwrap();
        let child = toc.attach(None, node(2, "a-child", TocKind::Resource), "resource").unwrap();
        let outline = toc
            .attach_to(child, TocNode::new(3, "outline", Anchor::new("outline"), TocKind::Outline))
            .unwrap();
        // deeper than sections -> children -> grandchildren
        toc.attach_to(outline, node(4, "c-grandchild", TocKind::Outline)).unwrap();
        toc.open_section(node(1, "z-section", TocKind::Section)).unwrap();

        let assembly = assemble(&toc, includes);
        assert_eq!(assembly.content, "[b-section][a-child][c-grandchild][z-section]");
        assert_eq!(assembly.collected.len(), 4);
        assert!(assembly.missing.is_empty());
    }

    #[test]
    fn test_missing_fragment_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let includes = Utf8Path::from_path(dir.path()).unwrap();
        fs::write(includes.join("first.html"), "[first]").unwrap();
        fs::write(includes.join("third.html"), "[third]").unwrap();

        let mut toc = Toc::new("Doc");
        toc.open_section(node(1, "first", TocKind::Section)).unwrap();
        toc.attach(None, node(2, "second", TocKind::Definition), "definition").unwrap();
        toc.open_section(node(1, "third", TocKind::Section)).unwrap();

        let assembly = assemble(&toc, includes);
        assert_eq!(assembly.content, "[first][third]");
        assert_eq!(assembly.missing, vec![FragmentName::new("second.html")]);
    }
}
