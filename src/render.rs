//! Template rendering context
//!
//! A [`Renderer`] is built once at startup from the built-in templates,
//! optionally overlaid with templates from a directory, and then shared by
//! reference with everything that renders markup. It never changes after
//! construction.

use crate::{Error, Result};
use camino::Utf8Path;
use minijinja::{Environment, UndefinedBehavior};
use serde::Serialize;
use std::fs;

/// Templates compiled into the binary, keyed by name.
const BUILTIN_TEMPLATES: &[(&str, &str)] = &[
    ("api-groups.html", include_str!("../templates/api-groups.html")),
    ("definition.html", include_str!("../templates/definition.html")),
    ("index.html", include_str!("../templates/index.html")),
    ("operation.html", include_str!("../templates/operation.html")),
    (
        "operation-body.html",
        include_str!("../templates/operation-body.html"),
    ),
    ("resource.html", include_str!("../templates/resource.html")),
    (
        "resource-category-heading.html",
        include_str!("../templates/resource-category-heading.html"),
    ),
    ("section-heading.html", include_str!("../templates/section-heading.html")),
];

/// Immutable template environment.
pub struct Renderer {
    env: Environment<'static>,
}

impl Renderer {
    /// Build a renderer from the built-in templates only.
    pub fn new() -> Result<Self> {
        let mut env = Environment::new();
        // A field missing from the data is a template/data mismatch, not an
        // empty string.
        env.set_undefined_behavior(UndefinedBehavior::Strict);
        for &(name, source) in BUILTIN_TEMPLATES {
            env.add_template(name, source)?;
        }
        Ok(Self { env })
    }

    /// Build a renderer whose built-ins are replaced by any `.html` file of
    /// the same (or a new) name found in `dir`.
    pub fn with_overrides(dir: Option<&Utf8Path>) -> Result<Self> {
        let mut renderer = Self::new()?;
        let Some(dir) = dir else {
            return Ok(renderer);
        };

        let entries = fs::read_dir(dir).map_err(|e| Error::io(dir, e))?;
        let mut overrides = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| Error::io(dir, e))?;
            let path = entry.path();
            let is_html = path.extension().is_some_and(|ext| ext == "html");
            if !is_html || !path.is_file() {
                continue;
            }
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            let source = fs::read_to_string(&path).map_err(|e| Error::io(dir.join(name), e))?;
            overrides.push((name.to_string(), source));
        }
        overrides.sort();

        for (name, source) in overrides {
            tracing::debug!("template override: {name}");
            renderer.env.add_template_owned(name, source)?;
        }
        Ok(renderer)
    }

    /// Render a named template with `data` as its context.
    pub fn render<S: Serialize>(&self, name: &str, data: S) -> Result<String> {
        let template = self.env.get_template(name)?;
        Ok(template.render(data)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    struct Heading<'a> {
        title: &'a str,
        anchor: &'a str,
    }

    #[test]
    fn test_builtin_section_heading() {
        let renderer = Renderer::new().unwrap();
        let html = renderer
            .render(
                "section-heading.html",
                Heading {
                    title: "API Overview",
                    anchor: "api-overview",
                },
            )
            .unwrap();
        assert!(html.contains(r#"id="api-overview""#));
        assert!(html.contains("API Overview"));
    }

    #[test]
    fn test_missing_template_fails() {
        let renderer = Renderer::new().unwrap();
        let err = renderer.render("nope.html", ()).unwrap_err();
        assert!(matches!(err, Error::Template(_)));
    }

    #[test]
    fn test_missing_field_fails() {
        let renderer = Renderer::new().unwrap();
        #[derive(Serialize)]
        struct Partial {
            title: &'static str,
        }
        let err = renderer
            .render("section-heading.html", Partial { title: "x" })
            .unwrap_err();
        assert!(matches!(err, Error::Template(_)));
    }

    #[test]
    fn test_text_is_escaped() {
        let renderer = Renderer::new().unwrap();
        let html = renderer
            .render(
                "section-heading.html",
                Heading {
                    title: "<script>",
                    anchor: "x",
                },
            )
            .unwrap();
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_override_directory() {
        let dir = tempfile::tempdir().unwrap();
        let root = Utf8Path::from_path(dir.path()).unwrap();
        fs::write(
            root.join("section-heading.html"),
            "<h1 class=\"custom\">{{ title }}</h1>",
        )
        .unwrap();
        fs::write(root.join("notes.txt"), "ignored").unwrap();

        let renderer = Renderer::with_overrides(Some(root)).unwrap();
        let html = renderer
            .render(
                "section-heading.html",
                Heading {
                    title: "Definitions",
                    anchor: "definitions",
                },
            )
            .unwrap();
        assert_eq!(html, "<h1 class=\"custom\">Definitions</h1>");
        // untouched built-ins still load
        assert!(renderer.env.get_template("operation.html").is_ok());
    }
}
