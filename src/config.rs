//! Configuration file discovery and parsing
//!
//! Searches for `.config/apiref.kdl` walking up from the current directory.
//! The project root is the parent of `.config/`; relative paths in the file
//! resolve against it.
//!
//! ```kdl
//! title "Kubernetes API Reference Docs"
//! spec-version "v1.29.3"
//! spec "api/model.json"
//! includes "build/includes"
//! build "build"
//! templates "templates"
//! ```

use camino::{Utf8Path, Utf8PathBuf};
use eyre::{Result, eyre};
use facet::Facet;
use facet_kdl as kdl;
use std::env;
use std::fs;

/// Configuration file name
const CONFIG_DIR: &str = ".config";
const CONFIG_FILE: &str = "apiref.kdl";

const DEFAULT_INCLUDES_DIR: &str = "includes";
const DEFAULT_BUILD_DIR: &str = "build";

/// apiref configuration from `.config/apiref.kdl`
#[derive(Debug, Clone, Facet)]
pub struct ApirefConfig {
    /// Document title shown in the page head and above the nav
    #[facet(kdl::child)]
    pub title: TextNode,

    /// API version the model was generated from, e.g. "v1.29.3"
    #[facet(kdl::child, rename = "spec-version")]
    pub spec_version: TextNode,

    /// Serialized API model (JSON)
    #[facet(kdl::child, default)]
    pub spec: Option<PathNode>,

    /// Staging directory for fragment files
    #[facet(kdl::child, default)]
    pub includes: Option<PathNode>,

    /// Output directory for the assembled page
    #[facet(kdl::child, default)]
    pub build: Option<PathNode>,

    /// Directory of templates overriding the built-in ones
    #[facet(kdl::child, default)]
    pub templates: Option<PathNode>,
}

/// A node with a single string argument
#[derive(Debug, Clone, Facet)]
pub struct TextNode {
    #[facet(kdl::argument)]
    pub value: String,
}

/// A node with a single path argument
#[derive(Debug, Clone, Facet)]
pub struct PathNode {
    #[facet(kdl::argument)]
    pub path: String,
}

/// Configuration with resolved paths, as used by the writer
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// Human-readable document title
    pub title: String,
    /// API version string the release tag is derived from
    pub spec_version: String,
    /// Serialized API model, if configured
    pub spec_path: Option<Utf8PathBuf>,
    /// Directory fragment files are written to
    pub includes_dir: Utf8PathBuf,
    /// Directory `index.html` is written to
    pub build_dir: Utf8PathBuf,
    /// Template override directory
    pub templates_dir: Option<Utf8PathBuf>,
}

impl ResolvedConfig {
    /// Configuration without a config file: fragments go to
    /// `<build_dir>/includes`.
    pub fn for_build_dir(
        title: impl Into<String>,
        spec_version: impl Into<String>,
        build_dir: impl Into<Utf8PathBuf>,
    ) -> Self {
        let build_dir = build_dir.into();
        Self {
            title: title.into(),
            spec_version: spec_version.into(),
            spec_path: None,
            includes_dir: build_dir.join(DEFAULT_INCLUDES_DIR),
            build_dir,
            templates_dir: None,
        }
    }

    /// Discover and load configuration from the current directory or the
    /// nearest ancestor that has one.
    pub fn discover() -> Result<Option<Self>> {
        let cwd = Utf8PathBuf::try_from(env::current_dir()?)
            .map_err(|e| eyre!("Current directory is not valid UTF-8: {}", e.as_path().display()))?;
        Self::discover_above(&cwd)
    }

    /// Load the config of `start` or of its nearest ancestor that has one.
    pub fn discover_above(start: &Utf8Path) -> Result<Option<Self>> {
        let found = start
            .ancestors()
            .map(|dir| dir.join(CONFIG_DIR).join(CONFIG_FILE))
            .find(|candidate| candidate.is_file());
        found.map(|path| load_config(&path)).transpose()
    }

    /// Discover and load configuration from a specific project path
    pub fn discover_from(project_path: &Utf8Path) -> Result<Option<Self>> {
        let config_file = project_path.join(CONFIG_DIR).join(CONFIG_FILE);

        if config_file.is_file() {
            Ok(Some(load_config(&config_file)?))
        } else {
            Ok(None)
        }
    }
}

/// Load and resolve configuration from a config file path
fn load_config(config_path: &Utf8Path) -> Result<ResolvedConfig> {
    let content = fs::read_to_string(config_path)?;
    let config = parse_config(&content)?;

    // Project root is the parent of .config/
    let root = config_path
        .parent()
        .and_then(Utf8Path::parent)
        .ok_or_else(|| eyre!("{config_path} is not inside a .config directory"))?;

    Ok(resolve(config, root))
}

fn parse_config(content: &str) -> Result<ApirefConfig> {
    kdl::from_str(content).map_err(|e| eyre!("While loading config: {e}"))
}

fn resolve(config: ApirefConfig, root: &Utf8Path) -> ResolvedConfig {
    let dir = |node: Option<PathNode>, default: &str| match node {
        Some(node) => root.join(node.path),
        None => root.join(default),
    };

    ResolvedConfig {
        title: config.title.value,
        spec_version: config.spec_version.value,
        spec_path: config.spec.map(|node| root.join(node.path)),
        includes_dir: dir(config.includes, DEFAULT_INCLUDES_DIR),
        build_dir: dir(config.build, DEFAULT_BUILD_DIR),
        templates_dir: config.templates.map(|node| root.join(node.path)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let kdl = r#"
            title "Kubernetes API Reference Docs"
            spec-version "v1.29.3"
            build "out/"
        "#;

        let config = parse_config(kdl).unwrap();
        assert_eq!(config.title.value, "Kubernetes API Reference Docs");
        assert_eq!(config.spec_version.value, "v1.29.3");
        assert!(config.includes.is_none());

        let resolved = resolve(config, Utf8Path::new("/project"));
        assert_eq!(resolved.build_dir, Utf8PathBuf::from("/project/out/"));
        assert_eq!(resolved.includes_dir, Utf8PathBuf::from("/project/includes"));
        assert!(resolved.templates_dir.is_none());
    }

    #[test]
    fn test_discover_from_project() {
        let dir = tempfile::tempdir().unwrap();
        let root = Utf8Path::from_path(dir.path()).unwrap();
        fs::create_dir_all(root.join(CONFIG_DIR)).unwrap();
        fs::write(
            root.join(CONFIG_DIR).join(CONFIG_FILE),
            "title \"Ref\"\nspec-version \"v1.2.3\"\nspec \"model.json\"\n",
        )
        .unwrap();

        let resolved = ResolvedConfig::discover_from(root).unwrap().unwrap();
        assert_eq!(resolved.title, "Ref");
        assert_eq!(resolved.spec_path, Some(root.join("model.json")));
        assert_eq!(resolved.build_dir, root.join("build"));
    }

    #[test]
    fn test_discover_above_walks_up() {
        let dir = tempfile::tempdir().unwrap();
        let root = Utf8Path::from_path(dir.path()).unwrap();
        fs::create_dir_all(root.join(CONFIG_DIR)).unwrap();
        fs::write(
            root.join(CONFIG_DIR).join(CONFIG_FILE),
            "title \"Ref\"\nspec-version \"v1.2.3\"\n",
        )
        .unwrap();
        let nested = root.join("docs").join("api");
        fs::create_dir_all(&nested).unwrap();

        let resolved = ResolvedConfig::discover_above(&nested).unwrap().unwrap();
        assert_eq!(resolved.title, "Ref");
        // paths resolve against the directory holding .config/, not the start
        assert_eq!(resolved.build_dir, root.join("build"));
        assert!(ResolvedConfig::discover_from(&nested).unwrap().is_none());
    }

    #[test]
    fn test_discover_from_without_config() {
        let dir = tempfile::tempdir().unwrap();
        let root = Utf8Path::from_path(dir.path()).unwrap();
        assert!(ResolvedConfig::discover_from(root).unwrap().is_none());
    }

    #[test]
    fn test_for_build_dir() {
        let config = ResolvedConfig::for_build_dir("Ref", "v1.0.0", "/tmp/out");
        assert_eq!(config.includes_dir, Utf8PathBuf::from("/tmp/out/includes"));
    }
}
