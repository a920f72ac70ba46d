//! In-memory API model consumed by the writer.
//!
//! The model is produced upstream (from an OpenAPI document) and handed to
//! apiref serialized as JSON. Everything here is read-only input: the writer
//! never mutates it, and derives sorted views where display order matters.

use crate::anchor::make_anchor;
use crate::types::Anchor;
use crate::{Error, Result};
use camino::Utf8Path;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fs;

/// API groups mapped to the versions each one serves.
///
/// Deliberately unordered; the writer sorts groups and versions itself.
pub type GroupVersions = HashMap<String, Vec<String>>;

/// The complete model for one reference build.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiSpec {
    /// Groups and their versions, listed on the "API Groups" page
    pub groups: GroupVersions,
    /// Resource categories in display order
    pub resource_categories: Vec<ResourceCategory>,
    /// Operations that don't belong to any resource
    pub orphaned_operations: Vec<Operation>,
    /// Type definitions that aren't documented as resources
    pub definitions: Vec<Definition>,
    /// Resources from superseded API versions
    pub old_resources: Vec<Resource>,
}

impl ApiSpec {
    /// Decode a model from its JSON form.
    pub fn from_json_str(json: &str, origin: &Utf8Path) -> Result<Self> {
        serde_json::from_str(json).map_err(|source| Error::SpecModel {
            path: origin.to_owned(),
            source,
        })
    }

    /// Read and decode a model file.
    pub fn from_json_file(path: &Utf8Path) -> Result<Self> {
        let json = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        Self::from_json_str(&json, path)
    }
}

/// A named group of resources, e.g. "Workloads".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceCategory {
    pub name: String,
    /// Stem of the category's heading fragment file
    pub include: String,
    #[serde(default)]
    pub resources: Vec<Resource>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Resource {
    pub name: String,
    pub definition: Definition,
}

impl Resource {
    /// Composite used for the resource's anchor: "Name version Group".
    pub fn composite(&self) -> String {
        format!(
            "{} {} {}",
            self.name,
            self.definition.version,
            self.definition.group_display_name()
        )
    }

    pub fn anchor(&self) -> Anchor {
        make_anchor(&self.composite())
    }
}

/// A type definition, optionally carrying the operations of the resource it
/// describes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Definition {
    pub name: String,
    pub version: String,
    /// Short group name; empty or "core" for the legacy core group
    pub group: String,
    /// Fully qualified group, e.g. "apps.k8s.io"
    pub group_full_name: Option<String>,
    pub description: String,
    pub fields: Vec<Field>,
    pub operation_categories: Vec<OperationCategory>,
    /// Example manifest shown next to the definition
    pub sample: Option<String>,
}

impl Definition {
    pub fn group_display_name(&self) -> String {
        group_display_name(&self.group, self.group_full_name.as_deref())
    }

    /// Composite used for the definition's anchor: "Name version Group".
    pub fn composite(&self) -> String {
        format!(
            "{} {} {}",
            self.name,
            self.version,
            self.group_display_name()
        )
    }

    pub fn anchor(&self) -> Anchor {
        make_anchor(&self.composite())
    }

    /// Anchor of an operation category heading inside this definition's
    /// resource page.
    pub fn category_anchor(&self, category: &OperationCategory) -> Anchor {
        make_anchor(&format!("{} {}", category.name, self.composite()))
    }

    /// Preferred anchor of one operation inside this definition's resource
    /// page. Operations without a type name are labelled by their id.
    pub fn operation_anchor(&self, operation: &Operation) -> Anchor {
        make_anchor(&format!("{} {}", operation.label(), self.composite()))
    }

    /// Anchors for the in-page outline of non-empty operation categories.
    ///
    /// `page_anchor` is the anchor of the page the outline belongs to. An
    /// operation whose preferred anchor is already taken on that page gets
    /// its id folded into the anchor.
    pub fn outline(&self, page_anchor: &Anchor) -> Vec<OutlineCategory<'_>> {
        let mut taken = HashSet::from([page_anchor.clone()]);
        let mut outline = Vec::new();

        for category in &self.operation_categories {
            if category.operations.is_empty() {
                continue;
            }
            let anchor = self.category_anchor(category);
            taken.insert(anchor.clone());

            let operations = category
                .operations
                .iter()
                .map(|operation| {
                    let mut anchor = self.operation_anchor(operation);
                    if taken.contains(&anchor) {
                        anchor = make_anchor(&format!(
                            "{} {} {}",
                            operation.label(),
                            operation.id,
                            self.composite()
                        ));
                    }
                    taken.insert(anchor.clone());
                    (operation, anchor)
                })
                .collect();

            outline.push(OutlineCategory {
                category,
                anchor,
                operations,
            });
        }
        outline
    }
}

/// One operation category of a resource page, with resolved anchors.
#[derive(Debug)]
pub struct OutlineCategory<'a> {
    pub category: &'a OperationCategory,
    pub anchor: Anchor,
    pub operations: Vec<(&'a Operation, Anchor)>,
}

/// Group name as shown in titles and used in anchor composites.
///
/// The legacy core group has no name on the wire and shows as "Core".
/// Otherwise the fully qualified name wins over the short one, so
/// `networking.k8s.io` and `networking.istio.io` stay apart.
pub fn group_display_name(group: &str, full_name: Option<&str>) -> String {
    if group.is_empty() || group.eq_ignore_ascii_case("core") {
        return "Core".to_string();
    }
    match full_name.filter(|name| !name.is_empty()) {
        Some(full) => full.to_string(),
        None => group.to_string(),
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Field {
    pub name: String,
    pub type_name: String,
    /// Set when the field's type is itself a documented definition
    pub type_ref: Option<TypeRef>,
    pub description: String,
}

/// Reference to a documented definition, rendered as an in-page link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeRef {
    pub name: String,
    pub version: String,
    #[serde(default)]
    pub group: String,
    #[serde(default)]
    pub group_full_name: Option<String>,
}

impl TypeRef {
    /// Anchor of the referenced definition, built from the same composite
    /// the definition itself uses.
    pub fn anchor(&self) -> Anchor {
        make_anchor(&format!(
            "{} {} {}",
            self.name,
            self.version,
            group_display_name(&self.group, self.group_full_name.as_deref())
        ))
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OperationCategory {
    /// e.g. "Write Operations"
    pub name: String,
    pub operations: Vec<Operation>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Operation {
    /// Unique operation id, e.g. "createCoreV1NamespacedPod"
    pub id: String,
    /// Operation type shown in resource outlines, e.g. "Create"
    pub type_name: String,
    pub method: String,
    pub path: String,
    pub description: String,
    pub group: Option<String>,
    pub version: Option<String>,
    pub kind: Option<String>,
    pub parameters: Vec<Parameter>,
    pub http_responses: Vec<HttpResponse>,
}

impl Operation {
    /// Short label for outlines: the type name, or the id when there is none.
    pub fn label(&self) -> &str {
        if self.type_name.is_empty() {
            &self.id
        } else {
            &self.type_name
        }
    }

    /// Group, version and kind when the operation targets a grouped kind.
    pub fn group_version_kind(&self) -> Option<(&str, &str, &str)> {
        let group = self.group.as_deref().filter(|g| !g.is_empty())?;
        Some((
            group,
            self.version.as_deref().unwrap_or_default(),
            self.kind.as_deref().unwrap_or_default(),
        ))
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Parameter {
    pub name: String,
    /// "path", "query" or "body"
    pub location: String,
    pub required: bool,
    pub type_name: String,
    pub type_ref: Option<TypeRef>,
    pub description: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpResponse {
    /// Status code or symbolic name, e.g. "200"
    pub name: String,
    pub description: String,
    pub type_name: Option<String>,
    pub type_ref: Option<TypeRef>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_display_name() {
        assert_eq!(group_display_name("", None), "Core");
        assert_eq!(group_display_name("core", Some("core")), "Core");
        assert_eq!(group_display_name("apps", None), "apps");
        assert_eq!(group_display_name("apps", Some("apps.k8s.io")), "apps.k8s.io");
        assert_eq!(group_display_name("networking.k8s.io", Some("")), "networking.k8s.io");
    }

    fn ingress(group: &str, full_name: Option<&str>) -> Definition {
        Definition {
            name: "Ingress".into(),
            version: "v1".into(),
            group: group.into(),
            group_full_name: full_name.map(Into::into),
            ..Default::default()
        }
    }

    #[test]
    fn test_multi_label_groups_keep_anchors_apart() {
        let k8s = ingress("networking.k8s.io", None);
        let istio = ingress("networking.istio.io", None);
        assert_eq!(k8s.anchor().as_str(), "ingress-v1-networking.k8s.io");
        assert_eq!(istio.anchor().as_str(), "ingress-v1-networking.istio.io");
        assert_ne!(
            crate::anchor::definition_file_name(&k8s),
            crate::anchor::definition_file_name(&istio)
        );
    }

    #[test]
    fn test_full_group_name_wins_over_short_name() {
        let k8s = ingress("networking", Some("networking.k8s.io"));
        let istio = ingress("networking", Some("networking.istio.io"));
        assert_ne!(k8s.anchor(), istio.anchor());

        let type_ref = TypeRef {
            name: "Ingress".into(),
            version: "v1".into(),
            group: "networking".into(),
            group_full_name: Some("networking.istio.io".into()),
        };
        assert_eq!(type_ref.anchor(), istio.anchor());
        assert_ne!(type_ref.anchor(), k8s.anchor());
    }

    fn operation(id: &str, type_name: &str) -> Operation {
        Operation {
            id: id.into(),
            type_name: type_name.into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_outline_falls_back_to_operation_id() {
        let mut pod = ingress("core", None);
        pod.name = "Pod".into();
        pod.operation_categories = vec![OperationCategory {
            name: "Write Operations".into(),
            operations: vec![operation("createPod", "")],
        }];

        let outline = pod.outline(&pod.anchor());
        assert_eq!(outline[0].operations[0].1.as_str(), "createpod-pod-v1-core");
    }

    #[test]
    fn test_outline_repeated_type_name_gets_id() {
        let mut pod = ingress("core", None);
        pod.name = "Pod".into();
        pod.operation_categories = vec![
            OperationCategory {
                name: "Read Operations".into(),
                operations: vec![operation("readPod", "Read")],
            },
            OperationCategory {
                name: "Status Operations".into(),
                operations: vec![operation("readPodStatus", "Read")],
            },
            OperationCategory {
                name: "Empty".into(),
                operations: vec![],
            },
        ];

        let outline = pod.outline(&pod.anchor());
        assert_eq!(outline.len(), 2);
        assert_eq!(outline[0].operations[0].1.as_str(), "read-pod-v1-core");
        assert_eq!(outline[1].operations[0].1.as_str(), "read-readpodstatus-pod-v1-core");
    }

    #[test]
    fn test_type_ref_matches_definition_anchor() {
        let def = Definition {
            name: "ObjectMeta".into(),
            version: "v1".into(),
            group: "meta".into(),
            ..Default::default()
        };
        let type_ref = TypeRef {
            name: "ObjectMeta".into(),
            version: "v1".into(),
            group: "meta".into(),
            group_full_name: None,
        };
        assert_eq!(def.anchor(), type_ref.anchor());
        assert_eq!(def.anchor().as_str(), "objectmeta-v1-meta");
    }

    #[test]
    fn test_operation_gvk_requires_group() {
        let mut op = Operation {
            id: "getCodeVersion".into(),
            ..Default::default()
        };
        assert!(op.group_version_kind().is_none());

        op.group = Some(String::new());
        assert!(op.group_version_kind().is_none());

        op.group = Some("apps".into());
        op.version = Some("v1".into());
        op.kind = Some("Deployment".into());
        assert_eq!(op.group_version_kind(), Some(("apps", "v1", "Deployment")));
    }

    #[test]
    fn test_decode_minimal_model() {
        let json = r#"{
            "groups": {"apps": ["v1"], "core": ["v1"]},
            "resource_categories": [{
                "name": "Workloads",
                "include": "workloads",
                "resources": [{
                    "name": "Pod",
                    "definition": {"name": "Pod", "version": "v1", "group": "core"}
                }]
            }]
        }"#;
        let spec = ApiSpec::from_json_str(json, Utf8Path::new("spec.json")).unwrap();
        assert_eq!(spec.groups.len(), 2);
        assert_eq!(spec.resource_categories[0].resources[0].anchor().as_str(), "pod-v1-core");
        assert!(spec.definitions.is_empty());
    }

    #[test]
    fn test_decode_error_names_origin() {
        let err = ApiSpec::from_json_str("{not json", Utf8Path::new("broken.json")).unwrap_err();
        assert!(err.to_string().contains("broken.json"));
    }
}
