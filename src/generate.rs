//! The fixed write sequence that turns an [`ApiSpec`] into a document.

use crate::Result;
use crate::model::{ApiSpec, Definition, Operation, Resource};
use crate::writer::{BuildSummary, DocWriter};

/// Drive `writer` through the whole model, then assemble.
///
/// Order: overview, API groups, each resource category with its resources,
/// orphaned operations, definitions, old API versions. Sections are only
/// opened when they have content, except the overview and group list.
pub fn generate<W: DocWriter>(writer: &mut W, spec: &ApiSpec) -> Result<BuildSummary> {
    writer.write_overview()?;
    writer.write_api_group_versions(&spec.groups)?;

    for category in &spec.resource_categories {
        tracing::debug!("category {}", category.name);
        writer.write_resource_category(category)?;
    }

    if !spec.orphaned_operations.is_empty() {
        let section = writer.write_orphaned_operations_overview()?;
        let mut operations: Vec<&Operation> = spec.orphaned_operations.iter().collect();
        operations.sort_by(|a, b| a.id.cmp(&b.id));
        for operation in operations {
            writer.write_operation(operation, Some(section))?;
        }
    }

    if !spec.definitions.is_empty() {
        let section = writer.write_definitions_overview()?;
        let mut definitions: Vec<&Definition> = spec.definitions.iter().collect();
        definitions.sort_by(|a, b| {
            (&a.name, &a.version, &a.group).cmp(&(&b.name, &b.version, &b.group))
        });
        for definition in definitions {
            writer.write_definition(definition, Some(section))?;
        }
    }

    if !spec.old_resources.is_empty() {
        let section = writer.write_old_versions_overview()?;
        let mut resources: Vec<&Resource> = spec.old_resources.iter().collect();
        resources.sort_by(|a, b| {
            (&a.name, &a.definition.version).cmp(&(&b.name, &b.definition.version))
        });
        for resource in resources {
            writer.write_resource(resource, Some(section))?;
        }
    }

    writer.finalize()
}
