//! Fragment writer
//!
//! Each `write_*` call renders one entity into its own fragment file in the
//! includes directory and records it in the [`Toc`]. Nothing is stitched
//! together until [`DocWriter::finalize`] runs the assembler.

use crate::anchor::{
    category_file_name, concept_file_name, definition_file_name, gvk_badge, html_escape,
    make_anchor, operation_file_name,
};
use crate::assemble::{assemble, spec_link};
use crate::config::ResolvedConfig;
use crate::link_checker::{BrokenAnchor, check_anchors};
use crate::model::{
    Definition, Field, GroupVersions, HttpResponse, Operation, OutlineCategory, Parameter,
    Resource, ResourceCategory,
};
use crate::render::Renderer;
use crate::toc::{Nav, NodeId, SectionId, Toc, TocKind, TocNode};
use crate::types::{Anchor, FragmentName};
use crate::{Error, Result};
use camino::{Utf8Path, Utf8PathBuf};
use serde::Serialize;
use std::collections::HashSet;
use std::fs;

/// The sequence of writes that produces a reference document.
///
/// Section-opening calls return a [`SectionId`]; child-writing calls accept
/// one as their parent, or `None` to attach to the most recently opened
/// section.
pub trait DocWriter {
    fn write_overview(&mut self) -> Result<SectionId>;

    fn write_api_group_versions(&mut self, groups: &GroupVersions) -> Result<SectionId>;

    /// Write a category heading followed by its resources, sorted by name.
    fn write_resource_category(&mut self, category: &ResourceCategory) -> Result<SectionId>;

    fn write_resource(&mut self, resource: &Resource, parent: Option<SectionId>)
    -> Result<NodeId>;

    fn write_orphaned_operations_overview(&mut self) -> Result<SectionId>;

    fn write_operation(
        &mut self,
        operation: &Operation,
        parent: Option<SectionId>,
    ) -> Result<NodeId>;

    fn write_definitions_overview(&mut self) -> Result<SectionId>;

    fn write_definition(
        &mut self,
        definition: &Definition,
        parent: Option<SectionId>,
    ) -> Result<NodeId>;

    fn write_old_versions_overview(&mut self) -> Result<SectionId>;

    /// Assemble every written fragment into the final index page.
    fn finalize(&self) -> Result<BuildSummary>;
}

/// Outcome of [`DocWriter::finalize`].
#[derive(Debug, Clone)]
pub struct BuildSummary {
    /// Path of the assembled index page
    pub output: Utf8PathBuf,
    /// Fragments concatenated into the page, in order
    pub collected: Vec<FragmentName>,
    /// Fragments listed in the TOC but absent on disk
    pub missing: Vec<FragmentName>,
    /// In-page links whose target anchor doesn't exist
    pub broken_anchors: Vec<BrokenAnchor>,
}

/// Writes HTML fragments and keeps the TOC for the final assembly.
pub struct HtmlWriter<'a> {
    config: &'a ResolvedConfig,
    renderer: &'a Renderer,
    toc: Toc,
    written: HashSet<FragmentName>,
}

impl<'a> HtmlWriter<'a> {
    /// Create a writer, making sure the includes directory exists.
    pub fn new(config: &'a ResolvedConfig, renderer: &'a Renderer) -> Result<Self> {
        fs::create_dir_all(&config.includes_dir)
            .map_err(|e| Error::io(&config.includes_dir, e))?;
        Ok(Self {
            config,
            renderer,
            toc: Toc::new(&config.title),
            written: HashSet::new(),
        })
    }

    pub fn toc(&self) -> &Toc {
        &self.toc
    }

    pub fn includes_dir(&self) -> &Utf8Path {
        &self.config.includes_dir
    }

    /// Render `template` into the fragment `file`.
    ///
    /// The fragment is rendered fully in memory before anything touches the
    /// disk, so a failed render never leaves a partial file behind.
    fn write_fragment<S: Serialize>(
        &mut self,
        file: &FragmentName,
        template: &str,
        data: S,
    ) -> Result<()> {
        if self.written.contains(file) {
            return Err(Error::DuplicateFragment(file.clone()));
        }
        let html = self.renderer.render(template, data)?;
        let path = self.config.includes_dir.join(file.as_str());
        fs::write(&path, html).map_err(|e| Error::io(&path, e))?;
        self.written.insert(file.clone());
        tracing::debug!("wrote {file}");
        Ok(())
    }

    fn write_section_heading(
        &mut self,
        file: &str,
        heading: &str,
        toc_title: &str,
        anchor: &str,
    ) -> Result<SectionId> {
        let file = FragmentName::new(file);
        let anchor = Anchor::new(anchor);
        self.write_fragment(
            &file,
            "section-heading.html",
            SectionHeadingView {
                title: heading,
                anchor: &anchor,
            },
        )?;
        self.toc.open_section(
            TocNode::new(1, toc_title, anchor, TocKind::Section).with_file(file),
        )
    }
}

impl DocWriter for HtmlWriter<'_> {
    fn write_overview(&mut self) -> Result<SectionId> {
        self.write_section_heading("_overview.html", "API Overview", "Overview", "api-overview")
    }

    fn write_api_group_versions(&mut self, groups: &GroupVersions) -> Result<SectionId> {
        let mut names: Vec<&String> = groups.keys().collect();
        names.sort();

        let entries: Vec<GroupView<'_>> = names
            .into_iter()
            .map(|group| {
                let mut versions: Vec<&str> = groups[group].iter().map(String::as_str).collect();
                versions.sort_unstable();
                GroupView { group, versions }
            })
            .collect();

        let file = FragmentName::new("_api_groups.html");
        let anchor = Anchor::new("api-groups");
        self.write_fragment(
            &file,
            "api-groups.html",
            ApiGroupsView {
                anchor: &anchor,
                groups: entries,
            },
        )?;
        self.toc.open_section(
            TocNode::new(1, "API Groups", anchor, TocKind::Section).with_file(file),
        )
    }

    fn write_resource_category(&mut self, category: &ResourceCategory) -> Result<SectionId> {
        let file = category_file_name(category);
        let anchor = make_anchor(&category.name);
        self.write_fragment(
            &file,
            "resource-category-heading.html",
            CategoryHeadingView {
                title: &category.name,
                section_id: &anchor,
            },
        )?;
        let section = self.toc.open_section(
            TocNode::new(1, html_escape(&category.name), anchor, TocKind::Section)
                .with_file(file),
        )?;

        let mut resources: Vec<&Resource> = category.resources.iter().collect();
        resources.sort_by(|a, b| a.name.cmp(&b.name));
        for resource in resources {
            self.write_resource(resource, Some(section))?;
        }

        Ok(section)
    }

    fn write_resource(
        &mut self,
        resource: &Resource,
        parent: Option<SectionId>,
    ) -> Result<NodeId> {
        let parent = self.toc.resolve_parent(parent, "resource")?;
        let definition = &resource.definition;
        let file = concept_file_name(definition);
        let link_id = resource.anchor();
        let title = gvk_badge(&definition.group_display_name(), &definition.version, &resource.name);

        let outline = definition.outline(&link_id);
        self.write_fragment(
            &file,
            "resource.html",
            ResourcePageView {
                link_id: &link_id,
                dvg: &title,
                resource: ResourceView::new(resource, &outline),
            },
        )?;

        let resource_node = self.toc.attach(
            Some(parent),
            TocNode::new(2, title, link_id, TocKind::Resource).with_file(file),
            "resource",
        )?;

        // In-page outline of the resource's operations; these entries have
        // no fragment of their own.
        for entry in outline {
            let category_node = self.toc.attach_to(
                resource_node,
                TocNode::new(
                    3,
                    html_escape(&entry.category.name),
                    entry.anchor,
                    TocKind::Outline,
                ),
            )?;
            for (operation, anchor) in entry.operations {
                self.toc.attach_to(
                    category_node,
                    TocNode::new(4, html_escape(operation.label()), anchor, TocKind::Outline),
                )?;
            }
        }

        Ok(resource_node)
    }

    fn write_orphaned_operations_overview(&mut self) -> Result<SectionId> {
        self.write_section_heading("_operations.html", "Operations", "OPERATIONS", "operations")
    }

    fn write_operation(
        &mut self,
        operation: &Operation,
        parent: Option<SectionId>,
    ) -> Result<NodeId> {
        let parent = self.toc.resolve_parent(parent, "operation")?;
        let file = operation_file_name(operation);
        let link_id = make_anchor(&operation.id);
        let title = match operation.group_version_kind() {
            Some((group, version, kind)) => gvk_badge(group, version, kind),
            None => html_escape(&operation.id),
        };

        self.write_fragment(
            &file,
            "operation.html",
            OperationPageView {
                link_id: &link_id,
                nvg: &title,
                operation: OperationView::new(operation, link_id.clone()),
            },
        )?;

        self.toc.attach(
            Some(parent),
            TocNode::new(2, title, link_id, TocKind::Operation).with_file(file),
            "operation",
        )
    }

    fn write_definitions_overview(&mut self) -> Result<SectionId> {
        self.write_section_heading("_definitions.html", "Definitions", "DEFINITIONS", "definitions")
    }

    fn write_definition(
        &mut self,
        definition: &Definition,
        parent: Option<SectionId>,
    ) -> Result<NodeId> {
        let parent = self.toc.resolve_parent(parent, "definition")?;
        let file = definition_file_name(definition);
        let link_id = definition.anchor();
        let title = gvk_badge(&definition.group_display_name(), &definition.version, &definition.name);

        self.write_fragment(
            &file,
            "definition.html",
            DefinitionPageView {
                nvg: &title,
                link_id: &link_id,
                definition: DefinitionView::new(definition),
            },
        )?;

        // Kept in the TOC so the assembler collects the fragment; the nav
        // leaves definitions out.
        self.toc.attach(
            Some(parent),
            TocNode::new(2, title, link_id, TocKind::Definition).with_file(file),
            "definition",
        )
    }

    fn write_old_versions_overview(&mut self) -> Result<SectionId> {
        self.write_section_heading(
            "_oldversions.html",
            "Old API Versions",
            "OLD API VERSIONS",
            "old-api-versions",
        )
    }

    fn finalize(&self) -> Result<BuildSummary> {
        let build_dir = &self.config.build_dir;
        fs::create_dir_all(build_dir).map_err(|e| Error::io(build_dir, e))?;

        let assembly = assemble(&self.toc, &self.config.includes_dir);
        let html = self.renderer.render(
            "index.html",
            IndexView {
                title: &self.config.title,
                toc: self.toc.nav(),
                config: ConfigView {
                    title: &self.config.title,
                    spec_version: &self.config.spec_version,
                },
                spec_link: spec_link(&self.config.spec_version),
                content: &assembly.content,
            },
        )?;

        let output = build_dir.join("index.html");
        fs::write(&output, &html).map_err(|e| Error::io(&output, e))?;

        let broken_anchors = check_anchors(&html);
        for broken in &broken_anchors {
            tracing::warn!("dangling in-page link: {}", broken.href);
        }
        tracing::info!(
            "assembled {} fragments into {output} ({} missing)",
            assembly.collected.len(),
            assembly.missing.len()
        );

        Ok(BuildSummary {
            output,
            collected: assembly.collected,
            missing: assembly.missing,
            broken_anchors,
        })
    }
}

#[derive(Serialize)]
struct SectionHeadingView<'a> {
    title: &'a str,
    anchor: &'a Anchor,
}

#[derive(Serialize)]
struct CategoryHeadingView<'a> {
    title: &'a str,
    section_id: &'a Anchor,
}

#[derive(Serialize)]
struct GroupView<'a> {
    group: &'a str,
    versions: Vec<&'a str>,
}

#[derive(Serialize)]
struct ApiGroupsView<'a> {
    anchor: &'a Anchor,
    groups: Vec<GroupView<'a>>,
}

#[derive(Serialize)]
struct DefinitionPageView<'a> {
    nvg: &'a str,
    link_id: &'a Anchor,
    definition: DefinitionView<'a>,
}

#[derive(Serialize)]
struct OperationPageView<'a> {
    link_id: &'a Anchor,
    nvg: &'a str,
    operation: OperationView<'a>,
}

#[derive(Serialize)]
struct ResourcePageView<'a> {
    link_id: &'a Anchor,
    dvg: &'a str,
    resource: ResourceView<'a>,
}

#[derive(Serialize)]
struct IndexView<'a> {
    title: &'a str,
    toc: Nav<'a>,
    config: ConfigView<'a>,
    spec_link: Option<String>,
    content: &'a str,
}

#[derive(Serialize)]
struct ConfigView<'a> {
    title: &'a str,
    spec_version: &'a str,
}

#[derive(Serialize)]
struct DefinitionView<'a> {
    name: &'a str,
    version: &'a str,
    group: &'a str,
    group_display: String,
    group_full_name: Option<&'a str>,
    description: &'a str,
    fields: Vec<FieldView<'a>>,
    sample: Option<&'a str>,
}

impl<'a> DefinitionView<'a> {
    fn new(definition: &'a Definition) -> Self {
        Self {
            name: &definition.name,
            version: &definition.version,
            group: &definition.group,
            group_display: definition.group_display_name(),
            group_full_name: definition.group_full_name.as_deref(),
            description: &definition.description,
            fields: definition.fields.iter().map(FieldView::new).collect(),
            sample: definition.sample.as_deref(),
        }
    }
}

#[derive(Serialize)]
struct FieldView<'a> {
    name: &'a str,
    type_name: &'a str,
    link: Option<Anchor>,
    description: &'a str,
}

impl<'a> FieldView<'a> {
    fn new(field: &'a Field) -> Self {
        Self {
            name: &field.name,
            type_name: &field.type_name,
            link: field.type_ref.as_ref().map(|r| r.anchor()),
            description: &field.description,
        }
    }
}

#[derive(Serialize)]
struct OperationView<'a> {
    id: &'a str,
    anchor: Anchor,
    type_name: &'a str,
    method: &'a str,
    path: &'a str,
    description: &'a str,
    parameters: Vec<ParameterView<'a>>,
    responses: Vec<ResponseView<'a>>,
}

impl<'a> OperationView<'a> {
    fn new(operation: &'a Operation, anchor: Anchor) -> Self {
        let mut responses: Vec<&HttpResponse> = operation.http_responses.iter().collect();
        responses.sort_by(|a, b| a.name.cmp(&b.name));

        Self {
            id: &operation.id,
            anchor,
            type_name: &operation.type_name,
            method: &operation.method,
            path: &operation.path,
            description: &operation.description,
            parameters: operation.parameters.iter().map(ParameterView::new).collect(),
            responses: responses.into_iter().map(ResponseView::new).collect(),
        }
    }
}

#[derive(Serialize)]
struct ParameterView<'a> {
    name: &'a str,
    location: &'a str,
    required: bool,
    type_name: &'a str,
    link: Option<Anchor>,
    description: &'a str,
}

impl<'a> ParameterView<'a> {
    fn new(parameter: &'a Parameter) -> Self {
        Self {
            name: &parameter.name,
            location: &parameter.location,
            required: parameter.required,
            type_name: &parameter.type_name,
            link: parameter.type_ref.as_ref().map(|r| r.anchor()),
            description: &parameter.description,
        }
    }
}

#[derive(Serialize)]
struct ResponseView<'a> {
    name: &'a str,
    description: &'a str,
    type_name: Option<&'a str>,
    link: Option<Anchor>,
}

impl<'a> ResponseView<'a> {
    fn new(response: &'a HttpResponse) -> Self {
        Self {
            name: &response.name,
            description: &response.description,
            type_name: response.type_name.as_deref(),
            link: response.type_ref.as_ref().map(|r| r.anchor()),
        }
    }
}

#[derive(Serialize)]
struct ResourceView<'a> {
    name: &'a str,
    definition: DefinitionView<'a>,
    categories: Vec<CategoryView<'a>>,
}

impl<'a> ResourceView<'a> {
    fn new(resource: &'a Resource, outline: &[OutlineCategory<'a>]) -> Self {
        Self {
            name: &resource.name,
            definition: DefinitionView::new(&resource.definition),
            categories: outline
                .iter()
                .map(|entry| {
                    let category = entry.category;
                    CategoryView {
                        name: &category.name,
                        anchor: entry.anchor.clone(),
                        operations: entry
                            .operations
                            .iter()
                            .map(|(op, anchor)| OperationView::new(*op, anchor.clone()))
                            .collect(),
                    }
                })
                .collect(),
        }
    }
}

#[derive(Serialize)]
struct CategoryView<'a> {
    name: &'a str,
    anchor: Anchor,
    operations: Vec<OperationView<'a>>,
}
