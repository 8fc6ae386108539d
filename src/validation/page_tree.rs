//! Page tree traversal.
//!
//! PDF Spec: ISO 32000-1:2008, Section 7.7.3 - Page Tree.
//!
//! The tree is walked depth first from the catalog's `/Pages` entry. Interior
//! (`Pages`) nodes may declare the inheritable attributes `Resources`,
//! `MediaBox`, `CropBox` and `Rotate`; the nearest declaring ancestor wins.
//! Leaf (`Page`) nodes are handed to [`super::page`] with the attributes
//! accumulated on the way down.

use super::common::validate_resource_dict;
use super::entry::{DictValidator, OPTIONAL, REQUIRED};
use super::page::validate_page_dict;
use super::predicates;
use crate::config::ValidationOptions;
use crate::error::{Error, Result};
use crate::geometry::Rectangle;
use crate::object::{dict_type, Dictionary, Object, ObjectRef};
use crate::resolver::ObjectResolver;
use crate::version::PdfVersion;
use serde::Serialize;
use std::collections::HashSet;

/// Attributes a page inherits from its ancestors.
#[derive(Debug, Clone, Default)]
pub struct InheritedAttributes {
    /// Nearest ancestor resource dictionary
    pub resources: Option<Dictionary>,
    /// Nearest ancestor media box
    pub media_box: Option<Rectangle>,
    /// Nearest ancestor crop box
    pub crop_box: Option<Rectangle>,
    /// Nearest ancestor rotation
    pub rotate: Option<i64>,
}

impl InheritedAttributes {
    /// Overlay the attributes declared on a node. Absent values keep the
    /// inherited ones.
    pub fn merge(
        &self,
        resources: Option<Dictionary>,
        media_box: Option<Rectangle>,
        crop_box: Option<Rectangle>,
        rotate: Option<i64>,
    ) -> Self {
        Self {
            resources: resources.or_else(|| self.resources.clone()),
            media_box: media_box.or(self.media_box),
            crop_box: crop_box.or(self.crop_box),
            rotate: rotate.or(self.rotate),
        }
    }
}

/// Where a page's resource dictionary came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ResourceSource {
    /// Declared on the page itself
    Local,
    /// Taken from an ancestor `Pages` node
    Inherited,
    /// No resources anywhere (only legal for pages without content)
    None,
}

/// Effective attributes of one leaf page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageSummary {
    /// Reference of the page object
    pub object: ObjectRef,
    /// Effective media box
    pub media_box: Rectangle,
    /// Effective crop box clipped to the media box, if any level declares one
    pub crop_box: Option<Rectangle>,
    /// Effective rotation, if any level declares one
    pub rotate: Option<i64>,
    /// Origin of the resource dictionary
    pub resources: ResourceSource,
    /// True if the page has at least one content stream
    pub has_contents: bool,
}

/// Result of a successful page tree walk.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PageTreeSummary {
    /// `Count` declared on the root node
    pub declared_count: usize,
    /// Leaf pages in document order
    pub pages: Vec<PageSummary>,
}

impl PageTreeSummary {
    /// Number of leaf pages reached.
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }
}

/// Validate the page tree hanging off `catalog`.
///
/// The root's `Count` is recorded on the resolver before the walk starts; the
/// walk itself only reads from the resolver.
pub fn validate_page_tree<R: ObjectResolver + ?Sized>(
    resolver: &mut R,
    catalog: &Dictionary,
    options: &ValidationOptions,
) -> Result<PageTreeSummary> {
    log::debug!("Validating page tree");

    let root_ref = match catalog.get("Pages") {
        Some(Object::Reference(r)) => *r,
        Some(other) => {
            return Err(Error::type_mismatch("rootDict", "Pages", "Reference", other.type_name()))
        },
        None => return Err(Error::missing("rootDict", "Pages")),
    };

    let root = resolver
        .resolve_dict(&Object::Reference(root_ref))?
        .ok_or_else(|| Error::StructuralInconsistency(format!("page tree root {} is null", root_ref)))?;

    match dict_type(&root) {
        Some("Pages") => {},
        Some(other) => {
            return Err(Error::StructuralInconsistency(format!(
                "page tree root {} has type /{}, expected /Pages",
                root_ref, other
            )))
        },
        None => {
            return Err(Error::StructuralInconsistency(format!(
                "page tree root {} has no /Type",
                root_ref
            )))
        },
    }

    let declared = read_count(&*resolver, &root)?;
    log::info!("Document declares {} pages", declared);
    resolver.record_page_count(declared);

    let mut walker = PageTreeWalker::new(&*resolver, options);
    walker.visited.insert(root_ref);
    let reached = walker.visit_pages(root_ref, &root, None, &InheritedAttributes::default(), 1)?;

    if reached != declared {
        log::warn!(
            "Page tree declares {} pages but {} leaves were reached",
            declared,
            reached
        );
    }

    Ok(PageTreeSummary {
        declared_count: declared,
        pages: walker.pages,
    })
}

fn read_count<R: ObjectResolver + ?Sized>(resolver: &R, node: &Dictionary) -> Result<usize> {
    let v = DictValidator::new(resolver, node, "pagesDict");
    let count = v
        .integer("Count", REQUIRED, PdfVersion::V1_0, Some(&|c: i64| c >= 0))?
        .unwrap_or(0);
    Ok(count as usize)
}

/// Check the `/Parent` back-reference of a non-root node.
pub(crate) fn check_parent(node: &Dictionary, node_ref: ObjectRef, expected: ObjectRef) -> Result<()> {
    match node.get("Parent") {
        Some(Object::Reference(parent)) if *parent == expected => Ok(()),
        Some(Object::Reference(parent)) => Err(Error::StructuralInconsistency(format!(
            "node {} names {} as parent but is listed in the kids of {}",
            node_ref, parent, expected
        ))),
        Some(other) => Err(Error::StructuralInconsistency(format!(
            "node {} has a {} /Parent, expected an indirect reference",
            node_ref,
            other.type_name()
        ))),
        None => Err(Error::StructuralInconsistency(format!(
            "node {} is missing its /Parent back-reference",
            node_ref
        ))),
    }
}

struct PageTreeWalker<'a, R: ObjectResolver + ?Sized> {
    resolver: &'a R,
    options: &'a ValidationOptions,
    visited: HashSet<ObjectRef>,
    pages: Vec<PageSummary>,
}

impl<'a, R: ObjectResolver + ?Sized> PageTreeWalker<'a, R> {
    fn new(resolver: &'a R, options: &'a ValidationOptions) -> Self {
        Self {
            resolver,
            options,
            visited: HashSet::new(),
            pages: Vec::new(),
        }
    }

    /// Validate an interior node and everything below it.
    ///
    /// Returns the number of leaf pages reached.
    fn visit_pages(
        &mut self,
        node_ref: ObjectRef,
        node: &Dictionary,
        parent: Option<ObjectRef>,
        inherited: &InheritedAttributes,
        depth: usize,
    ) -> Result<usize> {
        log::debug!("Validating pages node {} (depth {})", node_ref, depth);

        if depth > self.options.max_page_tree_depth {
            return Err(Error::StructuralInconsistency(format!(
                "page tree deeper than {} levels at {}",
                self.options.max_page_tree_depth, node_ref
            )));
        }
        if let Some(parent) = parent {
            check_parent(node, node_ref, parent)?;
        }

        let declared = read_count(self.resolver, node)?;
        let here = self.validate_inheritable_entries(node, inherited)?;

        let v = DictValidator::new(self.resolver, node, "pagesDict");
        let kids = v
            .array("Kids", REQUIRED, PdfVersion::V1_0, None)?
            .unwrap_or_default();
        if kids.is_empty() {
            return Err(Error::malformed("pagesDict", "Kids", "empty kids array"));
        }

        let mut reached = 0;
        for (i, kid) in kids.iter().enumerate() {
            let kid_ref = match kid {
                Object::Null => {
                    log::warn!("Null entry Kids[{}] in pages node {}", i, node_ref);
                    continue;
                },
                Object::Reference(r) => *r,
                other => {
                    return Err(Error::StructuralInconsistency(format!(
                        "Kids[{}] of {} is a direct {}, expected an indirect reference",
                        i,
                        node_ref,
                        other.type_name()
                    )))
                },
            };

            if !self.visited.insert(kid_ref) {
                return Err(Error::StructuralInconsistency(format!(
                    "page tree node {} is reached more than once",
                    kid_ref
                )));
            }

            let kid_dict = match self.resolver.resolve(kid)? {
                Object::Dictionary(d) => d,
                Object::Null => {
                    log::warn!("Kids[{}] of {} resolves to null", i, node_ref);
                    continue;
                },
                other => {
                    return Err(Error::type_mismatch(
                        "pagesDict",
                        &format!("Kids[{}]", i),
                        "Dictionary",
                        other.type_name(),
                    ))
                },
            };

            match dict_type(&kid_dict) {
                Some("Pages") => {
                    reached += self.visit_pages(kid_ref, &kid_dict, Some(node_ref), &here, depth + 1)?;
                },
                Some("Page") => {
                    check_parent(&kid_dict, kid_ref, node_ref)?;
                    let summary = validate_page_dict(self.resolver, &kid_dict, kid_ref, &here)?;
                    self.pages.push(summary);
                    reached += 1;
                },
                Some(other) => {
                    return Err(Error::StructuralInconsistency(format!(
                        "unexpected page tree node type /{} at {}",
                        other, kid_ref
                    )))
                },
                None => {
                    return Err(Error::StructuralInconsistency(format!(
                        "page tree node {} has no /Type",
                        kid_ref
                    )))
                },
            }
        }

        if reached != declared {
            log::warn!(
                "Pages node {} declares Count {} but has {} leaves",
                node_ref,
                declared,
                reached
            );
        }

        log::debug!("Finished pages node {}", node_ref);
        Ok(reached)
    }

    /// Validate `Resources`, `MediaBox`, `CropBox` and `Rotate` on an interior
    /// node and merge them into the inherited set.
    fn validate_inheritable_entries(
        &self,
        node: &Dictionary,
        inherited: &InheritedAttributes,
    ) -> Result<InheritedAttributes> {
        let v = DictValidator::new(self.resolver, node, "pagesDict");

        let resources = v.dictionary("Resources", OPTIONAL, PdfVersion::V1_0, None)?;
        if let Some(resources) = &resources {
            validate_resource_dict(self.resolver, resources)?;
        }
        let media_box = v.rectangle("MediaBox", OPTIONAL, PdfVersion::V1_0, None)?;
        let crop_box = v.rectangle("CropBox", OPTIONAL, PdfVersion::V1_0, None)?;
        let rotate = v.integer(
            "Rotate",
            OPTIONAL,
            PdfVersion::V1_0,
            Some(&predicates::is_valid_rotation),
        )?;

        Ok(inherited.merge(resources, media_box, crop_box, rotate))
    }
}
