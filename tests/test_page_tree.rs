//! Integration tests for page tree traversal and page validation.

mod common;

use common::*;
use pdf_preflight::error::ErrorKind;
use pdf_preflight::geometry::Rectangle;
use pdf_preflight::object::Object;
use pdf_preflight::validation::{validate_document, DocumentValidator, ResourceSource};
use pdf_preflight::version::PdfVersion;
use pdf_preflight::{Error, ValidationOptions};

/// Root Pages -> interior Pages -> two leaves. Resources live on the root,
/// MediaBox on the interior node, and only the first leaf rotates.
fn two_level_tree(root_rotate: Option<i64>) -> GraphBuilder {
    let mut b = GraphBuilder::new(PdfVersion::V1_7);
    let root = b.reserve();
    let interior = b.reserve();

    let contents_a = b.add_contents();
    let contents_b = b.add_contents();
    let leaf_a = b.add_page(
        interior,
        vec![("Contents", Object::Reference(contents_a)), ("Rotate", int(90))],
    );
    let leaf_b = b.add_page(interior, vec![("Contents", Object::Reference(contents_b))]);

    b.put_pages(
        interior,
        Some(root),
        &[leaf_a, leaf_b],
        2,
        vec![("MediaBox", rect(0, 0, 595, 842))],
    );

    let fonts = dict(vec![("F1", Object::Dictionary(dict(vec![("Type", name("Font"))])))]);
    let mut root_extra = vec![(
        "Resources",
        Object::Dictionary(dict(vec![
            ("Font", Object::Dictionary(fonts)),
            ("ProcSet", Object::Array(vec![name("PDF"), name("Text")])),
        ])),
    )];
    if let Some(rotate) = root_rotate {
        root_extra.push(("Rotate", int(rotate)));
    }
    b.put_pages(root, None, &[interior], 2, root_extra);
    b.finish_catalog(root, vec![]);
    b
}

mod inheritance {
    use super::*;

    #[test]
    fn test_two_level_tree_validates() {
        let mut b = two_level_tree(None);
        let report = validate_document(&mut b.store).unwrap();

        assert_eq!(report.page_tree.declared_count, 2);
        assert_eq!(report.page_tree.page_count(), 2);
        assert_eq!(b.store.page_count(), Some(2));

        let a4 = Rectangle::from_corners(0.0, 0.0, 595.0, 842.0);
        for page in &report.page_tree.pages {
            assert_eq!(page.media_box, a4);
            assert_eq!(page.resources, ResourceSource::Inherited);
            assert!(page.has_contents);
        }
        assert_eq!(report.page_tree.pages[0].rotate, Some(90));
        assert_eq!(report.page_tree.pages[1].rotate, None);
    }

    #[test]
    fn test_rotate_inherited_from_root() {
        let mut b = two_level_tree(Some(180));
        let report = validate_document(&mut b.store).unwrap();
        assert_eq!(report.page_tree.pages[0].rotate, Some(90));
        assert_eq!(report.page_tree.pages[1].rotate, Some(180));
    }

    #[test]
    fn test_local_resources_reported() {
        let resources = Object::Dictionary(dict(vec![("XObject", Object::Dictionary(dict(vec![])))]));
        let mut b = GraphBuilder::single_page(PdfVersion::V1_4, vec![("Resources", resources)]);
        let report = validate_document(&mut b.store).unwrap();
        assert_eq!(report.page_tree.pages[0].resources, ResourceSource::Local);
    }

    #[test]
    fn test_contents_without_any_resources() {
        let mut b = GraphBuilder::new(PdfVersion::V1_7);
        let root = b.reserve();
        let contents = b.add_contents();
        let page = b.add_page(
            root,
            vec![("MediaBox", rect(0, 0, 100, 100)), ("Contents", Object::Reference(contents))],
        );
        b.put_pages(root, None, &[page], 1, vec![]);
        b.finish_catalog(root, vec![]);

        let err = validate_document(&mut b.store).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::StructuralInconsistency);
    }

    #[test]
    fn test_page_without_contents_needs_no_resources() {
        let mut b = GraphBuilder::single_page(PdfVersion::V1_7, vec![]);
        let report = validate_document(&mut b.store).unwrap();
        assert_eq!(report.page_tree.pages[0].resources, ResourceSource::None);
        assert!(!report.page_tree.pages[0].has_contents);
    }

    #[test]
    fn test_media_box_required_somewhere() {
        let mut b = GraphBuilder::new(PdfVersion::V1_7);
        let root = b.reserve();
        let page = b.add_page(root, vec![]);
        b.put_pages(root, None, &[page], 1, vec![]);
        b.finish_catalog(root, vec![]);

        let err = validate_document(&mut b.store).unwrap_err();
        assert!(matches!(
            err,
            Error::MissingRequiredField { ref entry, .. } if entry == "MediaBox"
        ));
    }
}

mod structure {
    use super::*;

    #[test]
    fn test_unknown_node_type() {
        let mut b = GraphBuilder::new(PdfVersion::V1_7);
        let root = b.reserve();
        let odd = b.add_dict(dict(vec![("Type", name("Template")), ("Parent", Object::Reference(root))]));
        b.put_pages(root, None, &[odd], 1, vec![]);
        b.finish_catalog(root, vec![]);

        let err = validate_document(&mut b.store).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::StructuralInconsistency);
    }

    #[test]
    fn test_missing_parent() {
        let mut b = GraphBuilder::new(PdfVersion::V1_7);
        let root = b.reserve();
        let page = b.add_dict(dict(vec![("Type", name("Page")), ("MediaBox", rect(0, 0, 1, 1))]));
        b.put_pages(root, None, &[page], 1, vec![]);
        b.finish_catalog(root, vec![]);

        let err = validate_document(&mut b.store).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::StructuralInconsistency);
    }

    #[test]
    fn test_kids_cycle_terminates() {
        let mut b = GraphBuilder::new(PdfVersion::V1_7);
        let root = b.reserve();
        let interior = b.reserve();
        b.put_pages(interior, Some(root), &[root], 1, vec![]);
        b.put_pages(root, None, &[interior], 1, vec![]);
        b.finish_catalog(root, vec![]);

        let err = validate_document(&mut b.store).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::StructuralInconsistency);
    }

    #[test]
    fn test_broken_kid_reference_is_resolution_failure() {
        let mut b = GraphBuilder::new(PdfVersion::V1_7);
        let root = b.reserve();
        let dangling = b.reserve();
        b.put_pages(root, None, &[dangling], 1, vec![]);
        b.finish_catalog(root, vec![]);

        let err = validate_document(&mut b.store).unwrap_err();
        assert!(err.is_resolution_failure());
        assert_eq!(err.kind(), ErrorKind::ResolutionFailure);
    }

    #[test]
    fn test_count_mismatch_is_tolerated() {
        let mut b = GraphBuilder::new(PdfVersion::V1_7);
        let root = b.reserve();
        let page = b.add_page(root, vec![("MediaBox", rect(0, 0, 1, 1))]);
        b.put_pages(root, None, &[page], 3, vec![]);
        b.finish_catalog(root, vec![]);

        let report = validate_document(&mut b.store).unwrap();
        assert_eq!(report.page_tree.declared_count, 3);
        assert_eq!(report.page_tree.page_count(), 1);
        assert_eq!(b.store.page_count(), Some(3));
    }

    #[test]
    fn test_depth_option() {
        let mut b = two_level_tree(None);
        let shallow = DocumentValidator::new().with_options(ValidationOptions::new().with_max_page_tree_depth(1));
        let err = shallow.validate(&mut b.store).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::StructuralInconsistency);

        let mut b = two_level_tree(None);
        let deep_enough = DocumentValidator::new().with_options(ValidationOptions::new().with_max_page_tree_depth(2));
        assert!(deep_enough.validate(&mut b.store).is_ok());
    }
}

mod page_features {
    use super::*;

    #[test]
    fn test_rotate_values() {
        for rotate in [0, 90, 180, 270] {
            let mut b = GraphBuilder::single_page(PdfVersion::V1_7, vec![("Rotate", int(rotate))]);
            assert!(validate_document(&mut b.store).is_ok(), "rotate {}", rotate);
        }
        for rotate in [45, -90, 360] {
            let mut b = GraphBuilder::single_page(PdfVersion::V1_7, vec![("Rotate", int(rotate))]);
            let err = validate_document(&mut b.store).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::ConstraintViolated, "rotate {}", rotate);
        }
    }

    #[test]
    fn test_trim_box_version_gate() {
        let mut b = GraphBuilder::single_page(PdfVersion::V1_2, vec![("TrimBox", rect(0, 0, 10, 10))]);
        let err = validate_document(&mut b.store).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::VersionTooLow);

        let mut b = GraphBuilder::single_page(PdfVersion::V1_3, vec![("TrimBox", rect(0, 0, 10, 10))]);
        assert!(validate_document(&mut b.store).is_ok());
    }

    #[test]
    fn test_piece_info_without_last_modified() {
        let piece_info = Object::Dictionary(dict(vec![(
            "Illustrator",
            Object::Dictionary(dict(vec![("LastModified", string("D:20230101120000Z"))])),
        )]));

        let mut strict = GraphBuilder::single_page(PdfVersion::V1_7, vec![("PieceInfo", piece_info.clone())]);
        let err = validate_document(&mut strict.store).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::StructuralInconsistency);

        let mut relaxed = GraphBuilder::single_page(PdfVersion::V1_7, vec![("PieceInfo", piece_info)]).relaxed();
        assert!(validate_document(&mut relaxed.store).is_ok());
    }

    #[test]
    fn test_pres_steps_unsupported() {
        let steps = nav_node();
        let mut b = GraphBuilder::single_page(PdfVersion::V1_7, vec![("PresSteps", steps)]);
        let err = validate_document(&mut b.store).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnsupportedFeature);
    }

    fn nav_node() -> Object {
        Object::Dictionary(dict(vec![("Type", name("NavNode"))]))
    }

    #[test]
    fn test_transition_motion_needs_compatible_style() {
        let ok = Object::Dictionary(dict(vec![("S", name("Split")), ("M", name("O"))]));
        let mut b = GraphBuilder::single_page(PdfVersion::V1_7, vec![("Trans", ok)]);
        assert!(validate_document(&mut b.store).is_ok());

        let bad = Object::Dictionary(dict(vec![("S", name("Wipe")), ("M", name("O"))]));
        let mut b = GraphBuilder::single_page(PdfVersion::V1_7, vec![("Trans", bad)]);
        let err = validate_document(&mut b.store).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ConstraintViolated);
    }

    #[test]
    fn test_content_array_with_null() {
        let mut b = GraphBuilder::new(PdfVersion::V1_7);
        let root = b.reserve();
        let contents = b.add_contents();
        let page = b.add_page(
            root,
            vec![("Contents", Object::Array(vec![Object::Null, Object::Reference(contents)]))],
        );
        b.put_pages(
            root,
            None,
            &[page],
            1,
            vec![
                ("MediaBox", rect(0, 0, 10, 10)),
                ("Resources", Object::Dictionary(dict(vec![]))),
            ],
        );
        b.finish_catalog(root, vec![]);

        let report = validate_document(&mut b.store).unwrap();
        assert!(report.page_tree.pages[0].has_contents);
    }

    #[test]
    fn test_user_unit() {
        let mut b = GraphBuilder::single_page(PdfVersion::V1_6, vec![("UserUnit", Object::Real(2.5))]);
        assert!(validate_document(&mut b.store).is_ok());

        let mut b = GraphBuilder::single_page(PdfVersion::V1_6, vec![("UserUnit", int(0))]);
        assert_eq!(
            validate_document(&mut b.store).unwrap_err().kind(),
            ErrorKind::ConstraintViolated
        );
    }
}
