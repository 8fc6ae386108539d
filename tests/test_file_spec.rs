//! Integration tests for file specifications and embedded files.

mod common;

use common::*;
use pdf_preflight::error::ErrorKind;
use pdf_preflight::object::{Dictionary, Object, ObjectRef};
use pdf_preflight::validation::{validate_document, validate_file_spec_dict, FileSpecification};
use pdf_preflight::version::PdfVersion;
use pdf_preflight::Error;

fn embedded_file(b: &mut GraphBuilder) -> ObjectRef {
    b.add_stream(
        dict(vec![
            ("Type", name("EmbeddedFile")),
            ("Subtype", name("text#2Fplain")),
            (
                "Params",
                Object::Dictionary(dict(vec![
                    ("Size", int(11)),
                    ("ModDate", string("D:20240315093000+01'00'")),
                ])),
            ),
        ]),
        b"hello world",
    )
}

/// Single-page document whose catalog attaches `specs` under the given names.
fn with_attachments(b: &mut GraphBuilder, specs: Vec<(&str, Object)>) {
    let root = b.reserve();
    let page = b.add_page(root, vec![("MediaBox", rect(0, 0, 612, 792))]);
    b.put_pages(root, None, &[page], 1, vec![]);

    let mut names = Vec::new();
    for (key, spec) in specs {
        names.push(string(key));
        names.push(spec);
    }
    let tree = b.add_dict(dict(vec![("Names", Object::Array(names))]));
    b.finish_catalog(
        root,
        vec![(
            "Names",
            Object::Dictionary(dict(vec![("EmbeddedFiles", Object::Reference(tree))])),
        )],
    );
}

fn filespec(type_name: &str, ef: Dictionary, rf: Option<Dictionary>) -> Dictionary {
    let mut d = dict(vec![
        ("Type", name(type_name)),
        ("F", string("report.txt")),
        ("UF", string("report.txt")),
        ("Desc", string("Quarterly report")),
        ("EF", Object::Dictionary(ef)),
    ]);
    if let Some(rf) = rf {
        d.insert("RF".to_string(), Object::Dictionary(rf));
    }
    d
}

mod related_files {
    use super::*;

    #[test]
    fn test_valid_pair_passes() {
        let mut b = GraphBuilder::new(PdfVersion::V1_7);
        let file = embedded_file(&mut b);
        let part = embedded_file(&mut b);
        let spec = filespec(
            "Filespec",
            dict(vec![("F", Object::Reference(file))]),
            Some(dict(vec![(
                "F",
                Object::Array(vec![Object::Reference(part), string("part one")]),
            )])),
        );
        assert!(validate_file_spec_dict(&b.store, &spec).is_ok());
    }

    #[test]
    fn test_rf_key_missing_from_ef() {
        let mut b = GraphBuilder::new(PdfVersion::V1_7);
        let file = embedded_file(&mut b);
        let spec = filespec(
            "Filespec",
            dict(vec![("F", Object::Reference(file))]),
            Some(dict(vec![(
                "Unix",
                Object::Array(vec![Object::Reference(file), string("d")]),
            )])),
        );
        let err = validate_file_spec_dict(&b.store, &spec).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::StructuralInconsistency);
    }

    #[test]
    fn test_odd_length_array() {
        let mut b = GraphBuilder::new(PdfVersion::V1_7);
        let file = embedded_file(&mut b);
        let spec = filespec(
            "Filespec",
            dict(vec![("F", Object::Reference(file))]),
            Some(dict(vec![("F", Object::Array(vec![Object::Reference(file)]))])),
        );
        let err = validate_file_spec_dict(&b.store, &spec).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedValue);
    }

    #[test]
    fn test_indirect_array() {
        let mut b = GraphBuilder::new(PdfVersion::V1_7);
        let file = embedded_file(&mut b);
        let arr = b.store.add(Object::Array(vec![Object::Reference(file), string("d")]));
        let spec = filespec(
            "Filespec",
            dict(vec![("F", Object::Reference(file))]),
            Some(dict(vec![("F", Object::Reference(arr))])),
        );
        assert!(validate_file_spec_dict(&b.store, &spec).is_ok());
    }
}

mod type_discriminator {
    use super::*;

    fn legacy_spec(b: &mut GraphBuilder) -> Dictionary {
        let file = embedded_file(b);
        filespec("F", dict(vec![("F", Object::Reference(file))]), None)
    }

    #[test]
    fn test_legacy_alias_rejected_in_strict_mode() {
        let mut b = GraphBuilder::new(PdfVersion::V1_7);
        let spec = legacy_spec(&mut b);
        let err = validate_file_spec_dict(&b.store, &spec).unwrap_err();
        assert!(matches!(
            err,
            Error::ConstraintViolated { ref entry, .. } if entry == "Type"
        ));
    }

    #[test]
    fn test_legacy_alias_accepted_in_relaxed_mode() {
        let mut b = GraphBuilder::new(PdfVersion::V1_7).relaxed();
        let spec = legacy_spec(&mut b);
        assert!(validate_file_spec_dict(&b.store, &spec).is_ok());
    }

    #[test]
    fn test_unrelated_type_rejected_in_both_modes() {
        for relaxed in [false, true] {
            let mut b = GraphBuilder::new(PdfVersion::V1_7);
            if relaxed {
                b = b.relaxed();
            }
            let file = embedded_file(&mut b);
            let spec = filespec("EmbeddedFile", dict(vec![("F", Object::Reference(file))]), None);
            assert_eq!(
                validate_file_spec_dict(&b.store, &spec).unwrap_err().kind(),
                ErrorKind::ConstraintViolated
            );
        }
    }
}

mod catalog_attachments {
    use super::*;

    #[test]
    fn test_attachments_counted() {
        let mut b = GraphBuilder::new(PdfVersion::V1_7);
        let file = embedded_file(&mut b);
        let spec = b.add_dict(filespec("Filespec", dict(vec![("F", Object::Reference(file))]), None));
        with_attachments(
            &mut b,
            vec![("notes.txt", string("notes.txt")), ("report.txt", Object::Reference(spec))],
        );

        let report = validate_document(&mut b.store).unwrap();
        assert_eq!(report.embedded_files, 2);
    }

    #[test]
    fn test_null_attachments_not_counted() {
        let mut b = GraphBuilder::new(PdfVersion::V1_7);
        with_attachments(&mut b, vec![("a.txt", Object::Null), ("b.txt", Object::Null)]);
        let report = validate_document(&mut b.store).unwrap();
        assert_eq!(report.embedded_files, 0);

        let mut b = GraphBuilder::new(PdfVersion::V1_7);
        with_attachments(&mut b, vec![("a.txt", Object::Null), ("b.txt", string("b.txt"))]);
        let report = validate_document(&mut b.store).unwrap();
        assert_eq!(report.embedded_files, 1);
    }

    #[test]
    fn test_bad_attachment_fails_document() {
        let mut b = GraphBuilder::new(PdfVersion::V1_7);
        let file = embedded_file(&mut b);
        let spec = b.add_dict(filespec(
            "Filespec",
            dict(vec![("Win", Object::Reference(file))]),
            None,
        ));
        with_attachments(&mut b, vec![("report.txt", Object::Reference(spec))]);

        let err = validate_document(&mut b.store).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ConstraintViolated);
    }

    #[test]
    fn test_embedded_files_tree_needs_pdf_1_4() {
        let mut b = GraphBuilder::new(PdfVersion::V1_3);
        with_attachments(&mut b, vec![("notes.txt", string("notes.txt"))]);

        let err = validate_document(&mut b.store).unwrap_err();
        assert!(matches!(
            err,
            Error::VersionTooLow { ref entry, required: PdfVersion::V1_4, .. } if entry == "EmbeddedFiles"
        ));
    }

    #[test]
    fn test_string_spec_value() {
        let b = GraphBuilder::new(PdfVersion::V1_7);
        let spec = pdf_preflight::validation::validate_file_specification(
            &b.store,
            "annotDict",
            "FS",
            &string("docs/readme.txt"),
        )
        .unwrap();
        assert_eq!(spec, FileSpecification::Path("docs/readme.txt".to_string()));
    }
}
