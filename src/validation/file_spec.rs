//! File specification and embedded file validation.
//!
//! PDF Spec: ISO 32000-1:2008, Section 7.11 - File Specifications.
//!
//! A file specification is either a plain string or a dictionary. A
//! dictionary may embed the file itself (`EF`) and list related files for
//! each embedded one (`RF`).

use super::common::{sorted_keys, validate_form_xobject};
use super::entry::{DictValidator, OPTIONAL, REQUIRED};
use super::name_tree::walk_name_tree;
use super::predicates;
use crate::config::{effective_min_version, ValidationOptions};
use crate::error::{Error, Result};
use crate::object::{decode_text_string, Dictionary, Object, Stream};
use crate::resolver::ObjectResolver;
use crate::version::PdfVersion;

/// A validated file specification.
#[derive(Debug, Clone, PartialEq)]
pub enum FileSpecification {
    /// Plain file specification string
    Path(String),
    /// Full file specification dictionary
    Dictionary(Dictionary),
}

/// A value that may be a file specification or a form XObject, as allowed
/// for some annotation appearances.
#[derive(Debug, Clone, PartialEq)]
pub enum FileSpecOrForm {
    /// File specification string or dictionary
    FileSpec(FileSpecification),
    /// Form XObject
    Form(Stream),
}

/// Validate the parameters of a Mac OS embedded file.
fn validate_mac_params<R: ObjectResolver + ?Sized>(resolver: &R, dict: &Dictionary) -> Result<()> {
    let v = DictValidator::new(resolver, dict, "embeddedFileStreamMacParameterDict");

    v.integer("Subtype", OPTIONAL, PdfVersion::V1_0, None)?;
    v.integer("Creator", OPTIONAL, PdfVersion::V1_0, None)?;
    v.stream("ResFork", OPTIONAL, PdfVersion::V1_0, None)?;

    Ok(())
}

/// Validate an embedded file parameter dictionary.
///
/// PDF Spec: ISO 32000-1:2008, Section 7.11.4 - Table 45.
fn validate_embedded_file_params<R: ObjectResolver + ?Sized>(resolver: &R, dict: &Dictionary) -> Result<()> {
    let v = DictValidator::new(resolver, dict, "embeddedFileStreamParmDict");

    v.integer("Size", OPTIONAL, PdfVersion::V1_0, Some(&|n: i64| n >= 0))?;
    v.date("CreationDate", OPTIONAL, PdfVersion::V1_0, None)?;
    v.date("ModDate", OPTIONAL, PdfVersion::V1_0, None)?;
    if let Some(mac) = v.dictionary("Mac", OPTIONAL, PdfVersion::V1_0, None)? {
        validate_mac_params(resolver, &mac)?;
    }
    v.string("CheckSum", OPTIONAL, PdfVersion::V1_0, None)?;

    Ok(())
}

/// Validate the dictionary of an embedded file stream.
///
/// PDF Spec: ISO 32000-1:2008, Section 7.11.4 - Table 44.
pub fn validate_embedded_file_stream<R: ObjectResolver + ?Sized>(resolver: &R, stream: &Stream) -> Result<()> {
    let v = DictValidator::new(resolver, &stream.dict, "embeddedFileStreamDict");

    v.name_entry("Type", OPTIONAL, PdfVersion::V1_0, Some(&|t: &str| t == "EmbeddedFile"))?;
    v.name_entry("Subtype", OPTIONAL, PdfVersion::V1_0, None)?;
    if let Some(params) = v.dictionary("Params", OPTIONAL, PdfVersion::V1_0, None)? {
        validate_embedded_file_params(resolver, &params)?;
    }

    Ok(())
}

/// Validate an `EF` dictionary: allowed keys, each an embedded file stream.
fn validate_ef_dict<R: ObjectResolver + ?Sized>(resolver: &R, ef: &Dictionary) -> Result<()> {
    let v = DictValidator::new(resolver, ef, "efDict");

    for key in sorted_keys(ef) {
        if !predicates::is_embedded_file_key(key) {
            return Err(Error::constraint("efDict", key, "key not allowed in embedded files dictionary"));
        }
        if let Some(stream) = v.stream(key, REQUIRED, PdfVersion::V1_3, None)? {
            validate_embedded_file_stream(resolver, &stream)?;
        }
    }

    Ok(())
}

/// Validate a related files array: (embedded file stream, description) pairs.
///
/// Null elements break the pairing and are rejected.
pub fn validate_related_files_array<R: ObjectResolver + ?Sized>(
    resolver: &R,
    key: &str,
    arr: &[Object],
) -> Result<()> {
    if arr.len() % 2 != 0 {
        return Err(Error::malformed(
            "rfDict",
            key,
            format!("related files array has odd length {}", arr.len()),
        ));
    }

    for (i, element) in arr.iter().enumerate() {
        let slot = format!("{}[{}]", key, i);
        let resolved = resolver.resolve(element)?;
        if resolved.is_null() {
            return Err(Error::malformed("rfDict", &slot, "null entry in related files array"));
        }
        if i % 2 == 0 {
            match resolved {
                Object::Stream(stream) => validate_embedded_file_stream(resolver, &stream)?,
                other => return Err(Error::type_mismatch("rfDict", &slot, "Stream", other.type_name())),
            }
        } else if !matches!(resolved, Object::String(_)) {
            return Err(Error::type_mismatch("rfDict", &slot, "String", resolved.type_name()));
        }
    }

    Ok(())
}

/// Validate `EF` together with an optional `RF`.
///
/// Every `RF` key must also be an `EF` key.
fn validate_ef_and_rf<R: ObjectResolver + ?Sized>(
    resolver: &R,
    ef: &Dictionary,
    rf: Option<&Dictionary>,
) -> Result<()> {
    validate_ef_dict(resolver, ef)?;

    let rf = match rf {
        Some(rf) => rf,
        None => return Ok(()),
    };
    let v = DictValidator::new(resolver, rf, "rfDict");
    for key in sorted_keys(rf) {
        if !ef.contains_key(key.as_str()) {
            return Err(Error::StructuralInconsistency(format!(
                "related files entry /{} has no matching embedded file in /EF",
                key
            )));
        }
        if let Some(arr) = v.array(key, OPTIONAL, PdfVersion::V1_3, None)? {
            validate_related_files_array(resolver, key, &arr)?;
        }
    }

    Ok(())
}

/// Validate a file specification dictionary.
///
/// PDF Spec: ISO 32000-1:2008, Section 7.11.3 - Table 44.
pub fn validate_file_spec_dict<R: ObjectResolver + ?Sized>(resolver: &R, dict: &Dictionary) -> Result<()> {
    log::debug!("Validating file specification dictionary");
    let v = DictValidator::new(resolver, dict, "fileSpecDict");
    let mode = v.mode();

    let fs = v.name_entry("FS", OPTIONAL, PdfVersion::V1_0, None)?;

    // Obsolescent platform-specific paths only waive F; their values are not checked.
    let f_required = !["DOS", "Mac", "Unix"].iter().any(|entry| v.has(entry));

    let f_grammar: fn(&str) -> bool = if fs.as_deref() == Some("URL") {
        predicates::is_url_string
    } else {
        predicates::is_file_spec_string
    };
    v.string("F", f_required, PdfVersion::V1_0, Some(&f_grammar))?;

    let uf_since = effective_min_version(PdfVersion::V1_7, PdfVersion::V1_4, mode);
    v.string("UF", OPTIONAL, uf_since, Some(&predicates::is_file_spec_string))?;

    v.string_array("ID", OPTIONAL, PdfVersion::V1_1, Some(&|ids: &[String]| ids.len() == 2))?;
    v.boolean("V", OPTIONAL, PdfVersion::V1_2, None)?;

    let rf = v.dictionary("RF", OPTIONAL, PdfVersion::V1_3, None)?;
    let ef = v.dictionary("EF", rf.is_some(), PdfVersion::V1_3, None)?;

    let is_filespec = |t: &str| t == "Filespec" || (mode.is_relaxed() && t == "F");
    v.name_entry("Type", ef.is_some(), PdfVersion::V1_0, Some(&is_filespec))?;

    if let Some(ef) = &ef {
        validate_ef_and_rf(resolver, ef, rf.as_ref())?;
    }

    let desc_since = effective_min_version(PdfVersion::V1_6, PdfVersion::V1_0, mode);
    v.string("Desc", OPTIONAL, desc_since, None)?;
    v.dictionary("CI", OPTIONAL, PdfVersion::V1_7, None)?;

    Ok(())
}

fn validate_file_spec_string(dict_name: &str, entry: &str, bytes: &[u8]) -> Result<String> {
    let path = decode_text_string(bytes);
    if !predicates::is_file_spec_string(&path) {
        return Err(Error::constraint(dict_name, entry, format!("({})", path)));
    }
    Ok(path)
}

/// Validate a file specification: a string or a dictionary.
///
/// `dict_name` and `entry` locate the value in diagnostics.
pub fn validate_file_specification<R: ObjectResolver + ?Sized>(
    resolver: &R,
    dict_name: &str,
    entry: &str,
    obj: &Object,
) -> Result<FileSpecification> {
    match resolver.resolve(obj)? {
        Object::String(bytes) => Ok(FileSpecification::Path(validate_file_spec_string(
            dict_name, entry, &bytes,
        )?)),
        Object::Dictionary(dict) => {
            validate_file_spec_dict(resolver, &dict)?;
            Ok(FileSpecification::Dictionary(dict))
        },
        other => Err(Error::type_mismatch(
            dict_name,
            entry,
            "String or Dictionary",
            other.type_name(),
        )),
    }
}

/// Validate a file specification entry of `v`'s dictionary.
pub fn validate_file_spec_entry<R: ObjectResolver + ?Sized>(
    v: &DictValidator<'_, R>,
    entry: &str,
    required: bool,
    since: PdfVersion,
) -> Result<Option<FileSpecification>> {
    let value = match v.any(entry, required, since)? {
        Some(value) => value,
        None => return Ok(None),
    };
    validate_file_specification(v.resolver(), v.name(), entry, &value).map(Some)
}

/// Validate a value that may be a file specification or a form XObject.
pub fn validate_file_spec_or_form_xobject<R: ObjectResolver + ?Sized>(
    resolver: &R,
    dict_name: &str,
    entry: &str,
    obj: &Object,
) -> Result<FileSpecOrForm> {
    match resolver.resolve(obj)? {
        Object::Stream(stream) => {
            validate_form_xobject(resolver, &stream)?;
            Ok(FileSpecOrForm::Form(stream))
        },
        other => validate_file_specification(resolver, dict_name, entry, &other).map(FileSpecOrForm::FileSpec),
    }
}

/// Validate every file specification in the catalog's `EmbeddedFiles` name
/// tree. Returns the number of specifications validated; null values are
/// skipped and not counted.
///
/// PDF Spec: ISO 32000-1:2008, Section 7.7.4 - Name Dictionary.
pub fn validate_embedded_files_name_tree<R: ObjectResolver + ?Sized>(
    resolver: &R,
    catalog: &Dictionary,
    options: &ValidationOptions,
) -> Result<usize> {
    let root = DictValidator::new(resolver, catalog, "rootDict");
    let names = match root.dictionary("Names", OPTIONAL, PdfVersion::V1_2, None)? {
        Some(names) => names,
        None => return Ok(0),
    };

    let n = root.nested(&names, "nameDict");
    let tree = match n.dictionary("EmbeddedFiles", OPTIONAL, PdfVersion::V1_4, None)? {
        Some(tree) => tree,
        None => return Ok(0),
    };

    let mut checked = 0;
    walk_name_tree(resolver, &tree, options.max_name_tree_depth, |key, value| {
        if resolver.resolve(value)?.is_null() {
            log::warn!("Embedded file ({}) is null", key);
            return Ok(());
        }
        validate_file_specification(resolver, "embeddedFilesNameTree", key, value)?;
        checked += 1;
        Ok(())
    })?;

    log::info!("Validated {} embedded file specifications", checked);
    Ok(checked)
}
