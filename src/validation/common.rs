//! Validators for dictionaries shared by several parents.
//!
//! Resource dictionaries, transparency groups, XObjects, metadata streams,
//! additional actions and page-piece dictionaries all appear on pages and on
//! form XObjects alike.

use super::entry::{DictValidator, OPTIONAL, REQUIRED};
use super::predicates;
use crate::error::{Error, Result};
use crate::object::{Dictionary, Object, Stream};
use crate::resolver::ObjectResolver;
use crate::version::PdfVersion;

/// Resource categories that must be dictionaries, with their minimum version.
const RESOURCE_CATEGORIES: &[(&str, PdfVersion)] = &[
    ("ExtGState", PdfVersion::V1_0),
    ("Font", PdfVersion::V1_0),
    ("XObject", PdfVersion::V1_0),
    ("Properties", PdfVersion::V1_0),
    ("ColorSpace", PdfVersion::V1_0),
    ("Pattern", PdfVersion::V1_0),
    ("Shading", PdfVersion::V1_3),
];

/// Keys of `dict` in a stable order, so the first reported error does not
/// depend on hash order.
pub(crate) fn sorted_keys(dict: &Dictionary) -> Vec<&String> {
    let mut keys: Vec<&String> = dict.keys().collect();
    keys.sort();
    keys
}

/// Validate a resource dictionary.
///
/// PDF Spec: ISO 32000-1:2008, Section 7.8.3 - Resource Dictionaries.
/// Only the category layer is checked; individual fonts, images and so on
/// are left to their own validators.
pub fn validate_resource_dict<R: ObjectResolver + ?Sized>(resolver: &R, dict: &Dictionary) -> Result<()> {
    let v = DictValidator::new(resolver, dict, "resourceDict");

    for (category, since) in RESOURCE_CATEGORIES {
        v.dictionary(category, OPTIONAL, *since, None)?;
    }

    // Obsolete since 1.4 but still common.
    v.name_array("ProcSet", OPTIONAL, PdfVersion::V1_0, None)?;

    Ok(())
}

/// Validate a transparency group attributes dictionary.
///
/// PDF Spec: ISO 32000-1:2008, Section 11.6.6 - Transparency Group XObjects.
pub fn validate_group_dict<R: ObjectResolver + ?Sized>(resolver: &R, dict: &Dictionary) -> Result<()> {
    log::debug!("Validating group attributes dictionary");
    let v = DictValidator::new(resolver, dict, "groupDict");

    v.name_entry("Type", OPTIONAL, PdfVersion::V1_4, Some(&|t: &str| t == "Group"))?;
    v.name_entry("S", REQUIRED, PdfVersion::V1_4, Some(&|s: &str| s == "Transparency"))?;

    if let Some(cs) = v.any("CS", OPTIONAL, PdfVersion::V1_4)? {
        if !matches!(cs, Object::Name(_) | Object::Array(_)) {
            return Err(Error::type_mismatch("groupDict", "CS", "Name or Array", cs.type_name()));
        }
    }

    v.boolean("I", OPTIONAL, PdfVersion::V1_4, None)?;
    v.boolean("K", OPTIONAL, PdfVersion::V1_4, None)?;

    Ok(())
}

/// Validate the dictionary of an image XObject used as a thumbnail.
///
/// PDF Spec: ISO 32000-1:2008, Section 12.3.4 - Thumbnail Images.
pub fn validate_thumbnail<R: ObjectResolver + ?Sized>(resolver: &R, stream: &Stream) -> Result<()> {
    let v = DictValidator::new(resolver, &stream.dict, "thumbnailDict");
    let positive = |n: i64| n > 0;

    v.name_entry("Type", OPTIONAL, PdfVersion::V1_0, Some(&|t: &str| t == "XObject"))?;
    v.name_entry("Subtype", OPTIONAL, PdfVersion::V1_0, Some(&|t: &str| t == "Image"))?;
    v.integer("Width", REQUIRED, PdfVersion::V1_0, Some(&positive))?;
    v.integer("Height", REQUIRED, PdfVersion::V1_0, Some(&positive))?;
    v.integer(
        "BitsPerComponent",
        OPTIONAL,
        PdfVersion::V1_0,
        Some(&predicates::is_bits_per_component),
    )?;

    if let Some(cs) = v.any("ColorSpace", OPTIONAL, PdfVersion::V1_0)? {
        if !matches!(cs, Object::Name(_) | Object::Array(_)) {
            return Err(Error::type_mismatch(
                "thumbnailDict",
                "ColorSpace",
                "Name or Array",
                cs.type_name(),
            ));
        }
    }

    Ok(())
}

/// Validate a metadata stream entry.
///
/// PDF Spec: ISO 32000-1:2008, Section 14.3.2 - Metadata Streams.
pub fn validate_metadata_entry<R: ObjectResolver + ?Sized>(
    v: &DictValidator<'_, R>,
    required: bool,
    since: PdfVersion,
) -> Result<()> {
    let stream = match v.stream("Metadata", required, since, None)? {
        Some(stream) => stream,
        None => return Ok(()),
    };

    let m = v.nested(&stream.dict, "metaDataDict");
    m.name_entry("Type", REQUIRED, since, Some(&|t: &str| t == "Metadata"))?;
    m.name_entry("Subtype", REQUIRED, since, Some(&|t: &str| t == "XML"))?;

    Ok(())
}

/// Validate an action dictionary.
///
/// PDF Spec: ISO 32000-1:2008, Section 12.6.2 - Action Dictionaries.
/// Action-type specific entries are not inspected.
pub fn validate_action_dict<R: ObjectResolver + ?Sized>(resolver: &R, dict: &Dictionary) -> Result<()> {
    let v = DictValidator::new(resolver, dict, "actionDict");

    v.name_entry("Type", OPTIONAL, PdfVersion::V1_0, Some(&|t: &str| t == "Action"))?;
    v.name_entry("S", REQUIRED, PdfVersion::V1_0, None)?;

    if let Some(next) = v.any("Next", OPTIONAL, PdfVersion::V1_2)? {
        if !matches!(next, Object::Dictionary(_) | Object::Array(_)) {
            return Err(Error::type_mismatch(
                "actionDict",
                "Next",
                "Dictionary or Array",
                next.type_name(),
            ));
        }
    }

    Ok(())
}

/// Validate an additional-actions entry whose allowed triggers are `keys`.
///
/// PDF Spec: ISO 32000-1:2008, Section 12.6.3 - Trigger Events.
pub fn validate_additional_actions<R: ObjectResolver + ?Sized>(
    v: &DictValidator<'_, R>,
    entry: &str,
    required: bool,
    since: PdfVersion,
    keys: &[&str],
) -> Result<()> {
    let aa = match v.dictionary(entry, required, since, None)? {
        Some(aa) => aa,
        None => return Ok(()),
    };

    let a = v.nested(&aa, "additionalActionsDict");
    for key in sorted_keys(&aa) {
        if !keys.contains(&key.as_str()) {
            return Err(Error::constraint("additionalActionsDict", key, "unknown trigger event"));
        }
        if let Some(action) = a.dictionary(key, OPTIONAL, since, None)? {
            validate_action_dict(v.resolver(), &action)?;
        }
    }

    Ok(())
}

/// Validate a `PieceInfo` entry. Returns true if one was present.
///
/// PDF Spec: ISO 32000-1:2008, Section 14.5 - Page-Piece Dictionaries.
pub fn validate_piece_info<R: ObjectResolver + ?Sized>(
    v: &DictValidator<'_, R>,
    required: bool,
    since: PdfVersion,
) -> Result<bool> {
    let pieces = match v.dictionary("PieceInfo", required, since, None)? {
        Some(pieces) => pieces,
        None => return Ok(false),
    };

    let p = v.nested(&pieces, "pieceInfoDict");
    for key in sorted_keys(&pieces) {
        let data = match p.dictionary(key, OPTIONAL, since, None)? {
            Some(data) => data,
            None => continue,
        };
        let d = p.nested(&data, "dataDict");
        d.date("LastModified", REQUIRED, since, None)?;
        d.any("Private", OPTIONAL, since)?;
    }

    Ok(true)
}

/// Validate a colour space array whose family must be one of `families`.
///
/// PDF Spec: ISO 32000-1:2008, Section 8.6.6.4 (Separation) and 8.6.6.5
/// (DeviceN).
pub fn validate_color_space_array_subset<R: ObjectResolver + ?Sized>(
    resolver: &R,
    dict_name: &str,
    entry: &str,
    arr: &[Object],
    families: &[&str],
) -> Result<()> {
    let family = match arr.first() {
        Some(first) => resolver.resolve(first)?,
        None => return Err(Error::malformed(dict_name, entry, "empty colour space array")),
    };
    let family = family
        .as_name()
        .ok_or_else(|| Error::type_mismatch(dict_name, entry, "Name", family.type_name()))?
        .to_string();

    if !families.contains(&family.as_str()) {
        return Err(Error::constraint(dict_name, entry, format!("/{}", family)));
    }

    let arity_ok = match family.as_str() {
        "Separation" => arr.len() == 4,
        "DeviceN" => arr.len() == 4 || arr.len() == 5,
        _ => true,
    };
    if !arity_ok {
        return Err(Error::malformed(
            dict_name,
            entry,
            format!("{} colour space with {} elements", family, arr.len()),
        ));
    }

    Ok(())
}

/// Validate a form XObject stream.
///
/// PDF Spec: ISO 32000-1:2008, Section 8.10 - Form XObjects.
pub fn validate_form_xobject<R: ObjectResolver + ?Sized>(resolver: &R, stream: &Stream) -> Result<()> {
    log::debug!("Validating form XObject");
    let v = DictValidator::new(resolver, &stream.dict, "xObjectFormStreamDict");

    v.name_entry("Type", OPTIONAL, PdfVersion::V1_0, Some(&|t: &str| t == "XObject"))?;
    v.name_entry("Subtype", REQUIRED, PdfVersion::V1_0, Some(&|t: &str| t == "Form"))?;
    v.integer("FormType", OPTIONAL, PdfVersion::V1_0, Some(&|t: i64| t == 1))?;
    v.rectangle("BBox", REQUIRED, PdfVersion::V1_0, None)?;
    v.number_array("Matrix", OPTIONAL, PdfVersion::V1_0, Some(&|m: &[f64]| m.len() == 6))?;

    if let Some(resources) = v.dictionary("Resources", OPTIONAL, PdfVersion::V1_2, None)? {
        validate_resource_dict(resolver, &resources)?;
    }
    if let Some(group) = v.dictionary("Group", OPTIONAL, PdfVersion::V1_4, None)? {
        validate_group_dict(resolver, &group)?;
    }
    validate_metadata_entry(&v, OPTIONAL, PdfVersion::V1_4)?;
    validate_piece_info(&v, OPTIONAL, PdfVersion::V1_3)?;
    v.date("LastModified", OPTIONAL, PdfVersion::V1_3, None)?;
    v.integer("StructParent", OPTIONAL, PdfVersion::V1_3, None)?;
    v.integer("StructParents", OPTIONAL, PdfVersion::V1_3, None)?;

    Ok(())
}
