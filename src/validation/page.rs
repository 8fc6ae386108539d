//! Leaf page validation.
//!
//! PDF Spec: ISO 32000-1:2008, Section 7.7.3.3 - Page Objects, Table 30.

use super::common::{
    validate_additional_actions, validate_color_space_array_subset, validate_group_dict,
    validate_metadata_entry, validate_piece_info, validate_resource_dict, validate_thumbnail,
};
use super::entry::{DictValidator, OPTIONAL, REQUIRED};
use super::page_tree::{InheritedAttributes, PageSummary, ResourceSource};
use super::predicates;
use crate::config::{effective_min_version, ValidationMode};
use crate::error::{Error, Result};
use crate::object::{Dictionary, Object, ObjectRef};
use crate::resolver::ObjectResolver;
use crate::version::PdfVersion;

/// Trigger events allowed in a page's additional-actions dictionary.
const PAGE_TRIGGERS: &[&str] = &["O", "C"];

/// Validate a leaf `Page` dictionary with the attributes it inherits.
///
/// The `/Parent` back-reference is checked by the tree walk, which knows
/// which node listed the page.
pub fn validate_page_dict<R: ObjectResolver + ?Sized>(
    resolver: &R,
    page: &Dictionary,
    page_ref: ObjectRef,
    inherited: &InheritedAttributes,
) -> Result<PageSummary> {
    log::debug!("Validating page {}", page_ref);
    let v = DictValidator::new(resolver, page, "pageDict");

    let has_contents = validate_page_contents(&v)?;
    let resources = validate_page_resources(&v, inherited, has_contents)?;

    let media_box = v
        .rectangle("MediaBox", inherited.media_box.is_none(), PdfVersion::V1_0, None)?
        .or(inherited.media_box)
        .ok_or_else(|| Error::missing("pageDict", "MediaBox"))?;

    let piece_info_since = effective_min_version(PdfVersion::V1_3, PdfVersion::V1_0, v.mode());
    let has_piece_info = validate_piece_info(&v, OPTIONAL, piece_info_since)?;
    let last_modified = v.date("LastModified", OPTIONAL, PdfVersion::V1_3, None)?;
    if has_piece_info && last_modified.is_none() && v.mode() == ValidationMode::Strict {
        return Err(Error::StructuralInconsistency(format!(
            "page {} has /PieceInfo but no /LastModified",
            page_ref
        )));
    }

    validate_additional_actions(&v, "AA", OPTIONAL, PdfVersion::V1_4, PAGE_TRIGGERS)?;

    let crop_box = v
        .rectangle("CropBox", OPTIONAL, PdfVersion::V1_0, None)?
        .or(inherited.crop_box)
        .and_then(|crop| {
            let clipped = crop.intersect(&media_box);
            if clipped.is_none() {
                log::warn!("Page {}: CropBox {} lies outside MediaBox {}", page_ref, crop, media_box);
            }
            clipped
        });
    v.rectangle("BleedBox", OPTIONAL, PdfVersion::V1_3, None)?;
    v.rectangle("TrimBox", OPTIONAL, PdfVersion::V1_3, None)?;
    v.rectangle("ArtBox", OPTIONAL, PdfVersion::V1_3, None)?;
    validate_box_color_info(&v, OPTIONAL, PdfVersion::V1_4)?;

    let rotate = v.integer(
        "Rotate",
        OPTIONAL,
        PdfVersion::V1_0,
        Some(&predicates::is_valid_rotation),
    )?;

    if let Some(group) = v.dictionary("Group", OPTIONAL, PdfVersion::V1_4, None)? {
        validate_group_dict(resolver, &group)?;
    }
    if let Some(thumb) = v.stream("Thumb", OPTIONAL, PdfVersion::V1_0, None)? {
        validate_thumbnail(resolver, &thumb)?;
    }

    // Beads only make sense with article threads in the catalog.
    v.indirect_ref_array("B", OPTIONAL, PdfVersion::V1_1, None)?;
    v.number("Dur", OPTIONAL, PdfVersion::V1_1, None)?;
    validate_transition_entry(&v, OPTIONAL, PdfVersion::V1_1)?;
    validate_metadata_entry(&v, OPTIONAL, PdfVersion::V1_4)?;
    v.integer("StructParents", OPTIONAL, PdfVersion::V1_0, None)?;
    v.string("ID", OPTIONAL, PdfVersion::V1_3, None)?;
    v.number("PZ", OPTIONAL, PdfVersion::V1_3, None)?;
    validate_separation_info(&v, OPTIONAL, PdfVersion::V1_3)?;
    v.name_entry("Tabs", OPTIONAL, PdfVersion::V1_5, Some(&predicates::is_tab_order))?;
    v.name_entry("TemplateInstantiated", OPTIONAL, PdfVersion::V1_5, None)?;
    validate_pres_steps(&v, OPTIONAL, PdfVersion::V1_5)?;
    v.number("UserUnit", OPTIONAL, PdfVersion::V1_6, Some(&|u: f64| u > 0.0))?;
    validate_viewports(&v, OPTIONAL, PdfVersion::V1_6)?;

    log::debug!("Finished page {}", page_ref);

    Ok(PageSummary {
        object: page_ref,
        media_box,
        crop_box,
        rotate: rotate.or(inherited.rotate),
        resources,
        has_contents,
    })
}

/// Validate `Contents`. Returns true if at least one content stream exists.
///
/// Null elements of a content array are skipped.
pub fn validate_page_contents<R: ObjectResolver + ?Sized>(v: &DictValidator<'_, R>) -> Result<bool> {
    let contents = match v.any("Contents", OPTIONAL, PdfVersion::V1_0)? {
        Some(contents) => contents,
        None => return Ok(false),
    };

    match contents {
        Object::Stream(_) => Ok(true),
        Object::Array(streams) => {
            let mut found = false;
            for (i, element) in streams.iter().enumerate() {
                match v.resolver().resolve(element)? {
                    Object::Null => continue,
                    Object::Stream(_) => found = true,
                    other => {
                        return Err(Error::type_mismatch(
                            v.name(),
                            &format!("Contents[{}]", i),
                            "Stream",
                            other.type_name(),
                        ))
                    },
                }
            }
            Ok(found)
        },
        other => Err(Error::type_mismatch(
            v.name(),
            "Contents",
            "Stream or Array",
            other.type_name(),
        )),
    }
}

fn validate_page_resources<R: ObjectResolver + ?Sized>(
    v: &DictValidator<'_, R>,
    inherited: &InheritedAttributes,
    has_contents: bool,
) -> Result<ResourceSource> {
    if let Some(resources) = v.dictionary("Resources", OPTIONAL, PdfVersion::V1_0, None)? {
        validate_resource_dict(v.resolver(), &resources)?;
        return Ok(ResourceSource::Local);
    }
    if inherited.resources.is_some() {
        return Ok(ResourceSource::Inherited);
    }
    if has_contents {
        return Err(Error::StructuralInconsistency(
            "page has content but no /Resources on the page or any ancestor".to_string(),
        ));
    }
    Ok(ResourceSource::None)
}

/// Validate a box style dictionary (one entry of `BoxColorInfo`).
///
/// PDF Spec: ISO 32000-1:2008, Section 14.11.2.2 - Display of Page Boundaries.
fn validate_box_style<R: ObjectResolver + ?Sized>(
    v: &DictValidator<'_, R>,
    entry: &str,
    since: PdfVersion,
) -> Result<()> {
    let style = match v.dictionary(entry, OPTIONAL, since, None)? {
        Some(style) => style,
        None => return Ok(()),
    };
    let s = v.nested(&style, "boxStyleDict");

    s.number_array("C", OPTIONAL, since, Some(&|c: &[f64]| c.len() == 3))?;
    s.number("W", OPTIONAL, since, None)?;
    s.name_entry("S", OPTIONAL, since, Some(&predicates::is_guideline_style))?;
    s.number_array("D", OPTIONAL, since, None)?;

    Ok(())
}

/// Validate `BoxColorInfo`.
pub fn validate_box_color_info<R: ObjectResolver + ?Sized>(
    v: &DictValidator<'_, R>,
    required: bool,
    since: PdfVersion,
) -> Result<()> {
    let info = match v.dictionary("BoxColorInfo", required, since, None)? {
        Some(info) => info,
        None => return Ok(()),
    };
    let b = v.nested(&info, "boxColorInfoDict");
    for entry in ["CropBox", "BleedBox", "TrimBox", "ArtBox"] {
        validate_box_style(&b, entry, since)?;
    }
    Ok(())
}

/// Validate the `Trans` entry.
pub fn validate_transition_entry<R: ObjectResolver + ?Sized>(
    v: &DictValidator<'_, R>,
    required: bool,
    since: PdfVersion,
) -> Result<()> {
    match v.dictionary("Trans", required, since, None)? {
        Some(trans) => validate_transition_dict(v.resolver(), &trans),
        None => Ok(()),
    }
}

/// Validate a transition dictionary.
///
/// PDF Spec: ISO 32000-1:2008, Section 12.4.4.1 - Transitions, Table 162.
/// `Dm`, `M`, `SS` and `B` are only meaningful for some styles and are
/// rejected when present with any other.
pub fn validate_transition_dict<R: ObjectResolver + ?Sized>(resolver: &R, dict: &Dictionary) -> Result<()> {
    let v = DictValidator::new(resolver, dict, "transitionDict");
    let version = v.version();

    v.name_entry("Type", OPTIONAL, PdfVersion::V1_0, Some(&|t: &str| t == "Trans"))?;

    let is_style = |s: &str| predicates::is_transition_style(s, version);
    let style = v.name_entry("S", OPTIONAL, PdfVersion::V1_0, Some(&is_style))?;
    let style_in = |allowed: &[&str]| {
        style
            .as_deref()
            .is_some_and(|s| allowed.iter().any(|a| *a == s))
    };

    v.number("D", OPTIONAL, PdfVersion::V1_0, Some(&|d: f64| d > 0.0))?;

    let dm_ok = |dm: &str| predicates::is_transition_dimension(dm) && style_in(&["Split", "Blinds"]);
    v.name_entry("Dm", OPTIONAL, PdfVersion::V1_0, Some(&dm_ok))?;

    let m_ok = |m: &str| predicates::is_transition_motion(m) && style_in(&["Split", "Box", "Fly"]);
    v.name_entry("M", OPTIONAL, PdfVersion::V1_0, Some(&m_ok))?;

    match v.any("Di", OPTIONAL, PdfVersion::V1_0)? {
        None => {},
        Some(Object::Integer(di)) if predicates::is_transition_direction(di) => {},
        Some(Object::Name(n)) if n == "None" => {},
        Some(Object::Integer(di)) => return Err(Error::constraint("transitionDict", "Di", di)),
        Some(Object::Name(n)) => return Err(Error::constraint("transitionDict", "Di", format!("/{}", n))),
        Some(other) => {
            return Err(Error::type_mismatch(
                "transitionDict",
                "Di",
                "Integer or Name",
                other.type_name(),
            ))
        },
    }

    let fly_only_number = |_: f64| style_in(&["Fly"]);
    v.number("SS", OPTIONAL, PdfVersion::V1_5, Some(&fly_only_number))?;
    let fly_only_bool = |_: bool| style_in(&["Fly"]);
    v.boolean("B", OPTIONAL, PdfVersion::V1_5, Some(&fly_only_bool))?;

    Ok(())
}

/// Validate `SeparationInfo`.
///
/// PDF Spec: ISO 32000-1:2008, Section 14.11.4 - Separation Dictionaries.
pub fn validate_separation_info<R: ObjectResolver + ?Sized>(
    v: &DictValidator<'_, R>,
    required: bool,
    since: PdfVersion,
) -> Result<()> {
    let info = match v.dictionary("SeparationInfo", required, since, None)? {
        Some(info) => info,
        None => return Ok(()),
    };
    let s = v.nested(&info, "separationDict");

    s.indirect_ref_array("Pages", REQUIRED, since, None)?;
    s.name_or_string("DeviceColorant", REQUIRED, since, None)?;
    if let Some(cs) = s.array("ColorSpace", OPTIONAL, since, None)? {
        validate_color_space_array_subset(
            v.resolver(),
            "separationDict",
            "ColorSpace",
            &cs,
            &["Separation", "DeviceN"],
        )?;
    }

    Ok(())
}

/// `PresSteps` is recognised but not supported.
fn validate_pres_steps<R: ObjectResolver + ?Sized>(
    v: &DictValidator<'_, R>,
    required: bool,
    since: PdfVersion,
) -> Result<()> {
    if v.dictionary("PresSteps", required, since, None)?.is_some() {
        return Err(Error::UnsupportedFeature(
            "navigation node dictionaries (/PresSteps)".to_string(),
        ));
    }
    Ok(())
}

/// Resolve the elements of an array that must hold dictionaries.
///
/// Null elements are dropped.
fn dictionary_elements<R: ObjectResolver + ?Sized>(
    v: &DictValidator<'_, R>,
    entry: &str,
    arr: &[Object],
) -> Result<Vec<Dictionary>> {
    let mut dicts = Vec::with_capacity(arr.len());
    for (i, element) in arr.iter().enumerate() {
        match v.resolver().resolve(element)? {
            Object::Null => continue,
            Object::Dictionary(d) => dicts.push(d),
            other => {
                return Err(Error::type_mismatch(
                    v.name(),
                    &format!("{}[{}]", entry, i),
                    "Dictionary",
                    other.type_name(),
                ))
            },
        }
    }
    Ok(dicts)
}

/// Validate a number format dictionary.
///
/// PDF Spec: ISO 32000-1:2008, Section 12.9 - Measurement Properties, Table 263.
fn validate_number_format_dict<R: ObjectResolver + ?Sized>(
    resolver: &R,
    dict: &Dictionary,
    since: PdfVersion,
) -> Result<()> {
    let v = DictValidator::new(resolver, dict, "numberFormatDict");

    v.name_entry("Type", OPTIONAL, since, Some(&|t: &str| t == "NumberFormat"))?;
    v.string("U", REQUIRED, since, None)?;
    v.number("C", REQUIRED, since, None)?;
    v.name_entry("F", OPTIONAL, since, Some(&|f: &str| matches!(f, "D" | "F" | "R" | "T")))?;
    v.integer("D", OPTIONAL, since, None)?;
    v.boolean("FD", OPTIONAL, since, None)?;
    v.string("RT", OPTIONAL, since, None)?;
    v.string("RD", OPTIONAL, since, None)?;
    v.string("PS", OPTIONAL, since, None)?;
    v.string("SS", OPTIONAL, since, None)?;
    v.name_entry("O", OPTIONAL, since, Some(&|o: &str| matches!(o, "S" | "P")))?;

    Ok(())
}

fn validate_number_format_array<R: ObjectResolver + ?Sized>(
    v: &DictValidator<'_, R>,
    entry: &str,
    required: bool,
    since: PdfVersion,
) -> Result<()> {
    let arr = match v.array(entry, required, since, None)? {
        Some(arr) => arr,
        None => return Ok(()),
    };
    for format in dictionary_elements(v, entry, &arr)? {
        validate_number_format_dict(v.resolver(), &format, since)?;
    }
    Ok(())
}

/// Validate a rectilinear measure dictionary.
fn validate_measure_dict<R: ObjectResolver + ?Sized>(
    resolver: &R,
    dict: &Dictionary,
    since: PdfVersion,
) -> Result<()> {
    let v = DictValidator::new(resolver, dict, "measureDict");

    v.name_entry("Type", OPTIONAL, since, Some(&|t: &str| t == "Measure"))?;
    v.name_entry("Subtype", OPTIONAL, since, Some(&|t: &str| t == "RL"))?;
    v.string("R", REQUIRED, since, None)?;
    validate_number_format_array(&v, "X", REQUIRED, since)?;
    validate_number_format_array(&v, "Y", OPTIONAL, since)?;
    validate_number_format_array(&v, "D", REQUIRED, since)?;
    validate_number_format_array(&v, "A", REQUIRED, since)?;
    validate_number_format_array(&v, "T", OPTIONAL, since)?;
    validate_number_format_array(&v, "S", OPTIONAL, since)?;
    v.number_array("O", OPTIONAL, since, Some(&|o: &[f64]| o.len() == 2))?;
    v.number("CYX", OPTIONAL, since, None)?;

    Ok(())
}

/// Validate a viewport dictionary.
///
/// PDF Spec: ISO 32000-1:2008, Section 12.9.2 - Viewports, Table 260.
fn validate_viewport_dict<R: ObjectResolver + ?Sized>(
    resolver: &R,
    dict: &Dictionary,
    since: PdfVersion,
) -> Result<()> {
    let v = DictValidator::new(resolver, dict, "viewportDict");

    v.name_entry("Type", OPTIONAL, since, Some(&|t: &str| t == "Viewport"))?;
    v.rectangle("BBox", REQUIRED, since, None)?;
    v.string("Name", OPTIONAL, since, None)?;
    if let Some(measure) = v.dictionary("Measure", OPTIONAL, since, None)? {
        validate_measure_dict(resolver, &measure, since)?;
    }

    Ok(())
}

/// Validate `VP`, an array of viewport dictionaries.
pub fn validate_viewports<R: ObjectResolver + ?Sized>(
    v: &DictValidator<'_, R>,
    required: bool,
    since: PdfVersion,
) -> Result<()> {
    let arr = match v.array("VP", required, since, None)? {
        Some(arr) => arr,
        None => return Ok(()),
    };
    for viewport in dictionary_elements(v, "VP", &arr)? {
        validate_viewport_dict(v.resolver(), &viewport, since)?;
    }
    Ok(())
}
