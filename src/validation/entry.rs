//! Typed, version-aware dictionary entry validation.
//!
//! Every dictionary validator in this crate is written as a flat list of
//! entry declarations against a [`DictValidator`]. Each typed accessor runs
//! the same sequence:
//!
//! 1. look the entry up; absent is `None`, or `MissingRequiredField` if required
//! 2. resolve it; a resolved `null` counts as absent
//! 3. check the kind (`TypeMismatch`), or the shape for rectangles and dates
//!    (`MalformedValue`)
//! 4. compare the document version with the entry's minimum (`VersionTooLow`)
//! 5. apply the optional predicate (`ConstraintViolated`)
//!
//! Resolver faults propagate unchanged at step 2.
//!
//! The minimum version passed in is taken as final. Mode-dependent thresholds
//! are selected by the caller with [`crate::config::effective_min_version`].

use crate::config::ValidationMode;
use crate::error::{Error, Result};
use crate::geometry::Rectangle;
use crate::object::{decode_text_string, Dictionary, Object, ObjectRef, Stream};
use crate::resolver::ObjectResolver;
use crate::validation::predicates;
use crate::version::PdfVersion;
use chrono::{DateTime, FixedOffset};

/// Entry must be present.
pub const REQUIRED: bool = true;
/// Entry may be absent.
pub const OPTIONAL: bool = false;

/// Entry validator bound to one dictionary.
///
/// `name` is the role of the dictionary (`"pageDict"`, `"fileSpecDict"`) and
/// appears in every error it produces.
pub struct DictValidator<'a, R: ObjectResolver + ?Sized> {
    resolver: &'a R,
    dict: &'a Dictionary,
    name: &'a str,
}

impl<'a, R: ObjectResolver + ?Sized> DictValidator<'a, R> {
    /// Bind a validator to `dict`.
    pub fn new(resolver: &'a R, dict: &'a Dictionary, name: &'a str) -> Self {
        Self {
            resolver,
            dict,
            name,
        }
    }

    /// Validator for a nested dictionary sharing this one's resolver.
    pub fn nested<'b>(&self, dict: &'b Dictionary, name: &'b str) -> DictValidator<'b, R>
    where
        'a: 'b,
    {
        DictValidator::new(self.resolver, dict, name)
    }

    /// The resolver in use.
    pub fn resolver(&self) -> &'a R {
        self.resolver
    }

    /// Role name used in diagnostics.
    pub fn name(&self) -> &'a str {
        self.name
    }

    /// Document version.
    pub fn version(&self) -> PdfVersion {
        self.resolver.version()
    }

    /// Validation mode.
    pub fn mode(&self) -> ValidationMode {
        self.resolver.mode()
    }

    /// True if `entry` is present at all, without resolving it.
    pub fn has(&self, entry: &str) -> bool {
        self.dict.contains_key(entry)
    }

    /// Fail with `VersionTooLow` if the document predates `min_version`.
    pub fn check_version(&self, entry: &str, min_version: PdfVersion) -> Result<()> {
        let actual = self.resolver.version();
        if actual < min_version {
            return Err(Error::VersionTooLow {
                dict: self.name.to_string(),
                entry: entry.to_string(),
                required: min_version,
                actual,
            });
        }
        Ok(())
    }

    /// Look up and resolve `entry`, folding null into absence.
    fn fetch(&self, entry: &str, required: bool) -> Result<Option<Object>> {
        let raw = match self.dict.get(entry) {
            Some(raw) => raw,
            None => return self.absent(entry, required),
        };
        let value = self.resolver.resolve(raw)?;
        if value.is_null() {
            return self.absent(entry, required);
        }
        Ok(Some(value))
    }

    fn absent<T>(&self, entry: &str, required: bool) -> Result<Option<T>> {
        if required {
            Err(Error::missing(self.name, entry))
        } else {
            Ok(None)
        }
    }

    /// Fetch, convert to the expected kind, then version-check.
    fn typed<T>(
        &self,
        entry: &str,
        required: bool,
        min_version: PdfVersion,
        expected: &str,
        convert: impl FnOnce(Object) -> std::result::Result<T, Object>,
    ) -> Result<Option<T>> {
        let value = match self.fetch(entry, required)? {
            Some(value) => value,
            None => return Ok(None),
        };
        let typed = convert(value)
            .map_err(|other| Error::type_mismatch(self.name, entry, expected, other.type_name()))?;
        self.check_version(entry, min_version)?;
        Ok(Some(typed))
    }

    fn violated(&self, entry: &str, value: impl std::fmt::Display) -> Error {
        Error::constraint(self.name, entry, value)
    }

    /// Any kind. Only presence and version are checked.
    pub fn any(&self, entry: &str, required: bool, min_version: PdfVersion) -> Result<Option<Object>> {
        self.typed(entry, required, min_version, "any", Ok)
    }

    /// Boolean entry.
    pub fn boolean(
        &self,
        entry: &str,
        required: bool,
        min_version: PdfVersion,
        predicate: Option<&dyn Fn(bool) -> bool>,
    ) -> Result<Option<bool>> {
        let value = self.typed(entry, required, min_version, "Boolean", |o| match o {
            Object::Boolean(b) => Ok(b),
            other => Err(other),
        })?;
        if let (Some(b), Some(p)) = (value, predicate) {
            if !p(b) {
                return Err(self.violated(entry, b));
            }
        }
        Ok(value)
    }

    /// Integer entry. Reals are rejected.
    pub fn integer(
        &self,
        entry: &str,
        required: bool,
        min_version: PdfVersion,
        predicate: Option<&dyn Fn(i64) -> bool>,
    ) -> Result<Option<i64>> {
        let value = self.typed(entry, required, min_version, "Integer", |o| match o {
            Object::Integer(i) => Ok(i),
            other => Err(other),
        })?;
        if let (Some(i), Some(p)) = (value, predicate) {
            if !p(i) {
                return Err(self.violated(entry, i));
            }
        }
        Ok(value)
    }

    /// Number entry. Integers are widened.
    pub fn number(
        &self,
        entry: &str,
        required: bool,
        min_version: PdfVersion,
        predicate: Option<&dyn Fn(f64) -> bool>,
    ) -> Result<Option<f64>> {
        let value = self.typed(entry, required, min_version, "Number", |o| match o.as_number() {
            Some(n) => Ok(n),
            None => Err(o),
        })?;
        if let (Some(n), Some(p)) = (value, predicate) {
            if !p(n) {
                return Err(self.violated(entry, n));
            }
        }
        Ok(value)
    }

    /// Name entry, returned without the leading slash.
    pub fn name_entry(
        &self,
        entry: &str,
        required: bool,
        min_version: PdfVersion,
        predicate: Option<&dyn Fn(&str) -> bool>,
    ) -> Result<Option<String>> {
        let value = self.typed(entry, required, min_version, "Name", |o| match o {
            Object::Name(n) => Ok(n),
            other => Err(other),
        })?;
        if let (Some(n), Some(p)) = (&value, predicate) {
            if !p(n) {
                return Err(self.violated(entry, format!("/{}", n)));
            }
        }
        Ok(value)
    }

    /// String entry, decoded as a text string.
    pub fn string(
        &self,
        entry: &str,
        required: bool,
        min_version: PdfVersion,
        predicate: Option<&dyn Fn(&str) -> bool>,
    ) -> Result<Option<String>> {
        let value = self.typed(entry, required, min_version, "String", |o| match o {
            Object::String(bytes) => Ok(decode_text_string(&bytes)),
            other => Err(other),
        })?;
        if let (Some(s), Some(p)) = (&value, predicate) {
            if !p(s) {
                return Err(self.violated(entry, format!("({})", s)));
            }
        }
        Ok(value)
    }

    /// Name or string entry, returned as text.
    pub fn name_or_string(
        &self,
        entry: &str,
        required: bool,
        min_version: PdfVersion,
        predicate: Option<&dyn Fn(&str) -> bool>,
    ) -> Result<Option<String>> {
        let value = self.typed(entry, required, min_version, "Name or String", |o| match o {
            Object::Name(n) => Ok(n),
            Object::String(bytes) => Ok(decode_text_string(&bytes)),
            other => Err(other),
        })?;
        if let (Some(s), Some(p)) = (&value, predicate) {
            if !p(s) {
                return Err(self.violated(entry, s));
            }
        }
        Ok(value)
    }

    /// Dictionary entry. Streams are rejected.
    pub fn dictionary(
        &self,
        entry: &str,
        required: bool,
        min_version: PdfVersion,
        predicate: Option<&dyn Fn(&Dictionary) -> bool>,
    ) -> Result<Option<Dictionary>> {
        let value = self.typed(entry, required, min_version, "Dictionary", |o| match o {
            Object::Dictionary(d) => Ok(d),
            other => Err(other),
        })?;
        if let (Some(d), Some(p)) = (&value, predicate) {
            if !p(d) {
                return Err(self.violated(entry, format!("dictionary with {} entries", d.len())));
            }
        }
        Ok(value)
    }

    /// Array entry. Elements are left unresolved.
    pub fn array(
        &self,
        entry: &str,
        required: bool,
        min_version: PdfVersion,
        predicate: Option<&dyn Fn(&[Object]) -> bool>,
    ) -> Result<Option<Vec<Object>>> {
        let value = self.typed(entry, required, min_version, "Array", |o| match o {
            Object::Array(a) => Ok(a),
            other => Err(other),
        })?;
        if let (Some(a), Some(p)) = (&value, predicate) {
            if !p(a) {
                return Err(self.violated(entry, format!("array of length {}", a.len())));
            }
        }
        Ok(value)
    }

    /// Stream entry.
    pub fn stream(
        &self,
        entry: &str,
        required: bool,
        min_version: PdfVersion,
        predicate: Option<&dyn Fn(&Stream) -> bool>,
    ) -> Result<Option<Stream>> {
        let value = self.typed(entry, required, min_version, "Stream", |o| match o {
            Object::Stream(s) => Ok(s),
            other => Err(other),
        })?;
        if let (Some(s), Some(p)) = (&value, predicate) {
            if !p(s) {
                return Err(self.violated(entry, format!("stream of {} bytes", s.data.len())));
            }
        }
        Ok(value)
    }

    /// Rectangle entry: an array of exactly four numbers.
    pub fn rectangle(
        &self,
        entry: &str,
        required: bool,
        min_version: PdfVersion,
        predicate: Option<&dyn Fn(&Rectangle) -> bool>,
    ) -> Result<Option<Rectangle>> {
        let arr = match self.fetch(entry, required)? {
            None => return Ok(None),
            Some(Object::Array(arr)) => arr,
            Some(other) => {
                return Err(Error::type_mismatch(self.name, entry, "Rectangle", other.type_name()))
            },
        };
        if arr.len() != 4 {
            return Err(Error::malformed(
                self.name,
                entry,
                format!("rectangle needs 4 numbers, found {}", arr.len()),
            ));
        }
        let mut coords = [0.0f64; 4];
        for (i, element) in arr.iter().enumerate() {
            let resolved = self.resolver.resolve(element)?;
            coords[i] = resolved.as_number().ok_or_else(|| {
                Error::malformed(
                    self.name,
                    entry,
                    format!("rectangle element {} is {}, not a number", i, resolved.type_name()),
                )
            })?;
        }
        self.check_version(entry, min_version)?;

        let rect = Rectangle::from_corners(coords[0], coords[1], coords[2], coords[3]);
        if let Some(p) = predicate {
            if !p(&rect) {
                return Err(self.violated(entry, rect));
            }
        }
        Ok(Some(rect))
    }

    /// Date entry: a string in `D:YYYYMMDDHHmmSSOHH'mm'` form.
    ///
    /// The `D:` prefix may be omitted in relaxed mode.
    pub fn date(
        &self,
        entry: &str,
        required: bool,
        min_version: PdfVersion,
        predicate: Option<&dyn Fn(&DateTime<FixedOffset>) -> bool>,
    ) -> Result<Option<DateTime<FixedOffset>>> {
        let text = match self.fetch(entry, required)? {
            None => return Ok(None),
            Some(Object::String(bytes)) => decode_text_string(&bytes),
            Some(other) => {
                return Err(Error::type_mismatch(self.name, entry, "Date", other.type_name()))
            },
        };
        let date = predicates::parse_date(&text, self.mode()).ok_or_else(|| {
            Error::malformed(self.name, entry, format!("invalid date string ({})", text))
        })?;
        self.check_version(entry, min_version)?;

        if let Some(p) = predicate {
            if !p(&date) {
                return Err(self.violated(entry, format!("({})", text)));
            }
        }
        Ok(Some(date))
    }

    /// Array whose elements are all indirect references.
    pub fn indirect_ref_array(
        &self,
        entry: &str,
        required: bool,
        min_version: PdfVersion,
        predicate: Option<&dyn Fn(&[ObjectRef]) -> bool>,
    ) -> Result<Option<Vec<ObjectRef>>> {
        let arr = match self.array(entry, required, min_version, None)? {
            Some(arr) => arr,
            None => return Ok(None),
        };
        let mut refs = Vec::with_capacity(arr.len());
        for (i, element) in arr.iter().enumerate() {
            match element {
                Object::Reference(r) => refs.push(*r),
                other => {
                    return Err(Error::type_mismatch(
                        self.name,
                        &format!("{}[{}]", entry, i),
                        "Reference",
                        other.type_name(),
                    ))
                },
            }
        }
        if let Some(p) = predicate {
            if !p(&refs) {
                return Err(self.violated(entry, format!("array of {} references", refs.len())));
            }
        }
        Ok(Some(refs))
    }

    /// Resolve every element of an array entry and convert it.
    fn homogeneous<T>(
        &self,
        entry: &str,
        required: bool,
        min_version: PdfVersion,
        expected: &str,
        convert: impl Fn(Object) -> std::result::Result<T, Object>,
    ) -> Result<Option<Vec<T>>> {
        let arr = match self.array(entry, required, min_version, None)? {
            Some(arr) => arr,
            None => return Ok(None),
        };
        let mut values = Vec::with_capacity(arr.len());
        for (i, element) in arr.iter().enumerate() {
            let resolved = self.resolver.resolve(element)?;
            let value = convert(resolved).map_err(|other| {
                Error::type_mismatch(
                    self.name,
                    &format!("{}[{}]", entry, i),
                    expected,
                    other.type_name(),
                )
            })?;
            values.push(value);
        }
        Ok(Some(values))
    }

    /// Array of strings, decoded as text.
    pub fn string_array(
        &self,
        entry: &str,
        required: bool,
        min_version: PdfVersion,
        predicate: Option<&dyn Fn(&[String]) -> bool>,
    ) -> Result<Option<Vec<String>>> {
        let value = self.homogeneous(entry, required, min_version, "String", |o| match o {
            Object::String(bytes) => Ok(decode_text_string(&bytes)),
            other => Err(other),
        })?;
        if let (Some(v), Some(p)) = (&value, predicate) {
            if !p(v) {
                return Err(self.violated(entry, format!("{:?}", v)));
            }
        }
        Ok(value)
    }

    /// Array of names.
    pub fn name_array(
        &self,
        entry: &str,
        required: bool,
        min_version: PdfVersion,
        predicate: Option<&dyn Fn(&[String]) -> bool>,
    ) -> Result<Option<Vec<String>>> {
        let value = self.homogeneous(entry, required, min_version, "Name", |o| match o {
            Object::Name(n) => Ok(n),
            other => Err(other),
        })?;
        if let (Some(v), Some(p)) = (&value, predicate) {
            if !p(v) {
                return Err(self.violated(entry, format!("{:?}", v)));
            }
        }
        Ok(value)
    }

    /// Array of numbers. Integers are widened.
    pub fn number_array(
        &self,
        entry: &str,
        required: bool,
        min_version: PdfVersion,
        predicate: Option<&dyn Fn(&[f64]) -> bool>,
    ) -> Result<Option<Vec<f64>>> {
        let value = self.homogeneous(entry, required, min_version, "Number", |o| match o.as_number() {
            Some(n) => Ok(n),
            None => Err(o),
        })?;
        if let (Some(v), Some(p)) = (&value, predicate) {
            if !p(v) {
                return Err(self.violated(entry, format!("{:?}", v)));
            }
        }
        Ok(value)
    }

    /// Array of integers.
    pub fn integer_array(
        &self,
        entry: &str,
        required: bool,
        min_version: PdfVersion,
        predicate: Option<&dyn Fn(&[i64]) -> bool>,
    ) -> Result<Option<Vec<i64>>> {
        let value = self.homogeneous(entry, required, min_version, "Integer", |o| match o {
            Object::Integer(i) => Ok(i),
            other => Err(other),
        })?;
        if let (Some(v), Some(p)) = (&value, predicate) {
            if !p(v) {
                return Err(self.violated(entry, format!("{:?}", v)));
            }
        }
        Ok(value)
    }
}
