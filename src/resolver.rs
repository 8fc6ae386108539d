//! Indirect object resolution.
//!
//! Validators never index the object table directly. Every value they look at
//! goes through an [`ObjectResolver`], which follows indirect references and
//! reports the document version and validation mode for the run.

use crate::config::ValidationMode;
use crate::error::{Error, Result};
use crate::object::{Dictionary, Object, ObjectRef, Stream};
use crate::version::PdfVersion;
use std::collections::{HashMap, HashSet};

/// Maximum length of a reference chain (`1 0 R` pointing at `2 0 R` ...).
const MAX_RESOLVE_DEPTH: u32 = 100;

/// Read access to an already-materialised object graph.
///
/// Implementors provide object lookup and the per-run document facts; the
/// chain-following and typed resolution helpers are provided.
pub trait ObjectResolver {
    /// Load the object stored under `obj_ref`.
    ///
    /// The returned object may itself be a reference; [`resolve`](Self::resolve)
    /// follows the chain.
    fn load_object(&self, obj_ref: ObjectRef) -> Result<Object>;

    /// Version of the document being validated.
    fn version(&self) -> PdfVersion;

    /// Validation mode for this run.
    fn mode(&self) -> ValidationMode;

    /// The document catalog (the trailer's `/Root`).
    fn catalog(&self) -> Result<Dictionary>;

    /// Record the document-wide page count.
    ///
    /// Called once, from the page tree root, before the tree is walked.
    fn record_page_count(&mut self, count: usize);

    /// Follow indirect references until a direct object is reached.
    ///
    /// Direct objects are returned as they are.
    fn resolve(&self, obj: &Object) -> Result<Object> {
        let mut current = match obj {
            Object::Reference(obj_ref) => *obj_ref,
            other => return Ok(other.clone()),
        };

        let mut seen: HashSet<ObjectRef> = HashSet::new();
        loop {
            if !seen.insert(current) {
                log::error!("Circular reference detected for object {}", current);
                return Err(Error::CircularReference(current));
            }
            if seen.len() as u32 > MAX_RESOLVE_DEPTH {
                log::error!(
                    "Recursion depth limit exceeded ({}) while resolving object {}",
                    MAX_RESOLVE_DEPTH,
                    current
                );
                return Err(Error::RecursionLimitExceeded(MAX_RESOLVE_DEPTH));
            }

            match self.load_object(current)? {
                Object::Reference(next) => current = next,
                value => return Ok(value),
            }
        }
    }

    /// Resolve to a dictionary. Null resolves to `None`.
    fn resolve_dict(&self, obj: &Object) -> Result<Option<Dictionary>> {
        match self.resolve(obj)? {
            Object::Null => Ok(None),
            Object::Dictionary(dict) => Ok(Some(dict)),
            other => Err(mismatch(obj, "Dictionary", &other)),
        }
    }

    /// Resolve to an array. Null resolves to `None`.
    fn resolve_array(&self, obj: &Object) -> Result<Option<Vec<Object>>> {
        match self.resolve(obj)? {
            Object::Null => Ok(None),
            Object::Array(arr) => Ok(Some(arr)),
            other => Err(mismatch(obj, "Array", &other)),
        }
    }

    /// Resolve to a stream. Null resolves to `None`.
    fn resolve_stream(&self, obj: &Object) -> Result<Option<Stream>> {
        match self.resolve(obj)? {
            Object::Null => Ok(None),
            Object::Stream(stream) => Ok(Some(stream)),
            other => Err(mismatch(obj, "Stream", &other)),
        }
    }
}

fn mismatch(original: &Object, expected: &str, found: &Object) -> Error {
    let location = match original {
        Object::Reference(obj_ref) => obj_ref.to_string(),
        _ => "direct object".to_string(),
    };
    Error::type_mismatch("resolver", &location, expected, found.type_name())
}

/// In-memory object table.
///
/// Holds a complete object graph built by a loader or by hand, together with
/// the facts a validation run needs.
///
/// # Example
///
/// ```
/// use pdf_preflight::object::{Dictionary, Object};
/// use pdf_preflight::resolver::{ObjectResolver, ObjectStore};
/// use pdf_preflight::version::PdfVersion;
///
/// let mut store = ObjectStore::new(PdfVersion::V1_7);
/// let r = store.add(Object::Integer(42));
/// assert_eq!(store.resolve(&Object::Reference(r)).unwrap(), Object::Integer(42));
/// ```
#[derive(Debug, Clone)]
pub struct ObjectStore {
    objects: HashMap<ObjectRef, Object>,
    version: PdfVersion,
    mode: ValidationMode,
    root: Option<ObjectRef>,
    page_count: Option<usize>,
    next_id: u32,
}

impl ObjectStore {
    /// Create an empty store for a document of the given version.
    pub fn new(version: PdfVersion) -> Self {
        Self {
            objects: HashMap::new(),
            version,
            mode: ValidationMode::default(),
            root: None,
            page_count: None,
            next_id: 1,
        }
    }

    /// Set the validation mode.
    pub fn with_mode(mut self, mode: ValidationMode) -> Self {
        self.mode = mode;
        self
    }

    /// Change the document version.
    pub fn set_version(&mut self, version: PdfVersion) {
        self.version = version;
    }

    /// Change the validation mode.
    pub fn set_mode(&mut self, mode: ValidationMode) {
        self.mode = mode;
    }

    /// Store `obj` under an explicit reference, replacing any previous value.
    pub fn insert(&mut self, obj_ref: ObjectRef, obj: Object) {
        if obj_ref.id >= self.next_id {
            self.next_id = obj_ref.id + 1;
        }
        self.objects.insert(obj_ref, obj);
    }

    /// Store `obj` under the next free object number.
    pub fn add(&mut self, obj: Object) -> ObjectRef {
        let obj_ref = self.reserve();
        self.objects.insert(obj_ref, obj);
        obj_ref
    }

    /// Allocate an object number without storing anything yet.
    ///
    /// Needed for graphs with back-references, where a parent must know the
    /// numbers of its children before they exist and vice versa.
    pub fn reserve(&mut self) -> ObjectRef {
        let obj_ref = ObjectRef::new(self.next_id, 0);
        self.next_id += 1;
        obj_ref
    }

    /// Mark `obj_ref` as the document catalog.
    pub fn set_root(&mut self, obj_ref: ObjectRef) {
        self.root = Some(obj_ref);
    }

    /// The page count recorded by the last validation run, if any.
    pub fn page_count(&self) -> Option<usize> {
        self.page_count
    }

    /// Number of stored objects.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// True if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

impl ObjectResolver for ObjectStore {
    fn load_object(&self, obj_ref: ObjectRef) -> Result<Object> {
        log::trace!("Loading object {}", obj_ref);
        self.objects
            .get(&obj_ref)
            .cloned()
            .ok_or(Error::ObjectNotFound(obj_ref))
    }

    fn version(&self) -> PdfVersion {
        self.version
    }

    fn mode(&self) -> ValidationMode {
        self.mode
    }

    fn catalog(&self) -> Result<Dictionary> {
        let root = self.root.ok_or_else(|| Error::missing("trailer", "Root"))?;
        self.resolve_dict(&Object::Reference(root))?
            .ok_or_else(|| Error::missing("trailer", "Root"))
    }

    fn record_page_count(&mut self, count: usize) {
        match self.page_count {
            Some(existing) => {
                log::debug!("Page count already recorded ({}), ignoring {}", existing, count);
            },
            None => self.page_count = Some(count),
        }
    }
}
