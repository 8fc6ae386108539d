//! Shared helpers for building in-memory object graphs.

#![allow(dead_code)]

use pdf_preflight::object::{Dictionary, Object, ObjectRef, Stream};
use pdf_preflight::resolver::ObjectStore;
use pdf_preflight::version::PdfVersion;
use pdf_preflight::ValidationMode;

/// Install a test logger once; repeated calls are harmless.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn dict(entries: Vec<(&str, Object)>) -> Dictionary {
    entries
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect()
}

pub fn name(s: &str) -> Object {
    Object::Name(s.to_string())
}

pub fn string(s: &str) -> Object {
    Object::String(s.as_bytes().to_vec())
}

pub fn int(i: i64) -> Object {
    Object::Integer(i)
}

pub fn rect(llx: i64, lly: i64, urx: i64, ury: i64) -> Object {
    Object::Array(vec![int(llx), int(lly), int(urx), int(ury)])
}

pub fn refs(items: &[ObjectRef]) -> Object {
    Object::Array(items.iter().map(|r| Object::Reference(*r)).collect())
}

/// Builder for documents with a catalog and a page tree.
pub struct GraphBuilder {
    pub store: ObjectStore,
}

impl GraphBuilder {
    pub fn new(version: PdfVersion) -> Self {
        init_logging();
        Self {
            store: ObjectStore::new(version),
        }
    }

    pub fn relaxed(mut self) -> Self {
        self.store.set_mode(ValidationMode::Relaxed);
        self
    }

    pub fn reserve(&mut self) -> ObjectRef {
        self.store.reserve()
    }

    pub fn put(&mut self, obj_ref: ObjectRef, d: Dictionary) {
        self.store.insert(obj_ref, Object::Dictionary(d));
    }

    pub fn add_dict(&mut self, d: Dictionary) -> ObjectRef {
        self.store.add(Object::Dictionary(d))
    }

    pub fn add_stream(&mut self, d: Dictionary, data: &[u8]) -> ObjectRef {
        self.store.add(Object::Stream(Stream::new(d, data.to_vec())))
    }

    /// Content stream with a trivial payload.
    pub fn add_contents(&mut self) -> ObjectRef {
        self.add_stream(Dictionary::new(), b"0 0 m 10 10 l S")
    }

    /// Leaf page under `parent` with the given extra entries.
    pub fn add_page(&mut self, parent: ObjectRef, extra: Vec<(&str, Object)>) -> ObjectRef {
        let mut d = dict(vec![("Type", name("Page")), ("Parent", Object::Reference(parent))]);
        for (k, v) in extra {
            d.insert(k.to_string(), v);
        }
        self.add_dict(d)
    }

    /// Fill a reserved slot with a `Pages` node.
    pub fn put_pages(
        &mut self,
        node: ObjectRef,
        parent: Option<ObjectRef>,
        kids: &[ObjectRef],
        count: i64,
        extra: Vec<(&str, Object)>,
    ) {
        let mut d = dict(vec![
            ("Type", name("Pages")),
            ("Kids", refs(kids)),
            ("Count", int(count)),
        ]);
        if let Some(parent) = parent {
            d.insert("Parent".to_string(), Object::Reference(parent));
        }
        for (k, v) in extra {
            d.insert(k.to_string(), v);
        }
        self.put(node, d);
    }

    /// Add the catalog and make it the document root.
    pub fn finish_catalog(&mut self, pages: ObjectRef, extra: Vec<(&str, Object)>) -> ObjectRef {
        let mut d = dict(vec![("Type", name("Catalog")), ("Pages", Object::Reference(pages))]);
        for (k, v) in extra {
            d.insert(k.to_string(), v);
        }
        let catalog = self.add_dict(d);
        self.store.set_root(catalog);
        catalog
    }

    /// Single-page document whose page carries `page_extra`.
    pub fn single_page(version: PdfVersion, page_extra: Vec<(&str, Object)>) -> Self {
        let mut b = Self::new(version);
        let root = b.reserve();
        let mut extra = vec![("MediaBox", rect(0, 0, 612, 792))];
        extra.extend(page_extra);
        let page = b.add_page(root, extra);
        b.put_pages(root, None, &[page], 1, vec![]);
        b.finish_catalog(root, vec![]);
        b
    }
}
