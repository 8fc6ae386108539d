//! Name tree traversal.
//!
//! PDF Spec: ISO 32000-1:2008, Section 7.9.6 - Name Trees.

use super::entry::{DictValidator, OPTIONAL};
use crate::error::{Error, Result};
use crate::object::{decode_text_string, Dictionary, Object, ObjectRef};
use crate::resolver::ObjectResolver;
use crate::version::PdfVersion;
use std::collections::HashSet;

/// Walk a name tree, calling `visit` for every key/value pair in key order
/// of appearance.
///
/// Returns the number of pairs visited. Values are passed unresolved so that
/// the visitor decides how to treat indirect references.
pub fn walk_name_tree<R, F>(resolver: &R, root: &Dictionary, max_depth: usize, mut visit: F) -> Result<usize>
where
    R: ObjectResolver + ?Sized,
    F: FnMut(&str, &Object) -> Result<()>,
{
    let mut walker = NameTreeWalker {
        resolver,
        max_depth,
        visited: HashSet::new(),
        visited_pairs: 0,
    };
    walker.visit_node(root, None, 1, &mut visit)?;
    Ok(walker.visited_pairs)
}

struct NameTreeWalker<'a, R: ObjectResolver + ?Sized> {
    resolver: &'a R,
    max_depth: usize,
    visited: HashSet<ObjectRef>,
    visited_pairs: usize,
}

impl<'a, R: ObjectResolver + ?Sized> NameTreeWalker<'a, R> {
    fn visit_node<F>(
        &mut self,
        node: &Dictionary,
        node_ref: Option<ObjectRef>,
        depth: usize,
        visit: &mut F,
    ) -> Result<()>
    where
        F: FnMut(&str, &Object) -> Result<()>,
    {
        if depth > self.max_depth {
            return Err(Error::StructuralInconsistency(format!(
                "name tree deeper than {} levels",
                self.max_depth
            )));
        }

        let v = DictValidator::new(self.resolver, node, "nameTreeNodeDict");

        let pair = |limits: &[String]| limits.len() == 2;
        let limits = v.string_array("Limits", OPTIONAL, PdfVersion::V1_0, Some(&pair))?;
        if node_ref.is_none() && limits.is_some() {
            log::warn!("Name tree root carries /Limits");
        }

        if let Some(names) = v.array("Names", OPTIONAL, PdfVersion::V1_0, None)? {
            self.visit_names(&names, visit)?;
        }

        if let Some(kids) = v.array("Kids", OPTIONAL, PdfVersion::V1_0, None)? {
            for (i, kid) in kids.iter().enumerate() {
                let kid_ref = kid.as_reference().ok_or_else(|| {
                    Error::type_mismatch(
                        "nameTreeNodeDict",
                        &format!("Kids[{}]", i),
                        "Reference",
                        kid.type_name(),
                    )
                })?;
                if !self.visited.insert(kid_ref) {
                    return Err(Error::StructuralInconsistency(format!(
                        "name tree node {} is reached more than once",
                        kid_ref
                    )));
                }
                match self.resolver.resolve(kid)? {
                    Object::Dictionary(child) => self.visit_node(&child, Some(kid_ref), depth + 1, visit)?,
                    Object::Null => log::warn!("Name tree kid {} is null", kid_ref),
                    other => {
                        return Err(Error::type_mismatch(
                            "nameTreeNodeDict",
                            &format!("Kids[{}]", i),
                            "Dictionary",
                            other.type_name(),
                        ))
                    },
                }
            }
        }

        Ok(())
    }

    fn visit_names<F>(&mut self, names: &[Object], visit: &mut F) -> Result<()>
    where
        F: FnMut(&str, &Object) -> Result<()>,
    {
        if names.len() % 2 != 0 {
            return Err(Error::malformed(
                "nameTreeNodeDict",
                "Names",
                format!("odd number of elements ({})", names.len()),
            ));
        }

        let mut previous: Option<String> = None;
        for (i, pair) in names.chunks_exact(2).enumerate() {
            let key = match self.resolver.resolve(&pair[0])? {
                Object::String(bytes) => decode_text_string(&bytes),
                other => {
                    return Err(Error::type_mismatch(
                        "nameTreeNodeDict",
                        &format!("Names[{}]", i * 2),
                        "String",
                        other.type_name(),
                    ))
                },
            };
            if previous.as_deref().is_some_and(|p| p > key.as_str()) {
                log::warn!("Name tree keys out of order at ({})", key);
            }
            visit(&key, &pair[1])?;
            self.visited_pairs += 1;
            previous = Some(key);
        }

        Ok(())
    }
}
