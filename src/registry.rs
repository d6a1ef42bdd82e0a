//! Identity registry of a conversion run.
//!
//! Every element of the target graph is created through [`IdentityRegistry`]. It maps
//! identifiers to elements, guarantees that an identifier is used at most once, and keeps
//! a reverse index from cross-references to the elements that carry them.
//!
//! The registry is a plain value owned by one conversion run. Independent runs use
//! independent registries.
//!
//! # Examples
//!
//! ```
//! use sbml2biopax::biopax::model::{Names, PhysicalEntity, PhysicalEntityKind};
//! use sbml2biopax::registry::IdentityRegistry;
//!
//! let mut registry = IdentityRegistry::new("http://example.org/#");
//! let id = registry.complete_id("s1");
//!
//! registry
//!     .get_or_create(&id, || PhysicalEntity::new(PhysicalEntityKind::Protein, Names::all("HK1")))
//!     .unwrap();
//!
//! // A second request returns the existing element untouched.
//! let entity = registry
//!     .get_or_create(&id, || PhysicalEntity::new(PhysicalEntityKind::Complex, Names::all("other")))
//!     .unwrap();
//!
//! assert_eq!(entity.kind, PhysicalEntityKind::Protein);
//! ```

use std::collections::HashMap;

use indexmap::{map::Entry, IndexSet};

use crate::{
    biopax::model::{BioPaxModel, Element, ModelElement, Xref},
    convert::error::ConvertError,
};

#[derive(Debug, Clone, Default)]
pub struct IdentityRegistry {
    model: BioPaxModel,
    xref_owners: HashMap<String, IndexSet<String>>,
}

impl IdentityRegistry {
    /// Creates an empty registry. A blank `xml_base` means no prefix.
    pub fn new(xml_base: &str) -> Self {
        let xml_base = if xml_base.trim().is_empty() {
            ""
        } else {
            xml_base
        };

        Self {
            model: BioPaxModel::new(xml_base),
            xref_owners: HashMap::new(),
        }
    }

    pub fn xml_base(&self) -> &str {
        &self.model.xml_base
    }

    /// Prefixes a local identifier with the namespace of this run.
    pub fn complete_id(&self, partial: &str) -> String {
        format!("{}{}", self.model.xml_base, partial)
    }

    /// Strips the namespace of this run from an identifier, if present.
    pub fn local_id<'a>(&self, uri: &'a str) -> &'a str {
        uri.strip_prefix(self.model.xml_base.as_str()).unwrap_or(uri)
    }

    /// Returns the element registered under `id`, creating it with `create` if absent.
    ///
    /// An existing element is returned unchanged and `create` is not called. Fails with
    /// [`ConvertError::KindMismatch`] if `id` belongs to another element family.
    pub fn get_or_create<T, F>(&mut self, id: &str, create: F) -> Result<&mut T, ConvertError>
    where
        T: ModelElement,
        F: FnOnce() -> T,
    {
        let element = self
            .model
            .elements_mut()
            .entry(id.to_string())
            .or_insert_with(|| create().into());

        let found = element.family();
        T::from_element_mut(element).ok_or_else(|| ConvertError::KindMismatch {
            id: id.to_string(),
            expected: T::FAMILY,
            found,
        })
    }

    /// Registers an element under an identifier the caller knows to be unused.
    pub fn create_new<T: ModelElement>(
        &mut self,
        id: &str,
        element: T,
    ) -> Result<&mut T, ConvertError> {
        match self.model.elements_mut().entry(id.to_string()) {
            Entry::Occupied(_) => Err(ConvertError::DuplicateIdentifier(id.to_string())),
            Entry::Vacant(slot) => T::from_element_mut(slot.insert(element.into()))
                .ok_or_else(|| ConvertError::MissingElement(id.to_string())),
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.model.contains(id)
    }

    pub fn element(&self, id: &str) -> Option<&Element> {
        self.model.get(id)
    }

    pub fn get<T: ModelElement>(&self, id: &str) -> Option<&T> {
        self.model.get_as(id)
    }

    /// Like [`IdentityRegistry::get`], but an element of another family is an error.
    pub fn find<T: ModelElement>(&self, id: &str) -> Result<Option<&T>, ConvertError> {
        match self.model.get(id) {
            None => Ok(None),
            Some(element) => T::from_element(element)
                .map(Some)
                .ok_or_else(|| ConvertError::KindMismatch {
                    id: id.to_string(),
                    expected: T::FAMILY,
                    found: element.family(),
                }),
        }
    }

    pub fn get_mut<T: ModelElement>(&mut self, id: &str) -> Option<&mut T> {
        self.model
            .elements_mut()
            .get_mut(id)
            .and_then(T::from_element_mut)
    }

    /// Identifiers of all elements of family `T`, in creation order.
    pub fn ids_of<T: ModelElement>(&self) -> Vec<String> {
        self.model.objects::<T>().map(|(id, _)| id.clone()).collect()
    }

    /// Attaches the cross-reference `xref` to `owner` and records the link in the
    /// reverse index. Attaching twice is a no-op.
    pub fn add_xref(&mut self, owner: &str, xref: &str) -> Result<(), ConvertError> {
        match self.model.get(xref) {
            Some(Element::Xref(_)) => {}
            Some(other) => {
                return Err(ConvertError::KindMismatch {
                    id: xref.to_string(),
                    expected: Xref::FAMILY,
                    found: other.family(),
                })
            }
            None => return Err(ConvertError::MissingElement(xref.to_string())),
        }

        let element = self
            .model
            .elements_mut()
            .get_mut(owner)
            .ok_or_else(|| ConvertError::MissingElement(owner.to_string()))?;

        let found = element.family();
        let xreferrable = element
            .as_xreferrable_mut()
            .ok_or_else(|| ConvertError::KindMismatch {
                id: owner.to_string(),
                expected: "XReferrable",
                found,
            })?;

        xreferrable.xrefs_mut().insert(xref.to_string());
        self.xref_owners
            .entry(xref.to_string())
            .or_default()
            .insert(owner.to_string());

        Ok(())
    }

    /// Elements carrying the cross-reference `xref`, in attachment order.
    pub fn xref_owners(&self, xref: &str) -> impl Iterator<Item = &str> {
        self.xref_owners
            .get(xref)
            .into_iter()
            .flat_map(|owners| owners.iter().map(String::as_str))
    }

    /// Removes an element and every link the reverse index holds for it.
    pub fn remove(&mut self, id: &str) -> Option<Element> {
        let element = self.model.elements_mut().shift_remove(id)?;

        match &element {
            Element::Xref(_) => {
                for owner in self.xref_owners.remove(id).unwrap_or_default() {
                    if let Some(xreferrable) = self
                        .model
                        .elements_mut()
                        .get_mut(&owner)
                        .and_then(Element::as_xreferrable_mut)
                    {
                        xreferrable.xrefs_mut().shift_remove(id);
                    }
                }
            }
            other => {
                if let Some(xreferrable) = other.as_xreferrable() {
                    for xref in xreferrable.xrefs() {
                        if let Some(owners) = self.xref_owners.get_mut(xref) {
                            owners.shift_remove(id);
                        }
                    }
                }
            }
        }

        Some(element)
    }

    pub fn model(&self) -> &BioPaxModel {
        &self.model
    }

    /// Mutable access to all elements.
    ///
    /// Cross-references must not be changed through this, the reverse index would go stale.
    pub(crate) fn elements_mut(&mut self) -> impl Iterator<Item = (&String, &mut Element)> {
        self.model.elements_mut().iter_mut()
    }

    pub fn into_model(self) -> BioPaxModel {
        self.model
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::biopax::model::{
        EntityReference, EntityReferenceKind, Named, Names, PhysicalEntity, PhysicalEntityKind,
        XrefKind,
    };

    fn protein(name: &str) -> PhysicalEntity {
        PhysicalEntity::new(PhysicalEntityKind::Protein, Names::all(name))
    }

    #[test]
    fn test_get_or_create_is_idempotent() {
        let mut registry = IdentityRegistry::new("http://example.org/#");
        registry.get_or_create("p", || protein("A")).unwrap();

        let mut called = false;
        let entity = registry
            .get_or_create("p", || {
                called = true;
                protein("B")
            })
            .unwrap();

        assert_eq!(entity.display_name(), Some("A"));
        assert!(!called);
        assert_eq!(registry.model().len(), 1);
    }

    #[test]
    fn test_get_or_create_rejects_other_family() {
        let mut registry = IdentityRegistry::new("");
        registry.get_or_create("x", || protein("A")).unwrap();

        let result = registry.get_or_create("x", || {
            EntityReference::new(EntityReferenceKind::ProteinReference, Names::all("A"))
        });

        assert!(matches!(
            result,
            Err(ConvertError::KindMismatch {
                expected: "EntityReference",
                found: "PhysicalEntity",
                ..
            })
        ));
    }

    #[test]
    fn test_create_new_rejects_duplicates() {
        let mut registry = IdentityRegistry::new("");
        registry.create_new("p", protein("A")).unwrap();

        let result = registry.create_new("p", protein("A"));
        assert!(matches!(result, Err(ConvertError::DuplicateIdentifier(_))));
    }

    #[test]
    fn test_complete_and_local_id() {
        let registry = IdentityRegistry::new("http://example.org/#");
        let id = registry.complete_id("ref_s1");

        assert_eq!(id, "http://example.org/#ref_s1");
        assert_eq!(registry.local_id(&id), "ref_s1");
        assert_eq!(registry.local_id("other"), "other");
    }

    #[test]
    fn test_blank_xml_base_is_empty() {
        let registry = IdentityRegistry::new("   ");
        assert_eq!(registry.xml_base(), "");
        assert_eq!(registry.complete_id("a"), "a");
    }

    #[test]
    fn test_xref_reverse_index() {
        let mut registry = IdentityRegistry::new("");
        registry.create_new("p1", protein("A")).unwrap();
        registry.create_new("p2", protein("B")).unwrap();
        registry
            .create_new("x", Xref::new(XrefKind::Unification, "uniprot", "P1"))
            .unwrap();

        registry.add_xref("p1", "x").unwrap();
        registry.add_xref("p2", "x").unwrap();
        registry.add_xref("p2", "x").unwrap();

        let owners: Vec<&str> = registry.xref_owners("x").collect();
        assert_eq!(owners, vec!["p1", "p2"]);
        assert_eq!(registry.get::<PhysicalEntity>("p2").unwrap().xrefs.len(), 1);
    }

    #[test]
    fn test_add_xref_requires_xref_element() {
        let mut registry = IdentityRegistry::new("");
        registry.create_new("p1", protein("A")).unwrap();
        registry.create_new("p2", protein("B")).unwrap();

        assert!(matches!(
            registry.add_xref("p1", "p2"),
            Err(ConvertError::KindMismatch { .. })
        ));
        assert!(matches!(
            registry.add_xref("p1", "missing"),
            Err(ConvertError::MissingElement(_))
        ));
    }

    #[test]
    fn test_remove_cleans_links() {
        let mut registry = IdentityRegistry::new("");
        registry.create_new("p1", protein("A")).unwrap();
        registry
            .create_new("x", Xref::new(XrefKind::Unification, "uniprot", "P1"))
            .unwrap();
        registry.add_xref("p1", "x").unwrap();

        assert!(registry.remove("x").is_some());
        assert!(!registry.contains("x"));
        assert_eq!(registry.xref_owners("x").count(), 0);
        assert!(registry.get::<PhysicalEntity>("p1").unwrap().xrefs.is_empty());
        assert!(registry.remove("x").is_none());
    }
}
