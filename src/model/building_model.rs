use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use super::element::non_empty;
use super::{Attributes, Element, ElementType, Material, Relationship};
use crate::error::{DuplicateElementError, NotFoundError, ValidationError};

/// A named collection of elements; the unit of persistence.
///
/// Elements are keyed by their own id, so a key can never disagree with the
/// element stored under it. Iteration order is ascending id.
#[derive(Debug, Clone, PartialEq)]
pub struct Model {
    id: String,
    name: String,
    pub metadata: Attributes,
    elements: BTreeMap<String, Element>,
}

impl Model {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Result<Self, ValidationError> {
        Ok(Self {
            id: non_empty(id.into(), "model id")?,
            name: non_empty(name.into(), "model name")?,
            metadata: Attributes::new(),
            elements: BTreeMap::new(),
        })
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn rename(&mut self, name: impl Into<String>) -> Result<(), ValidationError> {
        self.name = non_empty(name.into(), "model name")?;
        Ok(())
    }

    /// Adds an element; the model is left untouched if the id is taken.
    pub fn add_element(&mut self, element: Element) -> Result<(), DuplicateElementError> {
        match self.elements.entry(element.id().to_string()) {
            Entry::Occupied(slot) => Err(DuplicateElementError {
                id: slot.key().clone(),
            }),
            Entry::Vacant(slot) => {
                slot.insert(element);
                Ok(())
            }
        }
    }

    pub fn get_element(&self, id: &str) -> Result<&Element, NotFoundError> {
        self.elements.get(id).ok_or_else(|| element_not_found(id))
    }

    pub fn get_element_mut(&mut self, id: &str) -> Result<&mut Element, NotFoundError> {
        self.elements.get_mut(id).ok_or_else(|| element_not_found(id))
    }

    pub fn remove_element(&mut self, id: &str) -> Result<Element, NotFoundError> {
        self.elements.remove(id).ok_or_else(|| element_not_found(id))
    }

    #[must_use]
    pub fn contains_element(&self, id: &str) -> bool {
        self.elements.contains_key(id)
    }

    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.elements.values()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    #[must_use]
    pub fn filter_elements_by_type(&self, element_type: ElementType) -> Vec<&Element> {
        self.elements()
            .filter(|e| e.element_type() == element_type)
            .collect()
    }

    #[must_use]
    pub fn get_elements_by_material(&self, material: Material) -> Vec<&Element> {
        self.elements().filter(|e| e.material == material).collect()
    }

    /// Elements whose `parent_id` points at `id`.
    #[must_use]
    pub fn children_of(&self, id: &str) -> Vec<&Element> {
        self.elements()
            .filter(|e| e.parent_id.as_deref() == Some(id))
            .collect()
    }

    /// Relationships whose target is not part of this model, paired with the
    /// id of the element that owns them.
    #[must_use]
    pub fn dangling_relationships(&self) -> Vec<(&str, &Relationship)> {
        self.elements()
            .flat_map(|e| e.relationships.iter().map(move |r| (e.id(), r)))
            .filter(|(_, r)| !self.contains_element(r.target_element_id()))
            .collect()
    }
}

fn element_not_found(id: &str) -> NotFoundError {
    NotFoundError::Element { id: id.to_string() }
}
