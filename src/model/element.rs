use std::path::PathBuf;

use super::{AttributeValue, Attributes, ElementType, GeometricProperties, Material};
use crate::error::ValidationError;
use crate::registry::{self, ShapeKind};

/// Directed link from one element to another, by identifier only.
///
/// The target may be missing from the model; relationships are lookup keys,
/// never ownership edges. `kind` and `target_element_id` are non-empty and
/// fixed at construction.
#[derive(Debug, Clone, PartialEq)]
pub struct Relationship {
    kind: String,
    target_element_id: String,
    pub description: Option<String>,
}

impl Relationship {
    pub fn new(
        kind: impl Into<String>,
        target_element_id: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            kind: non_empty(kind.into(), "relationship type")?,
            target_element_id: non_empty(target_element_id.into(), "relationship target")?,
            description: None,
        })
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Relationship type, `type` on the wire.
    #[must_use]
    pub fn kind(&self) -> &str {
        &self.kind
    }

    #[must_use]
    pub fn target_element_id(&self) -> &str {
        &self.target_element_id
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct WallData {
    pub load_bearing: bool,
    pub fire_rating: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BeamData {
    pub span: Option<f64>,
    pub profile: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColumnData {
    pub profile: Option<String>,
    pub load_capacity_kn: Option<f64>,
}

/// Windows and doors.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OpeningData {
    pub frame_material: Option<Material>,
    pub detail_drawing: Option<PathBuf>,
}

/// Type-specific field set of an element.
#[derive(Debug, Clone, PartialEq)]
pub enum ElementShape {
    Generic,
    Wall(WallData),
    Beam(BeamData),
    Column(ColumnData),
    Opening(OpeningData),
}

impl ElementShape {
    #[must_use]
    pub const fn kind(&self) -> ShapeKind {
        match self {
            ElementShape::Generic => ShapeKind::Generic,
            ElementShape::Wall(_) => ShapeKind::Wall,
            ElementShape::Beam(_) => ShapeKind::Beam,
            ElementShape::Column(_) => ShapeKind::Column,
            ElementShape::Opening(_) => ShapeKind::Opening,
        }
    }
}

/// A single architectural element.
///
/// `id` and `element_type` are fixed at construction. The shape always
/// matches the registry entry for `element_type`.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    id: String,
    name: String,
    element_type: ElementType,
    pub material: Material,
    pub description: Option<String>,
    pub parent_id: Option<String>,
    pub geometry: GeometricProperties,
    pub properties: Attributes,
    pub relationships: Vec<Relationship>,
    shape: ElementShape,
}

impl Element {
    /// Creates an element with the default shape for its type.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        element_type: ElementType,
        material: Material,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            id: non_empty(id.into(), "element id")?,
            name: non_empty(name.into(), "element name")?,
            element_type,
            material,
            description: None,
            parent_id: None,
            geometry: GeometricProperties::default(),
            properties: Attributes::new(),
            relationships: Vec::new(),
            shape: registry::shape_kind(element_type).empty_shape(),
        })
    }

    /// Replaces the shape, rejecting one that does not belong to this type.
    pub fn with_shape(mut self, shape: ElementShape) -> Result<Self, ValidationError> {
        self.set_shape(shape)?;
        Ok(self)
    }

    #[must_use]
    pub fn with_geometry(mut self, geometry: GeometricProperties) -> Self {
        self.geometry = geometry;
        self
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn with_parent(mut self, parent_id: impl Into<String>) -> Self {
        self.parent_id = Some(parent_id.into());
        self
    }

    #[must_use]
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        self.add_property(key, value);
        self
    }

    #[must_use]
    pub fn with_relationship(mut self, relationship: Relationship) -> Self {
        self.relationships.push(relationship);
        self
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
        self.name = non_empty(name.into(), "element name")?;
        Ok(())
    }

    #[must_use]
    pub fn element_type(&self) -> ElementType {
        self.element_type
    }

    #[must_use]
    pub fn shape(&self) -> &ElementShape {
        &self.shape
    }

    pub fn set_shape(&mut self, shape: ElementShape) -> Result<(), ValidationError> {
        let expected = registry::shape_kind(self.element_type);
        if shape.kind() != expected {
            return Err(ValidationError::ShapeMismatch {
                element_type: self.element_type,
                shape: shape.kind().descriptor().name,
            });
        }
        self.shape = shape;
        Ok(())
    }

    /// Inserts or replaces a custom attribute, returning the previous value.
    pub fn add_property(
        &mut self,
        key: impl Into<String>,
        value: impl Into<AttributeValue>,
    ) -> Option<AttributeValue> {
        self.properties.insert(key.into(), value.into())
    }

    #[must_use]
    pub fn get_property(&self, key: &str) -> Option<&AttributeValue> {
        self.properties.get(key)
    }

    pub fn remove_property(&mut self, key: &str) -> Option<AttributeValue> {
        self.properties.remove(key)
    }

    #[must_use]
    pub fn has_property(&self, key: &str) -> bool {
        self.properties.contains_key(key)
    }
}

pub(crate) fn non_empty(value: String, field: &'static str) -> Result<String, ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::Empty { field })
    } else {
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_identifiers() {
        let err = Element::new("  ", "Wall", ElementType::Wall, Material::Brick).unwrap_err();
        assert_eq!(err, ValidationError::Empty { field: "element id" });

        let err = Element::new("w1", "", ElementType::Wall, Material::Brick).unwrap_err();
        assert_eq!(err, ValidationError::Empty { field: "element name" });
    }

    #[test]
    fn default_shape_follows_registry() {
        let wall = Element::new("w1", "Wall", ElementType::Wall, Material::Brick).unwrap();
        assert_eq!(wall.shape(), &ElementShape::Wall(WallData::default()));

        let slab = Element::new("s1", "Slab", ElementType::Slab, Material::Concrete).unwrap();
        assert_eq!(slab.shape(), &ElementShape::Generic);

        let door = Element::new("d1", "Door", ElementType::Door, Material::Wood).unwrap();
        assert_eq!(door.shape(), &ElementShape::Opening(OpeningData::default()));
    }

    #[test]
    fn rejects_foreign_shape() {
        let err = Element::new("b1", "Beam", ElementType::Beam, Material::Steel)
            .unwrap()
            .with_shape(ElementShape::Wall(WallData::default()))
            .unwrap_err();
        assert_eq!(
            err,
            ValidationError::ShapeMismatch {
                element_type: ElementType::Beam,
                shape: "Wall",
            }
        );
    }

    #[test]
    fn property_accessors() {
        let mut element = Element::new("c1", "Column", ElementType::Column, Material::Concrete)
            .unwrap()
            .with_property("structural_load_kn", 150);

        assert_eq!(
            element.get_property("structural_load_kn"),
            Some(&AttributeValue::Integer(150))
        );
        assert_eq!(
            element.add_property("structural_load_kn", 175),
            Some(AttributeValue::Integer(150))
        );
        assert!(element.has_property("structural_load_kn"));
        assert_eq!(element.get_property("missing"), None);
        assert!(element.remove_property("structural_load_kn").is_some());
        assert!(!element.has_property("structural_load_kn"));
    }

    #[test]
    fn relationship_requires_kind_and_target() {
        assert!(Relationship::new("hosts", "w1").is_ok());
        assert_eq!(
            Relationship::new("", "w1").unwrap_err(),
            ValidationError::Empty { field: "relationship type" }
        );
        assert_eq!(
            Relationship::new("hosts", " ").unwrap_err(),
            ValidationError::Empty { field: "relationship target" }
        );
    }

    #[test]
    fn relationship_keys_are_read_only() {
        let relationship = Relationship::new("hosted_by", "w1")
            .unwrap()
            .with_description("opening");
        assert_eq!(relationship.kind(), "hosted_by");
        assert_eq!(relationship.target_element_id(), "w1");
        assert_eq!(relationship.description.as_deref(), Some("opening"));
    }
}
