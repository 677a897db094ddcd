//! Static mapping from element type to concrete shape, plus the field
//! descriptors the decoder walks.
//!
//! The table is fixed at compile time: [`shape_kind`] is an exhaustive
//! `match`, so adding an [`ElementType`] without deciding its shape does not
//! compile.

use crate::model::{BeamData, ColumnData, ElementShape, ElementType, OpeningData, WallData};

/// Concrete record shape an element type is decoded into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    Generic,
    Wall,
    Beam,
    Column,
    Opening,
}

/// Semantic type of a field, deciding how its raw JSON value is converted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Number,
    NumberList,
    Flag,
    ElementType,
    Material,
    /// Opaque path-like string.
    Path,
    Geometry,
    Relationships,
    /// Open-ended attribute map, passed through verbatim.
    Attributes,
    /// Polymorphic elements, each resolved through the registry.
    Elements,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    /// Absence is a decoding error.
    Required,
    /// Absence leaves the field empty.
    Optional,
    /// Absence falls back to the type default.
    Defaulted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
    pub presence: Presence,
}

const fn field(name: &'static str, kind: FieldKind, presence: Presence) -> FieldSpec {
    FieldSpec {
        name,
        kind,
        presence,
    }
}

/// Field names and semantic types of one composite shape.
#[derive(Debug, PartialEq, Eq)]
pub struct ShapeDescriptor {
    pub name: &'static str,
    pub fields: &'static [FieldSpec],
}

impl ShapeDescriptor {
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    #[must_use]
    pub fn declares(&self, name: &str) -> bool {
        self.field(name).is_some()
    }
}

/// Field that selects the concrete element shape.
pub const DISCRIMINATOR: &str = "element_type";

pub static MODEL: ShapeDescriptor = ShapeDescriptor {
    name: "Model",
    fields: &[
        field("model_id", FieldKind::Text, Presence::Required),
        field("name", FieldKind::Text, Presence::Required),
        field("metadata", FieldKind::Attributes, Presence::Defaulted),
        field("elements", FieldKind::Elements, Presence::Defaulted),
    ],
};

/// Fields shared by every element shape.
pub static ELEMENT: ShapeDescriptor = ShapeDescriptor {
    name: "Element",
    fields: &[
        field("element_id", FieldKind::Text, Presence::Required),
        field("name", FieldKind::Text, Presence::Defaulted),
        field(DISCRIMINATOR, FieldKind::ElementType, Presence::Required),
        field("material", FieldKind::Material, Presence::Defaulted),
        field("description", FieldKind::Text, Presence::Optional),
        field("parent_id", FieldKind::Text, Presence::Optional),
        field("geometric_properties", FieldKind::Geometry, Presence::Defaulted),
        field("properties", FieldKind::Attributes, Presence::Defaulted),
        field("relationships", FieldKind::Relationships, Presence::Defaulted),
    ],
};

pub static GEOMETRY: ShapeDescriptor = ShapeDescriptor {
    name: "GeometricProperties",
    fields: &[
        field("length", FieldKind::Number, Presence::Optional),
        field("width", FieldKind::Number, Presence::Optional),
        field("height", FieldKind::Number, Presence::Optional),
        field("thickness", FieldKind::Number, Presence::Optional),
        field("area", FieldKind::Number, Presence::Optional),
        field("volume", FieldKind::Number, Presence::Optional),
        field("coordinates", FieldKind::NumberList, Presence::Optional),
        field("dimensions", FieldKind::NumberList, Presence::Optional),
    ],
};

pub static RELATIONSHIP: ShapeDescriptor = ShapeDescriptor {
    name: "Relationship",
    fields: &[
        field("type", FieldKind::Text, Presence::Required),
        field("target_element_id", FieldKind::Text, Presence::Required),
        field("description", FieldKind::Text, Presence::Optional),
    ],
};

static GENERIC: ShapeDescriptor = ShapeDescriptor {
    name: "Generic",
    fields: &[],
};

static WALL: ShapeDescriptor = ShapeDescriptor {
    name: "Wall",
    fields: &[
        field("load_bearing", FieldKind::Flag, Presence::Defaulted),
        field("fire_rating", FieldKind::Text, Presence::Optional),
    ],
};

static BEAM: ShapeDescriptor = ShapeDescriptor {
    name: "Beam",
    fields: &[
        field("span", FieldKind::Number, Presence::Optional),
        field("profile", FieldKind::Text, Presence::Optional),
    ],
};

static COLUMN: ShapeDescriptor = ShapeDescriptor {
    name: "Column",
    fields: &[
        field("profile", FieldKind::Text, Presence::Optional),
        field("load_capacity_kn", FieldKind::Number, Presence::Optional),
    ],
};

static OPENING: ShapeDescriptor = ShapeDescriptor {
    name: "Opening",
    fields: &[
        field("frame_material", FieldKind::Material, Presence::Optional),
        field("detail_drawing", FieldKind::Path, Presence::Optional),
    ],
};

/// Resolves the concrete shape for an element type. Total: types without a
/// specialized shape map to [`ShapeKind::Generic`].
#[must_use]
pub const fn shape_kind(element_type: ElementType) -> ShapeKind {
    match element_type {
        ElementType::Wall => ShapeKind::Wall,
        ElementType::Beam => ShapeKind::Beam,
        ElementType::Column => ShapeKind::Column,
        ElementType::Window | ElementType::Door => ShapeKind::Opening,
        ElementType::Building
        | ElementType::Floor
        | ElementType::Space
        | ElementType::Slab
        | ElementType::Roof
        | ElementType::Other => ShapeKind::Generic,
    }
}

impl ShapeKind {
    /// Descriptor of the fields this shape adds on top of [`ELEMENT`].
    #[must_use]
    pub fn descriptor(self) -> &'static ShapeDescriptor {
        match self {
            ShapeKind::Generic => &GENERIC,
            ShapeKind::Wall => &WALL,
            ShapeKind::Beam => &BEAM,
            ShapeKind::Column => &COLUMN,
            ShapeKind::Opening => &OPENING,
        }
    }

    /// The shape with every field at its default.
    #[must_use]
    pub fn empty_shape(self) -> ElementShape {
        match self {
            ShapeKind::Generic => ElementShape::Generic,
            ShapeKind::Wall => ElementShape::Wall(WallData::default()),
            ShapeKind::Beam => ElementShape::Beam(BeamData::default()),
            ShapeKind::Column => ElementShape::Column(ColumnData::default()),
            ShapeKind::Opening => ElementShape::Opening(OpeningData::default()),
        }
    }
}
