pub mod building_model;
pub mod element;
pub mod element_type;
pub mod geometry;
pub mod material;
pub mod value;

pub use building_model::Model;
pub use element::{
    BeamData, ColumnData, Element, ElementShape, OpeningData, Relationship, WallData,
};
pub use element_type::ElementType;
pub use geometry::GeometricProperties;
pub use material::Material;
pub use value::{AttributeValue, Attributes};
