use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;

/// Kind of architectural element.
///
/// Acts as the discriminator of the wire format: the value stored under
/// `element_type` decides which [`crate::registry::ShapeKind`] an element
/// is decoded into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ElementType {
    Building,
    Floor,
    Space,
    Wall,
    Column,
    Beam,
    Window,
    Door,
    Slab,
    Roof,
    Other,
}

impl ElementType {
    pub const ALL: [ElementType; 11] = [
        ElementType::Building,
        ElementType::Floor,
        ElementType::Space,
        ElementType::Wall,
        ElementType::Column,
        ElementType::Beam,
        ElementType::Window,
        ElementType::Door,
        ElementType::Slab,
        ElementType::Roof,
        ElementType::Other,
    ];

    /// Canonical wire value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            ElementType::Building => "BUILDING",
            ElementType::Floor => "FLOOR",
            ElementType::Space => "SPACE",
            ElementType::Wall => "WALL",
            ElementType::Column => "COLUMN",
            ElementType::Beam => "BEAM",
            ElementType::Window => "WINDOW",
            ElementType::Door => "DOOR",
            ElementType::Slab => "SLAB",
            ElementType::Roof => "ROOF",
            ElementType::Other => "OTHER",
        }
    }

    /// Human readable label used in reports.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            ElementType::Building => "Building",
            ElementType::Floor => "Floor",
            ElementType::Space => "Space",
            ElementType::Wall => "Wall",
            ElementType::Column => "Column",
            ElementType::Beam => "Beam",
            ElementType::Window => "Window",
            ElementType::Door => "Door",
            ElementType::Slab => "Slab",
            ElementType::Roof => "Roof",
            ElementType::Other => "Other",
        }
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Case-insensitive: `"wall"`, `" Wall "` and `"WALL"` all parse.
impl FromStr for ElementType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_uppercase();
        ElementType::ALL
            .into_iter()
            .find(|t| t.as_str() == wanted)
            .ok_or_else(|| ValidationError::UnknownVariant {
                enumeration: "element type",
                value: s.to_string(),
            })
    }
}
