use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;

/// Building material of an element. A plain attribute, never a discriminator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Material {
    Concrete,
    Steel,
    Wood,
    Glass,
    Brick,
    Plaster,
    Insulation,
    Aluminum,
    #[default]
    Other,
}

impl Material {
    pub const ALL: [Material; 9] = [
        Material::Concrete,
        Material::Steel,
        Material::Wood,
        Material::Glass,
        Material::Brick,
        Material::Plaster,
        Material::Insulation,
        Material::Aluminum,
        Material::Other,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Material::Concrete => "CONCRETE",
            Material::Steel => "STEEL",
            Material::Wood => "WOOD",
            Material::Glass => "GLASS",
            Material::Brick => "BRICK",
            Material::Plaster => "PLASTER",
            Material::Insulation => "INSULATION",
            Material::Aluminum => "ALUMINUM",
            Material::Other => "OTHER",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Material::Concrete => "Concrete",
            Material::Steel => "Steel",
            Material::Wood => "Wood",
            Material::Glass => "Glass",
            Material::Brick => "Brick",
            Material::Plaster => "Plaster",
            Material::Insulation => "Insulation",
            Material::Aluminum => "Aluminum",
            Material::Other => "Other",
        }
    }
}

impl fmt::Display for Material {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Material {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_uppercase();
        Material::ALL
            .into_iter()
            .find(|m| m.as_str() == wanted)
            .ok_or_else(|| ValidationError::UnknownVariant {
                enumeration: "material",
                value: s.to_string(),
            })
    }
}
