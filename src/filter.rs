//! Chainable element selection.

use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;
use crate::model::{AttributeValue, Element, ElementType, GeometricProperties, Material};

/// Scalar geometry field usable in a range filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GeometryField {
    Length,
    Width,
    Height,
    Thickness,
    Area,
    Volume,
}

impl GeometryField {
    pub const ALL: [GeometryField; 6] = [
        GeometryField::Length,
        GeometryField::Width,
        GeometryField::Height,
        GeometryField::Thickness,
        GeometryField::Area,
        GeometryField::Volume,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            GeometryField::Length => "length",
            GeometryField::Width => "width",
            GeometryField::Height => "height",
            GeometryField::Thickness => "thickness",
            GeometryField::Area => "area",
            GeometryField::Volume => "volume",
        }
    }

    /// Stored value only; area and volume are not derived here.
    #[must_use]
    pub fn value(self, geometry: &GeometricProperties) -> Option<f64> {
        match self {
            GeometryField::Length => geometry.length,
            GeometryField::Width => geometry.width,
            GeometryField::Height => geometry.height,
            GeometryField::Thickness => geometry.thickness,
            GeometryField::Area => geometry.area,
            GeometryField::Volume => geometry.volume,
        }
    }
}

impl fmt::Display for GeometryField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GeometryField {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Self::ALL
            .into_iter()
            .find(|field| field.as_str().eq_ignore_ascii_case(needle))
            .ok_or_else(|| ValidationError::UnknownVariant {
                enumeration: "geometry field",
                value: s.to_string(),
            })
    }
}

/// A narrowing selection of elements. Every step keeps the relative order of
/// the input.
///
/// ```
/// use archlens::demo::sample_model;
/// use archlens::filter::ElementFilter;
/// use archlens::model::{ElementType, Material};
///
/// let model = sample_model("demo")?;
/// let brick_walls = ElementFilter::new(model.elements())
///     .by_type(ElementType::Wall)
///     .by_material(Material::Brick)
///     .into_vec();
/// assert_eq!(brick_walls.len(), 2);
/// # Ok::<(), archlens::error::DeserializeError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct ElementFilter<'a> {
    elements: Vec<&'a Element>,
}

impl<'a> ElementFilter<'a> {
    pub fn new(elements: impl IntoIterator<Item = &'a Element>) -> Self {
        Self {
            elements: elements.into_iter().collect(),
        }
    }

    #[must_use]
    pub fn by_type(self, element_type: ElementType) -> Self {
        self.retain(|e| e.element_type() == element_type)
    }

    #[must_use]
    pub fn by_material(self, material: Material) -> Self {
        self.retain(|e| e.material == material)
    }

    /// Keeps elements whose property `key` equals `value`.
    #[must_use]
    pub fn by_property(self, key: &str, value: &AttributeValue) -> Self {
        self.retain(|e| e.get_property(key) == Some(value))
    }

    /// Keeps elements whose stored `field` lies within `[min, max]`. Open
    /// bounds are unchecked; elements without the field are dropped.
    #[must_use]
    pub fn by_geometry_range(self, field: GeometryField, min: Option<f64>, max: Option<f64>) -> Self {
        self.retain(|e| {
            field.value(&e.geometry).is_some_and(|v| {
                min.is_none_or(|min| v >= min) && max.is_none_or(|max| v <= max)
            })
        })
    }

    fn retain(mut self, keep: impl Fn(&Element) -> bool) -> Self {
        let before = self.elements.len();
        self.elements.retain(|e| keep(e));
        tracing::trace!(before, after = self.elements.len(), "filter step");
        self
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a Element> + '_ {
        self.elements.iter().copied()
    }

    #[must_use]
    pub fn into_vec(self) -> Vec<&'a Element> {
        self.elements
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Model;
    use pretty_assertions::assert_eq;

    fn model() -> Model {
        let mut model = Model::new("m", "Filters").unwrap();
        let rows = [
            ("a", ElementType::Wall, Material::Brick, 12.0, "F90"),
            ("b", ElementType::Wall, Material::Concrete, 4.0, "F30"),
            ("c", ElementType::Slab, Material::Concrete, 8.0, "F90"),
        ];
        for (id, element_type, material, length, rating) in rows {
            let element = Element::new(id, id, element_type, material)
                .unwrap()
                .with_geometry(GeometricProperties {
                    length: Some(length),
                    ..Default::default()
                })
                .with_property("fire_rating", rating);
            model.add_element(element).unwrap();
        }
        model
            .add_element(Element::new("d", "d", ElementType::Wall, Material::Brick).unwrap())
            .unwrap();
        model
    }

    fn ids(filter: ElementFilter<'_>) -> Vec<&str> {
        filter.into_vec().into_iter().map(Element::id).collect()
    }

    #[test]
    fn chained_steps_narrow() {
        let model = model();
        let walls = ElementFilter::new(model.elements()).by_type(ElementType::Wall);
        assert_eq!(walls.len(), 3);
        assert_eq!(ids(walls.by_material(Material::Brick)), vec!["a", "d"]);
    }

    #[test]
    fn property_equality() {
        let model = model();
        let rated = ElementFilter::new(model.elements())
            .by_property("fire_rating", &AttributeValue::from("F90"));
        assert_eq!(ids(rated), vec!["a", "c"]);
    }

    #[test]
    fn geometry_range_is_inclusive_and_skips_missing() {
        let model = model();
        let filter = || ElementFilter::new(model.elements());
        assert_eq!(
            ids(filter().by_geometry_range(GeometryField::Length, Some(4.0), Some(8.0))),
            vec!["b", "c"]
        );
        assert_eq!(
            ids(filter().by_geometry_range(GeometryField::Length, Some(10.0), None)),
            vec!["a"]
        );
        assert_eq!(
            ids(filter().by_geometry_range(GeometryField::Length, None, None)),
            vec!["a", "b", "c"]
        );
        assert!(filter()
            .by_geometry_range(GeometryField::Volume, None, None)
            .is_empty());
    }

    #[test]
    fn parses_geometry_fields() {
        assert_eq!("Area".parse::<GeometryField>().unwrap(), GeometryField::Area);
        assert_eq!(" volume ".parse::<GeometryField>().unwrap(), GeometryField::Volume);
        assert!("depth".parse::<GeometryField>().is_err());
    }
}
