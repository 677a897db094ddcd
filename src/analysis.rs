//! Aggregations over a loaded model.

use std::collections::BTreeMap;

use crate::model::{Element, ElementType, Material, Model};

/// Read-only aggregations over a model's elements.
///
/// Area and volume use [`crate::model::GeometricProperties::effective_area`]
/// and `effective_volume`, so elements carrying only raw dimensions are
/// counted without mutating the model.
#[derive(Debug, Clone, Copy)]
pub struct ModelAnalyzer<'a> {
    model: &'a Model,
}

impl<'a> ModelAnalyzer<'a> {
    #[must_use]
    pub fn new(model: &'a Model) -> Self {
        Self { model }
    }

    #[must_use]
    pub fn total_area_by_type(&self) -> BTreeMap<ElementType, f64> {
        let mut totals = BTreeMap::new();
        for element in self.model.elements() {
            match element.geometry.effective_area() {
                Some(area) => *totals.entry(element.element_type()).or_insert(0.0) += area,
                None => tracing::debug!(
                    element = element.id(),
                    element_type = %element.element_type(),
                    "no area defined"
                ),
            }
        }
        totals
    }

    #[must_use]
    pub fn total_volume_by_material(&self) -> BTreeMap<Material, f64> {
        let mut totals = BTreeMap::new();
        for element in self.model.elements() {
            match element.geometry.effective_volume() {
                Some(volume) => *totals.entry(element.material).or_insert(0.0) += volume,
                None => tracing::debug!(
                    element = element.id(),
                    material = %element.material,
                    "no volume defined"
                ),
            }
        }
        totals
    }

    #[must_use]
    pub fn count_by_type(&self) -> BTreeMap<ElementType, usize> {
        let mut counts = BTreeMap::new();
        for element in self.model.elements() {
            *counts.entry(element.element_type()).or_insert(0) += 1;
        }
        counts
    }

    #[must_use]
    pub fn elements_with_property(&self, key: &str) -> Vec<&'a Element> {
        self.model
            .elements()
            .filter(|e| e.has_property(key))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::GeometricProperties;

    fn model() -> Model {
        let mut model = Model::new("m", "Analysis").unwrap();
        let walls = [("w1", 10.0, Material::Brick), ("w2", 5.0, Material::Plaster)];
        for (id, length, material) in walls {
            let wall = Element::new(id, id, ElementType::Wall, material)
                .unwrap()
                .with_geometry(GeometricProperties {
                    length: Some(length),
                    width: Some(3.0),
                    thickness: Some(0.2),
                    ..Default::default()
                })
                .with_property("fire_rating", "F90");
            model.add_element(wall).unwrap();
        }
        let slab = Element::new("s1", "Slab", ElementType::Slab, Material::Concrete)
            .unwrap()
            .with_geometry(GeometricProperties {
                area: Some(100.0),
                thickness: Some(0.3),
                volume: Some(30.0),
                ..Default::default()
            });
        model.add_element(slab).unwrap();
        model
            .add_element(Element::new("x", "Bare", ElementType::Other, Material::Other).unwrap())
            .unwrap();
        model
    }

    #[test]
    fn sums_area_by_type() {
        let model = model();
        let areas = ModelAnalyzer::new(&model).total_area_by_type();
        assert_eq!(areas.get(&ElementType::Wall), Some(&45.0));
        assert_eq!(areas.get(&ElementType::Slab), Some(&100.0));
        assert_eq!(areas.get(&ElementType::Other), None);
    }

    #[test]
    fn sums_volume_by_material() {
        let model = model();
        let volumes = ModelAnalyzer::new(&model).total_volume_by_material();
        assert!((volumes[&Material::Brick] - 6.0).abs() < 1e-9);
        assert!((volumes[&Material::Plaster] - 3.0).abs() < 1e-9);
        assert_eq!(volumes[&Material::Concrete], 30.0);
    }

    #[test]
    fn counts_and_property_lookup() {
        let model = model();
        let analyzer = ModelAnalyzer::new(&model);
        assert_eq!(analyzer.count_by_type()[&ElementType::Wall], 2);
        assert_eq!(analyzer.elements_with_property("fire_rating").len(), 2);
        assert!(analyzer.elements_with_property("missing").is_empty());
    }
}
