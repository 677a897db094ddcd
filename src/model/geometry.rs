/// Geometric description of an element.
///
/// Every field is optional and independent: a wall may carry scalar
/// dimensions, a coordinate/dimension vector pair, or both. Nothing here
/// enforces consistency between fields.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeometricProperties {
    pub length: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub thickness: Option<f64>,
    pub area: Option<f64>,
    pub volume: Option<f64>,
    pub coordinates: Option<Vec<f64>>,
    pub dimensions: Option<Vec<f64>>,
}

impl GeometricProperties {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Area as stored, or derived from `length * width`, or from the first
    /// two entries of `dimensions`.
    #[must_use]
    pub fn effective_area(&self) -> Option<f64> {
        if self.area.is_some() {
            return self.area;
        }
        if let (Some(length), Some(width)) = (self.length, self.width) {
            return Some(length * width);
        }
        match self.dimensions.as_deref() {
            Some([a, b, ..]) => Some(a * b),
            _ => None,
        }
    }

    /// Volume as stored, or derived from `area * height`,
    /// `length * width * thickness`, or a three-entry `dimensions` vector.
    #[must_use]
    pub fn effective_volume(&self) -> Option<f64> {
        if self.volume.is_some() {
            return self.volume;
        }
        if let (Some(area), Some(height)) = (self.area, self.height) {
            return Some(area * height);
        }
        if let (Some(length), Some(width), Some(thickness)) =
            (self.length, self.width, self.thickness)
        {
            return Some(length * width * thickness);
        }
        match self.dimensions.as_deref() {
            Some(dims @ [_, _, _]) => Some(dims.iter().product()),
            _ => None,
        }
    }

    /// Stores the derived area when `area` is absent. A present value is
    /// never overwritten.
    pub fn calculate_area(&mut self) -> Option<f64> {
        if self.area.is_none() {
            self.area = self.effective_area();
        }
        self.area
    }

    /// Stores the derived volume when `volume` is absent. A present value is
    /// never overwritten.
    pub fn calculate_volume(&mut self) -> Option<f64> {
        if self.volume.is_none() {
            self.volume = self.effective_volume();
        }
        self.volume
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Option<f64>, b: f64) -> bool {
        a.is_some_and(|a| (a - b).abs() < 1e-9)
    }

    #[test]
    fn volume_from_dimension_vector() {
        let mut geometry = GeometricProperties {
            dimensions: Some(vec![10.0, 0.3, 3.0]),
            ..Default::default()
        };
        assert!(close(geometry.calculate_volume(), 9.0));
        assert!(close(geometry.volume, 9.0));
    }

    #[test]
    fn area_prefers_scalar_fields() {
        let mut geometry = GeometricProperties {
            length: Some(4.0),
            width: Some(2.5),
            dimensions: Some(vec![1.0, 1.0]),
            ..Default::default()
        };
        assert!(close(geometry.calculate_area(), 10.0));
    }

    #[test]
    fn volume_from_area_and_height() {
        let mut geometry = GeometricProperties {
            length: Some(5.0),
            width: Some(2.0),
            height: Some(3.0),
            ..Default::default()
        };
        geometry.calculate_area();
        assert!(close(geometry.calculate_volume(), 30.0));
    }

    #[test]
    fn derivation_is_idempotent() {
        let mut geometry = GeometricProperties {
            length: Some(2.0),
            width: Some(3.0),
            thickness: Some(0.5),
            ..Default::default()
        };
        let first = (geometry.calculate_area(), geometry.calculate_volume());
        geometry.length = Some(100.0);
        let second = (geometry.calculate_area(), geometry.calculate_volume());
        assert_eq!(first, second);
    }

    #[test]
    fn present_values_are_never_overwritten() {
        let mut geometry = GeometricProperties {
            length: Some(2.0),
            width: Some(3.0),
            area: Some(1.0),
            ..Default::default()
        };
        assert_eq!(geometry.calculate_area(), Some(1.0));
    }

    #[test]
    fn nothing_to_derive() {
        let mut geometry = GeometricProperties::default();
        assert_eq!(geometry.calculate_area(), None);
        assert_eq!(geometry.calculate_volume(), None);
        assert!(geometry.is_empty());
    }
}
