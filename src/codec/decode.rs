//! JSON tree -> typed model.
//!
//! Decoding is driven by the descriptors in [`crate::registry`]: every
//! declared field present in the input is converted according to its
//! [`FieldKind`], then the typed value is assembled from the converted
//! fields. Polymorphic elements first read the `element_type` discriminator
//! to pick the concrete shape, which contributes its own descriptor.

use serde_json::{Map, Number, Value};
use std::collections::HashMap;
use std::path::PathBuf;

use crate::error::{DeserializeError, DeserializeErrorKind, JsonPath, ValidationError};
use crate::model::{
    AttributeValue, Attributes, BeamData, ColumnData, Element, ElementShape, ElementType,
    GeometricProperties, Material, Model, OpeningData, Relationship, WallData,
};
use crate::registry::{self, FieldKind, Presence, ShapeDescriptor, ShapeKind, DISCRIMINATOR};

/// Parses a model document.
pub fn from_json_str(input: &str) -> Result<Model, DeserializeError> {
    let value: Value = serde_json::from_str(input)
        .map_err(|e| DeserializeError::new(JsonPath::root(), DeserializeErrorKind::Syntax(e)))?;
    decode_model(&value)
}

pub fn decode_model(value: &Value) -> Result<Model, DeserializeError> {
    decode_model_at(value, &JsonPath::root())
}

/// Decodes a single polymorphic element.
pub fn decode_element(value: &Value) -> Result<Element, DeserializeError> {
    decode_element_at(value, &JsonPath::root())
}

pub fn decode_geometry(value: &Value) -> Result<GeometricProperties, DeserializeError> {
    decode_geometry_at(value, &JsonPath::root())
}

pub fn decode_relationship(value: &Value) -> Result<Relationship, DeserializeError> {
    decode_relationship_at(value, &JsonPath::root())
}

/// Converts any JSON value into an attribute value.
pub fn decode_attribute(value: &Value) -> Result<AttributeValue, DeserializeError> {
    decode_attribute_at(value, &JsonPath::root())
}

fn decode_model_at(value: &Value, path: &JsonPath) -> Result<Model, DeserializeError> {
    let object = expect_object(value, path)?;
    let mut fields = Fields::read(object, &[&registry::MODEL], path)?;

    let id = fields.text("model_id").ok_or_else(|| fields.missing("model_id"))?;
    let name = fields.text("name").ok_or_else(|| fields.missing("name"))?;
    let mut model = Model::new(id, name).map_err(|e| invalid(path, e))?;
    model.metadata = fields.attributes("metadata").unwrap_or_default();

    let elements_path = path.field("elements");
    for (index, raw) in fields.elements("elements").unwrap_or_default().iter().enumerate() {
        let element_path = elements_path.index(index);
        let element = decode_element_at(raw, &element_path)?;
        model.add_element(element).map_err(|e| {
            DeserializeError::new(element_path, DeserializeErrorKind::DuplicateElement(e))
        })?;
    }

    tracing::debug!(model = %model.id(), elements = model.len(), "decoded model");
    Ok(model)
}

fn decode_element_at(value: &Value, path: &JsonPath) -> Result<Element, DeserializeError> {
    let object = expect_object(value, path)?;
    let discriminated = read_discriminator(object, path)?;
    let kind = registry::shape_kind(discriminated);
    let mut fields = Fields::read(object, &[&registry::ELEMENT, kind.descriptor()], path)?;
    let element_type = fields.element_type(DISCRIMINATOR).unwrap_or(discriminated);

    let id = fields
        .text("element_id")
        .ok_or_else(|| fields.missing("element_id"))?;
    let name = fields.text("name").unwrap_or_else(|| id.clone());
    let material = fields.material("material").unwrap_or_default();

    let mut element = Element::new(id, name, element_type, material).map_err(|e| invalid(path, e))?;
    element.description = fields.text("description");
    element.parent_id = fields.text("parent_id");
    element.geometry = fields.geometry("geometric_properties").unwrap_or_default();
    element.properties = fields.attributes("properties").unwrap_or_default();
    element.relationships = fields.relationships("relationships").unwrap_or_default();
    element
        .set_shape(build_shape(kind, &mut fields))
        .map_err(|e| invalid(path, e))?;

    Ok(element)
}

fn read_discriminator(
    object: &Map<String, Value>,
    path: &JsonPath,
) -> Result<ElementType, DeserializeError> {
    let field_path = path.field(DISCRIMINATOR);
    match object.get(DISCRIMINATOR) {
        None | Some(Value::Null) => Err(DeserializeError::new(
            field_path,
            DeserializeErrorKind::MissingDiscriminator,
        )),
        Some(Value::String(raw)) => raw.parse().map_err(|_| {
            DeserializeError::new(
                field_path,
                DeserializeErrorKind::UnknownElementType(raw.clone()),
            )
        }),
        Some(other) => Err(mismatch(&field_path, "string", other)),
    }
}

fn build_shape(kind: ShapeKind, fields: &mut Fields<'_>) -> ElementShape {
    match kind {
        ShapeKind::Generic => ElementShape::Generic,
        ShapeKind::Wall => ElementShape::Wall(WallData {
            load_bearing: fields.flag("load_bearing").unwrap_or(false),
            fire_rating: fields.text("fire_rating"),
        }),
        ShapeKind::Beam => ElementShape::Beam(BeamData {
            span: fields.number("span"),
            profile: fields.text("profile"),
        }),
        ShapeKind::Column => ElementShape::Column(ColumnData {
            profile: fields.text("profile"),
            load_capacity_kn: fields.number("load_capacity_kn"),
        }),
        ShapeKind::Opening => ElementShape::Opening(OpeningData {
            frame_material: fields.material("frame_material"),
            detail_drawing: fields.path("detail_drawing"),
        }),
    }
}

fn decode_geometry_at(
    value: &Value,
    path: &JsonPath,
) -> Result<GeometricProperties, DeserializeError> {
    let object = expect_object(value, path)?;
    let mut fields = Fields::read(object, &[&registry::GEOMETRY], path)?;
    Ok(GeometricProperties {
        length: fields.number("length"),
        width: fields.number("width"),
        height: fields.number("height"),
        thickness: fields.number("thickness"),
        area: fields.number("area"),
        volume: fields.number("volume"),
        coordinates: fields.number_list("coordinates"),
        dimensions: fields.number_list("dimensions"),
    })
}

fn decode_relationship_at(
    value: &Value,
    path: &JsonPath,
) -> Result<Relationship, DeserializeError> {
    let object = expect_object(value, path)?;
    let mut fields = Fields::read(object, &[&registry::RELATIONSHIP], path)?;
    let kind = fields.text("type").ok_or_else(|| fields.missing("type"))?;
    let target = fields
        .text("target_element_id")
        .ok_or_else(|| fields.missing("target_element_id"))?;
    let mut relationship = Relationship::new(kind, target).map_err(|e| invalid(path, e))?;
    relationship.description = fields.text("description");
    Ok(relationship)
}

fn decode_attribute_at(value: &Value, path: &JsonPath) -> Result<AttributeValue, DeserializeError> {
    Ok(match value {
        Value::Null => AttributeValue::Null,
        Value::Bool(b) => AttributeValue::Bool(*b),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                AttributeValue::Integer(i)
            } else if n.is_u64() {
                return Err(DeserializeError::new(
                    path.clone(),
                    DeserializeErrorKind::TypeMismatch {
                        expected: "integer within the signed 64-bit range",
                        found: "larger integer",
                    },
                ));
            } else {
                AttributeValue::Float(n.as_f64().unwrap_or(f64::NAN))
            }
        }
        Value::String(s) => AttributeValue::Text(s.clone()),
        Value::Array(items) => AttributeValue::List(
            items
                .iter()
                .enumerate()
                .map(|(i, item)| decode_attribute_at(item, &path.index(i)))
                .collect::<Result<_, _>>()?,
        ),
        Value::Object(object) => AttributeValue::Map(decode_attribute_map(object, path)?),
    })
}

fn decode_attribute_map(
    object: &Map<String, Value>,
    path: &JsonPath,
) -> Result<Attributes, DeserializeError> {
    let mut map = Attributes::new();
    for (key, value) in object {
        map.insert(key.clone(), decode_attribute_at(value, &path.field(key))?);
    }
    Ok(map)
}

/// A declared field after conversion by its [`FieldKind`].
enum FieldValue<'a> {
    Text(String),
    Number(f64),
    NumberList(Vec<f64>),
    Flag(bool),
    ElementType(ElementType),
    Material(Material),
    Path(PathBuf),
    Geometry(GeometricProperties),
    Relationships(Vec<Relationship>),
    Attributes(Attributes),
    /// Kept raw: elements are decoded once the model shell exists.
    Elements(&'a [Value]),
}

/// Converted fields of one JSON object, consumed while building the value.
struct Fields<'a> {
    path: JsonPath,
    values: HashMap<&'static str, FieldValue<'a>>,
}

impl<'a> Fields<'a> {
    fn read(
        object: &'a Map<String, Value>,
        descriptors: &[&ShapeDescriptor],
        path: &JsonPath,
    ) -> Result<Self, DeserializeError> {
        let mut values = HashMap::new();
        for spec in descriptors.iter().flat_map(|d| d.fields) {
            let field_path = path.field(spec.name);
            match object.get(spec.name) {
                None | Some(Value::Null) => {
                    if spec.presence == Presence::Required {
                        return Err(DeserializeError::new(
                            field_path,
                            DeserializeErrorKind::MissingField(spec.name.to_string()),
                        ));
                    }
                }
                Some(raw) => {
                    values.insert(spec.name, convert(raw, spec.kind, &field_path)?);
                }
            }
        }

        for key in object.keys() {
            if !descriptors.iter().any(|d| d.declares(key)) {
                tracing::debug!(path = %path, field = %key, "ignoring unknown field");
            }
        }

        Ok(Self {
            path: path.clone(),
            values,
        })
    }

    fn missing(&self, name: &str) -> DeserializeError {
        DeserializeError::new(
            self.path.field(name),
            DeserializeErrorKind::MissingField(name.to_string()),
        )
    }

    fn text(&mut self, name: &str) -> Option<String> {
        match self.values.remove(name) {
            Some(FieldValue::Text(s)) => Some(s),
            _ => None,
        }
    }

    fn number(&mut self, name: &str) -> Option<f64> {
        match self.values.remove(name) {
            Some(FieldValue::Number(n)) => Some(n),
            _ => None,
        }
    }

    fn number_list(&mut self, name: &str) -> Option<Vec<f64>> {
        match self.values.remove(name) {
            Some(FieldValue::NumberList(list)) => Some(list),
            _ => None,
        }
    }

    fn flag(&mut self, name: &str) -> Option<bool> {
        match self.values.remove(name) {
            Some(FieldValue::Flag(b)) => Some(b),
            _ => None,
        }
    }

    fn element_type(&mut self, name: &str) -> Option<ElementType> {
        match self.values.remove(name) {
            Some(FieldValue::ElementType(t)) => Some(t),
            _ => None,
        }
    }

    fn material(&mut self, name: &str) -> Option<Material> {
        match self.values.remove(name) {
            Some(FieldValue::Material(m)) => Some(m),
            _ => None,
        }
    }

    fn path(&mut self, name: &str) -> Option<PathBuf> {
        match self.values.remove(name) {
            Some(FieldValue::Path(p)) => Some(p),
            _ => None,
        }
    }

    fn geometry(&mut self, name: &str) -> Option<GeometricProperties> {
        match self.values.remove(name) {
            Some(FieldValue::Geometry(g)) => Some(g),
            _ => None,
        }
    }

    fn relationships(&mut self, name: &str) -> Option<Vec<Relationship>> {
        match self.values.remove(name) {
            Some(FieldValue::Relationships(r)) => Some(r),
            _ => None,
        }
    }

    fn attributes(&mut self, name: &str) -> Option<Attributes> {
        match self.values.remove(name) {
            Some(FieldValue::Attributes(a)) => Some(a),
            _ => None,
        }
    }

    fn elements(&mut self, name: &str) -> Option<&'a [Value]> {
        match self.values.remove(name) {
            Some(FieldValue::Elements(items)) => Some(items),
            _ => None,
        }
    }
}

fn convert<'a>(
    raw: &'a Value,
    kind: FieldKind,
    path: &JsonPath,
) -> Result<FieldValue<'a>, DeserializeError> {
    Ok(match kind {
        FieldKind::Text => FieldValue::Text(expect_str(raw, path)?.to_string()),
        FieldKind::Number => FieldValue::Number(expect_number(raw, path)?),
        FieldKind::NumberList => FieldValue::NumberList(
            expect_array(raw, path)?
                .iter()
                .enumerate()
                .map(|(i, item)| expect_number(item, &path.index(i)))
                .collect::<Result<_, _>>()?,
        ),
        FieldKind::Flag => match raw {
            Value::Bool(b) => FieldValue::Flag(*b),
            other => return Err(mismatch(path, "boolean", other)),
        },
        FieldKind::ElementType => FieldValue::ElementType(parse_enum(raw, path)?),
        FieldKind::Material => FieldValue::Material(parse_enum(raw, path)?),
        FieldKind::Path => FieldValue::Path(PathBuf::from(expect_str(raw, path)?)),
        FieldKind::Geometry => FieldValue::Geometry(decode_geometry_at(raw, path)?),
        FieldKind::Relationships => FieldValue::Relationships(
            expect_array(raw, path)?
                .iter()
                .enumerate()
                .map(|(i, item)| decode_relationship_at(item, &path.index(i)))
                .collect::<Result<_, _>>()?,
        ),
        FieldKind::Attributes => {
            FieldValue::Attributes(decode_attribute_map(expect_object(raw, path)?, path)?)
        }
        FieldKind::Elements => FieldValue::Elements(expect_array(raw, path)?),
    })
}

/// Enumerations parse case-insensitively; the encoder always writes the
/// canonical upper-case form.
fn parse_enum<T>(raw: &Value, path: &JsonPath) -> Result<T, DeserializeError>
where
    T: std::str::FromStr<Err = ValidationError>,
{
    let text = expect_str(raw, path)?;
    text.parse().map_err(|e| match e {
        ValidationError::UnknownVariant { enumeration, value } => DeserializeError::new(
            path.clone(),
            DeserializeErrorKind::InvalidEnumValue { enumeration, value },
        ),
        other => invalid(path, other),
    })
}

fn expect_object<'a>(
    value: &'a Value,
    path: &JsonPath,
) -> Result<&'a Map<String, Value>, DeserializeError> {
    value.as_object().ok_or_else(|| mismatch(path, "object", value))
}

fn expect_array<'a>(value: &'a Value, path: &JsonPath) -> Result<&'a [Value], DeserializeError> {
    match value {
        Value::Array(items) => Ok(items.as_slice()),
        other => Err(mismatch(path, "array", other)),
    }
}

fn expect_str<'a>(value: &'a Value, path: &JsonPath) -> Result<&'a str, DeserializeError> {
    value.as_str().ok_or_else(|| mismatch(path, "string", value))
}

fn expect_number(value: &Value, path: &JsonPath) -> Result<f64, DeserializeError> {
    match value {
        Value::Number(n) => exact_f64(n).ok_or_else(|| {
            DeserializeError::new(
                path.clone(),
                DeserializeErrorKind::TypeMismatch {
                    expected: "number representable as f64",
                    found: "integer beyond f64 precision",
                },
            )
        }),
        other => Err(mismatch(path, "number", other)),
    }
}

/// Integers are accepted only when the conversion to `f64` is lossless.
#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
fn exact_f64(n: &Number) -> Option<f64> {
    if let Some(i) = n.as_i64() {
        let f = i as f64;
        return (f as i128 == i128::from(i)).then_some(f);
    }
    if let Some(u) = n.as_u64() {
        let f = u as f64;
        return (f as u128 == u128::from(u)).then_some(f);
    }
    n.as_f64()
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn mismatch(path: &JsonPath, expected: &'static str, found: &Value) -> DeserializeError {
    DeserializeError::new(
        path.clone(),
        DeserializeErrorKind::TypeMismatch {
            expected,
            found: json_type(found),
        },
    )
}

fn invalid(path: &JsonPath, error: ValidationError) -> DeserializeError {
    DeserializeError::new(path.clone(), DeserializeErrorKind::Invalid(error))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn kind_of(result: Result<Element, DeserializeError>) -> DeserializeErrorKind {
        result.unwrap_err().kind
    }

    #[test]
    fn wall_discriminator_yields_wall_shape() {
        let element = decode_element(&json!({
            "element_id": "w1",
            "name": "North wall",
            "element_type": "WALL",
            "material": "BRICK",
            "load_bearing": true,
            "fire_rating": "F90"
        }))
        .unwrap();

        assert_eq!(element.element_type(), ElementType::Wall);
        assert_eq!(
            element.shape(),
            &ElementShape::Wall(WallData {
                load_bearing: true,
                fire_rating: Some("F90".to_string()),
            })
        );
    }

    #[test]
    fn unspecialized_type_yields_generic_shape() {
        let element = decode_element(&json!({
            "element_id": "s1",
            "element_type": "SLAB",
            "load_bearing": true
        }))
        .unwrap();

        assert_eq!(element.shape(), &ElementShape::Generic);
        assert_eq!(element.name(), "s1");
        assert_eq!(element.material, Material::Other);
    }

    #[test]
    fn missing_discriminator_is_an_error() {
        let kind = kind_of(decode_element(&json!({ "element_id": "x" })));
        assert!(matches!(kind, DeserializeErrorKind::MissingDiscriminator));

        let kind = kind_of(decode_element(&json!({ "element_id": "x", "element_type": null })));
        assert!(matches!(kind, DeserializeErrorKind::MissingDiscriminator));
    }

    #[test]
    fn unknown_discriminator_is_an_error() {
        let err = decode_element(&json!({ "element_id": "x", "element_type": "SPACESHIP" }))
            .unwrap_err();
        assert_eq!(err.path.to_string(), "$.element_type");
        assert!(matches!(err.kind, DeserializeErrorKind::UnknownElementType(ref t) if t == "SPACESHIP"));
    }

    #[test]
    fn enums_are_case_insensitive() {
        let element = decode_element(&json!({
            "element_id": "d1",
            "element_type": "door",
            "material": "Wood",
            "frame_material": "aluminum",
            "detail_drawing": "drawings/d1.pdf"
        }))
        .unwrap();

        assert_eq!(element.material, Material::Wood);
        assert_eq!(
            element.shape(),
            &ElementShape::Opening(OpeningData {
                frame_material: Some(Material::Aluminum),
                detail_drawing: Some(PathBuf::from("drawings/d1.pdf")),
            })
        );
    }

    #[test]
    fn invalid_material_reports_location() {
        let err = decode_element(&json!({
            "element_id": "w1",
            "element_type": "WALL",
            "material": "CHEESE"
        }))
        .unwrap_err();

        assert_eq!(err.path.to_string(), "$.material");
        assert!(matches!(
            err.kind,
            DeserializeErrorKind::InvalidEnumValue { enumeration: "material", .. }
        ));
    }

    #[test]
    fn validation_failures_are_wrapped() {
        let kind = kind_of(decode_element(&json!({ "element_id": "  ", "element_type": "WALL" })));
        assert!(matches!(
            kind,
            DeserializeErrorKind::Invalid(ValidationError::Empty { field: "element id" })
        ));

        let err = decode_relationship(&json!({ "type": "", "target_element_id": "w1" })).unwrap_err();
        assert!(matches!(err.kind, DeserializeErrorKind::Invalid(_)));
    }

    #[test]
    fn missing_required_field() {
        let err = decode_element(&json!({ "element_type": "WALL" })).unwrap_err();
        assert_eq!(err.path.to_string(), "$.element_id");
        assert!(matches!(err.kind, DeserializeErrorKind::MissingField(ref f) if f == "element_id"));
    }

    #[test]
    fn nested_type_mismatch_reports_full_path() {
        let err = decode_model(&json!({
            "model_id": "m1",
            "name": "Test",
            "elements": [
                { "element_id": "a", "element_type": "SLAB" },
                {
                    "element_id": "b",
                    "element_type": "WALL",
                    "geometric_properties": { "dimensions": [1.0, "tall"] }
                }
            ]
        }))
        .unwrap_err();

        assert_eq!(
            err.path.to_string(),
            "$.elements[1].geometric_properties.dimensions[1]"
        );
        assert!(matches!(
            err.kind,
            DeserializeErrorKind::TypeMismatch { expected: "number", found: "string" }
        ));
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let element = decode_element(&json!({
            "element_id": "c1",
            "element_type": "COLUMN",
            "colour": "red",
            "geometric_properties": { "height": 3, "bounding_box": [0, 0] },
            "load_capacity_kn": 250
        }))
        .unwrap();

        assert_eq!(element.geometry.height, Some(3.0));
        assert!(element.get_property("colour").is_none());
        assert_eq!(
            element.shape(),
            &ElementShape::Column(ColumnData {
                profile: None,
                load_capacity_kn: Some(250.0),
            })
        );
    }

    #[test]
    fn attributes_keep_numeric_representation() {
        let value = decode_attribute(&json!({
            "level": 1,
            "u_value": 0.25,
            "tags": ["a", null, true],
        }))
        .unwrap();

        let AttributeValue::Map(map) = value else {
            panic!("expected a map");
        };
        assert_eq!(map["level"], AttributeValue::Integer(1));
        assert_eq!(map["u_value"], AttributeValue::Float(0.25));
        assert_eq!(
            map["tags"],
            AttributeValue::List(vec![
                AttributeValue::Text("a".to_string()),
                AttributeValue::Null,
                AttributeValue::Bool(true),
            ])
        );
    }

    #[test]
    fn oversized_integers_are_rejected_not_rounded() {
        assert!(decode_attribute(&json!(u64::MAX)).is_err());

        let err = decode_geometry(&json!({ "length": 9_007_199_254_740_993_i64 })).unwrap_err();
        assert_eq!(err.path.to_string(), "$.length");
        assert!(decode_geometry(&json!({ "length": 9_007_199_254_740_992_i64 })).is_ok());
    }

    #[test]
    fn duplicate_ids_in_document() {
        let err = decode_model(&json!({
            "model_id": "m1",
            "name": "Test",
            "elements": [
                { "element_id": "a", "element_type": "SLAB" },
                { "element_id": "a", "element_type": "ROOF" }
            ]
        }))
        .unwrap_err();

        assert_eq!(err.path.to_string(), "$.elements[1]");
        assert!(matches!(err.kind, DeserializeErrorKind::DuplicateElement(ref d) if d.id == "a"));
    }

    #[test]
    fn syntax_errors_are_deserialization_errors() {
        let err = from_json_str("{ \"model_id\": ").unwrap_err();
        assert!(matches!(err.kind, DeserializeErrorKind::Syntax(_)));
    }

    #[test]
    fn non_object_input() {
        let err = decode_model(&json!([1, 2])).unwrap_err();
        assert!(matches!(
            err.kind,
            DeserializeErrorKind::TypeMismatch { expected: "object", found: "array" }
        ));
    }
}
