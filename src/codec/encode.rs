//! Typed model -> JSON tree. The inverse of [`super::decode`].

use serde_json::{Map, Number, Value};

use crate::error::{JsonPath, SerializeError};
use crate::model::{
    AttributeValue, Attributes, Element, ElementShape, GeometricProperties, Model, Relationship,
};
use crate::registry::DISCRIMINATOR;

/// Renders a model document: pretty printed, two-space indent, trailing
/// newline.
pub fn to_json_string(model: &Model) -> Result<String, SerializeError> {
    let value = encode_model(model)?;
    let mut text = serde_json::to_string_pretty(&value)?;
    text.push('\n');
    Ok(text)
}

/// Elements are written as an array in model order; each element carries
/// its own id so the decoder never relies on container keys.
pub fn encode_model(model: &Model) -> Result<Value, SerializeError> {
    let path = JsonPath::root();
    let elements_path = path.field("elements");
    let elements = model
        .elements()
        .enumerate()
        .map(|(i, element)| encode_element_at(element, &elements_path.index(i)))
        .collect::<Result<Vec<_>, _>>()?;

    let mut object = Map::new();
    object.insert("model_id".into(), model.id().into());
    object.insert("name".into(), model.name().into());
    object.insert(
        "metadata".into(),
        encode_attributes(&model.metadata, &path.field("metadata"))?,
    );
    object.insert("elements".into(), Value::Array(elements));
    Ok(Value::Object(object))
}

pub fn encode_element(element: &Element) -> Result<Value, SerializeError> {
    encode_element_at(element, &JsonPath::root())
}

pub fn encode_geometry(geometry: &GeometricProperties) -> Result<Value, SerializeError> {
    encode_geometry_at(geometry, &JsonPath::root())
}

#[must_use]
pub fn encode_relationship(relationship: &Relationship) -> Value {
    let mut object = Map::new();
    object.insert("type".into(), relationship.kind().into());
    object.insert(
        "target_element_id".into(),
        relationship.target_element_id().into(),
    );
    if let Some(description) = &relationship.description {
        object.insert("description".into(), description.as_str().into());
    }
    Value::Object(object)
}

pub fn encode_attribute(value: &AttributeValue) -> Result<Value, SerializeError> {
    encode_attribute_at(value, &JsonPath::root())
}

fn encode_element_at(element: &Element, path: &JsonPath) -> Result<Value, SerializeError> {
    let mut object = Map::new();
    object.insert("element_id".into(), element.id().into());
    object.insert("name".into(), element.name().into());
    object.insert(DISCRIMINATOR.into(), element.element_type().as_str().into());
    object.insert("material".into(), element.material.as_str().into());
    if let Some(description) = &element.description {
        object.insert("description".into(), description.as_str().into());
    }
    if let Some(parent_id) = &element.parent_id {
        object.insert("parent_id".into(), parent_id.as_str().into());
    }
    object.insert(
        "geometric_properties".into(),
        encode_geometry_at(&element.geometry, &path.field("geometric_properties"))?,
    );
    object.insert(
        "properties".into(),
        encode_attributes(&element.properties, &path.field("properties"))?,
    );
    object.insert(
        "relationships".into(),
        Value::Array(element.relationships.iter().map(encode_relationship).collect()),
    );
    encode_shape(element.shape(), &mut object, path)?;
    Ok(Value::Object(object))
}

/// Shape fields sit flat beside the common element fields.
fn encode_shape(
    shape: &ElementShape,
    object: &mut Map<String, Value>,
    path: &JsonPath,
) -> Result<(), SerializeError> {
    match shape {
        ElementShape::Generic => {}
        ElementShape::Wall(wall) => {
            object.insert("load_bearing".into(), wall.load_bearing.into());
            insert_text(object, "fire_rating", wall.fire_rating.as_deref());
        }
        ElementShape::Beam(beam) => {
            insert_number(object, "span", beam.span, path)?;
            insert_text(object, "profile", beam.profile.as_deref());
        }
        ElementShape::Column(column) => {
            insert_text(object, "profile", column.profile.as_deref());
            insert_number(object, "load_capacity_kn", column.load_capacity_kn, path)?;
        }
        ElementShape::Opening(opening) => {
            if let Some(material) = opening.frame_material {
                object.insert("frame_material".into(), material.as_str().into());
            }
            if let Some(drawing) = &opening.detail_drawing {
                let text = drawing.to_str().ok_or_else(|| SerializeError::NonUtf8Path {
                    path: path.field("detail_drawing"),
                })?;
                object.insert("detail_drawing".into(), text.into());
            }
        }
    }
    Ok(())
}

fn encode_geometry_at(
    geometry: &GeometricProperties,
    path: &JsonPath,
) -> Result<Value, SerializeError> {
    let mut object = Map::new();
    insert_number(&mut object, "length", geometry.length, path)?;
    insert_number(&mut object, "width", geometry.width, path)?;
    insert_number(&mut object, "height", geometry.height, path)?;
    insert_number(&mut object, "thickness", geometry.thickness, path)?;
    insert_number(&mut object, "area", geometry.area, path)?;
    insert_number(&mut object, "volume", geometry.volume, path)?;
    for (name, list) in [
        ("coordinates", &geometry.coordinates),
        ("dimensions", &geometry.dimensions),
    ] {
        if let Some(values) = list {
            let list_path = path.field(name);
            let encoded = values
                .iter()
                .enumerate()
                .map(|(i, v)| number(*v, &list_path.index(i)))
                .collect::<Result<Vec<_>, _>>()?;
            object.insert(name.into(), Value::Array(encoded));
        }
    }
    Ok(Value::Object(object))
}

fn encode_attributes(attributes: &Attributes, path: &JsonPath) -> Result<Value, SerializeError> {
    let mut object = Map::new();
    for (key, value) in attributes {
        object.insert(key.clone(), encode_attribute_at(value, &path.field(key))?);
    }
    Ok(Value::Object(object))
}

fn encode_attribute_at(value: &AttributeValue, path: &JsonPath) -> Result<Value, SerializeError> {
    Ok(match value {
        AttributeValue::Null => Value::Null,
        AttributeValue::Bool(b) => Value::Bool(*b),
        AttributeValue::Integer(i) => Value::Number((*i).into()),
        AttributeValue::Float(f) => number(*f, path)?,
        AttributeValue::Text(s) => Value::String(s.clone()),
        AttributeValue::List(items) => Value::Array(
            items
                .iter()
                .enumerate()
                .map(|(i, item)| encode_attribute_at(item, &path.index(i)))
                .collect::<Result<_, _>>()?,
        ),
        AttributeValue::Map(map) => encode_attributes(map, path)?,
    })
}

fn number(value: f64, path: &JsonPath) -> Result<Value, SerializeError> {
    Number::from_f64(value)
        .map(Value::Number)
        .ok_or_else(|| SerializeError::NonFiniteNumber { path: path.clone() })
}

fn insert_number(
    object: &mut Map<String, Value>,
    name: &str,
    value: Option<f64>,
    path: &JsonPath,
) -> Result<(), SerializeError> {
    if let Some(value) = value {
        object.insert(name.into(), number(value, &path.field(name))?);
    }
    Ok(())
}

fn insert_text(object: &mut Map<String, Value>, name: &str, value: Option<&str>) {
    if let Some(value) = value {
        object.insert(name.into(), value.into());
    }
}
