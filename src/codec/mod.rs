//! Conversion between the typed value model and the JSON wire format.

pub mod decode;
pub mod encode;

pub use decode::{
    decode_attribute, decode_element, decode_geometry, decode_model, decode_relationship,
    from_json_str,
};
pub use encode::{
    encode_attribute, encode_element, encode_geometry, encode_model, encode_relationship,
    to_json_string,
};
