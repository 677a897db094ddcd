//! Sample building used by `archlens demo` and the tests.

use serde_json::{json, Value};

use crate::codec;
use crate::error::DeserializeError;
use crate::model::Model;

/// Wire document of the sample building, stored under `id`.
///
/// A building with two floors, four walls, a window, two spaces and a
/// column. The window stores no volume and the column no area.
#[must_use]
pub fn sample_document(id: &str) -> Value {
    json!({
        "model_id": id,
        "name": "ArchLens Demo Building",
        "metadata": {
            "version": "1.0",
            "date": "2023-10-27",
            "project_id": "AL-DEMO-001"
        },
        "elements": [
            {
                "element_id": "b_001",
                "name": "Main Building",
                "element_type": "BUILDING",
                "material": "OTHER",
                "properties": { "year_built": 2023 },
                "geometric_properties": { "area": 300.0, "height": 10.0, "volume": 3000.0 }
            },
            {
                "element_id": "f_001",
                "name": "Ground Floor",
                "element_type": "FLOOR",
                "material": "CONCRETE",
                "parent_id": "b_001",
                "properties": { "level": 0 },
                "geometric_properties": { "area": 100.0, "thickness": 0.3, "volume": 30.0 }
            },
            {
                "element_id": "f_002",
                "name": "First Floor",
                "element_type": "FLOOR",
                "material": "CONCRETE",
                "parent_id": "b_001",
                "properties": { "level": 1 },
                "geometric_properties": { "area": 100.0, "thickness": 0.3, "volume": 30.0 }
            },
            {
                "element_id": "w_ext_001",
                "name": "Exterior Wall North",
                "element_type": "WALL",
                "material": "BRICK",
                "parent_id": "f_001",
                "load_bearing": true,
                "properties": { "fire_rating": "F90", "u_value": 0.25 },
                "geometric_properties": {
                    "length": 10.0, "height": 3.0, "thickness": 0.3, "area": 30.0, "volume": 9.0
                }
            },
            {
                "element_id": "w_ext_002",
                "name": "Exterior Wall South",
                "element_type": "WALL",
                "material": "BRICK",
                "parent_id": "f_001",
                "load_bearing": true,
                "properties": { "fire_rating": "F90", "u_value": 0.25 },
                "geometric_properties": {
                    "length": 10.0, "height": 3.0, "thickness": 0.3, "area": 30.0, "volume": 9.0
                }
            },
            {
                "element_id": "w_int_001",
                "name": "Interior Wall Main",
                "element_type": "WALL",
                "material": "PLASTER",
                "parent_id": "f_001",
                "properties": { "sound_rating_db": 45 },
                "geometric_properties": {
                    "length": 5.0, "height": 3.0, "thickness": 0.1, "area": 15.0, "volume": 1.5
                }
            },
            {
                "element_id": "w_int_002",
                "name": "Interior Wall Office",
                "element_type": "WALL",
                "material": "WOOD",
                "parent_id": "f_001",
                "properties": { "sound_rating_db": 30 },
                "geometric_properties": {
                    "length": 3.0, "height": 3.0, "thickness": 0.1, "area": 9.0, "volume": 0.9
                }
            },
            {
                "element_id": "win_001",
                "name": "Main Window",
                "element_type": "WINDOW",
                "material": "GLASS",
                "parent_id": "w_ext_001",
                "frame_material": "ALUMINUM",
                "properties": { "glazing_type": "double" },
                "geometric_properties": { "width": 2.0, "height": 1.5, "area": 3.0 },
                "relationships": [
                    {
                        "type": "hosted_by",
                        "target_element_id": "w_ext_001",
                        "description": "opening in the north wall"
                    }
                ]
            },
            {
                "element_id": "space_office",
                "name": "Office Space 101",
                "element_type": "SPACE",
                "material": "OTHER",
                "parent_id": "f_001",
                "properties": { "occupancy_load": 4 },
                "geometric_properties": { "area": 25.0, "height": 2.8, "volume": 70.0 }
            },
            {
                "element_id": "space_corridor",
                "name": "Corridor Ground",
                "element_type": "SPACE",
                "material": "OTHER",
                "parent_id": "f_001",
                "properties": { "fire_zone": "A" },
                "geometric_properties": { "area": 15.0, "height": 2.8, "volume": 42.0 }
            },
            {
                "element_id": "column_001",
                "name": "Support Column A1",
                "element_type": "COLUMN",
                "material": "CONCRETE",
                "parent_id": "f_001",
                "properties": { "structural_load_kn": 150 },
                "geometric_properties": { "length": 0.4, "width": 0.4, "height": 3.0, "volume": 0.48 }
            }
        ]
    })
}

/// The sample building decoded into a typed model.
pub fn sample_model(id: &str) -> Result<Model, DeserializeError> {
    codec::decode_model(&sample_document(id))
}
