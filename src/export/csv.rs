use crate::error::ExportError;
use crate::model::Model;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Header row of the element table.
pub const HEADER: [&str; 7] = [
    "Element ID",
    "Name",
    "Type",
    "Material",
    "Area",
    "Volume",
    "Parent",
];

pub fn export_csv<P: AsRef<Path>>(model: &Model, path: P) -> Result<(), ExportError> {
    let path_ref = path.as_ref();
    let file = File::create(path_ref).map_err(|source| ExportError::FileCreate {
        path: path_ref.to_path_buf(),
        source,
    })?;

    write_csv(model, file)?;
    tracing::info!(model = %model.id(), path = %path_ref.display(), "exported CSV");
    Ok(())
}

/// Writes one row per element in model order. Area and volume are the
/// effective values; empty cells mean none could be determined.
pub fn write_csv<W: Write>(model: &Model, out: W) -> Result<(), ExportError> {
    let mut writer = csv::Writer::from_writer(out);

    writer.write_record(HEADER)?;

    for element in model.elements() {
        let area = element
            .geometry
            .effective_area()
            .map(|v| v.to_string())
            .unwrap_or_default();
        let volume = element
            .geometry
            .effective_volume()
            .map(|v| v.to_string())
            .unwrap_or_default();
        writer.write_record([
            element.id(),
            element.name(),
            element.element_type().as_str(),
            element.material.as_str(),
            area.as_str(),
            volume.as_str(),
            element.parent_id.as_deref().unwrap_or_default(),
        ])?;
    }

    writer.flush().map_err(|e| ExportError::WriteError {
        message: e.to_string(),
    })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::demo::sample_model;
    use pretty_assertions::assert_eq;

    #[test]
    fn one_row_per_element() {
        let model = sample_model("demo").unwrap();
        let mut buffer = Vec::new();
        write_csv(&model, &mut buffer).unwrap();

        let text = String::from_utf8(buffer).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), model.len() + 1);
        assert_eq!(lines[0], "Element ID,Name,Type,Material,Area,Volume,Parent");
        assert!(lines.contains(&"b_001,Main Building,BUILDING,OTHER,300,3000,"));
        assert!(lines.contains(&"win_001,Main Window,WINDOW,GLASS,3,4.5,w_ext_001"));
    }

    #[test]
    fn writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("elements.csv");
        let model = sample_model("demo").unwrap();

        export_csv(&model, &path).unwrap();

        let mut reader = csv::Reader::from_path(&path).unwrap();
        assert_eq!(reader.records().count(), model.len());
    }

    #[test]
    fn unwritable_path() {
        let dir = tempfile::tempdir().unwrap();
        let model = sample_model("demo").unwrap();
        let err = export_csv(&model, dir.path().join("missing").join("out.csv")).unwrap_err();
        assert!(matches!(err, ExportError::FileCreate { .. }));
    }
}
