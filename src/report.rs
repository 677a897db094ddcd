//! Markdown summary report.

use std::fs;
use std::path::Path;

use crate::analysis::ModelAnalyzer;
use crate::error::ExportError;
use crate::model::Model;

/// Summary of one model: element counts, area by type and volume by
/// material.
#[derive(Debug, Clone, Copy)]
pub struct SummaryReport<'a> {
    model: &'a Model,
}

impl<'a> SummaryReport<'a> {
    #[must_use]
    pub fn new(model: &'a Model) -> Self {
        Self { model }
    }

    /// Renders the report as markdown. `version` and `date` come from the
    /// model metadata when present.
    #[must_use]
    pub fn render(&self) -> String {
        let analyzer = ModelAnalyzer::new(self.model);
        let metadata = |key: &str| {
            self.model
                .metadata
                .get(key)
                .map_or_else(|| "n/a".to_string(), ToString::to_string)
        };

        let mut lines = vec![
            format!("# Architectural Model Summary Report: {}", self.model.name()),
            String::new(),
            format!("**Version:** {}", metadata("version")),
            format!("**Date:** {}", metadata("date")),
            format!("**Total Elements:** {}", self.model.len()),
            String::new(),
            "## Element Counts by Type".to_string(),
            "| Element Type | Count |".to_string(),
            "|--------------|-------|".to_string(),
        ];
        for (element_type, count) in analyzer.count_by_type() {
            lines.push(format!("| {} | {count} |", element_type.label()));
        }

        lines.push(String::new());
        lines.push("## Total Area by Element Type (m²)".to_string());
        lines.push("| Element Type | Total Area (m²) |".to_string());
        lines.push("|--------------|-----------------|".to_string());
        for (element_type, area) in analyzer.total_area_by_type() {
            lines.push(format!("| {} | {} |", element_type.label(), quantity(area)));
        }

        lines.push(String::new());
        lines.push("## Total Volume by Material (m³)".to_string());
        lines.push("| Material | Total Volume (m³) |".to_string());
        lines.push("|----------|-------------------|".to_string());
        for (material, volume) in analyzer.total_volume_by_material() {
            lines.push(format!("| {} | {} |", material.label(), quantity(volume)));
        }

        let mut out = lines.join("\n");
        out.push('\n');
        out
    }

    /// Renders and writes the report, creating the parent directory.
    pub fn write_to(&self, path: impl AsRef<Path>) -> Result<(), ExportError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| ExportError::FileCreate {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        fs::write(path, self.render()).map_err(|e| ExportError::WriteError {
            message: format!("{}: {e}", path.display()),
        })?;
        tracing::info!(model = %self.model.id(), path = %path.display(), "wrote summary report");
        Ok(())
    }
}

/// Two decimals with `,` grouping the integer digits, e.g. `3,000.00`.
fn quantity(value: f64) -> String {
    let formatted = format!("{value:.2}");
    let (sign, unsigned) = match formatted.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", formatted.as_str()),
    };
    let (integer, fraction) = unsigned.split_once('.').unwrap_or((unsigned, "00"));

    let mut grouped = String::with_capacity(integer.len() + integer.len() / 3);
    for (i, digit) in integer.chars().enumerate() {
        if i > 0 && (integer.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    format!("{sign}{grouped}.{fraction}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::demo::sample_model;
    use pretty_assertions::assert_eq;

    #[test]
    fn formats_quantities() {
        assert_eq!(quantity(0.0), "0.00");
        assert_eq!(quantity(9.0), "9.00");
        assert_eq!(quantity(3000.0), "3,000.00");
        assert_eq!(quantity(1_234_567.891), "1,234,567.89");
        assert_eq!(quantity(-1500.5), "-1,500.50");
    }

    #[test]
    fn renders_sections() {
        let model = sample_model("demo").unwrap();
        let report = SummaryReport::new(&model).render();

        assert!(report.starts_with("# Architectural Model Summary Report: ArchLens Demo Building\n"));
        assert!(report.contains("**Version:** 1.0"));
        assert!(report.contains("**Date:** 2023-10-27"));
        assert!(report.contains("**Total Elements:** 11"));
        assert!(report.contains("| Wall | 4 |"));
        assert!(report.contains("| Building | 300.00 |"));
        assert!(report.contains("| Other | 3,112.00 |"));
        assert!(report.contains("| Wall | 84.00 |"));
        assert!(report.contains("| Brick | 18.00 |"));
    }

    #[test]
    fn missing_metadata_renders_placeholder() {
        let model = Model::new("bare", "Bare").unwrap();
        let report = SummaryReport::new(&model).render();
        assert!(report.contains("**Version:** n/a"));
        assert!(report.contains("**Total Elements:** 0"));
    }

    #[test]
    fn writes_into_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reports").join("demo.md");
        let model = sample_model("demo").unwrap();

        SummaryReport::new(&model).write_to(&path).unwrap();

        let written = fs::read_to_string(&path).unwrap();
        assert_eq!(written, SummaryReport::new(&model).render());
    }
}
