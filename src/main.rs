use clap::{Parser, Subcommand};
use color_eyre::eyre::eyre;
use color_eyre::Result;
use std::path::PathBuf;

use archlens::analysis::ModelAnalyzer;
use archlens::codec::decode_attribute;
use archlens::config::LensConfig;
use archlens::demo::sample_model;
use archlens::export::export_csv;
use archlens::filter::{ElementFilter, GeometryField};
use archlens::logging;
use archlens::model::{AttributeValue, ElementType, Material};
use archlens::report::SummaryReport;
use archlens::store::ModelStore;

#[derive(Parser, Debug)]
#[command(name = "archlens")]
#[command(about = "ArchLens - inspect, filter and report on architectural element models")]
#[command(version)]
struct Args {
    /// TOML configuration file
    #[arg(long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Directory holding the model files
    #[arg(long, value_name = "DIR", global = true)]
    data_dir: Option<PathBuf>,

    /// Log filter directive, e.g. `debug` or `archlens=trace`
    #[arg(long, value_name = "FILTER", global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write the sample building into the store
    Demo {
        #[arg(long, default_value = "demo")]
        id: String,
    },
    /// List stored models
    List,
    /// Element counts, area by type and volume by material
    Show { model: String },
    /// Print the elements matching every given condition
    Filter {
        model: String,

        #[arg(long = "type", value_name = "TYPE")]
        element_type: Option<ElementType>,

        #[arg(long)]
        material: Option<Material>,

        /// Property equality, e.g. `fire_rating="F90"` or `level=0`
        #[arg(long, value_name = "KEY=JSON", value_parser = parse_property)]
        property: Option<(String, AttributeValue)>,

        #[arg(long, value_name = "FIELD")]
        geometry: Option<GeometryField>,

        /// Inclusive lower bound for `--geometry`
        #[arg(long)]
        min: Option<f64>,

        /// Inclusive upper bound for `--geometry`
        #[arg(long)]
        max: Option<f64>,
    },
    /// Write a markdown summary report
    Report {
        model: String,

        /// Defaults to `<data>/reports/<MODEL>.md`
        #[arg(long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
    /// Export the element table as CSV
    ExportCsv { model: String, file: PathBuf },
}

/// Splits `KEY=JSON`. A value that is not valid JSON is taken as text.
fn parse_property(raw: &str) -> Result<(String, AttributeValue), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{raw}'"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err("property key must not be empty".to_string());
    }
    let value = match serde_json::from_str::<serde_json::Value>(value) {
        Ok(json) => decode_attribute(&json).map_err(|e| e.to_string())?,
        Err(_) => AttributeValue::from(value),
    };
    Ok((key.to_string(), value))
}

/// `<reports>/<stem>.md`, using the store's escaped file stem so the name
/// cannot leave the reports directory.
fn default_report_path(config: &LensConfig, model: &str) -> PathBuf {
    config
        .reports_directory()
        .join(format!("{}.md", ModelStore::file_stem(model)))
}

fn load_config(args: &Args) -> Result<LensConfig> {
    let mut builder = LensConfig::builder();
    if let Some(path) = &args.config {
        builder = builder.load_file(path)?;
    }
    builder = builder.load_env();
    if let Some(dir) = &args.data_dir {
        builder = builder.data_directory(dir);
    }
    if let Some(level) = &args.log_level {
        builder = builder.log_filter(level);
    }
    Ok(builder.build()?)
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let args = Args::parse();

    let config = load_config(&args)?;
    logging::initialize(config.log())?;

    let mut store = ModelStore::from_config(&config);

    match args.command {
        Command::Demo { id } => {
            let model = sample_model(&id)?;
            let path = store.save(&model)?;
            println!("Wrote demo model '{id}' to {}", path.display());
        }
        Command::List => {
            let names = store.list()?;
            if names.is_empty() {
                println!("No models in {}", store.directory().display());
            }
            for name in names {
                println!("{name}");
            }
        }
        Command::Show { model } => {
            let model = store.load(&model)?;
            let analyzer = ModelAnalyzer::new(model);

            println!("{} ({}), {} elements", model.name(), model.id(), model.len());
            println!("\nElements by type:");
            for (element_type, count) in analyzer.count_by_type() {
                println!("  {:<10} {count}", element_type.label());
            }
            println!("\nArea by type (m²):");
            for (element_type, area) in analyzer.total_area_by_type() {
                println!("  {:<10} {area:.2}", element_type.label());
            }
            println!("\nVolume by material (m³):");
            for (material, volume) in analyzer.total_volume_by_material() {
                println!("  {:<10} {volume:.2}", material.label());
            }

            let dangling = model.dangling_relationships();
            if !dangling.is_empty() {
                println!("\nRelationships to missing elements:");
                for (source, relationship) in dangling {
                    println!(
                        "  {source} -[{}]-> {}",
                        relationship.kind(),
                        relationship.target_element_id()
                    );
                }
            }
        }
        Command::Filter {
            model,
            element_type,
            material,
            property,
            geometry,
            min,
            max,
        } => {
            if geometry.is_none() && (min.is_some() || max.is_some()) {
                return Err(eyre!("--min/--max need --geometry"));
            }
            let model = store.load(&model)?;

            let mut filter = ElementFilter::new(model.elements());
            if let Some(element_type) = element_type {
                filter = filter.by_type(element_type);
            }
            if let Some(material) = material {
                filter = filter.by_material(material);
            }
            if let Some((key, value)) = &property {
                filter = filter.by_property(key, value);
            }
            if let Some(field) = geometry {
                filter = filter.by_geometry_range(field, min, max);
            }

            for element in filter.iter() {
                println!(
                    "{}\t{}\t{}\t{}",
                    element.id(),
                    element.element_type(),
                    element.material,
                    element.name()
                );
            }
            println!("{} of {} elements matched", filter.len(), model.len());
        }
        Command::Report { model: name, output } => {
            let output = output.unwrap_or_else(|| default_report_path(&config, &name));
            let model = store.load(&name)?;
            SummaryReport::new(model).write_to(&output)?;
            println!("Report written to {}", output.display());
        }
        Command::ExportCsv { model, file } => {
            let model = store.load(&model)?;
            export_csv(model, &file)?;
            println!("Exported to CSV: {}", file.display());
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn property_values_are_json_or_text() {
        assert_eq!(
            parse_property("level=0").unwrap(),
            ("level".to_string(), AttributeValue::Integer(0))
        );
        assert_eq!(
            parse_property("fire_rating=\"F90\"").unwrap(),
            ("fire_rating".to_string(), AttributeValue::from("F90"))
        );
        assert_eq!(
            parse_property("fire_zone=A").unwrap(),
            ("fire_zone".to_string(), AttributeValue::from("A"))
        );
        assert!(parse_property("novalue").is_err());
        assert!(parse_property("=1").is_err());
    }

    #[test]
    fn report_path_stays_in_reports_directory() {
        let config = LensConfig::builder().data_directory("/data").build().unwrap();
        assert_eq!(
            default_report_path(&config, "demo"),
            PathBuf::from("/data/reports/demo.md")
        );
        let escaped = default_report_path(&config, "../../x");
        assert_eq!(escaped, PathBuf::from("/data/reports/%2E.%2F..%2Fx.md"));
        assert_eq!(escaped.parent(), Some(config.reports_directory()));
    }

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Args::command().debug_assert();
    }
}
