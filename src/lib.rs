//! # ArchLens
//!
//! Typed architectural element models with JSON persistence, analysis and
//! reporting.
//!
//! ## Features
//!
//! - Polymorphic element shapes selected by `element_type` (walls, beams,
//!   columns, openings and generic elements)
//! - Descriptor-driven JSON decoding with located errors
//! - Atomic file persistence, one document per model
//! - Aggregation, chainable filtering, markdown reports and CSV export
//!
//! ## Example
//!
//! ```no_run
//! use archlens::analysis::ModelAnalyzer;
//! use archlens::store::ModelStore;
//!
//! let mut store = ModelStore::new("archlens_data");
//! let model = store.load("demo").expect("Failed to load");
//! println!("Model: {}", model.name());
//! println!("Elements: {}", model.len());
//! for (element_type, area) in ModelAnalyzer::new(model).total_area_by_type() {
//!     println!("{element_type}: {area:.2} m²");
//! }
//! ```

pub mod analysis;
pub mod codec;
pub mod config;
pub mod demo;
pub mod error;
pub mod export;
pub mod filter;
pub mod logging;
pub mod model;
pub mod registry;
pub mod report;
pub mod store;
