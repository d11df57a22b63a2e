//! Core entry point for the contracts_plan_pdf crate.
//!
//! The crate renders the TRAK "Contracts Implementation Plan" as an A4 PDF. The literal content
//! lives in [`plan`]; the remaining modules are the small layout toolkit it is written against.

pub mod builder;
pub mod elements;
pub mod fonts;
pub mod model;
pub mod plan;
pub mod richtext;
pub mod styles;
pub mod table;

#[cfg(feature = "bookmarks")]
pub mod bookmarks;

pub use builder::{PdfBuildError, PdfBuilder, RenderedPdf};
pub use plan::{build, build_to, plan_builder, write_rendered, DEFAULT_OUTPUT_PATH};
pub use styles::build_styles;
pub use table::build_table;
