//! Ad review report model and parser
//!
//! The upstream vision model is asked to answer in a loose, XML-like tag
//! format. This crate turns that reply into an [`AdReport`]:
//!
//! - [`parse_ad_report`] - total, lenient tagged-text parser
//! - [`grammar`] - the ordered tag-sequence matcher the parser is built on
//! - [`render`] - plain-text report and score display helpers
//!
//! Parsing never fails. Sections that do not match their grammar are
//! left out of the report.

pub mod grammar;
pub mod parser;
pub mod render;
pub mod types;

pub use parser::parse_ad_report;
pub use render::ScoreBand;
pub use types::{AdReport, Section, SectionReport};
