//! tabflow: a multi-step tabular-data classification pipeline.
//!
//! A caller uploads a delimited dataset, prunes columns, picks the label
//! column, and the pipeline normalizes features, encodes labels, performs a
//! seeded stratified split, trains a classifier, reports accuracy, and later
//! re-applies the same fitted scaling/encoding to new raw rows on demand.
//!
//! All fitted state lives in explicit, caller-owned session objects; the
//! concrete classifier sits behind a small trait so the model technology is
//! swappable without touching the pipeline.
pub mod artifact;
pub mod config;
pub mod dataset;
pub mod encoding;
pub mod error;
pub mod io;
pub mod models;
pub mod pipeline;
pub mod preprocessing;
pub mod session;
pub mod split;
