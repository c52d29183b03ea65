//! State-level aggregation and classification engine.
//!
//! Everything here is a pure, synchronous transform over already-loaded
//! records: grouping and summary statistics, the 51-jurisdiction heat-map
//! view, rate-bucket classification, and chart series transforms. The
//! engine never fails on malformed input; bad values degrade to nulls or
//! fallback buckets instead.

pub mod classify;
pub mod heatmap;
pub mod registry;
pub mod summary;
pub mod trends;
