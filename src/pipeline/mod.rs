//! Pipeline module - binning, WoE tables and IV ranking

pub mod binning;
pub mod error;
pub mod group;
pub mod iv;
pub mod loader;
pub mod missing;
pub mod target;
pub mod woe;

pub use binning::{
    assign_bin_keys, distinct_count, format_value, quantile_bucket, quantile_edges, rank_average,
    BinKey, VariableKind, VariableValues, MISSING_LABEL,
};
pub use error::{AnalysisError, AnalysisResult};
pub use group::group_by;
pub use iv::*;
pub use loader::*;
pub use missing::*;
pub use target::*;
pub use woe::*;
