//! Bin-key assignment for numeric and categorical variables
//!
//! Numeric variables with fewer distinct values than the requested bin count
//! keep their raw value as the bin key. Other numeric variables are ranked
//! (ties share the average rank) and the ranks are cut into equal-frequency
//! quantile buckets. Categorical variables use each distinct level as a key.

use std::cmp::Ordering;
use std::fmt;

use polars::prelude::*;
use serde::{Serialize, Serializer};

/// Label used for the bin that collects missing values
pub const MISSING_LABEL: &str = "Missing";

/// Kind of variable, deciding how it is binned
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum VariableKind {
    Numeric,
    Categorical,
}

impl VariableKind {
    /// Integer, float and boolean columns are numeric; everything else is
    /// binned on its string form.
    pub fn of(dtype: &DataType) -> Self {
        if dtype.is_primitive_numeric() || matches!(dtype, DataType::Boolean) {
            VariableKind::Numeric
        } else {
            VariableKind::Categorical
        }
    }
}

impl fmt::Display for VariableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VariableKind::Numeric => write!(f, "numeric"),
            VariableKind::Categorical => write!(f, "categorical"),
        }
    }
}

/// Raw values of one variable, with missing entries as `None`
#[derive(Debug, Clone)]
pub enum VariableValues {
    Numeric(Vec<Option<f64>>),
    /// Integer columns kept exact, so ids beyond 2^53 stay distinct
    Integer(Vec<Option<i64>>),
    Categorical(Vec<Option<String>>),
}

impl VariableValues {
    /// Extract the values of a column. NaN floats are treated as missing.
    ///
    /// Signed integers and unsigned integers up to 32 bits are read as
    /// `i64`. `UInt64` goes through `f64` since it may not fit.
    pub fn from_column(col: &Column) -> PolarsResult<Self> {
        match VariableKind::of(col.dtype()) {
            VariableKind::Numeric if fits_i64(col.dtype()) => {
                let int_col = col.cast(&DataType::Int64)?;
                Ok(VariableValues::Integer(int_col.i64()?.into_iter().collect()))
            }
            VariableKind::Numeric => {
                let float_col = col.cast(&DataType::Float64)?;
                let values = float_col
                    .f64()?
                    .into_iter()
                    .map(|v| v.filter(|x| !x.is_nan()))
                    .collect();
                Ok(VariableValues::Numeric(values))
            }
            VariableKind::Categorical => {
                let string_col = col.cast(&DataType::String)?;
                let values = string_col
                    .str()?
                    .into_iter()
                    .map(|v| v.map(|s| s.to_string()))
                    .collect();
                Ok(VariableValues::Categorical(values))
            }
        }
    }

    pub fn kind(&self) -> VariableKind {
        match self {
            VariableValues::Numeric(_) | VariableValues::Integer(_) => VariableKind::Numeric,
            VariableValues::Categorical(_) => VariableKind::Categorical,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            VariableValues::Numeric(v) => v.len(),
            VariableValues::Integer(v) => v.len(),
            VariableValues::Categorical(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of missing entries
    pub fn missing_count(&self) -> usize {
        match self {
            VariableValues::Numeric(v) => v.iter().filter(|x| x.is_none()).count(),
            VariableValues::Integer(v) => v.iter().filter(|x| x.is_none()).count(),
            VariableValues::Categorical(v) => v.iter().filter(|x| x.is_none()).count(),
        }
    }

    /// Raw value of row `i` as a float, for numeric variables
    pub fn value_at(&self, i: usize) -> Option<f64> {
        match self {
            VariableValues::Numeric(v) => v[i],
            VariableValues::Integer(v) => v[i].map(|x| x as f64),
            VariableValues::Categorical(_) => None,
        }
    }
}

fn fits_i64(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
    )
}

/// Key identifying the bin a row falls into
#[derive(Debug, Clone)]
pub enum BinKey {
    /// Raw value of a low-cardinality numeric variable
    Value(f64),
    /// Raw value of a low-cardinality integer variable
    Integer(i64),
    /// Index of a rank-quantile bucket
    Decile(usize),
    /// Level of a categorical variable
    Category(String),
    /// Missing value kept as its own bin
    Missing,
}

impl BinKey {
    fn variant_order(&self) -> u8 {
        match self {
            BinKey::Value(_) => 0,
            BinKey::Integer(_) => 1,
            BinKey::Decile(_) => 2,
            BinKey::Category(_) => 3,
            BinKey::Missing => 4,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, BinKey::Missing)
    }
}

impl Ord for BinKey {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (BinKey::Value(a), BinKey::Value(b)) => a.total_cmp(b),
            (BinKey::Integer(a), BinKey::Integer(b)) => a.cmp(b),
            (BinKey::Decile(a), BinKey::Decile(b)) => a.cmp(b),
            (BinKey::Category(a), BinKey::Category(b)) => a.cmp(b),
            _ => self.variant_order().cmp(&other.variant_order()),
        }
    }
}

impl PartialOrd for BinKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for BinKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for BinKey {}

impl fmt::Display for BinKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BinKey::Value(v) => write!(f, "{}", format_value(*v)),
            BinKey::Integer(v) => write!(f, "{}", v),
            BinKey::Decile(i) => write!(f, "{}", i),
            BinKey::Category(c) => write!(f, "{}", c),
            BinKey::Missing => write!(f, "{}", MISSING_LABEL),
        }
    }
}

impl Serialize for BinKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            BinKey::Value(v) => serializer.serialize_f64(*v),
            BinKey::Integer(v) => serializer.serialize_i64(*v),
            BinKey::Decile(i) => serializer.serialize_u64(*i as u64),
            BinKey::Category(c) => serializer.serialize_str(c),
            BinKey::Missing => serializer.serialize_str(MISSING_LABEL),
        }
    }
}

/// Render a float the way tabular tools print it: whole numbers keep one
/// decimal place (`3.0`), everything else uses the shortest representation.
pub fn format_value(value: f64) -> String {
    if value.is_nan() {
        "nan".to_string()
    } else if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e16 {
        format!("{:.1}", value)
    } else {
        format!("{}", value)
    }
}

/// Assign a bin key to every row.
///
/// Missing values get `BinKey::Missing` when `fill_na` is set and `None`
/// otherwise, which drops the row from grouping. With `fill_na`, a literal
/// "Missing" category shares the missing bin.
pub fn assign_bin_keys(values: &VariableValues, bins: usize, fill_na: bool) -> Vec<Option<BinKey>> {
    let keys: Vec<Option<BinKey>> = match values {
        VariableValues::Numeric(raw) => {
            let raw: Vec<Option<f64>> = raw.iter().map(|v| v.map(normalize_zero)).collect();
            numeric_keys(&raw, bins, f64::total_cmp, BinKey::Value)
        }
        VariableValues::Integer(raw) => numeric_keys(raw, bins, Ord::cmp, BinKey::Integer),
        VariableValues::Categorical(raw) => raw
            .iter()
            .map(|v| match v {
                Some(level) if fill_na && level == MISSING_LABEL => Some(BinKey::Missing),
                other => other.clone().map(BinKey::Category),
            })
            .collect(),
    };

    keys.into_iter()
        .map(|key| match key {
            None if fill_na => Some(BinKey::Missing),
            other => other,
        })
        .collect()
}

/// Raw-value keys below `bins` distinct values, rank-quantile buckets otherwise
fn numeric_keys<T, C, K>(raw: &[Option<T>], bins: usize, cmp: C, to_key: K) -> Vec<Option<BinKey>>
where
    T: Copy,
    C: Fn(&T, &T) -> Ordering + Copy,
    K: Fn(T) -> BinKey,
{
    if distinct_count_by(raw, cmp) < bins {
        raw.iter().map(|v| v.map(&to_key)).collect()
    } else {
        rank_quantile_keys(raw, bins, cmp)
    }
}

/// Count distinct values; all missing entries together count as one value.
pub fn distinct_count(values: &[Option<f64>]) -> usize {
    let normalized: Vec<Option<f64>> = values.iter().map(|v| v.map(normalize_zero)).collect();
    distinct_count_by(&normalized, f64::total_cmp)
}

fn distinct_count_by<T: Copy>(values: &[Option<T>], cmp: impl Fn(&T, &T) -> Ordering) -> usize {
    let mut present: Vec<T> = values.iter().flatten().copied().collect();
    present.sort_by(&cmp);
    present.dedup_by(|a, b| cmp(a, b) == Ordering::Equal);

    let has_missing = values.iter().any(|v| v.is_none());
    present.len() + usize::from(has_missing)
}

// -0.0 and 0.0 must land in the same bin
fn normalize_zero(value: f64) -> f64 {
    value + 0.0
}

fn rank_quantile_keys<T: Copy>(
    raw: &[Option<T>],
    bins: usize,
    cmp: impl Fn(&T, &T) -> Ordering,
) -> Vec<Option<BinKey>> {
    let present: Vec<T> = raw.iter().flatten().copied().collect();
    let ranks = rank_average_by(&present, cmp);

    let mut sorted_ranks = ranks.clone();
    sorted_ranks.sort_by(f64::total_cmp);
    let edges = quantile_edges(&sorted_ranks, bins);

    let mut rank_iter = ranks.into_iter();
    raw.iter()
        .map(|v| {
            v.and_then(|_| rank_iter.next())
                .map(|rank| BinKey::Decile(quantile_bucket(rank, &edges)))
        })
        .collect()
}

/// Rank values 1..=N, giving tied values the average of the ranks they span.
pub fn rank_average(values: &[f64]) -> Vec<f64> {
    rank_average_by(values, f64::total_cmp)
}

fn rank_average_by<T>(values: &[T], cmp: impl Fn(&T, &T) -> Ordering) -> Vec<f64> {
    let n = values.len();
    if n == 0 {
        return vec![];
    }

    let mut indices: Vec<usize> = (0..n).collect();
    indices.sort_by(|&a, &b| cmp(&values[a], &values[b]));

    let mut ranks = vec![0.0_f64; n];
    let mut i = 0;
    while i < n {
        let mut j = i + 1;
        while j < n && cmp(&values[indices[j]], &values[indices[i]]) == Ordering::Equal {
            j += 1;
        }

        // Ranks i+1..=j share their mean
        let avg_rank = (i + 1 + j) as f64 / 2.0;
        for &idx in &indices[i..j] {
            ranks[idx] = avg_rank;
        }
        i = j;
    }

    ranks
}

/// Quantile cut points at probabilities `k / bins` for `k = 0..=bins`.
///
/// Uses linear interpolation between order statistics. Repeated cut points
/// are collapsed, so fewer than `bins + 1` edges may come back.
pub fn quantile_edges(sorted: &[f64], bins: usize) -> Vec<f64> {
    let n = sorted.len();
    if n == 0 || bins == 0 {
        return vec![];
    }

    let mut edges: Vec<f64> = (0..=bins)
        .map(|k| {
            let pos = (k as f64 / bins as f64) * (n - 1) as f64;
            let lo = pos.floor() as usize;
            let hi = (pos.ceil() as usize).min(n - 1);
            sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
        })
        .collect();
    edges.dedup();
    edges
}

/// Bucket index of `x` given ascending cut points.
///
/// Buckets are right-closed `(e_i, e_{i+1}]` and the first one also holds
/// the lowest edge. With fewer than two edges everything lands in bucket 0.
pub fn quantile_bucket(x: f64, edges: &[f64]) -> usize {
    if edges.len() < 2 {
        return 0;
    }
    edges[1..].partition_point(|&e| e < x).min(edges.len() - 2)
}
