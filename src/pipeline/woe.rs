//! Weight of Evidence (WoE) tables
//!
//! Rows are grouped by bin key, each bin's response and non-response counts
//! are normalized by the variable-wide totals, and the WoE of a bin is
//! `ln(pct_resp / pct_non_resp)`.

use polars::prelude::*;
use serde::Serialize;

use super::binning::{assign_bin_keys, BinKey, VariableKind, VariableValues};
use super::error::{require_column, AnalysisError, AnalysisResult};
use super::group::group_by;
use super::target::{target_values, TargetMapping};

/// Default number of bins for numeric variables
pub const DEFAULT_BINS: usize = 10;

/// Options for single-variable WoE computation
#[derive(Debug, Clone)]
pub struct WoeOptions {
    /// Number of rank-quantile bins for numeric variables
    pub bins: usize,
    /// Keep missing values as a "Missing" bin instead of dropping them
    pub fill_na: bool,
    /// Optional mapping for non-binary target columns
    pub target_mapping: Option<TargetMapping>,
}

impl Default for WoeOptions {
    fn default() -> Self {
        Self {
            bins: DEFAULT_BINS,
            fill_na: true,
            target_mapping: None,
        }
    }
}

/// Min, max and mean of the raw values that fell into a numeric bin
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ValueStats {
    #[serde(rename = "Min_Value")]
    pub min: f64,
    #[serde(rename = "Max_Value")]
    pub max: f64,
    #[serde(rename = "Mean_Value")]
    pub mean: f64,
}

impl ValueStats {
    /// Summarize values; an empty input yields NaN for every statistic.
    fn from_values(values: impl Iterator<Item = f64>) -> Self {
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        let mut sum = 0.0;
        let mut count = 0usize;

        for v in values {
            min = min.min(v);
            max = max.max(v);
            sum += v;
            count += 1;
        }

        if count == 0 {
            return Self {
                min: f64::NAN,
                max: f64::NAN,
                mean: f64::NAN,
            };
        }

        Self {
            min,
            max,
            mean: sum / count as f64,
        }
    }
}

/// One bin of a WoE table
#[derive(Debug, Clone, Serialize)]
pub struct WoeBin {
    /// Bin key: raw value, rank-bucket index, category or "Missing"
    pub key: BinKey,
    /// Number of rows with target 1
    pub cnt_resp: u64,
    /// Number of rows with target 0
    pub cnt_non_resp: u64,
    /// Share of all responses that fall in this bin
    pub pct_resp: f64,
    /// Share of all non-responses that fall in this bin
    pub pct_non_resp: f64,
    #[serde(rename = "WOE")]
    pub woe: f64,
    /// Raw value summary (numeric variables on the IV path only)
    #[serde(flatten)]
    pub values: Option<ValueStats>,
}

impl WoeBin {
    /// Contribution of this bin to the variable's Information Value
    pub fn iv_contribution(&self) -> f64 {
        (self.pct_resp - self.pct_non_resp) * self.woe
    }
}

/// WoE table for one variable, bins ordered by key ascending
#[derive(Debug, Clone, Serialize)]
pub struct WoeTable {
    pub variable: String,
    pub kind: VariableKind,
    pub bins: Vec<WoeBin>,
}

impl WoeTable {
    pub fn len(&self) -> usize {
        self.bins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bins.is_empty()
    }

    pub fn total_resp(&self) -> u64 {
        self.bins.iter().map(|b| b.cnt_resp).sum()
    }

    pub fn total_non_resp(&self) -> u64 {
        self.bins.iter().map(|b| b.cnt_non_resp).sum()
    }

    /// Information Value: sum of the per-bin contributions. NaN and infinite
    /// contributions propagate.
    pub fn iv(&self) -> f64 {
        self.bins.iter().map(WoeBin::iv_contribution).sum()
    }

    /// Find the bin with the given key
    pub fn bin(&self, key: &BinKey) -> Option<&WoeBin> {
        self.bins.iter().find(|b| &b.key == key)
    }
}

/// Weight of Evidence of a bin.
///
/// `0` when the bin has no responses. A bin with responses but no
/// non-responses gives `+inf`, and NaN shares (a variable without any
/// responses or non-responses) give NaN.
pub fn weight_of_evidence(pct_resp: f64, pct_non_resp: f64) -> f64 {
    if pct_resp != 0.0 {
        (pct_resp / pct_non_resp).ln()
    } else {
        0.0
    }
}

/// Compute the WoE table of one variable against a binary target.
///
/// The dataset is only read; calling this twice with the same inputs gives
/// identical tables.
pub fn compute_woe(df: &DataFrame, target: &str, variable: &str, options: &WoeOptions) -> AnalysisResult<WoeTable> {
    validate_bins(options.bins)?;
    if df.height() == 0 {
        return Err(AnalysisError::EmptyDataset);
    }

    let targets = target_values(df, target, options.target_mapping.as_ref())?;
    let values = VariableValues::from_column(require_column(df, variable)?)?;

    Ok(build_woe_table(variable, &values, &targets, options.bins, options.fill_na, false))
}

pub(crate) fn validate_bins(bins: usize) -> AnalysisResult<()> {
    if bins == 0 {
        return Err(AnalysisError::InvalidBins(bins));
    }
    Ok(())
}

/// One observation as seen by the grouping step
struct Row {
    key: Option<BinKey>,
    value: Option<f64>,
    target: Option<i32>,
}

/// Per-bin aggregate before normalization
struct BinCounts {
    cnt_resp: u64,
    cnt_non_resp: u64,
    values: Option<ValueStats>,
}

fn aggregate_bin(rows: &[Row], with_value_stats: bool) -> BinCounts {
    BinCounts {
        cnt_resp: rows.iter().filter(|r| r.target == Some(1)).count() as u64,
        cnt_non_resp: rows.iter().filter(|r| r.target == Some(0)).count() as u64,
        values: with_value_stats.then(|| ValueStats::from_values(rows.iter().filter_map(|r| r.value))),
    }
}

/// Bin a variable and build its WoE table.
///
/// `with_value_stats` adds min/max/mean of the raw values to each bin of a
/// numeric variable.
pub(crate) fn build_woe_table(
    variable: &str,
    values: &VariableValues,
    targets: &[Option<i32>],
    bins: usize,
    fill_na: bool,
    with_value_stats: bool,
) -> WoeTable {
    let kind = values.kind();
    let keys = assign_bin_keys(values, bins, fill_na);

    let rows = keys
        .into_iter()
        .zip(targets.iter())
        .enumerate()
        .map(|(i, (key, &target))| Row {
            key,
            value: values.value_at(i),
            target,
        });

    let with_stats = with_value_stats && kind == VariableKind::Numeric;
    let groups = group_by(rows, |row| row.key.clone(), |rows| aggregate_bin(rows, with_stats));

    let total_resp: u64 = groups.values().map(|c| c.cnt_resp).sum();
    let total_non_resp: u64 = groups.values().map(|c| c.cnt_non_resp).sum();

    let bins = groups
        .into_iter()
        .map(|(key, counts)| {
            // 0/0 is NaN when the variable has no responses (or no non-responses)
            let pct_resp = counts.cnt_resp as f64 / total_resp as f64;
            let pct_non_resp = counts.cnt_non_resp as f64 / total_non_resp as f64;
            WoeBin {
                key,
                cnt_resp: counts.cnt_resp,
                cnt_non_resp: counts.cnt_non_resp,
                pct_resp,
                pct_non_resp,
                woe: weight_of_evidence(pct_resp, pct_non_resp),
                values: counts.values,
            }
        })
        .collect();

    WoeTable {
        variable: variable.to_string(),
        kind,
        bins,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weight_of_evidence_zero_semantics() {
        assert_eq!(weight_of_evidence(0.0, 0.5), 0.0);
        assert_eq!(weight_of_evidence(0.0, 0.0), 0.0);
        assert_eq!(weight_of_evidence(0.5, 0.0), f64::INFINITY);
        assert!(weight_of_evidence(f64::NAN, 0.5).is_nan());
        assert!((weight_of_evidence(0.5, 0.25) - 2f64.ln()).abs() < 1e-12);
    }

    #[test]
    fn test_value_stats_empty_is_nan() {
        let stats = ValueStats::from_values(std::iter::empty());
        assert!(stats.min.is_nan() && stats.max.is_nan() && stats.mean.is_nan());

        let stats = ValueStats::from_values([1.0, 3.0, 2.0].into_iter());
        assert_eq!(stats, ValueStats { min: 1.0, max: 3.0, mean: 2.0 });
    }

    #[test]
    fn test_build_table_counts_and_shares() {
        let values = VariableValues::Categorical(vec![
            Some("A".to_string()),
            Some("B".to_string()),
            Some("A".to_string()),
            Some("B".to_string()),
        ]);
        let targets = vec![Some(1), Some(0), Some(0), Some(0)];

        let table = build_woe_table("v", &values, &targets, 10, true, false);

        assert_eq!(table.len(), 2);
        let a = &table.bins[0];
        assert_eq!(a.key, BinKey::Category("A".to_string()));
        assert_eq!((a.cnt_resp, a.cnt_non_resp), (1, 1));
        assert!((a.pct_resp - 1.0).abs() < 1e-12);
        assert!((a.pct_non_resp - 1.0 / 3.0).abs() < 1e-12);
        assert!((a.woe - 3f64.ln()).abs() < 1e-12);

        let b = &table.bins[1];
        assert_eq!(b.pct_resp, 0.0);
        assert_eq!(b.woe, 0.0);
    }

    #[test]
    fn test_value_stats_only_for_numeric_when_requested() {
        let values = VariableValues::Numeric(vec![Some(1.0), Some(2.0), Some(2.0), None]);
        let targets = vec![Some(1), Some(0), Some(1), Some(0)];

        let plain = build_woe_table("v", &values, &targets, 10, true, false);
        assert!(plain.bins.iter().all(|b| b.values.is_none()));

        let with_stats = build_woe_table("v", &values, &targets, 10, true, true);
        let two = with_stats.bin(&BinKey::Value(2.0)).unwrap();
        assert_eq!(two.values.unwrap().mean, 2.0);
        let missing = with_stats.bin(&BinKey::Missing).unwrap();
        assert!(missing.values.unwrap().mean.is_nan());
    }

    #[test]
    fn test_null_targets_count_nowhere() {
        let values = VariableValues::Categorical(vec![Some("A".to_string()), Some("A".to_string())]);
        let targets = vec![Some(1), None];

        let table = build_woe_table("v", &values, &targets, 10, true, false);
        assert_eq!(table.total_resp(), 1);
        assert_eq!(table.total_non_resp(), 0);
    }

    #[test]
    fn test_validate_bins() {
        assert!(matches!(validate_bins(0), Err(AnalysisError::InvalidBins(0))));
        assert!(validate_bins(1).is_ok());
    }
}
