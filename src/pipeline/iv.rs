//! Information Value (IV) ranking across all variables of a dataset
//!
//! Every column except the target and any excluded names is a candidate.
//! Candidates with too many missing values are skipped and recorded; the rest
//! are binned, their per-bin WoE contributions summed into one IV, and the
//! variables ranked by IV descending.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

use indicatif::ProgressBar;
use polars::prelude::*;
use serde::ser::{SerializeMap, SerializeStruct};
use serde::{Serialize, Serializer};

use super::binning::{format_value, BinKey, VariableKind, VariableValues, MISSING_LABEL};
use super::error::{require_column, AnalysisError, AnalysisResult};
use super::missing::{analyze_missing_values, partition_by_missing, DEFAULT_MISSING_THRESHOLD};
use super::target::{target_values, TargetMapping};
use super::woe::{build_woe_table, validate_bins, WoeBin, WoeTable, DEFAULT_BINS};
use crate::utils::{create_progress_bar, finish_with_success};

/// Options for the multi-variable IV computation
#[derive(Debug, Clone)]
pub struct IvOptions {
    /// Number of rank-quantile bins for numeric variables
    pub bins: usize,
    /// Keep missing values as a "Missing" bin instead of dropping them
    pub fill_na: bool,
    /// Columns to leave out of the analysis
    pub rm_cols: Vec<String>,
    /// Return the per-variable WoE tables along with the summary
    pub woe_table: bool,
    /// Missing-value percentage (0-100) at which a variable is skipped
    pub missing_threshold: f64,
    /// Optional mapping for non-binary target columns
    pub target_mapping: Option<TargetMapping>,
    /// Show a progress bar naming the variable being processed
    pub show_progress: bool,
}

impl Default for IvOptions {
    fn default() -> Self {
        Self {
            bins: DEFAULT_BINS,
            fill_na: true,
            rm_cols: Vec::new(),
            woe_table: false,
            missing_threshold: DEFAULT_MISSING_THRESHOLD,
            target_mapping: None,
            show_progress: false,
        }
    }
}

/// Conventional interpretation bands for Information Value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum IvStrength {
    Useless,
    Weak,
    Medium,
    Strong,
    Suspicious,
    Undefined,
}

impl IvStrength {
    pub fn from_iv(iv: f64) -> Self {
        if iv.is_nan() {
            IvStrength::Undefined
        } else if iv < 0.02 {
            IvStrength::Useless
        } else if iv < 0.1 {
            IvStrength::Weak
        } else if iv < 0.3 {
            IvStrength::Medium
        } else if iv < 0.5 {
            IvStrength::Strong
        } else {
            IvStrength::Suspicious
        }
    }
}

impl fmt::Display for IvStrength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            IvStrength::Useless => "useless",
            IvStrength::Weak => "weak",
            IvStrength::Medium => "medium",
            IvStrength::Strong => "strong",
            IvStrength::Suspicious => "suspicious",
            IvStrength::Undefined => "undefined",
        };
        write!(f, "{}", label)
    }
}

/// One row of the IV summary
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IvRecord {
    #[serde(rename = "Var")]
    pub var: String,
    #[serde(rename = "IV")]
    pub iv: f64,
}

impl IvRecord {
    pub fn strength(&self) -> IvStrength {
        IvStrength::from_iv(self.iv)
    }
}

/// Variables ranked by IV descending (NaN last)
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct IvSummary {
    pub rows: Vec<IvRecord>,
}

impl IvSummary {
    /// Build a summary from records in any order
    pub fn from_records(mut rows: Vec<IvRecord>) -> Self {
        rows.sort_by(|a, b| iv_descending(a.iv, b.iv));
        Self { rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &IvRecord> {
        self.rows.iter()
    }

    /// IV of a variable, if it was processed
    pub fn get(&self, var: &str) -> Option<f64> {
        self.rows.iter().find(|r| r.var == var).map(|r| r.iv)
    }

    /// Variable names in rank order
    pub fn names(&self) -> Vec<&str> {
        self.rows.iter().map(|r| r.var.as_str()).collect()
    }
}

fn iv_descending(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => b.total_cmp(&a),
    }
}

/// One bin of a per-variable IV table
///
/// Serialized as part of an `IvTable`, with the label stored under the
/// table's key column.
#[derive(Debug, Clone)]
pub struct IvRow {
    /// `"{min}-{max}"` range for numeric variables, the category otherwise
    pub label: String,
    pub mean_value: Option<f64>,
    pub cnt_resp: u64,
    pub cnt_non_resp: u64,
    pub pct_resp: f64,
    pub pct_non_resp: f64,
    pub woe: f64,
    pub iv: f64,
}

/// Per-variable table reported by the IV driver
#[derive(Debug, Clone)]
pub struct IvTable {
    pub variable: String,
    pub kind: VariableKind,
    pub rows: Vec<IvRow>,
}

impl IvTable {
    /// Turn a WoE table computed with value statistics into its reported form
    pub fn from_woe_table(table: &WoeTable) -> Self {
        let rows = table
            .bins
            .iter()
            .map(|bin| IvRow {
                label: match table.kind {
                    VariableKind::Numeric => range_label(bin),
                    VariableKind::Categorical => bin.key.to_string(),
                },
                mean_value: bin.values.map(|v| v.mean),
                cnt_resp: bin.cnt_resp,
                cnt_non_resp: bin.cnt_non_resp,
                pct_resp: bin.pct_resp,
                pct_non_resp: bin.pct_non_resp,
                woe: bin.woe,
                iv: bin.iv_contribution(),
            })
            .collect();

        Self {
            variable: table.variable.clone(),
            kind: table.kind,
            rows,
        }
    }

    /// Header of the label column: "Range" for numeric variables, the
    /// variable name for categorical ones.
    pub fn key_column(&self) -> &str {
        match self.kind {
            VariableKind::Numeric => "Range",
            VariableKind::Categorical => &self.variable,
        }
    }

    pub fn iv(&self) -> f64 {
        self.rows.iter().map(|r| r.iv).sum()
    }

    /// Find the row with the given label
    pub fn row(&self, label: &str) -> Option<&IvRow> {
        self.rows.iter().find(|r| r.label == label)
    }
}

impl Serialize for IvTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let rows: Vec<KeyedRow> = self
            .rows
            .iter()
            .map(|row| KeyedRow {
                key_column: self.key_column(),
                row,
            })
            .collect();

        let mut state = serializer.serialize_struct("IvTable", 3)?;
        state.serialize_field("variable", &self.variable)?;
        state.serialize_field("kind", &self.kind)?;
        state.serialize_field("rows", &rows)?;
        state.end()
    }
}

/// A row whose label field is named after the table's key column
struct KeyedRow<'a> {
    key_column: &'a str,
    row: &'a IvRow,
}

impl Serialize for KeyedRow<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let row = self.row;
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry(self.key_column, &row.label)?;
        if let Some(mean) = row.mean_value {
            map.serialize_entry("Mean_Value", &mean)?;
        }
        map.serialize_entry("cnt_resp", &row.cnt_resp)?;
        map.serialize_entry("cnt_non_resp", &row.cnt_non_resp)?;
        map.serialize_entry("pct_resp", &row.pct_resp)?;
        map.serialize_entry("pct_non_resp", &row.pct_non_resp)?;
        map.serialize_entry("WOE", &row.woe)?;
        map.serialize_entry("IV", &row.iv)?;
        map.end()
    }
}

fn range_label(bin: &WoeBin) -> String {
    match (&bin.key, bin.values) {
        (BinKey::Missing, _) => MISSING_LABEL.to_string(),
        (BinKey::Integer(v), _) => format!("{}-{}", v, v),
        (_, Some(stats)) => format!("{}-{}", format_value(stats.min), format_value(stats.max)),
        (key, None) => key.to_string(),
    }
}

/// Result of the multi-variable IV computation
#[derive(Debug, Clone, Serialize)]
pub struct IvReport {
    /// Processed variables ranked by IV
    pub summary: IvSummary,
    /// Variables skipped for missing values, with their missing percentage
    pub skipped: BTreeMap<String, f64>,
    /// Per-variable tables, present only when requested
    #[serde(skip_serializing_if = "Option::is_none")]
    pub woe_tables: Option<BTreeMap<String, IvTable>>,
}

/// Compute the IV of every eligible variable and rank them.
///
/// # Arguments
/// * `df` - Dataset holding the target and the candidate variables
/// * `target` - Name of the binary target column
/// * `options` - Binning, exclusion and reporting options
///
/// # Returns
/// The ranked summary, the skipped-variable record and, when
/// `options.woe_table` is set, the per-variable tables.
pub fn compute_iv(df: &DataFrame, target: &str, options: &IvOptions) -> AnalysisResult<IvReport> {
    validate_bins(options.bins)?;
    if df.height() == 0 {
        return Err(AnalysisError::EmptyDataset);
    }

    let targets = target_values(df, target, options.target_mapping.as_ref())?;
    let candidates = eligible_variables(df, target, &options.rm_cols)?;

    let missing_pcts = analyze_missing_values(df, &candidates)?;
    let (kept, skipped) = partition_by_missing(&missing_pcts, options.missing_threshold);

    let pb = if options.show_progress {
        create_progress_bar(kept.len() as u64, "Calculating IV")
    } else {
        ProgressBar::hidden()
    };

    let mut records = Vec::with_capacity(kept.len());
    let mut tables = BTreeMap::new();

    for name in kept {
        pb.set_message(format!("Variable being processed is {}", name));

        // Binning state lives only for this variable
        let values = VariableValues::from_column(require_column(df, &name)?)?;
        let woe_table = build_woe_table(&name, &values, &targets, options.bins, options.fill_na, true);
        let iv_table = IvTable::from_woe_table(&woe_table);

        records.push(IvRecord {
            var: name.clone(),
            iv: iv_table.iv(),
        });
        if options.woe_table {
            tables.insert(name, iv_table);
        }

        pb.inc(1);
    }

    finish_with_success(
        &pb,
        &format!("Analyzed {} variables ({} skipped)", records.len(), skipped.len()),
    );

    Ok(IvReport {
        summary: IvSummary::from_records(records),
        skipped,
        woe_tables: options.woe_table.then_some(tables),
    })
}

/// All columns except the target and the excluded ones, in dataset order
fn eligible_variables(df: &DataFrame, target: &str, rm_cols: &[String]) -> AnalysisResult<Vec<String>> {
    let names: Vec<String> = df.get_column_names().iter().map(|s| s.to_string()).collect();

    if let Some(unknown) = rm_cols.iter().find(|c| !names.contains(c)) {
        return Err(AnalysisError::UnknownColumn(unknown.clone()));
    }

    Ok(names
        .into_iter()
        .filter(|name| name != target && !rm_cols.contains(name))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_iv_strength_bands() {
        assert_eq!(IvStrength::from_iv(0.01), IvStrength::Useless);
        assert_eq!(IvStrength::from_iv(0.05), IvStrength::Weak);
        assert_eq!(IvStrength::from_iv(0.2), IvStrength::Medium);
        assert_eq!(IvStrength::from_iv(0.4), IvStrength::Strong);
        assert_eq!(IvStrength::from_iv(0.8), IvStrength::Suspicious);
        assert_eq!(IvStrength::from_iv(f64::INFINITY), IvStrength::Suspicious);
        assert_eq!(IvStrength::from_iv(f64::NAN), IvStrength::Undefined);
        assert_eq!(IvStrength::Medium.to_string(), "medium");
    }

    #[test]
    fn test_summary_sorted_descending_nan_last() {
        let summary = IvSummary::from_records(vec![
            IvRecord { var: "a".into(), iv: 0.1 },
            IvRecord { var: "b".into(), iv: f64::NAN },
            IvRecord { var: "c".into(), iv: f64::INFINITY },
            IvRecord { var: "d".into(), iv: 0.5 },
        ]);

        assert_eq!(summary.names(), vec!["c", "d", "a", "b"]);
        assert_eq!(summary.get("a"), Some(0.1));
        assert_eq!(summary.get("zzz"), None);
    }

    #[test]
    fn test_eligible_variables_excludes_target_and_rm_cols() {
        let df = df! {
            "target" => [0i32, 1],
            "a" => [1.0f64, 2.0],
            "b" => [1.0f64, 2.0],
        }.unwrap();

        let vars = eligible_variables(&df, "target", &["b".to_string()]).unwrap();
        assert_eq!(vars, vec!["a".to_string()]);

        let err = eligible_variables(&df, "target", &["nope".to_string()]).unwrap_err();
        assert!(matches!(err, AnalysisError::UnknownColumn(ref c) if c == "nope"));
    }

    #[test]
    fn test_range_label_for_numeric_bins() {
        let values = VariableValues::Numeric(vec![Some(1.0), Some(2.5), Some(4.0), None]);
        let targets = vec![Some(1), Some(0), Some(1), Some(0)];

        let woe_table = build_woe_table("x", &values, &targets, 2, true, true);
        let iv_table = IvTable::from_woe_table(&woe_table);

        assert_eq!(iv_table.key_column(), "Range");
        let labels: Vec<&str> = iv_table.rows.iter().map(|r| r.label.as_str()).collect();
        assert_eq!(labels.last(), Some(&MISSING_LABEL));
        assert!(labels[0].starts_with("1.0-"));
        assert!(iv_table.rows.iter().all(|r| r.mean_value.is_some()));
    }

    #[test]
    fn test_categorical_table_keeps_category_labels() {
        let values = VariableValues::Categorical(vec![Some("x".to_string()), Some("y".to_string())]);
        let targets = vec![Some(1), Some(0)];

        let woe_table = build_woe_table("grade", &values, &targets, 10, true, true);
        let iv_table = IvTable::from_woe_table(&woe_table);

        assert_eq!(iv_table.key_column(), "grade");
        assert!(iv_table.row("x").is_some());
        assert!(iv_table.rows.iter().all(|r| r.mean_value.is_none()));
    }
}
