//! Descriptive statistics over result table columns.
//!
//! Functions take borrowed slices or iterators; nothing here copies a table.
//! Undefined results (empty input, zero variance) come back as `None`.

use std::collections::HashMap;

use serde::Serialize;

use super::{GroupKey, ResultTable, Value};

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

pub fn min(values: &[f64]) -> Option<f64> {
    values.iter().copied().reduce(f64::min)
}

pub fn max(values: &[f64]) -> Option<f64> {
    values.iter().copied().reduce(f64::max)
}

/// Sample standard deviation (n - 1 denominator).
pub fn std_dev(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let m = mean(values)?;
    let ss: f64 = values.iter().map(|v| (v - m).powi(2)).sum();
    Some((ss / (values.len() - 1) as f64).sqrt())
}

fn sorted(values: &[f64]) -> Vec<f64> {
    let mut out = values.to_vec();
    out.sort_by(f64::total_cmp);
    out
}

fn quantile_sorted(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let pos = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
}

/// Quantile with linear interpolation between closest ranks.
pub fn quantile(values: &[f64], q: f64) -> Option<f64> {
    quantile_sorted(&sorted(values), q)
}

pub fn median(values: &[f64]) -> Option<f64> {
    quantile(values, 0.5)
}

/// Count, mean, spread and quartiles of one numeric column.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Describe {
    pub count: usize,
    pub mean: f64,
    pub std: Option<f64>,
    pub min: f64,
    pub q25: f64,
    pub median: f64,
    pub q75: f64,
    pub max: f64,
}

impl Describe {
    /// Row labels in display order, matching [`Describe::cells`].
    pub const LABELS: [&'static str; 8] = ["count", "mean", "std", "min", "25%", "50%", "75%", "max"];

    /// Values in [`Describe::LABELS`] order; `None` where undefined.
    pub fn cells(&self) -> [Option<f64>; 8] {
        [
            Some(self.count as f64),
            Some(self.mean),
            self.std,
            Some(self.min),
            Some(self.q25),
            Some(self.median),
            Some(self.q75),
            Some(self.max),
        ]
    }
}

/// `None` when there are no values.
pub fn describe(values: &[f64]) -> Option<Describe> {
    let s = sorted(values);
    Some(Describe {
        count: s.len(),
        mean: mean(&s)?,
        std: std_dev(&s),
        min: *s.first()?,
        q25: quantile_sorted(&s, 0.25)?,
        median: quantile_sorted(&s, 0.5)?,
        q75: quantile_sorted(&s, 0.75)?,
        max: *s.last()?,
    })
}

/// Pearson correlation between two numeric columns over rows where both are
/// present.
pub fn pearson(table: &ResultTable, a: usize, b: usize) -> Option<f64> {
    let pairs: Vec<(f64, f64)> = table
        .rows()
        .iter()
        .filter_map(|r| Some((r[a].as_f64()?, r[b].as_f64()?)))
        .collect();
    if pairs.len() < 2 {
        return None;
    }

    let n = pairs.len() as f64;
    let mx = pairs.iter().map(|p| p.0).sum::<f64>() / n;
    let my = pairs.iter().map(|p| p.1).sum::<f64>() / n;

    let (mut sxy, mut sxx, mut syy) = (0.0, 0.0, 0.0);
    for (x, y) in &pairs {
        sxy += (x - mx) * (y - my);
        sxx += (x - mx).powi(2);
        syy += (y - my).powi(2);
    }
    if sxx == 0.0 || syy == 0.0 {
        return None;
    }
    Some(sxy / (sxx * syy).sqrt())
}

/// Least-squares line `y = slope * x + intercept`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
}

impl LinearFit {
    pub fn at(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}

/// `None` for fewer than two points or no spread in x.
pub fn linear_fit(xs: &[f64], ys: &[f64]) -> Option<LinearFit> {
    let n = xs.len().min(ys.len());
    if n < 2 {
        return None;
    }
    let (xs, ys) = (&xs[..n], &ys[..n]);
    let mx = mean(xs)?;
    let my = mean(ys)?;

    let sxx: f64 = xs.iter().map(|x| (x - mx).powi(2)).sum();
    if sxx == 0.0 {
        return None;
    }
    let sxy: f64 = xs.iter().zip(ys).map(|(x, y)| (x - mx) * (y - my)).sum();

    let slope = sxy / sxx;
    Some(LinearFit {
        slope,
        intercept: my - slope * mx,
    })
}

/// Distinct non-null values.
pub fn nunique<'a>(values: impl IntoIterator<Item = &'a Value>) -> usize {
    values
        .into_iter()
        .filter_map(Value::group_key)
        .collect::<std::collections::HashSet<_>>()
        .len()
}

/// Most frequent non-null value. Ties go to the smallest value.
pub fn mode<'a>(values: impl IntoIterator<Item = &'a Value>) -> Option<Value> {
    let mut counts: HashMap<GroupKey, usize> = HashMap::new();
    for key in values.into_iter().filter_map(Value::group_key) {
        *counts.entry(key).or_default() += 1;
    }

    let top = counts.values().copied().max()?;
    counts
        .into_iter()
        .filter(|(_, c)| *c == top)
        .map(|(k, _)| Value::from(k))
        .min_by(|a, b| a.sort_cmp(b))
}

/// Sum `value_col` per distinct `label_col`, in order of first appearance.
///
/// Rows with a null label are dropped. Null values count as zero.
pub fn group_sum(table: &ResultTable, label_col: usize, value_col: usize) -> Vec<(Value, f64)> {
    let mut order: Vec<GroupKey> = Vec::new();
    let mut sums: HashMap<GroupKey, f64> = HashMap::new();

    for row in table.rows() {
        let Some(key) = row[label_col].group_key() else {
            continue;
        };
        let amount = row[value_col].as_f64().unwrap_or(0.0);
        match sums.get_mut(&key) {
            Some(total) => *total += amount,
            None => {
                sums.insert(key.clone(), amount);
                order.push(key);
            }
        }
    }

    order
        .into_iter()
        .map(|key| {
            let total = sums.get(&key).copied().unwrap_or(0.0);
            (Value::from(key), total)
        })
        .collect()
}

/// Indices from `rows` grouped by their value in `col`, groups in order of
/// first appearance and members in the order given. Null values form no
/// group.
pub fn group_rows(
    table: &ResultTable,
    col: usize,
    rows: impl IntoIterator<Item = usize>,
) -> Vec<(Value, Vec<usize>)> {
    let mut groups: Vec<(Value, Vec<usize>)> = Vec::new();
    let mut index: HashMap<GroupKey, usize> = HashMap::new();

    for i in rows {
        let v = &table.rows()[i][col];
        let Some(key) = v.group_key() else {
            continue;
        };
        match index.get(&key) {
            Some(&g) => groups[g].1.push(i),
            None => {
                index.insert(key, groups.len());
                groups.push((v.clone(), vec![i]));
            }
        }
    }

    groups
}
