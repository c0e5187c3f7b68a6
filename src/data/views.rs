//! Chart-ready aggregations over the filtered subset.
//!
//! Every view returns `None` for an empty subset so the shell can show its
//! "no data" state instead of a chart computed over zero rows.

use std::collections::{BTreeMap, HashMap};

use super::model::{Record, RemoteRatio};

// ---------------------------------------------------------------------------
// Top positions: highest mean salary per job title
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct PositionSalary {
    pub job_title: String,
    pub avg_salary: f64,
}

/// The `limit` job titles with the highest mean salary, ascending by mean.
///
/// Ties in the mean keep first-encountered order, both when choosing which
/// titles make the cut and in the output.
pub fn top_positions(subset: &[&Record], limit: usize) -> Option<Vec<PositionSalary>> {
    if subset.is_empty() {
        return None;
    }

    let mut groups = GroupedMean::default();
    for r in subset {
        groups.add(&r.job_title, r.salary_in_usd);
    }

    let mut ranked: Vec<PositionSalary> = groups
        .into_means()
        .into_iter()
        .map(|(job_title, avg_salary)| PositionSalary { job_title, avg_salary })
        .collect();

    // Stable sorts keep first-encountered order among equal means.
    ranked.sort_by(|a, b| b.avg_salary.total_cmp(&a.avg_salary));
    ranked.truncate(limit);
    ranked.sort_by(|a, b| a.avg_salary.total_cmp(&b.avg_salary));
    Some(ranked)
}

/// Running sums per key, remembering first-encounter order.
#[derive(Default)]
struct GroupedMean {
    order: Vec<String>,
    sums: HashMap<String, (f64, usize)>,
}

impl GroupedMean {
    fn add(&mut self, key: &str, value: f64) {
        match self.sums.get_mut(key) {
            Some((sum, n)) => {
                *sum += value;
                *n += 1;
            }
            None => {
                self.order.push(key.to_string());
                self.sums.insert(key.to_string(), (value, 1));
            }
        }
    }

    fn into_means(mut self) -> Vec<(String, f64)> {
        self.order
            .into_iter()
            .filter_map(|key| {
                let (sum, n) = self.sums.remove(&key)?;
                Some((key, sum / n as f64))
            })
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Salary distribution: equal-width histogram
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct HistogramBin {
    pub start: f64,
    pub end: f64,
    pub count: usize,
}

impl HistogramBin {
    pub fn center(&self) -> f64 {
        (self.start + self.end) / 2.0
    }

    pub fn width(&self) -> f64 {
        self.end - self.start
    }
}

/// Split the observed `[min, max]` salary range into `bins` equal-width bins.
///
/// Bins are half-open except the last, which also holds `max`. When every
/// salary is identical the range has no width and a single bin is returned.
pub fn salary_histogram(subset: &[&Record], bins: usize) -> Option<Vec<HistogramBin>> {
    if subset.is_empty() || bins == 0 {
        return None;
    }

    let (min, max) = subset.iter().map(|r| r.salary_in_usd).fold(
        (f64::INFINITY, f64::NEG_INFINITY),
        |(lo, hi), v| (lo.min(v), hi.max(v)),
    );

    if max <= min {
        return Some(vec![HistogramBin {
            start: min,
            end: max,
            count: subset.len(),
        }]);
    }

    let width = (max - min) / bins as f64;
    let edge = |i: usize| if i == bins { max } else { min + width * i as f64 };

    let mut counts = vec![0usize; bins];
    for r in subset {
        let v = r.salary_in_usd;
        // Division and the edge formula can round apart; the edges decide.
        let mut idx = (((v - min) / width) as usize).min(bins - 1);
        if idx > 0 && v < edge(idx) {
            idx -= 1;
        } else if idx + 1 < bins && v >= edge(idx + 1) {
            idx += 1;
        }
        counts[idx] += 1;
    }

    Some(
        counts
            .into_iter()
            .enumerate()
            .map(|(i, count)| HistogramBin {
                start: edge(i),
                end: edge(i + 1),
                count,
            })
            .collect(),
    )
}

// ---------------------------------------------------------------------------
// Remote ratio breakdown
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct RemoteShare {
    pub remote_ratio: RemoteRatio,
    pub quantity: usize,
}

/// Row count per remote-work category, largest first.
pub fn remote_ratio_breakdown(subset: &[&Record]) -> Option<Vec<RemoteShare>> {
    if subset.is_empty() {
        return None;
    }

    let mut shares: Vec<RemoteShare> = Vec::new();
    for r in subset {
        match shares.iter_mut().find(|s| s.remote_ratio == r.remote_ratio) {
            Some(share) => share.quantity += 1,
            None => shares.push(RemoteShare {
                remote_ratio: r.remote_ratio.clone(),
                quantity: 1,
            }),
        }
    }
    shares.sort_by(|a, b| b.quantity.cmp(&a.quantity));
    Some(shares)
}

// ---------------------------------------------------------------------------
// Country salary map for one job title
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct CountrySalary {
    pub employee_residence_iso3: String,
    pub avg_salary: f64,
}

/// Mean salary per residence country among rows whose title is exactly
/// `job_title`, ordered by country code.
///
/// A non-empty subset with no matching rows yields `Some(vec![])`.
pub fn country_salaries(subset: &[&Record], job_title: &str) -> Option<Vec<CountrySalary>> {
    if subset.is_empty() {
        return None;
    }

    let mut by_country: BTreeMap<&str, (f64, usize)> = BTreeMap::new();
    for r in subset.iter().filter(|r| r.job_title == job_title) {
        let entry = by_country
            .entry(r.employee_residence_iso3.as_str())
            .or_insert((0.0, 0));
        entry.0 += r.salary_in_usd;
        entry.1 += 1;
    }

    Some(
        by_country
            .into_iter()
            .map(|(iso3, (sum, n))| CountrySalary {
                employee_residence_iso3: iso3.to_string(),
                avg_salary: sum / n as f64,
            })
            .collect(),
    )
}
