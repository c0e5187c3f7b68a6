use std::collections::HashMap;

use super::model::Record;

/// Headline figures for the metric cards.
///
/// `Default` is the empty-subset state: zeros and an empty position.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SummaryMetrics {
    pub avg_salary: f64,
    pub max_salary: f64,
    pub total_records: usize,
    pub most_common_position: String,
}

/// Compute the four summary statistics over a filtered subset.
pub fn compute_metrics(subset: &[&Record]) -> SummaryMetrics {
    if subset.is_empty() {
        return SummaryMetrics::default();
    }

    let total: f64 = subset.iter().map(|r| r.salary_in_usd).sum();
    let max_salary = subset
        .iter()
        .map(|r| r.salary_in_usd)
        .fold(f64::NEG_INFINITY, f64::max);

    SummaryMetrics {
        avg_salary: total / subset.len() as f64,
        max_salary,
        total_records: subset.len(),
        most_common_position: most_common(subset.iter().map(|r| r.job_title.as_str()))
            .unwrap_or_default()
            .to_string(),
    }
}

/// Most frequent value; ties go to the value encountered first.
pub fn most_common<'a>(values: impl Iterator<Item = &'a str>) -> Option<&'a str> {
    let mut order: Vec<&str> = Vec::new();
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for v in values {
        let count = counts.entry(v).or_insert(0);
        if *count == 0 {
            order.push(v);
        }
        *count += 1;
    }

    let mut best: Option<(&str, usize)> = None;
    for v in order {
        let count = counts[v];
        if best.map_or(true, |(_, c)| count > c) {
            best = Some((v, count));
        }
    }
    best.map(|(v, _)| v)
}
