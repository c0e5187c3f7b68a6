use std::collections::BTreeSet;

use super::model::{Dataset, Dimension, FilterValue, Record};

// ---------------------------------------------------------------------------
// Filter selection: which values are accepted per dimension
// ---------------------------------------------------------------------------

/// Accepted values for each filterable dimension.
///
/// A record passes when its value is in every set. An empty set accepts
/// nothing, so `FilterSelection::default()` filters out every row; use
/// [`FilterSelection::all`] for the "everything selected" starting point.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSelection {
    pub years: BTreeSet<FilterValue>,
    pub seniority: BTreeSet<FilterValue>,
    pub contract_types: BTreeSet<FilterValue>,
    pub company_sizes: BTreeSet<FilterValue>,
}

impl FilterSelection {
    /// Select every distinct value present in the dataset.
    pub fn all(dataset: &Dataset) -> Self {
        let mut selection = FilterSelection::default();
        for dim in Dimension::ALL {
            selection.select_all(dim, dataset);
        }
        selection
    }

    pub fn selected(&self, dim: Dimension) -> &BTreeSet<FilterValue> {
        match dim {
            Dimension::WorkYear => &self.years,
            Dimension::Seniority => &self.seniority,
            Dimension::EmploymentType => &self.contract_types,
            Dimension::CompanySize => &self.company_sizes,
        }
    }

    fn selected_mut(&mut self, dim: Dimension) -> &mut BTreeSet<FilterValue> {
        match dim {
            Dimension::WorkYear => &mut self.years,
            Dimension::Seniority => &mut self.seniority,
            Dimension::EmploymentType => &mut self.contract_types,
            Dimension::CompanySize => &mut self.company_sizes,
        }
    }

    /// Flip a single value in or out of a dimension's selection.
    pub fn toggle(&mut self, dim: Dimension, value: &FilterValue) {
        let selected = self.selected_mut(dim);
        if !selected.remove(value) {
            selected.insert(value.clone());
        }
    }

    pub fn select_all(&mut self, dim: Dimension, dataset: &Dataset) {
        *self.selected_mut(dim) = dataset.distinct_values(dim).clone();
    }

    pub fn select_none(&mut self, dim: Dimension) {
        self.selected_mut(dim).clear();
    }

    /// Replace a dimension's selection wholesale.
    pub fn set(&mut self, dim: Dimension, values: impl IntoIterator<Item = FilterValue>) {
        *self.selected_mut(dim) = values.into_iter().collect();
    }

    /// Conjunction of the four membership predicates.
    pub fn matches(&self, record: &Record) -> bool {
        Dimension::ALL
            .iter()
            .all(|&dim| self.selected(dim).contains(&dim.value_of(record)))
    }
}

/// Return indices of records that pass the selection, in dataset order.
pub fn filtered_indices(dataset: &Dataset, selection: &FilterSelection) -> Vec<usize> {
    dataset
        .records()
        .iter()
        .enumerate()
        .filter(|(_, record)| selection.matches(record))
        .map(|(i, _)| i)
        .collect()
}

/// Return the records that pass the selection, in dataset order.
pub fn filter<'a>(dataset: &'a Dataset, selection: &FilterSelection) -> Vec<&'a Record> {
    dataset
        .records()
        .iter()
        .filter(|record| selection.matches(record))
        .collect()
}
