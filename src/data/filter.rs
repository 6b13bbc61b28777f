use std::collections::{BTreeMap, BTreeSet};

use super::model::{Dimension, SurveyDataset};

// ---------------------------------------------------------------------------
// FilterSpec – which values are selected per dimension, plus the year range
// ---------------------------------------------------------------------------

/// Per-dimension selection state plus the year interval.
///
/// An empty selection set means "no constraint" (all values pass). The year
/// interval is always active; see [`year_sequence`] for how it expands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterSpec {
    selections: BTreeMap<Dimension, BTreeSet<String>>,
    year_range: (i32, i32),
}

impl FilterSpec {
    /// Default spec for a dataset: every dimension unconstrained except
    /// season (pre-selected to its full domain, as the dashboard starts with
    /// both seasons switched on), year interval covering the observed span.
    pub fn defaults(dataset: &SurveyDataset) -> Self {
        let mut selections: BTreeMap<Dimension, BTreeSet<String>> = Dimension::ALL
            .iter()
            .map(|&dim| (dim, BTreeSet::new()))
            .collect();
        selections.insert(Dimension::Season, dataset.domain(Dimension::Season).clone());

        FilterSpec {
            selections,
            year_range: dataset.year_span().unwrap_or((0, 0)),
        }
    }

    /// Selected values for a dimension.
    pub fn selection(&self, dim: Dimension) -> &BTreeSet<String> {
        static EMPTY: BTreeSet<String> = BTreeSet::new();
        self.selections.get(&dim).unwrap_or(&EMPTY)
    }

    /// Mutable selection set for a dimension.
    pub fn selection_mut(&mut self, dim: Dimension) -> &mut BTreeSet<String> {
        self.selections.entry(dim).or_default()
    }

    /// Replace a dimension's selection wholesale.
    pub fn set_selection(&mut self, dim: Dimension, values: BTreeSet<String>) {
        self.selections.insert(dim, values);
    }

    /// Inclusive endpoints as picked in the UI. The upper endpoint is
    /// excluded when the interval is expanded, see [`year_sequence`].
    pub fn year_range(&self) -> (i32, i32) {
        self.year_range
    }

    pub fn set_year_range(&mut self, start: i32, end: i32) {
        self.year_range = (start.min(end), start.max(end));
    }

    /// Clamp every selection to the dimension's observed domain and the year
    /// interval to the observed span. Called after a dataset reload so stale
    /// selections cannot linger.
    pub fn sanitize(&mut self, dataset: &SurveyDataset) {
        for (&dim, selected) in self.selections.iter_mut() {
            let domain = dataset.domain(dim);
            selected.retain(|v| domain.contains(v));
        }
        if let Some((lo, hi)) = dataset.year_span() {
            let (start, end) = self.year_range;
            self.year_range = (start.clamp(lo, hi), end.clamp(lo, hi));
        }
    }
}

// ---------------------------------------------------------------------------
// Year interval expansion
// ---------------------------------------------------------------------------

/// Expand the picked `(start, end)` endpoints into the discrete year set.
///
/// The upper endpoint is *excluded*: `(2010, 2012)` yields `[2010, 2011]`.
/// This reproduces the behavior of the production dashboard and is kept
/// intentionally; see DESIGN.md before changing it.
pub fn year_sequence(start: i32, end: i32) -> Vec<i32> {
    (start..end).collect()
}

// ---------------------------------------------------------------------------
// Filtering
// ---------------------------------------------------------------------------

/// Return indices of records that pass all active filters.
///
/// A record passes a dimension filter when:
/// * the selection set is empty → no constraint, passes
/// * the record's value is a member of the set → passes
/// * the record has no value for a constrained dimension → fails
///
/// The year filter keeps records whose year is in the expanded sequence;
/// records without a year are excluded. The dataset is never mutated.
pub fn filter_records(dataset: &SurveyDataset, spec: &FilterSpec) -> Vec<usize> {
    let (start, end) = spec.year_range();
    let years: BTreeSet<i32> = year_sequence(start, end).into_iter().collect();

    dataset
        .records
        .iter()
        .enumerate()
        .filter(|(_, rec)| {
            for dim in Dimension::ALL {
                let selected = spec.selection(dim);
                if selected.is_empty() {
                    continue;
                }
                match rec.value(dim) {
                    Some(val) if selected.contains(val) => {}
                    _ => return false,
                }
            }
            matches!(rec.year, Some(y) if years.contains(&y))
        })
        .map(|(i, _)| i)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::SurveyRecord;

    fn rec(bioregion: &str, season: &str, year: i32) -> SurveyRecord {
        SurveyRecord {
            bioregion: Some(bioregion.to_string()),
            season: Some(season.to_string()),
            year: Some(year),
            biomass: 1.0,
            ..Default::default()
        }
    }

    fn dataset() -> SurveyDataset {
        SurveyDataset::from_records(vec![
            rec("Norte", "Fría", 2010),
            rec("Norte", "Caliente", 2011),
            rec("Sur", "Fría", 2011),
            rec("Sur", "Caliente", 2012),
        ])
    }

    #[test]
    fn year_interval_excludes_upper_endpoint() {
        assert_eq!(year_sequence(2010, 2012), vec![2010, 2011]);
        assert!(year_sequence(2010, 2010).is_empty());
    }

    #[test]
    fn full_domain_spec_drops_only_the_last_year() {
        let ds = dataset();
        let mut spec = FilterSpec::defaults(&ds);
        for dim in Dimension::ALL {
            spec.set_selection(dim, ds.domain(dim).clone());
        }
        let kept = filter_records(&ds, &spec);
        // 2012 records fall outside the expanded [2010, 2012) interval.
        assert_eq!(kept, vec![0, 1, 2]);
    }

    #[test]
    fn empty_selection_means_no_constraint() {
        let ds = dataset();
        let mut spec = FilterSpec::defaults(&ds);
        spec.set_selection(Dimension::Season, BTreeSet::new());
        let kept = filter_records(&ds, &spec);
        assert_eq!(kept, vec![0, 1, 2]);
    }

    #[test]
    fn categorical_membership_is_enforced() {
        let ds = dataset();
        let mut spec = FilterSpec::defaults(&ds);
        spec.set_selection(
            Dimension::Bioregion,
            ["Sur".to_string()].into_iter().collect(),
        );
        let kept = filter_records(&ds, &spec);
        assert_eq!(kept, vec![2]);
    }

    #[test]
    fn record_without_value_fails_a_constrained_dimension() {
        let mut orphan = rec("Norte", "Fría", 2010);
        orphan.bioregion = None;
        let ds = SurveyDataset::from_records(vec![orphan, rec("Norte", "Fría", 2010)]);
        let mut spec = FilterSpec::defaults(&ds);
        spec.set_selection(
            Dimension::Bioregion,
            ["Norte".to_string()].into_iter().collect(),
        );
        assert_eq!(filter_records(&ds, &spec), vec![1]);
    }

    #[test]
    fn sanitize_drops_values_outside_the_domain() {
        let ds = dataset();
        let mut spec = FilterSpec::defaults(&ds);
        spec.set_selection(
            Dimension::Bioregion,
            ["Norte".to_string(), "Atlántico".to_string()]
                .into_iter()
                .collect(),
        );
        spec.set_year_range(1990, 2050);
        spec.sanitize(&ds);
        assert_eq!(spec.selection(Dimension::Bioregion).len(), 1);
        assert_eq!(spec.year_range(), (2010, 2012));
    }
}
