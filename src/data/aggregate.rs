use std::collections::BTreeMap;

use super::model::{Dimension, SurveyDataset};

// ---------------------------------------------------------------------------
// Univariate aggregation: ranked biomass totals per category
// ---------------------------------------------------------------------------

/// One `(category, total)` pair of a ranked series.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedTotal {
    pub category: String,
    pub total: f64,
}

/// Round to 2 decimal places, the precision shown everywhere downstream.
pub fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// Group the row subset by `dim`, sum biomass per group, drop groups with a
/// non-positive total, and rank ascending by total (ties broken by category
/// name so the order is deterministic).
///
/// Rows with no value for `dim` contribute to no group. An empty subset
/// yields an empty series, not an error.
pub fn aggregate_by(dataset: &SurveyDataset, rows: &[usize], dim: Dimension) -> Vec<RankedTotal> {
    let mut totals: BTreeMap<&str, f64> = BTreeMap::new();
    for &i in rows {
        let rec = &dataset.records[i];
        if let Some(val) = rec.value(dim) {
            *totals.entry(val).or_insert(0.0) += rec.biomass;
        }
    }

    let mut ranked: Vec<RankedTotal> = totals
        .into_iter()
        .map(|(category, total)| RankedTotal {
            category: category.to_string(),
            total: round2(total),
        })
        .filter(|r| r.total > 0.0)
        .collect();

    ranked.sort_by(|a, b| {
        a.total
            .total_cmp(&b.total)
            .then_with(|| a.category.cmp(&b.category))
    });
    ranked
}

// ---------------------------------------------------------------------------
// Bivariate aggregation: primary × secondary pivot of biomass sums
// ---------------------------------------------------------------------------

/// One row of a [`PivotTable`]; `cells` is parallel to the table's columns,
/// `None` marking a pair that was never observed.
#[derive(Debug, Clone, PartialEq)]
pub struct PivotRow {
    pub category: String,
    pub cells: Vec<Option<f64>>,
}

/// Cross-tabulation of summed biomass: one row per primary value, one column
/// per secondary value.
#[derive(Debug, Clone, PartialEq)]
pub struct PivotTable {
    pub primary: Dimension,
    pub secondary: Dimension,
    pub columns: Vec<String>,
    pub rows: Vec<PivotRow>,
}

/// Group the row subset by `(primary, secondary)`, sum biomass per pair, and
/// reshape into a grid. Only values observed in the subset produce rows and
/// columns; every cell is rounded to 2 decimal places.
pub fn cross_tabulate(
    dataset: &SurveyDataset,
    rows: &[usize],
    primary: Dimension,
    secondary: Dimension,
) -> PivotTable {
    let mut sums: BTreeMap<(&str, &str), f64> = BTreeMap::new();
    for &i in rows {
        let rec = &dataset.records[i];
        if let (Some(a), Some(b)) = (rec.value(primary), rec.value(secondary)) {
            *sums.entry((a, b)).or_insert(0.0) += rec.biomass;
        }
    }

    let columns: Vec<String> = sums
        .keys()
        .map(|&(_, b)| b.to_string())
        .collect::<std::collections::BTreeSet<_>>()
        .into_iter()
        .collect();

    let mut by_primary: BTreeMap<&str, BTreeMap<&str, f64>> = BTreeMap::new();
    for (&(a, b), &total) in &sums {
        by_primary.entry(a).or_default().insert(b, total);
    }

    let pivot_rows = by_primary
        .into_iter()
        .map(|(category, cells_by_col)| PivotRow {
            category: category.to_string(),
            cells: columns
                .iter()
                .map(|col| cells_by_col.get(col.as_str()).map(|&v| round2(v)))
                .collect(),
        })
        .collect();

    PivotTable {
        primary,
        secondary,
        columns,
        rows: pivot_rows,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::SurveyRecord;

    fn rec(bioregion: &str, group: &str, biomass: f64) -> SurveyRecord {
        SurveyRecord {
            bioregion: Some(bioregion.to_string()),
            functional_group: Some(group.to_string()),
            biomass,
            ..Default::default()
        }
    }

    fn all_rows(ds: &SurveyDataset) -> Vec<usize> {
        (0..ds.len()).collect()
    }

    #[test]
    fn negative_totals_are_dropped_and_sums_rounded() {
        let ds = SurveyDataset::from_records(vec![
            rec("Norte", "Herbívoro", 1.2),
            rec("Norte", "Herbívoro", 0.3),
            rec("Sur", "Herbívoro", -0.1),
        ]);
        let ranked = aggregate_by(&ds, &all_rows(&ds), Dimension::Bioregion);
        assert_eq!(
            ranked,
            vec![RankedTotal {
                category: "Norte".to_string(),
                total: 1.5,
            }]
        );
    }

    #[test]
    fn output_is_ascending_and_strictly_positive() {
        let ds = SurveyDataset::from_records(vec![
            rec("Occidente", "Depredador", 9.75),
            rec("Norte", "Herbívoro", 0.25),
            rec("Centro-sureste", "Planctívoro", 3.5),
            rec("Elizabeth", "Depredador", 0.0),
        ]);
        let ranked = aggregate_by(&ds, &all_rows(&ds), Dimension::Bioregion);
        assert_eq!(ranked.len(), 3);
        for pair in ranked.windows(2) {
            assert!(pair[0].total <= pair[1].total);
        }
        assert!(ranked.iter().all(|r| r.total > 0.0));
    }

    #[test]
    fn repeated_aggregation_is_idempotent() {
        let ds = SurveyDataset::from_records(vec![
            rec("Norte", "Herbívoro", 2.0),
            rec("Sur", "Depredador", 1.0),
        ]);
        let rows = all_rows(&ds);
        let first = aggregate_by(&ds, &rows, Dimension::Bioregion);
        let second = aggregate_by(&ds, &rows, Dimension::Bioregion);
        assert_eq!(first, second);
    }

    #[test]
    fn empty_subset_yields_empty_series() {
        let ds = SurveyDataset::from_records(vec![rec("Norte", "Herbívoro", 1.0)]);
        assert!(aggregate_by(&ds, &[], Dimension::Bioregion).is_empty());
    }

    #[test]
    fn pivot_has_one_column_per_secondary_value() {
        let ds = SurveyDataset::from_records(vec![
            rec("Norte", "Herbívoro", 1.0),
            rec("Norte", "Depredador", 2.0),
            rec("Sur", "Herbívoro", 0.5),
        ]);
        let pivot = cross_tabulate(
            &ds,
            &all_rows(&ds),
            Dimension::Bioregion,
            Dimension::FunctionalGroup,
        );
        assert_eq!(pivot.columns, vec!["Depredador", "Herbívoro"]);
        assert_eq!(pivot.rows.len(), 2);
        // "Sur" never pairs with "Depredador": that cell is no-data.
        let sur = &pivot.rows[1];
        assert_eq!(sur.category, "Sur");
        assert_eq!(sur.cells, vec![None, Some(0.5)]);
    }

    #[test]
    fn pivot_row_sums_match_univariate_totals() {
        let ds = SurveyDataset::from_records(vec![
            rec("Norte", "Herbívoro", 1.25),
            rec("Norte", "Depredador", 2.5),
            rec("Sur", "Herbívoro", 0.75),
            rec("Sur", "Planctívoro", 1.0),
        ]);
        let rows = all_rows(&ds);
        let ranked = aggregate_by(&ds, &rows, Dimension::Bioregion);
        let pivot = cross_tabulate(&ds, &rows, Dimension::Bioregion, Dimension::FunctionalGroup);

        for row in &pivot.rows {
            let flattened: f64 = row.cells.iter().flatten().sum();
            let univariate = ranked
                .iter()
                .find(|r| r.category == row.category)
                .map(|r| r.total);
            assert_eq!(univariate, Some(round2(flattened)));
        }
    }
}
