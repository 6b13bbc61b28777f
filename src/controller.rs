use crate::data::aggregate::{aggregate_by, cross_tabulate};
use crate::data::filter::filter_records;
use crate::data::model::SurveyDataset;
use crate::present::{to_chart, to_table, AggregationResult, ChartSpec, TableSpec};
use crate::state::ControlState;

// ---------------------------------------------------------------------------
// Reactive controller: control change → filter → aggregate → present
// ---------------------------------------------------------------------------

/// Chart and table produced by one recomputation. Always published together;
/// the UI never holds a chart from one pass and a table from another.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardOutput {
    pub chart: ChartSpec,
    pub table: TableSpec,
}

/// Result of one recomputation pass.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// New outputs, built atomically from a single pipeline pass.
    Updated(DashboardOutput),
    /// The secondary metric is required but unset: keep the previously
    /// published output unchanged. A control-flow signal, not a failure.
    Suppressed,
}

/// Run the three-stage pipeline for the current control state.
///
/// Pure function of its inputs; the caller decides when to invoke it (once
/// per dirty frame) and where to publish the result.
pub fn recompute(dataset: &SurveyDataset, controls: &ControlState) -> Outcome {
    let secondary = if controls.second_metric {
        match controls.secondary {
            Some(dim) => Some(dim),
            None => return Outcome::Suppressed,
        }
    } else {
        None
    };

    let rows = filter_records(dataset, &controls.filter);

    let result = match secondary {
        Some(dim) => AggregationResult::Bivariate(cross_tabulate(
            dataset,
            &rows,
            controls.primary,
            dim,
        )),
        None => AggregationResult::Univariate {
            dimension: controls.primary,
            ranked: aggregate_by(dataset, &rows, controls.primary),
        },
    };

    Outcome::Updated(DashboardOutput {
        chart: to_chart(&result),
        table: to_table(&result),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{Dimension, SurveyRecord};

    fn rec(bioregion: &str, group: &str, year: i32, biomass: f64) -> SurveyRecord {
        SurveyRecord {
            bioregion: Some(bioregion.to_string()),
            functional_group: Some(group.to_string()),
            season: Some("Fría".to_string()),
            year: Some(year),
            biomass,
            ..Default::default()
        }
    }

    fn dataset() -> SurveyDataset {
        SurveyDataset::from_records(vec![
            rec("Norte", "Herbívoro", 2010, 1.2),
            rec("Norte", "Depredador", 2011, 0.3),
            rec("Sur", "Herbívoro", 2011, 2.0),
            rec("Sur", "Depredador", 2012, 5.0),
        ])
    }

    #[test]
    fn univariate_pass_publishes_chart_and_table_together() {
        let ds = dataset();
        let controls = ControlState::new(&ds);

        let Outcome::Updated(output) = recompute(&ds, &controls) else {
            panic!("expected an update");
        };
        // 2012 is excluded by the year interval, so Sur totals 2.0.
        assert_eq!(output.chart.title, "Biomasa por bioregión");
        assert_eq!(output.chart.categories, vec!["Norte", "Sur"]);
        assert_eq!(output.table.rows.len(), output.chart.categories.len());
        assert_eq!(output.table.rows[1], vec!["Sur", "2.00"]);
    }

    #[test]
    fn second_metric_switches_to_the_pivot_path() {
        let ds = dataset();
        let mut controls = ControlState::new(&ds);
        controls.set_second_metric(true);

        let Outcome::Updated(output) = recompute(&ds, &controls) else {
            panic!("expected an update");
        };
        assert_eq!(
            output.chart.title,
            "Biomasa por bioregión y por grupo funcional"
        );
        assert_eq!(output.chart.series.len(), 2);
        assert_eq!(output.table.columns.len(), 3);
    }

    #[test]
    fn missing_secondary_suppresses_the_update() {
        let ds = dataset();
        let mut controls = ControlState::new(&ds);
        controls.set_second_metric(true);
        controls.set_secondary(None);

        assert_eq!(recompute(&ds, &controls), Outcome::Suppressed);

        // With the toggle off the unset secondary is irrelevant.
        controls.set_second_metric(false);
        assert!(matches!(recompute(&ds, &controls), Outcome::Updated(_)));
    }

    #[test]
    fn filters_that_exclude_everything_yield_empty_outputs() {
        let ds = dataset();
        let mut controls = ControlState::new(&ds);
        // Constrain to a season no record carries.
        controls
            .filter
            .set_selection(Dimension::Season, ["Caliente".to_string()].into_iter().collect());

        let Outcome::Updated(output) = recompute(&ds, &controls) else {
            panic!("expected an update");
        };
        assert!(output.chart.series[0].points.is_empty());
        assert!(output.table.rows.is_empty());
    }
}
