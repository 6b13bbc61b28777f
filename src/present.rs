use crate::data::aggregate::{PivotTable, RankedTotal};
use crate::data::model::Dimension;

// ---------------------------------------------------------------------------
// AggregationResult – what one recomputation produced
// ---------------------------------------------------------------------------

/// Output of the aggregation stage, carrying the dimension(s) it was
/// grouped by so titles and headers can be generated.
#[derive(Debug, Clone, PartialEq)]
pub enum AggregationResult {
    Univariate {
        dimension: Dimension,
        ranked: Vec<RankedTotal>,
    },
    Bivariate(PivotTable),
}

/// Subtitle shown under every chart title.
pub const CHART_SUBTITLE: &str = "Total de biomasa estimada por 250 metros cuadrados";

/// Axis / column label for the summed quantity.
pub const BIOMASS_LABEL: &str = "Biomasa por 250 m²";

// ---------------------------------------------------------------------------
// Chart spec
// ---------------------------------------------------------------------------

/// One named series of `(category, value)` pairs.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSeries {
    pub name: String,
    pub points: Vec<(String, f64)>,
}

/// Renderer-agnostic bar chart description. `categories` fixes the axis
/// order; every series point refers to one of them.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSpec {
    pub title: String,
    pub subtitle: String,
    pub value_label: String,
    pub categories: Vec<String>,
    pub series: Vec<ChartSeries>,
}

/// Build the chart spec for an aggregation result.
///
/// Univariate results become a single ranked series; bivariate results one
/// series per secondary value (stacked by the renderer). No-data pivot cells
/// produce no point.
pub fn to_chart(result: &AggregationResult) -> ChartSpec {
    match result {
        AggregationResult::Univariate { dimension, ranked } => ChartSpec {
            title: format!("Biomasa por {}", dimension.label()),
            subtitle: CHART_SUBTITLE.to_string(),
            value_label: BIOMASS_LABEL.to_string(),
            categories: ranked.iter().map(|r| r.category.clone()).collect(),
            series: vec![ChartSeries {
                name: BIOMASS_LABEL.to_string(),
                points: ranked
                    .iter()
                    .map(|r| (r.category.clone(), r.total))
                    .collect(),
            }],
        },
        AggregationResult::Bivariate(pivot) => ChartSpec {
            title: format!(
                "Biomasa por {} y por {}",
                pivot.primary.label(),
                pivot.secondary.label()
            ),
            subtitle: CHART_SUBTITLE.to_string(),
            value_label: BIOMASS_LABEL.to_string(),
            categories: pivot.rows.iter().map(|r| r.category.clone()).collect(),
            series: pivot
                .columns
                .iter()
                .enumerate()
                .map(|(col_idx, col)| ChartSeries {
                    name: col.clone(),
                    points: pivot
                        .rows
                        .iter()
                        .filter_map(|row| {
                            row.cells[col_idx].map(|v| (row.category.clone(), v))
                        })
                        .collect(),
                })
                .collect(),
        },
    }
}

// ---------------------------------------------------------------------------
// Table spec
// ---------------------------------------------------------------------------

/// Renderer-agnostic table: a header row plus formatted cells. No-data
/// pivot cells render as empty strings.
#[derive(Debug, Clone, PartialEq)]
pub struct TableSpec {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Build the table spec for an aggregation result.
pub fn to_table(result: &AggregationResult) -> TableSpec {
    match result {
        AggregationResult::Univariate { dimension, ranked } => TableSpec {
            columns: vec![dimension.title_label(), BIOMASS_LABEL.to_string()],
            rows: ranked
                .iter()
                .map(|r| vec![r.category.clone(), format!("{:.2}", r.total)])
                .collect(),
        },
        AggregationResult::Bivariate(pivot) => {
            let mut columns = vec![pivot.primary.title_label()];
            columns.extend(pivot.columns.iter().cloned());
            TableSpec {
                columns,
                rows: pivot
                    .rows
                    .iter()
                    .map(|row| {
                        let mut cells = vec![row.category.clone()];
                        cells.extend(
                            row.cells
                                .iter()
                                .map(|c| c.map_or(String::new(), |v| format!("{v:.2}"))),
                        );
                        cells
                    })
                    .collect(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::aggregate::{PivotRow, RankedTotal};

    fn univariate() -> AggregationResult {
        AggregationResult::Univariate {
            dimension: Dimension::Bioregion,
            ranked: vec![
                RankedTotal {
                    category: "Sur".to_string(),
                    total: 0.5,
                },
                RankedTotal {
                    category: "Norte".to_string(),
                    total: 1.5,
                },
            ],
        }
    }

    fn bivariate() -> AggregationResult {
        AggregationResult::Bivariate(PivotTable {
            primary: Dimension::Bioregion,
            secondary: Dimension::FunctionalGroup,
            columns: vec!["Depredador".to_string(), "Herbívoro".to_string()],
            rows: vec![
                PivotRow {
                    category: "Norte".to_string(),
                    cells: vec![Some(2.0), Some(1.0)],
                },
                PivotRow {
                    category: "Sur".to_string(),
                    cells: vec![None, Some(0.5)],
                },
            ],
        })
    }

    #[test]
    fn univariate_chart_has_one_ranked_series() {
        let chart = to_chart(&univariate());
        assert_eq!(chart.title, "Biomasa por bioregión");
        assert_eq!(chart.subtitle, CHART_SUBTITLE);
        assert_eq!(chart.categories, vec!["Sur", "Norte"]);
        assert_eq!(chart.series.len(), 1);
        assert_eq!(chart.series[0].points[1], ("Norte".to_string(), 1.5));
    }

    #[test]
    fn bivariate_chart_has_one_series_per_secondary_value() {
        let chart = to_chart(&bivariate());
        assert_eq!(chart.title, "Biomasa por bioregión y por grupo funcional");
        assert_eq!(chart.series.len(), 2);
        // The no-data (Sur, Depredador) cell produces no point.
        assert_eq!(chart.series[0].points, vec![("Norte".to_string(), 2.0)]);
        assert_eq!(chart.series[1].points.len(), 2);
    }

    #[test]
    fn univariate_table_has_category_and_total_columns() {
        let table = to_table(&univariate());
        assert_eq!(table.columns, vec!["Bioregión", BIOMASS_LABEL]);
        assert_eq!(table.rows[0], vec!["Sur", "0.50"]);
    }

    #[test]
    fn bivariate_table_renders_no_data_cells_empty() {
        let table = to_table(&bivariate());
        assert_eq!(table.columns.len(), 3);
        assert_eq!(table.rows[1], vec!["Sur", "", "0.50"]);
    }
}
