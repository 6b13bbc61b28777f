use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

// ---------------------------------------------------------------------------
// Dimension – a categorical column usable for grouping
// ---------------------------------------------------------------------------

/// The categorical columns of the survey dataset. Each variant knows its
/// source column name (as spelled in the data file) and the Spanish label
/// used in chart titles and filter headers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Dimension {
    Bioregion,
    Subzone,
    Island,
    Order,
    Family,
    FunctionalGroup,
    Season,
}

impl Dimension {
    /// All grouping dimensions, in filter-panel order.
    pub const ALL: [Dimension; 7] = [
        Dimension::Bioregion,
        Dimension::Subzone,
        Dimension::Island,
        Dimension::Order,
        Dimension::Family,
        Dimension::FunctionalGroup,
        Dimension::Season,
    ];

    /// Dimensions that carry a "Seleccionar todo" checkbox in the filter
    /// panel (season uses plain switches instead).
    pub const WITH_SELECT_ALL: [Dimension; 5] = [
        Dimension::Bioregion,
        Dimension::Subzone,
        Dimension::Island,
        Dimension::Order,
        Dimension::Family,
    ];

    /// Column name as spelled in the source file.
    pub fn column(self) -> &'static str {
        match self {
            Dimension::Bioregion => "Bioregion",
            Dimension::Subzone => "Subzone.name",
            Dimension::Island => "Island",
            Dimension::Order => "ORDER",
            Dimension::Family => "Family",
            Dimension::FunctionalGroup => "Functional.Group",
            Dimension::Season => "epoca",
        }
    }

    /// Spanish display label, lower-case, as embedded in chart titles.
    pub fn label(self) -> &'static str {
        match self {
            Dimension::Bioregion => "bioregión",
            Dimension::Subzone => "zona",
            Dimension::Island => "isla",
            Dimension::Order => "orden",
            Dimension::Family => "familia",
            Dimension::FunctionalGroup => "grupo funcional",
            Dimension::Season => "época",
        }
    }

    /// Label with an upper-case first letter, for table headers.
    pub fn title_label(self) -> String {
        let label = self.label();
        let mut chars = label.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
            None => String::new(),
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// SurveyRecord – one row of the survey table
// ---------------------------------------------------------------------------

/// One observed transect measurement. Immutable once loaded.
#[derive(Debug, Clone, Default)]
pub struct SurveyRecord {
    pub bioregion: Option<String>,
    pub subzone: Option<String>,
    pub island: Option<String>,
    pub order: Option<String>,
    pub family: Option<String>,
    pub functional_group: Option<String>,
    pub season: Option<String>,
    pub year: Option<i32>,
    /// Estimated biomass per 250 m² of transect area.
    pub biomass: f64,
    // Identifying fields, used only for the summary cards.
    pub site: Option<String>,
    pub species: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl SurveyRecord {
    /// The record's value for a grouping dimension, if present.
    pub fn value(&self, dim: Dimension) -> Option<&str> {
        let field = match dim {
            Dimension::Bioregion => &self.bioregion,
            Dimension::Subzone => &self.subzone,
            Dimension::Island => &self.island,
            Dimension::Order => &self.order,
            Dimension::Family => &self.family,
            Dimension::FunctionalGroup => &self.functional_group,
            Dimension::Season => &self.season,
        };
        field.as_deref()
    }
}

// ---------------------------------------------------------------------------
// DatasetSummary – the static cards shown above the chart
// ---------------------------------------------------------------------------

/// Counts computed once from the full dataset at load time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DatasetSummary {
    pub records: usize,
    pub sites: usize,
    pub islands: usize,
    pub species: usize,
    pub functional_groups: usize,
}

// ---------------------------------------------------------------------------
// SurveyDataset – the complete loaded dataset
// ---------------------------------------------------------------------------

/// The full parsed dataset with pre-computed value domains. Built once at
/// startup and read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct SurveyDataset {
    /// All records (rows).
    pub records: Vec<SurveyRecord>,
    /// For each grouping dimension, the sorted set of observed values
    /// (missing cells excluded).
    domains: BTreeMap<Dimension, BTreeSet<String>>,
    /// Sorted observed years.
    years: Vec<i32>,
    /// Static summary counts.
    summary: DatasetSummary,
}

impl SurveyDataset {
    /// Build domain indices and summary counts from the loaded records.
    pub fn from_records(records: Vec<SurveyRecord>) -> Self {
        let mut domains: BTreeMap<Dimension, BTreeSet<String>> = BTreeMap::new();
        let mut years: BTreeSet<i32> = BTreeSet::new();
        let mut sites: BTreeSet<&str> = BTreeSet::new();
        let mut species: BTreeSet<&str> = BTreeSet::new();

        for rec in &records {
            for dim in Dimension::ALL {
                if let Some(val) = rec.value(dim) {
                    domains.entry(dim).or_default().insert(val.to_string());
                }
            }
            if let Some(y) = rec.year {
                years.insert(y);
            }
            if let Some(site) = rec.site.as_deref() {
                sites.insert(site);
            }
            if let Some(sp) = rec.species.as_deref() {
                species.insert(sp);
            }
        }

        let summary = DatasetSummary {
            records: records.len(),
            sites: sites.len(),
            islands: domains.get(&Dimension::Island).map_or(0, |d| d.len()),
            species: species.len(),
            functional_groups: domains
                .get(&Dimension::FunctionalGroup)
                .map_or(0, |d| d.len()),
        };

        SurveyDataset {
            records,
            domains,
            years: years.into_iter().collect(),
            summary,
        }
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Sorted observed values for a dimension. Empty set if the column was
    /// absent from the source file.
    pub fn domain(&self, dim: Dimension) -> &BTreeSet<String> {
        static EMPTY: BTreeSet<String> = BTreeSet::new();
        self.domains.get(&dim).unwrap_or(&EMPTY)
    }

    /// Sorted observed years.
    pub fn years(&self) -> &[i32] {
        &self.years
    }

    /// Observed `(min, max)` year, if any year was present.
    pub fn year_span(&self) -> Option<(i32, i32)> {
        match (self.years.first(), self.years.last()) {
            (Some(&lo), Some(&hi)) => Some((lo, hi)),
            _ => None,
        }
    }

    pub fn summary(&self) -> &DatasetSummary {
        &self.summary
    }
}
