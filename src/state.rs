use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use crate::controller::{self, DashboardOutput, Outcome};
use crate::data::filter::FilterSpec;
use crate::data::model::{Dimension, SurveyDataset};

// ---------------------------------------------------------------------------
// Control state – the complete set of values driving recomputation
// ---------------------------------------------------------------------------

/// Current value of every filter and chart control. Replaced-in-place by
/// the UI; every mutation raises the dirty flag so the controller runs one
/// recomputation per frame at most.
#[derive(Debug, Clone)]
pub struct ControlState {
    /// Per-dimension selections and the year interval.
    pub filter: FilterSpec,

    /// Primary chart metric.
    pub primary: Dimension,

    /// "Añadir otra métrica al gráfico" toggle.
    pub second_metric: bool,

    /// Secondary chart metric; `None` suppresses recomputation while the
    /// toggle is on.
    pub secondary: Option<Dimension>,

    /// "Seleccionar todo" checkbox state per dimension.
    select_all: BTreeMap<Dimension, bool>,

    /// Raised by any control change, cleared by [`ControlState::take_dirty`].
    dirty: bool,
}

impl ControlState {
    /// Control defaults for a freshly loaded dataset: bioregión as primary
    /// metric, grupo funcional pre-picked as the (disabled) secondary.
    pub fn new(dataset: &SurveyDataset) -> Self {
        ControlState {
            filter: FilterSpec::defaults(dataset),
            primary: Dimension::Bioregion,
            second_metric: false,
            secondary: Some(Dimension::FunctionalGroup),
            select_all: Dimension::WITH_SELECT_ALL
                .iter()
                .map(|&dim| (dim, false))
                .collect(),
            dirty: true,
        }
    }

    /// Whether a recomputation is pending; clears the flag.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Toggle a single value in a dimension's selection.
    pub fn toggle_filter_value(&mut self, dim: Dimension, value: &str) {
        let selected = self.filter.selection_mut(dim);
        if !selected.remove(value) {
            selected.insert(value.to_string());
        }
        self.select_all.insert(dim, false);
        self.dirty = true;
    }

    /// State of a dimension's "Seleccionar todo" checkbox.
    pub fn select_all_checked(&self, dim: Dimension) -> bool {
        self.select_all.get(&dim).copied().unwrap_or(false)
    }

    /// Set a dimension's "Seleccionar todo" checkbox: checked replaces the
    /// selection with the full offered domain, unchecked empties it.
    pub fn set_select_all(&mut self, dim: Dimension, checked: bool, options: &BTreeSet<String>) {
        self.select_all.insert(dim, checked);
        let values = if checked {
            options.clone()
        } else {
            BTreeSet::new()
        };
        self.filter.set_selection(dim, values);
        self.dirty = true;
    }

    pub fn set_year_range(&mut self, start: i32, end: i32) {
        self.filter.set_year_range(start, end);
        self.dirty = true;
    }

    pub fn set_primary(&mut self, dim: Dimension) {
        if self.primary != dim {
            self.primary = dim;
            self.dirty = true;
        }
    }

    pub fn set_second_metric(&mut self, enabled: bool) {
        if self.second_metric != enabled {
            self.second_metric = enabled;
            self.dirty = true;
        }
    }

    pub fn set_secondary(&mut self, dim: Option<Dimension>) {
        if self.secondary != dim {
            self.secondary = dim;
            self.dirty = true;
        }
    }
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Loaded dataset (None until a file loads successfully).
    pub dataset: Option<SurveyDataset>,

    /// Current filter and chart control values.
    pub controls: Option<ControlState>,

    /// Last published chart/table pair. Survives suppressed recomputations
    /// unchanged.
    pub output: Option<DashboardOutput>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            dataset: None,
            controls: None,
            output: None,
            status_message: None,
        }
    }
}

impl AppState {
    /// Ingest a newly loaded dataset and reset the controls to defaults.
    pub fn set_dataset(&mut self, dataset: SurveyDataset) {
        self.controls = Some(ControlState::new(&dataset));
        self.dataset = Some(dataset);
        self.output = None;
        self.status_message = None;
    }

    /// Load a survey file, replacing the current dataset on success.
    pub fn load_dataset(&mut self, path: &Path) {
        match crate::data::loader::load_file(path) {
            Ok(dataset) => {
                log::info!(
                    "Loaded {} survey records, {} islands, years {:?}",
                    dataset.len(),
                    dataset.summary().islands,
                    dataset.year_span()
                );
                self.set_dataset(dataset);
            }
            Err(e) => {
                log::error!("Failed to load {}: {e:#}", path.display());
                self.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }

    /// Run one recomputation if any control changed since the last frame.
    /// A suppressed outcome leaves the previous output in place.
    pub fn recompute_if_dirty(&mut self) {
        let (Some(dataset), Some(controls)) = (&self.dataset, &mut self.controls) else {
            return;
        };
        if !controls.take_dirty() {
            return;
        }
        match controller::recompute(dataset, controls) {
            Outcome::Updated(output) => self.output = Some(output),
            Outcome::Suppressed => {}
        }
    }
}
