use crate::color::ColorMap;
use crate::data::engine::{self, DashboardViews, PayloadRange, SiteSelection};
use crate::data::model::LaunchDataset;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
///
/// Owns the dataset loaded at startup (read-only for the process lifetime)
/// and the current selection; the chart views are recomputed through the
/// engine whenever the selection changes.
pub struct AppState {
    pub dataset: LaunchDataset,

    /// Current site selector value.
    pub site: SiteSelection,

    /// Current payload window, kept ordered and within the dataset bounds.
    pub range: PayloadRange,

    /// Chart views for the current selection (cached per selection change).
    pub views: DashboardViews,

    /// Launch site → slice colour for the all-sites proportion chart.
    pub site_colors: ColorMap,

    /// Booster version category → marker colour for the scatter chart.
    pub booster_colors: ColorMap,
}

impl AppState {
    /// Take ownership of the freshly loaded dataset. The selection starts at
    /// "All Sites" over the full observed payload window.
    pub fn new(dataset: LaunchDataset) -> Self {
        let (min, max) = dataset.payload_bounds;
        let site_colors = ColorMap::new(dataset.sites.iter().cloned());
        let booster_colors = ColorMap::new(dataset.booster_categories.iter().cloned());

        let mut state = AppState {
            dataset,
            site: SiteSelection::All,
            range: PayloadRange::new(min, max),
            views: DashboardViews::default(),
            site_colors,
            booster_colors,
        };
        state.recompute();
        state
    }

    /// Switch the site selector and recompute the views.
    pub fn set_site(&mut self, site: SiteSelection) {
        self.site = site;
        self.recompute();
    }

    /// Move the payload window, clamped to the observed bounds and kept
    /// ordered, then recompute the views.
    pub fn set_range(&mut self, low: f64, high: f64) {
        let (min, max) = self.dataset.payload_bounds;
        let low = low.clamp(min, max);
        let high = high.clamp(min, max);
        self.range = PayloadRange::new(low.min(high), high);
        self.recompute();
    }

    /// Re-run the engine for the current selection.
    fn recompute(&mut self) {
        self.views = engine::dashboard_views(&self.dataset, &self.site, self.range);
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::data::model::{LaunchRecord, Outcome};

    fn record(site: &str, mass: f64, booster: &str, outcome: Outcome) -> LaunchRecord {
        LaunchRecord {
            launch_site: site.to_string(),
            payload_mass_kg: mass,
            booster_category: booster.to_string(),
            outcome,
        }
    }

    fn sample_state() -> AppState {
        AppState::new(LaunchDataset::from_records(vec![
            record("SiteA", 500.0, "FT", Outcome::Success),
            record("SiteA", 1500.0, "FT", Outcome::Failure),
            record("SiteB", 2000.0, "B4", Outcome::Success),
            record("SiteB", 2500.0, "B4", Outcome::Success),
        ]))
    }

    #[test]
    fn initial_selection_is_all_sites_over_full_window() {
        let state = sample_state();
        assert_eq!(state.site, SiteSelection::All);
        assert_eq!(state.range, PayloadRange::new(500.0, 2500.0));
        // The window bounds are exclusive, so the records sitting exactly on
        // the observed min/max stay out of the initial views.
        assert_eq!(state.views.scatter.len(), 2);
    }

    #[test]
    fn set_range_clamps_to_dataset_bounds_and_orders() {
        let mut state = sample_state();

        state.set_range(-100.0, 10_000.0);
        assert_eq!(state.range, PayloadRange::new(500.0, 2500.0));

        state.set_range(2000.0, 1000.0);
        assert_eq!(state.range, PayloadRange::new(1000.0, 1000.0));
        assert!(state.views.scatter.is_empty());
    }

    #[test]
    fn set_site_recomputes_views() {
        let mut state = sample_state();

        state.set_site(SiteSelection::Site("SiteB".to_string()));
        assert_eq!(state.views.scatter.len(), 1);
        assert_eq!(state.views.proportions.len(), 1);
        assert_eq!(state.views.proportions[0].label, "Success");

        state.set_site(SiteSelection::All);
        assert_eq!(state.views.scatter.len(), 2);
    }
}
