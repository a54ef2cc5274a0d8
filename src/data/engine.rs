use std::collections::BTreeMap;

use super::model::{LaunchDataset, Outcome};

// ---------------------------------------------------------------------------
// Selection inputs
// ---------------------------------------------------------------------------

/// Site selector value: the "All Sites" sentinel or one exact site name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SiteSelection {
    All,
    Site(String),
}

impl SiteSelection {
    /// Text shown in the dropdown for this selection.
    pub fn label(&self) -> &str {
        match self {
            SiteSelection::All => "All Sites",
            SiteSelection::Site(name) => name,
        }
    }
}

/// Payload-mass window applied before any grouping.
///
/// Both bounds are exclusive: a record whose mass sits exactly on `low` or
/// `high` is filtered out, and only widening the window brings it back.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PayloadRange {
    pub low: f64,
    pub high: f64,
}

impl PayloadRange {
    pub fn new(low: f64, high: f64) -> Self {
        PayloadRange { low, high }
    }

    /// Strict containment check; an inverted window contains nothing.
    pub fn contains(&self, mass_kg: f64) -> bool {
        mass_kg > self.low && mass_kg < self.high
    }
}

// ---------------------------------------------------------------------------
// Derived views
// ---------------------------------------------------------------------------

/// One slice of the proportion chart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProportionSlice {
    pub label: String,
    pub count: u64,
}

/// One marker of the payload/outcome scatter chart.
#[derive(Debug, Clone, PartialEq)]
pub struct ScatterPoint {
    pub payload_mass_kg: f64,
    pub outcome: Outcome,
    pub booster_category: String,
}

/// Chart-ready projections of the current selection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardViews {
    /// Proportion chart slices, in a deterministic order: site order under
    /// [`SiteSelection::All`], success before failure for a single site.
    pub proportions: Vec<ProportionSlice>,
    /// Every record passing the current filters.
    pub scatter: Vec<ScatterPoint>,
}

impl DashboardViews {
    /// Sum of the proportion slice weights.
    pub fn proportion_total(&self) -> u64 {
        self.proportions.iter().map(|s| s.count).sum()
    }
}

// ---------------------------------------------------------------------------
// Filter + aggregate
// ---------------------------------------------------------------------------

/// Recompute both chart views for the given selection.
///
/// A pure projection of `dataset`: no caching, no mutation, identical inputs
/// give identical outputs. Inverted windows and site names absent from the
/// data yield empty views rather than errors.
///
/// Under [`SiteSelection::All`] the proportion view counts successful
/// launches per site; a site reaching the payload window only through
/// failures still appears, with a zero slice. For a single site it counts
/// outcomes within that site, listing only outcomes that occur.
pub fn dashboard_views(
    dataset: &LaunchDataset,
    site: &SiteSelection,
    range: PayloadRange,
) -> DashboardViews {
    let in_range = dataset
        .records
        .iter()
        .filter(|rec| range.contains(rec.payload_mass_kg));

    match site {
        SiteSelection::All => {
            let mut successes: BTreeMap<&str, u64> = BTreeMap::new();
            let mut scatter = Vec::new();

            for rec in in_range {
                let count = successes.entry(rec.launch_site.as_str()).or_insert(0);
                if rec.outcome.is_success() {
                    *count += 1;
                }
                scatter.push(ScatterPoint {
                    payload_mass_kg: rec.payload_mass_kg,
                    outcome: rec.outcome,
                    booster_category: rec.booster_category.clone(),
                });
            }

            let proportions = successes
                .into_iter()
                .map(|(site, count)| ProportionSlice {
                    label: site.to_string(),
                    count,
                })
                .collect();

            DashboardViews {
                proportions,
                scatter,
            }
        }
        SiteSelection::Site(name) => {
            let mut success = 0u64;
            let mut failure = 0u64;
            let mut scatter = Vec::new();

            for rec in in_range.filter(|rec| rec.launch_site == *name) {
                match rec.outcome {
                    Outcome::Success => success += 1,
                    Outcome::Failure => failure += 1,
                }
                scatter.push(ScatterPoint {
                    payload_mass_kg: rec.payload_mass_kg,
                    outcome: rec.outcome,
                    booster_category: rec.booster_category.clone(),
                });
            }

            let mut proportions = Vec::new();
            if success > 0 {
                proportions.push(ProportionSlice {
                    label: Outcome::Success.to_string(),
                    count: success,
                });
            }
            if failure > 0 {
                proportions.push(ProportionSlice {
                    label: Outcome::Failure.to_string(),
                    count: failure,
                });
            }

            DashboardViews {
                proportions,
                scatter,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::data::model::LaunchRecord;

    fn record(site: &str, mass: f64, booster: &str, outcome: Outcome) -> LaunchRecord {
        LaunchRecord {
            launch_site: site.to_string(),
            payload_mass_kg: mass,
            booster_category: booster.to_string(),
            outcome,
        }
    }

    fn slice(label: &str, count: u64) -> ProportionSlice {
        ProportionSlice {
            label: label.to_string(),
            count,
        }
    }

    fn sample_dataset() -> LaunchDataset {
        LaunchDataset::from_records(vec![
            record("SiteA", 500.0, "FT", Outcome::Success),
            record("SiteA", 1500.0, "FT", Outcome::Failure),
            record("SiteB", 2500.0, "B4", Outcome::Success),
        ])
    }

    #[test]
    fn all_sites_groups_success_counts_by_site() {
        let ds = sample_dataset();
        let views = dashboard_views(&ds, &SiteSelection::All, PayloadRange::new(0.0, 3000.0));

        assert_eq!(views.proportions, vec![slice("SiteA", 1), slice("SiteB", 1)]);
        assert_eq!(views.scatter.len(), 3);
    }

    #[test]
    fn single_site_counts_outcomes_and_drops_other_sites() {
        let ds = sample_dataset();
        let selection = SiteSelection::Site("SiteA".to_string());
        let views = dashboard_views(&ds, &selection, PayloadRange::new(0.0, 3000.0));

        assert_eq!(views.proportions, vec![slice("Success", 1), slice("Failure", 1)]);
        // SiteB's 2500 kg launch must not leak into the scatter view.
        let masses: Vec<f64> = views.scatter.iter().map(|p| p.payload_mass_kg).collect();
        assert_eq!(masses, vec![500.0, 1500.0]);
    }

    #[test]
    fn range_bounds_are_exclusive() {
        let ds = sample_dataset();
        let views = dashboard_views(&ds, &SiteSelection::All, PayloadRange::new(500.0, 2500.0));

        // Records at exactly 500 and 2500 kg sit on the bounds and are excluded.
        assert_eq!(views.scatter.len(), 1);
        assert_eq!(views.scatter[0].payload_mass_kg, 1500.0);
        assert_eq!(views.proportions, vec![slice("SiteA", 0)]);
    }

    #[test]
    fn inverted_or_collapsed_range_yields_empty_views() {
        let ds = sample_dataset();
        for range in [PayloadRange::new(3000.0, 0.0), PayloadRange::new(1500.0, 1500.0)] {
            let views = dashboard_views(&ds, &SiteSelection::All, range);
            assert!(views.proportions.is_empty());
            assert!(views.scatter.is_empty());
        }
    }

    #[test]
    fn unknown_site_yields_empty_views() {
        let ds = sample_dataset();
        let selection = SiteSelection::Site("SiteZ".to_string());
        let views = dashboard_views(&ds, &selection, PayloadRange::new(0.0, 3000.0));

        assert!(views.proportions.is_empty());
        assert!(views.scatter.is_empty());
    }

    #[test]
    fn all_sites_total_matches_manual_success_count() {
        let ds = sample_dataset();
        let range = PayloadRange::new(0.0, 3000.0);
        let views = dashboard_views(&ds, &SiteSelection::All, range);

        let manual = ds
            .records
            .iter()
            .filter(|rec| range.contains(rec.payload_mass_kg) && rec.outcome.is_success())
            .count() as u64;
        assert_eq!(views.proportion_total(), manual);
    }

    #[test]
    fn failure_only_site_keeps_a_zero_slice() {
        let ds = LaunchDataset::from_records(vec![
            record("SiteA", 800.0, "FT", Outcome::Success),
            record("SiteC", 1200.0, "v1.1", Outcome::Failure),
        ]);
        let views = dashboard_views(&ds, &SiteSelection::All, PayloadRange::new(0.0, 2000.0));

        assert_eq!(views.proportions, vec![slice("SiteA", 1), slice("SiteC", 0)]);
    }

    #[test]
    fn single_site_omits_absent_outcomes() {
        let ds = LaunchDataset::from_records(vec![
            record("SiteA", 800.0, "FT", Outcome::Success),
            record("SiteA", 900.0, "FT", Outcome::Success),
        ]);
        let selection = SiteSelection::Site("SiteA".to_string());
        let views = dashboard_views(&ds, &selection, PayloadRange::new(0.0, 2000.0));

        assert_eq!(views.proportions, vec![slice("Success", 2)]);
    }

    #[test]
    fn repeated_invocations_are_identical() {
        let ds = sample_dataset();
        let selection = SiteSelection::Site("SiteA".to_string());
        let range = PayloadRange::new(0.0, 3000.0);

        let first = dashboard_views(&ds, &selection, range);
        let second = dashboard_views(&ds, &selection, range);
        assert_eq!(first, second);
    }
}
