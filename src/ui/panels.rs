use eframe::egui::{self, Ui};

use crate::data::engine::SiteSelection;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – selection widgets
// ---------------------------------------------------------------------------

/// Render the left control panel: site dropdown and payload range.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    // ---- Launch site dropdown ----
    ui.strong("Launch site");
    // Clone what we need so we can mutate state inside the combo closure.
    let current = state.site.clone();
    let sites = state.dataset.sites.clone();

    egui::ComboBox::from_id_salt("site_dropdown")
        .selected_text(current.label().to_string())
        .show_ui(ui, |ui: &mut Ui| {
            if ui
                .selectable_label(current == SiteSelection::All, "All Sites")
                .clicked()
            {
                state.set_site(SiteSelection::All);
            }
            for site in &sites {
                let is_selected = matches!(&current, SiteSelection::Site(s) if s == site);
                if ui.selectable_label(is_selected, site).clicked() {
                    state.set_site(SiteSelection::Site(site.clone()));
                }
            }
        });

    ui.separator();

    // ---- Payload range ----
    ui.strong("Payload range (kg)");
    let (min, max) = state.dataset.payload_bounds;
    let mut low = state.range.low;
    let mut high = state.range.high;

    let low_changed = ui
        .add(egui::Slider::new(&mut low, min..=max).text("min"))
        .changed();
    let high_changed = ui
        .add(egui::Slider::new(&mut high, min..=max).text("max"))
        .changed();
    if low_changed || high_changed {
        state.set_range(low, high);
    }

    ui.add_space(8.0);
    ui.label(format!(
        "{} launches in the current view",
        state.views.scatter.len()
    ));
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top status bar.
pub fn top_bar(ui: &mut Ui, state: &AppState) {
    ui.horizontal(|ui: &mut Ui| {
        ui.strong("Launch Records Dashboard");
        ui.separator();
        ui.label(format!(
            "{} launches loaded, {} in view",
            state.dataset.len(),
            state.views.scatter.len()
        ));
    });
}
