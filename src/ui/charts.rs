use std::f32::consts::TAU;

use eframe::egui::{self, Align2, Color32, FontId, Pos2, Sense, Shape, Stroke, Ui, Vec2};
use egui_plot::{Legend, MarkerShape, Plot, Points};

use crate::data::engine::SiteSelection;
use crate::state::AppState;

// Slice colours for the single-site success/failure breakdown.
const SUCCESS_COLOR: Color32 = Color32::from_rgb(46, 204, 113);
const FAILURE_COLOR: Color32 = Color32::from_rgb(231, 76, 60);

// ---------------------------------------------------------------------------
// Proportion (pie) chart
// ---------------------------------------------------------------------------

/// Render the proportion chart for the current selection: success counts per
/// site under "All Sites", success vs failure for a single site.
pub fn proportion_chart(ui: &mut Ui, state: &AppState) {
    let title = match &state.site {
        SiteSelection::All => "Total Success Launches By Site".to_string(),
        SiteSelection::Site(name) => format!("Total Success Launches for Site {name}"),
    };
    ui.vertical_centered(|ui: &mut Ui| {
        ui.strong(title);
    });

    let views = &state.views;
    let total = views.proportion_total();
    if views.proportions.is_empty() || total == 0 {
        let message = if views.proportions.is_empty() {
            "No launches in the selected payload range."
        } else {
            "No successful launches in the selected payload range."
        };
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.label(message);
        });
        return;
    }

    let desired = Vec2::new(ui.available_width(), ui.available_height());
    let (rect, _response) = ui.allocate_exact_size(desired, Sense::hover());
    let painter = ui.painter_at(rect);

    // Disc on the left, legend on the right.
    let radius = (rect.height() * 0.5 - 8.0)
        .min(rect.width() * 0.25)
        .max(10.0);
    let center = Pos2::new(rect.left() + rect.width() * 0.35, rect.center().y);

    // Start at twelve o'clock.
    let mut start_angle = -TAU / 4.0;
    for slice in &views.proportions {
        let fraction = slice.count as f32 / total as f32;
        let sweep = fraction * TAU;
        let color = slice_color(state, &slice.label);

        if sweep > 0.0 {
            fill_wedge(&painter, center, radius, start_angle, sweep, color);
            if fraction >= 0.05 {
                let mid = start_angle + sweep / 2.0;
                let pos = center + Vec2::angled(mid) * radius * 0.6;
                painter.text(
                    pos,
                    Align2::CENTER_CENTER,
                    format!("{:.1}%", fraction * 100.0),
                    FontId::proportional(12.0),
                    Color32::WHITE,
                );
            }
        }
        start_angle += sweep;
    }

    // Zero slices draw nothing but still get a legend entry.
    let mut legend_y = center.y - views.proportions.len() as f32 * 9.0;
    let legend_x = center.x + radius + 24.0;
    for slice in &views.proportions {
        let color = slice_color(state, &slice.label);
        painter.circle_filled(Pos2::new(legend_x, legend_y), 5.0, color);
        painter.text(
            Pos2::new(legend_x + 12.0, legend_y),
            Align2::LEFT_CENTER,
            format!("{} ({})", slice.label, slice.count),
            FontId::proportional(12.0),
            ui.visuals().text_color(),
        );
        legend_y += 18.0;
    }
}

fn slice_color(state: &AppState, label: &str) -> Color32 {
    match &state.site {
        SiteSelection::All => state.site_colors.color_for(label),
        SiteSelection::Site(_) => {
            if label == "Success" {
                SUCCESS_COLOR
            } else {
                FAILURE_COLOR
            }
        }
    }
}

/// Fill a pie wedge as a fan of small triangles; each triangle stays convex
/// even when the wedge spans more than half the disc.
fn fill_wedge(
    painter: &egui::Painter,
    center: Pos2,
    radius: f32,
    start_angle: f32,
    sweep: f32,
    color: Color32,
) {
    let steps = ((sweep / 0.05).ceil() as usize).max(1);
    let mut prev = center + Vec2::angled(start_angle) * radius;
    for i in 1..=steps {
        let angle = start_angle + sweep * i as f32 / steps as f32;
        let next = center + Vec2::angled(angle) * radius;
        painter.add(Shape::convex_polygon(
            vec![center, prev, next],
            color,
            Stroke::NONE,
        ));
        prev = next;
    }
}

// ---------------------------------------------------------------------------
// Payload / outcome scatter chart
// ---------------------------------------------------------------------------

/// Render the payload-vs-outcome scatter, one series per booster version
/// category so the legend groups by category.
pub fn scatter_chart(ui: &mut Ui, state: &AppState) {
    let views = &state.views;

    Plot::new("payload_outcome_scatter")
        .legend(Legend::default())
        .x_axis_label("Payload Mass (kg)")
        .y_axis_label("Launch Outcome")
        .y_axis_formatter(|mark, _range| {
            if (mark.value - 1.0).abs() < f64::EPSILON {
                "Success".to_string()
            } else if mark.value.abs() < f64::EPSILON {
                "Failure".to_string()
            } else {
                String::new()
            }
        })
        .include_y(-0.5)
        .include_y(1.5)
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            for category in &state.dataset.booster_categories {
                let points: Vec<[f64; 2]> = views
                    .scatter
                    .iter()
                    .filter(|p| p.booster_category == *category)
                    .map(|p| [p.payload_mass_kg, p.outcome.as_f64()])
                    .collect();
                if points.is_empty() {
                    continue;
                }
                plot_ui.points(
                    Points::new(points)
                        .name(category)
                        .color(state.booster_colors.color_for(category))
                        .shape(MarkerShape::Circle)
                        .radius(4.0),
                );
            }
        });
}
