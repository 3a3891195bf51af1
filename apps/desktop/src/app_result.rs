use crate::app::App;
use eframe::egui;
use script_pipeline::models::MAX_SCENE_SECONDS;
use script_pipeline::render::{ViewField, ViewSection};
use script_pipeline::{Phase, ResultTab};

pub(crate) fn render_results(ui: &mut egui::Ui, app: &mut App) {
    match app.controller.phase() {
        Phase::Idle => {
            ui.centered_and_justified(|ui| {
                ui.weak("Enter an idea and press Generate script.");
            });
            return;
        }
        Phase::Submitting if app.controller.result().is_none() => {
            ui.centered_and_justified(|ui| {
                ui.spinner();
            });
            return;
        }
        _ => {}
    }

    let Some(result) = app.controller.result() else {
        ui.centered_and_justified(|ui| {
            ui.weak("No script yet.");
        });
        return;
    };
    let total = result.total_duration_seconds();
    let all_prompts = result.all_prompts();
    let overlong = result.overlong_scenes().len();

    ui.horizontal(|ui| {
        let active = app.controller.active_tab();
        for tab in ResultTab::ALL {
            if ui.selectable_label(active == tab, tab.label()).clicked() {
                app.controller.select_tab(tab);
            }
        }
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            if ui.button("Copy all prompts").clicked() {
                ui.ctx().copy_text(all_prompts);
            }
            if let Some(at) = app.controller.completed_at() {
                ui.weak(format!("{}s total · {}", total, at.format("%H:%M:%S")));
            }
        });
    });

    if overlong > 0 {
        ui.colored_label(
            egui::Color32::YELLOW,
            format!("{overlong} scene(s) run longer than {MAX_SCENE_SECONDS}s"),
        );
    }
    ui.separator();

    let Some(view) = app.controller.view() else {
        return;
    };
    egui::ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui| {
            for (index, section) in view.sections.iter().enumerate() {
                ui.push_id(index, |ui| render_section(ui, section));
                ui.add_space(8.0);
            }
        });
}

fn render_section(ui: &mut egui::Ui, section: &ViewSection) {
    ui.horizontal(|ui| {
        ui.strong(&section.title);
        if let Some(badge) = &section.badge {
            let color = if section.over_limit {
                egui::Color32::from_rgb(230, 160, 40)
            } else {
                ui.visuals().weak_text_color()
            };
            ui.colored_label(color, badge);
        }
        if section.over_limit {
            ui.colored_label(egui::Color32::from_rgb(230, 160, 40), "⚠")
                .on_hover_text(format!("Longer than {MAX_SCENE_SECONDS}s"));
        }
    });

    for (index, field) in section.fields.iter().enumerate() {
        ui.push_id(index, |ui| render_field(ui, field));
    }
}

fn render_field(ui: &mut egui::Ui, field: &ViewField) {
    ui.horizontal(|ui| {
        if !field.label.is_empty() {
            ui.label(egui::RichText::new(&field.label).small().weak());
        }
        if let Some(copy) = &field.copy_text {
            if ui.small_button("Copy").clicked() {
                ui.ctx().copy_text(copy.clone());
            }
        }
    });

    if field.monospace {
        egui::CollapsingHeader::new("Show")
            .default_open(false)
            .show(ui, |ui| {
                ui.add(egui::Label::new(egui::RichText::new(&field.text).monospace()).wrap());
            });
    } else {
        ui.add(egui::Label::new(&field.text).wrap());
    }
}
