use crate::app::App;
use desktop::file_summary::file_label;
use eframe::egui;
use script_pipeline::models::{MAX_DURATION_SECONDS, MIN_DURATION_SECONDS};
use script_pipeline::ingest::route_for;
use script_pipeline::{FileRoute, ProviderKind, VideoStyle};

pub(crate) fn render_form(ui: &mut egui::Ui, app: &mut App) {
    ui.heading("Video script generator");
    ui.add_space(6.0);

    render_provider(ui, app);
    ui.separator();

    let busy = app.controller.is_loading();

    ui.label("Idea");
    ui.add_enabled(
        !busy,
        egui::TextEdit::multiline(&mut app.controller.inputs.idea)
            .hint_text("Describe the video you want...")
            .desired_rows(4)
            .desired_width(f32::INFINITY),
    );

    ui.add_space(4.0);
    ui.label("Reference documents");
    ui.add_enabled(
        !busy,
        egui::TextEdit::multiline(&mut app.controller.inputs.documents)
            .hint_text("Paste notes, articles or briefs")
            .desired_rows(4)
            .desired_width(f32::INFINITY),
    );

    ui.add_space(4.0);
    ui.label("Setting");
    ui.add_enabled(
        !busy,
        egui::TextEdit::singleline(&mut app.controller.inputs.user_setting)
            .hint_text("Leave empty for a free creative choice")
            .desired_width(f32::INFINITY),
    );

    ui.label("Characters");
    ui.add_enabled(
        !busy,
        egui::TextEdit::singleline(&mut app.controller.inputs.user_characters)
            .hint_text("Leave empty for a free creative choice")
            .desired_width(f32::INFINITY),
    );

    ui.add_space(4.0);
    ui.horizontal(|ui| {
        ui.label("Style");
        ui.add_enabled_ui(!busy, |ui| {
            egui::ComboBox::from_id_salt("video_style")
                .selected_text(app.controller.inputs.video_style.as_str())
                .show_ui(ui, |ui| {
                    for style in VideoStyle::ALL {
                        ui.selectable_value(
                            &mut app.controller.inputs.video_style,
                            style,
                            style.as_str(),
                        );
                    }
                });
        });
    });

    ui.horizontal(|ui| {
        ui.label("Duration");
        ui.add_enabled(
            !busy,
            egui::DragValue::new(&mut app.controller.inputs.duration_seconds)
                .range(MIN_DURATION_SECONDS..=MAX_DURATION_SECONDS)
                .suffix(" s"),
        );
    });

    ui.horizontal(|ui| {
        ui.label("Narrative language");
        ui.add_enabled(
            !busy,
            egui::TextEdit::singleline(&mut app.controller.narrative_language)
                .desired_width(140.0),
        );
    });

    ui.separator();
    render_files(ui, app, busy);
    ui.separator();

    if let Some(message) = app.controller.error().map(str::to_string) {
        egui::Frame::none()
            .fill(egui::Color32::from_rgb(80, 24, 24))
            .rounding(4.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                ui.horizontal_wrapped(|ui| {
                    ui.colored_label(egui::Color32::from_rgb(255, 180, 180), message);
                    if ui.small_button("✕").clicked() {
                        app.controller.dismiss_error();
                    }
                });
            });
        ui.add_space(6.0);
    }

    ui.horizontal(|ui| {
        let button = egui::Button::new(if busy { "Generating..." } else { "Generate script" });
        if ui.add_enabled(app.controller.can_submit(), button).clicked() {
            app.submit();
        }
        if busy {
            ui.spinner();
        }
    });
}

fn render_provider(ui: &mut egui::Ui, app: &mut App) {
    ui.horizontal(|ui| {
        ui.label("Provider");
        egui::ComboBox::from_id_salt("provider_kind")
            .selected_text(app.provider.to_string())
            .show_ui(ui, |ui| {
                ui.selectable_value(&mut app.provider, ProviderKind::Gemini, "gemini");
                ui.selectable_value(&mut app.provider, ProviderKind::Mock, "mock");
            });
    });

    if app.provider == ProviderKind::Gemini {
        ui.horizontal(|ui| {
            ui.label("API key");
            ui.add(
                egui::TextEdit::singleline(&mut app.api_key)
                    .password(true)
                    .desired_width(f32::INFINITY),
            );
        });
        ui.horizontal(|ui| {
            ui.label("Model");
            ui.add(egui::TextEdit::singleline(&mut app.model).desired_width(f32::INFINITY));
        });
    }
}

fn render_files(ui: &mut egui::Ui, app: &mut App, busy: bool) {
    ui.horizontal(|ui| {
        ui.label("Attachments");
        if ui
            .add_enabled(!busy && !app.loading_files, egui::Button::new("Add files..."))
            .clicked()
        {
            app.pick_files();
        }
        if app.loading_files {
            ui.spinner();
        }
    });

    let mut remove = None;
    for (index, file) in app.controller.inputs.files.iter().enumerate() {
        ui.horizontal(|ui| {
            let label = file_label(file);
            if route_for(file) == FileRoute::Skipped {
                ui.weak(label)
                    .on_hover_text("This file type is not sent to the model");
            } else {
                ui.label(label);
            }
            if ui.add_enabled(!busy, egui::Button::new("Remove").small()).clicked() {
                remove = Some(index);
            }
        });
    }
    if let Some(index) = remove {
        app.controller.inputs.remove_file(index);
    }

    for warning in &app.file_warnings {
        ui.colored_label(egui::Color32::YELLOW, warning);
    }
}
