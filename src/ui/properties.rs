// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Annotation list panel.
//!
//! Lists the current image's boxes with their label and rounded center
//! position, lets the user focus or delete one, and shows session-wide
//! progress and totals.

use crate::models::session::Session;
use crate::util::geometry::percent;

/// Result of properties panel interaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertiesAction {
    None,
    SelectAnnotation(String),
    DeleteAnnotation(String),
}

pub fn show(ui: &mut egui::Ui, session: &Session) -> PropertiesAction {
    let mut action = PropertiesAction::None;
    let annotations = session.current_annotations();

    ui.heading(format!("Annotations ({})", session.current_count()));
    ui.separator();

    egui::ScrollArea::vertical()
        .auto_shrink([false, true])
        .max_height((ui.available_height() - 90.0).max(60.0))
        .show(ui, |ui| {
            if annotations.is_empty() {
                ui.label(egui::RichText::new("Drag on image to add annotations").weak());
                return;
            }

            for annotation in annotations {
                let is_selected = session.selected() == Some(annotation.id.as_str());
                ui.group(|ui| {
                    ui.set_width(ui.available_width());
                    let title = egui::RichText::new(&annotation.label).strong();
                    if ui.selectable_label(is_selected, title).clicked() {
                        action = PropertiesAction::SelectAnnotation(annotation.id.clone());
                    }
                    ui.label(
                        egui::RichText::new(format!(
                            "({}%, {}%)",
                            percent(annotation.geometry.x_center),
                            percent(annotation.geometry.y_center)
                        ))
                        .small()
                        .weak(),
                    );
                    if ui.small_button("🗑 Delete").clicked() {
                        action = PropertiesAction::DeleteAnnotation(annotation.id.clone());
                    }
                });
            }
        });

    ui.separator();
    ui.label("Progress");
    ui.add(egui::ProgressBar::new(session.progress()));
    ui.label(format!("{} total annotations", session.total_count()));

    action
}
