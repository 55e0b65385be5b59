// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Previous/next image bar.

use crate::models::session::Session;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigatorAction {
    None,
    Prev,
    Next,
}

/// Display the navigation bar; buttons are disabled at either end.
pub fn show(ui: &mut egui::Ui, session: &Session) -> NavigatorAction {
    let mut action = NavigatorAction::None;

    ui.horizontal(|ui| {
        ui.spacing_mut().item_spacing.x = 8.0;

        if ui
            .add_enabled(session.has_prev(), egui::Button::new("◀ Previous"))
            .clicked()
        {
            action = NavigatorAction::Prev;
        }

        ui.label(format!("{} / {}", session.position(), session.image_count()));

        if ui
            .add_enabled(session.has_next(), egui::Button::new("Next ▶"))
            .clicked()
        {
            action = NavigatorAction::Next;
        }

        ui.separator();

        ui.label(
            egui::RichText::new("Drag to draw boxes around objects and label them")
                .italics()
                .weak(),
        );
    });

    action
}
