// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Label entry popup shown next to a freshly drawn box.

use crate::models::session::Session;

/// Vertical distance from the draft's anchor to the popup.
const PROMPT_OFFSET: f32 = 50.0;

/// Result of label prompt interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelAction {
    None,
    Confirm,
    Cancel,
}

/// Display the label prompt while a draft awaits its label.
///
/// Enter or "Add" confirms, Escape or "Cancel" discards the draft.
pub fn show(
    ctx: &egui::Context,
    image_rect: egui::Rect,
    session: &mut Session,
    request_focus: bool,
) -> LabelAction {
    if !session.draw_state().is_pending_label() {
        return LabelAction::None;
    }
    let Some(draft) = session.draw_state().draft().copied() else {
        return LabelAction::None;
    };

    let anchor = image_rect.min + egui::vec2(draft.x as f32, draft.y as f32 - PROMPT_OFFSET);
    let mut action = LabelAction::None;

    egui::Area::new(egui::Id::new("label_prompt"))
        .fixed_pos(anchor)
        .order(egui::Order::Foreground)
        .show(ctx, |ui| {
            egui::Frame::popup(ui.style()).show(ui, |ui| {
                let Some(label) = session.label_mut() else {
                    return;
                };
                let response = ui.add(
                    egui::TextEdit::singleline(label)
                        .hint_text("Enter label...")
                        .desired_width(160.0),
                );
                if request_focus {
                    response.request_focus();
                }
                if response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                    action = LabelAction::Confirm;
                }
                if ui.input(|i| i.key_pressed(egui::Key::Escape)) {
                    action = LabelAction::Cancel;
                }

                ui.horizontal(|ui| {
                    if ui.button("Add").clicked() {
                        action = LabelAction::Confirm;
                    }
                    if ui.button("Cancel").clicked() {
                        action = LabelAction::Cancel;
                    }
                });
            });
        });

    action
}
