// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Drawing canvas for image display and box annotation.
//!
//! This module fits the active image into the available space, measures
//! the resulting container, turns pointer drags into canvas actions and
//! paints the overlay commands on top of the image.

use super::overlay::{
    self, DrawCommand, OverlayView, TAG_FONT_SIZE, TAG_HEIGHT, TAG_PADDING, TAG_TEXT_COLOR,
};
use crate::models::session::{ImageStatus, Session};
use crate::util::geometry::{self, ContainerSize, PixelBox, PixelPoint};

/// Result of canvas interaction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CanvasAction {
    PointerDown(PixelPoint),
    PointerMove(PixelPoint),
    /// Released, or the pointer left the container mid-drag.
    PointerUp,
}

#[derive(Debug, Default)]
pub struct CanvasResponse {
    pub actions: Vec<CanvasAction>,
    /// Screen rectangle of the displayed image, once it is shown.
    pub image_rect: Option<egui::Rect>,
}

/// Display the main canvas area and collect pointer interactions.
///
/// The container is re-measured here on every frame, before the overlay
/// is rendered, so window resizes, image loads and navigation never
/// paint against a stale size.
pub fn show(
    ui: &mut egui::Ui,
    session: &mut Session,
    image_texture: Option<&egui::TextureHandle>,
    image_size: Option<(u32, u32)>,
) -> CanvasResponse {
    let mut response = CanvasResponse::default();
    // Set background color
    ui.style_mut().visuals.extreme_bg_color = egui::Color32::from_gray(40);

    let available_size = ui.available_size();

    egui::Frame::canvas(ui.style()).show(ui, |ui| {
        ui.set_min_size(available_size);

        let status = session.image_status().clone();
        match (status, image_texture, image_size) {
            (ImageStatus::Ready, Some(texture), Some(size)) => {
                let available = ui.available_size();
                let fitted = geometry::fit_to_available(
                    size,
                    ContainerSize::new(available.x as f64, available.y as f64),
                );
                let Some((display, offset)) = fitted else {
                    session.remeasure(ContainerSize::default());
                    return;
                };
                session.remeasure(display);

                let image_rect = egui::Rect::from_min_size(
                    ui.min_rect().min + egui::vec2(offset.x as f32, offset.y as f32),
                    egui::vec2(display.width as f32, display.height as f32),
                );

                ui.painter().image(
                    texture.id(),
                    image_rect,
                    egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                    egui::Color32::WHITE,
                );

                collect_pointer_actions(ui, image_rect, &mut response.actions);

                let view = OverlayView {
                    annotations: session.current_annotations(),
                    selected: session.selected(),
                    draft: session.draw_state().draft(),
                    container: session.container(),
                };
                paint(ui.painter(), image_rect.min, &overlay::render(&view));

                response.image_rect = Some(image_rect);
            }
            (ImageStatus::Failed(message), _, _) => {
                session.remeasure(ContainerSize::default());
                ui.centered_and_justified(|ui| {
                    ui.label(
                        egui::RichText::new(format!("Could not load image: {}", message))
                            .color(egui::Color32::from_gray(180)),
                    );
                });
            }
            _ => {
                session.remeasure(ContainerSize::default());
                ui.centered_and_justified(|ui| {
                    ui.vertical_centered(|ui| {
                        ui.add_space(20.0);
                        ui.spinner();
                        ui.label(
                            egui::RichText::new("Loading image...")
                                .color(egui::Color32::from_gray(200)),
                        );
                    });
                });
            }
        }
    });

    // Status line at the bottom
    ui.separator();
    ui.horizontal(|ui| {
        ui.label(format!(
            "Image {} of {}",
            session.position(),
            session.image_count()
        ));
        ui.separator();
        ui.label(format!("{} on this image", session.current_count()));
        if session.draw_state().is_pending_label() {
            ui.separator();
            ui.label("Enter a label for the new box");
        }
    });

    response
}

fn collect_pointer_actions(
    ui: &mut egui::Ui,
    image_rect: egui::Rect,
    actions: &mut Vec<CanvasAction>,
) {
    let input = ui
        .allocate_rect(image_rect, egui::Sense::drag())
        .on_hover_cursor(egui::CursorIcon::Crosshair);

    let to_local = |pos: egui::Pos2| {
        PixelPoint::new((pos.x - image_rect.min.x) as f64, (pos.y - image_rect.min.y) as f64)
    };

    if input.drag_started() {
        // The drag only registers after a small movement; anchor at the press.
        let origin = ui
            .input(|i| i.pointer.press_origin())
            .or_else(|| input.interact_pointer_pos());
        if let Some(pos) = origin {
            actions.push(CanvasAction::PointerDown(to_local(pos)));
        }
    }

    if input.dragged() {
        if let Some(pos) = input.interact_pointer_pos() {
            if image_rect.contains(pos) {
                actions.push(CanvasAction::PointerMove(to_local(pos)));
            } else {
                actions.push(CanvasAction::PointerUp);
            }
        }
    }

    if input.drag_stopped() {
        actions.push(CanvasAction::PointerUp);
    }

    // A click never starts a drag; it is a press and release in place.
    if input.clicked() {
        if let Some(pos) = input.interact_pointer_pos() {
            actions.push(CanvasAction::PointerDown(to_local(pos)));
            actions.push(CanvasAction::PointerUp);
        }
    }
}

/// Paint overlay commands with `origin` as the container's top-left.
fn paint(base: &egui::Painter, origin: egui::Pos2, commands: &[DrawCommand]) {
    let to_rect = |rect: &PixelBox| {
        egui::Rect::from_min_size(
            origin + egui::vec2(rect.x as f32, rect.y as f32),
            egui::vec2(rect.width as f32, rect.height as f32),
        )
    };

    let mut painter = base.clone();
    for command in commands {
        match command {
            DrawCommand::Clear { width, height } => {
                painter = base.with_clip_rect(egui::Rect::from_min_size(
                    origin,
                    egui::vec2(*width as f32, *height as f32),
                ));
            }
            DrawCommand::StrokeRect { rect, color, width } => {
                painter.rect_stroke(to_rect(rect), 0.0, egui::Stroke::new(*width as f32, *color));
            }
            DrawCommand::LabelTag { x, y, text, fill } => {
                let galley = painter.layout_no_wrap(
                    text.clone(),
                    egui::FontId::proportional(TAG_FONT_SIZE as f32),
                    TAG_TEXT_COLOR,
                );
                let padding = TAG_PADDING as f32;
                let min = origin + egui::vec2(*x as f32, *y as f32);
                let tag = egui::Rect::from_min_size(
                    min,
                    egui::vec2(galley.size().x + padding * 2.0, TAG_HEIGHT as f32),
                );
                painter.rect_filled(tag, 0.0, *fill);
                painter.galley(min + egui::vec2(padding, padding), galley, TAG_TEXT_COLOR);
            }
            DrawCommand::DashedRect {
                rect,
                color,
                width,
                dash,
            } => {
                let r = to_rect(rect);
                let outline = [
                    r.left_top(),
                    r.right_top(),
                    r.right_bottom(),
                    r.left_bottom(),
                    r.left_top(),
                ];
                painter.extend(egui::Shape::dashed_line(
                    &outline,
                    egui::Stroke::new(*width as f32, *color),
                    *dash as f32,
                    *dash as f32,
                ));
            }
        }
    }
}
