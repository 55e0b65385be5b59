// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Main application state and egui App implementation.
//!
//! This module hosts one annotation session: it loads the active image in
//! the background, routes canvas, panel and keyboard input into the
//! session, and hands the snapshot to the save handler.

use crate::config::Credential;
use crate::interaction::Transition;
use crate::io::{loader::PreviewLoader, serialization};
use crate::models::annotation::ImageAnnotations;
use crate::models::session::{ImageRef, ImageStatus, Session};
use crate::models::store::InitialAnnotations;
use crate::ui::{canvas, label_prompt, navigator, properties};

/// Receives the save snapshot; owns any persistence and its failures.
pub type SaveHandler = Box<dyn FnMut(Vec<ImageAnnotations>)>;

/// Re-reads the session source for a refresh.
pub type SessionLoader = Box<dyn FnMut() -> anyhow::Result<(Vec<ImageRef>, InitialAnnotations)>>;

/// Main application state.
pub struct AnnoboxApp {
    session: Session,

    /// Bearer credential for image requests
    credential: Option<Credential>,

    /// Called with the full snapshot on save
    on_save: SaveHandler,

    /// Source of the image set, for reloads
    loader: SessionLoader,

    /// Texture of the active image; replaced or dropped when superseded
    image_texture: Option<egui::TextureHandle>,

    /// Image dimensions (width, height)
    image_size: Option<(u32, u32)>,

    /// Background loader for the active image
    image_loader: PreviewLoader,

    /// Label input should grab focus on the next frame
    focus_label: bool,

    /// Last save/export message for the footer
    status_message: Option<String>,
}

impl AnnoboxApp {
    /// Create the application around an opened session.
    pub fn new(
        session: Session,
        credential: Option<Credential>,
        on_save: SaveHandler,
        loader: SessionLoader,
    ) -> Self {
        Self {
            session,
            credential,
            on_save,
            loader,
            image_texture: None,
            image_size: None,
            image_loader: PreviewLoader::new(),
            focus_label: false,
            status_message: None,
        }
    }

    /// Start loading the active image unless a load for it is in flight.
    fn ensure_image_loading(&mut self) {
        if !matches!(self.session.image_status(), ImageStatus::Loading) {
            return;
        }
        let image = self.session.current_image().clone();
        if self.image_loader.is_loading(&image.id) {
            return;
        }

        // Starting over abandons any previous load; its late result has
        // nowhere to go.
        self.clear_texture();
        self.image_loader.start(image, self.credential.clone());
    }

    fn poll_image_loader(&mut self, ctx: &egui::Context) {
        let Some((image_id, result)) = self.image_loader.poll() else {
            return;
        };

        match self.session.finish_load(&image_id, result) {
            Some(loaded) => {
                let size = [loaded.width as usize, loaded.height as usize];
                let color_image = egui::ColorImage::from_rgba_unmultiplied(size, &loaded.pixels);
                self.image_texture = Some(ctx.load_texture(
                    format!("image-{}", image_id),
                    color_image,
                    egui::TextureOptions::LINEAR,
                ));
                self.image_size = Some((loaded.width, loaded.height));
                log::info!("Loaded image {} ({}x{})", image_id, loaded.width, loaded.height);
            }
            None if !self.session.is_image_ready() => self.clear_texture(),
            None => {}
        }
    }

    fn clear_texture(&mut self) {
        self.image_texture = None;
        self.image_size = None;
    }

    fn navigate(&mut self, action: navigator::NavigatorAction) {
        let moved = match action {
            navigator::NavigatorAction::Prev => self.session.prev(),
            navigator::NavigatorAction::Next => self.session.next(),
            navigator::NavigatorAction::None => false,
        };
        if moved {
            self.clear_texture();
            self.focus_label = false;
        }
    }

    fn save(&mut self) {
        let total = self.session.total_count();
        let on_save = &mut self.on_save;
        self.session.save(|snapshot| on_save(snapshot));
        self.status_message = Some(format!("Saved {} annotations", total));
    }

    /// Refresh the image set; unsaved edits survive when it is unchanged.
    fn reload_session(&mut self) {
        let preview = self.session.current_image().preview.clone();
        let result = (self.loader)()
            .and_then(|(images, initial)| Ok(self.session.replace_images(images, initial)?));
        match result {
            Ok(true) => {
                self.clear_texture();
                self.image_loader.cancel();
                self.focus_label = false;
                self.status_message = Some("Session reloaded".to_string());
            }
            Ok(false) => {
                if self.session.current_image().preview != preview {
                    self.clear_texture();
                    self.image_loader.cancel();
                    self.focus_label = false;
                }
                self.status_message = Some("Image set unchanged; edits kept".to_string());
            }
            Err(e) => {
                log::error!("Failed to reload session: {}", e);
                self.status_message = Some(format!("Reload failed: {}", e));
            }
        }
    }

    fn export_snapshot_as(&mut self) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("JSON", &["json"])
            .add_filter("YAML", &["yaml", "yml"])
            .set_file_name("annotations.json")
            .save_file()
        else {
            return;
        };

        match serialization::export_snapshot(&self.session.snapshot(), &path) {
            Ok(()) => {
                log::info!("Exported annotations to {}", path.display());
                self.status_message = Some(format!("Exported to {}", path.display()));
            }
            Err(e) => {
                log::error!("Failed to export annotations: {}", e);
                self.status_message = Some(format!("Export failed: {}", e));
            }
        }
    }

    fn handle_canvas_actions(&mut self, actions: &[canvas::CanvasAction]) {
        for action in actions {
            match *action {
                canvas::CanvasAction::PointerDown(point) => self.session.pointer_down(point),
                canvas::CanvasAction::PointerMove(point) => self.session.pointer_move(point),
                canvas::CanvasAction::PointerUp => {
                    if self.session.pointer_up() == Transition::AwaitingLabel {
                        self.focus_label = true;
                    }
                }
            }
        }
    }

    fn handle_keyboard(&mut self, ctx: &egui::Context) {
        // Only process if no text field is focused (to avoid acting while typing labels)
        if ctx.wants_keyboard_input() {
            return;
        }

        if ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
            self.session.cancel_label();
            self.session.select(None);
        }

        if ctx.input(|i| i.key_pressed(egui::Key::Delete) || i.key_pressed(egui::Key::Backspace)) {
            if let Some(id) = self.session.selected().map(str::to_string) {
                self.session.remove_annotation(&id);
            }
        }

        if ctx.input(|i| i.key_pressed(egui::Key::ArrowLeft)) {
            self.navigate(navigator::NavigatorAction::Prev);
        }
        if ctx.input(|i| i.key_pressed(egui::Key::ArrowRight)) {
            self.navigate(navigator::NavigatorAction::Next);
        }
    }
}

impl eframe::App for AnnoboxApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_image_loader(ctx);
        self.ensure_image_loading();

        // Request repaint while loading (to update spinner and pick up the result)
        if self.image_loader.is_busy() {
            ctx.request_repaint();
        }

        // Top menu bar
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("File", |ui| {
                    if ui.button("Save All Annotations").clicked() {
                        self.save();
                        ui.close_menu();
                    }
                    if ui.button("Export Annotations As...").clicked() {
                        self.export_snapshot_as();
                        ui.close_menu();
                    }
                    if ui.button("Reload Session").clicked() {
                        self.reload_session();
                        ui.close_menu();
                    }
                    ui.separator();
                    if ui.button("Close").clicked() {
                        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                    }
                });
            });
        });

        // Navigation bar
        let nav_action = egui::TopBottomPanel::top("navigator")
            .show(ctx, |ui| navigator::show(ui, &self.session))
            .inner;
        self.navigate(nav_action);

        // Footer
        egui::TopBottomPanel::bottom("footer").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if ui.button("Close").clicked() {
                    ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                }
                ui.separator();
                ui.label(format!("Total: {} annotations", self.session.total_count()));
                if let Some(ref message) = self.status_message {
                    ui.separator();
                    ui.label(egui::RichText::new(message).weak());
                }
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.button("Save All Annotations").clicked() {
                        self.save();
                    }
                });
            });
        });

        // Annotation list (right side)
        let properties_action = egui::SidePanel::right("properties")
            .default_width(250.0)
            .show(ctx, |ui| properties::show(ui, &self.session))
            .inner;

        match properties_action {
            properties::PropertiesAction::SelectAnnotation(id) => {
                self.session.select(Some(id.as_str()));
            }
            properties::PropertiesAction::DeleteAnnotation(id) => {
                self.session.remove_annotation(&id);
            }
            properties::PropertiesAction::None => {}
        }

        self.handle_keyboard(ctx);

        // Main canvas (center)
        let canvas_response = egui::CentralPanel::default()
            .show(ctx, |ui| {
                canvas::show(
                    ui,
                    &mut self.session,
                    self.image_texture.as_ref(),
                    self.image_size,
                )
            })
            .inner;

        if !canvas_response.actions.is_empty() {
            self.handle_canvas_actions(&canvas_response.actions);
            ctx.request_repaint();
        }

        // Label prompt floats over the canvas
        if let Some(image_rect) = canvas_response.image_rect {
            let request_focus = std::mem::take(&mut self.focus_label);
            match label_prompt::show(ctx, image_rect, &mut self.session, request_focus) {
                label_prompt::LabelAction::Confirm => {
                    self.session.confirm_label();
                }
                label_prompt::LabelAction::Cancel => self.session.cancel_label(),
                label_prompt::LabelAction::None => {}
            }
        }
    }
}
