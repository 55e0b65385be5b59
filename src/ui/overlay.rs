// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Overlay rendering.
//!
//! [`render`] turns the current image's annotations, the selection, the
//! draft rectangle and the container size into a flat list of draw
//! commands. The canvas paints them; nothing here knows about egui
//! painters or frames.

use crate::models::annotation::Annotation;
use crate::util::geometry::{self, ContainerSize, DragRect, PixelBox};
use egui::Color32;

pub const BOX_COLOR: Color32 = Color32::from_rgb(0x08, 0x91, 0xb2);
pub const SELECTED_COLOR: Color32 = Color32::from_rgb(0x06, 0xb6, 0xd4);
pub const DRAFT_COLOR: Color32 = Color32::from_rgb(0x06, 0xb6, 0xd4);
pub const TAG_TEXT_COLOR: Color32 = Color32::BLACK;

pub const BOX_STROKE: f64 = 2.0;
pub const SELECTED_STROKE: f64 = 3.0;
pub const DRAFT_STROKE: f64 = 2.0;
pub const DRAFT_DASH: f64 = 5.0;

pub const TAG_FONT_SIZE: f64 = 14.0;
pub const TAG_PADDING: f64 = 4.0;
/// Line height of the tag text (16) plus padding above and below.
pub const TAG_HEIGHT: f64 = 16.0 + TAG_PADDING * 2.0;

/// Everything the overlay depends on.
#[derive(Debug, Clone, Copy)]
pub struct OverlayView<'a> {
    pub annotations: &'a [Annotation],
    pub selected: Option<&'a str>,
    pub draft: Option<&'a DragRect>,
    pub container: ContainerSize,
}

/// One painting step, in container pixel coordinates.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// Resize and clear the drawing surface.
    Clear { width: f64, height: f64 },
    StrokeRect {
        rect: PixelBox,
        color: Color32,
        width: f64,
    },
    /// Filled label tag; the painter sizes the fill to the measured text.
    LabelTag {
        x: f64,
        y: f64,
        text: String,
        fill: Color32,
    },
    DashedRect {
        rect: PixelBox,
        color: Color32,
        width: f64,
        dash: f64,
    },
}

/// Produce a full repaint for the view.
///
/// An unmeasured container yields no commands at all.
pub fn render(view: &OverlayView<'_>) -> Vec<DrawCommand> {
    let container = view.container;
    if !container.is_measured() {
        return Vec::new();
    }

    let mut commands = Vec::with_capacity(view.annotations.len() * 2 + 2);
    commands.push(DrawCommand::Clear {
        width: container.width,
        height: container.height,
    });

    for annotation in view.annotations {
        let Some(rect) = geometry::to_pixel(&annotation.geometry, container) else {
            continue;
        };
        let is_selected = view.selected == Some(annotation.id.as_str());
        let (color, width) = if is_selected {
            (SELECTED_COLOR, SELECTED_STROKE)
        } else {
            (BOX_COLOR, BOX_STROKE)
        };

        commands.push(DrawCommand::StrokeRect { rect, color, width });
        commands.push(DrawCommand::LabelTag {
            x: rect.x,
            y: (rect.y - TAG_HEIGHT).max(0.0),
            text: annotation.label.clone(),
            fill: color,
        });
    }

    if let Some(draft) = view.draft {
        commands.push(DrawCommand::DashedRect {
            rect: draft.to_box(),
            color: DRAFT_COLOR,
            width: DRAFT_STROKE,
            dash: DRAFT_DASH,
        });
    }

    commands
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::annotation::BoxGeometry;
    use crate::util::geometry::PixelPoint;

    fn annotation(id: &str, y_center: f64) -> Annotation {
        Annotation {
            id: id.to_string(),
            geometry: BoxGeometry {
                x_center: 0.5,
                y_center,
                width: 0.2,
                height: 0.2,
            },
            label: id.to_string(),
        }
    }

    #[test]
    fn test_unmeasured_container_skips_repaint() {
        let annotations = [annotation("a", 0.5)];
        let view = OverlayView {
            annotations: &annotations,
            selected: None,
            draft: None,
            container: ContainerSize::new(0.0, 300.0),
        };
        assert!(render(&view).is_empty());
    }

    #[test]
    fn test_clear_comes_first_and_boxes_follow() {
        let annotations = [annotation("a", 0.5), annotation("b", 0.5)];
        let view = OverlayView {
            annotations: &annotations,
            selected: Some("b"),
            draft: None,
            container: ContainerSize::new(200.0, 100.0),
        };
        let commands = render(&view);

        assert_eq!(commands.len(), 5);
        assert_eq!(
            commands[0],
            DrawCommand::Clear {
                width: 200.0,
                height: 100.0
            }
        );
        match &commands[1] {
            DrawCommand::StrokeRect { rect, color, width } => {
                assert!((rect.x - 80.0).abs() < 1e-9);
                assert!((rect.y - 40.0).abs() < 1e-9);
                assert_eq!(*color, BOX_COLOR);
                assert_eq!(*width, BOX_STROKE);
            }
            other => panic!("unexpected command {:?}", other),
        }
        match &commands[3] {
            DrawCommand::StrokeRect { color, width, .. } => {
                assert_eq!(*color, SELECTED_COLOR);
                assert_eq!(*width, SELECTED_STROKE);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_label_tag_never_above_top_edge() {
        let annotations = [annotation("top", 0.1), annotation("low", 0.8)];
        let view = OverlayView {
            annotations: &annotations,
            selected: None,
            draft: None,
            container: ContainerSize::new(100.0, 100.0),
        };
        let tags: Vec<f64> = render(&view)
            .into_iter()
            .filter_map(|c| match c {
                DrawCommand::LabelTag { y, .. } => Some(y),
                _ => None,
            })
            .collect();

        assert_eq!(tags[0], 0.0);
        assert!((tags[1] - (70.0 - TAG_HEIGHT)).abs() < 1e-9);
    }

    #[test]
    fn test_draft_drawn_last_and_normalized() {
        let mut draft = DragRect::at(PixelPoint::new(50.0, 50.0));
        draft.stretch_to(PixelPoint::new(20.0, 10.0));
        let view = OverlayView {
            annotations: &[],
            selected: None,
            draft: Some(&draft),
            container: ContainerSize::new(100.0, 100.0),
        };
        let commands = render(&view);

        match commands.last() {
            Some(DrawCommand::DashedRect { rect, dash, .. }) => {
                assert_eq!(rect.x, 20.0);
                assert_eq!(rect.y, 10.0);
                assert_eq!(rect.width, 30.0);
                assert_eq!(rect.height, 40.0);
                assert_eq!(*dash, DRAFT_DASH);
            }
            other => panic!("expected dashed draft, got {:?}", other),
        }
    }
}
