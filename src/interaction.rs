// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Drag-to-draw interaction.
//!
//! Pointer gestures become a draft rectangle, the draft is gated on a
//! minimum size, and a confirmed label turns it into an [`Annotation`].
//! Nothing here touches the store; the session adds committed boxes.

use crate::models::annotation::Annotation;
use crate::util::geometry::{self, ContainerSize, DragRect, PixelPoint};

/// Current phase of the draw gesture.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum DrawState {
    #[default]
    Idle,
    Drawing { rect: DragRect },
    PendingLabel { rect: DragRect, label: String },
}

/// What a pointer release did to the draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Large enough; the label prompt should open.
    AwaitingLabel,
    /// Too small; the draft was dropped.
    Discarded,
    /// No gesture was in progress.
    Ignored,
}

/// Result of confirming the label prompt.
#[derive(Debug, Clone, PartialEq)]
pub enum CommitOutcome {
    Committed(Annotation),
    /// Blank label; the draft was dropped.
    Cancelled,
    /// Container has no size yet; the prompt stays open.
    Unmeasured,
    /// No label prompt was open.
    NotPending,
}

#[derive(Debug, Clone, Default)]
pub struct DrawMachine {
    state: DrawState,
}

impl DrawMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_idle(&self) -> bool {
        matches!(self.state, DrawState::Idle)
    }

    pub fn is_pending_label(&self) -> bool {
        matches!(self.state, DrawState::PendingLabel { .. })
    }

    /// The in-progress rectangle, while drawing or awaiting a label.
    pub fn draft(&self) -> Option<&DragRect> {
        match &self.state {
            DrawState::Idle => None,
            DrawState::Drawing { rect } | DrawState::PendingLabel { rect, .. } => Some(rect),
        }
    }

    /// Editable label buffer while the prompt is open.
    pub fn label_mut(&mut self) -> Option<&mut String> {
        match &mut self.state {
            DrawState::PendingLabel { label, .. } => Some(label),
            _ => None,
        }
    }

    /// Start a gesture. Returns true when a gesture actually started.
    pub fn pointer_down(&mut self, at: PixelPoint) -> bool {
        if !self.is_idle() {
            return false;
        }
        self.state = DrawState::Drawing {
            rect: DragRect::at(at),
        };
        true
    }

    pub fn pointer_move(&mut self, at: PixelPoint) {
        if let DrawState::Drawing { rect } = &mut self.state {
            rect.stretch_to(at);
        }
    }

    /// End the gesture on release or when the pointer leaves the container.
    pub fn pointer_up(&mut self) -> Transition {
        let rect = match &self.state {
            DrawState::Drawing { rect } => *rect,
            _ => return Transition::Ignored,
        };

        if rect.exceeds_min_size() {
            self.state = DrawState::PendingLabel {
                rect,
                label: String::new(),
            };
            Transition::AwaitingLabel
        } else {
            log::debug!(
                "Discarded {:.1}x{:.1} draft below minimum size",
                rect.width,
                rect.height
            );
            self.state = DrawState::Idle;
            Transition::Discarded
        }
    }

    /// Turn the pending draft into an annotation using the label buffer.
    pub fn confirm(&mut self, container: ContainerSize) -> CommitOutcome {
        let (rect, label) = match &self.state {
            DrawState::PendingLabel { rect, label } => (*rect, label.trim().to_string()),
            _ => return CommitOutcome::NotPending,
        };

        if label.is_empty() {
            self.state = DrawState::Idle;
            return CommitOutcome::Cancelled;
        }

        match geometry::to_normalized(&rect, container) {
            Some(geometry) => {
                self.state = DrawState::Idle;
                CommitOutcome::Committed(Annotation::new(geometry, label))
            }
            None => CommitOutcome::Unmeasured,
        }
    }

    /// Drop any draft and return to idle.
    pub fn cancel(&mut self) {
        self.state = DrawState::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn container() -> ContainerSize {
        ContainerSize::new(200.0, 100.0)
    }

    fn drawn(dx: f64, dy: f64) -> (DrawMachine, Transition) {
        let mut machine = DrawMachine::new();
        assert!(machine.pointer_down(PixelPoint::new(50.0, 50.0)));
        machine.pointer_move(PixelPoint::new(50.0 + dx, 50.0 + dy));
        let transition = machine.pointer_up();
        (machine, transition)
    }

    #[test]
    fn test_small_drag_is_discarded() {
        for (dx, dy) in [(10.0, 40.0), (40.0, 10.0), (-10.0, -10.0), (0.0, 0.0)] {
            let (machine, transition) = drawn(dx, dy);
            assert_eq!(transition, Transition::Discarded);
            assert!(machine.is_idle());
            assert!(machine.draft().is_none());
        }
    }

    #[test]
    fn test_large_drag_awaits_label() {
        let (machine, transition) = drawn(-40.0, 30.0);
        assert_eq!(transition, Transition::AwaitingLabel);
        assert!(machine.is_pending_label());
        assert_eq!(machine.draft().map(|r| r.width), Some(-40.0));
    }

    #[test]
    fn test_confirm_trims_label_and_normalizes() {
        let (mut machine, _) = drawn(100.0, 40.0);
        machine.label_mut().unwrap().push_str("  dog ");

        match machine.confirm(container()) {
            CommitOutcome::Committed(annotation) => {
                assert_eq!(annotation.label, "dog");
                assert!((annotation.geometry.x_center - 0.5).abs() < 1e-9);
                assert!((annotation.geometry.y_center - 0.7).abs() < 1e-9);
                assert!((annotation.geometry.width - 0.5).abs() < 1e-9);
                assert!((annotation.geometry.height - 0.4).abs() < 1e-9);
            }
            other => panic!("expected commit, got {:?}", other),
        }
        assert!(machine.is_idle());
    }

    #[test]
    fn test_blank_label_cancels() {
        let (mut machine, _) = drawn(50.0, 50.0);
        machine.label_mut().unwrap().push_str("   ");
        assert_eq!(machine.confirm(container()), CommitOutcome::Cancelled);
        assert!(machine.is_idle());
        assert!(machine.draft().is_none());
    }

    #[test]
    fn test_unmeasured_container_keeps_prompt_open() {
        let (mut machine, _) = drawn(50.0, 50.0);
        machine.label_mut().unwrap().push_str("cat");
        assert_eq!(machine.confirm(ContainerSize::default()), CommitOutcome::Unmeasured);
        assert!(machine.is_pending_label());
    }

    #[test]
    fn test_pointer_down_ignored_while_labeling() {
        let (mut machine, _) = drawn(50.0, 50.0);
        assert!(!machine.pointer_down(PixelPoint::new(0.0, 0.0)));
        machine.pointer_move(PixelPoint::new(190.0, 90.0));
        assert_eq!(machine.draft().map(|r| r.x), Some(50.0));
        assert_eq!(machine.pointer_up(), Transition::Ignored);
    }

    #[test]
    fn test_confirm_without_prompt() {
        let mut machine = DrawMachine::new();
        assert_eq!(machine.confirm(container()), CommitOutcome::NotPending);
        machine.cancel();
        assert!(machine.is_idle());
    }
}
