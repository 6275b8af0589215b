//! Repaint scheduling for event-driven windows
//!
//! egui only wakes on input unless asked otherwise. Launchpad windows have
//! a few things that change without input: a status message expiring, a
//! debounced search becoming due, a background listing arriving.
//!
//! `RepaintController` collects those wake-up requests during a frame and
//! hands egui a single one at the end of it:
//!
//! 1. **Immediate**: state changed off the input path (`mark_needs_repaint`).
//! 2. **Deadline**: something becomes due later (`schedule_in`). Only the
//!    earliest deadline is kept.
//! 3. **Idle**: nothing pending. egui sleeps until the next input.

use std::time::{Duration, Instant};

/// Why the current frame is being painted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepaintReason {
    /// First frame.
    Init,
    /// User input (pointer, key, scroll).
    Input,
    /// A deadline or one-shot request fired.
    Scheduled,
}

/// Controls when the egui context should request repaints.
///
/// Call [`RepaintController::begin_frame`] at the top of `update()` and
/// [`RepaintController::end_frame`] at the bottom.
pub struct RepaintController {
    needs_repaint: bool,
    deadline: Option<Instant>,
    frame: u64,
    reason: RepaintReason,
}

impl Default for RepaintController {
    fn default() -> Self {
        Self::new()
    }
}

impl RepaintController {
    pub fn new() -> Self {
        Self {
            needs_repaint: false,
            deadline: None,
            frame: 0,
            reason: RepaintReason::Init,
        }
    }

    /// Request a repaint as soon as possible.
    pub fn mark_needs_repaint(&mut self) {
        self.needs_repaint = true;
    }

    /// Request a repaint once `delay` has elapsed. Earlier requests win.
    pub fn schedule_in(&mut self, delay: Duration) {
        let at = Instant::now() + delay;
        self.deadline = Some(match self.deadline {
            Some(existing) if existing <= at => existing,
            _ => at,
        });
    }

    pub fn reason(&self) -> RepaintReason {
        self.reason
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Call at the **start** of `update()`.
    pub fn begin_frame(&mut self, ctx: &egui::Context) {
        let had_input = ctx.input(|i| {
            !i.events.is_empty()
                || i.pointer.any_pressed()
                || i.pointer.any_released()
                || i.raw_scroll_delta != egui::Vec2::ZERO
                || i.pointer.is_moving()
        });

        self.reason = if self.frame == 0 {
            RepaintReason::Init
        } else if had_input {
            RepaintReason::Input
        } else {
            RepaintReason::Scheduled
        };

        self.needs_repaint = false;
        if self.deadline.is_some_and(|d| d <= Instant::now()) {
            self.deadline = None;
        }
    }

    /// Call at the **end** of `update()`.
    pub fn end_frame(&mut self, ctx: &egui::Context) {
        self.frame += 1;

        if self.needs_repaint {
            ctx.request_repaint();
        } else if let Some(deadline) = self.deadline {
            ctx.request_repaint_after(deadline.saturating_duration_since(Instant::now()));
        }
    }
}
