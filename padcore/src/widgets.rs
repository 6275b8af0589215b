//! Custom widgets: flat, outlined, accent on press

use egui::{Response, Ui, Widget};

use crate::dither;
use crate::theme::PadColors;

/// Action returned by window control buttons
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WindowAction {
    None,
    Close,
    Minimize,
}

/// Draw close and minimize buttons for the frameless window.
/// Call this at the start of your `menu_bar` closure.
pub fn window_control_buttons(ui: &mut Ui) -> WindowAction {
    let btn_size = egui::vec2(14.0, 14.0);
    let mut action = WindowAction::None;
    let stroke = egui::Stroke::new(1.0, PadColors::INK);

    let (close_rect, close_resp) = ui.allocate_exact_size(btn_size, egui::Sense::click());
    if ui.is_rect_visible(close_rect) {
        let painter = ui.painter();
        let fill = if close_resp.hovered() { PadColors::DANGER } else { PadColors::SURFACE };
        painter.rect_filled(close_rect, 0.0, fill);
        painter.rect_stroke(close_rect, 0.0, egui::Stroke::new(1.0, PadColors::OUTLINE));
        let m = 3.0;
        painter.line_segment(
            [
                close_rect.left_top() + egui::vec2(m, m),
                close_rect.right_bottom() - egui::vec2(m, m),
            ],
            stroke,
        );
        painter.line_segment(
            [
                close_rect.right_top() + egui::vec2(-m, m),
                close_rect.left_bottom() + egui::vec2(m, -m),
            ],
            stroke,
        );
    }
    if close_resp.clicked() {
        action = WindowAction::Close;
    }

    ui.add_space(2.0);

    let (min_rect, min_resp) = ui.allocate_exact_size(btn_size, egui::Sense::click());
    if ui.is_rect_visible(min_rect) {
        let painter = ui.painter();
        painter.rect_filled(min_rect, 0.0, PadColors::SURFACE);
        painter.rect_stroke(min_rect, 0.0, egui::Stroke::new(1.0, PadColors::OUTLINE));
        if min_resp.hovered() {
            dither::draw_dither_hover(painter, min_rect);
        }
        let m = 3.0;
        painter.line_segment(
            [
                egui::pos2(min_rect.left() + m, min_rect.center().y),
                egui::pos2(min_rect.right() - m, min_rect.center().y),
            ],
            stroke,
        );
    }
    if min_resp.clicked() {
        action = WindowAction::Minimize;
    }

    ui.add_space(4.0);
    toolbar_separator(ui);

    action
}

/// Toolbar button: flat, 1px outline, disabled state drawn muted.
pub struct ToolButton<'a> {
    text: &'a str,
    enabled: bool,
    selected: bool,
}

impl<'a> ToolButton<'a> {
    pub fn new(text: &'a str) -> Self {
        Self { text, enabled: true, selected: false }
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn selected(mut self, selected: bool) -> Self {
        self.selected = selected;
        self
    }
}

impl<'a> Widget for ToolButton<'a> {
    fn ui(self, ui: &mut Ui) -> Response {
        let font = egui::FontId::proportional(13.0);
        let galley = ui.painter().layout_no_wrap(self.text.to_owned(), font.clone(), PadColors::INK);
        let desired_size = egui::vec2(
            galley.size().x + 16.0,
            ui.spacing().interact_size.y,
        );
        let sense = if self.enabled { egui::Sense::click() } else { egui::Sense::hover() };
        let (rect, response) = ui.allocate_exact_size(desired_size, sense);

        if ui.is_rect_visible(rect) {
            let painter = ui.painter();
            painter.rect_filled(rect, 0.0, PadColors::SURFACE);
            painter.rect_stroke(rect, 0.0, egui::Stroke::new(1.0, PadColors::OUTLINE));

            let pressed = self.enabled && (response.is_pointer_button_down_on() || self.selected);
            if pressed {
                dither::draw_dither_selection(painter, rect);
            } else if self.enabled && response.hovered() {
                dither::draw_dither_hover(painter, rect);
            }

            let color = if self.enabled { PadColors::INK } else { PadColors::MUTED.gamma_multiply(0.6) };
            painter.text(rect.center(), egui::Align2::CENTER_CENTER, self.text, font, color);
        }

        response
    }
}

/// Toolbar separator (vertical 1px line)
pub fn toolbar_separator(ui: &mut Ui) {
    let height = ui.spacing().interact_size.y;
    let (rect, _) = ui.allocate_exact_size(egui::vec2(8.0, height), egui::Sense::hover());

    if ui.is_rect_visible(rect) {
        ui.painter().vline(
            rect.center().x,
            rect.y_range(),
            egui::Stroke::new(1.0, PadColors::OUTLINE),
        );
    }
}

/// Status bar: surface fill, 1px outline, optional emphasis for errors.
pub fn status_bar(ui: &mut Ui, text: &str, is_error: bool) {
    egui::Frame::none()
        .fill(PadColors::SURFACE)
        .stroke(egui::Stroke::new(1.0, PadColors::OUTLINE))
        .inner_margin(egui::Margin::symmetric(8.0, 2.0))
        .show(ui, |ui| {
            let color = if is_error { PadColors::DANGER } else { PadColors::MUTED };
            ui.label(egui::RichText::new(text).color(color).small());
        });
}
