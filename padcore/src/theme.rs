//! Launchpad theme
//!
//! A dark launcher palette: near-black panels, light ink, one accent.
//! Square corners and 1px outlines everywhere.

use egui::{Color32, FontFamily, FontId, Rounding, Stroke, Style, TextStyle, Visuals};

/// Palette shared by every Launchpad surface.
pub struct PadColors;

impl PadColors {
    pub const PANEL: Color32 = Color32::from_rgb(24, 24, 27);
    pub const SURFACE: Color32 = Color32::from_rgb(39, 39, 42);
    pub const INK: Color32 = Color32::from_rgb(244, 244, 245);
    pub const MUTED: Color32 = Color32::from_rgb(161, 161, 170);
    pub const OUTLINE: Color32 = Color32::from_rgb(63, 63, 70);
    pub const ACCENT: Color32 = Color32::from_rgb(59, 130, 246);
    pub const DANGER: Color32 = Color32::from_rgb(239, 68, 68);
}

/// Theme configuration for Launchpad windows
pub struct PadTheme {
    pub font_size_body: f32,
    pub font_size_heading: f32,
    pub font_size_small: f32,
    pub window_padding: f32,
    pub item_spacing: f32,
}

impl Default for PadTheme {
    fn default() -> Self {
        Self {
            font_size_body: 14.0,
            font_size_heading: 20.0,
            font_size_small: 11.0,
            window_padding: 8.0,
            item_spacing: 4.0,
        }
    }
}

impl PadTheme {
    /// Apply the theme to an egui context
    pub fn apply(&self, ctx: &egui::Context) {
        let mut style = Style::default();

        style.text_styles = [
            (TextStyle::Small, FontId::new(self.font_size_small, FontFamily::Proportional)),
            (TextStyle::Body, FontId::new(self.font_size_body, FontFamily::Proportional)),
            (TextStyle::Button, FontId::new(self.font_size_body, FontFamily::Proportional)),
            (TextStyle::Heading, FontId::new(self.font_size_heading, FontFamily::Proportional)),
            (TextStyle::Monospace, FontId::new(self.font_size_body, FontFamily::Monospace)),
        ]
        .into();

        let mut visuals = Visuals::dark();

        visuals.window_fill = PadColors::PANEL;
        visuals.panel_fill = PadColors::PANEL;
        visuals.faint_bg_color = PadColors::SURFACE;
        visuals.extreme_bg_color = PadColors::SURFACE;
        visuals.override_text_color = Some(PadColors::INK);

        visuals.window_rounding = Rounding::ZERO;
        visuals.menu_rounding = Rounding::ZERO;
        visuals.window_stroke = Stroke::new(1.0, PadColors::OUTLINE);

        let flat = |ws: &mut egui::style::WidgetVisuals, fill: Color32| {
            ws.bg_fill = fill;
            ws.weak_bg_fill = fill;
            ws.bg_stroke = Stroke::new(1.0, PadColors::OUTLINE);
            ws.fg_stroke = Stroke::new(1.0, PadColors::INK);
            ws.rounding = Rounding::ZERO;
        };
        flat(&mut visuals.widgets.noninteractive, PadColors::PANEL);
        flat(&mut visuals.widgets.inactive, PadColors::SURFACE);
        flat(&mut visuals.widgets.hovered, PadColors::OUTLINE);
        flat(&mut visuals.widgets.active, PadColors::ACCENT);
        flat(&mut visuals.widgets.open, PadColors::OUTLINE);

        visuals.window_shadow = egui::epaint::Shadow::NONE;
        visuals.popup_shadow = egui::epaint::Shadow::NONE;

        visuals.selection.bg_fill = PadColors::ACCENT;
        visuals.selection.stroke = Stroke::new(1.0, PadColors::INK);

        style.visuals = visuals;

        style.spacing.window_margin = egui::Margin::same(self.window_padding);
        style.spacing.item_spacing = egui::vec2(self.item_spacing, self.item_spacing);
        style.spacing.button_padding = egui::vec2(8.0, 4.0);

        ctx.set_style(style);
    }

    /// Outer frame for the frameless window
    pub fn window_frame() -> egui::Frame {
        egui::Frame::none()
            .fill(PadColors::PANEL)
            .stroke(Stroke::new(1.0, PadColors::OUTLINE))
            .inner_margin(egui::Margin::same(1.0))
    }
}

/// Menu bar styling helper
pub fn menu_bar<R>(ui: &mut egui::Ui, add_contents: impl FnOnce(&mut egui::Ui) -> R) -> egui::InnerResponse<R> {
    let frame_resp = egui::Frame::none()
        .fill(PadColors::SURFACE)
        .stroke(Stroke::new(1.0, PadColors::OUTLINE))
        .inner_margin(egui::Margin::symmetric(4.0, 2.0))
        .show(ui, |ui| ui.horizontal(add_contents).inner);
    egui::InnerResponse {
        inner: frame_resp.inner,
        response: frame_resp.response,
    }
}

/// Strip Tab and Cmd+/- key events so they don't cycle focus or zoom.
/// Call at the start of `update()`.
pub fn consume_special_keys(ctx: &egui::Context) {
    ctx.input_mut(|i| {
        i.events.retain(|event| match event {
            egui::Event::Key { key: egui::Key::Tab, .. } => false,
            egui::Event::Key { key, modifiers, .. } => !(modifiers.command
                && matches!(key, egui::Key::Plus | egui::Key::Minus | egui::Key::Equals)),
            _ => true,
        });
    });
}
