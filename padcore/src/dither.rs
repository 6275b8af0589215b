//! Dithered overlays for selection and hover.
//!
//! A checkerboard of single pixels keeps the icon and label under a
//! highlight readable, where an opaque fill would hide them.

use egui::{Color32, Painter, Pos2, Rect};

use crate::theme::PadColors;

/// Draw a checkerboard over `rect`.
/// `density` controls spacing: 1 = every other pixel, 2+ = sparser.
pub fn draw_dither_rect(painter: &Painter, rect: Rect, color: Color32, density: u32) {
    let density = density.max(1) as i32;

    // Bounds are clamped inward once so every pixel in the loop lies inside `rect`.
    let x0 = rect.min.x.ceil() as i32;
    let y0 = rect.min.y.ceil() as i32;
    let x1 = rect.max.x.floor() as i32;
    let y1 = rect.max.y.floor() as i32;

    if x0 >= x1 || y0 >= y1 {
        return;
    }

    let y_step = density;
    let x_step = density * 2;
    let pixel = egui::Vec2::splat(1.0);

    let mut y = y0;
    while y < y1 {
        let row_offset = if ((y - y0) / density) % 2 == 0 { 0 } else { density };
        let mut x = x0 + row_offset;
        while x < x1 {
            painter.rect_filled(
                Rect::from_min_size(Pos2::new(x as f32, y as f32), pixel),
                0.0,
                color,
            );
            x += x_step;
        }
        y += y_step;
    }
}

/// Selected entry: tinted fill plus a tight accent checkerboard.
pub fn draw_dither_selection(painter: &Painter, rect: Rect) {
    painter.rect_filled(rect, 0.0, PadColors::ACCENT.gamma_multiply(0.25));
    draw_dither_rect(painter, rect, PadColors::ACCENT, 1);
}

/// Hovered entry: sparse checkerboard only.
pub fn draw_dither_hover(painter: &Painter, rect: Rect) {
    draw_dither_rect(painter, rect, PadColors::OUTLINE, 2);
}

/// Folder under a drag: outlined and filled so the drop target is obvious.
pub fn draw_drop_target(painter: &Painter, rect: Rect) {
    painter.rect_filled(rect, 0.0, PadColors::ACCENT.gamma_multiply(0.4));
    painter.rect_stroke(rect, 0.0, egui::Stroke::new(1.0, PadColors::ACCENT));
}
