//! Directory View: the egui window around [`Explorer`].
//!
//! Rendering never mutates the explorer directly. Widgets push an
//! [`Action`] and the queue is applied once the frame's panels are laid
//! out, so the listing being drawn stays stable for the whole frame.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use egui::{Align2, Context, Event, FontId, Key, PointerButton, Pos2, Rect, Sense, Stroke, Vec2};
use padcore::dither;
use padcore::repaint::RepaintController;
use padcore::safety::ellipsize;
use padcore::settings::{Settings, ViewMode};
use padcore::theme::{consume_special_keys, menu_bar, PadColors, PadTheme};
use padcore::widgets::{status_bar, toolbar_separator, window_control_buttons, ToolButton, WindowAction};

use crate::explorer::{Explorer, ExplorerEvent, KnownFolder};
use crate::gateway::{DirectoryEntry, FsGateway, Location};

const GRID_CELL: Vec2 = Vec2::new(96.0, 84.0);
const ROW_HEIGHT: f32 = 20.0;
const SIZE_COL: f32 = 80.0;
const MODIFIED_COL: f32 = 120.0;

enum Action {
    Click(PathBuf, bool),
    Open(PathBuf),
    BeginDrag(PathBuf),
    Drop(DirectoryEntry),
    StartRename(PathBuf),
    CommitRename,
    CancelRename,
    Navigate(Location),
    KnownFolder(KnownFolder),
    Back,
    Forward,
    Up,
    Refresh,
    Copy,
    Cut,
    Paste,
    AskDelete,
    ConfirmDelete,
    CancelDelete,
    NewFolder,
    NewFile,
    Undo,
    Redo,
    SelectAll,
    ClearSelection,
    SetView(ViewMode),
    ToggleHidden,
}

struct InlineRename {
    path: PathBuf,
    text: String,
    focus: bool,
}

pub struct PadFilesApp {
    explorer: Explorer,
    settings: Settings,
    search_input: String,
    renaming: Option<InlineRename>,
    confirm_delete: bool,
    actions: Vec<Action>,
    repaint: RepaintController,
}

impl PadFilesApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, gateway: Arc<dyn FsGateway>, settings: Settings, start: Location) -> Self {
        let explorer = Explorer::new(gateway, &settings, start);
        Self {
            explorer,
            settings,
            search_input: String::new(),
            renaming: None,
            confirm_delete: false,
            actions: Vec::new(),
            repaint: RepaintController::new(),
        }
    }

    fn push(&mut self, action: Action) {
        self.actions.push(action);
    }

    fn save_settings(&self) {
        if let Err(e) = self.settings.save() {
            tracing::warn!("settings not saved: {e}");
        }
    }

    fn apply(&mut self, ctx: &Context, action: Action) {
        match action {
            Action::Click(path, ctrl) => self.explorer.click_entry(&path, ctrl),
            Action::Open(path) => self.explorer.open_entry(&path),
            Action::BeginDrag(path) => self.explorer.begin_drag(&path),
            Action::Drop(target) => self.explorer.drop_on(&target),
            Action::StartRename(path) => {
                let text = crate::gateway::display_name(&path);
                self.renaming = Some(InlineRename { path, text, focus: true });
            }
            Action::CommitRename => {
                if let Some(rename) = self.renaming.take() {
                    self.explorer.rename(&rename.path, &rename.text);
                }
            }
            Action::CancelRename => self.renaming = None,
            Action::Navigate(loc) => self.explorer.navigate(loc),
            Action::KnownFolder(folder) => self.explorer.go_to_known_folder(folder),
            Action::Back => self.explorer.back(),
            Action::Forward => self.explorer.forward(),
            Action::Up => self.explorer.up(),
            Action::Refresh => self.explorer.reload(),
            Action::Copy => {
                self.explorer.copy_selection();
                self.mirror_clipboard(ctx);
            }
            Action::Cut => {
                self.explorer.cut_selection();
                self.mirror_clipboard(ctx);
            }
            Action::Paste => self.explorer.paste(),
            Action::AskDelete => {
                if !self.explorer.selection().is_empty() {
                    self.confirm_delete = true;
                }
            }
            Action::ConfirmDelete => {
                self.confirm_delete = false;
                self.explorer.delete_selected();
            }
            Action::CancelDelete => self.confirm_delete = false,
            Action::NewFolder => self.explorer.new_folder(),
            Action::NewFile => self.explorer.new_text_file(),
            Action::Undo => self.explorer.undo(),
            Action::Redo => self.explorer.redo(),
            Action::SelectAll => self.explorer.select_all(),
            Action::ClearSelection => self.explorer.clear_selection(),
            Action::SetView(mode) => {
                if self.settings.view_mode != mode {
                    self.settings.view_mode = mode;
                    self.save_settings();
                }
            }
            Action::ToggleHidden => {
                self.settings.show_hidden = !self.settings.show_hidden;
                self.explorer.set_show_hidden(self.settings.show_hidden);
                self.save_settings();
            }
        }
    }

    /// Put the clipboard paths on the system clipboard too, so the paste
    /// shortcut fires even when it held nothing before.
    fn mirror_clipboard(&self, ctx: &Context) {
        if let Some(clip) = self.explorer.clipboard() {
            let text = clip.paths.iter().map(|p| p.to_string_lossy()).collect::<Vec<_>>().join("\n");
            ctx.output_mut(|o| o.copied_text = text);
        }
    }

    fn handle_keys(&mut self, ctx: &Context) {
        consume_special_keys(ctx);

        let (extra_back, extra_forward) = ctx.input(|i| {
            (i.pointer.button_pressed(PointerButton::Extra1), i.pointer.button_pressed(PointerButton::Extra2))
        });
        if extra_back {
            self.push(Action::Back);
        }
        if extra_forward {
            self.push(Action::Forward);
        }

        if self.confirm_delete {
            let (enter, escape) = ctx.input(|i| (i.key_pressed(Key::Enter), i.key_pressed(Key::Escape)));
            if enter {
                self.push(Action::ConfirmDelete);
            } else if escape {
                self.push(Action::CancelDelete);
            }
            return;
        }
        // Text fields (rename, search) keep their keys.
        if self.renaming.is_some() || ctx.memory(|m| m.focused().is_some()) {
            return;
        }

        let selected: Vec<PathBuf> = self.explorer.selection().paths().to_vec();
        let actions = &mut self.actions;
        ctx.input(|i| {
            for event in &i.events {
                match event {
                    Event::Copy if !selected.is_empty() => actions.push(Action::Copy),
                    Event::Cut if !selected.is_empty() => actions.push(Action::Cut),
                    Event::Paste(_) => actions.push(Action::Paste),
                    Event::Key { key, pressed: true, modifiers, .. } => {
                        if modifiers.command {
                            match key {
                                Key::Z => actions.push(Action::Undo),
                                Key::Y => actions.push(Action::Redo),
                                Key::A => actions.push(Action::SelectAll),
                                Key::D => actions.push(Action::AskDelete),
                                _ => {}
                            }
                        } else if modifiers.alt {
                            match key {
                                Key::ArrowLeft => actions.push(Action::Back),
                                Key::ArrowRight => actions.push(Action::Forward),
                                Key::ArrowUp => actions.push(Action::Up),
                                _ => {}
                            }
                        } else {
                            match key {
                                Key::Delete => actions.push(Action::AskDelete),
                                Key::F2 if selected.len() == 1 => actions.push(Action::StartRename(selected[0].clone())),
                                Key::F5 => actions.push(Action::Refresh),
                                Key::Enter => {
                                    if let Some(first) = selected.first() {
                                        actions.push(Action::Open(first.clone()));
                                    }
                                }
                                Key::Backspace => actions.push(Action::Back),
                                Key::Escape => actions.push(Action::ClearSelection),
                                Key::Num1 => actions.push(Action::SetView(ViewMode::Grid)),
                                Key::Num2 => actions.push(Action::SetView(ViewMode::List)),
                                _ => {}
                            }
                        }
                    }
                    _ => {}
                }
            }
        });
    }

    fn render_menu(&mut self, ui: &mut egui::Ui) -> WindowAction {
        let has_selection = !self.explorer.selection().is_empty();
        let single = self.explorer.selection().len() == 1;
        let can_paste = self.explorer.clipboard().is_some() && !self.explorer.location().is_my_pc();
        let in_dir = !self.explorer.location().is_my_pc();
        let can_undo = self.explorer.ledger().can_undo();
        let can_redo = self.explorer.ledger().can_redo();
        let show_hidden = self.settings.show_hidden;
        let first = self.explorer.selection().paths().first().cloned();

        let mut win_action = WindowAction::None;
        menu_bar(ui, |ui| {
            win_action = window_control_buttons(ui);
            ui.menu_button("file", |ui| {
                if ui.add_enabled(in_dir, egui::Button::new("new folder")).clicked() {
                    self.push(Action::NewFolder);
                    ui.close_menu();
                }
                if ui.add_enabled(in_dir, egui::Button::new("new text document")).clicked() {
                    self.push(Action::NewFile);
                    ui.close_menu();
                }
                ui.separator();
                if ui.add_enabled(has_selection, egui::Button::new("delete  ⌦")).clicked() {
                    self.push(Action::AskDelete);
                    ui.close_menu();
                }
            });
            ui.menu_button("edit", |ui| {
                if ui.add_enabled(can_undo, egui::Button::new("undo  ctrl+z")).clicked() {
                    self.push(Action::Undo);
                    ui.close_menu();
                }
                if ui.add_enabled(can_redo, egui::Button::new("redo  ctrl+y")).clicked() {
                    self.push(Action::Redo);
                    ui.close_menu();
                }
                ui.separator();
                if ui.add_enabled(has_selection, egui::Button::new("cut  ctrl+x")).clicked() {
                    self.push(Action::Cut);
                    ui.close_menu();
                }
                if ui.add_enabled(has_selection, egui::Button::new("copy  ctrl+c")).clicked() {
                    self.push(Action::Copy);
                    ui.close_menu();
                }
                if ui.add_enabled(can_paste, egui::Button::new("paste  ctrl+v")).clicked() {
                    self.push(Action::Paste);
                    ui.close_menu();
                }
                ui.separator();
                if ui.add_enabled(single, egui::Button::new("rename  f2")).clicked() {
                    if let Some(path) = first.clone() {
                        self.push(Action::StartRename(path));
                    }
                    ui.close_menu();
                }
                if ui.button("select all  ctrl+a").clicked() {
                    self.push(Action::SelectAll);
                    ui.close_menu();
                }
            });
            ui.menu_button("view", |ui| {
                if ui.button("grid  1").clicked() {
                    self.push(Action::SetView(ViewMode::Grid));
                    ui.close_menu();
                }
                if ui.button("list  2").clicked() {
                    self.push(Action::SetView(ViewMode::List));
                    ui.close_menu();
                }
                ui.separator();
                if ui.button(format!("{} show hidden", if show_hidden { "✓" } else { " " })).clicked() {
                    self.push(Action::ToggleHidden);
                    ui.close_menu();
                }
                if ui.button("refresh  f5").clicked() {
                    self.push(Action::Refresh);
                    ui.close_menu();
                }
            });
            ui.menu_button("go", |ui| {
                if ui.button("back").clicked() {
                    self.push(Action::Back);
                    ui.close_menu();
                }
                if ui.button("forward").clicked() {
                    self.push(Action::Forward);
                    ui.close_menu();
                }
                if ui.button("up").clicked() {
                    self.push(Action::Up);
                    ui.close_menu();
                }
                ui.separator();
                for folder in KnownFolder::ALL {
                    if ui.button(folder.label()).clicked() {
                        self.push(Action::KnownFolder(folder));
                        ui.close_menu();
                    }
                }
            });

            // The rest of the bar moves the frameless window.
            let rest = ui.available_size();
            let (_, drag) = ui.allocate_exact_size(rest, Sense::click_and_drag());
            if drag.drag_started() {
                ui.ctx().send_viewport_cmd(egui::ViewportCommand::StartDrag);
            }
        });
        win_action
    }

    fn render_toolbar(&mut self, ui: &mut egui::Ui) {
        let history = self.explorer.history();
        let can_back = history.can_go_back();
        let can_forward = history.can_go_forward();
        let can_up = self.explorer.location().parent().is_some();
        let in_dir = !self.explorer.location().is_my_pc();
        let has_selection = !self.explorer.selection().is_empty();
        let single = self.explorer.selection().len() == 1;
        let can_paste = self.explorer.clipboard().is_some() && in_dir;
        let can_undo = self.explorer.ledger().can_undo();
        let can_redo = self.explorer.ledger().can_redo();
        let first = self.explorer.selection().paths().first().cloned();
        let view = self.settings.view_mode;

        ui.horizontal(|ui| {
            if ui.add(ToolButton::new("◀").enabled(can_back)).on_hover_text("back").clicked() {
                self.push(Action::Back);
            }
            if ui.add(ToolButton::new("▶").enabled(can_forward)).on_hover_text("forward").clicked() {
                self.push(Action::Forward);
            }
            if ui.add(ToolButton::new("▲").enabled(can_up)).on_hover_text("up").clicked() {
                self.push(Action::Up);
            }
            if ui.add(ToolButton::new("⟳")).on_hover_text("refresh").clicked() {
                self.push(Action::Refresh);
            }
            toolbar_separator(ui);
            if ui.add(ToolButton::new("+ folder").enabled(in_dir)).clicked() {
                self.push(Action::NewFolder);
            }
            if ui.add(ToolButton::new("+ file").enabled(in_dir)).clicked() {
                self.push(Action::NewFile);
            }
            toolbar_separator(ui);
            if ui.add(ToolButton::new("cut").enabled(has_selection)).clicked() {
                self.push(Action::Cut);
            }
            if ui.add(ToolButton::new("copy").enabled(has_selection)).clicked() {
                self.push(Action::Copy);
            }
            if ui.add(ToolButton::new("paste").enabled(can_paste)).clicked() {
                self.push(Action::Paste);
            }
            if ui.add(ToolButton::new("rename").enabled(single)).clicked() {
                if let Some(path) = first {
                    self.push(Action::StartRename(path));
                }
            }
            if ui.add(ToolButton::new("delete").enabled(has_selection)).clicked() {
                self.push(Action::AskDelete);
            }
            toolbar_separator(ui);
            if ui.add(ToolButton::new("undo").enabled(can_undo)).clicked() {
                self.push(Action::Undo);
            }
            if ui.add(ToolButton::new("redo").enabled(can_redo)).clicked() {
                self.push(Action::Redo);
            }
            toolbar_separator(ui);
            if ui.add(ToolButton::new("grid").selected(view == ViewMode::Grid)).clicked() {
                self.push(Action::SetView(ViewMode::Grid));
            }
            if ui.add(ToolButton::new("list").selected(view == ViewMode::List)).clicked() {
                self.push(Action::SetView(ViewMode::List));
            }
        });
    }

    fn render_breadcrumb(&mut self, ui: &mut egui::Ui) {
        let location = self.explorer.location().clone();
        ui.horizontal(|ui| {
            if ui.add(ToolButton::new("My PC").selected(location.is_my_pc())).clicked() {
                self.push(Action::Navigate(Location::MyPc));
            }
            if let Location::Dir(path) = &location {
                let mut partial = PathBuf::new();
                for component in path.components() {
                    partial.push(component);
                    let label = component.as_os_str().to_string_lossy().to_string();
                    ui.label("›");
                    if ui.add(ToolButton::new(&label).selected(partial == *path)).clicked() {
                        self.push(Action::Navigate(Location::Dir(partial.clone())));
                    }
                }
            }

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                let edit = egui::TextEdit::singleline(&mut self.search_input)
                    .hint_text("search")
                    .desired_width(180.0);
                if ui.add(edit).changed() {
                    self.explorer.set_search_query(&self.search_input, Instant::now());
                }
            });
        });
    }

    fn render_quick_access(&mut self, ui: &mut egui::Ui) {
        let current = self.explorer.location().clone();
        ui.add_space(4.0);
        for folder in KnownFolder::ALL {
            let selected = folder.location().as_ref() == Some(&current);
            let resp = ui.add_sized(
                [ui.available_width(), ROW_HEIGHT],
                ToolButton::new(folder.label()).selected(selected),
            );
            if resp.clicked() {
                self.push(Action::KnownFolder(folder));
            }
        }
    }

    fn render_list_header(&self, ui: &mut egui::Ui) {
        let width = ui.available_width();
        let (rect, _) = ui.allocate_exact_size(egui::vec2(width, ROW_HEIGHT), Sense::hover());
        let painter = ui.painter();
        painter.rect_filled(rect, 0.0, PadColors::SURFACE);
        painter.rect_stroke(rect, 0.0, Stroke::new(1.0, PadColors::OUTLINE));
        let font = FontId::proportional(12.0);
        let y = rect.center().y;
        painter.text(egui::pos2(rect.min.x + 24.0, y), Align2::LEFT_CENTER, "name", font.clone(), PadColors::MUTED);
        painter.text(
            egui::pos2(rect.max.x - SIZE_COL - MODIFIED_COL, y),
            Align2::LEFT_CENTER,
            "size",
            font.clone(),
            PadColors::MUTED,
        );
        painter.text(egui::pos2(rect.max.x - MODIFIED_COL, y), Align2::LEFT_CENTER, "modified", font, PadColors::MUTED);
    }

    fn render_entries(&mut self, ui: &mut egui::Ui) {
        let entries = self.explorer.entries().to_vec();
        let view = self.settings.view_mode;
        if view == ViewMode::List {
            self.render_list_header(ui);
        }

        if entries.is_empty() {
            let text = if self.explorer.is_searching() {
                "searching..."
            } else if !self.explorer.search_query().is_empty() {
                "no matches"
            } else {
                "this folder is empty"
            };
            ui.add_space(24.0);
            ui.vertical_centered(|ui| ui.label(egui::RichText::new(text).color(PadColors::MUTED)));
        }

        let (pointer, pressed, down, released, ctrl) = ui.input(|i| {
            (
                i.pointer.latest_pos(),
                i.pointer.primary_pressed(),
                i.pointer.primary_down(),
                i.pointer.primary_released(),
                i.modifiers.command,
            )
        });

        egui::ScrollArea::vertical()
            .auto_shrink([false, false])
            .drag_to_scroll(false)
            .show(ui, |ui| {
                // Content coordinates are relative to this origin, which moves
                // with the scroll offset.
                let origin = ui.min_rect().min.to_vec2();
                let width = ui.available_width();
                let (cols, cell) = match view {
                    ViewMode::Grid => (((width / GRID_CELL.x) as usize).max(1), GRID_CELL),
                    ViewMode::List => (1, egui::vec2(width, ROW_HEIGHT)),
                };
                let rows = (entries.len() + cols - 1) / cols;
                let height = (rows as f32 * cell.y).max(ui.available_height());
                let (area, _) = ui.allocate_exact_size(egui::vec2(width, height), Sense::hover());

                let mut item_rects = Vec::with_capacity(entries.len());
                let mut on_item = false;
                for (idx, entry) in entries.iter().enumerate() {
                    let offset = egui::vec2((idx % cols) as f32 * cell.x, (idx / cols) as f32 * cell.y);
                    let rect = Rect::from_min_size(area.min + offset, cell).shrink(2.0);
                    item_rects.push((entry.path.clone(), rect.translate(-origin)));
                    if pointer.is_some_and(|p| rect.contains(p)) {
                        on_item = true;
                    }
                    if !ui.is_rect_visible(rect) {
                        continue;
                    }
                    self.render_entry(ui, entry, rect, view, pointer, released);
                }

                if pressed && !on_item && self.explorer.drag().is_none() {
                    if let Some(p) = pointer.filter(|p| ui.clip_rect().contains(*p)) {
                        self.renaming = None;
                        self.explorer.begin_marquee(p - origin, ctrl);
                    }
                }
                if self.explorer.marquee().is_active() {
                    match pointer {
                        Some(p) => {
                            self.explorer.update_marquee(p - origin, down, &item_rects);
                        }
                        None if !down => {
                            self.explorer.end_marquee();
                        }
                        None => {}
                    }
                }
                if let Some(band) = self.explorer.marquee().rect() {
                    let band = band.translate(origin);
                    dither::draw_dither_rect(ui.painter(), band, PadColors::ACCENT.gamma_multiply(0.4), 2);
                    ui.painter().rect_stroke(band, 0.0, Stroke::new(1.0, PadColors::ACCENT));
                }
            });
    }

    fn render_entry(
        &mut self,
        ui: &mut egui::Ui,
        entry: &DirectoryEntry,
        rect: Rect,
        view: ViewMode,
        pointer: Option<Pos2>,
        released: bool,
    ) {
        let resp = ui.interact(rect, ui.id().with(&entry.path), Sense::click_and_drag());
        let selected = self.explorer.selection().contains(&entry.path);
        let is_cut = self
            .explorer
            .clipboard()
            .is_some_and(|c| c.mode == crate::clipboard::ClipboardMode::Cut && c.contains(&entry.path));
        let renaming = self.renaming.as_ref().is_some_and(|r| r.path == entry.path);

        let drop_ok = self.explorer.can_drop_on(entry) && pointer.is_some_and(|p| rect.contains(p));
        if drop_ok && released {
            self.push(Action::Drop(entry.clone()));
        }

        let painter = ui.painter();
        if drop_ok {
            dither::draw_drop_target(painter, rect);
        } else if selected {
            dither::draw_dither_selection(painter, rect);
        } else if resp.hovered() {
            dither::draw_dither_hover(painter, rect);
        }
        let ink = if is_cut { PadColors::MUTED } else { PadColors::INK };

        let name_rect = match view {
            ViewMode::Grid => {
                let icon = Rect::from_center_size(egui::pos2(rect.center().x, rect.min.y + 26.0), Vec2::splat(36.0));
                draw_icon(painter, icon, entry.is_dir, ink);
                let name_rect = Rect::from_min_max(egui::pos2(rect.min.x, rect.min.y + 50.0), rect.max);
                if !renaming {
                    painter.text(
                        egui::pos2(rect.center().x, rect.min.y + 62.0),
                        Align2::CENTER_CENTER,
                        ellipsize(&entry.name, 14),
                        FontId::proportional(11.0),
                        ink,
                    );
                }
                name_rect.shrink2(egui::vec2(2.0, 6.0))
            }
            ViewMode::List => {
                let icon = Rect::from_center_size(egui::pos2(rect.min.x + 12.0, rect.center().y), Vec2::splat(12.0));
                draw_icon(painter, icon, entry.is_dir, ink);
                let font = FontId::proportional(12.0);
                let y = rect.center().y;
                if !renaming {
                    painter.text(egui::pos2(rect.min.x + 24.0, y), Align2::LEFT_CENTER, &entry.name, font.clone(), ink);
                }
                let size = entry.size.map(format_size).unwrap_or_else(|| "—".into());
                painter.text(
                    egui::pos2(rect.max.x - SIZE_COL - MODIFIED_COL, y),
                    Align2::LEFT_CENTER,
                    size,
                    font.clone(),
                    PadColors::MUTED,
                );
                let modified = entry.modified.map(|t| t.format("%Y-%m-%d %H:%M").to_string()).unwrap_or_default();
                painter.text(egui::pos2(rect.max.x - MODIFIED_COL, y), Align2::LEFT_CENTER, modified, font, PadColors::MUTED);
                Rect::from_min_max(
                    egui::pos2(rect.min.x + 22.0, rect.min.y),
                    egui::pos2(rect.max.x - SIZE_COL - MODIFIED_COL - 4.0, rect.max.y),
                )
            }
        };

        if let Some(rename) = self.renaming.as_mut().filter(|r| r.path == entry.path) {
            let edit = ui.put(name_rect, egui::TextEdit::singleline(&mut rename.text).font(FontId::proportional(12.0)));
            if rename.focus {
                edit.request_focus();
                rename.focus = false;
            }
            if ui.input(|i| i.key_pressed(Key::Escape)) {
                self.actions.push(Action::CancelRename);
            } else if edit.lost_focus() {
                self.actions.push(Action::CommitRename);
            }
            return;
        }

        if resp.clicked() {
            let ctrl = ui.input(|i| i.modifiers.command);
            self.push(Action::Click(entry.path.clone(), ctrl));
        }
        if resp.double_clicked() {
            self.push(Action::Open(entry.path.clone()));
        }
        if resp.drag_started() && !self.explorer.marquee().is_active() {
            self.push(Action::BeginDrag(entry.path.clone()));
        }
        if resp.secondary_clicked() && !selected {
            self.push(Action::Click(entry.path.clone(), false));
        }

        let in_dir = !self.explorer.location().is_my_pc();
        let can_paste = self.explorer.clipboard().is_some() && in_dir;
        let path = entry.path.clone();
        let actions = &mut self.actions;
        resp.context_menu(|ui| {
            let mut pick = |ui: &mut egui::Ui, label: &str, enabled: bool, action: Action| {
                if ui.add_enabled(enabled, egui::Button::new(label)).clicked() {
                    actions.push(action);
                    ui.close_menu();
                }
            };
            pick(ui, "open", true, Action::Open(path.clone()));
            ui.separator();
            pick(ui, "cut", true, Action::Cut);
            pick(ui, "copy", true, Action::Copy);
            pick(ui, "paste", can_paste, Action::Paste);
            ui.separator();
            pick(ui, "rename", in_dir, Action::StartRename(path.clone()));
            pick(ui, "delete", in_dir, Action::AskDelete);
        });
    }

    fn render_delete_dialog(&mut self, ctx: &Context) {
        if !self.confirm_delete {
            return;
        }
        let count = self.explorer.selection().len();
        egui::Window::new("delete")
            .collapsible(false)
            .resizable(false)
            .anchor(Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                let what = if count == 1 {
                    format!("\"{}\"", self.explorer.selection().paths().first().map(|p| crate::gateway::display_name(p)).unwrap_or_default())
                } else {
                    format!("{} items", count)
                };
                ui.label(format!("Move {} to the recycle bin?", what));
                ui.label(egui::RichText::new("ctrl+z brings it back").color(PadColors::MUTED).small());
                ui.add_space(6.0);
                ui.horizontal(|ui| {
                    if ui.add(ToolButton::new("delete")).clicked() {
                        self.push(Action::ConfirmDelete);
                    }
                    if ui.add(ToolButton::new("cancel")).clicked() {
                        self.push(Action::CancelDelete);
                    }
                });
            });
    }

    fn render_drag_preview(&self, ctx: &Context) {
        let Some(drag) = self.explorer.drag() else {
            return;
        };
        let Some(pos) = ctx.input(|i| i.pointer.latest_pos()) else {
            return;
        };
        let label = match drag.paths() {
            [only] => ellipsize(&crate::gateway::display_name(only), 24),
            many => format!("{} items", many.len()),
        };
        let painter = ctx.layer_painter(egui::LayerId::new(egui::Order::Tooltip, egui::Id::new("drag_preview")));
        let galley_pos = pos + egui::vec2(14.0, 10.0);
        let rect = painter.text(galley_pos, Align2::LEFT_TOP, label, FontId::proportional(12.0), PadColors::INK);
        painter.rect_stroke(rect.expand(3.0), 0.0, Stroke::new(1.0, PadColors::OUTLINE));
    }

    fn status_text(&self) -> (String, bool) {
        if let Some(status) = self.explorer.status() {
            return (status.text.clone(), status.is_error);
        }
        let total = self.explorer.entries().len();
        let selected = self.explorer.selection().len();
        let mut text = if selected == 0 {
            format!("{} items", total)
        } else {
            format!("{} of {} selected", selected, total)
        };
        if self.explorer.is_searching() {
            text.push_str("  ·  searching...");
        }
        (text, false)
    }

    fn handle_events(&mut self, ctx: &Context) {
        for event in self.explorer.take_events() {
            match event {
                ExplorerEvent::PathChanged(loc) => {
                    ctx.send_viewport_cmd(egui::ViewportCommand::Title(format!("{} - files", loc)));
                }
                ExplorerEvent::Picked(path) => {
                    tracing::info!(path = %path.display(), "picked");
                }
            }
        }
    }
}

impl eframe::App for PadFilesApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        self.repaint.begin_frame(ctx);
        if self.explorer.tick(Instant::now()) {
            self.repaint.mark_needs_repaint();
        }
        self.handle_keys(ctx);
        let released = ctx.input(|i| i.pointer.primary_released());

        let mut win_action = WindowAction::None;
        egui::TopBottomPanel::top("menu").show(ctx, |ui| {
            win_action = self.render_menu(ui);
        });
        match win_action {
            WindowAction::Close => ctx.send_viewport_cmd(egui::ViewportCommand::Close),
            WindowAction::Minimize => ctx.send_viewport_cmd(egui::ViewportCommand::Minimized(true)),
            WindowAction::None => {}
        }

        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            self.render_toolbar(ui);
            ui.add_space(2.0);
            self.render_breadcrumb(ui);
        });
        egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
            let (text, is_error) = self.status_text();
            status_bar(ui, &text, is_error);
        });
        egui::SidePanel::left("quick_access")
            .resizable(false)
            .exact_width(120.0)
            .show(ctx, |ui| self.render_quick_access(ui));
        egui::CentralPanel::default()
            .frame(PadTheme::window_frame().inner_margin(4.0))
            .show(ctx, |ui| self.render_entries(ui));

        self.render_delete_dialog(ctx);
        self.render_drag_preview(ctx);

        for action in std::mem::take(&mut self.actions) {
            self.apply(ctx, action);
        }
        if released && self.explorer.drag().is_some() {
            self.explorer.cancel_drag();
        }
        self.handle_events(ctx);

        if self.search_input != self.explorer.search_query() {
            self.search_input = self.explorer.search_query().to_string();
        }
        if let Some(wait) = self.explorer.next_wakeup(Instant::now()) {
            self.repaint.schedule_in(wait);
        }
        self.repaint.end_frame(ctx);
    }
}

/// Folder: tabbed filled box. File: outlined page with a folded corner.
fn draw_icon(painter: &egui::Painter, rect: Rect, is_dir: bool, ink: egui::Color32) {
    let stroke = Stroke::new(1.0, ink);
    if is_dir {
        let tab = Rect::from_min_size(rect.min + egui::vec2(0.0, rect.height() * 0.1), egui::vec2(rect.width() * 0.4, rect.height() * 0.15));
        let body = Rect::from_min_max(egui::pos2(rect.min.x, tab.max.y), egui::pos2(rect.max.x, rect.max.y - rect.height() * 0.1));
        painter.rect_filled(tab, 0.0, PadColors::ACCENT);
        painter.rect_filled(body, 0.0, PadColors::ACCENT);
        painter.rect_stroke(body, 0.0, stroke);
    } else {
        let page = rect.shrink2(egui::vec2(rect.width() * 0.15, 0.0));
        let fold = page.width() * 0.3;
        let points = vec![
            page.left_top(),
            egui::pos2(page.right() - fold, page.top()),
            egui::pos2(page.right(), page.top() + fold),
            page.right_bottom(),
            page.left_bottom(),
        ];
        painter.add(egui::Shape::closed_line(points, stroke));
        painter.line_segment(
            [egui::pos2(page.right() - fold, page.top()), egui::pos2(page.right() - fold, page.top() + fold)],
            stroke,
        );
        painter.line_segment(
            [egui::pos2(page.right() - fold, page.top() + fold), egui::pos2(page.right(), page.top() + fold)],
            stroke,
        );
    }
}

fn format_size(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else if bytes < 1024 * 1024 * 1024 {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    } else {
        format!("{:.1} GB", bytes as f64 / (1024.0 * 1024.0 * 1024.0))
    }
}

/// Resolve the directory to open in: a command-line argument, then the
/// configured start path, then home, then "My PC".
pub fn start_location(arg: Option<PathBuf>, settings: &Settings) -> Location {
    arg.or_else(|| settings.start_path.clone())
        .filter(|p| p.is_dir())
        .or_else(|| directories::UserDirs::new().map(|d| d.home_dir().to_path_buf()))
        .map(Location::Dir)
        .unwrap_or(Location::MyPc)
}
