//! Explorer controller
//!
//! [`Explorer`] owns every piece of explorer state (listing, selection,
//! clipboard, ledger, history, search) and is the only thing that talks to
//! the gateway. The view calls one method per user intent and reads the
//! state back each frame. Every mutation ends in a full reload; the
//! listing is never patched in place.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use egui::{Pos2, Rect};
use padcore::Settings;

use crate::backup::BackupStore;
use crate::clipboard::{collision_free_name, lands_inside_itself, Clipboard, ClipboardMode};
use crate::dnd::DragSession;
use crate::gateway::{display_name, DirectoryEntry, FsGateway, Location};
use crate::ledger::{Ledger, UndoOperation};
use crate::navigation::History;
use crate::search::{SearchDebouncer, SearchWorker};
use crate::selection::{Marquee, MarqueeOutcome, Selection};

const NEW_FOLDER: &str = "New Folder";
const NEW_TEXT_FILE: &str = "New Text Document.txt";

/// A single path component: no separators, not `.` or `..`.
fn is_plain_name(name: &str) -> bool {
    !name.contains(['/', '\\']) && name != "." && name != ".."
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ExplorerMode {
    #[default]
    Default,
    /// Embedded as a file picker: a plain click reports the entry.
    Picker,
}

/// Notifications for whatever hosts the explorer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ExplorerEvent {
    /// The explorer moved to a new location.
    PathChanged(Location),
    /// Picker mode: the user clicked this entry.
    Picked(PathBuf),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Status {
    pub text: String,
    pub is_error: bool,
    until: Instant,
}

/// A message that clears itself after a timeout.
#[derive(Debug)]
pub struct StatusLine {
    timeout: Duration,
    current: Option<Status>,
}

impl StatusLine {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout, current: None }
    }

    pub fn show(&mut self, text: impl Into<String>, now: Instant) {
        self.set(text.into(), false, now);
    }

    pub fn error(&mut self, text: impl Into<String>, now: Instant) {
        self.set(text.into(), true, now);
    }

    fn set(&mut self, text: String, is_error: bool, now: Instant) {
        self.current = Some(Status { text, is_error, until: now + self.timeout });
    }

    pub fn current(&self) -> Option<&Status> {
        self.current.as_ref()
    }

    /// Drop the message if its time is up. Returns whether it was dropped.
    pub fn expire(&mut self, now: Instant) -> bool {
        if self.current.as_ref().is_some_and(|s| s.until <= now) {
            self.current = None;
            return true;
        }
        false
    }

    pub fn time_left(&self, now: Instant) -> Option<Duration> {
        self.current.as_ref().map(|s| s.until.saturating_duration_since(now))
    }
}

/// Shortcuts in the quick-access panel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KnownFolder {
    Home,
    Desktop,
    Documents,
    Downloads,
    Pictures,
    Music,
    Videos,
    MyPc,
}

impl KnownFolder {
    pub const ALL: [KnownFolder; 8] = [
        KnownFolder::MyPc,
        KnownFolder::Home,
        KnownFolder::Desktop,
        KnownFolder::Documents,
        KnownFolder::Downloads,
        KnownFolder::Pictures,
        KnownFolder::Music,
        KnownFolder::Videos,
    ];

    pub fn label(self) -> &'static str {
        match self {
            KnownFolder::Home => "Home",
            KnownFolder::Desktop => "Desktop",
            KnownFolder::Documents => "Documents",
            KnownFolder::Downloads => "Downloads",
            KnownFolder::Pictures => "Pictures",
            KnownFolder::Music => "Music",
            KnownFolder::Videos => "Videos",
            KnownFolder::MyPc => "My PC",
        }
    }

    /// Where the folder lives for the current user, if the platform has one.
    pub fn location(self) -> Option<Location> {
        if self == KnownFolder::MyPc {
            return Some(Location::MyPc);
        }
        let dirs = directories::UserDirs::new()?;
        let path = match self {
            KnownFolder::Home => Some(dirs.home_dir()),
            KnownFolder::Desktop => dirs.desktop_dir(),
            KnownFolder::Documents => dirs.document_dir(),
            KnownFolder::Downloads => dirs.download_dir(),
            KnownFolder::Pictures => dirs.picture_dir(),
            KnownFolder::Music => dirs.audio_dir(),
            KnownFolder::Videos => dirs.video_dir(),
            KnownFolder::MyPc => None,
        }?;
        Some(Location::Dir(path.to_path_buf()))
    }
}

/// Directories first, then case-insensitive by name.
pub fn sort_listing(entries: &mut [DirectoryEntry]) {
    entries.sort_by(|a, b| {
        b.is_dir
            .cmp(&a.is_dir)
            .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
            .then_with(|| a.name.cmp(&b.name))
    });
}

pub struct Explorer {
    fs: Arc<dyn FsGateway>,
    mode: ExplorerMode,
    history: History,
    entries: Vec<DirectoryEntry>,
    selection: Selection,
    marquee: Marquee,
    clipboard: Option<Clipboard>,
    ledger: Ledger,
    backups: BackupStore,
    drag: Option<DragSession>,
    search_query: String,
    debouncer: SearchDebouncer,
    worker: SearchWorker,
    search_depth: usize,
    show_hidden: bool,
    status: StatusLine,
    events: Vec<ExplorerEvent>,
}

impl Explorer {
    /// Open at `start`. The backup store is wiped here, once.
    pub fn new(fs: Arc<dyn FsGateway>, settings: &Settings, start: Location) -> Self {
        let backups = BackupStore::new(settings.backup_root());
        match backups.wipe(fs.as_ref()) {
            Ok(()) => tracing::info!(root = %backups.root().display(), "backup store ready"),
            Err(e) => tracing::warn!(root = %backups.root().display(), "backup store not cleared: {e}"),
        }
        let mut explorer = Self {
            worker: SearchWorker::new(Arc::clone(&fs)),
            fs,
            mode: ExplorerMode::Default,
            history: History::new(start),
            entries: Vec::new(),
            selection: Selection::new(),
            marquee: Marquee::default(),
            clipboard: None,
            ledger: Ledger::new(),
            backups,
            drag: None,
            search_query: String::new(),
            debouncer: SearchDebouncer::new(Duration::from_millis(settings.search_debounce_ms)),
            search_depth: settings.search_depth,
            show_hidden: settings.show_hidden,
            status: StatusLine::new(Duration::from_millis(settings.status_timeout_ms)),
            events: Vec::new(),
        };
        explorer.reload();
        explorer
    }

    pub fn with_mode(mut self, mode: ExplorerMode) -> Self {
        self.mode = mode;
        self
    }

    // ---- read access for the view ----

    pub fn mode(&self) -> ExplorerMode {
        self.mode
    }

    pub fn location(&self) -> &Location {
        self.history.current()
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn entries(&self) -> &[DirectoryEntry] {
        &self.entries
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn marquee(&self) -> &Marquee {
        &self.marquee
    }

    pub fn clipboard(&self) -> Option<&Clipboard> {
        self.clipboard.as_ref()
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn drag(&self) -> Option<&DragSession> {
        self.drag.as_ref()
    }

    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    pub fn is_searching(&self) -> bool {
        self.worker.is_busy()
    }

    pub fn status(&self) -> Option<&Status> {
        self.status.current()
    }

    pub fn show_hidden(&self) -> bool {
        self.show_hidden
    }

    pub fn take_events(&mut self) -> Vec<ExplorerEvent> {
        std::mem::take(&mut self.events)
    }

    fn current_dir(&self) -> Option<PathBuf> {
        self.location().as_dir().map(Path::to_path_buf)
    }

    fn report(&mut self, text: String) {
        self.status.error(text, Instant::now());
    }

    // ---- listing ----

    /// Re-read the current location. While a search is active the search
    /// is re-issued instead.
    pub fn reload(&mut self) {
        if !self.search_query.is_empty() {
            self.issue_search();
            return;
        }
        let listed = match self.location().clone() {
            Location::MyPc => self.fs.list_removable_roots(),
            Location::Dir(path) => self.fs.list_directory(&path),
        };
        self.apply_listing(listed);
    }

    fn apply_listing(&mut self, mut listed: Vec<DirectoryEntry>) {
        if !self.show_hidden && !self.location().is_my_pc() {
            listed.retain(|e| !e.is_hidden());
        }
        sort_listing(&mut listed);
        self.entries = listed;
        self.selection.retain_listed(&self.entries);
    }

    pub fn set_show_hidden(&mut self, show: bool) {
        if self.show_hidden != show {
            self.show_hidden = show;
            self.reload();
        }
    }

    /// Names currently used in `dir`, for collision checks.
    fn names_in(&self, dir: &Path) -> HashSet<String> {
        self.fs.list_directory(dir).into_iter().map(|e| e.name).collect()
    }

    // ---- navigation ----

    pub fn navigate(&mut self, to: Location) {
        if !self.history.navigate(to) {
            return;
        }
        self.arrive();
    }

    pub fn back(&mut self) {
        if self.history.back().is_some() {
            self.arrive();
        }
    }

    pub fn forward(&mut self) {
        if self.history.forward().is_some() {
            self.arrive();
        }
    }

    /// Go to the parent. From a filesystem root this is "My PC"; from
    /// "My PC" nothing happens.
    pub fn up(&mut self) {
        if let Some(parent) = self.location().parent() {
            self.navigate(parent);
        }
    }

    pub fn go_to_known_folder(&mut self, folder: KnownFolder) {
        match folder.location() {
            Some(loc) => self.navigate(loc),
            None => self.report(format!("{} is not available", folder.label())),
        }
    }

    fn arrive(&mut self) {
        self.selection.clear();
        self.marquee.end();
        self.search_query.clear();
        self.debouncer.cancel();
        self.worker.cancel();
        tracing::debug!(location = %self.location(), "navigated");
        self.events.push(ExplorerEvent::PathChanged(self.location().clone()));
        self.reload();
    }

    /// Double-click: enter directories, hand files to the system opener.
    pub fn open_entry(&mut self, path: &Path) {
        let is_dir = self
            .entries
            .iter()
            .find(|e| e.path == path)
            .map(|e| e.is_dir)
            .unwrap_or_else(|| path.is_dir());
        if is_dir {
            self.navigate(Location::Dir(path.to_path_buf()));
            return;
        }
        if let Err(e) = open::that(path) {
            tracing::warn!(path = %path.display(), "open failed: {e}");
            self.report(format!("Could not open \"{}\"", display_name(path)));
        }
    }

    // ---- selection ----

    pub fn click_entry(&mut self, path: &Path, ctrl: bool) {
        if ctrl {
            self.selection.toggle(path);
            return;
        }
        self.selection.click(path);
        if self.mode == ExplorerMode::Picker {
            self.events.push(ExplorerEvent::Picked(path.to_path_buf()));
        }
    }

    pub fn select_all(&mut self) {
        self.selection.select_all(&self.entries);
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// Press on empty canvas. Without ctrl the selection is dropped first.
    pub fn begin_marquee(&mut self, point: Pos2, ctrl: bool) {
        if !ctrl {
            self.selection.clear();
        }
        self.marquee.begin(point);
    }

    /// Feed a pointer position. `items` are the rendered entry bounds in the
    /// same coordinates as `point`. Returns whether the selection changed.
    pub fn update_marquee(&mut self, point: Pos2, button_held: bool, items: &[(PathBuf, Rect)]) -> bool {
        match self.marquee.update(point, button_held, items) {
            MarqueeOutcome::Selecting(paths) => self.selection.replace(paths),
            _ => false,
        }
    }

    pub fn end_marquee(&mut self) -> bool {
        self.marquee.end()
    }

    // ---- clipboard ----

    pub fn copy_selection(&mut self) {
        self.fill_clipboard(ClipboardMode::Copy);
    }

    pub fn cut_selection(&mut self) {
        self.fill_clipboard(ClipboardMode::Cut);
    }

    fn fill_clipboard(&mut self, mode: ClipboardMode) {
        if let Some(clip) = Clipboard::new(self.selection.paths().to_vec(), mode) {
            tracing::debug!(?mode, count = clip.paths.len(), "clipboard filled");
            self.clipboard = Some(clip);
        }
    }

    /// Paste into the current directory. Copies get collision-free names
    /// and are recorded as creations; cuts are plain moves and empty the
    /// clipboard afterwards.
    pub fn paste(&mut self) {
        let Some(clip) = self.clipboard.clone() else {
            return;
        };
        let Some(dir) = self.current_dir() else {
            return;
        };

        let mut taken = self.names_in(&dir);
        for source in &clip.paths {
            let name = display_name(source);
            if lands_inside_itself(source, &dir.join(&name)) {
                self.report(format!("Cannot paste \"{}\" into itself", name));
                continue;
            }
            match clip.mode {
                ClipboardMode::Copy => {
                    let dest = dir.join(collision_free_name(&name, &taken));
                    match self.fs.copy(source, &dest) {
                        Ok(()) => {
                            tracing::info!(from = %source.display(), to = %dest.display(), "pasted copy");
                            taken.insert(display_name(&dest));
                            self.ledger.record(UndoOperation::Create { path: dest });
                        }
                        Err(e) => self.operation_failed("paste", source, e),
                    }
                }
                ClipboardMode::Cut => {
                    let dest = dir.join(&name);
                    if dest == *source {
                        continue;
                    }
                    match self.fs.rename_or_move(source, &dest) {
                        Ok(()) => {
                            tracing::info!(from = %source.display(), to = %dest.display(), "moved");
                            self.ledger.record(UndoOperation::Rename { path: source.clone(), new_path: dest });
                        }
                        Err(e) => self.operation_failed("move", source, e),
                    }
                }
            }
        }

        if clip.mode == ClipboardMode::Cut {
            self.clipboard = None;
        }
        self.reload();
    }

    fn operation_failed(&mut self, verb: &str, path: &Path, err: crate::gateway::GatewayError) {
        tracing::warn!(path = %path.display(), "{verb} failed: {err}");
        self.report(format!("Could not {} \"{}\"", verb, display_name(path)));
    }

    // ---- create / rename / delete ----

    pub fn new_folder(&mut self) {
        self.create_entry(NEW_FOLDER, true);
    }

    pub fn new_text_file(&mut self) {
        self.create_entry(NEW_TEXT_FILE, false);
    }

    fn create_entry(&mut self, base: &str, is_dir: bool) {
        let Some(dir) = self.current_dir() else {
            return;
        };
        let path = dir.join(collision_free_name(base, &self.names_in(&dir)));
        let result = if is_dir { self.fs.create_folder(&path) } else { self.fs.create_file(&path) };
        match result {
            Ok(()) => {
                tracing::info!(path = %path.display(), "created");
                self.ledger.record(UndoOperation::Create { path: path.clone() });
                self.reload();
                self.selection.click(&path);
                self.selection.retain_listed(&self.entries);
            }
            Err(e) => {
                self.operation_failed("create", &path, e);
                self.reload();
            }
        }
    }

    /// Inline rename of `path` to `new_name` in the same directory. Empty
    /// or unchanged names do nothing; names that would leave the directory
    /// are refused.
    pub fn rename(&mut self, path: &Path, new_name: &str) {
        let new_name = new_name.trim();
        if new_name.is_empty() || new_name == display_name(path) {
            return;
        }
        if !is_plain_name(new_name) {
            self.report(format!("\"{}\" is not a valid name", new_name));
            return;
        }
        let Some(parent) = path.parent() else {
            return;
        };
        let new_path = parent.join(new_name);
        if self.fs.exists(&new_path) {
            self.report(format!("\"{}\" already exists", new_name));
            return;
        }
        match self.fs.rename_or_move(path, &new_path) {
            Ok(()) => {
                tracing::info!(from = %path.display(), to = %new_path.display(), "renamed");
                self.ledger.record(UndoOperation::Rename { path: path.to_path_buf(), new_path: new_path.clone() });
                self.reload();
                self.selection.click(&new_path);
                self.selection.retain_listed(&self.entries);
            }
            Err(e) => {
                self.operation_failed("rename", path, e);
                self.reload();
            }
        }
    }

    /// Back up, then trash, each selected entry in turn. An entry that
    /// fails is skipped without an undo record; the rest carry on.
    pub fn delete_selected(&mut self) {
        let targets = self.selection.paths().to_vec();
        if targets.is_empty() {
            return;
        }
        for path in &targets {
            let restore_path = match self.backups.preserve(self.fs.as_ref(), path) {
                Ok(copy) => copy,
                Err(e) => {
                    self.operation_failed("back up", path, e);
                    continue;
                }
            };
            if let Err(e) = self.fs.trash(path) {
                self.operation_failed("delete", path, e);
                continue;
            }
            tracing::info!(path = %path.display(), backup = %restore_path.display(), "deleted");
            self.ledger.record(UndoOperation::Delete { path: path.clone(), restore_path });
        }
        self.selection.clear();
        self.reload();
    }

    // ---- undo / redo ----

    /// Invert the newest operation. A failed inverse still consumes the
    /// operation; it does not go to the redo stack.
    pub fn undo(&mut self) {
        let Some(op) = self.ledger.pop_undo() else {
            return;
        };
        match op.revert(self.fs.as_ref()) {
            Ok(()) => {
                tracing::info!(%op, "undone");
                if let UndoOperation::Delete { path, .. } = &op {
                    self.status.show(format!("Restored \"{}\"", display_name(path)), Instant::now());
                }
                self.ledger.push_undone(op);
            }
            Err(e) => {
                tracing::warn!(%op, "undo failed: {e}");
                self.report("Undo failed. See log for details.".into());
            }
        }
        self.reload();
    }

    pub fn redo(&mut self) {
        let Some(op) = self.ledger.pop_redo() else {
            return;
        };
        match op.reapply(self.fs.as_ref()) {
            Ok(()) => {
                tracing::info!(%op, "redone");
                self.ledger.push_redone(op);
            }
            Err(e) => {
                tracing::warn!(%op, "redo failed: {e}");
                self.report("Redo failed. See log for details.".into());
            }
        }
        self.reload();
    }

    // ---- drag and drop ----

    /// Start dragging `path` (see [`DragSession::begin`]) and offer the
    /// first dragged item to other windows.
    pub fn begin_drag(&mut self, path: &Path) {
        let session = DragSession::begin(&mut self.selection, path);
        session.hand_off();
        self.drag = Some(session);
    }

    pub fn can_drop_on(&self, target: &DirectoryEntry) -> bool {
        self.drag.as_ref().is_some_and(|d| d.accepts(target))
    }

    /// Drop the dragged entries into `target`. Moves run one after another;
    /// a single reload follows.
    pub fn drop_on(&mut self, target: &DirectoryEntry) {
        let Some(session) = self.drag.take() else {
            return;
        };
        if session.accepts(target) {
            let mut moved = 0usize;
            for (from, to) in session.moves_into(&target.path) {
                if lands_inside_itself(&from, &to) {
                    self.report(format!("Cannot move \"{}\" into itself", display_name(&from)));
                    continue;
                }
                match self.fs.rename_or_move(&from, &to) {
                    Ok(()) => {
                        tracing::info!(from = %from.display(), to = %to.display(), "moved by drag");
                        self.ledger.record(UndoOperation::Rename { path: from, new_path: to });
                        moved += 1;
                    }
                    Err(e) => self.operation_failed("move", &from, e),
                }
            }
            if moved > 0 {
                self.selection.clear();
            }
            self.reload();
        }
        session.finish();
    }

    pub fn cancel_drag(&mut self) {
        if let Some(session) = self.drag.take() {
            session.finish();
        }
    }

    // ---- search ----

    /// Record a keystroke in the search box. Clearing the box returns to the
    /// plain listing straight away.
    pub fn set_search_query(&mut self, query: &str, now: Instant) {
        if query == self.search_query {
            return;
        }
        self.search_query = query.to_string();
        if query.is_empty() {
            self.debouncer.cancel();
            self.worker.cancel();
            self.reload();
        } else {
            self.debouncer.input(query, now);
        }
    }

    fn issue_search(&mut self) {
        match self.current_dir() {
            Some(dir) => {
                self.worker.request(dir, self.search_query.clone(), self.search_depth);
            }
            None => {
                self.worker.cancel();
                self.entries.clear();
                self.selection.clear();
            }
        }
    }

    /// Per-frame housekeeping: fire a due search, apply fresh results,
    /// expire the status line. Returns whether anything visible changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        let mut changed = false;
        if self.debouncer.take_due(now).is_some() {
            self.issue_search();
            changed = true;
        }
        if let Some(results) = self.worker.poll() {
            self.apply_listing(results);
            changed = true;
        }
        changed |= self.status.expire(now);
        changed
    }

    /// When [`Explorer::tick`] next has work, if ever.
    pub fn next_wakeup(&self, now: Instant) -> Option<Duration> {
        let busy = self.worker.is_busy().then_some(Duration::from_millis(50));
        [self.debouncer.time_left(now), self.status.time_left(now), busy]
            .into_iter()
            .flatten()
            .min()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::memory::{Call, MemoryGateway};

    fn settings() -> Settings {
        Settings { backup_dir: Some("/cache".into()), ..Settings::default() }
    }

    fn explorer_at(fs: MemoryGateway, dir: &str) -> (Arc<MemoryGateway>, Explorer) {
        let fs = Arc::new(fs.with_dir("/cache"));
        let explorer = Explorer::new(fs.clone(), &settings(), Location::Dir(dir.into()));
        fs.clear_calls();
        (fs, explorer)
    }

    fn names(explorer: &Explorer) -> Vec<String> {
        explorer.entries().iter().map(|e| e.name.clone()).collect()
    }

    fn p(s: &str) -> PathBuf {
        PathBuf::from(s)
    }

    #[test]
    fn listing_sorts_dirs_first_and_hides_dotfiles() {
        let fs = MemoryGateway::new()
            .with_file("/d/b.txt")
            .with_file("/d/A.txt")
            .with_file("/d/.hidden")
            .with_dir("/d/zeta")
            .with_dir("/d/Alpha");
        let (_fs, explorer) = explorer_at(fs, "/d");
        assert_eq!(names(&explorer), ["Alpha", "zeta", "A.txt", "b.txt"]);
    }

    #[test]
    fn startup_wipes_backup_store() {
        let fs = Arc::new(MemoryGateway::new().with_file("/cache/1_old/old"));
        let _explorer = Explorer::new(fs.clone(), &settings(), Location::MyPc);
        assert_eq!(fs.calls(), vec![Call::Clear(p("/cache"))]);
        assert!(fs.snapshot("/cache").is_empty());
    }

    #[test]
    fn delete_then_undo_restores_from_backup() {
        let fs = MemoryGateway::new().with_file("/d/report.docx");
        let (fs, mut ex) = explorer_at(fs, "/d");
        ex.click_entry(Path::new("/d/report.docx"), false);

        ex.delete_selected();
        let calls = fs.calls();
        assert_eq!(calls.len(), 3);
        assert!(matches!(&calls[0], Call::CreateFolder(f) if f.starts_with("/cache")));
        let Call::Copy(from, backup) = &calls[1] else { panic!("expected copy, got {:?}", calls[1]) };
        assert_eq!(from, &p("/d/report.docx"));
        assert_eq!(calls[2], Call::Trash(p("/d/report.docx")));
        assert_eq!(ex.ledger().undo_len(), 1);
        assert!(ex.entries().is_empty());
        assert!(ex.selection().is_empty());

        fs.clear_calls();
        ex.undo();
        assert_eq!(fs.calls(), vec![Call::Copy(backup.clone(), p("/d/report.docx"))]);
        assert_eq!(ex.status().map(|s| s.text.as_str()), Some("Restored \"report.docx\""));
        assert_eq!(names(&ex), ["report.docx"]);
        assert!(ex.ledger().can_redo());
    }

    #[test]
    fn rename_undo_redo() {
        let fs = MemoryGateway::new().with_file("/d/x.txt");
        let (fs, mut ex) = explorer_at(fs, "/d");

        ex.rename(Path::new("/d/x.txt"), "y.txt");
        assert_eq!(
            ex.ledger().peek_undo(),
            Some(&UndoOperation::Rename { path: p("/d/x.txt"), new_path: p("/d/y.txt") })
        );
        ex.undo();
        ex.redo();
        assert_eq!(
            fs.calls(),
            vec![
                Call::Rename(p("/d/x.txt"), p("/d/y.txt")),
                Call::Rename(p("/d/y.txt"), p("/d/x.txt")),
                Call::Rename(p("/d/x.txt"), p("/d/y.txt")),
            ]
        );
        assert_eq!(names(&ex), ["y.txt"]);
    }

    #[test]
    fn rename_ignores_blank_and_unchanged() {
        let fs = MemoryGateway::new().with_file("/d/x.txt");
        let (fs, mut ex) = explorer_at(fs, "/d");
        ex.rename(Path::new("/d/x.txt"), "   ");
        ex.rename(Path::new("/d/x.txt"), "x.txt");
        assert!(fs.calls().is_empty());
        assert!(!ex.ledger().can_undo());
    }

    #[test]
    fn navigation_truncates_and_clears_selection() {
        let fs = MemoryGateway::new().with_dir("/A/x").with_dir("/B").with_dir("/C").with_dir("/D");
        let (_fs, mut ex) = explorer_at(fs, "/A");
        ex.navigate(Location::Dir(p("/B")));
        ex.navigate(Location::Dir(p("/C")));
        ex.back();
        ex.back();
        assert_eq!(ex.location(), &Location::Dir(p("/A")));

        ex.click_entry(Path::new("/A/x"), false);
        ex.navigate(Location::Dir(p("/D")));
        assert!(ex.selection().is_empty());
        assert_eq!(ex.history().entries(), &[Location::Dir(p("/A")), Location::Dir(p("/D"))]);
        assert_eq!(ex.history().index(), 1);

        ex.forward();
        assert_eq!(ex.location(), &Location::Dir(p("/D")));
        let events = ex.take_events();
        assert_eq!(events.last(), Some(&ExplorerEvent::PathChanged(Location::Dir(p("/D")))));
    }

    #[test]
    fn up_reaches_my_pc_then_stops() {
        let fs = MemoryGateway::new().with_dir("/d");
        let (_fs, mut ex) = explorer_at(fs, "/d");
        ex.up();
        assert_eq!(ex.location(), &Location::Dir(p("/")));
        ex.up();
        assert_eq!(ex.location(), &Location::MyPc);
        assert_eq!(names(&ex), ["/"]);
        ex.up();
        assert_eq!(ex.history().entries().len(), 3);
    }

    #[test]
    fn copy_paste_numbers_collisions() {
        let fs = MemoryGateway::new().with_file("/d/a.txt");
        let (fs, mut ex) = explorer_at(fs, "/d");
        ex.click_entry(Path::new("/d/a.txt"), false);
        ex.copy_selection();

        ex.paste();
        ex.paste();
        assert_eq!(names(&ex), ["a (1).txt", "a (2).txt", "a.txt"]);
        assert_eq!(
            fs.calls(),
            vec![
                Call::Copy(p("/d/a.txt"), p("/d/a (1).txt")),
                Call::Copy(p("/d/a.txt"), p("/d/a (2).txt")),
            ]
        );
        assert!(ex.clipboard().is_some());
        assert_eq!(ex.ledger().peek_undo(), Some(&UndoOperation::Create { path: p("/d/a (2).txt") }));
    }

    #[test]
    fn cut_paste_is_a_single_move_per_item() {
        let fs = MemoryGateway::new().with_file("/src/a.txt").with_dir("/src/pics").with_dir("/dst");
        let (fs, mut ex) = explorer_at(fs, "/src");
        ex.select_all();
        ex.cut_selection();
        ex.navigate(Location::Dir(p("/dst")));
        fs.clear_calls();

        ex.paste();
        assert_eq!(
            fs.calls(),
            vec![
                Call::Rename(p("/src/pics"), p("/dst/pics")),
                Call::Rename(p("/src/a.txt"), p("/dst/a.txt")),
            ]
        );
        assert!(ex.clipboard().is_none());
        assert_eq!(ex.ledger().undo_len(), 2);
    }

    #[test]
    fn new_operation_invalidates_redo() {
        let fs = MemoryGateway::new().with_file("/src/a.txt").with_dir("/dst");
        let (_fs, mut ex) = explorer_at(fs, "/src");
        ex.click_entry(Path::new("/src/a.txt"), false);
        ex.cut_selection();
        ex.navigate(Location::Dir(p("/dst")));
        ex.paste();
        ex.undo();
        assert!(ex.ledger().can_redo());

        ex.new_folder();
        assert!(!ex.ledger().can_redo());
        let before = ex.ledger().undo_len();
        ex.redo();
        assert_eq!(ex.ledger().undo_len(), before);
    }

    #[test]
    fn paste_guards() {
        let fs = MemoryGateway::new().with_dir("/d/folder/inner");
        let (fs, mut ex) = explorer_at(fs, "/d");
        ex.click_entry(Path::new("/d/folder"), false);
        ex.copy_selection();

        ex.navigate(Location::MyPc);
        fs.clear_calls();
        ex.paste();
        assert!(fs.calls().is_empty());

        ex.navigate(Location::Dir(p("/d/folder/inner")));
        ex.paste();
        assert!(fs.calls().is_empty());
        assert!(ex.status().is_some_and(|s| s.is_error));
    }

    #[test]
    fn new_entries_get_numbered_names() {
        let fs = MemoryGateway::new().with_dir("/d/New Folder").with_file("/d/New Text Document.txt");
        let (fs, mut ex) = explorer_at(fs, "/d");
        ex.new_folder();
        ex.new_text_file();
        assert_eq!(
            fs.calls(),
            vec![
                Call::CreateFolder(p("/d/New Folder (1)")),
                Call::CreateFile(p("/d/New Text Document (1).txt")),
            ]
        );
        assert_eq!(ex.selection().paths(), &[p("/d/New Text Document (1).txt")]);
    }

    #[test]
    fn undo_everything_restores_listing() {
        let fs = MemoryGateway::new().with_file("/d/a.txt").with_dir("/d/sub").with_file("/d/sub/b.txt");
        let (fs, mut ex) = explorer_at(fs, "/d");
        let before = fs.snapshot("/d");

        ex.new_folder();
        ex.new_text_file();
        ex.rename(Path::new("/d/a.txt"), "renamed.txt");
        ex.click_entry(Path::new("/d/sub"), false);
        ex.copy_selection();
        ex.paste();
        ex.click_entry(Path::new("/d/sub"), false);
        ex.delete_selected();
        assert_ne!(fs.snapshot("/d"), before);

        while ex.ledger().can_undo() {
            ex.undo();
        }
        assert_eq!(fs.snapshot("/d"), before);
    }

    #[test]
    fn failed_undo_still_pops() {
        let fs = MemoryGateway::new().with_file("/d/x.txt");
        let (fs, mut ex) = explorer_at(fs, "/d");
        ex.rename(Path::new("/d/x.txt"), "y.txt");
        fs.fail_on("/d/y.txt");

        ex.undo();
        assert!(!ex.ledger().can_undo());
        assert!(!ex.ledger().can_redo());
        let status = ex.status().unwrap();
        assert!(status.is_error);
        assert_eq!(status.text, "Undo failed. See log for details.");
    }

    #[test]
    fn partial_delete_records_only_successes() {
        let fs = MemoryGateway::new().with_file("/d/a.txt").with_file("/d/b.txt");
        let (fs, mut ex) = explorer_at(fs, "/d");
        fs.fail_on("/d/a.txt");
        ex.select_all();
        ex.delete_selected();

        assert_eq!(ex.ledger().undo_len(), 1);
        assert_eq!(ex.ledger().peek_undo().map(|op| op.path()), Some(Path::new("/d/b.txt")));
        assert_eq!(names(&ex), ["a.txt"]);
    }

    #[test]
    fn drop_moves_selection_into_folder() {
        let fs = MemoryGateway::new().with_file("/d/a.txt").with_file("/d/b.txt").with_dir("/d/box");
        let (fs, mut ex) = explorer_at(fs, "/d");
        ex.click_entry(Path::new("/d/a.txt"), false);
        ex.click_entry(Path::new("/d/b.txt"), true);
        ex.begin_drag(Path::new("/d/b.txt"));
        assert_eq!(ex.drag().map(|d| d.paths().len()), Some(2));

        let target = DirectoryEntry::new("/d/box", true);
        assert!(ex.can_drop_on(&target));
        ex.drop_on(&target);
        assert_eq!(
            fs.calls(),
            vec![
                Call::Rename(p("/d/a.txt"), p("/d/box/a.txt")),
                Call::Rename(p("/d/b.txt"), p("/d/box/b.txt")),
            ]
        );
        assert_eq!(names(&ex), ["box"]);
        assert!(ex.selection().is_empty());
        assert!(ex.drag().is_none());
        assert_eq!(ex.ledger().undo_len(), 2);
    }

    #[test]
    fn dragging_unselected_entry_selects_it() {
        let fs = MemoryGateway::new().with_file("/d/a.txt").with_dir("/d/box");
        let (fs, mut ex) = explorer_at(fs, "/d");
        ex.begin_drag(Path::new("/d/box"));
        assert_eq!(ex.selection().paths(), &[p("/d/box")]);
        assert!(!ex.can_drop_on(&DirectoryEntry::new("/d/box", true)));
        ex.drop_on(&DirectoryEntry::new("/d/box", true));
        assert!(fs.calls().is_empty());
    }

    #[test]
    fn picker_click_reports_entry() {
        let fs = MemoryGateway::new().with_file("/d/a.txt");
        let (_fs, ex) = explorer_at(fs, "/d");
        let mut ex = ex.with_mode(ExplorerMode::Picker);
        ex.click_entry(Path::new("/d/a.txt"), true);
        assert!(ex.take_events().is_empty());
        ex.click_entry(Path::new("/d/a.txt"), false);
        assert_eq!(ex.take_events(), vec![ExplorerEvent::Picked(p("/d/a.txt"))]);
    }

    #[test]
    fn marquee_with_ctrl_keeps_selection_until_drag() {
        let fs = MemoryGateway::new().with_file("/d/a.txt").with_file("/d/b.txt");
        let (_fs, mut ex) = explorer_at(fs, "/d");
        let items = vec![
            (p("/d/a.txt"), Rect::from_min_size(egui::pos2(0.0, 0.0), egui::vec2(90.0, 90.0))),
            (p("/d/b.txt"), Rect::from_min_size(egui::pos2(100.0, 0.0), egui::vec2(90.0, 90.0))),
        ];

        ex.click_entry(Path::new("/d/a.txt"), false);
        ex.begin_marquee(egui::pos2(300.0, 300.0), true);
        assert_eq!(ex.selection().len(), 1);

        assert!(ex.update_marquee(egui::pos2(150.0, 50.0), true, &items));
        assert_eq!(ex.selection().paths(), &[p("/d/b.txt")]);
        assert!(!ex.update_marquee(egui::pos2(151.0, 50.0), true, &items));

        ex.update_marquee(egui::pos2(151.0, 50.0), false, &items);
        assert!(!ex.marquee().is_active());

        ex.begin_marquee(egui::pos2(300.0, 300.0), false);
        assert!(ex.selection().is_empty());
    }

    #[test]
    fn search_replaces_listing_and_clearing_restores_it() {
        let fs = MemoryGateway::new().with_file("/d/report.txt").with_file("/d/sub/Report-2.txt");
        let (_fs, mut ex) = explorer_at(fs, "/d");
        let start = Instant::now();
        ex.set_search_query("report", start);
        assert!(!ex.tick(start));

        ex.tick(start + Duration::from_millis(301));
        let deadline = Instant::now() + Duration::from_secs(5);
        while ex.is_searching() && Instant::now() < deadline {
            std::thread::sleep(Duration::from_millis(5));
            ex.tick(start + Duration::from_millis(302));
        }
        assert_eq!(names(&ex), ["Report-2.txt", "report.txt"]);

        ex.set_search_query("", start);
        assert_eq!(names(&ex), ["sub", "report.txt"]);
    }

    #[test]
    fn redo_of_delete_trashes_again_and_keeps_backup() {
        let fs = MemoryGateway::new().with_file("/d/report.docx");
        let (fs, mut ex) = explorer_at(fs, "/d");
        ex.click_entry(Path::new("/d/report.docx"), false);
        ex.delete_selected();
        let Call::Copy(_, backup) = fs.calls()[1].clone() else { panic!("expected backup copy") };
        ex.undo();

        fs.clear_calls();
        ex.redo();
        assert_eq!(fs.calls(), vec![Call::Trash(p("/d/report.docx"))]);
        assert!(ex.entries().is_empty());
        assert!(fs.exists(&backup));
        assert_eq!(ex.ledger().undo_len(), 1);
        assert!(!ex.ledger().can_redo());

        ex.undo();
        assert_eq!(names(&ex), ["report.docx"]);
    }

    #[test]
    fn partial_cut_paste_moves_the_rest_and_clears_clipboard() {
        let fs = MemoryGateway::new().with_file("/src/a.txt").with_file("/src/b.txt").with_dir("/dst");
        let (fs, mut ex) = explorer_at(fs, "/src");
        ex.select_all();
        ex.cut_selection();
        ex.navigate(Location::Dir(p("/dst")));
        fs.fail_on("/src/a.txt");

        ex.paste();
        assert_eq!(names(&ex), ["b.txt"]);
        assert!(fs.exists(Path::new("/src/a.txt")));
        assert_eq!(ex.ledger().undo_len(), 1);
        assert_eq!(
            ex.ledger().peek_undo(),
            Some(&UndoOperation::Rename { path: p("/src/b.txt"), new_path: p("/dst/b.txt") })
        );
        assert!(ex.clipboard().is_none());
        assert!(ex.status().is_some_and(|s| s.is_error));
    }

    #[test]
    fn partial_drop_moves_the_rest() {
        let fs = MemoryGateway::new().with_file("/d/a.txt").with_file("/d/b.txt").with_dir("/d/box");
        let (fs, mut ex) = explorer_at(fs, "/d");
        fs.fail_on("/d/a.txt");
        ex.click_entry(Path::new("/d/a.txt"), false);
        ex.click_entry(Path::new("/d/b.txt"), true);
        ex.begin_drag(Path::new("/d/b.txt"));

        ex.drop_on(&DirectoryEntry::new("/d/box", true));
        assert_eq!(names(&ex), ["box", "a.txt"]);
        assert!(fs.exists(Path::new("/d/box/b.txt")));
        assert_eq!(ex.ledger().undo_len(), 1);
        assert_eq!(ex.ledger().peek_undo().map(|op| op.path()), Some(Path::new("/d/b.txt")));
        assert!(ex.selection().is_empty());
        assert!(ex.drag().is_none());
    }

    #[test]
    fn cut_paste_onto_existing_name_is_refused() {
        let fs = MemoryGateway::new().with_file("/src/a.txt").with_file("/dst/a.txt");
        let (fs, mut ex) = explorer_at(fs, "/src");
        ex.click_entry(Path::new("/src/a.txt"), false);
        ex.cut_selection();
        ex.navigate(Location::Dir(p("/dst")));

        ex.paste();
        assert!(fs.exists(Path::new("/src/a.txt")));
        assert!(fs.exists(Path::new("/dst/a.txt")));
        assert!(!ex.ledger().can_undo());
        assert!(ex.status().is_some_and(|s| s.is_error));
    }

    #[test]
    fn rename_refuses_names_that_leave_the_directory() {
        let fs = MemoryGateway::new().with_file("/d/x.txt").with_dir("/d/sub");
        let (fs, mut ex) = explorer_at(fs, "/d");
        for bad in ["sub/x.txt", "../x.txt", "..", "a\\b"] {
            ex.rename(Path::new("/d/x.txt"), bad);
        }
        assert!(fs.calls().is_empty());
        assert!(!ex.ledger().can_undo());
        let status = ex.status().unwrap();
        assert!(status.is_error);
        assert_eq!(status.text, "\"a\\b\" is not a valid name");
        assert!(fs.exists(Path::new("/d/x.txt")));
    }

    #[test]
    fn status_expires() {
        let mut status = StatusLine::new(Duration::from_secs(3));
        let now = Instant::now();
        status.show("hello", now);
        assert!(!status.expire(now + Duration::from_secs(2)));
        assert!(status.expire(now + Duration::from_secs(3)));
        assert!(status.current().is_none());
    }
}
