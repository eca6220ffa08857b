//! Terminal front-end.
//!
//! Renders the shell with ratatui and feeds crossterm mouse/keyboard events
//! back into it. Window geometry stays in pixels inside the shell; this module
//! maps one terminal cell to `CELL_WIDTH` x `CELL_HEIGHT` pixels at the edges.

mod render;

use std::io;
use std::time::{Duration, Instant};

use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
    KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use crossterm::execute;
use ratatui::layout::{Position, Rect};
use ratatui::text::Span;
use ratatui::DefaultTerminal;
use tracing::{debug, error};

use crate::shell::context_menu::ContextMenuItem;
use crate::shell::{BootSequence, ShellController, ShellPhase, DESKTOP_ICONS};
use crate::state::events::WindowCommand;
use crate::state::window::{Point, WindowId};
use crate::view::taskbar::{StartEntry, StartMenu, StartSection, TaskbarButton, POWER_TARGET};
use crate::view::{self, DragTracker, Viewport};

pub const CELL_WIDTH: f64 = 8.0;
pub const CELL_HEIGHT: f64 = 16.0;

const DOUBLE_CLICK_WINDOW: Duration = Duration::from_millis(400);
const BOOT_TICK: Duration = Duration::from_millis(120);
const FRAME_POLL: Duration = Duration::from_millis(16);

const START_BUTTON_WIDTH: u16 = 7;
const TASK_LABEL_MAX: usize = 16;
const TRAY_WIDTH: u16 = 20;
const MUTE_WIDTH: u16 = 8;
const START_MENU_WIDTH: u16 = 40;
const CONTEXT_MENU_WIDTH: u16 = 24;
const ICON_WIDTH: u16 = 13;
const ICON_HEIGHT: u16 = 2;

// ===== Cell <-> pixel mapping =====

/// Pixel at the centre of a terminal cell
pub fn cell_to_point(column: u16, row: u16) -> Point {
    Point::new(
        f64::from(column) * CELL_WIDTH + CELL_WIDTH / 2.0,
        f64::from(row) * CELL_HEIGHT + CELL_HEIGHT / 2.0,
    )
}

/// Cells covered by a pixel rectangle, clipped to `area`
pub fn cells_for(rect: &view::Rect, area: Rect) -> Rect {
    let to_cell = |px: f64, cell: f64| (px / cell).max(0.0).min(f64::from(u16::MAX)) as u16;
    let x0 = to_cell(rect.x, CELL_WIDTH);
    let y0 = to_cell(rect.y, CELL_HEIGHT);
    let x1 = to_cell(rect.right().max(0.0) + CELL_WIDTH - 1.0, CELL_WIDTH);
    let y1 = to_cell(rect.bottom().max(0.0) + CELL_HEIGHT - 1.0, CELL_HEIGHT);
    Rect::new(x0, y0, x1.saturating_sub(x0), y1.saturating_sub(y0)).intersection(area)
}

/// Pixel viewport for a terminal of the given size; the taskbar takes one row.
pub fn viewport_for(columns: u16, rows: u16) -> Viewport {
    Viewport::new(
        f64::from(columns) * CELL_WIDTH,
        f64::from(rows) * CELL_HEIGHT,
        CELL_HEIGHT,
    )
}

// ===== Layout =====

fn contains(rect: Rect, column: u16, row: u16) -> bool {
    rect.contains(Position::new(column, row))
}

pub(crate) fn taskbar_area(area: Rect) -> Rect {
    Rect::new(area.x, area.bottom().saturating_sub(1), area.width, area.height.min(1))
}

pub(crate) fn desktop_area(area: Rect) -> Rect {
    Rect::new(area.x, area.y, area.width, area.height.saturating_sub(1))
}

pub(crate) fn icon_rect(desktop: Rect, index: usize) -> Rect {
    let row = desktop.y + 1 + index as u16 * (ICON_HEIGHT + 1);
    Rect::new(desktop.x + 2, row, ICON_WIDTH, ICON_HEIGHT).intersection(desktop)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TaskbarTarget {
    Start,
    Window(WindowId),
    Mute,
}

pub(crate) fn taskbar_label(button: &TaskbarButton) -> String {
    let mut label = format!("{} {}", button.icon, button.title);
    if label.chars().count() > TASK_LABEL_MAX {
        label = label.chars().take(TASK_LABEL_MAX).collect();
    }
    format!("[{}]", label)
}

/// Clickable taskbar regions, left to right
pub(crate) fn taskbar_targets(task: Rect, buttons: &[TaskbarButton]) -> Vec<(Rect, TaskbarTarget)> {
    let mut targets = vec![(
        Rect::new(task.x, task.y, START_BUTTON_WIDTH.min(task.width), 1),
        TaskbarTarget::Start,
    )];

    let tray_x = task.right().saturating_sub(TRAY_WIDTH);
    let mut x = task.x + START_BUTTON_WIDTH + 1;
    for button in buttons {
        let width = Span::raw(taskbar_label(button)).width() as u16;
        if x + width >= tray_x {
            break;
        }
        targets.push((Rect::new(x, task.y, width, 1), TaskbarTarget::Window(button.id)));
        x += width + 1;
    }

    if task.width > TRAY_WIDTH {
        targets.push((Rect::new(tray_x, task.y, MUTE_WIDTH, 1), TaskbarTarget::Mute));
    }
    targets
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum StartRow {
    Search,
    Header(&'static str),
    Entry(StartEntry),
    Power,
}

fn section_header(section: StartSection) -> &'static str {
    match section {
        StartSection::Pinned => "Pinned",
        StartSection::SystemApps => "System Apps",
        StartSection::Recommended => "Recommended",
        StartSection::SearchResults => "Results",
    }
}

pub(crate) fn start_menu_rows(menu: &StartMenu) -> Vec<StartRow> {
    let mut rows = vec![StartRow::Search];
    let mut current = None;
    for entry in menu.entries() {
        if current != Some(entry.section) {
            current = Some(entry.section);
            rows.push(StartRow::Header(section_header(entry.section)));
        }
        rows.push(StartRow::Entry(entry));
    }
    rows.push(StartRow::Power);
    rows
}

/// Popup sitting on top of the start button
pub(crate) fn start_menu_rect(area: Rect, rows: usize) -> Rect {
    let task = taskbar_area(area);
    let height = (rows as u16 + 2).min(task.y.saturating_sub(area.y));
    Rect::new(
        area.x,
        task.y.saturating_sub(height),
        START_MENU_WIDTH.min(area.width),
        height,
    )
}

/// Menu items with `None` marking a divider
pub(crate) fn context_menu_rows() -> Vec<Option<ContextMenuItem>> {
    let mut rows = Vec::new();
    for item in ContextMenuItem::ALL {
        if item.starts_group() {
            rows.push(None);
        }
        rows.push(Some(item));
    }
    rows
}

pub(crate) fn context_menu_rect(origin: Point, area: Rect) -> Rect {
    let height = context_menu_rows().len() as u16 + 2;
    let column = ((origin.x / CELL_WIDTH).max(0.0) as u16).min(area.width.saturating_sub(CONTEXT_MENU_WIDTH));
    let row = ((origin.y / CELL_HEIGHT).max(0.0) as u16).min(area.height.saturating_sub(height + 1));
    Rect::new(column, row, CONTEXT_MENU_WIDTH, height).intersection(area)
}

/// Row index inside a bordered popup, if the cell is on a content row
fn popup_row(rect: Rect, column: u16, row: u16) -> Option<usize> {
    let inner = Rect::new(
        rect.x + 1,
        rect.y + 1,
        rect.width.saturating_sub(2),
        rect.height.saturating_sub(2),
    );
    contains(inner, column, row).then(|| usize::from(row - inner.y))
}

// ===== Application state =====

#[derive(Debug, Clone, Copy)]
struct LastClick {
    icon: WindowId,
    at: Instant,
}

pub struct App {
    shell: ShellController,
    boot: BootSequence,
    password: String,
    drag: DragTracker,
    last_click: Option<LastClick>,
    area: Rect,
    should_quit: bool,
}

impl App {
    pub fn new(mut shell: ShellController, skip_boot: bool) -> Self {
        let mut boot = BootSequence::default();
        if skip_boot {
            while !boot.advance() {}
            if let Err(e) = shell.complete_boot() {
                error!("cannot skip boot: {}", e);
            }
        }
        let drag = DragTracker::new(shell.drag_margin());
        Self {
            shell,
            boot,
            password: String::new(),
            drag,
            last_click: None,
            area: Rect::default(),
            should_quit: false,
        }
    }

    pub fn shell(&self) -> &ShellController {
        &self.shell
    }

    pub fn boot(&self) -> &BootSequence {
        &self.boot
    }

    pub fn password_len(&self) -> usize {
        self.password.chars().count()
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn resize(&mut self, columns: u16, rows: u16) {
        self.area = Rect::new(0, 0, columns, rows);
        self.shell.set_viewport(viewport_for(columns, rows));
    }

    /// Advance time-driven screens. Only the boot progress bar moves.
    pub fn tick(&mut self) {
        if self.shell.phase() != ShellPhase::Boot {
            return;
        }
        if self.boot.advance() {
            if let Err(e) = self.shell.complete_boot() {
                error!("boot finished out of order: {}", e);
            }
        }
    }

    // ===== Keyboard =====

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press && key.kind != KeyEventKind::Repeat {
            return;
        }
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }

        match self.shell.phase() {
            ShellPhase::Boot => {
                if key.code == KeyCode::Esc {
                    self.should_quit = true;
                }
            }
            ShellPhase::Login => self.handle_login_key(key.code),
            ShellPhase::Desktop => self.handle_desktop_key(key.code),
        }
    }

    fn handle_login_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Enter => {
                if let Err(e) = self.shell.login() {
                    error!("login failed: {}", e);
                }
                self.password.clear();
            }
            KeyCode::Backspace => {
                self.password.pop();
            }
            KeyCode::Char(c) => self.password.push(c),
            KeyCode::Esc => self.should_quit = true,
            _ => {}
        }
    }

    fn handle_desktop_key(&mut self, code: KeyCode) {
        if self.shell.context_menu().is_some() {
            if code == KeyCode::Esc {
                self.shell.dismiss_context_menu();
            }
            return;
        }

        if self.shell.start_menu().is_open() {
            match code {
                KeyCode::Esc => self.shell.start_menu_mut().close(),
                KeyCode::Backspace => self.shell.start_menu_mut().pop_char(),
                KeyCode::Char(c) => self.shell.start_menu_mut().push_char(c),
                KeyCode::Enter => {
                    let first = self.shell.start_menu().entries().first().map(|e| e.id);
                    if let Some(id) = first {
                        self.run(|shell| shell.start_menu_select(id));
                    }
                }
                _ => {}
            }
            return;
        }

        match code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('s') | KeyCode::F(10) => self.shell.toggle_start_menu(),
            KeyCode::Char('m') => {
                self.shell.toggle_mute();
            }
            KeyCode::Char('t') => {
                self.shell.toggle_theme();
            }
            KeyCode::Char('w') => {
                if let Some(id) = self.shell.windows().topmost().map(|w| w.id) {
                    self.drag.forget(id);
                    self.shell.close_window(id);
                }
            }
            _ => {}
        }
    }

    // ===== Mouse =====

    pub fn handle_mouse(&mut self, mouse: MouseEvent) {
        self.handle_mouse_at(mouse, Instant::now());
    }

    /// Mouse handling with an explicit clock, for double-click detection
    pub fn handle_mouse_at(&mut self, mouse: MouseEvent, now: Instant) {
        if self.shell.phase() != ShellPhase::Desktop {
            return;
        }
        let (column, row) = (mouse.column, mouse.row);
        let point = cell_to_point(column, row);
        let viewport = self.shell.viewport();

        match mouse.kind {
            MouseEventKind::Drag(MouseButton::Left) => {
                if let Some(command) = self.drag.pointer_move(&viewport, point) {
                    self.run(|shell| shell.dispatch(command));
                }
            }
            MouseEventKind::Up(MouseButton::Left) => {
                if let Some(session) = self.drag.pointer_up() {
                    debug!(id = %session.window, "drag finished");
                }
            }
            MouseEventKind::Down(MouseButton::Left) => self.left_press(column, row, now),
            MouseEventKind::Down(MouseButton::Right) => {
                let on_desktop = contains(desktop_area(self.area), column, row)
                    && view::hit_test(self.shell.windows(), &viewport, point).is_none();
                if on_desktop {
                    self.shell.open_context_menu(point);
                }
            }
            _ => {}
        }
    }

    fn left_press(&mut self, column: u16, row: u16, now: Instant) {
        if let Some(menu) = self.shell.context_menu() {
            let rect = context_menu_rect(menu.origin, self.area);
            let picked = popup_row(rect, column, row).and_then(|i| context_menu_rows().get(i).copied());
            match picked {
                Some(Some(item)) => self.shell.choose_context_item(item),
                Some(None) => {}
                None => self.shell.dismiss_context_menu(),
            }
            return;
        }

        let task = taskbar_area(self.area);
        if contains(task, column, row) {
            let buttons = self.shell.taskbar_buttons();
            let target = taskbar_targets(task, &buttons)
                .into_iter()
                .find(|(rect, _)| contains(*rect, column, row))
                .map(|(_, target)| target);
            match target {
                Some(TaskbarTarget::Start) => self.shell.toggle_start_menu(),
                Some(TaskbarTarget::Window(id)) => self.run(|shell| shell.taskbar_click(id)),
                Some(TaskbarTarget::Mute) => {
                    self.shell.toggle_mute();
                }
                None => {}
            }
            return;
        }

        if self.shell.start_menu().is_open() {
            let rows = start_menu_rows(self.shell.start_menu());
            let rect = start_menu_rect(self.area, rows.len());
            if contains(rect, column, row) {
                match popup_row(rect, column, row).and_then(|i| rows.get(i)) {
                    Some(StartRow::Entry(entry)) => {
                        let id = entry.id;
                        self.run(|shell| shell.start_menu_select(id));
                    }
                    Some(StartRow::Power) => self.run(|shell| shell.start_menu_select(POWER_TARGET)),
                    _ => {}
                }
                return;
            }
            self.shell.start_menu_mut().close();
        }

        let viewport = self.shell.viewport();
        if let Some(commands) = self
            .drag
            .pointer_down(self.shell.windows(), &viewport, cell_to_point(column, row))
        {
            for command in commands {
                if let WindowCommand::Close { id } = command {
                    self.drag.forget(id);
                }
                self.run(|shell| shell.dispatch(command));
            }
            return;
        }

        let desktop = desktop_area(self.area);
        let icon = DESKTOP_ICONS
            .iter()
            .enumerate()
            .find(|(i, _)| contains(icon_rect(desktop, *i), column, row))
            .map(|(_, icon)| icon.id);
        match icon {
            Some(id) => {
                let double = self
                    .last_click
                    .is_some_and(|last| last.icon == id && now.duration_since(last.at) <= DOUBLE_CLICK_WINDOW);
                if double {
                    self.last_click = None;
                    self.run(|shell| shell.icon_open(id));
                } else {
                    self.last_click = Some(LastClick { icon: id, at: now });
                    self.shell.icon_click(id);
                }
            }
            None => {
                self.last_click = None;
                self.shell.desktop_click();
            }
        }
    }

    fn run(&mut self, op: impl FnOnce(&mut ShellController) -> crate::error::Result<()>) {
        if let Err(e) = op(&mut self.shell) {
            error!("shell operation failed: {}", e);
        }
    }
}

// ===== Terminal loop =====

pub fn run(terminal: &mut DefaultTerminal, app: &mut App) -> io::Result<()> {
    execute!(io::stdout(), EnableMouseCapture)?;
    let result = event_loop(terminal, app);
    let _ = execute!(io::stdout(), DisableMouseCapture);
    result
}

fn event_loop(terminal: &mut DefaultTerminal, app: &mut App) -> io::Result<()> {
    let size = terminal.size()?;
    app.resize(size.width, size.height);
    let mut last_tick = Instant::now();

    while !app.should_quit() {
        terminal.draw(|frame| render::draw(frame, app))?;

        if event::poll(FRAME_POLL)? {
            match event::read()? {
                Event::Key(key) => app.handle_key(key),
                Event::Mouse(mouse) => app.handle_mouse(mouse),
                Event::Resize(columns, rows) => app.resize(columns, rows),
                _ => {}
            }
        }

        if last_tick.elapsed() >= BOOT_TICK {
            app.tick();
            last_tick = Instant::now();
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::SilentPlayer;
    use crate::config::ShellConfig;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn desktop_app() -> App {
        let shell = ShellController::new(&ShellConfig::default(), Box::new(SilentPlayer)).unwrap();
        let mut app = App::new(shell, true);
        app.resize(120, 40);
        app.handle_key(KeyEvent::from(KeyCode::Enter));
        app
    }

    fn press(column: u16, row: u16) -> MouseEvent {
        mouse(MouseEventKind::Down(MouseButton::Left), column, row)
    }

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    fn screen_text(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(120, 40)).unwrap();
        terminal.draw(|frame| render::draw(frame, app)).unwrap();
        let buffer = terminal.backend().buffer();
        buffer.content().iter().map(|cell| cell.symbol()).collect()
    }

    #[test]
    fn test_cell_mapping() {
        assert_eq!(cell_to_point(0, 0), Point::new(4.0, 8.0));
        let area = Rect::new(0, 0, 120, 40);
        let cells = cells_for(&view::Rect::new(100.0, 48.0, 600.0, 450.0), area);
        assert_eq!(cells, Rect::new(12, 3, 76, 29));
        assert_eq!(viewport_for(120, 40).work_area().height, 624.0);
    }

    #[test]
    fn test_boot_ticks_into_login() {
        let shell = ShellController::new(&ShellConfig::default(), Box::new(SilentPlayer)).unwrap();
        let mut app = App::new(shell, false);
        app.resize(80, 24);
        for _ in 0..16 {
            app.tick();
        }
        assert_eq!(app.shell().phase(), ShellPhase::Login);

        app.handle_key(KeyEvent::from(KeyCode::Char('x')));
        assert_eq!(app.password_len(), 1);
        app.handle_key(KeyEvent::from(KeyCode::Enter));
        assert_eq!(app.shell().phase(), ShellPhase::Desktop);
    }

    #[test]
    fn test_double_click_icon_opens_window() {
        let mut app = desktop_app();
        let icon = icon_rect(desktop_area(app.area), 0);
        let t0 = Instant::now();

        app.handle_mouse_at(press(icon.x + 1, icon.y), t0);
        assert_eq!(app.shell().selected_icon(), Some(WindowId::About));
        assert!(!app.shell().windows().is_open(WindowId::About));

        app.handle_mouse_at(press(icon.x + 1, icon.y), t0 + Duration::from_millis(150));
        assert!(app.shell().windows().is_open(WindowId::About));
    }

    #[test]
    fn test_slow_second_click_only_selects() {
        let mut app = desktop_app();
        let icon = icon_rect(desktop_area(app.area), 1);
        let t0 = Instant::now();

        app.handle_mouse_at(press(icon.x, icon.y), t0);
        app.handle_mouse_at(press(icon.x, icon.y), t0 + Duration::from_millis(900));
        assert!(!app.shell().windows().is_open(WindowId::Skills));
        assert_eq!(app.shell().selected_icon(), Some(WindowId::Skills));
    }

    #[test]
    fn test_title_bar_drag_moves_window() {
        let mut app = desktop_app();
        app.shell.open_window(WindowId::About).unwrap(); // (100, 50) -> cell (12, 3)

        app.handle_mouse(press(20, 3));
        app.handle_mouse(mouse(MouseEventKind::Drag(MouseButton::Left), 30, 10));
        app.handle_mouse(mouse(MouseEventKind::Up(MouseButton::Left), 30, 10));

        let moved = app.shell().windows().get(WindowId::About).unwrap().position;
        assert_eq!(moved, Point::new(180.0, 162.0));
        assert!(!app.drag.is_dragging());
    }

    #[test]
    fn test_taskbar_button_minimizes_topmost() {
        let mut app = desktop_app();
        app.shell.open_window(WindowId::Cv).unwrap();
        let task = taskbar_area(app.area);
        let (rect, _) = taskbar_targets(task, &app.shell().taskbar_buttons())
            .into_iter()
            .find(|(_, t)| *t == TaskbarTarget::Window(WindowId::Cv))
            .unwrap();

        app.handle_mouse(press(rect.x, rect.y));
        assert!(app.shell().windows().get(WindowId::Cv).unwrap().is_minimized);
    }

    #[test]
    fn test_start_menu_search_and_enter() {
        let mut app = desktop_app();
        app.handle_mouse(press(1, 39));
        assert!(app.shell().start_menu().is_open());

        for c in "phot".chars() {
            app.handle_key(KeyEvent::from(KeyCode::Char(c)));
        }
        app.handle_key(KeyEvent::from(KeyCode::Enter));
        assert!(app.shell().windows().is_open(WindowId::Photos));
        assert!(!app.shell().start_menu().is_open());
    }

    #[test]
    fn test_right_click_opens_context_menu() {
        let mut app = desktop_app();
        app.handle_mouse(mouse(MouseEventKind::Down(MouseButton::Right), 60, 20));
        let origin = app.shell().context_menu().unwrap().origin;

        let rect = context_menu_rect(origin, app.area);
        let personalize = context_menu_rows()
            .iter()
            .position(|r| *r == Some(ContextMenuItem::Personalize))
            .unwrap() as u16;
        app.handle_mouse(press(rect.x + 2, rect.y + 1 + personalize));

        assert!(app.shell().is_dark_mode());
        assert!(app.shell().context_menu().is_none());
    }

    #[test]
    fn test_render_desktop_shows_windows_and_taskbar() {
        let mut app = desktop_app();
        app.shell.open_window(WindowId::Skills).unwrap();
        let text = screen_text(&app);
        assert!(text.contains("[Start]"));
        assert!(text.contains("Languages"));
        assert!(text.contains("About Me"));
    }

    #[test]
    fn test_render_boot_and_login_screens() {
        let shell = ShellController::new(&ShellConfig::default(), Box::new(SilentPlayer)).unwrap();
        let mut app = App::new(shell, false);
        app.resize(120, 40);
        assert!(screen_text(&app).contains("Starting"));

        for _ in 0..16 {
            app.tick();
        }
        assert!(screen_text(&app).contains("Press Enter"));
    }
}
