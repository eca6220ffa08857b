use chrono::Local;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Gauge, Paragraph};
use ratatui::Frame;

use super::{
    cells_for, context_menu_rect, context_menu_rows, desktop_area, icon_rect, start_menu_rect,
    start_menu_rows, taskbar_area, taskbar_label, taskbar_targets, App, StartRow, TaskbarTarget,
    MUTE_WIDTH,
};
use crate::shell::tray::{clock_label, volume_label};
use crate::shell::{ShellController, ShellPhase, DESKTOP_ICONS};
use crate::state::window::WindowInstance;
use crate::view::{self, WindowControl};

#[derive(Debug, Clone, Copy)]
struct Palette {
    desktop: Color,
    window: Color,
    text: Color,
    dim: Color,
    accent: Color,
    taskbar: Color,
}

impl Palette {
    fn for_theme(dark: bool) -> Self {
        if dark {
            Self {
                desktop: Color::Black,
                window: Color::Rgb(32, 32, 32),
                text: Color::White,
                dim: Color::DarkGray,
                accent: Color::LightBlue,
                taskbar: Color::Rgb(24, 24, 24),
            }
        } else {
            Self {
                desktop: Color::Blue,
                window: Color::Rgb(243, 243, 243),
                text: Color::Black,
                dim: Color::Gray,
                accent: Color::Rgb(0, 95, 184),
                taskbar: Color::Rgb(230, 230, 230),
            }
        }
    }

    fn base(&self) -> Style {
        Style::default().fg(self.text).bg(self.window)
    }
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

pub(super) fn draw(frame: &mut Frame, app: &App) {
    let shell = app.shell();
    let palette = Palette::for_theme(shell.is_dark_mode());
    let area = frame.area();

    match shell.phase() {
        ShellPhase::Boot => draw_boot(frame, app, area),
        ShellPhase::Login => draw_login(frame, app, area, palette),
        ShellPhase::Desktop => draw_desktop(frame, shell, area, palette),
    }
}

fn draw_boot(frame: &mut Frame, app: &App, area: Rect) {
    frame.render_widget(Block::default().style(Style::default().bg(Color::Black)), area);

    let boxed = centered(area, 44, 6);
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Portfolio OS ")
        .style(Style::default().fg(Color::White).bg(Color::Black));
    let inner = block.inner(boxed);
    frame.render_widget(block, boxed);

    if inner.height < 2 {
        return;
    }
    frame.render_widget(
        Paragraph::new("Starting Portfolio OS...").centered(),
        Rect::new(inner.x, inner.y, inner.width, 1),
    );
    let progress = app.boot().progress().min(100) as u16;
    frame.render_widget(
        Gauge::default()
            .gauge_style(Style::default().fg(Color::LightBlue).bg(Color::DarkGray))
            .percent(progress),
        Rect::new(inner.x + 1, inner.y + 2.min(inner.height - 1), inner.width.saturating_sub(2), 1),
    );
}

fn draw_login(frame: &mut Frame, app: &App, area: Rect, palette: Palette) {
    frame.render_widget(Block::default().style(Style::default().bg(palette.desktop)), area);

    let boxed = centered(area, 36, 8);
    frame.render_widget(Clear, boxed);
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Sign in ")
        .style(palette.base());
    let inner = block.inner(boxed);
    frame.render_widget(block, boxed);

    let lines = vec![
        Line::from(Span::styled(
            "Portfolio User",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::default(),
        Line::from(format!("Password: {}", "*".repeat(app.password_len()))),
        Line::default(),
        Line::from(Span::styled(
            "Press Enter to sign in",
            Style::default().fg(palette.dim),
        )),
    ];
    frame.render_widget(Paragraph::new(lines).centered(), inner);
}

fn draw_desktop(frame: &mut Frame, shell: &ShellController, area: Rect, palette: Palette) {
    let desktop = desktop_area(area);
    frame.render_widget(Block::default().style(Style::default().bg(palette.desktop)), desktop);

    draw_icons(frame, shell, desktop, palette);

    let viewport = shell.viewport();
    let topmost = shell.windows().topmost().map(|w| w.id);
    for win in view::draw_order(shell.windows()) {
        if let Some(frame_px) = view::window_frame(win, &viewport) {
            draw_window(frame, shell, win, &frame_px, desktop, Some(win.id) == topmost, palette);
        }
    }

    draw_taskbar(frame, shell, area, palette);

    if shell.start_menu().is_open() {
        draw_start_menu(frame, shell, area, palette);
    }
    if let Some(menu) = shell.context_menu() {
        draw_context_menu(frame, context_menu_rect(menu.origin, area), palette);
    }
}

fn draw_icons(frame: &mut Frame, shell: &ShellController, desktop: Rect, palette: Palette) {
    for (i, icon) in DESKTOP_ICONS.iter().enumerate() {
        let rect = icon_rect(desktop, i);
        if rect.height == 0 {
            break;
        }
        let glyph = shell
            .windows()
            .registry()
            .lookup(icon.id)
            .map(|def| def.icon.clone())
            .unwrap_or_else(|_| "*".to_string());

        let style = if shell.selected_icon() == Some(icon.id) {
            Style::default().fg(Color::White).bg(palette.accent)
        } else {
            Style::default().fg(Color::White).bg(palette.desktop)
        };
        let lines = vec![Line::from(glyph), Line::from(icon.title)];
        frame.render_widget(Paragraph::new(lines).style(style).centered(), rect);
    }
}

fn draw_window(
    frame: &mut Frame,
    shell: &ShellController,
    win: &WindowInstance,
    frame_px: &view::Rect,
    desktop: Rect,
    focused: bool,
    palette: Palette,
) {
    let area = cells_for(frame_px, desktop);
    if area.width < 4 || area.height < 3 {
        return;
    }

    let border = if focused { palette.accent } else { palette.dim };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border))
        .title(format!(" {} {} ", win.icon, win.title))
        .style(palette.base());
    let inner = block.inner(area);
    frame.render_widget(Clear, area);
    frame.render_widget(block, area);

    for control in WindowControl::ORDER {
        let cells = cells_for(&view::control_button(frame_px, control), desktop);
        if cells.width == 0 || cells.y != area.y {
            continue;
        }
        let label = match control {
            WindowControl::Minimize => "─",
            WindowControl::Maximize if win.is_maximized => "❐",
            WindowControl::Maximize => "□",
            WindowControl::Close => "✕",
        };
        let style = match control {
            WindowControl::Close => Style::default().fg(Color::White).bg(Color::Red),
            _ => Style::default().fg(palette.text).bg(palette.window),
        };
        frame.render_widget(
            Paragraph::new(label).style(style).centered(),
            Rect::new(cells.x, cells.y, cells.width, 1),
        );
    }

    // Second title bar row stays empty; the body starts below it
    if inner.height < 2 {
        return;
    }
    let body = Rect::new(inner.x + 1, inner.y + 1, inner.width.saturating_sub(2), inner.height - 1);
    let content = shell.content(win.id);
    let mut lines = vec![
        Line::from(Span::styled(
            content.heading,
            Style::default().fg(palette.accent).add_modifier(Modifier::BOLD),
        )),
        Line::default(),
    ];
    lines.extend(content.lines.into_iter().map(Line::from));
    frame.render_widget(Paragraph::new(lines), body);
}

fn draw_taskbar(frame: &mut Frame, shell: &ShellController, area: Rect, palette: Palette) {
    let task = taskbar_area(area);
    if task.height == 0 {
        return;
    }
    let base = Style::default().fg(palette.text).bg(palette.taskbar);
    frame.render_widget(Block::default().style(base), task);

    let buttons = shell.taskbar_buttons();
    for (rect, target) in taskbar_targets(task, &buttons) {
        let (text, style) = match target {
            TaskbarTarget::Start => {
                let style = if shell.start_menu().is_open() {
                    base.fg(Color::White).bg(palette.accent)
                } else {
                    base.add_modifier(Modifier::BOLD)
                };
                ("[Start]".to_string(), style)
            }
            TaskbarTarget::Window(id) => {
                let Some(button) = buttons.iter().find(|b| b.id == id) else {
                    continue;
                };
                let style = if button.highlighted {
                    base.fg(Color::White).bg(palette.accent)
                } else if button.minimized {
                    base.fg(palette.dim)
                } else {
                    base
                };
                (taskbar_label(button), style)
            }
            TaskbarTarget::Mute => (format!("[{}]", volume_label(shell.is_muted())), base),
        };
        frame.render_widget(Paragraph::new(text).style(style), rect);

        if target == TaskbarTarget::Mute {
            let clock_x = rect.x + MUTE_WIDTH + 1;
            let clock = Rect::new(clock_x, task.y, task.right().saturating_sub(clock_x), 1);
            frame.render_widget(
                Paragraph::new(clock_label(Local::now().time())).style(base),
                clock,
            );
        }
    }
}

fn draw_start_menu(frame: &mut Frame, shell: &ShellController, area: Rect, palette: Palette) {
    let rows = start_menu_rows(shell.start_menu());
    let rect = start_menu_rect(area, rows.len());
    if rect.height < 3 {
        return;
    }
    frame.render_widget(Clear, rect);

    let dim = Style::default().fg(palette.dim);
    let lines: Vec<Line> = rows
        .iter()
        .map(|row| match row {
            StartRow::Search => Line::from(format!("Search: {}_", shell.start_menu().query())),
            StartRow::Header(title) => Line::from(Span::styled(
                *title,
                Style::default().fg(palette.accent).add_modifier(Modifier::BOLD),
            )),
            StartRow::Entry(entry) => {
                let mut spans = vec![Span::raw(format!("  {}", entry.title))];
                if let Some(subtitle) = entry.subtitle {
                    spans.push(Span::styled(format!("  {}", subtitle), dim));
                }
                Line::from(spans)
            }
            StartRow::Power => Line::from(Span::styled("⏻ Power", dim)),
        })
        .collect();

    frame.render_widget(
        Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Start ")
                .style(palette.base()),
        ),
        rect,
    );
}

fn draw_context_menu(frame: &mut Frame, rect: Rect, palette: Palette) {
    if rect.height < 3 {
        return;
    }
    frame.render_widget(Clear, rect);

    let divider = "─".repeat(rect.width.saturating_sub(2) as usize);
    let lines: Vec<Line> = context_menu_rows()
        .into_iter()
        .map(|row| match row {
            Some(item) => Line::from(format!(" {}", item.label())),
            None => Line::from(Span::styled(divider.clone(), Style::default().fg(palette.dim))),
        })
        .collect();

    frame.render_widget(
        Paragraph::new(lines).block(Block::default().borders(Borders::ALL).style(palette.base())),
        rect,
    );
}
