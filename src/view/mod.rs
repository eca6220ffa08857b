// Presentation contract between window chrome and the window manager.
// Geometry, hit testing and the drag protocol live here; nothing in this
// module mutates window state directly, it only produces commands.

pub mod taskbar;

use serde::{Deserialize, Serialize};

use crate::state::events::WindowCommand;
use crate::state::window::{Point, Size, WindowId, WindowInstance};
use crate::state::WindowManager;

pub const TITLE_BAR_HEIGHT: f64 = 40.0;
pub const CONTROL_BUTTON_WIDTH: f64 = 40.0;

/// Axis-aligned rectangle in viewport pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x
            && point.x < self.x + self.width
            && point.y >= self.y
            && point.y < self.y + self.height
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }
}

/// Drawable area plus the band reserved for the taskbar along the bottom
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
    pub taskbar_height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64, taskbar_height: f64) -> Self {
        Self {
            width,
            height,
            taskbar_height,
        }
    }

    /// Area a maximized window occupies
    pub fn work_area(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width, (self.height - self.taskbar_height).max(0.0))
    }
}

/// How much of a window must stay on screen while dragging
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DragMargin {
    pub min_visible_width: f64,
    pub min_visible_height: f64,
}

impl Default for DragMargin {
    fn default() -> Self {
        Self {
            min_visible_width: 200.0,
            min_visible_height: 100.0,
        }
    }
}

/// Clamp a candidate window origin so the title bar can always be grabbed again.
pub fn clamp_origin(candidate: Point, viewport: &Viewport, margin: &DragMargin) -> Point {
    let x = candidate
        .x
        .min(viewport.width - margin.min_visible_width)
        .max(0.0);
    let y = candidate
        .y
        .min(viewport.height - margin.min_visible_height)
        .max(0.0);
    Point::new(x, y)
}

/// Where a window is drawn, or `None` while it is minimized.
pub fn window_frame(window: &WindowInstance, viewport: &Viewport) -> Option<Rect> {
    if window.is_minimized {
        return None;
    }
    if window.is_maximized {
        return Some(viewport.work_area());
    }
    let Size { width, height } = window.size;
    Some(Rect::new(window.position.x, window.position.y, width, height))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WindowControl {
    Minimize,
    Maximize,
    Close,
}

impl WindowControl {
    /// Left to right, as laid out in the title bar
    pub const ORDER: [WindowControl; 3] = [
        WindowControl::Minimize,
        WindowControl::Maximize,
        WindowControl::Close,
    ];

    pub fn command(&self, id: WindowId) -> WindowCommand {
        match self {
            WindowControl::Minimize => WindowCommand::Minimize { id },
            WindowControl::Maximize => WindowCommand::ToggleMaximize { id },
            WindowControl::Close => WindowCommand::Close { id },
        }
    }
}

/// Part of a window's chrome under the pointer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChromeRegion {
    TitleBar,
    Control(WindowControl),
    Body,
}

pub fn title_bar(frame: &Rect) -> Rect {
    Rect::new(frame.x, frame.y, frame.width, TITLE_BAR_HEIGHT.min(frame.height))
}

pub fn control_button(frame: &Rect, control: WindowControl) -> Rect {
    let slot = match control {
        WindowControl::Minimize => 3.0,
        WindowControl::Maximize => 2.0,
        WindowControl::Close => 1.0,
    };
    let bar = title_bar(frame);
    Rect::new(
        bar.right() - CONTROL_BUTTON_WIDTH * slot,
        bar.y,
        CONTROL_BUTTON_WIDTH,
        bar.height,
    )
}

/// Classify a point that is known to lie inside `frame`
pub fn chrome_region(frame: &Rect, point: Point) -> ChromeRegion {
    if !title_bar(frame).contains(point) {
        return ChromeRegion::Body;
    }
    WindowControl::ORDER
        .into_iter()
        .find(|control| control_button(frame, *control).contains(point))
        .map(ChromeRegion::Control)
        .unwrap_or(ChromeRegion::TitleBar)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowHit {
    pub id: WindowId,
    pub frame: Rect,
    pub region: ChromeRegion,
}

/// Find the visible window under the pointer, highest z-index first.
pub fn hit_test(manager: &WindowManager, viewport: &Viewport, point: Point) -> Option<WindowHit> {
    let mut visible = manager.list_open();
    visible.sort_by(|a, b| b.z_index.cmp(&a.z_index));
    visible.into_iter().find_map(|win| {
        let frame = window_frame(win, viewport)?;
        frame.contains(point).then(|| WindowHit {
            id: win.id,
            frame,
            region: chrome_region(&frame, point),
        })
    })
}

/// Windows that should be drawn, bottom to top
pub fn draw_order(manager: &WindowManager) -> Vec<&WindowInstance> {
    let mut visible = manager.list_open();
    visible.sort_by_key(|w| w.z_index);
    visible
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragSession {
    pub window: WindowId,
    /// Pointer position minus window origin at the moment the drag started
    pub grab_offset: Point,
}

/// Transient pointer state for window chrome. Never stored in the window model.
#[derive(Debug, Clone, Default)]
pub struct DragTracker {
    active: Option<DragSession>,
    margin: DragMargin,
}

impl DragTracker {
    pub fn new(margin: DragMargin) -> Self {
        Self {
            active: None,
            margin,
        }
    }

    pub fn active(&self) -> Option<&DragSession> {
        self.active.as_ref()
    }

    pub fn is_dragging(&self) -> bool {
        self.active.is_some()
    }

    /// Handle a primary-button press. Returns the commands the press triggers,
    /// or `None` if no window is under the pointer.
    pub fn pointer_down(
        &mut self,
        manager: &WindowManager,
        viewport: &Viewport,
        point: Point,
    ) -> Option<Vec<WindowCommand>> {
        let hit = hit_test(manager, viewport, point)?;
        let commands = match hit.region {
            // Controls never start a drag or raise the window
            ChromeRegion::Control(control) => vec![control.command(hit.id)],
            ChromeRegion::TitleBar => {
                let origin = manager.get(hit.id)?.position;
                self.active = Some(DragSession {
                    window: hit.id,
                    grab_offset: Point::new(point.x - origin.x, point.y - origin.y),
                });
                vec![WindowCommand::Focus { id: hit.id }]
            }
            ChromeRegion::Body => vec![WindowCommand::Focus { id: hit.id }],
        };
        Some(commands)
    }

    /// Handle pointer movement; yields a clamped move while a drag is active.
    pub fn pointer_move(&self, viewport: &Viewport, point: Point) -> Option<WindowCommand> {
        let session = self.active?;
        let candidate = Point::new(
            point.x - session.grab_offset.x,
            point.y - session.grab_offset.y,
        );
        Some(WindowCommand::Move {
            id: session.window,
            position: clamp_origin(candidate, viewport, &self.margin),
        })
    }

    pub fn pointer_up(&mut self) -> Option<DragSession> {
        self.active.take()
    }

    /// Drop the session if its window went away mid-drag
    pub fn forget(&mut self, id: WindowId) {
        if self.active.is_some_and(|s| s.window == id) {
            self.active = None;
        }
    }
}
