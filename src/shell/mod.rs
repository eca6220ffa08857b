// Top-level composition: boot/login/desktop phases, desktop icons, the start
// menu and tray toggles, all wired onto a single WindowManager.

pub mod content;
pub mod context_menu;
pub mod tray;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use self::content::{ContentProvider, PortfolioContent, WindowContent};
use self::context_menu::{ContextMenu, ContextMenuItem};
use crate::audio::{Sound, SoundPlayer};
use crate::config::ShellConfig;
use crate::error::{Result, ShellError};
use crate::state::events::{WindowCommand, WindowEvent};
use crate::state::window::{Point, WindowId};
use crate::state::{SubscriptionId, WindowManager};
use crate::view::taskbar::{self, StartMenu, TaskbarButton};
use crate::view::{DragMargin, Viewport};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShellPhase {
    Boot,
    Login,
    Desktop,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DesktopIcon {
    pub id: WindowId,
    pub title: &'static str,
}

pub const DESKTOP_ICONS: [DesktopIcon; 6] = [
    DesktopIcon { id: WindowId::About, title: "About Me" },
    DesktopIcon { id: WindowId::Skills, title: "Skills" },
    DesktopIcon { id: WindowId::Projects, title: "Projects" },
    DesktopIcon { id: WindowId::Experience, title: "Experience" },
    DesktopIcon { id: WindowId::Contact, title: "Contact" },
    DesktopIcon { id: WindowId::Cv, title: "CV / Letter" },
];

/// Progress of the boot screen, in percent
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BootSequence {
    progress: u32,
}

impl BootSequence {
    pub fn progress(&self) -> u32 {
        self.progress
    }

    pub fn is_done(&self) -> bool {
        self.progress >= 100
    }

    /// One tick of the progress bar: fast at first, slower near the end.
    /// Returns true once loading is complete.
    pub fn advance(&mut self) -> bool {
        let step = match self.progress {
            0..=29 => 12,
            30..=69 => 7,
            _ => 4,
        };
        self.progress = (self.progress + step).min(100);
        self.is_done()
    }
}

pub struct ShellController {
    phase: ShellPhase,
    windows: WindowManager,
    start_menu: StartMenu,
    context_menu: Option<ContextMenu>,
    selected_icon: Option<WindowId>,
    muted: bool,
    dark_mode: bool,
    viewport: Viewport,
    drag_margin: DragMargin,
    sound: Box<dyn SoundPlayer>,
    content: Box<dyn ContentProvider>,
}

impl ShellController {
    pub fn new(config: &ShellConfig, sound: Box<dyn SoundPlayer>) -> Result<Self> {
        config.validate()?;
        let windows = WindowManager::with_z_index_base(config.registry()?, config.z_index_base);
        Ok(Self {
            phase: ShellPhase::Boot,
            windows,
            start_menu: StartMenu::new(),
            context_menu: None,
            selected_icon: None,
            muted: config.muted,
            dark_mode: config.dark_mode,
            viewport: config.viewport(),
            drag_margin: config.drag_margin,
            sound,
            content: Box::new(PortfolioContent),
        })
    }

    pub fn with_content_provider(mut self, provider: impl ContentProvider + 'static) -> Self {
        self.content = Box::new(provider);
        self
    }

    // ===== Phases =====

    pub fn phase(&self) -> ShellPhase {
        self.phase
    }

    pub fn complete_boot(&mut self) -> Result<()> {
        self.advance_phase(ShellPhase::Boot, ShellPhase::Login)
    }

    /// Any password is accepted; the chime plays once the desktop is up.
    pub fn login(&mut self) -> Result<()> {
        self.advance_phase(ShellPhase::Login, ShellPhase::Desktop)?;
        self.play(Sound::Startup);
        Ok(())
    }

    fn advance_phase(&mut self, from: ShellPhase, to: ShellPhase) -> Result<()> {
        if self.phase != from {
            let err = ShellError::PhaseTransition {
                from: self.phase,
                to,
            };
            warn!("rejected phase change: {}", err);
            return Err(err);
        }
        info!(?from, ?to, "shell phase changed");
        self.phase = to;
        Ok(())
    }

    // ===== Windows =====

    pub fn windows(&self) -> &WindowManager {
        &self.windows
    }

    pub fn subscribe(
        &mut self,
        listener: impl FnMut(&WindowEvent) + Send + 'static,
    ) -> SubscriptionId {
        self.windows.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.windows.unsubscribe(id)
    }

    pub fn open_window(&mut self, id: WindowId) -> Result<()> {
        self.require_desktop()?;
        self.windows.open(id)?;
        self.play(Sound::Open);
        Ok(())
    }

    pub fn close_window(&mut self, id: WindowId) {
        if self.windows.close(id).is_some() {
            self.play(Sound::Close);
        }
    }

    /// Route a command from a view, the taskbar or the start menu.
    pub fn dispatch(&mut self, command: WindowCommand) -> Result<()> {
        self.require_desktop()?;
        match command {
            WindowCommand::Open { id } => self.open_window(id),
            WindowCommand::Close { id } => {
                self.close_window(id);
                Ok(())
            }
            other => self.windows.apply(other),
        }
    }

    pub fn content(&self, id: WindowId) -> WindowContent {
        self.content.content(id)
    }

    // ===== Taskbar =====

    pub fn taskbar_buttons(&self) -> Vec<TaskbarButton> {
        taskbar::taskbar_buttons(&self.windows)
    }

    /// The click tone is the only feedback; restoring a window is not an open.
    pub fn taskbar_click(&mut self, id: WindowId) -> Result<()> {
        self.require_desktop()?;
        self.play(Sound::Click);
        match taskbar::taskbar_click(&self.windows, id) {
            WindowCommand::Open { id } => self.windows.open(id).map(|_| ()),
            other => self.dispatch(other),
        }
    }

    pub fn start_menu(&self) -> &StartMenu {
        &self.start_menu
    }

    pub fn start_menu_mut(&mut self) -> &mut StartMenu {
        &mut self.start_menu
    }

    pub fn toggle_start_menu(&mut self) {
        self.context_menu = None;
        self.start_menu.toggle();
    }

    pub fn start_menu_select(&mut self, id: WindowId) -> Result<()> {
        self.require_desktop()?;
        let command = self.start_menu.select(id);
        self.dispatch(command)
    }

    // ===== Desktop =====

    pub fn desktop_icons(&self) -> &'static [DesktopIcon] {
        &DESKTOP_ICONS
    }

    pub fn selected_icon(&self) -> Option<WindowId> {
        self.selected_icon
    }

    pub fn icon_click(&mut self, id: WindowId) {
        self.selected_icon = Some(id);
        self.play(Sound::Click);
    }

    pub fn icon_open(&mut self, id: WindowId) -> Result<()> {
        self.open_window(id)
    }

    /// Click on empty desktop: drop selection and dismiss menus
    pub fn desktop_click(&mut self) {
        self.selected_icon = None;
        self.context_menu = None;
        self.start_menu.close();
    }

    pub fn context_menu(&self) -> Option<&ContextMenu> {
        self.context_menu.as_ref()
    }

    pub fn open_context_menu(&mut self, pointer: Point) {
        self.start_menu.close();
        self.context_menu = Some(ContextMenu::at(pointer, &self.viewport));
    }

    pub fn dismiss_context_menu(&mut self) {
        self.context_menu = None;
    }

    pub fn choose_context_item(&mut self, item: ContextMenuItem) {
        if item == ContextMenuItem::Personalize {
            self.toggle_theme();
        }
        self.context_menu = None;
    }

    // ===== Tray =====

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    pub fn toggle_mute(&mut self) -> bool {
        self.muted = !self.muted;
        info!(muted = self.muted, "sound toggled");
        self.muted
    }

    pub fn is_dark_mode(&self) -> bool {
        self.dark_mode
    }

    pub fn toggle_theme(&mut self) -> bool {
        self.dark_mode = !self.dark_mode;
        info!(dark_mode = self.dark_mode, "theme toggled");
        self.dark_mode
    }

    // ===== Geometry =====

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    pub fn drag_margin(&self) -> DragMargin {
        self.drag_margin
    }

    fn require_desktop(&self) -> Result<()> {
        if self.phase != ShellPhase::Desktop {
            warn!(phase = ?self.phase, "window operation before the desktop is up");
            return Err(ShellError::NotOnDesktop(self.phase));
        }
        Ok(())
    }

    fn play(&self, sound: Sound) {
        if !self.muted {
            self.sound.play(sound);
        }
    }
}
