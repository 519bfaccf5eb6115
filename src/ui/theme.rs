//! Theme application
//!
//! Light and dark map to egui's built-in visuals. The system theme installs
//! whichever of the two the operating system reports, and eframe keeps
//! following the OS from there.

use crate::config::Theme;
use eframe::egui::{Context, Visuals};
use log::debug;

/// Applies the configured theme to the egui context when it changes.
#[derive(Debug, Clone)]
pub struct ThemeManager {
    current_theme: Theme,
    needs_apply: bool,
}

impl ThemeManager {
    pub fn new(theme: Theme) -> Self {
        Self {
            current_theme: theme,
            needs_apply: true,
        }
    }

    pub fn current_theme(&self) -> Theme {
        self.current_theme
    }

    pub fn set_theme(&mut self, theme: Theme) {
        if theme != self.current_theme {
            self.current_theme = theme;
            self.needs_apply = true;
        }
    }

    /// Cycle light, dark, system.
    pub fn cycle(&mut self) -> Theme {
        let next = match self.current_theme {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::System,
            Theme::System => Theme::Light,
        };
        self.set_theme(next);
        next
    }

    /// Visuals to install. `system_dark` is the OS preference, if known.
    pub fn visuals(&self, system_dark: Option<bool>) -> Visuals {
        let dark = match self.current_theme {
            Theme::Light => Some(false),
            Theme::Dark => Some(true),
            Theme::System => system_dark,
        };
        match dark {
            Some(true) => Visuals::dark(),
            Some(false) => Visuals::light(),
            None => Visuals::default(),
        }
    }

    /// Apply the theme if it changed since the last call. Returns `true` if applied.
    pub fn apply_if_needed(&mut self, ctx: &Context, system_dark: Option<bool>) -> bool {
        if !self.needs_apply {
            return false;
        }
        ctx.set_visuals(self.visuals(system_dark));
        self.needs_apply = false;
        debug!("Applied theme: {:?}", self.current_theme);
        true
    }

    /// Whether the context is currently drawing dark.
    pub fn is_dark(&self, ctx: &Context) -> bool {
        match self.current_theme {
            Theme::Light => false,
            Theme::Dark => true,
            Theme::System => ctx.style().visuals.dark_mode,
        }
    }
}
