//! Theme store: light/dark preference applied to a document surface.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::storage::{LocalStorage, THEME_KEY};

pub const THEME_ATTRIBUTE: &str = "data-theme";
pub const DARK_CLASS: &str = "dark";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    #[default]
    Dark,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "light" => Some(Theme::Light),
            "dark" => Some(Theme::Dark),
            _ => None,
        }
    }

    pub fn toggled(&self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

/// Which element of the surface a theme mutation targets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Root,
    Body,
}

/// Where theme side effects land
pub trait ThemeSurface {
    fn set_attribute(&mut self, target: Target, name: &str, value: &str);
    fn add_class(&mut self, target: Target, class: &str);
    fn remove_class(&mut self, target: Target, class: &str);
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    pub attributes: BTreeMap<String, String>,
    pub classes: BTreeSet<String>,
}

impl Element {
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.contains(class)
    }
}

/// In-memory document with a root and a body element
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    pub root: Element,
    pub body: Element,
}

impl Document {
    fn element_mut(&mut self, target: Target) -> &mut Element {
        match target {
            Target::Root => &mut self.root,
            Target::Body => &mut self.body,
        }
    }
}

impl ThemeSurface for Document {
    fn set_attribute(&mut self, target: Target, name: &str, value: &str) {
        self.element_mut(target)
            .attributes
            .insert(name.to_string(), value.to_string());
    }

    fn add_class(&mut self, target: Target, class: &str) {
        self.element_mut(target).classes.insert(class.to_string());
    }

    fn remove_class(&mut self, target: Target, class: &str) {
        self.element_mut(target).classes.remove(class);
    }
}

pub struct ThemeStore<S: ThemeSurface> {
    theme: Theme,
    storage: LocalStorage,
    surface: S,
}

impl<S: ThemeSurface> ThemeStore<S> {
    /// Load the stored preference (dark by default) and apply it
    pub fn new(storage: LocalStorage, surface: S) -> Self {
        let theme = match storage.get_item(THEME_KEY) {
            Ok(Some(raw)) => Theme::parse(&raw).unwrap_or_else(|| {
                warn!("Ignoring unknown stored theme: {:?}", raw);
                Theme::default()
            }),
            Ok(None) => Theme::default(),
            Err(e) => {
                warn!("Failed to read stored theme: {}", e);
                Theme::default()
            }
        };

        let mut store = Self {
            theme,
            storage,
            surface,
        };
        store.apply();
        store
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn is_dark(&self) -> bool {
        self.theme == Theme::Dark
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn toggle_theme(&mut self) {
        self.set_theme(self.theme.toggled());
    }

    /// Switch theme; setting the current value does nothing
    pub fn set_theme(&mut self, theme: Theme) {
        if theme == self.theme {
            return;
        }

        self.theme = theme;
        self.apply();

        if let Err(e) = self.storage.set_item(THEME_KEY, theme.as_str()) {
            warn!("Failed to persist theme: {}", e);
        }
    }

    fn apply(&mut self) {
        let value = self.theme.as_str();
        self.surface.set_attribute(Target::Root, THEME_ATTRIBUTE, value);

        for target in [Target::Root, Target::Body] {
            if self.theme == Theme::Dark {
                self.surface.add_class(target, DARK_CLASS);
            } else {
                self.surface.remove_class(target, DARK_CLASS);
            }
        }

        debug!("Applied theme: {}", value);
    }
}
