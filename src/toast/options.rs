use std::fmt;
use std::rc::Rc;
use std::str::FromStr;

use crate::constants::{DEFAULT_COLLAPSE_TRANSITION_MS, DEFAULT_EXPAND_DELAY_MS};
use crate::ParseError;

use super::ToastHandle;

/// Kind of notification; picks the icon and the title color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Category {
    Error,
    #[default]
    Info,
    Loading,
    Success,
}

impl Category {
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Error => "error",
            Category::Info => "info",
            Category::Loading => "loading",
            Category::Success => "success",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "error" => Ok(Category::Error),
            "info" => Ok(Category::Info),
            "loading" => Ok(Category::Loading),
            "success" => Ok(Category::Success),
            _ => Err(ParseError::Category(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            _ => Err(ParseError::Theme(s.to_string())),
        }
    }
}

/// Callback invoked when the action button is clicked
pub type ActionCallback = Rc<dyn Fn(&ToastHandle)>;

/// Button shown at the bottom of the body
#[derive(Clone)]
pub struct ToastAction {
    pub label: String,
    pub on_click: Option<ActionCallback>,
}

impl fmt::Debug for ToastAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToastAction")
            .field("label", &self.label)
            .field("on_click", &self.on_click.is_some())
            .finish()
    }
}

/// Everything needed to create a toast.
///
/// ```ignore
/// ToastOptions::new()
///     .category(Category::Success)
///     .title("Uploaded")
///     .description("3 files are now available to your team.")
///     .action("View", |toast| toast.dismiss())
///     .auto_dismiss_after_ms(2_000)
/// ```
#[derive(Clone, Debug)]
pub struct ToastOptions {
    pub category: Category,
    pub theme: Theme,
    pub title: String,
    /// Plain-text paragraph shown in the body
    pub description: Option<String>,
    /// Markup fragment shown in the body below the description
    pub rich_content: Option<String>,
    pub action: Option<ToastAction>,
    /// Delay after entrance before a toast with a body expands on its own
    pub expand_delay_ms: u64,
    /// Lifetime of the toast once shown; 0 keeps it until dismissed
    pub auto_dismiss_after_ms: u64,
    /// Pause between starting a collapse and shrinking the body
    pub collapse_transition_ms: u64,
    /// Whether the toast can be swiped away
    pub swipe_dismiss: bool,
}

impl Default for ToastOptions {
    fn default() -> Self {
        Self {
            category: Category::Info,
            theme: Theme::Light,
            title: String::new(),
            description: None,
            rich_content: None,
            action: None,
            expand_delay_ms: DEFAULT_EXPAND_DELAY_MS,
            auto_dismiss_after_ms: 0,
            collapse_transition_ms: DEFAULT_COLLAPSE_TRANSITION_MS,
            swipe_dismiss: true,
        }
    }
}

impl ToastOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn category(mut self, category: Category) -> Self {
        self.category = category;
        self
    }

    pub fn theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Set the description. An empty string counts as no description.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into()).filter(|d| !d.is_empty());
        self
    }

    pub fn rich_content(mut self, markup: impl Into<String>) -> Self {
        self.rich_content = Some(markup.into()).filter(|m| !m.is_empty());
        self
    }

    /// Add an action button that runs `on_click` with the toast's handle.
    pub fn action(
        mut self,
        label: impl Into<String>,
        on_click: impl Fn(&ToastHandle) + 'static,
    ) -> Self {
        self.action = Some(ToastAction {
            label: label.into(),
            on_click: Some(Rc::new(on_click)),
        });
        self
    }

    /// Add an action button without a click handler.
    pub fn action_label(mut self, label: impl Into<String>) -> Self {
        self.action = Some(ToastAction {
            label: label.into(),
            on_click: None,
        });
        self
    }

    pub fn expand_delay_ms(mut self, ms: u64) -> Self {
        self.expand_delay_ms = ms;
        self
    }

    pub fn auto_dismiss_after_ms(mut self, ms: u64) -> Self {
        self.auto_dismiss_after_ms = ms;
        self
    }

    pub fn collapse_transition_ms(mut self, ms: u64) -> Self {
        self.collapse_transition_ms = ms;
        self
    }

    pub fn swipe_dismiss(mut self, enabled: bool) -> Self {
        self.swipe_dismiss = enabled;
        self
    }

    /// Whether any body section is present
    pub fn has_body(&self) -> bool {
        self.description.is_some()
            || self.rich_content.is_some()
            || self.action.as_ref().is_some_and(|a| !a.label.is_empty())
    }
}
