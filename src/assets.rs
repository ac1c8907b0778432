//! Built-in icons and the title palette.

use crate::style::Color;
use crate::toast::{Category, Theme};
use crate::tree::Content;

pub const ICON_ERROR: &str = r##"<svg viewBox="0 0 22 22" fill="none"><circle cx="11" cy="11" r="11" fill="#FEE2E2"/><circle cx="11" cy="11" r="9" fill="#EF4444"/><path d="M8 8l6 6M14 8l-6 6" stroke="#fff" stroke-width="1.8" stroke-linecap="round"/></svg>"##;

pub const ICON_INFO: &str = r##"<svg viewBox="0 0 22 22" fill="none"><rect x="5" y="3" width="12" height="16" rx="2.5" stroke="#3B82F6" stroke-width="1.3" fill="#DBEAFE"/><rect x="3" y="4" width="12" height="16" rx="2.5" fill="#93B4F6" opacity=".35"/><line x1="8" y1="7" x2="14" y2="7" stroke="#3B82F6" stroke-width="1.1" stroke-linecap="round"/></svg>"##;

pub const ICON_SPINNER: &str = r#"<div class="toast-spinner"></div>"#;

pub const ICON_SUCCESS: &str = r##"<svg viewBox="0 0 22 22" fill="none"><circle cx="11" cy="11" r="11" fill="#DCFCE7"/><circle cx="11" cy="11" r="9" fill="#22C55E"/><path d="M7.5 11.5l2.5 2.5 4.5-5" stroke="#fff" stroke-width="1.8" stroke-linecap="round" stroke-linejoin="round"/></svg>"##;

pub const ICON_SUCCESS_DARK: &str = r##"<svg viewBox="0 0 22 22" fill="none"><circle cx="11" cy="11" r="10" fill="#166534"/><path d="M7.5 11.5l2.5 2.5 4.5-5" stroke="#4ADE80" stroke-width="1.8" stroke-linecap="round" stroke-linejoin="round"/></svg>"##;

/// Icon markup shown for a category. Loading toasts show the spinner.
pub fn icon(category: Category) -> Content {
    let markup = match category {
        Category::Error => ICON_ERROR,
        Category::Info => ICON_INFO,
        Category::Loading => ICON_SPINNER,
        Category::Success => ICON_SUCCESS,
    };
    Content::markup(markup)
}

/// Title (and action accent) color for a category under a theme.
pub fn title_color(theme: Theme, category: Category) -> Color {
    match (theme, category) {
        (Theme::Light, Category::Error) => Color::from_hex(0xDC2626),
        (Theme::Light, Category::Info) => Color::from_hex(0x2563EB),
        (Theme::Light, Category::Loading) => Color::from_hex(0x666666),
        (Theme::Light, Category::Success) => Color::from_hex(0x16A34A),
        (Theme::Dark, Category::Error) => Color::from_hex(0xF87171),
        (Theme::Dark, Category::Info) => Color::from_hex(0x60A5FA),
        (Theme::Dark, Category::Loading) => Color::from_hex(0xAAAAAA),
        (Theme::Dark, Category::Success) => Color::from_hex(0x4ADE80),
    }
}
