//! Centralized theme module for TUI color constants and styles

use ratatui::prelude::*;

use crate::config::ThemeSetting;

/// Complete color palette for the TUI
#[derive(Debug, Clone)]
pub struct ThemeColors {
    // Verdict colors (green approved, amber below threshold)
    pub approved: Color,
    pub not_approved: Color,
    pub threshold_marker: Color,

    // Score bar colors
    pub bar_empty: Color,

    // Table colors
    pub row_alt_bg: Color,
    pub grade_selected: Style,
    pub grade_empty: Color,

    // Styles
    pub header_style: Style,
    pub row_selected: Style,
    pub field_focused: Style,

    // General colors
    pub muted: Color,
    pub title_color: Color,

    // Tab colors
    pub tab_active_style: Style,
    pub tab_inactive_style: Style,

    // Status bar colors
    pub status_bar_bg: Color,
    pub status_key_color: Color,
    pub flash_success: Color,
    pub flash_error: Color,

    // Popup overlay colors
    pub popup_border: Color,
    pub popup_title: Style,
}

impl ThemeColors {
    pub fn dark() -> Self {
        Self {
            approved: Color::Green,
            not_approved: Color::Rgb(245, 158, 11),
            threshold_marker: Color::Red,
            bar_empty: Color::DarkGray,
            row_alt_bg: Color::Indexed(235),
            grade_selected: Style::new().fg(Color::Cyan).bold(),
            grade_empty: Color::DarkGray,
            header_style: Style::new().bold(),
            row_selected: Style::new().reversed(),
            field_focused: Style::new().fg(Color::Cyan).bold(),
            muted: Color::Gray,
            title_color: Color::Cyan,
            tab_active_style: Style::new().fg(Color::Cyan).bold().reversed(),
            tab_inactive_style: Style::new().fg(Color::DarkGray),
            status_bar_bg: Color::Indexed(236),
            status_key_color: Color::Cyan,
            flash_success: Color::Green,
            flash_error: Color::Red,
            popup_border: Color::Cyan,
            popup_title: Style::new().fg(Color::Cyan).bold(),
        }
    }

    pub fn light() -> Self {
        Self {
            approved: Color::Rgb(21, 128, 61),
            not_approved: Color::Rgb(180, 83, 9),
            threshold_marker: Color::Rgb(220, 38, 38),
            bar_empty: Color::Indexed(250),
            row_alt_bg: Color::Indexed(254),
            grade_selected: Style::new().fg(Color::Blue).bold(),
            grade_empty: Color::Indexed(246),
            header_style: Style::new().bold(),
            row_selected: Style::new().reversed(),
            field_focused: Style::new().fg(Color::Blue).bold(),
            muted: Color::Indexed(242),
            title_color: Color::Blue,
            tab_active_style: Style::new().fg(Color::Blue).bold().reversed(),
            tab_inactive_style: Style::new().fg(Color::Indexed(246)),
            status_bar_bg: Color::Indexed(253),
            status_key_color: Color::Blue,
            flash_success: Color::Rgb(21, 128, 61),
            flash_error: Color::Rgb(220, 38, 38),
            popup_border: Color::Blue,
            popup_title: Style::new().fg(Color::Blue).bold(),
        }
    }

    /// Color for a score relative to the approval threshold
    pub fn verdict_color(&self, approved: bool) -> Color {
        if approved {
            self.approved
        } else {
            self.not_approved
        }
    }
}

/// Pick the palette for the configured theme.
///
/// `auto` asks the terminal for its background luminance and falls back to
/// dark when the terminal does not answer.
pub fn resolve_theme(setting: ThemeSetting) -> ThemeColors {
    match setting {
        ThemeSetting::Dark => ThemeColors::dark(),
        ThemeSetting::Light => ThemeColors::light(),
        ThemeSetting::Auto => match terminal_light::luma() {
            Ok(luma) if luma > 0.6 => ThemeColors::light(),
            Ok(_) => ThemeColors::dark(),
            Err(e) => {
                tracing::debug!(error = %e, "terminal background detection failed");
                ThemeColors::dark()
            }
        },
    }
}
