//! Color palette and preset styles for the analyzer screens.

use ratatui::style::{Color, Modifier, Style};

use crate::domain::OutcomeKind;

/// Analyzer theme.
pub struct AnalyzerTheme;

impl AnalyzerTheme {
    /// Indigo accent
    pub const ACCENT: Color = Color::Rgb(99, 102, 241); // #6366F1
    pub const ACCENT_LIGHT: Color = Color::Rgb(165, 180, 252); // #A5B4FC
    pub const ACCENT_DARK: Color = Color::Rgb(55, 48, 163); // #3730A3

    pub const BORDER: Color = Color::Rgb(148, 163, 184); // #94A3B8

    pub const SUCCESS: Color = Color::Rgb(16, 185, 129); // #10B981
    pub const WARNING: Color = Color::Rgb(251, 191, 36); // #FBBF24
    pub const DANGER: Color = Color::Rgb(244, 63, 94); // #F43F5E

    /// Volumes (cm3)
    pub const VOLUME: Color = Color::Rgb(56, 189, 248); // #38BDF8
    /// Percentages
    pub const PERCENT: Color = Color::Rgb(192, 132, 252); // #C084FC

    pub const TEXT_PRIMARY: Color = Color::Rgb(248, 250, 252); // #F8FAFC
    pub const TEXT_SECONDARY: Color = Color::Rgb(148, 163, 184); // #94A3B8
    pub const TEXT_MUTED: Color = Color::Rgb(100, 116, 139); // #64748B

    #[must_use]
    pub fn title() -> Style {
        Style::default()
            .fg(Self::TEXT_PRIMARY)
            .add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn subtitle() -> Style {
        Style::default()
            .fg(Self::ACCENT_LIGHT)
            .add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn text() -> Style {
        Style::default().fg(Self::TEXT_PRIMARY)
    }

    #[must_use]
    pub fn text_secondary() -> Style {
        Style::default().fg(Self::TEXT_SECONDARY)
    }

    #[must_use]
    pub fn text_muted() -> Style {
        Style::default().fg(Self::TEXT_MUTED)
    }

    #[must_use]
    pub fn success() -> Style {
        Style::default().fg(Self::SUCCESS)
    }

    #[must_use]
    pub fn warning() -> Style {
        Style::default().fg(Self::WARNING)
    }

    #[must_use]
    pub fn danger() -> Style {
        Style::default().fg(Self::DANGER)
    }

    #[must_use]
    pub fn focused() -> Style {
        Style::default()
            .fg(Self::ACCENT_LIGHT)
            .add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn cursor() -> Style {
        Style::default().fg(Self::ACCENT_LIGHT)
    }

    #[must_use]
    pub fn border() -> Style {
        Style::default().fg(Self::BORDER)
    }

    #[must_use]
    pub fn border_focused() -> Style {
        Style::default().fg(Self::ACCENT)
    }

    /// Table header row
    #[must_use]
    pub fn table_header() -> Style {
        Style::default()
            .fg(Self::TEXT_PRIMARY)
            .bg(Self::ACCENT_DARK)
            .add_modifier(Modifier::BOLD)
    }

    /// Distance column
    #[must_use]
    pub fn distance() -> Style {
        Style::default()
            .fg(Self::ACCENT_LIGHT)
            .add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn key_hint() -> Style {
        Style::default()
            .fg(Self::ACCENT_LIGHT)
            .add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn key_desc() -> Style {
        Style::default().fg(Self::TEXT_SECONDARY)
    }

    /// Value style for a predicted outcome.
    #[must_use]
    pub fn outcome(kind: OutcomeKind) -> Style {
        let color = match kind {
            OutcomeKind::Volume => Self::VOLUME,
            OutcomeKind::Percentage => Self::PERCENT,
        };
        Style::default().fg(color).add_modifier(Modifier::BOLD)
    }
}
