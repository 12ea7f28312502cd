use ratatui::style::{Color, Modifier, Style};
use rust_decimal::Decimal;

use super::app::InputMode;

// Dashboard-at-night palette: warm text on dark panels, money in green/red.
pub(crate) const PANEL_BG: Color = Color::Rgb(40, 40, 40);
pub(crate) const BAR_BG: Color = Color::Rgb(29, 32, 33);
pub(crate) const ROW_ALT: Color = Color::Rgb(50, 48, 47);
pub(crate) const BORDER: Color = Color::Rgb(80, 73, 69);
pub(crate) const TEXT: Color = Color::Rgb(235, 219, 178);
pub(crate) const MUTED: Color = Color::Rgb(146, 131, 116);
pub(crate) const ACCENT: Color = Color::Rgb(131, 165, 152);
pub(crate) const INCOME: Color = Color::Rgb(184, 187, 38);
pub(crate) const EXPENSE: Color = Color::Rgb(251, 73, 52);
pub(crate) const WARN: Color = Color::Rgb(250, 189, 47);

pub(crate) fn header_style() -> Style {
    Style::default()
        .fg(TEXT)
        .bg(PANEL_BG)
        .add_modifier(Modifier::BOLD)
}

pub(crate) fn selected_style() -> Style {
    Style::default().fg(PANEL_BG).bg(ACCENT)
}

pub(crate) fn normal_style() -> Style {
    Style::default().fg(TEXT)
}

pub(crate) fn dim_style() -> Style {
    Style::default().fg(MUTED)
}

pub(crate) fn title_style() -> Style {
    Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)
}

pub(crate) fn section_style() -> Style {
    Style::default().fg(WARN).add_modifier(Modifier::BOLD)
}

pub(crate) fn income_style() -> Style {
    Style::default().fg(INCOME)
}

pub(crate) fn expense_style() -> Style {
    Style::default().fg(EXPENSE)
}

pub(crate) fn amount_style(is_income: bool) -> Style {
    if is_income {
        income_style()
    } else {
        expense_style()
    }
}

/// Green above zero, red below, plain text at zero.
pub(crate) fn balance_style(balance: Decimal) -> Style {
    let style = if balance > Decimal::ZERO {
        income_style()
    } else if balance < Decimal::ZERO {
        expense_style()
    } else {
        normal_style()
    };
    style.add_modifier(Modifier::BOLD)
}

/// Badge at the left of the status bar.
pub(crate) fn mode_style(mode: InputMode) -> Style {
    let bg = match mode {
        InputMode::Normal => ACCENT,
        InputMode::Command | InputMode::Editing => INCOME,
        InputMode::Confirm => EXPENSE,
    };
    Style::default()
        .fg(PANEL_BG)
        .bg(bg)
        .add_modifier(Modifier::BOLD)
}

pub(crate) fn alt_row_style() -> Style {
    Style::default().fg(TEXT).bg(ROW_ALT)
}

pub(crate) fn command_bar_style() -> Style {
    Style::default().fg(TEXT).bg(BAR_BG)
}

pub(crate) fn status_bar_style() -> Style {
    Style::default().fg(MUTED).bg(ROW_ALT)
}
