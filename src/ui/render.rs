use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Tabs},
    Frame,
};

use super::app::{App, InputMode, Screen};
use super::commands;
use super::theme;

pub(crate) fn render(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Tab bar
            Constraint::Min(5),    // Main content
            Constraint::Length(1), // Status bar
            Constraint::Length(1), // Command bar
        ])
        .split(f.area());

    render_tab_bar(f, chunks[0], app);
    render_screen(f, chunks[1], app);
    render_status_bar(f, chunks[2], app);
    render_command_bar(f, chunks[3], app);

    if app.show_help {
        render_help_overlay(f, f.area(), app);
    }
}

fn render_tab_bar(f: &mut Frame, area: Rect, app: &App) {
    let titles: Vec<Line> = Screen::all()
        .iter()
        .enumerate()
        .map(|(i, screen)| {
            let style = if *screen == app.screen {
                theme::title_style()
            } else {
                theme::dim_style()
            };
            Line::from(vec![
                Span::styled(format!("{} ", i + 1), theme::dim_style()),
                Span::styled(screen.to_string(), style),
            ])
        })
        .collect();

    let tabs = Tabs::new(titles)
        .divider(Span::styled(" · ", Style::default().fg(theme::BORDER)))
        .style(Style::default().bg(theme::PANEL_BG));

    f.render_widget(tabs, area);
}

fn render_screen(f: &mut Frame, area: Rect, app: &App) {
    match app.screen {
        Screen::Ledger => super::screens::ledger::render(f, area, app),
        Screen::New => super::screens::form::render(f, area, app),
        Screen::Remote => super::screens::remote::render(f, area, app),
    }
}

fn render_status_bar(f: &mut Frame, area: Rect, app: &App) {
    let mode_label = format!(" {} ", app.input_mode);
    let mode_style = theme::mode_style(app.input_mode);

    let mode = if app.remote.is_none() {
        "local only".to_string()
    } else if app.is_syncing() {
        "syncing…".to_string()
    } else {
        match app.source {
            Some(source) => format!("{source}"),
            None => "mirrored".to_string(),
        }
    };
    let info = format!(" {} | {} txns | {}", app.screen, app.rows.len(), mode);

    let right = match app.screen {
        Screen::Ledger => " j/k move | D delete | n new | ? help ",
        Screen::New => " j/k field | +/- change | Enter edit | ? help ",
        Screen::Remote => " :config | :refresh | :disconnect | ? help ",
    };

    let available = area.width as usize;
    let used = mode_label.len() + info.len() + right.len();
    let pad = available.saturating_sub(used);

    let bar = Paragraph::new(Line::from(vec![
        Span::styled(&mode_label, mode_style),
        Span::styled(&info, theme::status_bar_style()),
        Span::styled(" ".repeat(pad), theme::status_bar_style()),
        Span::styled(right, theme::status_bar_style()),
    ]));
    f.render_widget(bar, area);
}

fn render_command_bar(f: &mut Frame, area: Rect, app: &App) {
    let (content, cursor_offset) = match app.input_mode {
        InputMode::Command => (
            Line::from(vec![
                Span::styled(":", Style::default().fg(theme::ACCENT)),
                Span::styled(&app.command_input, theme::command_bar_style()),
            ]),
            Some(1 + app.command_input.len() as u16),
        ),
        InputMode::Editing => (
            Line::from(vec![
                Span::styled("edit> ", Style::default().fg(theme::INCOME)),
                Span::styled(&app.command_input, theme::command_bar_style()),
            ]),
            Some(6 + app.command_input.len() as u16),
        ),
        InputMode::Confirm => (
            Line::from(vec![
                Span::styled(&app.confirm_message, Style::default().fg(theme::WARN)),
                Span::styled(" [y/N] ", Style::default().fg(theme::EXPENSE)),
            ]),
            None,
        ),
        InputMode::Normal => (
            if app.status_message.is_empty() {
                Line::from(Span::styled(
                    " : run a command   ? keys and commands",
                    theme::dim_style(),
                ))
            } else {
                Line::from(Span::styled(
                    &app.status_message,
                    theme::command_bar_style(),
                ))
            },
            None,
        ),
    };

    let bar = Paragraph::new(content).style(Style::default().bg(theme::BAR_BG));
    f.render_widget(bar, area);

    if let Some(offset) = cursor_offset {
        f.set_cursor_position((area.x + offset, area.y));
    }
}

/// Keys grouped by where they apply.
const KEY_HELP: &[(&str, &[(&str, &str)])] = &[
    (
        "Anywhere",
        &[
            ("1 2 3, Tab", "Ledger, New, Remote"),
            (":", "Command line"),
            ("?", "This help"),
            ("Ctrl-q", "Quit (waits for mirror writes)"),
        ],
    ),
    (
        "Ledger",
        &[
            ("j/k, g/G", "Move, jump to newest/oldest"),
            ("Ctrl-d/u", "Half page down/up"),
            ("n", "New transaction"),
            ("D", "Delete the selected transaction"),
        ],
    ),
    (
        "New transaction",
        &[
            ("j/k", "Previous/next field"),
            ("+/-, h/l", "Flip type, cycle category"),
            ("Enter", "Edit a text field, or save on Submit"),
            ("Esc", "Back to the ledger"),
        ],
    ),
];

pub(crate) fn help_lines(app: &App) -> Vec<Line<'static>> {
    let mut lines = vec![
        Line::from(Span::styled(" RideLedger ", theme::title_style())),
        Line::from(Span::styled(
            match &app.remote {
                Some(config) => format!(" Mirroring to {}", config.endpoint),
                None => " Local only, set a mirror with :config".to_string(),
            },
            theme::dim_style(),
        )),
    ];

    for (section, keys) in KEY_HELP {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(format!(" {section}"), theme::section_style())));
        for (key, what) in *keys {
            lines.push(Line::from(vec![
                Span::styled(format!("  {key:<12}"), Style::default().fg(theme::ACCENT)),
                Span::styled(*what, theme::normal_style()),
            ]));
        }
    }

    // One line per command, under its longest alias.
    let mut by_description: Vec<(&str, &str)> = Vec::new();
    for (&name, cmd) in commands::COMMANDS.iter() {
        match by_description.iter_mut().find(|(_, d)| *d == cmd.description) {
            Some(entry) if entry.0.len() < name.len() => entry.0 = name,
            Some(_) => {}
            None => by_description.push((name, cmd.description)),
        }
    }
    by_description.sort_by_key(|(name, _)| *name);

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(" Commands", theme::section_style())));
    for (name, desc) in by_description {
        lines.push(Line::from(vec![
            Span::styled(format!("  :{name:<11}"), Style::default().fg(theme::ACCENT)),
            Span::styled(desc, theme::normal_style()),
        ]));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(" any key closes", theme::dim_style())));
    lines
}

fn render_help_overlay(f: &mut Frame, area: Rect, app: &App) {
    let lines = help_lines(app);

    let height = (lines.len() as u16 + 2).min(area.height.saturating_sub(2));
    let width = 60.min(area.width.saturating_sub(4));
    let popup = Rect::new(
        area.x + area.width.saturating_sub(width) / 2,
        area.y + area.height.saturating_sub(height) / 2,
        width,
        height,
    );

    f.render_widget(Clear, popup);
    f.render_widget(
        Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme::BORDER))
                .style(Style::default().bg(theme::PANEL_BG)),
        ),
        popup,
    );
}
