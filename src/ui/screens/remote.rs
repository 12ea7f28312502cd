use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::ledger::Source;
use crate::ui::app::App;
use crate::ui::theme;

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(7), // Connection
            Constraint::Min(5),    // Usage
        ])
        .split(area);

    render_connection(f, chunks[0], app);
    render_usage(f, chunks[1]);
}

fn label(text: &str) -> Span<'static> {
    Span::styled(format!(" {text:<16}"), Style::default().fg(theme::MUTED))
}

fn render_connection(f: &mut Frame, area: Rect, app: &App) {
    let lines = match &app.remote {
        None => vec![
            Line::from(vec![
                label("Mode"),
                Span::styled("Local only", Style::default().fg(theme::WARN)),
            ]),
            Line::from(""),
            Line::from(Span::styled(
                " No remote mirror configured. Transactions stay on this machine.",
                theme::dim_style(),
            )),
        ],
        Some(config) => {
            let (status, status_style) = if app.is_syncing() {
                ("Loading from mirror…".to_string(), Style::default().fg(theme::WARN))
            } else {
                match app.source {
                    Some(Source::Remote) => ("Loaded from mirror".to_string(), theme::income_style()),
                    Some(Source::Local) => (
                        "Mirror unavailable, showing local copy".to_string(),
                        theme::expense_style(),
                    ),
                    None => ("Not loaded yet".to_string(), theme::dim_style()),
                }
            };

            vec![
                Line::from(vec![
                    label("Mode"),
                    Span::styled(
                        "Mirrored",
                        Style::default()
                            .fg(theme::ACCENT)
                            .add_modifier(Modifier::BOLD),
                    ),
                ]),
                Line::from(vec![
                    label("Endpoint"),
                    Span::styled(config.endpoint.as_str(), theme::normal_style()),
                ]),
                Line::from(vec![
                    label("Key"),
                    Span::styled(config.masked_key(), theme::normal_style()),
                ]),
                Line::from(vec![label("Status"), Span::styled(status, status_style)]),
                Line::from(vec![
                    label("Pending writes"),
                    Span::styled(app.pending_writes.to_string(), theme::normal_style()),
                ]),
            ]
        }
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::BORDER))
        .title(Span::styled(
            " Remote Mirror ",
            Style::default()
                .fg(theme::MUTED)
                .add_modifier(Modifier::BOLD),
        ));
    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_usage(f: &mut Frame, area: Rect) {
    let lines = vec![
        Line::from(Span::styled(
            " :config <endpoint> <key>   Save the mirror and load the ledger from it",
            theme::normal_style(),
        )),
        Line::from(Span::styled(
            " :refresh                   Load the ledger from the mirror again",
            theme::normal_style(),
        )),
        Line::from(Span::styled(
            " :disconnect                Forget the mirror and run local only",
            theme::normal_style(),
        )),
        Line::from(""),
        Line::from(Span::styled(
            " Writes are saved locally first and sent to the mirror in the background.",
            theme::dim_style(),
        )),
        Line::from(Span::styled(
            " A failed mirror write is logged and not retried.",
            theme::dim_style(),
        )),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::BORDER))
        .title(Span::styled(" Commands ", theme::dim_style()));
    f.render_widget(Paragraph::new(lines).block(block), area);
}
