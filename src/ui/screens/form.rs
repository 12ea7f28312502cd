use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

use crate::models::{Category, TxnType};
use crate::ui::app::{App, FormField, InputMode};
use crate::ui::theme;

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(8), // Fields
            Constraint::Min(3),    // Category hint
        ])
        .split(area);

    render_fields(f, chunks[0], app);
    render_hint(f, chunks[1], app);
}

fn render_fields(f: &mut Frame, area: Rect, app: &App) {
    let form = &app.form;
    let items: Vec<ListItem> = FormField::all()
        .iter()
        .enumerate()
        .map(|(i, field)| {
            let is_cursor = i == form.field_index;
            let editing = is_cursor && app.input_mode == InputMode::Editing;

            if *field == FormField::Submit {
                let style = if is_cursor {
                    theme::selected_style().add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(theme::ACCENT)
                };
                return ListItem::new(Line::from(Span::styled(field.label(), style)));
            }

            let value = if editing {
                format!("{}_", app.command_input)
            } else {
                let v = form.value(*field);
                if v.is_empty() {
                    "—".to_string()
                } else if field.is_text() {
                    v
                } else {
                    format!("< {v} >")
                }
            };

            let value_style = if is_cursor {
                theme::selected_style()
            } else if *field == FormField::Type {
                theme::amount_style(form.txn_type == TxnType::Income)
            } else {
                theme::normal_style()
            };

            ListItem::new(Line::from(vec![
                Span::styled(
                    format!("{:<14}", field.label()),
                    Style::default().fg(theme::MUTED),
                ),
                Span::styled(value, value_style),
            ]))
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme::BORDER))
            .title(Span::styled(
                " New Transaction ",
                Style::default()
                    .fg(theme::MUTED)
                    .add_modifier(Modifier::BOLD),
            )),
    );
    f.render_widget(list, area);
}

fn render_hint(f: &mut Frame, area: Rect, app: &App) {
    let field = app.form.field();
    let mut lines = vec![Line::from(Span::styled(
        match field {
            FormField::Type | FormField::Category => " +/- or h/l to change the value",
            FormField::Description => " Optional. Enter to edit",
            FormField::Amount => " Positive number, e.g. 120 or 45,90. Enter to edit",
            FormField::Date => " YYYY-MM-DD. Enter to edit",
            FormField::Submit => " Enter to add the transaction",
        },
        theme::dim_style(),
    ))];

    if field == FormField::Category {
        let names: Vec<&str> = Category::all().iter().map(|c| c.label()).collect();
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!(" {}", names.join(" · ")),
            theme::dim_style(),
        )));
    }

    let hint = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme::BORDER))
            .title(Span::styled(
                " j/k navigate, Enter edit/submit, Esc back ",
                theme::dim_style(),
            )),
    );
    f.render_widget(hint, area);
}
