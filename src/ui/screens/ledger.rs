use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};
use rust_decimal::Decimal;

use crate::models::Transaction;
use crate::ui::app::App;
use crate::ui::theme;
use crate::ui::util::{format_amount, truncate};

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5), // Totals
            Constraint::Min(5),    // Transactions
        ])
        .split(area);

    render_totals(f, chunks[0], app);
    render_list(f, chunks[1], app);
}

fn render_totals(f: &mut Frame, area: Rect, app: &App) {
    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(34),
            Constraint::Percentage(33),
            Constraint::Percentage(33),
        ])
        .split(area);

    let income_count = app.rows.iter().filter(|r| r.is_income).count();
    let expense_count = app.rows.len() - income_count;

    render_card(
        f,
        cards[0],
        "Balance",
        app.totals.balance,
        theme::balance_style(app.totals.balance),
        None,
    );
    render_card(
        f,
        cards[1],
        "Income",
        app.totals.income,
        theme::income_style().add_modifier(Modifier::BOLD),
        Some(format!("{income_count} txns")),
    );
    render_card(
        f,
        cards[2],
        "Expenses",
        app.totals.expense,
        theme::expense_style().add_modifier(Modifier::BOLD),
        Some(format!("{expense_count} txns")),
    );
}

fn render_card(
    f: &mut Frame,
    area: Rect,
    title: &str,
    amount: Decimal,
    style: Style,
    subtitle: Option<String>,
) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::BORDER))
        .title(Span::styled(
            format!(" {title} "),
            Style::default()
                .fg(theme::MUTED)
                .add_modifier(Modifier::BOLD),
        ));

    let text = Paragraph::new(vec![
        Line::from(Span::styled(format_amount(amount), style)),
        Line::from(Span::styled(subtitle.unwrap_or_default(), theme::dim_style())),
    ])
    .centered()
    .block(block);

    f.render_widget(text, area);
}

fn render_list(f: &mut Frame, area: Rect, app: &App) {
    if app.rows.is_empty() {
        let msg = vec![
            Line::from(""),
            Line::from(Span::styled("No transactions yet", theme::dim_style())),
            Line::from(""),
            Line::from(Span::styled(
                "Press n for the form or use :add income ride 120",
                theme::dim_style(),
            )),
        ];
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme::BORDER))
            .title(Span::styled(
                " Transactions (0) ",
                Style::default()
                    .fg(theme::MUTED)
                    .add_modifier(Modifier::BOLD),
            ));
        f.render_widget(Paragraph::new(msg).centered().block(block), area);
        return;
    }

    let header_cells = ["Date", "Category", "Description", "Amount"]
        .iter()
        .map(|h| Cell::from(*h).style(theme::header_style()));
    let header = Row::new(header_cells).height(1);

    let rows: Vec<Row> = app
        .rows
        .iter()
        .enumerate()
        .skip(app.transaction_scroll)
        .take(area.height.saturating_sub(3) as usize)
        .map(|(i, row)| {
            let amount_style = theme::amount_style(row.is_income);

            let style = if i == app.transaction_index {
                theme::selected_style()
            } else if i % 2 == 1 {
                theme::alt_row_style()
            } else {
                theme::normal_style()
            };

            let description_style = if row.description == Transaction::NO_DESCRIPTION {
                theme::dim_style()
            } else {
                Style::default()
            };

            Row::new(vec![
                Cell::from(format!("  {}", row.date)),
                Cell::from(row.category),
                Cell::from(Span::styled(truncate(&row.description, 40), description_style)),
                Cell::from(Span::styled(row.amount.as_str(), amount_style)),
            ])
            .style(style)
        })
        .collect();

    let widths = [
        Constraint::Length(14),
        Constraint::Length(14),
        Constraint::Min(20),
        Constraint::Length(18),
    ];

    let table = Table::new(rows, widths).header(header).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme::BORDER))
            .title(Span::styled(
                format!(" Transactions ({}) ", app.rows.len()),
                Style::default()
                    .fg(theme::MUTED)
                    .add_modifier(Modifier::BOLD),
            )),
    );

    f.render_widget(table, area);
}
