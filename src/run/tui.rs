use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyModifiers};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::time::Duration;
use tokio::runtime::Runtime;

use crate::config::RemoteConfig;
use crate::ledger::{Ledger, Source};
use crate::ui::app::{App, FormField, InputMode, PendingAction, Screen};
use crate::ui::commands;
use crate::ui::util::{scroll_down, scroll_to_bottom, scroll_to_top, scroll_up};

/// How long to wait for a key before checking background work again.
const TICK: Duration = Duration::from_millis(250);

pub(crate) fn as_tui(ledger: &mut Ledger, remote: Option<RemoteConfig>, runtime: &Runtime) -> Result<()> {
    let mut app = App::new(remote);
    app.refresh(ledger);
    app.hydration = ledger.begin_hydration();
    if app.is_syncing() {
        app.set_status("Loading ledger from the mirror…");
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app, ledger);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(ref e) = result {
        eprintln!("Error: {e:?}");
    }

    let pending = ledger.pending_writes();
    if pending > 0 {
        eprintln!("Waiting for {pending} mirror write(s)…");
    }
    runtime.block_on(ledger.settle());

    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    ledger: &mut Ledger,
) -> Result<()> {
    while app.running {
        check_hydration(app, ledger);
        app.pending_writes = ledger.pending_writes();

        terminal.draw(|f| {
            // tab + status + command bars, totals cards, list borders and header
            let content_height = f.area().height.saturating_sub(11) as usize;
            app.visible_rows = content_height.max(1);
            crate::ui::render::render(f, app);
        })?;

        if !event::poll(TICK)? {
            continue;
        }

        if let Event::Key(key) = event::read()? {
            if app.show_help {
                app.show_help = false;
                continue;
            }
            match app.input_mode {
                InputMode::Normal => handle_normal_input(key, app, ledger)?,
                InputMode::Command => handle_command_input(key, app, ledger)?,
                InputMode::Editing => handle_editing_input(key, app),
                InputMode::Confirm => handle_confirm_input(key, app, ledger)?,
            }
        }
    }
    Ok(())
}

/// Adopt a finished hydration, if any.
fn check_hydration(app: &mut App, ledger: &mut Ledger) {
    let Some(mut hydration) = app.hydration.take() else {
        return;
    };
    match ledger.poll_hydration(&mut hydration) {
        None => app.hydration = Some(hydration),
        Some(source) => {
            app.source = Some(source);
            app.refresh(ledger);
            app.set_status(match source {
                Source::Remote => format!("Loaded {} transactions from the mirror", app.rows.len()),
                Source::Local => "Mirror unavailable, showing the local ledger".to_string(),
            });
        }
    }
}

// ── Input handlers ───────────────────────────────────────────

fn handle_normal_input(key: event::KeyEvent, app: &mut App, ledger: &mut Ledger) -> Result<()> {
    match key.code {
        KeyCode::Char(':') => {
            app.input_mode = InputMode::Command;
            app.command_input.clear();
        }
        KeyCode::Char('q') | KeyCode::Char('c')
            if key.modifiers.contains(KeyModifiers::CONTROL) =>
        {
            app.running = false;
        }
        KeyCode::Char('j') | KeyCode::Down => handle_move_down(app),
        KeyCode::Char('k') | KeyCode::Up => handle_move_up(app),
        KeyCode::Char('1') => switch_screen(app, ledger, Screen::Ledger),
        KeyCode::Char('2') => switch_screen(app, ledger, Screen::New),
        KeyCode::Char('3') => switch_screen(app, ledger, Screen::Remote),
        KeyCode::Tab => {
            let screens = Screen::all();
            let idx = screens.iter().position(|s| *s == app.screen).unwrap_or(0);
            let next = (idx + 1) % screens.len();
            switch_screen(app, ledger, screens[next]);
        }
        KeyCode::BackTab => {
            let screens = Screen::all();
            let idx = screens.iter().position(|s| *s == app.screen).unwrap_or(0);
            let prev = if idx == 0 { screens.len() - 1 } else { idx - 1 };
            switch_screen(app, ledger, screens[prev]);
        }
        KeyCode::Enter => handle_enter(app, ledger)?,
        KeyCode::Esc => handle_escape(app),
        KeyCode::Char('+') | KeyCode::Char('=') | KeyCode::Char('l') | KeyCode::Right
            if app.screen == Screen::New =>
        {
            app.form.adjust(1);
        }
        KeyCode::Char('-') | KeyCode::Char('h') | KeyCode::Left if app.screen == Screen::New => {
            app.form.adjust(-1);
        }
        KeyCode::Char('n') if app.screen == Screen::Ledger => {
            switch_screen(app, ledger, Screen::New);
        }
        KeyCode::Char('g') => handle_goto_top(app),
        KeyCode::Char('G') => handle_goto_bottom(app),
        KeyCode::Char('?') => {
            app.show_help = true;
        }
        KeyCode::Char('d') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            let half_page = app.visible_rows / 2;
            for _ in 0..half_page {
                handle_move_down(app);
            }
        }
        KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            let half_page = app.visible_rows / 2;
            for _ in 0..half_page {
                handle_move_up(app);
            }
        }
        KeyCode::Char('D') if app.screen == Screen::Ledger => {
            commands::handle_command("delete", app, ledger)?;
        }
        _ => {}
    }
    Ok(())
}

fn handle_command_input(key: event::KeyEvent, app: &mut App, ledger: &mut Ledger) -> Result<()> {
    match key.code {
        KeyCode::Enter => {
            let input = app.command_input.clone();
            app.input_mode = InputMode::Normal;
            app.command_input.clear();
            commands::handle_command(&input, app, ledger)?;
        }
        KeyCode::Esc => {
            app.input_mode = InputMode::Normal;
            app.command_input.clear();
        }
        KeyCode::Backspace => {
            app.command_input.pop();
            if app.command_input.is_empty() {
                app.input_mode = InputMode::Normal;
            }
        }
        KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.command_input.clear();
            app.input_mode = InputMode::Normal;
        }
        KeyCode::Char('w') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            let trimmed = app.command_input.trim_end();
            if let Some(pos) = trimmed.rfind(' ') {
                app.command_input.truncate(pos + 1);
            } else {
                app.command_input.clear();
                app.input_mode = InputMode::Normal;
            }
        }
        KeyCode::Char(c) => {
            app.command_input.push(c);
        }
        _ => {}
    }
    Ok(())
}

/// Typing into a text field of the new-transaction form.
fn handle_editing_input(key: event::KeyEvent, app: &mut App) {
    match key.code {
        KeyCode::Enter => {
            let field = app.form.field();
            let value = std::mem::take(&mut app.command_input);
            app.form.set_text(field, value);
            app.input_mode = InputMode::Normal;
            handle_move_down(app);
        }
        KeyCode::Esc => {
            app.command_input.clear();
            app.input_mode = InputMode::Normal;
            app.set_status("Edit cancelled");
        }
        KeyCode::Backspace => {
            app.command_input.pop();
        }
        KeyCode::Char(c) => {
            app.command_input.push(c);
        }
        _ => {}
    }
}

fn handle_confirm_input(key: event::KeyEvent, app: &mut App, ledger: &mut Ledger) -> Result<()> {
    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') => {
            if let Some(action) = app.pending_action.take() {
                match action {
                    PendingAction::DeleteTransaction { id, label } => {
                        let removed = ledger.remove(id)?;
                        app.refresh(ledger);
                        if removed {
                            app.set_status(format!("Deleted: {label}"));
                        } else {
                            app.set_status("Transaction was already gone");
                        }
                        ledger.flush_writes();
                    }
                }
            }
            app.input_mode = InputMode::Normal;
            app.confirm_message.clear();
        }
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
            app.pending_action = None;
            app.input_mode = InputMode::Normal;
            app.confirm_message.clear();
            app.set_status("Cancelled");
        }
        _ => {}
    }
    Ok(())
}

// ── Navigation helpers ───────────────────────────────────────

fn switch_screen(app: &mut App, ledger: &Ledger, screen: Screen) {
    app.screen = screen;
    if screen == Screen::Ledger {
        app.refresh(ledger);
    }
    app.set_status(format!("{screen}"));
}

fn handle_move_down(app: &mut App) {
    match app.screen {
        Screen::Ledger => {
            let page = app.visible_rows;
            scroll_down(
                &mut app.transaction_index,
                &mut app.transaction_scroll,
                app.rows.len(),
                page,
            );
        }
        Screen::New => {
            if app.form.field_index + 1 < FormField::all().len() {
                app.form.field_index += 1;
            }
        }
        Screen::Remote => {}
    }
}

fn handle_move_up(app: &mut App) {
    match app.screen {
        Screen::Ledger => scroll_up(&mut app.transaction_index, &mut app.transaction_scroll),
        Screen::New => {
            app.form.field_index = app.form.field_index.saturating_sub(1);
        }
        Screen::Remote => {}
    }
}

fn handle_enter(app: &mut App, ledger: &mut Ledger) -> Result<()> {
    if app.screen != Screen::New {
        return Ok(());
    }

    let field = app.form.field();
    match field {
        FormField::Submit => {
            let form = app.form.to_form();
            if commands::submit(&form, app, ledger)? {
                app.form.reset();
                app.screen = Screen::Ledger;
            }
        }
        f if f.is_text() => {
            app.command_input = app.form.value(f);
            app.input_mode = InputMode::Editing;
        }
        _ => app.form.adjust(1),
    }
    Ok(())
}

fn handle_escape(app: &mut App) {
    match app.screen {
        Screen::New | Screen::Remote => {
            app.screen = Screen::Ledger;
        }
        Screen::Ledger => {
            app.status_message.clear();
        }
    }
}

fn handle_goto_top(app: &mut App) {
    match app.screen {
        Screen::Ledger => scroll_to_top(&mut app.transaction_index, &mut app.transaction_scroll),
        Screen::New => app.form.field_index = 0,
        Screen::Remote => {}
    }
}

fn handle_goto_bottom(app: &mut App) {
    match app.screen {
        Screen::Ledger => {
            let page = app.visible_rows;
            scroll_to_bottom(
                &mut app.transaction_index,
                &mut app.transaction_scroll,
                app.rows.len(),
                page,
            );
        }
        Screen::New => app.form.field_index = FormField::all().len() - 1,
        Screen::Remote => {}
    }
}
