pub mod app;
pub mod ui;

use std::io;
use std::time::Duration;

use anyhow::Result;
use chrono::NaiveDate;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use tracing::error;
use workhours_core::{EntryRepository, Tracker};

use crate::tui::app::{App, InputMode, View};

enum Action {
    None,
    Quit,
    Submit,
}

pub fn run<R: EntryRepository>(tracker: Tracker<R>, today: NaiveDate) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(tracker, today);
    // Data arrives after the first frame so the loading state is visible.
    terminal.draw(|f| ui::draw(f, &mut app))?;
    app.sign_in();

    let res = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        error!("tui stopped: {:?}", err);
        println!("{:?}", err);
    }

    Ok(())
}

fn run_app<B: Backend, R: EntryRepository>(terminal: &mut Terminal<B>, app: &mut App<R>) -> Result<()> {
    loop {
        terminal
            .draw(|f| ui::draw(f, app))
            .map_err(|e| io::Error::other(e.to_string()))?;

        if !event::poll(Duration::from_millis(250))? {
            continue;
        }
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        match handle_key(app, key) {
            Action::Quit => return Ok(()),
            Action::Submit => {
                if app.begin_submit() {
                    // Show the busy marker before blocking on the save.
                    terminal
                        .draw(|f| ui::draw(f, app))
                        .map_err(|e| io::Error::other(e.to_string()))?;
                    app.submit();
                }
            }
            Action::None => {}
        }
    }
}

fn handle_key<R: EntryRepository>(app: &mut App<R>, key: KeyEvent) -> Action {
    if let InputMode::Editing = app.input_mode {
        match key.code {
            KeyCode::Enter | KeyCode::Esc => app.exit_input_mode(),
            KeyCode::Char(c) => app.input_char(c),
            KeyCode::Backspace => app.delete_char(),
            KeyCode::Left => app.move_cursor_left(),
            KeyCode::Right => app.move_cursor_right(),
            _ => {}
        }
        return Action::None;
    }

    // Keys shared by every view
    match key.code {
        KeyCode::Char('q') => return Action::Quit,
        KeyCode::Tab => {
            app.next_view();
            return Action::None;
        }
        KeyCode::Char('1') => {
            app.select_view(View::Entry);
            return Action::None;
        }
        KeyCode::Char('2') => {
            app.select_view(View::Dashboard);
            return Action::None;
        }
        KeyCode::Char('3') => {
            app.select_view(View::Raw);
            return Action::None;
        }
        KeyCode::Char('s') => {
            app.toggle_session();
            return Action::None;
        }
        KeyCode::Char('r') => {
            app.retry_load();
            return Action::None;
        }
        KeyCode::Char('x') => {
            app.tracker.dismiss_banner();
            return Action::None;
        }
        _ => {}
    }

    match app.view {
        View::Entry => match key.code {
            KeyCode::Down | KeyCode::Char('j') => app.next_field(),
            KeyCode::Up | KeyCode::Char('k') => app.previous_field(),
            KeyCode::Left | KeyCode::Char('h') => app.cycle_workplace(false),
            KeyCode::Right | KeyCode::Char('l') => app.cycle_workplace(true),
            KeyCode::Enter => {
                if app.activate_field() {
                    return Action::Submit;
                }
            }
            _ => {}
        },
        View::Dashboard => match key.code {
            KeyCode::Left | KeyCode::Char('h') => app.previous_month(),
            KeyCode::Right | KeyCode::Char('l') => app.next_month(),
            KeyCode::Char('t') => app.current_month(),
            _ => {}
        },
        View::Raw => match key.code {
            KeyCode::Down | KeyCode::Char('j') => app.next_row(),
            KeyCode::Up | KeyCode::Char('k') => app.previous_row(),
            KeyCode::Left | KeyCode::Char('h') => app.previous_month(),
            KeyCode::Right | KeyCode::Char('l') => app.next_month(),
            KeyCode::Char('t') => app.current_month(),
            _ => {}
        },
    }
    Action::None
}
