use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Bar, BarChart, BarGroup, Block, BorderType, Borders, Paragraph, Row, Table, Tabs},
    Frame,
};
use workhours_core::{parse_entry_date, EntryRepository, MonthlyReport};

use crate::report::format_money;
use crate::tui::app::{App, Field, InputMode, View};

struct Theme {
    primary: Color,
    muted: Color,
    text: Color,
    error: Color,
    weekday: Color,
    saturday: Color,
}

const THEME: Theme = Theme {
    primary: Color::Cyan,
    muted: Color::DarkGray,
    text: Color::White,
    error: Color::Red,
    weekday: Color::Green,
    saturday: Color::Magenta,
};

const LABEL_WIDTH: u16 = 12;

pub fn draw<R: EntryRepository>(f: &mut Frame, app: &mut App<R>) {
    let size = f.area();

    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Navigation
            Constraint::Length(1), // Banner
            Constraint::Min(1),    // Content
            Constraint::Length(1), // Footer/Help
        ])
        .split(size);

    draw_navigation(f, app, main_chunks[0]);
    draw_banner(f, app, main_chunks[1]);

    if !app.tracker.is_signed_in() {
        let text = vec![
            Line::from(""),
            Line::from(Span::styled("Signed out", Style::default().add_modifier(Modifier::BOLD))),
            Line::from(format!("Store: {}", app.tracker.session().describe())),
            Line::from(Span::styled("Press s to sign in", Style::default().fg(THEME.muted))),
        ];
        f.render_widget(
            Paragraph::new(text).alignment(Alignment::Center).block(rounded(" WorkHours ")),
            main_chunks[2],
        );
    } else {
        match app.view {
            View::Entry => draw_entry_form(f, app, main_chunks[2]),
            View::Dashboard => draw_dashboard(f, app, main_chunks[2]),
            View::Raw => draw_raw(f, app, main_chunks[2]),
        }
    }

    let help = match (app.view, &app.input_mode) {
        (_, InputMode::Editing) => "Enter/Esc: Done | ←/→: Cursor",
        (View::Entry, _) => "j/k: Field | h/l: Workplace | Enter: Edit/Add | Tab: View | s: Sign in/out | q: Quit",
        (View::Dashboard, _) => "h/l: Month | t: This month | Tab: View | r: Retry load | q: Quit",
        (View::Raw, _) => "j/k: Row | h/l: Month | Tab: View | r: Retry load | q: Quit",
    };
    let footer = Paragraph::new(help)
        .style(Style::default().fg(THEME.muted))
        .alignment(Alignment::Center);
    f.render_widget(footer, main_chunks[3]);
}

fn rounded(title: &str) -> Block<'_> {
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(THEME.muted))
}

fn draw_navigation<R: EntryRepository>(f: &mut Frame, app: &App<R>, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(30), Constraint::Length(40)])
        .split(area);

    let titles: Vec<Line> = View::ALL.iter().map(|v| Line::from(v.title())).collect();
    let tabs = Tabs::new(titles)
        .select(app.view.index())
        .block(rounded(" WorkHours "))
        .style(Style::default().fg(THEME.muted))
        .highlight_style(Style::default().fg(THEME.primary).add_modifier(Modifier::BOLD));
    f.render_widget(tabs, chunks[0]);

    let (marker, color) = if app.tracker.is_signed_in() {
        ("● signed in", THEME.weekday)
    } else {
        ("○ signed out", THEME.muted)
    };
    let session = Paragraph::new(Line::from(Span::styled(marker, Style::default().fg(color))))
        .alignment(Alignment::Right)
        .block(rounded(""));
    f.render_widget(session, chunks[1]);
}

fn draw_banner<R: EntryRepository>(f: &mut Frame, app: &App<R>, area: Rect) {
    let line = if let Some(banner) = app.tracker.banner() {
        Line::from(Span::styled(
            format!(" ! {}", banner),
            Style::default().fg(THEME.error).add_modifier(Modifier::BOLD),
        ))
    } else if let Some(status) = &app.status {
        Line::from(Span::styled(format!(" {}", status), Style::default().fg(THEME.muted)))
    } else {
        Line::from("")
    };
    f.render_widget(Paragraph::new(line), area);
}

fn draw_entry_form<R: EntryRepository>(f: &mut Frame, app: &App<R>, area: Rect) {
    let block = rounded(" New shift ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let field_style = |field: Field| {
        if app.field == field {
            Style::default().fg(THEME.primary).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(THEME.text)
        }
    };
    let label = |text: &str| format!("{:<width$}", text, width = LABEL_WIDTH as usize);

    let date_hint = match parse_entry_date(&app.form.date, app.today) {
        Ok(d) => format!("  {}", d.format("%a %Y-%m-%d")),
        Err(_) => String::new(),
    };

    let submit_label = if app.busy {
        "[ Saving… ]"
    } else if app.can_submit() {
        "[ Add shift ]"
    } else {
        "[ Add shift ] (disabled)"
    };
    let submit_style = if app.can_submit() {
        field_style(Field::Submit)
    } else {
        Style::default().fg(THEME.muted)
    };

    let mut lines = vec![
        Line::from(vec![
            Span::styled(label("Workplace"), Style::default().fg(THEME.muted)),
            Span::styled(format!("< {} >", app.form.workplace), field_style(Field::Workplace)),
        ]),
        Line::from(vec![
            Span::styled(label("Date"), Style::default().fg(THEME.muted)),
            Span::styled(app.form.date.clone(), field_style(Field::Date)),
            Span::styled(date_hint, Style::default().fg(THEME.muted)),
        ]),
        Line::from(vec![
            Span::styled(label("Hours"), Style::default().fg(THEME.muted)),
            Span::styled(app.form.hours.clone(), field_style(Field::Hours)),
        ]),
        Line::from(""),
        Line::from(Span::styled(submit_label, submit_style)),
        Line::from(""),
    ];

    if let Some(error) = &app.form_error {
        lines.push(Line::from(Span::styled(error.clone(), Style::default().fg(THEME.error))));
    }

    f.render_widget(Paragraph::new(lines), inner);

    if let InputMode::Editing = app.input_mode {
        let row = match app.field {
            Field::Date => 1,
            _ => 2,
        };
        f.set_cursor_position((
            inner.x + LABEL_WIDTH + app.cursor_position as u16,
            inner.y + row,
        ));
    }
}

fn draw_dashboard<R: EntryRepository>(f: &mut Frame, app: &App<R>, area: Rect) {
    let title = format!(" {} ", app.month.label());
    let Some(report) = app.tracker.summary(app.month) else {
        f.render_widget(
            Paragraph::new("Loading…").alignment(Alignment::Center).block(rounded(&title)),
            area,
        );
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(60),
            Constraint::Length(1),
            Constraint::Percentage(40),
        ])
        .split(area);

    draw_summary_table(f, &report, &title, chunks[0]);
    draw_pay_chart(f, &report, chunks[2]);
}

fn draw_summary_table(f: &mut Frame, report: &MonthlyReport, title: &str, area: Rect) {
    let mut rows: Vec<Row> = report
        .worked()
        .map(|s| {
            Row::new(vec![
                s.workplace.clone(),
                s.weekday_hours.to_string(),
                s.saturday_hours.to_string(),
                s.total_hours.to_string(),
                format_money(s.total_pay),
            ])
        })
        .collect();

    if rows.is_empty() {
        f.render_widget(
            Paragraph::new("No shifts this month").alignment(Alignment::Center).block(rounded(title)),
            area,
        );
        return;
    }

    rows.push(
        Row::new(vec![
            "Total".to_string(),
            String::new(),
            String::new(),
            report.grand_total_hours().to_string(),
            format_money(report.grand_total_pay()),
        ])
        .style(Style::default().add_modifier(Modifier::BOLD)),
    );

    let table = Table::new(
        rows,
        [
            Constraint::Min(14),    // Workplace
            Constraint::Length(8),  // Weekday
            Constraint::Length(8),  // Saturday
            Constraint::Length(8),  // Total hours
            Constraint::Length(12), // Pay
        ],
    )
    .header(Row::new(vec!["Workplace", "Wkday h", "Sat h", "Total h", "Pay"]).style(Style::default().fg(Color::Yellow)))
    .block(rounded(title));

    f.render_widget(table, area);
}

fn draw_pay_chart(f: &mut Frame, report: &MonthlyReport, area: Rect) {
    let bars: Vec<Bar> = report
        .worked()
        .flat_map(|s| {
            [
                Bar::default()
                    .label(s.workplace.clone())
                    .value(s.weekday_hours as u64)
                    .style(Style::default().fg(THEME.weekday))
                    .text_value(s.weekday_hours.to_string()),
                Bar::default()
                    .value(s.saturday_hours as u64)
                    .style(Style::default().fg(THEME.saturday))
                    .text_value(if s.saturday_hours > 0 { s.saturday_hours.to_string() } else { String::new() }),
            ]
        })
        .collect();

    let chart = BarChart::default()
        .block(rounded(" Hours (weekday / Saturday) "))
        .bar_width(5)
        .bar_gap(1)
        .data(BarGroup::default().bars(&bars));

    f.render_widget(chart, area);
}

fn draw_raw<R: EntryRepository>(f: &mut Frame, app: &mut App<R>, area: Rect) {
    let title = format!(" Shifts, {} ", app.month.label());
    let rows: Option<Vec<Row>> = app.month_entries().map(|entries| {
        entries
            .iter()
            .map(|e| {
                Row::new(vec![
                    e.date.format("%Y-%m-%d").to_string(),
                    e.date.format("%a").to_string(),
                    e.workplace.clone(),
                    e.hours.to_string(),
                    if e.is_saturday { "Sat".to_string() } else { String::new() },
                    e.id.short(),
                ])
            })
            .collect()
    });

    let Some(rows) = rows else {
        f.render_widget(
            Paragraph::new("Loading…").alignment(Alignment::Center).block(rounded(&title)),
            area,
        );
        return;
    };

    let table = Table::new(
        rows,
        [
            Constraint::Length(11), // Date
            Constraint::Length(4),  // Day
            Constraint::Min(14),    // Workplace
            Constraint::Length(6),  // Hours
            Constraint::Length(4),  // Saturday
            Constraint::Length(9),  // ID
        ],
    )
    .header(Row::new(vec!["Date", "Day", "Workplace", "Hours", "Sat", "ID"]).style(Style::default().fg(Color::Yellow)))
    .block(rounded(&title))
    .row_highlight_style(Style::default().bg(THEME.muted).add_modifier(Modifier::BOLD))
    .highlight_symbol(">> ");

    f.render_stateful_widget(table, area, &mut app.raw_state);
}
