use tabled::settings::object::{Columns, Rows};
use tabled::settings::{Alignment, Color, Modify, Style};
use tabled::{Table, Tabled};
use workhours_core::{MonthlyReport, Registry, WorkEntry, YearMonth};

#[derive(Tabled)]
struct EntryRow {
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Day")]
    day: String,
    #[tabled(rename = "Workplace")]
    workplace: String,
    #[tabled(rename = "Hours")]
    hours: u32,
    #[tabled(rename = "Sat")]
    saturday: String,
    #[tabled(rename = "ID")]
    id: String,
}

#[derive(Tabled)]
struct SummaryRow {
    #[tabled(rename = "Workplace")]
    workplace: String,
    #[tabled(rename = "Weekday (h)")]
    weekday_hours: u32,
    #[tabled(rename = "Saturday (h)")]
    saturday_hours: u32,
    #[tabled(rename = "Total (h)")]
    total_hours: u32,
    #[tabled(rename = "Weekday pay")]
    weekday_pay: String,
    #[tabled(rename = "Saturday pay")]
    saturday_pay: String,
    #[tabled(rename = "Total pay")]
    total_pay: String,
}

#[derive(Tabled)]
struct WorkplaceRow {
    #[tabled(rename = "Workplace")]
    name: String,
    #[tabled(rename = "Weekday rate")]
    weekday_rate: String,
    #[tabled(rename = "Saturday rate")]
    saturday_rate: String,
    #[tabled(rename = "Saturdays")]
    allows_saturday: String,
}

pub fn format_money(amount: f64) -> String {
    format!("{:.2}", amount)
}

fn styled(table: &mut Table) {
    table
        .with(Style::modern())
        .with(Modify::new(Rows::first()).with(Color::FG_CYAN));
}

pub fn show_entries(entries: &[&WorkEntry], month: YearMonth) {
    if entries.is_empty() {
        println!("No shifts recorded for {}.", month.label());
        return;
    }

    let rows: Vec<EntryRow> = entries
        .iter()
        .map(|e| EntryRow {
            date: e.date.format("%Y-%m-%d").to_string(),
            day: e.date.format("%a").to_string(),
            workplace: e.workplace.clone(),
            hours: e.hours,
            saturday: if e.is_saturday { "yes".to_string() } else { String::new() },
            id: e.id.short(),
        })
        .collect();

    let mut table = Table::new(rows);
    styled(&mut table);
    println!("\x1b[1;36m{}\x1b[0m", month.label());
    println!("{}", table);
}

pub fn show_summary(report: &MonthlyReport) {
    println!("\x1b[1;36m{}\x1b[0m", report.month.label());

    // Workplaces with no hours are left out of the table.
    let rows: Vec<SummaryRow> = report
        .worked()
        .map(|s| SummaryRow {
            workplace: s.workplace.clone(),
            weekday_hours: s.weekday_hours,
            saturday_hours: s.saturday_hours,
            total_hours: s.total_hours,
            weekday_pay: format_money(s.weekday_pay),
            saturday_pay: format_money(s.saturday_pay),
            total_pay: format_money(s.total_pay),
        })
        .collect();

    if rows.is_empty() {
        println!("No shifts recorded this month.");
        return;
    }

    let mut table = Table::new(rows);
    styled(&mut table);
    table.with(Modify::new(Columns::new(1..)).with(Alignment::right()));
    println!("{}", table);
    println!(
        "Total: {} h, {}",
        report.grand_total_hours(),
        format_money(report.grand_total_pay())
    );
}

pub fn show_workplaces(registry: &Registry) {
    let rows: Vec<WorkplaceRow> = registry
        .iter()
        .map(|w| WorkplaceRow {
            name: w.name.clone(),
            weekday_rate: format_money(w.weekday_rate),
            saturday_rate: if w.allows_saturday { format_money(w.saturday_rate) } else { "-".to_string() },
            allows_saturday: if w.allows_saturday { "yes" } else { "no" }.to_string(),
        })
        .collect();

    let mut table = Table::new(rows);
    styled(&mut table);
    println!("{}", table);
}

pub fn show_months(months: &[YearMonth]) {
    if months.is_empty() {
        println!("No shifts recorded yet.");
        return;
    }
    for month in months {
        println!("{}  {}", month, month.label());
    }
}
