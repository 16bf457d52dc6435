use chrono::NaiveDate;
use ratatui::widgets::TableState;
use workhours_core::{
    entries_in_month, EntryForm, EntryRepository, LoadState, Submission, Tracker, TrackerError,
    WorkEntry, YearMonth,
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum View {
    Entry,
    Dashboard,
    Raw,
}

impl View {
    pub const ALL: [View; 3] = [View::Entry, View::Dashboard, View::Raw];

    pub fn title(&self) -> &'static str {
        match self {
            View::Entry => "Entry",
            View::Dashboard => "Dashboard",
            View::Raw => "Raw data",
        }
    }

    pub fn index(&self) -> usize {
        match self {
            View::Entry => 0,
            View::Dashboard => 1,
            View::Raw => 2,
        }
    }

    pub fn next(&self) -> View {
        View::ALL[(self.index() + 1) % View::ALL.len()]
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Field {
    Workplace,
    Date,
    Hours,
    Submit,
}

impl Field {
    const ORDER: [Field; 4] = [Field::Workplace, Field::Date, Field::Hours, Field::Submit];

    fn position(&self) -> usize {
        Self::ORDER.iter().position(|f| f == self).unwrap_or(0)
    }

    pub fn next(&self) -> Field {
        Self::ORDER[(self.position() + 1) % Self::ORDER.len()]
    }

    pub fn previous(&self) -> Field {
        Self::ORDER[(self.position() + Self::ORDER.len() - 1) % Self::ORDER.len()]
    }
}

pub enum InputMode {
    Normal,
    Editing,
}

pub struct App<R: EntryRepository> {
    pub tracker: Tracker<R>,
    pub today: NaiveDate,
    pub view: View,
    pub form: EntryForm,
    pub field: Field,
    pub input_mode: InputMode,
    pub cursor_position: usize,
    pub form_error: Option<String>,
    pub status: Option<String>,
    pub busy: bool,
    pub month: YearMonth,
    pub raw_state: TableState,
}

impl<R: EntryRepository> App<R> {
    pub fn new(tracker: Tracker<R>, today: NaiveDate) -> App<R> {
        let form = EntryForm::new(tracker.registry());
        let mut app = App {
            tracker,
            today,
            view: View::Entry,
            form,
            field: Field::Workplace,
            input_mode: InputMode::Normal,
            cursor_position: 0,
            form_error: None,
            status: None,
            busy: false,
            month: YearMonth::of(today),
            raw_state: TableState::default(),
        };
        app.revalidate();
        app
    }

    pub fn sign_in(&mut self) {
        match self.tracker.sign_in() {
            Ok(()) => {
                let count = self.tracker.entries().map(|e| e.len()).unwrap_or(0);
                self.status = Some(format!("Signed in, {} shifts loaded", count));
            }
            Err(e) => self.status = Some(e.to_string()),
        }
        self.reset_raw_selection();
    }

    pub fn toggle_session(&mut self) {
        if self.tracker.is_signed_in() {
            self.tracker.sign_out();
            self.status = Some("Signed out".to_string());
            self.reset_raw_selection();
        } else {
            self.sign_in();
        }
    }

    pub fn retry_load(&mut self) {
        if !matches!(self.tracker.load_state(), LoadState::Failed(_)) {
            return;
        }
        match self.tracker.load() {
            Ok(count) => {
                self.tracker.dismiss_banner();
                self.status = Some(format!("{} shifts loaded", count));
            }
            Err(e) => self.status = Some(e.to_string()),
        }
        self.reset_raw_selection();
    }

    pub fn next_view(&mut self) {
        self.view = self.view.next();
    }

    pub fn select_view(&mut self, view: View) {
        self.view = view;
    }

    // --- Entry form ---

    pub fn next_field(&mut self) {
        self.field = self.field.next();
    }

    pub fn previous_field(&mut self) {
        self.field = self.field.previous();
    }

    pub fn cycle_workplace(&mut self, forward: bool) {
        let names = self.tracker.registry().names();
        let current = names.iter().position(|n| *n == self.form.workplace).unwrap_or(0);
        let next = if forward {
            (current + 1) % names.len()
        } else {
            (current + names.len() - 1) % names.len()
        };
        self.form.workplace = names[next].to_string();
        self.revalidate();
    }

    /// True when the submit button was activated.
    pub fn activate_field(&mut self) -> bool {
        match self.field {
            Field::Workplace => {
                self.cycle_workplace(true);
                false
            }
            Field::Date | Field::Hours => {
                self.input_mode = InputMode::Editing;
                self.cursor_position = self.field_text().chars().count();
                false
            }
            Field::Submit => true,
        }
    }

    pub fn exit_input_mode(&mut self) {
        self.input_mode = InputMode::Normal;
        self.revalidate();
    }

    fn field_text(&self) -> &str {
        match self.field {
            Field::Date => &self.form.date,
            Field::Hours => &self.form.hours,
            _ => "",
        }
    }

    fn field_text_mut(&mut self) -> Option<&mut String> {
        match self.field {
            Field::Date => Some(&mut self.form.date),
            Field::Hours => Some(&mut self.form.hours),
            _ => None,
        }
    }

    pub fn input_char(&mut self, c: char) {
        let cursor = self.cursor_position;
        if let Some(text) = self.field_text_mut() {
            let byte_index = text.chars().take(cursor).map(|c| c.len_utf8()).sum();
            text.insert(byte_index, c);
            self.cursor_position += 1;
            self.revalidate();
        }
    }

    pub fn delete_char(&mut self) {
        let cursor = self.cursor_position;
        if cursor == 0 {
            return;
        }
        if let Some(text) = self.field_text_mut() {
            let byte_index: usize = text.chars().take(cursor - 1).map(|c| c.len_utf8()).sum();
            text.remove(byte_index);
            self.cursor_position -= 1;
            self.revalidate();
        }
    }

    pub fn move_cursor_left(&mut self) {
        if self.cursor_position > 0 {
            self.cursor_position -= 1;
        }
    }

    pub fn move_cursor_right(&mut self) {
        if self.cursor_position < self.field_text().chars().count() {
            self.cursor_position += 1;
        }
    }

    pub fn revalidate(&mut self) {
        self.form_error = self.tracker.check(&self.form, self.today).err().map(|e| e.to_string());
    }

    fn form_ready(&self) -> bool {
        self.form_error.is_none() && self.tracker.entries().is_some()
    }

    pub fn can_submit(&self) -> bool {
        self.form_ready() && !self.busy
    }

    pub fn begin_submit(&mut self) -> bool {
        if !self.can_submit() {
            return false;
        }
        self.busy = true;
        true
    }

    pub fn submit(&mut self) {
        if !self.form_ready() {
            self.busy = false;
            return;
        }
        match self.tracker.submit(&self.form, self.today) {
            Ok(Submission::Saved(entry)) => {
                self.status = Some(format!(
                    "Saved {} h at {} on {}",
                    entry.hours, entry.workplace, entry.date
                ));
                self.month = YearMonth::of(entry.date);
                self.form.hours = "1".to_string();
            }
            Ok(Submission::Unsaved { entry, .. }) => {
                self.status = Some(format!("Kept {} h at {} locally; not saved", entry.hours, entry.workplace));
            }
            Err(TrackerError::Validation(e)) => self.form_error = Some(e.to_string()),
            Err(e) => self.status = Some(e.to_string()),
        }
        self.busy = false;
        self.revalidate();
    }

    // --- Dashboard / raw month navigation ---

    pub fn previous_month(&mut self) {
        self.month = self.month.previous();
        self.reset_raw_selection();
    }

    pub fn next_month(&mut self) {
        self.month = self.month.next();
        self.reset_raw_selection();
    }

    pub fn current_month(&mut self) {
        self.month = YearMonth::of(self.today);
        self.reset_raw_selection();
    }

    pub fn month_entries(&self) -> Option<Vec<&WorkEntry>> {
        self.tracker
            .entries()
            .map(|entries| entries_in_month(entries, self.month))
    }

    fn raw_len(&self) -> usize {
        self.month_entries().map(|e| e.len()).unwrap_or(0)
    }

    fn reset_raw_selection(&mut self) {
        let selected = if self.raw_len() > 0 { Some(0) } else { None };
        self.raw_state.select(selected);
    }

    pub fn next_row(&mut self) {
        let len = self.raw_len();
        if len == 0 {
            return;
        }
        let i = match self.raw_state.selected() {
            Some(i) if i + 1 < len => i + 1,
            _ => 0,
        };
        self.raw_state.select(Some(i));
    }

    pub fn previous_row(&mut self) {
        let len = self.raw_len();
        if len == 0 {
            return;
        }
        let i = match self.raw_state.selected() {
            Some(0) | None => len - 1,
            Some(i) => i - 1,
        };
        self.raw_state.select(Some(i));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use workhours_core::{MemoryEntryRepository, Registry};

    fn app() -> App<MemoryEntryRepository> {
        let tracker = Tracker::new(Registry::default(), MemoryEntryRepository::new());
        let mut app = App::new(tracker, NaiveDate::from_ymd_opt(2024, 3, 13).unwrap());
        app.sign_in();
        app
    }

    fn type_into(app: &mut App<MemoryEntryRepository>, field: Field, text: &str) {
        app.field = field;
        app.activate_field();
        while app.cursor_position > 0 {
            app.delete_char();
        }
        for c in text.chars() {
            app.input_char(c);
        }
        app.exit_input_mode();
    }

    #[test]
    fn test_live_validation_blocks_saturday_submission() {
        let mut app = app();
        app.form.workplace = "Holmes Place".to_string();
        type_into(&mut app, Field::Date, "2024-03-09");
        assert!(app.form_error.as_deref().unwrap().contains("Holmes Place"));
        assert!(!app.can_submit());

        app.submit();
        assert!(app.tracker.entries().unwrap().is_empty());

        type_into(&mut app, Field::Date, "2024-03-08");
        assert!(app.form_error.is_none());
        app.submit();
        assert_eq!(app.tracker.entries().unwrap().len(), 1);
    }

    #[test]
    fn test_cannot_submit_before_sign_in() {
        let tracker = Tracker::new(Registry::default(), MemoryEntryRepository::new());
        let mut app = App::new(tracker, NaiveDate::from_ymd_opt(2024, 3, 13).unwrap());
        assert!(!app.can_submit());
        app.submit();
        app.sign_in();
        assert!(app.can_submit());
    }

    #[test]
    fn test_cycle_workplace_and_fields() {
        let mut app = app();
        assert_eq!(app.form.workplace, "Sher fitness");
        app.cycle_workplace(false);
        assert_eq!(app.form.workplace, "Holmes Place");
        app.cycle_workplace(true);
        assert_eq!(app.form.workplace, "Sher fitness");

        assert_eq!(app.field.previous(), Field::Submit);
        app.next_field();
        assert_eq!(app.field, Field::Date);
    }

    #[test]
    fn test_submit_moves_dashboard_to_entry_month() {
        let mut app = app();
        type_into(&mut app, Field::Date, "2024-01-15");
        type_into(&mut app, Field::Hours, "6");
        app.submit();
        assert_eq!(app.month, YearMonth::new(2024, 1).unwrap());
        assert_eq!(app.month_entries().unwrap().len(), 1);
        assert_eq!(app.form.hours, "1");
    }

    #[test]
    fn test_busy_blocks_second_submission() {
        let mut app = app();
        assert!(app.begin_submit());
        assert!(!app.can_submit());
        assert!(!app.begin_submit());
        app.submit();
        assert!(!app.busy);
        assert_eq!(app.tracker.entries().unwrap().len(), 1);
    }

    #[test]
    fn test_view_cycle() {
        assert_eq!(View::Entry.next(), View::Dashboard);
        assert_eq!(View::Raw.next(), View::Entry);
    }
}
