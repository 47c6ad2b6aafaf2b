//! Focus, cursors and option highlights of the terminal form.
//!
//! The answers themselves live in the [`SurveyForm`]; this only tracks where
//! the user is and turns key presses into `on_change` calls.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use survey::{Question, QuestionKind, SurveyForm};

/// What the event loop should do after a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Continue,
    Submit,
    Quit,
}

/// The focused control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    /// Question at this position.
    Field(usize),
    /// The submit button.
    Submit,
}

/// Number of fields PageUp/PageDown skip.
const PAGE_JUMP: usize = 5;

#[derive(Debug, Clone)]
pub struct FormState {
    focus: Focus,
    /// Cursor per question, in characters.
    cursors: Vec<usize>,
    /// Highlighted choice per question.
    highlights: Vec<usize>,
    pub(crate) scroll_offset: u16,
}

impl Default for FormState {
    fn default() -> Self {
        Self {
            focus: Focus::Submit,
            cursors: Vec::new(),
            highlights: Vec::new(),
            scroll_offset: 0,
        }
    }
}

impl FormState {
    /// Start on the first question, with cursors after any existing values.
    pub fn new(form: &SurveyForm) -> Self {
        let questions = form.questions();
        Self {
            focus: if questions.is_empty() {
                Focus::Submit
            } else {
                Focus::Field(0)
            },
            cursors: questions
                .iter()
                .map(|question| form.value(question.id()).chars().count())
                .collect(),
            highlights: questions
                .iter()
                .map(|question| choice_index(question.kind(), form.value(question.id())).unwrap_or(0))
                .collect(),
            scroll_offset: 0,
        }
    }

    pub fn focus(&self) -> Focus {
        self.focus
    }

    /// Check if the question at `idx` has focus.
    pub fn is_focused(&self, idx: usize) -> bool {
        self.focus == Focus::Field(idx)
    }

    pub fn cursor(&self, idx: usize) -> usize {
        self.cursors.get(idx).copied().unwrap_or(0)
    }

    pub fn highlight(&self, idx: usize) -> usize {
        self.highlights.get(idx).copied().unwrap_or(0)
    }

    /// Apply one key press to the form.
    pub fn handle_key(&mut self, form: &mut SurveyForm, key: KeyEvent) -> Action {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let count = form.questions().len();

        match key.code {
            KeyCode::Esc => return Action::Quit,
            KeyCode::Char('c') if ctrl => return Action::Quit,
            KeyCode::Char('s') if ctrl => return Action::Submit,
            KeyCode::F(10) => return Action::Submit,
            KeyCode::Enter => match self.focus {
                Focus::Submit => return Action::Submit,
                Focus::Field(_) if self.on_choice(form) => self.select_highlighted(form),
                Focus::Field(_) => self.next_field(count),
            },
            KeyCode::BackTab => self.prev_field(count),
            KeyCode::Tab if key.modifiers.contains(KeyModifiers::SHIFT) => self.prev_field(count),
            KeyCode::Tab => self.next_field(count),
            KeyCode::Up if self.on_choice(form) => self.move_highlight(form, false),
            KeyCode::Down if self.on_choice(form) => self.move_highlight(form, true),
            KeyCode::Up => self.prev_field(count),
            KeyCode::Down => self.next_field(count),
            KeyCode::PageUp => {
                for _ in 0..PAGE_JUMP {
                    self.prev_field(count);
                }
            }
            KeyCode::PageDown => {
                for _ in 0..PAGE_JUMP {
                    self.next_field(count);
                }
            }
            KeyCode::Left => self.move_cursor(form, |cursor, _| cursor.saturating_sub(1)),
            KeyCode::Right => self.move_cursor(form, |cursor, len| (cursor + 1).min(len)),
            KeyCode::Home => self.move_cursor(form, |_, _| 0),
            KeyCode::End => self.move_cursor(form, |_, len| len),
            KeyCode::Char(' ') if self.on_choice(form) => self.select_highlighted(form),
            KeyCode::Char(c) if !ctrl => self.insert(form, c),
            KeyCode::Backspace => self.backspace(form),
            KeyCode::Delete => self.delete(form),
            _ => {}
        }

        Action::Continue
    }

    /// Move focus to the first question with a validation message.
    pub fn focus_first_error(&mut self, form: &SurveyForm) {
        if let Some(idx) = form
            .questions()
            .iter()
            .position(|question| form.error(question.id()).is_some())
        {
            self.focus = Focus::Field(idx);
        }
    }

    /// Scroll so the rows `top..bottom` fit in a viewport of `height` rows.
    pub(crate) fn scroll_to(&mut self, top: u16, bottom: u16, height: u16) {
        if top < self.scroll_offset {
            self.scroll_offset = top;
        }
        if bottom > self.scroll_offset + height {
            self.scroll_offset = bottom.saturating_sub(height);
        }
    }

    fn next_field(&mut self, count: usize) {
        self.focus = match self.focus {
            Focus::Field(idx) if idx + 1 < count => Focus::Field(idx + 1),
            _ => Focus::Submit,
        };
    }

    fn prev_field(&mut self, count: usize) {
        self.focus = match self.focus {
            Focus::Field(idx) => Focus::Field(idx.saturating_sub(1)),
            Focus::Submit if count > 0 => Focus::Field(count - 1),
            Focus::Submit => Focus::Submit,
        };
    }

    fn focused<'a>(&self, form: &'a SurveyForm) -> Option<(usize, &'a Question)> {
        match self.focus {
            Focus::Field(idx) => form.questions().get(idx).map(|question| (idx, question)),
            Focus::Submit => None,
        }
    }

    fn focused_editable<'a>(&self, form: &'a SurveyForm) -> Option<(usize, &'a Question)> {
        self.focused(form).filter(|(_, question)| {
            matches!(question.kind(), QuestionKind::Text | QuestionKind::Number)
        })
    }

    fn on_choice(&self, form: &SurveyForm) -> bool {
        self.focused(form)
            .map(|(_, question)| question.kind().is_choice())
            .unwrap_or(false)
    }

    fn move_highlight(&mut self, form: &SurveyForm, down: bool) {
        let Some((idx, question)) = self.focused(form) else {
            return;
        };
        let len = choices(question.kind()).len();
        if len == 0 {
            return;
        }
        let highlight = &mut self.highlights[idx];
        *highlight = if down {
            (*highlight + 1) % len
        } else {
            (*highlight + len - 1) % len
        };
    }

    fn select_highlighted(&mut self, form: &mut SurveyForm) {
        let Some((idx, question)) = self.focused(form) else {
            return;
        };
        let Some(choice) = choices(question.kind()).get(self.highlights[idx]).copied() else {
            return;
        };
        let (id, choice) = (question.id().clone(), choice.to_string());
        form.on_change(&id, choice);
    }

    fn move_cursor(&mut self, form: &SurveyForm, to: impl Fn(usize, usize) -> usize) {
        if let Some((idx, question)) = self.focused_editable(form) {
            let len = form.value(question.id()).chars().count();
            self.cursors[idx] = to(self.cursors[idx].min(len), len);
        }
    }

    fn insert(&mut self, form: &mut SurveyForm, c: char) {
        let Some((idx, question)) = self.focused_editable(form) else {
            return;
        };
        let id = question.id().clone();
        let mut value = form.value(&id).to_string();
        let cursor = self.cursors[idx].min(value.chars().count());

        value.insert(byte_offset(&value, cursor), c);
        form.on_change(&id, value);
        self.cursors[idx] = cursor + 1;
    }

    fn backspace(&mut self, form: &mut SurveyForm) {
        let Some((idx, question)) = self.focused_editable(form) else {
            return;
        };
        let id = question.id().clone();
        let mut value = form.value(&id).to_string();
        let cursor = self.cursors[idx].min(value.chars().count());
        if cursor == 0 {
            return;
        }

        value.remove(byte_offset(&value, cursor - 1));
        form.on_change(&id, value);
        self.cursors[idx] = cursor - 1;
    }

    fn delete(&mut self, form: &mut SurveyForm) {
        let Some((idx, question)) = self.focused_editable(form) else {
            return;
        };
        let id = question.id().clone();
        let mut value = form.value(&id).to_string();
        let cursor = self.cursors[idx].min(value.chars().count());
        if cursor == value.chars().count() {
            return;
        }

        value.remove(byte_offset(&value, cursor));
        form.on_change(&id, value);
        self.cursors[idx] = cursor;
    }
}

/// The values a choice question can take, in display order.
///
/// A select starts with the blank value, standing in for "no choice".
pub fn choices(kind: &QuestionKind) -> Vec<&str> {
    match kind {
        QuestionKind::Select(choice) => std::iter::once("")
            .chain(choice.options().iter().map(String::as_str))
            .collect(),
        QuestionKind::Radio(choice) => choice.options().iter().map(String::as_str).collect(),
        _ => Vec::new(),
    }
}

fn choice_index(kind: &QuestionKind, value: &str) -> Option<usize> {
    choices(kind).iter().position(|choice| *choice == value)
}

fn byte_offset(value: &str, chars: usize) -> usize {
    value
        .char_indices()
        .nth(chars)
        .map(|(offset, _)| offset)
        .unwrap_or(value.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use survey::{ChoiceQuestion, QuestionId, Survey, SurveyDefinition};

    fn form() -> SurveyForm {
        SurveyForm::new(SurveyDefinition::new(
            Survey::new("s1", "Intake"),
            vec![
                Question::new("name", "Name", QuestionKind::Text)
                    .required()
                    .with_order(1),
                Question::new("age", "Age", QuestionKind::Number).with_order(2),
                Question::new(
                    "color",
                    "Color",
                    QuestionKind::Select(ChoiceQuestion::new(["Red", "Blue"])),
                )
                .with_order(3),
                Question::new(
                    "agree",
                    "Agree?",
                    QuestionKind::Radio(ChoiceQuestion::new(["Yes", "No"])),
                )
                .with_order(4),
            ],
        ))
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    fn type_str(state: &mut FormState, form: &mut SurveyForm, text: &str) {
        for c in text.chars() {
            state.handle_key(form, key(KeyCode::Char(c)));
        }
    }

    fn id(id: &str) -> QuestionId {
        QuestionId::new(id)
    }

    #[test]
    fn starts_on_first_question() {
        let form = form();
        let state = FormState::new(&form);
        assert_eq!(state.focus(), Focus::Field(0));
        assert!(state.is_focused(0));
    }

    #[test]
    fn typing_updates_the_form() {
        let mut form = form();
        let mut state = FormState::new(&form);

        type_str(&mut state, &mut form, "Ada");

        assert_eq!(form.value(&id("name")), "Ada");
        assert_eq!(state.cursor(0), 3);
    }

    #[test]
    fn editing_in_the_middle() {
        let mut form = form();
        let mut state = FormState::new(&form);
        type_str(&mut state, &mut form, "Ad");

        state.handle_key(&mut form, key(KeyCode::Left));
        type_str(&mut state, &mut form, "x");
        assert_eq!(form.value(&id("name")), "Axd");

        state.handle_key(&mut form, key(KeyCode::Backspace));
        assert_eq!(form.value(&id("name")), "Ad");

        state.handle_key(&mut form, key(KeyCode::Home));
        state.handle_key(&mut form, key(KeyCode::Delete));
        assert_eq!(form.value(&id("name")), "d");
        assert_eq!(state.cursor(0), 0);
    }

    #[test]
    fn cursor_counts_characters() {
        let mut form = form();
        let mut state = FormState::new(&form);
        type_str(&mut state, &mut form, "Zoë");

        state.handle_key(&mut form, key(KeyCode::Backspace));
        assert_eq!(form.value(&id("name")), "Zo");

        type_str(&mut state, &mut form, "é");
        state.handle_key(&mut form, key(KeyCode::Left));
        type_str(&mut state, &mut form, "ü");
        assert_eq!(form.value(&id("name")), "Zoüé");
    }

    #[test]
    fn invalid_number_gets_a_message() {
        let mut form = form();
        let mut state = FormState::new(&form);
        state.handle_key(&mut form, key(KeyCode::Tab));

        type_str(&mut state, &mut form, "abc");

        assert_eq!(form.error(&id("age")), Some("Enter a valid number."));
    }

    #[test]
    fn tab_walks_to_submit_and_back() {
        let mut form = form();
        let mut state = FormState::new(&form);

        for _ in 0..4 {
            state.handle_key(&mut form, key(KeyCode::Tab));
        }
        assert_eq!(state.focus(), Focus::Submit);

        state.handle_key(&mut form, key(KeyCode::Tab));
        assert_eq!(state.focus(), Focus::Submit);

        state.handle_key(&mut form, key(KeyCode::BackTab));
        assert_eq!(state.focus(), Focus::Field(3));

        state.handle_key(&mut form, KeyEvent::new(KeyCode::Tab, KeyModifiers::SHIFT));
        assert_eq!(state.focus(), Focus::Field(2));
    }

    #[test]
    fn select_starts_blank() {
        let mut form = form();
        let mut state = FormState::new(&form);
        state.handle_key(&mut form, key(KeyCode::Tab));
        state.handle_key(&mut form, key(KeyCode::Tab));

        state.handle_key(&mut form, key(KeyCode::Down));
        state.handle_key(&mut form, key(KeyCode::Char(' ')));
        assert_eq!(form.value(&id("color")), "Red");

        state.handle_key(&mut form, key(KeyCode::Up));
        state.handle_key(&mut form, key(KeyCode::Enter));
        assert_eq!(form.value(&id("color")), "");
        assert_eq!(state.focus(), Focus::Field(2));
    }

    #[test]
    fn arrows_wrap_within_radio_options() {
        let mut form = form();
        let mut state = FormState::new(&form);
        for _ in 0..3 {
            state.handle_key(&mut form, key(KeyCode::Tab));
        }

        state.handle_key(&mut form, key(KeyCode::Up));
        state.handle_key(&mut form, key(KeyCode::Enter));

        assert_eq!(form.value(&id("agree")), "No");
        assert_eq!(state.highlight(3), 1);
    }

    #[test]
    fn enter_moves_on_from_text() {
        let mut form = form();
        let mut state = FormState::new(&form);
        assert_eq!(state.handle_key(&mut form, key(KeyCode::Enter)), Action::Continue);
        assert_eq!(state.focus(), Focus::Field(1));
    }

    #[test]
    fn submit_and_quit_keys() {
        let mut form = form();
        let mut state = FormState::new(&form);

        assert_eq!(state.handle_key(&mut form, ctrl('s')), Action::Submit);
        assert_eq!(state.handle_key(&mut form, key(KeyCode::F(10))), Action::Submit);
        assert_eq!(state.handle_key(&mut form, key(KeyCode::Esc)), Action::Quit);
        assert_eq!(state.handle_key(&mut form, ctrl('c')), Action::Quit);
        assert_eq!(form.value(&id("name")), "");

        for _ in 0..4 {
            state.handle_key(&mut form, key(KeyCode::Tab));
        }
        assert_eq!(state.handle_key(&mut form, key(KeyCode::Enter)), Action::Submit);
    }

    #[test]
    fn focus_jumps_to_first_error() {
        let mut form = form();
        let mut state = FormState::new(&form);
        for _ in 0..4 {
            state.handle_key(&mut form, key(KeyCode::Tab));
        }

        assert!(form.begin_submit().is_err());
        state.focus_first_error(&form);

        assert_eq!(state.focus(), Focus::Field(0));
    }

    #[test]
    fn new_state_picks_up_existing_values() {
        let mut form = form();
        form.on_change(&id("name"), "Ada");
        form.on_change(&id("color"), "Blue");

        let state = FormState::new(&form);

        assert_eq!(state.cursor(0), 3);
        assert_eq!(state.highlight(2), 2);
    }

    #[test]
    fn scroll_keeps_rows_in_view() {
        let mut state = FormState::default();
        state.scroll_to(20, 25, 10);
        assert_eq!(state.scroll_offset, 15);
        state.scroll_to(3, 6, 10);
        assert_eq!(state.scroll_offset, 3);
    }
}
