//! Terminal application state and key handling.
//!
//! Rendering lives in [`super::ui`]; everything here is plain state so the
//! key bindings can be exercised without a terminal.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::info;

use crate::analysis::{
    AnalysisRecord, CharacteristicField, CharacteristicId, ListKind, SuggestionPatch, TextField,
};
use crate::suggest::SuggestionRequest;
use crate::walkthrough::Walkthrough;
use crate::workflow::{Step, SuggestionKind, Workflow};

pub const HOME_ENTRIES: [&str; 2] = ["See an Example", "Analyze Your Own"];

/// One editable cell on a wizard step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    Field(TextField),
    Literal(CharacteristicId),
    Mapped(CharacteristicId),
    Item(ListKind, usize),
}

/// Editable cells for the current wizard step, top to bottom.
pub fn slots(workflow: &Workflow) -> Vec<Slot> {
    let r = workflow.record();
    match workflow.step() {
        Step::Identify => vec![
            Slot::Field(TextField::OriginalSentence),
            Slot::Field(TextField::Tenor),
            Slot::Field(TextField::Vehicle),
        ],
        Step::Characteristics => r.characteristics.iter().map(|c| Slot::Literal(c.id)).collect(),
        Step::Mapping => r.characteristics.iter().map(|c| Slot::Mapped(c.id)).collect(),
        Step::Challenge => (0..r.challenges.len())
            .map(|i| Slot::Item(ListKind::Challenges, i))
            .collect(),
        Step::Alternatives => (0..r.alternatives.len())
            .map(|i| Slot::Item(ListKind::Alternatives, i))
            .collect(),
        Step::Summary => Vec::new(),
    }
}

pub fn slot_value(workflow: &Workflow, slot: Slot) -> String {
    let r = workflow.record();
    match slot {
        Slot::Field(field) => r.field(field).to_string(),
        Slot::Literal(id) => r
            .characteristic(id)
            .map(|c| c.literal.clone())
            .unwrap_or_default(),
        Slot::Mapped(id) => r
            .characteristic(id)
            .map(|c| c.mapped.clone())
            .unwrap_or_default(),
        Slot::Item(list, index) => r.list(list).get(index).cloned().unwrap_or_default(),
    }
}

#[derive(Debug, Clone)]
pub struct WizardView {
    pub workflow: Workflow,
    pub selected: usize,
    pub editing: Option<(Slot, String)>,
    /// Distinguishes this session's suggestion results from a previous one's.
    pub session: u64,
}

impl WizardView {
    pub fn selected_slot(&self) -> Option<Slot> {
        slots(&self.workflow).get(self.selected).copied()
    }

    fn clamp_selection(&mut self) {
        let len = slots(&self.workflow).len();
        self.selected = self.selected.min(len.saturating_sub(1));
    }

    fn select_last(&mut self) {
        self.selected = slots(&self.workflow).len().saturating_sub(1);
    }

    fn begin_edit(&mut self) {
        if let Some(slot) = self.selected_slot() {
            let value = slot_value(&self.workflow, slot);
            self.editing = Some((slot, value));
        }
    }

    fn commit_edit(&mut self) {
        let Some((slot, value)) = self.editing.take() else {
            return;
        };
        let wf = &mut self.workflow;
        match slot {
            Slot::Field(field) => wf.set_field(field, value),
            Slot::Literal(id) => wf.update_characteristic(id, CharacteristicField::Literal, value),
            Slot::Mapped(id) => wf.update_characteristic(id, CharacteristicField::Mapped, value),
            Slot::Item(list, index) => {
                if index < wf.record().list(list).len() {
                    wf.update_list_item(list, index, value);
                }
            }
        }
    }

    fn add_row(&mut self) {
        match self.workflow.step() {
            Step::Characteristics => {
                self.workflow.add_characteristic();
            }
            Step::Challenge => self.workflow.append_challenge(),
            Step::Alternatives => self.workflow.append_alternative(),
            _ => return,
        }
        self.select_last();
        self.begin_edit();
    }

    fn remove_selected(&mut self) {
        match self.selected_slot() {
            Some(Slot::Literal(id)) => self.workflow.remove_characteristic(id),
            Some(Slot::Item(list, index)) => self.workflow.remove_list_item(list, index),
            _ => return,
        }
        self.clamp_selection();
    }

    fn suggestion_kind(&self) -> Option<SuggestionKind> {
        match self.workflow.step() {
            Step::Identify => Some(SuggestionKind::Structure),
            Step::Characteristics => Some(SuggestionKind::Characteristics),
            Step::Mapping => match self.selected_slot() {
                Some(Slot::Mapped(id)) => Some(SuggestionKind::Mapping(id)),
                _ => None,
            },
            Step::Challenge => Some(SuggestionKind::Challenges),
            Step::Alternatives => Some(SuggestionKind::Alternatives),
            Step::Summary => None,
        }
    }
}

#[derive(Debug, Clone)]
pub enum View {
    Home { selected: usize },
    Walkthrough(Walkthrough),
    Wizard(Box<WizardView>),
}

/// What the event loop must do after a key press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    None,
    Quit,
    Suggest {
        session: u64,
        request: SuggestionRequest,
    },
}

#[derive(Debug, Clone)]
pub struct App {
    pub view: View,
    /// Last analysis taken through "finish"; kept only for this process.
    pub finished: Option<AnalysisRecord>,
    pub ai_enabled: bool,
    sessions: u64,
}

impl App {
    pub fn new(ai_enabled: bool) -> Self {
        Self {
            view: View::Home { selected: 0 },
            finished: None,
            ai_enabled,
            sessions: 0,
        }
    }

    pub fn open_walkthrough(&mut self) {
        info!("Entering example walkthrough");
        self.view = View::Walkthrough(Walkthrough::new());
    }

    pub fn open_wizard(&mut self, sentence: Option<&str>) {
        self.sessions += 1;
        info!(session = self.sessions, "Entering analysis wizard");
        let mut workflow = Workflow::new();
        if let Some(sentence) = sentence {
            workflow.set_field(TextField::OriginalSentence, sentence);
        }
        self.view = View::Wizard(Box::new(WizardView {
            workflow,
            selected: 0,
            editing: None,
            session: self.sessions,
        }));
    }

    pub fn go_home(&mut self) {
        self.view = View::Home { selected: 0 };
    }

    /// Merges a finished suggestion call if its wizard session is still open.
    pub fn on_suggestion(&mut self, session: u64, patch: SuggestionPatch) {
        match &mut self.view {
            View::Wizard(w) if w.session == session => {
                w.workflow.complete_suggestion(patch);
                w.clamp_selection();
            }
            _ => info!(session, "dropping suggestion for a closed session"),
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Action {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return Action::Quit;
        }
        match &mut self.view {
            View::Home { selected } => match key.code {
                KeyCode::Char('q') | KeyCode::Esc => return Action::Quit,
                KeyCode::Up => *selected = selected.saturating_sub(1),
                KeyCode::Down => *selected = (*selected + 1).min(HOME_ENTRIES.len() - 1),
                KeyCode::Char('1') => self.open_walkthrough(),
                KeyCode::Char('2') => self.open_wizard(None),
                KeyCode::Enter => {
                    if *selected == 0 {
                        self.open_walkthrough();
                    } else {
                        self.open_wizard(None);
                    }
                }
                _ => {}
            },
            View::Walkthrough(w) => match key.code {
                KeyCode::Char('q') | KeyCode::Esc => self.go_home(),
                KeyCode::Right | KeyCode::Char('n') | KeyCode::Enter if !w.can_finish() => {
                    w.advance();
                }
                KeyCode::Enter | KeyCode::Char('f') if w.can_finish() => {
                    info!("Walkthrough finished");
                    self.go_home();
                }
                KeyCode::Left | KeyCode::Char('b') => {
                    w.retreat();
                }
                _ => {}
            },
            View::Wizard(_) => return self.handle_wizard_key(key),
        }
        Action::None
    }

    fn handle_wizard_key(&mut self, key: KeyEvent) -> Action {
        let View::Wizard(w) = &mut self.view else {
            return Action::None;
        };

        if let Some((_, buffer)) = &mut w.editing {
            match key.code {
                KeyCode::Enter => w.commit_edit(),
                KeyCode::Esc => w.editing = None,
                KeyCode::Backspace => {
                    buffer.pop();
                }
                KeyCode::Char(c) => buffer.push(c),
                _ => {}
            }
            return Action::None;
        }

        // The summary is read-only: back, finish and exit only
        if w.workflow.step() == Step::Summary {
            match key.code {
                KeyCode::Left | KeyCode::Char('b') => {
                    w.workflow.retreat();
                    w.selected = 0;
                }
                KeyCode::Enter | KeyCode::Char('f') => self.finish_wizard(),
                KeyCode::Esc | KeyCode::Char('q') => self.go_home(),
                _ => {}
            }
            return Action::None;
        }

        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => {
                info!(session = w.session, "Wizard exited; analysis discarded");
                self.go_home();
            }
            KeyCode::Right | KeyCode::Char('n') => {
                if w.workflow.advance() {
                    w.selected = 0;
                }
            }
            KeyCode::Left | KeyCode::Char('b') => {
                if w.workflow.retreat() {
                    w.selected = 0;
                }
            }
            KeyCode::Up => w.selected = w.selected.saturating_sub(1),
            KeyCode::Down => {
                w.selected += 1;
                w.clamp_selection();
            }
            KeyCode::Enter => w.begin_edit(),
            KeyCode::Char('a') => w.add_row(),
            KeyCode::Char('d') | KeyCode::Delete => w.remove_selected(),
            KeyCode::Char('s') if self.ai_enabled => {
                let session = w.session;
                if let Some(request) = w
                    .suggestion_kind()
                    .and_then(|kind| w.workflow.request_suggestion(kind))
                {
                    return Action::Suggest { session, request };
                }
            }
            _ => {}
        }
        Action::None
    }

    fn finish_wizard(&mut self) {
        if let View::Wizard(w) = std::mem::replace(&mut self.view, View::Home { selected: 0 }) {
            info!(session = w.session, "Wizard finished");
            self.finished = Some(w.workflow.into_record());
        }
    }
}
