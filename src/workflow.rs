//! Step-sequenced wizard state.
//!
//! A [`Workflow`] owns one [`AnalysisRecord`], the step pointer and the busy
//! flag that guards outstanding suggestion calls. Each interactive session
//! builds its own instance and drops it on exit.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::analysis::{
    AnalysisRecord, CharacteristicField, CharacteristicId, ListKind, SuggestionPatch, TextField,
};
use crate::suggest::SuggestionRequest;

/// Which flow a step pointer belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mode {
    Walkthrough,
    Wizard,
}

impl Mode {
    pub fn last_step(self) -> Step {
        match self {
            Mode::Walkthrough => Step::Alternatives,
            Mode::Wizard => Step::Summary,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Step {
    Identify = 1,
    Characteristics = 2,
    Mapping = 3,
    Challenge = 4,
    Alternatives = 5,
    Summary = 6,
}

impl Step {
    pub const ALL: [Step; 6] = [
        Step::Identify,
        Step::Characteristics,
        Step::Mapping,
        Step::Challenge,
        Step::Alternatives,
        Step::Summary,
    ];

    pub fn number(self) -> u8 {
        self as u8
    }

    pub fn from_number(n: u8) -> Option<Step> {
        Step::ALL.get(usize::from(n).checked_sub(1)?).copied()
    }

    pub fn title(self) -> &'static str {
        match self {
            Step::Identify => "Step 1: Unpack the Metaphor",
            Step::Characteristics => "Step 2: Analyze Literal Characteristics",
            Step::Mapping => "Step 3: Map to the Tenor",
            Step::Challenge => "Step 4: Challenge the Metaphor",
            Step::Alternatives => "Step 5: Generate Alternatives",
            Step::Summary => "Analysis Summary",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Step::Identify => "Identify the Tenor (Concept) and the Vehicle (Image).",
            Step::Characteristics => "Brainstorm the key functions and qualities of the Vehicle.",
            Step::Mapping => "Translate how those characteristics apply to the Concept.",
            Step::Challenge => "Find where the comparison breaks down, is misleading, or biased.",
            Step::Alternatives => "Create new metaphors that might be more accurate or helpful.",
            Step::Summary => "Review your full critical breakdown of the metaphor.",
        }
    }
}

/// Current stage of a flow, clamped to `1..=mode.last_step()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepPointer {
    mode: Mode,
    current: Step,
}

impl StepPointer {
    pub fn new(mode: Mode) -> Self {
        Self {
            mode,
            current: Step::Identify,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn current(&self) -> Step {
        self.current
    }

    pub fn is_first(&self) -> bool {
        self.current == Step::Identify
    }

    pub fn is_last(&self) -> bool {
        self.current == self.mode.last_step()
    }

    /// Moves one step forward. Returns false at the last step.
    pub fn advance(&mut self) -> bool {
        if self.is_last() {
            return false;
        }
        match Step::from_number(self.current.number() + 1) {
            Some(next) => {
                self.current = next;
                true
            }
            None => false,
        }
    }

    /// Moves one step back. Returns false at the first step.
    pub fn retreat(&mut self) -> bool {
        if self.is_first() {
            return false;
        }
        match Step::from_number(self.current.number() - 1) {
            Some(prev) => {
                self.current = prev;
                true
            }
            None => false,
        }
    }
}

/// Suggestion actions the wizard can ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuggestionKind {
    Structure,
    Characteristics,
    Mapping(CharacteristicId),
    Challenges,
    Alternatives,
}

#[derive(Debug, Clone)]
pub struct Workflow {
    pointer: StepPointer,
    record: AnalysisRecord,
    busy: bool,
}

impl Default for Workflow {
    fn default() -> Self {
        Self::new()
    }
}

impl Workflow {
    pub fn new() -> Self {
        Self::from_record(AnalysisRecord::new())
    }

    /// Starts a wizard session over an existing record.
    pub fn from_record(record: AnalysisRecord) -> Self {
        Self {
            pointer: StepPointer::new(Mode::Wizard),
            record,
            busy: false,
        }
    }

    pub fn record(&self) -> &AnalysisRecord {
        &self.record
    }

    pub fn into_record(self) -> AnalysisRecord {
        self.record
    }

    pub fn step(&self) -> Step {
        self.pointer.current()
    }

    pub fn pointer(&self) -> &StepPointer {
        &self.pointer
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    /// The only gate in the flow: leaving step 1 needs a tenor.
    pub fn can_advance(&self) -> bool {
        if self.pointer.is_last() {
            return false;
        }
        !(self.pointer.current() == Step::Identify && self.record.tenor.is_empty())
    }

    pub fn advance(&mut self) -> bool {
        if !self.can_advance() {
            return false;
        }
        self.pointer.advance()
    }

    pub fn retreat(&mut self) -> bool {
        self.pointer.retreat()
    }

    pub fn set_field(&mut self, field: TextField, value: impl Into<String>) {
        self.record.set_field(field, value);
    }

    pub fn add_characteristic(&mut self) -> CharacteristicId {
        self.record.add_characteristic()
    }

    pub fn update_characteristic(
        &mut self,
        id: CharacteristicId,
        field: CharacteristicField,
        value: impl Into<String>,
    ) {
        self.record.update_characteristic(id, field, value);
    }

    pub fn remove_characteristic(&mut self, id: CharacteristicId) {
        self.record.remove_characteristic(id);
    }

    pub fn append_challenge(&mut self) {
        self.record.append_list_item(ListKind::Challenges);
    }

    pub fn append_alternative(&mut self) {
        self.record.append_list_item(ListKind::Alternatives);
    }

    /// # Panics
    ///
    /// Panics if `index` is out of bounds for `list`.
    pub fn update_list_item(&mut self, list: ListKind, index: usize, value: impl Into<String>) {
        self.record.update_list_item(list, index, value);
    }

    /// # Panics
    ///
    /// Panics if `index` is out of bounds for `list`.
    pub fn remove_list_item(&mut self, list: ListKind, index: usize) {
        self.record.remove_list_item(list, index);
    }

    pub fn merge_suggestions(&mut self, patch: SuggestionPatch) {
        self.record.merge_suggestions(patch);
    }

    /// Builds the request for a suggestion action and marks the workflow busy.
    ///
    /// Returns `None` while another call is outstanding or when the action's
    /// input is missing (blank sentence, empty vehicle, empty literal).
    pub fn request_suggestion(&mut self, kind: SuggestionKind) -> Option<SuggestionRequest> {
        if self.busy {
            debug!(?kind, "suggestion refused: call already outstanding");
            return None;
        }
        let r = &self.record;
        let request = match kind {
            SuggestionKind::Structure => {
                if r.original_sentence.trim().is_empty() {
                    return None;
                }
                SuggestionRequest::Structure {
                    sentence: r.original_sentence.clone(),
                }
            }
            SuggestionKind::Characteristics => {
                if r.vehicle.is_empty() {
                    return None;
                }
                SuggestionRequest::Characteristics {
                    vehicle: r.vehicle.clone(),
                }
            }
            SuggestionKind::Mapping(id) => {
                let entry = r.characteristic(id)?;
                if entry.literal.is_empty() {
                    return None;
                }
                SuggestionRequest::Mapping {
                    id,
                    literal: entry.literal.clone(),
                    tenor: r.tenor.clone(),
                    vehicle: r.vehicle.clone(),
                }
            }
            SuggestionKind::Challenges => SuggestionRequest::Challenges {
                tenor: r.tenor.clone(),
                vehicle: r.vehicle.clone(),
            },
            SuggestionKind::Alternatives => SuggestionRequest::Alternatives {
                tenor: r.tenor.clone(),
            },
        };
        self.busy = true;
        Some(request)
    }

    /// Merges the result of the outstanding call and clears the busy flag.
    pub fn complete_suggestion(&mut self, patch: SuggestionPatch) {
        self.merge_suggestions(patch);
        self.busy = false;
    }
}
