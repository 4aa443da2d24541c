//! Scripted walkthrough of the canonical "degree is a passport" example.

use once_cell::sync::Lazy;

use crate::analysis::AnalysisRecord;
use crate::workflow::{Mode, Step, StepPointer};

pub static EXAMPLE: Lazy<AnalysisRecord> = Lazy::new(|| {
    AnalysisRecord::from_parts(
        "A university degree is a passport to a better job.",
        "A University Degree",
        "A Passport",
        &[
            (
                "It grants you permission to enter a country.",
                "It allows entry to the job market / specific career field.",
            ),
            (
                "It is issued by a governing authority (government).",
                "Issued by the university / accreditation body.",
            ),
            (
                "Without it, you can't legally cross certain borders.",
                "Job application requirements often say 'degree required'.",
            ),
            (
                "It doesn't guarantee a good experience in the new country.",
                "A degree gets you in the door but doesn't guarantee success or happiness.",
            ),
        ],
        &[
            "Does a passport require four years of demonstrated skill and effort to acquire? (No, you just apply. This ignores the work involved in a degree).",
            "Is a passport tailored to specific destinations? (No, but degrees are highly specialized).",
            "Can you have a fantastic journey without a passport? (Yes, just as you can have a great career without a degree via entrepreneurship/trades).",
            "A passport is just a document. Is a degree the only thing you take away? (No, you also get skills, networks, and growth).",
        ],
        &[
            "A university degree is a TOOLKIT. (Emphasizes acquired skills)",
            "A university degree is a KEY. (Emphasizes opening specific doors)",
            "A university degree is STRENGTH TRAINING for your mind. (Emphasizes the process of development)",
        ],
    )
});

/// Short teaching note shown under each walkthrough stage.
pub fn lesson(step: Step) -> &'static str {
    match step {
        Step::Identify => "This initial step is crucial for clarity before diving deeper.",
        Step::Characteristics => {
            "Forget the concept for a moment. What does a passport literally do?"
        }
        Step::Mapping => "Each literal trait becomes a claim about the concept.",
        Step::Challenge => "Every metaphor hides something. Ask where the comparison fails.",
        Step::Alternatives => "A new image highlights different aspects of the same concept.",
        Step::Summary => "",
    }
}

/// Read-only tour over [`EXAMPLE`], steps 1 to 5.
#[derive(Debug, Clone)]
pub struct Walkthrough {
    pointer: StepPointer,
}

impl Default for Walkthrough {
    fn default() -> Self {
        Self::new()
    }
}

impl Walkthrough {
    pub fn new() -> Self {
        Self {
            pointer: StepPointer::new(Mode::Walkthrough),
        }
    }

    pub fn record(&self) -> &'static AnalysisRecord {
        &EXAMPLE
    }

    pub fn step(&self) -> Step {
        self.pointer.current()
    }

    pub fn pointer(&self) -> &StepPointer {
        &self.pointer
    }

    pub fn advance(&mut self) -> bool {
        self.pointer.advance()
    }

    pub fn retreat(&mut self) -> bool {
        self.pointer.retreat()
    }

    /// Only the last stage offers "finish".
    pub fn can_finish(&self) -> bool {
        self.pointer.is_last()
    }
}
