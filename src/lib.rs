pub mod analysis;
pub mod clients;
pub mod config;
pub mod error;
pub mod prompts;
pub mod schemas;
pub mod suggest;
pub mod summary;
pub mod tui;
pub mod walkthrough;
pub mod workflow;

pub use analysis::{AnalysisRecord, Characteristic, CharacteristicId, SuggestionPatch};
pub use error::{Result, UnpackerError};
pub use suggest::SuggestionClient;
pub use workflow::{Mode, Step, Workflow};
