//! Prompt templates for the suggestion calls.

/// Size of every list suggestion batch.
pub const BATCH_SIZE: usize = 3;

pub fn structure_prompt(sentence: &str) -> String {
    format!(
        "Analyze this metaphor: \"{sentence}\".\n\
         Identify the Tenor (the concept being described) and the Vehicle (the image used to describe it).\n\
         Return JSON."
    )
}

pub fn characteristics_prompt(vehicle: &str) -> String {
    format!(
        "List {BATCH_SIZE} distinct literal characteristics or functions of a \"{vehicle}\". \
         Keep them short and factual."
    )
}

pub fn mapping_prompt(literal: &str, tenor: &str, vehicle: &str) -> String {
    format!(
        "We are analyzing the metaphor: \"{tenor} is like {vehicle}\".\n\
         Characteristic of {vehicle}: \"{literal}\".\n\
         How does this map to \"{tenor}\"? What is the equivalent?\n\
         Return a single short sentence explaining the connection."
    )
}

pub fn challenges_prompt(tenor: &str, vehicle: &str) -> String {
    format!(
        "Critically analyze the metaphor: \"{tenor} is {vehicle}\".\n\
         Find {BATCH_SIZE} ways this metaphor breaks down, is misleading, or hides assumptions.\n\
         Return as an array of strings (questions or statements)."
    )
}

pub fn alternatives_prompt(tenor: &str) -> String {
    format!(
        "Suggest {BATCH_SIZE} alternative metaphors for \"{tenor}\" that highlight different \
         aspects of it. Return just the metaphors."
    )
}
