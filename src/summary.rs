//! Read-only summary of a finished analysis.

use crate::analysis::AnalysisRecord;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummarySection {
    pub heading: &'static str,
    pub lines: Vec<String>,
}

fn or_placeholder(value: &str, placeholder: &str) -> String {
    if value.trim().is_empty() {
        placeholder.to_string()
    } else {
        value.to_string()
    }
}

pub fn sections(record: &AnalysisRecord) -> Vec<SummarySection> {
    let mapping = record
        .characteristics
        .iter()
        .map(|c| {
            format!(
                "{} -> {}",
                or_placeholder(&c.literal, "(blank)"),
                or_placeholder(&c.mapped, "(not mapped)")
            )
        })
        .collect();

    vec![
        SummarySection {
            heading: "Original Metaphor",
            lines: vec![or_placeholder(&record.original_sentence, "(none)")],
        },
        SummarySection {
            heading: "Structure",
            lines: vec![
                format!("Tenor: {}", or_placeholder(&record.tenor, "?")),
                format!("Vehicle: {}", or_placeholder(&record.vehicle, "?")),
            ],
        },
        SummarySection {
            heading: "Mapping",
            lines: mapping,
        },
        SummarySection {
            heading: "Critical Challenges",
            lines: record.challenges.clone(),
        },
        SummarySection {
            heading: "Better Alternatives",
            lines: record.alternatives.clone(),
        },
    ]
}

pub fn to_markdown(record: &AnalysisRecord) -> String {
    let mut out = String::from("# Metaphor Analysis\n");
    for section in sections(record) {
        out.push_str(&format!("\n## {}\n\n", section.heading));
        if section.lines.is_empty() {
            out.push_str("_nothing recorded_\n");
        }
        for line in section.lines {
            out.push_str(&format!("- {}\n", line));
        }
    }
    out
}
