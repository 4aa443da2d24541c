use ratatui::prelude::*;
use ratatui::widgets::*;

use super::app::{App, HOME_ENTRIES, Slot, View, WizardView, slot_value, slots};
use crate::analysis::{ListKind, TextField};
use crate::summary;
use crate::walkthrough::{self, Walkthrough};
use crate::workflow::Step;

pub fn ui(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(8),
            Constraint::Length(3),
        ])
        .split(f.size());

    match &app.view {
        View::Home { selected } => home(f, &chunks, *selected, app.ai_enabled),
        View::Walkthrough(w) => walkthrough_view(f, &chunks, w),
        View::Wizard(w) => wizard_view(f, &chunks, w, app.ai_enabled),
    }
}

fn header(f: &mut Frame, area: Rect, title: &str, right: String) {
    let p = Paragraph::new(Line::from(vec![
        Span::styled(
            "Metaphor Unpacker",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("  |  "),
        Span::raw(title.to_string()),
        Span::raw("  "),
        Span::styled(right, Style::default().fg(Color::DarkGray)),
    ]))
    .block(Block::default().borders(Borders::ALL));
    f.render_widget(p, area);
}

fn help(f: &mut Frame, area: Rect, text: &str) {
    let p = Paragraph::new(Line::raw(text.to_string()))
        .block(Block::default().borders(Borders::ALL).title("Keys"));
    f.render_widget(p, area);
}

fn heading(text: &str) -> Line<'static> {
    Line::from(Span::styled(
        text.to_string(),
        Style::default().add_modifier(Modifier::BOLD),
    ))
}

fn progress(step: Step, last: Step) -> String {
    (1..=last.number())
        .map(|n| if n == step.number() { "●" } else { "○" })
        .collect::<Vec<_>>()
        .join(" ")
}

fn home(f: &mut Frame, chunks: &[Rect], selected: usize, ai_enabled: bool) {
    header(f, chunks[0], "Home", String::new());

    let mut lines = vec![
        Line::raw(""),
        Line::raw("Metaphors shape how we think. Don't just accept them; unpack them."),
        Line::raw("Analyze, challenge, and reimagine the comparisons that define our world."),
        Line::raw(""),
    ];
    for (i, entry) in HOME_ENTRIES.iter().enumerate() {
        let style = if i == selected {
            Style::default().fg(Color::Black).bg(Color::Cyan)
        } else {
            Style::default()
        };
        lines.push(Line::from(Span::styled(format!(" {}. {} ", i + 1, entry), style)));
    }
    lines.push(Line::raw(""));
    lines.push(Line::raw(
        "Based on \"Critical Thinking: Unpack the Metaphor\" educational framework.",
    ));
    if !ai_enabled {
        lines.push(Line::from(Span::styled(
            "AI suggestions are off (no API key configured).",
            Style::default().fg(Color::Yellow),
        )));
    }
    let body = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL))
        .wrap(Wrap { trim: true });
    f.render_widget(body, chunks[1]);

    help(f, chunks[2], "Up/Down select • Enter open • 1 example • 2 analyze • q quit");
}

fn walkthrough_view(f: &mut Frame, chunks: &[Rect], w: &Walkthrough) {
    let step = w.step();
    let last = w.pointer().mode().last_step();
    header(
        f,
        chunks[0],
        "Example Walkthrough",
        format!("Step {} of {}  {}", step.number(), last.number(), progress(step, last)),
    );

    let r = w.record();
    let mut lines = vec![heading(step.title()), Line::raw(step.description()), Line::raw("")];
    match step {
        Step::Identify => {
            lines.push(Line::raw(format!("\"{}\"", r.original_sentence)));
            lines.push(Line::raw(format!("Tenor (Concept): {}", r.tenor)));
            lines.push(Line::raw(format!("Vehicle (Image): {}", r.vehicle)));
        }
        Step::Characteristics => {
            for c in &r.characteristics {
                lines.push(Line::raw(format!("• {}", c.literal)));
            }
        }
        Step::Mapping => {
            for c in &r.characteristics {
                lines.push(Line::raw(format!("{}: {}", r.vehicle, c.literal)));
                lines.push(Line::raw(format!("  → {}: {}", r.tenor, c.mapped)));
            }
        }
        Step::Challenge => {
            for c in &r.challenges {
                lines.push(Line::raw(format!("? {}", c)));
            }
        }
        Step::Alternatives | Step::Summary => {
            for a in &r.alternatives {
                lines.push(Line::raw(format!("✦ {}", a)));
            }
        }
    }
    lines.push(Line::raw(""));
    lines.push(Line::from(Span::styled(
        walkthrough::lesson(step).to_string(),
        Style::default().fg(Color::Green),
    )));

    let body = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL))
        .wrap(Wrap { trim: true });
    f.render_widget(body, chunks[1]);

    let keys = if w.can_finish() {
        "←/b back • Enter/f finish • Esc exit"
    } else {
        "←/b back • →/n/Enter next • Esc exit"
    };
    help(f, chunks[2], keys);
}

fn slot_label(w: &WizardView, slot: Slot) -> String {
    let r = w.workflow.record();
    match slot {
        Slot::Field(TextField::OriginalSentence) => "Metaphor".into(),
        Slot::Field(TextField::Tenor) => "Tenor (Concept)".into(),
        Slot::Field(TextField::Vehicle) => "Vehicle (Image)".into(),
        Slot::Literal(_) => "Trait".into(),
        Slot::Mapped(id) => r
            .characteristic(id)
            .map(|c| format!("{} ({})", c.literal, r.vehicle))
            .unwrap_or_default(),
        Slot::Item(ListKind::Challenges, i) => format!("Point {}", i + 1),
        Slot::Item(ListKind::Alternatives, i) => format!("Idea {}", i + 1),
    }
}

fn prompt_line(w: &WizardView) -> String {
    let r = w.workflow.record();
    let or = |s: &str, fallback: &str| {
        if s.is_empty() {
            fallback.to_string()
        } else {
            s.to_string()
        }
    };
    match w.workflow.step() {
        Step::Identify => "Enter a metaphor, then name its tenor and vehicle.".into(),
        Step::Characteristics => format!(
            "What are the literal functions or qualities of a {}?",
            or(&r.vehicle, "Vehicle")
        ),
        Step::Mapping => format!(
            "How do these qualities map onto {}?",
            or(&r.tenor, "the Concept")
        ),
        Step::Challenge => format!(
            "Where does the metaphor \"{} is {}\" break down?",
            r.tenor, r.vehicle
        ),
        Step::Alternatives => format!("What are better metaphors for {}?", r.tenor),
        Step::Summary => String::new(),
    }
}

fn wizard_view(f: &mut Frame, chunks: &[Rect], w: &WizardView, ai_enabled: bool) {
    let step = w.workflow.step();
    let last = w.workflow.pointer().mode().last_step();
    let status = if w.workflow.is_busy() {
        "Thinking..."
    } else {
        ""
    };
    header(
        f,
        chunks[0],
        "Analyze Your Own",
        format!(
            "Step {} of {}  {}  {}",
            step.number(),
            last.number(),
            progress(step, last),
            status
        ),
    );

    let mut lines = vec![heading(step.title()), Line::raw(step.description()), Line::raw("")];

    if step == Step::Summary {
        for section in summary::sections(w.workflow.record()) {
            lines.push(heading(section.heading));
            for l in section.lines {
                lines.push(Line::raw(format!("  {}", l)));
            }
            lines.push(Line::raw(""));
        }
    } else {
        lines.push(Line::raw(prompt_line(w)));
        lines.push(Line::raw(""));
        let cells = slots(&w.workflow);
        if cells.is_empty() {
            lines.push(Line::from(Span::styled(
                "(nothing yet: press a to add a row or s for AI suggestions)",
                Style::default().fg(Color::DarkGray),
            )));
        }
        for (i, slot) in cells.into_iter().enumerate() {
            let value = match &w.editing {
                Some((editing, buffer)) if *editing == slot => format!("{}▏", buffer),
                _ => slot_value(&w.workflow, slot),
            };
            let style = if i == w.selected {
                Style::default().fg(Color::Black).bg(Color::Cyan)
            } else {
                Style::default()
            };
            lines.push(Line::from(vec![
                Span::styled(format!("{}: ", slot_label(w, slot)), style),
                Span::raw(value),
            ]));
        }
    }

    let body = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL))
        .wrap(Wrap { trim: false });
    f.render_widget(body, chunks[1]);

    let keys = if w.editing.is_some() {
        "type to edit • Enter save • Esc cancel".to_string()
    } else if step == Step::Summary {
        "←/b back • Enter/f finish analysis • Esc exit".to_string()
    } else {
        let mut k = String::from("↑/↓ select • Enter edit");
        if matches!(
            step,
            Step::Characteristics | Step::Challenge | Step::Alternatives
        ) {
            k.push_str(" • a add • d delete");
        }
        if ai_enabled {
            k.push_str(" • s AI suggest");
        }
        k.push_str(" • ←/b back");
        if w.workflow.can_advance() {
            k.push_str(" • →/n next");
        } else if step == Step::Identify {
            k.push_str(" • (enter a tenor to continue)");
        }
        k.push_str(" • Esc exit");
        k
    };
    help(f, chunks[2], &keys);
}
