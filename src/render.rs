//! Plain-text rendering of the review pages.
//!
//! Each section lists its records with their index, marks the record in
//! edit mode, and ends with the section's "Add" control:
//!
//! ```text
//! Epics
//! ├── [0] Accounts: Signup and login
//! └── [1] ✎ Billing: Plans and invoices
//!     + Add Epic
//! ```

use crate::models::Developer;
use crate::pipeline::{
    AnalysisReview, AnalysisSection, EpicsReview, EpicsSection, PageStatus, TeamMatchingReview,
};

const EDITING: char = '✎';
const SELECTED: char = '●';
const UNSELECTED: char = '○';

/// Render one section: title, one line per record, then the add control.
fn render_section(
    output: &mut String,
    title: &str,
    lines: &[String],
    editing: Option<usize>,
    add_label: &str,
) {
    output.push_str(title);
    output.push('\n');

    if lines.is_empty() {
        output.push_str("    (none)\n");
    }

    for (i, line) in lines.iter().enumerate() {
        let branch = if i == lines.len() - 1 { "└── " } else { "├── " };
        output.push_str(branch);
        output.push_str(&format!("[{}] ", i));
        if editing == Some(i) {
            output.push(EDITING);
            output.push(' ');
        }
        output.push_str(line);
        output.push('\n');
    }

    output.push_str("    + ");
    output.push_str(add_label);
    output.push('\n');
}

fn render_status(output: &mut String, status: &PageStatus) {
    if let Some(success) = status.success() {
        output.push_str(&format!("✓ {}\n", success));
    }
    if let Some(error) = status.error() {
        output.push_str(&format!("✗ {}\n", error));
    }
}

fn pair(first: &str, second: &str) -> String {
    match (first.is_empty(), second.is_empty()) {
        (false, false) => format!("{}: {}", first, second),
        (false, true) => first.to_string(),
        (true, false) => format!("(untitled): {}", second),
        (true, true) => "(empty)".to_string(),
    }
}

/// Developer list of the intake page, with selection markers.
pub fn render_developers(developers: &[Developer], selected: &[String]) -> String {
    let mut output = String::new();
    for dev in developers {
        let marker = if selected.iter().any(|id| *id == dev.id) {
            SELECTED
        } else {
            UNSELECTED
        };
        output.push_str(&format!(
            "{} {} ({}) [{}]\n    Skills: {}\n    Bandwidth: {}%  Work hours: {}\n",
            marker,
            dev.name,
            dev.role,
            dev.id,
            dev.skills.join(", "),
            dev.bandwidth_percent(),
            dev.work_batch.label(),
        ));
    }
    output
}

pub fn render_analysis(page: &AnalysisReview) -> String {
    let mut output = String::new();
    render_status(&mut output, page.status());
    let editing = page.editing();
    let editing_in = |section: AnalysisSection| {
        editing
            .filter(|key| key.section == section)
            .map(|key| key.index)
    };

    output.push_str(&format!("Project {}\n\n", page.context().project_id));
    output.push_str("Domain\n");
    if editing_in(AnalysisSection::Domain).is_some() {
        output.push(EDITING);
        output.push(' ');
    }
    output.push_str(page.domain());
    output.push_str("\n\n");

    let features: Vec<String> = page
        .features()
        .items()
        .iter()
        .map(|f| pair(&f.name, &f.description))
        .collect();
    render_section(
        &mut output,
        "Features",
        &features,
        editing_in(AnalysisSection::Features),
        "Add Feature",
    );

    let personas: Vec<String> = page
        .personas()
        .items()
        .iter()
        .map(|p| pair(&p.role, &p.needs))
        .collect();
    render_section(
        &mut output,
        "Personas",
        &personas,
        editing_in(AnalysisSection::Personas),
        "Add Persona",
    );

    let modules: Vec<String> = page
        .modules()
        .items()
        .iter()
        .map(|m| pair(m, ""))
        .collect();
    render_section(
        &mut output,
        "Modules",
        &modules,
        editing_in(AnalysisSection::Modules),
        "Add Module",
    );

    let risks: Vec<String> = page
        .risks()
        .items()
        .iter()
        .map(|r| pair(&r.risk, &r.mitigation))
        .collect();
    render_section(
        &mut output,
        "Risks",
        &risks,
        editing_in(AnalysisSection::Risks),
        "Add Risk",
    );

    output
}

pub fn render_epics(page: &EpicsReview) -> String {
    let mut output = String::new();
    render_status(&mut output, page.status());
    let editing = page.editing();
    let editing_in = |section: EpicsSection| {
        editing
            .filter(|key| key.section == section)
            .map(|key| key.index)
    };
    let [add_epic, add_story, go] = page.controls();

    output.push_str(&format!("Project {}\n\n", page.context().project_id));

    let epics: Vec<String> = page
        .epics()
        .items()
        .iter()
        .map(|e| pair(&e.name, &e.description))
        .collect();
    render_section(
        &mut output,
        "Epics",
        &epics,
        editing_in(EpicsSection::Epics),
        add_epic,
    );

    let stories: Vec<String> = page
        .user_stories()
        .items()
        .iter()
        .map(|s| pair(&s.title, &s.gherkin.replace('\n', " / ")))
        .collect();
    render_section(
        &mut output,
        "User Stories",
        &stories,
        editing_in(EpicsSection::UserStories),
        add_story,
    );

    output.push_str(&format!("\n> {}\n", go));
    output
}

pub fn render_team_matching(page: &TeamMatchingReview) -> String {
    let mut output = String::new();
    render_status(&mut output, page.status());
    output.push_str(&format!("Project {}\n\n", page.context().project_id));

    let allocations: Vec<String> = page
        .allocations()
        .items()
        .iter()
        .map(|a| {
            format!(
                "{} → {} ({})",
                if a.story_title.is_empty() { "(untitled)" } else { a.story_title.as_str() },
                if a.assigned_to.is_empty() { "unassigned" } else { a.assigned_to.as_str() },
                a.reason
            )
        })
        .collect();
    render_section(
        &mut output,
        "Allocations",
        &allocations,
        page.editing().map(|key| key.index),
        "Add Allocation",
    );

    output.push_str("\n> Save Team Matching\n");
    output
}
