//! Canned manuscript material for the reference studio.
//!
//! Everything here is hardcoded and fictional. It stands in for the text a
//! real language model would return, so the scenarios are reproducible.

use quill_contracts::project::{Chapter, Outline, OutlineChapter};

pub const PREMISE: &str = "A lighthouse keeper on a fog-bound island discovers that the \
     charts in her tower redraw themselves each night, always one reef closer to shore.";

pub const STYLE: &str = "atmospheric literary mystery, close third person";

// ── Outline ──────────────────────────────────────────────────────────────────

const CHAPTERS: [(&str, &str); 4] = [
    ("The Night Chart", "Maren finds a reef inked on the chart that was not there at dusk."),
    ("Soundings", "She rows out at low tide and finds rock where the water was deep."),
    ("The Previous Keeper", "Letters in the oil store reveal her predecessor saw the same thing."),
    ("Landfall", "The reef reaches the harbor mouth and Maren decides whether to light the lamp."),
];

/// The outline the scripted architect returns for any premise.
pub fn outline() -> Outline {
    Outline {
        title: "The Cartographer's Light".to_string(),
        chapters: CHAPTERS
            .iter()
            .enumerate()
            .map(|(i, (title, summary))| OutlineChapter {
                order_index: i as u32 + 1,
                title: title.to_string(),
                summary: summary.to_string(),
            })
            .collect(),
    }
}

// ── Planning notes ───────────────────────────────────────────────────────────

pub fn world_notes() -> String {
    "Skerry Hold is a granite island four miles off the mainland, reachable only \
     on the monthly supply boat. The lighthouse dates from 1871; its lamp runs on \
     paraffin and a clockwork rotation wound every four hours. Fog sits on the \
     island for most of the autumn."
        .to_string()
}

pub fn character_profiles() -> String {
    "Maren Holt, 34: former hydrographer, methodical, sleeps badly. \
     Ivo Strand, 61: supply boat captain, charming, evasive about the old keeper. \
     Agathe Lind (deceased): the previous keeper, known only through her letters."
        .to_string()
}

// ── Prose ────────────────────────────────────────────────────────────────────

/// A short draft for one chapter.
pub fn chapter_prose(order_index: u32, title: &str, summary: &str) -> String {
    format!(
        "Chapter {order_index}: {title}\n\n\
         The fog came in low across the water. {summary} \
         Maren wrote the time in the log, as she always did, and then sat \
         a long while with the pen still in her hand.\n\n\
         \"It was not there yesterday,\" she said to no one."
    )
}

/// Rework the closing line of dialogue.
pub fn polish_dialogue(content: &str) -> String {
    content
        .replace("\" she said to no one.", "\" No one answered.")
        .replace("she said to no one", "she told the empty room")
}

pub fn refined(content: &str, tone: Option<&str>) -> String {
    let tone = tone.unwrap_or("unchanged");
    format!("{}\n\n[Revised for tone: {tone}]", content.trim_end())
}

pub fn continuation(summary: &str) -> String {
    format!(
        "By morning the chart had changed again. The new line ran closer still, \
         and Maren understood what the next page would ask of her. ({summary})"
    )
}

/// A read-only continuity report over the drafted chapters.
pub fn consistency_report(chapters: &[Chapter]) -> String {
    let drafted = chapters.iter().filter(|c| c.has_content()).count();
    format!(
        "Reviewed {drafted} of {} chapters. Timeline is consistent; \
         the supply boat schedule matches across chapters. Consider naming \
         the reef earlier so the final chapter lands harder.",
        chapters.len()
    )
}
