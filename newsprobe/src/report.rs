//! Builds the JSON view the front end renders from one analysis.

use serde::Serialize;

use crate::analyzer::Analysis;
use crate::annotate::{annotate, AnnotateError, Segment};
use crate::labels::TaskLabel;

/// One `<emoji> <task>: <value>` display line.
#[derive(Debug, Clone, Serialize)]
pub struct ReportLine {
    pub emoji: &'static str,
    pub task: &'static str,
    pub value: String,
}

/// Everything the UI needs to draw one submission's result.
#[derive(Debug, Clone, Serialize)]
pub struct ReportView {
    pub lines: Vec<ReportLine>,
    pub headline: Vec<Segment>,
    /// `None` means content was not provided; the UI shows an explicit
    /// notice instead of an empty annotated view.
    pub content: Option<Vec<Segment>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

fn yes_no(positive: bool) -> String {
    if positive { "Yes".to_string() } else { "No".to_string() }
}

/// Assemble the report view. Clickbait and fake lines show Yes/No derived
/// from the positive class, not the raw label string.
pub fn build_report(
    headline: &str,
    content: Option<&str>,
    analysis: &Analysis,
) -> Result<ReportView, AnnotateError> {
    let lines = vec![
        ReportLine {
            emoji: analysis.category.emoji(),
            task: "Category",
            value: analysis.category.label.as_str().to_string(),
        },
        ReportLine {
            emoji: analysis.clickbait.emoji(),
            task: "Clickbait",
            value: yes_no(analysis.clickbait.label.is_clickbait()),
        },
        ReportLine {
            emoji: analysis.fake.emoji(),
            task: "Fake",
            value: yes_no(analysis.fake.label.is_fake()),
        },
    ];

    let headline_segments = annotate(headline, &analysis.ner.headline)?;
    let content_segments = match (content, &analysis.ner.content) {
        (Some(text), Some(mentions)) => Some(annotate(text, mentions)?),
        _ => None,
    };

    let warning = if content_segments.is_none() {
        Some("Please provide both headline and content to achieve better results.".to_string())
    } else {
        None
    };

    Ok(ReportView {
        lines,
        headline: headline_segments,
        content: content_segments,
        warning,
    })
}
