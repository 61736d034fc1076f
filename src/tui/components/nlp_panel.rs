//! # NlpPanel Component
//!
//! Side panel showing the analysis of the latest user message: a sentiment
//! bar, the top intents, entity tags and (for file turns) the document
//! summary. Everything it draws comes from [`PanelSummary`], so a missing
//! or half-formed analysis degrades to placeholders instead of failing.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, LineGauge, Padding, Paragraph, Wrap};

use crate::core::analysis::{PanelSummary, SentimentLabel, SentimentSummary};
use crate::tui::component::Component;
use crate::tui::theme;

pub const UNAVAILABLE_TEXT: &str = "NLP analysis not available";
const NO_SENTIMENT_TEXT: &str = "Sentiment not available";

fn sentiment_color(label: SentimentLabel) -> Color {
    match label {
        SentimentLabel::Positive => Color::Green,
        SentimentLabel::Negative => Color::Red,
        SentimentLabel::Neutral => Color::Yellow,
    }
}

fn heading(text: &'static str) -> Line<'static> {
    Line::from(Span::styled(text, Style::default().add_modifier(Modifier::BOLD)))
}

fn muted(text: impl Into<String>) -> Line<'static> {
    Line::from(Span::styled(text.into(), Style::default().fg(theme::MUTED)))
}

pub struct NlpPanel<'a> {
    pub summary: &'a PanelSummary,
}

impl<'a> NlpPanel<'a> {
    pub fn new(summary: &'a PanelSummary) -> Self {
        Self { summary }
    }

    fn render_sentiment(frame: &mut Frame, area: Rect, sentiment: Option<&SentimentSummary>) {
        let [label_area, bar_area] =
            Layout::vertical([Constraint::Length(1), Constraint::Length(1)]).areas(area);

        let Some(s) = sentiment else {
            frame.render_widget(Paragraph::new(muted(NO_SENTIMENT_TEXT)), label_area);
            return;
        };

        let color = sentiment_color(s.label);
        let label = Line::from(vec![
            Span::raw("Sentiment: "),
            Span::styled(s.label.label(), Style::default().fg(color).add_modifier(Modifier::BOLD)),
            Span::styled(format!(" ({:+.2})", s.compound), Style::default().fg(theme::MUTED)),
        ]);
        frame.render_widget(Paragraph::new(label), label_area);

        let gauge = LineGauge::default()
            .ratio(s.magnitude)
            .filled_style(Style::default().fg(color))
            .unfilled_style(Style::default().fg(theme::MUTED));
        frame.render_widget(gauge, bar_area);
    }
}

fn detail_lines(
    intents: &[(String, f64)],
    entities: &[crate::core::analysis::EntityTag],
    document_summary: Option<&str>,
) -> Vec<Line<'static>> {
    let mut lines = vec![heading("Intents")];
    if intents.is_empty() {
        lines.push(muted("none detected"));
    }
    for (label, confidence) in intents {
        lines.push(Line::from(vec![
            Span::raw(format!("  {label} ")),
            Span::styled(
                format!("{:.0}%", confidence * 100.0),
                Style::default().fg(theme::MUTED),
            ),
        ]));
    }

    lines.push(Line::default());
    lines.push(heading("Entities"));
    if entities.is_empty() {
        lines.push(muted("none detected"));
    }
    for entity in entities {
        let mut spans = vec![Span::raw(format!("  {}", entity.text))];
        if !entity.label.is_empty() {
            spans.push(Span::styled(
                format!(" [{}]", entity.label),
                Style::default().fg(Color::Magenta),
            ));
        }
        lines.push(Line::from(spans));
    }

    if let Some(summary) = document_summary {
        lines.push(Line::default());
        lines.push(heading("Document"));
        lines.push(Line::from(summary.to_string()));
    }
    lines
}

impl<'a> Component for NlpPanel<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(theme::MUTED))
            .title(" NLP Analysis ")
            .padding(Padding::horizontal(1));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        match self.summary {
            PanelSummary::Unavailable => {
                frame.render_widget(Paragraph::new(muted(UNAVAILABLE_TEXT)).wrap(Wrap { trim: true }), inner);
            }
            PanelSummary::Available {
                sentiment,
                intents,
                entities,
                document_summary,
            } => {
                let [sentiment_area, _, details_area] = Layout::vertical([
                    Constraint::Length(2),
                    Constraint::Length(1),
                    Constraint::Min(0),
                ])
                .areas(inner);

                Self::render_sentiment(frame, sentiment_area, sentiment.as_ref());
                let details = detail_lines(intents, entities, document_summary.as_deref());
                frame.render_widget(Paragraph::new(details).wrap(Wrap { trim: true }), details_area);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::analysis::{Analysis, summarize};
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn rendered(summary: &PanelSummary) -> String {
        let mut terminal = Terminal::new(TestBackend::new(40, 24)).unwrap();
        terminal
            .draw(|f| NlpPanel::new(summary).render(f, f.area()))
            .unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn unavailable_shows_placeholder() {
        let text = rendered(&summarize(None));
        assert!(text.contains(UNAVAILABLE_TEXT));
    }

    #[test]
    fn full_analysis_shows_every_section() {
        let analysis: Analysis = serde_json::from_value(serde_json::json!({
            "sentiment": {"negative": 0.0, "neutral": 0.3, "positive": 0.7, "compound": 0.8},
            "entities": [{"text": "Paris", "label": "GPE", "start": 0, "end": 5}],
            "intents": {"travel": 0.9, "greeting": 0.2},
            "document_summary": "A trip plan."
        }))
        .unwrap();
        let text = rendered(&summarize(Some(&analysis)));
        assert!(text.contains("positive"));
        assert!(text.contains("travel 90%"));
        assert!(text.contains("Paris [GPE]"));
        assert!(text.contains("A trip plan."));
    }

    #[test]
    fn missing_sentiment_section_gets_placeholder() {
        let analysis: Analysis =
            serde_json::from_value(serde_json::json!({"intents": {"ask": 0.5}})).unwrap();
        let text = rendered(&summarize(Some(&analysis)));
        assert!(text.contains(NO_SENTIMENT_TEXT));
        assert!(text.contains("ask 50%"));
        assert!(text.contains("none detected"));
    }
}
