use std::io::{self, Write};

use pagesum_core::{PopupView, ResultView};

use super::constants::*;

/// One result column: a heading plus its text lines.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Column {
    heading: &'static str,
    lines: Vec<String>,
}

impl Column {
    fn new(heading: &'static str, text: &str) -> Self {
        Self {
            heading,
            lines: text.trim().lines().map(str::to_string).collect(),
        }
    }
}

/// Renders a view to terminal lines. Pure; the caller decides when to print.
pub fn render(view: &PopupView) -> Vec<String> {
    let mut lines = vec![format!("[{}]", view.trigger_label)];
    match &view.body {
        ResultView::Ready => lines.push(READY_TEXT.to_string()),
        ResultView::Progress(label) => lines.push((*label).to_string()),
        ResultView::SummaryPendingTranslation { summary } => push_columns(
            &mut lines,
            &[
                Column::new(SUMMARY_HEADING, summary),
                Column::new(TRANSLATION_HEADING, ResultView::TRANSLATING),
            ],
        ),
        ResultView::Final {
            summary,
            translation,
            translation_error,
        } => {
            let mut columns = vec![Column::new(SUMMARY_HEADING, summary)];
            match (translation, translation_error) {
                (Some(translation), _) => {
                    columns.push(Column::new(TRANSLATION_HEADING, translation))
                }
                (None, Some(error)) => columns.push(Column::new(TRANSLATION_HEADING, error)),
                (None, None) => {}
            }
            push_columns(&mut lines, &columns);
        }
        ResultView::Failed { message } => lines.push(format!("{ERROR_PREFIX}{message}")),
        ResultView::Notice { message } => lines.push(message.clone()),
    }
    lines
}

fn push_columns(lines: &mut Vec<String>, columns: &[Column]) {
    for column in columns {
        lines.push(format!("{RULE} {} {RULE}", column.heading));
        lines.extend(column.lines.iter().cloned());
    }
}

/// Prints frames, skipping any frame identical to the previous one.
pub struct Screen<W: Write> {
    out: W,
    last: Vec<String>,
}

impl<W: Write> Screen<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            last: Vec::new(),
        }
    }

    pub fn show(&mut self, view: &PopupView) -> io::Result<()> {
        let frame = render(view);
        if frame == self.last {
            return Ok(());
        }
        if !self.last.is_empty() {
            writeln!(self.out)?;
        }
        for line in &frame {
            writeln!(self.out, "{line}")?;
        }
        self.out.flush()?;
        self.last = frame;
        Ok(())
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }
}
