//! Plain-text rendering of views and search results.

use std::io::{self, Write};

use nutriscore_core::{Field, ListItem, MeterFill, NO_MATCHES, SearchHit, ViewState, format_score};

/// Number of cells in the meter bar.
const METER_WIDTH: usize = 20;

/// Write every region of `view`: inputs, meter, score with label, then the
/// match list.
pub(crate) fn render_view(writer: &mut dyn Write, view: &ViewState) -> io::Result<()> {
    let inputs: Vec<String> = Field::ALL
        .iter()
        .map(|field| format!("{field}={}", view.form.get(*field)))
        .collect();
    writeln!(writer, "inputs: {}", inputs.join(" "))?;
    writeln!(writer, "[{}] {}", meter_bar(view.meter), view.meter)?;
    writeln!(writer, "score: {} ({})", view.score_text, view.label)?;
    for item in &view.matches {
        render_item(writer, item)?;
    }
    Ok(())
}

fn render_item(writer: &mut dyn Write, item: &ListItem) -> io::Result<()> {
    match item {
        ListItem::Placeholder(text) => writeln!(writer, "  {text}"),
        ListItem::Match(entry) => {
            writeln!(writer, "  {}", entry.title)?;
            writeln!(writer, "    {}", entry.meta())
        }
        ListItem::Error { title, message } => {
            writeln!(writer, "  {title}")?;
            writeln!(writer, "    {message}")
        }
    }
}

fn meter_bar(fill: MeterFill) -> String {
    let filled = usize::from(fill.percent()) * METER_WIDTH / 100;
    format!("{}{}", "#".repeat(filled), "-".repeat(METER_WIDTH - filled))
}

/// Write one line per hit, or the empty placeholder.
pub(crate) fn render_search(writer: &mut dyn Write, hits: &[SearchHit]) -> io::Result<()> {
    if hits.is_empty() {
        return writeln!(writer, "{NO_MATCHES}");
    }
    for hit in hits {
        writeln!(
            writer,
            "{}  {}",
            hit.dish_name,
            format_score(hit.nutritional_score)
        )?;
    }
    Ok(())
}
