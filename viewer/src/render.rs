//! Plain-text rendering of the view models

use std::io::{self, Write};

use holocron_loader::view_model::{CatalogCard, DetailScreen, DetailView, FailureView};

/// Command that reopens the listing
const LIST_COMMAND: &str = "holocron list";

/// Route prefix of detail links produced by the cards
const DETAIL_ROUTE_PREFIX: &str = "/character/";

/// Width of the attribute label column
const LABEL_WIDTH: usize = 12;

pub fn render_screen(out: &mut impl Write, screen: &DetailScreen) -> io::Result<()> {
    match screen {
        DetailScreen::Blank => Ok(()),
        DetailScreen::Loading(message) => writeln!(out, "{message}"),
        DetailScreen::Failed(failure) => render_failure(out, failure),
        DetailScreen::Ready(view) => render_detail(out, view),
    }
}

pub fn render_failure(out: &mut impl Write, failure: &FailureView) -> io::Result<()> {
    writeln!(out, "Error: {}", failure.reason)?;
    writeln!(out, "{}", failure.hint)?;
    writeln!(out, "{}: {LIST_COMMAND}", failure.back_label)
}

fn render_detail(out: &mut impl Write, view: &DetailView) -> io::Result<()> {
    writeln!(out, "{}", view.title)?;
    writeln!(out)?;
    writeln!(out, "  [{}] {}", view.initial, view.name)?;
    writeln!(out, "  {}", view.films)?;
    writeln!(out)?;
    for attribute in &view.attributes {
        writeln!(out, "  {:<LABEL_WIDTH$} {}", attribute.label, attribute.value)?;
    }
    Ok(())
}

pub fn render_cards(out: &mut impl Write, cards: &[CatalogCard]) -> io::Result<()> {
    for card in cards {
        let marker = if card.highlight { '*' } else { ' ' };
        let open = card
            .link
            .as_deref()
            .and_then(|link| link.strip_prefix(DETAIL_ROUTE_PREFIX))
            .map(|id| format!("holocron show {id}"))
            .unwrap_or_default();

        writeln!(out, "{marker} [{}] {:<24} {open}", card.letter, card.name)?;
    }
    Ok(())
}
