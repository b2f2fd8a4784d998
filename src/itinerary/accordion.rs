//! Accordion segmentation of an itinerary document
//!
//! The generated markup is a flat run of block elements. Every `<h4>` opens
//! a section that owns the blocks up to the next `<h4>` or the end of the
//! document. Anything before the first heading is a preamble that is always
//! shown.

use std::fmt::{self, Display};
use std::path::Path;

use scraper::{ElementRef, Html, Node};
use serde::Serialize;
use tracing::debug;

use super::ItineraryDocument;
use crate::{Result, TripScoutError};

/// Element that opens a new section
const SECTION_HEADING: &str = "h4";

/// One block of content (paragraph, sub-heading, list, ...)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Block {
    pub tag: String,
    /// Outer markup as rendered
    pub html: String,
    /// Whitespace-normalized text content
    pub text: String,
}

/// A collapsible section keyed by its heading
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Section {
    pub title: String,
    pub blocks: Vec<Block>,
}

impl Section {
    /// Day sections are titled "Day N: ..."
    #[must_use]
    pub fn is_day(&self) -> bool {
        self.title
            .strip_prefix("Day ")
            .and_then(|rest| rest.chars().next())
            .is_some_and(|c| c.is_ascii_digit())
    }
}

/// Sections of an itinerary with at most one expanded at a time
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Accordion {
    preamble: Vec<Block>,
    sections: Vec<Section>,
    expanded: Option<usize>,
}

impl Accordion {
    /// Segment a document into sections, all collapsed.
    pub fn parse(document: &ItineraryDocument) -> Self {
        let fragment = Html::parse_fragment(document.as_markup());
        let root = fragment.root_element();

        // headings may sit inside a wrapper element; segment the wrapper
        let container = root
            .descendants()
            .filter_map(ElementRef::wrap)
            .find(is_section_heading)
            .and_then(|heading| heading.parent())
            .and_then(ElementRef::wrap)
            .unwrap_or(root);

        let mut preamble = Vec::new();
        let mut sections: Vec<Section> = Vec::new();

        for child in container.children() {
            let block = match ElementRef::wrap(child) {
                Some(element) if is_section_heading(&element) => {
                    sections.push(Section {
                        title: normalized_text(element),
                        blocks: Vec::new(),
                    });
                    continue;
                }
                Some(element) => Block {
                    tag: element.value().name().to_string(),
                    html: element.html(),
                    text: normalized_text(element),
                },
                None => match child.value() {
                    Node::Text(text) if !text.trim().is_empty() => {
                        let text = collapse_whitespace(text);
                        Block {
                            tag: "text".to_string(),
                            html: escape_text(&text),
                            text,
                        }
                    }
                    _ => continue,
                },
            };

            match sections.last_mut() {
                Some(section) => section.blocks.push(block),
                None => preamble.push(block),
            }
        }

        debug!(
            "Segmented itinerary into {} sections ({} preamble blocks)",
            sections.len(),
            preamble.len()
        );

        Self {
            preamble,
            sections,
            expanded: None,
        }
    }

    #[must_use]
    pub fn preamble(&self) -> &[Block] {
        &self.preamble
    }

    #[must_use]
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// Number of `Day N` sections, excluding trailing tips
    #[must_use]
    pub fn day_count(&self) -> usize {
        self.sections.iter().filter(|s| s.is_day()).count()
    }

    /// Index of the expanded section, if any
    #[must_use]
    pub fn expanded(&self) -> Option<usize> {
        self.expanded
    }

    #[must_use]
    pub fn is_expanded(&self, index: usize) -> bool {
        self.expanded == Some(index)
    }

    /// Toggle one section. Expanding it collapses every other section;
    /// toggling the expanded section collapses it. Returns the new state of
    /// the toggled section.
    pub fn toggle(&mut self, index: usize) -> Result<bool> {
        if index >= self.sections.len() {
            return Err(TripScoutError::validation(format!(
                "Section {index} does not exist ({} sections)",
                self.sections.len()
            )));
        }

        if self.expanded == Some(index) {
            self.expanded = None;
            Ok(false)
        } else {
            self.expanded = Some(index);
            Ok(true)
        }
    }

    /// Plain text of the whole itinerary, as copied to the clipboard
    #[must_use]
    pub fn plain_text(&self) -> String {
        let mut paragraphs: Vec<String> = self.preamble.iter().map(|b| b.text.clone()).collect();
        for section in &self.sections {
            let mut lines = vec![section.title.clone()];
            lines.extend(section.blocks.iter().map(|b| b.text.clone()));
            paragraphs.push(lines.join("\n"));
        }
        paragraphs.join("\n\n")
    }

    /// Save the plain text, the terminal counterpart of the copy action
    pub fn write_plain_text(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.plain_text())?;
        Ok(())
    }
}

fn is_section_heading(element: &ElementRef<'_>) -> bool {
    element.value().name() == SECTION_HEADING
}

fn normalized_text(element: ElementRef<'_>) -> String {
    collapse_whitespace(&element.text().collect::<String>())
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

impl Display for Accordion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for block in &self.preamble {
            writeln!(f, "{}", block.text)?;
        }
        for (index, section) in self.sections.iter().enumerate() {
            if self.is_expanded(index) {
                writeln!(f, "▾ {}", section.title)?;
                for block in &section.blocks {
                    writeln!(f, "    {}", block.text)?;
                }
            } else {
                writeln!(f, "▸ {}", section.title)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const THREE_DAYS: &str = "\
<h4>Day 1: Arrival and Old Town</h4>
<h5>Morning</h5><p>Check in and stroll the <b>harbour</b>.</p>
<h5>Afternoon</h5><p>Walk the city walls.</p>
<h5>Evening</h5><p>Seafood by the water.</p>
<h4>Day 2: Islands</h4>
<h5>Morning</h5><p>Ferry to Lokrum.</p>
<h5>Afternoon</h5><p>Swim.</p>
<h5>Evening</h5><p>Sunset bar.</p>
<h4>Day 3: Departure</h4>
<h5>Morning</h5><p>Market breakfast.</p>
<h5>Afternoon</h5><p>Cable car.</p>
<h5>Evening</h5><p>Fly home.</p>";

    fn accordion(markup: &str) -> Accordion {
        Accordion::parse(&ItineraryDocument::new(markup))
    }

    #[test]
    fn test_sections_follow_headings() {
        let accordion = accordion(THREE_DAYS);
        let titles: Vec<&str> = accordion.sections().iter().map(|s| s.title.as_str()).collect();
        assert_eq!(
            titles,
            vec!["Day 1: Arrival and Old Town", "Day 2: Islands", "Day 3: Departure"]
        );
        assert!(accordion.sections().iter().all(Section::is_day));
        assert!(accordion.sections().iter().all(|s| s.blocks.len() == 6));
        assert_eq!(accordion.sections()[0].blocks[1].tag, "p");
        assert_eq!(
            accordion.sections()[0].blocks[1].text,
            "Check in and stroll the harbour."
        );
        assert!(accordion.preamble().is_empty());
    }

    #[test]
    fn test_all_sections_start_collapsed() {
        let accordion = accordion(THREE_DAYS);
        assert_eq!(accordion.expanded(), None);
        assert!((0..3).all(|i| !accordion.is_expanded(i)));
    }

    #[test]
    fn test_at_most_one_section_expanded() {
        let mut accordion = accordion(THREE_DAYS);

        assert!(accordion.toggle(0).unwrap());
        assert_eq!(accordion.expanded(), Some(0));

        // expanding another collapses the previous one
        assert!(accordion.toggle(2).unwrap());
        assert_eq!(accordion.expanded(), Some(2));
        assert!(!accordion.is_expanded(0));

        // toggling the expanded one leaves zero expanded
        assert!(!accordion.toggle(2).unwrap());
        assert_eq!(accordion.expanded(), None);
    }

    #[test]
    fn test_toggle_out_of_range() {
        let mut accordion = accordion(THREE_DAYS);
        assert!(accordion.toggle(3).is_err());
        assert_eq!(accordion.expanded(), None);
    }

    #[test]
    fn test_good_to_know_is_its_own_section() {
        let markup = format!(
            "{THREE_DAYS}\n<h4>Good to Know</h4><p>Currency: euro.</p><p>Hvala = thank you.</p>"
        );
        let accordion = accordion(&markup);
        assert_eq!(accordion.sections().len(), 4);
        let last = &accordion.sections()[3];
        assert_eq!(last.title, "Good to Know");
        assert!(!last.is_day());
        assert_eq!(last.blocks.len(), 2);
        assert_eq!(accordion.day_count(), 3);
    }

    #[test]
    fn test_preamble_and_wrapper() {
        let markup = "<div class=\"itinerary\"><p>Welcome!</p><h4>Day 1: Start</h4><p>Go.</p></div>";
        let accordion = accordion(markup);
        assert_eq!(accordion.preamble().len(), 1);
        assert_eq!(accordion.preamble()[0].text, "Welcome!");
        assert_eq!(accordion.sections().len(), 1);
        assert_eq!(accordion.sections()[0].blocks[0].text, "Go.");
    }

    #[test]
    fn test_document_without_headings() {
        let accordion = accordion("<p>Just text</p> loose words ");
        assert!(accordion.sections().is_empty());
        assert_eq!(accordion.preamble().len(), 2);
        assert_eq!(accordion.preamble()[1].tag, "text");
        assert_eq!(accordion.preamble()[1].text, "loose words");
    }

    #[test]
    fn test_plain_text() {
        let accordion = accordion("<h4>Day 1: A</h4><h5>Morning</h5><p>Coffee.</p><h4>Day 2: B</h4><p>Tea.</p>");
        assert_eq!(
            accordion.plain_text(),
            "Day 1: A\nMorning\nCoffee.\n\nDay 2: B\nTea."
        );
    }

    #[test]
    fn test_write_plain_text() {
        let accordion = accordion("<h4>Day 1: A</h4><p>Coffee.</p>");
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("itinerary.txt");
        accordion.write_plain_text(&path).unwrap();
        assert_eq!(std::fs::read_to_string(path).unwrap(), "Day 1: A\nCoffee.");
    }

    #[test]
    fn test_terminal_rendering_shows_only_expanded_content() {
        let mut accordion = accordion(THREE_DAYS);
        accordion.toggle(1).unwrap();
        let rendered = accordion.to_string();
        assert!(rendered.contains("▸ Day 1: Arrival and Old Town"));
        assert!(rendered.contains("▾ Day 2: Islands"));
        assert!(rendered.contains("Ferry to Lokrum."));
        assert!(!rendered.contains("Walk the city walls."));
    }
}
