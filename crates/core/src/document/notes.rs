//! Lesson notes built from a lecture transcript.
//!
//! Transcript convention: `#` lines are headings, `- ` / `* ` lines are
//! bullets, any other non-empty line is a paragraph.

use crate::document::wrap_words;

pub const PAGE_WIDTH: usize = 80;
pub const LINES_PER_PAGE: usize = 50;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoteBlock {
    Heading(String),
    Bullet(String),
    Paragraph(String),
}

impl NoteBlock {
    pub fn text(&self) -> &str {
        match self {
            NoteBlock::Heading(t) | NoteBlock::Bullet(t) | NoteBlock::Paragraph(t) => t,
        }
    }
}

/// Removes `**`, `__`, `*` and word-edge `_` emphasis markers.
pub fn strip_emphasis(text: &str) -> String {
    let text = text.replace("**", "").replace("__", "");
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    for (i, &c) in chars.iter().enumerate() {
        match c {
            '*' => continue,
            '_' => {
                let before = i.checked_sub(1).map(|j| chars[j]);
                let after = chars.get(i + 1).copied();
                let inside_word = before.is_some_and(char::is_alphanumeric)
                    && after.is_some_and(char::is_alphanumeric);
                if inside_word {
                    out.push(c);
                }
            }
            _ => out.push(c),
        }
    }
    out
}

pub fn parse(transcript: &str) -> Vec<NoteBlock> {
    transcript
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter_map(|line| {
            let block = if line.starts_with('#') {
                NoteBlock::Heading(strip_emphasis(line.trim_start_matches('#').trim()))
            } else if let Some(rest) = line.strip_prefix("- ").or_else(|| line.strip_prefix("* ")) {
                NoteBlock::Bullet(strip_emphasis(rest.trim()))
            } else {
                NoteBlock::Paragraph(strip_emphasis(line))
            };
            (!block.text().is_empty()).then_some(block)
        })
        .collect()
}

/// Transcript text without markup, one block per line. Used as TTS input.
pub fn plain_text(transcript: &str) -> String {
    parse(transcript)
        .iter()
        .map(NoteBlock::text)
        .collect::<Vec<_>>()
        .join("\n")
}

fn block_lines(block: &NoteBlock, width: usize) -> Vec<String> {
    match block {
        NoteBlock::Heading(text) => {
            let mut lines = wrap_words(text, width);
            let underline = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0);
            lines.push("-".repeat(underline));
            lines
        }
        NoteBlock::Bullet(text) => wrap_words(text, width.saturating_sub(4).max(1))
            .into_iter()
            .enumerate()
            .map(|(i, line)| {
                if i == 0 {
                    format!("  * {line}")
                } else {
                    format!("    {line}")
                }
            })
            .collect(),
        NoteBlock::Paragraph(text) => wrap_words(text, width),
    }
}

/// Wraps blocks to `width` characters and splits them into pages of at most
/// `lines_per_page` lines. A block is moved to the next page rather than
/// split, unless it is longer than a page by itself.
pub fn layout(blocks: &[NoteBlock], width: usize, lines_per_page: usize) -> Vec<Vec<String>> {
    let lines_per_page = lines_per_page.max(1);
    let mut pages: Vec<Vec<String>> = Vec::new();
    let mut page: Vec<String> = Vec::new();

    for (i, block) in blocks.iter().enumerate() {
        let lines = block_lines(block, width);
        let spaced = i > 0 && !matches!(block, NoteBlock::Bullet(_));

        let needed = lines.len() + usize::from(spaced && !page.is_empty());
        if !page.is_empty() && page.len() + needed > lines_per_page && lines.len() <= lines_per_page
        {
            pages.push(std::mem::take(&mut page));
        }
        if spaced && !page.is_empty() && page.len() < lines_per_page {
            page.push(String::new());
        }
        for line in lines {
            if page.len() == lines_per_page {
                pages.push(std::mem::take(&mut page));
            }
            page.push(line);
        }
    }
    if !page.is_empty() {
        pages.push(page);
    }
    pages
}

/// Paginated plain-text notes: title header on every page, a page footer,
/// and a form feed between pages.
pub fn render_text(title: &str, transcript: &str) -> String {
    let body_lines = LINES_PER_PAGE.saturating_sub(4);
    let pages = layout(&parse(transcript), PAGE_WIDTH, body_lines);
    let total = pages.len().max(1);

    let mut output = String::new();
    for (index, page) in pages.iter().enumerate() {
        if index > 0 {
            output.push('\u{c}');
        }
        output.push_str(&format!("{title}\n\n"));
        for line in page {
            output.push_str(line);
            output.push('\n');
        }
        let footer = format!("Page {} of {}", index + 1, total);
        output.push_str(&format!("\n{footer:>width$}\n", width = PAGE_WIDTH));
    }
    if pages.is_empty() {
        output.push_str(&format!("{title}\n"));
    }
    output
}
