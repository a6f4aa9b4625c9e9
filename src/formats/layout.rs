//! Greeked page layout: every word becomes a box sized after its length.

/// Horizontal advance of one character, in pixels.
pub const CHAR_WIDTH: u32 = 7;
pub const LINE_HEIGHT: u32 = 18;
/// Height of a word bar inside its line.
pub const WORD_HEIGHT: u32 = 10;
pub const MARGIN: u32 = 24;
/// Tallest page produced; text beyond it is dropped.
pub const MAX_HEIGHT: u32 = 8192;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WordBox {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageLayout {
    pub width: u32,
    pub height: u32,
    pub boxes: Vec<WordBox>,
}

/// Lay `text` out on a page `width` pixels wide.
///
/// Lines wrap on word boundaries; newlines start a new line. The page is
/// at least one line tall.
pub fn layout(text: &str, width: u32) -> PageLayout {
    let usable = width.saturating_sub(2 * MARGIN).max(CHAR_WIDTH);
    let max_lines = (MAX_HEIGHT - 2 * MARGIN) / LINE_HEIGHT;

    let mut boxes = Vec::new();
    let mut line = 0u32;
    let mut x = 0u32;

    'lines: for source_line in text.split('\n') {
        for word in source_line.split_whitespace() {
            let word_width = (word.chars().count() as u32 * CHAR_WIDTH).min(usable);
            if x > 0 && x + CHAR_WIDTH + word_width > usable {
                line += 1;
                x = 0;
            }
            if line >= max_lines {
                break 'lines;
            }
            if x > 0 {
                x += CHAR_WIDTH;
            }
            boxes.push(WordBox {
                x: MARGIN + x,
                y: MARGIN + line * LINE_HEIGHT + (LINE_HEIGHT - WORD_HEIGHT) / 2,
                width: word_width,
                height: WORD_HEIGHT,
            });
            x += word_width;
        }
        line += 1;
        x = 0;
    }

    let lines = line.clamp(1, max_lines);
    PageLayout {
        width,
        height: 2 * MARGIN + lines * LINE_HEIGHT,
        boxes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boxes_stay_inside_page() {
        let text = "lorem ipsum dolor sit amet consectetur adipiscing elit ".repeat(40);
        let page = layout(&text, 400);
        assert!(!page.boxes.is_empty());
        for b in &page.boxes {
            assert!(b.x + b.width <= page.width - MARGIN, "{:?}", b);
            assert!(b.y + b.height <= page.height - MARGIN, "{:?}", b);
        }
    }

    #[test]
    fn test_newlines_start_new_lines() {
        let page = layout("one\ntwo", 400);
        assert_eq!(page.boxes.len(), 2);
        assert!(page.boxes[1].y > page.boxes[0].y);
        assert_eq!(page.boxes[1].x, MARGIN);
    }

    #[test]
    fn test_empty_text_is_one_line() {
        let page = layout("", 300);
        assert!(page.boxes.is_empty());
        assert_eq!(page.height, 2 * MARGIN + LINE_HEIGHT);
    }

    #[test]
    fn test_height_is_capped() {
        let page = layout(&"word\n".repeat(10_000), 300);
        assert!(page.height <= MAX_HEIGHT);
    }
}
