//! Drawing a generation history as a space-time diagram.
//!
//! Each generation becomes one row of the surface, oldest at the top. Live
//! cells are painted black on a white background.

use crate::history::GenerationHistory;

/// Glyphs used by [`render_text`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextPalette {
    pub alive: char,
    pub dead: char,
}

impl Default for TextPalette {
    fn default() -> Self {
        Self {
            alive: '█',
            dead: ' ',
        }
    }
}

impl TextPalette {
    /// ASCII-only palette, handy for logs and tests.
    pub fn ascii() -> Self {
        Self {
            alive: '#',
            dead: '.',
        }
    }
}

/// Render one line per generation.
pub fn render_text(history: &GenerationHistory, palette: TextPalette) -> String {
    let mut out = String::with_capacity(history.len() * (history.width() + 1));
    for generation in history.iter() {
        out.extend(generation.cells.iter().map(|cell| {
            if *cell == 1 {
                palette.alive
            } else {
                palette.dead
            }
        }));
        out.push('\n');
    }
    out
}

/// Render a plain (`P1`) portable bitmap, each cell `cell_px` pixels square.
pub fn render_pbm(history: &GenerationHistory, cell_px: usize) -> String {
    let cell_px = cell_px.max(1);
    let width = history.width() * cell_px;
    let height = history.len() * cell_px;

    let mut out = format!("P1\n# elementary cellular automaton\n{width} {height}\n");

    for generation in history.iter() {
        let mut line = String::with_capacity(width * 2);
        for cell in &generation.cells {
            for _ in 0..cell_px {
                line.push(if *cell == 1 { '1' } else { '0' });
                line.push(' ');
            }
        }
        let line = line.trim_end();
        for _ in 0..cell_px {
            out.push_str(line);
            out.push('\n');
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::Generation;

    fn sample() -> GenerationHistory {
        let mut history = GenerationHistory::unbounded();
        history.push(Generation {
            index: 0,
            cells: vec![0, 1, 0],
        });
        history.push(Generation {
            index: 1,
            cells: vec![1, 1, 1],
        });
        history
    }

    #[test]
    fn test_render_text() {
        let text = render_text(&sample(), TextPalette::ascii());
        assert_eq!(text, ".#.\n###\n");
    }

    #[test]
    fn test_render_pbm_header_and_scale() {
        let pbm = render_pbm(&sample(), 2);
        let lines: Vec<&str> = pbm.lines().collect();
        assert_eq!(lines[0], "P1");
        assert_eq!(lines[2], "6 4");
        assert_eq!(lines[3], "0 0 1 1 0 0");
        assert_eq!(lines[4], "0 0 1 1 0 0");
        assert_eq!(lines[5], "1 1 1 1 1 1");
        assert_eq!(lines.len(), 7);
    }

    #[test]
    fn test_render_empty_history() {
        let history = GenerationHistory::unbounded();
        assert_eq!(render_text(&history, TextPalette::default()), "");
        assert!(render_pbm(&history, 4).contains("0 0"));
    }
}
