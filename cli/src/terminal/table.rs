use colored::*;
use unicode_width::UnicodeWidthStr;

use crate::terminal::{colors, print};

/// Column-aligned rows. Cells are measured uncoloured and coloured per column on output.
pub struct Table {
    colors: Vec<Color>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(colors: Vec<Color>) -> Self {
        Self {
            colors,
            rows: Vec::new(),
        }
    }

    pub fn push(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn widths(&self) -> Vec<usize> {
        let mut widths: Vec<usize> = Vec::new();
        for row in &self.rows {
            for (idx, cell) in row.iter().enumerate() {
                let width = UnicodeWidthStr::width(cell.as_str());
                match widths.get_mut(idx) {
                    Some(current) => *current = (*current).max(width),
                    None => widths.push(width),
                }
            }
        }
        widths
    }

    /// Formats every row; the last column is not padded.
    pub fn lines(&self) -> Vec<String> {
        let widths = self.widths();
        self.rows
            .iter()
            .map(|row| {
                row.iter()
                    .enumerate()
                    .map(|(idx, cell)| {
                        let color = self.colors.get(idx).copied().unwrap_or(colors::TEXT_DEFAULT);
                        let padding = if idx + 1 == row.len() {
                            0
                        } else {
                            widths[idx].saturating_sub(UnicodeWidthStr::width(cell.as_str()))
                        };
                        format!("{}{}", cell.color(color), " ".repeat(padding))
                    })
                    .collect::<Vec<String>>()
                    .join("  ")
            })
            .collect()
    }

    pub fn print(&self) {
        for line in self.lines() {
            print::print(&line);
        }
    }
}
