//! Counters for sections, appendices, figures, tables and references.

use crate::model::{to_letters, Part};

/// Numbering state threaded left to right through one document.
///
/// Section numbers continue across parts; figure, table and reference
/// counters restart whenever a new part begins.
#[derive(Debug, Clone, Default)]
pub struct NumberingContext {
    sections: Vec<u32>,
    appendices: Vec<u32>,
    figures: u32,
    tables: u32,
    references: u32,
}

impl NumberingContext {
    /// Fresh counters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset the per-part counters.
    pub fn enter_part(&mut self, part: Part) {
        self.figures = 0;
        self.tables = 0;
        self.references = 0;
        if part == Part::Back {
            self.appendices.clear();
        }
    }

    /// Next dotted section number at `level` (1-based): "1", "1.1", "2".
    pub fn next_section(&mut self, level: u32) -> String {
        advance(&mut self.sections, level);
        join(&self.sections)
    }

    /// Next appendix number at `level`: "A", "A.1", "B".
    pub fn next_appendix(&mut self, level: u32) -> String {
        advance(&mut self.appendices, level);
        let mut parts = self.appendices.iter();
        let mut out = parts
            .next()
            .map(|first| to_letters(*first).to_uppercase())
            .unwrap_or_default();
        for n in parts {
            out.push('.');
            out.push_str(&n.to_string());
        }
        out
    }

    pub fn next_figure(&mut self) -> u32 {
        self.figures += 1;
        self.figures
    }

    pub fn next_table(&mut self) -> u32 {
        self.tables += 1;
        self.tables
    }

    pub fn next_reference(&mut self) -> u32 {
        self.references += 1;
        self.references
    }
}

/// Truncate to `level` components, pad with zeros, then count up the last.
fn advance(counters: &mut Vec<u32>, level: u32) {
    let level = level.max(1) as usize;
    counters.truncate(level);
    counters.resize(level, 0);
    if let Some(last) = counters.last_mut() {
        *last += 1;
    }
}

fn join(counters: &[u32]) -> String {
    counters
        .iter()
        .map(u32::to_string)
        .collect::<Vec<_>>()
        .join(".")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_section_paths() {
        let mut ctx = NumberingContext::new();
        let numbers: Vec<String> = [1, 2, 3, 2, 1, 2]
            .into_iter()
            .map(|level| ctx.next_section(level))
            .collect();
        assert_eq!(numbers, vec!["1", "1.1", "1.1.1", "1.2", "2", "2.1"]);
    }

    #[test]
    fn test_appendix_paths() {
        let mut ctx = NumberingContext::new();
        ctx.enter_part(Part::Back);
        assert_eq!(ctx.next_appendix(1), "A");
        assert_eq!(ctx.next_appendix(2), "A.1");
        assert_eq!(ctx.next_appendix(2), "A.2");
        assert_eq!(ctx.next_appendix(1), "B");
    }

    #[test]
    fn test_part_resets_floats_not_sections() {
        let mut ctx = NumberingContext::new();
        ctx.enter_part(Part::Middle);
        ctx.next_section(1);
        assert_eq!(ctx.next_figure(), 1);
        assert_eq!(ctx.next_figure(), 2);
        assert_eq!(ctx.next_table(), 1);

        ctx.enter_part(Part::Back);
        assert_eq!(ctx.next_figure(), 1);
        assert_eq!(ctx.next_table(), 1);
        assert_eq!(ctx.next_section(1), "2");
    }
}
