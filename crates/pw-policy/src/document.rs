// document.rs - The structured document tree handed to renderers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::catalog::Topic;

pub const DOCUMENT_TITLE: &str = "Acceptable Use Policy";
pub const POLICY_TYPE: &str = "acceptable_use";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    pub title: String,
    pub organization: String,
    pub policy_type: String,
    pub layout_version: String,
    /// Long-form date printed in the document, e.g. "March 4, 2025".
    pub effective_date: String,
    pub generated_at: DateTime<Utc>,
    /// Role responsible for maintaining the policy.
    pub owner: String,
}

/// A clause after token substitution. Never mutated once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedClause {
    pub topic: Topic,
    pub variant: String,
    pub heading: String,
    pub text: String,
}

/// Rendering unit inside a clause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Paragraph(String),
    Bullet(String),
}

impl ResolvedClause {
    /// Splits the text into paragraphs and bullet items.
    ///
    /// Blank lines separate paragraphs. Within a paragraph, lines starting
    /// with "- " become bullets and other consecutive lines are joined with
    /// a space.
    pub fn blocks(&self) -> Vec<Block> {
        let mut blocks = Vec::new();
        for chunk in self.text.split("\n\n") {
            let mut pending: Vec<&str> = Vec::new();
            for line in chunk.lines().map(str::trim).filter(|l| !l.is_empty()) {
                if let Some(item) = line.strip_prefix("- ") {
                    if !pending.is_empty() {
                        blocks.push(Block::Paragraph(pending.join(" ")));
                        pending.clear();
                    }
                    blocks.push(Block::Bullet(item.trim().to_string()));
                } else {
                    pending.push(line);
                }
            }
            if !pending.is_empty() {
                blocks.push(Block::Paragraph(pending.join(" ")));
            }
        }
        blocks
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    /// 1-based position in the document.
    pub number: u32,
    pub heading: String,
    pub clauses: Vec<ResolvedClause>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentTree {
    pub metadata: DocumentMetadata,
    pub sections: Vec<Section>,
}

impl DocumentTree {
    pub fn clauses(&self) -> impl Iterator<Item = &ResolvedClause> {
        self.sections.iter().flat_map(|s| s.clauses.iter())
    }

    pub fn clause(&self, topic: Topic) -> Option<&ResolvedClause> {
        self.clauses().find(|c| c.topic == topic)
    }

    pub fn clause_count(&self) -> usize {
        self.sections.iter().map(|s| s.clauses.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clause(text: &str) -> ResolvedClause {
        ResolvedClause {
            topic: Topic::AcceptableUse,
            variant: "v".into(),
            heading: "h".into(),
            text: text.into(),
        }
    }

    #[test]
    fn blocks_split_paragraphs_and_bullets() {
        let c = clause("First paragraph.\n\nUsers must not:\n- do a\n- do b\n\nLast.");
        assert_eq!(
            c.blocks(),
            vec![
                Block::Paragraph("First paragraph.".into()),
                Block::Paragraph("Users must not:".into()),
                Block::Bullet("do a".into()),
                Block::Bullet("do b".into()),
                Block::Paragraph("Last.".into()),
            ]
        );
    }

    #[test]
    fn wrapped_lines_join_into_one_paragraph() {
        let c = clause("one\ntwo");
        assert_eq!(c.blocks(), vec![Block::Paragraph("one two".into())]);
    }

    #[test]
    fn empty_text_has_no_blocks() {
        assert!(clause("").blocks().is_empty());
    }
}
