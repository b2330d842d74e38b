//! Tree-sitter backed PHP structure lookup.
//!
//! Each query parses the current buffer text from scratch. Buffers handed to
//! the comment actions are single source files and a query runs once per user
//! invocation, so there is no incremental tree to keep in sync with edits.

use crate::{CommentToken, NodeRange, StructureLookup, SyntaxError};
use core_text::Buffer;
use tracing::{debug, trace};
use tree_sitter::{Language, Node, Parser, Tree};

/// Node kinds treated as "function or method definition".
const FUNCTION_NODE_KINDS: &[&str] = &["function_definition", "method_declaration"];
const COMMENT_NODE_KIND: &str = "comment";

/// Which PHP grammar a buffer is parsed with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhpDialect {
    /// A template file: text outside `<?php ... ?>` is inline HTML.
    Tagged,
    /// Pure code with no opening tag, e.g. a snippet or an editor selection.
    Bare,
}

impl PhpDialect {
    /// `Tagged` when the source starts with an open tag, or starts with markup
    /// that later opens a PHP block. Code that merely mentions `<?php` (say in a
    /// string literal) stays `Bare`.
    pub fn detect(source: &str) -> Self {
        let head = source.trim_start();
        let opens_with_tag = head.starts_with("<?php") || head.starts_with("<?=");
        let markup_with_tag =
            head.starts_with('<') && (source.contains("<?php") || source.contains("<?="));
        if opens_with_tag || markup_with_tag {
            PhpDialect::Tagged
        } else {
            PhpDialect::Bare
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            PhpDialect::Tagged => "php",
            PhpDialect::Bare => "php_only",
        }
    }
}

/// `StructureLookup` over PHP source using `tree-sitter-php`.
#[derive(Clone)]
pub struct PhpStructure {
    tagged: Language,
    bare: Language,
}

impl PhpStructure {
    /// Load both PHP grammars, failing if either is incompatible with the runtime.
    pub fn new() -> Result<Self, SyntaxError> {
        let tagged: Language = tree_sitter_php::LANGUAGE_PHP.into();
        let bare: Language = tree_sitter_php::LANGUAGE_PHP_ONLY.into();
        for (dialect, language) in [(PhpDialect::Tagged, &tagged), (PhpDialect::Bare, &bare)] {
            Parser::new()
                .set_language(language)
                .map_err(|source| SyntaxError::Language {
                    dialect: dialect.name(),
                    source,
                })?;
        }
        Ok(Self { tagged, bare })
    }

    fn language(&self, dialect: PhpDialect) -> &Language {
        match dialect {
            PhpDialect::Tagged => &self.tagged,
            PhpDialect::Bare => &self.bare,
        }
    }

    /// Parse `source` with the dialect it calls for.
    pub fn parse(&self, source: &str) -> Option<Tree> {
        let dialect = PhpDialect::detect(source);
        let mut parser = Parser::new();
        // Both languages were validated in `new`.
        parser.set_language(self.language(dialect)).ok()?;
        let tree = parser.parse(source, None);
        if tree.is_none() {
            debug!(target: "syntax.lookup", dialect = dialect.name(), "parse_failed");
        }
        tree
    }
}

impl StructureLookup for PhpStructure {
    fn enclosing_function(&self, buffer: &Buffer, offset: usize) -> Option<NodeRange> {
        if offset >= buffer.len_chars() {
            return None;
        }
        let tree = self.parse(&buffer.text())?;
        let byte = buffer.char_to_byte(offset);
        let mut node = tree.root_node().descendant_for_byte_range(byte, byte)?;
        loop {
            if FUNCTION_NODE_KINDS.contains(&node.kind()) {
                let range = char_range(buffer, &node);
                trace!(target: "syntax.lookup", kind = node.kind(), start = range.start, end = range.end, offset, "enclosing_function");
                return Some(range);
            }
            node = node.parent()?;
        }
    }

    fn enclosing_comment(&self, buffer: &Buffer, offset: usize) -> Option<CommentToken> {
        if offset >= buffer.len_chars() {
            return None;
        }
        let tree = self.parse(&buffer.text())?;
        let byte = buffer.char_to_byte(offset);
        let node = tree.root_node().descendant_for_byte_range(byte, byte)?;
        if node.kind() != COMMENT_NODE_KIND {
            return None;
        }
        let range = char_range(buffer, &node);
        trace!(target: "syntax.lookup", start = range.start, end = range.end, offset, "enclosing_comment");
        Some(CommentToken {
            range,
            text: buffer.slice(range.start, range.end),
        })
    }
}

fn char_range(buffer: &Buffer, node: &Node<'_>) -> NodeRange {
    NodeRange::new(
        buffer.byte_to_char(node.start_byte()),
        buffer.byte_to_char(node.end_byte()),
    )
}
