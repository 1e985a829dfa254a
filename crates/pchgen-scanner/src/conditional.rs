//! Conditional-compilation tracking
//!
//! The stack mirrors the `#if`/`#endif` nesting of the file being scanned.
//! Each block remembers the directive lines opened at its depth and the
//! aggregate indices of the includes recorded while it was innermost, so
//! every recorded include receives exactly one closing line per block
//! that was open when it was seen.

use pchgen_core::Aggregate;

/// Closing line synthesized when a block is still open at a body start
pub const SYNTHETIC_ENDIF: &str = "#endif";

#[derive(Debug, Default)]
struct Block {
    lines: Vec<String>,
    registered: Vec<usize>,
}

/// Stack of open conditional blocks for one file
#[derive(Debug, Default)]
pub struct ConditionalStack {
    blocks: Vec<Block>,
}

impl ConditionalStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Push a block for an opening directive
    pub fn open(&mut self, line: &str) {
        self.blocks.push(Block {
            lines: vec![line.to_string()],
            registered: Vec::new(),
        });
    }

    /// Append an else/elif line to the innermost block.
    ///
    /// Returns `false` when no block is open.
    pub fn branch(&mut self, line: &str) -> bool {
        match self.blocks.last_mut() {
            Some(block) => {
                block.lines.push(line.to_string());
                true
            }
            None => false,
        }
    }

    /// Close the innermost block with `line`.
    ///
    /// Includes registered in the block get `line` as a post-line and move
    /// to the enclosing block. Returns `false` when no block is open.
    pub fn close(&mut self, line: &str, aggregate: &mut Aggregate) -> bool {
        let Some(block) = self.blocks.pop() else {
            return false;
        };
        for &index in &block.registered {
            if let Some(record) = aggregate.get_mut(index) {
                record.post_lines.push(line.to_string());
            }
        }
        if let Some(parent) = self.blocks.last_mut() {
            parent.registered.extend(block.registered);
        }
        true
    }

    /// Close every open block with a synthesized `#endif`
    pub fn close_all(&mut self, aggregate: &mut Aggregate) {
        while self.close(SYNTHETIC_ENDIF, aggregate) {}
    }

    /// Register an aggregate index under the innermost block
    pub fn register(&mut self, index: usize) {
        if let Some(block) = self.blocks.last_mut() {
            block.registered.push(index);
        }
    }

    /// All open directive lines, outermost first
    pub fn guard_lines(&self) -> Vec<String> {
        self.blocks
            .iter()
            .flat_map(|block| block.lines.iter().cloned())
            .collect()
    }

    pub fn depth(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}
