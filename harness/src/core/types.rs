use serde::Serialize;

/// Output captured for a single fixture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    /// Fixture filename, used as the marker text.
    pub fixture: String,
    /// Lines produced by the collaborator, in order. Empty when it printed nothing.
    pub output: Vec<String>,
}

impl Block {
    pub fn new(fixture: impl Into<String>, output: Vec<String>) -> Self {
        Self {
            fixture: fixture.into(),
            output,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.output.is_empty()
    }
}

/// Ordered record of every block produced during one run.
///
/// Owned by the run for its whole duration and only ever appended to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunLog {
    blocks: Vec<Block>,
}

impl RunLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, block: Block) {
        self.blocks.push(block);
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

/// One marker line plus the report lines that follow it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReportGroup {
    /// Fixture names merged onto the marker line, in run order.
    pub fixtures: Vec<String>,
    /// Collaborator lines that passed the report filter.
    pub lines: Vec<String>,
}

/// Collapsed report for a whole run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Report {
    pub groups: Vec<ReportGroup>,
}

impl Report {
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}
