//! Heading/body/children documentation trees.

/// One node of a documentation tree, rendered as Markdown.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Section {
    /// Heading text, without the `#` markers.
    pub heading: String,
    /// Body text under the heading.
    pub body: String,
    /// Subsections, one heading level deeper.
    pub children: Vec<Section>,
}

impl Section {
    /// A leaf section.
    pub fn new(heading: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            heading: heading.into(),
            body: body.into(),
            children: Vec::new(),
        }
    }

    /// Replace the children.
    pub fn with_children(mut self, children: Vec<Section>) -> Self {
        self.children = children;
        self
    }

    /// Append one child.
    pub fn child(mut self, child: Section) -> Self {
        self.children.push(child);
        self
    }

    /// Render with the root at heading level 1.
    pub fn render(&self) -> String {
        self.render_at(1)
    }

    /// Render with the root at the given heading level.
    pub fn render_at(&self, level: usize) -> String {
        let mut lines = Vec::with_capacity(2 + self.children.len());
        lines.push(format!("{} {}", "#".repeat(level), self.heading));
        lines.push(self.body.clone());
        lines.extend(self.children.iter().map(|c| c.render_at(level + 1)));
        lines.join("\n")
    }
}
