//! Info panel controller.

use crate::catalog::SiteRecord;

/// The dismissible overlay that shows a site's metadata.
///
/// The only state is current visibility plus the rendered text; `show`
/// and `hide` are idempotent.
#[derive(Debug, Default)]
pub struct InfoPanel {
    visible: bool,
    title: String,
    lines: Vec<String>,
}

impl InfoPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Populate the panel from a site record and make it visible.
    pub fn show(&mut self, record: &SiteRecord) {
        self.title = record.name.to_string();
        self.lines = vec![
            format!("Location: {}", record.location),
            format!("Built: {}", record.built),
            format!("Architect: {}", record.architect),
            format!("UNESCO: {}", record.unesco),
            String::new(),
            record.description.to_string(),
        ];
        self.visible = true;
    }

    /// Make the panel invisible. Contents are kept for the next `show`.
    pub fn hide(&mut self) {
        self.visible = false;
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }
}
