//! Model loader and fallback state machine.
//!
//! Attachment states: `Empty` → `ModelAttached` → (`ModelError` →
//! `PrimitiveAttached`) | remains `ModelAttached`. The fallback
//! transition is one-shot per attachment; the original model is never
//! retried.
//!
//! None of the error paths propagate: an unknown site id or a missing
//! marker is logged and leaves all state untouched.

use crate::catalog::{self, SiteRecord};
use crate::panel::InfoPanel;
use crate::scene::{Entity, Marker, SceneEvent};

/// What is currently attached under the marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AttachmentState {
    #[default]
    Empty,
    ModelAttached,
    PrimitiveAttached,
}

/// Drives the marker attachment for the selected site.
#[derive(Debug, Default)]
pub struct ModelLoader {
    marker: Option<Marker>,
    state: AttachmentState,
    current_site: Option<&'static SiteRecord>,
}

impl ModelLoader {
    /// Create a loader with a tracking marker present.
    pub fn new() -> Self {
        Self {
            marker: Some(Marker::new()),
            state: AttachmentState::Empty,
            current_site: None,
        }
    }

    /// Create a loader whose page has no tracking marker. Every
    /// selection is then a logged no-op.
    pub fn without_marker() -> Self {
        Self {
            marker: None,
            state: AttachmentState::Empty,
            current_site: None,
        }
    }

    /// Select a site: replace any existing attachment with its model
    /// entity and show the info panel.
    ///
    /// The panel is shown synchronously with attachment, not deferred
    /// until load completion, so it displays even if the model later
    /// fails and falls back.
    pub fn select_site(&mut self, id: &str, panel: &mut InfoPanel) {
        let Some(record) = catalog::get(id) else {
            tracing::warn!(site = id, "unknown site id, ignoring selection");
            return;
        };
        let Some(marker) = self.marker.as_mut() else {
            tracing::warn!(site = id, "tracking marker not found, ignoring selection");
            return;
        };

        marker.detach();
        marker.attach(Entity::model(record));
        self.state = AttachmentState::ModelAttached;
        self.current_site = Some(record);

        panel.show(record);
        tracing::info!(site = record.id, path = record.model.path, "model attached");
    }

    /// Handle an event dispatched for the attached entity.
    pub fn handle_event(&mut self, event: SceneEvent, panel: &mut InfoPanel) {
        match event {
            SceneEvent::ModelError => self.on_model_error(),
            SceneEvent::Click => self.on_click(panel),
        }
    }

    /// Swap the failed model for the site's primitive fallback. Ignored
    /// unless a model is currently attached.
    fn on_model_error(&mut self) {
        if self.state != AttachmentState::ModelAttached {
            tracing::debug!(state = ?self.state, "ignoring model-error outside ModelAttached");
            return;
        }
        // ModelAttached implies a marker and a current site.
        let (Some(marker), Some(record)) = (self.marker.as_mut(), self.current_site) else {
            return;
        };

        tracing::warn!(
            site = record.id,
            color = record.primitive.color,
            "model load failed, falling back to primitive shape"
        );
        marker.detach();
        marker.attach(Entity::primitive(record));
        self.state = AttachmentState::PrimitiveAttached;
    }

    /// A tap on the attached entity reopens the info panel for its site.
    fn on_click(&mut self, panel: &mut InfoPanel) {
        match self.current_site {
            Some(record) if self.state != AttachmentState::Empty => panel.show(record),
            _ => tracing::debug!("click with nothing attached"),
        }
    }

    pub fn state(&self) -> AttachmentState {
        self.state
    }

    /// The record for the currently attached site, if any.
    pub fn current_site(&self) -> Option<&'static SiteRecord> {
        self.current_site
    }

    /// The entity currently attached under the marker, if any.
    pub fn attachment(&self) -> Option<&Entity> {
        self.marker.as_ref().and_then(|m| m.attachment())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::EntityKind;

    #[test]
    fn test_select_attaches_model_and_shows_panel() {
        let mut loader = ModelLoader::new();
        let mut panel = InfoPanel::new();

        loader.select_site("tajmahal", &mut panel);

        assert_eq!(loader.state(), AttachmentState::ModelAttached);
        let entity = loader.attachment().unwrap();
        assert!(entity.is_model());
        assert_eq!(entity.site_id, "tajmahal");
        assert!(panel.is_visible());
        assert_eq!(panel.title(), "Taj Mahal");
    }

    #[test]
    fn test_reselect_replaces_wholesale() {
        let mut loader = ModelLoader::new();
        let mut panel = InfoPanel::new();

        loader.select_site("tajmahal", &mut panel);
        loader.select_site("konark", &mut panel);

        assert_eq!(loader.state(), AttachmentState::ModelAttached);
        assert_eq!(loader.attachment().unwrap().site_id, "konark");
        assert_eq!(panel.title(), "Konark Sun Temple");
    }

    #[test]
    fn test_unknown_site_is_a_noop() {
        let mut loader = ModelLoader::new();
        let mut panel = InfoPanel::new();

        loader.select_site("hampi", &mut panel);
        panel.hide();

        loader.select_site("shangrila", &mut panel);

        assert_eq!(loader.attachment().unwrap().site_id, "hampi");
        assert!(!panel.is_visible());
    }

    #[test]
    fn test_missing_marker_is_a_noop() {
        let mut loader = ModelLoader::without_marker();
        let mut panel = InfoPanel::new();

        loader.select_site("tajmahal", &mut panel);

        assert_eq!(loader.state(), AttachmentState::Empty);
        assert!(loader.attachment().is_none());
        assert!(!panel.is_visible());
    }

    #[test]
    fn test_model_error_falls_back_to_primitive() {
        let mut loader = ModelLoader::new();
        let mut panel = InfoPanel::new();

        loader.select_site("khajuraho", &mut panel);
        loader.handle_event(SceneEvent::ModelError, &mut panel);

        assert_eq!(loader.state(), AttachmentState::PrimitiveAttached);
        let entity = loader.attachment().unwrap();
        match &entity.kind {
            EntityKind::Primitive { color, .. } => assert_eq!(color, "#8b4513"),
            other => panic!("expected primitive fallback, got {other:?}"),
        }
        assert!(entity.clickable);
    }

    #[test]
    fn test_fallback_is_one_shot() {
        let mut loader = ModelLoader::new();
        let mut panel = InfoPanel::new();

        loader.select_site("khajuraho", &mut panel);
        loader.handle_event(SceneEvent::ModelError, &mut panel);
        // A second error for the same attachment must not change anything.
        loader.handle_event(SceneEvent::ModelError, &mut panel);

        assert_eq!(loader.state(), AttachmentState::PrimitiveAttached);
        assert!(loader.attachment().unwrap().is_primitive());
    }

    #[test]
    fn test_click_reopens_panel_after_fallback() {
        let mut loader = ModelLoader::new();
        let mut panel = InfoPanel::new();

        loader.select_site("khajuraho", &mut panel);
        loader.handle_event(SceneEvent::ModelError, &mut panel);
        panel.hide();

        loader.handle_event(SceneEvent::Click, &mut panel);

        assert!(panel.is_visible());
        assert_eq!(panel.title(), "Khajuraho Group of Monuments");
    }

    #[test]
    fn test_events_with_nothing_attached_are_ignored() {
        let mut loader = ModelLoader::new();
        let mut panel = InfoPanel::new();

        loader.handle_event(SceneEvent::ModelError, &mut panel);
        loader.handle_event(SceneEvent::Click, &mut panel);

        assert_eq!(loader.state(), AttachmentState::Empty);
        assert!(!panel.is_visible());
    }
}
