//! Scene model for marker-anchored content.
//!
//! The browser original left this state implicit in the DOM; here it is
//! an explicit single attachment point plus the renderable entity under
//! it. The surrounding frontend (or a test) plays the role of the
//! rendering library: it dispatches `SceneEvent`s into the engine.

use crate::catalog::SiteRecord;

/// Primitive shape kinds for fallback entities.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Box,
    Sphere,
    Cylinder,
}

impl Shape {
    pub fn as_str(&self) -> &'static str {
        match self {
            Shape::Box => "box",
            Shape::Sphere => "sphere",
            Shape::Cylinder => "cylinder",
        }
    }
}

/// Easing function for an animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Easing {
    Linear,
}

/// A property animation attached to an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Animation {
    pub property: &'static str,
    pub to: &'static str,
    pub dur_ms: u32,
    pub looping: bool,
    pub easing: Easing,
}

/// Continuous 360° rotation over a fixed 20-second period. Every
/// attached entity, model or primitive, carries this animation.
pub const SPIN: Animation = Animation {
    property: "rotation",
    to: "0 360 0",
    dur_ms: 20_000,
    looping: true,
    easing: Easing::Linear,
};

/// What an entity renders as.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntityKind {
    /// A glTF model loaded from an asset path.
    Model { src: String },
    /// A procedurally described fallback shape.
    Primitive { shape: Shape, color: String },
}

/// A renderable scene node with transform, animation, and click behavior.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entity {
    /// The site this entity represents; clicks reopen its info panel.
    pub site_id: String,
    pub kind: EntityKind,
    pub scale: String,
    pub position: String,
    pub rotation: String,
    pub animation: Animation,
    pub clickable: bool,
}

impl Entity {
    /// Build the model entity for a site. Transform strings are passed
    /// through from the record unchanged.
    pub fn model(record: &SiteRecord) -> Self {
        Self {
            site_id: record.id.to_string(),
            kind: EntityKind::Model {
                src: record.model.path.to_string(),
            },
            scale: record.model.scale.to_string(),
            position: record.model.position.to_string(),
            rotation: record.model.rotation.to_string(),
            animation: SPIN,
            clickable: true,
        }
    }

    /// Build the primitive fallback entity for a site.
    pub fn primitive(record: &SiteRecord) -> Self {
        Self {
            site_id: record.id.to_string(),
            kind: EntityKind::Primitive {
                shape: record.primitive.shape,
                color: record.primitive.color.to_string(),
            },
            scale: record.primitive.scale.to_string(),
            position: record.primitive.position.to_string(),
            rotation: record.primitive.rotation.to_string(),
            animation: SPIN,
            clickable: true,
        }
    }

    pub fn is_model(&self) -> bool {
        matches!(self.kind, EntityKind::Model { .. })
    }

    pub fn is_primitive(&self) -> bool {
        matches!(self.kind, EntityKind::Primitive { .. })
    }
}

/// The tracking-marker attachment point.
///
/// At most one entity is attached at a time; attachment is replaced
/// wholesale on every change, never partially updated.
#[derive(Debug, Default)]
pub struct Marker {
    attachment: Option<Entity>,
}

impl Marker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the current attachment with a new entity, returning the
    /// entity that was detached, if any.
    pub fn attach(&mut self, entity: Entity) -> Option<Entity> {
        self.attachment.replace(entity)
    }

    /// Remove the current attachment.
    pub fn detach(&mut self) -> Option<Entity> {
        self.attachment.take()
    }

    pub fn attachment(&self) -> Option<&Entity> {
        self.attachment.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.attachment.is_none()
    }
}

/// Events the surrounding framework dispatches for the attached entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneEvent {
    /// The user tapped the attached entity.
    Click,
    /// The rendering library failed to load the attached entity's model.
    ModelError,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog;

    #[test]
    fn test_marker_single_attachment() {
        let record = catalog::get("tajmahal").unwrap();
        let mut marker = Marker::new();
        assert!(marker.is_empty());

        assert!(marker.attach(Entity::model(record)).is_none());
        assert!(!marker.is_empty());

        // Re-attaching replaces wholesale and hands back the old entity.
        let replaced = marker.attach(Entity::primitive(record));
        assert!(replaced.unwrap().is_model());
        assert!(marker.attachment().unwrap().is_primitive());
    }

    #[test]
    fn test_model_entity_passes_transform_through() {
        let record = catalog::get("konark").unwrap();
        let entity = Entity::model(record);

        assert_eq!(entity.scale, record.model.scale);
        assert_eq!(entity.position, record.model.position);
        assert_eq!(entity.rotation, record.model.rotation);
        assert_eq!(
            entity.kind,
            EntityKind::Model {
                src: "models/konark/scene.glb".to_string()
            }
        );
    }

    #[test]
    fn test_entities_spin() {
        let record = catalog::get("hampi").unwrap();
        for entity in [Entity::model(record), Entity::primitive(record)] {
            assert_eq!(entity.animation, SPIN);
            assert_eq!(entity.animation.dur_ms, 20_000);
            assert!(entity.animation.looping);
            assert!(entity.clickable);
        }
    }
}
