//! Static catalog of heritage sites.
//!
//! Site records are read-only, defined at load time, and never mutated.
//! Transform strings (scale, rotation, position) are whitespace-separated
//! 3-component vectors passed through unchanged to entity attributes.

use std::collections::HashMap;

use crate::scene::Shape;

/// Reference to a site's 3D asset and its placement under the marker.
#[derive(Debug, Clone, Copy)]
pub struct ModelRef {
    /// Relative path to the binary glTF asset.
    pub path: &'static str,
    pub scale: &'static str,
    pub rotation: &'static str,
    pub position: &'static str,
}

/// Procedurally described fallback shape for when the asset fails to load.
#[derive(Debug, Clone, Copy)]
pub struct PrimitiveSpec {
    pub shape: Shape,
    /// Hex color string, e.g. `#8b4513`.
    pub color: &'static str,
    pub scale: &'static str,
    pub rotation: &'static str,
    pub position: &'static str,
}

/// Descriptive metadata and renderable representations for one site.
#[derive(Debug, Clone, Copy)]
pub struct SiteRecord {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub location: &'static str,
    pub built: &'static str,
    pub architect: &'static str,
    /// Year of UNESCO World Heritage designation.
    pub unesco: &'static str,
    pub model: ModelRef,
    pub primitive: PrimitiveSpec,
}

static SITES: [SiteRecord; 4] = [
    SiteRecord {
        id: "tajmahal",
        name: "Taj Mahal",
        description: "An ivory-white marble mausoleum on the right bank of the Yamuna river \
            in the Indian city of Agra. It was commissioned in 1632 by the Mughal emperor \
            Shah Jahan to house the tomb of his favorite wife, Mumtaz Mahal.",
        location: "Agra, Uttar Pradesh",
        built: "1632-1653",
        architect: "Ustad Ahmad Lahauri",
        unesco: "1983",
        model: ModelRef {
            path: "models/tajmahal/scene.glb",
            scale: "0.5 0.5 0.5",
            rotation: "0 0 0",
            position: "0 0.5 0",
        },
        primitive: PrimitiveSpec {
            shape: Shape::Box,
            color: "#ffffff",
            scale: "0.5 0.5 0.5",
            rotation: "0 0 0",
            position: "0 0.25 0",
        },
    },
    SiteRecord {
        id: "hampi",
        name: "Group of Monuments at Hampi",
        description: "A UNESCO World Heritage Site located in east-central Karnataka, India. \
            Hampi was the capital of the Vijayanagara Empire in the 14th century.",
        location: "Hampi, Karnataka",
        built: "14th century",
        architect: "Vijayanagara Empire",
        unesco: "1986",
        model: ModelRef {
            path: "models/hampi/scene.glb",
            scale: "0.5 0.5 0.5",
            rotation: "0 0 0",
            position: "0 0.5 0",
        },
        primitive: PrimitiveSpec {
            shape: Shape::Box,
            color: "#d4af37",
            scale: "0.5 0.5 0.5",
            rotation: "0 0 0",
            position: "0 0.25 0",
        },
    },
    SiteRecord {
        id: "khajuraho",
        name: "Khajuraho Group of Monuments",
        description: "A group of Hindu and Jain temples in Chhatarpur district, Madhya \
            Pradesh, India, about 175 kilometers southeast of Jhansi. They are a UNESCO \
            World Heritage Site.",
        location: "Chhatarpur, Madhya Pradesh",
        built: "950-1050 CE",
        architect: "Chandela dynasty",
        unesco: "1986",
        model: ModelRef {
            path: "models/khajuraho/scene.glb",
            scale: "0.5 0.5 0.5",
            rotation: "0 0 0",
            position: "0 0.5 0",
        },
        primitive: PrimitiveSpec {
            shape: Shape::Box,
            color: "#8b4513",
            scale: "0.5 0.5 0.5",
            rotation: "0 0 0",
            position: "0 0.25 0",
        },
    },
    SiteRecord {
        id: "konark",
        name: "Konark Sun Temple",
        description: "A 13th-century CE Sun temple at Konark about 35 kilometers northeast \
            from Puri on the coastline of Odisha, India. The temple is attributed to king \
            Narasimhadeva I of the Eastern Ganga dynasty about 1250 CE.",
        location: "Puri, Odisha",
        built: "1250 CE",
        architect: "Narasimhadeva I",
        unesco: "1984",
        model: ModelRef {
            path: "models/konark/scene.glb",
            scale: "0.5 0.5 0.5",
            rotation: "0 0 0",
            position: "0 0.5 0",
        },
        primitive: PrimitiveSpec {
            shape: Shape::Box,
            color: "#cd5c5c",
            scale: "0.5 0.5 0.5",
            rotation: "0 0 0",
            position: "0 0.25 0",
        },
    },
];

lazy_static::lazy_static! {
    static ref SITE_INDEX: HashMap<&'static str, &'static SiteRecord> =
        SITES.iter().map(|site| (site.id, site)).collect();
}

/// Look up a site record by identifier.
pub fn get(id: &str) -> Option<&'static SiteRecord> {
    SITE_INDEX.get(id).copied()
}

/// All site records, in catalog order.
pub fn sites() -> &'static [SiteRecord] {
    &SITES
}

/// All site identifiers, in catalog order.
pub fn ids() -> impl Iterator<Item = &'static str> {
    SITES.iter().map(|site| site.id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_sites_resolvable() {
        for site in sites() {
            let found = get(site.id).expect("site should resolve by id");
            assert_eq!(found.name, site.name);
        }
    }

    #[test]
    fn test_unknown_site() {
        assert!(get("atlantis").is_none());
        assert!(get("").is_none());
    }

    #[test]
    fn test_model_paths_follow_convention() {
        for site in sites() {
            assert_eq!(site.model.path, format!("models/{}/scene.glb", site.id));
        }
    }

    #[test]
    fn test_khajuraho_fallback_color() {
        let site = get("khajuraho").unwrap();
        assert_eq!(site.primitive.color, "#8b4513");
        assert_eq!(site.primitive.shape, Shape::Box);
    }
}
