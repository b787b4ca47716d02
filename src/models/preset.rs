use serde::Serialize;

/// A one-click remix shortcut.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct Preset {
    pub label: &'static str,
    pub icon: &'static str,
    pub prompt: &'static str,
}

pub const PRESETS: &[Preset] = &[
    Preset {
        label: "Overhead",
        icon: "⬆️",
        prompt: "Generate a top-down overhead view of this object on white background.",
    },
    Preset {
        label: "Side",
        icon: "➡️",
        prompt: "Generate a side view of this object on white background.",
    },
    Preset {
        label: "Close-up",
        icon: "🔍",
        prompt: "Generate an extremely close-up macrophotography detailed shot of this object on white background.",
    },
    Preset {
        label: "Isometric",
        icon: "📐",
        prompt: "Generate an isometric perspective 3d model of this object, sitting on a glass square tile, white background.",
    },
    Preset {
        label: "Line",
        icon: "✏️",
        prompt: "Transform this image into a detailed 3D technical line drawing without labels, rendered in black on a white background.",
    },
    Preset {
        label: "Hologram",
        icon: "✨",
        prompt: "Turn this object into a 3d line art transparent hologram on black background.",
    },
];

pub fn find_preset(label: &str) -> Option<&'static Preset> {
    PRESETS.iter().find(|p| p.label == label)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_labels_unique() {
        let labels: HashSet<_> = PRESETS.iter().map(|p| p.label).collect();
        assert_eq!(labels.len(), PRESETS.len());
    }

    #[test]
    fn test_find_preset() {
        let side = find_preset("Side").unwrap();
        assert!(side.prompt.contains("side view"));
        assert!(find_preset("side").is_none());
        assert!(find_preset("Panorama").is_none());
    }
}
