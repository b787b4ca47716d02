//! Small image payloads for driving the API without real photos

/// PNG signature followed by filler. Enough for format sniffing.
pub const PNG_BYTES: &[u8] = &[
    0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, b'I', b'H', b'D', b'R',
    0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01,
];

/// JPEG SOI + APP0 marker.
pub const JPEG_BYTES: &[u8] = &[
    0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, b'J', b'F', b'I', b'F', 0x00, 0x01,
];

pub const NOT_AN_IMAGE: &[u8] = b"definitely just text";

/// A remix prompt/label pair from the preset catalog.
pub struct PresetCase {
    pub label: &'static str,
    pub prompt_fragment: &'static str,
}

pub const PRESET_CASES: &[PresetCase] = &[
    PresetCase {
        label: "Side",
        prompt_fragment: "side view",
    },
    PresetCase {
        label: "Hologram",
        prompt_fragment: "hologram",
    },
];
