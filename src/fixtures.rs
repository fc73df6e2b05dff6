//
// fixtures.rs
// Dicom-Png-rs
//
// Hand-assembled explicit VR little endian buffers for unit tests.
//
// Thales Matheus Mendonça Santos - November 2025

pub(crate) struct DicomBuilder {
    bytes: Vec<u8>,
}

impl DicomBuilder {
    pub(crate) fn new() -> Self {
        let mut bytes = vec![0u8; 128];
        bytes.extend_from_slice(b"DICM");
        Self { bytes }
    }

    pub(crate) fn raw_element(group: u16, element: u16, vr: &[u8; 2], value: &[u8]) -> Vec<u8> {
        let mut out = Vec::with_capacity(12 + value.len());
        out.extend_from_slice(&group.to_le_bytes());
        out.extend_from_slice(&element.to_le_bytes());
        out.extend_from_slice(vr);
        if matches!(vr, b"OB" | b"OW" | b"SQ" | b"UN" | b"UT") {
            out.extend_from_slice(&[0, 0]);
            out.extend_from_slice(&(value.len() as u32).to_le_bytes());
        } else {
            out.extend_from_slice(&(value.len() as u16).to_le_bytes());
        }
        out.extend_from_slice(value);
        out
    }

    pub(crate) fn element(mut self, group: u16, element: u16, vr: &[u8; 2], value: &[u8]) -> Self {
        self.bytes
            .extend(Self::raw_element(group, element, vr, value));
        self
    }

    pub(crate) fn string(self, group: u16, element: u16, vr: &[u8; 2], value: &str) -> Self {
        let mut padded = value.as_bytes().to_vec();
        if padded.len() % 2 == 1 {
            padded.push(if vr == b"UI" { 0 } else { b' ' });
        }
        self.element(group, element, vr, &padded)
    }

    pub(crate) fn u16(self, group: u16, element: u16, value: u16) -> Self {
        self.element(group, element, b"US", &value.to_le_bytes())
    }

    pub(crate) fn u32(self, group: u16, element: u16, value: u32) -> Self {
        self.element(group, element, b"UL", &value.to_le_bytes())
    }

    pub(crate) fn transfer_syntax(self, uid: &str) -> Self {
        self.string(0x0002, 0x0010, b"UI", uid)
    }

    pub(crate) fn pixels(self, samples: &[u16]) -> Self {
        let bytes: Vec<u8> = samples.iter().flat_map(|s| s.to_le_bytes()).collect();
        self.element(0x7FE0, 0x0010, b"OW", &bytes)
    }

    /// Sequence of undefined length holding one undefined-length item per entry.
    pub(crate) fn undefined_sequence(mut self, group: u16, element: u16, items: &[Vec<u8>]) -> Self {
        self.bytes.extend_from_slice(&group.to_le_bytes());
        self.bytes.extend_from_slice(&element.to_le_bytes());
        self.bytes.extend_from_slice(b"SQ\0\0");
        self.bytes.extend_from_slice(&u32::MAX.to_le_bytes());
        for item in items {
            self.bytes.extend_from_slice(&[0xFE, 0xFF, 0x00, 0xE0]);
            self.bytes.extend_from_slice(&u32::MAX.to_le_bytes());
            self.bytes.extend_from_slice(item);
            self.bytes.extend_from_slice(&[0xFE, 0xFF, 0x0D, 0xE0, 0, 0, 0, 0]);
        }
        self.bytes.extend_from_slice(&[0xFE, 0xFF, 0xDD, 0xE0, 0, 0, 0, 0]);
        self
    }

    /// Encapsulated pixel data: empty offset table followed by one fragment.
    pub(crate) fn encapsulated_pixels(mut self, fragment: &[u8]) -> Self {
        self.bytes.extend_from_slice(&[0xE0, 0x7F, 0x10, 0x00]);
        self.bytes.extend_from_slice(b"OB\0\0");
        self.bytes.extend_from_slice(&u32::MAX.to_le_bytes());
        self.bytes.extend_from_slice(&[0xFE, 0xFF, 0x00, 0xE0, 0, 0, 0, 0]);
        self.bytes.extend_from_slice(&[0xFE, 0xFF, 0x00, 0xE0]);
        self.bytes.extend_from_slice(&(fragment.len() as u32).to_le_bytes());
        self.bytes.extend_from_slice(fragment);
        self.bytes.extend_from_slice(&[0xFE, 0xFF, 0xDD, 0xE0, 0, 0, 0, 0]);
        self
    }

    pub(crate) fn build(self) -> Vec<u8> {
        self.bytes
    }
}
