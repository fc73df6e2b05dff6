//
// normalize.rs
// Dicom-Png-rs
//
// Rescales 16-bit samples to 8-bit intensities against the global maximum.
//
// Thales Matheus Mendonça Santos - November 2025

/// Largest sample, found in a single linear pass. Empty input yields 0.
pub fn max_sample(samples: &[u16]) -> u16 {
    samples.iter().copied().fold(0, u16::max)
}

/// Maps every sample to `floor(sample / max * 255)`. An all-zero image stays all zero.
pub fn normalize_samples(samples: &[u16]) -> Vec<u8> {
    let max = max_sample(samples);
    samples.iter().map(|&s| scale(s, max)).collect()
}

fn scale(sample: u16, max: u16) -> u8 {
    if max == 0 {
        return 0;
    }
    // Exact integer floor; sample <= max keeps the quotient within 0..=255.
    (u32::from(sample) * 255 / u32::from(max)) as u8
}
