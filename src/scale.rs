//! Scale table - the fixed 21-note tuning of a C-key bamboo flute.
//!
//! Three octave registers, seven scale degrees each (do re mi fa sol la si),
//! enumerated in ascending table order. The Hz values are the literal bank
//! tuning, kept verbatim; note that the high register's sixth degree sits at
//! 880.00 Hz in this table.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Scale degrees per octave register (numbered 1 through 7).
pub const DEGREES_PER_OCTAVE: u8 = 7;

/// Octave register of the bank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Octave {
    Low,
    Mid,
    High,
}

impl Octave {
    /// All registers in ascending order.
    pub const ALL: [Octave; 3] = [Octave::Low, Octave::Mid, Octave::High];

    /// Directory name used for this register's output files.
    pub fn dir_name(&self) -> &'static str {
        match self {
            Octave::Low => "low",
            Octave::Mid => "mid",
            Octave::High => "high",
        }
    }

    /// Fundamental frequencies for degrees 1..=7 of this register, in Hz.
    pub fn frequencies(&self) -> [f64; 7] {
        match self {
            // C3..B3
            Octave::Low => [130.81, 146.83, 164.81, 174.61, 196.00, 220.00, 246.94],
            // C4..B4
            Octave::Mid => [261.63, 293.66, 329.63, 349.23, 392.00, 440.00, 493.88],
            // C5..B5
            Octave::High => [523.25, 587.33, 659.25, 698.46, 783.99, 880.00, 987.77],
        }
    }
}

impl fmt::Display for Octave {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_name())
    }
}

/// Frequency of one scale degree (1..=7) in Hz, or `None` out of range.
pub fn note_frequency(octave: Octave, degree: u8) -> Option<f64> {
    if (1..=DEGREES_PER_OCTAVE).contains(&degree) {
        Some(octave.frequencies()[degree as usize - 1])
    } else {
        None
    }
}

/// Iterate all 21 notes of the bank in table order.
pub fn all_notes() -> impl Iterator<Item = (Octave, u8, f64)> {
    Octave::ALL.into_iter().flat_map(|octave| {
        octave
            .frequencies()
            .into_iter()
            .enumerate()
            .map(move |(i, hz)| (octave, i as u8 + 1, hz))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_has_21_notes() {
        assert_eq!(all_notes().count(), 21);
    }

    #[test]
    fn frequencies_strictly_increase_within_each_octave() {
        for octave in Octave::ALL {
            let freqs = octave.frequencies();
            for pair in freqs.windows(2) {
                assert!(
                    pair[1] > pair[0],
                    "{octave}: {} should exceed {}",
                    pair[1],
                    pair[0]
                );
            }
        }
    }

    #[test]
    fn octaves_ascend_across_register_boundaries() {
        let low = Octave::Low.frequencies();
        let mid = Octave::Mid.frequencies();
        let high = Octave::High.frequencies();
        assert!(mid[0] > low[6], "mid.1 should exceed low.7");
        assert!(high[0] > mid[6], "high.1 should exceed mid.7");
    }

    #[test]
    fn degree_lookup_bounds() {
        assert_eq!(note_frequency(Octave::Mid, 1), Some(261.63));
        assert_eq!(note_frequency(Octave::High, 7), Some(987.77));
        assert_eq!(note_frequency(Octave::Low, 0), None);
        assert_eq!(note_frequency(Octave::Low, 8), None);
    }

    #[test]
    fn high_sixth_degree_keeps_literal_tuning() {
        // The bank tuning pins this note at 880.00 Hz; it must not be
        // recomputed from equal temperament.
        assert_eq!(note_frequency(Octave::High, 6), Some(880.00));
    }

    #[test]
    fn octave_serde_names_match_directories() {
        let json = serde_json::to_string(&Octave::Mid).unwrap();
        assert_eq!(json, "\"mid\"");
        let back: Octave = serde_json::from_str("\"high\"").unwrap();
        assert_eq!(back, Octave::High);
    }
}
