//! Soundness and precision of an analysis result.

use std::fmt;

/// Two flags describing how far a result can be trusted.
///
/// - `sound`: no reachable behavior was skipped.
/// - `precise`: no spurious behavior was added beyond what the domain promises.
///
/// Composed algorithms combine their statuses with [`AlgorithmStatus::update`],
/// which conjoins both flags.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct AlgorithmStatus {
    sound: bool,
    precise: bool,
}

impl AlgorithmStatus {
    pub const SOUND_AND_PRECISE: AlgorithmStatus = AlgorithmStatus::new(true, true);
    pub const UNSOUND_AND_PRECISE: AlgorithmStatus = AlgorithmStatus::new(false, true);
    pub const SOUND_AND_IMPRECISE: AlgorithmStatus = AlgorithmStatus::new(true, false);
    pub const UNSOUND_AND_IMPRECISE: AlgorithmStatus = AlgorithmStatus::new(false, false);

    pub const fn new(sound: bool, precise: bool) -> Self {
        AlgorithmStatus { sound, precise }
    }

    pub fn is_sound(self) -> bool {
        self.sound
    }

    pub fn is_precise(self) -> bool {
        self.precise
    }

    pub fn with_sound(self, sound: bool) -> Self {
        AlgorithmStatus { sound, ..self }
    }

    pub fn with_precise(self, precise: bool) -> Self {
        AlgorithmStatus { precise, ..self }
    }

    /// Conjoin with the status of another algorithm.
    pub fn update(self, other: AlgorithmStatus) -> Self {
        AlgorithmStatus {
            sound: self.sound && other.sound,
            precise: self.precise && other.precise,
        }
    }
}

impl Default for AlgorithmStatus {
    fn default() -> Self {
        AlgorithmStatus::SOUND_AND_PRECISE
    }
}

impl fmt::Display for AlgorithmStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} and {}",
            if self.sound { "sound" } else { "unsound" },
            if self.precise { "precise" } else { "imprecise" }
        )
    }
}
