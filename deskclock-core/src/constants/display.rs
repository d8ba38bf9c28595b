//! Display Layout Constants

/// Logical digit slots on the clock face.
pub const DIGIT_SLOTS: usize = 6;

/// Slot holding the auxiliary text line in 4-digit layout.
pub const AUX_TEXT_SLOT: usize = 4;

/// Longest auxiliary or caption text.
pub const MAX_TEXT_LEN: usize = 24;
