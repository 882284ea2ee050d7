// ============================================================================
// Check-Digit Module
// Stateless implementations of the CheckDigitScheme interface
// ============================================================================

mod mod10;
mod mod97;

pub use mod10::Mod10;
pub use mod97::Mod97;
