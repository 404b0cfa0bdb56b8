use crate::quirks::Quirks;
use serde::{Deserialize, Serialize};

/// The default CHIP-8 processor speed in hertz, used by platforms whose tick rate is not
/// otherwise fixed.
pub const DEFAULT_TICKRATE_HERTZ: u64 = 0;

/// One of the historic CHIP-8 family machines this crate can emulate.
///
/// A [Platform] resolves to a fixed [Quirks] preset and a default tickrate (the number of
/// operations executed per simulated video frame); both are informed by the original hardware
/// or interpreter the platform models.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Platform {
    /// The original COSMAC VIP CHIP-8 interpreter.
    OriginalChip8,
    /// A COSMAC VIP-hosted hybrid interpreter (shares quirks with [Platform::OriginalChip8]).
    HybridVip,
    /// A "modern" CHIP-8 interpreter with no inherited quirks.
    ModernChip8,
    /// CHIP8X; shares quirks with [Platform::OriginalChip8] (its colour opcodes are not modeled).
    Chip8X,
    /// CHIP-48, the HP48 graphing-calculator port.
    Chip48,
    /// SUPERCHIP 1.0.
    SuperChip1,
    /// SUPERCHIP 1.1.
    SuperChip,
    /// MEGACHIP8, an extension of SUPERCHIP with a much higher tickrate.
    MegaChip8,
    /// XO-CHIP, the two-plane/64KiB/audio-pattern extension.
    XoChip,
}

impl Platform {
    /// Returns the fixed [Quirks] preset associated with this platform.
    pub fn quirks(&self) -> Quirks {
        match self {
            Platform::OriginalChip8 | Platform::HybridVip | Platform::Chip8X => {
                Quirks::original_chip8()
            }
            Platform::ModernChip8 => Quirks::none(),
            Platform::Chip48 => Quirks::chip48(),
            Platform::SuperChip1 | Platform::SuperChip | Platform::MegaChip8 => {
                Quirks::superchip()
            }
            Platform::XoChip => Quirks::xochip(),
        }
    }

    /// Returns the default tickrate (operations executed per simulated video frame) associated
    /// with this platform.
    pub fn tickrate(&self) -> u64 {
        match self {
            Platform::OriginalChip8 | Platform::HybridVip | Platform::Chip8X => 15,
            Platform::ModernChip8 => 12,
            Platform::Chip48 | Platform::SuperChip1 | Platform::SuperChip => 30,
            Platform::MegaChip8 => 1000,
            Platform::XoChip => 100,
        }
    }

    /// Returns true if this platform addresses a 64KiB memory space (XO-CHIP only); all other
    /// platforms are limited to the standard 4KiB CHIP-8 address space.
    pub fn extended_memory(&self) -> bool {
        matches!(self, Platform::XoChip)
    }

    /// Returns true if this platform supports the SUPERCHIP/XO-CHIP high-resolution display
    /// mode, extra scroll opcodes, and RPL flag opcodes.
    pub fn supports_high_resolution(&self) -> bool {
        matches!(
            self,
            Platform::SuperChip1
                | Platform::SuperChip
                | Platform::MegaChip8
                | Platform::XoChip
        )
    }

    /// Returns true if this platform supports the XO-CHIP extensions proper: the second
    /// display plane, the F000 double-wide I-load, and audio pattern/pitch control.
    pub fn supports_xo_chip(&self) -> bool {
        matches!(self, Platform::XoChip)
    }
}

impl Default for Platform {
    fn default() -> Self {
        Platform::OriginalChip8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_original_chip8_quirks_and_tickrate() {
        assert_eq!(Platform::OriginalChip8.quirks(), Quirks::original_chip8());
        assert_eq!(Platform::OriginalChip8.tickrate(), 15);
    }

    #[test]
    fn test_chip8x_shares_original_chip8_quirks() {
        assert_eq!(Platform::Chip8X.quirks(), Platform::OriginalChip8.quirks());
    }

    #[test]
    fn test_modern_chip8_has_no_quirks() {
        assert_eq!(Platform::ModernChip8.quirks(), Quirks::none());
        assert_eq!(Platform::ModernChip8.tickrate(), 12);
    }

    #[test]
    fn test_chip48_quirks_and_tickrate() {
        assert_eq!(Platform::Chip48.quirks(), Quirks::chip48());
        assert_eq!(Platform::Chip48.tickrate(), 30);
    }

    #[test]
    fn test_superchip_variants_share_quirks() {
        assert_eq!(Platform::SuperChip1.quirks(), Quirks::superchip());
        assert_eq!(Platform::SuperChip.quirks(), Quirks::superchip());
        assert_eq!(Platform::MegaChip8.quirks(), Quirks::superchip());
    }

    #[test]
    fn test_megachip8_tickrate() {
        assert_eq!(Platform::MegaChip8.tickrate(), 1000);
    }

    #[test]
    fn test_xochip_quirks_tickrate_and_extensions() {
        assert_eq!(Platform::XoChip.quirks(), Quirks::xochip());
        assert_eq!(Platform::XoChip.tickrate(), 100);
        assert!(Platform::XoChip.extended_memory());
        assert!(Platform::XoChip.supports_xo_chip());
    }

    #[test]
    fn test_supports_high_resolution() {
        assert!(Platform::SuperChip.supports_high_resolution());
        assert!(Platform::XoChip.supports_high_resolution());
        assert!(!Platform::OriginalChip8.supports_high_resolution());
        assert!(!Platform::Chip48.supports_high_resolution());
    }
}
