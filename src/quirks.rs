use serde::{Deserialize, Serialize};

/// The set of behavioural switches that distinguish historic CHIP-8 interpreters from one
/// another. Each flag changes the semantics of one or two opcodes; a [Platform] resolves to
/// a fixed combination of these via [Platform::quirks()].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quirks {
    /// 8XY6/8XYE shift V\[X\] in place rather than shifting V\[Y\] into V\[X\].
    pub shift: bool,
    /// FX55/FX65 advance I by X (rather than X+1).
    pub memory_increment_by_x: bool,
    /// FX55/FX65 leave I unchanged.
    pub memory_leave_i_unchanged: bool,
    /// DXYN wraps sprite pixels across screen edges rather than clipping them.
    pub wrap: bool,
    /// BNNN jumps to NN + V\[X\] (X taken from the high nibble of NN) rather than NNN + V\[0\].
    pub jump: bool,
    /// DXYN yields the remainder of the current frame's instruction budget after drawing.
    pub vblank: bool,
    /// 8XY1/8XY2/8XY3 reset V\[0xF\] to zero after the logical operation.
    pub logic: bool,
}

impl Quirks {
    /// No quirks enabled: every ambiguous instruction behaves per the "modern" consensus.
    pub const fn none() -> Self {
        Quirks {
            shift: false,
            memory_increment_by_x: false,
            memory_leave_i_unchanged: false,
            wrap: false,
            jump: false,
            vblank: false,
            logic: false,
        }
    }

    /// The quirks preset shared by the original COSMAC VIP CHIP-8 interpreter, the HYBRID-VIP
    /// interpreters, and CHIP8X.
    pub const fn original_chip8() -> Self {
        Quirks {
            vblank: true,
            logic: true,
            ..Quirks::none()
        }
    }

    /// The quirks preset used by CHIP-48.
    pub const fn chip48() -> Self {
        Quirks {
            shift: true,
            memory_increment_by_x: true,
            jump: true,
            ..Quirks::none()
        }
    }

    /// The quirks preset shared by SUPERCHIP 1.0, SUPERCHIP 1.1, and MEGACHIP8.
    pub const fn superchip() -> Self {
        Quirks {
            shift: true,
            memory_leave_i_unchanged: true,
            jump: true,
            ..Quirks::none()
        }
    }

    /// The quirks preset used by XO-CHIP.
    pub const fn xochip() -> Self {
        Quirks {
            wrap: true,
            ..Quirks::none()
        }
    }
}

impl Default for Quirks {
    fn default() -> Self {
        Quirks::none()
    }
}
