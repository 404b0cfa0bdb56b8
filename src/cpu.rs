use crate::audio::Audio;
use crate::display::Display;
use crate::error::ErrorDetail;
use crate::instruction::{InstrKind, Instruction};
use crate::keys::KeyState;
use crate::memory::Memory;
use crate::quirks::Quirks;
use crate::registers::Registers;
use crate::stack::Stack;
use crate::timers::Timers;

mod execute;
#[cfg(test)]
mod tests;

pub(crate) mod block;
pub(crate) mod cached;
pub(crate) mod pure;

pub(crate) use cached::CachedCpu;
pub(crate) use pure::PureCpu;

/// The decoded form of an instruction as it is bound for execution: the instruction itself
/// plus, for `CondAdvance` instructions only, the width in bytes of the instruction that
/// immediately follows it in memory (2 normally, 4 when that instruction is the XO-CHIP
/// double-wide F000 prefix, so a taken skip clears the whole two-word instruction as a unit).
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct BoundOp {
    pub(crate) instruction: Instruction,
    pub(crate) skip_width: u16,
}

/// The result of executing a single [BoundOp] against live [CpuState], reported back to the
/// calling CPU core rather than retained as state on the operation itself (§4.3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) struct ExecOutcome {
    /// False only for `FX0A` when no key is currently down: the op should be retried unadvanced.
    pub(crate) advance: bool,
    /// True if this op wrote into, or jumped/called into, memory the block cache may already
    /// have compiled stale bytes for.
    pub(crate) self_modified: bool,
    /// True for Jump-kind ops, which set the program counter themselves.
    pub(crate) is_jump: bool,
    /// True if this op mutated the display.
    pub(crate) draw: bool,
}

/// The bundle of mutable state every CHIP-8 family operation executes against: register file,
/// stack, memory, timers, keypad, display and audio, plus the active platform's quirks and
/// capability flags. Both the pure and cached CPU cores own one of these and dispatch every
/// decoded instruction through [CpuState::execute] (see `cpu/execute.rs`).
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct CpuState {
    pub(crate) registers: Registers,
    pub(crate) stack: Stack,
    pub(crate) memory: Memory,
    pub(crate) timers: Timers,
    pub(crate) keys: KeyState,
    pub(crate) display: Display,
    pub(crate) audio: Audio,
    pub(crate) quirks: Quirks,
    /// Whether the active platform supports SCHIP-and-later features: high-resolution mode,
    /// the extra scroll opcodes, FX30, and the RPL flag opcodes.
    pub(crate) supports_high_resolution: bool,
    /// Whether the active platform supports the XO-CHIP extensions proper: the second
    /// display plane, the F000 double-wide I-load, and audio pattern/pitch control.
    pub(crate) supports_xo_chip: bool,
}

impl CpuState {
    pub(crate) fn new(
        memory: Memory,
        quirks: Quirks,
        program_start_address: u16,
        supports_high_resolution: bool,
        supports_xo_chip: bool,
    ) -> Self {
        CpuState {
            registers: Registers::new(program_start_address),
            stack: Stack::new(),
            memory,
            timers: Timers::new(),
            keys: KeyState::new(),
            display: Display::new(),
            audio: Audio::new(),
            quirks,
            supports_high_resolution,
            supports_xo_chip,
        }
    }
}

/// Reads the opcode at `pc`, and (only where the instruction needs it) the following word,
/// decodes it and computes its [BoundOp], without consulting any cache. Shared by the pure
/// engine (called every op) and the cached engine (called once per block entry, on cache
/// miss).
pub(crate) fn fetch_and_decode(memory: &Memory, pc: u16) -> Result<BoundOp, ErrorDetail> {
    let opcode: u16 = memory.read_two_bytes(pc as usize)?;
    let next_word: u16 = memory.read_two_bytes(pc as usize + 2).unwrap_or(0);
    let instruction: Instruction = Instruction::decode_from(opcode, next_word)?;
    let skip_width: u16 = match instruction.kind() {
        InstrKind::CondAdvance if next_word == 0xF000 => 4,
        InstrKind::CondAdvance => 2,
        _ => 0,
    };
    Ok(BoundOp { instruction, skip_width })
}
