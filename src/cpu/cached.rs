use std::collections::VecDeque;

use super::block::BlockCache;
use super::{fetch_and_decode, BoundOp, CpuState};
use crate::error::ErrorDetail;
use crate::memory::Memory;
use crate::quirks::Quirks;

/// The basic-block-caching execution engine (§4.3).
///
/// Rather than fetch-decode-execute one instruction at a time, this engine compiles the
/// instructions starting at the current program counter into a cached [block](BlockCache),
/// then executes straight through that block's queued instructions without returning to the
/// cache on every single op. A block only ever ends on a control-transfer or double-wide
/// instruction (§4.2), so draining the queue this way is equivalent to the pure engine's
/// one-at-a-time loop, just without repeating the fetch/decode work on every pass through a
/// loop body.
#[derive(Clone, Debug)]
pub(crate) struct CachedCpu {
    state: CpuState,
    block_cache: BlockCache,
    queue: VecDeque<(u16, BoundOp)>,
    draw_occurred: bool,
}

impl CachedCpu {
    pub(crate) fn new(
        memory: Memory,
        quirks: Quirks,
        program_start_address: u16,
        supports_high_resolution: bool,
        supports_xo_chip: bool,
    ) -> Self {
        CachedCpu {
            state: CpuState::new(memory, quirks, program_start_address, supports_high_resolution, supports_xo_chip),
            block_cache: BlockCache::new(),
            queue: VecDeque::new(),
            draw_occurred: false,
        }
    }

    pub(crate) fn state(&self) -> &CpuState {
        &self.state
    }

    pub(crate) fn state_mut(&mut self) -> &mut CpuState {
        &mut self.state
    }

    /// Executes one instruction, refilling the instruction queue from the block cache first if
    /// it has run dry. Returns once a single instruction has run; a caller wanting a whole
    /// frame's worth of execution calls this repeatedly (§4.7).
    pub(crate) fn execute_next_op(&mut self) -> Result<(), ErrorDetail> {
        self.draw_occurred = false;

        if self.queue.is_empty() {
            let pc: u16 = self.state.registers.program_counter;
            let block = self.block_cache.get_block(pc, &self.state.memory)?;
            if block.is_empty() {
                // The builder couldn't decode even the first instruction at `pc`, most likely
                // because a program is mid-way through rewriting its own code. Fall back to a
                // single fetch/decode/execute, mirroring the pure engine. If this also raises
                // UnknownInstruction it isn't a self-modification artifact but a genuinely
                // unrecognised opcode, and it propagates as fatal.
                let op = fetch_and_decode(&self.state.memory, pc)?;
                let outcome = self.state.execute(pc, op)?;
                if outcome.self_modified {
                    self.block_cache.clear();
                    self.queue.clear();
                }
                self.draw_occurred = outcome.draw;
                return Ok(());
            }
            self.queue.extend(block.iter().copied());
        }

        let (address, op) = self.queue.pop_front().ok_or(ErrorDetail::NoInstructions)?;
        let outcome = self.state.execute(address, op)?;

        if !outcome.advance {
            self.queue.push_front((address, op));
        }
        if outcome.self_modified {
            self.block_cache.clear();
            self.queue.clear();
        }
        if outcome.is_jump {
            self.queue.clear();
        }

        self.draw_occurred = outcome.draw;
        Ok(())
    }

    /// Returns true if the instruction most recently run by [Self::execute_next_op] mutated
    /// the display.
    pub(crate) fn draw_occurred(&self) -> bool {
        self.draw_occurred
    }

    /// Copies this engine's observable CHIP-8 state (registers, stack, memory, timers, keys,
    /// display, audio) onto `other`, without disturbing `other`'s own block cache. The cache is
    /// purely an execution-speed optimisation; two [CachedCpu] instances with identical
    /// [CpuState] but different cache contents are, and must remain, observably identical.
    pub(crate) fn copy_state(&self, other: &mut Self) {
        other.state = self.state.clone();
        other.queue.clear();
        other.block_cache.clear();
    }
}
