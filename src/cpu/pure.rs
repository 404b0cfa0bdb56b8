use super::{fetch_and_decode, CpuState};
use crate::error::ErrorDetail;
use crate::memory::Memory;
use crate::quirks::Quirks;

/// The uncached, fetch-decode-execute-every-time engine (§4.3p).
///
/// Kept alongside [CachedCpu](super::CachedCpu) as the simpler reference engine: no block
/// cache, no self-modification tracking, no instruction queue. Every call to
/// [Self::execute_next_op] fetches and decodes whatever instruction the program counter
/// currently points at. Slower, but its output is the baseline the cached engine's behaviour is
/// checked against.
#[derive(Clone, Debug)]
pub(crate) struct PureCpu {
    state: CpuState,
    draw_occurred: bool,
}

impl PureCpu {
    pub(crate) fn new(
        memory: Memory,
        quirks: Quirks,
        program_start_address: u16,
        supports_high_resolution: bool,
        supports_xo_chip: bool,
    ) -> Self {
        PureCpu {
            state: CpuState::new(memory, quirks, program_start_address, supports_high_resolution, supports_xo_chip),
            draw_occurred: false,
        }
    }

    pub(crate) fn state(&self) -> &CpuState {
        &self.state
    }

    pub(crate) fn state_mut(&mut self) -> &mut CpuState {
        &mut self.state
    }

    pub(crate) fn execute_next_op(&mut self) -> Result<(), ErrorDetail> {
        let pc: u16 = self.state.registers.program_counter;
        let op = fetch_and_decode(&self.state.memory, pc)?;
        let outcome = self.state.execute(pc, op)?;
        self.draw_occurred = outcome.draw;
        Ok(())
    }

    pub(crate) fn draw_occurred(&self) -> bool {
        self.draw_occurred
    }

    pub(crate) fn copy_state(&self, other: &mut Self) {
        other.state = self.state.clone();
    }
}
