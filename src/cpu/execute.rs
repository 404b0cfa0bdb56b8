use super::{BoundOp, CpuState, ExecOutcome};
use crate::display::{PLANE_1, PLANE_2};
use crate::error::ErrorDetail;
use crate::instruction::Instruction;
use rand::Rng;

impl CpuState {
    /// Executes one decoded instruction, originally fetched at `pc_at`, against this state,
    /// returning what the calling CPU core needs to know to drive its own loop (§4.3): whether
    /// to advance past this op, whether it may have invalidated a cached block, whether it set
    /// the program counter itself, and whether it mutated the display.
    ///
    /// Every arm sets `self.registers.program_counter` explicitly (even non-terminating
    /// operations, which simply advance past their own width) rather than relying on a
    /// block-entry pre-set PC; this lets the same `execute` serve both the pure engine, which
    /// has no block to pre-set a PC from, and the cached engine.
    pub(crate) fn execute(&mut self, pc_at: u16, op: BoundOp) -> Result<ExecOutcome, ErrorDetail> {
        let mut outcome: ExecOutcome = ExecOutcome { advance: true, ..Default::default() };
        let own_width: u16 = op.instruction.width_words() * 2;
        let advance_pc = |pc_at: u16, own_width: u16| pc_at.wrapping_add(own_width);

        match op.instruction {
            Instruction::Op0NNN { nnn } => {
                return Err(ErrorDetail::UnimplementedInstruction { opcode: nnn });
            }

            Instruction::Op00E0 => {
                self.display.clear();
                outcome.draw = true;
                self.registers.program_counter = advance_pc(pc_at, own_width);
            }
            Instruction::Op00CN { n } => {
                self.require_high_resolution(0x00C0 | n as u16)?;
                self.display.scroll_down(n as usize);
                outcome.draw = true;
                self.registers.program_counter = advance_pc(pc_at, own_width);
            }
            Instruction::Op00DN { n } => {
                self.require_xo_chip(0x00D0 | n as u16)?;
                self.display.scroll_up(n as usize);
                outcome.draw = true;
                self.registers.program_counter = advance_pc(pc_at, own_width);
            }
            Instruction::Op00FB => {
                self.require_high_resolution(0x00FB)?;
                self.display.scroll_right();
                outcome.draw = true;
                self.registers.program_counter = advance_pc(pc_at, own_width);
            }
            Instruction::Op00FC => {
                self.require_high_resolution(0x00FC)?;
                self.display.scroll_left();
                outcome.draw = true;
                self.registers.program_counter = advance_pc(pc_at, own_width);
            }
            Instruction::Op00FD => {
                self.require_high_resolution(0x00FD)?;
                return Err(ErrorDetail::ExitInterpreter);
            }
            Instruction::Op00FE => {
                self.require_high_resolution(0x00FE)?;
                self.display.set_high_resolution(false);
                self.display.clear();
                outcome.draw = true;
                self.registers.program_counter = advance_pc(pc_at, own_width);
            }
            Instruction::Op00FF => {
                self.require_high_resolution(0x00FF)?;
                self.display.set_high_resolution(true);
                self.display.clear();
                outcome.draw = true;
                self.registers.program_counter = advance_pc(pc_at, own_width);
            }

            Instruction::Op00EE => {
                let target: u16 = self.stack.pop()?;
                outcome.self_modified = !self.memory.is_code_region(target as usize);
                outcome.is_jump = true;
                self.registers.program_counter = target;
            }
            Instruction::Op1NNN { nnn } => {
                outcome.self_modified = !self.memory.is_code_region(nnn as usize);
                outcome.is_jump = true;
                self.registers.program_counter = nnn;
            }
            Instruction::Op2NNN { nnn } => {
                let return_address: u16 = advance_pc(pc_at, own_width);
                self.stack.push(return_address)?;
                outcome.self_modified = !self.memory.is_code_region(nnn as usize);
                outcome.is_jump = true;
                self.registers.program_counter = nnn;
            }
            Instruction::OpBNNN { nnn } => {
                let target: u16 = if self.quirks.jump {
                    let x: usize = ((nnn & 0x0F00) >> 8) as usize;
                    (nnn & 0x00FF).wrapping_add(self.registers.variable[x] as u16)
                } else {
                    nnn.wrapping_add(self.registers.variable[0] as u16)
                };
                outcome.self_modified = !self.memory.is_code_region(target as usize);
                outcome.is_jump = true;
                self.registers.program_counter = target;
            }

            Instruction::Op3XNN { x, nn } => {
                let taken: bool = self.registers.variable[x] == nn;
                self.advance_with_skip(pc_at, own_width, op.skip_width, taken);
            }
            Instruction::Op4XNN { x, nn } => {
                let taken: bool = self.registers.variable[x] != nn;
                self.advance_with_skip(pc_at, own_width, op.skip_width, taken);
            }
            Instruction::Op5XY0 { x, y } => {
                let taken: bool = self.registers.variable[x] == self.registers.variable[y];
                self.advance_with_skip(pc_at, own_width, op.skip_width, taken);
            }
            Instruction::Op9XY0 { x, y } => {
                let taken: bool = self.registers.variable[x] != self.registers.variable[y];
                self.advance_with_skip(pc_at, own_width, op.skip_width, taken);
            }
            Instruction::OpEX9E { x } => {
                let taken: bool = self.keys.is_key_pressed(self.registers.variable[x] & 0xF)?;
                self.advance_with_skip(pc_at, own_width, op.skip_width, taken);
            }
            Instruction::OpEXA1 { x } => {
                let taken: bool = !self.keys.is_key_pressed(self.registers.variable[x] & 0xF)?;
                self.advance_with_skip(pc_at, own_width, op.skip_width, taken);
            }

            Instruction::Op5XY2 { x, y } => {
                self.require_xo_chip(0x5002)?;
                let base: u16 = self.registers.index;
                let range: Vec<usize> = Self::register_range(x, y);
                for (offset, &index) in range.iter().enumerate() {
                    let address: usize = base as usize + offset;
                    self.memory.write_byte(address, self.registers.variable[index])?;
                    if self.memory.is_code_region(address) {
                        outcome.self_modified = true;
                    }
                }
                self.registers.program_counter = advance_pc(pc_at, own_width);
            }
            Instruction::Op5XY3 { x, y } => {
                self.require_xo_chip(0x5003)?;
                let base: u16 = self.registers.index;
                let range: Vec<usize> = Self::register_range(x, y);
                for (offset, &index) in range.iter().enumerate() {
                    self.registers.variable[index] = self.memory.read_byte(base as usize + offset)?;
                }
                self.registers.program_counter = advance_pc(pc_at, own_width);
            }

            Instruction::Op6XNN { x, nn } => {
                self.registers.variable[x] = nn;
                self.registers.program_counter = advance_pc(pc_at, own_width);
            }
            Instruction::Op7XNN { x, nn } => {
                self.registers.variable[x] = self.registers.variable[x].wrapping_add(nn);
                self.registers.program_counter = advance_pc(pc_at, own_width);
            }

            Instruction::Op8XY0 { x, y } => {
                self.registers.variable[x] = self.registers.variable[y];
                self.registers.program_counter = advance_pc(pc_at, own_width);
            }
            Instruction::Op8XY1 { x, y } => {
                self.registers.variable[x] |= self.registers.variable[y];
                if self.quirks.logic {
                    self.registers.variable[0xF] = 0;
                }
                self.registers.program_counter = advance_pc(pc_at, own_width);
            }
            Instruction::Op8XY2 { x, y } => {
                self.registers.variable[x] &= self.registers.variable[y];
                if self.quirks.logic {
                    self.registers.variable[0xF] = 0;
                }
                self.registers.program_counter = advance_pc(pc_at, own_width);
            }
            Instruction::Op8XY3 { x, y } => {
                self.registers.variable[x] ^= self.registers.variable[y];
                if self.quirks.logic {
                    self.registers.variable[0xF] = 0;
                }
                self.registers.program_counter = advance_pc(pc_at, own_width);
            }
            Instruction::Op8XY4 { x, y } => {
                let sum: u16 = self.registers.variable[x] as u16 + self.registers.variable[y] as u16;
                self.registers.variable[x] = (sum & 0xFF) as u8;
                self.registers.variable[0xF] = if sum > 0xFF { 1 } else { 0 };
                self.registers.program_counter = advance_pc(pc_at, own_width);
            }
            Instruction::Op8XY5 { x, y } => {
                let (vx, vy) = (self.registers.variable[x], self.registers.variable[y]);
                self.registers.variable[x] = vx.wrapping_sub(vy);
                self.registers.variable[0xF] = if vx >= vy { 1 } else { 0 };
                self.registers.program_counter = advance_pc(pc_at, own_width);
            }
            Instruction::Op8XY7 { x, y } => {
                let (vx, vy) = (self.registers.variable[x], self.registers.variable[y]);
                self.registers.variable[x] = vy.wrapping_sub(vx);
                self.registers.variable[0xF] = if vy >= vx { 1 } else { 0 };
                self.registers.program_counter = advance_pc(pc_at, own_width);
            }
            Instruction::Op8XY6 { x, y } => {
                let source: u8 = if self.quirks.shift {
                    self.registers.variable[x]
                } else {
                    self.registers.variable[y]
                };
                self.registers.variable[x] = source >> 1;
                self.registers.variable[0xF] = source & 0x1;
                self.registers.program_counter = advance_pc(pc_at, own_width);
            }
            Instruction::Op8XYE { x, y } => {
                let source: u8 = if self.quirks.shift {
                    self.registers.variable[x]
                } else {
                    self.registers.variable[y]
                };
                self.registers.variable[x] = source << 1;
                self.registers.variable[0xF] = (source & 0x80) >> 7;
                self.registers.program_counter = advance_pc(pc_at, own_width);
            }

            Instruction::OpANNN { nnn } => {
                self.registers.index = nnn;
                self.registers.program_counter = advance_pc(pc_at, own_width);
            }
            Instruction::OpCXNN { x, nn } => {
                let random_byte: u8 = rand::thread_rng().gen();
                self.registers.variable[x] = random_byte & nn;
                self.registers.program_counter = advance_pc(pc_at, own_width);
            }

            Instruction::OpDXYN { x, y, n } => {
                outcome.draw = self.execute_draw(x, y, n)?;
                self.registers.program_counter = advance_pc(pc_at, own_width);
            }

            Instruction::OpF000 { nnnn } => {
                self.registers.index = nnnn;
                self.registers.program_counter = pc_at.wrapping_add(4);
            }
            Instruction::OpFX01 { x: plane_mask } => {
                self.require_xo_chip(0xF001 | ((plane_mask as u16) << 8))?;
                self.display.select_planes(plane_mask as u8 & (PLANE_1 | PLANE_2));
                self.registers.program_counter = advance_pc(pc_at, own_width);
            }
            Instruction::OpFX02 => {
                self.require_xo_chip(0xF002)?;
                let pattern: [u8; 16] = {
                    let bytes = self.memory.read_bytes(self.registers.index as usize, 16)?;
                    let mut buf = [0u8; 16];
                    buf.copy_from_slice(bytes);
                    buf
                };
                self.audio.set_pattern(&pattern);
                self.registers.program_counter = advance_pc(pc_at, own_width);
            }
            Instruction::OpFX07 { x } => {
                self.registers.variable[x] = self.timers.delay;
                self.registers.program_counter = advance_pc(pc_at, own_width);
            }
            Instruction::OpFX0A { x } => {
                if let Some(keys) = self.keys.get_keys_pressed() {
                    self.registers.variable[x] = keys[0];
                    self.registers.program_counter = advance_pc(pc_at, own_width);
                } else {
                    outcome.advance = false;
                }
            }
            Instruction::OpFX15 { x } => {
                self.timers.delay = self.registers.variable[x];
                self.registers.program_counter = advance_pc(pc_at, own_width);
            }
            Instruction::OpFX18 { x } => {
                self.timers.sound = self.registers.variable[x];
                self.registers.program_counter = advance_pc(pc_at, own_width);
            }
            Instruction::OpFX1E { x } => {
                self.registers.index = self.registers.index.wrapping_add(self.registers.variable[x] as u16);
                self.registers.program_counter = advance_pc(pc_at, own_width);
            }
            Instruction::OpFX29 { x } => {
                self.registers.index = self.memory.font_glyph_address(self.registers.variable[x], false) as u16;
                self.registers.program_counter = advance_pc(pc_at, own_width);
            }
            Instruction::OpFX30 { x } => {
                self.require_high_resolution(0xF030)?;
                self.registers.index = self.memory.font_glyph_address(self.registers.variable[x], true) as u16;
                self.registers.program_counter = advance_pc(pc_at, own_width);
            }
            Instruction::OpFX33 { x } => {
                let value: u8 = self.registers.variable[x];
                let base: usize = self.registers.index as usize;
                let digits: [u8; 3] = [value / 100, (value / 10) % 10, value % 10];
                for (offset, digit) in digits.iter().enumerate() {
                    self.memory.write_byte(base + offset, *digit)?;
                    if self.memory.is_code_region(base + offset) {
                        outcome.self_modified = true;
                    }
                }
                self.registers.program_counter = advance_pc(pc_at, own_width);
            }
            Instruction::OpFX3A { x } => {
                self.require_xo_chip(0xF03A)?;
                self.audio.set_pitch(self.registers.variable[x]);
                self.registers.program_counter = advance_pc(pc_at, own_width);
            }
            Instruction::OpFX55 { x } => {
                let base: u16 = self.registers.index;
                for offset in 0..=x {
                    let address: usize = base as usize + offset;
                    self.memory.write_byte(address, self.registers.variable[offset])?;
                    if self.memory.is_code_region(address) {
                        outcome.self_modified = true;
                    }
                }
                self.registers.index = self.next_index_after_memory_op(base, x);
                self.registers.program_counter = advance_pc(pc_at, own_width);
            }
            Instruction::OpFX65 { x } => {
                let base: u16 = self.registers.index;
                for offset in 0..=x {
                    self.registers.variable[offset] = self.memory.read_byte(base as usize + offset)?;
                }
                self.registers.index = self.next_index_after_memory_op(base, x);
                self.registers.program_counter = advance_pc(pc_at, own_width);
            }
            Instruction::OpFX75 { x } => {
                self.require_high_resolution(0xF075)?;
                self.require_rpl_index_in_range(x)?;
                for offset in 0..=x {
                    self.registers.rpl[offset] = self.registers.variable[offset];
                }
                self.registers.program_counter = advance_pc(pc_at, own_width);
            }
            Instruction::OpFX85 { x } => {
                self.require_high_resolution(0xF085)?;
                self.require_rpl_index_in_range(x)?;
                for offset in 0..=x {
                    self.registers.variable[offset] = self.registers.rpl[offset];
                }
                self.registers.program_counter = advance_pc(pc_at, own_width);
            }
        }
        Ok(outcome)
    }

    /// Sets the program counter for a `CondAdvance` instruction: past its own width if not
    /// taken, or additionally past `skip_width` (the following instruction's width, 2 or 4) if
    /// taken, so a taken skip clears a following XO-CHIP F000 double-wide as a unit.
    fn advance_with_skip(&mut self, pc_at: u16, own_width: u16, skip_width: u16, taken: bool) {
        let extra: u16 = if taken { skip_width } else { 0 };
        self.registers.program_counter = pc_at.wrapping_add(own_width).wrapping_add(extra);
    }

    /// Returns the ascending run of register indices from `x` to `y` inclusive, regardless of
    /// whether `x <= y` (5XY2/5XY3 support both ascending and descending ranges).
    fn register_range(x: usize, y: usize) -> Vec<usize> {
        if x <= y {
            (x..=y).collect()
        } else {
            (y..=x).rev().collect()
        }
    }

    /// Computes the value I should hold after an FX55/FX65 memory transfer, honoring the two
    /// mutually-distinguishing quirks (`memory_leave_i_unchanged` takes precedence over
    /// `memory_increment_by_x`; the canonical behavior advances by `x + 1`).
    fn next_index_after_memory_op(&self, base: u16, x: usize) -> u16 {
        if self.quirks.memory_leave_i_unchanged {
            base
        } else if self.quirks.memory_increment_by_x {
            base.wrapping_add(x as u16)
        } else {
            base.wrapping_add(x as u16 + 1)
        }
    }

    fn require_high_resolution(&self, opcode: u16) -> Result<(), ErrorDetail> {
        if self.supports_high_resolution {
            Ok(())
        } else {
            Err(ErrorDetail::UnknownInstruction { opcode })
        }
    }

    fn require_xo_chip(&self, opcode: u16) -> Result<(), ErrorDetail> {
        if self.supports_xo_chip {
            Ok(())
        } else {
            Err(ErrorDetail::UnknownInstruction { opcode })
        }
    }

    fn require_rpl_index_in_range(&self, x: usize) -> Result<(), ErrorDetail> {
        if x <= 7 {
            Ok(())
        } else {
            let mut operands = std::collections::HashMap::new();
            operands.insert("x".to_string(), x);
            Err(ErrorDetail::OperandsOutOfBounds { operands })
        }
    }

    /// Draws the DXYN sprite across every currently-selected plane, each plane reading from its
    /// own successive chunk of memory starting at I (I itself is left unchanged overall), and
    /// returns whether any plane reported a collision.
    fn execute_draw(&mut self, x: usize, y: usize, n: u8) -> Result<bool, ErrorDetail> {
        let vx: usize = self.registers.variable[x] as usize;
        let vy: usize = self.registers.variable[y] as usize;
        let width: usize = if n == 0 { 32 } else { n as usize };
        let wrap: bool = self.quirks.wrap;
        let selected: u8 = self.display.selected_planes();
        let mut pointer: usize = self.registers.index as usize;
        let mut any_collision: bool = false;
        for plane in 0..2usize {
            if selected & (1 << plane) == 0 {
                continue;
            }
            let sprite: &[u8] = self.memory.read_bytes(pointer, width)?;
            let collided: bool = if n == 0 {
                self.display.draw_sprite_16x16(plane, vx, vy, sprite, wrap)
            } else {
                self.display.draw_sprite(plane, vx, vy, sprite, wrap)
            };
            any_collision |= collided;
            pointer += width;
        }
        self.registers.variable[0xF] = if any_collision { 1 } else { 0 };
        Ok(true)
    }
}
