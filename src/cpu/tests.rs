use super::cached::CachedCpu;
use super::pure::PureCpu;
use super::*;
use crate::instruction::Instruction;
use crate::memory::Memory;
use crate::platform::Platform;
use crate::quirks::Quirks;

/// Skip-over-F000: V3=0x44, memory = 33 44 F0 00 11 11. The 3XNN skip is taken, and since the
/// following opcode is the XO-CHIP double-wide prefix, `fetch_and_decode` must compute a
/// skip width of 4 so the taken skip clears the whole two-word F000 instruction as a unit.
#[test]
fn test_fetch_and_decode_computes_four_byte_skip_before_f000() {
    let mut memory: Memory = Memory::new(Platform::XoChip);
    memory.load_program(0x200, &[0x33, 0x44, 0xF0, 0x00, 0x11, 0x11]).unwrap();
    let op = super::fetch_and_decode(&memory, 0x200).unwrap();
    assert_eq!(op.instruction, Instruction::Op3XNN { x: 3, nn: 0x44 });
    assert_eq!(op.skip_width, 4);

    let mut state: CpuState = CpuState::new(memory, Quirks::xochip(), 0x200, true, true);
    state.registers.variable[3] = 0x44;
    state.execute(0x200, op).unwrap();
    assert_eq!(state.registers.program_counter, 0x206);
}

/// Self-modify invalidation (§8 scenario 6): a block built for address 0x210 runs once using
/// its original bytes; the ROM then overwrites those bytes via FX55 while I points into that
/// same code region, and jumps back. The cached engine must not replay the stale block — the
/// rebuilt block must reflect the newly-written instruction.
#[test]
fn test_self_modified_block_is_rebuilt_from_new_bytes_on_rejump() {
    let mut rom: Vec<u8> = vec![0x00; 0x2A];
    rom[0x00] = 0x12;
    rom[0x01] = 0x10; // 0x200: 1210        jump to 0x210
    rom[0x10] = 0x62;
    rom[0x11] = 0xAA; // 0x210: 62AA        V2 = 0xAA (original instruction at 0x210)
    rom[0x12] = 0x12;
    rom[0x13] = 0x20; // 0x212: 1220        jump to 0x220
    rom[0x20] = 0x60;
    rom[0x21] = 0x63; // 0x220: 6063        V0 = 0x63
    rom[0x22] = 0x61;
    rom[0x23] = 0x05; // 0x222: 6105        V1 = 0x05
    rom[0x24] = 0xA2;
    rom[0x25] = 0x10; // 0x224: A210        I = 0x210
    rom[0x26] = 0xF1;
    rom[0x27] = 0x55; // 0x226: F155        write V0,V1 to I,I+1 (overwrites 0x210/0x211)
    rom[0x28] = 0x12;
    rom[0x29] = 0x10; // 0x228: 1210        jump back to 0x210

    let mut memory: Memory = Memory::new(Platform::OriginalChip8);
    memory.load_program(0x200, &rom).unwrap();
    let mut cpu: CachedCpu = CachedCpu::new(memory, Quirks::original_chip8(), 0x200, false, false);

    for _ in 0..10 {
        cpu.execute_next_op().unwrap();
    }

    // V2 was only ever set by the *original* 0x210 instruction, and must not run again.
    assert_eq!(cpu.state().registers.variable[2], 0xAA);
    // V3 is only set by the *rebuilt* 0x210 instruction (now 63 05, i.e. V3 = 0x05), proving
    // the cached engine re-decoded the overwritten bytes rather than replaying the stale block.
    assert_eq!(cpu.state().registers.variable[3], 0x05);
}

fn setup_state() -> CpuState {
    CpuState::new(Memory::new(Platform::OriginalChip8), Quirks::original_chip8(), 0x200, false, false)
}

fn bound(instruction: Instruction) -> BoundOp {
    BoundOp { instruction, skip_width: 2 }
}

#[test]
fn test_6xnn_sets_register_and_advances_pc() {
    let mut state: CpuState = setup_state();
    let outcome = state.execute(0x200, bound(Instruction::Op6XNN { x: 3, nn: 0x42 })).unwrap();
    assert_eq!(state.registers.variable[3], 0x42);
    assert_eq!(state.registers.program_counter, 0x202);
    assert!(outcome.advance);
    assert!(!outcome.is_jump);
}

#[test]
fn test_8xy4_sets_carry_on_overflow() {
    let mut state: CpuState = setup_state();
    state.registers.variable[0] = 0xFF;
    state.registers.variable[1] = 0x02;
    state.execute(0x200, bound(Instruction::Op8XY4 { x: 0, y: 1 })).unwrap();
    assert_eq!(state.registers.variable[0], 0x01);
    assert_eq!(state.registers.variable[0xF], 1);
}

#[test]
fn test_8xye_shifts_out_of_vx_when_shift_quirk_set() {
    let mut state: CpuState = setup_state();
    state.quirks.shift = true;
    state.registers.variable[2] = 0b1000_0001;
    state.execute(0x200, bound(Instruction::Op8XYE { x: 2, y: 5 })).unwrap();
    assert_eq!(state.registers.variable[2], 0b0000_0010);
    assert_eq!(state.registers.variable[0xF], 1);
}

#[test]
fn test_8xye_shifts_out_of_vy_when_shift_quirk_clear() {
    let mut state: CpuState = setup_state();
    state.quirks.shift = false;
    state.registers.variable[5] = 0b1000_0001;
    state.execute(0x200, bound(Instruction::Op8XYE { x: 2, y: 5 })).unwrap();
    assert_eq!(state.registers.variable[2], 0b0000_0010);
    assert_eq!(state.registers.variable[0xF], 1);
}

/// Subroutine call/return: 2NNN pushes the address immediately following itself (the standard
/// return address), and 00EE pops that value back into the program counter verbatim.
#[test]
fn test_subroutine_call_then_return() {
    let mut state: CpuState = setup_state();
    state.registers.program_counter = 0x200;
    let call_outcome = state.execute(0x200, bound(Instruction::Op2NNN { nnn: 0x300 })).unwrap();
    assert!(call_outcome.is_jump);
    assert_eq!(state.registers.program_counter, 0x300);

    let return_outcome = state.execute(0x300, bound(Instruction::Op00EE)).unwrap();
    assert!(return_outcome.is_jump);
    assert_eq!(state.registers.program_counter, 0x202);
}

#[test]
fn test_skip_taken_over_double_wide_clears_both_words() {
    let mut state: CpuState = setup_state();
    state.registers.variable[0] = 5;
    let op = BoundOp { instruction: Instruction::Op3XNN { x: 0, nn: 5 }, skip_width: 4 };
    state.execute(0x200, op).unwrap();
    assert_eq!(state.registers.program_counter, 0x206);
}

#[test]
fn test_skip_not_taken_advances_by_own_width_only() {
    let mut state: CpuState = setup_state();
    state.registers.variable[0] = 9;
    let op = BoundOp { instruction: Instruction::Op3XNN { x: 0, nn: 5 }, skip_width: 4 };
    state.execute(0x200, op).unwrap();
    assert_eq!(state.registers.program_counter, 0x202);
}

#[test]
fn test_fx0a_blocks_until_key_pressed() {
    let mut state: CpuState = setup_state();
    let outcome = state.execute(0x200, bound(Instruction::OpFX0A { x: 0 })).unwrap();
    assert!(!outcome.advance);
    assert_eq!(state.registers.program_counter, 0x200);

    state.keys.set_key_status(0x7, true).unwrap();
    let outcome = state.execute(0x200, bound(Instruction::OpFX0A { x: 0 })).unwrap();
    assert!(outcome.advance);
    assert_eq!(state.registers.variable[0], 0x7);
    assert_eq!(state.registers.program_counter, 0x202);
}

#[test]
fn test_fx55_flags_self_modification_when_writing_into_code_region() {
    let mut memory: Memory = Memory::new(Platform::OriginalChip8);
    memory.load_program(0x200, &[0x00, 0x00]).unwrap();
    let mut state: CpuState = CpuState::new(memory, Quirks::original_chip8(), 0x200, false, false);
    state.registers.index = 0x200;
    let outcome = state.execute(0x200, bound(Instruction::OpFX55 { x: 0 })).unwrap();
    assert!(outcome.self_modified);
}

#[test]
fn test_jump_within_code_region_is_not_self_modifying() {
    let mut memory: Memory = Memory::new(Platform::OriginalChip8);
    memory.load_program(0x200, &[0x00, 0x00, 0x00, 0x00]).unwrap();
    let mut state: CpuState = CpuState::new(memory, Quirks::original_chip8(), 0x200, false, false);
    let outcome = state.execute(0x200, bound(Instruction::Op1NNN { nnn: 0x200 })).unwrap();
    assert!(!outcome.self_modified);
}

#[test]
fn test_jump_into_ram_region_is_flagged_self_modifying() {
    let mut memory: Memory = Memory::new(Platform::OriginalChip8);
    memory.load_program(0x200, &[0x00, 0x00]).unwrap();
    let mut state: CpuState = CpuState::new(memory, Quirks::original_chip8(), 0x200, false, false);
    let outcome = state.execute(0x200, bound(Instruction::Op1NNN { nnn: 0x202 })).unwrap();
    assert!(outcome.self_modified);
}

#[test]
fn test_dxyn_draws_and_reports_collision() {
    let mut memory: Memory = Memory::new(Platform::OriginalChip8);
    memory.load_program(0x200, &[0x00, 0x00]).unwrap();
    let mut state: CpuState = CpuState::new(memory, Quirks::original_chip8(), 0x200, false, false);
    state.memory.write_byte(0x300, 0xFF).unwrap();
    state.registers.index = 0x300;
    let outcome = state.execute(0x200, bound(Instruction::OpDXYN { x: 0, y: 1, n: 1 })).unwrap();
    assert!(outcome.draw);
    assert_eq!(state.registers.variable[0xF], 0);

    let outcome = state.execute(0x200, bound(Instruction::OpDXYN { x: 0, y: 1, n: 1 })).unwrap();
    assert!(outcome.draw);
    assert_eq!(state.registers.variable[0xF], 1);
}

#[test]
fn test_00fd_requires_high_resolution_support() {
    let mut state: CpuState = setup_state();
    let result = state.execute(0x200, bound(Instruction::Op00FD));
    assert!(result.is_err());
}

#[test]
fn test_f000_sets_index_and_advances_by_four() {
    let mut state: CpuState = setup_state();
    state.supports_xo_chip = true;
    state.execute(0x200, bound(Instruction::OpF000 { nnnn: 0x1234 })).unwrap();
    assert_eq!(state.registers.index, 0x1234);
    assert_eq!(state.registers.program_counter, 0x204);
}

#[test]
fn test_fx55_fx65_honour_memory_increment_quirk() {
    let mut state: CpuState = setup_state();
    state.quirks.memory_increment_by_x = true;
    state.quirks.memory_leave_i_unchanged = false;
    state.registers.index = 0x300;
    state.execute(0x200, bound(Instruction::OpFX55 { x: 3 })).unwrap();
    assert_eq!(state.registers.index, 0x303);
}

#[test]
fn test_fx55_fx65_honour_leave_i_unchanged_quirk() {
    let mut state: CpuState = setup_state();
    state.quirks.memory_leave_i_unchanged = true;
    state.registers.index = 0x300;
    state.execute(0x200, bound(Instruction::OpFX55 { x: 3 })).unwrap();
    assert_eq!(state.registers.index, 0x300);
}

/// Property test: for any short program with no blocking instruction, the cached and pure
/// engines reach identical observable state after running it to completion.
#[test]
fn test_cached_and_pure_engines_agree_on_observable_state() {
    let program: [u8; 8] = [0x60, 0x05, 0x61, 0x03, 0x80, 0x14, 0xA3, 0x00];

    let mut cached_memory: Memory = Memory::new(Platform::OriginalChip8);
    cached_memory.load_program(0x200, &program).unwrap();
    let mut cached: CachedCpu = CachedCpu::new(cached_memory, Quirks::original_chip8(), 0x200, false, false);

    let mut pure_memory: Memory = Memory::new(Platform::OriginalChip8);
    pure_memory.load_program(0x200, &program).unwrap();
    let mut pure: PureCpu = PureCpu::new(pure_memory, Quirks::original_chip8(), 0x200, false, false);

    for _ in 0..4 {
        cached.execute_next_op().unwrap();
        pure.execute_next_op().unwrap();
    }

    assert_eq!(cached.state().registers.variable, pure.state().registers.variable);
    assert_eq!(cached.state().registers.index, pure.state().registers.index);
    assert_eq!(cached.state().registers.program_counter, pure.state().registers.program_counter);
}
