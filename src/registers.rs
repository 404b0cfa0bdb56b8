/// The number of general-purpose variable registers (V0 through VF).
pub const VARIABLE_REGISTER_COUNT: usize = 16;
/// The number of RPL user flag registers (SUPERCHIP and later).
pub const RPL_REGISTER_COUNT: usize = 16;

/// An abstraction of the CHIP-8 register file: the sixteen general-purpose variable
/// registers, the index register, the program counter, and the RPL flag registers used by
/// the SUPERCHIP FX75/FX85 persistence opcodes.
#[derive(Clone, Debug, PartialEq)]
pub struct Registers {
    /// General-purpose registers V0 through VF. VF additionally serves as a flag register
    /// written by several arithmetic and drawing opcodes.
    pub variable: [u8; VARIABLE_REGISTER_COUNT],
    /// The 16-bit index register, used to address memory for sprite, memory-transfer and
    /// BCD opcodes.
    pub index: u16,
    /// The program counter, pointing at the next opcode to fetch.
    pub program_counter: u16,
    /// The RPL user flag registers, persisted across program runs on the original hardware.
    pub rpl: [u8; RPL_REGISTER_COUNT],
}

impl Registers {
    /// Constructor that returns a [Registers] instance with all registers zeroed, and the
    /// program counter set to the supplied start address.
    ///
    /// # Arguments
    ///
    /// * `program_start_address` - the address at which execution should begin
    pub(crate) fn new(program_start_address: u16) -> Self {
        Registers {
            variable: [0x0; VARIABLE_REGISTER_COUNT],
            index: 0x0,
            program_counter: program_start_address,
            rpl: [0x0; RPL_REGISTER_COUNT],
        }
    }

    /// Returns the RPL user flag registers as a 16-byte array, for persistence by a hosting
    /// application between ROM runs (§6).
    pub fn export_rpl_flags(&self) -> [u8; RPL_REGISTER_COUNT] {
        self.rpl
    }

    /// Restores the RPL user flag registers from a previously exported 16-byte array. Returns
    /// [crate::error::ErrorDetail::OperandsOutOfBounds] if `bytes` is not exactly
    /// [RPL_REGISTER_COUNT] bytes long.
    pub fn import_rpl_flags(&mut self, bytes: &[u8]) -> Result<(), crate::error::ErrorDetail> {
        if bytes.len() != RPL_REGISTER_COUNT {
            let mut operands = std::collections::HashMap::new();
            operands.insert("rpl_flags_len".to_string(), bytes.len());
            return Err(crate::error::ErrorDetail::OperandsOutOfBounds { operands });
        }
        self.rpl.copy_from_slice(bytes);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_zeroes_variable_and_rpl_registers() {
        let registers: Registers = Registers::new(0x200);
        assert_eq!(registers.variable, [0x0; VARIABLE_REGISTER_COUNT]);
        assert_eq!(registers.rpl, [0x0; RPL_REGISTER_COUNT]);
        assert_eq!(registers.index, 0x0);
    }

    #[test]
    fn test_new_sets_program_counter() {
        let registers: Registers = Registers::new(0x300);
        assert_eq!(registers.program_counter, 0x300);
    }

    #[test]
    fn test_rpl_export_import_roundtrip() {
        let mut registers: Registers = Registers::new(0x200);
        let flags: [u8; RPL_REGISTER_COUNT] = [
            0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0x09, 0x0A, 0x0B, 0x0C, 0x0D, 0x0E,
            0x0F, 0x10,
        ];
        registers.import_rpl_flags(&flags).unwrap();
        assert_eq!(registers.export_rpl_flags(), flags);
    }

    #[test]
    fn test_rpl_import_rejects_wrong_length() {
        let mut registers: Registers = Registers::new(0x200);
        assert!(registers.import_rpl_flags(&[0x0; 15]).is_err());
        assert!(registers.import_rpl_flags(&[0x0; 17]).is_err());
    }
}
