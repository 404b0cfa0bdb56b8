use crate::error::ErrorDetail;
use crate::platform::Platform;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// The default CHIP-8 program start address within memory.
const DEFAULT_PROGRAM_ADDRESS: u16 = 0x200;

/// Selects which of the two execution engines an [Emulator](crate::Emulator) should use.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum InterpreterKind {
    /// The straightforward fetch-decode-execute engine, with no caching.
    Pure,
    /// The basic-block-caching engine.
    Cached,
}

impl Default for InterpreterKind {
    fn default() -> Self {
        InterpreterKind::Cached
    }
}

/// A struct to allow specification of Chipwright start-up parameters, serialisable to and
/// from JSON so a hosting application can persist a user's preferred configuration.
///
/// Chipwright provides several configurable options: which historic [Platform] to emulate
/// (which fixes the active quirks and default tickrate), which execution engine to use, an
/// optional override of the platform's default tickrate, and the memory address at which the
/// ROM is loaded.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Options {
    pub platform: Platform,
    pub interpreter_kind: InterpreterKind,
    pub tickrate_override_hertz: Option<u64>,
    pub program_start_address: u16,
}

impl Options {
    /// Returns the tickrate (operations executed per simulated video frame) that should be
    /// used: the override if one is set, otherwise the active platform's default.
    pub fn tickrate(&self) -> u64 {
        self.tickrate_override_hertz
            .unwrap_or_else(|| self.platform.tickrate())
    }

    /// Loads an [Options] instance from a JSON file at the given path.
    ///
    /// # Arguments
    ///
    /// * `path` - the path of the JSON file to read
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ErrorDetail> {
        let contents: String = fs::read_to_string(&path).map_err(|_| ErrorDetail::FileError {
            file_path: path.as_ref().to_string_lossy().into_owned(),
        })?;
        serde_json::from_str(&contents).map_err(|_| ErrorDetail::FileError {
            file_path: path.as_ref().to_string_lossy().into_owned(),
        })
    }

    /// Serialises this [Options] instance to a JSON file at the given path.
    ///
    /// # Arguments
    ///
    /// * `path` - the path of the JSON file to write
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ErrorDetail> {
        let contents: String = serde_json::to_string_pretty(self).map_err(|_| ErrorDetail::FileError {
            file_path: path.as_ref().to_string_lossy().into_owned(),
        })?;
        fs::write(&path, contents).map_err(|_| ErrorDetail::FileError {
            file_path: path.as_ref().to_string_lossy().into_owned(),
        })
    }
}

impl Default for Options {
    /// Constructor that returns an [Options] instance using typical default settings:
    /// original COSMAC VIP CHIP-8, the cached engine, no tickrate override.
    fn default() -> Self {
        Options {
            platform: Platform::OriginalChip8,
            interpreter_kind: InterpreterKind::Cached,
            tickrate_override_hertz: None,
            program_start_address: DEFAULT_PROGRAM_ADDRESS,
        }
    }
}
