mod audio;
mod cpu;
mod display;
mod emulator;
mod error;
mod font;
mod instruction;
mod keys;
mod memory;
mod options;
mod platform;
mod quirks;
mod registers;
mod stack;
mod timers;

// Re-exports
pub use crate::audio::{
    generate_audio_frame, pitch_to_frequency, Audio, DEFAULT_PITCH, PATTERN_BITS,
    PATTERN_BUFFER_SIZE,
};
pub use crate::display::{Display, DISPLAY_HEIGHT, DISPLAY_WIDTH, PLANE_1, PLANE_2};
pub use crate::emulator::{Emulator, ExtendedSnapshotDetail, StateSnapshot, StateSnapshotVerbosity};
pub use crate::error::*;
pub use crate::keys::KeyState;
pub use crate::memory::Memory;
pub use crate::options::{InterpreterKind, Options};
pub use crate::platform::Platform;
pub use crate::quirks::Quirks;
pub use crate::registers::Registers;
pub use crate::stack::Stack;
pub use crate::timers::Timers;
