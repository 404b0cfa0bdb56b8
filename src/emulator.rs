use crate::audio::{Audio, PATTERN_BUFFER_SIZE};
use crate::cpu::{CachedCpu, CpuState, PureCpu};
use crate::display::Display;
use crate::error::{ErrorDetail, RuntimeError};
use crate::memory::Memory;
use crate::options::{InterpreterKind, Options};
use crate::platform::Platform;
use crate::quirks::Quirks;
use crate::registers::Registers;
use crate::stack::Stack;
use crate::timers::Timers;


/// How much state a [StateSnapshot] should carry: just enough to render a frame, or the full
/// picture needed to diagnose a crash.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum StateSnapshotVerbosity {
    /// Only the frame buffer and cycle/program-counter bookkeeping are reported.
    Minimal,
    /// Everything [StateSnapshotVerbosity::Minimal] reports, plus registers, stack and memory.
    Extended,
}

/// The extended portion of a [StateSnapshot], present only when requested at
/// [StateSnapshotVerbosity::Extended].
#[derive(Clone, Debug, PartialEq)]
pub struct ExtendedSnapshotDetail {
    pub registers: Registers,
    pub stack: Stack,
    pub memory: Memory,
    pub timers: Timers,
}

/// A point-in-time copy of [Emulator] state, returned to a hosting application either for
/// diagnostic purposes (wrapped inside a [RuntimeError]) or on direct request.
///
/// `cycles` and `program_counter` are always present as plain fields (rather than nested inside
/// an enum variant) so a host, or the [RuntimeError] display implementation, can read them
/// without first matching on verbosity.
#[derive(Clone, Debug, PartialEq)]
pub struct StateSnapshot {
    pub cycles: usize,
    pub program_counter: u16,
    pub display: Display,
    pub detail: Option<ExtendedSnapshotDetail>,
}

/// Either of the two CPU execution engines, behind one enum so [Emulator] can hold whichever
/// was configured without resorting to a trait object. Both variants implement the CPU
/// interface identically in shape (see `cpu.rs`); this just forwards to whichever is active.
#[derive(Clone, Debug)]
enum Engine {
    Pure(PureCpu),
    Cached(CachedCpu),
}

impl Engine {
    fn state(&self) -> &CpuState {
        match self {
            Engine::Pure(cpu) => cpu.state(),
            Engine::Cached(cpu) => cpu.state(),
        }
    }

    fn state_mut(&mut self) -> &mut CpuState {
        match self {
            Engine::Pure(cpu) => cpu.state_mut(),
            Engine::Cached(cpu) => cpu.state_mut(),
        }
    }

    fn execute_next_op(&mut self) -> Result<(), ErrorDetail> {
        match self {
            Engine::Pure(cpu) => cpu.execute_next_op(),
            Engine::Cached(cpu) => cpu.execute_next_op(),
        }
    }

    fn draw_occurred(&self) -> bool {
        match self {
            Engine::Pure(cpu) => cpu.draw_occurred(),
            Engine::Cached(cpu) => cpu.draw_occurred(),
        }
    }

    fn copy_state(&self, other: &mut Self) {
        match (self, other) {
            (Engine::Pure(src), Engine::Pure(dst)) => src.copy_state(dst),
            (Engine::Cached(src), Engine::Cached(dst)) => src.copy_state(dst),
            _ => unreachable!("an Emulator's engine variant never changes after construction"),
        }
    }
}

/// Top-level entry point to the Chipwright crate: wires the CPU, memory, display, audio and
/// timers together, and drives them one simulated video frame at a time via
/// [Emulator::process_frame].
///
/// An [Emulator] owns every piece of mutable CHIP-8 state; a hosting application interacts with
/// it purely through this type's public methods, and never touches the underlying components
/// directly.
pub struct Emulator {
    engine: Engine,
    quirks: Quirks,
    tickrate: u64,
    cycles: usize,
    blit_cb: Option<Box<dyn FnMut(&[[u8; 128]; 64])>>,
    sound_cb: Option<Box<dyn FnMut(&[u8; PATTERN_BUFFER_SIZE], u8)>>,
}

impl Emulator {
    /// Constructs a new [Emulator] for the given platform and interpreter engine, with the ROM
    /// load address fixed at the conventional 0x200.
    ///
    /// A `tickrate` of zero means "use the platform's default"; `quirks`, if supplied,
    /// overrides the platform's default quirk preset entirely rather than merging with it.
    pub fn new(
        platform: Platform,
        interpreter_kind: InterpreterKind,
        tickrate: u64,
        quirks: Option<Quirks>,
    ) -> Self {
        Emulator::with_program_start_address(
            platform,
            interpreter_kind,
            tickrate,
            quirks,
            Options::default().program_start_address,
        )
    }

    fn with_program_start_address(
        platform: Platform,
        interpreter_kind: InterpreterKind,
        tickrate: u64,
        quirks: Option<Quirks>,
        program_start_address: u16,
    ) -> Self {
        let quirks: Quirks = quirks.unwrap_or_else(|| platform.quirks());
        let memory: Memory = Memory::new(platform);
        let supports_high_resolution: bool = platform.supports_high_resolution();
        let supports_xo_chip: bool = platform.supports_xo_chip();
        let engine: Engine = match interpreter_kind {
            InterpreterKind::Pure => Engine::Pure(PureCpu::new(
                memory,
                quirks,
                program_start_address,
                supports_high_resolution,
                supports_xo_chip,
            )),
            InterpreterKind::Cached => Engine::Cached(CachedCpu::new(
                memory,
                quirks,
                program_start_address,
                supports_high_resolution,
                supports_xo_chip,
            )),
        };
        let tickrate: u64 = if tickrate == 0 { platform.tickrate() } else { tickrate };
        Emulator {
            engine,
            quirks,
            tickrate,
            cycles: 0,
            blit_cb: None,
            sound_cb: None,
        }
    }

    /// Constructs an [Emulator] from an [Options] instance (platform, interpreter engine,
    /// optional tickrate override, and program start address).
    pub fn from_options(options: Options) -> Self {
        Emulator::with_program_start_address(
            options.platform,
            options.interpreter_kind,
            options.tickrate(),
            None,
            options.program_start_address,
        )
    }

    /// Copies `bytes` into memory starting at the configured program start address (0x200 by
    /// default), and marks everything from there to the end of the ROM as code for the
    /// purposes of self-modification detection.
    pub fn load_rom(&mut self, bytes: &[u8]) -> Result<(), ErrorDetail> {
        let start_address: u16 = self.engine.state().registers.program_counter;
        self.engine.state_mut().memory.load_program(start_address, bytes)
    }

    /// Sets the pressed/not-pressed state of the given key (0x0 to 0xF inclusive).
    pub fn set_key_state(&mut self, key: u8, pressed: bool) -> Result<(), ErrorDetail> {
        self.engine.state_mut().keys.set_key_status(key, pressed)
    }

    /// Clears every key to the not-pressed state.
    pub fn clear_keys(&mut self) {
        for key in 0..16 {
            let _ = self.engine.state_mut().keys.set_key_status(key, false);
        }
    }

    /// Returns the RPL user flag registers as a 16-byte array, for a hosting application to
    /// persist between ROM runs on HP48-derived platforms (§6).
    pub fn export_rpl_flags(&self) -> [u8; crate::registers::RPL_REGISTER_COUNT] {
        self.engine.state().registers.export_rpl_flags()
    }

    /// Restores the RPL user flag registers from a previously exported 16-byte array.
    pub fn import_rpl_flags(&mut self, bytes: &[u8]) -> Result<(), ErrorDetail> {
        self.engine.state_mut().registers.import_rpl_flags(bytes)
    }

    /// Registers a callback invoked with the composed 64-row, 128-column colour index buffer
    /// whenever a frame's execution left the display dirty.
    pub fn set_blit_cb(&mut self, callback: impl FnMut(&[[u8; 128]; 64]) + 'static) {
        self.blit_cb = Some(Box::new(callback));
    }

    /// Registers a callback invoked once per frame, while the sound timer is active, with the
    /// current audio pattern bytes and pitch register value.
    pub fn set_sound_cb(&mut self, callback: impl FnMut(&[u8; PATTERN_BUFFER_SIZE], u8) + 'static) {
        self.sound_cb = Some(Box::new(callback));
    }

    /// Returns the composed 64-row, 128-column colour index buffer (§6), regardless of the
    /// active display resolution: low-resolution pixels are returned pre-scaled to 2x2 blocks.
    pub fn screen_buffer(&self) -> [[u8; 128]; 64] {
        self.compose_screen_buffer()
    }

    fn compose_screen_buffer(&self) -> [[u8; 128]; 64] {
        let display: &Display = &self.engine.state().display;
        let mut buffer: [[u8; 128]; 64] = [[0u8; 128]; 64];
        for (y, row) in buffer.iter_mut().enumerate() {
            for (x, pixel) in row.iter_mut().enumerate() {
                *pixel = display.pixel(x, y);
            }
        }
        buffer
    }

    /// Executes up to one frame's worth of operations (§4.7): runs at most `tickrate` ops,
    /// stopping early if the vblank quirk is set and a draw has already occurred this frame,
    /// decrements the timers, invokes the sound callback while the sound timer is active, and
    /// flushes the display through the blit callback if anything was drawn.
    ///
    /// `ExitInterpreter` and any other fatal [ErrorDetail] propagate wrapped in a
    /// [RuntimeError] carrying a snapshot of state at the moment of failure.
    pub fn process_frame(&mut self) -> Result<(), RuntimeError> {
        let mut frame_drew: bool = false;
        for _ in 0..self.tickrate {
            match self.engine.execute_next_op() {
                Ok(()) => {}
                Err(inner_error) => {
                    let state_snapshot_dump: StateSnapshot =
                        self.export_state_snapshot(StateSnapshotVerbosity::Extended);
                    return Err(RuntimeError { state_snapshot_dump, inner_error });
                }
            }
            self.cycles += 1;
            if self.engine.draw_occurred() {
                frame_drew = true;
                if self.quirks.vblank {
                    break;
                }
            }
        }

        if self.engine.state().timers.delay > 0 {
            self.engine.state_mut().timers.tick_delay();
        }
        if self.engine.state().timers.sound > 0 {
            if let Some(sound_cb) = self.sound_cb.as_mut() {
                let audio: &Audio = &self.engine.state().audio;
                sound_cb(audio.pattern(), audio.pitch());
            }
            self.engine.state_mut().timers.tick_sound();
        }

        if frame_drew && self.blit_cb.is_some() {
            let buffer: [[u8; 128]; 64] = self.compose_screen_buffer();
            (self.blit_cb.as_mut().expect("checked above"))(&buffer);
        }
        Ok(())
    }

    /// Returns a snapshot of the current emulator state at the requested verbosity (§4.7, §5).
    pub fn export_state_snapshot(&self, verbosity: StateSnapshotVerbosity) -> StateSnapshot {
        let state: &CpuState = self.engine.state();
        let detail: Option<ExtendedSnapshotDetail> = match verbosity {
            StateSnapshotVerbosity::Minimal => None,
            StateSnapshotVerbosity::Extended => Some(ExtendedSnapshotDetail {
                registers: state.registers.clone(),
                stack: state.stack.clone(),
                memory: state.memory.clone(),
                timers: state.timers.clone(),
            }),
        };
        StateSnapshot {
            cycles: self.cycles,
            program_counter: state.registers.program_counter,
            display: state.display.clone(),
            detail,
        }
    }

    /// Returns a deep, independent copy of this [Emulator]'s mutable state (§5): every register,
    /// the stack, memory, timers, keys, display and audio pattern are copied so the clone can
    /// execute forward without affecting the original. Decoder caches are not copied verbatim;
    /// the clone rebuilds its own as it runs (see [CachedCpu::copy_state]).
    ///
    /// Callbacks are not cloned: a snapshot intended for rewind has no use for the original's
    /// blit/sound callbacks, and a host wanting them re-attaches its own.
    pub fn snapshot(&self) -> Self {
        let mut engine: Engine = match &self.engine {
            Engine::Pure(cpu) => Engine::Pure(PureCpu::new(
                Memory::new(Platform::OriginalChip8),
                self.quirks,
                0,
                cpu.state().supports_high_resolution,
                cpu.state().supports_xo_chip,
            )),
            Engine::Cached(cpu) => Engine::Cached(CachedCpu::new(
                Memory::new(Platform::OriginalChip8),
                self.quirks,
                0,
                cpu.state().supports_high_resolution,
                cpu.state().supports_xo_chip,
            )),
        };
        self.engine.copy_state(&mut engine);
        Emulator {
            engine,
            quirks: self.quirks,
            tickrate: self.tickrate,
            cycles: self.cycles,
            blit_cb: None,
            sound_cb: None,
        }
    }
}
