//! This provides a higher-level interface than the `Lines` trait.  The
//! `Driver` owns the bit-level protocol: it shifts register values in and
//! out one bit per clock pulse, sequences run and step pulses, and injects
//! single instructions through the target's execute register.  Waits for
//! the target to report itself stopped are bounded by a clock budget.
use core::ops::DerefMut;

use thiserror::Error;

use crate::lines::{Input, Lines, Output};

/// Default number of clock pulses a stop-wait may spend before it is
/// reported as a timeout.
pub const DEFAULT_SPIN_BUDGET: u32 = 65_536;

/// The four registers addressable through the select lines.  Bit 0 of the
/// selector drives `Select0`, bit 1 drives `Select1`.
#[derive(Clone,Copy,PartialEq,Debug)]
pub enum Register {
    ProgramCounter = 0,
    StackPointer = 1,
    Execute = 2,
    StackTop = 3,
}

impl Register {
    fn select0(self) -> bool {
        self as u8 & 1 != 0
    }

    fn select1(self) -> bool {
        self as u8 & 2 != 0
    }
}

/// Run-state of the target, derived from its one status line: low means
/// stopped, high means running.  Some targets gate their clock and call the
/// high level "sleeping"; the line cannot distinguish the two, so both read
/// as `Running` here.
#[derive(Clone,Copy,PartialEq,Debug)]
pub enum RunState {
    Stopped,
    Running,
}

impl RunState {
    fn from_line(level: bool) -> Self {
        if level {
            RunState::Running
        } else {
            RunState::Stopped
        }
    }
}

/// One instruction byte for the target.  Build it from a raw byte, or from
/// a single character whose ordinal value is the opcode.
#[derive(Clone,Copy,PartialEq,Debug)]
pub struct Opcode(pub u8);

impl From<u8> for Opcode {
    fn from(byte: u8) -> Self {
        Opcode(byte)
    }
}

impl TryFrom<char> for Opcode {
    type Error = Error;

    fn try_from(ch: char) -> Result<Self, Error> {
        u8::try_from(ch as u32)
            .map(Opcode)
            .map_err(|_| Error::ValueOutOfRange(ch as u32))
    }
}

#[derive(Clone,Copy,PartialEq,Debug,Error)]
pub enum Error {
    /// An opcode or program address does not fit the target's 8-bit data
    /// path.
    #[error("value {0} does not fit in 8 bits")]
    ValueOutOfRange(u32),
    /// A stop-wait exhausted its clock budget with the target still
    /// running.
    #[error("target still running after {0} clock pulses")]
    ProtocolTimeout(u32),
}

pub struct Driver<T> {
    pub lines: T,
    spin_budget: u32,
}

impl<T, U> Driver<T>
    where T: DerefMut<Target=U>,
          U: Lines + ?Sized
{
    /// Create a driver over existing `Lines`, clearing every control line.
    pub fn new(lines: T) -> Self {
        Self::with_spin_budget(lines, DEFAULT_SPIN_BUDGET)
    }

    /// Like `new`, but with an explicit clock budget for stop-waits.
    pub fn with_spin_budget(mut lines: T, spin_budget: u32) -> Self {
        for line in [Input::Run, Input::Step, Input::Load, Input::Dump,
                     Input::ShiftIn, Input::Select0, Input::Select1] {
            lines.set(line, false);
        }
        Self {
            lines,
            spin_budget,
        }
    }

    /// Sample the status line once.  The state is never cached; every call
    /// reads the line live.
    pub fn run_state(&mut self) -> RunState {
        RunState::from_line(self.lines.get(Output::Status))
    }

    /// Pulse the clock until the target reports itself stopped.  Gives up
    /// with `Error::ProtocolTimeout` once the clock budget is spent.
    pub fn ensure_stopped(&mut self) -> Result<(), Error> {
        for _ in 0..self.spin_budget {
            if self.run_state() == RunState::Stopped {
                return Ok(());
            }
            self.lines.advance();
        }
        Err(Error::ProtocolTimeout(self.spin_budget))
    }

    fn set_select(&mut self, reg: Register) {
        self.lines.set(Input::Select0, reg.select0());
        self.lines.set(Input::Select1, reg.select1());
    }

    /// Shift `value` into the target most-significant bit first, then latch
    /// it into `reg` with a one-clock load strobe.  The target must be
    /// stopped; transactions must not be interleaved.
    pub fn write_reg(&mut self, reg: Register, value: u8) {
        for i in 0..8 {
            self.lines.set(Input::ShiftIn, value & (0x80 >> i) != 0);
            self.lines.advance();
        }
        self.set_select(reg);
        self.lines.set(Input::Load, true);
        self.lines.advance();
        self.lines.set(Input::Load, false);
        self.lines.advance();
    }

    /// Latch `reg` into the target's output shifter with a one-clock dump
    /// strobe, then clock its bits out most-significant first.
    pub fn read_reg(&mut self, reg: Register) -> u8 {
        self.set_select(reg);
        self.lines.set(Input::Dump, true);
        self.lines.advance();
        self.lines.set(Input::Dump, false);
        let mut value = 0;
        for i in 0..8 {
            self.lines.advance();
            value |= (self.lines.get(Output::ShiftOut) as u8) << (7 - i);
        }
        value
    }

    /// Start the target running.  With `wait` the call blocks until the run
    /// completes and the target is stopped again; without it the call
    /// returns right after the run pulse, leaving the target running for
    /// hand-off to a free-running clock.
    pub fn execute(&mut self, wait: bool) -> Result<(), Error> {
        self.ensure_stopped()?;
        self.lines.set(Input::Run, true);
        self.lines.set(Input::Step, false);
        self.lines.advance();
        self.lines.set(Input::Run, false);
        self.lines.advance();
        if wait {
            self.ensure_stopped()?;
        }
        Ok(())
    }

    /// Execute exactly one instruction cycle, verified by waiting for the
    /// stopped state on both sides of the step pulse.
    pub fn single_step(&mut self) -> Result<(), Error> {
        self.ensure_stopped()?;
        self.lines.set(Input::Run, true);
        self.lines.set(Input::Step, true);
        self.lines.advance();
        self.lines.set(Input::Step, false);
        self.lines.set(Input::Run, false);
        self.lines.advance();
        self.ensure_stopped()
    }

    /// Make the target execute `opcode` immediately through its execute
    /// register, bypassing the fetch cycle and leaving stored program
    /// memory untouched.
    pub fn dispatch(&mut self, opcode: Opcode) -> Result<(), Error> {
        self.ensure_stopped()?;
        self.write_reg(Register::Execute, opcode.0);
        self.ensure_stopped()
    }
}
