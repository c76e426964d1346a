//! This crate drives a small stack-machine CPU that exposes no bus to the
//! host: only seven single-bit control lines, two single-bit status lines,
//! and a shared clock.  At the lowest level, the `Lines` trait models that
//! signal interface, with backends for direct GPIO control via embedded-hal
//! and for FT2232H-based adapters in MPSSE mode.
//!
//! The next level up is the `Driver`, which owns the line protocol: it
//! shifts register values in and out one bit per clock, sequences run/step
//! pulses, and injects single instructions through the target's execute
//! register.  Every wait for the target to come back to its stopped state
//! is bounded by a clock budget, so a wedged target surfaces as an error
//! instead of a hang.
//!
//! Most clients want the `Cpu` handle on top of the driver.  It names the
//! target's registers (program counter, stack pointer, stack top), pushes
//! values onto the data stack, and loads programs.  The target has no
//! direct program-memory write path, so `Cpu` loads code by driving the
//! target through its own store instruction, one word at a time.
//!
//! # Example
//! ```no_run
//! use cpu_probe::cpu::Cpu;
//! use cpu_probe::driver::Driver;
//! use cpu_probe::lines::mpsse::Mpsse;
//!
//! let lines = Mpsse::open("Dual RS232-HS A", 100_000);
//! let drv = Driver::new(Box::new(lines));
//! let mut cpu = Cpu::new(drv);
//!
//! cpu.load_program(&[b'2', b'3', b'+', b'z'], 0).expect("load");
//! // Start the target and leave it running for clock hand-off.
//! cpu.drv.execute(false).expect("start");
//! ```

#![no_std]

#[cfg(feature = "std")]
extern crate std;

pub mod cpu;
pub mod driver;
pub mod lines;
