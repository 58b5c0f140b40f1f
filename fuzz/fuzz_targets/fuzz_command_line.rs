//! Fuzz target: `console::parse_command`
//!
//! Drives arbitrary byte sequences through the console command parser and
//! asserts that it never panics and that every accepted command satisfies
//! the documented argument ranges.
//!
//! cargo fuzz run fuzz_command_line

#![no_main]

use drumdrive::app::commands::DriveCommand;
use drumdrive::console::parse_command;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(line) = core::str::from_utf8(data) else {
        return;
    };

    if let Ok(cmd) = parse_command(line) {
        match cmd {
            DriveCommand::SetPower(p) => assert!(p <= 100, "power out of range"),
            DriveCommand::SetSpeed(_) | DriveCommand::Boost(_) => {}
        }
    }
});
