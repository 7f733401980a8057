// Drives the real binary through a pseudo terminal, covering terminal setup,
// the crossterm input thread and the reset/quit paths end to end.
//
// Needs a TTY, so it is Unix-only and ignored by default:
// `cargo test --test integration_pty -- --ignored`.

#![cfg(unix)]

use std::time::Duration;

use expectrl::{spawn, Eof};

#[test]
#[ignore]
fn typing_resetting_and_quitting_exit_cleanly() -> Result<(), Box<dyn std::error::Error>> {
    let bin = assert_cmd::cargo::cargo_bin("tempo");
    let cmd = format!("{} -t 60", bin.display());

    let mut p = spawn(cmd)?;

    // let the alternate screen come up before sending keys
    std::thread::sleep(Duration::from_millis(200));

    // start a run, then abandon it with ESC
    p.send("the ")?;
    std::thread::sleep(Duration::from_millis(200));
    p.send("\x1b")?;

    // ctrl-c exits from any screen
    std::thread::sleep(Duration::from_millis(200));
    p.send("\x03")?;

    p.expect(Eof)?;
    Ok(())
}
