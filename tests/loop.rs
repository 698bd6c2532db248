use std::{error::Error, path::Path};

use test_utils::{check_interpretation, Expected};

#[test]
fn while_loop_breaks_early() -> Result<(), Box<dyn Error>> {
    check_interpretation(
        Path::new("./demos/loop_break.cmm"),
        Expected {
            stdout: "3 ",
            stderr: "",
        },
    )
}

#[test]
fn empty_for_ever_loop_terminates_via_break() -> Result<(), Box<dyn Error>> {
    check_interpretation(
        Path::new("./demos/forever_with_break.cmm"),
        Expected {
            stdout: "1 ",
            stderr: "",
        },
    )
}
