use std::{error::Error, path::Path};

use test_utils::{check_interpretation, Expected};

const SRC_PATH: &str = "./demos/scope_shadowing.cmm";
const EXPECTED: Expected = Expected {
    stdout: "2 1 ",
    stderr: "",
};

#[test]
fn inner_block_declaration_shadows_outer_and_then_falls_away() -> Result<(), Box<dyn Error>> {
    check_interpretation(Path::new(SRC_PATH), EXPECTED)
}
