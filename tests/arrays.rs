use std::{error::Error, path::Path};

use test_utils::{check_interpretation, Expected};

const SRC_PATH: &str = "./demos/arrays.cmm";
const EXPECTED: Expected = Expected {
    stdout: "10 20 30 ",
    stderr: "",
};

#[test]
fn array_assignment_and_indexed_read_round_trip() -> Result<(), Box<dyn Error>> {
    check_interpretation(Path::new(SRC_PATH), EXPECTED)
}
