use std::{error::Error, path::Path};

use test_utils::{check_interpretation, Expected};

const SRC_PATH: &str = "./demos/factorial.cmm";
const EXPECTED: Expected = Expected {
    stdout: "720 ",
    stderr: "",
};

#[test]
fn recursive_function_call_computes_factorial() -> Result<(), Box<dyn Error>> {
    check_interpretation(Path::new(SRC_PATH), EXPECTED)
}
