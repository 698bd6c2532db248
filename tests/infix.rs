use std::{error::Error, path::Path};

use test_utils::{check_interpretation, Expected};

const SRC_PATH: &str = "./demos/infix_power.cmm";
const EXPECTED: Expected = Expected {
    stdout: "1024 ",
    stderr: "",
};

#[test]
fn user_defined_infix_operator_computes_power() -> Result<(), Box<dyn Error>> {
    check_interpretation(Path::new(SRC_PATH), EXPECTED)
}
