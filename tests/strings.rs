use std::{error::Error, path::Path};

use test_utils::{check_interpretation, Expected};

const SRC_PATH: &str = "./demos/string_concat.cmm";
const EXPECTED: Expected = Expected {
    stdout: "n=42 ",
    stderr: "",
};

#[test]
fn string_plus_int_concatenates_via_to_string() -> Result<(), Box<dyn Error>> {
    check_interpretation(Path::new(SRC_PATH), EXPECTED)
}
