use std::{error::Error, path::Path};

use test_utils::{check_interpretation_with_args, Expected};

const SRC_PATH: &str = "./demos/main_args.cmm";

#[test]
fn main_with_one_parameter_receives_process_arguments() -> Result<(), Box<dyn Error>> {
    check_interpretation_with_args(
        Path::new(SRC_PATH),
        &["alpha", "beta"],
        Expected {
            stdout: "alpha \nbeta \n",
            stderr: "",
        },
    )
}
