use std::{error::Error, path::Path};

use test_utils::check_runtime_failure;

#[test]
fn integer_division_by_zero_aborts_with_nonzero_exit() -> Result<(), Box<dyn Error>> {
    check_runtime_failure(Path::new("./demos/division_by_zero.cmm"))
}

#[test]
fn assigning_one_array_variable_to_another_is_rejected() -> Result<(), Box<dyn Error>> {
    check_runtime_failure(Path::new("./demos/array_aggregate_assign.cmm"))
}
