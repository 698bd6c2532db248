use std::{
    error::Error,
    io,
    path::Path,
    process::{Command, Output},
    str,
};

const CMM_PATH: &str = "./target/debug/cmm";

pub struct Expected<'a> {
    pub stdout: &'a str,
    pub stderr: &'a str,
}

impl<'a> Expected<'a> {
    fn assert_matches(self, output: &Output) -> Result<(), Box<dyn Error>> {
        assert_eq!(str::from_utf8(&output.stdout)?, self.stdout);
        assert_eq!(str::from_utf8(&output.stderr)?, self.stderr);
        Ok(())
    }
}

fn run_cmm(src_path: &Path, program_args: &[&str]) -> Result<Output, io::Error> {
    Command::new(CMM_PATH).arg(src_path).args(program_args).output()
}

pub fn check_interpretation(src_path: &Path, expected: Expected) -> Result<(), Box<dyn Error>> {
    check_interpretation_with_args(src_path, &[], expected)
}

pub fn check_interpretation_with_args(
    src_path: &Path,
    program_args: &[&str],
    expected: Expected,
) -> Result<(), Box<dyn Error>> {
    let output = run_cmm(src_path, program_args)?;
    expected.assert_matches(&output)?;
    assert!(
        output.status.success(),
        "cmm exited with status {:?}",
        output.status.code()
    );
    Ok(())
}

pub fn check_runtime_failure(src_path: &Path) -> Result<(), Box<dyn Error>> {
    let output = run_cmm(src_path, &[])?;
    assert!(
        !output.status.success(),
        "expected cmm to fail on {}, but it exited successfully",
        src_path.display()
    );
    Ok(())
}
