use std::num::NonZeroUsize;
use std::path::Path;

#[cfg(unix)]
fn units(path: &Path) -> usize {
    use std::os::unix::ffi::OsStrExt;
    path.as_os_str().as_bytes().len()
}

#[cfg(windows)]
fn units(path: &Path) -> usize {
    use std::os::windows::ffi::OsStrExt;
    path.as_os_str().encode_wide().count()
}

#[test]
fn path_does_not_depend_on_the_starting_capacity() {
    let expected = std::env::current_exe().unwrap();
    assert!(expected.is_absolute());

    for step in 1..=units(&expected) + 2 {
        let path = wmisc::module::file_path(NonZeroUsize::new(step).unwrap()).unwrap();
        assert_eq!(path, expected, "step {step}");
    }
}

#[test]
fn default_step_finds_the_executable() {
    let path = wmisc::module::current_file_path().unwrap();
    assert_eq!(path, std::env::current_exe().unwrap());
}
