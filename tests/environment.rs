use std::env;

use wmisc::BufferSizes;

// Each test uses its own variable name; the test harness runs them in parallel.

#[test]
fn unset_variable_is_empty() {
    let name = "WMISC_ENVIRONMENT_TEST_NONE";
    env::remove_var(name);

    assert_eq!(wmisc::env::var(name).unwrap().len(), 0);
    assert_eq!(
        wmisc::env::var_speculative(name, BufferSizes::default().environment)
            .unwrap()
            .len(),
        0
    );
}

#[test]
fn values_around_the_initial_capacity() {
    let name = "WMISC_ENVIRONMENT_TEST_BUFFER_SIZE";
    let initial = BufferSizes::default().environment;

    for value in ["123456", "1234567", "12345678"] {
        env::set_var(name, value);

        let probed = wmisc::env::var(name).unwrap();
        let guessed = wmisc::env::var_speculative(name, initial).unwrap();

        assert_eq!(probed.len(), value.len());
        assert_eq!(guessed.len(), value.len());
        assert_eq!(probed, value);
        assert_eq!(guessed, value);
    }

    env::remove_var(name);
}

#[test]
fn strategies_agree_for_any_starting_guess() {
    let name = "WMISC_ENVIRONMENT_TEST_EQUIVALENCE";
    let value = "x".repeat(300);
    env::set_var(name, &value);

    let probed = wmisc::env::var(name).unwrap();
    assert_eq!(probed, value.as_str());

    for initial in [0, 1, 7, 8, 299, 300, 301, 4096] {
        assert_eq!(
            wmisc::env::var_speculative(name, initial).unwrap(),
            probed,
            "initial capacity {initial}"
        );
    }

    env::remove_var(name);
}

#[test]
fn agrees_with_std() {
    let name = "WMISC_ENVIRONMENT_TEST_STD";
    env::set_var(name, "Hello World. ✓");

    assert_eq!(
        wmisc::env::var(name).unwrap(),
        env::var_os(name).unwrap()
    );

    env::remove_var(name);
}
