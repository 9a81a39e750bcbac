use serial_test::serial;
use std::env;
use stockham_kernels::config::{DispatchConfig, ENV_MAX_THREADS_PER_BLOCK, ENV_SYNC_LAUNCH, ENV_VALIDATE_GRID};

fn clear() {
    for name in [ENV_VALIDATE_GRID, ENV_MAX_THREADS_PER_BLOCK, ENV_SYNC_LAUNCH] {
        env::remove_var(name);
    }
}

#[test]
#[serial]
fn defaults_without_env() {
    clear();
    assert_eq!(DispatchConfig::from_env(), DispatchConfig::default());
    assert!(DispatchConfig::default().validate_grid);
    assert!(!DispatchConfig::default().sync_after_launch);
    assert_eq!(DispatchConfig::default().max_threads_per_block, 1024);
}

#[test]
#[serial]
fn env_overrides() {
    clear();
    env::set_var(ENV_VALIDATE_GRID, "off");
    env::set_var(ENV_MAX_THREADS_PER_BLOCK, "256");
    env::set_var(ENV_SYNC_LAUNCH, "1");

    let config = DispatchConfig::from_env();
    assert!(!config.validate_grid);
    assert_eq!(config.max_threads_per_block, 256);
    assert!(config.sync_after_launch);
    clear();
}

#[test]
#[serial]
fn bad_numbers_keep_default() {
    clear();
    env::set_var(ENV_MAX_THREADS_PER_BLOCK, "lots");
    assert_eq!(DispatchConfig::from_env().max_threads_per_block, 1024);
    env::set_var(ENV_MAX_THREADS_PER_BLOCK, "0");
    assert_eq!(DispatchConfig::from_env().max_threads_per_block, 1024);
    clear();
}

#[test]
#[serial]
fn flag_words() {
    clear();
    for off in ["0", "false", "OFF", "No", " false "] {
        env::set_var(ENV_VALIDATE_GRID, off);
        assert!(!DispatchConfig::from_env().validate_grid, "{:?}", off);
    }
    for on in ["1", "true", "yes", "on"] {
        env::set_var(ENV_SYNC_LAUNCH, on);
        assert!(DispatchConfig::from_env().sync_after_launch, "{:?}", on);
    }
    clear();
}
