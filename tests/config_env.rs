//! Configuration read from the real process environment.
//!
//! A single test in its own binary, since it mutates process-wide variables.

use sample_app::config::Config;

#[test]
fn port_from_environment_reaches_bind_address() {
    std::env::remove_var("PORT");
    std::env::remove_var("APP_HOST");
    let default = Config::load().unwrap();
    assert_eq!(default.socket_addr().unwrap().to_string(), "0.0.0.0:3000");

    std::env::set_var("PORT", "4312");
    std::env::set_var("HOST", "ci-runner.example");
    let config = Config::load().unwrap();
    assert_eq!(config.port, 4312);
    assert!(config.validate().is_ok());
    assert_eq!(config.socket_addr().unwrap().to_string(), "0.0.0.0:4312");

    std::env::set_var("PORT", "not-a-port");
    assert!(Config::load().is_err());

    std::env::remove_var("PORT");
    std::env::remove_var("HOST");
}
