use log::LevelFilter;

/// Console logging. `RUST_LOG` still overrides the level given here.
pub fn init_log(level: LevelFilter) {
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp_millis()
        .init();
}
