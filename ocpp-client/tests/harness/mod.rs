#![allow(dead_code)]

pub mod core;
pub mod sink;
pub mod ws;

use std::sync::Once;

use log::LevelFilter;

static INIT: Once = Once::new();

pub fn init_logger() {
    INIT.call_once(|| {
        env_logger::builder()
            .is_test(true)
            .filter_level(LevelFilter::Debug)
            .try_init()
            .ok();
    });
}
