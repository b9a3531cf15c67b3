#[macro_use]
extern crate log;
extern crate chrono;
extern crate crossbeam_channel;
extern crate env_logger;

mod steps;

use chrono::prelude::{DateTime, Local};
use std::io::Write;

extern crate repguard;
extern crate repguard_modules;

fn init_logger() {
    env_logger::builder()
        .format(|buf, record| {
            let now: DateTime<Local> = Local::now();
            let now_str = now.format("%H:%M:%S.%3f").to_string();
            writeln!(buf, "{:5}: {} - {}", record.level(), now_str, record.args())
        })
        .init();
}

fn main() {
    init_logger();

    info!("Scenarios started");

    cases::smoke::run();
    cases::standby_hysteresis::run();
    cases::role_change::run();
    cases::zombie_rejoin::run();
    cases::network_split::run();

    info!("Scenarios completed");
}
