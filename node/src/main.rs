#[macro_use] extern crate log;
extern crate env_logger;
extern crate chrono;

use std::env;
use std::io::Write;
use std::process;
use std::time::Duration;

use chrono::prelude::{DateTime, Local};

extern crate repguard;
extern crate repguard_modules;

use repguard::{CleanerConfiguration, CleanerTimings, NodeRole, StandbyInfo, SystemClock, UnseenStandbyPolicy};
use repguard_modules::StaticTableReplicationManager;


fn init_logger() {
    env_logger::builder()
        .format(|buf, record| {
            let now: DateTime<Local> = Local::now();
            writeln!(buf, "{:5}: {} - {}", record.level(), now.format("%H:%M:%S.%3f").to_string(), record.args())
        })
        .init();
}

#[derive(Clone, Debug, PartialEq)]
struct Settings {
    local_address: String,
    role: NodeRole,
    standbys: Vec<StandbyInfo>,
    timings: CleanerTimings,
    probe_timeout: Duration,
}

fn main() {
    init_logger();

    let settings = match load_settings(|key| env::var(key).ok()) {
        Ok(settings) => settings,
        Err(err) => {
            error!("Invalid settings: {}", err);
            process::exit(1);
        }
    };

    info!("Standby cleaner started: {:?}", settings);

    let replication_manager = StaticTableReplicationManager::new(
        settings.local_address,
        settings.role,
        settings.standbys,
        settings.probe_timeout);

    let config = CleanerConfiguration {
        replication_manager,
        clock: SystemClock,
        timings: settings.timings,
        unseen_policy: UnseenStandbyPolicy::NeverEvict,
    };

    let worker = match repguard::start_standby_cleaner(config) {
        Ok(worker) => worker,
        Err(err) => {
            error!("{}", err);
            process::exit(1);
        }
    };

    let thread = worker.join_handle.join();
    if thread.is_err() {
        panic!("worker panicked!")
    }
}

fn load_settings<F: Fn(&str) -> Option<String>>(var: F) -> Result<Settings, String> {
    let defaults = CleanerTimings::default();

    let local_address = var("REPGUARD_LOCAL_ADDR").unwrap_or_else(|| "127.0.0.1:5433".to_string());
    let role = match var("REPGUARD_ROLE") {
        Some(role) => parse_role(&role)?,
        None => NodeRole::Primary,
    };
    let standbys = match var("REPGUARD_STANDBYS") {
        Some(table) => parse_standby_table(&table)?,
        None => Vec::new(),
    };
    let tick_interval = match var("REPGUARD_TICK_SECS") {
        Some(secs) => Duration::from_secs(parse_number("REPGUARD_TICK_SECS", &secs)?),
        None => defaults.tick_interval,
    };
    let grace_period = match var("REPGUARD_GRACE_SECS") {
        Some(secs) => Duration::from_secs(parse_number("REPGUARD_GRACE_SECS", &secs)?),
        None => defaults.grace_period,
    };
    let probe_timeout = match var("REPGUARD_PROBE_TIMEOUT_MS") {
        Some(ms) => Duration::from_millis(parse_number("REPGUARD_PROBE_TIMEOUT_MS", &ms)?),
        None => get_probe_timeout(),
    };

    Ok(Settings {
        local_address,
        role,
        standbys,
        timings: CleanerTimings { tick_interval, grace_period },
        probe_timeout,
    })
}

fn get_probe_timeout() -> Duration {
    Duration::from_millis(2000)
}

fn parse_number(key: &str, value: &str) -> Result<u64, String> {
    value.trim().parse::<u64>().map_err(|err| format!("{}={}: {}", key, value, err))
}

fn parse_role(value: &str) -> Result<NodeRole, String> {
    match value.trim() {
        "primary" => Ok(NodeRole::Primary),
        "standby" => Ok(NodeRole::Standby),
        other => Err(format!("unknown role: {}", other)),
    }
}

/// `id=host:port` pairs separated by commas.
fn parse_standby_table(value: &str) -> Result<Vec<StandbyInfo>, String> {
    let mut standbys = Vec::new();
    for entry in value.split(',').map(str::trim).filter(|entry| !entry.is_empty()) {
        let mut parts = entry.splitn(2, '=');
        let id = parts.next().unwrap_or("");
        let address = parts.next().ok_or_else(|| format!("standby entry without address: {}", entry))?;

        standbys.push(StandbyInfo {
            id: parse_number("standby id", id)?,
            address: address.trim().to_string(),
        });
    }

    Ok(standbys)
}
