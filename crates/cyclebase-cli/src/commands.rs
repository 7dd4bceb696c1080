use anyhow::{Context, Result, bail};
use clap::ValueEnum;
use cyclebase::names::{action_name, message_signature_name, protocol_type_name, return_code_name};
use cyclebase::{Calibration, GlobalLevel, HostCounter, LogBurst, poll_clock};
use log::{debug, info};
use std::thread;
use std::time::Duration;

use crate::config::Config;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Unit {
    Ticks,
    Us,
    Ms,
    Secs,
    Minutes,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum NameKind {
    Protocol,
    Message,
    Action,
    Rc,
}

pub fn calibrate(cfg: &Config, json: bool) -> Result<()> {
    let cal = cfg.calibrate()?;
    if json {
        println!("{}", serde_json::to_string_pretty(&cal)?);
    } else {
        println!("{cal}");
    }
    Ok(())
}

pub fn convert(cfg: &Config, value: u64, from: Unit) -> Result<()> {
    let cal = cfg.calibrate()?;
    let ticks = to_ticks(&cal, value, from);
    println!("ticks:   {ticks}");
    println!("us:      {}", cal.ticks_to_us(ticks));
    println!("ms:      {}", cal.ticks_to_ms(ticks));
    println!("secs:    {}", cal.ticks_to_secs(ticks));
    println!("elapsed: {:?}", cal.ticks_to_duration(ticks));
    Ok(())
}

fn to_ticks(cal: &Calibration, value: u64, from: Unit) -> u64 {
    match from {
        Unit::Ticks => value,
        Unit::Us => cal.us_to_ticks(value),
        Unit::Ms => cal.ms_to_ticks(value),
        Unit::Secs => cal.secs_to_ticks(value),
        Unit::Minutes => cal.minutes_to_ticks(value),
    }
}

pub fn names(kind: NameKind, code: &str) -> Result<()> {
    let code = parse_code(code)?;
    let name = match kind {
        NameKind::Protocol => protocol_type_name(
            u8::try_from(code).with_context(|| format!("protocol type {code} out of range"))?,
        ),
        NameKind::Message => message_signature_name(
            u16::try_from(code).with_context(|| format!("message signature {code} out of range"))?,
        ),
        NameKind::Action => action_name(code),
        NameKind::Rc => return_code_name(code),
    };
    println!("{name}");
    Ok(())
}

fn parse_code(code: &str) -> Result<u32> {
    let parsed = match code.strip_prefix("0x").or_else(|| code.strip_prefix("0X")) {
        Some(hex) => u32::from_str_radix(hex, 16),
        None => code.parse(),
    };
    match parsed {
        Ok(code) => Ok(code),
        Err(e) => bail!("invalid code '{code}': {e}"),
    }
}

pub fn burst(cfg: &Config, seconds: u32, poll_ms: u64) -> Result<()> {
    let cal = cfg.calibrate()?;
    let burst = LogBurst::new(&cal, HostCounter::default(), GlobalLevel);
    let start = poll_clock();

    burst.burst_log(seconds);
    info!("burst started, level now {}", log::max_level());
    while !burst.pull() {
        debug!("burst active, {} ticks left", burst.expiry().saturating_sub(poll_clock()));
        thread::sleep(Duration::from_millis(poll_ms));
    }
    info!(
        "burst over after {:?}, level back to {}",
        cal.ticks_to_duration(poll_clock().saturating_sub(start)),
        log::max_level()
    );
    Ok(())
}
