use crate::CLIError;
use mesh_group_control::address::GroupAddress;
use mesh_group_control::config::GroupControlConfig;
use mesh_group_control::mesh::{AppKeyIndex, KeyIndex};
use mesh_group_control::network::MeshNetwork;
use std::convert::TryFrom;
use std::str::FromStr;

/// Parses decimal or `0x` prefixed hex.
pub fn parse_u16(input: &str) -> Option<u16> {
    if input.starts_with("0x") || input.starts_with("0X") {
        u16::from_str_radix(&input[2..], 16).ok()
    } else {
        u16::from_str(input).ok()
    }
}
pub fn is_key_index(input: String) -> Result<(), String> {
    match parse_u16(&input).map(KeyIndex::try_from) {
        Some(Ok(_)) => Ok(()),
        _ => Err(format!("'{}' is not a valid key index", &input)),
    }
}
pub fn is_group_address(input: String) -> Result<(), String> {
    match parse_u16(&input).map(GroupAddress::try_from) {
        Some(Ok(_)) => Ok(()),
        _ => Err(format!("'{}' is not a group address (0xC000-0xFFFF)", &input)),
    }
}
pub fn is_128_bit_hex_str_validator(input: String) -> Result<(), String> {
    if input.len() == 32 && input.chars().all(|c| c.is_digit(16)) {
        Ok(())
    } else {
        Err(format!("'{}' is not a 128-bit hex string", &input))
    }
}
pub fn is_i16_validator(input: String) -> Result<(), String> {
    match i16::from_str(&input) {
        Ok(_) => Ok(()),
        Err(_) => Err(format!("'{}' is not a 16-bit signed integer", &input)),
    }
}
pub fn is_i32_validator(input: String) -> Result<(), String> {
    match i32::from_str(&input) {
        Ok(_) => Ok(()),
        Err(_) => Err(format!("'{}' is not a 32-bit signed integer", &input)),
    }
}
pub fn is_f64_validator(input: String) -> Result<(), String> {
    match f64::from_str(&input) {
        Ok(v) if v > 0.0 => Ok(()),
        _ => Err(format!("'{}' is not a positive width", &input)),
    }
}
/// Group address argument `name`. Only call for arguments checked by [`is_group_address`].
pub fn group_address_arg(matches: &clap::ArgMatches, name: &str) -> GroupAddress {
    let value = matches.value_of(name).expect("required by clap");
    GroupAddress::new(parse_u16(value).expect("validated by clap"))
}
/// Key index argument `name`. Only call for arguments checked by [`is_key_index`].
pub fn key_index_arg(matches: &clap::ArgMatches, name: &str) -> KeyIndex {
    let value = matches.value_of(name).expect("required by clap");
    KeyIndex::new(parse_u16(value).expect("validated by clap"))
}
pub fn app_key_index_arg(matches: &clap::ArgMatches, name: &str) -> AppKeyIndex {
    AppKeyIndex(key_index_arg(matches, name))
}
pub fn load_file(path: &str, writeable: bool, create: bool) -> Result<std::fs::File, CLIError> {
    std::fs::OpenOptions::new()
        .read(true)
        .write(writeable)
        .truncate(writeable)
        .create(create)
        .open(path)
        .map_err(|e| CLIError::IOError(path.to_owned(), e))
}
pub fn load_network(path: &str) -> Result<MeshNetwork, CLIError> {
    serde_json::from_reader(load_file(path, false, false)?).map_err(CLIError::SerdeJSON)
}
pub fn write_network(path: &str, network: &MeshNetwork) -> Result<(), CLIError> {
    serde_json::to_writer_pretty(load_file(path, true, true)?, network)
        .map_err(CLIError::SerdeJSON)
}
/// Loads the config at `path` or the default config if there is none.
pub fn load_config(path: Option<&str>) -> Result<GroupControlConfig, CLIError> {
    match path {
        Some(path) => {
            serde_json::from_reader(load_file(path, false, false)?).map_err(CLIError::SerdeJSON)
        }
        None => Ok(GroupControlConfig::default()),
    }
}
pub fn tokio_runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new()
        .basic_scheduler()
        .enable_all()
        .build()
        .expect("can't make async runtime")
}
