use crate::{helper, CLIError};
use mesh_group_control::crypto::key::AppKey;
use mesh_group_control::mesh::NetKeyIndex;
use mesh_group_control::network::ApplicationKey;

pub fn sub_command() -> clap::App<'static, 'static> {
    clap::SubCommand::with_name("keys")
        .about("Manage the network's Application Keys")
        .subcommand(
            clap::SubCommand::with_name("list").about("list Application Keys"),
        )
        .subcommand(
            clap::SubCommand::with_name("add")
                .arg(
                    clap::Arg::with_name("net_index")
                        .help("netkey index to bind to the new appkey")
                        .required(true)
                        .value_name("NET_INDEX")
                        .validator(helper::is_key_index),
                )
                .arg(
                    clap::Arg::with_name("app_index")
                        .help("new appkey index to add")
                        .required(true)
                        .value_name("APP_INDEX")
                        .validator(helper::is_key_index),
                )
                .arg(
                    clap::Arg::with_name("name")
                        .help("appkey name shown as the section title")
                        .required(true)
                        .value_name("NAME"),
                )
                .arg(
                    clap::Arg::with_name("key_hex")
                        .help("128-bit big endian key hex (random if missing)")
                        .value_name("KEY_HEX")
                        .validator(helper::is_128_bit_hex_str_validator),
                ),
        )
}
pub fn keys_matches(
    parent_logger: &slog::Logger,
    network_path: &str,
    keys_matches: &clap::ArgMatches,
) -> Result<(), CLIError> {
    let logger = parent_logger.new(o!("network_path" => network_path.to_owned()));
    let mut network = helper::load_network(network_path)?;
    debug!(logger, "loaded_network");
    match keys_matches.subcommand() {
        ("list", Some(_)) => {
            for key in network.application_keys() {
                println!(
                    "net_index: {} app_index: {} name: {}",
                    key.bound_net_key, key.index, key.name
                );
            }
        }
        ("add", Some(add_matches)) => {
            let net_index = NetKeyIndex(helper::key_index_arg(add_matches, "net_index"));
            let app_index = helper::app_key_index_arg(add_matches, "app_index");
            let name = add_matches.value_of("name").expect("required by clap");
            let key = match add_matches.value_of("key_hex") {
                Some(hex) => AppKey::from_hex(hex).expect("validated by clap"),
                None => AppKey::random_secure(),
            };
            network
                .add_application_key(ApplicationKey::new(name, app_index, net_index, key))
                .map_err(CLIError::Network)?;
            helper::write_network(network_path, &network)?;
            info!(logger, "added_appkey"; "app_index" => %app_index, "net_index" => %net_index);
        }
        ("", None) => error!(logger, "no_keys_subcommand"),
        _ => unreachable!("unhandled keys subcommand"),
    }
    Ok(())
}
