use crate::{helper, CLIError};
use mesh_group_control::network::MeshNetwork;
use mesh_group_control::samples;

pub fn sub_command() -> clap::App<'static, 'static> {
    clap::SubCommand::with_name("generate")
        .about("Generate a mesh network file")
        .arg(
            clap::Arg::with_name("name")
                .short("N")
                .long("name")
                .value_name("NAME")
                .help("name of an empty network to create"),
        )
        .arg(
            clap::Arg::with_name("sample")
                .long("sample")
                .takes_value(false)
                .conflicts_with("name")
                .help("write the sample home network (two keys, two groups, three nodes)"),
        )
}
pub fn generate_matches(
    parent_logger: &slog::Logger,
    network_path: &str,
    gen_matches: &clap::ArgMatches,
) -> Result<(), CLIError> {
    let network = if gen_matches.is_present("sample") {
        samples::sample_network()
    } else {
        MeshNetwork::new(gen_matches.value_of("name").unwrap_or("Mesh Network"))
    };
    generate(parent_logger, network_path, &network)
}
pub fn generate(
    parent_logger: &slog::Logger,
    network_path: &str,
    network: &MeshNetwork,
) -> Result<(), CLIError> {
    let logger = parent_logger.new(o!("network_path" => network_path.to_owned()));
    helper::write_network(network_path, network)?;
    info!(logger, "generated"; "name" => &network.name, "groups" => network.groups().len(),
        "nodes" => network.nodes().len());
    Ok(())
}
