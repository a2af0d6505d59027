use crate::{helper, CLIError};
use mesh_group_control::address::GroupAddress;
use mesh_group_control::cells::{CellKind, GroupCell};
use mesh_group_control::config::GroupControlConfig;
use mesh_group_control::controller::{GroupControl, GroupControlView, IndexPath};
use mesh_group_control::manager::{LoopbackManager, MeshNetworkManager, SendError};
use mesh_group_control::mesh::AppKeyIndex;
use mesh_group_control::models::generics::level;
use mesh_group_control::network::{Group, MeshNetwork};
use mesh_group_control::random::rand_u8;

fn group_arg() -> clap::Arg<'static, 'static> {
    clap::Arg::with_name("group")
        .short("g")
        .long("group")
        .required(true)
        .value_name("GROUP_ADDRESS")
        .validator(helper::is_group_address)
}
pub fn sub_command() -> clap::App<'static, 'static> {
    clap::SubCommand::with_name("group")
        .about("Show and control the models subscribed to a group")
        .subcommand(clap::SubCommand::with_name("list").about("list groups"))
        .subcommand(
            clap::SubCommand::with_name("show")
                .about("show the models of a group grouped by Application Key")
                .arg(group_arg())
                .arg(
                    clap::Arg::with_name("width")
                        .short("w")
                        .long("width")
                        .value_name("VIEW_WIDTH")
                        .validator(helper::is_f64_validator)
                        .help("also print the grid item size for a view this wide"),
                ),
        )
        .subcommand(
            clap::SubCommand::with_name("rename")
                .about("rename a group")
                .arg(group_arg())
                .arg(
                    clap::Arg::with_name("name")
                        .required(true)
                        .value_name("NAME"),
                ),
        )
        .subcommand(
            clap::SubCommand::with_name("send")
                .about("send a Generic OnOff/Level message to a group")
                .arg(group_arg())
                .arg(
                    clap::Arg::with_name("app_index")
                        .short("k")
                        .long("key")
                        .required(true)
                        .value_name("APP_INDEX")
                        .validator(helper::is_key_index),
                )
                .arg(clap::Arg::with_name("on").long("on"))
                .arg(clap::Arg::with_name("off").long("off"))
                .arg(clap::Arg::with_name("increase").long("increase"))
                .arg(clap::Arg::with_name("decrease").long("decrease"))
                .arg(clap::Arg::with_name("min").long("min"))
                .arg(clap::Arg::with_name("max").long("max"))
                .arg(
                    clap::Arg::with_name("level")
                        .long("level")
                        .value_name("LEVEL")
                        .allow_hyphen_values(true)
                        .validator(helper::is_i16_validator),
                )
                .arg(
                    clap::Arg::with_name("delta")
                        .long("delta")
                        .value_name("DELTA")
                        .allow_hyphen_values(true)
                        .validator(helper::is_i32_validator),
                )
                .group(
                    clap::ArgGroup::with_name("action")
                        .args(&[
                            "on", "off", "increase", "decrease", "min", "max", "level", "delta",
                        ])
                        .required(true),
                )
                .arg(
                    clap::Arg::with_name("connect")
                        .long("connect")
                        .help("start with the bearer closed and open it after the tap"),
                )
                .arg(
                    clap::Arg::with_name("fail")
                        .long("fail")
                        .help("report the message as not delivered"),
                ),
        )
}
pub fn group_matches(
    parent_logger: &slog::Logger,
    network_path: &str,
    config_path: Option<&str>,
    group_matches: &clap::ArgMatches,
) -> Result<(), CLIError> {
    let logger = parent_logger.new(o!("network_path" => network_path.to_owned()));
    let mut network = helper::load_network(network_path)?;
    debug!(logger, "loaded_network"; "name" => &network.name);
    match group_matches.subcommand() {
        ("list", Some(_)) => {
            for group in network.groups() {
                println!(
                    "{} {} models: {}",
                    group.address,
                    group.name,
                    network.models_subscribed_to(group).count()
                );
            }
        }
        ("show", Some(show_matches)) => {
            let group = find_group(&network, helper::group_address_arg(show_matches, "group"))?;
            let config = helper::load_config(config_path)?;
            let width = show_matches
                .value_of("width")
                .map(|w| w.parse::<f64>().expect("validated by clap"));
            let (manager, _events) = LoopbackManager::new(Some(network));
            let view = TerminalView::new(&logger);
            let mut screen = GroupControl::new(group, manager, view, config, logger.clone());
            screen.load();
            print_grid(&screen);
            if let Some(width) = width {
                let size = screen.item_size(width);
                println!("item size: {}x{}", size.width, size.height);
            }
        }
        ("rename", Some(rename_matches)) => {
            let address = helper::group_address_arg(rename_matches, "group");
            let name = rename_matches.value_of("name").expect("required by clap");
            let group = network
                .rename_group(address, name)
                .map_err(CLIError::Network)?
                .clone();
            helper::write_network(network_path, &network)?;
            info!(logger, "renamed_group"; "group" => %group.address, "name" => &group.name);
        }
        ("send", Some(send_matches)) => {
            let group = find_group(&network, helper::group_address_arg(send_matches, "group"))?;
            let app_index = helper::app_key_index_arg(send_matches, "app_index");
            let config = helper::load_config(config_path)?;
            send(&logger, network, group, app_index, config, send_matches)?
        }
        ("", None) => error!(logger, "no_group_subcommand"),
        _ => unreachable!("unhandled group subcommand"),
    }
    Ok(())
}
fn find_group(network: &MeshNetwork, address: GroupAddress) -> Result<Group, CLIError> {
    network
        .group(address)
        .cloned()
        .ok_or_else(|| CLIError::OtherMessage(format!("no group with address {}", address)))
}
fn print_grid<M: MeshNetworkManager, V: GroupControlView>(screen: &GroupControl<M, V>) {
    if screen.number_of_sections() == 0 {
        println!("no supported models");
    }
    for section in 0..screen.number_of_sections() {
        println!("{}", screen.header_title(section).unwrap_or_default());
        for item in 0..screen.number_of_items(section) {
            if let Some(cell) = screen.cell(IndexPath::new(section, item)) {
                let kind = match cell.kind {
                    Some(CellKind::OnOff) => "Generic OnOff",
                    Some(CellKind::Level) => "Generic Level",
                    None => "Other",
                };
                println!(
                    "  {} {} devices: {}",
                    cell.reuse_identifier, kind, cell.number_of_devices
                );
            }
        }
    }
}
fn send(
    logger: &slog::Logger,
    network: MeshNetwork,
    group: Group,
    app_index: AppKeyIndex,
    config: GroupControlConfig,
    send_matches: &clap::ArgMatches,
) -> Result<(), CLIError> {
    let (mut manager, events) = LoopbackManager::new(Some(network));
    let connect = send_matches.is_present("connect");
    if send_matches.is_present("fail") {
        manager.fail_deliveries(Some(SendError::BearerClosed));
    }
    let view = TerminalView::new(logger);
    let mut screen = GroupControl::new(group, manager, view, config, logger.clone());
    screen.load();
    screen.appear();
    if connect {
        screen
            .manager_mut()
            .close_bearer()
            .map_err(|e| CLIError::OtherMessage(e.to_string()))?;
    }

    let wants = if send_matches.is_present("on") || send_matches.is_present("off") {
        Some(CellKind::OnOff)
    } else if send_matches.is_present("level") || send_matches.is_present("delta") {
        None
    } else {
        Some(CellKind::Level)
    };
    match wants {
        Some(kind) => {
            let mut cell = find_cell(&screen, app_index, kind)?;
            match &mut cell {
                GroupCell::OnOff(cell) => {
                    if send_matches.is_present("on") {
                        cell.on(&mut screen)
                    } else {
                        cell.off(&mut screen)
                    }
                }
                GroupCell::Level(cell) => {
                    if send_matches.is_present("increase") {
                        cell.increase(&mut screen)
                    } else if send_matches.is_present("decrease") {
                        cell.decrease(&mut screen)
                    } else if send_matches.is_present("min") {
                        cell.min(&mut screen)
                    } else {
                        cell.max(&mut screen)
                    }
                }
            }
        }
        None => {
            find_cell(&screen, app_index, CellKind::Level)?;
            if let Some(value) = send_matches.value_of("level") {
                let value: i16 = value.parse().expect("validated by clap");
                screen.send_message(
                    &level::Set::unacknowledged(value, rand_u8()),
                    &format!("Setting level to {}...", value),
                    app_index,
                )
            } else {
                let delta: i32 = send_matches
                    .value_of("delta")
                    .expect("required by arg group")
                    .parse()
                    .expect("validated by clap");
                screen.send_message(
                    &level::DeltaSet::unacknowledged(delta, rand_u8()),
                    &format!("Changing level by {}...", delta),
                    app_index,
                )
            }
        }
    }
    let mut events = events;
    if connect {
        screen
            .manager_mut()
            .open_bearer()
            .map_err(|e| CLIError::OtherMessage(e.to_string()))?;
        screen.flush_pending(&mut events);
    }
    screen.manager_mut().close_events();
    helper::tokio_runtime().block_on(screen.run(events));
    for sent in screen.manager().sent() {
        println!(
            "sent {} to {} with key {}",
            sent.payload, sent.destination, sent.app_key_index
        );
    }
    Ok(())
}
/// The cell of `kind` in the section of `app_index`.
fn find_cell<M: MeshNetworkManager, V: GroupControlView>(
    screen: &GroupControl<M, V>,
    app_index: AppKeyIndex,
    kind: CellKind,
) -> Result<GroupCell, CLIError> {
    (0..screen.number_of_sections())
        .flat_map(|section| {
            (0..screen.number_of_items(section)).map(move |item| IndexPath::new(section, item))
        })
        .filter_map(|index| screen.cell(index))
        .filter(|cell| cell.application_key.index == app_index && cell.kind == Some(kind))
        .find_map(|cell| cell.make_cell())
        .ok_or_else(|| {
            CLIError::OtherMessage(format!(
                "no {:?} models bound to application key {} in group {}",
                kind,
                app_index,
                screen.group().address
            ))
        })
}
/// Prints what the screen would show.
struct TerminalView {
    logger: slog::Logger,
}
impl TerminalView {
    fn new(logger: &slog::Logger) -> Self {
        Self {
            logger: logger.new(o!("view" => "terminal")),
        }
    }
}
impl GroupControlView for TerminalView {
    fn set_title(&mut self, title: &str) {
        println!("== {} ==", title);
    }
    fn reload(&mut self) {
        trace!(self.logger, "reload");
    }
    fn show_progress(&mut self, message: &str) {
        println!("{}", message);
    }
    fn update_progress(&mut self, message: &str) {
        println!("{}", message);
    }
    fn dismiss_progress(&mut self) {
        println!("done");
    }
    fn present_alert(&mut self, title: &str, message: &str) {
        println!("{}: {}", title, message);
    }
    fn network_did_change(&mut self) {
        warn!(self.logger, "network changed");
    }
    fn pop_to_root(&mut self) {
        println!("node was reset");
    }
}
