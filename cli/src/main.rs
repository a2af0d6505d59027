use slog::Drain;
#[macro_use]
extern crate slog;

use std::convert::TryFrom;

pub mod commands;
pub mod helper;
pub enum CLIError {
    IOError(String, std::io::Error),
    Clap(clap::Error),
    SerdeJSON(serde_json::Error),
    Network(mesh_group_control::network::NetworkError),
    OtherMessage(String),
}

fn main() {
    let app = clap::App::new("Bluetooth Mesh Group Control CLI")
        .version(clap::crate_version!())
        .author("Andrew Gilbrough <andrew@gilbrough.com>")
        .about("Inspect and control the groups of a Bluetooth Mesh network")
        .arg(
            clap::Arg::with_name("verbose")
                .short("v")
                .long("verbose")
                .multiple(true)
                .max_values(5)
                .help("Set the amount of logging from level 0 up to level 5"),
        )
        .arg(
            clap::Arg::with_name("network")
                .short("n")
                .long("network")
                .value_name("FILE")
                .help("Specifies mesh network .json file"),
        )
        .arg(
            clap::Arg::with_name("config")
                .short("c")
                .long("config")
                .value_name("FILE")
                .help("Specifies group control config .json file"),
        )
        .subcommand(commands::generate::sub_command())
        .subcommand(commands::group::sub_command())
        .subcommand(commands::keys::sub_command());
    let matches = app.get_matches();

    let log_level = slog::Level::from_usize(
        1 + usize::try_from(matches.occurrences_of("verbose"))
            .expect("verbose usize overflow (how??)"),
    )
    .expect("verbose limit set too low");
    let drain = slog_term::PlainSyncDecorator::new(std::io::stderr());
    let drain = slog_term::FullFormat::new(drain)
        .build()
        .filter_level(log_level)
        .fuse();
    let root = slog::Logger::root(drain, o!());
    trace!(root, "main");
    let sub_cmd = matches.subcommand().0;
    let get_network_path = || -> &str {
        match matches.value_of("network") {
            Some(path) => path,
            None => clap::Error::with_description(
                "missing 'network.json` path",
                clap::ErrorKind::ArgumentNotFound,
            )
            .exit(),
        }
    };
    debug!(root, "arg_match"; "sub_command" => sub_cmd);
    if let Err(e) = (|| -> Result<(), CLIError> {
        match matches.subcommand() {
            ("", None) => error!(root, "no command given"),
            ("generate", Some(gen_matches)) => {
                commands::generate::generate_matches(&root, get_network_path(), gen_matches)?
            }
            ("group", Some(group_matches)) => commands::group::group_matches(
                &root,
                get_network_path(),
                matches.value_of("config"),
                group_matches,
            )?,
            ("keys", Some(keys_matches)) => {
                commands::keys::keys_matches(&root, get_network_path(), keys_matches)?
            }
            _ => unreachable!("unhandled sub_command"),
        }
        debug!(root, "matches_done");
        Ok(())
    })() {
        match e {
            CLIError::IOError(path, error) => {
                eprintln!("io error {:?} with path '{}'", error, path)
            }
            CLIError::Clap(error) => eprintln!("{}", &error.message),
            CLIError::SerdeJSON(error) => eprintln!("json error {}", error),
            CLIError::Network(error) => eprintln!("network error: {}", error),
            CLIError::OtherMessage(msg) => eprintln!("error: {}", &msg),
        };
        std::process::exit(1);
    }
}
