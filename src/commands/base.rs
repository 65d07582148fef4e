//! Top-level commands

use reticular::cli::BASE_GROUP;
use reticular::domain::Nargs;
use reticular::{argument, command, say, section, GroupModule, HandlerError, ParsedArgs};

pub fn module() -> GroupModule {
    GroupModule::new()
        .command(command("status", status).about("Show the version and enabled command groups"))
        .command(
            command("echo", echo)
                .about("Print the given words")
                .arg(
                    argument(["words"])
                        .nargs(Nargs::OneOrMore)
                        .help("Words to print"),
                )
                .arg(
                    argument(["-n", "--times"])
                        .int()
                        .default_value("1")
                        .metavar("N")
                        .help("Print the words N times"),
                )
                .arg(argument(["--json"]).flag().help("Print the parsed arguments as JSON")),
        )
}

fn status(_args: &ParsedArgs) -> Result<(), HandlerError> {
    let paths = super::catalog()
        .discover(super::APP, super::PACKAGE)
        .map_err(anyhow::Error::from)?;

    let _version = section(&format!("{} {}", super::APP, env!("CARGO_PKG_VERSION")));
    say([format!("groups: {}", group_names(&paths).join(", "))]);
    Ok(())
}

/// Command-line names of the groups among discovered module paths
fn group_names(paths: &[String]) -> Vec<&str> {
    paths
        .iter()
        .filter_map(|path| path.rsplit('.').next())
        .filter(|name| *name != BASE_GROUP)
        .collect()
}

fn echo(args: &ParsedArgs) -> Result<(), HandlerError> {
    if args.flag("json")? {
        let json = serde_json::to_string(args).map_err(anyhow::Error::from)?;
        say([json]);
        return Ok(());
    }

    let times = args.require_int("times")?;
    if times < 0 {
        return Err(HandlerError::failed("--times must not be negative"));
    }

    let line = args.strings("words")?.join(" ");
    for _ in 0..times {
        say([line.as_str()]);
    }
    Ok(())
}
