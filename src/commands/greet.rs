//! Greeting commands

use reticular::domain::Nargs;
use reticular::{argument, command, global_arg, say, GroupModule, HandlerError, ParsedArgs};

use super::helpers::loudness;

pub fn module() -> GroupModule {
    GroupModule::new()
        .doc("Say hello and goodbye")
        .global(global_arg(["-s", "--shout"]).flag().help("Shout the greeting"))
        .command(
            command("hello", hello)
                .about("Greet someone by name")
                .arg(argument(["--name"]).required(true).help("Who to greet")),
        )
        .command(
            command("bye", bye)
                .about("Say goodbye")
                .arg(
                    argument(["name"])
                        .nargs(Nargs::Optional)
                        .help("Who is leaving"),
                ),
        )
}

fn hello(args: &ParsedArgs) -> Result<(), HandlerError> {
    let name = args.require_str("name")?.trim();
    if name.is_empty() {
        return Err(HandlerError::failed("name must not be empty"));
    }

    say([loudness(&format!("Hello, {}!", name), args.flag("shout")?)]);
    Ok(())
}

fn bye(args: &ParsedArgs) -> Result<(), HandlerError> {
    let text = match args.str("name")? {
        Some(name) => format!("Goodbye, {}!", name),
        None => "Goodbye!".to_string(),
    };

    say([loudness(&text, args.flag("shout")?)]);
    Ok(())
}
