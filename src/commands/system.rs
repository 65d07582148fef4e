//! Commands about the running process

use std::env;

use reticular::domain::is_superuser;
use reticular::{command, say, superuser, GroupModule, HandlerError, ParsedArgs};

pub fn module() -> GroupModule {
    GroupModule::new()
        .doc("Inspect the current user")
        .command(command("whoami", whoami).about("Show the current user"))
        .command(command("reboot", superuser(reboot)).about("Pretend to reboot (needs root)"))
}

fn whoami(_args: &ParsedArgs) -> Result<(), HandlerError> {
    let user = env::var("USER")
        .or_else(|_| env::var("USERNAME"))
        .unwrap_or_else(|_| "unknown".to_string());
    let role = if is_superuser() { "superuser" } else { "regular user" };

    say([format!("{} ({})", user, role)]);
    Ok(())
}

fn reboot(_args: &ParsedArgs) -> Result<(), HandlerError> {
    say(["Rebooting... (not really)"]);
    Ok(())
}
