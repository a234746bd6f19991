use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::registry::{ArgCompletion, CommandEntry};

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "config",
        "View and change preferences (a currency must fit every stored amount)",
        "config [show|set <key> <value>]",
        cmd_config,
    )
    .completes(ArgCompletion::Config)]
}

fn cmd_config(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if args.is_empty() || args[0].eq_ignore_ascii_case("show") {
        return context.show_config();
    }

    match args[0].to_lowercase().as_str() {
        "set" => {
            if args.len() < 3 {
                return Err(CommandError::InvalidArguments(
                    "usage: config set <key> <value>".into(),
                ));
            }
            let key = args[1].to_lowercase();
            let value = args[2..].join(" ");
            context.set_config_value(&key, value.trim())
        }
        other => Err(CommandError::InvalidArguments(format!(
            "unknown config action `{}` (use show or set)",
            other
        ))),
    }
}
