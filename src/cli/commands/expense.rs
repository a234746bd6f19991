use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::forms::{FormField, ValidationError};
use crate::cli::io;
use crate::cli::registry::{ArgCompletion, CommandEntry};
use crate::core::services::CategoryFilter;
use crate::domain::ExpenseId;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "add",
            "Fill the expense form in one go and submit it",
            "add <description> <amount> [category] [date]",
            cmd_add,
        ),
        CommandEntry::new("form", "Show the current form draft", "form", cmd_form),
        CommandEntry::new(
            "set",
            "Update one field of the form draft",
            "set <description|amount|category|date> <value>",
            cmd_set,
        )
        .completes(ArgCompletion::FormField),
        CommandEntry::new("submit", "Validate and submit the draft", "submit", cmd_submit),
        CommandEntry::new("reset", "Restore the draft defaults", "reset", cmd_reset),
        CommandEntry::new(
            "list",
            "Show expenses matching the current filter",
            "list",
            cmd_list,
        )
        .with_aliases(&["ls"]),
        CommandEntry::new(
            "filter",
            "Change the list's category filter",
            "filter <all|category>",
            cmd_filter,
        )
        .completes(ArgCompletion::Filter),
        CommandEntry::new(
            "highlight",
            "Toggle the highlight on an expense card",
            "highlight <id>",
            cmd_highlight,
        ),
        CommandEntry::new(
            "toggle-category",
            "Show or hide the category on an expense card",
            "toggle-category <id>",
            cmd_toggle_category,
        ),
        CommandEntry::new("delete", "Delete an expense", "delete <id>", cmd_delete)
            .with_aliases(&["rm"]),
        CommandEntry::new(
            "summary",
            "Show the header, totals and category breakdown",
            "summary",
            cmd_summary,
        ),
    ]
}

fn cmd_add(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if args.len() < 2 || args.len() > 4 {
        return Err(CommandError::InvalidArguments(
            "usage: add <description> <amount> [category] [date]".into(),
        ));
    }
    let mut form = context.form.detached();
    for (field, value) in FormField::ALL.into_iter().zip(args) {
        form.update_field(field, *value);
    }
    let data = form.submit()?;
    context.add_expense(data)
}

fn cmd_form(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    context.show_form();
    Ok(())
}

fn cmd_set(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if args.len() < 2 {
        return Err(CommandError::InvalidArguments(
            "usage: set <description|amount|category|date> <value>".into(),
        ));
    }
    let field: FormField = args[0]
        .parse()
        .map_err(|err: ValidationError| CommandError::InvalidArguments(err.message))?;
    let value = args[1..].join(" ");
    context.form.update_field(field, value);
    io::print_info(format!("{} set.", field.label().trim_end_matches(" *")));
    Ok(())
}

fn cmd_submit(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    context.submit_form()
}

fn cmd_reset(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    context.form.reset();
    io::print_info("Form reset.");
    Ok(())
}

fn cmd_list(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    context.show_list()
}

fn cmd_filter(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if args.is_empty() {
        let options: Vec<String> = CategoryFilter::options()
            .into_iter()
            .map(|filter| filter.to_string())
            .collect();
        io::print_info(format!("Current filter: {}", context.list.filter()));
        io::print_hint(format!("Options: {}", options.join(", ")));
        return Ok(());
    }
    let filter: CategoryFilter = args.join(" ").parse()?;
    context.list.set_filter(filter);
    io::print_info(format!("Filter by category: {}", filter));
    Ok(())
}

fn cmd_highlight(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let id = parse_id(args, "highlight <id>")?;
    let state = context.toggle_highlight(id)?;
    if state.highlighted {
        io::print_info(format!("Expense #{} highlighted.", id));
    } else {
        io::print_info(format!("Expense #{} no longer highlighted.", id));
    }
    Ok(())
}

fn cmd_toggle_category(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let id = parse_id(args, "toggle-category <id>")?;
    let state = context.toggle_category_visible(id)?;
    if state.category_visible {
        io::print_info(format!("Category shown for expense #{}.", id));
    } else {
        io::print_info(format!("Category hidden for expense #{}.", id));
    }
    Ok(())
}

fn cmd_delete(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let id = parse_id(args, "delete <id>")?;
    context.delete_expense(id)
}

fn cmd_summary(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    context.show_summary()
}

fn parse_id(args: &[&str], usage: &str) -> Result<ExpenseId, CommandError> {
    match args {
        [raw] => Ok(raw.parse()?),
        _ => Err(CommandError::InvalidArguments(format!("usage: {}", usage))),
    }
}
