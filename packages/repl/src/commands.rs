//! Shell command parsing and execution.
//!
//! Commands:
//! - `tree` - Print the layout tree
//! - `show <id>` - Print one node
//! - `insert <parent> <index> <Type|json>` - Insert a new node
//! - `move <id> <parent> <index>` - Move a node
//! - `remove <id>` - Remove a node and its subtree
//! - `set <id> <prop-path> <json>` / `unset <id> <prop-path>` - Edit props
//! - `select <id|none>` / `selected` - Selection
//! - `ancestors <id>`, `deps`, `check`, `dump`, `render`, `plugins`
//! - `load <file>` / `save [file]`
//! - `help`, `exit`

use std::path::Path;

use nu_ansi_term::{Color, Style};
use serde_json::Value as JsonValue;

use trellis::layout::{NodeDraft, NodePatch, Placement, PropPath, ROOT_ID};
use trellis::EditCommand;

use crate::context::EditorContext;

/// Result of executing a command
pub enum CommandResult {
    /// Command succeeded, optionally with output to display
    Ok { display: Option<String> },
    /// Command failed with an error message
    Error(String),
    /// User requested to exit
    Exit,
    /// Show help
    Help,
}

impl CommandResult {
    fn ok_display(display: impl Into<String>) -> Self {
        CommandResult::Ok {
            display: Some(display.into()),
        }
    }

    fn ok_none() -> Self {
        CommandResult::Ok { display: None }
    }

    fn ok() -> Self {
        Self::ok_display(Color::Green.paint("ok").to_string())
    }
}

/// Names accepted as the first word of a line, aliases included.
pub const COMMANDS: &[&str] = &[
    "help", "?", "exit", "quit", "q", "tree", "ls", "show", "insert", "add", "move", "mv",
    "remove", "rm", "set", "unset", "select", "selected", "ancestors", "deps", "check", "dump",
    "render", "plugins", "load", "save",
];

/// Parse and execute a command
pub fn execute(input: &str, ctx: &mut EditorContext) -> CommandResult {
    let input = input.trim();
    if input.is_empty() {
        return CommandResult::ok_none();
    }

    let mut parts = input.splitn(2, char::is_whitespace);
    let command = parts.next().unwrap_or("");
    let args = parts.next().unwrap_or("").trim();

    match command.to_lowercase().as_str() {
        "help" | "?" => CommandResult::Help,
        "exit" | "quit" | "q" => CommandResult::Exit,
        "tree" | "ls" => cmd_tree(ctx),
        "show" => cmd_show(args, ctx),
        "insert" | "add" => cmd_insert(args, ctx),
        "move" | "mv" => cmd_move(args, ctx),
        "remove" | "rm" => cmd_remove(args, ctx),
        "set" => cmd_set(args, ctx),
        "unset" => cmd_unset(args, ctx),
        "select" => cmd_select(args, ctx),
        "selected" => cmd_selected(ctx),
        "ancestors" => cmd_ancestors(args, ctx),
        "deps" => cmd_deps(ctx),
        "check" => cmd_check(ctx),
        "dump" => cmd_dump(ctx),
        "render" => cmd_render(ctx),
        "plugins" => cmd_plugins(ctx),
        "load" => cmd_load(args, ctx),
        "save" => cmd_save(args, ctx),
        _ => CommandResult::Error(format!(
            "Unknown command: '{}'. Type 'help' for available commands.",
            command
        )),
    }
}

pub fn format_help() -> String {
    let cmd_style = Style::new().bold().fg(Color::Cyan);
    let arg_style = Style::new().fg(Color::Yellow);
    let desc_style = Style::new().fg(Color::White);

    let mut help = String::new();
    help.push_str(&format!(
        "{}\n\n",
        Style::new().bold().paint("Trellis Layout Shell Commands")
    ));

    let commands = [
        ("tree", "", "Print the layout tree (alias: ls)"),
        ("show", "<id>", "Print one node as JSON"),
        ("ancestors", "<id>", "Print the breadcrumb ending at a node"),
        ("deps", "", "List custom component types in use"),
        ("check", "", "Verify tree integrity"),
        ("", "", ""),
        ("insert", "<parent> <index> <Type|json>", "Insert a node (alias: add)"),
        ("move", "<id> <parent> <index>", "Move a node (alias: mv)"),
        ("remove", "<id>", "Remove a node and its subtree (alias: rm)"),
        ("set", "<id> <prop-path> <json>", "Set a prop"),
        ("unset", "<id> <prop-path>", "Remove a prop"),
        ("select", "<id|none>", "Select a node or clear the selection"),
        ("selected", "", "Print the selected node"),
        ("", "", ""),
        ("dump", "", "Print the raw tree"),
        ("render", "", "Render the tree through plugins"),
        ("plugins", "", "List plugins and their diagnostics"),
        ("load", "<file>", "Replace the tree with a saved one"),
        ("save", "[file]", "Save the tree"),
        ("", "", ""),
        ("help", "", "Show this help message"),
        ("exit", "", "Exit the shell (alias: quit, q)"),
    ];

    for (cmd, args, desc) in commands {
        if cmd.is_empty() {
            help.push('\n');
        } else {
            help.push_str(&format!(
                "  {:<12} {:<30} {}\n",
                cmd_style.paint(cmd),
                arg_style.paint(args),
                desc_style.paint(desc)
            ));
        }
    }

    help.push_str(&format!("\n{}\n", Style::new().bold().paint("Examples")));
    for example in [
        "insert root 0 Row",
        "insert root 1 {\"type\": \"Button\", \"props\": {\"label\": \"Save\"}}",
        "set <id> padding/top 8",
        "move <id> root 0",
    ] {
        help.push_str(&format!("  {}\n", arg_style.paint(example)));
    }

    help.push_str(&format!(
        "\n{}",
        Style::new()
            .italic()
            .paint("Prop paths use '/' or '.' between keys; numbers index arrays")
    ));

    help
}

fn cmd_tree(ctx: &mut EditorContext) -> CommandResult {
    let state = ctx.state();
    let selected = state.selected_id();
    let mut output = String::new();
    let mut stack = vec![(0usize, ROOT_ID.to_string())];

    while let Some((depth, id)) = stack.pop() {
        let Some(node) = state.get_item(&id) else {
            continue;
        };
        let marker = if selected == Some(id.as_str()) {
            Color::Green.bold().paint("*").to_string()
        } else {
            " ".to_string()
        };
        output.push_str(&format!(
            "{}{}{} {}\n",
            marker,
            "  ".repeat(depth),
            Color::Cyan.paint(node.kind.to_string()),
            Color::DarkGray.paint(&node.id)
        ));
        stack.extend(node.children.iter().rev().map(|c| (depth + 1, c.clone())));
    }

    CommandResult::ok_display(output.trim_end().to_string())
}

fn cmd_show(args: &str, ctx: &mut EditorContext) -> CommandResult {
    let Some(id) = single_arg(args) else {
        return usage("show <id>");
    };
    match ctx.state().get_item(id) {
        Some(node) => CommandResult::ok_display(format_json(&node.to_value())),
        None => CommandResult::Error(format!("No node '{}'", id)),
    }
}

fn cmd_insert(args: &str, ctx: &mut EditorContext) -> CommandResult {
    let mut parts = args.splitn(3, char::is_whitespace);
    let (Some(parent), Some(index), Some(item)) = (parts.next(), parts.next(), parts.next())
    else {
        return usage("insert <parent> <index> <Type|json>");
    };
    let index = match parse_index(index) {
        Ok(i) => i,
        Err(e) => return CommandResult::Error(e),
    };
    let draft = match parse_draft(item.trim()) {
        Ok(draft) => draft,
        Err(e) => return CommandResult::Error(e),
    };

    let command = EditCommand::InsertOrMove {
        parent: parent.to_string(),
        index,
        item: Placement::Insert(draft),
    };
    match ctx.apply(command) {
        Ok(Some(id)) => CommandResult::ok_display(format!(
            "{} {}",
            Color::Green.paint("ok"),
            Color::Magenta.paint(id)
        )),
        Ok(None) => CommandResult::ok(),
        Err(e) => CommandResult::Error(e.to_string()),
    }
}

fn cmd_move(args: &str, ctx: &mut EditorContext) -> CommandResult {
    let words: Vec<&str> = args.split_whitespace().collect();
    let [id, parent, index] = words.as_slice() else {
        return usage("move <id> <parent> <index>");
    };
    let index = match parse_index(index) {
        Ok(i) => i,
        Err(e) => return CommandResult::Error(e),
    };
    apply(
        ctx,
        EditCommand::InsertOrMove {
            parent: parent.to_string(),
            index,
            item: Placement::Move { id: id.to_string() },
        },
    )
}

fn cmd_remove(args: &str, ctx: &mut EditorContext) -> CommandResult {
    let Some(id) = single_arg(args) else {
        return usage("remove <id>");
    };
    if id == ROOT_ID {
        return CommandResult::ok_display(Color::Yellow.paint("the root stays").to_string());
    }
    apply(ctx, EditCommand::Remove { id: id.to_string() })
}

fn cmd_set(args: &str, ctx: &mut EditorContext) -> CommandResult {
    let mut parts = args.splitn(3, char::is_whitespace);
    let (Some(id), Some(path), Some(value)) = (parts.next(), parts.next(), parts.next()) else {
        return usage("set <id> <prop-path> <json>");
    };
    let path = match PropPath::parse(path) {
        Ok(p) => p,
        Err(e) => return CommandResult::Error(e.to_string()),
    };
    let value: JsonValue = match serde_json::from_str(value.trim()) {
        Ok(v) => v,
        Err(e) => return CommandResult::Error(format!("Invalid JSON: {}", e)),
    };
    apply(
        ctx,
        EditCommand::Update {
            id: id.to_string(),
            patch: NodePatch::new().set_prop(path, value),
        },
    )
}

fn cmd_unset(args: &str, ctx: &mut EditorContext) -> CommandResult {
    let words: Vec<&str> = args.split_whitespace().collect();
    let [id, path] = words.as_slice() else {
        return usage("unset <id> <prop-path>");
    };
    let path = match PropPath::parse(path) {
        Ok(p) => p,
        Err(e) => return CommandResult::Error(e.to_string()),
    };
    apply(
        ctx,
        EditCommand::Update {
            id: id.to_string(),
            patch: NodePatch::new().remove_prop(path),
        },
    )
}

fn cmd_select(args: &str, ctx: &mut EditorContext) -> CommandResult {
    let Some(id) = single_arg(args) else {
        return usage("select <id|none>");
    };
    let id = match id {
        "none" => None,
        id if ctx.state().contains(id) => Some(id.to_string()),
        id => return CommandResult::Error(format!("No node '{}'", id)),
    };
    match ctx.apply(EditCommand::Select { id }) {
        Ok(_) => CommandResult::ok_none(),
        Err(e) => CommandResult::Error(e.to_string()),
    }
}

fn cmd_selected(ctx: &mut EditorContext) -> CommandResult {
    match ctx.state().get_selected() {
        Some(node) => CommandResult::ok_display(format!(
            "{} {}",
            Color::Cyan.paint(node.kind.to_string()),
            Color::Magenta.paint(&node.id)
        )),
        None => CommandResult::ok_display(Color::Yellow.paint("(nothing selected)").to_string()),
    }
}

fn cmd_ancestors(args: &str, ctx: &mut EditorContext) -> CommandResult {
    let Some(id) = single_arg(args) else {
        return usage("ancestors <id>");
    };
    let ancestors = ctx.state().get_ancestors(id);
    if ancestors.is_empty() {
        return CommandResult::Error(format!("No node '{}'", id));
    }
    let crumbs: Vec<String> = ancestors
        .iter()
        .map(|node| format!("{} {}", node.kind, Color::DarkGray.paint(&node.id)))
        .collect();
    CommandResult::ok_display(crumbs.join(&format!(" {} ", Color::Blue.paint(">"))))
}

fn cmd_deps(ctx: &mut EditorContext) -> CommandResult {
    let deps = ctx.state().get_dependencies();
    if deps.is_empty() {
        return CommandResult::ok_display(Color::Yellow.paint("(no custom components)").to_string());
    }
    let lines: Vec<String> = deps
        .iter()
        .map(|name| format!("  {}", Color::Cyan.paint(name)))
        .collect();
    CommandResult::ok_display(lines.join("\n"))
}

fn cmd_check(ctx: &mut EditorContext) -> CommandResult {
    match ctx.state().check_integrity() {
        Ok(()) => CommandResult::ok(),
        Err(e) => CommandResult::Error(format!("Integrity: {}", e)),
    }
}

fn cmd_dump(ctx: &mut EditorContext) -> CommandResult {
    CommandResult::ok_display(format_json(&ctx.state().to_raw()))
}

fn cmd_render(ctx: &mut EditorContext) -> CommandResult {
    let element = match ctx.builder().render() {
        Ok(element) => element,
        Err(e) => return CommandResult::Error(e.to_string()),
    };
    match serde_json::to_value(&element) {
        Ok(value) => CommandResult::ok_display(format_json(&value)),
        Err(e) => CommandResult::Error(e.to_string()),
    }
}

fn cmd_plugins(ctx: &mut EditorContext) -> CommandResult {
    let bundle = ctx.builder().bundle();
    let mut output = String::new();
    if bundle.plugins.is_empty() {
        output.push_str(&format!("{}\n", Color::Yellow.paint("(no plugins)")));
    }
    for plugin in &bundle.plugins {
        output.push_str(&format!(
            "  {} {}\n",
            Color::Cyan.paint(&plugin.name),
            Color::DarkGray.paint(plugin.capabilities().join(", "))
        ));
    }
    for diagnostic in ctx.diagnostics() {
        output.push_str(&format!("  {} {}\n", Color::Red.paint("!"), diagnostic));
    }
    CommandResult::ok_display(output.trim_end().to_string())
}

fn cmd_load(args: &str, ctx: &mut EditorContext) -> CommandResult {
    if args.is_empty() {
        return usage("load <file>");
    }
    match ctx.load(Path::new(args)) {
        Ok(()) => CommandResult::ok_display(format!(
            "{} {} nodes",
            Color::Green.paint("ok"),
            ctx.state().len()
        )),
        Err(e) => CommandResult::Error(e),
    }
}

fn cmd_save(args: &str, ctx: &mut EditorContext) -> CommandResult {
    let path = (!args.is_empty()).then(|| Path::new(args));
    match ctx.save(path) {
        Ok(path) => CommandResult::ok_display(format!(
            "{} {}",
            Color::Green.paint("saved"),
            path.display()
        )),
        Err(e) => CommandResult::Error(e),
    }
}

fn apply(ctx: &mut EditorContext, command: EditCommand) -> CommandResult {
    match ctx.apply(command) {
        Ok(_) => CommandResult::ok(),
        Err(e) => CommandResult::Error(e.to_string()),
    }
}

fn usage(text: &str) -> CommandResult {
    CommandResult::Error(format!("Usage: {}", text))
}

fn single_arg(args: &str) -> Option<&str> {
    let mut words = args.split_whitespace();
    match (words.next(), words.next()) {
        (Some(word), None) => Some(word),
        _ => None,
    }
}

fn parse_index(text: &str) -> Result<usize, String> {
    text.parse()
        .map_err(|_| format!("Invalid index '{}': expected a non-negative integer", text))
}

/// A bare word is a type name; anything else must be a JSON draft.
fn parse_draft(text: &str) -> Result<NodeDraft, String> {
    if text.starts_with('{') {
        serde_json::from_str(text).map_err(|e| format!("Invalid JSON: {}", e))
    } else if text.split_whitespace().count() == 1 {
        Ok(NodeDraft::new(text))
    } else {
        Err(format!("Expected a type name or JSON object, got '{}'", text))
    }
}

/// Format JSON with syntax highlighting
fn format_json(value: &JsonValue) -> String {
    let pretty = serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string());

    let mut result = String::new();
    let mut in_string = false;
    let mut escape_next = false;
    let mut word = String::new();

    let flush_word = |word: &mut String, result: &mut String| {
        if !word.is_empty() {
            result.push_str(&Color::Yellow.paint(word.as_str()).to_string());
            word.clear();
        }
    };

    for c in pretty.chars() {
        if in_string {
            result.push_str(&Color::Green.paint(c.to_string()).to_string());
            if escape_next {
                escape_next = false;
            } else if c == '\\' {
                escape_next = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }

        if c.is_ascii_alphabetic() {
            word.push(c);
            continue;
        }
        flush_word(&mut word, &mut result);

        match c {
            '"' => {
                in_string = true;
                result.push_str(&Color::Green.paint("\"").to_string());
            }
            '{' | '}' | '[' | ']' => {
                result.push_str(&Color::White.bold().paint(c.to_string()).to_string())
            }
            ':' | ',' => result.push_str(&Color::White.paint(c.to_string()).to_string()),
            _ if c.is_ascii_digit() || c == '.' || c == '-' => {
                result.push_str(&Color::Cyan.paint(c.to_string()).to_string())
            }
            _ => result.push(c),
        }
    }
    flush_word(&mut word, &mut result);

    result
}
