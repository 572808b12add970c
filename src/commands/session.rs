//! Session commands (load, functions, vars, tree)

use crate::commands::{CommandContext, CommandResult};
use anyhow::{bail, Context, Result};
use colored::*;
use std::io::ErrorKind;
use std::path::Path;

/// Read a program file, telling a missing file apart from an unreadable one
pub fn read_program(path: &Path) -> Result<String> {
    match std::fs::read_to_string(path) {
        Ok(text) => Ok(text),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            bail!("Input Error: file '{}' not found", path.display())
        }
        Err(e) => Err(e)
            .with_context(|| format!("Input Error: unable to read '{}'", path.display())),
    }
}

/// Replace the session's functions with those defined in `path`.
/// Returns the loaded names, sorted.
pub fn load_program(ctx: &mut CommandContext, path: &Path) -> Result<Vec<String>> {
    let program = read_program(path)?;

    let interactive = ctx.interpreter.config().interactive;
    ctx.interpreter.set_interactive(false);
    let loaded = ctx.interpreter.define(&program);
    ctx.interpreter.set_interactive(interactive);

    loaded.with_context(|| format!("failed to load '{}'", path.display()))
}

/// Handle `load <file>` command
pub fn cmd_load(args: &str, ctx: &mut CommandContext) -> CommandResult {
    if args.is_empty() {
        return CommandResult::Error("Usage: load <file>".to_string());
    }

    match load_program(ctx, Path::new(args)) {
        Ok(names) => CommandResult::Message(format!(
            "{} functions loaded successfully:\n{}",
            names.len(),
            list_names(&names)
        )),
        Err(e) => CommandResult::Error(format!("{:#}", e)),
    }
}

/// Handle `functions` command
pub fn cmd_functions(_args: &str, ctx: &mut CommandContext) -> CommandResult {
    let names = ctx.interpreter.function_names();
    if names.is_empty() {
        return CommandResult::Message("No functions defined.".to_string());
    }
    CommandResult::Message(list_names(&names))
}

/// Handle `vars` command
pub fn cmd_vars(_args: &str, ctx: &mut CommandContext) -> CommandResult {
    let bindings = ctx.interpreter.bindings();
    if bindings.is_empty() {
        return CommandResult::Message("No variables defined.".to_string());
    }
    let lines: Vec<String> = bindings
        .iter()
        .map(|(name, value)| format!("  {} = {}", name.cyan(), value))
        .collect();
    CommandResult::Message(lines.join("\n"))
}

/// Handle `tree <expr>` command: show the parse tree without evaluating
pub fn cmd_tree(args: &str, ctx: &mut CommandContext) -> CommandResult {
    if args.is_empty() {
        return CommandResult::Error("Usage: tree <expr>".to_string());
    }
    match ctx.interpreter.parse_input(args) {
        Ok(tree) => CommandResult::Message(tree.pretty().trim_end().to_string()),
        Err(e) => CommandResult::Error(e.to_string()),
    }
}

fn list_names(names: &[String]) -> String {
    names
        .iter()
        .map(|name| format!("  {}", name.cyan()))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use funl_core::Interpreter;
    use std::path::PathBuf;

    fn context() -> CommandContext {
        CommandContext::new(Interpreter::new())
    }

    fn temp_program(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("funl-{}-{}.funl", name, std::process::id()));
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_load_program() {
        let path = temp_program("load", "def minus x y = x - y end\ndef one = 1 end\n");
        let mut ctx = context();

        let names = load_program(&mut ctx, &path).unwrap();
        assert_eq!(names, vec!["minus", "one"]);
        assert_eq!(ctx.eval("minus(10, 4)").unwrap().to_string(), "6.0");

        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_load_restores_interactive_flag() {
        let path = temp_program("flag", "def one = 1 end");
        let mut ctx = CommandContext::new(Interpreter::with_config(
            funl_core::EvalConfig::default().with_interactive(true),
        ));

        load_program(&mut ctx, &path).unwrap();
        assert!(ctx.interpreter.config().interactive);

        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_load_missing_file() {
        let mut ctx = context();
        let err = load_program(&mut ctx, Path::new("/definitely/not/here.funl")).unwrap_err();
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn test_load_bad_program_keeps_functions() {
        let path = temp_program("bad", "def broken = end");
        let mut ctx = context();
        ctx.interpreter.define("def one = 1 end").unwrap();

        match cmd_load(path.to_str().unwrap(), &mut ctx) {
            CommandResult::Error(message) => {
                assert!(message.contains("no expressions after equal sign"))
            }
            other => panic!("expected an error, got {:?}", other),
        }
        assert_eq!(ctx.interpreter.function_names(), vec!["one"]);

        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_load_usage() {
        let mut ctx = context();
        assert!(matches!(cmd_load("", &mut ctx), CommandResult::Error(_)));
    }

    #[test]
    fn test_functions_and_vars() {
        let mut ctx = context();
        assert_eq!(
            cmd_functions("", &mut ctx),
            CommandResult::Message("No functions defined.".to_string())
        );

        ctx.interpreter.define("def one = 1 end").unwrap();
        ctx.eval("val x = 2").unwrap();

        match cmd_functions("", &mut ctx) {
            CommandResult::Message(list) => assert!(list.contains("one")),
            other => panic!("unexpected {:?}", other),
        }
        match cmd_vars("", &mut ctx) {
            CommandResult::Message(list) => assert!(list.contains("2.0")),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_tree_shows_parse() {
        let mut ctx = context();
        assert_eq!(
            cmd_tree("1 + 2 * 3", &mut ctx),
            CommandResult::Message("+\n|  1.0\n|  *\n|  |  2.0\n|  |  3.0".to_string())
        );
        assert!(matches!(cmd_tree("* 3", &mut ctx), CommandResult::Error(_)));
    }
}
