//! General REPL commands (help, quit, clear)

use crate::commands::{CommandContext, CommandResult};
use colored::*;

/// Handle `help` command
pub fn cmd_help(_args: &str, _ctx: &mut CommandContext) -> CommandResult {
    print_help();
    CommandResult::Success
}

/// Handle `quit` or `exit` command
pub fn cmd_quit(_args: &str, _ctx: &mut CommandContext) -> CommandResult {
    CommandResult::Exit
}

/// Handle `clear` command: drop every variable binding, keep functions
pub fn cmd_clear(_args: &str, ctx: &mut CommandContext) -> CommandResult {
    ctx.interpreter.clear_scopes();
    CommandResult::Message("All variables cleared.".to_string())
}

/// Print help information
fn print_help() {
    println!("{}", "Funl Language Help".bold());
    println!("{}", "==================".bold());
    println!();
    println!("{}", "Expressions:".green());
    println!("  {}            - Arithmetic (* and / bind tighter)", "1 + 2 * 3".cyan());
    println!("  {}         - Call a function", "minus(10, 4)".cyan());
    println!("  {}            - Bind a value", "val x = 5".cyan());
    println!("  {}     - Evaluate in order, yield the last", "val y = 2, y * y".cyan());
    println!(
        "  {} - Positive conditions take 'then'",
        "if x then 1 else 2 end".cyan()
    );
    println!("  {}    - Read a number from the console", "read \"Enter x: \"".cyan());
    println!();
    println!("{}", "Definitions:".green());
    println!(
        "  {} - Define a function",
        "def minus x y = x - y end".cyan()
    );
    println!();
    println!("{}", "Examples:".green());
    println!("  funl> {}", "def minus x y = x - y end".cyan());
    println!("  def(minus $seq(x y)$seq(-(x y)))");
    println!();
    println!("  funl> {}", "minus(10, 4)".cyan());
    println!("  6.0");
    println!();
    println!("{}", "Commands:".green());
    println!("  {}    - Load function definitions from a file", "load <file>".bright_green());
    println!("  {}      - List defined functions", "functions".bright_green());
    println!("  {}           - List variable bindings", "vars".bright_green());
    println!("  {}    - Show the parse tree of an expression", "tree <expr>".bright_green());
    println!("  {}          - Forget all variables", "clear".bright_green());
    println!("  {}           - Show this help", "help".bright_green());
    println!("  {}           - Exit the REPL", "quit".bright_red());
}

#[cfg(test)]
mod tests {
    use super::*;
    use funl_core::Interpreter;

    #[test]
    fn test_clear_keeps_functions() {
        let mut ctx = CommandContext::new(Interpreter::new());
        ctx.interpreter.define("def one = 1 end").unwrap();
        ctx.eval("val x = 1").unwrap();

        assert!(matches!(cmd_clear("", &mut ctx), CommandResult::Message(_)));
        assert!(ctx.interpreter.bindings().is_empty());
        assert_eq!(ctx.eval("one()").unwrap().to_string(), "1.0");
    }

    #[test]
    fn test_quit() {
        let mut ctx = CommandContext::new(Interpreter::new());
        assert_eq!(cmd_quit("", &mut ctx), CommandResult::Exit);
    }
}
