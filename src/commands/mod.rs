//! Command registry for REPL commands
//!
//! Lines that start with a registered prefix are handled here; everything
//! else is evaluated as Funl input.

pub mod general;
pub mod session;

use funl_core::{FunlError, Interpreter, Tree, Token};

/// Result of executing a command
#[derive(Debug, PartialEq)]
pub enum CommandResult {
    /// Command executed successfully, continue REPL
    Success,
    /// Command executed, show this message
    Message(String),
    /// Exit the REPL
    Exit,
    /// Not a command, try evaluating as Funl input
    NotACommand,
    /// Error occurred
    Error(String),
}

/// Context passed to command handlers
pub struct CommandContext {
    pub interpreter: Interpreter,
}

impl CommandContext {
    pub fn new(interpreter: Interpreter) -> Self {
        Self { interpreter }
    }

    /// Evaluate one line of Funl input
    pub fn eval(&mut self, input: &str) -> Result<Tree<Token>, FunlError> {
        self.interpreter.eval_line(input)
    }
}

/// A command handler function
pub type CommandHandler = fn(&str, &mut CommandContext) -> CommandResult;

/// Registry of available commands
pub struct CommandRegistry {
    /// Sorted by prefix length descending for longest-match-first lookup
    commands: Vec<(String, CommandHandler)>,
}

impl CommandRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            commands: Vec::new(),
        }
    }

    /// Register a command with its prefix
    pub fn register(&mut self, prefix: &str, handler: CommandHandler) {
        self.commands.push((prefix.to_string(), handler));
        self.commands.sort_by(|a, b| b.0.len().cmp(&a.0.len()));
    }

    /// Execute a command, returning NotACommand if no match found
    pub fn execute(&self, input: &str, ctx: &mut CommandContext) -> CommandResult {
        for (prefix, handler) in &self.commands {
            if input == prefix || input.starts_with(&format!("{} ", prefix)) {
                let args = input[prefix.len()..].trim();
                return handler(args, ctx);
            }
        }
        CommandResult::NotACommand
    }

    /// Get all registered command prefixes
    pub fn list_commands(&self) -> Vec<&str> {
        self.commands.iter().map(|(p, _)| p.as_str()).collect()
    }
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Create a fully populated command registry with all built-in commands
pub fn create_registry() -> CommandRegistry {
    let mut registry = CommandRegistry::new();

    // General commands
    registry.register("help", general::cmd_help);
    registry.register("quit", general::cmd_quit);
    registry.register("exit", general::cmd_quit);
    registry.register("clear", general::cmd_clear);

    // Session commands
    registry.register("load", session::cmd_load);
    registry.register("functions", session::cmd_functions);
    registry.register("vars", session::cmd_vars);
    registry.register("tree", session::cmd_tree);

    registry
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context() -> CommandContext {
        CommandContext::new(Interpreter::new())
    }

    #[test]
    fn test_registry_dispatch() {
        let registry = create_registry();
        let mut ctx = context();

        assert_eq!(registry.execute("quit", &mut ctx), CommandResult::Exit);
        assert_eq!(registry.execute("exit", &mut ctx), CommandResult::Exit);
        assert_eq!(registry.execute("1 + 2", &mut ctx), CommandResult::NotACommand);
    }

    #[test]
    fn test_prefix_must_be_whole_word() {
        let registry = create_registry();
        let mut ctx = context();

        // Funl names that merely start with a command word are not commands
        assert_eq!(registry.execute("treetop(1)", &mut ctx), CommandResult::NotACommand);
        assert_eq!(registry.execute("vars2", &mut ctx), CommandResult::NotACommand);
    }

    #[test]
    fn test_longest_prefix_first() {
        fn short(_: &str, _: &mut CommandContext) -> CommandResult {
            CommandResult::Message("short".to_string())
        }
        fn long(args: &str, _: &mut CommandContext) -> CommandResult {
            CommandResult::Message(format!("long {}", args))
        }

        let mut registry = CommandRegistry::new();
        registry.register("show", short);
        registry.register("show all", long);
        let mut ctx = context();

        assert_eq!(
            registry.execute("show all  x ", &mut ctx),
            CommandResult::Message("long x".to_string())
        );
        assert_eq!(
            registry.execute("show", &mut ctx),
            CommandResult::Message("short".to_string())
        );
        assert_eq!(registry.list_commands(), vec!["show all", "show"]);
    }

    #[test]
    fn test_context_eval() {
        let mut ctx = context();
        assert_eq!(ctx.eval("2 * 21").unwrap().to_string(), "42.0");
    }
}
