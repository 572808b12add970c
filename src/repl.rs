//! REPL (Read-Eval-Print Loop) for the Funl language

use crate::commands::{create_registry, CommandContext, CommandResult};
use crate::config::ReplConfig;
use anyhow::Result;
use colored::*;
use funl_core::parser::LineSource;
use funl_core::Interpreter;
use rustyline::error::ReadlineError;
use rustyline::{DefaultEditor, Result as RustylineResult};
use std::io;
use tracing::debug;

/// Interactive REPL for the Funl language
pub struct Repl {
    editor: DefaultEditor,
    config: ReplConfig,
    ctx: CommandContext,
}

impl Repl {
    /// Create a new REPL instance; `read` expressions take numbers from stdin
    pub fn new(config: ReplConfig) -> RustylineResult<Self> {
        let editor = DefaultEditor::new()?;
        let input = LineSource::new(io::BufReader::new(io::stdin()), io::stdout());
        let interpreter = Interpreter::with_input(config.eval_config(), Box::new(input));

        Ok(Repl {
            editor,
            config,
            ctx: CommandContext::new(interpreter),
        })
    }

    /// Session state shared with command handlers
    pub fn context(&mut self) -> &mut CommandContext {
        &mut self.ctx
    }

    /// Start the REPL loop
    pub fn run(&mut self) -> Result<()> {
        println!("{}", "Funl Functional Language".bright_cyan().bold());
        println!(
            "Type expressions like: {}, {}, {}",
            "1 + 2 * 3".cyan(),
            "def sq x = x * x end".cyan(),
            "sq(7)".cyan()
        );
        println!(
            "Type '{}' for more information, '{}' or {} to exit.\n",
            "help".bright_green(),
            "quit".bright_red(),
            "Ctrl+C".bright_red()
        );

        let registry = create_registry();

        loop {
            let prompt = format!("{} ", self.config.prompt.bright_magenta().bold());
            match self.editor.readline(&prompt) {
                Ok(line) => {
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }
                    self.editor.add_history_entry(line.to_owned())?;

                    match registry.execute(line, &mut self.ctx) {
                        CommandResult::Success => {}
                        CommandResult::Message(msg) => {
                            println!("{}", msg);
                        }
                        CommandResult::Exit => {
                            println!("{}", "Quit Funl REPL.".bright_cyan());
                            break;
                        }
                        CommandResult::Error(e) => {
                            println!("{} {}", "Error:".bright_red().bold(), e.red());
                        }
                        CommandResult::NotACommand => {
                            debug!(line, "evaluating");
                            match self.ctx.eval(line) {
                                Ok(value) => println!("{}", value),
                                Err(e) => println!("{}", e.to_string().red()),
                            }
                        }
                    }
                }
                Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => {
                    println!("{}", "Quit Funl REPL.".bright_cyan());
                    break;
                }
                Err(err) => {
                    println!(
                        "{} {}",
                        "Error reading input:".bright_red().bold(),
                        err.to_string().red()
                    );
                }
            }
        }

        Ok(())
    }
}

/// Convenience function to start the REPL, optionally loading a program first
pub fn start(config: ReplConfig, program: Option<&str>) -> Result<()> {
    let mut repl =
        Repl::new(config).map_err(|e| anyhow::anyhow!("Failed to initialize REPL: {}", e))?;

    if let Some(path) = program {
        let command = format!("load {}", path);
        match create_registry().execute(&command, repl.context()) {
            CommandResult::Message(msg) => println!("{}", msg),
            CommandResult::Error(e) => println!("{} {}", "Error:".bright_red().bold(), e.red()),
            _ => {}
        }
    }

    repl.run()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repl_creation() {
        let result = Repl::new(ReplConfig::default());
        assert!(result.is_ok());
    }

    #[test]
    fn test_repl_session_is_interactive() {
        let mut repl = Repl::new(ReplConfig::default()).unwrap();
        let ctx = repl.context();
        ctx.eval("val x = 1").unwrap();
        assert_eq!(ctx.eval("val x = 2").unwrap().to_string(), "2.0");
    }
}
