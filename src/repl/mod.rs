//! Interactive shell
//!
//! Line-buffering REPL with a bracket/string completeness heuristic for
//! multi-line input, plus `:`-prefixed meta-commands for inspecting
//! tokens, the parsed AST and the current environment.

use std::io::{self, BufRead, Write};

use crate::runtime::Evaluator;
use crate::{parse, tokenize, Evaluation};

const PROMPT: &str = ">> ";
const SECONDARY_PROMPT: &str = ".. ";

const MONKEY_FACE: &str = r#"            __,__
   .--.  .-"     "-.  .--.
  / .. \/  .-. .-.  \/ .. \
 | |  '|  /   Y   \  |'  | |
 | \   \  \ 0 | 0 /  /   / |
  \ '- ,\.-"`` ``"-./, -' /
   `'-' /_   ^ ^   _\ '-'
       |  \._   _./  |
       \   \ `~` /   /
        '._ '-=-' _.'
           '~---~'
"#;

/// Decide whether buffered input forms a complete unit: all brackets
/// balanced and no string literal left open. A cheap scan, not a parse;
/// it only has to be right enough to pick the next prompt.
pub fn is_input_complete(input: &str) -> bool {
    let mut open_braces = 0u32;
    let mut open_parens = 0u32;
    let mut open_brackets = 0u32;
    let mut in_string = false;
    let mut escaped = false;

    for ch in input.chars() {
        if in_string {
            if escaped {
                escaped = false;
                continue;
            }
            match ch {
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match ch {
            '"' => in_string = true,
            '{' => open_braces += 1,
            '}' => open_braces = open_braces.saturating_sub(1),
            '(' => open_parens += 1,
            ')' => open_parens = open_parens.saturating_sub(1),
            '[' => open_brackets += 1,
            ']' => open_brackets = open_brackets.saturating_sub(1),
            _ => {}
        }
    }

    !in_string && open_braces == 0 && open_parens == 0 && open_brackets == 0
}

/// What to do with the next completed input, set by `:tokens`/`:ast`
/// without inline arguments.
enum PendingAction {
    Evaluate,
    Tokens,
    Ast,
}

/// One interactive session: a persistent evaluator plus the multi-line
/// input buffer.
pub struct Repl {
    evaluator: Evaluator,
    buffer: String,
    pending: PendingAction,
}

impl Repl {
    pub fn new() -> Self {
        Self {
            evaluator: Evaluator::new(),
            buffer: String::new(),
            pending: PendingAction::Evaluate,
        }
    }

    /// Read lines from stdin until `:quit`/`:exit` or end of input.
    pub fn run(&mut self) -> io::Result<()> {
        let stdin = io::stdin();
        let mut out = io::stdout();

        out.write_all(PROMPT.as_bytes())?;
        out.flush()?;

        for line in stdin.lock().lines() {
            if self.handle_line(&line?, &mut out)? {
                break;
            }
            let prompt = if self.buffer.is_empty() {
                PROMPT
            } else {
                SECONDARY_PROMPT
            };
            out.write_all(prompt.as_bytes())?;
            out.flush()?;
        }

        Ok(())
    }

    /// Process one input line. Returns true when the session should end.
    fn handle_line(&mut self, line: &str, out: &mut impl Write) -> io::Result<bool> {
        let trimmed = line.trim();

        if self.buffer.is_empty() {
            if trimmed == ":quit" || trimmed == ":exit" {
                return Ok(true);
            }
            if trimmed.starts_with(':') {
                self.handle_meta_command(trimmed, out)?;
                return Ok(false);
            }
        }

        if !self.buffer.is_empty() {
            self.buffer.push('\n');
        }
        self.buffer.push_str(line);

        if !is_input_complete(&self.buffer) {
            return Ok(false);
        }

        let input = std::mem::take(&mut self.buffer);
        match self.pending {
            PendingAction::Tokens => {
                self.pending = PendingAction::Evaluate;
                print_tokens(&input, out)?;
            }
            PendingAction::Ast => {
                self.pending = PendingAction::Evaluate;
                print_ast(&input, out)?;
            }
            PendingAction::Evaluate => self.evaluate_input(&input, out)?,
        }

        Ok(false)
    }

    fn handle_meta_command(&mut self, trimmed: &str, out: &mut impl Write) -> io::Result<()> {
        let (command, argument) = match trimmed.split_once(char::is_whitespace) {
            Some((command, rest)) => (command, rest.trim()),
            None => (trimmed, ""),
        };

        match command {
            ":help" => print_help(out),
            ":tokens" => {
                if argument.is_empty() {
                    self.pending = PendingAction::Tokens;
                    writeln!(
                        out,
                        "Token debug mode: enter the next complete input to inspect tokens."
                    )
                } else {
                    print_tokens(argument, out)
                }
            }
            ":ast" => {
                if argument.is_empty() {
                    self.pending = PendingAction::Ast;
                    writeln!(
                        out,
                        "AST debug mode: enter the next complete input to inspect the parsed AST."
                    )
                } else {
                    print_ast(argument, out)
                }
            }
            ":env" => self.print_environment(out),
            other => writeln!(
                out,
                "Unknown command: {}. Type :help for available commands.",
                other
            ),
        }
    }

    fn evaluate_input(&mut self, input: &str, out: &mut impl Write) -> io::Result<()> {
        match crate::evaluate(input, &mut self.evaluator) {
            Evaluation::Value(value) => writeln!(out, "{}", value),
            Evaluation::ParseErrors(errors) => print_parse_errors(&errors, out),
            Evaluation::RuntimeError(error) => writeln!(out, "{}", error.format_multiline()),
        }
    }

    fn print_environment(&self, out: &mut impl Write) -> io::Result<()> {
        writeln!(out, "ENV:")?;
        let env = self.evaluator.env();
        let env = env.borrow();
        let names = env.local_names();
        if names.is_empty() {
            return writeln!(out, "  (empty)");
        }
        for name in names {
            if let Some(value) = env.get(&name) {
                writeln!(out, "  {} = {}", name, value)?;
            }
        }
        Ok(())
    }
}

impl Default for Repl {
    fn default() -> Self {
        Self::new()
    }
}

fn print_help(out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "Available commands:")?;
    writeln!(out, "  :help                Show this help message.")?;
    writeln!(
        out,
        "  :tokens [input]      Show tokens for inline input, or for the next complete input when omitted."
    )?;
    writeln!(
        out,
        "  :ast [input]         Show the parsed program for inline input, or for the next complete input when omitted."
    )?;
    writeln!(out, "  :env                 Show current environment bindings.")?;
    writeln!(out, "  :quit / :exit        Exit the REPL.")?;
    writeln!(
        out,
        "Note: meta-commands are only accepted when the multiline buffer is empty."
    )
}

fn print_tokens(input: &str, out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "TOKENS:")?;
    for token in tokenize(input) {
        writeln!(out, "  {}", token)?;
    }
    Ok(())
}

fn print_ast(input: &str, out: &mut impl Write) -> io::Result<()> {
    let (program, errors) = parse(input);
    if !errors.is_empty() {
        return print_parse_errors(&errors, out);
    }
    writeln!(out, "AST:")?;
    writeln!(out, "{}", program)
}

fn print_parse_errors(errors: &[String], out: &mut impl Write) -> io::Result<()> {
    out.write_all(MONKEY_FACE.as_bytes())?;
    writeln!(out, "Woops! We ran into some monkey business here!")?;
    for error in errors {
        writeln!(out, "\t{}", error)?;
    }
    Ok(())
}
