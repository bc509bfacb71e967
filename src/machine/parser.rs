//! Program text parser.
//!
//! Turns source text into a [`Program`]. Each non-blank line holds exactly one
//! instruction:
//!
//! ```text
//! b inc 5 if a > 1
//! a inc 1 if b < 5
//! c dec -10 if a >= 1
//! ```
//!
//! - Tokens are separated by any run of whitespace
//! - Amounts and comparison values are signed decimal integers
//! - Blank lines are ignored
//!
//! Malformed lines are handled according to the [`ParsePolicy`]: the lenient
//! policy drops them and lists them in [`ParseReport::skipped`], the strict
//! policy fails on the first one.

use crate::machine::errors::MachineError;
use crate::machine::isa::{CONDITION_KEYWORD, Condition, Instruction, Mutation, Operator};
use crate::machine::program::Program;
use std::fmt::Write;
use std::fs;
use std::path::Path;

/// Number of whitespace-separated tokens in one instruction line.
pub const INSTRUCTION_ARITY: usize = 7;

/// How the program parser treats lines that fail to parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParsePolicy {
    /// Drop malformed lines and keep going.
    #[default]
    Lenient,
    /// Abort on the first malformed line.
    Strict,
}

/// Result of parsing a whole program.
#[derive(Debug, Clone, Default)]
pub struct ParseReport {
    /// Instructions from every line that parsed.
    pub program: Program,
    /// Located [`MachineError::ParseError`]s for dropped lines, in source order.
    /// Always empty under [`ParsePolicy::Strict`].
    pub skipped: Vec<MachineError>,
}

#[derive(Debug, Clone, Copy)]
struct Token<'a> {
    text: &'a str,
    /// 1-based column offset in the line.
    offset: usize,
}

/// Splits a line into whitespace-separated tokens.
fn tokenize(line: &str) -> Vec<Token<'_>> {
    let mut out = Vec::with_capacity(INSTRUCTION_ARITY);
    let mut start: Option<usize> = None;

    for (i, c) in line.char_indices() {
        if c.is_whitespace() {
            if let Some(s) = start.take() {
                out.push(Token {
                    text: &line[s..i],
                    offset: s + 1,
                });
            }
        } else if start.is_none() {
            start = Some(i);
        }
    }

    if let Some(s) = start {
        out.push(Token {
            text: &line[s..],
            offset: s + 1,
        });
    }

    out
}

/// Parse a signed decimal integer.
pub(crate) fn parse_i64(tok: &str) -> Result<i64, MachineError> {
    tok.parse::<i64>().map_err(|_| MachineError::InvalidInteger {
        token: tok.to_string(),
    })
}

/// Attaches the column of `tok` to an error.
fn at(tok: &Token) -> impl Fn(MachineError) -> (usize, MachineError) {
    let offset = tok.offset;
    move |err| (offset, err)
}

/// Parses the tokens of one line into an [`Instruction`].
///
/// On failure returns the column of the offending token with the error.
fn parse_tokens(tokens: &[Token]) -> Result<Instruction, (usize, MachineError)> {
    let [register, verb, amount, keyword, cond_register, op, value] = tokens else {
        return Err((
            tokens.first().map(|t| t.offset).unwrap_or(1),
            MachineError::ArityMismatch {
                expected: INSTRUCTION_ARITY,
                actual: tokens.len(),
            },
        ));
    };

    let amount_value = parse_i64(amount.text).map_err(at(amount))?;
    let mutation = Mutation::from_mnemonic(verb.text, amount_value).map_err(at(verb))?;

    if keyword.text != CONDITION_KEYWORD {
        return Err(at(keyword)(MachineError::ExpectedCondition {
            token: keyword.text.to_string(),
        }));
    }

    let op = Operator::from_symbol(op.text).map_err(at(op))?;
    let value = parse_i64(value.text).map_err(at(value))?;

    Ok(Instruction::new(
        register.text,
        mutation,
        Condition::new(cond_register.text, op, value),
    ))
}

fn located(line: usize, offset: usize, err: MachineError) -> MachineError {
    MachineError::ParseError {
        line,
        offset,
        message: err.to_string(),
    }
}

/// Parses a single instruction line.
///
/// `line_no` is the 1-based line number reported in errors.
pub fn parse_line(line_no: usize, line: &str) -> Result<Instruction, MachineError> {
    parse_tokens(&tokenize(line)).map_err(|(offset, err)| located(line_no, offset, err))
}

/// Parses a full program source.
///
/// Blank lines are skipped under both policies. Returns the first
/// [`MachineError::ParseError`] under [`ParsePolicy::Strict`]; never fails
/// under [`ParsePolicy::Lenient`].
pub fn parse_program(source: &str, policy: ParsePolicy) -> Result<ParseReport, MachineError> {
    let mut instructions = Vec::new();
    let mut skipped = Vec::new();

    for (idx, line) in source.lines().enumerate() {
        let line_no = idx + 1;
        let tokens = tokenize(line);
        if tokens.is_empty() {
            continue;
        }

        match parse_tokens(&tokens) {
            Ok(instr) => instructions.push(instr),
            Err((offset, err)) => {
                let err = located(line_no, offset, err);
                match policy {
                    ParsePolicy::Strict => return Err(err),
                    ParsePolicy::Lenient => {
                        crate::debug!("skipping malformed line: {err}");
                        skipped.push(err);
                    }
                }
            }
        }
    }

    Ok(ParseReport {
        program: Program::new(instructions),
        skipped,
    })
}

/// Convenience: parse a program directly from a file path.
pub fn parse_file<P: AsRef<Path>>(path: P, policy: ParsePolicy) -> Result<ParseReport, MachineError> {
    let path_ref = path.as_ref();
    let source = fs::read_to_string(path_ref).map_err(|e| MachineError::IoError {
        path: path_ref.display().to_string(),
        reason: e.to_string(),
    })?;
    parse_program(&source, policy)
}

/// Formats a compiler-style diagnostic for a located parse error.
///
/// Returns `None` for errors that carry no source location.
pub fn render_diagnostic(file: &str, source: &str, err: &MachineError) -> Option<String> {
    let MachineError::ParseError {
        line,
        offset,
        message,
    } = err
    else {
        return None;
    };

    let mut diag = String::new();
    let _ = writeln!(diag, "error: {message}");
    let _ = writeln!(diag, " --> {file}:{line}:{offset}");

    if let Some(raw_line) = source.lines().nth(line.saturating_sub(1)) {
        let line_text = raw_line.trim_end_matches('\r');
        let underline = " ".repeat(offset.saturating_sub(1));
        let _ = writeln!(diag, "     |");
        let _ = writeln!(diag, "{:>4} | {}", line, line_text);
        let _ = writeln!(diag, "     | {}^", underline);
    }

    Some(diag)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::utils::{EXAMPLE_PROGRAM, example_instructions};

    fn texts<'a>(tokens: &[Token<'a>]) -> Vec<&'a str> {
        tokens.iter().map(|t| t.text).collect()
    }

    #[test]
    fn tokenize_single_spaces() {
        let tokens = tokenize("b inc 5 if a > 1");
        assert_eq!(texts(&tokens), ["b", "inc", "5", "if", "a", ">", "1"]);
        let offsets: Vec<usize> = tokens.iter().map(|t| t.offset).collect();
        assert_eq!(offsets, [1, 3, 7, 9, 12, 14, 16]);
    }

    #[test]
    fn tokenize_mixed_whitespace() {
        let tokens = tokenize("  b\tinc   5 if a >  1  ");
        assert_eq!(texts(&tokens), ["b", "inc", "5", "if", "a", ">", "1"]);
        assert_eq!(tokens[0].offset, 3);
    }

    #[test]
    fn tokenize_blank() {
        assert!(tokenize("").is_empty());
        assert!(tokenize(" \t ").is_empty());
    }

    #[test]
    fn parse_i64_valid() {
        assert_eq!(parse_i64("42").unwrap(), 42);
        assert_eq!(parse_i64("-10").unwrap(), -10);
        assert_eq!(parse_i64("+3").unwrap(), 3);
    }

    #[test]
    fn parse_i64_invalid() {
        for tok in ["", "x", "1.5", "--1", "99999999999999999999"] {
            assert!(matches!(
                parse_i64(tok),
                Err(MachineError::InvalidInteger { .. })
            ));
        }
    }

    #[test]
    fn parse_line_every_operator() {
        for op in Operator::ALL {
            let instr = parse_line(1, &format!("x dec 2 if y {} -3", op.symbol())).unwrap();
            assert_eq!(instr.register, "x");
            assert_eq!(instr.mutation, Mutation::Decrement(2));
            assert_eq!(instr.condition, Condition::new("y", *op, -3));
        }
    }

    #[test]
    fn parse_line_six_tokens() {
        let err = parse_line(4, "b inc 5 if a >").unwrap_err();
        assert!(matches!(
            err,
            MachineError::ParseError { line: 4, offset: 1, ref message }
                if message.contains("expected 7 tokens, got 6")
        ));
    }

    #[test]
    fn parse_line_eight_tokens() {
        let err = parse_line(1, "b inc 5 if a > 1 extra").unwrap_err();
        assert!(matches!(
            err,
            MachineError::ParseError { ref message, .. } if message.contains("got 8")
        ));
    }

    #[test]
    fn parse_line_unknown_verb() {
        let err = parse_line(1, "b mul 5 if a > 1").unwrap_err();
        assert!(matches!(
            err,
            MachineError::ParseError { offset: 3, ref message, .. }
                if message.contains("unknown mutation 'mul'")
        ));
    }

    #[test]
    fn parse_line_missing_if() {
        let err = parse_line(1, "b inc 5 when a > 1").unwrap_err();
        assert!(matches!(
            err,
            MachineError::ParseError { offset: 9, ref message, .. }
                if message.contains("expected 'if'")
        ));
    }

    #[test]
    fn parse_line_unknown_operator() {
        let err = parse_line(1, "b inc 5 if a => 1").unwrap_err();
        assert!(matches!(
            err,
            MachineError::ParseError { offset: 14, ref message, .. }
                if message.contains("operator '=>'")
        ));
    }

    #[test]
    fn parse_line_bad_integers() {
        let err = parse_line(1, "b inc five if a > 1").unwrap_err();
        assert!(matches!(
            err,
            MachineError::ParseError { offset: 7, ref message, .. }
                if message.contains("invalid integer 'five'")
        ));

        let err = parse_line(1, "b inc 5 if a > one").unwrap_err();
        assert!(matches!(
            err,
            MachineError::ParseError { ref message, .. }
                if message.contains("invalid integer 'one'")
        ));
    }

    #[test]
    fn parse_program_example() {
        let report = parse_program(EXAMPLE_PROGRAM, ParsePolicy::Lenient).unwrap();
        assert!(report.skipped.is_empty());
        assert_eq!(report.program.instructions(), example_instructions().as_slice());
    }

    #[test]
    fn parse_program_empty_source() {
        let report = parse_program("", ParsePolicy::Strict).unwrap();
        assert!(report.program.is_empty());
        assert!(report.skipped.is_empty());
    }

    #[test]
    fn parse_program_blank_lines_ignored_in_strict_mode() {
        let source = "\n  \nb inc 5 if a > 1\n\n\t\na inc 1 if b < 5\n";
        let report = parse_program(source, ParsePolicy::Strict).unwrap();
        assert_eq!(report.program.len(), 2);
    }

    #[test]
    fn parse_program_crlf() {
        let report = parse_program("b inc 5 if a > 1\r\na inc 1 if b < 5\r\n", ParsePolicy::Strict)
            .unwrap();
        assert_eq!(report.program.len(), 2);
    }

    #[test]
    fn parse_program_lenient_skips_malformed() {
        let source = "b inc 5 if a > 1\nb inc 5 if a >\nq jump 3 if a > 1\na inc 1 if b < 5";
        let report = parse_program(source, ParsePolicy::Lenient).unwrap();
        assert_eq!(report.program.len(), 2);
        assert_eq!(report.skipped.len(), 2);
        assert!(matches!(
            report.skipped[0],
            MachineError::ParseError { line: 2, .. }
        ));
        assert!(matches!(
            report.skipped[1],
            MachineError::ParseError { line: 3, .. }
        ));
    }

    #[test]
    fn parse_program_strict_fails_on_first_malformed() {
        let source = "b inc 5 if a > 1\nb inc 5 if a >\nq jump 3 if a > 1";
        let err = parse_program(source, ParsePolicy::Strict).unwrap_err();
        assert!(matches!(err, MachineError::ParseError { line: 2, .. }));
    }

    #[test]
    fn parse_file_reads_program() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("input.txt");
        fs::write(&path, EXAMPLE_PROGRAM).unwrap();
        let report = parse_file(&path, ParsePolicy::Strict).unwrap();
        assert_eq!(report.program.len(), 4);
    }

    #[test]
    fn parse_file_missing() {
        let dir = tempfile::tempdir().unwrap();
        let err = parse_file(dir.path().join("missing.txt"), ParsePolicy::Lenient).unwrap_err();
        assert!(matches!(err, MachineError::IoError { .. }));
    }

    #[test]
    fn render_diagnostic_points_at_token() {
        let source = "b inc 5 if a > 1\nc inc 3 if a ~ 2";
        let err = parse_program(source, ParsePolicy::Strict).unwrap_err();
        let diag = render_diagnostic("prog.txt", source, &err).unwrap();
        assert!(diag.starts_with("error: unknown comparison operator '~'"));
        assert!(diag.contains(" --> prog.txt:2:14"));
        assert!(diag.contains("   2 | c inc 3 if a ~ 2"));
        assert!(diag.contains(&format!("     | {}^", " ".repeat(13))));
    }

    #[test]
    fn render_diagnostic_unlocated() {
        let err = MachineError::IoError {
            path: "x".into(),
            reason: "nope".into(),
        };
        assert!(render_diagnostic("x", "", &err).is_none());
    }
}
