//! # Template Module
//!
//! Parser and renderer for invoice number format strings.
//!
//! ## The Template Micro-Language
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  FORMAT STRING                                                          │
//! │                                                                         │
//! │    "{prefix}{year}{month:02d}-{sequence:04d}"                           │
//! │                                                                         │
//! │  COMPILES TO (ordered token list)                                       │
//! │                                                                         │
//! │    [Variable(Prefix), Variable(Year), Variable(Month, width=2),         │
//! │     Literal("-"), Variable(Sequence, width=4)]                          │
//! │                                                                         │
//! │  RENDERS WITH context { prefix: "INV-", year: 2024, month: 3, seq: 1 }  │
//! │                                                                         │
//! │    "INV-202403-0001"                                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Grammar
//! - Variables: `{name}` or `{name:0Wd}` where W is a positive integer
//! - Recognized names: `prefix`, `suffix`, `year`, `month`, `day`, `sequence`
//! - `:0Wd` means "zero-pad the decimal value to width W, never truncate"
//! - Braces must balance; no nesting; no escape for literal braces
//!
//! ## Why Tagged Tokens Instead of String Munging?
//! The compiled form makes the parser independently testable and the
//! renderer a simple fold over tokens. Parsing happens once at scheme
//! create/update time (fail fast); rendering happens on every issuance.

use serde::{Deserialize, Serialize};

use crate::error::FormatError;

// =============================================================================
// Variables
// =============================================================================

/// The fixed set of variables a format string may reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Variable {
    /// Scheme prefix, substituted verbatim.
    Prefix,
    /// Scheme suffix, substituted verbatim.
    Suffix,
    /// Calendar year (natural 4-digit value, e.g. 2024).
    Year,
    /// Calendar month 1-12 (unpadded unless a width is given).
    Month,
    /// Calendar day 1-31 (unpadded unless a width is given).
    Day,
    /// The issued sequence number.
    Sequence,
}

impl Variable {
    /// Looks up a variable by its placeholder name.
    fn from_name(name: &str) -> Option<Self> {
        match name {
            "prefix" => Some(Variable::Prefix),
            "suffix" => Some(Variable::Suffix),
            "year" => Some(Variable::Year),
            "month" => Some(Variable::Month),
            "day" => Some(Variable::Day),
            "sequence" => Some(Variable::Sequence),
            _ => None,
        }
    }

    /// Returns the placeholder name for this variable.
    pub fn name(&self) -> &'static str {
        match self {
            Variable::Prefix => "prefix",
            Variable::Suffix => "suffix",
            Variable::Year => "year",
            Variable::Month => "month",
            Variable::Day => "day",
            Variable::Sequence => "sequence",
        }
    }

    /// Whether this variable renders a string (as opposed to a number).
    /// Width specifiers are rejected on string variables at parse time.
    fn is_string(&self) -> bool {
        matches!(self, Variable::Prefix | Variable::Suffix)
    }
}

// =============================================================================
// Tokens
// =============================================================================

/// One element of a compiled template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Token {
    /// A literal run of characters, emitted as-is.
    Literal(String),

    /// A variable reference with an optional zero-pad width.
    Variable {
        var: Variable,
        /// `Some(w)` for `{name:0Wd}`: pad the decimal value to `w` digits.
        /// Values wider than `w` are never truncated.
        width: Option<usize>,
    },
}

// =============================================================================
// Compiled Template
// =============================================================================

/// A parsed, render-ready format string.
///
/// ## Usage
/// ```rust
/// use aurum_core::template::{CompiledTemplate, RenderContext};
///
/// let template = CompiledTemplate::parse("{prefix}{year}{month:02d}-{sequence:04d}").unwrap();
/// let rendered = template.render(&RenderContext {
///     prefix: "INV-",
///     suffix: "",
///     year: 2024,
///     month: 3,
///     day: 15,
///     sequence: 1,
/// });
/// assert_eq!(rendered, "INV-202403-0001");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompiledTemplate {
    tokens: Vec<Token>,
}

impl CompiledTemplate {
    /// Compiles a format string into an ordered token list.
    ///
    /// ## Failure Modes
    /// - Empty format string → [`FormatError::Empty`]
    /// - `{` or `}` without a partner → unmatched-brace errors
    /// - `{}` → [`FormatError::EmptyPlaceholder`]
    /// - `{widget}` → [`FormatError::UnknownVariable`]
    /// - `{sequence:4d}`, `{sequence:00d}` → [`FormatError::InvalidWidth`]
    /// - `{prefix:02d}` → [`FormatError::WidthNotAllowed`]
    pub fn parse(format: &str) -> Result<Self, FormatError> {
        if format.is_empty() {
            return Err(FormatError::Empty);
        }

        let mut tokens = Vec::new();
        let mut literal = String::new();
        let mut chars = format.char_indices();

        while let Some((position, ch)) = chars.next() {
            match ch {
                '{' => {
                    // Flush any pending literal before the placeholder
                    if !literal.is_empty() {
                        tokens.push(Token::Literal(std::mem::take(&mut literal)));
                    }

                    // Scan the placeholder body up to the matching '}'.
                    // Nested '{' is not part of the grammar.
                    let mut body = String::new();
                    let mut closed = false;
                    for (inner_position, inner) in chars.by_ref() {
                        match inner {
                            '}' => {
                                closed = true;
                                break;
                            }
                            '{' => {
                                return Err(FormatError::UnmatchedOpenBrace {
                                    position: inner_position,
                                })
                            }
                            _ => body.push(inner),
                        }
                    }
                    if !closed {
                        return Err(FormatError::UnmatchedOpenBrace { position });
                    }

                    tokens.push(parse_placeholder(&body, position)?);
                }
                '}' => return Err(FormatError::UnmatchedCloseBrace { position }),
                _ => literal.push(ch),
            }
        }

        if !literal.is_empty() {
            tokens.push(Token::Literal(literal));
        }

        Ok(CompiledTemplate { tokens })
    }

    /// Returns the compiled token list.
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Renders the template against a fully-resolved context.
    ///
    /// Pure fold over tokens: string variables are substituted verbatim,
    /// numeric variables render as natural decimal values unless a width
    /// specifier requests zero-padding. A value whose natural length
    /// exceeds the specified width grows the field rather than being
    /// truncated, so the number is never corrupted.
    ///
    /// Rendering has no failure mode: tokens are validated at parse time
    /// and every context field is already a concrete value.
    pub fn render(&self, ctx: &RenderContext<'_>) -> String {
        let mut out = String::new();

        for token in &self.tokens {
            match token {
                Token::Literal(text) => out.push_str(text),
                Token::Variable { var, width } => match var {
                    Variable::Prefix => out.push_str(ctx.prefix),
                    Variable::Suffix => out.push_str(ctx.suffix),
                    Variable::Year => push_number(&mut out, ctx.year as i64, *width),
                    Variable::Month => push_number(&mut out, ctx.month as i64, *width),
                    Variable::Day => push_number(&mut out, ctx.day as i64, *width),
                    Variable::Sequence => push_number(&mut out, ctx.sequence, *width),
                },
            }
        }

        out
    }
}

/// Parses one placeholder body (the text between braces).
///
/// `position` is the byte offset of the opening brace, used in errors.
fn parse_placeholder(body: &str, position: usize) -> Result<Token, FormatError> {
    let (name, width_spec) = match body.split_once(':') {
        Some((name, spec)) => (name, Some(spec)),
        None => (body, None),
    };

    if name.is_empty() {
        return Err(FormatError::EmptyPlaceholder { position });
    }

    let var = Variable::from_name(name).ok_or_else(|| FormatError::UnknownVariable {
        name: name.to_string(),
        position,
    })?;

    let width = match width_spec {
        Some(spec) => Some(parse_width(spec, position)?),
        None => None,
    };

    if width.is_some() && var.is_string() {
        return Err(FormatError::WidthNotAllowed {
            name: name.to_string(),
            position,
        });
    }

    Ok(Token::Variable { var, width })
}

/// Parses a width specifier of the form `0Wd` (e.g. `02d`, `04d`, `010d`).
fn parse_width(spec: &str, position: usize) -> Result<usize, FormatError> {
    let invalid = || FormatError::InvalidWidth {
        spec: spec.to_string(),
        position,
    };

    let digits = spec
        .strip_prefix('0')
        .and_then(|rest| rest.strip_suffix('d'))
        .ok_or_else(invalid)?;

    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }

    let width: usize = digits.parse().map_err(|_| invalid())?;
    if width == 0 {
        return Err(invalid());
    }

    Ok(width)
}

/// Appends a decimal value, zero-padded when a width is present.
fn push_number(out: &mut String, value: i64, width: Option<usize>) {
    match width {
        // {:0width$} zero-pads but never truncates wider values
        Some(width) => out.push_str(&format!("{:0width$}", value, width = width)),
        None => out.push_str(&value.to_string()),
    }
}

// =============================================================================
// Render Context
// =============================================================================

/// All values a template may reference, resolved before rendering.
///
/// ## Why No Clock Here?
/// The caller captures "now" exactly once per operation and resolves it to
/// year/month/day before rendering. The renderer itself never reads time,
/// so a single request can never observe two different "current times".
#[derive(Debug, Clone, Copy)]
pub struct RenderContext<'a> {
    pub prefix: &'a str,
    pub suffix: &'a str,
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub sequence: i64,
}

// =============================================================================
// Unit Tests
// =============================================================================
