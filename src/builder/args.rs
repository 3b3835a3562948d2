//! Rendering argument tokens for the command line and for option files.
//!
//! Tokens reach the compiler either as direct process arguments (the OS and
//! `std::process::Command` take care of boundaries) or through an option
//! file (`@file`) whose contents the compiler re-tokenizes itself. The file
//! syntax differs by family:
//!
//! - [`ArgStyle::Windows`]: `cl.exe` command files. Whitespace separates,
//!   double quotes group, `""` inside quotes is a literal quote, and
//!   backslashes are literal unless they precede a quote.
//! - [`ArgStyle::Posix`]: GNU `@file` rules used by GCC and Clang. Whitespace
//!   separates, single and double quotes group, and a backslash escapes the
//!   next character everywhere, including inside quotes.
//!
//! [`ArgStyle::split`] implements the compiler-side parser for each style so
//! that `split(render_file(tokens)) == tokens` holds for any tokens.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Characters that force quoting in POSIX-style option files.
const POSIX_SPECIAL: &[char] = &[
    '\'', '"', '\\', '$', '`', '&', '|', ';', '<', '>', '(', ')', '*', '?', '[', ']', '{', '}',
    '!', '~', '#',
];

/// Option-file quoting dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArgStyle {
    /// MSVC command-file rules
    Windows,
    /// GNU response-file rules
    Posix,
}

impl ArgStyle {
    /// Get the style name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            ArgStyle::Windows => "windows",
            ArgStyle::Posix => "posix",
        }
    }

    /// The style matching the host platform.
    pub fn host() -> Self {
        if cfg!(windows) {
            ArgStyle::Windows
        } else {
            ArgStyle::Posix
        }
    }

    /// Render tokens as direct process arguments.
    ///
    /// Direct arguments need no escaping here; each token becomes exactly
    /// one argv entry.
    pub fn render_args(&self, tokens: &[String]) -> Vec<String> {
        tokens.to_vec()
    }

    /// Render tokens as option-file contents, one token per line.
    pub fn render_file(&self, tokens: &[String]) -> String {
        let mut out = String::with_capacity(command_line_length(tokens) + tokens.len() * 2);
        for token in tokens {
            out.push_str(&self.quote(token));
            out.push('\n');
        }
        out
    }

    /// Quote a single token for an option file.
    pub fn quote(&self, token: &str) -> String {
        match self {
            ArgStyle::Windows => quote_windows(token),
            ArgStyle::Posix => quote_posix(token),
        }
    }

    /// Re-tokenize option-file contents the way the compiler does.
    pub fn split(&self, contents: &str) -> Vec<String> {
        match self {
            ArgStyle::Windows => split_windows(contents),
            ArgStyle::Posix => split_posix(contents),
        }
    }
}

impl fmt::Display for ArgStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ArgStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "windows" | "win" | "msvc" => Ok(ArgStyle::Windows),
            "posix" | "unix" | "gnu" => Ok(ArgStyle::Posix),
            _ => Err(format!(
                "invalid argument style '{}'; expected 'windows' or 'posix'",
                s
            )),
        }
    }
}

/// Length of the tokens joined by single spaces, as on a real command line.
pub fn command_line_length(tokens: &[String]) -> usize {
    let chars: usize = tokens.iter().map(String::len).sum();
    chars + tokens.len().saturating_sub(1)
}

fn quote_windows(token: &str) -> String {
    let needs_quotes = token.is_empty()
        || token
            .chars()
            .any(|c| c.is_whitespace() || c == '"' || c == '#');
    if !needs_quotes {
        return token.to_string();
    }

    let mut out = String::with_capacity(token.len() + 2);
    out.push('"');
    let mut backslashes = 0;
    for c in token.chars() {
        match c {
            '\\' => backslashes += 1,
            '"' => {
                // Backslashes before a quote are doubled, the quote itself too
                push_repeated(&mut out, '\\', backslashes * 2);
                backslashes = 0;
                out.push_str("\"\"");
            }
            _ => {
                push_repeated(&mut out, '\\', backslashes);
                backslashes = 0;
                out.push(c);
            }
        }
    }
    // Trailing backslashes would otherwise escape the closing quote
    push_repeated(&mut out, '\\', backslashes * 2);
    out.push('"');
    out
}

fn split_windows(input: &str) -> Vec<String> {
    let chars: Vec<char> = input.chars().collect();
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_token = false;
    let mut quoted = false;
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];

        if c == '\\' {
            let start = i;
            while i < chars.len() && chars[i] == '\\' {
                i += 1;
            }
            let count = i - start;
            in_token = true;
            if chars.get(i) == Some(&'"') {
                push_repeated(&mut current, '\\', count / 2);
                if count % 2 == 1 {
                    current.push('"');
                    i += 1;
                }
            } else {
                push_repeated(&mut current, '\\', count);
            }
            continue;
        }

        if c == '"' {
            in_token = true;
            if quoted && chars.get(i + 1) == Some(&'"') {
                current.push('"');
                i += 2;
            } else {
                quoted = !quoted;
                i += 1;
            }
            continue;
        }

        if c.is_whitespace() && !quoted {
            if in_token {
                tokens.push(std::mem::take(&mut current));
                in_token = false;
            }
            i += 1;
            continue;
        }

        current.push(c);
        in_token = true;
        i += 1;
    }

    if in_token {
        tokens.push(current);
    }
    tokens
}

fn quote_posix(token: &str) -> String {
    let needs_quotes = token.is_empty()
        || token
            .chars()
            .any(|c| c.is_whitespace() || POSIX_SPECIAL.contains(&c));
    if !needs_quotes {
        return token.to_string();
    }

    let mut out = String::with_capacity(token.len() + 2);
    out.push('\'');
    for c in token.chars() {
        match c {
            '\'' => out.push_str("'\\''"),
            '\\' => out.push_str("\\\\"),
            _ => out.push(c),
        }
    }
    out.push('\'');
    out
}

fn split_posix(input: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_token = false;
    let mut single = false;
    let mut double = false;
    let mut escaped = false;

    for c in input.chars() {
        if escaped {
            current.push(c);
            escaped = false;
            continue;
        }
        if c == '\\' {
            escaped = true;
            in_token = true;
            continue;
        }
        if single {
            if c == '\'' {
                single = false;
            } else {
                current.push(c);
            }
            continue;
        }
        if double {
            if c == '"' {
                double = false;
            } else {
                current.push(c);
            }
            continue;
        }

        match c {
            '\'' => {
                single = true;
                in_token = true;
            }
            '"' => {
                double = true;
                in_token = true;
            }
            c if c.is_whitespace() => {
                if in_token {
                    tokens.push(std::mem::take(&mut current));
                    in_token = false;
                }
            }
            _ => {
                current.push(c);
                in_token = true;
            }
        }
    }

    if in_token {
        tokens.push(current);
    }
    tokens
}

fn push_repeated(out: &mut String, c: char, n: usize) {
    out.extend(std::iter::repeat(c).take(n));
}
