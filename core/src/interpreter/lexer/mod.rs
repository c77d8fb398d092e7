//! Tokenizer for chat scripts
//!
//! Turns script text into a flat token list ending in `Eof`. Spaces, tabs and
//! `#` comments are dropped; newlines survive as statement separators. No
//! token ever spans a newline.

use serde::{Deserialize, Serialize};

use super::errors::LexError;

#[cfg(test)]
mod tests;

/* ===================== Token Types ===================== */

/// Reserved words. A word followed directly by `:` is a label, never a keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Keyword {
    Labels,
    Intents,
    Reply,
    Set,
    GetIntent,
    PauseForUserInput,
    If,
    Then,
    Goto,
    Exit,
}

impl Keyword {
    pub fn from_word(word: &str) -> Option<Self> {
        let kw = match word {
            "labels" => Keyword::Labels,
            "intents" => Keyword::Intents,
            "reply" => Keyword::Reply,
            "set" => Keyword::Set,
            "get_intent" => Keyword::GetIntent,
            "pause_for_user_input" => Keyword::PauseForUserInput,
            "if" => Keyword::If,
            "then" => Keyword::Then,
            "goto" => Keyword::Goto,
            "exit" => Keyword::Exit,
            _ => return None,
        };
        Some(kw)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Keyword::Labels => "labels",
            Keyword::Intents => "intents",
            Keyword::Reply => "reply",
            Keyword::Set => "set",
            Keyword::GetIntent => "get_intent",
            Keyword::PauseForUserInput => "pause_for_user_input",
            Keyword::If => "if",
            Keyword::Then => "then",
            Keyword::Goto => "goto",
            Keyword::Exit => "exit",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "t", content = "v")]
pub enum TokenKind {
    Keyword(Keyword),
    LBrace,
    RBrace,
    Comma,
    /// `=`
    Assign,
    /// `==`
    EqEq,
    /// `"..."`, quotes stripped
    Str,
    /// `$name`, sigil stripped
    Variable,
    /// `name:`, colon stripped
    Label,
    /// A bare word that is not a keyword
    Ident,
    Newline,
    Eof,
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenKind::Keyword(kw) => write!(f, "'{}'", kw.as_str()),
            TokenKind::LBrace => write!(f, "'{{'"),
            TokenKind::RBrace => write!(f, "'}}'"),
            TokenKind::Comma => write!(f, "','"),
            TokenKind::Assign => write!(f, "'='"),
            TokenKind::EqEq => write!(f, "'=='"),
            TokenKind::Str => write!(f, "string"),
            TokenKind::Variable => write!(f, "variable"),
            TokenKind::Label => write!(f, "label"),
            TokenKind::Ident => write!(f, "identifier"),
            TokenKind::Newline => write!(f, "newline"),
            TokenKind::Eof => write!(f, "end of input"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub line: usize,
    pub column: usize,
}

/* ===================== Tokenizer ===================== */

/// Tokenize a whole script
pub fn tokenize(source: &str) -> Result<Vec<Token>, LexError> {
    Lexer::new(source).run()
}

struct Lexer<'a> {
    chars: std::iter::Peekable<std::str::Chars<'a>>,
    line: usize,
    column: usize,
    tokens: Vec<Token>,
}

fn is_ident_start(ch: char) -> bool {
    ch.is_ascii_alphabetic() || ch == '_'
}

fn is_ident_continue(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_'
}

impl<'a> Lexer<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            chars: source.chars().peekable(),
            line: 1,
            column: 1,
            tokens: Vec::new(),
        }
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.chars.next()?;
        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(ch)
    }

    fn push(&mut self, kind: TokenKind, text: impl Into<String>, line: usize, column: usize) {
        self.tokens.push(Token {
            kind,
            text: text.into(),
            line,
            column,
        });
    }

    fn run(mut self) -> Result<Vec<Token>, LexError> {
        while let Some(&ch) = self.chars.peek() {
            let (line, column) = (self.line, self.column);

            match ch {
                ' ' | '\t' | '\r' => {
                    self.bump();
                }
                '#' => {
                    while self.chars.peek().is_some_and(|&c| c != '\n') {
                        self.bump();
                    }
                }
                '\n' => {
                    self.bump();
                    self.push(TokenKind::Newline, "\n", line, column);
                }
                '{' => {
                    self.bump();
                    self.push(TokenKind::LBrace, "{", line, column);
                }
                '}' => {
                    self.bump();
                    self.push(TokenKind::RBrace, "}", line, column);
                }
                ',' => {
                    self.bump();
                    self.push(TokenKind::Comma, ",", line, column);
                }
                '=' => {
                    self.bump();
                    if self.chars.peek() == Some(&'=') {
                        self.bump();
                        self.push(TokenKind::EqEq, "==", line, column);
                    } else {
                        self.push(TokenKind::Assign, "=", line, column);
                    }
                }
                '"' => self.string(line, column)?,
                '$' => self.variable(line, column)?,
                c if is_ident_start(c) => self.word(line, column),
                other => {
                    return Err(LexError::UnexpectedChar {
                        ch: other,
                        line,
                        column,
                    })
                }
            }
        }

        let (line, column) = (self.line, self.column);
        self.push(TokenKind::Eof, "", line, column);
        Ok(self.tokens)
    }

    fn string(&mut self, line: usize, column: usize) -> Result<(), LexError> {
        self.bump(); // opening quote
        let mut text = String::new();
        loop {
            match self.chars.peek() {
                Some('"') => {
                    self.bump();
                    break;
                }
                Some('\n') | None => return Err(LexError::UnterminatedString { line, column }),
                Some(_) => {
                    if let Some(c) = self.bump() {
                        text.push(c);
                    }
                }
            }
        }
        self.push(TokenKind::Str, text, line, column);
        Ok(())
    }

    fn variable(&mut self, line: usize, column: usize) -> Result<(), LexError> {
        self.bump(); // sigil
        if !self.chars.peek().is_some_and(|&c| is_ident_start(c)) {
            return Err(LexError::UnexpectedChar {
                ch: '$',
                line,
                column,
            });
        }
        let name = self.take_ident();
        self.push(TokenKind::Variable, name, line, column);
        Ok(())
    }

    fn word(&mut self, line: usize, column: usize) {
        let word = self.take_ident();

        if self.chars.peek() == Some(&':') {
            self.bump();
            self.push(TokenKind::Label, word, line, column);
            return;
        }

        match Keyword::from_word(&word) {
            Some(kw) => self.push(TokenKind::Keyword(kw), word, line, column),
            None => self.push(TokenKind::Ident, word, line, column),
        }
    }

    fn take_ident(&mut self) -> String {
        let mut ident = String::new();
        while let Some(&c) = self.chars.peek() {
            if !is_ident_continue(c) {
                break;
            }
            ident.push(c);
            self.bump();
        }
        ident
    }
}
