//! Recursive-descent parser for chat scripts
//!
//! Consumes the token list from the lexer with one token of lookahead and
//! produces a flat `Script`. The first mismatch aborts the whole parse.
//!
//! ```text
//! script      := [label_decls] statement*
//! label_decls := "labels" "{" label_name ("," label_name)* "}"
//! statement   := label | intents | reply | set | get_intent | if | goto | exit
//!              | "pause_for_user_input"
//! intents     := "intents" "{" string ("," string)* "}"
//! reply       := "reply" string
//! set         := "set" variable "=" (string | variable)
//! get_intent  := "get_intent" variable
//! if          := "if" variable "==" string "then" "goto" label
//! goto        := "goto" label
//! exit        := "exit"
//! ```

use super::errors::{Expected, ParseError};
use super::executor::types::{Script, SetValue, Stmt};
use super::lexer::{Keyword, Token, TokenKind};

pub mod semantic_validator;


pub type ParseResult<T> = Result<T, ParseError>;

/* ===================== Public API ===================== */

/// Parse a token list (as produced by `lexer::tokenize`) into a script
pub fn parse(tokens: Vec<Token>) -> ParseResult<Script> {
    Parser::new(tokens).parse_script()
}

/* ===================== Parser ===================== */

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    eof: Token,
}

impl Parser {
    fn new(tokens: Vec<Token>) -> Self {
        // Tolerate a list missing its Eof so `peek` never runs off the end
        let (line, column) = tokens
            .last()
            .map(|t| (t.line, t.column))
            .unwrap_or((1, 1));
        Self {
            tokens,
            pos: 0,
            eof: Token {
                kind: TokenKind::Eof,
                text: String::new(),
                line,
                column,
            },
        }
    }

    fn peek(&self) -> &Token {
        self.tokens.get(self.pos).unwrap_or(&self.eof)
    }

    fn advance(&mut self) -> Token {
        let token = self.peek().clone();
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
        token
    }

    fn error(&self, expected: Expected) -> ParseError {
        let found = self.peek();
        ParseError {
            expected,
            found: found.kind.clone(),
            line: found.line,
            column: found.column,
        }
    }

    /// Consume one token of the given kind
    fn expect(&mut self, kind: TokenKind) -> ParseResult<Token> {
        if self.peek().kind == kind {
            Ok(self.advance())
        } else {
            Err(self.error(Expected::Token(kind)))
        }
    }

    fn expect_keyword(&mut self, kw: Keyword) -> ParseResult<Token> {
        self.expect(TokenKind::Keyword(kw))
    }

    /// Consume a label reference: `name` or `name:`
    fn expect_label_ref(&mut self) -> ParseResult<Token> {
        match self.peek().kind {
            TokenKind::Label | TokenKind::Ident => Ok(self.advance()),
            _ => Err(self.error(Expected::OneOf(vec![TokenKind::Label, TokenKind::Ident]))),
        }
    }

    fn skip_newlines(&mut self) {
        while self.peek().kind == TokenKind::Newline {
            self.advance();
        }
    }

    /* ===================== Grammar Rules ===================== */

    fn parse_script(mut self) -> ParseResult<Script> {
        let mut script = Script::default();

        self.skip_newlines();
        if self.peek().kind == TokenKind::Keyword(Keyword::Labels) {
            let line = self.peek().line;
            let decl = self.parse_label_decls()?;
            script.statements.push(decl);
            script.lines.push(line);
        }

        loop {
            self.skip_newlines();
            if self.peek().kind == TokenKind::Eof {
                break;
            }
            let line = self.peek().line;
            let stmt = self.parse_statement()?;
            script.statements.push(stmt);
            script.lines.push(line);
        }

        Ok(script)
    }

    fn parse_label_decls(&mut self) -> ParseResult<Stmt> {
        self.expect_keyword(Keyword::Labels)?;
        self.expect(TokenKind::LBrace)?;

        let mut names = vec![self.expect_label_ref()?.text];
        while self.peek().kind == TokenKind::Comma {
            self.advance();
            names.push(self.expect_label_ref()?.text);
        }

        self.expect(TokenKind::RBrace)?;
        Ok(Stmt::LabelDecl { names })
    }

    fn parse_statement(&mut self) -> ParseResult<Stmt> {
        let kw = match &self.peek().kind {
            TokenKind::Label => {
                let name = self.advance().text;
                return Ok(Stmt::Label { name });
            }
            TokenKind::Keyword(kw) => *kw,
            _ => return Err(self.error(Expected::Statement)),
        };

        match kw {
            Keyword::Intents => self.parse_intents(),
            Keyword::Reply => self.parse_reply(),
            Keyword::Set => self.parse_set(),
            Keyword::GetIntent => self.parse_get_intent(),
            Keyword::If => self.parse_if(),
            Keyword::Goto => self.parse_goto(),
            Keyword::Exit => {
                self.advance();
                Ok(Stmt::Exit)
            }
            Keyword::PauseForUserInput => {
                self.advance();
                Ok(Stmt::PauseForInput)
            }
            Keyword::Labels | Keyword::Then => Err(self.error(Expected::Statement)),
        }
    }

    fn parse_intents(&mut self) -> ParseResult<Stmt> {
        self.expect_keyword(Keyword::Intents)?;
        self.expect(TokenKind::LBrace)?;

        let mut names = vec![self.expect(TokenKind::Str)?.text];
        while self.peek().kind == TokenKind::Comma {
            self.advance();
            names.push(self.expect(TokenKind::Str)?.text);
        }

        self.expect(TokenKind::RBrace)?;
        Ok(Stmt::Intents { names })
    }

    fn parse_reply(&mut self) -> ParseResult<Stmt> {
        self.expect_keyword(Keyword::Reply)?;
        let template = self.expect(TokenKind::Str)?.text;
        Ok(Stmt::Reply { template })
    }

    fn parse_set(&mut self) -> ParseResult<Stmt> {
        self.expect_keyword(Keyword::Set)?;
        let name = self.expect(TokenKind::Variable)?.text;
        self.expect(TokenKind::Assign)?;

        let value = match self.peek().kind {
            TokenKind::Str => SetValue::Literal(self.advance().text),
            TokenKind::Variable => SetValue::Variable(self.advance().text),
            _ => {
                return Err(self.error(Expected::OneOf(vec![
                    TokenKind::Str,
                    TokenKind::Variable,
                ])))
            }
        };

        Ok(Stmt::Set { name, value })
    }

    fn parse_get_intent(&mut self) -> ParseResult<Stmt> {
        self.expect_keyword(Keyword::GetIntent)?;
        let input = self.expect(TokenKind::Variable)?.text;
        Ok(Stmt::GetIntent { input })
    }

    fn parse_if(&mut self) -> ParseResult<Stmt> {
        self.expect_keyword(Keyword::If)?;
        let name = self.expect(TokenKind::Variable)?.text;
        self.expect(TokenKind::EqEq)?;
        let expected = self.expect(TokenKind::Str)?.text;
        self.expect_keyword(Keyword::Then)?;
        self.expect_keyword(Keyword::Goto)?;
        let target = self.expect_label_ref()?.text;

        Ok(Stmt::If {
            name,
            expected,
            target,
        })
    }

    fn parse_goto(&mut self) -> ParseResult<Stmt> {
        self.expect_keyword(Keyword::Goto)?;
        let target = self.expect_label_ref()?.text;
        Ok(Stmt::Goto { target })
    }
}
