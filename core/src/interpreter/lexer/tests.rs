//! Tokenizer tests

use super::{tokenize, Keyword, TokenKind};
use crate::interpreter::errors::LexError;

fn kinds(source: &str) -> Vec<TokenKind> {
    tokenize(source)
        .expect("Should tokenize")
        .into_iter()
        .map(|t| t.kind)
        .collect()
}

/* ===================== Basic Tokens ===================== */

#[test]
fn test_reply_statement() {
    let tokens = tokenize(r#"reply "Welcome""#).expect("Should tokenize");

    assert_eq!(tokens.len(), 3);
    assert_eq!(tokens[0].kind, TokenKind::Keyword(Keyword::Reply));
    assert_eq!(tokens[1].kind, TokenKind::Str);
    assert_eq!(tokens[1].text, "Welcome");
    assert_eq!(tokens[2].kind, TokenKind::Eof);
}

#[test]
fn test_if_statement_tokens() {
    let source = r#"if $intent == "query_price" then goto price"#;

    assert_eq!(
        kinds(source),
        vec![
            TokenKind::Keyword(Keyword::If),
            TokenKind::Variable,
            TokenKind::EqEq,
            TokenKind::Str,
            TokenKind::Keyword(Keyword::Then),
            TokenKind::Keyword(Keyword::Goto),
            TokenKind::Ident,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn test_set_uses_single_equals() {
    assert_eq!(
        kinds(r#"set $name = $other"#),
        vec![
            TokenKind::Keyword(Keyword::Set),
            TokenKind::Variable,
            TokenKind::Assign,
            TokenKind::Variable,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn test_intents_block() {
    assert_eq!(
        kinds(r#"intents {"a", "b"}"#),
        vec![
            TokenKind::Keyword(Keyword::Intents),
            TokenKind::LBrace,
            TokenKind::Str,
            TokenKind::Comma,
            TokenKind::Str,
            TokenKind::RBrace,
            TokenKind::Eof,
        ]
    );
}

/* ===================== Text and Positions ===================== */

#[test]
fn test_variable_sigil_is_stripped() {
    let tokens = tokenize("$user_input").expect("Should tokenize");
    assert_eq!(tokens[0].kind, TokenKind::Variable);
    assert_eq!(tokens[0].text, "user_input");
}

#[test]
fn test_label_colon_is_stripped() {
    let tokens = tokenize("main_loop:").expect("Should tokenize");
    assert_eq!(tokens[0].kind, TokenKind::Label);
    assert_eq!(tokens[0].text, "main_loop");
    assert_eq!(tokens[1].kind, TokenKind::Eof);
}

#[test]
fn test_keyword_followed_by_colon_is_label() {
    let tokens = tokenize("goto exit:").expect("Should tokenize");
    assert_eq!(tokens[0].kind, TokenKind::Keyword(Keyword::Goto));
    assert_eq!(tokens[1].kind, TokenKind::Label);
    assert_eq!(tokens[1].text, "exit");
}

#[test]
fn test_keyword_prefix_is_identifier() {
    let tokens = tokenize("settings").expect("Should tokenize");
    assert_eq!(tokens[0].kind, TokenKind::Ident);
    assert_eq!(tokens[0].text, "settings");
}

#[test]
fn test_string_keeps_inner_text_verbatim() {
    let tokens = tokenize(r#"reply "价格是 $price \n""#).expect("Should tokenize");
    assert_eq!(tokens[1].text, r"价格是 $price \n");
}

#[test]
fn test_line_and_column_tracking() {
    let tokens = tokenize("start:\n    reply \"hi\"").expect("Should tokenize");

    assert_eq!((tokens[0].line, tokens[0].column), (1, 1));
    assert_eq!(tokens[1].kind, TokenKind::Newline);
    assert_eq!((tokens[2].line, tokens[2].column), (2, 5));
    assert_eq!((tokens[3].line, tokens[3].column), (2, 11));
}

/* ===================== Whitespace and Comments ===================== */

#[test]
fn test_comments_and_blank_space_are_dropped() {
    let source = "# greeting\n\treply \"hi\"   # trailing\n";

    assert_eq!(
        kinds(source),
        vec![
            TokenKind::Newline,
            TokenKind::Keyword(Keyword::Reply),
            TokenKind::Str,
            TokenKind::Newline,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn test_crlf_line_endings() {
    assert_eq!(
        kinds("exit\r\nexit"),
        vec![
            TokenKind::Keyword(Keyword::Exit),
            TokenKind::Newline,
            TokenKind::Keyword(Keyword::Exit),
            TokenKind::Eof,
        ]
    );
}

#[test]
fn test_empty_source_is_just_eof() {
    assert_eq!(kinds(""), vec![TokenKind::Eof]);
}

/* ===================== Errors ===================== */

#[test]
fn test_unknown_character_reports_position() {
    let err = tokenize("reply \"ok\"\n  @").unwrap_err();
    assert_eq!(
        err,
        LexError::UnexpectedChar {
            ch: '@',
            line: 2,
            column: 3
        }
    );
}

#[test]
fn test_string_cannot_cross_newline() {
    let err = tokenize("reply \"broken\nexit").unwrap_err();
    assert_eq!(err, LexError::UnterminatedString { line: 1, column: 7 });
}

#[test]
fn test_bare_sigil_is_rejected() {
    let err = tokenize("set $ = \"x\"").unwrap_err();
    assert!(matches!(err, LexError::UnexpectedChar { ch: '$', line: 1, column: 5 }));
}

#[test]
fn test_lone_colon_is_rejected() {
    let err = tokenize(": x").unwrap_err();
    assert!(matches!(err, LexError::UnexpectedChar { ch: ':', .. }));
}
