use alloc::string::String;
use logos::Logos;

#[derive(Logos, Debug, PartialEq)]
pub enum Token<'s> {
    #[token("(")]
    LPar,

    #[token(")")]
    RPar,

    #[regex(r#"[^\s();"]+"#)]
    Atom(&'s str),

    /// Quoted string, including its quotes.
    #[regex(r#""([^"\\]|\\.)*""#)]
    Str(&'s str),

    #[regex(r"[ \t\r\n\f]+")]
    #[regex(r";[^\n]*")]
    Space,

    // Logos requires one token variant to handle errors,
    // it can be named anything you wish.
    #[error]
    Error,
}

/// Remove the quotes around a string token and resolve its escapes.
///
/// On failure, return the byte offset of the offending backslash
/// relative to the start of the token.
pub fn unquote(s: &str) -> Result<String, usize> {
    let inner = s
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(s);
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.char_indices();
    while let Some((i, c)) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some((_, '"')) => out.push('"'),
            Some((_, '\\')) => out.push('\\'),
            Some((_, 'n')) => out.push('\n'),
            Some((_, 't')) => out.push('\t'),
            // account for the opening quote
            _ => return Err(i + 1),
        }
    }
    Ok(out)
}

#[test]
fn tokens() {
    use alloc::vec::Vec;
    let tokens: Vec<_> = crate::lex(r#"((is-sub) ; comment
        (set-comment "a \"b\""))"#)
    .collect();
    assert_eq!(
        tokens,
        [
            Token::LPar,
            Token::LPar,
            Token::Atom("is-sub"),
            Token::RPar,
            Token::LPar,
            Token::Atom("set-comment"),
            Token::Str(r#""a \"b\"""#),
            Token::RPar,
            Token::RPar,
        ]
    );
}

#[test]
fn unquoting() {
    assert_eq!(unquote(r#""a b""#).as_deref(), Ok("a b"));
    assert_eq!(unquote(r#""tab\there""#).as_deref(), Ok("tab\there"));
    assert_eq!(unquote(r#""\\""#).as_deref(), Ok("\\"));
    assert_eq!(unquote(r#""ab\q""#), Err(3));
}
