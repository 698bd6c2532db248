//! Static keyword lookup table, built once via [`once_cell::sync::Lazy`].

use std::collections::HashMap;

use once_cell::sync::Lazy;

use super::token::Keyword;

pub static KEYWORDS: Lazy<HashMap<&'static str, Keyword>> = Lazy::new(|| {
    use Keyword::*;
    HashMap::from([
        ("if", If),
        ("else", Else),
        ("for", For),
        ("while", While),
        ("do", Do),
        ("break", Break),
        ("continue", Continue),
        ("return", Return),
        ("int", Int),
        ("double", Double),
        ("bool", Bool),
        ("string", String),
        ("void", Void),
        ("infix", Infix),
    ])
});

pub fn lookup_keyword(ident: &str) -> Option<Keyword> {
    KEYWORDS.get(ident).copied()
}
