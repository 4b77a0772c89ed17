use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("empty line")]
    Empty,
    #[error("{0}")]
    Fatal(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    Word { text: String, quoted: bool },
    /// The conjunction operator `&&`.
    AndAnd,
    /// A trailing `&` marking the line's last command as background.
    Background,
}

/// A token plus the byte range it occupies in the input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub start: usize,
    pub end: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Word {
    pub text: String,
    /// True when any character of the token came from inside quotes.
    pub quoted: bool,
}

/// One simple command within a `&&` chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conjunct {
    pub argv: Vec<Word>,
    pub background: bool,
    /// The conjunct exactly as typed, including an attached trailing `&`.
    pub code: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ast {
    pub conjuncts: Vec<Conjunct>,
}

fn is_blank(c: char) -> bool {
    c == ' ' || c == '\t'
}

fn flush_word(tokens: &mut Vec<Token>, buf: &mut String, quoted: &mut bool, start: usize, end: usize) {
    if !buf.is_empty() || *quoted {
        tokens.push(Token {
            kind: TokenKind::Word {
                text: std::mem::take(buf),
                quoted: *quoted,
            },
            start,
            end,
        });
        *quoted = false;
    }
}

/// Splits a line into tokens.
///
/// Single and double quotes group characters literally; the quote characters
/// themselves are consumed. `&&` is the conjunction operator only at a token
/// boundary followed by a blank or the end of the line. An unquoted `&` that
/// is the final non-blank character of the line is the background marker;
/// every other unquoted `&` is an ordinary character.
pub fn tokenize(line: &str) -> Result<Vec<Token>, ParseError> {
    let chars: Vec<(usize, char)> = line.char_indices().collect();
    let last_nonblank = chars.iter().rfind(|(_, c)| !is_blank(*c)).map(|(i, _)| *i);

    let mut tokens = Vec::new();
    let mut buf = String::new();
    let mut quoted = false;
    let mut start = 0;
    let mut i = 0;

    while i < chars.len() {
        let (pos, c) = chars[i];
        let pending = !buf.is_empty() || quoted;
        match c {
            ' ' | '\t' => {
                flush_word(&mut tokens, &mut buf, &mut quoted, start, pos);
                i += 1;
            }
            '\'' | '"' => {
                if !pending {
                    start = pos;
                }
                quoted = true;
                i += 1;
                let mut closed = false;
                while i < chars.len() {
                    let (_, d) = chars[i];
                    i += 1;
                    if d == c {
                        closed = true;
                        break;
                    }
                    buf.push(d);
                }
                if !closed {
                    return Err(ParseError::Fatal(format!("unterminated {} quote", c)));
                }
            }
            '&' => {
                let next_is_amp = matches!(chars.get(i + 1), Some((_, '&')));
                let after = chars.get(i + 2).map(|&(_, d)| d);
                if !pending && next_is_amp && after.map_or(true, is_blank) {
                    tokens.push(Token {
                        kind: TokenKind::AndAnd,
                        start: pos,
                        end: pos + 2,
                    });
                    i += 2;
                } else if Some(pos) == last_nonblank {
                    flush_word(&mut tokens, &mut buf, &mut quoted, start, pos);
                    tokens.push(Token {
                        kind: TokenKind::Background,
                        start: pos,
                        end: pos + 1,
                    });
                    i += 1;
                } else {
                    if !pending {
                        start = pos;
                    }
                    buf.push('&');
                    i += 1;
                }
            }
            _ => {
                if !pending {
                    start = pos;
                }
                buf.push(c);
                i += 1;
            }
        }
    }

    flush_word(&mut tokens, &mut buf, &mut quoted, start, line.len());
    Ok(tokens)
}

/// Parses a line into a sequence of conjuncts.
///
/// Returns `ParseError::Empty` for a blank line and `ParseError::Fatal` when
/// a `&&` has nothing on one of its sides.
pub fn parse(line: &str) -> Result<Ast, ParseError> {
    let tokens = tokenize(line)?;
    if tokens.is_empty() {
        return Err(ParseError::Empty);
    }

    let mut groups: Vec<Vec<&Token>> = vec![Vec::new()];
    let mut background = false;
    for token in &tokens {
        match token.kind {
            TokenKind::AndAnd => groups.push(Vec::new()),
            TokenKind::Background => {
                // The tokenizer only emits this at the end of the line.
                background = true;
                if let Some(group) = groups.last_mut() {
                    group.push(token);
                }
            }
            TokenKind::Word { .. } => {
                if let Some(group) = groups.last_mut() {
                    group.push(token);
                }
            }
        }
    }

    let count = groups.len();
    let mut conjuncts = Vec::new();
    for (index, group) in groups.iter().enumerate() {
        let argv: Vec<Word> = group
            .iter()
            .filter_map(|token| match &token.kind {
                TokenKind::Word { text, quoted } => Some(Word {
                    text: text.clone(),
                    quoted: *quoted,
                }),
                _ => None,
            })
            .collect();
        if argv.is_empty() {
            return Err(ParseError::Fatal("missing command around `&&`".to_owned()));
        }
        let code = line[group[0].start..group[group.len() - 1].end].to_owned();
        conjuncts.push(Conjunct {
            argv,
            background: background && index == count - 1,
            code,
        });
    }

    debug!("parsed {} conjunct(s)", conjuncts.len());
    Ok(Ast { conjuncts })
}

/// Tokenizes an alias replacement into plain words. Operators lose their
/// special meaning here: the replacement substitutes argv positions only.
pub fn tokenize_words(text: &str) -> Vec<Word> {
    match tokenize(text) {
        Ok(tokens) => tokens
            .into_iter()
            .map(|token| match token.kind {
                TokenKind::Word { text, quoted } => Word { text, quoted },
                TokenKind::AndAnd => Word {
                    text: "&&".to_owned(),
                    quoted: false,
                },
                TokenKind::Background => Word {
                    text: "&".to_owned(),
                    quoted: false,
                },
            })
            .collect(),
        Err(_) => vec![Word {
            text: text.to_owned(),
            quoted: false,
        }],
    }
}
