use crate::element::Element;
use crate::smiles::error::SmilesError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Atom(AtomToken),
    Bond(BondToken, usize),
    RingClosure { digit: u16, pos: usize },
    OpenParen(usize),
    CloseParen(usize),
    Dot(usize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AtomToken {
    /// Element symbol in canonical case, `*` for wildcards.
    pub symbol: String,
    /// `None` for wildcards and symbols the periodic table does not know.
    /// Only `*` marks a generic substituent.
    pub element: Option<Element>,
    pub is_aromatic: bool,
    pub isotope: u16,
    pub hcount: Option<u8>,
    pub charge: i8,
    pub is_bracket: bool,
    pub pos: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BondToken {
    Single,
    Double,
    Triple,
    Aromatic,
    Up,
    Down,
}

pub fn tokenize(input: &str) -> Result<Vec<Token>, SmilesError> {
    let mut lexer = Lexer {
        chars: input.chars().collect(),
        pos: 0,
    };
    let mut tokens = Vec::new();
    while let Some(ch) = lexer.peek() {
        let start = lexer.pos;
        let token = match ch {
            ' ' | '\t' | '\r' | '\n' => {
                lexer.pos += 1;
                continue;
            }
            '[' => Token::Atom(lexer.bracket_atom()?),
            '*' => {
                lexer.pos += 1;
                Token::Atom(wildcard("*", false, start))
            }
            'B' | 'C' | 'N' | 'O' | 'P' | 'S' | 'F' | 'I' => Token::Atom(lexer.organic_atom()),
            'b' | 'c' | 'n' | 'o' | 'p' | 's' => {
                lexer.pos += 1;
                let element = Element::from_symbol(&ch.to_ascii_uppercase().to_string());
                Token::Atom(bare_atom(element, true, start))
            }
            '-' | '=' | '#' | ':' | '/' | '\\' => {
                lexer.pos += 1;
                let bond = match ch {
                    '-' => BondToken::Single,
                    '=' => BondToken::Double,
                    '#' => BondToken::Triple,
                    ':' => BondToken::Aromatic,
                    '/' => BondToken::Up,
                    _ => BondToken::Down,
                };
                Token::Bond(bond, start)
            }
            '(' => {
                lexer.pos += 1;
                Token::OpenParen(start)
            }
            ')' => {
                lexer.pos += 1;
                Token::CloseParen(start)
            }
            '.' => {
                lexer.pos += 1;
                Token::Dot(start)
            }
            '%' => {
                lexer.pos += 1;
                let tens = lexer.digit().ok_or(SmilesError::UnexpectedChar { pos: start, ch })?;
                let ones = lexer.digit().ok_or(SmilesError::UnexpectedChar { pos: start, ch })?;
                Token::RingClosure {
                    digit: tens * 10 + ones,
                    pos: start,
                }
            }
            '0'..='9' => {
                lexer.pos += 1;
                Token::RingClosure {
                    digit: ch as u16 - b'0' as u16,
                    pos: start,
                }
            }
            _ => return Err(SmilesError::UnexpectedChar { pos: start, ch }),
        };
        tokens.push(token);
    }
    Ok(tokens)
}

fn bare_atom(element: Option<Element>, is_aromatic: bool, pos: usize) -> AtomToken {
    AtomToken {
        symbol: element.map(Element::symbol).unwrap_or("*").to_string(),
        element,
        is_aromatic,
        isotope: 0,
        hcount: None,
        charge: 0,
        is_bracket: false,
        pos,
    }
}

fn wildcard(symbol: &str, is_bracket: bool, pos: usize) -> AtomToken {
    AtomToken {
        symbol: symbol.to_string(),
        element: None,
        is_aromatic: false,
        isotope: 0,
        hcount: if is_bracket { Some(0) } else { None },
        charge: 0,
        is_bracket,
        pos,
    }
}

struct Lexer {
    chars: Vec<char>,
    pos: usize,
}

impl Lexer {
    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn eat(&mut self, ch: char) -> bool {
        if self.peek() == Some(ch) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn digit(&mut self) -> Option<u16> {
        let d = self.peek()?.to_digit(10)?;
        self.pos += 1;
        Some(d as u16)
    }

    fn number(&mut self, bracket_start: usize) -> Result<Option<u16>, SmilesError> {
        let mut value: Option<u16> = None;
        while let Some(d) = self.digit() {
            let next = value
                .unwrap_or(0)
                .checked_mul(10)
                .and_then(|v| v.checked_add(d))
                .ok_or(SmilesError::NumberOverflow { pos: bracket_start })?;
            value = Some(next);
        }
        Ok(value)
    }

    /// `Cl` and `Br` are the only two-letter organic-subset symbols.
    fn organic_atom(&mut self) -> AtomToken {
        let start = self.pos;
        let first = self.chars[start];
        let two_letter = match (first, self.chars.get(start + 1)) {
            ('C', Some('l')) => Some(Element::CL),
            ('B', Some('r')) => Some(Element::BR),
            _ => None,
        };
        let element = match two_letter {
            Some(e) => {
                self.pos += 2;
                e
            }
            None => {
                self.pos += 1;
                Element::from_symbol(&first.to_string()).unwrap_or(Element::C)
            }
        };
        bare_atom(Some(element), false, start)
    }

    fn bracket_atom(&mut self) -> Result<AtomToken, SmilesError> {
        let start = self.pos;
        self.pos += 1;

        let isotope = self.number(start)?.unwrap_or(0);

        let mut token = if self.eat('*') {
            wildcard("*", true, start)
        } else {
            self.bracket_element(start)?
        };
        token.isotope = isotope;

        // Stereo marks are read and dropped.
        if self.eat('@') {
            self.eat('@');
            for tag in [['T', 'H'], ['A', 'L'], ['S', 'P'], ['T', 'B'], ['O', 'H']] {
                if self.chars[self.pos..].starts_with(&tag) {
                    self.pos += 2;
                    self.number(start)?;
                    break;
                }
            }
        }

        token.hcount = Some(if self.eat('H') {
            let n = self.number(start)?.unwrap_or(1);
            u8::try_from(n).map_err(|_| SmilesError::NumberOverflow { pos: start })?
        } else {
            0
        });

        token.charge = self.charge(start)?;

        if self.eat(':') {
            self.number(start)?;
        }

        if !self.eat(']') {
            return Err(SmilesError::UnclosedBracket { pos: start });
        }
        Ok(token)
    }

    /// Reads `[A-Z][a-z]{0,2}` or an aromatic lowercase symbol. Symbols the
    /// periodic table does not know become wildcards.
    fn bracket_element(&mut self, bracket_start: usize) -> Result<AtomToken, SmilesError> {
        let Some(first) = self.peek() else {
            return Err(SmilesError::UnclosedBracket { pos: bracket_start });
        };

        if first.is_ascii_lowercase() {
            for aromatic in ["se", "as", "te", "b", "c", "n", "o", "p", "s"] {
                let len = aromatic.len();
                let text: String = self.chars[self.pos..].iter().take(len).collect();
                if text == aromatic {
                    self.pos += len;
                    let mut upper = aromatic.to_string();
                    upper[..1].make_ascii_uppercase();
                    return Ok(bare_atom_bracketed(Element::from_symbol(&upper), true, bracket_start));
                }
            }
            return Err(SmilesError::UnexpectedChar {
                pos: self.pos,
                ch: first,
            });
        }

        if !first.is_ascii_uppercase() {
            return Err(SmilesError::MissingElement { pos: bracket_start });
        }

        let mut symbol = first.to_string();
        self.pos += 1;
        while symbol.len() < 3 {
            match self.peek() {
                Some(c) if c.is_ascii_lowercase() => {
                    symbol.push(c);
                    self.pos += 1;
                }
                _ => break,
            }
        }

        match Element::from_symbol(&symbol) {
            Some(e) => Ok(bare_atom_bracketed(Some(e), false, bracket_start)),
            None => Ok(wildcard(&symbol, true, bracket_start)),
        }
    }

    fn charge(&mut self, bracket_start: usize) -> Result<i8, SmilesError> {
        let sign: i8 = match self.peek() {
            Some('+') => 1,
            Some('-') => -1,
            _ => return Ok(0),
        };
        let sign_char = if sign > 0 { '+' } else { '-' };
        self.pos += 1;

        let mut magnitude: i8 = 1;
        if let Some(n) = self.number(bracket_start)? {
            magnitude = i8::try_from(n).map_err(|_| SmilesError::NumberOverflow { pos: bracket_start })?;
        } else {
            while self.eat(sign_char) {
                magnitude = magnitude
                    .checked_add(1)
                    .ok_or(SmilesError::NumberOverflow { pos: bracket_start })?;
            }
        }
        Ok(sign * magnitude)
    }
}

fn bare_atom_bracketed(element: Option<Element>, is_aromatic: bool, pos: usize) -> AtomToken {
    AtomToken {
        is_bracket: true,
        hcount: Some(0),
        ..bare_atom(element, is_aromatic, pos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn atoms(input: &str) -> Vec<AtomToken> {
        tokenize(input)
            .unwrap()
            .into_iter()
            .filter_map(|t| match t {
                Token::Atom(a) => Some(a),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn organic_two_letter() {
        let a = atoms("ClCBr");
        assert_eq!(a.len(), 3);
        assert_eq!(a[0].symbol, "Cl");
        assert_eq!(a[1].symbol, "C");
        assert_eq!(a[2].symbol, "Br");
    }

    #[test]
    fn aromatic_lowercase() {
        let a = atoms("c1ccncc1");
        assert!(a.iter().all(|t| t.is_aromatic));
        assert_eq!(a[3].symbol, "N");
    }

    #[test]
    fn bracket_charge_and_hydrogens() {
        let a = atoms("[NH4+]");
        assert_eq!(a[0].symbol, "N");
        assert_eq!(a[0].hcount, Some(4));
        assert_eq!(a[0].charge, 1);

        let a = atoms("[O--]");
        assert_eq!(a[0].charge, -2);

        let a = atoms("[Fe+3]");
        assert_eq!(a[0].charge, 3);
    }

    #[test]
    fn bracket_isotope_and_stereo() {
        let a = atoms("[13C@@H]");
        assert_eq!(a[0].isotope, 13);
        assert_eq!(a[0].hcount, Some(1));
    }

    #[test]
    fn bracket_aromatic_selenium() {
        let a = atoms("[se]");
        assert_eq!(a[0].symbol, "Se");
        assert!(a[0].is_aromatic);
        assert_eq!(a[0].hcount, Some(0));
    }

    #[test]
    fn unknown_element_becomes_wildcard() {
        let a = atoms("[Uup]");
        assert_eq!(a[0].element, None);
        assert_eq!(a[0].symbol, "Uup");
    }

    #[test]
    fn explicit_hydrogen_atom() {
        let a = atoms("[H]O[c]");
        assert_eq!(a[0].symbol, "H");
        assert_eq!(a[0].hcount, Some(0));
        assert!(a[2].is_aromatic);
    }

    #[test]
    fn percent_ring_closure() {
        let tokens = tokenize("C%12CC%12").unwrap();
        assert!(tokens
            .iter()
            .any(|t| matches!(t, Token::RingClosure { digit: 12, .. })));
    }

    #[test]
    fn errors() {
        assert!(matches!(
            tokenize("[CH4"),
            Err(SmilesError::UnclosedBracket { pos: 0 })
        ));
        assert!(matches!(
            tokenize("C$C"),
            Err(SmilesError::UnexpectedChar { pos: 1, ch: '$' })
        ));
        assert!(matches!(
            tokenize("[]"),
            Err(SmilesError::MissingElement { pos: 0 })
        ));
    }
}
