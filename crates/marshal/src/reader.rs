//! A reader for the textual notation [`Value`]'s `Display` produces.
//!
//! Strings in double quotes are read as bytevectors of their UTF-8 encoding.

use crate::Value;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("at offset {offset}: {message}")]
pub struct ParseError {
    pub offset: usize,
    pub message: &'static str,
}

/// Parses exactly one value from `text`, surrounded by optional whitespace.
pub fn parse(text: &str) -> Result<Value, ParseError> {
    let mut reader = Reader {
        src: text.as_bytes(),
        pos: 0,
    };
    let value = reader.value()?;
    reader.skip_ws();
    match reader.pos == reader.src.len() {
        true => Ok(value),
        false => Err(reader.error("trailing characters")),
    }
}

struct Reader<'a> {
    src: &'a [u8],
    pos: usize,
}
impl<'a> Reader<'a> {
    fn error(&self, message: &'static str) -> ParseError {
        ParseError {
            offset: self.pos,
            message,
        }
    }

    fn peek(&self) -> Option<u8> {
        self.src.get(self.pos).copied()
    }

    fn skip_ws(&mut self) {
        while self.peek().is_some_and(|c| c.is_ascii_whitespace()) {
            self.pos += 1;
        }
    }

    fn eat(&mut self, token: &[u8]) -> bool {
        match self.src[self.pos..].starts_with(token) {
            true => {
                self.pos += token.len();
                true
            }
            false => false,
        }
    }

    fn atom(&mut self) -> &'a str {
        let src = self.src;
        let start = self.pos;
        while self
            .peek()
            .is_some_and(|c| !c.is_ascii_whitespace() && !b"()[]\"".contains(&c))
        {
            self.pos += 1;
        }
        // Atoms only ever span ASCII bytes of a `&str`, so this cannot fail.
        std::str::from_utf8(&src[start..self.pos]).unwrap_or_default()
    }

    fn value(&mut self) -> Result<Value, ParseError> {
        self.skip_ws();
        match self.peek() {
            None => Err(self.error("unexpected end of input")),
            Some(b'(') => {
                self.pos += 1;
                self.list()
            }
            Some(b'"') => self.string(),
            Some(b'#') => self.hash(),
            Some(_) => self.number(),
        }
    }

    fn list(&mut self) -> Result<Value, ParseError> {
        let mut items = Vec::new();
        let mut tail = Value::Null;
        loop {
            self.skip_ws();
            match self.peek() {
                None => return Err(self.error("unterminated list")),
                Some(b')') => {
                    self.pos += 1;
                    break;
                }
                Some(b'.')
                    if self
                        .src
                        .get(self.pos + 1)
                        .is_none_or(|c| c.is_ascii_whitespace() || *c == b')') =>
                {
                    if items.is_empty() {
                        return Err(self.error("dot without a head"));
                    }
                    self.pos += 1;
                    tail = self.value()?;
                    self.skip_ws();
                    if !self.eat(b")") {
                        return Err(self.error("expected `)` after dotted tail"));
                    }
                    break;
                }
                Some(_) => items.push(self.value()?),
            }
        }
        Ok(items
            .into_iter()
            .rev()
            .fold(tail, |tail, item| Value::cons(item, tail)))
    }

    fn seq(&mut self, close: u8) -> Result<Vec<Value>, ParseError> {
        let mut items = Vec::new();
        loop {
            self.skip_ws();
            match self.peek() {
                None => return Err(self.error("unterminated sequence")),
                Some(c) if c == close => {
                    self.pos += 1;
                    return Ok(items);
                }
                Some(_) => items.push(self.value()?),
            }
        }
    }

    fn string(&mut self) -> Result<Value, ParseError> {
        self.pos += 1;
        let mut out = Vec::new();
        loop {
            match self.peek() {
                None => return Err(self.error("unterminated string")),
                Some(b'"') => {
                    self.pos += 1;
                    return Ok(Value::Bytevector(out));
                }
                Some(b'\\') => {
                    self.pos += 1;
                    let escaped = match self.peek() {
                        Some(b'n') => b'\n',
                        Some(b't') => b'\t',
                        Some(b'0') => 0,
                        Some(c @ (b'\\' | b'"')) => c,
                        _ => return Err(self.error("unknown escape")),
                    };
                    out.push(escaped);
                    self.pos += 1;
                }
                Some(c) => {
                    out.push(c);
                    self.pos += 1;
                }
            }
        }
    }

    fn hash(&mut self) -> Result<Value, ParseError> {
        if self.eat(b"#vu8(") {
            let items = self.seq(b')')?;
            return items
                .into_iter()
                .map(|x| match x {
                    Value::Integer(n) => u8::try_from(n).ok(),
                    _ => None,
                })
                .collect::<Option<Vec<u8>>>()
                .map(Value::Bytevector)
                .ok_or_else(|| self.error("bytevector elements must be octets"));
        }
        if self.eat(b"#(") {
            return self.seq(b')').map(Value::Vector);
        }
        if self.eat(b"#[") {
            return self.seq(b']').map(Value::Struct);
        }
        if self.eat(b"#<pointer") {
            self.skip_ws();
            let addr = self.address()?;
            return self.close_angle().map(|()| Value::Pointer(addr));
        }
        if self.eat(b"#<memory-block") {
            self.skip_ws();
            let addr = self.address()?;
            self.skip_ws();
            let size = self
                .atom()
                .trim_end_matches('>')
                .parse()
                .map_err(|_| self.error("bad memory block size"))?;
            self.pos -= usize::from(self.src[self.pos - 1] == b'>');
            return self
                .close_angle()
                .map(|()| Value::MemoryBlock { addr, size });
        }
        if self.eat(b"#<void>") {
            return Ok(Value::Void);
        }
        match self.atom() {
            "#t" | "#true" => Ok(Value::Bool(true)),
            "#f" | "#false" => Ok(Value::Bool(false)),
            atom if atom.starts_with("#x") => i128::from_str_radix(&atom[2..], 16)
                .map(Value::Integer)
                .map_err(|_| self.error("bad hexadecimal integer")),
            _ => Err(self.error("unknown `#` syntax")),
        }
    }

    fn address(&mut self) -> Result<usize, ParseError> {
        let atom = self.atom().trim_end_matches('>');
        let digits = atom.strip_prefix("0x").ok_or(self.error("expected 0x"))?;
        let addr = usize::from_str_radix(digits, 16).map_err(|_| self.error("bad address"))?;
        self.pos -= usize::from(self.src[self.pos - 1] == b'>');
        Ok(addr)
    }

    fn close_angle(&mut self) -> Result<(), ParseError> {
        self.skip_ws();
        match self.eat(b">") {
            true => Ok(()),
            false => Err(self.error("expected `>`")),
        }
    }

    fn number(&mut self) -> Result<Value, ParseError> {
        let atom = self.atom();
        if let Ok(n) = atom.parse::<i128>() {
            return Ok(Value::Integer(n));
        }
        match atom {
            "+inf.0" => return Ok(Value::Flonum(f64::INFINITY)),
            "-inf.0" => return Ok(Value::Flonum(f64::NEG_INFINITY)),
            "+nan.0" => return Ok(Value::Flonum(f64::NAN)),
            _ => {}
        }
        atom.parse::<f64>()
            .map(Value::Flonum)
            .map_err(|_| self.error("not a number"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_what_display_writes() {
        let value = Value::list([
            Value::Integer(-3),
            Value::cons(Value::Bool(true), Value::Flonum(1.5)),
            Value::Bytevector(vec![0, 255]),
            Value::Struct(vec![Value::Vector(vec![Value::Null]), Value::Void]),
            Value::Pointer(0xdead),
            Value::MemoryBlock {
                addr: 0x10,
                size: 64,
            },
        ]);
        assert_eq!(parse(&value.to_string()), Ok(value));
    }

    #[test]
    fn strings_are_bytevectors() {
        assert_eq!(
            parse(r#""a\"b""#),
            Ok(Value::Bytevector(b"a\"b".to_vec()))
        );
        assert_eq!(parse("#x1f"), Ok(Value::Integer(31)));
    }

    #[test]
    fn rejects_malformed_input() {
        assert!(parse("(1 2").is_err());
        assert!(parse("#vu8(256)").is_err());
        assert!(parse("( . 1)").is_err());
        assert!(parse("1 2").is_err());
        assert!(parse("#<pointer 12>").is_err());
    }
}
