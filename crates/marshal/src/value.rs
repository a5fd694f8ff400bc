//! The host's value model.

use std::fmt;

/// A value as the host language sees it.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Integer(i128),
    Flonum(f64),
    Bool(bool),
    /// The empty list.
    Null,
    Pair(Box<Value>, Box<Value>),
    Bytevector(Vec<u8>),
    Vector(Vec<Value>),
    /// A positional record whose field order mirrors the native structure.
    Struct(Vec<Value>),
    Pointer(usize),
    /// A foreign memory region with a known size.
    MemoryBlock { addr: usize, size: usize },
    Void,
}
impl Value {
    pub fn cons(car: impl Into<Value>, cdr: impl Into<Value>) -> Self {
        Self::Pair(Box::new(car.into()), Box::new(cdr.into()))
    }

    /// Builds a proper list, preserving order.
    pub fn list<I>(items: I) -> Self
    where
        I: IntoIterator,
        I::IntoIter: DoubleEndedIterator,
        I::Item: Into<Value>,
    {
        items
            .into_iter()
            .rev()
            .fold(Self::Null, |tail, item| Self::cons(item, tail))
    }

    /// Returns the elements of a proper list, or [`None`] if this is not one.
    pub fn list_items(&self) -> Option<Vec<&Value>> {
        let mut out = Vec::new();
        let mut cursor = self;
        loop {
            match cursor {
                Self::Null => return Some(out),
                Self::Pair(car, cdr) => {
                    out.push(&**car);
                    cursor = &**cdr;
                }
                _ => return None,
            }
        }
    }

    /// Like [`Value::list_items`], but yields mutable references.
    pub fn list_items_mut(&mut self) -> Option<Vec<&mut Value>> {
        let mut out = Vec::new();
        let mut cursor = self;
        loop {
            let current = cursor;
            match current {
                Self::Null => return Some(out),
                Self::Pair(car, cdr) => {
                    out.push(&mut **car);
                    cursor = &mut **cdr;
                }
                _ => return None,
            }
        }
    }

    pub fn is_false(&self) -> bool {
        matches!(self, Self::Bool(false))
    }
}
impl From<i128> for Value {
    fn from(value: i128) -> Self {
        Self::Integer(value)
    }
}
impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}
impl From<Vec<u8>> for Value {
    fn from(value: Vec<u8>) -> Self {
        Self::Bytevector(value)
    }
}

fn write_seq(f: &mut fmt::Formatter<'_>, open: &str, items: &[Value], close: &str) -> fmt::Result {
    f.write_str(open)?;
    for (n, item) in items.iter().enumerate() {
        if n != 0 {
            f.write_str(" ")?;
        }
        write!(f, "{item}")?;
    }
    f.write_str(close)
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(n) => write!(f, "{n}"),
            Self::Flonum(x) if x.is_nan() => f.write_str("+nan.0"),
            Self::Flonum(x) if x.is_infinite() => {
                f.write_str(if *x > 0.0 { "+inf.0" } else { "-inf.0" })
            }
            Self::Flonum(x) => write!(f, "{x:?}"),
            Self::Bool(true) => f.write_str("#t"),
            Self::Bool(false) => f.write_str("#f"),
            Self::Null => f.write_str("()"),
            Self::Pair(car, cdr) => {
                write!(f, "({car}")?;
                let mut cursor = &**cdr;
                loop {
                    match cursor {
                        Self::Null => break,
                        Self::Pair(car, cdr) => {
                            write!(f, " {car}")?;
                            cursor = &**cdr;
                        }
                        tail => {
                            write!(f, " . {tail}")?;
                            break;
                        }
                    }
                }
                f.write_str(")")
            }
            Self::Bytevector(bytes) => {
                f.write_str("#vu8(")?;
                for (n, byte) in bytes.iter().enumerate() {
                    if n != 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{byte}")?;
                }
                f.write_str(")")
            }
            Self::Vector(items) => write_seq(f, "#(", items, ")"),
            Self::Struct(fields) => write_seq(f, "#[", fields, "]"),
            Self::Pointer(addr) => write!(f, "#<pointer {addr:#x}>"),
            Self::MemoryBlock { addr, size } => write!(f, "#<memory-block {addr:#x} {size}>"),
            Self::Void => f.write_str("#<void>"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_print_in_order() {
        let list = Value::list([Value::Integer(1), Value::Bool(false), Value::Null]);
        assert_eq!(list.to_string(), "(1 #f ())");
        assert_eq!(list.list_items().map(|x| x.len()), Some(3));
    }

    #[test]
    fn dotted_pairs_and_records() {
        let pair = Value::cons(Value::Integer(-2), Value::Bool(true));
        assert_eq!(pair.to_string(), "(-2 . #t)");
        assert_eq!(pair.list_items(), None);
        let record = Value::Struct(vec![Value::Bytevector(vec![1, 2]), Value::Flonum(3.0)]);
        assert_eq!(record.to_string(), "#[#vu8(1 2) 3.0]");
    }

    #[test]
    fn foreign_values() {
        assert_eq!(Value::Pointer(0x1000).to_string(), "#<pointer 0x1000>");
        assert_eq!(
            Value::MemoryBlock {
                addr: 0x20,
                size: 8
            }
            .to_string(),
            "#<memory-block 0x20 8>"
        );
        assert_eq!(Value::Vector(vec![]).to_string(), "#()");
        assert_eq!(Value::Flonum(f64::INFINITY).to_string(), "+inf.0");
    }
}
