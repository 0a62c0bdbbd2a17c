//! SQL dialects.
//!
//! A [`Dialect`] decides how identifiers are quoted, how bind placeholders are
//! spelled and how values are written as literals. The formatter receives one
//! at construction and never assumes a particular database.

use crate::value::Value;
use std::fmt::{self, Display, Write};

/// Quoting, placeholder and literal rules for one database flavour.
pub trait Dialect: Send + Sync + fmt::Debug {
    /// Human readable name, used in logs.
    fn name(&self) -> &'static str;

    /// Character that opens and closes a quoted identifier.
    fn ident_quote(&self) -> char;

    /// Append one identifier part, quoted; embedded quotes are doubled.
    fn append_ident(&self, out: &mut String, part: &str) {
        let quote = self.ident_quote();
        out.push(quote);
        let mut last = 0;
        for (index, ch) in part.char_indices() {
            if ch == quote {
                out.push_str(&part[last..index]);
                out.push(quote);
                out.push(quote);
                last = index + ch.len_utf8();
            }
        }
        out.push_str(&part[last..]);
        out.push(quote);
    }

    /// Append the placeholder for the bound argument at 1-based `index`.
    fn append_placeholder(&self, out: &mut String, index: usize);

    /// Append a string literal.
    fn append_string(&self, out: &mut String, s: &str) {
        out.push('\'');
        for ch in s.chars() {
            if ch == '\'' {
                out.push('\'');
            }
            out.push(ch);
        }
        out.push('\'');
    }

    fn append_bytes(&self, out: &mut String, bytes: &[u8]) {
        out.push_str("X'");
        push_hex(out, bytes);
        out.push('\'');
    }

    fn append_bool(&self, out: &mut String, v: bool) {
        out.push_str(if v { "TRUE" } else { "FALSE" });
    }

    fn append_float(&self, out: &mut String, v: f64) {
        if v.is_finite() {
            push_display(out, v);
        } else {
            out.push_str("NULL");
        }
    }

    fn append_timestamp(&self, out: &mut String, v: &chrono::DateTime<chrono::Utc>) {
        out.push('\'');
        push_display(out, v.format("%Y-%m-%d %H:%M:%S%.6f"));
        out.push('\'');
    }

    /// Append `value` as an inline literal.
    fn append_literal(&self, out: &mut String, value: &Value) {
        match value {
            Value::Null => out.push_str("NULL"),
            Value::Bool(v) => self.append_bool(out, *v),
            Value::I16(v) => push_display(out, v),
            Value::I32(v) => push_display(out, v),
            Value::I64(v) => push_display(out, v),
            Value::F32(v) if v.is_finite() => push_display(out, v),
            Value::F32(v) => self.append_float(out, f64::from(*v)),
            Value::F64(v) => self.append_float(out, *v),
            Value::Text(v) => self.append_string(out, v),
            Value::Bytes(v) => self.append_bytes(out, v),
            Value::Uuid(v) => {
                out.push('\'');
                push_display(out, v.hyphenated());
                out.push('\'');
            }
            Value::Timestamp(v) => self.append_timestamp(out, v),
            Value::Json(v) => self.append_string(out, &v.to_string()),
        }
    }
}

/// PostgreSQL: `"ident"`, `$1` placeholders.
#[derive(Debug, Clone, Copy, Default)]
pub struct Postgres;

impl Dialect for Postgres {
    fn name(&self) -> &'static str {
        "postgres"
    }

    fn ident_quote(&self) -> char {
        '"'
    }

    fn append_placeholder(&self, out: &mut String, index: usize) {
        out.push('$');
        push_usize(out, index);
    }

    /// Postgres text cannot hold NUL, so NUL characters are dropped.
    /// Bound parameters are sent unchanged.
    fn append_string(&self, out: &mut String, s: &str) {
        out.push('\'');
        for ch in s.chars() {
            match ch {
                '\'' => out.push_str("''"),
                '\0' => {}
                _ => out.push(ch),
            }
        }
        out.push('\'');
    }

    fn append_bytes(&self, out: &mut String, bytes: &[u8]) {
        out.push_str("'\\x");
        push_hex(out, bytes);
        out.push('\'');
    }

    fn append_float(&self, out: &mut String, v: f64) {
        if v.is_nan() {
            out.push_str("'NaN'");
        } else if v.is_infinite() {
            out.push_str(if v > 0.0 { "'Infinity'" } else { "'-Infinity'" });
        } else {
            push_display(out, v);
        }
    }

    fn append_timestamp(&self, out: &mut String, v: &chrono::DateTime<chrono::Utc>) {
        out.push('\'');
        push_display(out, v.format("%Y-%m-%d %H:%M:%S%.6f%:z"));
        out.push('\'');
    }
}

/// MySQL / MariaDB: `` `ident` ``, `?` placeholders, backslash-aware strings.
#[derive(Debug, Clone, Copy, Default)]
pub struct MySql;

impl Dialect for MySql {
    fn name(&self) -> &'static str {
        "mysql"
    }

    fn ident_quote(&self) -> char {
        '`'
    }

    fn append_placeholder(&self, out: &mut String, _index: usize) {
        out.push('?');
    }

    fn append_string(&self, out: &mut String, s: &str) {
        out.push('\'');
        for ch in s.chars() {
            match ch {
                '\'' => out.push_str("''"),
                '\\' => out.push_str("\\\\"),
                '\0' => out.push_str("\\0"),
                _ => out.push(ch),
            }
        }
        out.push('\'');
    }
}

/// SQLite: `"ident"`, `?` placeholders, booleans as integers.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sqlite;

impl Dialect for Sqlite {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    fn ident_quote(&self) -> char {
        '"'
    }

    fn append_placeholder(&self, out: &mut String, _index: usize) {
        out.push('?');
    }

    fn append_bool(&self, out: &mut String, v: bool) {
        out.push(if v { '1' } else { '0' });
    }
}

/// Writing into a `String` cannot fail.
pub(crate) fn push_display(out: &mut String, v: impl Display) {
    let _ = write!(out, "{v}");
}

/// Write a usize as decimal digits into `out` without going through fmt.
pub(crate) fn push_usize(out: &mut String, mut n: usize) {
    if n < 10 {
        out.push((b'0' + n as u8) as char);
        return;
    }
    let mut buf = [0u8; 20];
    let mut pos = buf.len();
    while n > 0 {
        pos -= 1;
        buf[pos] = b'0' + (n % 10) as u8;
        n /= 10;
    }
    for &digit in &buf[pos..] {
        out.push(digit as char);
    }
}

fn push_hex(out: &mut String, bytes: &[u8]) {
    const HEX: &[u8; 16] = b"0123456789abcdef";
    out.reserve(bytes.len() * 2);
    for &b in bytes {
        out.push(HEX[(b >> 4) as usize] as char);
        out.push(HEX[(b & 0x0f) as usize] as char);
    }
}
