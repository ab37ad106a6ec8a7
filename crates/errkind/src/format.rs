//! printf-style message substitution.
//!
//! | Verb          | Renders                                   |
//! |---------------|-------------------------------------------|
//! | `%v` `%s`     | `Display`                                 |
//! | `%d`          | integers in decimal, anything else as `%v`|
//! | `%q`          | strings quoted (`Debug`)                  |
//! | `%x` `%X`     | integers in hex, strings byte-wise hex    |
//! | `%t`          | booleans                                  |
//! | `%f` `%.Nf`   | floats, default precision 6               |
//! | `%%`          | a literal `%`                             |
//!
//! Between `%` and the verb come optional flags (`-` left-justify, `0`
//! zero-fill, `+` and space for the sign of numbers, `#` for a `0x`
//! prefix), a width and a `.precision`.
//!
//! A verb without an argument renders `%!d(MISSING)`, an unknown verb
//! renders `%!z(arg)`, and unused arguments are appended as
//! `%!(EXTRA a, b)`.

use std::fmt::Write;
use std::iter::Peekable;
use std::str::Chars;

use crate::value::Value;

const VERBS: &str = "vsdqxXtf";

/// Flags, width and precision of one directive.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
struct Directive {
    minus: bool,
    plus: bool,
    space: bool,
    sharp: bool,
    zero: bool,
    width: Option<usize>,
    precision: Option<usize>,
}

impl Directive {
    fn parse(chars: &mut Peekable<Chars<'_>>) -> Self {
        let mut d = Directive::default();
        while let Some(&c) = chars.peek() {
            match c {
                '-' => d.minus = true,
                '+' => d.plus = true,
                ' ' => d.space = true,
                '#' => d.sharp = true,
                '0' => d.zero = true,
                _ => break,
            }
            chars.next();
        }

        d.width = digits(chars);
        if chars.peek() == Some(&'.') {
            chars.next();
            d.precision = Some(digits(chars).unwrap_or(0));
        }
        d
    }

    /// Pad `body` to the width. Zero-fill goes after any sign and is
    /// ignored when left-justifying.
    fn pad(&self, out: &mut String, body: &str) {
        let len = body.chars().count();
        let fill = self.width.map_or(0, |w| w.saturating_sub(len));
        if fill == 0 {
            out.push_str(body);
        } else if self.minus {
            out.push_str(body);
            out.extend(std::iter::repeat(' ').take(fill));
        } else if self.zero {
            let split = if body.starts_with(['-', '+', ' ']) { 1 } else { 0 };
            let (sign, digits) = body.split_at(split);
            out.push_str(sign);
            out.extend(std::iter::repeat('0').take(fill));
            out.push_str(digits);
        } else {
            out.extend(std::iter::repeat(' ').take(fill));
            out.push_str(body);
        }
    }
}

fn digits(chars: &mut Peekable<Chars<'_>>) -> Option<usize> {
    let mut value: Option<usize> = None;
    while let Some(d) = chars.peek().and_then(|c| c.to_digit(10)) {
        value = Some(value.unwrap_or(0).saturating_mul(10).saturating_add(d as usize));
        chars.next();
    }
    value
}

pub(crate) fn substitute(pattern: &str, args: &[Value]) -> String {
    let mut out = String::with_capacity(pattern.len() + 16 * args.len());
    let mut args_iter = args.iter();
    let mut chars = pattern.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '%' {
            out.push(c);
            continue;
        }

        let directive = Directive::parse(&mut chars);
        let verb = match chars.next() {
            Some(v) => v,
            None => {
                out.push_str("%!(NOVERB)");
                break;
            }
        };
        if verb == '%' {
            out.push('%');
            continue;
        }

        // Writing into a String cannot fail.
        let _ = match args_iter.next() {
            Some(arg) if VERBS.contains(verb) => {
                directive.pad(&mut out, &render(verb, &directive, arg));
                Ok(())
            }
            Some(arg) => write!(out, "%!{}({})", verb, arg),
            None => write!(out, "%!{}(MISSING)", verb),
        };
    }

    let extra: Vec<String> = args_iter.map(ToString::to_string).collect();
    if !extra.is_empty() {
        let _ = write!(out, "%!(EXTRA {})", extra.join(", "));
    }
    out
}

fn render(verb: char, d: &Directive, arg: &Value) -> String {
    let mut body = match (verb, arg) {
        ('q', Value::Str(s)) => format!("{:?}", s),
        ('x' | 'X', Value::Int(n)) => {
            let sign = if *n < 0 { "-" } else { "" };
            format!("{}{}", sign, hex(verb, d.sharp, n.unsigned_abs()))
        }
        ('x' | 'X', Value::Uint(n)) => hex(verb, d.sharp, *n),
        ('x', Value::Str(s)) => s.bytes().map(|b| format!("{:02x}", b)).collect(),
        ('X', Value::Str(s)) => s.bytes().map(|b| format!("{:02X}", b)).collect(),
        ('f', Value::Float(n)) => format!("{:.*}", d.precision.unwrap_or(6), n),
        _ => arg.to_string(),
    };

    let signed = matches!(arg, Value::Int(_) | Value::Float(_)) && matches!(verb, 'v' | 'd' | 'f');
    if signed && !body.starts_with('-') {
        if d.plus {
            body.insert(0, '+');
        } else if d.space {
            body.insert(0, ' ');
        }
    }
    body
}

fn hex(verb: char, sharp: bool, n: u64) -> String {
    match (verb, sharp) {
        ('X', true) => format!("{:#X}", n).replacen("0x", "0X", 1),
        ('X', false) => format!("{:X}", n),
        (_, true) => format!("{:#x}", n),
        (_, false) => format!("{:x}", n),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args<const N: usize>(values: [Value; N]) -> Vec<Value> {
        values.to_vec()
    }

    #[test]
    fn basic_verbs() {
        assert_eq!(substitute("x=%d", &args([7.into()])), "x=7");
        assert_eq!(
            substitute("args: %s, %v", &args(["one".into(), 2.into()])),
            "args: one, 2"
        );
        assert_eq!(substitute("can not open file %s", &args(["a.txt".into()])), "can not open file a.txt");
    }

    #[test]
    fn no_args_leaves_plain_text() {
        assert_eq!(substitute("plain message", &[]), "plain message");
        assert_eq!(substitute("100%%", &[]), "100%");
    }

    #[test]
    fn quoting_and_hex() {
        assert_eq!(substitute("%q", &args(["a b".into()])), "\"a b\"");
        assert_eq!(substitute("%x/%X", &args([255.into(), 255u32.into()])), "ff/FF");
        assert_eq!(substitute("%x", &args(["hi".into()])), "6869");
    }

    #[test]
    fn float_precision() {
        assert_eq!(substitute("%.2f", &args([3.14159.into()])), "3.14");
        assert_eq!(substitute("%f", &args([1.5.into()])), "1.500000");
        assert_eq!(substitute("%v", &args([1.5.into()])), "1.5");
    }

    #[test]
    fn missing_and_extra() {
        assert_eq!(substitute("%s and %d", &args(["a".into()])), "a and %!d(MISSING)");
        assert_eq!(
            substitute("only %v", &args([1.into(), 2.into(), "x".into()])),
            "only 1%!(EXTRA 2, x)"
        );
        assert_eq!(substitute("dangling %", &[]), "dangling %!(NOVERB)");
        assert_eq!(substitute("dangling %-5", &[]), "dangling %!(NOVERB)");
    }

    #[test]
    fn width_and_justification() {
        assert_eq!(substitute("id=%5d|", &args([7.into()])), "id=    7|");
        assert_eq!(substitute("%-4s|%03d", &args(["a".into(), 7.into()])), "a   |007");
        assert_eq!(substitute("%-05d|", &args([7.into()])), "7    |");
        assert_eq!(substitute("%2s", &args(["long".into()])), "long");
    }

    #[test]
    fn zero_fill_after_sign() {
        assert_eq!(substitute("%05d", &args([(-42).into()])), "-0042");
        assert_eq!(substitute("%+05d", &args([42.into()])), "+0042");
        assert_eq!(substitute("%6.2f", &args([3.14159.into()])), "  3.14");
    }

    #[test]
    fn sign_and_prefix_flags() {
        assert_eq!(substitute("%+d % d", &args([5.into(), 5.into()])), "+5  5");
        assert_eq!(substitute("%+d", &args([(-5).into()])), "-5");
        assert_eq!(substitute("%+s", &args(["a".into()])), "a");
        assert_eq!(substitute("%#x %#X", &args([255.into(), 255.into()])), "0xff 0XFF");
        assert_eq!(substitute("%x", &args([(-255).into()])), "-ff");
    }

    #[test]
    fn unknown_verb_is_marked() {
        assert_eq!(substitute("%z", &args([7.into()])), "%!z(7)");
        assert_eq!(substitute("%z and %d", &args(["a".into(), 2.into()])), "%!z(a) and 2");
        assert_eq!(substitute("%z", &[]), "%!z(MISSING)");
    }
}
