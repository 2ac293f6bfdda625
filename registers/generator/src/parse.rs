// Licensed under the Apache-2.0 license

//! Reads register-map DSL text back into the model types.
//!
//! Hand-written tokenizer and recursive-descent parser over the block
//! grammar produced by [`crate::emit`]. Whitespace is insignificant. The
//! reader enforces the same structural rules the model encodes: an `SLV`
//! field needs a `size`, a `MONOSTABLE` field carries no size or access
//! attributes, and every other field needs both access sides.

use crate::error::Error;
use crate::model::{Access, AccessMode, Field, FieldKind, Interrupt, Peripheral, Register, Trigger};

/// Parse a complete `peripheral { ... };` block.
pub fn parse(input: &str) -> Result<Peripheral, Error> {
    let tokens = lex(input)?;
    let mut parser = Parser { tokens, pos: 0 };
    let peripheral = parser.peripheral()?;
    parser.expect_end()?;
    Ok(peripheral)
}

#[derive(Clone, Debug, PartialEq)]
enum Token {
    Ident(String),
    Str(String),
    Int(u32),
    LBrace,
    RBrace,
    Semi,
    Eq,
}

fn lex(input: &str) -> Result<Vec<Token>, Error> {
    let mut tokens = Vec::new();
    let mut chars = input.chars().peekable();
    while let Some(&c) = chars.peek() {
        match c {
            c if c.is_whitespace() => {
                chars.next();
            }
            '{' => {
                chars.next();
                tokens.push(Token::LBrace);
            }
            '}' => {
                chars.next();
                tokens.push(Token::RBrace);
            }
            ';' => {
                chars.next();
                tokens.push(Token::Semi);
            }
            '=' => {
                chars.next();
                tokens.push(Token::Eq);
            }
            '"' => {
                chars.next();
                let mut s = String::new();
                loop {
                    match chars.next() {
                        Some('"') => break,
                        Some(c) => s.push(c),
                        None => return Err(Error::Parse("unterminated string".to_string())),
                    }
                }
                tokens.push(Token::Str(s));
            }
            c if c.is_ascii_digit() => {
                let mut n: u32 = 0;
                while let Some(d) = chars.peek().and_then(|c| c.to_digit(10)) {
                    n = n
                        .checked_mul(10)
                        .and_then(|n| n.checked_add(d))
                        .ok_or_else(|| {
                            Error::Parse("integer literal out of range".to_string())
                        })?;
                    chars.next();
                }
                tokens.push(Token::Int(n));
            }
            c if c.is_ascii_alphabetic() || c == '_' => {
                let mut s = String::new();
                while let Some(&c) = chars.peek() {
                    if c.is_ascii_alphanumeric() || c == '_' {
                        s.push(c);
                        chars.next();
                    } else {
                        break;
                    }
                }
                tokens.push(Token::Ident(s));
            }
            c => return Err(Error::Parse(format!("unexpected character {c:?}"))),
        }
    }
    Ok(tokens)
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn next(&mut self) -> Result<Token, Error> {
        let tok = self
            .tokens
            .get(self.pos)
            .cloned()
            .ok_or_else(|| Error::Parse("unexpected end of input".to_string()))?;
        self.pos += 1;
        Ok(tok)
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn expect(&mut self, want: Token) -> Result<(), Error> {
        let tok = self.next()?;
        if tok == want {
            Ok(())
        } else {
            Err(Error::Parse(format!("expected {want:?}, found {tok:?}")))
        }
    }

    fn expect_end(&self) -> Result<(), Error> {
        if self.pos == self.tokens.len() {
            Ok(())
        } else {
            Err(Error::Parse(
                "trailing input after peripheral block".to_string(),
            ))
        }
    }

    fn ident(&mut self) -> Result<String, Error> {
        match self.next()? {
            Token::Ident(s) => Ok(s),
            tok => Err(Error::Parse(format!("expected identifier, found {tok:?}"))),
        }
    }

    fn keyword(&mut self, word: &str) -> Result<(), Error> {
        match self.next()? {
            Token::Ident(s) if s == word => Ok(()),
            tok => Err(Error::Parse(format!("expected `{word}`, found {tok:?}"))),
        }
    }

    /// `= "<string>";` after an attribute name.
    fn string_value(&mut self) -> Result<String, Error> {
        self.expect(Token::Eq)?;
        let value = match self.next()? {
            Token::Str(s) => s,
            tok => return Err(Error::Parse(format!("expected string, found {tok:?}"))),
        };
        self.expect(Token::Semi)?;
        Ok(value)
    }

    /// `= <identifier>;` after an attribute name.
    fn ident_value(&mut self) -> Result<String, Error> {
        self.expect(Token::Eq)?;
        let value = self.ident()?;
        self.expect(Token::Semi)?;
        Ok(value)
    }

    /// `= <integer>;` after an attribute name.
    fn int_value(&mut self) -> Result<u32, Error> {
        self.expect(Token::Eq)?;
        let value = match self.next()? {
            Token::Int(n) => n,
            tok => return Err(Error::Parse(format!("expected integer, found {tok:?}"))),
        };
        self.expect(Token::Semi)?;
        Ok(value)
    }

    fn access_value(&mut self) -> Result<AccessMode, Error> {
        let token = self.ident_value()?;
        match token.as_str() {
            "READ_ONLY" => Ok(AccessMode::ReadOnly),
            "READ_WRITE" => Ok(AccessMode::ReadWrite),
            "WRITE_ONLY" => Ok(AccessMode::WriteOnly),
            other => Err(Error::Parse(format!("unknown access mode `{other}`"))),
        }
    }

    fn peripheral(&mut self) -> Result<Peripheral, Error> {
        self.keyword("peripheral")?;
        self.expect(Token::LBrace)?;
        let mut name = None;
        let mut description = None;
        let mut hdl_entity = None;
        let mut prefix = None;
        let mut registers = Vec::new();
        let mut interrupts = Vec::new();
        loop {
            if matches!(self.peek(), Some(Token::RBrace)) {
                self.next()?;
                break;
            }
            let key = self.ident()?;
            match key.as_str() {
                "reg" => registers.push(self.register()?),
                "irq" => interrupts.push(self.interrupt()?),
                "name" => name = Some(self.string_value()?),
                "description" => description = Some(self.string_value()?),
                "hdl_entity" => hdl_entity = Some(self.string_value()?),
                "prefix" => prefix = Some(self.string_value()?),
                other => {
                    return Err(Error::Parse(format!(
                        "unexpected `{other}` in peripheral block"
                    )))
                }
            }
        }
        self.expect(Token::Semi)?;
        Ok(Peripheral {
            name: required(name, "name", "peripheral")?,
            description: required(description, "description", "peripheral")?,
            hdl_entity: required(hdl_entity, "hdl_entity", "peripheral")?,
            prefix: required(prefix, "prefix", "peripheral")?,
            registers,
            interrupts,
        })
    }

    fn register(&mut self) -> Result<Register, Error> {
        self.expect(Token::LBrace)?;
        let mut name = None;
        let mut description = None;
        let mut prefix = None;
        let mut fields = Vec::new();
        loop {
            if matches!(self.peek(), Some(Token::RBrace)) {
                self.next()?;
                break;
            }
            let key = self.ident()?;
            match key.as_str() {
                "field" => fields.push(self.field()?),
                "name" => name = Some(self.string_value()?),
                "description" => description = Some(self.string_value()?),
                "prefix" => prefix = Some(self.string_value()?),
                other => return Err(Error::Parse(format!("unexpected `{other}` in reg block"))),
            }
        }
        self.expect(Token::Semi)?;
        if fields.is_empty() {
            return Err(Error::Parse(
                "reg block needs at least one field".to_string(),
            ));
        }
        Ok(Register {
            name: required(name, "name", "reg")?,
            description: required(description, "description", "reg")?,
            prefix: required(prefix, "prefix", "reg")?,
            fields,
        })
    }

    fn field(&mut self) -> Result<Field, Error> {
        self.expect(Token::LBrace)?;
        let mut name = None;
        let mut prefix = None;
        let mut kind_token = None;
        let mut size = None;
        let mut access_bus = None;
        let mut access_dev = None;
        loop {
            if matches!(self.peek(), Some(Token::RBrace)) {
                self.next()?;
                break;
            }
            let key = self.ident()?;
            match key.as_str() {
                "name" => name = Some(self.string_value()?),
                "prefix" => prefix = Some(self.string_value()?),
                "type" => kind_token = Some(self.ident_value()?),
                "size" => size = Some(self.int_value()?),
                "access_bus" => access_bus = Some(self.access_value()?),
                "access_dev" => access_dev = Some(self.access_value()?),
                other => {
                    return Err(Error::Parse(format!("unexpected `{other}` in field block")))
                }
            }
        }
        self.expect(Token::Semi)?;
        Ok(Field {
            name: required(name, "name", "field")?,
            prefix,
            kind: field_kind(kind_token, size, access_bus, access_dev)?,
        })
    }

    fn interrupt(&mut self) -> Result<Interrupt, Error> {
        self.expect(Token::LBrace)?;
        let mut name = None;
        let mut description = None;
        let mut prefix = None;
        let mut trigger = None;
        loop {
            if matches!(self.peek(), Some(Token::RBrace)) {
                self.next()?;
                break;
            }
            let key = self.ident()?;
            match key.as_str() {
                "name" => name = Some(self.string_value()?),
                "description" => description = Some(self.string_value()?),
                "prefix" => prefix = Some(self.string_value()?),
                "trigger" => {
                    let token = self.ident_value()?;
                    if token != "EDGE_RISING" {
                        return Err(Error::Parse(format!("unknown trigger `{token}`")));
                    }
                    trigger = Some(Trigger::EdgeRising);
                }
                other => return Err(Error::Parse(format!("unexpected `{other}` in irq block"))),
            }
        }
        self.expect(Token::Semi)?;
        Ok(Interrupt {
            name: required(name, "name", "irq")?,
            description: required(description, "description", "irq")?,
            prefix: required(prefix, "prefix", "irq")?,
            trigger: required(trigger, "trigger", "irq")?,
        })
    }
}

fn required<T>(value: Option<T>, attr: &str, block: &str) -> Result<T, Error> {
    value.ok_or_else(|| Error::Parse(format!("{block} block is missing `{attr}`")))
}

fn field_kind(
    ty: Option<String>,
    size: Option<u32>,
    bus: Option<AccessMode>,
    dev: Option<AccessMode>,
) -> Result<FieldKind, Error> {
    let ty = required(ty, "type", "field")?;
    match ty.as_str() {
        "MONOSTABLE" => {
            if size.is_some() || bus.is_some() || dev.is_some() {
                return Err(Error::Parse(
                    "MONOSTABLE fields carry no size or access attributes".to_string(),
                ));
            }
            Ok(FieldKind::Monostable)
        }
        "BIT" | "SLV" => {
            let access = match (bus, dev) {
                (Some(bus), Some(dev)) => Access { bus, dev },
                _ => {
                    return Err(Error::Parse(format!(
                        "{ty} fields need both access_bus and access_dev"
                    )))
                }
            };
            if ty == "BIT" {
                if size.is_some() {
                    return Err(Error::Parse("BIT fields have no size".to_string()));
                }
                Ok(FieldKind::Bit { access })
            } else {
                match size {
                    Some(size) if size > 0 => Ok(FieldKind::Slv { size, access }),
                    Some(_) => Err(Error::Parse("SLV size must be positive".to_string())),
                    None => Err(Error::Parse("SLV fields need a size".to_string())),
                }
            }
        }
        other => Err(Error::Parse(format!("unknown field type `{other}`"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::build;
    use crate::emit::emit_to_string;

    #[test]
    fn test_round_trips_the_built_model() {
        for n in [1u32, 2, 8] {
            let p = build(n).unwrap();
            let parsed = parse(&emit_to_string(&p)).unwrap();
            assert_eq!(parsed, p, "round trip for n={n}");
        }
    }

    #[test]
    fn test_rejects_slv_without_size() {
        let text = r#"
peripheral {
    name = "X"; description = "X."; hdl_entity = "x"; prefix = "x";
    reg {
        name = "R"; description = "R."; prefix = "r";
        field {
            name = "V";
            type = SLV;
            access_bus = READ_ONLY;
            access_dev = WRITE_ONLY;
        };
    };
};
"#;
        assert!(matches!(parse(text), Err(Error::Parse(_))));
    }

    #[test]
    fn test_rejects_access_on_monostable() {
        let text = r#"
peripheral {
    name = "X"; description = "X."; hdl_entity = "x"; prefix = "x";
    reg {
        name = "R"; description = "R."; prefix = "r";
        field {
            name = "V";
            type = MONOSTABLE;
            access_bus = READ_WRITE;
        };
    };
};
"#;
        assert!(matches!(parse(text), Err(Error::Parse(_))));
    }

    #[test]
    fn test_rejects_register_without_fields() {
        let text = r#"
peripheral {
    name = "X"; description = "X."; hdl_entity = "x"; prefix = "x";
    reg { name = "R"; description = "R."; prefix = "r"; };
};
"#;
        assert!(matches!(parse(text), Err(Error::Parse(_))));
    }

    #[test]
    fn test_rejects_unknown_trigger() {
        let text = r#"
peripheral {
    name = "X"; description = "X."; hdl_entity = "x"; prefix = "x";
    irq {
        name = "I"; description = "I."; prefix = "i";
        trigger = LEVEL_HIGH;
    };
};
"#;
        assert!(matches!(parse(text), Err(Error::Parse(_))));
    }

    #[test]
    fn test_rejects_unterminated_string() {
        assert!(parse("peripheral { name = \"oops").is_err());
    }

    #[test]
    fn test_rejects_trailing_input() {
        let mut text = emit_to_string(&build(1).unwrap());
        text.push_str("reg");
        assert!(matches!(parse(&text), Err(Error::Parse(_))));
    }

    #[test]
    fn test_rejects_missing_peripheral_attribute() {
        let text = r#"peripheral { name = "X"; description = "X."; prefix = "x"; };"#;
        assert!(matches!(parse(text), Err(Error::Parse(_))));
    }

    #[test]
    fn test_whitespace_is_insignificant() {
        let compact = r#"peripheral{name="X";description="X.";hdl_entity="x";prefix="x";
            irq{name="I";description="I.";prefix="i";trigger=EDGE_RISING;};};"#;
        let p = parse(compact).unwrap();
        assert_eq!(p.interrupts.len(), 1);
        assert_eq!(p.interrupts[0].trigger, Trigger::EdgeRising);
    }
}
