//! Minimal namespace-aware XML reader for SOAP envelopes.
//!
//! Handles elements, attributes, namespace declarations, text, CDATA,
//! comments, processing instructions and the predefined/numeric entities.
//! DTDs are skipped, not interpreted.

use std::collections::HashMap;

/// XML parsing errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum XmlError {
    #[error("unexpected end of document")]
    UnexpectedEof,

    #[error("malformed XML at byte {at}: {reason}")]
    Malformed { at: usize, reason: &'static str },

    #[error("undeclared namespace prefix '{0}'")]
    UnboundPrefix(String),

    #[error("closing tag </{found}> does not match <{expected}>")]
    MismatchedTag { expected: String, found: String },

    #[error("unknown entity '&{0};'")]
    UnknownEntity(String),

    #[error("elements nested deeper than {0} levels")]
    TooDeep(usize),
}

/// Deepest element nesting accepted; a SOAP envelope needs about five.
pub const MAX_DEPTH: usize = 64;

/// A parsed element with its namespace resolved.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    pub namespace: Option<String>,
    pub name: String,
    /// Concatenated character data of this element (not of its children)
    pub text: String,
    pub children: Vec<Element>,
}

impl Element {
    /// Whether this element has the given expanded name.
    pub fn is(&self, namespace: Option<&str>, name: &str) -> bool {
        self.name == name && self.namespace.as_deref() == namespace
    }

    /// First descendant in document order with the given expanded name.
    pub fn find(&self, namespace: Option<&str>, name: &str) -> Option<&Element> {
        for child in &self.children {
            if child.is(namespace, name) {
                return Some(child);
            }
            if let Some(found) = child.find(namespace, name) {
                return Some(found);
            }
        }
        None
    }

    /// First direct child with this local name, in any namespace.
    pub fn child(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|c| c.name == name)
    }

    /// Character data with surrounding whitespace removed.
    pub fn text(&self) -> &str {
        self.text.trim()
    }
}

/// Parse a document and return its root element.
pub fn parse(input: &str) -> Result<Element, XmlError> {
    let mut parser = Parser { src: input, pos: 0 };
    parser.skip_misc()?;
    let root = parser.element(&Scope::new(), 1)?;
    parser.skip_misc()?;

    if parser.pos < parser.src.len() {
        return Err(XmlError::Malformed {
            at: parser.pos,
            reason: "content after root element",
        });
    }

    Ok(root)
}

/// Escape text for use in element content or attribute values.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

/// Replace predefined and numeric character references.
pub fn decode_entities(raw: &str) -> Result<String, XmlError> {
    if !raw.contains('&') {
        return Ok(raw.to_string());
    }

    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let after = &rest[amp + 1..];
        let semi = after
            .find(';')
            .ok_or_else(|| XmlError::UnknownEntity(after.chars().take(8).collect()))?;
        let entity = &after[..semi];

        let decoded = match entity {
            "lt" => '<',
            "gt" => '>',
            "amp" => '&',
            "quot" => '"',
            "apos" => '\'',
            _ => {
                let code = if let Some(hex) = entity.strip_prefix("#x") {
                    u32::from_str_radix(hex, 16).ok()
                } else if let Some(dec) = entity.strip_prefix('#') {
                    dec.parse().ok()
                } else {
                    None
                };
                code.and_then(char::from_u32)
                    .ok_or_else(|| XmlError::UnknownEntity(entity.to_string()))?
            }
        };
        out.push(decoded);
        rest = &after[semi + 1..];
    }
    out.push_str(rest);

    Ok(out)
}

/// In-scope prefix bindings; the default namespace is stored under "".
type Scope = HashMap<String, String>;

fn resolve(tag: &str, scope: &Scope) -> Result<(Option<String>, String), XmlError> {
    match tag.split_once(':') {
        Some((prefix, local)) => {
            let uri = scope
                .get(prefix)
                .ok_or_else(|| XmlError::UnboundPrefix(prefix.to_string()))?;
            Ok((Some(uri.clone()), local.to_string()))
        }
        None => Ok((
            scope.get("").filter(|uri| !uri.is_empty()).cloned(),
            tag.to_string(),
        )),
    }
}

struct Parser<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    fn malformed(&self, reason: &'static str) -> XmlError {
        if self.rest().is_empty() {
            XmlError::UnexpectedEof
        } else {
            XmlError::Malformed {
                at: self.pos,
                reason,
            }
        }
    }

    fn skip_ws(&mut self) {
        let trimmed = self.rest().trim_start();
        self.pos = self.src.len() - trimmed.len();
    }

    /// Advance past `terminator`, returning everything before it.
    fn take_until(&mut self, terminator: &str) -> Result<&'a str, XmlError> {
        let rest = self.rest();
        let idx = rest.find(terminator).ok_or(XmlError::UnexpectedEof)?;
        self.pos += idx + terminator.len();
        Ok(&rest[..idx])
    }

    fn skip_misc(&mut self) -> Result<(), XmlError> {
        loop {
            self.skip_ws();
            let rest = self.rest();
            if rest.starts_with("<?") {
                self.take_until("?>")?;
            } else if rest.starts_with("<!--") {
                self.take_until("-->")?;
            } else if rest.starts_with("<!DOCTYPE") {
                self.take_until(">")?;
            } else {
                return Ok(());
            }
        }
    }

    fn expect(&mut self, token: &str) -> Result<(), XmlError> {
        if self.rest().starts_with(token) {
            self.pos += token.len();
            Ok(())
        } else {
            Err(self.malformed("unexpected character"))
        }
    }

    fn name(&mut self) -> Result<&'a str, XmlError> {
        let rest = self.rest();
        let end = rest
            .find(|c: char| c.is_whitespace() || matches!(c, '>' | '/' | '=' | '<'))
            .unwrap_or(rest.len());
        if end == 0 {
            return Err(self.malformed("expected a name"));
        }
        self.pos += end;
        Ok(&rest[..end])
    }

    fn element(&mut self, parent: &Scope, depth: usize) -> Result<Element, XmlError> {
        if depth > MAX_DEPTH {
            return Err(XmlError::TooDeep(MAX_DEPTH));
        }
        self.expect("<")?;
        let tag = self.name()?;

        let mut attributes = Vec::new();
        let self_closing = loop {
            self.skip_ws();
            let rest = self.rest();
            if rest.starts_with("/>") {
                self.pos += 2;
                break true;
            }
            if rest.starts_with('>') {
                self.pos += 1;
                break false;
            }

            let key = self.name()?;
            self.skip_ws();
            self.expect("=")?;
            self.skip_ws();
            let quote = match self.rest().chars().next() {
                Some(q @ ('"' | '\'')) => q,
                _ => return Err(self.malformed("attribute value must be quoted")),
            };
            self.pos += 1;
            let raw = self.take_until(if quote == '"' { "\"" } else { "'" })?;
            attributes.push((key, decode_entities(raw)?));
        };

        let mut scope = parent.clone();
        for (key, value) in &attributes {
            if *key == "xmlns" {
                scope.insert(String::new(), value.clone());
            } else if let Some(prefix) = key.strip_prefix("xmlns:") {
                scope.insert(prefix.to_string(), value.clone());
            }
        }

        let (namespace, name) = resolve(tag, &scope)?;
        let mut element = Element {
            namespace,
            name,
            ..Default::default()
        };
        if self_closing {
            return Ok(element);
        }

        loop {
            let rest = self.rest();
            if rest.is_empty() {
                return Err(XmlError::UnexpectedEof);
            }

            if rest.starts_with("</") {
                self.pos += 2;
                let closing = self.name()?;
                self.skip_ws();
                self.expect(">")?;
                if closing != tag {
                    return Err(XmlError::MismatchedTag {
                        expected: tag.to_string(),
                        found: closing.to_string(),
                    });
                }
                return Ok(element);
            } else if rest.starts_with("<!--") {
                self.take_until("-->")?;
            } else if rest.starts_with("<![CDATA[") {
                self.pos += "<![CDATA[".len();
                let data = self.take_until("]]>")?;
                element.text.push_str(data);
            } else if rest.starts_with("<?") {
                self.take_until("?>")?;
            } else if rest.starts_with('<') {
                let child = self.element(&scope, depth + 1)?;
                element.children.push(child);
            } else {
                let end = rest.find('<').unwrap_or(rest.len());
                element.text.push_str(&decode_entities(&rest[..end])?);
                self.pos += end;
            }
        }
    }
}
