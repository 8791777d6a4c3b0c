//! Namespace-aware element tree and path lookups over a parsed document.

use quick_xml::encoding::Decoder;
use quick_xml::events::{BytesStart, Event};
use quick_xml::name::{Namespace, ResolveResult};
use quick_xml::reader::NsReader;
use rust_decimal::Decimal;

use crate::core::CamtError;

/// Deepest element nesting accepted; real statements stay far below this.
pub const MAX_DEPTH: usize = 256;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// An owned XML element with its resolved namespace.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    namespace: Option<String>,
    name: String,
    attributes: Vec<(String, String)>,
    text: String,
    children: Vec<Element>,
}

impl Element {
    /// Local name, without prefix.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    /// Attribute value by local name.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Direct character content, untrimmed.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn children(&self) -> &[Element] {
        &self.children
    }
}

/// A parsed statement document and the namespace all lookups are qualified with.
#[derive(Debug, Clone)]
pub struct Document {
    source: String,
    namespace: String,
    root: Element,
}

impl Document {
    /// Parse `xml`; `source` names the document in errors and rows.
    ///
    /// The text is already decoded, so an `encoding` in the XML declaration
    /// is ignored.
    pub fn parse(xml: &str, source: impl Into<String>) -> Result<Self, CamtError> {
        let xml = xml.strip_prefix('\u{feff}').unwrap_or(xml);
        Self::from_reader(NsReader::from_str(xml), source.into())
    }

    /// Parse raw file content, decoding it as the XML declaration says
    /// (UTF-8 when it says nothing).
    ///
    /// Only byte sequences invalid in that encoding are errors.
    pub fn from_bytes(bytes: &[u8], source: impl Into<String>) -> Result<Self, CamtError> {
        let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
        Self::from_reader(NsReader::from_reader(bytes), source.into())
    }

    fn from_reader(reader: NsReader<&[u8]>, source: String) -> Result<Self, CamtError> {
        let root = build_tree(reader, &source)?;

        let namespace = match root.namespace.as_deref() {
            Some(ns) if !ns.is_empty() => ns.to_string(),
            _ => {
                return Err(CamtError::MissingNamespace {
                    file: source,
                    root: root.name,
                });
            }
        };

        Ok(Self {
            source,
            namespace,
            root,
        })
    }

    /// Basename of the file the document was read from.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Namespace URI declared by the root element.
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn root(&self) -> &Element {
        &self.root
    }

    fn is(&self, el: &Element, name: &str) -> bool {
        el.name == name && el.namespace.as_deref() == Some(self.namespace.as_str())
    }

    /// First element below `ctx` matching a slash-separated path of local names.
    ///
    /// Every branch matching a segment is searched in document order, so a
    /// first `Dbtr` without `Nm` does not hide a later `Dbtr/Nm`.
    pub fn find<'a>(&self, ctx: &'a Element, path: &str) -> Option<&'a Element> {
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        self.find_segments(ctx, &segments)
    }

    fn find_segments<'a>(&self, ctx: &'a Element, segments: &[&str]) -> Option<&'a Element> {
        let Some((first, rest)) = segments.split_first() else {
            return Some(ctx);
        };
        ctx.children
            .iter()
            .filter(|c| self.is(c, first))
            .find_map(|c| self.find_segments(c, rest))
    }

    /// All descendants of `ctx` named `name`, in document order (`ctx` excluded).
    pub fn find_descendants<'a>(&self, ctx: &'a Element, name: &str) -> Vec<&'a Element> {
        let mut found = Vec::new();
        self.collect_descendants(ctx, name, &mut found);
        found
    }

    fn collect_descendants<'a>(&self, ctx: &'a Element, name: &str, out: &mut Vec<&'a Element>) {
        for child in &ctx.children {
            if self.is(child, name) {
                out.push(child);
            }
            self.collect_descendants(child, name, out);
        }
    }

    /// First descendant of `ctx` named `name`.
    pub fn find_descendant<'a>(&self, ctx: &'a Element, name: &str) -> Option<&'a Element> {
        ctx.children.iter().find_map(|child| {
            if self.is(child, name) {
                Some(child)
            } else {
                self.find_descendant(child, name)
            }
        })
    }

    /// Trimmed text at `path`; empty text counts as absent.
    pub fn text(&self, ctx: &Element, path: &str) -> Option<String> {
        self.find(ctx, path).and_then(|el| non_empty(el.text()))
    }

    /// Trimmed text at the first of several alternative paths that has any.
    pub fn text_any(&self, ctx: &Element, paths: &[&str]) -> Option<String> {
        paths.iter().find_map(|p| self.text(ctx, p))
    }

    /// Numeric value at `path`, failing the document on non-numeric text.
    pub fn decimal(
        &self,
        ctx: &Element,
        path: &str,
        field: &'static str,
    ) -> Result<Option<Decimal>, CamtError> {
        match self.text(ctx, path) {
            Some(raw) => self.parse_decimal(&raw, field).map(Some),
            None => Ok(None),
        }
    }

    /// Parse numeric text without rounding.
    ///
    /// Well-formed numbers that `Decimal` cannot hold exactly (too large, or
    /// more than 28 fractional digits) are reported as out of range.
    pub fn parse_decimal(&self, raw: &str, field: &'static str) -> Result<Decimal, CamtError> {
        let parsed = Decimal::from_str_exact(raw).or_else(|e| match raw.split_once(['e', 'E']) {
            // The mantissa must fit exactly before the exponent is applied.
            Some((mantissa, _)) => {
                Decimal::from_str_exact(mantissa).and_then(|_| Decimal::from_scientific(raw))
            }
            None => Err(e),
        });

        parsed.map_err(|_| {
            let file = self.source.clone();
            let value = raw.to_string();
            if is_numeric_literal(raw) {
                CamtError::NumberOutOfRange { file, field, value }
            } else {
                CamtError::InvalidNumber { file, field, value }
            }
        })
    }
}

/// `[+-]digits[.digits][(e|E)[+-]digits]`, with at least one mantissa digit.
fn is_numeric_literal(raw: &str) -> bool {
    let body = raw.strip_prefix(['+', '-']).unwrap_or(raw);
    let (mantissa, exponent) = match body.split_once(['e', 'E']) {
        Some((m, e)) => (m, Some(e)),
        None => (body, None),
    };

    let (int, frac) = mantissa.split_once('.').unwrap_or((mantissa, ""));
    let digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    let mantissa_ok = digits(int) && digits(frac) && !(int.is_empty() && frac.is_empty());

    let exponent_ok = match exponent {
        Some(e) => {
            let e = e.strip_prefix(['+', '-']).unwrap_or(e);
            !e.is_empty() && digits(e)
        }
        None => true,
    };
    mantissa_ok && exponent_ok
}

pub(crate) fn non_empty(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn malformed(source: &str, message: impl Into<String>) -> CamtError {
    CamtError::MalformedDocument {
        file: source.to_string(),
        message: message.into(),
    }
}

fn build_tree(mut reader: NsReader<&[u8]>, source: &str) -> Result<Element, CamtError> {
    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        // The declaration, read first, fixes the encoding for every later event.
        let decoder = reader.decoder();
        match reader.read_resolved_event() {
            Ok((ns, Event::Start(ref e))) => {
                if stack.len() >= MAX_DEPTH {
                    return Err(malformed(
                        source,
                        format!("elements nested deeper than {MAX_DEPTH} levels"),
                    ));
                }
                stack.push(open_element(e, ns, decoder, source)?);
            }
            Ok((ns, Event::Empty(ref e))) => {
                let el = open_element(e, ns, decoder, source)?;
                close_element(el, &mut stack, &mut root, source)?;
            }
            Ok((_, Event::End(_))) => {
                let el = stack
                    .pop()
                    .ok_or_else(|| malformed(source, "unexpected closing tag"))?;
                close_element(el, &mut stack, &mut root, source)?;
            }
            Ok((_, Event::Text(ref e))) => {
                if let Some(current) = stack.last_mut() {
                    let text = e
                        .unescape()
                        .map_err(|err| malformed(source, err.to_string()))?;
                    current.text.push_str(&text);
                }
            }
            Ok((_, Event::CData(ref e))) => {
                if let Some(current) = stack.last_mut() {
                    let text = decoder
                        .decode(e)
                        .map_err(|err| malformed(source, err.to_string()))?;
                    current.text.push_str(&text);
                }
            }
            Ok((_, Event::Eof)) => break,
            Ok(_) => {}
            Err(e) => return Err(malformed(source, e.to_string())),
        }
    }

    if let Some(open) = stack.last() {
        return Err(malformed(source, format!("unclosed element <{}>", open.name)));
    }
    root.ok_or_else(|| malformed(source, "no root element"))
}

fn open_element(
    e: &BytesStart<'_>,
    ns: ResolveResult<'_>,
    decoder: Decoder,
    source: &str,
) -> Result<Element, CamtError> {
    let decode = |raw: &[u8]| {
        decoder
            .decode(raw)
            .map(|s| s.into_owned())
            .map_err(|err| malformed(source, err.to_string()))
    };

    let namespace = match ns {
        ResolveResult::Bound(Namespace(uri)) => Some(decode(uri)?),
        _ => None,
    };

    let mut attributes = Vec::new();
    for attr in e.attributes() {
        let attr = attr.map_err(|err| malformed(source, err.to_string()))?;
        let key = attr.key.as_ref();
        if key == b"xmlns" || key.starts_with(b"xmlns:") {
            continue;
        }
        let name = decode(attr.key.local_name().as_ref())?;
        let value = attr
            .decode_and_unescape_value(decoder)
            .map_err(|err| malformed(source, err.to_string()))?
            .into_owned();
        attributes.push((name, value));
    }

    Ok(Element {
        namespace,
        name: decode(e.local_name().as_ref())?,
        attributes,
        text: String::new(),
        children: Vec::new(),
    })
}

fn close_element(
    el: Element,
    stack: &mut [Element],
    root: &mut Option<Element>,
    source: &str,
) -> Result<(), CamtError> {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(el);
        Ok(())
    } else if root.is_none() {
        *root = Some(el);
        Ok(())
    } else {
        Err(malformed(source, format!("second root element <{}>", el.name)))
    }
}
