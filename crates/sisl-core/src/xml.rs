//! XML codecs — the typed shape, the generic shape, and mode routing.
//!
//! Both codecs work against a minimal DOM (name, attributes, children,
//! text) loaded from a `quick-xml` event stream, so the underlying parser
//! stays interchangeable. Comments, DOCTYPE and non-declaration processing
//! instructions are dropped; CDATA folds into plain text; whitespace-only
//! text counts as absent.
//!
//! **Typed** XML mirrors the document model one-to-one: a `<root>` element
//! whose descendants each carry a `type` attribute naming a SISL tag, with
//! scalar payloads as element text and list children named `item`.
//!
//! **Generic** XML represents arbitrary XML as a document using `_tag`,
//! `_attrs`, `_text` and `_children` per element, plus a top-level `_decl`
//! and `_root`. Known limits: mixed-content text is lost once an element
//! has child elements, and attribute names containing `:` produce SISL
//! that no longer parses (`:` is SISL's structural separator) — this is
//! deliberate and left as-is.

use quick_xml::events::{BytesDecl, BytesStart, Event};
use quick_xml::Reader;

use crate::encoder;
use crate::error::{Result, SislError};
use crate::value::{Map, Tag, Value};

/// One XML element: the four accessors the codecs consume.
#[derive(Debug, Clone, Default)]
pub struct XmlElement {
    pub name: String,
    pub attrs: Vec<(String, String)>,
    pub children: Vec<XmlElement>,
    pub text: String,
}

impl XmlElement {
    fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Accumulated character data; whitespace-only content counts as absent.
    fn text_content(&self) -> &str {
        if self.text.trim().is_empty() {
            ""
        } else {
            &self.text
        }
    }
}

/// A parsed XML document: optional declaration attributes plus the root.
#[derive(Debug, Clone)]
pub struct XmlDocument {
    pub decl: Option<Vec<(String, String)>>,
    pub root: XmlElement,
}

// ---------------------------------------------------------------------------
// DOM loading
// ---------------------------------------------------------------------------

/// Load XML text into the DOM.
pub fn parse_xml(input: &str) -> Result<XmlDocument> {
    let mut reader = Reader::from_str(input);
    let mut decl: Option<Vec<(String, String)>> = None;
    let mut root: Option<XmlElement> = None;
    let mut stack: Vec<XmlElement> = Vec::new();

    loop {
        match reader.read_event() {
            Err(err) => return Err(SislError::XmlParse(err.to_string())),
            Ok(Event::Eof) => break,
            Ok(Event::Decl(d)) => decl = Some(decl_attrs(&d)?),
            Ok(Event::Start(start)) => stack.push(element_from_start(&start)?),
            Ok(Event::Empty(start)) => {
                let element = element_from_start(&start)?;
                close_element(element, &mut stack, &mut root)?;
            }
            Ok(Event::End(_)) => {
                let Some(element) = stack.pop() else {
                    return Err(SislError::XmlParse("unmatched closing tag".to_string()));
                };
                close_element(element, &mut stack, &mut root)?;
            }
            Ok(Event::Text(text)) => {
                if let Some(parent) = stack.last_mut() {
                    let text = text
                        .unescape()
                        .map_err(|err| SislError::XmlParse(err.to_string()))?;
                    parent.text.push_str(&text);
                }
            }
            Ok(Event::CData(cdata)) => {
                if let Some(parent) = stack.last_mut() {
                    parent.text.push_str(utf8(&cdata)?.as_str());
                }
            }
            // Comments, DOCTYPE and processing instructions are dropped.
            Ok(_) => {}
        }
    }

    if !stack.is_empty() {
        return Err(SislError::XmlParse(
            "unexpected end of input inside element".to_string(),
        ));
    }
    let Some(root) = root else {
        return Err(SislError::XmlParse("no root element".to_string()));
    };
    Ok(XmlDocument { decl, root })
}

fn close_element(
    element: XmlElement,
    stack: &mut Vec<XmlElement>,
    root: &mut Option<XmlElement>,
) -> Result<()> {
    match stack.last_mut() {
        Some(parent) => parent.children.push(element),
        None => {
            if root.is_some() {
                return Err(SislError::XmlParse("multiple root elements".to_string()));
            }
            *root = Some(element);
        }
    }
    Ok(())
}

fn element_from_start(start: &BytesStart<'_>) -> Result<XmlElement> {
    let name = utf8(start.name().as_ref())?;
    let mut attrs = Vec::new();
    for attr in start.attributes() {
        let attr = attr.map_err(|err| SislError::XmlParse(err.to_string()))?;
        let key = utf8(attr.key.as_ref())?;
        let value = attr
            .unescape_value()
            .map_err(|err| SislError::XmlParse(err.to_string()))?
            .into_owned();
        attrs.push((key, value));
    }
    Ok(XmlElement {
        name,
        attrs,
        children: Vec::new(),
        text: String::new(),
    })
}

fn decl_attrs(decl: &BytesDecl<'_>) -> Result<Vec<(String, String)>> {
    let mut attrs = Vec::new();
    let version = decl
        .version()
        .map_err(|err| SislError::XmlParse(err.to_string()))?;
    attrs.push(("version".to_string(), utf8(&version)?));
    if let Some(encoding) = decl.encoding() {
        let encoding = encoding.map_err(|err| SislError::XmlParse(err.to_string()))?;
        attrs.push(("encoding".to_string(), utf8(&encoding)?));
    }
    if let Some(standalone) = decl.standalone() {
        let standalone = standalone.map_err(|err| SislError::XmlParse(err.to_string()))?;
        attrs.push(("standalone".to_string(), utf8(&standalone)?));
    }
    Ok(attrs)
}

fn utf8(bytes: &[u8]) -> Result<String> {
    String::from_utf8(bytes.to_vec())
        .map_err(|err| SislError::XmlParse(format!("invalid UTF-8 in XML: {err}")))
}

// ---------------------------------------------------------------------------
// Mode routing
// ---------------------------------------------------------------------------

/// Typed iff the document element is `<root>` and every direct child
/// carries a `type` attribute naming a SISL tag. An empty `<root>` is
/// typed.
pub fn is_typed_xml(doc: &XmlDocument) -> bool {
    doc.root.name == "root"
        && doc.root.children.iter().all(|child| {
            child
                .attr("type")
                .is_some_and(|name| Tag::from_name(name).is_some())
        })
}

/// Generic iff the document has a top-level `_root` key.
pub fn is_generic_document(value: &Value) -> bool {
    matches!(value, Value::Obj(map) if map.contains_key("_root"))
}

/// Parse XML text into a document, auto-selecting typed vs generic.
pub fn xml_to_document(input: &str) -> Result<Value> {
    let doc = parse_xml(input)?;
    if is_typed_xml(&doc) {
        from_typed_xml(&doc)
    } else {
        Ok(from_generic_xml(&doc))
    }
}

/// Render a document as XML text, auto-selecting typed vs generic.
pub fn document_to_xml(value: &Value) -> Result<String> {
    if is_generic_document(value) {
        to_generic_xml(value)
    } else {
        to_typed_xml(value)
    }
}

// ---------------------------------------------------------------------------
// Typed codec
// ---------------------------------------------------------------------------

/// Render a document as typed XML.
pub fn to_typed_xml(value: &Value) -> Result<String> {
    let Value::Obj(map) = value else {
        return Err(SislError::Encode(
            "top-level document must be an object".to_string(),
        ));
    };
    let mut out = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    if map.is_empty() {
        out.push_str("<root/>\n");
    } else {
        out.push_str("<root>\n");
        for (key, child) in map {
            write_typed_element(key, child, 1, &mut out)?;
        }
        out.push_str("</root>\n");
    }
    Ok(out)
}

fn write_typed_element(name: &str, value: &Value, depth: usize, out: &mut String) -> Result<()> {
    if !is_valid_xml_name(name) {
        return Err(SislError::XmlTyped(format!(
            "invalid XML element name: '{name}'"
        )));
    }
    let indent = "  ".repeat(depth);
    match value {
        Value::Obj(map) => {
            if map.is_empty() {
                out.push_str(&format!("{indent}<{name} type=\"obj\"/>\n"));
            } else {
                out.push_str(&format!("{indent}<{name} type=\"obj\">\n"));
                for (key, child) in map {
                    write_typed_element(key, child, depth + 1, out)?;
                }
                out.push_str(&format!("{indent}</{name}>\n"));
            }
        }
        Value::List(items) => {
            if items.is_empty() {
                out.push_str(&format!("{indent}<{name} type=\"list\"/>\n"));
            } else {
                out.push_str(&format!("{indent}<{name} type=\"list\">\n"));
                for item in items {
                    write_typed_element("item", item, depth + 1, out)?;
                }
                out.push_str(&format!("{indent}</{name}>\n"));
            }
        }
        Value::Null => out.push_str(&format!("{indent}<{name} type=\"null\"/>\n")),
        scalar => {
            let tag = scalar.tag().as_str();
            let text = xml_escape(&typed_scalar_text(scalar)?);
            out.push_str(&format!(
                "{indent}<{name} type=\"{tag}\">{text}</{name}>\n"
            ));
        }
    }
    Ok(())
}

fn typed_scalar_text(value: &Value) -> Result<String> {
    match value {
        Value::Bool(b) => Ok(if *b { "true" } else { "false" }.to_string()),
        Value::Int(n) => Ok(n.to_string()),
        Value::Float(f) => encoder::format_float(*f),
        Value::Str(s) => Ok(s.clone()),
        Value::Null | Value::List(_) | Value::Obj(_) => Err(SislError::Encode(
            "scalar payload requested for a non-scalar value".to_string(),
        )),
    }
}

/// Decode typed XML into a document (the flat object under `<root>`).
pub fn from_typed_xml(doc: &XmlDocument) -> Result<Value> {
    if doc.root.name != "root" {
        return Err(SislError::XmlTyped(
            "typed XML document element must be <root>".to_string(),
        ));
    }
    let mut map = Map::new();
    for child in &doc.root.children {
        map.insert(child.name.clone(), decode_typed_element(child)?);
    }
    Ok(Value::Obj(map))
}

fn decode_typed_element(element: &XmlElement) -> Result<Value> {
    let Some(type_name) = element.attr("type") else {
        return Err(SislError::XmlTyped(format!(
            "missing type attribute on element <{}>",
            element.name
        )));
    };
    let Some(tag) = Tag::from_name(type_name) else {
        return Err(SislError::XmlTyped(format!(
            "unknown type '{type_name}' on element <{}>",
            element.name
        )));
    };

    let text = element.text_content();
    match tag {
        Tag::Null => Ok(Value::Null),
        Tag::Str => Ok(Value::Str(text.to_string())),
        Tag::Bool => match text {
            "true" => Ok(Value::Bool(true)),
            "false" => Ok(Value::Bool(false)),
            _ => Err(SislError::XmlTyped(format!(
                "bool payload must be \"true\" or \"false\", got \"{text}\""
            ))),
        },
        Tag::Int => text
            .parse::<i64>()
            .map(Value::Int)
            .map_err(|_| SislError::XmlTyped(format!("invalid int payload: \"{text}\""))),
        Tag::Float => match text.parse::<f64>() {
            Ok(f) if f.is_finite() => Ok(Value::Float(f)),
            _ => Err(SislError::XmlTyped(format!(
                "invalid float payload: \"{text}\""
            ))),
        },
        Tag::List => {
            let items = element
                .children
                .iter()
                .map(decode_typed_element)
                .collect::<Result<Vec<_>>>()?;
            Ok(Value::List(items))
        }
        Tag::Obj => {
            let mut map = Map::new();
            for child in &element.children {
                map.insert(child.name.clone(), decode_typed_element(child)?);
            }
            Ok(Value::Obj(map))
        }
    }
}

// ---------------------------------------------------------------------------
// Generic codec
// ---------------------------------------------------------------------------

/// Represent arbitrary XML as a document (`_decl` + `_root`).
pub fn from_generic_xml(doc: &XmlDocument) -> Value {
    let mut map = Map::new();
    if let Some(decl) = &doc.decl {
        let mut decl_map = Map::new();
        for (key, value) in decl {
            decl_map.insert(key.clone(), Value::Str(value.clone()));
        }
        map.insert("_decl".to_string(), Value::Obj(decl_map));
    }
    map.insert("_root".to_string(), generic_element(&doc.root));
    Value::Obj(map)
}

fn generic_element(element: &XmlElement) -> Value {
    let mut map = Map::new();
    map.insert("_tag".to_string(), Value::Str(element.name.clone()));
    if !element.attrs.is_empty() {
        let mut attrs = Map::new();
        for (key, value) in &element.attrs {
            attrs.insert(key.clone(), Value::Str(value.clone()));
        }
        map.insert("_attrs".to_string(), Value::Obj(attrs));
    }
    if !element.children.is_empty() {
        map.insert(
            "_children".to_string(),
            Value::List(element.children.iter().map(generic_element).collect()),
        );
    } else {
        let text = element.text_content();
        if !text.is_empty() {
            map.insert("_text".to_string(), Value::Str(text.to_string()));
        }
    }
    Value::Obj(map)
}

/// Render a generic-representation document back to XML text.
pub fn to_generic_xml(value: &Value) -> Result<String> {
    let Value::Obj(map) = value else {
        return Err(SislError::Encode(
            "top-level document must be an object".to_string(),
        ));
    };
    let mut out = String::new();
    if let Some(decl) = map.get("_decl") {
        let Value::Obj(attrs) = decl else {
            return Err(SislError::Encode("_decl must be an object".to_string()));
        };
        out.push_str("<?xml");
        for (key, value) in attrs {
            let Value::Str(text) = value else {
                return Err(SislError::Encode(
                    "_decl attribute values must be strings".to_string(),
                ));
            };
            out.push_str(&format!(" {key}=\"{}\"", xml_escape(text)));
        }
        out.push_str("?>\n");
    }
    let Some(root) = map.get("_root") else {
        return Err(SislError::Encode(
            "generic XML document requires a _root element".to_string(),
        ));
    };
    write_generic_element(root, 0, &mut out)?;
    Ok(out)
}

fn write_generic_element(value: &Value, depth: usize, out: &mut String) -> Result<()> {
    let Value::Obj(map) = value else {
        return Err(SislError::Encode(
            "generic XML element must be an object".to_string(),
        ));
    };
    let Some(Value::Str(tag)) = map.get("_tag") else {
        return Err(SislError::Encode(
            "generic XML element requires a string _tag".to_string(),
        ));
    };

    let indent = "\t".repeat(depth);
    out.push_str(&indent);
    out.push('<');
    out.push_str(tag);

    if let Some(attrs) = map.get("_attrs") {
        let Value::Obj(attrs) = attrs else {
            return Err(SislError::Encode("_attrs must be an object".to_string()));
        };
        for (key, value) in attrs {
            let Value::Str(text) = value else {
                return Err(SislError::Encode(
                    "_attrs values must be strings".to_string(),
                ));
            };
            out.push_str(&format!(" {key}=\"{}\"", xml_escape(text)));
        }
    }

    let children = match map.get("_children") {
        Some(Value::List(children)) => children.as_slice(),
        None => &[],
        Some(_) => {
            return Err(SislError::Encode("_children must be a list".to_string()));
        }
    };

    if !children.is_empty() {
        out.push_str(">\n");
        for child in children {
            write_generic_element(child, depth + 1, out)?;
        }
        out.push_str(&format!("{indent}</{tag}>\n"));
    } else {
        match map.get("_text") {
            Some(Value::Str(text)) => {
                out.push('>');
                out.push_str(&xml_escape(text));
                out.push_str(&format!("</{tag}>\n"));
            }
            Some(_) => return Err(SislError::Encode("_text must be a string".to_string())),
            None => out.push_str(" />\n"),
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

fn xml_escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

/// XML names: start letter or underscore, continue letter/digit/`-`/`_`/`.`.
fn is_valid_xml_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
}
