//! Streaming TS reader built on `quick-xml` events.

use quick_xml::Reader;
use quick_xml::events::{
    BytesStart,
    Event,
};

use super::error::ParseError;
use super::model::{
    Context,
    Extra,
    Location,
    Message,
    NumerusForm,
    Translation,
    TranslationBody,
    TranslationStatus,
    TsDocument,
};

/// Parse a TS document from its XML text.
///
/// # Examples
/// ```
/// use ts_catalog::ts::parse_document;
///
/// let document = parse_document(
///     r#"<?xml version="1.0" encoding="utf-8"?>
/// <!DOCTYPE TS>
/// <TS version="2.1" language="ko">
/// <context>
///     <name>UIMessageCenter</name>
///     <message>
///         <source>Cancel</source>
///         <translation>취소</translation>
///     </message>
/// </context>
/// </TS>"#,
/// )
/// .unwrap();
///
/// assert_eq!(document.language.as_deref(), Some("ko"));
/// assert_eq!(document.contexts[0].messages[0].source, "Cancel");
/// ```
///
/// # Errors
/// Returns `ParseError` for malformed XML, a non-`TS` root, a context
/// without `<name>`, a message without `<source>` or an invalid attribute.
pub fn parse_document(text: &str) -> Result<TsDocument, ParseError> {
    TsReader::new(text).read_document()
}

/// Element name as an owned string, for logs.
fn element_name(start: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(start.name().as_ref()).into_owned()
}

/// Reader state: the underlying event source.
struct TsReader<'a> {
    /// Event source over the borrowed document text.
    reader: Reader<&'a [u8]>,
}

impl<'a> TsReader<'a> {
    /// Reader over `text` that keeps whitespace.
    fn new(text: &'a str) -> Self {
        let mut reader = Reader::from_str(text);
        // Source and translation text is significant, including whitespace.
        reader.config_mut().trim_text(false);
        Self { reader }
    }

    /// Current byte offset in the document.
    fn position(&self) -> u64 {
        u64::try_from(self.reader.buffer_position()).unwrap_or(u64::MAX)
    }

    /// `ParseError::Xml` at the current position.
    fn xml_error(&self, message: impl Into<String>) -> ParseError {
        ParseError::Xml { position: self.position(), message: message.into() }
    }

    /// Next event, with XML errors mapped to `ParseError`.
    fn next_event(&mut self) -> Result<Event<'a>, ParseError> {
        match self.reader.read_event() {
            Ok(event) => Ok(event),
            Err(e) => Err(self.xml_error(e.to_string())),
        }
    }

    /// Look up an attribute value, unescaped.
    fn attribute(
        &self,
        start: &BytesStart<'_>,
        name: &[u8],
    ) -> Result<Option<String>, ParseError> {
        for attr in start.attributes() {
            let attr = attr.map_err(|e| self.xml_error(e.to_string()))?;
            if attr.key.as_ref() == name {
                let value = attr.unescape_value().map_err(|e| self.xml_error(e.to_string()))?;
                return Ok(Some(value.into_owned()));
            }
        }
        Ok(None)
    }

    /// Read a `yes`/`no` attribute. lupdate also accepts `true`/`false`.
    fn flag_attribute(
        &self,
        start: &BytesStart<'_>,
        element: &'static str,
        attribute: &'static str,
    ) -> Result<bool, ParseError> {
        match self.attribute(start, attribute.as_bytes())?.as_deref() {
            None | Some("no" | "false") => Ok(false),
            Some("yes" | "true") => Ok(true),
            Some(value) => Err(ParseError::InvalidAttribute {
                element,
                attribute,
                value: value.to_string(),
            }),
        }
    }

    /// Read up to the `<TS>` root, then the whole document.
    fn read_document(mut self) -> Result<TsDocument, ParseError> {
        loop {
            match self.next_event()? {
                Event::Start(start) => {
                    let mut document = self.read_root_attributes(&start)?;
                    self.read_root_children(&mut document)?;
                    return Ok(document);
                }
                Event::Empty(start) => return self.read_root_attributes(&start),
                Event::Eof => return Err(ParseError::MissingRoot),
                // Declaration, DOCTYPE, comments and processing instructions.
                _ => {}
            }
        }
    }

    /// Header attributes of `<TS>`.
    fn read_root_attributes(&self, start: &BytesStart<'_>) -> Result<TsDocument, ParseError> {
        if start.name().as_ref() != b"TS" {
            return Err(ParseError::UnexpectedRoot(element_name(start)));
        }
        Ok(TsDocument {
            version: self.attribute(start, b"version")?,
            language: self.attribute(start, b"language")?,
            source_language: self.attribute(start, b"sourcelanguage")?,
            ..TsDocument::default()
        })
    }

    /// Contexts, dependencies and extras up to `</TS>`.
    fn read_root_children(&mut self, document: &mut TsDocument) -> Result<(), ParseError> {
        loop {
            match self.next_event()? {
                Event::Start(start) => match start.name().as_ref() {
                    b"context" => document.contexts.push(self.read_context()?),
                    b"dependencies" => document.dependencies = self.read_dependencies()?,
                    name if name.starts_with(b"extra-") => {
                        let name = element_name(&start);
                        let content = self.read_text()?;
                        document.extras.push(Extra { name, content });
                    }
                    _ => self.skip_element(&start)?,
                },
                Event::Empty(start) => {
                    if start.name().as_ref() == b"context" {
                        return Err(ParseError::MissingElement {
                            parent: "context",
                            element: "name",
                            position: self.position(),
                        });
                    }
                    tracing::debug!("Ignoring empty <{}> in <TS>", element_name(&start));
                }
                Event::End(_) => return Ok(()),
                Event::Eof => return Err(self.xml_error("unexpected end of document inside <TS>")),
                _ => {}
            }
        }
    }

    /// Catalogs listed in `<dependencies>`.
    fn read_dependencies(&mut self) -> Result<Vec<String>, ParseError> {
        let mut catalogs = Vec::new();
        loop {
            match self.next_event()? {
                Event::Empty(start) if start.name().as_ref() == b"dependency" => {
                    if let Some(catalog) = self.attribute(&start, b"catalog")? {
                        catalogs.push(catalog);
                    }
                }
                Event::Start(start) => {
                    if start.name().as_ref() == b"dependency"
                        && let Some(catalog) = self.attribute(&start, b"catalog")?
                    {
                        catalogs.push(catalog);
                    }
                    self.skip_element(&start)?;
                }
                Event::End(_) => return Ok(catalogs),
                Event::Eof => {
                    return Err(self.xml_error("unexpected end of document inside <dependencies>"));
                }
                _ => {}
            }
        }
    }

    /// A `<context>`; its `<name>` is required.
    fn read_context(&mut self) -> Result<Context, ParseError> {
        let position = self.position();
        let mut name = None;
        let mut context = Context::default();
        loop {
            match self.next_event()? {
                Event::Start(start) => match start.name().as_ref() {
                    b"name" => name = Some(self.read_text()?),
                    b"comment" => context.comment = Some(self.read_text()?),
                    b"message" => context.messages.push(self.read_message(&start, false)?),
                    _ => self.skip_element(&start)?,
                },
                Event::Empty(start) => match start.name().as_ref() {
                    b"name" => name = Some(String::new()),
                    b"comment" => context.comment = Some(String::new()),
                    b"message" => context.messages.push(self.read_message(&start, true)?),
                    _ => {}
                },
                Event::End(_) => break,
                Event::Eof => {
                    return Err(self.xml_error("unexpected end of document inside <context>"));
                }
                _ => {}
            }
        }
        context.name =
            name.ok_or(ParseError::MissingElement { parent: "context", element: "name", position })?;
        Ok(context)
    }

    /// A `<message>`; its `<source>` is required.
    fn read_message(&mut self, start: &BytesStart<'_>, empty: bool) -> Result<Message, ParseError> {
        let position = self.position();
        let missing_source =
            ParseError::MissingElement { parent: "message", element: "source", position };
        if empty {
            return Err(missing_source);
        }

        let mut message = Message {
            id: self.attribute(start, b"id")?,
            numerus: self.flag_attribute(start, "message", "numerus")?,
            ..Message::default()
        };
        let mut source = None;
        loop {
            match self.next_event()? {
                Event::Start(child) => match child.name().as_ref() {
                    b"source" => source = Some(self.read_text()?),
                    b"oldsource" => message.old_source = Some(self.read_text()?),
                    b"comment" => message.comment = Some(self.read_text()?),
                    b"oldcomment" => message.old_comment = Some(self.read_text()?),
                    b"extracomment" => message.extra_comment = Some(self.read_text()?),
                    b"translatorcomment" => message.translator_comment = Some(self.read_text()?),
                    b"translation" => message.translation = Some(self.read_translation(&child)?),
                    b"location" => {
                        message.locations.push(self.read_location(&child)?);
                        self.skip_element(&child)?;
                    }
                    name if name.starts_with(b"extra-") => {
                        let name = element_name(&child);
                        let content = self.read_text()?;
                        message.extras.push(Extra { name, content });
                    }
                    _ => self.skip_element(&child)?,
                },
                Event::Empty(child) => match child.name().as_ref() {
                    b"location" => message.locations.push(self.read_location(&child)?),
                    b"source" => source = Some(String::new()),
                    b"comment" => message.comment = Some(String::new()),
                    b"translation" => {
                        message.translation = Some(Translation {
                            status: self.read_status(&child)?,
                            body: TranslationBody::Text(String::new()),
                        });
                    }
                    _ => tracing::debug!("Ignoring empty <{}> in <message>", element_name(&child)),
                },
                Event::End(_) => break,
                Event::Eof => {
                    return Err(self.xml_error("unexpected end of document inside <message>"));
                }
                _ => {}
            }
        }
        message.source = source.ok_or(missing_source)?;
        Ok(message)
    }

    /// `<location>` attributes.
    fn read_location(&self, start: &BytesStart<'_>) -> Result<Location, ParseError> {
        Ok(Location {
            filename: self.attribute(start, b"filename")?,
            line: self.attribute(start, b"line")?,
        })
    }

    /// The `type` attribute of `<translation>`.
    fn read_status(&self, start: &BytesStart<'_>) -> Result<TranslationStatus, ParseError> {
        self.attribute(start, b"type")?.map_or(Ok(TranslationStatus::Finished), |value| {
            value.parse().map_err(|value| ParseError::InvalidAttribute {
                element: "translation",
                attribute: "type",
                value,
            })
        })
    }

    /// A `<translation>` with its plain text, plural forms or length variants.
    fn read_translation(&mut self, start: &BytesStart<'_>) -> Result<Translation, ParseError> {
        let status = self.read_status(start)?;
        // `variants` only tells lupdate to expect <lengthvariant>; the children decide.
        self.flag_attribute(start, "translation", "variants")?;

        let mut text = String::new();
        let mut forms = Vec::new();
        let mut variants = Vec::new();
        loop {
            match self.next_event()? {
                Event::Text(t) => {
                    text.push_str(&t.unescape().map_err(|e| self.xml_error(e.to_string()))?);
                }
                Event::CData(cdata) => text.push_str(&String::from_utf8_lossy(&cdata)),
                Event::Start(child) => match child.name().as_ref() {
                    b"numerusform" => forms.push(self.read_numerus_form(&child)?),
                    b"lengthvariant" => variants.push(self.read_text()?),
                    _ => self.skip_element(&child)?,
                },
                Event::Empty(child) => match child.name().as_ref() {
                    b"numerusform" => forms.push(NumerusForm::Text(String::new())),
                    b"lengthvariant" => variants.push(String::new()),
                    b"byte" => text.extend(self.read_byte(&child)?),
                    _ => {}
                },
                Event::End(_) => break,
                Event::Eof => {
                    return Err(self.xml_error("unexpected end of document inside <translation>"));
                }
                _ => {}
            }
        }

        // Whitespace between <numerusform> children is indentation, not content.
        let body = if !forms.is_empty() {
            TranslationBody::NumerusForms(forms)
        } else if !variants.is_empty() {
            TranslationBody::LengthVariants(variants)
        } else {
            TranslationBody::Text(text)
        };
        Ok(Translation { status, body })
    }

    /// A `<numerusform>`, possibly holding `<lengthvariant>` children.
    fn read_numerus_form(&mut self, start: &BytesStart<'_>) -> Result<NumerusForm, ParseError> {
        self.flag_attribute(start, "numerusform", "variants")?;

        let mut text = String::new();
        let mut variants = Vec::new();
        loop {
            match self.next_event()? {
                Event::Text(t) => {
                    text.push_str(&t.unescape().map_err(|e| self.xml_error(e.to_string()))?);
                }
                Event::CData(cdata) => text.push_str(&String::from_utf8_lossy(&cdata)),
                Event::Start(child) => {
                    if child.name().as_ref() == b"lengthvariant" {
                        variants.push(self.read_text()?);
                    } else {
                        self.skip_element(&child)?;
                    }
                }
                Event::Empty(child) => match child.name().as_ref() {
                    b"byte" => text.extend(self.read_byte(&child)?),
                    b"lengthvariant" => variants.push(String::new()),
                    _ => {}
                },
                Event::End(_) => break,
                Event::Eof => {
                    return Err(self.xml_error("unexpected end of document inside <numerusform>"));
                }
                _ => {}
            }
        }

        // Text between <lengthvariant> children is indentation.
        if variants.is_empty() {
            Ok(NumerusForm::Text(text))
        } else {
            Ok(NumerusForm::LengthVariants(variants))
        }
    }

    /// Read the text content of the element just opened, up to its end tag.
    fn read_text(&mut self) -> Result<String, ParseError> {
        let mut text = String::new();
        let mut depth = 0_usize;
        loop {
            match self.next_event()? {
                Event::Text(t) => {
                    text.push_str(&t.unescape().map_err(|e| self.xml_error(e.to_string()))?);
                }
                Event::CData(cdata) => text.push_str(&String::from_utf8_lossy(&cdata)),
                Event::Empty(child) if child.name().as_ref() == b"byte" => {
                    text.extend(self.read_byte(&child)?);
                }
                Event::Start(child) => {
                    tracing::debug!("Ignoring nested <{}> in text", element_name(&child));
                    depth += 1;
                }
                Event::End(_) => {
                    if depth == 0 {
                        return Ok(text);
                    }
                    depth -= 1;
                }
                Event::Eof => return Err(self.xml_error("unexpected end of document in text")),
                _ => {}
            }
        }
    }

    /// Decode `<byte value="x1b"/>`: hexadecimal (`x`/`0x` prefix) or decimal.
    fn read_byte(&self, start: &BytesStart<'_>) -> Result<Option<char>, ParseError> {
        let value = self.attribute(start, b"value")?.unwrap_or_default();
        let (radix, digits) = value
            .strip_prefix("0x")
            .or_else(|| value.strip_prefix('x'))
            .map_or((10, value.as_str()), |hex| (16, hex));
        let invalid = || ParseError::InvalidAttribute {
            element: "byte",
            attribute: "value",
            value: value.clone(),
        };
        let code = u32::from_str_radix(digits, radix).map_err(|_| invalid())?;
        if code == 0 {
            return Ok(None);
        }
        char::from_u32(code).map(Some).ok_or_else(invalid)
    }

    /// Skip everything up to the end tag of the element just opened.
    fn skip_element(&mut self, start: &BytesStart<'_>) -> Result<(), ParseError> {
        tracing::debug!("Skipping unsupported element <{}>", element_name(start));
        let mut depth = 0_usize;
        loop {
            match self.next_event()? {
                Event::Start(_) => depth += 1,
                Event::End(_) => {
                    if depth == 0 {
                        return Ok(());
                    }
                    depth -= 1;
                }
                Event::Eof => {
                    return Err(self.xml_error(format!(
                        "unexpected end of document inside <{}>",
                        element_name(start)
                    )));
                }
                _ => {}
            }
        }
    }
}
