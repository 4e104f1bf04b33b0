//! TS serializer producing the layout lupdate writes.

use quick_xml::escape::escape;

use super::model::{
    Context,
    Message,
    NumerusForm,
    Translation,
    TranslationBody,
    TsDocument,
};

/// Serialize a document to TS XML.
///
/// The output follows lupdate's layout so that `lupdate`/`lrelease` and
/// version control diffs stay quiet after a round trip.
#[must_use]
pub fn write_document(document: &TsDocument) -> String {
    let mut out = String::new();
    out.push_str("<?xml version=\"1.0\" encoding=\"utf-8\"?>\n<!DOCTYPE TS>\n<TS");
    push_attribute(&mut out, "version", document.version.as_deref());
    push_attribute(&mut out, "language", document.language.as_deref());
    push_attribute(&mut out, "sourcelanguage", document.source_language.as_deref());
    out.push_str(">\n");

    if !document.dependencies.is_empty() {
        out.push_str("<dependencies>\n");
        for catalog in &document.dependencies {
            out.push_str("    <dependency");
            push_attribute(&mut out, "catalog", Some(catalog));
            out.push_str("/>\n");
        }
        out.push_str("</dependencies>\n");
    }
    for extra in &document.extras {
        push_element(&mut out, "", &extra.name, &extra.content);
    }
    for context in &document.contexts {
        write_context(&mut out, context);
    }

    out.push_str("</TS>\n");
    out
}

/// `<context>` with its name, comment and messages.
fn write_context(out: &mut String, context: &Context) {
    out.push_str("<context>\n");
    push_element(out, "    ", "name", &context.name);
    if let Some(comment) = &context.comment {
        push_element(out, "    ", "comment", comment);
    }
    for message in &context.messages {
        write_message(out, message);
    }
    out.push_str("</context>\n");
}

/// Indentation of `<message>` children.
const INDENT: &str = "        ";

/// `<message>` in lupdate's child order.
fn write_message(out: &mut String, message: &Message) {
    out.push_str("    <message");
    push_attribute(out, "id", message.id.as_deref());
    if message.numerus {
        push_attribute(out, "numerus", Some("yes"));
    }
    out.push_str(">\n");

    for location in &message.locations {
        out.push_str("        <location");
        push_attribute(out, "filename", location.filename.as_deref());
        push_attribute(out, "line", location.line.as_deref());
        out.push_str("/>\n");
    }

    push_element(out, INDENT, "source", &message.source);
    let optional = [
        ("oldsource", &message.old_source),
        ("comment", &message.comment),
        ("oldcomment", &message.old_comment),
        ("extracomment", &message.extra_comment),
        ("translatorcomment", &message.translator_comment),
    ];
    for (name, value) in optional {
        if let Some(value) = value {
            push_element(out, INDENT, name, value);
        }
    }
    if let Some(translation) = &message.translation {
        write_translation(out, translation);
    }
    for extra in &message.extras {
        push_element(out, INDENT, &extra.name, &extra.content);
    }

    out.push_str("    </message>\n");
}

/// `<translation>`; plural forms and length variants go one per line.
fn write_translation(out: &mut String, translation: &Translation) {
    out.push_str("        <translation");
    push_attribute(out, "type", translation.status.attribute());
    match &translation.body {
        TranslationBody::Text(text) => {
            out.push('>');
            push_text(out, text);
        }
        TranslationBody::NumerusForms(forms) => {
            out.push_str(">\n");
            for form in forms {
                write_numerus_form(out, form);
            }
            out.push_str("        ");
        }
        TranslationBody::LengthVariants(variants) => {
            push_attribute(out, "variants", Some("yes"));
            out.push_str(">\n");
            for variant in variants {
                push_element(out, "            ", "lengthvariant", variant);
            }
            out.push_str("        ");
        }
    }
    out.push_str("</translation>\n");
}

/// `<numerusform>`; its length variants go one per line.
fn write_numerus_form(out: &mut String, form: &NumerusForm) {
    match form {
        NumerusForm::Text(text) => push_element(out, "            ", "numerusform", text),
        NumerusForm::LengthVariants(variants) => {
            out.push_str("            <numerusform");
            push_attribute(out, "variants", Some("yes"));
            out.push_str(">\n");
            for variant in variants {
                push_element(out, "                ", "lengthvariant", variant);
            }
            out.push_str("            </numerusform>\n");
        }
    }
}

/// ` name="value"`, skipped when `value` is `None`.
fn push_attribute(out: &mut String, name: &str, value: Option<&str>) {
    if let Some(value) = value {
        out.push(' ');
        out.push_str(name);
        out.push_str("=\"");
        out.push_str(&escape(value));
        out.push('"');
    }
}

/// `<name>text</name>` on its own line.
fn push_element(out: &mut String, indent: &str, name: &str, text: &str) {
    out.push_str(indent);
    out.push('<');
    out.push_str(name);
    out.push('>');
    push_text(out, text);
    out.push_str("</");
    out.push_str(name);
    out.push_str(">\n");
}

/// Escaped text. Control characters other than tab and newlines are not
/// representable in XML 1.0 and go out as `<byte value="xNN"/>`.
fn push_text(out: &mut String, text: &str) {
    let mut rest = text;
    while let Some(index) = rest.find(|c: char| c.is_control() && !matches!(c, '\t' | '\n' | '\r'))
    {
        let (plain, tail) = rest.split_at(index);
        out.push_str(&escape(plain));
        let mut chars = tail.chars();
        if let Some(control) = chars.next() {
            out.push_str(&format!("<byte value=\"x{:x}\"/>", u32::from(control)));
        }
        rest = chars.as_str();
    }
    out.push_str(&escape(rest));
}
