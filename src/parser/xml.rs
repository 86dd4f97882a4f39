//! Loading NED file ASTs from their XML serialization.
//!
//! The XML form mirrors the syntax tree: one element per node
//! (`<ned-file>`, `<simple-module name="...">`, `<extends name="...">`,
//! `<types>`, ...). The reader rebuilds the same rowan tree shape the text
//! parser produces, so everything downstream is format-agnostic.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use rowan::GreenNodeBuilder;

use super::errors::{line_at, ParseDiagnostic};
use super::grammar::Parse;
use super::syntax_kind::SyntaxKind;

/// Parse the XML serialization of a NED file. The loader reads the file
/// and hands the contents here; XML is only ever accepted from files, so
/// there is no separate file entry point.
pub fn parse_text(text: &str) -> Parse {
    let mut reader = Reader::from_str(text);
    reader.config_mut().trim_text(true);

    let mut builder = GreenNodeBuilder::new();
    let mut diagnostics = Vec::new();
    let mut open_nodes = 0usize;
    let mut root_seen = false;
    // elements after the root element are reported once and not built,
    // so the green tree keeps a single root
    let mut skip_depth = 0usize;

    loop {
        let position = reader.buffer_position() as usize;
        match reader.read_event() {
            Ok(Event::Start(element)) => {
                if skip_depth > 0 || (root_seen && open_nodes == 0) {
                    if skip_depth == 0 {
                        diagnostics.push(ParseDiagnostic::error(
                            "more than one root element",
                            Some(line_at(text, position)),
                        ));
                    }
                    skip_depth += 1;
                    continue;
                }
                open_element(&mut builder, &element, text, position, &mut diagnostics);
                open_nodes += 1;
                root_seen = true;
            }
            Ok(Event::Empty(element)) => {
                if skip_depth > 0 || (root_seen && open_nodes == 0) {
                    if skip_depth == 0 {
                        diagnostics.push(ParseDiagnostic::error(
                            "more than one root element",
                            Some(line_at(text, position)),
                        ));
                    }
                    continue;
                }
                open_element(&mut builder, &element, text, position, &mut diagnostics);
                builder.finish_node();
                root_seen = true;
            }
            Ok(Event::End(_)) => {
                if skip_depth > 0 {
                    skip_depth -= 1;
                } else if open_nodes > 0 {
                    builder.finish_node();
                    open_nodes -= 1;
                }
            }
            Ok(Event::Eof) => break,
            Ok(_) => {} // declarations, comments, text content
            Err(error) => {
                diagnostics.push(ParseDiagnostic::error(
                    format!("invalid XML: {error}"),
                    Some(line_at(text, position)),
                ));
                break;
            }
        }
    }

    // close anything left open after an error so the tree stays balanced
    for _ in 0..open_nodes {
        builder.finish_node();
    }
    if !root_seen {
        if diagnostics.is_empty() {
            diagnostics.push(ParseDiagnostic::error("empty XML document", None));
        }
        builder.start_node(SyntaxKind::ERROR.into());
        builder.finish_node();
    }

    Parse {
        green: builder.finish(),
        diagnostics,
    }
}

fn open_element(
    builder: &mut GreenNodeBuilder<'static>,
    element: &BytesStart,
    text: &str,
    position: usize,
    diagnostics: &mut Vec<ParseDiagnostic>,
) {
    let name = String::from_utf8_lossy(element.name().as_ref()).into_owned();
    let kind = match element_kind(&name) {
        Some(kind) => kind,
        None => {
            diagnostics.push(ParseDiagnostic::error(
                format!("unknown element <{name}>"),
                Some(line_at(text, position)),
            ));
            SyntaxKind::ERROR
        }
    };
    builder.start_node(kind.into());

    for attribute in element.attributes().flatten() {
        let key = String::from_utf8_lossy(attribute.key.as_ref()).into_owned();
        let value = attribute
            .unescape_value()
            .map(|v| v.into_owned())
            .unwrap_or_else(|_| String::from_utf8_lossy(&attribute.value).into_owned());
        emit_attribute(builder, kind, &key, &value);
    }
}

/// Map an attribute onto the token structure the text parser would have
/// produced. Unknown attributes are ignored; the XML form carries source
/// locations and display hints the cache has no use for.
fn emit_attribute(
    builder: &mut GreenNodeBuilder<'static>,
    kind: SyntaxKind,
    key: &str,
    value: &str,
) {
    match (kind, key) {
        (SyntaxKind::PACKAGE_DECL, "name")
        | (SyntaxKind::EXTENDS, "name")
        | (SyntaxKind::INTERFACE_NAME, "name") => {
            qualified_name_node(builder, value);
        }
        (SyntaxKind::IMPORT, "import-spec") => {
            qualified_name_node(builder, value);
        }
        (SyntaxKind::SUBMODULE, "type") => {
            qualified_name_node(builder, value);
        }
        (SyntaxKind::SUBMODULE, "like-type") => {
            builder.start_node(SyntaxKind::INTERFACE_NAME.into());
            qualified_name_node(builder, value);
            builder.finish_node();
        }
        (_, "name") => {
            builder.start_node(SyntaxKind::NAME.into());
            builder.token(SyntaxKind::IDENT.into(), value);
            builder.finish_node();
        }
        _ => {}
    }
}

fn qualified_name_node(builder: &mut GreenNodeBuilder<'static>, value: &str) {
    builder.start_node(SyntaxKind::QUALIFIED_NAME.into());
    builder.token(SyntaxKind::IDENT.into(), value);
    builder.finish_node();
}

fn element_kind(name: &str) -> Option<SyntaxKind> {
    Some(match name {
        "ned-file" => SyntaxKind::NED_FILE,
        "package" => SyntaxKind::PACKAGE_DECL,
        "import" => SyntaxKind::IMPORT,
        "property" => SyntaxKind::PROPERTY,
        "simple-module" => SyntaxKind::SIMPLE_MODULE,
        "compound-module" => SyntaxKind::COMPOUND_MODULE,
        "channel" => SyntaxKind::CHANNEL,
        "module-interface" => SyntaxKind::MODULE_INTERFACE,
        "channel-interface" => SyntaxKind::CHANNEL_INTERFACE,
        "extends" => SyntaxKind::EXTENDS,
        "interface-name" => SyntaxKind::INTERFACE_NAME,
        "types" => SyntaxKind::TYPES,
        "parameters" => SyntaxKind::PARAMETERS,
        "gates" => SyntaxKind::GATES,
        "submodules" => SyntaxKind::SUBMODULES,
        "submodule" => SyntaxKind::SUBMODULE,
        "connections" => SyntaxKind::CONNECTIONS,
        _ => return None,
    })
}
