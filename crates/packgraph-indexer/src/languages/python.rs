//! Python command-call extractor using tree-sitter

use crate::error::{ContentError, Result};
use crate::extractor::{CallExtraction, CommandCallExtractor, CommandReference};
use tree_sitter::{Node, Parser};

const EXECUTE_COMMAND_FN: &str = "execute_command";
const DEMISTO_MODULE: &str = "demisto";
const EXECUTE_COMMAND_METHOD: &str = "executeCommand";
/// Runs another command on a remote engine; the real command name sits in
/// the nested argument dict.
const EXECUTE_COMMAND_AT: &str = "executeCommandAt";
/// Python 2 statements the grammar still accepts; the source does not
/// parse as Python 3.
const PYTHON2_STATEMENTS: [&str; 2] = ["print_statement", "exec_statement"];

pub struct PythonExtractor;

impl PythonExtractor {
    fn parser() -> Result<Parser> {
        let mut parser = Parser::new();
        let language: tree_sitter::Language = tree_sitter_python::LANGUAGE.into();
        parser
            .set_language(&language)
            .map_err(|e| ContentError::Grammar {
                language: "python",
                message: e.to_string(),
            })?;
        Ok(parser)
    }

    /// `execute_command(...)` or `demisto.executeCommand(...)`.
    fn is_command_call(call: Node, source: &str) -> bool {
        let Some(func) = call.child_by_field_name("function") else {
            return false;
        };
        match func.kind() {
            "identifier" => node_text(func, source) == EXECUTE_COMMAND_FN,
            "attribute" => {
                let object = func.child_by_field_name("object");
                let attribute = func.child_by_field_name("attribute");
                matches!(
                    (object, attribute),
                    (Some(o), Some(a))
                        if o.kind() == "identifier"
                            && node_text(o, source) == DEMISTO_MODULE
                            && node_text(a, source) == EXECUTE_COMMAND_METHOD
                )
            }
            _ => false,
        }
    }

    fn command_name(call: Node, source: &str) -> Option<String> {
        let args = call.child_by_field_name("arguments")?;
        if args.kind() != "argument_list" {
            return None;
        }
        let (positional, keywords) = split_arguments(args, source);

        let name = match positional.first() {
            Some(&first) => string_literal(first, source)?,
            None => keywords
                .iter()
                .find(|(key, _)| *key == "command")
                .and_then(|&(_, value)| string_literal(value, source))?,
        };

        let name = if name == EXECUTE_COMMAND_AT {
            let nested = keywords
                .iter()
                .find(|(key, _)| *key == "args")
                .map(|&(_, value)| value)
                .or_else(|| positional.get(1).copied())?;
            dict_string_entry(nested, "command", source)?
        } else {
            name
        };

        Some(name).filter(|n| !n.is_empty())
    }
}

impl CommandCallExtractor for PythonExtractor {
    fn language(&self) -> &'static str {
        "python"
    }

    fn extract(&self, source: &str) -> Result<CallExtraction> {
        let mut parser = Self::parser()?;
        let tree = parser
            .parse(source, None)
            .ok_or(ContentError::ParseAborted { language: "python" })?;
        let root = tree.root_node();
        if root.has_error() {
            return Ok(CallExtraction::SyntaxError);
        }

        let mut calls = Vec::new();
        let mut stack = vec![root];
        while let Some(node) = stack.pop() {
            if PYTHON2_STATEMENTS.contains(&node.kind()) {
                return Ok(CallExtraction::SyntaxError);
            }
            if node.kind() == "call" && Self::is_command_call(node, source) {
                if let Some(name) = Self::command_name(node, source) {
                    calls.push(CommandReference {
                        name,
                        line: node.start_position().row as u32 + 1,
                    });
                }
            }
            let mut cursor = node.walk();
            let children: Vec<Node> = node.children(&mut cursor).collect();
            stack.extend(children.into_iter().rev());
        }

        Ok(CallExtraction::Calls(calls))
    }
}

fn node_text<'a>(node: Node<'_>, source: &'a str) -> &'a str {
    &source[node.byte_range()]
}

/// Positional arguments and `(keyword, value)` pairs of an argument list.
fn split_arguments<'t, 's>(args: Node<'t>, source: &'s str) -> (Vec<Node<'t>>, Vec<(&'s str, Node<'t>)>) {
    let mut positional = Vec::new();
    let mut keywords = Vec::new();
    let mut cursor = args.walk();
    for child in args.named_children(&mut cursor) {
        match child.kind() {
            "comment" | "dictionary_splat" => {}
            "keyword_argument" => {
                if let (Some(name), Some(value)) =
                    (child.child_by_field_name("name"), child.child_by_field_name("value"))
                {
                    keywords.push((node_text(name, source), value));
                }
            }
            _ => positional.push(child),
        }
    }
    (positional, keywords)
}

/// Value of a plain string literal. f-strings, bytes and anything that is
/// not a literal yield `None`.
fn string_literal(node: Node, source: &str) -> Option<String> {
    match node.kind() {
        "string" => plain_string(node_text(node, source)),
        "concatenated_string" => {
            let mut out = String::new();
            let mut cursor = node.walk();
            for part in node.named_children(&mut cursor) {
                if part.kind() == "comment" {
                    continue;
                }
                out.push_str(&string_literal(part, source)?);
            }
            Some(out)
        }
        "parenthesized_expression" => {
            let mut cursor = node.walk();
            let inner: Vec<Node> = node
                .named_children(&mut cursor)
                .filter(|n| n.kind() != "comment")
                .collect();
            match inner.as_slice() {
                [only] => string_literal(*only, source),
                _ => None,
            }
        }
        _ => None,
    }
}

fn plain_string(text: &str) -> Option<String> {
    let quote_at = text.find(['"', '\''])?;
    let prefix = text[..quote_at].to_ascii_lowercase();
    if prefix.contains('f') || prefix.contains('b') {
        return None;
    }
    let body = &text[quote_at..];
    let quote_len = if body.starts_with("\"\"\"") || body.starts_with("'''") { 3 } else { 1 };
    if body.len() < quote_len * 2 {
        return None;
    }
    let inner = &body[quote_len..body.len() - quote_len];
    if prefix.contains('r') {
        Some(inner.to_string())
    } else {
        Some(unescape(inner))
    }
}

fn unescape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('\\') => out.push('\\'),
            Some('\'') => out.push('\''),
            Some('"') => out.push('"'),
            Some('\n') => {}
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

/// String value stored under a literal `key` in a dict literal.
fn dict_string_entry(dict: Node, key: &str, source: &str) -> Option<String> {
    if dict.kind() != "dictionary" {
        return None;
    }
    let mut cursor = dict.walk();
    let pairs: Vec<Node> = dict
        .named_children(&mut cursor)
        .filter(|n| n.kind() == "pair")
        .collect();
    pairs.into_iter().find_map(|pair| {
        let k = pair.child_by_field_name("key")?;
        let v = pair.child_by_field_name("value")?;
        (string_literal(k, source)? == key).then(|| string_literal(v, source)).flatten()
    })
}
