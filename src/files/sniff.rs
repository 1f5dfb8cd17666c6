//! Notation detection and namespace upgrades.
//!
//! Opened files are classified by the model namespace they declare rather
//! than by their extension. Files that still use a deprecated namespace can
//! be upgraded by rewriting the raw XML text before the file is opened.

use super::Notation;
use log::debug;
use regex::Regex;
use std::sync::OnceLock;

// ─────────────────────────────────────────────────────────────────────────────
// Notation Detection
// ─────────────────────────────────────────────────────────────────────────────

const NOTATION_PATTERNS: &[(Notation, &str)] = &[
    (Notation::Bpmn, r"http://www\.omg\.org/spec/BPMN/\d{8}/MODEL"),
    (
        Notation::Dmn,
        r"https?://www\.omg\.org/spec/DMN/\d{8}/(MODEL|dmn\.xsd|dmn11\.xsd)",
    ),
    (Notation::Cmmn, r"http://www\.omg\.org/spec/CMMN/\d{8}/MODEL"),
];

static MATCHERS: OnceLock<Vec<(Notation, Regex)>> = OnceLock::new();

fn matchers() -> &'static [(Notation, Regex)] {
    MATCHERS.get_or_init(|| {
        NOTATION_PATTERNS
            .iter()
            .filter_map(|(notation, pattern)| Regex::new(pattern).ok().map(|re| (*notation, re)))
            .collect()
    })
}

/// Determine the notation of a document from the namespaces it declares.
///
/// Returns `None` for anything that is not a BPMN, DMN or CMMN model.
pub fn detect_notation(contents: &str) -> Option<Notation> {
    matchers()
        .iter()
        .find(|(_, re)| re.is_match(contents))
        .map(|(notation, _)| *notation)
}

// ─────────────────────────────────────────────────────────────────────────────
// Deprecated Namespaces
// ─────────────────────────────────────────────────────────────────────────────

/// A namespace that has a modern replacement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NamespaceUpgrade {
    pub notation: Notation,
    pub old_uri: &'static str,
    pub new_uri: &'static str,
    /// Prefix renaming that goes along with the URI, if any
    pub prefix: Option<(&'static str, &'static str)>,
}

const UPGRADES: &[NamespaceUpgrade] = &[
    NamespaceUpgrade {
        notation: Notation::Bpmn,
        old_uri: "http://activiti.org/bpmn",
        new_uri: "http://camunda.org/schema/1.0/bpmn",
        prefix: Some(("activiti", "camunda")),
    },
    NamespaceUpgrade {
        notation: Notation::Dmn,
        old_uri: "http://www.omg.org/spec/DMN/20151101/dmn11.xsd",
        new_uri: "http://www.omg.org/spec/DMN/20151101/dmn.xsd",
        prefix: None,
    },
];

/// Find a deprecated namespace used by a document of the given notation.
pub fn deprecated_namespace(contents: &str, notation: Notation) -> Option<&'static NamespaceUpgrade> {
    UPGRADES
        .iter()
        .find(|upgrade| upgrade.notation == notation && contents.contains(upgrade.old_uri))
}

/// Rewrite a document to the modern namespace.
///
/// Works on the raw text: the URI is replaced everywhere and, when the
/// upgrade renames the prefix, both the `xmlns:` declaration and all
/// qualified element and attribute names are rewritten.
pub fn upgrade_namespace(contents: &str, upgrade: &NamespaceUpgrade) -> String {
    let mut xml = contents.replace(upgrade.old_uri, upgrade.new_uri);

    if let Some((old_prefix, new_prefix)) = upgrade.prefix {
        let declaration = format!("xmlns:{}=", old_prefix);
        xml = xml.replace(&declaration, &format!("xmlns:{}=", new_prefix));

        match Regex::new(&format!(r"(</?|\s){}:", regex::escape(old_prefix))) {
            Ok(re) => {
                xml = re
                    .replace_all(&xml, format!("${{1}}{}:", new_prefix).as_str())
                    .into_owned();
            }
            Err(e) => debug!("Invalid prefix pattern '{}': {}", old_prefix, e),
        }
    }

    xml
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
