//! SPARQL text for the six questions the taxonomy asks DBpedia.
//!
//! Nodes are addressed by English `rdfs:label`, except when walking down from
//! a category, where the category resource IRI is built from the label the
//! same way DBpedia names its resources (spaces become underscores).

pub const PREFIXES: &str = "\
PREFIX rdf: <http://www.w3.org/1999/02/22-rdf-syntax-ns#>
PREFIX rdfs: <http://www.w3.org/2000/01/rdf-schema#>
PREFIX dct: <http://purl.org/dc/terms/>
PREFIX skos: <http://www.w3.org/2004/02/skos/core#>
";

pub const CATEGORY_IRI_PREFIX: &str = "http://dbpedia.org/resource/Category:";

/// Escape `label` for use inside a double-quoted SPARQL string literal.
pub fn escape_literal(label: &str) -> String {
    let mut out = String::with_capacity(label.len());
    for c in label.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            other => out.push(other),
        }
    }
    out
}

/// `<http://dbpedia.org/resource/Category:Water_dogs>` for `Water dogs`.
///
/// Only the characters IRIREF forbids are percent-encoded; parentheses,
/// commas and non-ASCII letters stay as DBpedia spells them.
pub fn category_iri(label: &str) -> String {
    let mut out = String::with_capacity(CATEGORY_IRI_PREFIX.len() + label.len() + 2);
    out.push('<');
    out.push_str(CATEGORY_IRI_PREFIX);
    for c in label.trim().chars() {
        match c {
            ' ' => out.push('_'),
            '<' | '>' | '"' | '{' | '}' | '|' | '^' | '`' | '\\' => {
                out.push_str(&format!("%{:02X}", c as u32));
            }
            c if c.is_control() => {
                let mut buf = [0u8; 4];
                for b in c.encode_utf8(&mut buf).bytes() {
                    out.push_str(&format!("%{b:02X}"));
                }
            }
            other => out.push(other),
        }
    }
    out.push('>');
    out
}

fn labelled(label: &str) -> String {
    format!("\"{}\"@en", escape_literal(label))
}

/// Is there a resource with this label filed under some category?
pub fn ask_has_subject(label: &str) -> String {
    format!(
        "{PREFIXES}ASK {{\n  ?resource rdfs:label {};\n    dct:subject ?subject\n}}\n",
        labelled(label)
    )
}

/// Is there a `skos:Concept` (category) with this label?
pub fn ask_is_concept(label: &str) -> String {
    format!(
        "{PREFIXES}ASK {{\n  ?resource rdfs:label {};\n    rdf:type skos:Concept\n}}\n",
        labelled(label)
    )
}

/// Direct broader categories of the category labelled `label`.
pub fn select_broader(label: &str) -> String {
    select_parents(label, "skos:broader")
}

/// Categories the article labelled `label` is filed under.
pub fn select_subjects(label: &str) -> String {
    select_parents(label, "dct:subject")
}

fn select_parents(label: &str, predicate: &str) -> String {
    format!(
        "{PREFIXES}SELECT DISTINCT ?label\nWHERE {{\n  ?resource rdfs:label {};\n    {predicate} ?parent.\n  ?parent rdfs:label ?label\n  FILTER(lang(?label) = 'en')\n}}\n",
        labelled(label)
    )
}

/// Articles filed directly under the category.
pub fn select_member_instances(category: &str) -> String {
    select_members(category, "dct:subject")
}

/// Categories whose direct broader category is `category`.
pub fn select_member_subcategories(category: &str) -> String {
    select_members(category, "skos:broader")
}

fn select_members(category: &str, predicate: &str) -> String {
    format!(
        "{PREFIXES}SELECT DISTINCT ?label\nWHERE {{\n  ?resource {predicate} {};\n    rdfs:label ?label\n  FILTER(lang(?label) = 'en')\n}}\n",
        category_iri(category)
    )
}
