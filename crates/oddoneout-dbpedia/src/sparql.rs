//! Blocking SPARQL-over-HTTP client.

use std::collections::{HashMap, HashSet};

use oddoneout_taxonomy::Label;
use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use serde::Deserialize;
use url::Url;

use crate::{query, DbpediaConfig, GraphQuery};

pub const SPARQL_RESULTS_JSON: &str = "application/sparql-results+json";

#[derive(Debug, thiserror::Error)]
pub enum SparqlError {
    #[error("invalid endpoint `{endpoint}`: {source}")]
    Endpoint {
        endpoint: String,
        #[source]
        source: url::ParseError,
    },

    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("endpoint returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("invalid SPARQL JSON response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("SPARQL response has no `{0}` section")]
    MissingSection(&'static str),
}

// ============================================================================
// Response decoding (SPARQL 1.1 Query Results JSON Format)
// ============================================================================

#[derive(Debug, Deserialize)]
struct SparqlResponse {
    results: Option<SparqlResults>,
    boolean: Option<bool>,
}

#[derive(Debug, Deserialize)]
struct SparqlResults {
    bindings: Vec<HashMap<String, SparqlTerm>>,
}

#[derive(Debug, Deserialize)]
struct SparqlTerm {
    value: String,
}

/// Values bound to `variable` in a SELECT response, in response order,
/// duplicates removed.
pub fn decode_bindings(body: &str, variable: &str) -> Result<Vec<Label>, SparqlError> {
    let response: SparqlResponse = serde_json::from_str(body)?;
    let results = response
        .results
        .ok_or(SparqlError::MissingSection("results"))?;

    let mut seen: HashSet<Label> = HashSet::with_capacity(results.bindings.len());
    let mut out: Vec<Label> = Vec::with_capacity(results.bindings.len());
    for mut row in results.bindings {
        let Some(term) = row.remove(variable) else {
            continue;
        };
        if seen.insert(term.value.clone()) {
            out.push(term.value);
        }
    }
    Ok(out)
}

/// Answer of an ASK response.
pub fn decode_boolean(body: &str) -> Result<bool, SparqlError> {
    let response: SparqlResponse = serde_json::from_str(body)?;
    response.boolean.ok_or(SparqlError::MissingSection("boolean"))
}

// ============================================================================
// HTTP graph
// ============================================================================

/// [`GraphQuery`] over a public SPARQL endpoint (DBpedia by default).
pub struct SparqlGraph {
    client: Client,
    endpoint: Url,
}

impl SparqlGraph {
    pub fn new(config: &DbpediaConfig) -> Result<Self, SparqlError> {
        let endpoint = Url::parse(&config.endpoint).map_err(|source| SparqlError::Endpoint {
            endpoint: config.endpoint.clone(),
            source,
        })?;

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(SPARQL_RESULTS_JSON));
        if let Ok(agent) = HeaderValue::from_str(&config.user_agent) {
            headers.insert(USER_AGENT, agent);
        }

        let client = Client::builder()
            .timeout(config.timeout)
            .default_headers(headers)
            .build()?;

        Ok(Self { client, endpoint })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    fn execute(&self, sparql: &str) -> Result<String, SparqlError> {
        tracing::debug!(endpoint = %self.endpoint, "issuing SPARQL query");
        let resp = self
            .client
            .get(self.endpoint.clone())
            .query(&[("query", sparql), ("format", SPARQL_RESULTS_JSON)])
            .send()?;

        let status = resp.status();
        let body = resp.text()?;
        if !status.is_success() {
            return Err(SparqlError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(body)
    }

    pub fn select_labels(&self, sparql: &str) -> Result<Vec<Label>, SparqlError> {
        let body = self.execute(sparql)?;
        decode_bindings(&body, "label")
    }

    pub fn ask(&self, sparql: &str) -> Result<bool, SparqlError> {
        let body = self.execute(sparql)?;
        decode_boolean(&body)
    }
}

impl GraphQuery for SparqlGraph {
    fn is_concept(&self, label: &str) -> Result<bool, SparqlError> {
        self.ask(&query::ask_is_concept(label))
    }

    fn has_subject(&self, label: &str) -> Result<bool, SparqlError> {
        self.ask(&query::ask_has_subject(label))
    }

    fn broader_categories(&self, category: &str) -> Result<Vec<Label>, SparqlError> {
        self.select_labels(&query::select_broader(category))
    }

    fn subject_categories(&self, article: &str) -> Result<Vec<Label>, SparqlError> {
        self.select_labels(&query::select_subjects(article))
    }

    fn member_instances(&self, category: &str) -> Result<Vec<Label>, SparqlError> {
        self.select_labels(&query::select_member_instances(category))
    }

    fn member_subcategories(&self, category: &str) -> Result<Vec<Label>, SparqlError> {
        self.select_labels(&query::select_member_subcategories(category))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_select_bindings_in_order_without_duplicates() {
        let body = r#"{
            "head": { "link": [], "vars": ["label"] },
            "results": { "distinct": false, "ordered": true, "bindings": [
                { "label": { "type": "literal", "xml:lang": "en", "value": "Water dogs" } },
                { "label": { "type": "literal", "xml:lang": "en", "value": "Dog breeds" } },
                { "label": { "type": "literal", "xml:lang": "en", "value": "Water dogs" } },
                { "other": { "type": "uri", "value": "http://dbpedia.org/resource/Poodle" } }
            ] }
        }"#;
        let labels = decode_bindings(body, "label").unwrap();
        assert_eq!(labels, vec!["Water dogs".to_string(), "Dog breeds".to_string()]);
    }

    #[test]
    fn large_member_lists_keep_first_occurrence_order() {
        let bindings: Vec<serde_json::Value> = (0..6_000)
            .map(|i| {
                let value = format!("Breed {}", i % 2_000);
                serde_json::json!({ "label": { "type": "literal", "value": value } })
            })
            .collect();
        let body = serde_json::json!({ "results": { "bindings": bindings } }).to_string();

        let labels = decode_bindings(&body, "label").unwrap();
        assert_eq!(labels.len(), 2_000);
        assert_eq!(labels[0], "Breed 0");
        assert_eq!(labels[1_999], "Breed 1999");
    }

    #[test]
    fn decodes_ask_response() {
        let body = r#"{ "head": { "link": [] }, "boolean": true }"#;
        assert!(decode_boolean(body).unwrap());
        let body = r#"{ "head": { "link": [] }, "boolean": false }"#;
        assert!(!decode_boolean(body).unwrap());
    }

    #[test]
    fn missing_sections_are_errors() {
        let err = decode_boolean(r#"{ "head": {} }"#).unwrap_err();
        assert!(matches!(err, SparqlError::MissingSection("boolean")));

        let err = decode_bindings(r#"{ "head": {}, "boolean": true }"#, "label").unwrap_err();
        assert!(matches!(err, SparqlError::MissingSection("results")));
    }

    #[test]
    fn malformed_body_is_a_decode_error() {
        let err = decode_bindings("<html>busy</html>", "label").unwrap_err();
        assert!(matches!(err, SparqlError::Decode(_)));
    }

    #[test]
    fn rejects_invalid_endpoint() {
        let config = DbpediaConfig {
            endpoint: "not a url".to_string(),
            ..DbpediaConfig::default()
        };
        let err = SparqlGraph::new(&config).err().unwrap();
        assert!(matches!(err, SparqlError::Endpoint { .. }));
    }
}
