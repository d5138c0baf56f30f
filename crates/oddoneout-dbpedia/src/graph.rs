use oddoneout_taxonomy::Label;

use crate::SparqlError;

/// Direct-edge questions the DBpedia taxonomy asks of the knowledge graph.
///
/// Every call is one round trip and may fail transiently. [`crate::SparqlGraph`]
/// answers them over HTTP; tests substitute an in-memory graph.
pub trait GraphQuery {
    /// Is `label` the label of a category (`skos:Concept`)?
    fn is_concept(&self, label: &str) -> Result<bool, SparqlError>;

    /// Is `label` the label of something filed under a category (`dct:subject`)?
    fn has_subject(&self, label: &str) -> Result<bool, SparqlError>;

    /// `skos:broader` links of the category labelled `category`.
    fn broader_categories(&self, category: &str) -> Result<Vec<Label>, SparqlError>;

    /// `dct:subject` links of the article labelled `article`.
    fn subject_categories(&self, article: &str) -> Result<Vec<Label>, SparqlError>;

    /// Articles filed directly under `category`.
    fn member_instances(&self, category: &str) -> Result<Vec<Label>, SparqlError>;

    /// Categories directly narrower than `category`.
    fn member_subcategories(&self, category: &str) -> Result<Vec<Label>, SparqlError>;
}

impl<G: GraphQuery + ?Sized> GraphQuery for &G {
    fn is_concept(&self, label: &str) -> Result<bool, SparqlError> {
        (**self).is_concept(label)
    }

    fn has_subject(&self, label: &str) -> Result<bool, SparqlError> {
        (**self).has_subject(label)
    }

    fn broader_categories(&self, category: &str) -> Result<Vec<Label>, SparqlError> {
        (**self).broader_categories(category)
    }

    fn subject_categories(&self, article: &str) -> Result<Vec<Label>, SparqlError> {
        (**self).subject_categories(article)
    }

    fn member_instances(&self, category: &str) -> Result<Vec<Label>, SparqlError> {
        (**self).member_instances(category)
    }

    fn member_subcategories(&self, category: &str) -> Result<Vec<Label>, SparqlError> {
        (**self).member_subcategories(category)
    }
}
