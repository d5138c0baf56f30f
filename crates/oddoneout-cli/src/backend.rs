//! Backend selection shared by every subcommand.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::{Args, ValueEnum};
use oddoneout_dbpedia::{DbpediaConfig, DbpediaTaxonomy};
use oddoneout_taxonomy::{warm_ancestors, Taxonomy};
use oddoneout_wikidump::WikiDumpConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum BackendKind {
    /// Category graph behind a SPARQL endpoint
    Dbpedia,
    /// Extracted page + categorylinks tables
    Wikidump,
}

#[derive(Debug, Args)]
pub struct BackendArgs {
    /// Taxonomy data source
    #[arg(long, value_enum, default_value = "dbpedia", global = true)]
    pub backend: BackendKind,

    /// SPARQL endpoint (default: $ODDONEOUT_SPARQL_ENDPOINT or DBpedia)
    #[arg(long, global = true)]
    pub endpoint: Option<String>,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = 60, global = true)]
    pub timeout: u64,

    /// Extracted page table (wikidump backend)
    #[arg(long, global = true)]
    pub pages: Option<PathBuf>,

    /// Extracted categorylinks table (wikidump backend)
    #[arg(long, global = true)]
    pub categorylinks: Option<PathBuf>,

    /// Root category label
    #[arg(long, global = true)]
    pub root: Option<String>,

    /// Corpus size; the wikidump backend counts it when omitted
    #[arg(long, global = true)]
    pub num_instances: Option<usize>,

    /// Hub categories whose ancestors are cached before the command runs
    #[arg(long = "warm", value_name = "LABEL", global = true)]
    pub warm: Vec<String>,
}

impl BackendArgs {
    pub fn dbpedia_config(&self) -> DbpediaConfig {
        let mut config = DbpediaConfig::from_env();
        if let Some(endpoint) = &self.endpoint {
            config.endpoint = endpoint.clone();
        }
        if let Some(root) = &self.root {
            config.root = root.clone();
        }
        if let Some(n) = self.num_instances {
            config.num_instances = n;
        }
        config.timeout = Duration::from_secs(self.timeout);
        config
    }

    pub fn wikidump_config(&self) -> WikiDumpConfig {
        let mut config = WikiDumpConfig::default();
        if let Some(root) = &self.root {
            config.root = root.clone();
        }
        config.num_instances = self.num_instances;
        config
    }

    /// Build the selected backend and pre-warm it.
    pub fn open(&self) -> Result<Box<dyn Taxonomy>> {
        let mut taxonomy: Box<dyn Taxonomy> = match self.backend {
            BackendKind::Dbpedia => {
                let config = self.dbpedia_config();
                tracing::info!(endpoint = %config.endpoint, root = %config.root, "using dbpedia backend");
                Box::new(DbpediaTaxonomy::connect(config).context("failed to set up SPARQL client")?)
            }
            BackendKind::Wikidump => {
                let (Some(pages), Some(categorylinks)) = (&self.pages, &self.categorylinks) else {
                    bail!("the wikidump backend needs --pages and --categorylinks");
                };
                Box::new(oddoneout_ingest::load_wikidump(
                    pages,
                    categorylinks,
                    self.wikidump_config(),
                )?)
            }
        };

        if !self.warm.is_empty() {
            let warmed = warm_ancestors(&mut taxonomy, &self.warm);
            tracing::info!(warmed, requested = self.warm.len(), "pre-warmed ancestor cache");
        }
        Ok(taxonomy)
    }
}
