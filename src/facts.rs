use rand::Rng;
use rand::seq::SliceRandom;
use serde::Deserialize;
use std::path::Path;

use crate::error::{ConfigError, DispatchError};

const BUILTIN: &str = include_str!("../data/facts.toml");

/// One piece of content. Categories repeat across records.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FactRecord {
    pub category: String,
    pub text: String,
}

#[derive(Deserialize)]
struct FactTable {
    #[serde(default, rename = "fact")]
    facts: Vec<FactRecord>,
}

/// Read-only fact table shared by every handler.
#[derive(Debug, Clone)]
pub struct FactCatalog {
    facts: Vec<FactRecord>,
}

impl FactCatalog {
    pub fn new(facts: Vec<FactRecord>) -> Result<Self, ConfigError> {
        if facts.is_empty() {
            return Err(ConfigError::NoFacts);
        }
        Ok(Self { facts })
    }

    /// The table compiled into the binary.
    pub fn builtin() -> Result<Self, ConfigError> {
        Self::from_toml(BUILTIN)
    }

    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        let table: FactTable = toml::from_str(text)?;
        Self::new(table.facts)
    }

    /// Load a replacement table from disk.
    pub async fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| ConfigError::Io {
                path: path.display().to_string(),
                source,
            })?;
        Self::from_toml(&text)
    }

    pub fn len(&self) -> usize {
        self.facts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.facts.is_empty()
    }

    pub fn all(&self) -> &[FactRecord] {
        &self.facts
    }

    /// Distinct categories in first-seen order.
    pub fn categories(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for f in &self.facts {
            if !seen.contains(&f.category.as_str()) {
                seen.push(&f.category);
            }
        }
        seen
    }

    pub fn has_category(&self, category: &str) -> bool {
        self.facts.iter().any(|f| f.category == category)
    }

    /// Uniformly pick a fact, optionally restricted to one category.
    pub fn random_fact(&self, category: Option<&str>) -> Result<&FactRecord, DispatchError> {
        self.random_fact_with(category, &mut rand::thread_rng())
    }

    pub fn random_fact_with<R: Rng + ?Sized>(
        &self,
        category: Option<&str>,
        rng: &mut R,
    ) -> Result<&FactRecord, DispatchError> {
        let picked = match category {
            None => self.facts.choose(rng),
            Some(c) => {
                let pool: Vec<&FactRecord> =
                    self.facts.iter().filter(|f| f.category == c).collect();
                pool.choose(rng).copied()
            }
        };
        picked.ok_or_else(|| {
            let category = category.unwrap_or_default().to_string();
            tracing::error!(%category, "fact requested for a category with no facts");
            DispatchError::EmptyCategory(category)
        })
    }
}
