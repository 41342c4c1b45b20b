//! Parse-once memoization of loaded catalogs. Parsing the reference
//! workbook on every UI interaction would dominate interaction latency, so
//! parsed catalogs are kept per source identity and reused until the source
//! file itself changes (new upload) or the entry is explicitly invalidated.

use crate::catalog::loader::load_catalog;
use crate::catalog::Catalog;
use crate::config::CatalogConfig;
use crate::error::TechSheetError;
use anyhow::Context;
use log::debug;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::SystemTime;

/// What makes a parsed catalog reusable: same path, same length, same
/// modification time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct SourceIdentity {
    length: u64,
    modified: Option<SystemTime>,
}

impl SourceIdentity {
    fn probe(path: &Path) -> Result<SourceIdentity, TechSheetError> {
        let metadata = fs::metadata(path)
            .with_context(|| format!("Inspect reference workbook '{}'", path.display()))?;
        Ok(SourceIdentity {
            length: metadata.len(),
            modified: metadata.modified().ok(),
        })
    }
}

struct CacheEntry {
    identity: SourceIdentity,
    catalog: Arc<Catalog>,
}

/// Memoized catalog store, owned by the host session.
#[derive(Default)]
pub struct CatalogCache {
    entries: HashMap<PathBuf, CacheEntry>,
}

impl CatalogCache {
    pub fn new() -> CatalogCache {
        CatalogCache::default()
    }

    /// Returns the catalog for a source, parsing it only when the source
    /// is new or has changed since the cached parse.
    pub fn fetch(
        &mut self,
        path: &Path,
        config: &CatalogConfig,
    ) -> Result<Arc<Catalog>, TechSheetError> {
        let identity = SourceIdentity::probe(path)?;
        if let Some(entry) = self.entries.get(path) {
            if entry.identity == identity {
                return Ok(entry.catalog.clone());
            }
            debug!("reference workbook '{}' changed, reparsing", path.display());
        }
        let catalog = Arc::new(load_catalog(path, config)?);
        self.entries.insert(
            path.to_owned(),
            CacheEntry {
                identity,
                catalog: catalog.clone(),
            },
        );
        Ok(catalog)
    }

    /// Drops the cached parse of one source.
    pub fn invalidate(&mut self, path: &Path) {
        self.entries.remove(path);
    }
}
