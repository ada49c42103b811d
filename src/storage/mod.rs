use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;
use tokio::fs;
use tokio::sync::Mutex;
use tracing::{debug, error, info};

use crate::models::{NewProduct, Product};

/// Reasons a mutation was refused. Reads never fail; they degrade to an
/// empty catalog instead.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The data file exists but cannot be read or parsed. Rewriting it would
    /// drop every product it holds.
    #[error("data file {} is unreadable", .0.display())]
    Unreadable(PathBuf),

    #[error("product ids are exhausted")]
    IdsExhausted,
}

/// Flat-file product catalog.
///
/// Every call reloads the file; nothing is cached between requests. Storage
/// faults are logged and degrade to an empty catalog (reads) or a skipped
/// write (saves) instead of being reported to the caller.
#[derive(Debug)]
pub struct ProductStore {
    path: PathBuf,
    /// Serializes read-modify-write cycles within this process.
    write_lock: Mutex<()>,
}

/// Next identifier for `products`: one past the largest id, or 0 when empty.
/// `None` once the largest id is `u64::MAX`.
pub fn next_id(products: &[Product]) -> Option<u64> {
    products
        .iter()
        .map(|p| p.id)
        .max()
        .map_or(Some(0), |max| max.checked_add(1))
}

impl ProductStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Creates the data file (and its parent directory) holding an empty
    /// array when it is missing. Returns whether a file was created.
    pub async fn ensure_exists(&self) -> std::io::Result<bool> {
        if fs::try_exists(&self.path).await? {
            return Ok(false);
        }
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await?;
        }
        fs::write(&self.path, "[]").await?;
        info!(path = %self.path.display(), "Created empty data file");
        Ok(true)
    }

    // ── Primitives ────────────────────────────────────────────────────────────

    pub async fn load(&self) -> Vec<Product> {
        self.read_catalog().await.unwrap_or_default()
    }

    /// Rewrites the whole file. Skipped when the file does not exist.
    ///
    /// The new content goes to a sibling temp file first and is renamed over
    /// the data file, so readers never observe a half-written catalog.
    pub async fn save(&self, products: &[Product]) {
        match fs::try_exists(&self.path).await {
            Ok(true) => {}
            Ok(false) => {
                debug!(path = %self.path.display(), "Data file missing, save skipped");
                return;
            }
            Err(e) => {
                error!(path = %self.path.display(), error = %e, "Failed to stat data file");
                return;
            }
        }

        let bytes = match to_pretty_json(products) {
            Ok(bytes) => bytes,
            Err(e) => {
                error!(error = %e, "Failed to serialize products");
                return;
            }
        };

        let tmp = self.temp_path();
        if let Err(e) = fs::write(&tmp, bytes).await {
            error!(path = %tmp.display(), error = %e, "Failed to write products");
            let _ = fs::remove_file(&tmp).await;
            return;
        }
        if let Err(e) = fs::rename(&tmp, &self.path).await {
            error!(path = %self.path.display(), error = %e, "Failed to replace data file");
            let _ = fs::remove_file(&tmp).await;
            return;
        }

        debug!(count = products.len(), "Saved products");
    }

    /// A missing file is an empty catalog; anything else that stops the file
    /// from parsing is logged and reported.
    async fn read_catalog(&self) -> Result<Vec<Product>, StoreError> {
        let raw = match fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                error!(path = %self.path.display(), error = %e, "Failed to read products");
                return Err(StoreError::Unreadable(self.path.clone()));
            }
        };

        serde_json::from_str::<Vec<Product>>(&raw).map_err(|e| {
            error!(path = %self.path.display(), error = %e, "Data file is corrupted");
            StoreError::Unreadable(self.path.clone())
        })
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    // ── Catalog operations ────────────────────────────────────────────────────

    pub async fn list(&self) -> Vec<Product> {
        self.load().await
    }

    pub async fn get(&self, id: u64) -> Option<Product> {
        self.load().await.into_iter().find(|p| p.id == id)
    }

    pub async fn create(&self, new: NewProduct) -> Result<Product, StoreError> {
        let _guard = self.write_lock.lock().await;

        let mut products = self.read_catalog().await?;
        let Some(id) = next_id(&products) else {
            error!(count = products.len(), "Product ids exhausted, create refused");
            return Err(StoreError::IdsExhausted);
        };
        let product = Product::from_new(id, new);
        products.push(product.clone());
        self.save(&products).await;

        Ok(product)
    }

    pub async fn update(&self, id: u64, new: NewProduct) -> Result<Option<Product>, StoreError> {
        let _guard = self.write_lock.lock().await;

        let mut products = self.read_catalog().await?;
        let Some(product) = products.iter_mut().find(|p| p.id == id) else {
            return Ok(None);
        };
        product.apply(new);
        let updated = product.clone();
        self.save(&products).await;

        Ok(Some(updated))
    }

    pub async fn delete(&self, id: u64) -> Result<Option<Product>, StoreError> {
        let _guard = self.write_lock.lock().await;

        let mut products = self.read_catalog().await?;
        let Some(index) = products.iter().position(|p| p.id == id) else {
            return Ok(None);
        };
        let removed = products.remove(index);
        self.save(&products).await;

        Ok(Some(removed))
    }
}

/// Four-space indented JSON, matching files edited by hand.
fn to_pretty_json<T: Serialize + ?Sized>(value: &T) -> serde_json::Result<Vec<u8>> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut ser)?;
    Ok(buf)
}
