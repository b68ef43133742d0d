// src/services/bulk_import_service.rs
//
// Bulk Import Service - seed the catalog from a manifest and asset folder
//
// CRITICAL RULES:
// - Products are added one at a time, in manifest order
// - A product that fails is recorded and the batch continues
// - Unreadable or undecodable images are dropped from their product and
//   reported; the product is still imported
// - Progress is reported after every product, success or not
//
// Asset naming: <id>.<ext> is the cover, <id>-<n>.<ext> follow in n order.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use regex::Regex;
use serde::Deserialize;

use crate::config::ImageLimits;
use crate::domain::{Product, WoodType};
use crate::error::{AppError, AppResult};
use crate::infrastructure::{compress_all, ImageRejection};
use crate::services::catalog_service::CatalogService;

pub const DEFAULT_FINISH: &str = "Natural oil finish, hand-sanded";

/// One manifest entry
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportSpec {
    pub id: String,
    pub name: String,
    pub category: String,
    #[serde(default)]
    pub wood_type: WoodType,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub finish_info: Option<String>,
    /// Explicit image files relative to the asset directory; discovered by
    /// id when empty
    #[serde(default)]
    pub images: Vec<String>,
}

impl ImportSpec {
    pub fn description(&self) -> String {
        if let Some(description) = self.description.as_deref().filter(|d| !d.trim().is_empty()) {
            return description.to_string();
        }
        let wood = match self.wood_type {
            WoodType::CustomisedProducts => "custom",
            other => other.label(),
        };
        format!(
            "Premium {} crafted from {} with expert finishing. Handcrafted in Jodhpur, Rajasthan.",
            self.category.to_lowercase(),
            wood
        )
    }

    fn into_product(self, image_urls: Vec<Vec<u8>>) -> Product {
        Product {
            description: self.description(),
            finish_info: self
                .finish_info
                .filter(|f| !f.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_FINISH.to_string()),
            id: self.id,
            name: self.name,
            category: self.category,
            wood_type: self.wood_type,
            image_urls,
            is_active: true,
            whatsapp_message: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportProgress {
    pub completed: usize,
    pub total: usize,
    pub current: String,
}

impl ImportProgress {
    pub fn percent(&self) -> u8 {
        if self.total == 0 {
            return 100;
        }
        ((self.completed as f64 / self.total as f64) * 100.0).round() as u8
    }
}

#[derive(Debug, Clone)]
pub struct ImportFailure {
    pub product: String,
    pub error: AppError,
}

impl std::fmt::Display for ImportFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.product, self.error)
    }
}

#[derive(Debug, Clone, Default)]
pub struct ImportReport {
    pub imported: Vec<String>,
    pub failures: Vec<ImportFailure>,
    pub image_rejections: Vec<ImageRejection>,
}

impl ImportReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty() && self.image_rejections.is_empty()
    }
}

pub struct BulkImportService {
    catalog: Arc<CatalogService>,
    image_limits: ImageLimits,
}

impl BulkImportService {
    pub fn new(catalog: Arc<CatalogService>, image_limits: ImageLimits) -> Self {
        Self {
            catalog,
            image_limits,
        }
    }

    /// Read a JSON array of `ImportSpec` and import it; images are looked up
    /// next to the manifest.
    pub async fn import_manifest<P>(&self, manifest: &Path, progress: P) -> AppResult<ImportReport>
    where
        P: FnMut(&ImportProgress),
    {
        let contents = tokio::fs::read_to_string(manifest).await?;
        let specs: Vec<ImportSpec> = serde_json::from_str(&contents)?;
        let asset_dir = manifest
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        log::info!(
            "importing {} products from {}",
            specs.len(),
            manifest.display()
        );
        Ok(self.import(specs, &asset_dir, progress).await)
    }

    pub async fn import<P>(
        &self,
        specs: Vec<ImportSpec>,
        asset_dir: &Path,
        mut progress: P,
    ) -> ImportReport
    where
        P: FnMut(&ImportProgress),
    {
        let mut report = ImportReport::default();
        let total = specs.len();

        for (index, spec) in specs.into_iter().enumerate() {
            let name = spec.name.clone();
            let id = spec.id.clone();

            let paths = if spec.images.is_empty() {
                discover_images(asset_dir, &spec.id)
            } else {
                spec.images.iter().map(|file| asset_dir.join(file)).collect()
            };
            let image_urls = self.load_images(paths, &mut report).await;

            match self.catalog.add_product(spec.into_product(image_urls)).await {
                Ok(()) => report.imported.push(id),
                Err(error) => {
                    log::warn!("import of {} failed: {}", name, error);
                    report.failures.push(ImportFailure {
                        product: name.clone(),
                        error,
                    });
                }
            }

            progress(&ImportProgress {
                completed: index + 1,
                total,
                current: name,
            });
        }

        log::info!(
            "import finished: {} imported, {} failed",
            report.imported.len(),
            report.failures.len()
        );
        report
    }

    async fn load_images(&self, paths: Vec<PathBuf>, report: &mut ImportReport) -> Vec<Vec<u8>> {
        let mut files = Vec::with_capacity(paths.len());
        for path in paths {
            let name = path.display().to_string();
            match tokio::fs::read(&path).await {
                Ok(bytes) => files.push((name, bytes)),
                Err(error) => report.image_rejections.push(ImageRejection {
                    name,
                    error: error.into(),
                }),
            }
        }

        let batch = compress_all(files, self.image_limits).await;
        report.image_rejections.extend(batch.rejected);
        batch.images
    }
}

/// Images for `id` in `dir`: the cover first, then numbered extras.
pub fn discover_images(dir: &Path, id: &str) -> Vec<PathBuf> {
    let pattern = match Regex::new(&format!(
        r"(?i)^{}(?:-(\d+))?\.(?:png|jpe?g|webp)$",
        regex::escape(id)
    )) {
        Ok(pattern) => pattern,
        Err(_) => return Vec::new(),
    };

    let mut found: Vec<(u32, PathBuf)> = walkdir::WalkDir::new(dir)
        .max_depth(1)
        .follow_links(true)
        .into_iter()
        .filter_map(|e: Result<walkdir::DirEntry, walkdir::Error>| e.ok())
        .filter(|entry| entry.file_type().is_file())
        .filter_map(|entry| {
            let file_name = entry.file_name().to_str()?.to_string();
            let captures = pattern.captures(&file_name)?;
            let order = captures
                .get(1)
                .and_then(|n| n.as_str().parse().ok())
                .unwrap_or(0);
            Some((order, entry.into_path()))
        })
        .collect();

    found.sort();
    found.into_iter().map(|(_, path)| path).collect()
}
