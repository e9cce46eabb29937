// Library interactor - Orchestrates preview generation and catalog building

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::domain::errors::*;
use crate::domain::model::*;
use crate::engine::{SceneSearchEngine, ScrubEngine, ThumbnailEngine};
use crate::output::catalog::{mosaic_dim, Catalog, CatalogStats};
use crate::output::MetaDocument;
use crate::planner::scene::DEFAULT_STEP;
use crate::ports::*;
use crate::probe::MetaInfoExtractor;
use crate::utils::{find_files, format_duration, format_file_size};

/// File name of the catalog written at the library root
pub const CATALOG_FILE_NAME: &str = "catalog.json";
/// Default tile width of previews and sprites
pub const DEFAULT_PREVIEW_WIDTH: u32 = 160;

/// Which artifacts to build and how
#[derive(Debug, Clone, PartialEq)]
pub struct LibraryOptions {
    /// Initial scene-detection step in permille
    pub scene_detection: i32,
    pub preview_width: u32,
    /// Regenerate artifacts that already exist
    pub force: bool,
    pub thumbnail: bool,
    pub animated_preview: bool,
    pub scrub: bool,
}

impl Default for LibraryOptions {
    fn default() -> Self {
        Self {
            scene_detection: DEFAULT_STEP,
            preview_width: DEFAULT_PREVIEW_WIDTH,
            force: false,
            thumbnail: true,
            animated_preview: true,
            scrub: true,
        }
    }
}

/// Outcome of the catalog step
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogReport {
    pub path: PathBuf,
    pub written: bool,
    pub mosaics_built: usize,
    pub stats: CatalogStats,
}

/// Outcome of a whole library run
#[derive(Debug, Clone, PartialEq)]
pub struct LibraryReport {
    pub assets: usize,
    pub updated: usize,
    pub catalog: CatalogReport,
}

/// Interactor for the library use case
pub struct LibraryInteractor {
    tools: Arc<dyn MediaToolPort>,
    options: LibraryOptions,
}

impl LibraryInteractor {
    /// Create new library interactor with injected ports
    pub fn new(tools: Arc<dyn MediaToolPort>, options: LibraryOptions) -> Self {
        Self { tools, options }
    }

    pub fn options(&self) -> &LibraryOptions {
        &self.options
    }

    /// Tools that cannot be run at all, with the reason
    pub async fn missing_dependencies(&self) -> Vec<(ExternalTool, DomainError)> {
        let mut missing = Vec::new();
        for tool in ExternalTool::ALL {
            match self.tools.check_tool(tool).await {
                Ok(output) => debug!("Found {} ({})", tool, output.stdout.lines().next().unwrap_or("")),
                Err(e) => missing.push((tool, e)),
            }
        }
        missing
    }

    /// Build previews for every video under `root` and write `root/catalog.json`
    pub async fn build_library(&self, root: &Path) -> Result<LibraryReport, DomainError> {
        if !root.is_dir() {
            return Err(DomainError::BadArgs(format!(
                "Expected directory path: {}",
                root.display()
            )));
        }
        let assets = self.add_directory(root).await?;
        let catalog = self.create_catalog(&root.join(CATALOG_FILE_NAME), &assets).await?;
        Ok(LibraryReport {
            assets: assets.len(),
            updated: assets.iter().filter(|asset| asset.updated).count(),
            catalog,
        })
    }

    /// Process every visible `*.mp4` below `root`
    ///
    /// A file that cannot be processed is logged and left out; a transport
    /// failure stops the run.
    pub async fn add_directory(&self, root: &Path) -> Result<Vec<LibraryAsset>, DomainError> {
        info!("Finding videos in directory {} ...", root.display());
        let files = find_files(root, "mp4")?;
        let mut assets = Vec::with_capacity(files.len());
        for file in files {
            match self.add_video(&file).await {
                Ok(asset) => assets.push(asset),
                Err(e) if e.is_fatal() => return Err(e),
                Err(e) => warn!("Skipping {}: {}", file.display(), e),
            }
        }
        Ok(assets)
    }

    /// Create whichever preview artifacts of `source` are missing (or all, when forced)
    pub async fn add_video(&self, source: &Path) -> Result<LibraryAsset, DomainError> {
        let mut asset = LibraryAsset::new(source)?;
        info!("Processing {}", source.display());
        std::fs::create_dir_all(asset.preview_dir())?;

        let force = self.options.force;
        let source = asset.source().to_path_buf();
        let tools = self.tools.as_ref();
        let extractor = MetaInfoExtractor::new(tools);
        let mut rewrite_meta = force || !asset.meta_path().exists();
        if !rewrite_meta {
            match MetaDocument::read(&asset.meta_path()) {
                Ok(doc) => {
                    asset.metadata = MetaState::Fetched(doc.metadata());
                    asset.preview_search = doc.preview;
                }
                Err(e) => {
                    warn!("Discarding unreadable meta file: {}", e);
                    rewrite_meta = true;
                }
            }
        }

        if self.options.thumbnail && (force || !asset.thumbnail_path().exists()) {
            asset.updated = true;
            let engine = ThumbnailEngine::new(tools, self.options.preview_width);
            tolerate(&asset, "thumbnail", engine.generate(&asset).await)?;
        }

        if self.options.animated_preview
            && (force || !asset.webp_path().exists())
            && !asset.webp_ignore_path().exists()
        {
            asset.updated = true;
            let engine = SceneSearchEngine::new(
                tools,
                self.options.scene_detection,
                self.options.preview_width,
            );
            if let Some(result) = tolerate(&asset, "animated preview", engine.run(&asset, force).await)? {
                debug!("Preview outcome {:?}", result.outcome);
                if result.report.is_some() {
                    asset.preview_search = result.report;
                    rewrite_meta = true;
                }
            }
        }

        if self.options.scrub
            && (force || !(asset.scrub_path().exists() && asset.vtt_path().exists()))
        {
            asset.updated = true;
            let meta = extractor.resolve(&source, &mut asset.metadata).await?;
            let engine = ScrubEngine::new(tools, self.options.preview_width);
            tolerate(&asset, "scrub sprite", engine.generate(&asset, &meta).await)?;
        }

        let meta = extractor.resolve(&source, &mut asset.metadata).await?;
        if rewrite_meta {
            asset.updated = true;
            debug!("Write meta file {}", asset.meta_path().display());
            tolerate(
                &asset,
                "meta file",
                MetaDocument::new(&asset, &meta).write(&asset.meta_path()),
            )?;
        }
        Ok(asset)
    }

    /// Group `assets` into a catalog at `catalog_path`, with one mosaic per group
    ///
    /// Mosaics are rebuilt when missing or when any asset changed this run;
    /// the catalog is written when any asset changed or it does not exist.
    pub async fn create_catalog(
        &self,
        catalog_path: &Path,
        assets: &[LibraryAsset],
    ) -> Result<CatalogReport, DomainError> {
        let any_updated = assets.iter().any(|asset| asset.updated);
        let mut catalog = Catalog::new();
        for asset in assets {
            match asset.metadata.get() {
                Some(meta) => {
                    if !catalog.append(asset, meta) {
                        debug!("Catalog excludes {}", asset.source().display());
                    }
                }
                None => warn!("No metadata for {}, left out of catalog", asset.source().display()),
            }
        }

        let mut mosaics_built = 0;
        for (name, path) in catalog.assign_mosaics(catalog_path) {
            if path.exists() && !any_updated {
                continue;
            }
            let mut tiles = catalog.groups()[&name].tiles();
            tiles.retain(|tile| tile.exists());
            let Some(dim) = mosaic_dim(tiles.len()) else {
                debug!("No thumbnails for group {}", name);
                continue;
            };
            tiles.truncate((dim * dim) as usize);
            debug!("tile - {} {}x{} - {}", path.display(), dim, dim, tiles.len());
            let result = self.tools.compose_mosaic(&tiles, dim, &path).await?;
            if result.success {
                mosaics_built += 1;
            } else {
                warn!("Mosaic for group {} failed: {}", name, result.stderr.trim());
            }
        }

        let stats = CatalogStats::compute(&catalog);
        let written = any_updated || !catalog_path.exists();
        if written {
            info!("Building catalog ...");
            std::fs::write(catalog_path, catalog.to_json()?)?;
            info!("Wrote catalog {}", catalog_path.display());
            info!("Total Data Size: {}", format_file_size(stats.total_file_size));
            info!("Total Duration: {}", format_duration(stats.total_duration));
        } else {
            info!("No updates!");
        }

        Ok(CatalogReport {
            path: catalog_path.to_path_buf(),
            written,
            mosaics_built,
            stats,
        })
    }
}

/// Keep going after a per-file failure; only transport failures propagate
fn tolerate<T>(
    asset: &LibraryAsset,
    artifact: &str,
    result: Result<T, DomainError>,
) -> Result<Option<T>, DomainError> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(e) if e.is_fatal() => Err(e),
        Err(e) => {
            warn!("{} failed for {}: {}", artifact, asset.source().display(), e);
            Ok(None)
        }
    }
}
