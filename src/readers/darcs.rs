//! Darcs: the hash of the latest patch from `_darcs/hashed_inventory`.

use std::path::{Path, PathBuf};

use super::{field, DetectionQuery, Reader};
use crate::context::ServiceContext;
use crate::error::FieldError;
use crate::repository::{short_hash, RepositoryInfo, System};

/// Reader for Darcs repositories.
pub struct Darcs;

// Inventories can be large; the first line is all we need.
const INVENTORY_HEAD: usize = 4096;

impl Reader for Darcs {
    fn system(&self) -> System {
        System::Darcs
    }

    fn detect(&self, ctx: &ServiceContext, dir: &Path) -> bool {
        ctx.fs.exists(&inventory_path(dir))
    }

    fn extract(&self, ctx: &ServiceContext, query: &DetectionQuery<'_>) -> RepositoryInfo {
        let mut info = query.info(System::Darcs);
        if query.fields.revision {
            info.hash = field(System::Darcs, "hash", inventory_hash(ctx, query.root));
            info.revision.clone_from(&info.hash);
        }
        info
    }
}

fn inventory_path(dir: &Path) -> PathBuf {
    dir.join("_darcs").join("hashed_inventory")
}

fn inventory_hash(ctx: &ServiceContext, root: &Path) -> Result<String, FieldError> {
    let path = inventory_path(root);
    let head = ctx
        .fs
        .read_head(&path, INVENTORY_HEAD)
        .map_err(|e| FieldError::io(&path, &e))?;
    let text = String::from_utf8_lossy(&head);
    let first = text.lines().next().map(str::trim).unwrap_or_default();
    match first.rsplit('-').next() {
        Some(last) if !last.is_empty() => Ok(short_hash(last)),
        _ => Err(FieldError::Malformed { what: "hashed_inventory" }),
    }
}
