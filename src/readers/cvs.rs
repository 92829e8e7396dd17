//! CVS: detection only. A CVS checkout carries no branch or revision for
//! the directory as a whole.

use std::path::Path;

use super::{DetectionQuery, Reader};
use crate::context::ServiceContext;
use crate::repository::{RepositoryInfo, System};

/// Reader for CVS checkouts.
pub struct Cvs;

impl Reader for Cvs {
    fn system(&self) -> System {
        System::Cvs
    }

    fn detect(&self, ctx: &ServiceContext, dir: &Path) -> bool {
        ctx.fs.is_dir(&dir.join("CVS"))
    }

    fn extract(&self, _ctx: &ServiceContext, query: &DetectionQuery<'_>) -> RepositoryInfo {
        query.info(System::Cvs)
    }
}
