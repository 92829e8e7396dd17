//! Fossil: the checkout database names the repository database and the
//! checked-out check-in; the repository database has its hash and branch.
//! `fossil info` stands in when either database cannot be read.

use std::path::{Path, PathBuf};

use rusqlite::{Connection, OpenFlags, OptionalExtension};
use tracing::debug;

use super::{field, run_tool, DetectionQuery, Reader};
use crate::context::ServiceContext;
use crate::error::FieldError;
use crate::ports::Invocation;
use crate::repository::{short_hash, RepositoryInfo, System};

/// Reader for Fossil checkouts.
pub struct Fossil;

/// Checkout database names, newest convention first.
const CHECKOUT_DBS: [&str; 2] = [".fslckout", "_FOSSIL_"];

const BRANCH_QUERY: &str = "SELECT tagxref.value FROM tagxref \
     JOIN tag ON tag.tagid = tagxref.tagid \
     WHERE tagxref.rid = ?1 AND tag.tagname = 'branch' AND tagxref.tagtype > 0";

/// What identifies the checked-out check-in.
#[derive(Debug, Default, PartialEq, Eq)]
struct Checkout {
    hash: Option<String>,
    branch: Option<String>,
}

impl Reader for Fossil {
    fn system(&self) -> System {
        System::Fossil
    }

    fn detect(&self, ctx: &ServiceContext, dir: &Path) -> bool {
        checkout_db(ctx, dir).is_some()
    }

    fn extract(&self, ctx: &ServiceContext, query: &DetectionQuery<'_>) -> RepositoryInfo {
        let mut info = query.info(System::Fossil);

        if query.fields.branch || query.fields.revision {
            let checkout = read_databases(ctx, query.root).or_else(|err| {
                debug!(error = %err, "fossil databases unreadable, asking fossil");
                fossil_info(ctx, query.root)
            });
            if let Some(checkout) = field(System::Fossil, "checkout", checkout) {
                info.branch = checkout.branch;
                info.hash = checkout.hash.as_deref().map(short_hash);
                info.revision.clone_from(&info.hash);
            }
        }

        info
    }
}

fn checkout_db(ctx: &ServiceContext, dir: &Path) -> Option<PathBuf> {
    CHECKOUT_DBS
        .iter()
        .map(|name| dir.join(name))
        .find(|path| ctx.fs.exists(path))
}

fn open(path: &Path) -> Result<Connection, FieldError> {
    Ok(Connection::open_with_flags(
        path,
        OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
    )?)
}

fn read_databases(ctx: &ServiceContext, root: &Path) -> Result<Checkout, FieldError> {
    let db = checkout_db(ctx, root).ok_or(FieldError::Malformed { what: "checkout database" })?;
    let local = open(&db)?;
    let repository: String = local.query_row(
        "SELECT value FROM vvar WHERE name = 'repository'",
        [],
        |row| row.get(0),
    )?;
    let rid: i64 = local.query_row(
        "SELECT CAST(value AS INTEGER) FROM vvar WHERE name = 'checkout'",
        [],
        |row| row.get(0),
    )?;

    // Relative repository paths are relative to the checkout root.
    let repo = open(&root.join(repository))?;
    let hash: String = repo.query_row("SELECT uuid FROM blob WHERE rid = ?1", [rid], |row| row.get(0))?;
    let branch = repo
        .query_row(BRANCH_QUERY, [rid], |row| row.get::<_, Option<String>>(0))
        .optional()?
        .flatten();

    Ok(Checkout { hash: Some(hash), branch })
}

fn fossil_info(ctx: &ServiceContext, root: &Path) -> Result<Checkout, FieldError> {
    let out = run_tool(ctx, &Invocation::new("fossil", ["info"], root))?;
    let checkout = parse_info(&out);
    if checkout == Checkout::default() {
        return Err(FieldError::Malformed { what: "fossil info output" });
    }
    Ok(checkout)
}

/// Reads `checkout:` and `branch:`, or the first of `tags:` when the
/// installed fossil predates the `branch:` line.
fn parse_info(output: &str) -> Checkout {
    let mut checkout = Checkout::default();
    let mut first_tag = None;
    for line in output.lines() {
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let value = value.trim();
        match key.trim() {
            "checkout" => checkout.hash = value.split_whitespace().next().map(str::to_string),
            "branch" if !value.is_empty() => checkout.branch = Some(value.to_string()),
            "tags" => {
                first_tag = value
                    .split(',')
                    .map(str::trim)
                    .find(|t| !t.is_empty())
                    .map(str::to_string);
            }
            _ => {}
        }
    }
    if checkout.branch.is_none() {
        checkout.branch = first_tag;
    }
    checkout
}
