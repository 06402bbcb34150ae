//! One backup run end to end: resolve the chain, invoke tar, report the
//! artifact.

use std::path::PathBuf;

use chrono::Local;

use crate::archive;
use crate::chain;
use crate::config::Config;
use crate::error::Result;
use crate::naming::ArtifactKind;

pub fn run(config: &Config) -> Result<PathBuf> {
    let layout = config.layout();
    layout.ensure()?;

    // one clock read per run; everything downstream formats this instant
    let now = Local::now();

    let resolution = chain::resolve(&layout, &config.name, config.force);
    let plan = archive::plan(config, &resolution.key, &now)?;

    // the record is only written once the invocation is validated, so a run
    // that aborts here (missing exclude file) cannot orphan the old chain
    chain::persist(&layout, &config.name, &resolution.key, &now)?;

    if let Some(patterns) = &plan.exclude_patterns {
        println!("Exclude file(s): {}", patterns.join(", "));
    }

    println!("Backup started at {}", now.format("%d/%m/%Y, %H:%M:%S"));
    match plan.kind {
        ArtifactKind::Incr => println!("New incremental backup: {}", plan.artifact.display()),
        ArtifactKind::Full => println!("New full backup: {}", plan.artifact.display()),
    }

    let size = archive::invoke(&plan)?;
    println!("Backup file size: {size}");

    Ok(plan.artifact)
}
