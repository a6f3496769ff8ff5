use std::{fs, path::Path};

use crate::{
    chart::{ChartId, ChartOptions},
    dashboard::Section,
    prelude::*,
};

/// Write every ready chart into `{directory}/{container}.json`, sized to the width.
///
/// Unavailable charts are skipped, leaving the previous document in place.
#[instrument(skip_all, fields(directory = %directory.display(), width = width))]
pub fn write_charts(
    directory: &Path,
    charts: &[(ChartId, Section<ChartOptions>)],
    width: u32,
) -> Result {
    fs::create_dir_all(directory)
        .with_context(|| format!("failed to create `{}`", directory.display()))?;
    for (id, section) in charts {
        let Some(options) = section.as_ready() else {
            continue;
        };
        let path = directory.join(format!("{id}.json"));
        let json = serde_json::to_string_pretty(&options.clone().with_width(width))?;
        fs::write(&path, json).with_context(|| format!("failed to write `{}`", path.display()))?;
        debug!(path = %path.display(), "written");
    }
    Ok(())
}
