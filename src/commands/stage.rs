//! Stage command - convert a target list into a session file

use std::path::Path;

use sentinel::loader;
use sentinel::output::{OutputMode, StageResult};

/// Parse a target list and write it as a session file
pub fn stage(input: &Path, session: &Path, output_mode: OutputMode) -> anyhow::Result<()> {
    let targets = loader::read_targets(input)?;
    loader::save_session(session, &targets)?;

    StageResult {
        session: session.display().to_string(),
        targets: targets.len(),
    }
    .render(output_mode);

    Ok(())
}
