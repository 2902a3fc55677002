use crate::finalize::PersistableSession;
use std::io::Write;

/// Write a finalized session as CSV: a header row plus one row per goal log.
/// The caller picks the destination; nothing here touches the filesystem.
pub fn write_session_csv<W: Write>(writer: W, bundle: &PersistableSession) -> csv::Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);

    wtr.write_record([
        "session_id",
        "client",
        "origin",
        "goal_id",
        "goal",
        "cue_level",
        "success",
        "timestamp",
    ])?;

    for log in &bundle.logs {
        wtr.write_record([
            bundle.id.to_string(),
            bundle.client_name.clone(),
            bundle.origin.to_string(),
            log.goal_id.to_string(),
            log.goal_description.clone(),
            log.cue_level.to_string(),
            log.success.to_string(),
            log.timestamp.to_rfc3339(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}
