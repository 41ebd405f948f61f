use std::error::Error as StdError;

use chrono::{TimeZone, Utc};
use sonyflake::Sonyflake;

use crate::{errors, Result};

lazy_static::lazy_static! {
    static ref REQUEST_IDS: Option<Sonyflake> = Utc
        .with_ymd_and_hms(2024, 1, 1, 0, 0, 0)
        .single()
        .and_then(|start| {
            Sonyflake::builder()
                .start_time(start)
                .machine_id(&process_machine_id)
                .finalize()
                .ok()
        });
}

// Plugins run one process per mount, so the low bits of the pid keep ids
// from different mounts apart without depending on a private IP.
fn process_machine_id() -> Result<u16, Box<dyn StdError + Send + Sync>> {
    Ok((std::process::id() & 0xffff) as u16)
}

/// Returns the next request id of this process.
pub fn next_id() -> Result<u64> {
    let generator = REQUEST_IDS.as_ref().ok_or_else(|| {
        errors::anyhow(anyhow::anyhow!("request id generator is unavailable"))
    })?;
    generator.clone().next_id().map_err(errors::any)
}
