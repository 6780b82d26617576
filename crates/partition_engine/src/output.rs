use std::path::Path;

use partition_core::Profile;
use serde::Serialize;

use crate::persist::{AtomicFileWriter, PersistError};

/// Write one URL per line, in the order given.
pub fn write_lines(profiles: &[Profile], path: &Path) -> Result<(), PersistError> {
    let mut buffer = String::with_capacity(profiles.len() * 48);
    for profile in profiles {
        buffer.push_str(&profile.url);
        buffer.push('\n');
    }
    AtomicFileWriter::new(path.to_path_buf()).write(buffer.as_bytes())?;
    Ok(())
}

/// Write `payload` as JSON indented by two spaces, newline-terminated.
pub fn write_json<T: Serialize + ?Sized>(path: &Path, payload: &T) -> Result<(), PersistError> {
    let mut buffer = serde_json::to_vec_pretty(payload)?;
    buffer.push(b'\n');
    AtomicFileWriter::new(path.to_path_buf()).write(&buffer)?;
    Ok(())
}
