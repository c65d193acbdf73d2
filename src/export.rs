use crate::{Dataset, ForkcastError};
use std::io::Write;
use tracing::debug;

/// Dumps the dataset as CSV under the canonical column names.
pub fn write_csv<W: Write>(dataset: &Dataset, writer: W) -> Result<(), ForkcastError> {
    let mut wtr = csv::Writer::from_writer(writer);
    for row in dataset {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    debug!(rows = dataset.len(), "Exported dataset");
    Ok(())
}

pub fn export_bytes(dataset: &Dataset) -> Result<Vec<u8>, ForkcastError> {
    let mut buf = Vec::new();
    write_csv(dataset, &mut buf)?;
    Ok(buf)
}
