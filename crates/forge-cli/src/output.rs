//! 3LE catalog output

use crate::Result;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use tle_forge::TleRecord;
use tracing::info;

/// Write `records` as a 3LE catalog to `path`, or to stdout without one
///
/// Returns the number of records written.
pub fn write_catalog<'a, I>(records: I, path: Option<&Path>) -> Result<usize>
where
    I: IntoIterator<Item = &'a TleRecord>,
{
    let count = match path {
        Some(path) => {
            info!("Writing catalog to {:?}", path);
            let file = File::create(path)?;
            write_records(records, BufWriter::new(file))?
        }
        None => write_records(records, io::stdout().lock())?,
    };
    Ok(count)
}

fn write_records<'a, I, W>(records: I, mut writer: W) -> io::Result<usize>
where
    I: IntoIterator<Item = &'a TleRecord>,
    W: Write,
{
    let mut count = 0;
    for record in records {
        writeln!(writer, "{}", record)?;
        count += 1;
    }
    writer.flush()?;
    Ok(count)
}
