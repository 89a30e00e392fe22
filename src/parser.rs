use crate::error::Result;
use crate::network::NetworkTable;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Turns an interaction file into a [`NetworkTable`] without profiles.
pub trait NetworkParser {
    fn parse(&self, source: &mut dyn Read) -> Result<NetworkTable>;

    fn parse_path(&self, path: &Path) -> Result<NetworkTable> {
        let mut reader = BufReader::new(File::open(path)?);
        let table = self.parse(&mut reader)?;
        tracing::info!(path = %path.display(), rows = table.len(), "parsed interaction network");
        Ok(table)
    }
}
