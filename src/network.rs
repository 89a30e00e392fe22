use crate::error::{ProwlerError, Result};
use crate::profile::{Profile, Symbols};
use std::fmt;
use std::io::Write;

pub const ORF_QUERY_COLUMN: &str = "ORF_Q";
pub const ORF_ARRAY_COLUMN: &str = "ORF_A";
pub const PROFILE_QUERY_COLUMN: &str = "PROF_Q";
pub const PROFILE_ARRAY_COLUMN: &str = "PROF_A";
pub const PSS_COLUMN: &str = "PSS";

/// Which gene of a pairwise interaction a value belongs to.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Side {
    Query,
    Array,
}

impl Side {
    pub const ALL: [Side; 2] = [Side::Query, Side::Array];

    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Query => "query",
            Side::Array => "array",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct InteractionRecord {
    pub orf_query: String,
    pub orf_array: String,
    /// Opaque values, aligned with [`NetworkTable::columns`].
    pub fields: Vec<String>,
    pub profile_query: Option<Profile>,
    pub profile_array: Option<Profile>,
}

impl InteractionRecord {
    pub fn new(
        orf_query: impl Into<String>,
        orf_array: impl Into<String>,
        fields: Vec<String>,
    ) -> Self {
        Self {
            orf_query: orf_query.into(),
            orf_array: orf_array.into(),
            fields,
            profile_query: None,
            profile_array: None,
        }
    }

    pub fn orf(&self, side: Side) -> &str {
        match side {
            Side::Query => &self.orf_query,
            Side::Array => &self.orf_array,
        }
    }

    pub fn profile(&self, side: Side) -> Option<&Profile> {
        match side {
            Side::Query => self.profile_query.as_ref(),
            Side::Array => self.profile_array.as_ref(),
        }
    }

    pub fn set_profile(&mut self, side: Side, profile: Profile) {
        match side {
            Side::Query => self.profile_query = Some(profile),
            Side::Array => self.profile_array = Some(profile),
        }
    }
}

/// An ordered interaction table. Besides the two ORF columns, every column is
/// carried through untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NetworkTable {
    columns: Vec<String>,
    rows: Vec<InteractionRecord>,
}

impl NetworkTable {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: vec![],
        }
    }

    pub fn push(&mut self, record: InteractionRecord) -> Result<()> {
        if record.fields.len() != self.columns.len() {
            return Err(ProwlerError::LengthMismatch {
                expected: self.columns.len(),
                actual: record.fields.len(),
            });
        }
        self.rows.push(record);
        Ok(())
    }

    #[inline(always)]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    #[inline(always)]
    pub fn rows(&self) -> &[InteractionRecord] {
        &self.rows
    }

    #[inline(always)]
    pub fn rows_mut(&mut self) -> &mut [InteractionRecord] {
        &mut self.rows
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Result<usize> {
        self.columns
            .iter()
            .position(|c| c == name)
            .ok_or_else(|| ProwlerError::MissingColumn(name.to_string()))
    }

    pub fn field(&self, row: usize, column: &str) -> Option<&str> {
        let index = self.columns.iter().position(|c| c == column)?;
        self.rows.get(row)?.fields.get(index).map(String::as_str)
    }

    /// Rows selected by `keep`, in their original order.
    pub fn filtered(&self, keep: impl Fn(usize, &InteractionRecord) -> bool) -> Self {
        Self {
            columns: self.columns.clone(),
            rows: self
                .rows
                .iter()
                .enumerate()
                .filter(|(i, row)| keep(*i, *row))
                .map(|(_, row)| row.clone())
                .collect(),
        }
    }

    /// Writes the table as TSV: ORF columns, opaque columns, rendered
    /// profiles, and optionally one PSS value per row.
    pub fn write_tsv<W: Write>(
        &self,
        writer: W,
        symbols: &Symbols,
        pss: Option<&[usize]>,
    ) -> Result<()> {
        let mut out = csv::WriterBuilder::new().delimiter(b'\t').from_writer(writer);
        let mut header = vec![ORF_QUERY_COLUMN.to_string(), ORF_ARRAY_COLUMN.to_string()];
        header.extend(self.columns.iter().cloned());
        header.push(PROFILE_QUERY_COLUMN.to_string());
        header.push(PROFILE_ARRAY_COLUMN.to_string());
        if pss.is_some() {
            header.push(PSS_COLUMN.to_string());
        }
        out.write_record(&header)?;

        for (i, row) in self.rows.iter().enumerate() {
            let mut record = vec![row.orf_query.clone(), row.orf_array.clone()];
            record.extend(row.fields.iter().cloned());
            for side in Side::ALL {
                record.push(
                    row.profile(side)
                        .map(|p| p.to_text_with(symbols))
                        .unwrap_or_default(),
                );
            }
            if let Some(scores) = pss {
                record.push(scores.get(i).map(|s| s.to_string()).unwrap_or_default());
            }
            out.write_record(&record)?;
        }
        out.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::species::SpeciesUniverse;

    fn table() -> NetworkTable {
        let mut table = NetworkTable::new(vec!["GIS".to_string()]);
        table
            .push(InteractionRecord::new("YAL001C", "YBL002W", vec!["-0.12".to_string()]))
            .unwrap();
        table
            .push(InteractionRecord::new("YAL002W", "YBL003C", vec!["0.31".to_string()]))
            .unwrap();
        table
    }

    #[test]
    fn test_push_checks_field_count() {
        let mut table = table();
        let err = table
            .push(InteractionRecord::new("A", "B", vec![]))
            .unwrap_err();
        assert!(matches!(err, ProwlerError::LengthMismatch { expected: 1, actual: 0 }));
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_field_lookup() {
        let table = table();
        assert_eq!(table.field(1, "GIS"), Some("0.31"));
        assert_eq!(table.field(1, "nope"), None);
        assert!(matches!(
            table.column_index("nope"),
            Err(ProwlerError::MissingColumn(_))
        ));
        assert_eq!(table.rows()[0].orf(Side::Array), "YBL002W");
    }

    #[test]
    fn test_filtered_keeps_order_and_columns() {
        let table = table();
        let sub = table.filtered(|i, _| i == 1);
        assert_eq!(sub.len(), 1);
        assert_eq!(sub.columns(), table.columns());
        assert_eq!(sub.rows()[0].orf_query, "YAL002W");
    }

    #[test]
    fn test_write_tsv() {
        let universe = SpeciesUniverse::build(["hin", "sce", "eco"]).unwrap();
        let mut table = table();
        for row in table.rows_mut() {
            row.set_profile(Side::Query, Profile::from_membership(&universe, ["sce"]));
            row.set_profile(Side::Array, Profile::from_membership(&universe, ["hin", "eco"]));
        }
        let mut buffer = vec![];
        table
            .write_tsv(&mut buffer, &Symbols::default(), Some(&[0, 0][..]))
            .unwrap();
        let text = String::from_utf8(buffer).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "ORF_Q\tORF_A\tGIS\tPROF_Q\tPROF_A\tPSS");
        assert_eq!(lines[1], "YAL001C\tYBL002W\t-0.12\t-+-\t+-+\t0");
        assert_eq!(lines.len(), 3);
    }
}
