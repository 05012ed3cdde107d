use std::{
    fs::File,
    io::{self, Read},
    path::Path,
};

use crate::error::LandsatError;
use csv::{Reader, StringRecord, StringRecordsIntoIter};

/// Fields a catalog row must carry for a scene to be resolved from it.
pub const MIN_FIELDS: usize = 11;

/// One row of the scene catalog, addressed by position.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SceneRecord {
    fields: Vec<String>,
}

impl SceneRecord {
    pub fn new<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            fields: fields.into_iter().map(Into::into).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn field(&self, idx: usize) -> Option<&str> {
        self.fields.get(idx).map(String::as_str)
    }

    pub fn id(&self) -> Option<&str> {
        self.field(0)
    }
}

impl From<&StringRecord> for SceneRecord {
    fn from(rec: &StringRecord) -> Self {
        SceneRecord::new(rec.iter())
    }
}

/// Lazy reader over a comma separated scene list.
///
/// The header row is consumed when the catalog is opened. Rows that fail to parse are logged and
/// skipped. The underlying reader is dropped as soon as the stream is exhausted.
pub struct Catalog<R: Read> {
    rows: Option<StringRecordsIntoIter<R>>,
    header: StringRecord,
}

impl Catalog<File> {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, LandsatError> {
        let path = path.as_ref();
        let f = File::open(path)?;
        log::info!("Reading scene list: {:?}", path);
        Self::from_reader(f)
    }
}

impl<R: Read> Catalog<R> {
    pub fn from_reader(rdr: R) -> Result<Self, LandsatError> {
        let mut rdr = Reader::from_reader(rdr);
        let header = rdr.headers()?.clone();

        if header.is_empty() {
            let err = io::Error::new(io::ErrorKind::UnexpectedEof, "scene list has no header row");
            return Err(err.into());
        }

        Ok(Self {
            rows: Some(rdr.into_records()),
            header,
        })
    }

    pub fn header(&self) -> &StringRecord {
        &self.header
    }
}

impl<R: Read> Iterator for Catalog<R> {
    type Item = SceneRecord;

    fn next(&mut self) -> Option<SceneRecord> {
        loop {
            let rows = self.rows.as_mut()?;

            match rows.next() {
                Some(Ok(rec)) => return Some(SceneRecord::from(&rec)),
                Some(Err(err)) => {
                    log::warn!("Error reading csv line: {}", err);
                    continue;
                }
                None => {
                    self.rows = None;
                    return None;
                }
            }
        }
    }
}
