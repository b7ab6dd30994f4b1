use crate::core::instance_header::InstanceHeader;
use crate::core::instances::{DenseInstance, Instance};
use crate::streams::arff::parser::{RowDecoder, is_skippable, parse_header};
use crate::streams::stream::Stream;
use std::fs::File;
use std::io::{BufRead, BufReader, Error, Seek, SeekFrom};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::warn;

/// Reads an ARFF file lazily.
///
/// One instance is decoded ahead, so [`Stream::has_more_instances`] stays
/// accurate when the file ends in malformed lines. Those lines are logged
/// and skipped.
#[derive(Debug)]
pub struct ArffFileStream {
    path: PathBuf,
    reader: BufReader<File>,
    header: Arc<InstanceHeader>,
    decoder: RowDecoder,
    data_offset: u64,
    line_number: usize,
    lookahead: Option<DenseInstance>,
}

impl ArffFileStream {
    /// Opens `path` and parses its header. `class_index` of `None` picks the
    /// last attribute.
    pub fn new(path: PathBuf, class_index: Option<usize>) -> Result<Self, Error> {
        let mut reader = BufReader::new(File::open(&path)?);
        let (header, data_offset) = parse_header(&mut reader, class_index)?;
        let decoder = RowDecoder::for_header(&header)?;

        let mut stream = Self {
            path,
            reader,
            header: Arc::new(header),
            decoder,
            data_offset,
            line_number: 0,
            lookahead: None,
        };
        stream.advance()?;
        Ok(stream)
    }

    pub fn header_arc(&self) -> Arc<InstanceHeader> {
        Arc::clone(&self.header)
    }

    /// Decodes the next valid data line into the lookahead slot, leaving it
    /// empty at end of file.
    fn advance(&mut self) -> Result<(), Error> {
        self.lookahead = None;
        let mut line = String::new();
        loop {
            line.clear();
            if self.reader.read_line(&mut line)? == 0 {
                return Ok(());
            }
            self.line_number += 1;
            if is_skippable(&line) {
                continue;
            }
            match self.decoder.decode(line.trim()) {
                Ok(values) => {
                    self.lookahead = Some(DenseInstance::new(self.header_arc(), values, 1.0));
                    return Ok(());
                }
                Err(error) => warn!(
                    path = %self.path.display(),
                    data_line = self.line_number,
                    %error,
                    "skipping malformed ARFF line"
                ),
            }
        }
    }
}

impl Stream for ArffFileStream {
    fn header(&self) -> &InstanceHeader {
        &self.header
    }

    fn has_more_instances(&self) -> bool {
        self.lookahead.is_some()
    }

    fn next_instance(&mut self) -> Option<Box<dyn Instance>> {
        let current = self.lookahead.take()?;
        if let Err(error) = self.advance() {
            warn!(path = %self.path.display(), %error, "read failed, ending stream");
        }
        Some(Box::new(current))
    }

    fn restart(&mut self) -> Result<(), Error> {
        let mut reader = BufReader::new(File::open(&self.path)?);
        reader.seek(SeekFrom::Start(self.data_offset))?;
        self.reader = reader;
        self.line_number = 0;
        self.advance()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::io::{ErrorKind, Write};
    use tempfile::{NamedTempFile, tempdir};

    const WEATHER: &str = "% the classic toy set
@relation weather
@attribute outlook {sunny, overcast, rainy}
@attribute temperature numeric
@attribute humidity numeric
@attribute windy {TRUE, FALSE}
@attribute play {yes, no}

@data
sunny,85,85,FALSE,no
% mid-data comment
sunny,80,90,TRUE,no
overcast,83,86,FALSE,yes
rainy,70,96,FALSE,yes
?,75,?,TRUE,yes
";

    fn arff_file(contents: &str) -> NamedTempFile {
        let mut f = NamedTempFile::new().unwrap();
        f.write_all(contents.as_bytes()).unwrap();
        f
    }

    fn open(contents: &str, class_index: Option<usize>) -> (NamedTempFile, ArffFileStream) {
        let file = arff_file(contents);
        let stream = ArffFileStream::new(file.path().to_path_buf(), class_index).unwrap();
        (file, stream)
    }

    fn drain(stream: &mut ArffFileStream) -> Vec<Vec<f64>> {
        std::iter::from_fn(|| stream.next_instance())
            .map(|inst| inst.to_vec())
            .collect()
    }

    #[test]
    fn reads_every_row_then_restarts() {
        let (_file, mut stream) = open(WEATHER, None);
        assert_eq!(stream.header().relation_name(), "weather");
        assert_eq!(stream.header().class_index(), 4);

        let rows = drain(&mut stream);
        assert_eq!(rows.len(), 5);
        assert_eq!(rows[0], vec![0.0, 85.0, 85.0, 1.0, 1.0]);
        assert!(rows[4][0].is_nan() && rows[4][2].is_nan());
        assert!(!stream.has_more_instances());

        stream.restart().unwrap();
        assert!(stream.has_more_instances());
        assert_eq!(drain(&mut stream), rows);
    }

    #[test]
    fn opening_errors_keep_their_kind() {
        let missing = ArffFileStream::new("no/such/file.arff".into(), None).unwrap_err();
        assert_eq!(missing.kind(), ErrorKind::NotFound);

        let cases = [
            ("@relation r\n@attribute a numeric\n", ErrorKind::UnexpectedEof),
            ("@relation r\n@foo bar\n@data\n1\n", ErrorKind::InvalidData),
            ("@relation r\n@attribute o {sunny, rainy\n@data\n", ErrorKind::InvalidData),
        ];
        for (contents, kind) in cases {
            let file = arff_file(contents);
            let err = ArffFileStream::new(file.path().to_path_buf(), None).unwrap_err();
            assert_eq!(err.kind(), kind, "{contents:?}");
        }
    }

    #[test]
    fn malformed_lines_are_skipped() {
        let (_file, mut stream) = open(
            "@relation r\n@attribute x numeric\n@attribute c {a, b}\n@data\nabc,a\n1,z\n2,b\n3\n",
            None,
        );
        assert!(stream.has_more_instances());
        assert_eq!(drain(&mut stream), vec![vec![2.0, 1.0]]);
    }

    #[test]
    fn only_malformed_lines_means_no_instances() {
        let (_file, mut stream) = open("@relation r\n@attribute x numeric\n@data\nabc\n", None);
        assert!(!stream.has_more_instances());
        assert!(stream.next_instance().is_none());
    }

    #[test]
    fn class_defaults_to_last_attribute_and_strings_are_missing() {
        let (_file, mut stream) = open(
            "@relation r\n@attribute note string\n@attribute x real\n@attribute c {a, b}\n@data\n'free text',1.5,b\n",
            None,
        );
        assert_eq!(stream.header_arc().number_of_classes(), 2);
        let inst = stream.next_instance().unwrap();
        assert!(inst.is_missing_at_index(0).unwrap());
        assert_eq!(inst.value_at_index(1), Some(1.5));
        assert_eq!(inst.class_value(), Some(1.0));
    }

    #[cfg(unix)]
    #[test]
    fn read_failure_ends_the_stream() {
        let (_file, mut stream) = open("@relation r\n@attribute a numeric\n@data\n1\n2\n3\n", None);
        assert_eq!(stream.next_instance().unwrap().to_vec(), vec![1.0]);

        let dir = tempdir().unwrap();
        stream.reader = BufReader::new(File::open(dir.path()).unwrap());
        assert_eq!(stream.next_instance().unwrap().to_vec(), vec![2.0]);
        assert!(!stream.has_more_instances());
    }

    #[cfg(not(windows))]
    #[test]
    fn restart_after_file_removed_returns_err() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("data.arff");
        fs::write(&path, "@relation r\n@attribute x numeric\n@data\n1\n").unwrap();
        let mut stream = ArffFileStream::new(path.clone(), Some(0)).unwrap();
        fs::remove_file(&path).unwrap();
        assert_eq!(stream.restart().unwrap_err().kind(), ErrorKind::NotFound);
    }
}
