//! Streaming CSV encoding.
//!
//! [`CsvEncoder`] turns any iterator of [`CsvRecord`]s into an iterator of
//! byte chunks: the header row first, then one chunk per record. Nothing is
//! buffered beyond the record being encoded, so the chunks can be fed to an
//! HTTP body stream or to any [`std::io::Write`] sink.

use std::io;

use csv::{QuoteStyle, Writer, WriterBuilder};
use serde::Serialize;

use crate::{EngineError, ResultEngine};

/// A flat record with a fixed column schema.
///
/// The serialized field order must match `COLUMNS`.
pub trait CsvRecord: Serialize {
    const COLUMNS: &'static [&'static str];
}

pub struct CsvEncoder<I> {
    records: I,
    builder: WriterBuilder,
    header_written: bool,
    failed: bool,
}

impl<I, R> CsvEncoder<I>
where
    I: Iterator<Item = R>,
    R: CsvRecord,
{
    pub fn new<T>(records: T) -> Self
    where
        T: IntoIterator<IntoIter = I>,
    {
        let mut builder = WriterBuilder::new();
        builder
            .has_headers(false)
            .quote_style(QuoteStyle::Necessary)
            .buffer_capacity(256);

        Self {
            records: records.into_iter(),
            builder,
            header_written: false,
            failed: false,
        }
    }

    /// Drain the encoder into `out`, returning the number of data rows.
    pub fn write_to<W: io::Write>(self, mut out: W) -> ResultEngine<usize> {
        let mut chunks = 0usize;
        for chunk in self {
            out.write_all(&chunk?).map_err(csv::Error::from)?;
            chunks += 1;
        }
        out.flush().map_err(csv::Error::from)?;

        Ok(chunks.saturating_sub(1))
    }

    fn encode<F>(&self, write: F) -> Result<Vec<u8>, csv::Error>
    where
        F: FnOnce(&mut Writer<Vec<u8>>) -> Result<(), csv::Error>,
    {
        let mut writer = self.builder.from_writer(Vec::new());
        write(&mut writer)?;
        writer.into_inner().map_err(|err| {
            let cause = err.error();
            csv::Error::from(io::Error::new(cause.kind(), cause.to_string()))
        })
    }
}

impl<I, R> Iterator for CsvEncoder<I>
where
    I: Iterator<Item = R>,
    R: CsvRecord,
{
    type Item = Result<Vec<u8>, EngineError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }

        let chunk = if self.header_written {
            let record = self.records.next()?;
            self.encode(|writer| writer.serialize(&record))
        } else {
            self.header_written = true;
            self.encode(|writer| writer.write_record(R::COLUMNS))
        };

        if let Err(err) = &chunk {
            tracing::error!("failed to encode csv row: {err}");
            self.failed = true;
        }
        Some(chunk.map_err(EngineError::from))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    struct Row {
        name: String,
        amount: Option<i64>,
    }

    impl CsvRecord for Row {
        const COLUMNS: &'static [&'static str] = &["name", "amount"];
    }

    fn encode_all(rows: Vec<Row>) -> String {
        let mut out = Vec::new();
        CsvEncoder::new(rows).write_to(&mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn empty_input_yields_header_only() {
        assert_eq!(encode_all(Vec::new()), "name,amount\n");
    }

    #[test]
    fn one_chunk_per_record_after_header() {
        let rows = vec![
            Row {
                name: "a".to_string(),
                amount: Some(1),
            },
            Row {
                name: "b".to_string(),
                amount: None,
            },
        ];
        let chunks: Vec<Vec<u8>> = CsvEncoder::new(rows).map(Result::unwrap).collect();
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0], b"name,amount\n");
        assert_eq!(chunks[1], b"a,1\n");
        assert_eq!(chunks[2], b"b,\n");
    }

    #[test]
    fn special_characters_are_quoted() {
        let out = encode_all(vec![Row {
            name: "say \"hi\", then\nleave".to_string(),
            amount: Some(2),
        }]);
        assert_eq!(out, "name,amount\n\"say \"\"hi\"\", then\nleave\",2\n");
    }

    #[test]
    fn write_to_counts_data_rows() {
        assert_eq!(
            CsvEncoder::new(Vec::<Row>::new())
                .write_to(io::sink())
                .unwrap(),
            0
        );

        let rows = (0..4).map(|n| Row {
            name: n.to_string(),
            amount: Some(n),
        });
        assert_eq!(CsvEncoder::new(rows).write_to(io::sink()).unwrap(), 4);
    }
}
