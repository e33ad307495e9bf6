//! CSV decoding into [`PriceTable`]

use super::models::{PriceTable, PRICE_COLUMN, TIMESTAMP_COLUMN, VOLUME_COLUMN};
use super::timestamp::parse_timestamp;
use crate::error::{AppError, Result};
use csv::{ReaderBuilder, StringRecord, Trim};
use std::io::Read;
use tracing::debug;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Cell values read as missing data
const MISSING_MARKERS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Column positions resolved from the header row
struct Layout {
    price: usize,
    volume: usize,
    timestamp: Option<usize>,
}

impl Layout {
    fn from_headers(headers: &StringRecord) -> Result<Self> {
        let find = |name: &str| headers.iter().position(|h| h == name);

        let price = find(PRICE_COLUMN)
            .ok_or_else(|| AppError::MissingColumn(PRICE_COLUMN.to_string()))?;
        let volume = find(VOLUME_COLUMN)
            .ok_or_else(|| AppError::MissingColumn(VOLUME_COLUMN.to_string()))?;

        Ok(Self {
            price,
            volume,
            timestamp: find(TIMESTAMP_COLUMN),
        })
    }
}

impl PriceTable {
    /// Decode an in-memory CSV document
    pub fn from_csv_bytes(bytes: &[u8]) -> Result<Self> {
        let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
        Self::from_reader(bytes)
    }

    /// Decode a headered CSV stream
    ///
    /// Requires `price` and `volume` columns; `timestamp` is optional and
    /// other columns are ignored.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .trim(Trim::All)
            .from_reader(reader);

        let layout = Layout::from_headers(reader.headers()?)?;
        let mut table = PriceTable {
            timestamps: layout.timestamp.map(|_| Vec::new()),
            ..Default::default()
        };

        for (index, record) in reader.records().enumerate() {
            let record = record?;
            let row = index + 1;

            table.prices.push(parse_number(&record, layout.price, PRICE_COLUMN, row)?);
            table.volumes.push(parse_number(&record, layout.volume, VOLUME_COLUMN, row)?);

            if let (Some(column), Some(timestamps)) = (layout.timestamp, table.timestamps.as_mut()) {
                timestamps.push(parse_time(&record, column, row)?);
            }
        }

        debug!(
            "Decoded {} rows (timestamp column: {})",
            table.len(),
            table.has_timestamps()
        );

        Ok(table)
    }
}

fn cell<'r>(record: &'r StringRecord, column: usize) -> &'r str {
    record.get(column).unwrap_or("")
}

fn is_missing(raw: &str) -> bool {
    MISSING_MARKERS.contains(&raw)
}

fn parse_number(record: &StringRecord, column: usize, name: &str, row: usize) -> Result<f64> {
    let raw = cell(record, column);
    if is_missing(raw) {
        return Ok(f64::NAN);
    }

    raw.parse::<f64>().map_err(|_| {
        AppError::Parse(format!(
            "Non-numeric value {:?} in column '{}' at row {}",
            raw, name, row
        ))
    })
}

fn parse_time(
    record: &StringRecord,
    column: usize,
    row: usize,
) -> Result<Option<chrono::NaiveDateTime>> {
    let raw = cell(record, column);
    if is_missing(raw) {
        return Ok(None);
    }

    let ts = parse_timestamp(raw).ok_or_else(|| {
        AppError::Parse(format!(
            "Unrecognized timestamp {:?} in column '{}' at row {}",
            raw, TIMESTAMP_COLUMN, row
        ))
    })?;

    // Bucketing works on nanosecond timestamps (1677-09-21 to 2262-04-11)
    if ts.and_utc().timestamp_nanos_opt().is_none() {
        return Err(AppError::Parse(format!(
            "Timestamp {:?} in column '{}' at row {} is out of range",
            raw, TIMESTAMP_COLUMN, row
        )));
    }

    Ok(Some(ts))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_with_timestamps() {
        let csv = "timestamp,price,volume\n2024-01-01T00:00:00,100,10\n2024-01-01T01:00:00,110,20\n";
        let table = PriceTable::from_csv_bytes(csv.as_bytes()).unwrap();

        assert_eq!(table.len(), 2);
        assert_eq!(table.prices, vec![100.0, 110.0]);
        assert_eq!(table.volumes, vec![10.0, 20.0]);

        let timestamps = table.timestamps.unwrap();
        assert_eq!(timestamps.len(), 2);
        assert!(timestamps.iter().all(Option::is_some));
    }

    #[test]
    fn test_columns_in_any_order_with_extras() {
        let csv = " volume , symbol, price \n5,BTC,42.5\n";
        let table = PriceTable::from_csv_bytes(csv.as_bytes()).unwrap();

        assert!(!table.has_timestamps());
        assert_eq!(table.prices, vec![42.5]);
        assert_eq!(table.volumes, vec![5.0]);
    }

    #[test]
    fn test_bom_is_ignored() {
        let csv = "\u{feff}price,volume\n1,2\n";
        let table = PriceTable::from_csv_bytes(csv.as_bytes()).unwrap();
        assert_eq!(table.prices, vec![1.0]);
    }

    #[test]
    fn test_missing_required_column() {
        let err = PriceTable::from_csv_bytes(b"timestamp,price\n2024-01-01,1\n").unwrap_err();
        assert!(matches!(err, AppError::MissingColumn(ref c) if c == "volume"));

        let err = PriceTable::from_csv_bytes(b"volume\n1\n").unwrap_err();
        assert!(matches!(err, AppError::MissingColumn(ref c) if c == "price"));

        let err = PriceTable::from_csv_bytes(b"").unwrap_err();
        assert!(matches!(err, AppError::MissingColumn(_)));
    }

    #[test]
    fn test_missing_cells_become_nan() {
        let csv = "price,volume\n1,\nNA,3\n";
        let table = PriceTable::from_csv_bytes(csv.as_bytes()).unwrap();

        assert!(table.volumes[0].is_nan());
        assert!(table.prices[1].is_nan());
        assert_eq!(table.volumes[1], 3.0);
    }

    #[test]
    fn test_non_numeric_value() {
        let err = PriceTable::from_csv_bytes(b"price,volume\n1,2\nabc,3\n").unwrap_err();
        match err {
            AppError::Parse(msg) => {
                assert!(msg.contains("'price'"));
                assert!(msg.contains("row 2"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_blank_and_bad_timestamps() {
        let csv = "timestamp,price,volume\n,1,2\n2024-01-01,3,4\n";
        let table = PriceTable::from_csv_bytes(csv.as_bytes()).unwrap();
        let timestamps = table.timestamps.unwrap();
        assert!(timestamps[0].is_none());
        assert!(timestamps[1].is_some());

        let err = PriceTable::from_csv_bytes(b"timestamp,price,volume\nsoon,1,2\n").unwrap_err();
        assert!(matches!(err, AppError::Parse(_)));
    }

    #[test]
    fn test_out_of_range_timestamp() {
        let csv = "timestamp,price,volume\n2024-01-01,1,1\n2300-01-01T00:00:00,1,1\n";
        let err = PriceTable::from_csv_bytes(csv.as_bytes()).unwrap_err();
        match err {
            AppError::Parse(msg) => {
                assert!(msg.contains("row 2"), "{}", msg);
                assert!(msg.contains("out of range"), "{}", msg);
            }
            other => panic!("unexpected error: {:?}", other),
        }

        let edge = "timestamp,price,volume\n2262-04-11,1,1\n";
        let table = PriceTable::from_csv_bytes(edge.as_bytes()).unwrap();
        assert!(table.timestamps.unwrap()[0].is_some());
    }

    #[test]
    fn test_ragged_rows_are_csv_errors() {
        let err = PriceTable::from_csv_bytes(b"price,volume\n1,2,3\n").unwrap_err();
        assert!(matches!(err, AppError::Csv(_)));
    }

    #[test]
    fn test_header_only_is_empty_table() {
        let table = PriceTable::from_csv_bytes(b"timestamp,price,volume\n").unwrap();
        assert!(table.is_empty());
        assert_eq!(table.timestamps, Some(vec![]));
    }
}
