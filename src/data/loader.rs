use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use arrow::array::{Array, ArrayRef, AsArray};
use arrow::datatypes::{DataType, Int16Type, Int32Type, Int64Type};
use arrow::record_batch::RecordBatch;
use arrow::util::display::array_value_to_string;
use bytes::Bytes;
use chrono::NaiveDate;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use parquet::file::reader::ChunkReader;
use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;
use serde::Deserialize;

use super::error::LoadError;
use super::model::{split_list, ContentType, Duration, TitleRecord, TitleTable};
use super::source::{Format, Source};

/// Formats accepted for `date_added`, tried in order.
const DATE_FORMATS: [&str; 3] = ["%B %d, %Y", "%b %d, %Y", "%Y-%m-%d"];

const USER_AGENT: &str = concat!("netflix-explorer/", env!("CARGO_PKG_VERSION"));

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load a title table from a local file or an `http(s)://` URL.
pub fn load(source: &Source) -> Result<TitleTable, LoadError> {
    match source {
        Source::File(path) => load_file(path),
        Source::Url(url) => load_url(url),
    }
}

/// Load a title table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – the Netflix titles layout with a header row
/// * `.json`    – `[{ "show_id": "s1", "type": "Movie", ... }, ...]`
/// * `.parquet` – same column names, string columns and integer `release_year`
pub fn load_file(path: &Path) -> Result<TitleTable, LoadError> {
    if !path.exists() {
        return Err(LoadError::NotFound {
            path: path.to_path_buf(),
        });
    }

    let ext = Source::from(path).extension().unwrap_or_default();
    let format = Format::from_extension(&ext).ok_or(LoadError::UnsupportedFormat(ext))?;

    let table = match format {
        Format::Csv => read_csv(open(path)?)?,
        Format::Json => read_json(open(path)?)?,
        Format::Parquet => read_parquet(open(path)?)?,
    };
    loaded(table, &path.display().to_string())
}

/// Download a dataset and decode it in memory.
///
/// The format comes from the URL path's extension. Links without one (a
/// Google Drive `uc?id=...` export, say) fall back to the `Content-Type`
/// header and then to CSV.
pub fn load_url(url: &str) -> Result<TitleTable, LoadError> {
    let client = Client::builder()
        .user_agent(USER_AGENT)
        .build()
        .map_err(|e| fetch_error(url, e))?;
    load_url_with(&client, url)
}

/// [`load_url`] with a caller-supplied HTTP client.
pub fn load_url_with(client: &Client, url: &str) -> Result<TitleTable, LoadError> {
    let from_path = match Source::Url(url.to_string()).extension() {
        Some(ext) => {
            let format = Format::from_extension(&ext).ok_or(LoadError::UnsupportedFormat(ext))?;
            Some(format)
        }
        None => None,
    };

    log::info!("Fetching dataset from {url}");
    let response = client
        .get(url)
        .send()
        .and_then(|r| r.error_for_status())
        .map_err(|e| fetch_error(url, e))?;

    let format = from_path
        .or_else(|| {
            response
                .headers()
                .get(CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
                .and_then(Format::from_content_type)
        })
        .unwrap_or(Format::Csv);

    let body = response.bytes().map_err(|e| fetch_error(url, e))?;
    log::debug!("Fetched {} bytes from {url} as {format:?}", body.len());
    loaded(read_bytes(body, format)?, url)
}

/// Decode an in-memory dataset.
pub fn read_bytes(body: Bytes, format: Format) -> Result<TitleTable, LoadError> {
    match format {
        Format::Csv => read_csv(&body[..]),
        Format::Json => read_json(&body[..]),
        Format::Parquet => read_parquet(body),
    }
}

fn loaded(table: TitleTable, origin: &str) -> Result<TitleTable, LoadError> {
    if table.is_empty() {
        return Err(LoadError::Empty {
            origin: origin.to_string(),
        });
    }

    log::info!(
        "Loaded {} titles from {} (release years {:?})",
        table.len(),
        origin,
        table.release_years
    );
    Ok(table)
}

fn fetch_error(url: &str, source: reqwest::Error) -> LoadError {
    LoadError::Fetch {
        url: url.to_string(),
        source,
    }
}

fn open(path: &Path) -> Result<File, LoadError> {
    File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}

// ---------------------------------------------------------------------------
// Raw row shared by every format
// ---------------------------------------------------------------------------

/// One source row before normalization. Unused dataset columns
/// (`director`, `cast`, `description`) are ignored.
#[derive(Debug, Default, Deserialize)]
struct RawTitleRow {
    show_id: Option<String>,
    #[serde(rename = "type")]
    kind: Option<String>,
    title: Option<String>,
    country: Option<String>,
    date_added: Option<String>,
    release_year: Option<i32>,
    rating: Option<String>,
    duration: Option<String>,
    listed_in: Option<String>,
}

impl RawTitleRow {
    fn into_record(self, row: usize) -> Result<TitleRecord, LoadError> {
        let invalid = |reason: String| LoadError::InvalidRecord { row, reason };

        let kind: ContentType = non_empty(self.kind.as_deref())
            .ok_or_else(|| invalid("missing 'type'".to_string()))?
            .parse()
            .map_err(invalid)?;
        let release_year = self
            .release_year
            .ok_or_else(|| invalid("missing 'release_year'".to_string()))?;

        let date_added = non_empty(self.date_added.as_deref()).and_then(|s| {
            let parsed = parse_date_added(s);
            if parsed.is_none() {
                log::debug!("row {row}: ignoring unparseable date_added '{s}'");
            }
            parsed
        });
        let duration = non_empty(self.duration.as_deref()).and_then(|s| Duration::parse(s, kind));

        Ok(TitleRecord {
            id: non_empty(self.show_id.as_deref())
                .map(str::to_string)
                .unwrap_or_else(|| format!("row{row}")),
            kind,
            title: self.title.map(|t| t.trim().to_string()).unwrap_or_default(),
            countries: split_list(self.country.as_deref()),
            date_added,
            release_year,
            rating: non_empty(self.rating.as_deref()).map(str::to_string),
            duration,
            genres: split_list(self.listed_in.as_deref()),
        })
    }
}

fn non_empty(s: Option<&str>) -> Option<&str> {
    s.map(str::trim).filter(|s| !s.is_empty())
}

/// Parse a `date_added` cell such as `" September 25, 2021"`.
pub fn parse_date_added(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// Read the Netflix titles CSV layout from any reader.
pub fn read_csv<R: Read>(reader: R) -> Result<TitleTable, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut records = Vec::new();
    for (row_no, result) in reader.deserialize::<RawTitleRow>().enumerate() {
        records.push(result?.into_record(row_no)?);
    }
    Ok(TitleTable::from_records(records))
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Records-oriented JSON, the default `df.to_json(orient='records')`.
pub fn read_json<R: Read>(reader: R) -> Result<TitleTable, LoadError> {
    let rows: Vec<RawTitleRow> = serde_json::from_reader(reader)?;
    let records = rows
        .into_iter()
        .enumerate()
        .map(|(i, row)| row.into_record(i))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(TitleTable::from_records(records))
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Read Parquet data (a file or fetched bytes) with the dataset's column names.
///
/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`).
pub fn read_parquet<R: ChunkReader + 'static>(input: R) -> Result<TitleTable, LoadError> {
    let reader = ParquetRecordBatchReaderBuilder::try_new(input)?.build()?;

    let mut records = Vec::new();
    for batch_result in reader {
        let batch = batch_result?;
        let offset = records.len();
        for row in 0..batch.num_rows() {
            let raw = raw_row_from_batch(&batch, row);
            records.push(raw.into_record(offset + row)?);
        }
    }
    Ok(TitleTable::from_records(records))
}

fn raw_row_from_batch(batch: &RecordBatch, row: usize) -> RawTitleRow {
    let text = |name: &str| string_at(batch.column_by_name(name), row);
    RawTitleRow {
        show_id: text("show_id"),
        kind: text("type"),
        title: text("title"),
        country: text("country"),
        date_added: text("date_added"),
        release_year: int_at(batch.column_by_name("release_year"), row)
            .and_then(|y| i32::try_from(y).ok()),
        rating: text("rating"),
        duration: text("duration"),
        listed_in: text("listed_in"),
    }
}

// -- Arrow helpers --

/// Extract a cell as text. Non-string columns are rendered with Arrow's
/// display formatting.
fn string_at(col: Option<&ArrayRef>, row: usize) -> Option<String> {
    let col = col?;
    if col.is_null(row) {
        return None;
    }
    match col.data_type() {
        DataType::Utf8 => col.as_string_opt::<i32>().map(|a| a.value(row).to_string()),
        DataType::LargeUtf8 => col.as_string_opt::<i64>().map(|a| a.value(row).to_string()),
        DataType::Utf8View => col.as_string_view_opt().map(|a| a.value(row).to_string()),
        _ => array_value_to_string(col, row).ok(),
    }
}

/// Extract an integer cell, parsing string columns when necessary.
fn int_at(col: Option<&ArrayRef>, row: usize) -> Option<i64> {
    let col = col?;
    if col.is_null(row) {
        return None;
    }
    match col.data_type() {
        DataType::Int16 => col
            .as_primitive_opt::<Int16Type>()
            .map(|a| a.value(row) as i64),
        DataType::Int32 => col
            .as_primitive_opt::<Int32Type>()
            .map(|a| a.value(row) as i64),
        DataType::Int64 => col.as_primitive_opt::<Int64Type>().map(|a| a.value(row)),
        _ => string_at(Some(col), row).and_then(|s| s.trim().parse().ok()),
    }
}

// ---------------------------------------------------------------------------
// Memoization by source
// ---------------------------------------------------------------------------

/// Keeps every table loaded so far, keyed by canonical path or URL.
#[derive(Debug, Default)]
pub struct DatasetCache {
    tables: HashMap<Source, Arc<TitleTable>>,
}

impl DatasetCache {
    /// Return the cached table for `source`, loading it on first use.
    pub fn load(&mut self, source: &Source) -> Result<Arc<TitleTable>, LoadError> {
        let key = cache_key(source);
        if let Some(table) = self.tables.get(&key) {
            log::debug!("Using cached dataset for {key}");
            return Ok(Arc::clone(table));
        }
        let table = Arc::new(load(source)?);
        self.tables.insert(key, Arc::clone(&table));
        Ok(table)
    }

    /// Drop any cached copy and read the source again.
    pub fn reload(&mut self, source: &Source) -> Result<Arc<TitleTable>, LoadError> {
        self.tables.remove(&cache_key(source));
        self.load(source)
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

fn cache_key(source: &Source) -> Source {
    match source {
        Source::File(path) => {
            Source::File(std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf()))
        }
        Source::Url(url) => Source::Url(url.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    const SAMPLE_CSV: &str = "\
show_id,type,title,director,cast,country,date_added,release_year,rating,duration,listed_in,description
s1,Movie,Dick Johnson Is Dead,Kirsten Johnson,,United States,\"September 25, 2021\",2020,PG-13,90 min,Documentaries,A documentary.
s2,TV Show,Blood & Water,,Ama Qamata,\"South Africa, United States\",\" September 24, 2021\",2021,TV-MA,2 Seasons,\"International TV Shows, TV Dramas\",A drama.
s3,Movie,Untitled,,,,,2019,,,,
";

    #[test]
    fn csv_rows_are_normalized() {
        let table = read_csv(SAMPLE_CSV.as_bytes()).unwrap();
        assert_eq!(table.len(), 3);
        assert_eq!(table.release_years, Some((2019, 2021)));

        let movie = &table.records[0];
        assert_eq!(movie.id, "s1");
        assert_eq!(movie.kind, ContentType::Movie);
        assert_eq!(movie.countries, vec!["United States".to_string()]);
        assert_eq!(movie.date_added, NaiveDate::from_ymd_opt(2021, 9, 25));
        assert_eq!(movie.duration, Some(Duration::Minutes(90)));
        assert_eq!(movie.rating.as_deref(), Some("PG-13"));

        let show = &table.records[1];
        assert_eq!(show.kind, ContentType::TvShow);
        assert_eq!(show.primary_country(), Some("South Africa"));
        assert_eq!(show.date_added, NaiveDate::from_ymd_opt(2021, 9, 24));
        assert_eq!(show.duration, Some(Duration::Seasons(2)));
        assert_eq!(show.genres.len(), 2);

        let sparse = &table.records[2];
        assert!(sparse.countries.is_empty());
        assert_eq!(sparse.date_added, None);
        assert_eq!(sparse.rating, None);
        assert_eq!(sparse.duration, None);
    }

    #[test]
    fn unknown_content_type_is_rejected() {
        let csv = "show_id,type,title,release_year\ns1,Podcast,Oops,2020\n";
        let err = read_csv(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, LoadError::InvalidRecord { row: 0, .. }));
    }

    #[test]
    fn date_formats() {
        let expected = NaiveDate::from_ymd_opt(2019, 1, 5);
        assert_eq!(parse_date_added("January 5, 2019"), expected);
        assert_eq!(parse_date_added(" Jan 5, 2019 "), expected);
        assert_eq!(parse_date_added("2019-01-05"), expected);
        assert_eq!(parse_date_added("sometime"), None);
    }

    #[test]
    fn json_records_load() {
        let json = r#"[
            {"show_id": "s1", "type": "Movie", "title": "A", "country": "India",
             "date_added": "March 1, 2020", "release_year": 2019, "rating": "TV-14",
             "duration": "120 min", "listed_in": "Dramas"},
            {"show_id": "s2", "type": "TV Show", "title": "B", "country": null,
             "release_year": 2018, "duration": "1 Season"}
        ]"#;
        let table = read_json(json.as_bytes()).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.records[0].duration_minutes(), Some(120));
        assert!(table.records[1].countries.is_empty());
        assert_eq!(table.records[1].date_added, None);
    }

    #[test]
    fn missing_file_is_not_found() {
        let err = load_file(Path::new("/definitely/not/here.csv")).unwrap_err();
        assert!(matches!(err, LoadError::NotFound { .. }));
    }

    #[test]
    fn unsupported_extension() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("titles.xlsx");
        fs::write(&path, b"whatever").unwrap();
        let err = load_file(&path).unwrap_err();
        assert!(matches!(err, LoadError::UnsupportedFormat(ext) if ext == "xlsx"));
    }

    #[test]
    fn header_only_csv_is_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("titles.csv");
        fs::write(&path, "show_id,type,title,release_year\n").unwrap();
        let err = load_file(&path).unwrap_err();
        assert!(matches!(err, LoadError::Empty { .. }));
    }

    fn sample_parquet() -> Vec<u8> {
        use arrow::array::{Int64Array, StringArray};
        use arrow::datatypes::{Field, Schema};
        use parquet::arrow::ArrowWriter;

        let schema = Arc::new(Schema::new(vec![
            Field::new("show_id", DataType::Utf8, false),
            Field::new("type", DataType::Utf8, false),
            Field::new("title", DataType::Utf8, false),
            Field::new("country", DataType::Utf8, true),
            Field::new("release_year", DataType::Int64, false),
            Field::new("duration", DataType::Utf8, true),
        ]));
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(StringArray::from(vec!["s1", "s2"])),
                Arc::new(StringArray::from(vec!["Movie", "TV Show"])),
                Arc::new(StringArray::from(vec!["A", "B"])),
                Arc::new(StringArray::from(vec![Some("Japan"), None])),
                Arc::new(Int64Array::from(vec![2001, 2015])),
                Arc::new(StringArray::from(vec![Some("101 min"), Some("3 Seasons")])),
            ],
        )
        .unwrap();

        let mut writer = ArrowWriter::try_new(Vec::new(), schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.into_inner().unwrap()
    }

    #[test]
    fn parquet_file_loads() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("titles.parquet");
        fs::write(&path, sample_parquet()).unwrap();

        let table = load_file(&path).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.records[0].primary_country(), Some("Japan"));
        assert_eq!(table.records[0].duration_minutes(), Some(101));
        assert_eq!(table.records[1].kind, ContentType::TvShow);
        assert_eq!(table.records[1].duration, Some(Duration::Seasons(3)));
        assert_eq!(table.release_years, Some((2001, 2015)));
    }

    #[test]
    fn parquet_bytes_load_in_memory() {
        let table = read_bytes(Bytes::from(sample_parquet()), Format::Parquet).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.release_years, Some((2001, 2015)));
    }

    #[test]
    fn padded_cells_are_trimmed() {
        let csv = "show_id,type,title,release_year,duration\ns1, Movie ,A, 2020 , 95 min\n";
        let table = read_csv(csv.as_bytes()).unwrap();
        assert_eq!(table.records[0].release_year, 2020);
        assert_eq!(table.records[0].kind, ContentType::Movie);
        assert_eq!(table.records[0].duration_minutes(), Some(95));
    }

    // -- URL sources, served from a loopback socket --

    /// Answer exactly one request on 127.0.0.1 and return the base URL.
    fn serve_once(status: &'static str, content_type: &'static str, body: Vec<u8>) -> String {
        use std::io::Write;
        use std::net::TcpListener;

        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        std::thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = stream.read(&mut buf).unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }
            let head = format!(
                "HTTP/1.1 {status}\r\nContent-Type: {content_type}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                body.len()
            );
            stream.write_all(head.as_bytes()).unwrap();
            stream.write_all(&body).unwrap();
        });
        format!("http://{addr}")
    }

    fn direct_client() -> Client {
        Client::builder().no_proxy().build().unwrap()
    }

    #[test]
    fn csv_url_is_fetched_and_parsed() {
        let base = serve_once("200 OK", "text/plain", SAMPLE_CSV.as_bytes().to_vec());
        let table = load_url_with(&direct_client(), &format!("{base}/netflix_titles.csv")).unwrap();
        assert_eq!(table, read_csv(SAMPLE_CSV.as_bytes()).unwrap());
    }

    #[test]
    fn url_without_extension_uses_content_type() {
        let base = serve_once("200 OK", "application/vnd.apache.parquet", sample_parquet());
        let table = load_url_with(&direct_client(), &format!("{base}/uc?id=abc")).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.records[1].kind, ContentType::TvShow);
    }

    #[test]
    fn url_without_extension_or_content_type_is_csv() {
        let base = serve_once(
            "200 OK",
            "application/octet-stream",
            SAMPLE_CSV.as_bytes().to_vec(),
        );
        let table = load_url_with(&direct_client(), &format!("{base}/uc?id=abc")).unwrap();
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn http_error_status_is_fetch_error() {
        let base = serve_once("404 Not Found", "text/plain", b"gone".to_vec());
        let url = format!("{base}/titles.csv");
        let err = load_url_with(&direct_client(), &url).unwrap_err();
        assert!(matches!(err, LoadError::Fetch { url: u, .. } if u == url));
    }

    #[test]
    fn refused_connection_is_fetch_error() {
        let port = std::net::TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap()
            .port();
        let url = format!("http://127.0.0.1:{port}/titles.csv");
        let err = load_url_with(&direct_client(), &url).unwrap_err();
        assert!(matches!(err, LoadError::Fetch { .. }));
    }

    #[test]
    fn unsupported_url_extension_fails_before_fetching() {
        let err = load(&Source::parse("http://127.0.0.1:9/titles.xlsx")).unwrap_err();
        assert!(matches!(err, LoadError::UnsupportedFormat(ext) if ext == "xlsx"));
    }

    #[test]
    fn url_source_is_not_treated_as_a_path() {
        // Port 9 (discard) on loopback refuses, so this fails at the fetch,
        // never with NotFound.
        let err = load(&Source::parse("http://127.0.0.1:9/uc?id=abc")).unwrap_err();
        assert!(matches!(err, LoadError::Fetch { .. }));
    }

    #[test]
    fn cache_returns_shared_table_until_reload() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("titles.csv");
        fs::write(&path, SAMPLE_CSV).unwrap();
        let source = Source::from(path.as_path());

        let mut cache = DatasetCache::default();
        let first = cache.load(&source).unwrap();
        let second = cache.load(&source).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.len(), 1);

        let reloaded = cache.reload(&source).unwrap();
        assert!(!Arc::ptr_eq(&first, &reloaded));
        assert_eq!(*first, *reloaded);
    }

    #[test]
    fn cache_is_keyed_by_url() {
        let url = Source::parse("http://127.0.0.1:9/titles.csv");
        let table = Arc::new(read_csv(SAMPLE_CSV.as_bytes()).unwrap());

        let mut cache = DatasetCache::default();
        cache.tables.insert(url.clone(), Arc::clone(&table));

        // Served from the cache, no request is made.
        let hit = cache.load(&url).unwrap();
        assert!(Arc::ptr_eq(&hit, &table));

        // Reload drops the entry and has to fetch.
        assert!(matches!(cache.reload(&url), Err(LoadError::Fetch { .. })));
        assert!(cache.is_empty());
    }
}
