use std::fs::File;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use chrono::NaiveDate;
use parquet::arrow::ArrowWriter;

use netflix_explorer::data::export;
use netflix_explorer::data::model::{ContentType, Duration, TitleRecord, TitleTable};

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Uniform integer in `lo..=hi`.
    fn range(&mut self, lo: u32, hi: u32) -> u32 {
        lo + (self.next_u64() % u64::from(hi - lo + 1)) as u32
    }

    fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        &items[(self.next_u64() % items.len() as u64) as usize]
    }

    fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }
}

/// (country, typical movie length in minutes)
const COUNTRIES: [(&str, u32); 8] = [
    ("United States", 100),
    ("India", 130),
    ("United Kingdom", 95),
    ("Japan", 105),
    ("South Korea", 115),
    ("Canada", 92),
    ("Spain", 98),
    ("France", 102),
];
const MOVIE_RATINGS: [&str; 6] = ["G", "PG", "PG-13", "R", "TV-14", "TV-MA"];
const SHOW_RATINGS: [&str; 4] = ["TV-Y7", "TV-PG", "TV-14", "TV-MA"];
const MOVIE_GENRES: [&str; 5] = [
    "Dramas",
    "Comedies",
    "Documentaries",
    "Action & Adventure",
    "International Movies",
];
const SHOW_GENRES: [&str; 4] = [
    "TV Dramas",
    "TV Comedies",
    "Docuseries",
    "International TV Shows",
];

fn generate(rng: &mut SimpleRng, n: usize) -> Vec<TitleRecord> {
    (0..n)
        .map(|i| {
            // Roughly the catalogue's 70/30 movie/show split.
            let kind = if rng.chance(0.7) {
                ContentType::Movie
            } else {
                ContentType::TvShow
            };
            let release_year = 1990 + rng.range(0, 31) as i32;
            let added_year = (release_year + rng.range(0, 4) as i32).clamp(2008, 2021);
            let date_added = if rng.chance(0.95) {
                NaiveDate::from_ymd_opt(added_year, rng.range(1, 12), rng.range(1, 28))
            } else {
                None
            };

            let &(country, typical) = rng.pick(&COUNTRIES);
            let mut countries = Vec::new();
            if rng.chance(0.9) {
                countries.push(country.to_string());
                if rng.chance(0.15) {
                    countries.push(rng.pick(&COUNTRIES).0.to_string());
                }
            }

            let (rating, duration, genre) = match kind {
                ContentType::Movie => (
                    *rng.pick(&MOVIE_RATINGS),
                    Duration::Minutes(typical + rng.range(0, 40) - 20),
                    *rng.pick(&MOVIE_GENRES),
                ),
                ContentType::TvShow => (
                    *rng.pick(&SHOW_RATINGS),
                    Duration::Seasons(rng.range(1, 6)),
                    *rng.pick(&SHOW_GENRES),
                ),
            };

            TitleRecord {
                id: format!("s{}", i + 1),
                kind,
                title: format!("{} #{}", kind.label(), i + 1),
                countries,
                date_added,
                release_year,
                rating: rng.chance(0.98).then(|| rating.to_string()),
                duration: rng.chance(0.98).then_some(duration),
                genres: vec![genre.to_string()],
            }
        })
        .collect()
}

fn write_parquet(table: &TitleTable, path: &Path) -> Result<()> {
    let text = |f: &dyn Fn(&TitleRecord) -> Option<String>| -> ArrayRef {
        Arc::new(StringArray::from(
            table.iter().map(f).collect::<Vec<Option<String>>>(),
        ))
    };

    let schema = Arc::new(Schema::new(vec![
        Field::new("show_id", DataType::Utf8, false),
        Field::new("type", DataType::Utf8, false),
        Field::new("title", DataType::Utf8, false),
        Field::new("country", DataType::Utf8, true),
        Field::new("date_added", DataType::Utf8, true),
        Field::new("release_year", DataType::Int64, false),
        Field::new("rating", DataType::Utf8, true),
        Field::new("duration", DataType::Utf8, true),
        Field::new("listed_in", DataType::Utf8, true),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            text(&|r| Some(r.id.clone())),
            text(&|r| Some(r.kind.label().to_string())),
            text(&|r| Some(r.title.clone())),
            text(&|r| (!r.countries.is_empty()).then(|| r.countries.join(", "))),
            text(&|r| r.date_added.map(|d| d.format("%B %-d, %Y").to_string())),
            Arc::new(Int64Array::from(
                table
                    .iter()
                    .map(|r| i64::from(r.release_year))
                    .collect::<Vec<_>>(),
            )),
            text(&|r| r.rating.clone()),
            text(&|r| r.duration.map(|d| d.to_string())),
            text(&|r| Some(r.genres.join(", "))),
        ],
    )
    .context("building record batch")?;

    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing parquet batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);
    let table = TitleTable::from_records(generate(&mut rng, 2000));

    let csv_path = Path::new("sample_titles.csv");
    export::export_csv(&table, csv_path).context("writing sample CSV")?;

    let parquet_path = Path::new("sample_titles.parquet");
    write_parquet(&table, parquet_path)?;

    println!(
        "Wrote {} titles to {} and {}",
        table.len(),
        csv_path.display(),
        parquet_path.display()
    );
    Ok(())
}
