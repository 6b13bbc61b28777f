use std::sync::Arc;

use arrow::array::{ArrayRef, Float64Array, Int32Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

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

    fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        &items[(self.next_u64() % items.len() as u64) as usize]
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

struct Row {
    bioregion: String,
    subzone: String,
    island: String,
    order: String,
    family: String,
    functional_group: String,
    season: String,
    year: i32,
    biomass: f64,
    site: String,
    species: String,
    latitude: f64,
    longitude: f64,
}

fn main() {
    let mut rng = SimpleRng::new(42);

    // (bioregion, subzone, islands)
    let geography: [(&str, &str, &[&str]); 3] = [
        ("Norte", "Lejano Norte", &["Darwin", "Wolf"]),
        (
            "Centro-sureste",
            "Centro",
            &["Santa Cruz", "Santiago", "Española", "Floreana"],
        ),
        ("Occidente", "Oeste", &["Isabela", "Fernandina"]),
    ];

    // (order, family, species, functional group, mean biomass)
    let taxa: [(&str, &str, &str, &str, f64); 6] = [
        (
            "Perciformes",
            "Serranidae",
            "Mycteroperca olfax",
            "Depredador",
            6.0,
        ),
        (
            "Perciformes",
            "Labridae",
            "Semicossyphus darwini",
            "Carnívoro",
            3.0,
        ),
        (
            "Perciformes",
            "Scaridae",
            "Scarus ghobban",
            "Herbívoro",
            4.5,
        ),
        (
            "Perciformes",
            "Pomacentridae",
            "Stegastes beebei",
            "Herbívoro",
            1.2,
        ),
        (
            "Carcharhiniformes",
            "Carcharhinidae",
            "Carcharhinus galapagensis",
            "Depredador",
            8.0,
        ),
        (
            "Clupeiformes",
            "Clupeidae",
            "Opisthonema berlangai",
            "Planctívoro",
            2.0,
        ),
    ];

    let seasons = ["Fría", "Caliente"];
    let years: Vec<i32> = (2004..=2019).collect();

    let mut rows: Vec<Row> = Vec::new();
    for _ in 0..600 {
        let (bioregion, subzone, islands) = rng.pick(&geography);
        let island = rng.pick(islands);
        let (order, family, species, group, mean) = rng.pick(&taxa);
        let site_no = 1 + (rng.next_u64() % 5) as usize;

        rows.push(Row {
            bioregion: bioregion.to_string(),
            subzone: subzone.to_string(),
            island: island.to_string(),
            order: order.to_string(),
            family: family.to_string(),
            functional_group: group.to_string(),
            season: rng.pick(&seasons).to_string(),
            year: *rng.pick(&years),
            biomass: rng.gauss(*mean, mean * 0.4).max(0.0),
            site: format!("{}-{site_no:02}", &island[..3].to_uppercase()),
            species: species.to_string(),
            latitude: rng.gauss(-0.6, 0.5),
            longitude: rng.gauss(-90.5, 0.5),
        });
    }

    let schema = Arc::new(Schema::new(vec![
        Field::new("Bioregion", DataType::Utf8, false),
        Field::new("Subzone.name", DataType::Utf8, false),
        Field::new("Island", DataType::Utf8, false),
        Field::new("ORDER", DataType::Utf8, false),
        Field::new("Family", DataType::Utf8, false),
        Field::new("Functional.Group", DataType::Utf8, false),
        Field::new("epoca", DataType::Utf8, false),
        Field::new("year", DataType::Int32, false),
        Field::new("Biomass.250m2", DataType::Float64, false),
        Field::new("site", DataType::Utf8, false),
        Field::new("species", DataType::Utf8, false),
        Field::new("latitude", DataType::Float64, false),
        Field::new("longitude", DataType::Float64, false),
    ]));

    let string_col = |f: fn(&Row) -> &str| -> ArrayRef {
        Arc::new(StringArray::from(rows.iter().map(f).collect::<Vec<_>>()))
    };

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            string_col(|r| &r.bioregion),
            string_col(|r| &r.subzone),
            string_col(|r| &r.island),
            string_col(|r| &r.order),
            string_col(|r| &r.family),
            string_col(|r| &r.functional_group),
            string_col(|r| &r.season),
            Arc::new(Int32Array::from(
                rows.iter().map(|r| r.year).collect::<Vec<_>>(),
            )) as ArrayRef,
            Arc::new(Float64Array::from(
                rows.iter().map(|r| r.biomass).collect::<Vec<_>>(),
            )) as ArrayRef,
            string_col(|r| &r.site),
            string_col(|r| &r.species),
            Arc::new(Float64Array::from(
                rows.iter().map(|r| r.latitude).collect::<Vec<_>>(),
            )) as ArrayRef,
            Arc::new(Float64Array::from(
                rows.iter().map(|r| r.longitude).collect::<Vec<_>>(),
            )) as ArrayRef,
        ],
    )
    .expect("Failed to create RecordBatch");

    let output_path = "data/fish.parquet";
    std::fs::create_dir_all("data").expect("Failed to create data directory");
    let file = std::fs::File::create(output_path).expect("Failed to create output file");
    let mut writer = ArrowWriter::try_new(file, schema, None).expect("Failed to create writer");
    writer.write(&batch).expect("Failed to write batch");
    writer.close().expect("Failed to close writer");

    println!("Wrote {} survey records to {output_path}", rows.len());
}
