//! Writes a synthetic early-stage diabetes dataset and a matching model
//! artifact into `data/`.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde_json::json;

const N_PATIENTS: usize = 520;
const SEED: u64 = 7;

/// Age effect used for the exported importance weight.
const AGE_WEIGHT: f64 = 0.10;

/// Symptom name with P(symptom | diabetic) and P(symptom | not diabetic).
const SYMPTOMS: [(&str, f64, f64); 14] = [
    ("Polyuria", 0.76, 0.08),
    ("Polydipsia", 0.70, 0.04),
    ("sudden weight loss", 0.59, 0.14),
    ("weakness", 0.68, 0.43),
    ("Polyphagia", 0.59, 0.24),
    ("Genital thrush", 0.26, 0.17),
    ("visual blurring", 0.55, 0.29),
    ("Itching", 0.48, 0.49),
    ("Irritability", 0.34, 0.08),
    ("delayed healing", 0.48, 0.43),
    ("partial paresis", 0.60, 0.16),
    ("muscle stiffness", 0.42, 0.30),
    ("Alopecia", 0.24, 0.50),
    ("Obesity", 0.19, 0.14),
];

/// P(male | diabetic), P(male | not diabetic).
const MALE: (f64, f64) = (0.45, 0.85);
const P_DIABETIC: f64 = 0.615;

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

    fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

fn py_bool(b: bool) -> &'static str {
    if b { "True" } else { "False" }
}

fn write_dataset(path: &Path, rng: &mut SimpleRng) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).context("creating dataset file")?;

    let mut header = vec!["Age", "Gender"];
    header.extend(SYMPTOMS.iter().map(|s| s.0));
    header.push("class");
    writer.write_record(&header)?;

    for _ in 0..N_PATIENTS {
        let diabetic = rng.chance(P_DIABETIC);
        let mean_age = if diabetic { 49.0 } else { 46.0 };
        let age = rng.gauss(mean_age, 12.0).round().clamp(16.0, 90.0) as i64;
        let male = rng.chance(if diabetic { MALE.0 } else { MALE.1 });

        let mut record = vec![age.to_string(), if male { "1" } else { "0" }.to_string()];
        for &(_, p_pos, p_neg) in &SYMPTOMS {
            let present = rng.chance(if diabetic { p_pos } else { p_neg });
            record.push(py_bool(present).to_string());
        }
        record.push(py_bool(diabetic).to_string());
        writer.write_record(&record)?;
    }

    writer.flush().context("writing dataset file")?;
    Ok(())
}

/// Importances proportional to how strongly each feature separates the
/// classes in the generator, normalised to sum to one.
fn write_model(path: &Path) -> Result<()> {
    let mut names = vec!["Age", "Gender"];
    let mut weights = vec![AGE_WEIGHT, (MALE.0 - MALE.1).abs()];
    for &(name, p_pos, p_neg) in &SYMPTOMS {
        names.push(name);
        weights.push((p_pos - p_neg).abs());
    }
    let total: f64 = weights.iter().sum();
    let importances: Vec<f64> = weights
        .iter()
        .map(|w| (w / total * 1e6).round() / 1e6)
        .collect();

    let artifact = json!({
        "model_type": "random_forest",
        "n_estimators": 100,
        "feature_names": names,
        "feature_importances": importances,
    });
    let mut text = serde_json::to_string_pretty(&artifact)?;
    text.push('\n');
    fs::write(path, text).context("writing model artifact")
}

fn main() -> Result<()> {
    let dir = Path::new("data");
    fs::create_dir_all(dir).context("creating data directory")?;

    let mut rng = SimpleRng::new(SEED);
    write_dataset(&dir.join("diabetes_clean.csv"), &mut rng)?;
    write_model(&dir.join("rf_model.json"))?;

    println!(
        "Wrote {N_PATIENTS} patients to data/diabetes_clean.csv and data/rf_model.json"
    );
    Ok(())
}
