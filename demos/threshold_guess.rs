// demos/threshold_guess.rs
//
// Run with `RUST_LOG=threshold_guess=debug` to follow extraction and elimination.
use ndarray::{Array1, Array2};
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;
use threshold_guess::{NamedMatrix, ThresholdGuessBinarizer, ThresholdGuessConfig, Transformer};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // Three classes separated mostly by `petal`; `noise` carries no signal.
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(0);
    let n = 90;
    let mut x = Array2::zeros((n, 3));
    let mut y = Array1::zeros(n);
    for i in 0..n {
        let class = i % 3;
        y[i] = class as f64;
        x[[i, 0]] = 4.0 + class as f64 * 1.5 + rng.gen_range(-0.6..0.6);
        x[[i, 1]] = 3.0 - class as f64 * 0.2 + rng.gen_range(-0.5..0.5);
        x[[i, 2]] = rng.gen_range(0.0..1.0);
    }
    let data = NamedMatrix::new(x, ["petal", "sepal", "noise"]).unwrap();

    let config: ThresholdGuessConfig = serde_json::from_str(
        r#"{
            "learning_rate": 0.1,
            "n_estimators": 20,
            "max_depth": 2,
            "random_state": 0,
            "column_elimination": true
        }"#,
    )
    .unwrap();
    println!("Config: {:?}", config);

    let mut binarizer = ThresholdGuessBinarizer::with_config(config);
    binarizer.fit_named(&data, y.view()).unwrap();
    let binary = binarizer.transform(data.view()).unwrap();

    println!("Output shape: {:?}", binary.dim());
    for name in binarizer.feature_names_out().unwrap() {
        println!("  {}", name);
    }
    let names = binarizer.feature_names_in().unwrap();
    for (feature, columns) in binarizer.feature_map().unwrap().iter() {
        println!("{} -> columns {:?}", names[feature], columns);
    }
}
