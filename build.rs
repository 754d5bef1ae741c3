use std::env;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Demo firmware settings that may be overridden from `.env`, with their defaults.
const DEMO_SETTINGS: [(&str, u32); 3] = [
    ("CYCLE_INTERVAL_MS", 20),
    ("DOTSTAR_BRIGHTNESS", 64),
    ("STATUS_INTERVAL_MS", 5_000),
];

fn main() {
    let _ = dotenvy::from_filename(".env");

    println!("cargo:rerun-if-changed=.env");
    println!("cargo:rerun-if-changed=build.rs");

    for (key, _) in DEMO_SETTINGS {
        println!("cargo:rerun-if-env-changed={key}");
    }

    generate_demo_settings();

    embuild::espidf::sysenv::output();
}

fn generate_demo_settings() {
    let out_dir = env::var("OUT_DIR").unwrap();
    let dest_path = Path::new(&out_dir).join("demo_settings.rs");
    let mut f = File::create(&dest_path).unwrap();

    writeln!(f, "// Auto-generated demo firmware settings").unwrap();
    writeln!(f).unwrap();

    for (key, default) in DEMO_SETTINGS {
        let value = match std::env::var(key) {
            Ok(raw) => match raw.trim().parse::<u32>() {
                Ok(parsed) => parsed,
                Err(_) => {
                    println!("cargo:warning={key}={raw} is not a number, using {default}");
                    default
                }
            },
            Err(_) => default,
        };
        writeln!(f, "pub const {key}: u32 = {value};").unwrap();
    }
}
