use std::{env, fs, path::Path};

use json_typegen::{naming, CollisionPolicy, DiscriminatorOrder, GenerateSettings};

fn main() {
    const FIXTURES: &str = "fixtures";
    const OUTPUT_RUST: &str = "generated.rs";

    const SETTINGS: &str = "fixtures/settings";

    println!("cargo:rerun-if-changed={FIXTURES}");
    println!("cargo:rerun-if-changed={SETTINGS}");

    let mut fixtures: Vec<_> = fs::read_dir(FIXTURES)
        .unwrap()
        .map(|entry| entry.unwrap().path())
        .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
        .collect();
    fixtures.sort();

    let mut contents = String::new();
    for path in &fixtures {
        let stem = path.file_stem().unwrap().to_string_lossy().to_string();
        let sample = fs::read_to_string(path).unwrap();
        // `fixtures/settings/<stem>.json` overrides the defaults for one fixture
        let overrides = Path::new(SETTINGS).join(format!("{stem}.json"));
        let settings = match overrides.exists() {
            true => GenerateSettings::load(&overrides).unwrap_or_else(|error| panic!("{error}")),
            false => GenerateSettings::default(),
        };
        let unit = json_typegen::generate(&stem, &naming::resolve(&stem), &sample, &settings)
            .unwrap_or_else(|error| panic!("{}: {error}", path.display()));
        contents.push_str(&unit.source);
        contents.push('\n');
    }

    // The same library sample, classified in document order.
    let legacy = GenerateSettings {
        discriminator_order: DiscriminatorOrder::DocumentOrder,
        on_collision: CollisionPolicy::Merge,
        ..GenerateSettings::default()
    };
    let sample = fs::read_to_string(Path::new(FIXTURES).join("library.json")).unwrap();
    let unit = json_typegen::generate("library_document_order", "Library", &sample, &legacy).unwrap();
    contents.push_str(&unit.source);

    let out_file = Path::new(&env::var("OUT_DIR").unwrap()).join(OUTPUT_RUST);
    fs::write(out_file, contents).unwrap();
}
