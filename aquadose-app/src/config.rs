use anyhow::{anyhow, Context, Result};
use aquadose_core::validation;
use aquadose_schemas::{
    additive::Additive,
    fertilizer::{DosingEvent, FertilizerComposition},
    file_formats::{AdditiveFile, AquariumFile, DosingLogFile, FertilizerFile, WaterSourceFile},
    tank::Aquarium,
    water::WaterSourceProfile,
};
use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};

/// Everything the calculators read from disk: the fertilizer inventory,
/// water sources, remineralizers, aquariums and their dosing journals.
pub struct KnowledgeBase {
    pub fertilizers: HashMap<String, FertilizerComposition>,
    pub water_sources: HashMap<String, WaterSourceProfile>,
    pub additives: HashMap<String, Additive>,
    pub aquariums: HashMap<String, Aquarium>,
    /// Dosing events keyed by aquarium id.
    pub journal: HashMap<String, Vec<DosingEvent>>,
}

impl KnowledgeBase {
    /// Loads all data from the specified base directory.
    pub fn load(base_path: &str) -> Result<Self> {
        eprintln!("Loading knowledge base from '{}'...", base_path);

        let fertilizers = load_yaml_files_into_map(
            Path::new(base_path).join("1_fertilizers"),
            |file: FertilizerFile| file.fertilizers,
            |item: &FertilizerComposition| item.fertilizer_id.clone(),
        )?;
        let water_sources = load_yaml_files_into_map(
            Path::new(base_path).join("2_water_sources"),
            |file: WaterSourceFile| file.water_sources,
            |item: &WaterSourceProfile| item.source_id.clone(),
        )?;
        let additives = load_yaml_files_into_map(
            Path::new(base_path).join("3_additives"),
            |file: AdditiveFile| file.additives,
            |item: &Additive| item.additive_id.clone(),
        )?;
        let aquariums = load_yaml_files_into_map(
            Path::new(base_path).join("4_aquariums"),
            |file: AquariumFile| file.aquariums,
            |item: &Aquarium| item.aquarium_id.clone(),
        )?;

        let mut journal: HashMap<String, Vec<DosingEvent>> = HashMap::new();
        for (_, file) in load_yaml_files::<DosingLogFile>(Path::new(base_path).join("5_journal"))? {
            journal.entry(file.aquarium_id).or_default().extend(file.events);
        }

        let kb = Self {
            fertilizers,
            water_sources,
            additives,
            aquariums,
            journal,
        };
        kb.validate()?;

        eprintln!(
            "Knowledge base loaded: {} fertilizers, {} water sources, {} additives, {} aquariums.",
            kb.fertilizers.len(),
            kb.water_sources.len(),
            kb.additives.len(),
            kb.aquariums.len()
        );
        Ok(kb)
    }

    fn validate(&self) -> Result<()> {
        for fertilizer in self.fertilizers.values() {
            validation::validate_composition(fertilizer)
                .with_context(|| format!("Invalid fertilizer '{}'", fertilizer.fertilizer_id))?;
        }
        for source in self.water_sources.values() {
            validation::validate_water_source(source)
                .with_context(|| format!("Invalid water source '{}'", source.source_id))?;
        }
        for aquarium in self.aquariums.values() {
            validation::validate_setup(&aquarium.setup)
                .with_context(|| format!("Invalid setup for aquarium '{}'", aquarium.aquarium_id))?;
            if let Some(source_id) = &aquarium.water_source_id {
                if !self.water_sources.contains_key(source_id) {
                    return Err(anyhow!(
                        "Aquarium '{}' refers to unknown water source '{}'",
                        aquarium.aquarium_id,
                        source_id
                    ));
                }
            }
        }
        for aquarium_id in self.journal.keys() {
            if !self.aquariums.contains_key(aquarium_id) {
                eprintln!(
                    "Warning: journal entries for unknown aquarium '{}' are ignored.",
                    aquarium_id
                );
            }
        }
        Ok(())
    }

    pub fn aquarium(&self, aquarium_id: &str) -> Result<&Aquarium> {
        self.aquariums.get(aquarium_id).ok_or_else(|| {
            let mut known: Vec<&str> = self.aquariums.keys().map(String::as_str).collect();
            known.sort();
            anyhow!(
                "Unknown aquarium '{}'. Known aquariums: {}",
                aquarium_id,
                known.join(", ")
            )
        })
    }

    pub fn water_source(&self, source_id: &str) -> Result<&WaterSourceProfile> {
        self.water_sources
            .get(source_id)
            .ok_or_else(|| anyhow!("Unknown water source '{}'", source_id))
    }

    pub fn additive(&self, additive_id: &str) -> Result<&Additive> {
        self.additives
            .get(additive_id)
            .ok_or_else(|| anyhow!("Unknown additive '{}'", additive_id))
    }

    pub fn fertilizer(&self, fertilizer_id: &str) -> Result<&FertilizerComposition> {
        self.fertilizers
            .get(fertilizer_id)
            .ok_or_else(|| anyhow!("Unknown fertilizer '{}'", fertilizer_id))
    }

    /// Dosing history of an aquarium; empty when nothing was logged.
    pub fn events_for(&self, aquarium_id: &str) -> &[DosingEvent] {
        self.journal.get(aquarium_id).map_or(&[], Vec::as_slice)
    }
}

/// Parses every YAML file in a directory into its file wrapper type.
fn load_yaml_files<F>(dir_path: impl AsRef<Path>) -> Result<Vec<(PathBuf, F)>>
where
    F: for<'de> serde::Deserialize<'de>,
{
    let mut paths = Vec::new();
    for entry in fs::read_dir(dir_path.as_ref())
        .with_context(|| format!("Failed to read directory: {:?}", dir_path.as_ref()))?
    {
        let path = entry?.path();
        if path.is_file() && path.extension().map_or(false, |s| s == "yaml" || s == "yml") {
            paths.push(path);
        }
    }
    // Later files override earlier ones, so the order must not depend on the filesystem.
    paths.sort();

    paths
        .into_iter()
        .map(|path| {
            let content = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read {:?}", path))?;
            let file_wrapper: F = serde_yaml::from_str(&content)
                .with_context(|| format!("Failed to parse YAML from {:?}", path))?;
            Ok((path, file_wrapper))
        })
        .collect()
}

/// Generic helper to load all YAML files in a directory into a HashMap.
fn load_yaml_files_into_map<P, F, E, T, K>(
    dir_path: P,
    extract_vec: E,
    get_key: K,
) -> Result<HashMap<String, T>>
where
    P: AsRef<Path>,
    F: for<'de> serde::Deserialize<'de>, // The file wrapper struct (e.g., FertilizerFile)
    E: Fn(F) -> Vec<T>,                  // A closure to extract the Vec<T> from the wrapper
    K: Fn(&T) -> String,                 // A closure to get the key for the map from an item T
{
    let mut map = HashMap::new();
    for (_, file_wrapper) in load_yaml_files::<F>(dir_path)? {
        for item in extract_vec(file_wrapper) {
            map.insert(get_key(&item), item);
        }
    }
    Ok(map)
}

#[cfg(test)]
mod tests {
    use super::*;
    use aquadose_schemas::{fertilizer::DoseUnit, tank::PlantDensity};

    fn write(dir: &Path, sub: &str, name: &str, content: &str) {
        let sub_dir = dir.join(sub);
        fs::create_dir_all(&sub_dir).unwrap();
        fs::write(sub_dir.join(name), content).unwrap();
    }

    fn scratch_dir(label: &str) -> PathBuf {
        let dir = std::env::temp_dir()
            .join(format!("aquadose_kb_{}_{}", label, std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn seed(dir: &Path) {
        write(
            dir,
            "1_fertilizers",
            "macros.yaml",
            r#"
schema_version: "1.0"
fertilizers:
  - fertilizer_id: FERT-KNO3
    name: KNO3 solution
    unit: ml
    ppm_per_unit:
      nitrogen: 100.0
      potassium: 280.0
"#,
        );
        write(
            dir,
            "2_water_sources",
            "tap.yaml",
            r#"
schema_version: "1.0"
water_sources:
  - source_id: WATER-TAP
    name: City tap
    gh: 12.0
    kh: 8.0
    ph: 7.6
    nitrate: 8.86
"#,
        );
        write(
            dir,
            "3_additives",
            "salts.yml",
            r#"
schema_version: "1.0"
additives:
  - additive_id: ADD-GHKH
    name: GH/KH+ salt
    tds_per_gram_per_liter: 27.0
    gh_per_gram_per_liter: 1.5
    kh_per_gram_per_liter: 0.75
"#,
        );
        write(
            dir,
            "4_aquariums",
            "tanks.yaml",
            r#"
schema_version: "1.0"
aquariums:
  - aquarium_id: TANK-60P
    name: Nano
    water_source_id: WATER-TAP
    setup:
      volume_liters: 60.0
      plant_density: high
      light_level: medium
      has_co2: true
"#,
        );
        write(
            dir,
            "5_journal",
            "a.yaml",
            r#"
schema_version: "1.0"
aquarium_id: TANK-60P
events:
  - fertilizer_id: FERT-KNO3
    amount: 2.0
    date: 2024-06-10
"#,
        );
        write(
            dir,
            "5_journal",
            "b.yaml",
            r#"
schema_version: "1.0"
aquarium_id: TANK-60P
events:
  - fertilizer_id: FERT-KNO3
    amount: 3.0
    date: 2024-06-12
"#,
        );
        fs::write(dir.join("5_journal").join("notes.txt"), "not yaml").unwrap();
    }

    #[test]
    fn loads_every_section() {
        let dir = scratch_dir("full");
        seed(&dir);
        let kb = KnowledgeBase::load(dir.to_str().unwrap()).unwrap();

        let kno3 = kb.fertilizer("FERT-KNO3").unwrap();
        assert_eq!(kno3.unit, DoseUnit::Ml);
        assert_eq!(kno3.ppm_per_unit.phosphorus, 0.0);
        assert_eq!(kb.water_source("WATER-TAP").unwrap().gh, Some(12.0));
        assert!(kb.water_source("WATER-TAP").unwrap().sodium.is_none());
        assert_eq!(kb.additive("ADD-GHKH").unwrap().gh_per_gram_per_liter, 1.5);
        assert_eq!(kb.aquarium("TANK-60P").unwrap().setup.plant_density, PlantDensity::High);
        assert_eq!(kb.events_for("TANK-60P").len(), 2);
        assert!(kb.events_for("TANK-NONE").is_empty());

        let err = kb.aquarium("TANK-NONE").unwrap_err().to_string();
        assert!(err.contains("TANK-60P"));
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn invalid_water_source_fails_the_load() {
        let dir = scratch_dir("bad_ph");
        seed(&dir);
        write(
            &dir,
            "2_water_sources",
            "tap.yaml",
            r#"
schema_version: "1.0"
water_sources:
  - source_id: WATER-TAP
    name: Broken meter
    ph: 15.2
"#,
        );
        assert!(KnowledgeBase::load(dir.to_str().unwrap()).is_err());
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn unknown_enum_values_are_rejected() {
        let dir = scratch_dir("bad_enum");
        seed(&dir);
        write(
            &dir,
            "4_aquariums",
            "tanks.yaml",
            r#"
schema_version: "1.0"
aquariums:
  - aquarium_id: TANK-X
    name: Jungle
    setup:
      volume_liters: 200.0
      plant_density: overgrown
      light_level: medium
      has_co2: false
"#,
        );
        assert!(KnowledgeBase::load(dir.to_str().unwrap()).is_err());
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn negative_or_nan_strengths_fail_the_load() {
        for (label, strength) in [("neg_ppm", "-5.0"), ("nan_ppm", ".nan")] {
            let dir = scratch_dir(label);
            seed(&dir);
            write(
                &dir,
                "1_fertilizers",
                "macros.yaml",
                &format!(
                    r#"
schema_version: "1.0"
fertilizers:
  - fertilizer_id: FERT-KNO3
    name: KNO3 solution
    unit: ml
    ppm_per_unit:
      nitrogen: 100.0
      potassium: {}
"#,
                    strength
                ),
            );
            let err = KnowledgeBase::load(dir.to_str().unwrap()).err().unwrap();
            assert!(format!("{:#}", err).contains("FERT-KNO3"));
            fs::remove_dir_all(&dir).unwrap();
        }
    }
}
