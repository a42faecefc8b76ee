use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    pub data_dir: PathBuf,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub lexicon: LexiconConfig,
    #[serde(default)]
    pub provider: ProviderConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Cap on results taken from the local corpus.
    pub local_limit: usize,
    /// Cap on external results in general tourism mode.
    pub external_limit_tourism: usize,
    /// Cap on external results in utility and remote-municipality modes.
    pub external_limit_utility: usize,
    /// Below this many local hits the external provider is consulted.
    pub min_local_hits: usize,
    pub tourism_radius_m: u32,
    pub utility_radius_m: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Bound on each external provider call, connect and total.
    pub timeout_secs: u64,
    /// Appended to text searches so results stay scoped to the region.
    pub region_hint: String,
}

/// Word lists driving query interpretation. These are data, not control
/// flow: extending a list must never require touching engine logic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LexiconConfig {
    pub stopwords: Vec<String>,
    pub follow_up_markers: Vec<String>,
    /// Municipalities treated as remote. The capital municipality is the
    /// assistant's home base and is not in the default list.
    pub municipalities: Vec<String>,
    pub utility_terms: Vec<String>,
    pub live_data_terms: Vec<String>,
}

impl EngineConfig {
    /// Validate config values, returning errors for clearly broken configurations.
    pub fn validate(&self) -> Result<(), String> {
        if self.search.local_limit == 0 {
            return Err("search.local_limit must be > 0".into());
        }
        if self.search.external_limit_tourism == 0 || self.search.external_limit_utility == 0 {
            return Err("search external limits must be > 0".into());
        }
        if self.search.tourism_radius_m == 0 || self.search.utility_radius_m == 0 {
            return Err("search radii must be > 0".into());
        }
        if self.provider.timeout_secs == 0 {
            return Err("provider.timeout_secs must be > 0".into());
        }
        if self.lexicon.stopwords.is_empty() {
            return Err("lexicon.stopwords must not be empty".into());
        }
        if self.lexicon.municipalities.is_empty() {
            return Err("lexicon.municipalities must not be empty".into());
        }
        Ok(())
    }

    /// Load config from a JSON file, falling back to defaults for missing sections.
    pub fn from_file(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file: {}", e))?;
        let config: Self = serde_json::from_str(&content)
            .map_err(|e| format!("Failed to parse config: {}", e))?;
        config.validate()?;
        Ok(config)
    }

    /// Path of the curated corpus file inside the data directory.
    pub fn corpus_path(&self) -> PathBuf {
        self.data_dir.join("campeche.json")
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        let data_dir = if Path::new("data").exists() {
            PathBuf::from("data")
        } else {
            dirs::data_local_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("naaj")
        };

        Self {
            data_dir,
            search: SearchConfig::default(),
            lexicon: LexiconConfig::default(),
            provider: ProviderConfig::default(),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            local_limit: 5,
            external_limit_tourism: 3,
            external_limit_utility: 5,
            min_local_hits: 2,
            tourism_radius_m: 5000,
            utility_radius_m: 2000,
        }
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 10,
            region_hint: "Campeche, México".to_string(),
        }
    }
}

fn to_strings(words: &[&str]) -> Vec<String> {
    words.iter().map(|w| w.to_string()).collect()
}

impl Default for LexiconConfig {
    fn default() -> Self {
        Self {
            // Spanish function and filler words first, then the English ones
            // tourists actually type. Accented and plain forms both appear
            // because users type both.
            stopwords: to_strings(&[
                "el", "la", "los", "las", "un", "una", "unos", "unas", "del", "al",
                "en", "por", "para", "con", "sin", "que", "qué", "como", "cómo",
                "cual", "cuál", "donde", "dónde", "cuando", "cuándo", "quien",
                "quién", "es", "son", "esta", "está", "estan", "están", "hay",
                "ser", "estar", "mis", "tus", "sus", "les", "mas", "más", "muy",
                "pero", "también", "tambien", "quiero", "quisiera", "puedes",
                "puede", "dame", "dime", "recomiendame", "recomiéndame",
                "recomienda", "busco", "buscar", "necesito", "hola", "buenas",
                "buenos", "dias", "días", "tardes", "noches", "gracias", "favor",
                "cerca", "cercano", "cercanos", "lugar", "lugares",
                "the", "and", "for", "what", "where", "when", "how", "are", "you",
                "please", "hello", "thanks", "want", "find", "show", "tell",
                "can", "near", "nearby", "some", "any",
            ]),
            follow_up_markers: to_strings(&[
                "ese", "esa", "eso", "esos", "esas", "este", "aquel", "aquella",
                "otro", "otra", "otros", "otras", "mejor", "peor", "barato",
                "barata", "baratos", "caro", "cara", "caros", "mismo", "misma",
                "más barato", "mas barato", "más cerca", "mas cerca",
                "that one", "this one", "cheaper", "better", "another", "same",
                "closer",
            ]),
            municipalities: to_strings(&[
                "Calakmul", "Calkiní", "Candelaria", "Carmen", "Champotón",
                "Dzitbalché", "Escárcega", "Hecelchakán", "Hopelchén",
                "Palizada", "Seybaplaya", "Tenabo",
            ]),
            utility_terms: to_strings(&[
                "cajero", "cajeros", "atm", "banco", "bancos", "farmacia",
                "farmacias", "hospital", "hospitales", "clinica", "clínica",
                "doctor", "medico", "médico", "policia", "policía",
                "emergencia", "emergencias", "gasolinera", "gasolineras",
                "ambulancia", "pharmacy", "police", "bank",
            ]),
            live_data_terms: to_strings(&[
                "abierto", "abierta", "abiertos", "horario", "horarios",
                "transporte", "autobus", "autobús", "combi", "taxi", "rating",
                "calificacion", "calificación", "reseñas", "resenas", "precio",
                "precios", "costo", "cuesta", "open", "schedule", "price",
            ]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(EngineConfig::default().validate().is_ok());
    }

    #[test]
    fn test_zero_local_limit_rejected() {
        let mut config = EngineConfig::default();
        config.search.local_limit = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_file_falls_back_to_defaults() {
        let dir = std::env::temp_dir().join("naaj-config-test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("partial.json");
        std::fs::write(&path, r#"{"data_dir": "/tmp/naaj-data"}"#).unwrap();

        let config = EngineConfig::from_file(&path).unwrap();
        assert_eq!(config.search.local_limit, 5);
        assert!(!config.lexicon.stopwords.is_empty());
    }

    #[test]
    fn test_home_municipality_not_remote() {
        let config = EngineConfig::default();
        assert!(!config
            .lexicon
            .municipalities
            .iter()
            .any(|m| m.eq_ignore_ascii_case("campeche")));
    }
}
