//! Configuration for the RAG service

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::generation::{PromptTemplate, DEFAULT_PROMPT_TEMPLATE};

/// Main RAG service configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RagConfig {
    /// Backend provider (gemini or ollama)
    pub backend: BackendProvider,
    /// Server configuration
    pub server: ServerConfig,
    /// Source document configuration
    pub data: DataConfig,
    /// Chunking configuration
    pub chunking: ChunkingConfig,
    /// Retrieval configuration
    pub retrieval: RetrievalConfig,
    /// Prompt configuration
    pub prompt: PromptConfig,
    /// Gemini configuration (used when backend = gemini)
    pub gemini: GeminiConfig,
    /// Ollama configuration (used when backend = ollama)
    pub ollama: OllamaConfig,
}

impl RagConfig {
    /// Load configuration.
    ///
    /// Reads `.env` if present, then the TOML file at `path` (if any), then
    /// applies `RAG_*` and API key environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        dotenvy::dotenv().ok();

        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };

        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Parse configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Failed to read config {}: {}", path.display(), e))
        })?;
        Self::from_toml(&content)
    }

    /// Parse configuration from a TOML string
    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Apply overrides from a key lookup (normally the process environment)
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(dir) = lookup("RAG_DATA_DIR") {
            self.data.dir = PathBuf::from(dir);
        }
        if let Some(host) = lookup("RAG_HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("RAG_PORT") {
            self.server.port = port
                .parse()
                .map_err(|_| Error::Config(format!("Invalid RAG_PORT: {}", port)))?;
        }
        if let Some(top_k) = lookup("RAG_TOP_K") {
            self.retrieval.top_k = top_k
                .parse()
                .map_err(|_| Error::Config(format!("Invalid RAG_TOP_K: {}", top_k)))?;
        }
        if let Some(backend) = lookup("RAG_BACKEND") {
            self.backend = backend.parse()?;
        }

        // GOOGLE_API_KEY wins over GEMINI_API_KEY; either wins over the file.
        // Blank values count as unset.
        let non_blank = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        if let Some(key) = non_blank("GOOGLE_API_KEY").or_else(|| non_blank("GEMINI_API_KEY")) {
            self.gemini.api_key = Some(key);
        }

        Ok(())
    }

    /// Check the configuration for values the pipeline cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.chunking.chunk_size == 0 {
            return Err(Error::Config("chunk_size must be greater than 0".to_string()));
        }
        if self.chunking.chunk_overlap >= self.chunking.chunk_size {
            return Err(Error::Config(format!(
                "chunk_overlap ({}) must be smaller than chunk_size ({})",
                self.chunking.chunk_overlap, self.chunking.chunk_size
            )));
        }
        if self.retrieval.top_k == 0 {
            return Err(Error::Config("top_k must be greater than 0".to_string()));
        }
        PromptTemplate::new(self.prompt.template.as_str())?;
        if self.backend == BackendProvider::Gemini && self.gemini.api_key.is_none() {
            return Err(Error::Config(
                "Gemini backend selected but GOOGLE_API_KEY (or GEMINI_API_KEY) is not set"
                    .to_string(),
            ));
        }
        Ok(())
    }
}

/// Backend provider selection
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BackendProvider {
    /// Google Generative Language API (embeddings + Gemini)
    #[default]
    Gemini,
    /// Local Ollama server
    Ollama,
}

impl BackendProvider {
    /// Lowercase name as used in config files
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Gemini => "gemini",
            Self::Ollama => "ollama",
        }
    }
}

impl FromStr for BackendProvider {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "gemini" | "google" => Ok(Self::Gemini),
            "ollama" | "local" => Ok(Self::Ollama),
            other => Err(Error::Config(format!("Unknown backend: {}", other))),
        }
    }
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host address
    pub host: String,
    /// Port number
    pub port: u16,
    /// Enable CORS for browser frontends
    pub enable_cors: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
            enable_cors: true,
        }
    }
}

/// Source document configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// Directory holding the documents to index
    pub dir: PathBuf,
    /// File extension to index (without dot)
    pub extension: String,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("data"),
            extension: "txt".to_string(),
        }
    }
}

/// Text chunking configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkingConfig {
    /// Maximum chunk size in characters
    pub chunk_size: usize,
    /// Overlap between neighbouring chunks in characters
    pub chunk_overlap: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size: 500,
            chunk_overlap: 100,
        }
    }
}

/// Retrieval configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    /// Number of chunks stuffed into the prompt
    pub top_k: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self { top_k: 4 }
    }
}

/// Prompt configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PromptConfig {
    /// Template with `{context}` and `{question}` placeholders
    pub template: String,
}

impl Default for PromptConfig {
    fn default() -> Self {
        Self {
            template: DEFAULT_PROMPT_TEMPLATE.to_string(),
        }
    }
}

/// Gemini (Generative Language API) configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeminiConfig {
    /// API base URL
    pub base_url: String,
    /// API key, normally taken from GOOGLE_API_KEY
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    /// Embedding model
    pub embedding_model: String,
    /// Generation model
    pub generation_model: String,
    /// Temperature for generation
    pub temperature: f32,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Texts per batchEmbedContents call
    pub embed_batch_size: usize,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            api_key: None,
            embedding_model: "models/embedding-001".to_string(),
            generation_model: "gemini-1.5-flash".to_string(),
            temperature: 0.7,
            timeout_secs: 60,
            embed_batch_size: 100,
        }
    }
}

/// Ollama configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OllamaConfig {
    /// Ollama base URL
    pub base_url: String,
    /// Embedding model name
    pub embed_model: String,
    /// Generation model name
    pub generate_model: String,
    /// Temperature for generation
    pub temperature: f32,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:11434".to_string(),
            embed_model: "nomic-embed-text".to_string(),
            generate_model: "llama3.2:3b".to_string(),
            temperature: 0.7,
            timeout_secs: 120,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn with_key(mut config: RagConfig) -> RagConfig {
        config.gemini.api_key = Some("test-key".to_string());
        config
    }

    #[test]
    fn test_defaults() {
        let config = RagConfig::default();
        assert_eq!(config.chunking.chunk_size, 500);
        assert_eq!(config.chunking.chunk_overlap, 100);
        assert_eq!(config.retrieval.top_k, 4);
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.data.dir, PathBuf::from("data"));
        assert_eq!(config.backend, BackendProvider::Gemini);
        assert_eq!(config.gemini.generation_model, "gemini-1.5-flash");
    }

    #[test]
    fn test_partial_toml() {
        let config = RagConfig::from_toml(
            r#"
            backend = "ollama"

            [server]
            port = 8080

            [chunking]
            chunk_size = 300
            "#,
        )
        .unwrap();

        assert_eq!(config.backend, BackendProvider::Ollama);
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.chunking.chunk_size, 300);
        assert_eq!(config.chunking.chunk_overlap, 100);
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            ("RAG_DATA_DIR", "/tmp/docs"),
            ("RAG_PORT", "9000"),
            ("RAG_TOP_K", "2"),
            ("GEMINI_API_KEY", "from-gemini"),
        ]
        .into_iter()
        .collect();

        let mut config = RagConfig::default();
        config
            .apply_overrides(|k| env.get(k).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.data.dir, PathBuf::from("/tmp/docs"));
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.retrieval.top_k, 2);
        assert_eq!(config.gemini.api_key.as_deref(), Some("from-gemini"));
    }

    #[test]
    fn test_google_key_preferred() {
        let env: HashMap<&str, &str> =
            [("GOOGLE_API_KEY", "google"), ("GEMINI_API_KEY", "gemini")]
                .into_iter()
                .collect();

        let mut config = RagConfig::default();
        config
            .apply_overrides(|k| env.get(k).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.gemini.api_key.as_deref(), Some("google"));
    }

    #[test]
    fn test_blank_google_key_falls_back() {
        let env: HashMap<&str, &str> = [("GOOGLE_API_KEY", ""), ("GEMINI_API_KEY", "real")]
            .into_iter()
            .collect();

        let mut config = RagConfig::default();
        config
            .apply_overrides(|k| env.get(k).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.gemini.api_key.as_deref(), Some("real"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ask-rag.toml");
        std::fs::write(
            &path,
            r#"
            backend = "ollama"

            [data]
            dir = "/srv/notes"

            [retrieval]
            top_k = 6

            [ollama]
            generate_model = "mistral"
            "#,
        )
        .unwrap();

        let config = RagConfig::from_file(&path).unwrap();
        assert_eq!(config.backend, BackendProvider::Ollama);
        assert_eq!(config.data.dir, PathBuf::from("/srv/notes"));
        assert_eq!(config.data.extension, "txt");
        assert_eq!(config.retrieval.top_k, 6);
        assert_eq!(config.ollama.generate_model, "mistral");
        assert_eq!(config.ollama.embed_model, "nomic-embed-text");
    }

    #[test]
    fn test_from_file_errors() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            RagConfig::from_file(&dir.path().join("missing.toml")),
            Err(Error::Config(_))
        ));

        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "[server]\nport = \"not a number\"").unwrap();
        assert!(matches!(RagConfig::from_file(&path), Err(Error::Config(_))));
    }

    #[test]
    fn test_file_then_env_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ask-rag.toml");
        std::fs::write(&path, "[server]\nport = 8080\nhost = \"0.0.0.0\"").unwrap();

        let mut config = RagConfig::from_file(&path).unwrap();
        config
            .apply_overrides(|k| (k == "RAG_PORT").then(|| "9090".to_string()))
            .unwrap();

        assert_eq!(config.server.port, 9090);
        assert_eq!(config.server.host, "0.0.0.0");
    }

    #[test]
    fn test_bad_port_override() {
        let mut config = RagConfig::default();
        let result = config.apply_overrides(|k| (k == "RAG_PORT").then(|| "abc".to_string()));
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_validate() {
        assert!(with_key(RagConfig::default()).validate().is_ok());

        // Gemini without a key
        assert!(RagConfig::default().validate().is_err());

        let mut config = with_key(RagConfig::default());
        config.chunking.chunk_overlap = 500;
        assert!(config.validate().is_err());

        let mut config = with_key(RagConfig::default());
        config.retrieval.top_k = 0;
        assert!(config.validate().is_err());

        let mut config = with_key(RagConfig::default());
        config.prompt.template = "Question: {question}".to_string();
        assert!(config.validate().is_err());

        let mut config = RagConfig::default();
        config.backend = BackendProvider::Ollama;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_api_key_not_serialized() {
        let config = with_key(RagConfig::default());
        let rendered = toml::to_string(&config).unwrap();
        assert!(!rendered.contains("test-key"));
    }

    #[test]
    fn test_backend_from_str() {
        assert_eq!("Gemini".parse::<BackendProvider>().unwrap(), BackendProvider::Gemini);
        assert_eq!("local".parse::<BackendProvider>().unwrap(), BackendProvider::Ollama);
        assert!("openai".parse::<BackendProvider>().is_err());
    }
}
