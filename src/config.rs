use anyhow::Result;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub inference: InferenceConfig,
    pub capture: CaptureConfig,
    pub preview: PreviewConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InferenceConfig {
    /// Voice analysis endpoint (multipart field "file")
    pub voice_url: String,
    /// Drawing analysis endpoint (multipart field "image")
    pub drawing_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CaptureConfig {
    pub sample_rate: u32,
    pub channels: u16,
    pub buffer_duration_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PreviewConfig {
    /// Directory for transient preview files
    pub cache_dir: String,
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path))
            .build()?;

        Ok(settings.try_deserialize()?)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            inference: InferenceConfig {
                voice_url: "http://localhost:5000/predict".to_string(),
                drawing_url: "http://127.0.0.1:5000/predict_spiral".to_string(),
                timeout_secs: 30,
            },
            capture: CaptureConfig {
                sample_rate: 16000,
                channels: 1,
                buffer_duration_ms: 100,
            },
            preview: PreviewConfig {
                cache_dir: std::env::temp_dir()
                    .join("neuroscreen-previews")
                    .display()
                    .to_string(),
            },
        }
    }
}
