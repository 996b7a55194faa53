use serde::Deserialize;

/// Wire shape of the inference service's JSON body. Every field is optional
/// at the parse stage; which ones are required depends on the HTTP status
/// and the pathway, so the client decides after parsing.
#[derive(Debug, Deserialize)]
pub struct PredictionBody {
    /// Body-level success marker. Only the drawing endpoint sets it.
    pub status: Option<String>,

    /// Server-provided failure message.
    pub error: Option<String>,

    pub confidence: Option<f64>,

    #[serde(rename = "isAffected")]
    pub is_affected: Option<bool>,

    /// Free-form extra detail some endpoints attach on success.
    pub result: Option<serde_json::Value>,
}

/// A successfully parsed and accepted prediction.
#[derive(Debug, Clone)]
pub struct Prediction {
    pub confidence: f64,
    pub is_affected: bool,
    pub result: Option<serde_json::Value>,
}
