use crate::question::RawQuestion;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

const JSON_FENCE_OPEN: &str = "```json";
const FENCE: &str = "```";

/// Remove markdown code fences for the `json` language from a model response.
///
/// Every literal "```json" and "```" is dropped, then surrounding whitespace
/// is trimmed. Nothing else in the text is touched.
pub fn strip_code_fences(raw: &str) -> String {
    raw.replace(JSON_FENCE_OPEN, "")
        .replace(FENCE, "")
        .trim()
        .to_string()
}

/// Clean `raw` and deserialize it as `T`.
#[instrument(target = "quizzify::json", skip(raw), fields(raw_len = raw.len()))]
pub fn parse_cleaned<T: DeserializeOwned>(raw: &str) -> Result<T, serde_json::Error> {
    let cleaned = strip_code_fences(raw);
    let parsed = serde_json::from_str::<T>(&cleaned);
    if let Err(e) = &parsed {
        debug!(
            target: "quizzify::json",
            error = %e,
            cleaned_len = cleaned.len(),
            "failed to decode JSON"
        );
    }
    parsed
}

/// Decode a model response into a question candidate.
pub fn parse_question(raw: &str) -> Result<RawQuestion, serde_json::Error> {
    parse_cleaned::<RawQuestion>(raw)
}
