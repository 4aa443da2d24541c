//! AI suggestion client.
//!
//! Every operation calls the text generator exactly once and never fails:
//! transport errors, bad status codes, empty replies and unparseable JSON all
//! collapse to the zero value of the result type inside [`or_zero`].

use std::future::Future;
use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::analysis::{CharacteristicId, SuggestionPatch};
use crate::clients::traits::{GenerationError, GenerationRequest, TextGenerator};
use crate::prompts;
use crate::schemas;

/// Tenor/vehicle pair from structure detection. Empty strings when unknown.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructureSuggestion {
    pub tenor: String,
    pub vehicle: String,
}

#[derive(Deserialize)]
struct StructureReply {
    #[serde(default)]
    tenor: Option<String>,
    #[serde(default)]
    vehicle: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ItemsReply {
    Object {
        #[serde(default)]
        items: Option<Vec<String>>,
    },
    Bare(Vec<String>),
}

#[derive(Clone)]
pub struct SuggestionClient {
    generator: Arc<dyn TextGenerator>,
    model: String,
}

/// Runs a fallible suggestion and substitutes `T::default()` on failure.
pub async fn or_zero<T, F>(operation: &'static str, call: F) -> T
where
    T: Default,
    F: Future<Output = Result<T, GenerationError>>,
{
    match call.await {
        Ok(value) => value,
        Err(e) => {
            warn!(operation, error = %e, "suggestion failed; returning empty result");
            T::default()
        }
    }
}

fn strip_code_fence(text: &str) -> &str {
    static FENCE_RE: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"(?s)^\s*```[a-zA-Z]*\s*(.*?)\s*```\s*$").unwrap());
    match FENCE_RE.captures(text).and_then(|c| c.get(1)) {
        Some(inner) => inner.as_str(),
        None => text.trim(),
    }
}

pub fn parse_structure(text: &str) -> Result<StructureSuggestion, GenerationError> {
    let reply: StructureReply = serde_json::from_str(strip_code_fence(text))?;
    Ok(StructureSuggestion {
        tenor: reply.tenor.unwrap_or_default().trim().to_string(),
        vehicle: reply.vehicle.unwrap_or_default().trim().to_string(),
    })
}

/// Items are trimmed; blank entries are dropped.
pub fn parse_items(text: &str) -> Result<Vec<String>, GenerationError> {
    let items = match serde_json::from_str::<ItemsReply>(strip_code_fence(text))? {
        ItemsReply::Object { items } => items.unwrap_or_default(),
        ItemsReply::Bare(items) => items,
    };
    Ok(items
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect())
}

impl SuggestionClient {
    pub fn new(generator: Arc<dyn TextGenerator>, model: impl Into<String>) -> Self {
        Self {
            generator,
            model: model.into(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    async fn generate(
        &self,
        prompt: String,
        schema: Option<serde_json::Value>,
    ) -> Result<String, GenerationError> {
        let request = GenerationRequest {
            model: self.model.clone(),
            prompt,
            response_schema: schema,
        };
        self.generator.generate(&request).await
    }

    async fn generate_items(&self, prompt: String) -> Result<Vec<String>, GenerationError> {
        let text = self.generate(prompt, Some(schemas::items_schema())).await?;
        parse_items(&text)
    }

    pub async fn detect_structure(&self, sentence: &str) -> StructureSuggestion {
        or_zero("detect_structure", async {
            let text = self
                .generate(
                    prompts::structure_prompt(sentence),
                    Some(schemas::structure_schema()),
                )
                .await?;
            parse_structure(&text)
        })
        .await
    }

    pub async fn suggest_characteristics(&self, vehicle: &str) -> Vec<String> {
        or_zero(
            "suggest_characteristics",
            self.generate_items(prompts::characteristics_prompt(vehicle)),
        )
        .await
    }

    pub async fn suggest_mapping(&self, literal: &str, tenor: &str, vehicle: &str) -> String {
        or_zero("suggest_mapping", async {
            let text = self
                .generate(prompts::mapping_prompt(literal, tenor, vehicle), None)
                .await?;
            Ok::<_, GenerationError>(text.trim().to_string())
        })
        .await
    }

    pub async fn suggest_challenges(&self, tenor: &str, vehicle: &str) -> Vec<String> {
        or_zero(
            "suggest_challenges",
            self.generate_items(prompts::challenges_prompt(tenor, vehicle)),
        )
        .await
    }

    pub async fn suggest_alternatives(&self, tenor: &str) -> Vec<String> {
        or_zero(
            "suggest_alternatives",
            self.generate_items(prompts::alternatives_prompt(tenor)),
        )
        .await
    }
}

/// A suggestion action captured with the inputs it needs, so it can run
/// detached from the workflow that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SuggestionRequest {
    Structure {
        sentence: String,
    },
    Characteristics {
        vehicle: String,
    },
    Mapping {
        id: CharacteristicId,
        literal: String,
        tenor: String,
        vehicle: String,
    },
    Challenges {
        tenor: String,
        vehicle: String,
    },
    Alternatives {
        tenor: String,
    },
}

impl SuggestionRequest {
    pub async fn run(self, client: &SuggestionClient) -> SuggestionPatch {
        match self {
            SuggestionRequest::Structure { sentence } => {
                let found = client.detect_structure(&sentence).await;
                SuggestionPatch {
                    tenor: Some(found.tenor),
                    vehicle: Some(found.vehicle),
                    ..Default::default()
                }
            }
            SuggestionRequest::Characteristics { vehicle } => SuggestionPatch {
                characteristics: client.suggest_characteristics(&vehicle).await,
                ..Default::default()
            },
            SuggestionRequest::Mapping {
                id,
                literal,
                tenor,
                vehicle,
            } => SuggestionPatch {
                mappings: vec![(id, client.suggest_mapping(&literal, &tenor, &vehicle).await)],
                ..Default::default()
            },
            SuggestionRequest::Challenges { tenor, vehicle } => SuggestionPatch {
                challenges: client.suggest_challenges(&tenor, &vehicle).await,
                ..Default::default()
            },
            SuggestionRequest::Alternatives { tenor } => SuggestionPatch {
                alternatives: client.suggest_alternatives(&tenor).await,
                ..Default::default()
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_structure_plain_and_fenced() {
        let plain = r#"{"tenor": "Argument", "vehicle": "War"}"#;
        let got = parse_structure(plain).unwrap();
        assert_eq!(got.tenor, "Argument");
        assert_eq!(got.vehicle, "War");

        let fenced = "```json\n{\"tenor\": \" Time \", \"vehicle\": \"Money\"}\n```";
        let got = parse_structure(fenced).unwrap();
        assert_eq!(got.tenor, "Time");
        assert_eq!(got.vehicle, "Money");
    }

    #[test]
    fn test_parse_structure_missing_keys_are_empty() {
        assert_eq!(parse_structure("{}").unwrap(), StructureSuggestion::default());
        let got = parse_structure(r#"{"tenor": null, "vehicle": "Sea"}"#).unwrap();
        assert_eq!(got.tenor, "");
        assert_eq!(got.vehicle, "Sea");
    }

    #[test]
    fn test_parse_structure_rejects_prose() {
        assert!(parse_structure("The tenor is time.").is_err());
    }

    #[test]
    fn test_parse_items_variants() {
        assert_eq!(
            parse_items(r#"{"items": ["a", " b ", ""]}"#).unwrap(),
            vec!["a", "b"]
        );
        assert!(parse_items("{}").unwrap().is_empty());
        assert_eq!(parse_items(r#"["x"]"#).unwrap(), vec!["x"]);
        assert!(parse_items("not json").is_err());
        assert!(parse_items(r#"{"items": [1, 2]}"#).is_err());
    }

    #[tokio::test]
    async fn test_or_zero_substitutes_default() {
        let v: Vec<String> = or_zero("t", async { Err(GenerationError::EmptyResponse) }).await;
        assert!(v.is_empty());
        let s: String = or_zero("t", async { Ok("kept".to_string()) }).await;
        assert_eq!(s, "kept");
    }
}
