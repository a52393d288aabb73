//! Natural-language analysis adapter (Watson NLU compatible `v1/analyze`).

use std::collections::BTreeMap;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::{
    provider::{ProviderError, TextAnalyzer},
    types::{ConceptEntry, ConceptFrequencyTable, Counter, CounterFields, EmotionProfile, NluAnalysis},
};

const API_VERSION: &str = "2022-04-07";

#[derive(Debug, Default, Deserialize)]
struct AnalyzeResponse {
    emotion: Option<EmotionResult>,
    #[serde(default)]
    categories: Vec<CategoryResult>,
    #[serde(default)]
    keywords: Vec<KeywordResult>,
    #[serde(default)]
    entities: Vec<EntityResult>,
}

#[derive(Debug, Deserialize)]
struct EmotionResult {
    document: DocumentEmotion,
}

#[derive(Debug, Deserialize)]
struct DocumentEmotion {
    emotion: EmotionScores,
}

#[derive(Debug, Default, Deserialize)]
struct EmotionScores {
    #[serde(default)]
    anger: f64,
    #[serde(default)]
    disgust: f64,
    #[serde(default)]
    fear: f64,
    #[serde(default)]
    joy: f64,
    #[serde(default)]
    sadness: f64,
}

#[derive(Debug, Deserialize)]
struct CategoryResult {
    label: String,
}

#[derive(Debug, Deserialize)]
struct KeywordResult {
    text: String,
    #[serde(default = "one")]
    count: i64,
}

#[derive(Debug, Deserialize)]
struct EntityResult {
    #[serde(rename = "type")]
    kind: String,
    text: String,
}

fn one() -> i64 {
    1
}

/// Maps a raw analyze response onto the record shape.
///
/// * document emotion scores become the emotion profile
/// * a category label `/a/b/c` becomes `a: [b, c]`; a one-level label `/a`
///   becomes `a: []`
/// * keywords become `keywords: { text: count }`
/// * entities become `entities: { type: [text, ...] }`
pub fn analysis_from_json(value: Value) -> Result<NluAnalysis, ProviderError> {
    let response: AnalyzeResponse =
        serde_json::from_value(value).map_err(|e| ProviderError::Malformed(e.to_string()))?;

    let scores = response
        .emotion
        .map(|e| e.document.emotion)
        .ok_or_else(|| ProviderError::Malformed("response has no document emotion".to_string()))?;

    let mut concepts = ConceptFrequencyTable::new();
    for category in &response.categories {
        let mut parts = category.label.split('/').filter(|p| !p.is_empty());
        let Some(head) = parts.next() else {
            continue;
        };
        concepts
            .entry(head.to_string())
            .or_default()
            .extend(parts.map(|p| ConceptEntry::Term(p.to_string())));
    }

    let mut counters = CounterFields::new();

    let mut keywords: BTreeMap<String, Counter> = BTreeMap::new();
    for keyword in response.keywords {
        let count = Counter::Count(keyword.count);
        match keywords.get_mut(&keyword.text) {
            Some(existing) => existing.absorb(&count),
            None => {
                keywords.insert(keyword.text, count);
            }
        }
    }
    if !keywords.is_empty() {
        counters.insert("keywords".to_string(), keywords);
    }

    let mut entities: BTreeMap<String, Counter> = BTreeMap::new();
    for entity in response.entities {
        let text = Counter::Terms(vec![entity.text]);
        match entities.get_mut(&entity.kind) {
            Some(existing) => existing.absorb(&text),
            None => {
                entities.insert(entity.kind, text);
            }
        }
    }
    if !entities.is_empty() {
        counters.insert("entities".to_string(), entities);
    }

    Ok(NluAnalysis {
        emotions: EmotionProfile {
            anger: scores.anger,
            disgust: scores.disgust,
            fear: scores.fear,
            joy: scores.joy,
            sadness: scores.sadness,
        },
        concepts,
        counters,
    })
}

#[derive(Debug, Clone)]
pub struct NluClient {
    client: Client,
    service_url: String,
    api_key: String,
}

impl NluClient {
    pub fn new(service_url: &str, api_key: &str) -> Self {
        Self {
            client: Client::new(),
            service_url: service_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }
}

#[async_trait]
impl TextAnalyzer for NluClient {
    async fn analyze(&self, text: &str) -> Result<NluAnalysis, ProviderError> {
        let body = json!({
            "text": text,
            "language": "en",
            "features": {
                "emotion": {},
                "categories": { "limit": 10 },
                "keywords": { "limit": 20 },
                "entities": { "limit": 20 },
            }
        });

        let response = self
            .client
            .post(format!("{}/v1/analyze", self.service_url))
            .query(&[("version", API_VERSION)])
            .basic_auth("apikey", Some(&self.api_key))
            .json(&body)
            .send()
            .await?;

        match response.status() {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                return Err(ProviderError::Forbidden("text analysis".to_string()));
            }
            StatusCode::TOO_MANY_REQUESTS => {
                return Err(ProviderError::RateLimited { retry_after: None });
            }
            status if !status.is_success() => {
                return Err(ProviderError::Transport(format!("{} from text analysis", status)));
            }
            _ => {}
        }

        analysis_from_json(response.json::<Value>().await?)
    }
}
