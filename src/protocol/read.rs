use serde::{Deserialize, Serialize};

use super::ArbitraryJson;

/// Query options for text analysis. At least one of `summarize`, `topics`,
/// `intents`, or `sentiment` must be on or the server has nothing to do.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct ReadOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summarize: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub topics: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub intents: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sentiment: Option<bool>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub custom_topic: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_topic_mode: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub custom_intent: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_intent_mode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub callback: Option<String>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct AnalyzeResponse {
    pub metadata: AnalyzeMetadata,
    pub results: AnalyzeResults,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct AnalyzeMetadata {
    #[serde(default)]
    pub request_id: String,
    #[serde(default)]
    pub created: String,
    #[serde(default)]
    pub language: String,
    pub summary_info: Option<ArbitraryJson>,
    pub topics_info: Option<ArbitraryJson>,
    pub intents_info: Option<ArbitraryJson>,
    pub sentiment_info: Option<ArbitraryJson>,
}

/// One block per requested analysis; absent blocks were not requested.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct AnalyzeResults {
    pub summary: Option<Summary>,
    pub topics: Option<TopicsResults>,
    pub intents: Option<IntentsResults>,
    pub sentiments: Option<SentimentsResults>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct Summary {
    pub text: String,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct TopicsResults {
    pub segments: Vec<TopicSegment>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct TopicSegment {
    pub text: String,
    pub start_word: usize,
    pub end_word: usize,
    pub topics: Vec<Topic>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct Topic {
    pub topic: String,
    pub confidence_score: f64,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct IntentsResults {
    pub segments: Vec<IntentSegment>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct IntentSegment {
    pub text: String,
    pub start_word: usize,
    pub end_word: usize,
    pub intents: Vec<Intent>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct Intent {
    pub intent: String,
    pub confidence_score: f64,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct SentimentsResults {
    pub segments: Vec<SentimentSegment>,
    pub average: Sentiment,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct SentimentSegment {
    pub text: String,
    pub start_word: usize,
    pub end_word: usize,
    pub sentiment: String,
    pub sentiment_score: f64,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct Sentiment {
    pub sentiment: String,
    pub sentiment_score: f64,
}
