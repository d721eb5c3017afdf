//! Wire types for the translation and dictionary backend.

use serde::{Deserialize, Serialize};

/// Everything known about a single kanji.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KanjiInfo {
    pub kanji: String,
    #[serde(default)]
    pub meanings: Vec<String>,
    #[serde(default)]
    pub on_yomi: Vec<String>,
    #[serde(default)]
    pub kun_yomi: Vec<String>,
    #[serde(default)]
    pub stroke_count: u32,
    #[serde(default)]
    pub jlpt_level: String,
    #[serde(default)]
    pub frequency: u32,
    #[serde(default)]
    pub examples: Vec<ExampleWord>,
    #[serde(default)]
    pub sentences: Vec<ExampleSentence>,
    #[serde(default)]
    pub similar: Vec<SimilarKanji>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExampleWord {
    pub word: String,
    pub reading: String,
    pub meaning: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExampleSentence {
    pub japanese: String,
    pub reading: String,
    pub english: String,
}

/// A related kanji.
///
/// The backend relates kanji by shared reading; the bundled table relates
/// them by theme (`reason`/`similarity`). Both shapes land here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarKanji {
    pub kanji: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shared_reading: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub all_on_yomi: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub all_kun_yomi: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub meanings: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub similarity: Option<String>,
}

/// A dictionary word entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordEntry {
    #[serde(default)]
    pub idseq: Option<String>,
    #[serde(default)]
    pub kanji_forms: Vec<String>,
    #[serde(default)]
    pub kana_forms: Vec<String>,
    #[serde(default)]
    pub senses: Vec<Sense>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sense {
    #[serde(default)]
    pub glosses: Vec<String>,
    #[serde(default)]
    pub pos: Vec<String>,
    #[serde(default)]
    pub misc: Vec<String>,
    #[serde(default)]
    pub field: Vec<String>,
    #[serde(default)]
    pub dialect: Vec<String>,
    #[serde(default)]
    pub examples: Vec<SenseExample>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SenseExample {
    pub japanese: String,
    pub english: String,
    #[serde(default)]
    pub reading: Option<String>,
}

/// One hit of a general search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum SearchResult {
    #[serde(rename = "word")]
    Word(WordEntry),
    #[serde(rename = "kanji_detail")]
    KanjiDetail(KanjiInfo),
}

#[derive(Debug, Deserialize)]
pub(crate) struct SearchResponse {
    #[serde(default)]
    pub results: Vec<SearchResult>,
}

#[derive(Debug, Serialize)]
pub(crate) struct SearchRequest<'a> {
    pub query: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct TranslateRequest<'a> {
    pub image_data: &'a str,
}

/// Response of both `/scan/translate` endpoints.
///
/// The backend reports its own failures in-band with `error` + `message`
/// and a 200 status.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TranslationResponse {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub translated_text: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}
