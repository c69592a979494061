//! Segment directives produced by prompt generation.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

/// Bookkeeping key holding the 1-based segment position.
pub const SEGMENT_NUMBER_KEY: &str = "segment_number";
/// Bookkeeping key holding the segment length in seconds.
pub const DURATION_KEY: &str = "duration";
/// Key of the primary content field sent to the video model.
pub const PRIMARY_CONTENT_KEY: &str = "veo_prompt";

/// Payload of a directive, passed verbatim to the video model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DirectiveContent {
    /// Free text prompt
    Text(String),
    /// Structured mapping produced by the text model
    Structured(Map<String, Value>),
}

impl DirectiveContent {
    /// Content from a mapping.
    ///
    /// A mapping holding only a string primary field is plain text, so the
    /// same directive always has one in-memory form whether it came from
    /// the model or from a saved file.
    ///
    /// # Examples
    ///
    /// ```
    /// use reelsmith_core::DirectiveContent;
    /// use serde_json::{Map, Value};
    ///
    /// let mut fields = Map::new();
    /// fields.insert("veo_prompt".into(), Value::from("Slow pan"));
    /// assert_eq!(
    ///     DirectiveContent::from_fields(fields),
    ///     DirectiveContent::Text("Slow pan".into())
    /// );
    /// ```
    pub fn from_fields(mut fields: Map<String, Value>) -> Self {
        if fields.len() == 1
            && matches!(fields.get(PRIMARY_CONTENT_KEY), Some(Value::String(_)))
            && let Some(Value::String(text)) = fields.remove(PRIMARY_CONTENT_KEY)
        {
            return DirectiveContent::Text(text);
        }
        DirectiveContent::Structured(fields)
    }

    /// The primary prompt text, if present.
    pub fn primary_text(&self) -> Option<&str> {
        match self {
            DirectiveContent::Text(text) => Some(text),
            DirectiveContent::Structured(fields) => {
                fields.get(PRIMARY_CONTENT_KEY).and_then(Value::as_str)
            }
        }
    }

    /// Text sent to the video model.
    ///
    /// A mapping holding only the primary field collapses to that string;
    /// any other mapping is sent as pretty-printed JSON.
    ///
    /// # Examples
    ///
    /// ```
    /// use reelsmith_core::DirectiveContent;
    /// use serde_json::{Map, Value};
    ///
    /// let mut fields = Map::new();
    /// fields.insert("veo_prompt".into(), Value::from("A bottle on a beach"));
    /// let content = DirectiveContent::Structured(fields);
    /// assert_eq!(content.to_payload(), "A bottle on a beach");
    /// ```
    pub fn to_payload(&self) -> String {
        match self {
            DirectiveContent::Text(text) => text.clone(),
            DirectiveContent::Structured(fields) => {
                if fields.len() == 1
                    && let Some(Value::String(text)) = fields.get(PRIMARY_CONTENT_KEY)
                {
                    return text.clone();
                }
                format!("{:#}", Value::Object(fields.clone()))
            }
        }
    }

    fn into_fields(self) -> Map<String, Value> {
        match self {
            DirectiveContent::Text(text) => {
                let mut fields = Map::new();
                fields.insert(PRIMARY_CONTENT_KEY.to_string(), Value::String(text));
                fields
            }
            DirectiveContent::Structured(fields) => fields,
        }
    }
}

/// One unit of generation instruction for a single output segment.
///
/// Bookkeeping (`segment_number`, `duration`) is held apart from the
/// content so that [`SegmentDirective::content`] is exactly what gets
/// transmitted, and [`SegmentDirective::new`] re-attaches it unchanged.
///
/// # Examples
///
/// ```
/// use reelsmith_core::{DirectiveContent, SegmentDirective};
///
/// let directive = SegmentDirective::new(1, 8, DirectiveContent::Text("Slow pan".into()));
/// let rebuilt = SegmentDirective::new(
///     directive.segment_number(),
///     directive.duration(),
///     directive.content().clone(),
/// );
/// assert_eq!(directive, rebuilt);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentDirective {
    segment_number: u32,
    duration: u32,
    content: DirectiveContent,
}

impl SegmentDirective {
    /// Create a directive from its bookkeeping and content.
    pub fn new(segment_number: u32, duration: u32, content: DirectiveContent) -> Self {
        Self {
            segment_number,
            duration,
            content,
        }
    }

    /// 1-based position in the run.
    pub fn segment_number(&self) -> u32 {
        self.segment_number
    }

    /// Target length in seconds.
    pub fn duration(&self) -> u32 {
        self.duration
    }

    /// Content with bookkeeping stripped.
    pub fn content(&self) -> &DirectiveContent {
        &self.content
    }

    /// Copy of this directive at another position.
    pub fn renumbered(&self, segment_number: u32) -> Self {
        Self {
            segment_number,
            ..self.clone()
        }
    }

    /// Flat mapping with bookkeeping keys merged into the content.
    pub fn to_record(&self) -> Map<String, Value> {
        let mut record = self.content.clone().into_fields();
        record.insert(
            SEGMENT_NUMBER_KEY.to_string(),
            Value::from(self.segment_number),
        );
        record.insert(DURATION_KEY.to_string(), Value::from(self.duration));
        record
    }

    /// Rebuild a directive from a flat mapping.
    ///
    /// Returns `None` unless both bookkeeping keys hold positive integers.
    pub fn from_record(mut record: Map<String, Value>) -> Option<Self> {
        let segment_number = positive_u32(record.remove(SEGMENT_NUMBER_KEY)?)?;
        let duration = positive_u32(record.remove(DURATION_KEY)?)?;
        Some(Self::new(
            segment_number,
            duration,
            DirectiveContent::from_fields(record),
        ))
    }
}

fn positive_u32(value: Value) -> Option<u32> {
    value
        .as_u64()
        .filter(|n| *n > 0)
        .and_then(|n| u32::try_from(n).ok())
}

impl Serialize for SegmentDirective {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_record().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for SegmentDirective {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let record = Map::deserialize(deserializer)?;
        Self::from_record(record).ok_or_else(|| {
            D::Error::custom("directive requires positive segment_number and duration")
        })
    }
}
