//! Assets — named, typed pieces of creative content.
//!
//! Every asset kind carries a schema: the set of recognized field names for
//! that kind. Content is parsed against the schema exactly once, at the
//! write path; reads are plain map lookups.

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The kind of an asset, which determines its field schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetKind {
    Character,
    PlotPoint,
    ShotCard,
    MasterStyle,
    Scene,
    VariantShot,
    CameraSettings,
    DepthOfField,
    LightingSetup,
    ColorGrading,
    AudioDesign,
}

impl AssetKind {
    /// The recognized field names for this kind, in display order.
    pub fn schema(&self) -> &'static [&'static str] {
        match self {
            Self::Character => &[
                "Name",
                "Age",
                "Appearance",
                "Personality",
                "Background",
                "Goals",
            ],
            Self::PlotPoint => &["Event", "Impact", "Timing", "Characters involved"],
            Self::ShotCard => &["Shot type", "Subject", "Angle", "Lighting", "Mood"],
            Self::MasterStyle => &[
                "Visual style",
                "Tone",
                "Color palette",
                "Narrative approach",
            ],
            Self::Scene => &["Setting", "Characters", "Action", "Dialogue", "Purpose"],
            Self::VariantShot => &["Base shot", "Variation", "Changes"],
            Self::CameraSettings => &[
                "Focal Length",
                "Aperture",
                "Shutter Speed",
                "ISO",
                "White Balance",
            ],
            Self::DepthOfField => &[
                "Focus Distance",
                "Aperture",
                "Focal Length",
                "Sensor Size",
                "Bokeh Shape",
            ],
            Self::LightingSetup => &["Key Light", "Fill Light", "Back Light", "Color Temperature"],
            Self::ColorGrading => &["LUT", "Contrast", "Saturation", "Tint"],
            Self::AudioDesign => &["Ambience", "Score", "Effects", "Mix Notes"],
        }
    }

    /// Blank starter content: one `Field: ` line per schema entry.
    pub fn template(&self) -> String {
        self.schema()
            .iter()
            .map(|field| format!("{field}: "))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Tags applied to newly created assets of this kind.
    pub fn default_tags(&self) -> &'static [&'static str] {
        match self {
            Self::Character => &["character"],
            Self::PlotPoint => &["plot"],
            Self::ShotCard => &["shot", "visual"],
            Self::MasterStyle => &["style", "master"],
            Self::Scene => &["scene"],
            Self::VariantShot => &["shot", "variant"],
            Self::CameraSettings => &["camera", "technical"],
            Self::DepthOfField => &["dof", "focus", "technical"],
            Self::LightingSetup => &["lighting", "technical"],
            Self::ColorGrading => &["color", "technical"],
            Self::AudioDesign => &["audio", "technical"],
        }
    }
}

impl std::fmt::Display for AssetKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Character => "character",
            Self::PlotPoint => "plot_point",
            Self::ShotCard => "shot_card",
            Self::MasterStyle => "master_style",
            Self::Scene => "scene",
            Self::VariantShot => "variant_shot",
            Self::CameraSettings => "camera_settings",
            Self::DepthOfField => "depth_of_field",
            Self::LightingSetup => "lighting_setup",
            Self::ColorGrading => "color_grading",
            Self::AudioDesign => "audio_design",
        };
        write!(f, "{label}")
    }
}

/// A named, typed piece of creative content.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Asset {
    /// Unique asset ID
    pub id: String,

    /// Display name
    pub name: String,

    /// Kind, which fixes the field schema
    pub kind: AssetKind,

    /// Raw free-text content (the editable source of truth)
    pub content: String,

    /// Schema fields parsed from `content`, in schema order
    #[serde(default)]
    pub fields: IndexMap<String, String>,

    /// Free-form tags
    #[serde(default)]
    pub tags: Vec<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Asset {
    /// Create a new asset, parsing `content` against the kind's schema.
    pub fn new(name: impl Into<String>, kind: AssetKind, content: impl Into<String>) -> Self {
        let now = Utc::now();
        let content = content.into();
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            kind,
            fields: parse_fields(kind, &content),
            content,
            tags: kind.default_tags().iter().map(|t| t.to_string()).collect(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Create an asset pre-filled with the kind's blank template.
    pub fn from_template(name: impl Into<String>, kind: AssetKind) -> Self {
        Self::new(name, kind, kind.template())
    }

    /// Replace the content, re-parsing schema fields. The only write path.
    pub fn set_content(&mut self, content: impl Into<String>) {
        self.content = content.into();
        self.fields = parse_fields(self.kind, &self.content);
        self.updated_at = Utc::now();
    }

    /// Look up a parsed schema field. No text parsing happens here.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }
}

/// Parse `Field: value` lines against the schema. Lines whose prefix is not
/// a schema field, and schema fields with empty values, produce no entry.
fn parse_fields(kind: AssetKind, content: &str) -> IndexMap<String, String> {
    let schema = kind.schema();
    let mut fields = IndexMap::new();
    for line in content.lines() {
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let key = key.trim();
        let value = value.trim();
        if value.is_empty() {
            continue;
        }
        if let Some(canonical) = schema.iter().find(|f| f.eq_ignore_ascii_case(key)) {
            fields.insert(canonical.to_string(), value.to_string());
        }
    }
    fields
}
