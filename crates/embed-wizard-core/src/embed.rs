//! Rich content container.
//!
//! An [`Embed`] is a titled, colored card with an ordered list of named
//! fields. The wizard keeps one embed per run and rewrites its fields as
//! answers come in.

use serde::{Deserialize, Serialize};

/// An RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Color(pub u32);

impl Color {
    /// `#C27C0E`.
    pub const DARK_ORANGE: Self = Self(0xC27C0E);
    /// `#2ECC71`.
    pub const GREEN: Self = Self(0x2ECC71);
    /// `#E74C3C`.
    pub const RED: Self = Self(0xE74C3C);

    /// Returns the raw `0xRRGGBB` value.
    pub const fn value(self) -> u32 {
        self.0
    }
}

impl From<u32> for Color {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

/// A named field of an [`Embed`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbedField {
    /// Field name (heading).
    pub name: String,
    /// Field body.
    pub value: String,
    /// Whether the field may share a line with its neighbours.
    #[serde(default)]
    pub inline: bool,
}

/// A rich content card.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Embed {
    /// Card title.
    pub title: Option<String>,
    /// Card description.
    #[serde(default)]
    pub description: Option<String>,
    /// Border color.
    #[serde(default)]
    pub color: Color,
    /// Ordered fields.
    #[serde(default)]
    pub fields: Vec<EmbedField>,
}

impl Embed {
    /// Creates an embed with a title.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Default::default()
        }
    }

    /// Sets the color (builder pattern).
    pub fn color(mut self, color: impl Into<Color>) -> Self {
        self.color = color.into();
        self
    }

    /// Sets the description (builder pattern).
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Appends a field (builder pattern).
    pub fn field(mut self, name: impl Into<String>, value: impl Into<String>, inline: bool) -> Self {
        self.add_field(name, value, inline);
        self
    }

    /// Appends a field.
    pub fn add_field(&mut self, name: impl Into<String>, value: impl Into<String>, inline: bool) {
        self.fields.push(EmbedField {
            name: name.into(),
            value: value.into(),
            inline,
        });
    }

    /// Removes the field at `index`, returning it. Out-of-range indices are ignored.
    pub fn remove_field(&mut self, index: usize) -> Option<EmbedField> {
        (index < self.fields.len()).then(|| self.fields.remove(index))
    }

    /// Removes the last field, returning it.
    pub fn pop_field(&mut self) -> Option<EmbedField> {
        self.fields.pop()
    }

    /// Returns the last field.
    pub fn last_field(&self) -> Option<&EmbedField> {
        self.fields.last()
    }

    /// Replaces the color.
    pub fn set_color(&mut self, color: impl Into<Color>) {
        self.color = color.into();
    }
}
