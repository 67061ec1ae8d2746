use serde::{Deserialize, Deserializer};

/// One `<protocol>` document.
///
/// Child lists keep the order they had in the source document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Protocol {
    #[serde(rename = "@name")]
    pub name: String,

    pub copyright: String,

    pub description: Description,

    #[serde(rename = "interface")]
    pub interfaces: Vec<Interface>,
}

impl Protocol {
    /// True for the zero-valued record produced by a failed decode.
    pub fn is_blank(&self) -> bool {
        self.name.is_empty() && self.interfaces.is_empty()
    }
}

/// `<description summary="...">text</description>`
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Description {
    #[serde(rename = "@summary")]
    pub summary: String,

    #[serde(rename = "$text")]
    pub content: String,
}

impl Description {
    pub fn is_empty(&self) -> bool {
        self.summary.is_empty() && self.content.trim().is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Interface {
    #[serde(rename = "@name")]
    pub name: String,

    #[serde(rename = "@version")]
    pub version: String,

    pub description: Description,

    #[serde(rename = "request")]
    pub requests: Vec<Request>,

    #[serde(rename = "event")]
    pub events: Vec<Event>,

    #[serde(rename = "enum")]
    pub enums: Vec<Enum>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Request {
    #[serde(rename = "@name")]
    pub name: String,

    /// Type tag, e.g. `destructor`.
    #[serde(rename = "@type")]
    pub kind: String,

    #[serde(rename = "@since")]
    pub since: String,

    pub description: Description,

    #[serde(rename = "arg")]
    pub arguments: Vec<Argument>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Event {
    #[serde(rename = "@name")]
    pub name: String,

    #[serde(rename = "@type")]
    pub kind: String,

    #[serde(rename = "@since")]
    pub since: String,

    #[serde(rename = "@deprecated-since")]
    pub deprecated_since: String,

    pub description: Description,

    #[serde(rename = "arg")]
    pub arguments: Vec<Argument>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Argument {
    #[serde(rename = "@name")]
    pub name: String,

    /// Wire type (`int`, `uint`, `object`, `new_id`, ...).
    #[serde(rename = "@type")]
    pub kind: String,

    #[serde(rename = "@interface")]
    pub interface: Option<String>,

    #[serde(rename = "@enum")]
    pub enumeration: Option<String>,

    #[serde(rename = "@allow-null", deserialize_with = "flag")]
    pub nullable: bool,

    #[serde(rename = "@summary")]
    pub summary: String,

    #[serde(rename = "@since")]
    pub since: String,

    pub description: Description,
}

impl Argument {
    /// Interface or enum this argument refers to, interface first.
    pub fn reference(&self) -> Option<&str> {
        self.interface
            .as_deref()
            .filter(|name| !name.is_empty())
            .or_else(|| self.enumeration.as_deref().filter(|name| !name.is_empty()))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Enum {
    #[serde(rename = "@name")]
    pub name: String,

    #[serde(rename = "@bitfield", deserialize_with = "flag")]
    pub bitfield: bool,

    #[serde(rename = "@since")]
    pub since: String,

    pub description: Description,

    #[serde(rename = "entry")]
    pub entries: Vec<Entry>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Entry {
    #[serde(rename = "@name")]
    pub name: String,

    #[serde(rename = "@value")]
    pub value: String,

    #[serde(rename = "@summary")]
    pub summary: String,

    #[serde(rename = "@since")]
    pub since: String,

    pub description: Description,
}

/// `"true"` is the only truthy spelling; anything else reads as false.
fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    Ok(raw == "true")
}
