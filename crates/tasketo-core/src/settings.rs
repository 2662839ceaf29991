use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::warn;
use uuid::Uuid;

use crate::calendar::{CalendarSystem, Language};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
    #[default]
    System,
}

impl Theme {
    pub fn display_name(self, language: Language) -> &'static str {
        match (self, language) {
            (Self::Light, Language::English) => "Light",
            (Self::Dark, Language::English) => "Dark",
            (Self::System, Language::English) => "System",
            (Self::Light, Language::Persian) => "روشن",
            (Self::Dark, Language::Persian) => "تیره",
            (Self::System, Language::Persian) => "سیستم",
        }
    }
}

/// Supported accent colours. Identifiers outside this set resolve to
/// [`AccentColor::Blue`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum AccentColor {
    #[default]
    Blue,
    Green,
    Orange,
    Red,
    Purple,
    Pink,
    Yellow,
    Mint,
    Teal,
    Cyan,
    Indigo,
}

impl AccentColor {
    pub const ALL: [Self; 11] = [
        Self::Blue,
        Self::Green,
        Self::Orange,
        Self::Red,
        Self::Purple,
        Self::Pink,
        Self::Yellow,
        Self::Mint,
        Self::Teal,
        Self::Cyan,
        Self::Indigo,
    ];

    /// Exact identifier lookup; `None` for anything unsupported.
    pub fn parse(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL
            .into_iter()
            .find(|c| c.name().eq_ignore_ascii_case(name))
    }

    /// Lenient lookup used at the settings-write boundary.
    pub fn from_name(name: &str) -> Self {
        Self::parse(name).unwrap_or_else(|| {
            warn!(color = name, "unknown color identifier; using default");
            Self::default()
        })
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Blue => "blue",
            Self::Green => "green",
            Self::Orange => "orange",
            Self::Red => "red",
            Self::Purple => "purple",
            Self::Pink => "pink",
            Self::Yellow => "yellow",
            Self::Mint => "mint",
            Self::Teal => "teal",
            Self::Cyan => "cyan",
            Self::Indigo => "indigo",
        }
    }

    pub fn display_name(self, language: Language) -> &'static str {
        match language {
            Language::English => match self {
                Self::Blue => "Blue",
                Self::Green => "Green",
                Self::Orange => "Orange",
                Self::Red => "Red",
                Self::Purple => "Purple",
                Self::Pink => "Pink",
                Self::Yellow => "Yellow",
                Self::Mint => "Mint",
                Self::Teal => "Teal",
                Self::Cyan => "Cyan",
                Self::Indigo => "Indigo",
            },
            Language::Persian => match self {
                Self::Blue => "آبی",
                Self::Green => "سبز",
                Self::Orange => "نارنجی",
                Self::Red => "قرمز",
                Self::Purple => "بنفش",
                Self::Pink => "صورتی",
                Self::Yellow => "زرد",
                Self::Mint => "نعناعی",
                Self::Teal => "فیروزه‌ای",
                Self::Cyan => "آبی روشن",
                Self::Indigo => "نیلی",
            },
        }
    }
}

impl fmt::Display for AccentColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Serialize for AccentColor {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for AccentColor {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::from_name(&raw))
    }
}

/// The single process-wide settings record. The store creates it once with
/// defaults and then hands it back for in-place updates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppSettings {
    pub id: Uuid,

    #[serde(default)]
    pub language: Language,

    #[serde(default)]
    pub theme: Theme,

    #[serde(default)]
    pub calendar: CalendarSystem,

    #[serde(default)]
    pub primary_color: AccentColor,

    #[serde(default = "default_accent")]
    pub accent_color: AccentColor,

    #[serde(default = "default_first_launch")]
    pub first_launch: bool,

    #[serde(default)]
    pub last_sync: Option<DateTime<Utc>>,
}

fn default_accent() -> AccentColor {
    AccentColor::Orange
}

fn default_first_launch() -> bool {
    true
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            id: Uuid::new_v4(),
            language: Language::default(),
            theme: Theme::default(),
            calendar: CalendarSystem::default(),
            primary_color: AccentColor::default(),
            accent_color: default_accent(),
            first_launch: default_first_launch(),
            last_sync: None,
        }
    }
}

impl AppSettings {
    /// Returns the colour actually stored.
    pub fn set_primary_color(&mut self, name: &str) -> AccentColor {
        self.primary_color = AccentColor::from_name(name);
        self.primary_color
    }

    pub fn set_accent_color(&mut self, name: &str) -> AccentColor {
        self.accent_color = AccentColor::from_name(name);
        self.accent_color
    }

    pub fn complete_first_launch(&mut self) {
        self.first_launch = false;
    }

    pub fn record_sync(&mut self, now: DateTime<Utc>) {
        self.last_sync = Some(now);
    }
}
