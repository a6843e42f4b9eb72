//! Enumerated icon identifiers and glyph registries.
//!
//! Documents store icons as free-form symbolic names. Resolution maps them
//! onto the closed `IconId` set first, so an unrecognized name becomes
//! `IconId::Fallback` instead of a runtime lookup miss.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::collections::BTreeMap;

static ICON_NAME_NOISE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-z0-9]+").expect("valid icon name regex"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum IconId {
    Github,
    Twitter,
    Discord,
    Youtube,
    Linkedin,
    Facebook,
    Instagram,
    Reddit,
    Telegram,
    Mail,
    Globe,
    MessageCircle,
    Users,
    Star,
    Heart,
    Download,
    Shield,
    Lock,
    Eye,
    FileText,
    Database,
    Server,
    Activity,
    Zap,
    Check,
    /// Generic glyph for names outside the known set.
    Fallback,
}

impl IconId {
    pub const KNOWN: [IconId; 25] = [
        IconId::Github,
        IconId::Twitter,
        IconId::Discord,
        IconId::Youtube,
        IconId::Linkedin,
        IconId::Facebook,
        IconId::Instagram,
        IconId::Reddit,
        IconId::Telegram,
        IconId::Mail,
        IconId::Globe,
        IconId::MessageCircle,
        IconId::Users,
        IconId::Star,
        IconId::Heart,
        IconId::Download,
        IconId::Shield,
        IconId::Lock,
        IconId::Eye,
        IconId::FileText,
        IconId::Database,
        IconId::Server,
        IconId::Activity,
        IconId::Zap,
        IconId::Check,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Github => "github",
            Self::Twitter => "twitter",
            Self::Discord => "discord",
            Self::Youtube => "youtube",
            Self::Linkedin => "linkedin",
            Self::Facebook => "facebook",
            Self::Instagram => "instagram",
            Self::Reddit => "reddit",
            Self::Telegram => "telegram",
            Self::Mail => "mail",
            Self::Globe => "globe",
            Self::MessageCircle => "message-circle",
            Self::Users => "users",
            Self::Star => "star",
            Self::Heart => "heart",
            Self::Download => "download",
            Self::Shield => "shield",
            Self::Lock => "lock",
            Self::Eye => "eye",
            Self::FileText => "file-text",
            Self::Database => "database",
            Self::Server => "server",
            Self::Activity => "activity",
            Self::Zap => "zap",
            Self::Check => "check",
            Self::Fallback => "fallback",
        }
    }

    /// Maps a symbolic name onto the known set.
    ///
    /// Case and separators are ignored (`MessageCircle`, `message-circle` and
    /// `message_circle` are the same icon); unknown names yield `Fallback`.
    pub fn parse(name: &str) -> Self {
        let lowered = name.trim().to_ascii_lowercase();
        let normalized = ICON_NAME_NOISE_RE.replace_all(&lowered, "");
        match normalized.as_ref() {
            "github" => Self::Github,
            "twitter" | "x" => Self::Twitter,
            "discord" => Self::Discord,
            "youtube" => Self::Youtube,
            "linkedin" => Self::Linkedin,
            "facebook" => Self::Facebook,
            "instagram" => Self::Instagram,
            "reddit" => Self::Reddit,
            "telegram" | "send" => Self::Telegram,
            "mail" | "email" => Self::Mail,
            "globe" | "web" | "website" => Self::Globe,
            "messagecircle" | "message" | "chat" => Self::MessageCircle,
            "users" | "user" | "community" => Self::Users,
            "star" => Self::Star,
            "heart" => Self::Heart,
            "download" => Self::Download,
            "shield" | "shieldcheck" => Self::Shield,
            "lock" => Self::Lock,
            "eye" => Self::Eye,
            "filetext" | "file" => Self::FileText,
            "database" => Self::Database,
            "server" => Self::Server,
            "activity" => Self::Activity,
            "zap" => Self::Zap,
            "check" | "checkcircle" => Self::Check,
            _ => Self::Fallback,
        }
    }
}

/// Symbolic-name-to-renderable-asset registry supplied by the host UI.
pub trait IconRegistry {
    /// Renderable glyph for `icon`, `None` when the host has no asset for it.
    fn glyph(&self, icon: IconId) -> Option<&str>;
}

/// Registry mapping every icon to its kebab-case name, as icon fonts expect.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinIconRegistry;

impl IconRegistry for BuiltinIconRegistry {
    fn glyph(&self, icon: IconId) -> Option<&str> {
        Some(icon.as_str())
    }
}

/// Registry backed by an explicit table of glyphs.
#[derive(Debug, Clone, Default)]
pub struct IconMap {
    glyphs: BTreeMap<IconId, String>,
}

impl IconMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_glyph(mut self, icon: IconId, glyph: impl Into<String>) -> Self {
        self.glyphs.insert(icon, glyph.into());
        self
    }
}

impl IconRegistry for IconMap {
    fn glyph(&self, icon: IconId) -> Option<&str> {
        self.glyphs.get(&icon).map(String::as_str)
    }
}

/// Icon as handed to the renderer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedIcon {
    pub id: IconId,
    pub glyph: String,
}

/// Resolves a symbolic name to a renderable icon.
///
/// Falls back to the registry's `Fallback` glyph when the name is unknown or
/// the registry has no asset for it.
pub fn resolve_icon(name: &str, icons: &dyn IconRegistry) -> ResolvedIcon {
    let id = IconId::parse(name);
    if let Some(glyph) = icons.glyph(id) {
        return ResolvedIcon {
            id,
            glyph: glyph.to_string(),
        };
    }
    let glyph = icons
        .glyph(IconId::Fallback)
        .unwrap_or(IconId::Fallback.as_str());
    ResolvedIcon {
        id: IconId::Fallback,
        glyph: glyph.to_string(),
    }
}
