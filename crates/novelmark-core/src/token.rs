use std::fmt;
use std::ops::{BitOr, BitOrAssign};

pub type InlineSeq = Vec<Inline>;

#[derive(Clone, Debug, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    /// Running heading counter of the document at this token.
    pub heading: u32,
    pub content: InlineSeq,
    pub raw: String,
    pub flags: Flags,
}

impl Token {
    pub fn new(kind: TokenKind, heading: u32, raw: impl Into<String>, flags: Flags) -> Self {
        let raw = raw.into();
        Self {
            kind,
            heading,
            content: vec![Inline::Text(raw.clone())],
            raw,
            flags,
        }
    }

    pub fn with_content(mut self, content: InlineSeq) -> Self {
        self.content = content;
        self
    }

    pub fn is_meta(&self) -> bool {
        matches!(self.kind, TokenKind::Keyword { .. } | TokenKind::Tag { .. })
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum TokenKind {
    Empty,
    Title,
    Heading(HeadingLevel),
    Unnumbered,
    Separator,
    Skip,
    Text,
    Keyword {
        kind: KeywordKind,
        values: Vec<String>,
    },
    Tag {
        name: String,
        display: Option<String>,
    },
    Comment,
    Synopsis {
        short: bool,
    },
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum HeadingLevel {
    H1,
    H2,
    H3,
    H4,
}

impl HeadingLevel {
    pub fn from_depth(depth: usize) -> Option<Self> {
        match depth {
            1 => Some(Self::H1),
            2 => Some(Self::H2),
            3 => Some(Self::H3),
            4 => Some(Self::H4),
            _ => None,
        }
    }

    pub fn depth(self) -> u8 {
        match self {
            Self::H1 => 1,
            Self::H2 => 2,
            Self::H3 => 3,
            Self::H4 => 4,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum KeywordKind {
    Tag,
    PointOfView,
    Focus,
    Character,
    Plot,
    Timeline,
    Location,
    Object,
    Entity,
    Custom,
    Story,
    Mention,
}

impl KeywordKind {
    pub const ALL: [KeywordKind; 12] = [
        Self::Tag,
        Self::PointOfView,
        Self::Focus,
        Self::Character,
        Self::Plot,
        Self::Timeline,
        Self::Location,
        Self::Object,
        Self::Entity,
        Self::Custom,
        Self::Story,
        Self::Mention,
    ];

    /// Looks up a keyword by the name written after `@`, case-insensitively.
    pub fn from_key(key: &str) -> Option<Self> {
        let key = key.trim().to_ascii_lowercase();
        Self::ALL.into_iter().find(|kind| kind.key() == key)
    }

    pub fn key(self) -> &'static str {
        match self {
            Self::Tag => "tag",
            Self::PointOfView => "pov",
            Self::Focus => "focus",
            Self::Character => "char",
            Self::Plot => "plot",
            Self::Timeline => "time",
            Self::Location => "location",
            Self::Object => "object",
            Self::Entity => "entity",
            Self::Custom => "custom",
            Self::Story => "story",
            Self::Mention => "mention",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Tag => "Tag",
            Self::PointOfView => "Point of View",
            Self::Focus => "Focus",
            Self::Character => "Characters",
            Self::Plot => "Plot",
            Self::Timeline => "Timeline",
            Self::Location => "Locations",
            Self::Object => "Objects",
            Self::Entity => "Entities",
            Self::Custom => "Custom",
            Self::Story => "Story",
            Self::Mention => "Mentions",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Inline {
    Text(String),
    Strong(InlineSeq),
    Emph(InlineSeq),
    Strikethrough(InlineSeq),
    Underline(InlineSeq),
    Mark(InlineSeq),
    Superscript(InlineSeq),
    Subscript(InlineSeq),
    FootnoteRef(String),
    LineBreak,
}

#[derive(Clone, Copy, Default, Eq, PartialEq, Hash)]
pub struct Flags(u16);

impl Flags {
    pub const NONE: Flags = Flags(0);
    pub const ALIGN_LEFT: Flags = Flags(1 << 0);
    pub const ALIGN_RIGHT: Flags = Flags(1 << 1);
    pub const ALIGN_CENTRE: Flags = Flags(1 << 2);
    pub const ALIGN_JUSTIFY: Flags = Flags(1 << 3);
    pub const INDENT_LEFT: Flags = Flags(1 << 4);
    pub const INDENT_RIGHT: Flags = Flags(1 << 5);
    pub const PAGE_BREAK_BEFORE: Flags = Flags(1 << 6);
    pub const PAGE_BREAK_AFTER: Flags = Flags(1 << 7);

    const NAMES: [(Flags, &'static str); 8] = [
        (Self::ALIGN_LEFT, "ALIGN_LEFT"),
        (Self::ALIGN_RIGHT, "ALIGN_RIGHT"),
        (Self::ALIGN_CENTRE, "ALIGN_CENTRE"),
        (Self::ALIGN_JUSTIFY, "ALIGN_JUSTIFY"),
        (Self::INDENT_LEFT, "INDENT_LEFT"),
        (Self::INDENT_RIGHT, "INDENT_RIGHT"),
        (Self::PAGE_BREAK_BEFORE, "PAGE_BREAK_BEFORE"),
        (Self::PAGE_BREAK_AFTER, "PAGE_BREAK_AFTER"),
    ];

    pub fn contains(self, other: Flags) -> bool {
        other.0 != 0 && self.0 & other.0 == other.0
    }

    pub fn insert(&mut self, other: Flags) {
        self.0 |= other.0;
    }

    pub fn remove(&mut self, other: Flags) {
        self.0 &= !other.0;
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl BitOr for Flags {
    type Output = Flags;

    fn bitor(self, rhs: Flags) -> Flags {
        Flags(self.0 | rhs.0)
    }
}

impl BitOrAssign for Flags {
    fn bitor_assign(&mut self, rhs: Flags) {
        self.0 |= rhs.0;
    }
}

impl fmt::Debug for Flags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("NONE");
        }
        let mut first = true;
        for (flag, name) in Self::NAMES {
            if self.contains(flag) {
                if !first {
                    f.write_str(" | ")?;
                }
                f.write_str(name)?;
                first = false;
            }
        }
        Ok(())
    }
}
