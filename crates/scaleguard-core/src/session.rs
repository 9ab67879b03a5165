use std::fmt;

/// Identity of the caller that owns a pending display adjustment.
///
/// `Ambient` stands for "no specific session". It is never refused by
/// the ownership check. It owns the display only after adjusting from idle.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum Session {
    #[default]
    Ambient,
    Named(String),
}

impl Session {
    /// Creates a named session.
    pub fn named(name: impl Into<String>) -> Self {
        Self::Named(name.into())
    }

    pub fn is_ambient(&self) -> bool {
        matches!(self, Self::Ambient)
    }
}

impl From<Option<String>> for Session {
    fn from(name: Option<String>) -> Self {
        name.map_or(Self::Ambient, Self::Named)
    }
}

impl fmt::Display for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ambient => f.write_str("<ambient>"),
            Self::Named(name) => f.write_str(name),
        }
    }
}
