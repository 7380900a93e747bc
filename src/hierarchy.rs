//! Administrative hierarchy levels a campaign can be placed at
use std::fmt;

#[derive(Debug, PartialEq, Eq, Clone, Copy, minicbor::Encode, minicbor::Decode)]
pub enum ScopeLevel {
    #[n(0)]
    State,
    #[n(1)]
    District,
    #[n(2)]
    Assembly,
    #[n(3)]
    Block,
    #[n(4)]
    Mandal,
}

impl ScopeLevel {
    /// Lenient parse for backend-supplied level labels.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "state" => Some(Self::State),
            "district" => Some(Self::District),
            "assembly" => Some(Self::Assembly),
            "block" => Some(Self::Block),
            "mandal" => Some(Self::Mandal),
            _ => {
                tracing::debug!(value = raw, "unrecognised hierarchy level");
                None
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::State => "State",
            Self::District => "District",
            Self::Assembly => "Assembly",
            Self::Block => "Block",
            Self::Mandal => "Mandal",
        }
    }

    /// Broad-to-narrow rank, used to keep scope listings in a stable order.
    pub fn rank(&self) -> u8 {
        match self {
            Self::State => 0,
            Self::District => 1,
            Self::Assembly => 2,
            Self::Block => 3,
            Self::Mandal => 4,
        }
    }
}

impl fmt::Display for ScopeLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
