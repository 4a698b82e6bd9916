/// Subscription state of a record as the mailing list service reports it.
///
/// States the service may add later are kept verbatim in `Other` instead of
/// failing the whole reply.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
#[serde(into = "String")]
pub enum RecordState {
    #[default]
    Active,
    Admin,
    Bounced,
    Unsubscribed,
    Trashed,
    Other(String),
}

impl RecordState {
    pub fn is_active(&self) -> bool {
        matches!(self, RecordState::Active)
    }

    /// Every state but `active` keeps the record in the list's trash.
    pub fn is_trashed(&self) -> bool {
        !self.is_active()
    }

    pub fn parse(state: &str) -> RecordState {
        match state.trim() {
            "active" => RecordState::Active,
            "admin" => RecordState::Admin,
            "bounced" => RecordState::Bounced,
            "unsubscribed" => RecordState::Unsubscribed,
            "trashed" => RecordState::Trashed,
            other => RecordState::Other(other.to_string()),
        }
    }
}

impl AsRef<str> for RecordState {
    fn as_ref(&self) -> &str {
        match self {
            RecordState::Active => "active",
            RecordState::Admin => "admin",
            RecordState::Bounced => "bounced",
            RecordState::Unsubscribed => "unsubscribed",
            RecordState::Trashed => "trashed",
            RecordState::Other(state) => state,
        }
    }
}

impl std::str::FromStr for RecordState {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(RecordState::parse(s))
    }
}

impl From<RecordState> for String {
    fn from(state: RecordState) -> Self {
        state.as_ref().to_string()
    }
}
