use crate::domain::demographics::Demographics;
use crate::domain::record_state::RecordState;
use crate::domain::subscriber_email::SubscriberEmail;

/// Input of a record add.
#[derive(Debug, Clone)]
pub struct NewRecord {
    pub email: SubscriberEmail,
    pub list_id: u32,
    pub demographics: Demographics,
    pub proof: bool,
    /// Send the list's welcome message to the new subscriber.
    pub trigger: bool,
    pub state: Option<RecordState>,
}

impl NewRecord {
    pub fn new(email: SubscriberEmail, list_id: u32) -> Self {
        NewRecord {
            email,
            list_id,
            demographics: Demographics::new(),
            proof: false,
            trigger: false,
            state: None,
        }
    }

    pub fn with_demographics(mut self, demographics: Demographics) -> Self {
        self.demographics = demographics;
        self
    }

    pub fn with_proof(mut self, proof: bool) -> Self {
        self.proof = proof;
        self
    }

    pub fn with_trigger(mut self, trigger: bool) -> Self {
        self.trigger = trigger;
        self
    }

    pub fn with_state(mut self, state: RecordState) -> Self {
        self.state = Some(state);
        self
    }
}

/// Input of a record update. Only the fields present are sent.
#[derive(Debug, Clone)]
pub struct RecordUpdate {
    pub email: SubscriberEmail,
    pub list_id: u32,
    pub new_email: Option<SubscriberEmail>,
    pub state: Option<RecordState>,
    pub demographics: Demographics,
}

impl RecordUpdate {
    pub fn new(email: SubscriberEmail, list_id: u32) -> Self {
        RecordUpdate {
            email,
            list_id,
            new_email: None,
            state: None,
            demographics: Demographics::new(),
        }
    }

    pub fn with_new_email(mut self, new_email: SubscriberEmail) -> Self {
        self.new_email = Some(new_email);
        self
    }

    pub fn with_state(mut self, state: RecordState) -> Self {
        self.state = Some(state);
        self
    }

    pub fn with_demographics(mut self, demographics: Demographics) -> Self {
        self.demographics = demographics;
        self
    }
}

/// Page selection of a list query. Both fields left empty return every record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Pagination {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

impl Pagination {
    pub fn page(page: u32, per_page: u32) -> Self {
        Pagination {
            page: Some(page),
            per_page: Some(per_page),
        }
    }
}
