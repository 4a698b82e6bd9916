use chrono::{DateTime, FixedOffset, NaiveDate};

use crate::domain::demographics::Demographics;
use crate::domain::record_state::RecordState;
use crate::error::{LyrisError, LyrisResult};
use crate::xml::Element;

const YES: &str = "yes";

/// A mailing list subscriber record.
///
/// Built once from a reply (or from the request that wrote it) and read
/// through accessors afterwards.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Record {
    id: String,
    email: String,
    proof: Option<bool>,
    trashed: bool,
    state: Option<RecordState>,
    statedate: Option<NaiveDate>,
    joindate: Option<DateTime<FixedOffset>>,
    demographics: Demographics,
}

impl Record {
    /// Record echoed back after an add or update, which only returns the uid.
    ///
    /// Fields the request did not set stay unknown.
    pub(crate) fn written(
        id: String,
        email: String,
        proof: Option<bool>,
        state: Option<RecordState>,
        demographics: Demographics,
    ) -> Record {
        Record {
            id,
            email,
            proof,
            trashed: state.as_ref().map_or(false, RecordState::is_trashed),
            state,
            statedate: None,
            joindate: None,
            demographics,
        }
    }

    /// Reads a `RECORD` element of a query reply.
    pub fn from_element(record: &Element) -> LyrisResult<Record> {
        let id = record
            .data("extra")
            .when("id", "uid")
            .value()
            .ok_or_else(|| LyrisError::MalformedReply(String::from("record without a uid")))?;
        let email = record.data("email").value().unwrap_or_default();

        Ok(Record {
            id: id.trim().to_string(),
            email: email.trim().to_string(),
            proof: record.data("extra").when("id", "proof").boolean(YES),
            trashed: record
                .data("extra")
                .when("id", "trashed")
                .boolean(YES)
                .unwrap_or(false),
            state: record
                .data("extra")
                .when("id", "state")
                .value()
                .map(RecordState::parse),
            statedate: record.data("extra").when("id", "statedate").date()?,
            joindate: record.data("extra").when("id", "joindate").time()?,
            demographics: record.demographic_data(),
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn proof(&self) -> Option<bool> {
        self.proof
    }

    pub fn trashed(&self) -> bool {
        self.trashed
    }

    pub fn state(&self) -> Option<&RecordState> {
        self.state.as_ref()
    }

    pub fn statedate(&self) -> Option<NaiveDate> {
        self.statedate
    }

    pub fn joindate(&self) -> Option<DateTime<FixedOffset>> {
        self.joindate
    }

    pub fn demographics(&self) -> &Demographics {
        &self.demographics
    }
}
