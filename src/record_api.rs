//! Record operations of the mailing list API (`type=record`).

use crate::domain::{NewRecord, Pagination, Record, RecordUpdate, SubscriberEmail};
use crate::error::{LyrisError, LyrisResult};
use crate::lyris_client::LyrisClient;
use crate::xml::{DatasetRequest, Reply};

const RECORD: &str = "record";
const YES: &str = "yes";

impl LyrisClient {
    #[tracing::instrument(
        name = "Adding a record to a mailing list",
        skip(self, new_record),
        fields(
            subscriber_email = %new_record.email,
            list_id = new_record.list_id
        )
    )]
    pub async fn add_record(&self, new_record: NewRecord) -> LyrisResult<Record> {
        let mut request = DatasetRequest::new();
        request
            .element("MLID", new_record.list_id)
            .put_data("email", Some(&new_record.email), &[])
            .put_demographic_data(&new_record.demographics)
            .put_extra_data("trigger", new_record.trigger.then_some(YES))
            .put_extra_data("proof", new_record.proof.then_some(YES))
            .put_extra_data("state", new_record.state.as_ref().map(AsRef::<str>::as_ref));

        let reply = self.post(RECORD, "add", &request).await?;
        let id = written_uid(&reply)?;

        Ok(Record::written(
            id,
            new_record.email.into(),
            new_record.proof.then_some(true),
            Some(new_record.state.unwrap_or_default()),
            new_record.demographics,
        ))
    }

    #[tracing::instrument(
        name = "Updating a mailing list record",
        skip(self, update),
        fields(
            subscriber_email = %update.email,
            list_id = update.list_id
        )
    )]
    pub async fn update_record(&self, update: RecordUpdate) -> LyrisResult<Record> {
        let mut request = DatasetRequest::new();
        request
            .element("MLID", update.list_id)
            .put_data("email", Some(&update.email), &[])
            .put_extra_data("new_email", update.new_email.as_ref())
            .put_extra_data("state", update.state.as_ref().map(AsRef::<str>::as_ref))
            .put_demographic_data(&update.demographics);

        let reply = self.post(RECORD, "update", &request).await?;
        let id = written_uid(&reply)?;

        let email = update.new_email.unwrap_or(update.email);

        Ok(Record::written(
            id,
            email.into(),
            None,
            update.state,
            update.demographics,
        ))
    }

    /// Fetches the record of a single subscriber.
    #[tracing::instrument(name = "Querying a mailing list record", skip(self))]
    pub async fn query_record(&self, email: &SubscriberEmail, list_id: u32) -> LyrisResult<Record> {
        let mut request = DatasetRequest::new();
        request
            .element("MLID", list_id)
            .put_data("email", Some(email), &[]);

        let reply = self.post(RECORD, "query-data", &request).await?;
        let record = reply.records().next().ok_or_else(|| {
            LyrisError::MalformedReply(format!("no record returned for {}", email))
        })?;

        Record::from_element(record)
    }

    /// Fetches every record of a list, or one page of them.
    #[tracing::instrument(name = "Querying the records of a mailing list", skip(self))]
    pub async fn query_records(
        &self,
        list_id: u32,
        pagination: Pagination,
    ) -> LyrisResult<Vec<Record>> {
        let mut request = DatasetRequest::new();
        request
            .element("MLID", list_id)
            .put_extra_data("pagenumber", pagination.page)
            .put_extra_data("pagesize", pagination.per_page);

        let reply = self.post(RECORD, "query-listdata", &request).await?;
        let records = reply
            .records()
            .map(Record::from_element)
            .collect::<LyrisResult<Vec<Record>>>()?;

        tracing::info!("Fetched {} records from list {}", records.len(), list_id);

        Ok(records)
    }

    /// Parses `email` before querying, so a malformed address never reaches the API.
    pub async fn query_record_by_address(&self, email: &str, list_id: u32) -> LyrisResult<Record> {
        let email =
            SubscriberEmail::parse(email.to_string()).map_err(LyrisError::InvalidEmail)?;

        self.query_record(&email, list_id).await
    }
}

fn written_uid(reply: &Reply) -> LyrisResult<String> {
    reply
        .message()
        .map(|uid| uid.trim().to_string())
        .filter(|uid| !uid.is_empty())
        .ok_or_else(|| LyrisError::MalformedReply(String::from("reply without a record uid")))
}
