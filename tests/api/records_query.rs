use chrono::{DateTime, NaiveDate};
use claim::assert_none;
use lyris_client::domain::{Demographics, Pagination, Record, RecordState, SubscriberEmail};
use lyris_client::LyrisError;

use crate::helpers::{error_reply, success_reply, TestApp, LIST_ID};

struct Fixture {
    email: &'static str,
    proof: Option<bool>,
    trashed: bool,
    state: &'static str,
    statedate: Option<&'static str>,
}

const RECORDS: [Fixture; 10] = [
    Fixture { email: "one@one.not", proof: Some(true), trashed: false, state: "active", statedate: None },
    Fixture { email: "two@two.not", proof: Some(true), trashed: false, state: "active", statedate: None },
    Fixture { email: "three@three.not", proof: Some(true), trashed: false, state: "active", statedate: None },
    Fixture { email: "four@four.not", proof: Some(true), trashed: false, state: "active", statedate: None },
    Fixture { email: "five@five.not", proof: None, trashed: false, state: "active", statedate: None },
    Fixture { email: "six@six.not", proof: None, trashed: true, state: "admin", statedate: Some("2006-06-01") },
    Fixture { email: "seven@seven.not", proof: None, trashed: true, state: "unsubscribed", statedate: Some("2007-07-01") },
    Fixture { email: "eight@eight.not", proof: None, trashed: true, state: "bounced", statedate: Some("2008-08-01") },
    Fixture { email: "nine@nine.not", proof: None, trashed: false, state: "active", statedate: None },
    Fixture { email: "ten@ten.not", proof: None, trashed: false, state: "active", statedate: None },
];

fn demographics(index: usize) -> Demographics {
    match index {
        0 => Demographics::new()
            .with(1, "on")
            .with(2, "01/02/03")
            .with(3, vec!["one", "three"])
            .with(4, vec!["two", "four"])
            .with(5, "three")
            .with(6, "six")
            .with(7, "value for every demographic")
            .with(8, "the date value in demographic 2 should be Jan 2, 2003"),
        1 => Demographics::new()
            .with(1, "on")
            .with(2, "02/22/22")
            .with(5, "three")
            .with(6, "six")
            .with(7, "no value for multiple selection demographics")
            .with(8, "the date value in demographic 2 should be Feb 22, 1922"),
        2 => Demographics::new()
            .with(1, "on")
            .with(2, "03/03/33")
            .with(3, vec!["one", "three"])
            .with(4, vec!["two", "four"])
            .with(5, "three")
            .with(6, "six")
            .with(7, "every attribute enabled")
            .with(8, "the date value in demographic 2 should be Mar 3, 1933"),
        4 => Demographics::new().with(7, "active"),
        5 => Demographics::new().with(7, "trashed by administrator"),
        6 => Demographics::new().with(7, "unsubscribed"),
        7 => Demographics::new().with(7, "bounced"),
        _ => Demographics::new(),
    }
}

fn uid(index: usize) -> String {
    format!("abcdef{:04}", index + 1)
}

fn record_xml(index: usize) -> String {
    let fixture = &RECORDS[index];
    let mut xml = format!(
        r#"<RECORD><DATA type="email">{}</DATA><DATA type="extra" id="uid">{}</DATA><DATA type="extra" id="state">{}</DATA>"#,
        fixture.email,
        uid(index),
        fixture.state
    );

    if fixture.proof == Some(true) {
        xml.push_str(r#"<DATA type="extra" id="proof">yes</DATA>"#);
    }
    if fixture.trashed {
        xml.push_str(r#"<DATA type="extra" id="trashed">yes</DATA>"#);
    }
    if let Some(statedate) = fixture.statedate {
        xml.push_str(&format!(
            r#"<DATA type="extra" id="statedate">{}</DATA>"#,
            statedate
        ));
    }
    for (id, value) in demographics(index).iter() {
        for v in value.values() {
            xml.push_str(&format!(
                r#"<DATA type="demographic" id="{}">{}</DATA>"#,
                id, v
            ));
        }
    }

    xml.push_str("</RECORD>");
    xml
}

fn records_xml(range: std::ops::Range<usize>) -> String {
    range.map(record_xml).collect()
}

fn assert_matches_fixture(record: &Record, index: usize) {
    let fixture = &RECORDS[index];

    assert_eq!(record.id(), uid(index));
    assert_eq!(record.email(), fixture.email);
    assert_eq!(record.proof(), fixture.proof);
    assert_eq!(record.trashed(), fixture.trashed);
    assert_eq!(record.state(), Some(&RecordState::parse(fixture.state)));
    assert_eq!(
        record.statedate(),
        fixture
            .statedate
            .map(|date| NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap())
    );
    assert_eq!(record.demographics(), &demographics(index));
}

fn email(address: &str) -> SubscriberEmail {
    SubscriberEmail::parse(address.to_string()).unwrap()
}

#[tokio::test]
async fn query_all_returns_every_record() {
    let test_app = TestApp::spawn_app().await;

    test_app
        .mount_reply(
            "query-listdata",
            &["<MLID>1</MLID>"],
            success_reply(&records_xml(0..10)),
        )
        .await;

    let records = test_app
        .lyris_client
        .query_records(LIST_ID, Pagination::default())
        .await
        .unwrap();

    assert_eq!(records.len(), 10);
    for (index, record) in records.iter().enumerate() {
        assert_matches_fixture(record, index);
    }
}

#[tokio::test]
async fn query_all_of_an_empty_list_returns_no_records() {
    let test_app = TestApp::spawn_app().await;

    test_app
        .mount_reply("query-listdata", &["<MLID>2</MLID>"], success_reply(""))
        .await;

    let records = test_app
        .lyris_client
        .query_records(2, Pagination::default())
        .await
        .unwrap();

    assert!(records.is_empty());
}

#[tokio::test]
async fn query_all_paginated_walks_every_page() {
    let test_app = TestApp::spawn_app().await;
    let pages = [(1, 0..4), (2, 4..8), (3, 8..10)];

    for (page, range) in pages.iter().cloned() {
        let page_number = format!(r#"<DATA type="extra" id="pagenumber">{}</DATA>"#, page);
        test_app
            .mount_reply(
                "query-listdata",
                &[
                    "<MLID>3</MLID>",
                    page_number.as_str(),
                    r#"<DATA type="extra" id="pagesize">4</DATA>"#,
                ],
                success_reply(&records_xml(range)),
            )
            .await;
    }

    let mut index = 0;
    for (page, range) in pages {
        let records = test_app
            .lyris_client
            .query_records(3, Pagination::page(page, 4))
            .await
            .unwrap();

        assert_eq!(records.len(), range.len());
        for record in &records {
            assert_matches_fixture(record, index);
            index += 1;
        }
    }

    assert_eq!(index, 10);
}

#[tokio::test]
async fn query_all_skips_demographics_without_a_numeric_id() {
    let test_app = TestApp::spawn_app().await;
    let odd_record = r#"<RECORD>
        <DATA type="email">odd@email.not</DATA>
        <DATA type="extra" id="uid">abcdef9999</DATA>
        <DATA type="extra" id="state">active</DATA>
        <DATA type="demographic">x</DATA>
        <DATA type="demographic" id="seven">bounced</DATA>
        <DATA type="demographic" id="7">kept</DATA>
    </RECORD>"#;

    test_app
        .mount_reply(
            "query-listdata",
            &["<MLID>4</MLID>"],
            success_reply(&format!("{}{}", record_xml(0), odd_record)),
        )
        .await;

    let records = test_app
        .lyris_client
        .query_records(4, Pagination::default())
        .await
        .unwrap();

    assert_eq!(records.len(), 2);
    assert_matches_fixture(&records[0], 0);
    assert_eq!(records[1].id(), "abcdef9999");
    assert_eq!(records[1].demographics(), &Demographics::new().with(7, "kept"));
}

#[tokio::test]
async fn query_active_email() {
    let test_app = TestApp::spawn_app().await;

    test_app
        .mount_reply(
            "query-data",
            &["<MLID>1</MLID>", r#"<DATA type="email">active@email.not</DATA>"#],
            success_reply(
                r#"<RECORD>
                    <DATA type="email">active@email.not</DATA>
                    <DATA type="extra" id="uid">abcdef1111</DATA>
                    <DATA type="extra" id="state">active</DATA>
                    <DATA type="extra" id="proof">yes</DATA>
                    <DATA type="extra" id="joindate">2001-01-11 01:01:01 PST</DATA>
                    <DATA type="demographic" id="2">01/11/81</DATA>
                    <DATA type="demographic" id="7">this email is active</DATA>
                </RECORD>"#,
            ),
        )
        .await;

    let record = test_app
        .lyris_client
        .query_record(&email("active@email.not"), LIST_ID)
        .await
        .unwrap();

    assert_eq!(record.id(), "abcdef1111");
    assert_eq!(record.email(), "active@email.not");
    assert_eq!(record.proof(), Some(true));
    assert!(!record.trashed());
    assert_eq!(record.state(), Some(&RecordState::Active));
    assert_eq!(
        record.joindate(),
        Some(DateTime::parse_from_rfc3339("2001-01-11T01:01:01-08:00").unwrap())
    );
    assert_none!(record.statedate());
    assert_eq!(
        record.demographics(),
        &Demographics::new()
            .with(2, "01/11/81")
            .with(7, "this email is active")
    );
}

async fn query_trashed_email(
    address: &str,
    uid: &str,
    state: &str,
    joindate: &str,
    demographic: &str,
) -> Record {
    let test_app = TestApp::spawn_app().await;
    let email_fragment = format!(r#"<DATA type="email">{}</DATA>"#, address);

    test_app
        .mount_reply(
            "query-data",
            &[email_fragment.as_str()],
            success_reply(&format!(
                r#"<RECORD>
                    <DATA type="email">{address}</DATA>
                    <DATA type="extra" id="uid">{uid}</DATA>
                    <DATA type="extra" id="state">{state}</DATA>
                    <DATA type="extra" id="trashed">yes</DATA>
                    <DATA type="extra" id="joindate">{joindate}</DATA>
                    <DATA type="extra" id="statedate">2009-11-17</DATA>
                    <DATA type="demographic" id="7">{demographic}</DATA>
                </RECORD>"#
            )),
        )
        .await;

    test_app
        .lyris_client
        .query_record(&email(address), LIST_ID)
        .await
        .unwrap()
}

#[tokio::test]
async fn query_admin_trashed_email() {
    let record = query_trashed_email(
        "admin.trashed@email.not",
        "abcdef2222",
        "admin",
        "2002-02-12 02:02:02 PST",
        "this email is admin trashed",
    )
    .await;

    assert_eq!(record.id(), "abcdef2222");
    assert_eq!(record.email(), "admin.trashed@email.not");
    assert_none!(record.proof());
    assert!(record.trashed());
    assert_eq!(record.state(), Some(&RecordState::Admin));
    assert_eq!(
        record.joindate(),
        Some(DateTime::parse_from_rfc3339("2002-02-12T02:02:02-08:00").unwrap())
    );
    assert_eq!(record.statedate(), NaiveDate::from_ymd_opt(2009, 11, 17));
}

#[tokio::test]
async fn query_bounced_email() {
    let record = query_trashed_email(
        "bounced@email.not",
        "abcdef3333",
        "bounced",
        "2003-03-13 03:03:03 PST",
        "this email is bounced",
    )
    .await;

    assert_eq!(record.id(), "abcdef3333");
    assert!(record.trashed());
    assert_eq!(record.state(), Some(&RecordState::Bounced));
    assert_eq!(
        record.demographics(),
        &Demographics::new().with(7, "this email is bounced")
    );
}

#[tokio::test]
async fn query_unsubscribed_email() {
    let record = query_trashed_email(
        "unsubscribed@email.not",
        "abcdef4444",
        "unsubscribed",
        "2004-04-14 04:04:04 PDT",
        "this email is unsubscribed",
    )
    .await;

    assert_eq!(record.id(), "abcdef4444");
    assert_eq!(record.state(), Some(&RecordState::Unsubscribed));
    assert_eq!(
        record.joindate(),
        Some(DateTime::parse_from_rfc3339("2004-04-14T04:04:04-07:00").unwrap())
    );
    assert_eq!(record.statedate(), NaiveDate::from_ymd_opt(2009, 11, 17));
}

#[tokio::test]
async fn query_email_not_found_fails() {
    let test_app = TestApp::spawn_app().await;

    test_app
        .mount_reply(
            "query-data",
            &[r#"<DATA type="email">missing@email.not</DATA>"#],
            error_reply("Can't find email address"),
        )
        .await;

    let err = test_app
        .lyris_client
        .query_record(&email("missing@email.not"), LIST_ID)
        .await
        .unwrap_err();

    assert!(matches!(err, LyrisError::Api(message) if message == "Can't find email address"));
}

#[tokio::test]
async fn query_with_an_invalid_address_never_reaches_the_api() {
    let test_app = TestApp::spawn_app().await;

    let err = test_app
        .lyris_client
        .query_record_by_address("definitely-not-an-email", LIST_ID)
        .await
        .unwrap_err();

    assert!(matches!(err, LyrisError::InvalidEmail(_)));
    assert!(test_app
        .lyris_server
        .received_requests()
        .await
        .unwrap()
        .is_empty());
}
