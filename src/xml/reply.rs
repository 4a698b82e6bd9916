use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, TimeZone};

use crate::domain::demographics::Demographics;
use crate::error::{LyrisError, LyrisResult};

const SUCCESS: &str = "success";

/// Owned copy of a reply element, detached from the parsed document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    name: String,
    attributes: Vec<(String, String)>,
    text: String,
    children: Vec<Element>,
}

impl Element {
    fn from_node(node: roxmltree::Node<'_, '_>) -> Element {
        Element {
            name: node.tag_name().name().to_string(),
            attributes: node
                .attributes()
                .map(|attribute| (attribute.name().to_string(), attribute.value().to_string()))
                .collect(),
            text: node
                .descendants()
                .filter(|descendant| descendant.is_text())
                .filter_map(|descendant| descendant.text())
                .collect(),
            children: node
                .children()
                .filter(|child| child.is_element())
                .map(Element::from_node)
                .collect(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(attribute, _)| attribute == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> {
        self.children.iter().filter(move |child| child.name == name)
    }

    pub fn child<'a>(&'a self, name: &'a str) -> Option<&'a Element> {
        self.children_named(name).next()
    }

    /// Looks up the first `DATA` child of the given type.
    pub fn data<'a>(&'a self, kind: &'a str) -> DataLookup<'a> {
        DataLookup {
            record: self,
            kind,
            conditions: Vec::new(),
            attribute: None,
        }
    }

    fn data_elements<'a>(&'a self, kind: &'a str) -> impl Iterator<Item = &'a Element> {
        self.children_named("DATA")
            .filter(move |data| data.attribute("type") == Some(kind))
    }

    /// Texts of every `DATA` child of the given type, in document order.
    pub fn array_data<'a>(&'a self, kind: &'a str) -> Vec<&'a str> {
        self.data_elements(kind).map(Element::text).collect()
    }

    /// Groups the `demographic` data of a record by numeric id.
    ///
    /// Elements without a numeric id are skipped.
    pub fn demographic_data(&self) -> Demographics {
        let mut demographics = Demographics::new();

        for data in self.data_elements("demographic") {
            let raw_id = data.attribute("id").unwrap_or_default();
            match raw_id.trim().parse::<u32>() {
                Ok(id) => demographics.append(id, data.text().to_string()),
                Err(_) => tracing::warn!(
                    "Skipping demographic {:?} with invalid id {:?}",
                    data.text(),
                    raw_id
                ),
            }
        }

        demographics
    }
}

/// Selection of one `DATA` element of a record, with typed accessors for its value.
///
/// The value is the element text unless `select` names an attribute to read instead.
#[derive(Debug, Clone)]
pub struct DataLookup<'a> {
    record: &'a Element,
    kind: &'a str,
    conditions: Vec<(&'a str, &'a str)>,
    attribute: Option<&'a str>,
}

impl<'a> DataLookup<'a> {
    /// Restricts the lookup to elements whose `attribute` equals `value`.
    pub fn when(mut self, attribute: &'a str, value: &'a str) -> Self {
        self.conditions.push((attribute, value));
        self
    }

    pub fn select(mut self, attribute: &'a str) -> Self {
        self.attribute = Some(attribute);
        self
    }

    pub fn element(&self) -> Option<&'a Element> {
        self.record.data_elements(self.kind).find(|data| {
            self.conditions
                .iter()
                .all(|(attribute, value)| data.attribute(attribute) == Some(*value))
        })
    }

    pub fn value(&self) -> Option<&'a str> {
        let element = self.element()?;
        match self.attribute {
            Some(attribute) => element.attribute(attribute),
            None => Some(element.text()),
        }
    }

    pub fn boolean(&self, expected: &str) -> Option<bool> {
        self.value().map(|value| value == expected)
    }

    pub fn date(&self) -> LyrisResult<Option<NaiveDate>> {
        self.coerce(parse_date)
    }

    pub fn time(&self) -> LyrisResult<Option<DateTime<FixedOffset>>> {
        self.coerce(parse_time)
    }

    pub fn xml_time(&self) -> LyrisResult<Option<DateTime<FixedOffset>>> {
        self.coerce(|value| DateTime::parse_from_rfc3339(value.trim()).ok())
    }

    /// Counts are informational, so a value that is not a number reads as absent.
    pub fn integer(&self) -> Option<i64> {
        let value = self.value()?;
        match value.replace(',', "").trim().parse::<i64>() {
            Ok(integer) => Some(integer),
            Err(_) => {
                tracing::warn!("Ignoring non numeric {} = {:?}", self.describe(), value);
                None
            }
        }
    }

    fn coerce<T>(&self, parse: impl FnOnce(&str) -> Option<T>) -> LyrisResult<Option<T>> {
        match self.value() {
            None => Ok(None),
            Some(value) => parse(value)
                .map(Some)
                .ok_or_else(|| LyrisError::invalid_field(self.describe(), value)),
        }
    }

    fn describe(&self) -> String {
        let conditions: String = self
            .conditions
            .iter()
            .map(|(attribute, value)| format!("[@{}='{}']", attribute, value))
            .collect();

        format!("DATA[@type='{}']{}", self.kind, conditions)
    }
}

/// A parsed reply document rooted at `DATASET`.
#[derive(Debug, Clone)]
pub struct Reply {
    dataset: Element,
}

impl Reply {
    pub fn parse(body: &str) -> LyrisResult<Reply> {
        let document = roxmltree::Document::parse(body)?;
        let dataset = Element::from_node(document.root_element());

        if dataset.name() != "DATASET" {
            return Err(LyrisError::MalformedReply(format!(
                "expected a DATASET document, found {}",
                dataset.name()
            )));
        }

        Ok(Reply { dataset })
    }

    pub fn is_success(&self) -> bool {
        self.dataset
            .children_named("TYPE")
            .any(|kind| kind.text().trim() == SUCCESS)
    }

    /// Text of the first top level `DATA`: the error message or the uid of a written record.
    pub fn message(&self) -> Option<&str> {
        self.dataset.child("DATA").map(Element::text)
    }

    /// Turns a reply not marked successful into an API error carrying the server message.
    pub fn into_success(self) -> LyrisResult<Reply> {
        if self.is_success() {
            return Ok(self);
        }

        let message = self
            .message()
            .map(|message| message.trim().to_string())
            .unwrap_or_else(|| String::from("unknown error"));

        Err(LyrisError::Api(message))
    }

    pub fn records(&self) -> impl Iterator<Item = &Element> {
        self.dataset.children_named("RECORD")
    }
}

fn parse_date(value: &str) -> Option<NaiveDate> {
    let date = value.trim().split(|c: char| c == ' ' || c == 'T').next()?;

    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(date, "%m/%d/%Y"))
        .ok()
}

fn parse_time(value: &str) -> Option<DateTime<FixedOffset>> {
    let value = value.trim();

    if let Ok(time) = DateTime::parse_from_rfc3339(value) {
        return Some(time);
    }
    if let Ok(time) = DateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S %z") {
        return Some(time);
    }

    let (local, offset_hours) = match value.rsplit_once(' ') {
        Some((local, zone)) => match zone_offset_hours(zone) {
            Some(hours) => (local, hours),
            None => (value, 0),
        },
        None => (value, 0),
    };

    let naive = NaiveDateTime::parse_from_str(local, "%Y-%m-%d %H:%M:%S").ok()?;
    FixedOffset::east_opt(offset_hours * 3600)?
        .from_local_datetime(&naive)
        .single()
}

fn zone_offset_hours(zone: &str) -> Option<i32> {
    match zone.to_ascii_uppercase().as_str() {
        "UTC" | "GMT" | "Z" => Some(0),
        "EST" => Some(-5),
        "EDT" => Some(-4),
        "CST" => Some(-6),
        "CDT" => Some(-5),
        "MST" => Some(-7),
        "MDT" => Some(-6),
        "PST" => Some(-8),
        "PDT" => Some(-7),
        _ => None,
    }
}
