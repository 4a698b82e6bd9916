use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use secrecy::{ExposeSecret, Secret};
use std::fmt::Display;

use crate::domain::demographics::Demographics;
use crate::error::LyrisResult;

#[derive(Debug, Clone, PartialEq, Eq)]
struct RequestElement {
    name: String,
    attributes: Vec<(String, String)>,
    text: String,
}

/// Body of a `DATASET` request document.
///
/// Operations only add their own elements; `SITE_ID` and the password are
/// written by `to_xml` ahead of everything added here.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DatasetRequest {
    elements: Vec<RequestElement>,
}

impl DatasetRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn element(&mut self, name: &str, text: impl Display) -> &mut Self {
        self.elements.push(RequestElement {
            name: name.to_string(),
            attributes: Vec::new(),
            text: text.to_string(),
        });
        self
    }

    /// Writes `<DATA type="kind" ...attributes>value</DATA>`. A missing value writes nothing.
    pub fn put_data<V: Display>(
        &mut self,
        kind: &str,
        value: Option<V>,
        attributes: &[(&str, &str)],
    ) -> &mut Self {
        if let Some(value) = value {
            let mut all_attributes = vec![(String::from("type"), kind.to_string())];
            all_attributes.extend(
                attributes
                    .iter()
                    .map(|(name, value)| (name.to_string(), value.to_string())),
            );

            self.elements.push(RequestElement {
                name: String::from("DATA"),
                attributes: all_attributes,
                text: value.to_string(),
            });
        }
        self
    }

    pub fn put_array_data<V: Display>(
        &mut self,
        kind: &str,
        values: impl IntoIterator<Item = V>,
    ) -> &mut Self {
        for value in values {
            self.put_data(kind, Some(value), &[]);
        }
        self
    }

    /// One `DATA type="demographic"` per value, so list demographics repeat their id.
    pub fn put_demographic_data(&mut self, demographics: &Demographics) -> &mut Self {
        for (id, value) in demographics.iter() {
            let id = id.to_string();
            for v in value.values() {
                self.put_data("demographic", Some(v), &[("id", id.as_str())]);
            }
        }
        self
    }

    pub fn put_extra_data<V: Display>(&mut self, id: &str, value: Option<V>) -> &mut Self {
        self.put_data("extra", value, &[("id", id)])
    }

    pub fn to_xml(&self, site_id: u32, password: &Secret<String>) -> LyrisResult<String> {
        let mut writer = Writer::new(Vec::new());

        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
        writer.write_event(Event::Start(BytesStart::new("DATASET")))?;

        let mut credentials = DatasetRequest::new();
        credentials
            .element("SITE_ID", site_id)
            .put_extra_data("password", Some(password.expose_secret()));

        for element in credentials.elements.iter().chain(self.elements.iter()) {
            write_element(&mut writer, element)?;
        }

        writer.write_event(Event::End(BytesEnd::new("DATASET")))?;

        Ok(String::from_utf8_lossy(&writer.into_inner()).into_owned())
    }
}

fn write_element(
    writer: &mut Writer<Vec<u8>>,
    element: &RequestElement,
) -> Result<(), quick_xml::Error> {
    let mut start = BytesStart::new(element.name.as_str());
    for (name, value) in &element.attributes {
        start.push_attribute((name.as_str(), value.as_str()));
    }

    writer.write_event(Event::Start(start))?;
    writer.write_event(Event::Text(BytesText::new(&element.text)))?;
    writer.write_event(Event::End(BytesEnd::new(element.name.as_str())))
}
