//! OSM API 0.6 XML documents.

use quick_xml::escape::escape;
use serde::Deserialize;

use super::error::EditError;

/// A way as read from the API, with tag order preserved.
#[derive(Debug, Clone, PartialEq)]
pub struct OsmWay {
    pub id: u64,
    pub version: u64,
    pub nodes: Vec<u64>,
    pub tags: Vec<(String, String)>,
}

impl OsmWay {
    pub fn tag(&self, key: &str) -> Option<&str> {
        self.tags
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Set or replace a tag.
    pub fn set_tag(&mut self, key: &str, value: &str) {
        match self.tags.iter_mut().find(|(k, _)| k == key) {
            Some((_, v)) => *v = value.to_string(),
            None => self.tags.push((key.to_string(), value.to_string())),
        }
    }
}

#[derive(Debug, Deserialize)]
struct OsmDocument {
    #[serde(default)]
    way: Vec<WayElement>,
}

#[derive(Debug, Deserialize)]
struct WayElement {
    #[serde(rename = "@id")]
    id: u64,
    #[serde(rename = "@version")]
    version: u64,
    #[serde(default, rename = "nd")]
    nodes: Vec<NodeRef>,
    #[serde(default, rename = "tag")]
    tags: Vec<TagElement>,
}

#[derive(Debug, Deserialize)]
struct NodeRef {
    #[serde(rename = "@ref")]
    node: u64,
}

#[derive(Debug, Deserialize)]
struct TagElement {
    #[serde(rename = "@k")]
    key: String,
    #[serde(rename = "@v")]
    value: String,
}

/// Parse the response of `GET /api/0.6/way/{id}`.
pub fn parse_way(xml: &str) -> Result<OsmWay, EditError> {
    let document: OsmDocument = quick_xml::de::from_str(xml)?;
    let way = document
        .way
        .into_iter()
        .next()
        .ok_or_else(|| EditError::InvalidResponse("No way element found in response".to_string()))?;

    Ok(OsmWay {
        id: way.id,
        version: way.version,
        nodes: way.nodes.into_iter().map(|n| n.node).collect(),
        tags: way.tags.into_iter().map(|t| (t.key, t.value)).collect(),
    })
}

/// Body for `PUT /api/0.6/way/{id}`.
pub fn way_xml(way: &OsmWay, changeset_id: u64) -> String {
    let mut xml = String::from("<osm>\n");
    xml.push_str(&format!(
        "  <way id=\"{}\" version=\"{}\" changeset=\"{}\">\n",
        way.id, way.version, changeset_id
    ));
    for node in &way.nodes {
        xml.push_str(&format!("    <nd ref=\"{}\"/>\n", node));
    }
    for (key, value) in &way.tags {
        xml.push_str(&tag_line(key, value));
    }
    xml.push_str("  </way>\n</osm>");
    xml
}

/// Body for `PUT /api/0.6/changeset/create`.
pub fn changeset_xml(tags: &[(&str, &str)]) -> String {
    let mut xml = String::from("<osm>\n  <changeset>\n");
    for (key, value) in tags {
        xml.push_str(&tag_line(key, value));
    }
    xml.push_str("  </changeset>\n</osm>");
    xml
}

fn tag_line(key: &str, value: &str) -> String {
    format!("    <tag k=\"{}\" v=\"{}\"/>\n", escape(key), escape(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    const WAY_RESPONSE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<osm version="0.6" generator="openstreetmap-cgimap 2.0.1">
 <way id="123456" visible="true" version="7" changeset="998877" timestamp="2024-05-01T10:00:00Z" user="mapper" uid="42">
  <nd ref="1001"/>
  <nd ref="1002"/>
  <nd ref="1003"/>
  <tag k="highway" v="tertiary"/>
  <tag k="name" v="Droga &quot;Polna&quot;"/>
  <tag k="smoothness" v="intermediate"/>
 </way>
</osm>"#;

    #[test]
    fn test_parse_way() {
        let way = parse_way(WAY_RESPONSE).unwrap();
        assert_eq!(way.id, 123456);
        assert_eq!(way.version, 7);
        assert_eq!(way.nodes, vec![1001, 1002, 1003]);
        assert_eq!(way.tag("highway"), Some("tertiary"));
        assert_eq!(way.tag("name"), Some("Droga \"Polna\""));
        assert_eq!(way.tag("smoothness"), Some("intermediate"));
    }

    #[test]
    fn test_parse_way_without_way_element() {
        let err = parse_way(r#"<osm version="0.6"></osm>"#).unwrap_err();
        assert!(matches!(err, EditError::InvalidResponse(_)));
    }

    #[test]
    fn test_parse_non_numeric_id() {
        let err = parse_way(r#"<osm><way id="abc" version="1"/></osm>"#).unwrap_err();
        assert!(matches!(err, EditError::InvalidResponse(_)));
    }

    #[test]
    fn test_set_tag_replaces_in_place() {
        let mut way = parse_way(WAY_RESPONSE).unwrap();
        way.set_tag("smoothness", "good");
        way.set_tag("surface", "asphalt");

        assert_eq!(way.tags[2], ("smoothness".to_string(), "good".to_string()));
        assert_eq!(way.tags[3], ("surface".to_string(), "asphalt".to_string()));
    }

    #[test]
    fn test_way_xml_carries_changeset_and_escapes() {
        let way = parse_way(WAY_RESPONSE).unwrap();
        let xml = way_xml(&way, 555);

        assert!(xml.contains(r#"<way id="123456" version="7" changeset="555">"#));
        assert!(xml.contains(r#"<nd ref="1002"/>"#));
        assert!(xml.contains(r#"v="Droga &quot;Polna&quot;""#));
        assert!(xml.ends_with("</osm>"));
    }

    #[test]
    fn test_changeset_xml() {
        let xml = changeset_xml(&[("created_by", "Asphalt"), ("comment", "a < b & c")]);
        assert!(xml.contains(r#"<tag k="created_by" v="Asphalt"/>"#));
        assert!(xml.contains(r#"v="a &lt; b &amp; c""#));
    }
}
