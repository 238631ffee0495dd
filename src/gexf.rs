//! GEXF reading: which color each node layer is drawn with.
//!
//! Only two things are pulled out of the graph file: the layer attribute
//! value of every node and its `viz:color`. Edges, positions and sizes are
//! ignored.

use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::Path;

use roxmltree::Node;
use tracing::{info, warn};

use crate::error::{Error, Result};
use crate::svg::dom::parsing_options;

/// Node attribute holding the layer name in Gephi exports.
pub const DEFAULT_LAYER_ATTRIBUTE: &str = "layer";

/// Layer name to CSS color, sorted by layer name.
pub type LayerColors = BTreeMap<String, String>;

/// Read a GEXF file and collect its layer colors.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not well-formed XML.
pub fn read_layer_colors(path: &Path, layer_attribute: &str) -> Result<LayerColors> {
    let xml = fs::read_to_string(path).map_err(|err| Error::read(path, err))?;
    parse_layer_colors(&xml, layer_attribute)
}

/// Collect the color of every layer from GEXF source text.
///
/// Nodes missing either a layer value or a color are skipped. When two
/// nodes of one layer disagree, the first color wins and the conflict is
/// logged.
///
/// # Errors
///
/// Returns an error if the text is not well-formed XML or has no `<gexf>`
/// root.
pub fn parse_layer_colors(xml: &str, layer_attribute: &str) -> Result<LayerColors> {
    let doc = roxmltree::Document::parse_with_options(xml, parsing_options())?;
    let root = doc.root_element();
    if root.tag_name().name() != "gexf" {
        return Err(Error::MissingRoot("gexf"));
    }

    let layer_ids = layer_attribute_ids(root, layer_attribute);
    let nodes: Vec<Node<'_, '_>> = root
        .descendants()
        .filter(|n| n.has_tag_name("node"))
        .collect();
    info!("Found {} nodes", nodes.len());

    let mut colors = LayerColors::new();
    for node in nodes {
        let Some(layer) = node_layer(node, &layer_ids) else {
            continue;
        };
        let Some(color) = node_color(node) else {
            continue;
        };

        match colors.get(layer) {
            None => {
                colors.insert(layer.to_string(), color);
            }
            Some(existing) if *existing != color => {
                warn!(
                    layer,
                    existing = existing.as_str(),
                    new = color.as_str(),
                    "layer has different color values"
                );
            }
            Some(_) => {}
        }
    }

    Ok(colors)
}

/// Ids under which the layer attribute may be referenced by `attvalue@for`.
///
/// Gephi usually uses the attribute title as its id, but numeric ids with a
/// `title` are valid GEXF too.
fn layer_attribute_ids<'a>(root: Node<'a, '_>, layer_attribute: &'a str) -> HashSet<&'a str> {
    let mut ids: HashSet<&str> = HashSet::from([layer_attribute]);
    for attributes in root
        .descendants()
        .filter(|n| n.has_tag_name("attributes") && n.attribute("class") != Some("edge"))
    {
        for attribute in attributes.children().filter(|n| n.has_tag_name("attribute")) {
            if attribute.attribute("title") == Some(layer_attribute) {
                if let Some(id) = attribute.attribute("id") {
                    ids.insert(id);
                }
            }
        }
    }
    ids
}

fn node_layer<'a>(node: Node<'a, '_>, layer_ids: &HashSet<&str>) -> Option<&'a str> {
    node.descendants()
        .find(|n| {
            n.has_tag_name("attvalue")
                && n.attribute("for").is_some_and(|id| layer_ids.contains(id))
        })
        .and_then(|n| n.attribute("value"))
        .filter(|value| !value.is_empty())
}

fn node_color(node: Node<'_, '_>) -> Option<String> {
    let color = node.descendants().find(|n| {
        n.has_tag_name("color")
            && n.tag_name()
                .namespace()
                .is_some_and(|ns| ns.trim_end_matches('/').ends_with("viz"))
    })?;
    let channel = |name: &str| color.attribute(name).unwrap_or("0");
    Some(format!(
        "rgb({}, {}, {})",
        channel("r"),
        channel("g"),
        channel("b")
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    const GEXF_13: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<gexf xmlns="http://gexf.net/1.3" xmlns:viz="http://gexf.net/1.3/viz" version="1.3">
  <graph defaultedgetype="directed">
    <attributes class="node">
      <attribute id="layer" title="layer" type="string"/>
    </attributes>
    <nodes>
      <node id="0" label="insulin">
        <attvalues><attvalue for="layer" value="Gene"/></attvalues>
        <viz:size value="20"/>
        <viz:color r="228" g="26" b="28"/>
      </node>
      <node id="1" label="glucose">
        <attvalues><attvalue for="layer" value="Metabolite"/></attvalues>
        <viz:color r="55" g="126" b="184"/>
      </node>
      <node id="2" label="gck">
        <attvalues><attvalue for="layer" value="Gene"/></attvalues>
        <viz:color r="228" g="26" b="28"/>
      </node>
    </nodes>
  </graph>
</gexf>"#;

    #[test]
    fn test_parse_layer_colors_collects_sorted_layers() {
        let colors = parse_layer_colors(GEXF_13, DEFAULT_LAYER_ATTRIBUTE).unwrap();
        let entries: Vec<_> = colors.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect();
        assert_eq!(
            entries,
            vec![("Gene", "rgb(228, 26, 28)"), ("Metabolite", "rgb(55, 126, 184)")]
        );
    }

    #[test]
    fn test_first_color_wins_on_conflict() {
        let xml = GEXF_13.replace(
            r#"<node id="2" label="gck">
        <attvalues><attvalue for="layer" value="Gene"/></attvalues>
        <viz:color r="228" g="26" b="28"/>"#,
            r#"<node id="2" label="gck">
        <attvalues><attvalue for="layer" value="Gene"/></attvalues>
        <viz:color r="1" g="2" b="3"/>"#,
        );
        let colors = parse_layer_colors(&xml, DEFAULT_LAYER_ATTRIBUTE).unwrap();
        assert_eq!(colors["Gene"], "rgb(228, 26, 28)");
    }

    #[test]
    fn test_missing_channels_default_to_zero() {
        let xml = r#"<gexf xmlns="http://gexf.net/1.3" xmlns:viz="http://gexf.net/1.3/viz">
          <graph><nodes>
            <node id="a"><attvalues><attvalue for="layer" value="Drug"/></attvalues>
              <viz:color g="128"/></node>
          </nodes></graph></gexf>"#;
        let colors = parse_layer_colors(xml, DEFAULT_LAYER_ATTRIBUTE).unwrap();
        assert_eq!(colors["Drug"], "rgb(0, 128, 0)");
    }

    #[test]
    fn test_nodes_without_layer_or_color_are_skipped() {
        let xml = r#"<gexf xmlns="http://gexf.net/1.3" xmlns:viz="http://gexf.net/1.3/viz">
          <graph><nodes>
            <node id="a"><viz:color r="1" g="1" b="1"/></node>
            <node id="b"><attvalues><attvalue for="layer" value="Drug"/></attvalues></node>
            <node id="c"><attvalues><attvalue for="layer" value=""/></attvalues>
              <viz:color r="1" g="1" b="1"/></node>
          </nodes></graph></gexf>"#;
        let colors = parse_layer_colors(xml, DEFAULT_LAYER_ATTRIBUTE).unwrap();
        assert!(colors.is_empty());
    }

    #[test]
    fn test_numeric_attribute_id_is_resolved_by_title() {
        let xml = r#"<gexf xmlns="http://www.gexf.net/1.2draft" xmlns:viz="http://www.gexf.net/1.2draft/viz">
          <graph>
            <attributes class="node">
              <attribute id="0" title="community" type="string"/>
              <attribute id="1" title="layer" type="string"/>
            </attributes>
            <nodes>
              <node id="a"><attvalues>
                <attvalue for="0" value="ignored"/>
                <attvalue for="1" value="Protein"/>
              </attvalues><viz:color r="10" g="20" b="30"/></node>
            </nodes>
          </graph></gexf>"#;
        let colors = parse_layer_colors(xml, DEFAULT_LAYER_ATTRIBUTE).unwrap();
        assert_eq!(colors.len(), 1);
        assert_eq!(colors["Protein"], "rgb(10, 20, 30)");
    }

    #[test]
    fn test_custom_layer_attribute() {
        let xml = GEXF_13.replace("for=\"layer\"", "for=\"kind\"");
        assert!(parse_layer_colors(&xml, DEFAULT_LAYER_ATTRIBUTE).unwrap().is_empty());
        let colors = parse_layer_colors(&xml, "kind").unwrap();
        assert_eq!(colors.len(), 2);
    }

    #[test]
    fn test_color_outside_viz_namespace_is_ignored() {
        let xml = r#"<gexf xmlns="http://gexf.net/1.3">
          <graph><nodes>
            <node id="a"><attvalues><attvalue for="layer" value="Drug"/></attvalues>
              <color r="1" g="1" b="1"/></node>
          </nodes></graph></gexf>"#;
        assert!(parse_layer_colors(xml, DEFAULT_LAYER_ATTRIBUTE).unwrap().is_empty());
    }

    #[test]
    fn test_wrong_root_is_rejected() {
        let err = parse_layer_colors("<svg/>", DEFAULT_LAYER_ATTRIBUTE).unwrap_err();
        assert!(matches!(err, Error::MissingRoot("gexf")));
    }

    #[test]
    fn test_malformed_xml_is_an_error() {
        let err = parse_layer_colors("<gexf><graph>", DEFAULT_LAYER_ATTRIBUTE).unwrap_err();
        assert!(matches!(err, Error::Xml(_)));
    }

    #[test]
    fn test_read_layer_colors_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.gexf");
        let err = read_layer_colors(&missing, DEFAULT_LAYER_ATTRIBUTE).unwrap_err();
        assert!(matches!(err, Error::Read { .. }));
    }
}
