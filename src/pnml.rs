//! PNML loader.
//!
//! Reads the subset of PNML the analyses need: places with optional
//! initial markings, transitions, and weighted arcs. Elements are matched
//! by local tag name, so documents with or without the PNML namespace and
//! with arbitrary `<page>` nesting all load the same way.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use roxmltree::{Document, Node};
use thiserror::Error;

use crate::net::{Net, Place, PlaceId, Transition, TransitionId};

#[derive(Debug, Error)]
pub enum PnmlError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid XML: {0}")]
    Xml(#[from] roxmltree::Error),
    #[error("no <net> element found")]
    MissingNet,
    #[error("the net contains no places and no transitions")]
    EmptyNet,
    #[error("duplicate node id `{0}`")]
    DuplicateId(String),
}

/// Loads a net from a PNML file on disk.
pub fn load_pnml<P: AsRef<Path>>(path: P) -> Result<Net, PnmlError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| PnmlError::Io {
        path: path.display().to_string(),
        source,
    })?;
    parse_pnml(&text)
}

/// Parses a net from PNML text.
pub fn parse_pnml(text: &str) -> Result<Net, PnmlError> {
    let document = Document::parse(text)?;
    let net_element = document
        .descendants()
        .find(|node| node.is_element() && node.tag_name().name() == "net")
        .ok_or(PnmlError::MissingNet)?;

    let mut net = Net::empty();
    let mut place_index: HashMap<String, PlaceId> = HashMap::new();
    let mut transition_index: HashMap<String, TransitionId> = HashMap::new();

    for node in elements_named(&net_element, "place") {
        let Some(id) = node.attribute("id") else {
            continue;
        };
        let tokens = annotation_text(&node, "initialMarking")
            .and_then(|text| text.trim().parse::<u64>().ok())
            .unwrap_or(0);
        let place = match annotation_text(&node, "name") {
            Some(name) => Place::with_name(id, name, tokens),
            None => Place::new(id, tokens),
        };
        let place_id = net.add_place(place);
        if place_index.insert(id.to_string(), place_id).is_some() {
            return Err(PnmlError::DuplicateId(id.to_string()));
        }
    }

    for node in elements_named(&net_element, "transition") {
        let Some(id) = node.attribute("id") else {
            continue;
        };
        if place_index.contains_key(id) {
            return Err(PnmlError::DuplicateId(id.to_string()));
        }
        let transition = match annotation_text(&node, "name") {
            Some(name) => Transition::with_name(id, name),
            None => Transition::new(id),
        };
        let transition_id = net.add_transition(transition);
        if transition_index.insert(id.to_string(), transition_id).is_some() {
            return Err(PnmlError::DuplicateId(id.to_string()));
        }
    }

    if net.places_len() == 0 && net.transitions_len() == 0 {
        return Err(PnmlError::EmptyNet);
    }

    for node in elements_named(&net_element, "arc") {
        let source = node.attribute("source").unwrap_or_default();
        let target = node.attribute("target").unwrap_or_default();
        let weight = annotation_text(&node, "inscription")
            .and_then(|text| text.trim().parse::<u64>().ok())
            .unwrap_or(1);

        match (
            place_index.get(source),
            transition_index.get(target),
            transition_index.get(source),
            place_index.get(target),
        ) {
            // place -> transition: input arc
            (Some(&place), Some(&transition), _, _) => {
                net.add_input_arc(place, transition, weight);
            }
            // transition -> place: output arc
            (_, _, Some(&transition), Some(&place)) => {
                net.add_output_arc(place, transition, weight);
            }
            // Anything else (unknown endpoints, place->place, ...) is
            // silently ignored, like the reference loaders do.
            _ => {
                log::debug!("ignoring arc {source:?} -> {target:?}");
            }
        }
    }

    log::debug!(
        "loaded net: {} places, {} transitions",
        net.places_len(),
        net.transitions_len()
    );
    Ok(net)
}

/// All element descendants with the given local tag name, in document
/// order, regardless of namespace or `<page>` nesting.
fn elements_named<'a, 'input>(
    parent: &Node<'a, 'input>,
    name: &'static str,
) -> impl Iterator<Item = Node<'a, 'input>> {
    parent
        .descendants()
        .filter(move |node| node.is_element() && node.tag_name().name() == name)
}

/// The `<text>` payload of an annotation child such as `<name>`,
/// `<initialMarking>` or `<inscription>`.
fn annotation_text<'a>(node: &Node<'a, '_>, annotation: &str) -> Option<&'a str> {
    let child = node
        .children()
        .find(|child| child.is_element() && child.tag_name().name() == annotation)?;
    let text = child
        .descendants()
        .find(|inner| inner.is_element() && inner.tag_name().name() == "text")?;
    text.text()
}
