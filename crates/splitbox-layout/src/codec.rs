// ABOUTME: Versioned layout document format for saving and restoring trees.
// ABOUTME: Detaches image payloads into a side table and re-attaches them on load.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use splitbox_core::{CodecSettings, ConfigError};

use crate::ids::NodeId;
use crate::node::{Grid, LayoutError, Node, NodeKind, Padding, Ratio, SplitAxis};
use crate::tree::Tree;

/// Version written by [`save`]; any `1.x` document is accepted on load
pub const DOCUMENT_VERSION: &str = "1.0";

const IMAGE_REF_PREFIX: &str = "img_";

/// On-disk representation of a layout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub version: String,
    /// Older files call this `layout`
    #[serde(alias = "layout")]
    pub boxes: Vec<NodeRecord>,
    #[serde(default)]
    pub images: Vec<ImageEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageEntry {
    pub id: String,
    pub data: Arc<str>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecordKind {
    #[serde(rename = "leaf", alias = "single")]
    Leaf,
    #[serde(rename = "binary-split")]
    BinarySplit,
    #[serde(rename = "grid")]
    Grid,
    /// Older files name the split axis in the kind itself
    #[serde(rename = "vertical", skip_serializing)]
    LegacyVertical,
    #[serde(rename = "horizontal", skip_serializing)]
    LegacyHorizontal,
}

/// Wire form of one node; which optional fields are set depends on `kind`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeRecord {
    pub id: NodeId,
    #[serde(alias = "type")]
    pub kind: RecordKind,
    #[serde(default)]
    pub padding: Padding,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    /// Inline payload while editing, an `img_N` reference at rest
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_image: Option<Arc<str>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NodeRecord>,
    #[serde(default, alias = "splitRatio", skip_serializing_if = "Option::is_none")]
    pub ratio: Option<f32>,
    #[serde(default, alias = "splitDirection", skip_serializing_if = "Option::is_none")]
    pub split_axis: Option<SplitAxis>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rows: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub columns: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodecOptions {
    /// Store identical image payloads once
    pub dedupe_images: bool,
    /// Indent JSON output
    pub pretty: bool,
}

impl Default for CodecOptions {
    fn default() -> Self {
        Self {
            dedupe_images: true,
            pretty: true,
        }
    }
}

impl From<&CodecSettings> for CodecOptions {
    fn from(settings: &CodecSettings) -> Self {
        Self {
            dedupe_images: settings.dedupe_images,
            pretty: settings.pretty,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("No layout directory: {0}")]
    LayoutDir(#[from] ConfigError),

    #[error("Unsupported layout version: {0}")]
    UnsupportedVersion(String),

    #[error("Layout contains no boxes")]
    Empty,

    #[error("Duplicate node id: {0}")]
    DuplicateId(NodeId),

    #[error("Malformed node {id}: {reason}")]
    MalformedNode { id: NodeId, reason: String },

    #[error("Invalid node {id}: {source}")]
    InvalidNode {
        id: NodeId,
        #[source]
        source: LayoutError,
    },
}

/// Serialize a tree, detaching images with default options
pub fn save(tree: &Tree) -> Document {
    save_with(tree, &CodecOptions::default())
}

/// Serialize a tree. Image payloads are numbered `img_1`, `img_2`, ... in
/// pre-order; with `dedupe_images` a repeated payload reuses its first number.
pub fn save_with(tree: &Tree, options: &CodecOptions) -> Document {
    let mut images = ImageTable {
        entries: Vec::new(),
        by_payload: HashMap::new(),
        dedupe: options.dedupe_images,
    };
    let boxes = tree
        .roots()
        .iter()
        .map(|root| to_record(root, &mut images))
        .collect();
    tracing::debug!(images = images.entries.len(), "layout saved");
    Document {
        version: DOCUMENT_VERSION.to_string(),
        boxes,
        images: images.entries,
    }
}

struct ImageTable {
    entries: Vec<ImageEntry>,
    by_payload: HashMap<Arc<str>, String>,
    dedupe: bool,
}

impl ImageTable {
    fn detach(&mut self, payload: &Arc<str>) -> Arc<str> {
        if self.dedupe {
            if let Some(id) = self.by_payload.get(payload) {
                return Arc::from(id.as_str());
            }
        }
        let id = format!("{IMAGE_REF_PREFIX}{}", self.entries.len() + 1);
        self.entries.push(ImageEntry {
            id: id.clone(),
            data: Arc::clone(payload),
        });
        if self.dedupe {
            self.by_payload.insert(Arc::clone(payload), id.clone());
        }
        Arc::from(id)
    }
}

fn to_record(node: &Node, images: &mut ImageTable) -> NodeRecord {
    let mut record = NodeRecord {
        id: node.id.clone(),
        kind: RecordKind::Leaf,
        padding: node.padding,
        background_color: node.background_color.clone(),
        background_image: node.background_image.as_ref().map(|p| images.detach(p)),
        children: Vec::new(),
        ratio: None,
        split_axis: None,
        rows: None,
        columns: None,
    };
    match &node.kind {
        NodeKind::Leaf => {}
        NodeKind::Split(split) => {
            record.kind = RecordKind::BinarySplit;
            record.ratio = Some(split.ratio().get());
            record.split_axis = Some(split.axis());
        }
        NodeKind::Grid(grid) => {
            record.kind = RecordKind::Grid;
            record.rows = Some(grid.rows());
            record.columns = Some(grid.columns());
        }
    }
    record.children = node
        .children()
        .iter()
        .map(|child| to_record(child, images))
        .collect();
    record
}

/// Rebuild a tree, re-attaching image payloads.
///
/// References missing from the image table are kept verbatim, so documents
/// with inline images load too.
pub fn load(document: &Document) -> Result<Tree, CodecError> {
    check_version(&document.version)?;
    if document.boxes.is_empty() {
        return Err(CodecError::Empty);
    }
    let images: HashMap<&str, &Arc<str>> = document
        .images
        .iter()
        .map(|img| (img.id.as_str(), &img.data))
        .collect();
    let mut seen = HashSet::new();
    let roots = document
        .boxes
        .iter()
        .map(|record| from_record(record, &images, &mut seen))
        .collect::<Result<Vec<_>, _>>()?;
    tracing::debug!(nodes = seen.len(), images = images.len(), "layout loaded");
    Ok(Tree::new(roots))
}

fn check_version(version: &str) -> Result<(), CodecError> {
    match version.split('.').next() {
        Some("1") => Ok(()),
        _ => Err(CodecError::UnsupportedVersion(version.to_string())),
    }
}

fn from_record(
    record: &NodeRecord,
    images: &HashMap<&str, &Arc<str>>,
    seen: &mut HashSet<NodeId>,
) -> Result<Arc<Node>, CodecError> {
    if !seen.insert(record.id.clone()) {
        return Err(CodecError::DuplicateId(record.id.clone()));
    }
    let malformed = |reason: &str| CodecError::MalformedNode {
        id: record.id.clone(),
        reason: reason.to_string(),
    };

    let mut children = record
        .children
        .iter()
        .map(|child| from_record(child, images, seen))
        .collect::<Result<Vec<_>, _>>()?;

    // A `single` node with two children and an axis is how older files wrote splits
    let axis = match record.kind {
        RecordKind::LegacyVertical => Some(SplitAxis::Vertical),
        RecordKind::LegacyHorizontal => Some(SplitAxis::Horizontal),
        RecordKind::BinarySplit => Some(
            record
                .split_axis
                .ok_or_else(|| malformed("split without splitAxis"))?,
        ),
        RecordKind::Leaf if !children.is_empty() => Some(
            record
                .split_axis
                .ok_or_else(|| malformed("leaf with children"))?,
        ),
        RecordKind::Leaf | RecordKind::Grid => None,
    };

    let kind = match (record.kind, axis) {
        (RecordKind::Grid, _) => {
            let (Some(rows), Some(columns)) = (record.rows, record.columns) else {
                return Err(malformed("grid without rows/columns"));
            };
            let grid = Grid::restore(rows, columns, children).map_err(|source| {
                CodecError::InvalidNode {
                    id: record.id.clone(),
                    source,
                }
            })?;
            NodeKind::Grid(grid)
        }
        (_, Some(axis)) => {
            if children.len() != 2 {
                return Err(malformed("split needs exactly two children"));
            }
            let second = children.pop().ok_or_else(|| malformed("missing child"))?;
            let first = children.pop().ok_or_else(|| malformed("missing child"))?;
            let ratio = record.ratio.map(Ratio::new).unwrap_or_default();
            Node::make_binary_split(record.id.clone(), axis, first, second, ratio.get()).kind
        }
        (_, None) => NodeKind::Leaf,
    };

    let background_image = record.background_image.as_ref().map(|value| {
        images
            .get(&**value)
            .map(|payload| Arc::clone(payload))
            .unwrap_or_else(|| Arc::clone(value))
    });

    Ok(Arc::new(Node {
        id: record.id.clone(),
        padding: record.padding.clamped(),
        background_color: record.background_color.clone(),
        background_image,
        kind,
    }))
}

impl Document {
    pub fn to_json(&self, pretty: bool) -> Result<String, CodecError> {
        let json = if pretty {
            serde_json::to_string_pretty(self)?
        } else {
            serde_json::to_string(self)?
        };
        Ok(json)
    }

    pub fn from_json(text: &str) -> Result<Self, CodecError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Timestamped file name offered when saving, e.g. `layout_20240102T030405.json`
    pub fn suggested_file_name(now: DateTime<Utc>) -> String {
        format!("layout_{}.json", now.format("%Y%m%dT%H%M%S"))
    }
}

/// Parse and load a layout file's contents
pub fn parse(text: &str) -> Result<Tree, CodecError> {
    load(&Document::from_json(text)?)
}

/// Save a tree to a layout file
pub fn save_to_path(tree: &Tree, path: &Path, options: &CodecOptions) -> Result<(), CodecError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let json = save_with(tree, options).to_json(options.pretty)?;
    std::fs::write(path, json)?;
    tracing::info!(path = %path.display(), "layout written");
    Ok(())
}

/// Save into the configured layout directory under a timestamped name
pub fn save_to_layout_dir(
    tree: &Tree,
    settings: &CodecSettings,
    now: DateTime<Utc>,
) -> Result<PathBuf, CodecError> {
    let path = settings
        .resolved_layout_dir()?
        .join(Document::suggested_file_name(now));
    save_to_path(tree, &path, &CodecOptions::from(settings))?;
    Ok(path)
}

/// Load a layout file
pub fn load_from_path(path: &Path) -> Result<Tree, CodecError> {
    let text = std::fs::read_to_string(path)?;
    parse(&text)
}

/// Load a layout file without blocking the caller's event loop
pub async fn load_from_path_async(path: &Path) -> Result<Tree, CodecError> {
    let text = tokio::fs::read_to_string(path).await?;
    let tree = parse(&text)?;
    tracing::info!(path = %path.display(), leaves = tree.leaf_count(), "layout read");
    Ok(tree)
}
