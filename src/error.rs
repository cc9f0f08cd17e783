use std::path::PathBuf;
use thiserror::Error;

use crate::region::Rect;
use crate::tree::NodeId;

#[derive(Error, Debug)]
pub enum SliceError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("invalid input image: {0}")]
    InvalidInput(String),

    #[error("region {region} lies outside the {width}x{height} sheet")]
    OutOfBounds {
        region: Rect,
        width: u32,
        height: u32,
    },

    #[error("moving node {node} under {target} would create a cycle")]
    Cycle { node: NodeId, target: NodeId },

    #[error("unknown node id {0}")]
    NotFound(NodeId),

    #[error("node {0} is not a group")]
    NotAGroup(NodeId),

    #[error("node {0} is not a sprite leaf")]
    NotALeaf(NodeId),

    #[error("the root group cannot be moved or removed")]
    RootImmutable,

    #[error("child order for group {parent} does not match its current children")]
    InvalidOrder { parent: NodeId },

    #[error("operation cancelled")]
    Cancelled,

    #[error("Failed to load image '{path}': {source}")]
    ImageLoad {
        path: PathBuf,
        source: image::ImageError,
    },

    #[error("Failed to save image '{path}': {source}")]
    ImageSave {
        path: PathBuf,
        source: image::ImageError,
    },

    #[error("Failed to write output file '{path}': {source}")]
    OutputWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to compress PNG '{path}': {message}")]
    PngCompress { path: PathBuf, message: String },

    #[error("Input path does not exist: {0}")]
    InputNotFound(PathBuf),
}
