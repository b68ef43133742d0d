// src/infrastructure/mod.rs
//
// Infrastructure Layer
//
// Local transforms that support the domain but are not part of it.
//
// RULES:
// - Infrastructure serves the domain
// - Infrastructure never talks to the remote catalog

pub mod image_compression;

pub use image_compression::{
    compress, compress_all, compress_async, CompressedImage, CompressionBatch, ImageRejection,
};
