#![forbid(unsafe_code)]

mod generator;

pub use generator::{
    generate, pick_weighted, GeneratedPiece, GeneratedStructure, GeneratorConfig,
};
