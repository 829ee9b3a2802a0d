//! Spectromesh library - Audio-reactive spectrum mesh

pub mod audio;
pub mod camera;
pub mod cli;
pub mod error;
pub mod input;
pub mod mesh;
pub mod params;
pub mod rendering;
pub mod visualizer;
pub mod wave;
