//! Resume and job description input: file type detection and text extraction

pub mod file_detector;
pub mod manager;
pub mod text_extractor;

pub use manager::InputManager;
