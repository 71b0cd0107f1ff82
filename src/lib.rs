//! PicWords Library
//!
//! Picture vocabulary drill: show a picture, take a spoken or typed answer,
//! give feedback.

pub mod asr;
pub mod audio;
pub mod catalog;
pub mod config;
pub mod core;
pub mod error;
pub mod gallery;
pub mod picture;
pub mod practice;
pub mod session;
pub mod tts;
