pub mod gallery;
pub mod gui;
pub mod layout;
pub mod persistence;
pub mod upload;
