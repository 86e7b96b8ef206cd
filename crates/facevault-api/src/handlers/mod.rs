pub mod delete;
pub mod files;
pub mod health;
pub mod search_faces;
pub mod upload;
pub mod view;
