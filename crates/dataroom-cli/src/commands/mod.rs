pub mod file;
pub mod folder;
pub mod import;
pub mod items;
pub mod room;
pub mod run;
pub mod tree;
pub mod view;
