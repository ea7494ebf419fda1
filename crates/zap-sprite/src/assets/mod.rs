pub mod descriptor;
pub mod manifest;
pub mod registry;
