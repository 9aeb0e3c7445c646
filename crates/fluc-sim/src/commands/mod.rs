pub mod bounds;
pub mod toy;
pub mod version;
