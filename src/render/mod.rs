pub mod composite;
pub mod gradient;
pub mod grain;
pub mod text;
