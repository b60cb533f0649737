pub mod spec;
pub mod surql;
