// tests/property.rs

mod property {
    pub mod graph;
}
