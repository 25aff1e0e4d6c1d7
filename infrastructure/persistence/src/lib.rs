pub mod conversions;
pub mod db;
pub mod memory;
pub mod unit_of_work;
pub mod order {
    pub mod entity;
    pub mod repository;
}
pub mod product {
    pub mod entity;
    pub mod repository;
}
